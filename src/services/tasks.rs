use std::sync::Arc;

use log::{debug, info};
use validator::Validate;

use super::{parse_id, storage_failure};
use crate::error::AppError;
use crate::models::{CreateTaskRequest, Task, UpdateTaskRequest};
use crate::storage::{StoreError, TaskStore};

const TASK_NOT_FOUND: &str = "Task not found";

/// Task CRUD confined to the tasks of one owner per call.
///
/// Ownership is enforced by the store queries themselves: a task owned by someone else
/// is reported exactly like a task that does not exist.
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// All tasks owned by `user_id`, newest first. No tasks is an empty list.
    pub async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, AppError> {
        let owner = parse_id(user_id, "user id")?;
        self.tasks
            .list(owner)
            .await
            .map_err(|err| storage_failure("list_tasks", owner, err))
    }

    pub async fn get_task_by_id(&self, task_id: &str, user_id: &str) -> Result<Task, AppError> {
        let id = parse_id(task_id, "task id")?;
        let owner = parse_id(user_id, "user id")?;
        self.tasks
            .get_by_id(id, owner)
            .await
            .map_err(|err| not_found_or_storage("get_task", id, err))
    }

    /// Exact-title lookup among the caller's tasks; the newest match wins.
    pub async fn get_task_by_title(&self, title: &str, user_id: &str) -> Result<Task, AppError> {
        let owner = parse_id(user_id, "user id")?;
        self.tasks
            .get_by_title(title, owner)
            .await
            .map_err(|err| not_found_or_storage("get_task_by_title", owner, err))
    }

    pub async fn create_task(
        &self,
        user_id: &str,
        request: CreateTaskRequest,
    ) -> Result<Task, AppError> {
        request.validate()?;
        let owner = parse_id(user_id, "user id")?;

        let task = Task::new(request, owner);
        self.tasks
            .create(&task)
            .await
            .map_err(|err| storage_failure("create_task", owner, err))?;

        info!("user {} created task {}", owner, task.id);
        Ok(task)
    }

    /// Applies the fields present in `request` to an owned task and stamps `updated_at`.
    pub async fn update_task(
        &self,
        task_id: &str,
        user_id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Task, AppError> {
        let id = parse_id(task_id, "task id")?;
        let owner = parse_id(user_id, "user id")?;
        request.validate()?;

        let mut task = self
            .tasks
            .get_by_id(id, owner)
            .await
            .map_err(|err| not_found_or_storage("update_task lookup", id, err))?;
        task.apply(request);

        let affected = self
            .tasks
            .update(id, owner, &task)
            .await
            .map_err(|err| storage_failure("update_task", id, err))?;
        if affected == 0 {
            // deleted between the lookup and the write
            debug!("task {} vanished before update", id);
            return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
        }

        Ok(task)
    }

    pub async fn delete_task(&self, task_id: &str, user_id: &str) -> Result<(), AppError> {
        let id = parse_id(task_id, "task id")?;
        let owner = parse_id(user_id, "user id")?;

        let affected = self
            .tasks
            .delete(id, owner)
            .await
            .map_err(|err| storage_failure("delete_task", id, err))?;
        if affected == 0 {
            return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
        }

        info!("user {} deleted task {}", owner, id);
        Ok(())
    }
}

fn not_found_or_storage(operation: &str, id: uuid::Uuid, err: StoreError) -> AppError {
    match err {
        StoreError::NotFound => AppError::NotFound(TASK_NOT_FOUND.into()),
        other => storage_failure(operation, id, other),
    }
}
