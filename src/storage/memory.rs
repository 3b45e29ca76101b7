use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{Task, User};

/// Task store kept in process memory. Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: &Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(StoreError::Conflict(format!("task {} already exists", task.id)));
        }
        tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn get_by_id(&self, task_id: Uuid, user_id: Uuid) -> Result<Task, StoreError> {
        self.tasks
            .read()
            .await
            .get(&task_id)
            .filter(|task| task.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_title(&self, title: &str, user_id: Uuid) -> Result<Task, StoreError> {
        self.tasks
            .read()
            .await
            .values()
            .filter(|task| task.user_id == user_id && task.title == title)
            .max_by_key(|task| task.created_at)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, task_id: Uuid, user_id: Uuid, task: &Task) -> Result<u64, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task_id) {
            Some(stored) if stored.user_id == user_id => {
                // id, owner and creation time are immutable
                stored.title = task.title.clone();
                stored.description = task.description.clone();
                stored.is_done = task.is_done;
                stored.updated_at = task.updated_at;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let mut owned: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| task.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn delete(&self, task_id: Uuid, user_id: Uuid) -> Result<u64, StoreError> {
        let mut tasks = self.tasks.write().await;
        let owned = tasks
            .get(&task_id)
            .map_or(false, |task| task.user_id == user_id);
        if owned {
            tasks.remove(&task_id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

/// User store kept in process memory, keyed by id with a unique email index.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        if users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user {} already exists", user.id)));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, StoreError> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
