use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskRequest, UpdateTaskRequest},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

/// Retrieves every task owned by the authenticated user, newest first.
///
/// ## Responses:
/// - `200 OK`: a JSON array of tasks, empty when the user has none.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `500 Internal Server Error`: storage failure.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let owned = tasks.list_tasks(&user.id()).await?;

    Ok(HttpResponse::Ok().json(owned))
}

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// - `title`: required, 1 to 255 characters.
/// - `description` (optional).
/// - `is_done` (optional): defaults to `false`.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `400 Bad Request`: undecodable body or invalid title.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `500 Internal Server Error`: storage failure.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = tasks.create_task(&user.id(), task_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task by id.
///
/// A task owned by another user answers `404`, exactly like a missing one.
#[get("/{task_id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_task_by_id(&task_id, &user.id()).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task. Only the fields present in the body change.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: undecodable body or invalid title.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no such task for this user.
/// - `500 Internal Server Error`: storage failure.
#[put("/{task_id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
    task_data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update_task(&task_id, &user.id(), task_data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task. Answers `204 No Content`, or `404` if the user owns no such task.
#[delete("/{task_id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    tasks.delete_task(&task_id, &user.id()).await?;

    Ok(HttpResponse::NoContent().finish())
}
