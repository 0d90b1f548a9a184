//! Handlers under `/api/tasks`. All routes sit behind
//! [`require_session`](super::session::require_session).

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::info;

use crate::auth::domain::Identity;

use super::{
    AppState,
    dto::{CreateTaskBody, TaskResponse, UpdateTaskBody},
    error::{ApiError, TaskAction, lifecycle_error},
    validation::{parse_task_id, validate_create, validate_update},
};

/// `GET /api/tasks`: every active task in id order.
///
/// # Errors
///
/// 500 when the store fails.
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "Active tasks in id order", body = [TaskResponse]),
        (status = 401, description = "Session absent or invalid")
    ),
    security(("session_cookie" = []), ("bearer_token" = []))
)]
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = state
        .tasks
        .list()
        .await
        .map_err(|err| lifecycle_error(err, TaskAction::Read))?;
    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

/// `GET /api/tasks/:id`.
///
/// # Errors
///
/// 422 for a non-integer id, 404 when no active task matches.
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "The task", body = TaskResponse),
        (status = 404, description = "No active task with this id"),
        (status = 422, description = "Id is not an integer")
    ),
    security(("session_cookie" = []), ("bearer_token" = []))
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_task_id(&raw_id)?;
    let task = state
        .tasks
        .find_by_id(id)
        .await
        .map_err(|err| lifecycle_error(err, TaskAction::Read))?;
    Ok(Json(TaskResponse::from(&task)))
}

/// `POST /api/tasks`.
///
/// # Errors
///
/// 422 when the body fails validation.
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = CreateTaskBody,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 422, description = "Invalid fields")
    ),
    security(("session_cookie" = []), ("bearer_token" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let Json(create_body) = body?;
    let new_task = validate_create(create_body)?;
    let task = state
        .tasks
        .create(new_task)
        .await
        .map_err(|err| lifecycle_error(err, TaskAction::Create))?;
    info!(user_id = %identity.user_id, task_id = %task.id(), "task created via api");
    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

/// `PUT /api/tasks/:id`: partial update.
///
/// # Errors
///
/// 422 for an invalid id or body, 404 for missing or deleted tasks, 403 for
/// read-only tasks.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task identifier")),
    request_body = UpdateTaskBody,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 403, description = "Task is read-only"),
        (status = 404, description = "Task missing or deleted"),
        (status = 422, description = "Invalid id or fields")
    ),
    security(("session_cookie" = []), ("bearer_token" = []))
)]
pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateTaskBody>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_task_id(&raw_id)?;
    let Json(update_body) = body?;
    let changes = validate_update(update_body)?;
    let task = state
        .tasks
        .update(id, changes)
        .await
        .map_err(|err| lifecycle_error(err, TaskAction::Update))?;
    info!(user_id = %identity.user_id, task_id = %id, "task updated via api");
    Ok(Json(TaskResponse::from(&task)))
}

/// `DELETE /api/tasks/:id`: soft delete.
///
/// # Errors
///
/// 422 for a non-integer id, 404 for missing or already deleted tasks, 403
/// for read-only tasks.
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task soft-deleted"),
        (status = 403, description = "Task is read-only"),
        (status = 404, description = "Task missing or already deleted"),
        (status = 422, description = "Id is not an integer")
    ),
    security(("session_cookie" = []), ("bearer_token" = []))
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_task_id(&raw_id)?;
    state
        .tasks
        .delete(id)
        .await
        .map_err(|err| lifecycle_error(err, TaskAction::Delete))?;
    info!(user_id = %identity.user_id, task_id = %id, "task deleted via api");
    Ok(StatusCode::NO_CONTENT)
}
