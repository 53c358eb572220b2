//! Task CRUD endpoints gated on per-user ownership.
//!
//! Every handler authenticates first, then enforces ownership with an
//! explicit two-step check: load the task by id, compare its owner to the
//! caller. The order matters: a missing task must answer `404` while
//! someone else's task answers `401`, and an owner-scoped query would
//! collapse the two.
//!
//! Flow Overview:
//! 1) Authenticate via bearer token.
//! 2) Parse and validate the payload against the field constraint set.
//! 3) Load by id, compare owner (reads and writes alike).
//! 4) Persist and return the wire representation.

mod storage;
mod types;
mod validate;

use axum::{
    Json,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::ApiError;
use super::auth::{
    AuthState,
    principal::{Principal, require_auth},
};
use storage::{
    TaskWrite, delete_task_row, fetch_task, fetch_tasks_for_user, insert_task, update_task_row,
};
use types::{
    CreateTaskRequest, EmptyData, TaskDataResponse, TaskDeletedResponse, TaskListResponse,
    UpdateTaskRequest,
};
use validate::validate_task_fields;

const TASK_NOT_FOUND: &str = "Task not found";

/// Ownership gate applied after the load step.
fn authorize_owner(owner: Uuid, principal: &Principal, denied: &'static str) -> Result<(), ApiError> {
    if owner == principal.user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(denied))
    }
}

/// Task ids arrive as opaque path segments; anything that is not a UUID can
/// never name a stored task.
fn parse_task_id(task_id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(task_id).map_err(|_| ApiError::validation("Invalid task id"))
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Tasks owned by the caller, newest first.", body = TaskListResponse),
        (status = 401, description = "Missing or invalid bearer token.", body = super::ErrorResponse),
    ),
    tag = "tasks"
)]
/// Lists the caller's tasks ordered by creation time descending.
/// An empty list is a valid result, not an error.
pub async fn list_tasks(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &auth_state).await {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };

    match fetch_tasks_for_user(&pool, principal.user_id).await {
        Ok(rows) => {
            let data: Vec<_> = rows.into_iter().map(storage::TaskRow::into_response).collect();
            let response = TaskListResponse {
                success: true,
                count: data.len(),
                data,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => ApiError::Database(err).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "The requested task.", body = TaskDataResponse),
        (status = 401, description = "Missing token, or the task belongs to another user.", body = super::ErrorResponse),
        (status = 404, description = "No task with this id.", body = super::ErrorResponse),
    ),
    tag = "tasks"
)]
pub async fn get_task(
    Path(task_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &auth_state).await {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };

    let task_id = match parse_task_id(&task_id) {
        Ok(task_id) => task_id,
        Err(err) => return err.into_response(),
    };

    let task = match fetch_task(&pool, task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => return ApiError::NotFound(TASK_NOT_FOUND).into_response(),
        Err(err) => return ApiError::Database(err).into_response(),
    };

    if let Err(err) = authorize_owner(task.user_id, &principal, "Not authorized to access this task")
    {
        return err.into_response();
    }

    let response = TaskDataResponse {
        success: true,
        data: task.into_response(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created, owned by the caller.", body = TaskDataResponse),
        (status = 400, description = "Validation failed.", body = super::ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token.", body = super::ErrorResponse),
    ),
    tag = "tasks"
)]
/// Creates a task owned by the authenticated caller. The owner always comes
/// from the token, never from the request body.
pub async fn create_task(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<CreateTaskRequest>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &auth_state).await {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };

    let Some(Json(payload)) = payload else {
        return ApiError::validation("Invalid request body").into_response();
    };

    let fields =
        match validate_task_fields(payload.title.as_deref(), payload.description.as_deref()) {
            Ok(fields) => fields,
            Err(message) => return ApiError::validation(message).into_response(),
        };

    let write = TaskWrite {
        title: fields.title,
        description: fields.description,
        priority: payload.priority,
        status: payload.status,
        due_date: payload.due_date,
    };

    match insert_task(&pool, principal.user_id, &write).await {
        Ok(task) => {
            let response = TaskDataResponse {
                success: true,
                data: task.into_response(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => ApiError::Database(err).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    request_body = UpdateTaskRequest,
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "The updated task.", body = TaskDataResponse),
        (status = 400, description = "Validation failed.", body = super::ErrorResponse),
        (status = 401, description = "Missing token, or the task belongs to another user.", body = super::ErrorResponse),
        (status = 404, description = "No task with this id.", body = super::ErrorResponse),
    ),
    tag = "tasks"
)]
/// Applies a partial update: absent fields keep their stored values, and the
/// task's id and owner are immutable regardless of what the body carries.
pub async fn update_task(
    Path(task_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<UpdateTaskRequest>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &auth_state).await {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };

    let task_id = match parse_task_id(&task_id) {
        Ok(task_id) => task_id,
        Err(err) => return err.into_response(),
    };

    let Some(Json(payload)) = payload else {
        return ApiError::validation("Invalid request body").into_response();
    };

    let existing = match fetch_task(&pool, task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => return ApiError::NotFound(TASK_NOT_FOUND).into_response(),
        Err(err) => return ApiError::Database(err).into_response(),
    };

    if let Err(err) =
        authorize_owner(existing.user_id, &principal, "Not authorized to update this task")
    {
        return err.into_response();
    }

    // Merge the partial payload over the stored row, then re-validate the
    // result so an update can never smuggle in an out-of-bounds value.
    let title = payload.title.as_deref().or(Some(existing.title.as_str()));
    let description = match payload.description.as_deref() {
        Some(description) => Some(description),
        None => existing.description.as_deref(),
    };
    let fields = match validate_task_fields(title, description) {
        Ok(fields) => fields,
        Err(message) => return ApiError::validation(message).into_response(),
    };

    let write = TaskWrite {
        title: fields.title,
        description: fields.description,
        priority: payload.priority.unwrap_or(existing.priority),
        status: payload.status.unwrap_or(existing.status),
        due_date: payload.due_date.or(existing.due_date),
    };

    match update_task_row(&pool, task_id, &write).await {
        Ok(task) => {
            let response = TaskDataResponse {
                success: true,
                data: task.into_response(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => ApiError::Database(err).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task removed.", body = TaskDeletedResponse),
        (status = 401, description = "Missing token, or the task belongs to another user.", body = super::ErrorResponse),
        (status = 404, description = "No task with this id.", body = super::ErrorResponse),
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    Path(task_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &auth_state).await {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };

    let task_id = match parse_task_id(&task_id) {
        Ok(task_id) => task_id,
        Err(err) => return err.into_response(),
    };

    let task = match fetch_task(&pool, task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => return ApiError::NotFound(TASK_NOT_FOUND).into_response(),
        Err(err) => return ApiError::Database(err).into_response(),
    };

    if let Err(err) = authorize_owner(task.user_id, &principal, "Not authorized to delete this task")
    {
        return err.into_response();
    }

    if let Err(err) = delete_task_row(&pool, task_id).await {
        return ApiError::Database(err).into_response();
    }

    let response = TaskDeletedResponse {
        success: true,
        data: EmptyData {},
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(user_id: Uuid) -> Principal {
        Principal {
            user_id,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn authorize_owner_accepts_matching_owner() {
        let user_id = Uuid::new_v4();
        assert!(authorize_owner(user_id, &principal(user_id), "denied").is_ok());
    }

    #[test]
    fn authorize_owner_rejects_other_owner() {
        let owner = Uuid::new_v4();
        let caller = principal(Uuid::new_v4());
        let result = authorize_owner(owner, &caller, "Not authorized to access this task");
        assert!(matches!(
            result,
            Err(ApiError::Forbidden("Not authorized to access this task"))
        ));
    }

    #[test]
    fn parse_task_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_task_id(&id.to_string()).ok(), Some(id));
    }

    #[test]
    fn parse_task_id_rejects_garbage() {
        assert!(matches!(
            parse_task_id("not-a-uuid"),
            Err(ApiError::Validation(_))
        ));
    }
}
