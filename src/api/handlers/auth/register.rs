//! User registration endpoint.

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::{
    AuthState, NAME_MAX, PASSWORD_MIN, password,
    storage::{RegisterOutcome, insert_user},
    types::{AuthResponse, RegisterRequest},
    utils::normalize_email,
};
use crate::api::handlers::{ApiError, valid_email};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful; returns a bearer token.", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered.", body = crate::api::handlers::ErrorResponse),
    ),
    tag = "auth"
)]
/// Creates a user account and immediately issues a bearer token, so the
/// caller is logged in without a second round trip.
/// Duplicate emails are detected by the store's unique constraint.
pub async fn register(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return ApiError::validation("Invalid request body").into_response();
    };

    let name = payload.name.trim();
    if name.is_empty() {
        return ApiError::validation("Please add a name").into_response();
    }
    if name.chars().count() > NAME_MAX {
        return ApiError::validation("Name cannot be more than 50 characters").into_response();
    }

    let email = normalize_email(&payload.email);
    if !valid_email(&email) {
        return ApiError::validation("Please add a valid email").into_response();
    }

    if payload.password.chars().count() < PASSWORD_MIN {
        return ApiError::validation("Password must be at least 6 characters").into_response();
    }

    let password_hash = match password::hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return ApiError::Internal("Unable to process registration").into_response();
        }
    };

    match insert_user(&pool, name, &email, &password_hash).await {
        Ok(RegisterOutcome::Created(user)) => {
            let token = match auth_state.tokens().sign(user.id) {
                Ok(token) => token,
                Err(err) => {
                    error!("Failed to sign token: {err}");
                    return ApiError::Internal("Unable to process registration").into_response();
                }
            };
            let response = AuthResponse {
                success: true,
                token,
                user: user.into_response(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Ok(RegisterOutcome::Conflict) => {
            ApiError::validation("User already exists").into_response()
        }
        Err(err) => ApiError::Database(err).into_response(),
    }
}
