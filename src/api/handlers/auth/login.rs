//! Login endpoint exchanging credentials for a bearer token.

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
    AuthState, password,
    storage::lookup_credentials,
    types::{AuthResponse, LoginRequest},
    utils::normalize_email,
};
use crate::api::handlers::ApiError;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; returns a bearer token.", body = AuthResponse),
        (status = 400, description = "Missing email or password.", body = crate::api::handlers::ErrorResponse),
        (status = 401, description = "Unknown email or wrong password.", body = crate::api::handlers::ErrorResponse),
    ),
    tag = "auth"
)]
/// Verifies the password against the stored hash and issues a fresh token.
/// Unknown email and wrong password return the same `401` to avoid account
/// probing.
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return ApiError::validation("Invalid request body").into_response();
    };

    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return ApiError::validation("Please provide an email and password").into_response();
    }

    let record = match lookup_credentials(&pool, &email).await {
        Ok(record) => record,
        Err(err) => return ApiError::Database(err).into_response(),
    };

    let Some(record) = record else {
        return ApiError::Unauthenticated(INVALID_CREDENTIALS).into_response();
    };

    if !password::verify_password(&payload.password, &record.password_hash) {
        return ApiError::Unauthenticated(INVALID_CREDENTIALS).into_response();
    }

    let token = match auth_state.tokens().sign(record.user.id) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to sign token: {err}");
            return ApiError::Internal("Unable to process login").into_response();
        }
    };

    let response = AuthResponse {
        success: true,
        token,
        user: record.user.into_response(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
