//! Current-user endpoint backing the frontend session check.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;

use super::{
    AuthState,
    principal::require_auth,
    types::{MeResponse, UserResponse},
};

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Return the authenticated user.", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token.", body = crate::api::handlers::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &auth_state).await {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };

    let response = MeResponse {
        success: true,
        data: UserResponse {
            id: principal.user_id.to_string(),
            name: principal.name,
            email: principal.email,
            created_at: principal.created_at,
        },
    };
    (StatusCode::OK, Json(response)).into_response()
}
