//! API handlers and shared utilities for Tasko.
//!
//! This module organizes the service's route handlers and provides the
//! uniform error envelope every failing endpoint returns.

pub mod auth;
pub mod health;
pub mod root;
pub mod tasks;

use axum::{Json, http::StatusCode, response::IntoResponse};
use regex::Regex;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// Uniform error payload: `{"success": false, "message": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Request-boundary error taxonomy.
///
/// `Forbidden` (valid identity, wrong owner) maps to `401` rather than `403`,
/// keeping the split between "does not exist" (`404`) and "exists but not
/// yours" (`401`) observable to callers.
#[derive(Debug)]
pub enum ApiError {
    Unauthenticated(&'static str),
    Forbidden(&'static str),
    NotFound(&'static str),
    Validation(String),
    Database(sqlx::Error),
    Internal(&'static str),
}

impl ApiError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

impl IntoResponse for ApiError {
    /// Convert the error into the uniform JSON envelope.
    /// Database failures are logged server-side and surfaced with the
    /// underlying message so idempotent callers can decide to retry.
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            Self::Unauthenticated(message) => (StatusCode::UNAUTHORIZED, message.to_string()),
            Self::Forbidden(message) => (StatusCode::UNAUTHORIZED, message.to_string()),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::Database(err) => {
                error!("Database error: {err}");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Internal(message) => {
                error!("Internal error: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };
        (
            status,
            Json(ErrorResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Lightweight email sanity check used by auth handlers before persisting data.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_parts(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    #[tokio::test]
    async fn unauthenticated_maps_to_401() {
        let (status, body) = response_parts(ApiError::Unauthenticated(
            "Not authorized to access this route",
        ))
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Not authorized to access this route");
    }

    #[tokio::test]
    async fn forbidden_keeps_observed_401_mapping() {
        let (status, body) =
            response_parts(ApiError::Forbidden("Not authorized to access this task")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authorized to access this task");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, body) = response_parts(ApiError::NotFound("Task not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Task not found");
    }

    #[tokio::test]
    async fn validation_maps_to_400() {
        let (status, body) =
            response_parts(ApiError::validation("Title cannot be more than 100 characters")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Title cannot be more than 100 characters");
    }

    #[tokio::test]
    async fn database_error_surfaces_message_as_400() {
        let (status, body) = response_parts(ApiError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }
}
