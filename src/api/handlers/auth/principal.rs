//! Authenticated principal extraction.
//!
//! Flow Overview: read the `Authorization: Bearer` header, verify the token's
//! signature and expiry, resolve the embedded user id to a database row, and
//! return a principal that downstream handlers can use. The guard writes no
//! response itself and holds no state between requests.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use sqlx::PgPool;

use super::{AuthState, storage::find_user_by_id};
use crate::api::handlers::ApiError;

pub(crate) const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Authenticated user context derived from the bearer token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// Resolve the bearer token into a principal, or fail with `Unauthenticated`.
///
/// Missing header, bad signature, expired token, and unknown user all map to
/// the same `401` so callers learn nothing about which check failed.
pub async fn require_auth(
    headers: &HeaderMap,
    pool: &PgPool,
    auth_state: &AuthState,
) -> Result<Principal, ApiError> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(ApiError::Unauthenticated(NOT_AUTHORIZED));
    };

    let Some(user_id) = auth_state.tokens().verify(&token) else {
        return Err(ApiError::Unauthenticated(NOT_AUTHORIZED));
    };

    match find_user_by_id(pool, user_id).await {
        Ok(Some(user)) => Ok(Principal {
            user_id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }),
        Ok(None) => Err(ApiError::Unauthenticated(NOT_AUTHORIZED)),
        Err(err) => Err(ApiError::Database(err)),
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extract_bearer_token_reads_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(
            extract_bearer_token(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn extract_bearer_token_accepts_lowercase_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer token"));
        assert_eq!(extract_bearer_token(&headers), Some("token".to_string()));
    }

    #[test]
    fn extract_bearer_token_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn extract_bearer_token_rejects_empty_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn extract_bearer_token_none_when_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
