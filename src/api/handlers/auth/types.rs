//! Request/response types for registration, login, and the current user.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public user shape; the password hash never leaves the store layer.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Envelope returned by register and login: token plus the user it names.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub success: bool,
    pub data: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_uses_mongo_style_field_names() {
        let user = UserResponse {
            id: "42".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let value = serde_json::to_value(&user).expect("serialize");
        assert_eq!(value["_id"], "42");
        assert_eq!(value["createdAt"], "2026-01-01T00:00:00Z");
        assert!(value.get("id").is_none());
        assert!(value.get("created_at").is_none());
    }
}
