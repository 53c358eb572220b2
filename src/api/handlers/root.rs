use axum::response::IntoResponse;

// Undocumented banner route; not part of the OpenAPI surface.
pub async fn root() -> impl IntoResponse {
    crate::APP_USER_AGENT
}
