// src/handlers/navigation.rs

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::{middleware::auth::AuthenticatedUser, models::navigation::Navigation};

// GET /api/navigation
#[utoipa::path(
    get,
    path = "/api/navigation",
    tag = "Navigation",
    responses(
        (status = 200, description = "Menu for the caller's role", body = Navigation),
        (status = 401, description = "Not authenticated")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_navigation(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
    (StatusCode::OK, Json(Navigation::for_role(user.role)))
}

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
