// src/handlers/analytical.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{deserialize_present, validate_not_blank},
    },
    config::AppState,
    middleware::rbac::RequireAdmin,
    models::analytical::AnalyticalAccount,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnalyticalPayload {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 120, message = "The name must be at most 120 characters.")
    )]
    #[schema(example = "Showroom Renovation")]
    pub name: String,

    #[validate(length(max = 32, message = "The code must be at most 32 characters."))]
    #[schema(example = "CC-101")]
    pub code: Option<String>,

    #[schema(example = true)]
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnalyticalPayload {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 120, message = "The name must be at most 120 characters.")
    )]
    pub name: Option<String>,

    // Absent keeps the code, null or "" clears it
    #[serde(default, deserialize_with = "deserialize_present")]
    #[validate(length(max = 32, message = "The code must be at most 32 characters."))]
    #[schema(value_type = Option<String>, example = "CC-102")]
    pub code: Option<Option<String>>,

    pub active: Option<bool>,
}

// GET /api/analytical
#[utoipa::path(
    get,
    path = "/api/analytical",
    tag = "Analytical Accounts",
    responses(
        (status = 200, description = "All analytical accounts", body = Vec<AnalyticalAccount>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let accounts = app_state.analytical_service.list().await?;
    Ok((StatusCode::OK, Json(accounts)))
}

// POST /api/analytical
#[utoipa::path(
    post,
    path = "/api/analytical",
    tag = "Analytical Accounts",
    request_body = CreateAnalyticalPayload,
    responses(
        (status = 201, description = "Account created", body = AnalyticalAccount),
        (status = 400, description = "Invalid data"),
        (status = 403, description = "Admin only")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CreateAnalyticalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let account = app_state
        .analytical_service
        .create(&payload.name, payload.code.as_deref(), payload.active)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

// PUT /api/analytical/{id}
#[utoipa::path(
    put,
    path = "/api/analytical/{id}",
    tag = "Analytical Accounts",
    request_body = UpdateAnalyticalPayload,
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account updated", body = AnalyticalAccount),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Unknown account")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_account(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAnalyticalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let account = app_state
        .analytical_service
        .update(
            id,
            payload.name.as_deref(),
            payload.code.as_ref().map(|c| c.as_deref()),
            payload.active,
        )
        .await?;

    Ok((StatusCode::OK, Json(account)))
}

// DELETE /api/analytical/{id}
#[utoipa::path(
    delete,
    path = "/api/analytical/{id}",
    tag = "Analytical Accounts",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Unknown account"),
        (status = 409, description = "Account still referenced")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_account(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.analytical_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
