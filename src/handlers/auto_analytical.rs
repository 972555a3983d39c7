// src/handlers/auto_analytical.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_not_blank},
    config::AppState,
    middleware::rbac::RequireAdmin,
    models::analytical::{AutoAnalyticalModel, ClassificationInput, ClassificationOutcome, RuleView},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRulePayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Wood purchases")]
    pub name: String,

    pub analytical_account_id: Uuid,

    pub match_product_id: Option<Uuid>,

    #[validate(length(max = 120, message = "The category must be at most 120 characters."))]
    #[schema(example = "Wood")]
    pub match_category: Option<String>,

    #[serde(default)]
    #[schema(example = 5)]
    pub priority: i32,
}

// GET /api/auto-analytical
#[utoipa::path(
    get,
    path = "/api/auto-analytical",
    tag = "Auto-Analytical Models",
    responses(
        (status = 200, description = "Rules in evaluation order, with account and product names", body = Vec<RuleView>),
        (status = 403, description = "Admin only")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rules(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let rules = app_state.classification_service.list_views().await?;
    Ok((StatusCode::OK, Json(rules)))
}

// POST /api/auto-analytical
#[utoipa::path(
    post,
    path = "/api/auto-analytical",
    tag = "Auto-Analytical Models",
    request_body = CreateRulePayload,
    responses(
        (status = 201, description = "Rule created", body = AutoAnalyticalModel),
        (status = 400, description = "Invalid data or unknown account/product")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_rule(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CreateRulePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let rule = app_state
        .classification_service
        .create_rule(
            &payload.name,
            payload.analytical_account_id,
            payload.match_product_id,
            payload.match_category.as_deref(),
            payload.priority,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(rule)))
}

// POST /api/auto-analytical/classify
#[utoipa::path(
    post,
    path = "/api/auto-analytical/classify",
    tag = "Auto-Analytical Models",
    request_body = ClassificationInput,
    responses(
        (status = 200, description = "Selected account (if any) and every rule examined", body = ClassificationOutcome)
    ),
    security(("api_jwt" = []))
)]
pub async fn classify(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<ClassificationInput>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state.classification_service.classify(&input).await?;
    Ok((StatusCode::OK, Json(outcome)))
}
