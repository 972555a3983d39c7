// src/handlers/budgets.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{validate_not_blank, validate_amount},
    },
    config::AppState,
    middleware::rbac::RequireAdmin,
    models::budget::{Budget, BudgetReportRow},
    services::budget_service::BudgetChanges,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Q1 Workshop Budget")]
    pub name: String,

    pub analytical_account_id: Uuid,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = f64, example = 1000.0)]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub start_date: NaiveDate,

    #[schema(value_type = String, format = Date, example = "2026-03-31")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    pub analytical_account_id: Option<Uuid>,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Decimal>,

    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,

    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
}

impl From<UpdateBudgetPayload> for BudgetChanges {
    fn from(payload: UpdateBudgetPayload) -> Self {
        BudgetChanges {
            name: payload.name,
            analytical_account_id: payload.analytical_account_id,
            amount: payload.amount,
            start_date: payload.start_date,
            end_date: payload.end_date,
        }
    }
}

// GET /api/budgets
#[utoipa::path(
    get,
    path = "/api/budgets",
    tag = "Budgets",
    responses(
        (status = 200, description = "Budgets in creation order", body = Vec<Budget>),
        (status = 403, description = "Admin only")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_budgets(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let budgets = app_state.budget_service.list().await?;
    Ok((StatusCode::OK, Json(budgets)))
}

// POST /api/budgets
#[utoipa::path(
    post,
    path = "/api/budgets",
    tag = "Budgets",
    request_body = CreateBudgetPayload,
    responses(
        (status = 201, description = "Budget created", body = Budget),
        (status = 400, description = "Invalid data, bad date window or unknown account")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_budget(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CreateBudgetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let budget = app_state
        .budget_service
        .create(
            &payload.name,
            payload.analytical_account_id,
            payload.amount,
            payload.start_date,
            payload.end_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(budget)))
}

// PUT /api/budgets/{id}
#[utoipa::path(
    put,
    path = "/api/budgets/{id}",
    tag = "Budgets",
    request_body = UpdateBudgetPayload,
    params(("id" = Uuid, Path, description = "Budget id")),
    responses(
        (status = 200, description = "Budget updated", body = Budget),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Unknown budget")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_budget(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBudgetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let budget = app_state.budget_service.update(id, payload.into()).await?;
    Ok((StatusCode::OK, Json(budget)))
}

// DELETE /api/budgets/{id}
#[utoipa::path(
    delete,
    path = "/api/budgets/{id}",
    tag = "Budgets",
    params(("id" = Uuid, Path, description = "Budget id")),
    responses(
        (status = 204, description = "Budget deleted"),
        (status = 404, description = "Unknown budget")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_budget(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.budget_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/budgets/report
#[utoipa::path(
    get,
    path = "/api/budgets/report",
    tag = "Budgets",
    responses(
        (status = 200, description = "Budget vs actual (posted entries only)", body = Vec<BudgetReportRow>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    ),
    security(("api_jwt" = []))
)]
pub async fn budget_report(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.budget_service.report().await?;
    Ok((StatusCode::OK, Json(report)))
}
