// src/handlers/journal.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_amount},
    config::AppState,
    middleware::rbac::RequireAdmin,
    models::{
        analytical::ClassificationInput,
        journal::{EntryType, JournalEntry, JournalStatus},
    },
    services::journal_service::{AccountSelection, JournalEntryInput},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalEntryPayload {
    #[validate(length(max = 64, message = "The reference must be at most 64 characters."))]
    #[schema(example = "INV-001")]
    pub reference: Option<String>,

    // Explicit account; when absent the rules below pick one
    pub analytical_account_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    #[schema(example = "Wood")]
    pub category: Option<String>,

    pub contact_id: Option<Uuid>,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = f64, example = 400.0)]
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    // Defaults to today (UTC)
    #[schema(value_type = Option<String>, format = Date, example = "2026-02-14")]
    pub date: Option<NaiveDate>,
}

impl CreateJournalEntryPayload {
    pub fn into_input(self, today: NaiveDate) -> JournalEntryInput {
        let account = match self.analytical_account_id {
            Some(id) => AccountSelection::Explicit(id),
            None => AccountSelection::Classify(ClassificationInput {
                product_id: self.product_id,
                category: self.category,
            }),
        };

        JournalEntryInput {
            reference: self.reference,
            account,
            contact_id: self.contact_id,
            amount: self.amount,
            entry_type: self.entry_type,
            date: self.date.unwrap_or(today),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JournalListQuery {
    /// Only entries in this status
    pub status: Option<JournalStatus>,
}

// GET /api/journal-entries
#[utoipa::path(
    get,
    path = "/api/journal-entries",
    tag = "Journal Entries",
    params(JournalListQuery),
    responses(
        (status = 200, description = "Journal entries, newest first", body = Vec<JournalEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<JournalListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.journal_service.list(query.status).await?;
    Ok((StatusCode::OK, Json(entries)))
}

// POST /api/journal-entries
#[utoipa::path(
    post,
    path = "/api/journal-entries",
    tag = "Journal Entries",
    request_body = CreateJournalEntryPayload,
    responses(
        (status = 201, description = "Entry recorded as DRAFT", body = JournalEntry),
        (status = 400, description = "Invalid data or no account could be resolved")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_entry(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CreateJournalEntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let input = payload.into_input(Utc::now().date_naive());
    let entry = app_state.journal_service.create(input).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

// POST /api/journal-entries/{id}/post
#[utoipa::path(
    post,
    path = "/api/journal-entries/{id}/post",
    tag = "Journal Entries",
    params(("id" = Uuid, Path, description = "Journal entry id")),
    responses(
        (status = 200, description = "Entry posted", body = JournalEntry),
        (status = 404, description = "Unknown entry"),
        (status = 409, description = "Entry is not a draft")
    ),
    security(("api_jwt" = []))
)]
pub async fn post_entry(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state
        .journal_service
        .transition(id, JournalStatus::Posted)
        .await?;
    Ok((StatusCode::OK, Json(entry)))
}

// POST /api/journal-entries/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/journal-entries/{id}/cancel",
    tag = "Journal Entries",
    params(("id" = Uuid, Path, description = "Journal entry id")),
    responses(
        (status = 200, description = "Entry cancelled", body = JournalEntry),
        (status = 404, description = "Unknown entry"),
        (status = 409, description = "Entry already cancelled")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_entry(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state
        .journal_service
        .transition(id, JournalStatus::Cancelled)
        .await?;
    Ok((StatusCode::OK, Json(entry)))
}
