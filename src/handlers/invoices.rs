// src/handlers/invoices.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::RequireAdmin},
    models::{
        analytical::ClassificationInput,
        invoice::{InvoiceAction, InvoiceData, InvoiceItem, InvoiceTotals, NumericInput},
        journal::{EntryType, JournalEntry},
    },
    services::{
        invoice_service,
        journal_service::{AccountSelection, JournalEntryInput},
    },
};

// =============================================================================
//  TOTALS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalsPayload {
    pub items: Vec<InvoiceItem>,
    #[schema(example = 10)]
    pub tax_rate: NumericInput,
}

// POST /api/invoices/totals
#[utoipa::path(
    post,
    path = "/api/invoices/totals",
    tag = "Invoices",
    request_body = TotalsPayload,
    responses(
        (status = 200, description = "Subtotal, tax and total", body = InvoiceTotals),
        (status = 400, description = "Tax rate is not a number")
    ),
    security(("api_jwt" = []))
)]
pub async fn calculate_totals(
    _user: AuthenticatedUser,
    Json(payload): Json<TotalsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let totals = invoice_service::calculate_totals(&payload.items, &payload.tax_rate)?;
    Ok((StatusCode::OK, Json(totals)))
}

// =============================================================================
//  DRAFT
// =============================================================================

// GET /api/invoices/draft
#[utoipa::path(
    get,
    path = "/api/invoices/draft",
    tag = "Invoices",
    responses(
        (status = 200, description = "A fresh invoice draft", body = InvoiceData)
    ),
    security(("api_jwt" = []))
)]
pub async fn new_draft(_user: AuthenticatedUser) -> impl IntoResponse {
    let now = Utc::now();
    let draft = invoice_service::new_invoice(now.date_naive(), now.timestamp_millis());
    (StatusCode::OK, Json(draft))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftActionPayload {
    pub invoice: InvoiceData,

    // {"action": "addItem"}, {"action": "removeItem", "index": 1}, ...
    #[serde(flatten)]
    pub action: InvoiceAction,
}

// POST /api/invoices/draft
#[utoipa::path(
    post,
    path = "/api/invoices/draft",
    tag = "Invoices",
    request_body = DraftActionPayload,
    responses(
        (status = 200, description = "The draft after the action", body = InvoiceData),
        (status = 400, description = "Unknown line or non-numeric input")
    ),
    security(("api_jwt" = []))
)]
pub async fn apply_draft_action(
    _user: AuthenticatedUser,
    Json(payload): Json<DraftActionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let next = invoice_service::apply_action(
        payload.invoice,
        payload.action,
        Uuid::new_v4().to_string(),
    )?;
    Ok((StatusCode::OK, Json(next)))
}

// =============================================================================
//  JOURNAL
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceJournalPayload {
    pub invoice: InvoiceData,

    // Same account choice as a manual journal entry
    pub analytical_account_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub category: Option<String>,

    pub contact_id: Option<Uuid>,
}

// POST /api/invoices/journal-entries
#[utoipa::path(
    post,
    path = "/api/invoices/journal-entries",
    tag = "Invoices",
    request_body = InvoiceJournalPayload,
    responses(
        (status = 201, description = "DRAFT income entry for the invoice total, rounded to cents", body = JournalEntry),
        (status = 400, description = "Invalid invoice or no account could be resolved"),
        (status = 403, description = "Admin only")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_invoice(
    State(app_state): State<AppState>,
    admin: RequireAdmin,
    Json(payload): Json<InvoiceJournalPayload>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Recompute the invoice from its lines, then round to cents
    let invoice = invoice_service::prepare_for_journal(payload.invoice)?;
    let amount = invoice_service::journal_amount(&invoice)?;

    // 2. Same account resolution as POST /journal-entries
    let account = match payload.analytical_account_id {
        Some(id) => AccountSelection::Explicit(id),
        None => AccountSelection::Classify(ClassificationInput {
            product_id: payload.product_id,
            category: payload.category,
        }),
    };

    let entry = app_state
        .journal_service
        .create(JournalEntryInput {
            reference: Some(invoice.invoice_number.clone()),
            account,
            contact_id: payload.contact_id,
            amount,
            entry_type: EntryType::Income,
            date: invoice.date,
        })
        .await?;

    tracing::info!(
        "Invoice {} recorded as journal entry {} by {}",
        invoice.invoice_number,
        entry.id,
        admin.user.user_id
    );
    Ok((StatusCode::CREATED, Json(entry)))
}
