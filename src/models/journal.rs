// src/models/journal.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (mapped onto the Postgres types) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "journal_entry_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "journal_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JournalStatus {
    Draft,
    Posted,
    Cancelled,
}

impl JournalStatus {
    /// DRAFT -> POSTED, DRAFT -> CANCELLED and POSTED -> CANCELLED are the
    /// only legal moves. CANCELLED is terminal.
    pub fn can_transition_to(self, next: JournalStatus) -> bool {
        matches!(
            (self, next),
            (JournalStatus::Draft, JournalStatus::Posted)
                | (JournalStatus::Draft, JournalStatus::Cancelled)
                | (JournalStatus::Posted, JournalStatus::Cancelled)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,

    #[schema(example = "INV-001")]
    pub reference: Option<String>,

    pub analytical_account_id: Uuid,
    pub contact_id: Option<Uuid>,

    #[schema(example = "400.00")]
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    pub status: JournalStatus,

    #[schema(value_type = String, format = Date, example = "2026-02-14")]
    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,
}
