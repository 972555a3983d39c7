// src/models/budget.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::journal::JournalStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,

    #[schema(example = "Q1 Workshop Budget")]
    pub name: String,

    pub analytical_account_id: Uuid,

    #[schema(example = "1000.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub start_date: NaiveDate,

    #[schema(value_type = String, format = Date, example = "2026-03-31")]
    pub end_date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

// One line of the budget-vs-actual report (derived, never persisted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReportRow {
    pub budget_id: Uuid,
    pub name: String,

    #[schema(example = "1000.00")]
    pub budget_amount: Decimal,

    #[schema(example = "500.00")]
    pub actual: Decimal,

    #[schema(example = "500.00")]
    pub variance: Decimal,

    // Percentage with exactly two decimals, e.g. "50.00"
    #[schema(example = "50.00")]
    pub achievement: String,
}

// Output of the grouped SUM over journal entries
#[derive(Debug, Clone, FromRow)]
pub struct AccountStatusTotal {
    pub analytical_account_id: Uuid,
    pub status: JournalStatus,
    pub total: Decimal,
}
