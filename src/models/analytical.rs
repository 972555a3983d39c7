// src/models/analytical.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Analytical accounts (cost centers / projects) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticalAccount {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Showroom Renovation")]
    pub name: String,

    #[schema(example = "CC-101")]
    pub code: Option<String>,

    #[schema(example = true)]
    pub active: bool,

    pub created_at: DateTime<Utc>,
}

// How many rows still point at an account (used to refuse deletion)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountReferences {
    pub budgets: i64,
    pub journal_entries: i64,
    pub rules: i64,
}

impl AccountReferences {
    pub fn is_empty(&self) -> bool {
        self.budgets == 0 && self.journal_entries == 0 && self.rules == 0
    }
}

impl fmt::Display for AccountReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} budget(s), {} journal entry(ies) and {} rule(s)",
            self.budgets, self.journal_entries, self.rules
        )
    }
}

// --- Auto-analytical models (classification rules) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoAnalyticalModel {
    pub id: Uuid,

    #[schema(example = "Wood purchases")]
    pub name: String,

    pub analytical_account_id: Uuid,

    pub match_product_id: Option<Uuid>,

    #[schema(example = "Wood")]
    pub match_category: Option<String>,

    #[schema(example = 5)]
    pub priority: i32,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: Uuid,
    pub name: String,
}

// A rule joined with the records it points at. Either side may be missing
// when the referenced row no longer resolves.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleView {
    #[serde(flatten)]
    pub rule: AutoAnalyticalModel,
    pub account: Option<AccountRef>,
    pub product: Option<ProductRef>,
}

// What a transaction looks like to the rule engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationInput {
    pub product_id: Option<Uuid>,

    #[schema(example = "Wood")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluation {
    pub rule_id: Uuid,
    pub name: String,
    pub priority: i32,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationOutcome {
    // None when no rule matched; the caller must supply an account itself
    pub analytical_account_id: Option<Uuid>,
    pub matched_rule_id: Option<Uuid>,
    pub examined: Vec<RuleEvaluation>,
}
