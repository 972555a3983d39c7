// src/models/invoice.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Quantity, rate and tax rate arrive exactly as the user typed them: either a
// JSON number or a string (possibly empty). The raw value is kept for display.
// `Text` is tried first so that "5" stays a string on the way back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumericInput {
    Text(String),
    Number(Decimal),
}

impl From<Decimal> for NumericInput {
    fn from(value: Decimal) -> Self {
        NumericInput::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,

    #[serde(default)]
    #[schema(example = "Teak dining table")]
    pub description: String,

    pub quantity: NumericInput,
    pub rate: NumericInput,

    // quantity * rate; a missing amount counts as zero in the totals
    #[serde(default)]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

// The invoice draft. Owned by the caller and threaded through the
// transitions in `services::invoice_service`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    #[schema(example = "INV-1760659200000")]
    pub invoice_number: String,

    #[schema(value_type = String, format = Date, example = "2026-10-17")]
    pub date: NaiveDate,

    #[serde(default)]
    pub from_name: String,
    #[serde(default)]
    pub from_email: String,
    #[serde(default)]
    pub to_name: String,
    #[serde(default)]
    pub to_email: String,

    pub items: Vec<InvoiceItem>,

    #[schema(example = 10)]
    pub tax_rate: NumericInput,

    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub tax_amount: Decimal,
    #[serde(default)]
    pub total: Decimal,
}

// Partial update of the header fields, items or tax rate
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    pub invoice_number: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    pub from_name: Option<String>,
    pub from_email: Option<String>,
    pub to_name: Option<String>,
    pub to_email: Option<String>,
    pub items: Option<Vec<InvoiceItem>>,
    pub tax_rate: Option<NumericInput>,
}

// A single edited field on one line
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum ItemField {
    Description { value: String },
    Quantity { value: NumericInput },
    Rate { value: NumericInput },
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum InvoiceAction {
    Update { patch: InvoicePatch },
    AddItem,
    RemoveItem { index: usize },
    UpdateItem { index: usize, change: ItemField },
}
