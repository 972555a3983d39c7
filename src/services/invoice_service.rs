// src/services/invoice_service.rs

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::{
        error::AppError,
        validation::{validate_amount, MONEY_SCALE},
    },
    models::invoice::{
        InvoiceAction, InvoiceData, InvoiceItem, InvoicePatch, InvoiceTotals, ItemField,
        NumericInput,
    },
};

// Defaults of a fresh draft
const DEFAULT_TAX_RATE: i64 = 10;

// =============================================================================
//  ARITHMETIC
// =============================================================================

/// Reads a user-typed number. Empty text is zero; anything non-numeric is
/// rejected on `field`.
pub fn parse_numeric(field: &str, value: &NumericInput) -> Result<Decimal, AppError> {
    match value {
        NumericInput::Number(n) => Ok(*n),
        NumericInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(Decimal::ZERO);
            }
            Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .map_err(|_| AppError::invalid(field, format!("'{}' is not a number.", text)))
        }
    }
}

pub fn line_amount(item: &InvoiceItem) -> Result<Decimal, AppError> {
    let quantity = parse_numeric("quantity", &item.quantity)?;
    let rate = parse_numeric("rate", &item.rate)?;
    quantity
        .checked_mul(rate)
        .ok_or_else(|| AppError::invalid("amount", "The line amount is too large."))
}

pub fn calculate_totals(
    items: &[InvoiceItem],
    tax_rate: &NumericInput,
) -> Result<InvoiceTotals, AppError> {
    let overflow = || AppError::invalid("total", "The invoice total is too large.");

    let subtotal = items
        .iter()
        .map(|item| item.amount.unwrap_or(Decimal::ZERO))
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(overflow)?;

    let rate = parse_numeric("taxRate", tax_rate)?;
    let tax_amount = subtotal
        .checked_mul(rate)
        .map(|v| v / Decimal::ONE_HUNDRED)
        .ok_or_else(overflow)?;
    let total = subtotal.checked_add(tax_amount).ok_or_else(overflow)?;

    Ok(InvoiceTotals {
        subtotal,
        tax_amount,
        total,
    })
}

fn with_totals(mut invoice: InvoiceData) -> Result<InvoiceData, AppError> {
    let totals = calculate_totals(&invoice.items, &invoice.tax_rate)?;
    invoice.subtotal = totals.subtotal;
    invoice.tax_amount = totals.tax_amount;
    invoice.total = totals.total;
    Ok(invoice)
}

// =============================================================================
//  DRAFT TRANSITIONS
//  Each one consumes the current draft and returns the next.
// =============================================================================

fn blank_item(id: String) -> InvoiceItem {
    InvoiceItem {
        id,
        description: String::new(),
        quantity: NumericInput::Number(Decimal::ONE),
        rate: NumericInput::Number(Decimal::ZERO),
        amount: Some(Decimal::ZERO),
    }
}

pub fn new_invoice(today: NaiveDate, now_millis: i64) -> InvoiceData {
    InvoiceData {
        invoice_number: format!("INV-{}", now_millis),
        date: today,
        from_name: String::new(),
        from_email: String::new(),
        to_name: String::new(),
        to_email: String::new(),
        items: vec![blank_item("1".to_string())],
        tax_rate: NumericInput::Number(Decimal::from(DEFAULT_TAX_RATE)),
        subtotal: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total: Decimal::ZERO,
    }
}

/// Header edits are applied as-is; totals are recomputed only when the items
/// or the tax rate change.
pub fn update_invoice(mut invoice: InvoiceData, patch: InvoicePatch) -> Result<InvoiceData, AppError> {
    let affects_totals = patch.items.is_some() || patch.tax_rate.is_some();

    if let Some(v) = patch.invoice_number {
        invoice.invoice_number = v;
    }
    if let Some(v) = patch.date {
        invoice.date = v;
    }
    if let Some(v) = patch.from_name {
        invoice.from_name = v;
    }
    if let Some(v) = patch.from_email {
        invoice.from_email = v;
    }
    if let Some(v) = patch.to_name {
        invoice.to_name = v;
    }
    if let Some(v) = patch.to_email {
        invoice.to_email = v;
    }
    if let Some(items) = patch.items {
        invoice.items = items;
    }
    if let Some(rate) = patch.tax_rate {
        invoice.tax_rate = rate;
    }

    if affects_totals {
        with_totals(invoice)
    } else {
        Ok(invoice)
    }
}

pub fn add_item(mut invoice: InvoiceData, id: String) -> InvoiceData {
    invoice.items.push(blank_item(id));
    invoice
}

/// The last remaining line cannot be removed; an out-of-range index is
/// ignored.
pub fn remove_item(mut invoice: InvoiceData, index: usize) -> Result<InvoiceData, AppError> {
    if invoice.items.len() <= 1 || index >= invoice.items.len() {
        return Ok(invoice);
    }
    invoice.items.remove(index);
    with_totals(invoice)
}

pub fn update_item(
    mut invoice: InvoiceData,
    index: usize,
    change: ItemField,
) -> Result<InvoiceData, AppError> {
    let line_count = invoice.items.len();
    let item = invoice.items.get_mut(index).ok_or_else(|| {
        AppError::invalid(
            "index",
            format!("Line {} does not exist (the invoice has {}).", index, line_count),
        )
    })?;

    match change {
        ItemField::Description { value } => {
            item.description = value;
            return Ok(invoice);
        }
        ItemField::Quantity { value } => item.quantity = value,
        ItemField::Rate { value } => item.rate = value,
    }

    item.amount = Some(line_amount(item)?);
    with_totals(invoice)
}

pub fn apply_action(
    invoice: InvoiceData,
    action: InvoiceAction,
    new_item_id: String,
) -> Result<InvoiceData, AppError> {
    match action {
        InvoiceAction::Update { patch } => update_invoice(invoice, patch),
        InvoiceAction::AddItem => Ok(add_item(invoice, new_item_id)),
        InvoiceAction::RemoveItem { index } => remove_item(invoice, index),
        InvoiceAction::UpdateItem { index, change } => update_item(invoice, index, change),
    }
}

/// Recomputes every line amount and the totals, ignoring whatever amounts the
/// client sent. Used before an invoice is turned into a journal entry.
pub fn normalize(mut invoice: InvoiceData) -> Result<InvoiceData, AppError> {
    for item in invoice.items.iter_mut() {
        item.amount = Some(line_amount(item)?);
    }
    with_totals(invoice)
}

/// Checks that an invoice can be recorded in the journal, then recomputes it.
pub fn prepare_for_journal(invoice: InvoiceData) -> Result<InvoiceData, AppError> {
    if invoice.invoice_number.trim().is_empty() {
        return Err(AppError::invalid("invoiceNumber", "The invoice number cannot be empty."));
    }
    if invoice.items.is_empty() {
        return Err(AppError::invalid("items", "The invoice has no lines."));
    }
    normalize(invoice)
}

/// The invoice total as it will be stored: cents, half away from zero.
pub fn journal_amount(invoice: &InvoiceData) -> Result<Decimal, AppError> {
    let amount = invoice
        .total
        .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);

    validate_amount(&amount).map_err(|err| {
        let message = err
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| "The invoice total cannot be recorded.".to_string());
        AppError::invalid("total", message)
    })?;
    Ok(amount)
}
