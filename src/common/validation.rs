// src/common/validation.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

// ---
// Custom validators shared by the request payloads
// ---

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field cannot be empty.".into());
        return Err(err);
    }
    Ok(())
}

// Amounts are stored as NUMERIC(14, 2)
pub const MONEY_SCALE: u32 = 2;
const MONEY_LIMIT: i64 = 1_000_000_000_000;

/// A storable money amount: not negative, at most two decimals and below 10^12.
pub fn validate_amount(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("The value cannot be negative.".into());
        return Err(err);
    }
    if val.normalize().scale() > MONEY_SCALE {
        let mut err = ValidationError::new("scale");
        err.add_param("max_decimals".into(), &MONEY_SCALE);
        err.message = Some("The value can have at most two decimals.".into());
        return Err(err);
    }
    if val.abs() >= Decimal::from(MONEY_LIMIT) {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &MONEY_LIMIT);
        err.message = Some("The value must be below 1000000000000.".into());
        return Err(err);
    }
    Ok(())
}

/// Trims an optional free-text field; blank input counts as absent.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Same as `normalize_optional` for a field that can also be cleared:
/// absent keeps the stored value, null or blank clears it.
pub fn normalize_clearable(value: Option<Option<&str>>) -> Option<Option<String>> {
    value.map(normalize_optional)
}

/// Deserializes a present field into `Some`, so that with `#[serde(default)]`
/// an absent field stays `None` and an explicit null becomes `Some(None)`.
pub fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
