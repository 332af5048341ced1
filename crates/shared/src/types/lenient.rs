//! Lenient coercion for inbound document JSON.
//!
//! Form state arrives with amounts as numbers, numeric strings, empty
//! strings, `null`, or not at all. An incomplete line is worth zero rather
//! than invalid, so every one of those shapes deserializes to a `Decimal`
//! and anything unparseable becomes `0`. Line numbers and debit flags get
//! the same treatment: unreadable values become `0` and `false`.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces an arbitrary JSON value to a `Decimal`, falling back to zero.
#[must_use]
pub fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_or_zero(&n.to_string()),
        Value::String(s) => parse_or_zero(s.trim()),
        Value::Bool(true) => Decimal::ONE,
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => Decimal::ZERO,
    }
}

/// Coerces a JSON value to a flag.
///
/// `true`, `"true"` and nonzero numbers are set; everything else is not.
#[must_use]
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => true,
        Value::Number(_) | Value::String(_) => !coerce_decimal(value).is_zero(),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Coerces a JSON value to a line number.
///
/// Fractions truncate; negative or out-of-range values become `0`.
#[must_use]
pub fn coerce_u32(value: &Value) -> u32 {
    coerce_decimal(value).trunc().to_u32().unwrap_or(0)
}

fn parse_or_zero(raw: &str) -> Decimal {
    if raw.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO)
}

/// `deserialize_with` adapter: any JSON shape becomes a `Decimal`.
///
/// Combine with `#[serde(default)]` so a missing field is also zero.
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(Decimal::ZERO, coerce_decimal))
}

/// `deserialize_with` adapter for fields where "absent" is meaningful.
///
/// `null` and missing map to `None`; every other shape is coerced.
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(coerce_decimal(&v)),
    })
}

/// `deserialize_with` adapter: any JSON shape becomes a `bool`.
pub fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(coerce_bool))
}

/// `deserialize_with` adapter: any JSON shape becomes a `u32`.
pub fn unsigned<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, coerce_u32))
}
