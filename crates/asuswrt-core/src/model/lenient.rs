// Tolerant field decoding
//
// The firmware is inconsistent about types: counters arrive as numbers or
// as numeric strings, text fields occasionally as numbers. These helpers
// accept either and fall back to a default instead of failing the record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text or number → `Some(String)`; null/absent → `None`.
pub(crate) fn opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text))
}

/// Text or number → `String`; anything else → empty.
pub(crate) fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

/// Number or numeric text → `i64`; anything else → 0.
pub(crate) fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, int_from_value))
}

pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn int_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_default(),
        Value::String(s) => int_from_str(s),
        _ => 0,
    }
}

pub(crate) fn int_from_str(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or_default()
}
