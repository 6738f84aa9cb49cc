//! Router boolean normalization.
//!
//! The firmware writes booleans as `"1"` / `"0"` (sometimes as bare
//! numbers). Only an integer value of exactly `1` is true; anything else,
//! including text that is not a number at all, reads as false. Booleans are
//! written back as `1` / `0`.
//!
//! Use as `#[serde(with = "crate::flag")]` on `bool` fields.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// `"1"` → true, anything else → false.
pub fn decode(raw: &str) -> bool {
    raw.trim().parse::<i64>().is_ok_and(|n| n == 1)
}

/// true → `"1"`, false → `"0"`.
pub fn encode(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

pub(crate) fn from_value(value: &Value) -> bool {
    match value {
        Value::String(s) => decode(s),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(from_value))
}
