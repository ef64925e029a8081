//! Forgiving decoders for numeric fields.
//!
//! Workout and profile records come from user input and from a loosely typed
//! backend. A numeric field may arrive as a number, as a numeric string, or as
//! garbage. Garbage, negatives and non-finite values all become zero instead of
//! failing the whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Clamp a raw measurement to a finite, non-negative value.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn coerce(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(sanitize(raw))
}

/// Decode a non-negative float, defaulting to zero.
pub fn non_negative_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce).unwrap_or(0.0))
}

/// Decode a non-negative integer, rounding fractional input.
pub fn non_negative_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = non_negative_f64(deserializer)?;
    Ok(value.round().min(u32::MAX as f64) as u32)
}

/// Decode an optional float. Absent, null and malformed values are `None`.
pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce))
}
