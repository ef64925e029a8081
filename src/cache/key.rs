use serde::Serialize;
use serde_json::Value;

/// Fingerprint a request's semantic inputs as `"{prefix}_{hash}"`.
///
/// The payload is rendered as canonical JSON (object keys sorted) and hashed
/// with a 32-bit polynomial rolling hash over its UTF-16 code units. Equal
/// payloads always give equal keys. Distinct payloads can collide in the
/// 32-bit space, so callers should include discriminating fields such as
/// record counts and last-modified dates.
pub fn stable_key<T: Serialize + ?Sized>(prefix: &str, payload: &T) -> String {
    let canonical = match serde_json::to_value(payload) {
        Ok(value) => canonicalize(value).to_string(),
        Err(e) => {
            tracing::warn!("Cache key payload for {} is not serializable: {}", prefix, e);
            Value::Null.to_string()
        }
    };

    format!("{}_{}", prefix, rolling_hash(&canonical))
}

/// Rebuild objects with keys in sorted order, whatever map backs `serde_json`
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// `hash = hash * 31 + unit`, wrapping at signed 32 bits
fn rolling_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_known_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(stable_key("p", "a"), "p_35715");
    }

    #[test]
    fn test_key_is_deterministic() {
        let payload = json!({"logCount": 3, "lastDate": "2024-01-01", "age": 30, "goal": "增肌"});
        let first = stable_key("report", &payload);
        let second = stable_key("report", &payload);

        assert_eq!(first, second);
        assert_eq!(first, "report_-72372587");
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let mut a = HashMap::new();
        a.insert("age", json!(30));
        a.insert("goal", json!("endurance"));

        let b = json!({"goal": "endurance", "age": 30});

        assert_eq!(stable_key("plan", &a), stable_key("plan", &b));
    }

    #[test]
    fn test_distinct_payloads_differ() {
        let base = json!({"logCount": 3, "lastDate": "2024-01-01"});
        let more_logs = json!({"logCount": 4, "lastDate": "2024-01-01"});
        let later = json!({"logCount": 3, "lastDate": "2024-01-02"});

        let keys = [
            stable_key("report", &base),
            stable_key("report", &more_logs),
            stable_key("report", &later),
        ];
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[0], keys[2]);
        assert_ne!(keys[1], keys[2]);
    }

    #[test]
    fn test_prefix_separates_request_kinds() {
        let payload = json!({"goal": "endurance"});
        assert_ne!(stable_key("plan", &payload), stable_key("advice", &payload));
        assert!(stable_key("plan", &payload).starts_with("plan_"));
    }

    #[test]
    fn test_wraps_long_input() {
        let long = "x".repeat(10_000);
        let key = stable_key("long", &long);
        assert!(key.starts_with("long_"));
        assert_eq!(key, stable_key("long", &long));
    }
}
