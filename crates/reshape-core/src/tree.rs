//! Shared helpers over the JSON-like tree value
//!
//! All components operate on `serde_json::Value` (built with the
//! `preserve_order` feature, so mapping keys keep insertion order). This
//! module collects the measurements and coercions several of them share.

use serde_json::Value;

/// Maximum nesting depth of a tree.
///
/// Scalars are depth 0; an empty container still counts as one level.
pub fn depth(value: &Value) -> usize {
    depth_from(value, 0)
}

fn depth_from(value: &Value, current: usize) -> usize {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                current + 1
            } else {
                items
                    .iter()
                    .map(|item| depth_from(item, current + 1))
                    .max()
                    .unwrap_or(current + 1)
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                current + 1
            } else {
                map.values()
                    .map(|item| depth_from(item, current + 1))
                    .max()
                    .unwrap_or(current + 1)
            }
        }
        _ => current,
    }
}

/// Number of leaf values in a tree. A scalar counts as one leaf; containers
/// contribute the sum of their children (an empty container contributes 0).
pub fn leaf_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.iter().map(leaf_count).sum(),
        Value::Object(map) => map.values().map(leaf_count).sum(),
        _ => 1,
    }
}

/// UTF-8 byte length of a string, as reported in request/response sizes.
pub fn byte_size(s: &str) -> usize {
    s.len()
}

/// Best-effort scalar coercion used by the CSV and XML readers.
///
/// `"true"`/`"false"` become booleans and a cell that parses losslessly as a
/// single number becomes a number; everything else (including the empty
/// string) stays a string. Original types are not otherwise preserved across
/// a textual round-trip.
pub fn coerce_scalar(raw: &str) -> Value {
    let trimmed = raw.trim();

    if trimmed == "true" {
        return Value::Bool(true);
    }
    if trimmed == "false" {
        return Value::Bool(false);
    }

    if !trimmed.is_empty() {
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::from(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Value::from(f);
            }
        }
    }

    Value::String(raw.to_string())
}
