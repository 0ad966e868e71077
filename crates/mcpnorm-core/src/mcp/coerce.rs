//! Loosely-typed field extraction.
//!
//! Every helper walks `keys` in priority order and returns the first value it
//! can coerce into the target shape. Nothing here fails: a value of the wrong
//! shape is treated as absent and the next key is tried.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// First key whose value is a non-blank JSON string.
pub fn first_non_empty_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// Like [`first_non_empty_string`], but numbers are rendered as text.
///
/// Used for `host`/`port`, where `"port": 8080` is the common spelling.
pub fn coerce_scalar_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Coerce the first usable key into a list of strings.
///
/// Arrays are taken element by element (`null` dropped, non-strings rendered as
/// JSON text). A string is split on whitespace runs; a string without
/// whitespace becomes a single element.
pub fn coerce_string_array(obj: &Map<String, Value>, keys: &[&str]) -> Option<Vec<String>> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::Array(items)) => {
                return Some(items.iter().filter_map(value_to_text).collect());
            }
            Some(Value::String(s)) => {
                let parts: Vec<String> = s.split_whitespace().map(str::to_string).collect();
                if !parts.is_empty() {
                    return Some(parts);
                }
            }
            _ => {}
        }
    }
    None
}

/// Coerce the first object-valued key into a string map.
pub fn coerce_string_map(
    obj: &Map<String, Value>,
    keys: &[&str],
) -> Option<BTreeMap<String, String>> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::Object(map)) => Some(
            map.iter()
                .filter_map(|(k, v)| value_to_text(v).map(|text| (k.clone(), text)))
                .collect(),
        ),
        _ => None,
    })
}

/// Coerce the first numeric key into an integer.
///
/// Floats are truncated toward zero; strings must be all ASCII digits.
pub fn coerce_int(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    })
}

/// Returns `true` if any of `keys` is present, whatever its value.
pub fn has_any(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|key| obj.contains_key(*key))
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
