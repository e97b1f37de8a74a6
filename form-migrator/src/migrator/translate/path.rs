//! Dotted attribute path resolution over source JSON records
//!
//! WPForms stores forms and submissions as loosely typed JSON blobs. Every
//! lookup into those blobs goes through the helpers here so that "missing",
//! "null" and "falsy" are decided in exactly one place.

use serde_json::Value;

/// Resolve a dotted path like "settings.submit_text" from a record
///
/// Numeric segments index into arrays as well as objects, so
/// "settings.confirmations.1.name" works for both storage shapes.
/// A `null` at the end of the path counts as missing.
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = record;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let idx: usize = segment.parse().ok()?;
                items.get(idx)?
            }
            _ => return None,
        };
    }

    if current.is_null() { None } else { Some(current) }
}

/// Boolean flag semantics used by the source plugin for checkbox settings
///
/// Accepts `true`, `1`, and the strings "1", "true", "on", "yes" (case-insensitive).
/// Everything else, including a missing value, is false.
pub fn is_true(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Whether a value counts as "filled" (not null, false, 0, "", "0" or empty)
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a scalar as a string; arrays and objects have no scalar form
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        _ => None,
    }
}

/// Parse a number stored either as a JSON number or a numeric string
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Iterate the members of a list stored as either an array or an object
///
/// The source plugin stores choice lists and field lists as objects keyed by id;
/// exports produced by other tools sometimes flatten them into arrays.
pub fn members(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    }
}
