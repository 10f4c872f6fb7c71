//! Heuristic for recognizing widget-authored values.
//!
//! Widgets post structured JSON into hidden inputs; plain inputs post
//! scalars. A value that parses as a JSON object or array is treated as
//! widget data. This is a heuristic, not a guarantee: a user can type JSON
//! into a text box. Keep every caller on this one predicate.

use serde_json::Value;

/// Parses `value` when it is a JSON object or array.
pub fn structured_json(value: &str) -> Option<Value> {
    let trimmed = value.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    match serde_json::from_str::<Value>(value) {
        Ok(parsed @ (Value::Object(_) | Value::Array(_))) => Some(parsed),
        _ => None,
    }
}

pub fn is_structured_json(value: &str) -> bool {
    structured_json(value).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_objects_and_arrays() {
        assert!(is_structured_json(r#"{"a":1}"#));
        assert!(is_structured_json(" [1, 2]"));
        assert!(is_structured_json("{}"));
    }

    #[test]
    fn rejects_scalars_and_broken_json() {
        assert!(!is_structured_json("42"));
        assert!(!is_structured_json(r#""quoted""#));
        assert!(!is_structured_json("true"));
        assert!(!is_structured_json("{not json"));
        assert!(!is_structured_json("plain text"));
    }
}
