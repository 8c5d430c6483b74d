//! Normalization helpers shared by the provider clients.
//!
//! All upstream field extraction goes through [`display_string`] so that the
//! output record never varies in type, whatever the upstream JSON held.

use serde_json::Value;

/// Coerce an optional JSON value into display text.
///
/// Missing and `null` become an empty string, strings pass through
/// unchanged, numbers and booleans use their textual form, and composite
/// values are rendered as compact JSON.
pub fn display_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Like [`display_string`], but falls back to `default` when the value is
/// missing or `null`.
pub fn display_string_or(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        some => display_string(some),
    }
}

/// Look up a nested field by JSON pointer (`/a/b/0/c`).
pub fn field<'a>(value: &'a Value, pointer: &str) -> Option<&'a Value> {
    value.pointer(pointer)
}

/// Lower bound of an inclusive date range.
pub fn date_range_start(date: &str) -> String {
    format!("{}T00:00:00Z", date)
}

/// Upper bound of an inclusive date range.
pub fn date_range_end(date: &str) -> String {
    format!("{}T23:59:59Z", date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_string_coerces_every_type() {
        assert_eq!(display_string(None), "");
        assert_eq!(display_string(Some(&Value::Null)), "");
        assert_eq!(display_string(Some(&json!("Jazz Night"))), "Jazz Night");
        assert_eq!(display_string(Some(&json!(42))), "42");
        assert_eq!(display_string(Some(&json!(1.5))), "1.5");
        assert_eq!(display_string(Some(&json!(true))), "true");
        assert_eq!(display_string(Some(&json!(["a", 1]))), r#"["a",1]"#);
        assert_eq!(display_string(Some(&json!({"k": "v"}))), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_display_string_or_only_defaults_when_absent() {
        assert_eq!(display_string_or(None, "Unknown"), "Unknown");
        assert_eq!(display_string_or(Some(&Value::Null), "Unknown"), "Unknown");
        assert_eq!(display_string_or(Some(&json!("")), "Unknown"), "");
        assert_eq!(display_string_or(Some(&json!(7)), "Unknown"), "7");
    }

    #[test]
    fn test_field_pointer() {
        let event = json!({
            "dates": {"start": {"localDate": "2024-06-01"}},
            "venues": [{"name": "Hall"}]
        });
        assert_eq!(
            field(&event, "/dates/start/localDate"),
            Some(&json!("2024-06-01"))
        );
        assert_eq!(field(&event, "/venues/0/name"), Some(&json!("Hall")));
        assert_eq!(field(&event, "/venues/1/name"), None);
    }

    #[test]
    fn test_date_range_bounds() {
        assert_eq!(date_range_start("2024-06-01"), "2024-06-01T00:00:00Z");
        assert_eq!(date_range_end("2024-06-30"), "2024-06-30T23:59:59Z");
        // Malformed input passes through untouched
        assert_eq!(date_range_start("June 1"), "June 1T00:00:00Z");
    }
}
