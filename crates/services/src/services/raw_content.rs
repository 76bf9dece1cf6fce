//! Read-only accessors over caller-supplied content fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

/// A field was present but could not be parsed as the expected type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unparseable;

/// The `data` object of a create/update request, exactly as received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawContent(Map<String, Value>);

impl RawContent {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// `None` when `value` is not a JSON object. `null` counts as an empty object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            Value::Null => Some(Self::default()),
            _ => None,
        }
    }

    /// Strings as-is, numbers and booleans in their JSON spelling.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Trimmed text, `None` when absent or blank.
    pub fn trimmed(&self, key: &str) -> Option<String> {
        self.text(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.trimmed(key).is_some()
    }

    /// Finite float; present but unparseable is an error.
    pub fn number(&self, key: &str) -> Result<Option<f64>, Unparseable> {
        match self.trimmed(key) {
            None => Ok(None),
            Some(raw) => parse_number(&raw).map(Some).ok_or(Unparseable),
        }
    }

    /// Whole number, accepting `12` and `"12"`.
    pub fn integer(&self, key: &str) -> Result<Option<i64>, Unparseable> {
        match self.trimmed(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| Unparseable),
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
    pub fn date(&self, key: &str) -> Result<Option<DateTime<Utc>>, Unparseable> {
        match self.trimmed(key) {
            None => Ok(None),
            Some(raw) => parse_date(&raw).map(Some).ok_or(Unparseable),
        }
    }

    /// Arrays pass through; strings are split on commas with blanks dropped.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            Some(Value::String(joined)) => joined
                .split(',')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawContent {
        RawContent::from_value(value).unwrap()
    }

    #[test]
    fn test_text_accepts_numbers() {
        let data = raw(json!({ "price": 19.99, "title": "  hi  ", "blank": "   " }));
        assert_eq!(data.text("price").as_deref(), Some("19.99"));
        assert_eq!(data.trimmed("title").as_deref(), Some("hi"));
        assert_eq!(data.trimmed("blank"), None);
        assert_eq!(data.trimmed("missing"), None);
    }

    #[test]
    fn test_number_rejects_garbage_and_non_finite() {
        let data = raw(json!({ "a": "19.99", "b": "abc", "c": "NaN", "d": "inf" }));
        assert_eq!(data.number("a"), Ok(Some(19.99)));
        assert_eq!(data.number("b"), Err(Unparseable));
        assert_eq!(data.number("c"), Err(Unparseable));
        assert_eq!(data.number("d"), Err(Unparseable));
        assert_eq!(data.number("missing"), Ok(None));
    }

    #[test]
    fn test_list_from_csv_drops_blanks() {
        let data = raw(json!({ "tags": "a, b ,, c", "sizes": ["S", "M"] }));
        assert_eq!(data.list("tags"), vec!["a", "b", "c"]);
        assert_eq!(data.list("sizes"), vec!["S", "M"]);
        assert!(data.list("colors").is_empty());
    }

    #[test]
    fn test_date_formats() {
        let data = raw(json!({ "a": "2026-12-31", "b": "2026-12-31T10:00:00+01:00", "c": "soon" }));
        assert_eq!(
            data.date("a").unwrap().unwrap().to_rfc3339(),
            "2026-12-31T00:00:00+00:00"
        );
        assert_eq!(
            data.date("b").unwrap().unwrap().to_rfc3339(),
            "2026-12-31T09:00:00+00:00"
        );
        assert!(data.date("c").is_err());
    }

    #[test]
    fn test_non_objects_are_rejected() {
        assert!(RawContent::from_value(json!([1, 2])).is_none());
        assert!(RawContent::from_value(json!("text")).is_none());
        assert_eq!(RawContent::from_value(Value::Null), Some(RawContent::default()));
    }
}
