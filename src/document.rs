//! Records: the raw input documents of the engine.
//!
//! A record is a JSON object with a required `id` field (any scalar, coerced to
//! a string) and zero or more string-valued content fields. The whole record is
//! kept as the document's metadata, which is how ranking strategies such as
//! recency read extra attributes like `timestamp`.
//!
//! # Examples
//!
//! ```
//! use scout::document::{record_id, Record};
//! use serde_json::json;
//!
//! let record: Record = serde_json::from_value(json!({"id": 42, "text": "hello"})).unwrap();
//! assert_eq!(record_id(&record), Some("42".to_string()));
//! ```

pub mod loader;

use serde_json::{Map, Value};

pub use loader::{JsonLinesReader, load_records};

/// A record mapping field names to JSON values.
pub type Record = Map<String, Value>;

/// Name of the identifier field every indexable record must carry.
pub const ID_FIELD: &str = "id";

/// Extract the document id of a record.
///
/// Strings are used as-is, numbers and booleans are converted to their
/// textual form. A missing id, `null`, arrays and objects yield `None`.
pub fn record_id(record: &Record) -> Option<String> {
    match record.get(ID_FIELD)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_record_id_coercion() {
        assert_eq!(record_id(&record(json!({"id": "a1"}))), Some("a1".into()));
        assert_eq!(record_id(&record(json!({"id": 7}))), Some("7".into()));
        assert_eq!(record_id(&record(json!({"id": true}))), Some("true".into()));
    }

    #[test]
    fn test_record_id_missing_or_structured() {
        assert_eq!(record_id(&record(json!({"text": "x"}))), None);
        assert_eq!(record_id(&record(json!({"id": null}))), None);
        assert_eq!(record_id(&record(json!({"id": [1, 2]}))), None);
        assert_eq!(record_id(&record(json!({"id": {"k": 1}}))), None);
    }
}
