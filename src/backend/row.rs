//! Row Representation
//!
//! Rows travel the client boundary as loosely-typed JSON objects, exactly
//! as the REST layer returns them. Services decode them into entities at
//! the edge so transports stay schema-agnostic.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::BackendError;

/// A single row as returned by the backend
pub type Row = serde_json::Map<String, Value>;

/// Decode one row into a typed entity
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, BackendError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Decode a batch of rows into typed entities
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, BackendError> {
    rows.into_iter().map(decode_row).collect()
}

/// Serialize a draft/patch value into a row for insert or update
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, BackendError> {
    match serde_json::to_value(value).map_err(|e| BackendError::Decode(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(BackendError::Decode(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Read a row field as a string, when present and textual
pub fn field_str<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.get(column).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Widget {
        name: String,
        count: u32,
    }

    #[test]
    fn test_decode_row_roundtrip() {
        let widget = Widget {
            name: "alpha".to_string(),
            count: 3,
        };
        let row = to_row(&widget).unwrap();
        assert_eq!(field_str(&row, "name"), Some("alpha"));

        let back: Widget = decode_row(row).unwrap();
        assert_eq!(back, widget);
    }

    #[test]
    fn test_decode_row_shape_mismatch() {
        let mut row = Row::new();
        row.insert("name".to_string(), json!(42));
        let result: Result<Widget, _> = decode_row(row);
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn test_to_row_rejects_non_objects() {
        let result = to_row(&"just a string");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }
}
