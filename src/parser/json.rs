//! JSON input: the top level must be a non-empty list of mappings.

use serde_json::Value;

use crate::error::{ImportError, Result};
use crate::parser::{into_records, Record};

/// Deserialize JSON text into a batch of records.
pub fn parse(text: &str) -> Result<Vec<Record>> {
    let data: Value = serde_json::from_str(text)
        .map_err(|err| ImportError::format(format!("invalid JSON: {err}")))?;
    into_records(data, "JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_list_of_records() {
        let records = parse(r#"[{"foo": "bar"}, {"foo": "baz"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["foo"], "bar");
    }

    #[test]
    fn rejects_a_top_level_mapping() {
        let err = parse(r#"{"foo": "bar"}"#).unwrap_err();
        assert!(matches!(err, ImportError::Format { .. }));
    }

    #[test]
    fn rejects_an_empty_list() {
        let err = parse("[]").unwrap_err();
        assert!(matches!(err, ImportError::EmptyInput));
    }

    #[test]
    fn rejects_scalar_list_entries() {
        let err = parse(r#"[1, 2, 3]"#).unwrap_err();
        assert!(matches!(err, ImportError::Format { .. }));
    }

    #[test]
    fn rejects_malformed_text() {
        let err = parse("not json at all").unwrap_err();
        assert!(matches!(err, ImportError::Format { .. }));
    }
}
