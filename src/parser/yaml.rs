//! YAML input: same contract as JSON, via a YAML deserializer.

use serde_json::Value;

use crate::error::{ImportError, Result};
use crate::parser::{into_records, Record};

/// Deserialize YAML text into a batch of records.
pub fn parse(text: &str) -> Result<Vec<Record>> {
    let data: Value = serde_yaml::from_str(text)
        .map_err(|err| ImportError::format(format!("invalid YAML: {err}")))?;
    into_records(data, "YAML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_list_of_records() {
        let text = "- foo: bar\n  n: 1\n- foo: baz\n  n: 2\n";
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["foo"], "baz");
        assert_eq!(records[0]["n"], json!(1));
    }

    #[test]
    fn rejects_a_top_level_mapping() {
        let err = parse("foo: bar\n").unwrap_err();
        assert!(matches!(err, ImportError::Format { .. }));
    }

    #[test]
    fn rejects_an_empty_list() {
        let err = parse("[]\n").unwrap_err();
        assert!(matches!(err, ImportError::EmptyInput));
    }
}
