//! Format parsers - turn raw JSON, YAML or CSV text into record batches.
//!
//! Every parser shares one contract: the result is a non-empty sequence of
//! [`Record`]s (mappings from field name to value), or an error. A top-level
//! value of the wrong shape is a format error; a well-formed input with zero
//! records is an empty-input error, reported distinctly.

pub mod csv;
pub mod json;
pub mod yaml;

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{ImportError, Result};

pub use csv::CsvOptions;

/// One parsed record: a mapping from field name to a scalar, list or nested
/// mapping value.
pub type Record = Map<String, Value>;

/// Parse a file, dispatching on its extension (`json`, `yaml`/`yml`, `csv`).
pub fn parse_file(path: &Path) -> Result<Vec<Record>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let parse: fn(&str) -> Result<Vec<Record>> = match extension.as_str() {
        "json" => json::parse,
        "yaml" | "yml" => yaml::parse,
        "csv" => |text| csv::parse(text, &CsvOptions::default()),
        other => return Err(ImportError::UnknownExtension(other.to_string())),
    };
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Check that a deserialized top-level value is a non-empty list of
/// mappings, and unwrap it into records.
pub(crate) fn into_records(data: Value, format: &str) -> Result<Vec<Record>> {
    let items = match data {
        Value::Array(items) => items,
        other => {
            return Err(ImportError::format(format!(
                "{format} input must supply a list of records, got {}",
                type_name(&other)
            )))
        }
    };
    if items.is_empty() {
        return Err(ImportError::EmptyInput);
    }
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            other => Err(ImportError::format(format!(
                "{format} list entries must be mappings, got {}",
                type_name(&other)
            ))),
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
