//! CSV input.
//!
//! The first non-blank line must be a header row; the delimiter is sniffed
//! from it. Header names and row items pass through overridable cleaner
//! functions before becoming record keys and values.
//!
//! Row-mismatch policy: rows are paired with headers positionally and
//! truncated to the shorter side, so a short row simply produces a record
//! with fewer fields and surplus trailing items are dropped.

use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use crate::error::{ImportError, Result};
use crate::parser::Record;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Overridable cleaning hooks for headers and row items.
#[derive(Clone, Copy)]
pub struct CsvOptions {
    /// Normalizes one raw header field into a record key.
    pub header_cleaner: fn(&str) -> String,
    /// Normalizes/casts one raw row item into a record value.
    pub item_cleaner: fn(&str) -> Value,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            header_cleaner: clean_header,
            item_cleaner: clean_row_item,
        }
    }
}

/// Default header cleaner: trim, lowercase, internal whitespace to `_`.
pub fn clean_header(header: &str) -> String {
    WHITESPACE
        .replace_all(header.trim(), "_")
        .to_lowercase()
}

/// Default item cleaner. Casts in order: integer, float, boolean literal
/// (case-insensitive), empty-after-trim to null; anything else stays the
/// original string.
pub fn clean_row_item(item: &str) -> Value {
    let stripped = item.trim();
    if stripped.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = stripped.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = stripped.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    if stripped.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if stripped.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(item.to_string())
}

/// Parse CSV text into a batch of records.
pub fn parse(text: &str, options: &CsvOptions) -> Result<Vec<Record>> {
    let first_line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(ImportError::EmptyInput)?;
    let delimiter = sniff_delimiter(first_line);
    if !looks_like_header(first_line, delimiter) {
        return Err(ImportError::format(
            "the CSV input doesn't appear to contain a header row",
        ));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    // Columns with a blank header keep their position but never become
    // record fields.
    let headers: Vec<Option<String>> = reader
        .headers()
        .map_err(|err| ImportError::format(format!("CSV parse error: {err}")))?
        .iter()
        .map(|raw| {
            if raw.trim().is_empty() {
                None
            } else {
                Some((options.header_cleaner)(raw))
            }
        })
        .collect();

    let mut data = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|err| ImportError::format(format!("CSV parse error: {err}")))?;
        let mut record = Record::new();
        for (header, item) in headers.iter().zip(row.iter()) {
            if let Some(name) = header {
                record.insert(name.clone(), (options.item_cleaner)(item));
            }
        }
        data.push(record);
    }

    if data.is_empty() {
        return Err(ImportError::EmptyInput);
    }
    Ok(data)
}

/// Pick the candidate delimiter occurring most often in the header line,
/// defaulting to a comma.
fn sniff_delimiter(line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for &candidate in &DELIMITER_CANDIDATES {
        let count = line.bytes().filter(|&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// A line looks like a header when it has at least one non-empty field and
/// none of its fields parse as numbers.
fn looks_like_header(line: &str, delimiter: u8) -> bool {
    let mut any_field = false;
    for field in line.split(delimiter as char) {
        let field = field.trim().trim_matches('"');
        if field.is_empty() {
            continue;
        }
        any_field = true;
        if field.parse::<f64>().is_ok() {
            return false;
        }
    }
    any_field
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_and_casts_row_items() {
        let text = "Name,Age,Score,Member,Note\nalice,30,9.5,TRUE,\n";
        let records = parse(text, &CsvOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["name"], json!("alice"));
        assert_eq!(record["age"], json!(30));
        assert_eq!(record["score"], json!(9.5));
        assert_eq!(record["member"], json!(true));
        assert_eq!(record["note"], Value::Null);
    }

    #[test]
    fn normalizes_headers() {
        assert_eq!(clean_header("  First Name "), "first_name");
        assert_eq!(clean_header("AGE"), "age");
    }

    #[test]
    fn sniffs_semicolon_delimiters() {
        let text = "name;age\nbob;41\n";
        let records = parse(text, &CsvOptions::default()).unwrap();
        assert_eq!(records[0]["age"], json!(41));
    }

    #[test]
    fn header_only_input_is_empty() {
        let err = parse("name,age\n", &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::EmptyInput));
    }

    #[test]
    fn numeric_first_line_means_no_header() {
        let err = parse("1,2,3\n4,5,6\n", &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::Format { .. }));
    }

    #[test]
    fn short_rows_produce_short_records() {
        let text = "a,b,c\n1,2\n";
        let records = parse(text, &CsvOptions::default()).unwrap();
        assert_eq!(records[0].len(), 2);
        assert!(!records[0].contains_key("c"));
    }

    #[test]
    fn surplus_row_items_are_dropped() {
        let text = "a,b\n1,2,3\n";
        let records = parse(text, &CsvOptions::default()).unwrap();
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn custom_cleaners_are_honored() {
        let options = CsvOptions {
            header_cleaner: |h| format!("col_{}", h.trim()),
            item_cleaner: |i| Value::String(i.to_uppercase()),
        };
        let records = parse("name\nalice\n", &options).unwrap();
        assert_eq!(records[0]["col_name"], json!("ALICE"));
    }
}
