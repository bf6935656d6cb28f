//! Shape validation of a record batch against its template.
//!
//! The first record is the authoritative shape; every other record's key set
//! is compared against it, recursing into nested mappings. Only key presence
//! is checked, never value types or contents. Nested mismatches are reported
//! against the whole record, not a sub-path.

use serde_json::Value;

use crate::error::{ImportError, Result};
use crate::parser::Record;

/// Missing/extra field reports for one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Template fields absent from some record.
    pub missing: Vec<String>,
    /// Record fields absent from the template.
    pub extras: Vec<String>,
}

impl ValidationReport {
    /// Whether every record matched the template's shape.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extras.is_empty()
    }
}

/// Compare every record after the first against the template's shape.
pub fn validate(records: &[Record]) -> Result<ValidationReport> {
    let template = records.first().ok_or(ImportError::EmptyInput)?;
    let mut report = ValidationReport::default();
    for (index, candidate) in records.iter().enumerate().skip(1) {
        let label = format!("record {index}");
        compare(template, candidate, &label, &mut report);
    }
    Ok(report)
}

fn compare(template: &Record, candidate: &Record, label: &str, report: &mut ValidationReport) {
    for key in candidate.keys() {
        if !template.contains_key(key) {
            report
                .extras
                .push(format!("{label} has an extra field: '{}'", key.trim()));
        }
    }
    for (key, template_value) in template {
        match candidate.get(key) {
            None => {
                report
                    .missing
                    .push(format!("{label} is missing the field: '{}'", key.trim()));
            }
            Some(candidate_value) => {
                if let Value::Object(template_nested) = template_value {
                    match candidate_value {
                        Value::Object(candidate_nested) => {
                            compare(template_nested, candidate_nested, label, report);
                        }
                        // The nested structure the template expects is not
                        // there; report the key as missing rather than
                        // recursing into nothing.
                        _ => {
                            report.missing.push(format!(
                                "{label} is missing the field: '{}'",
                                key.trim()
                            ));
                        }
                    }
                }
            }
        }
    }
}
