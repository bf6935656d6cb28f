//! File import: parse a record batch, derive its schema, push every record.
//!
//! Each record becomes one store object. Nested mappings flatten into
//! fully-qualified tag paths; only paths the derived schema knows are
//! written, anything else is logged and skipped.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ImportError, Result};
use crate::parser::{self, Record};
use crate::paths::join_path;
use crate::schema::{self, Schema};
use crate::store::{TagStore, TagValue};
use crate::validate::{self, ValidationReport};

/// Everything a file import needs besides the store.
#[derive(Debug, Clone)]
pub struct FileRequest<'a> {
    /// The input file; its extension picks the parser.
    pub path: &'a Path,
    /// Slash-delimited path under which namespaces/tags are created. The
    /// first segment must already exist remotely.
    pub root_path: &'a str,
    /// Dataset name, used in generated descriptions and about values.
    pub dataset: &'a str,
    /// Free-text dataset description.
    pub desc: &'a str,
    /// Record field whose value keys the target object's about value. When
    /// absent every record gets a fresh anonymous object.
    pub about_field: Option<&'a str>,
    /// When false, null leaf values are not written (empty strings and
    /// `false` still are).
    pub allow_empty: bool,
}

/// Flatten a record's nested mappings into `{tag_path: leaf_value}` pairs
/// under `parent`.
pub fn flatten(record: &Record, parent: &str) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    flatten_into(record, parent, &mut out);
    out
}

fn flatten_into(record: &Record, parent: &str, out: &mut BTreeMap<String, Value>) {
    for (key, value) in record {
        let path = join_path([parent, key.trim()]);
        match value {
            Value::Object(nested) => flatten_into(nested, &path, out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

/// Push every record in the batch, returning how many were processed.
///
/// A missing about field aborts the batch; by then earlier records have
/// already been written and stay written (no rollback).
pub fn push_records<S: TagStore>(
    store: &mut S,
    records: &[Record],
    root_path: &str,
    schema: &Schema,
    about_field: Option<&str>,
    dataset: &str,
    allow_empty: bool,
) -> Result<usize> {
    let total = records.len();
    for (index, record) in records.iter().enumerate() {
        info!(record = index + 1, total, "processing record");
        let object = match about_field.filter(|field| !field.is_empty()) {
            Some(field) => {
                let value = record
                    .get(field)
                    .ok_or_else(|| ImportError::MissingAboutField {
                        field: field.to_string(),
                        index,
                    })?;
                let about_value = format!("{dataset}:{}", about_string(value));
                info!(about = %about_value, "resolving object by about value");
                store.create_object(None, Some(&about_value))?
            }
            None => {
                info!("creating a new anonymous object");
                store.create_object(None, None)?
            }
        };
        for (tag_path, value) in flatten(record, root_path) {
            if !schema.contains(&tag_path) {
                warn!(%tag_path, "unknown attribute, skipping");
                continue;
            }
            if !allow_empty && value.is_null() {
                continue;
            }
            store.set_tag_value(&object, &tag_path, TagValue::Json(value), schema.hint(&tag_path))?;
        }
        info!(object = %object.id, "record annotated");
    }
    Ok(total)
}

fn about_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse the file, create the schema and push the batch. Returns the number
/// of records imported.
pub fn import_file<S: TagStore>(store: &mut S, request: &FileRequest<'_>) -> Result<usize> {
    let records = parser::parse_file(request.path)?;
    info!(count = records.len(), file = %request.path.display(), "records parsed");
    let schema = schema::build_schema(
        store,
        &records,
        request.root_path,
        request.dataset,
        request.desc,
    )?;
    push_records(
        store,
        &records,
        request.root_path,
        &schema,
        request.about_field,
        request.dataset,
        request.allow_empty,
    )
}

/// Parse the file and render the namespaces/tags an import would create,
/// without touching the store.
pub fn preview_file(path: &Path, root_path: &str) -> Result<String> {
    let records = parser::parse_file(path)?;
    let paths = schema::preview(&records, root_path)?;
    let mut output = vec![
        format!("Preview of processing {}", path.display()),
        String::new(),
        "The following namespaces/tags will be generated.".to_string(),
        String::new(),
    ];
    output.extend(paths);
    output.push(String::new());
    output.push(format!("{} records found", records.len()));
    Ok(output.join("\n"))
}

/// Parse the file and validate every record against the first one's shape.
pub fn check_file(path: &Path) -> Result<ValidationReport> {
    let records = parser::parse_file(path)?;
    validate::validate(&records)
}
