//! Schema generation.
//!
//! The first record of a batch is the template: its nested-mapping structure
//! is mirrored into a namespace/tag hierarchy under a root path, and every
//! leaf position becomes one schema entry mapping the fully-qualified tag
//! path to an optional content-type hint. The hint distinguishes values that
//! must be serialized as JSON (lists holding non-string elements) from plain
//! values whose native type speaks for itself.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::info;

use crate::error::{ImportError, Result};
use crate::parser::Record;
use crate::paths::{ensure_namespace, ensure_namespace_path, ensure_tag, join_path};
use crate::store::{Namespace, TagStore};

/// Content type applied to list values holding non-string elements.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The derived layout: one entry per leaf position in the template record.
/// The key set is exactly the set of tag paths the pusher may write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    entries: BTreeMap<String, Option<String>>,
}

impl Schema {
    /// Whether `tag_path` is a known leaf.
    pub fn contains(&self, tag_path: &str) -> bool {
        self.entries.contains_key(tag_path)
    }

    /// The content-type hint recorded for `tag_path`, if any.
    pub fn hint(&self, tag_path: &str) -> Option<&str> {
        self.entries.get(tag_path).and_then(|hint| hint.as_deref())
    }

    /// All known tag paths, in path order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Create the namespace/tag hierarchy for a batch under `root_path` and
/// return the derived schema. Uses `records[0]` as the template; an empty
/// batch is refused up front. Safe to rerun against an already-populated
/// path: existing namespaces and tags are resolved, not duplicated.
pub fn build_schema<S: TagStore>(
    store: &mut S,
    records: &[Record],
    root_path: &str,
    dataset: &str,
    desc: &str,
) -> Result<Schema> {
    let template = records.first().ok_or(ImportError::EmptyInput)?;
    let root = ensure_namespace_path(store, root_path, dataset, desc)?;
    let mut entries = BTreeMap::new();
    generate(store, &root, None, template, dataset, desc, &mut entries)?;
    info!(count = entries.len(), root = root_path, "derived schema");
    Ok(Schema { entries })
}

/// Depth-first pre-order traversal of the template. A nested mapping becomes
/// a child namespace and recurses; any other value becomes a tag.
fn generate<S: TagStore>(
    store: &mut S,
    namespace: &Namespace,
    child_name: Option<&str>,
    template: &Record,
    dataset: &str,
    desc: &str,
    entries: &mut BTreeMap<String, Option<String>>,
) -> Result<()> {
    let namespace = match child_name {
        Some(name) => {
            let path = join_path([namespace.path.as_str(), name]);
            ensure_namespace(store, &path, dataset, desc)?
        }
        None => namespace.clone(),
    };
    for (key, value) in template {
        let key = key.trim();
        match value {
            Value::Object(nested) => {
                generate(store, &namespace, Some(key), nested, dataset, desc, entries)?;
            }
            leaf => {
                let tag = ensure_tag(store, &namespace, key, dataset, desc, false)?;
                entries.insert(tag.path, content_hint(leaf));
            }
        }
    }
    Ok(())
}

/// Lists holding anything other than strings must round-trip through JSON;
/// every other value is written as-is.
fn content_hint(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) if !items.iter().all(Value::is_string) => {
            Some(JSON_CONTENT_TYPE.to_string())
        }
        _ => None,
    }
}

/// The tag paths that schema generation would create, computed without
/// touching the store. Backs the `--preview` report.
pub fn preview(records: &[Record], root_path: &str) -> Result<Vec<String>> {
    let template = records.first().ok_or(ImportError::EmptyInput)?;
    let mut paths = Vec::new();
    traverse_preview(template, root_path, &mut paths);
    Ok(paths)
}

fn traverse_preview(template: &Record, parent: &str, paths: &mut Vec<String>) {
    for (key, value) in template {
        let key = key.trim();
        match value {
            Value::Object(nested) => {
                traverse_preview(nested, &join_path([parent, key]), paths);
            }
            _ => paths.push(join_path([parent, key])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn template_batch() -> Vec<Record> {
        let record = json!({
            "foo": "bar",
            "baz": {"qux": "1"},
            "quux": ["ham", "eggs"],
            "corge": [{"a": 1, "b": 2}]
        });
        match record {
            Value::Object(map) => vec![map],
            _ => unreachable!(),
        }
    }

    #[test]
    fn derives_one_entry_per_leaf() {
        let mut store = MemoryStore::new();
        let schema =
            build_schema(&mut store, &template_batch(), "test/x", "shape-test", "desc").unwrap();
        assert_eq!(schema.len(), 4);
        assert!(schema.contains("test/x/foo"));
        assert!(schema.contains("test/x/baz/qux"));
        assert!(schema.contains("test/x/quux"));
        assert!(schema.contains("test/x/corge"));
        // Mixed list needs the JSON hint, all-string list does not.
        assert_eq!(schema.hint("test/x/corge"), Some(JSON_CONTENT_TYPE));
        assert_eq!(schema.hint("test/x/quux"), None);
        assert_eq!(schema.hint("test/x/foo"), None);
        // Nested mapping became a child namespace.
        assert!(store.has_namespace("test/x/baz"));
        assert!(store.has_tag("test/x/baz/qux"));
    }

    #[test]
    fn flat_records_get_one_entry_per_key() {
        let records: Vec<Record> = [
            json!({"a": 1, "b": "x"}),
            json!({"a": 2, "b": "y"}),
        ]
        .into_iter()
        .map(|v| match v {
            Value::Object(map) => map,
            _ => unreachable!(),
        })
        .collect();
        let mut store = MemoryStore::new();
        let schema = build_schema(&mut store, &records, "test/flat", "t", "d").unwrap();
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn rerunning_is_idempotent() {
        let mut store = MemoryStore::new();
        let first =
            build_schema(&mut store, &template_batch(), "test/x", "shape-test", "desc").unwrap();
        let second =
            build_schema(&mut store, &template_batch(), "test/x", "shape-test", "desc").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_batch_is_refused() {
        let mut store = MemoryStore::new();
        let err = build_schema(&mut store, &[], "test/x", "t", "d").unwrap_err();
        assert!(matches!(err, ImportError::EmptyInput));
    }

    #[test]
    fn preview_lists_the_same_paths_without_the_store() {
        let paths = preview(&template_batch(), "test/x").unwrap();
        assert_eq!(paths.len(), 4);
        for expected in [
            "test/x/foo",
            "test/x/baz/qux",
            "test/x/quux",
            "test/x/corge",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }

    #[test]
    fn keys_are_trimmed() {
        let record = json!({" padded ": 1});
        let records = match record {
            Value::Object(map) => vec![map],
            _ => unreachable!(),
        };
        let mut store = MemoryStore::new();
        let schema = build_schema(&mut store, &records, "test/x", "t", "d").unwrap();
        assert!(schema.contains("test/x/padded"));
    }
}
