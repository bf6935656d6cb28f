//! In-memory [`TagStore`] implementation.
//!
//! Mirrors the contracts the importer relies on from a real deployment:
//! duplicate creation raises [`StoreError::AlreadyExists`], about values
//! deduplicate to a single object, anonymous objects get a fresh uuid on
//! every call. Backs the test suite and the CLI's bundled backend.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use uuid::Uuid;

use super::{EntityKind, Namespace, StoreError, StoreObject, Tag, TagStore, TagValue};

#[derive(Debug, Clone)]
struct StoredValue {
    value: TagValue,
    content_type: Option<String>,
}

/// A whole store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespaces: BTreeMap<String, String>,
    tags: BTreeMap<String, String>,
    objects: HashMap<String, StoreObject>,
    about_index: HashMap<String, String>,
    // object id -> tag path -> value
    values: HashMap<String, BTreeMap<String, StoredValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the namespace at `path` exists.
    pub fn has_namespace(&self, path: &str) -> bool {
        self.namespaces.contains_key(path)
    }

    /// Whether the tag at `path` exists.
    pub fn has_tag(&self, path: &str) -> bool {
        self.tags.contains_key(path)
    }

    /// Number of objects ever created.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The value stored on `object_id` under `tag_path`, if any.
    pub fn tag_value(&self, object_id: &str, tag_path: &str) -> Option<&TagValue> {
        self.values
            .get(object_id)
            .and_then(|vals| vals.get(tag_path))
            .map(|stored| &stored.value)
    }

    /// The declared content type of the value on `object_id` at `tag_path`.
    pub fn content_type(&self, object_id: &str, tag_path: &str) -> Option<&str> {
        self.values
            .get(object_id)
            .and_then(|vals| vals.get(tag_path))
            .and_then(|stored| stored.content_type.as_deref())
    }
}

impl TagStore for MemoryStore {
    fn create_namespace(&mut self, path: &str, description: &str) -> Result<Namespace, StoreError> {
        if self.namespaces.contains_key(path) {
            return Err(StoreError::AlreadyExists {
                kind: EntityKind::Namespace,
                path: path.to_string(),
            });
        }
        debug!(path, "creating namespace");
        self.namespaces
            .insert(path.to_string(), description.to_string());
        Ok(Namespace {
            path: path.to_string(),
        })
    }

    fn create_tag(
        &mut self,
        namespace_path: &str,
        name: &str,
        description: &str,
        _indexed: bool,
    ) -> Result<Tag, StoreError> {
        let path = format!("{namespace_path}/{name}");
        if self.tags.contains_key(&path) {
            return Err(StoreError::AlreadyExists {
                kind: EntityKind::Tag,
                path,
            });
        }
        debug!(%path, "creating tag");
        self.tags.insert(path.clone(), description.to_string());
        Ok(Tag { path })
    }

    fn create_object(
        &mut self,
        id: Option<&str>,
        about: Option<&str>,
    ) -> Result<StoreObject, StoreError> {
        if let Some(id) = id {
            return self
                .objects
                .get(id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound {
                    kind: EntityKind::Object,
                    path: id.to_string(),
                });
        }
        if let Some(about) = about {
            if let Some(existing) = self.about_index.get(about) {
                return Ok(self.objects[existing].clone());
            }
            let object = StoreObject {
                id: Uuid::new_v4().to_string(),
                about: Some(about.to_string()),
            };
            self.about_index
                .insert(about.to_string(), object.id.clone());
            self.objects.insert(object.id.clone(), object.clone());
            return Ok(object);
        }
        let object = StoreObject {
            id: Uuid::new_v4().to_string(),
            about: None,
        };
        self.objects.insert(object.id.clone(), object.clone());
        Ok(object)
    }

    fn set_tag_value(
        &mut self,
        object: &StoreObject,
        tag_path: &str,
        value: TagValue,
        content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        if !self.objects.contains_key(&object.id) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Object,
                path: object.id.clone(),
            });
        }
        self.values.entry(object.id.clone()).or_default().insert(
            tag_path.to_string(),
            StoredValue {
                value,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    fn filter_objects(&self, query: &str) -> Result<Vec<StoreObject>, StoreError> {
        let tag_path = query
            .strip_prefix("has ")
            .ok_or_else(|| StoreError::Backend(format!("unsupported query: {query}")))?;
        let mut matches: Vec<StoreObject> = self
            .values
            .iter()
            .filter(|(_, vals)| vals.contains_key(tag_path))
            .map(|(id, _)| self.objects[id].clone())
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_namespace_conflicts() {
        let mut store = MemoryStore::new();
        store.create_namespace("test/data", "a namespace").unwrap();
        let err = store.create_namespace("test/data", "again").unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[test]
    fn about_value_deduplicates() {
        let mut store = MemoryStore::new();
        let first = store.create_object(None, Some("book:1984")).unwrap();
        let second = store.create_object(None, Some("book:1984")).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.object_count(), 1);
    }

    #[test]
    fn anonymous_objects_are_always_new() {
        let mut store = MemoryStore::new();
        let first = store.create_object(None, None).unwrap();
        let second = store.create_object(None, None).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn resolve_by_id_requires_existence() {
        let mut store = MemoryStore::new();
        let created = store.create_object(None, None).unwrap();
        let resolved = store.create_object(Some(&created.id), None).unwrap();
        assert_eq!(created, resolved);
        assert!(store.create_object(Some("no-such-id"), None).is_err());
    }

    #[test]
    fn filter_matches_has_queries() {
        let mut store = MemoryStore::new();
        store.create_namespace("test/books", "ns").unwrap();
        store.create_tag("test/books", "title", "tag", false).unwrap();
        let obj = store.create_object(None, None).unwrap();
        store
            .set_tag_value(&obj, "test/books/title", TagValue::Json(json!("1984")), None)
            .unwrap();
        let hits = store.filter_objects("has test/books/title").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, obj.id);
        assert!(store.filter_objects("has test/books/author").unwrap().is_empty());
    }
}
