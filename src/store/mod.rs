//! The remote tag store seam.
//!
//! Everything the importer needs from the backing store is expressed by the
//! [`TagStore`] trait: create-a-namespace, create-a-tag, resolve-or-create an
//! object, attach a tag-value, and a simple object query. The HTTP client for
//! a real deployment lives behind this trait; the crate ships with an
//! in-memory implementation ([`MemoryStore`]) that honors the same contracts
//! (about-value deduplication, conflict on duplicate creation) and backs the
//! test suite and the bundled CLI backend.

pub mod memory;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;

/// A hierarchical container node in the store, identified by its
/// slash-delimited path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub path: String,
}

/// A named attribute definition scoped under a namespace. A tag's path is
/// one segment longer than its parent namespace's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub path: String,
}

/// The store's unit of identity: tag-values attach to objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreObject {
    pub id: String,
    /// The deduplicating natural key, when the object was resolved by one.
    pub about: Option<String>,
}

/// A value attached to an object under a tag path.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// A structured value (scalar, list or mapping).
    Json(Value),
    /// Raw bytes, as produced by the directory importer.
    Opaque(Vec<u8>),
}

/// Which kind of store entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Namespace,
    Tag,
    Object,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Namespace => write!(f, "namespace"),
            EntityKind::Tag => write!(f, "tag"),
            EntityKind::Object => write!(f, "object"),
        }
    }
}

/// Errors reported by a [`TagStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entity being created already exists. The `ensure_*` helpers in
    /// [`crate::paths`] catch this and resolve the existing entity instead;
    /// it never reaches the importer's callers.
    #[error("{kind} {path} already exists")]
    AlreadyExists { kind: EntityKind, path: String },

    /// A referenced entity does not exist.
    #[error("{kind} {path} not found")]
    NotFound { kind: EntityKind, path: String },

    /// Anything the backend itself reports (transport failure, auth, ...).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Operations the importer requires from the backing store.
///
/// All calls are synchronous and blocking; the importer issues them one at a
/// time in traversal order.
pub trait TagStore {
    /// Create the namespace at `path`. Fails with
    /// [`StoreError::AlreadyExists`] when it is already present.
    fn create_namespace(&mut self, path: &str, description: &str) -> Result<Namespace, StoreError>;

    /// Create tag `name` under the namespace at `namespace_path`. Fails with
    /// [`StoreError::AlreadyExists`] when it is already present.
    fn create_tag(
        &mut self,
        namespace_path: &str,
        name: &str,
        description: &str,
        indexed: bool,
    ) -> Result<Tag, StoreError>;

    /// Resolve or create an object.
    ///
    /// Exactly one resolution mode applies per call:
    /// - `id` given: resolve the existing object with that identifier;
    /// - `about` given: resolve the object with that about value, creating
    ///   it if absent (the store guarantees at most one object per value);
    /// - neither: create a fresh anonymous object with a new identifier.
    fn create_object(
        &mut self,
        id: Option<&str>,
        about: Option<&str>,
    ) -> Result<StoreObject, StoreError>;

    /// Attach `value` to `object` under `tag_path`, optionally declaring a
    /// content type.
    fn set_tag_value(
        &mut self,
        object: &StoreObject,
        tag_path: &str,
        value: TagValue,
        content_type: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Return the objects matching a query. The only query form the
    /// importer's tests rely on is `has <tag_path>`.
    fn filter_objects(&self, query: &str) -> Result<Vec<StoreObject>, StoreError>;
}
