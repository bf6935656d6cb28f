//! Idempotent namespace and tag creation.
//!
//! The store reports a conflict when an entity already exists; here that is
//! the expected steady state on reruns, so every `ensure_*` helper converts
//! the conflict into resolving the existing entity and carries on.

use tracing::{debug, info};

use crate::error::Result;
use crate::store::{Namespace, StoreError, Tag, TagStore};

/// Join path segments with the store's separator, skipping empty segments.
pub fn join_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Description attached to namespaces generated from a dataset.
pub fn namespace_description(child: &str, dataset: &str, desc: &str) -> String {
    format!("{child} namespace derived from {dataset}.\n\n{desc}")
}

/// Description attached to tags generated from a dataset.
pub fn tag_description(name: &str, dataset: &str, desc: &str) -> String {
    format!("{name} tag derived from {dataset}.\n\n{desc}")
}

/// Create the namespace at `path`, or resolve it if it already exists.
pub fn ensure_namespace<S: TagStore>(
    store: &mut S,
    path: &str,
    dataset: &str,
    desc: &str,
) -> Result<Namespace> {
    let child = path.rsplit('/').next().unwrap_or(path);
    match store.create_namespace(path, &namespace_description(child, dataset, desc)) {
        Ok(namespace) => {
            info!(path, "created namespace");
            Ok(namespace)
        }
        Err(StoreError::AlreadyExists { .. }) => {
            debug!(path, "namespace already existed");
            Ok(Namespace {
                path: path.to_string(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Ensure every namespace along a slash-delimited path exists, returning the
/// leaf. The first segment is the caller's root and is assumed to already
/// exist remotely; it is never created.
pub fn ensure_namespace_path<S: TagStore>(
    store: &mut S,
    path: &str,
    dataset: &str,
    desc: &str,
) -> Result<Namespace> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    let root = segments.next().unwrap_or_default();
    let mut current = Namespace {
        path: root.to_string(),
    };
    for segment in segments {
        let next = join_path([current.path.as_str(), segment]);
        current = ensure_namespace(store, &next, dataset, desc)?;
    }
    Ok(current)
}

/// Create tag `name` under `namespace`, or resolve it if it already exists.
pub fn ensure_tag<S: TagStore>(
    store: &mut S,
    namespace: &Namespace,
    name: &str,
    dataset: &str,
    desc: &str,
    indexed: bool,
) -> Result<Tag> {
    match store.create_tag(
        &namespace.path,
        name,
        &tag_description(name, dataset, desc),
        indexed,
    ) {
        Ok(tag) => {
            info!(path = %tag.path, "created tag");
            Ok(tag)
        }
        Err(StoreError::AlreadyExists { .. }) => {
            let path = join_path([namespace.path.as_str(), name]);
            debug!(%path, "tag already existed");
            Ok(Tag { path })
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn ensure_namespace_is_idempotent() {
        let mut store = MemoryStore::new();
        let first = ensure_namespace(&mut store, "test/books", "books", "a test").unwrap();
        let second = ensure_namespace(&mut store, "test/books", "books", "a test").unwrap();
        assert_eq!(first.path, second.path);
        assert!(store.has_namespace("test/books"));
    }

    #[test]
    fn ensure_namespace_path_skips_the_root() {
        let mut store = MemoryStore::new();
        let leaf = ensure_namespace_path(&mut store, "test/a/b/c", "data", "desc").unwrap();
        assert_eq!(leaf.path, "test/a/b/c");
        // The root segment is assumed to pre-exist and is never created.
        assert!(!store.has_namespace("test"));
        assert!(store.has_namespace("test/a"));
        assert!(store.has_namespace("test/a/b"));
        assert!(store.has_namespace("test/a/b/c"));
    }

    #[test]
    fn ensure_tag_is_idempotent() {
        let mut store = MemoryStore::new();
        let ns = ensure_namespace(&mut store, "test/books", "books", "a test").unwrap();
        let first = ensure_tag(&mut store, &ns, "title", "books", "a test", false).unwrap();
        let second = ensure_tag(&mut store, &ns, "title", "books", "a test", false).unwrap();
        assert_eq!(first.path, "test/books/title");
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn join_path_drops_empty_segments() {
        assert_eq!(join_path(["a", "", "b"]), "a/b");
        assert_eq!(join_path(["", "x"]), "x");
    }

    #[test]
    fn description_templates() {
        assert_eq!(
            namespace_description("books", "library", "shelf data"),
            "books namespace derived from library.\n\nshelf data"
        );
        assert_eq!(
            tag_description("title", "library", "shelf data"),
            "title tag derived from library.\n\nshelf data"
        );
    }
}
