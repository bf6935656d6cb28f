//! Import recipes - file batches and filesystem trees.
//!
//! `file` covers the parse -> schema -> push pipeline for JSON/YAML/CSV
//! batches; `directory` maps a filesystem tree onto namespaces and tags
//! attached to a single object. Both offer a store-free preview.

pub mod directory;
pub mod file;

use crate::error::Result;
use crate::store::{StoreObject, TagStore};

pub use directory::{import_directory, preview_directory};
pub use file::{check_file, flatten, import_file, preview_file, push_records, FileRequest};

/// How the object receiving tag-values is resolved. Exactly one mode applies
/// per import; supplying more than one identifying criterion is a
/// configuration error callers catch before getting here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectTarget {
    /// An existing object, by identifier.
    Id(String),
    /// The object with this about value, created if absent.
    About(String),
    /// A fresh anonymous object, new identifier every time.
    Anonymous,
}

impl ObjectTarget {
    /// Resolve or create the target object.
    pub fn resolve<S: TagStore>(&self, store: &mut S) -> Result<StoreObject> {
        let object = match self {
            ObjectTarget::Id(id) => store.create_object(Some(id), None)?,
            ObjectTarget::About(about) => store.create_object(None, Some(about))?,
            ObjectTarget::Anonymous => store.create_object(None, None)?,
        };
        Ok(object)
    }

    /// Human-readable line for logs and previews.
    pub fn describe(&self) -> String {
        match self {
            ObjectTarget::Id(id) => format!("Tagging object with uuid: {id}"),
            ObjectTarget::About(about) => format!("Tagging object about: {about}"),
            ObjectTarget::Anonymous => {
                "Tagging a new anonymous object (no about or uuid given)".to_string()
            }
        }
    }
}
