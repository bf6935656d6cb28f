//! # Tagforge - structured-data import for tag-based stores
//!
//! A toolkit for importing structured data (JSON, YAML, CSV files or whole
//! filesystem trees) into a remote tag-based store, mapping records onto a
//! hierarchy of namespaces and tags and leaf values onto tag-values attached
//! to store objects.
//!
//! ## Modules
//!
//! - **parser**: turn raw JSON/YAML/CSV text into record batches
//! - **schema**: derive a namespace/tag layout from a template record
//! - **validate**: compare a batch's shape against its template record
//! - **import**: push record batches or directory trees into the store
//! - **store**: the store seam ([`TagStore`]) and an in-memory backend
//!
//! ## Quick Start
//!
//! ```rust
//! use tagforge::import::push_records;
//! use tagforge::schema::build_schema;
//! use tagforge::store::MemoryStore;
//!
//! # fn main() -> anyhow::Result<()> {
//! let records = tagforge::parser::json::parse(
//!     r#"[{"title": "Dune", "meta": {"year": 1965}}]"#,
//! )?;
//!
//! let mut store = MemoryStore::new();
//! let schema = build_schema(&mut store, &records, "user/books", "books", "a shelf")?;
//! // user/books/title and user/books/meta/year
//! assert_eq!(schema.len(), 2);
//!
//! let count = push_records(
//!     &mut store, &records, "user/books", &schema, Some("title"), "books", false,
//! )?;
//! assert_eq!(count, 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod import;
pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;
pub mod validate;

// Re-export commonly used types for convenience
pub use error::ImportError;
pub use import::{import_directory, import_file, FileRequest, ObjectTarget};
pub use parser::Record;
pub use schema::Schema;
pub use store::{MemoryStore, TagStore};
pub use validate::ValidationReport;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::push_records;
    use crate::schema::build_schema;

    #[test]
    fn parse_build_push_round_trip() {
        let records = parser::json::parse(
            r#"[
                {"name": "ada", "links": {"home": "http://a"}},
                {"name": "bob", "links": {"home": "http://b"}}
            ]"#,
        )
        .unwrap();
        let mut store = MemoryStore::new();
        let schema = build_schema(&mut store, &records, "test/people", "people", "d").unwrap();
        let count =
            push_records(&mut store, &records, "test/people", &schema, Some("name"), "people", false)
                .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            store.filter_objects("has test/people/links/home").unwrap().len(),
            2
        );
    }
}
