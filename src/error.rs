//! Error types for parsing and importing.

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced while turning an input file or directory into store
/// namespaces, tags and tag-values.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input's content does not match the shape its format requires
    /// (top level is not a list, CSV has no detectable header, ...).
    #[error("malformed input: {reason}")]
    Format { reason: String },

    /// Syntactically valid input that contained zero usable records.
    #[error("no records found in input")]
    EmptyInput,

    /// The input file's extension maps to no known parser.
    #[error("unknown file extension: {0}")]
    UnknownExtension(String),

    /// The configured about field is absent from one of the records being
    /// pushed. Fatal for the batch.
    #[error("record {index} has no '{field}' field to build an about value from")]
    MissingAboutField { field: String, index: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ImportError {
    pub fn format(reason: impl Into<String>) -> Self {
        ImportError::Format {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
