//! Library error type
//!
//! Fatal conditions abort the whole rebuild; recoverable per-record
//! problems (unresolved raw biotypes) are logged and never surface here.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::keys::{MarkerKey, SequenceKey};

/// Errors that can occur while rebuilding a cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cannot read table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    #[error("Cannot query table '{table}': {source}")]
    Sqlite {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Required table '{table}' not found in {}", location.display())]
    MissingTable { table: String, location: PathBuf },

    #[error("Source not recognised (expected a directory or a SQLite file): {}", .0.display())]
    UnknownSource(PathBuf),

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("{vocabulary} equivalency term does not resolve: {term}")]
    UnresolvedEquivalence { vocabulary: String, term: String },

    #[error("Annotation rows are not grouped by marker: marker {marker_key} reappears after its group closed")]
    UnsortedInput { marker_key: MarkerKey },

    #[error("Linked sequence invariant violated for marker {marker_key} (genomic {genomic_key}): {detail}")]
    LinkageInvariant {
        marker_key: MarkerKey,
        genomic_key: SequenceKey,
        detail: String,
    },

    #[error("Representative qualifier term '{term}' is missing from rep_qualifiers")]
    MissingQualifier { term: String },

    #[error("Table '{table}' has no rows")]
    EmptyTable { table: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    pub fn config(message: impl Into<String>) -> Self {
        CacheError::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
