//! Error types for the catalog-index crate.

use std::{io, path::PathBuf};

use catalog_query::StoreError;
use tantivy::TantivyError;
use thiserror::Error;

/// Errors that can occur when building or querying the index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Failed to open or create the index.
    #[error("failed to open index at {path}: {message}")]
    OpenIndex {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to write to the index.
    #[error("failed to write to index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit index: {0}")]
    Commit(String),

    /// Failed to run a query against the index.
    #[error("search failed: {0}")]
    Search(String),

    /// A documents file holds something that is not a JSON object per record.
    #[error("{path}:{line}: {message}")]
    ParseDocument {
        /// Documents file.
        path: PathBuf,
        /// One-based line of the offending record (1 for JSON arrays).
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// No index location could be derived from the configuration.
    #[error("no index location: no .catalog.toml found and no home directory")]
    NoLocation,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),
}

impl IndexError {
    /// Creates an `OpenIndex` error from a path and Tantivy error.
    pub(crate) fn open_index(path: PathBuf, source: &TantivyError) -> Self {
        Self::OpenIndex {
            path,
            message: source.to_string(),
        }
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &TantivyError) -> Self {
        Self::Commit(source.to_string())
    }

    /// Creates a `Search` error from a Tantivy error.
    pub(crate) fn search(source: &TantivyError) -> Self {
        Self::Search(source.to_string())
    }
}

impl From<IndexError> for StoreError {
    fn from(err: IndexError) -> Self {
        Self::new(err)
    }
}
