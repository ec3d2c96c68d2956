//! Error types for filter normalization and browsing.

use std::fmt::Display;

use thiserror::Error;

/// Errors surfaced to callers of the query pipeline.
///
/// Only malformed paging and backend misconfiguration reject a request. Every
/// other irregular input degrades to a default instead of failing.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A paging parameter (`from` or `quantity`) is not an unsigned integer.
    #[error("invalid value for '{param}': {value:?} is not an unsigned integer")]
    MalformedPaging {
        /// Name of the offending parameter.
        param: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },

    /// The requested rendering target is not available in this deployment.
    #[error("unsupported search backend: {backend}")]
    UnsupportedBackend {
        /// Name of the backend that was requested.
        backend: String,
    },

    /// The search store failed while executing a query.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Returns true when the error was caused by the client's request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedPaging { .. })
    }
}

/// Failure reported by a search store implementation.
///
/// Stores wrap their engine-specific errors into this type so the query crate
/// stays free of engine dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("search store error: {message}")]
pub struct StoreError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl StoreError {
    /// Creates a store error from any displayable source.
    pub fn new(source: impl Display) -> Self {
        Self {
            message: source.to_string(),
        }
    }
}
