//! catalog: faceted search over a metadata catalogue.
//!
//! Catalogue records are indexed from JSON into a local Tantivy index. Browse
//! requests are given as `key=value` parameters: a free-text `query`, paging
//! and sort settings, and field filters. Results come back with facet counts
//! whose values carry human-readable labels.

#![warn(missing_docs)]

pub mod cli;
