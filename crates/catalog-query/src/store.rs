//! Contracts for the search backends the pipeline runs against.
//!
//! The query crate never talks to an engine directly. A structured store
//! receives a [`StructuredQuery`] and translates it; a textual store receives
//! the rendered query string.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{StoreError, ast::StructuredQuery, filter::OrderBy};

/// A result document: field name to its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    /// Field values keyed by field name.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to `field`.
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(value.into());
    }

    /// Builder form of [`Document::push`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(field, value);
        self
    }

    /// Returns every value of `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns the first value of `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns true if `field` holds at least one value.
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some_and(|values| !values.is_empty())
    }
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Total number of matching documents, ignoring paging.
    pub total: u64,
    /// Offset of the first result.
    pub from: u32,
    /// Requested page size.
    pub quantity: u32,
    /// Documents on this page.
    pub results: Vec<Document>,
}

/// A structured search backend.
pub trait SearchStore {
    /// Runs a query and returns one page of results.
    ///
    /// Results are relevance-ordered unless `sort` is given.
    fn execute(
        &self,
        query: &StructuredQuery,
        from: u32,
        quantity: u32,
        sort: Option<&OrderBy>,
    ) -> Result<Page, StoreError>;

    /// Counts the values of `field` across documents matching `query`.
    ///
    /// Returns at most `bucket_size` `(value, count)` pairs, most frequent
    /// first, ties broken by value.
    fn aggregate(
        &self,
        query: &StructuredQuery,
        field: &str,
        bucket_size: u32,
    ) -> Result<Vec<(String, u64)>, StoreError>;

    /// Returns up to `limit` documents with only `fields` projected.
    fn scan(&self, fields: &[String], limit: u32) -> Result<Vec<Document>, StoreError>;
}

/// A backend that accepts rendered query strings.
pub trait TextualQueryStore {
    /// Runs a textual query and returns one page of results.
    fn execute(&self, query: &str, from: u32, quantity: u32) -> Result<Page, StoreError>;
}

impl<S: SearchStore + ?Sized> SearchStore for &S {
    fn execute(
        &self,
        query: &StructuredQuery,
        from: u32,
        quantity: u32,
        sort: Option<&OrderBy>,
    ) -> Result<Page, StoreError> {
        (**self).execute(query, from, quantity, sort)
    }

    fn aggregate(
        &self,
        query: &StructuredQuery,
        field: &str,
        bucket_size: u32,
    ) -> Result<Vec<(String, u64)>, StoreError> {
        (**self).aggregate(query, field, bucket_size)
    }

    fn scan(&self, fields: &[String], limit: u32) -> Result<Vec<Document>, StoreError> {
        (**self).scan(fields, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_accessors() {
        let doc = Document::new()
            .with("name", "Open Cloud")
            .with("category", "a")
            .with("category", "b");
        assert_eq!(doc.first("name"), Some("Open Cloud"));
        assert_eq!(doc.get("category").unwrap(), ["a", "b"]);
        assert!(doc.has("category"));
        assert!(!doc.has("title"));
        assert_eq!(doc.first("title"), None);
    }

    #[test]
    fn document_serializes_as_map() {
        let doc = Document::new().with("name", "x");
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"name":["x"]}"#);
    }
}
