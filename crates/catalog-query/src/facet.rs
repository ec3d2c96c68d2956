//! Facets: aggregated field values with display labels.

use serde::Serialize;

/// One bucket of a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetValue {
    /// Raw indexed value.
    pub value: String,
    /// Display label; empty until resolved.
    pub label: String,
    /// Number of matching documents holding the value.
    pub count: u64,
}

impl FacetValue {
    /// Creates an unlabeled bucket.
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self {
            value: value.into(),
            label: String::new(),
            count,
        }
    }
}

/// A navigable field and its value buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    /// Indexed field name.
    pub field: String,
    /// Display label for the field; empty until resolved.
    pub label: String,
    /// Buckets, most frequent first.
    pub values: Vec<FacetValue>,
}

impl Facet {
    /// Creates an unlabeled facet from `(value, count)` buckets.
    pub fn from_buckets<I, S>(field: impl Into<String>, buckets: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            label: String::new(),
            values: buckets
                .into_iter()
                .map(|(value, count)| FacetValue::new(value, count))
                .collect(),
        }
    }
}
