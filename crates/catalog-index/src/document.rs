//! Catalogue documents as ingested from JSON.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tantivy::TantivyDocument;
use tracing::trace;

use crate::schema::CatalogSchema;

/// A catalogue record: field name to its string values.
///
/// JSON strings are kept as-is; numbers and booleans are rendered in their
/// JSON text form, so `true` and `"true"` index identically. Arrays contribute
/// one value per scalar element. Nulls, objects, and nested arrays are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogDocument {
    /// Values keyed by field name.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl CatalogDocument {
    /// Builds a document from a JSON object.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let mut fields = BTreeMap::new();
        for (name, value) in object {
            let mut values = Vec::new();
            match value {
                Value::Array(items) => values.extend(items.iter().filter_map(scalar_text)),
                other => values.extend(scalar_text(other)),
            }
            if values.is_empty() {
                trace!(field = %name, "dropping field without scalar values");
                continue;
            }
            fields.insert(name.clone(), values);
        }
        Self { fields }
    }

    /// Returns the values of `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Converts into a Tantivy document, keeping only fields the schema knows.
    pub fn to_tantivy(&self, schema: &CatalogSchema) -> TantivyDocument {
        let mut doc = TantivyDocument::new();
        for (name, values) in &self.fields {
            let Some((field, _)) = schema.field(name) else {
                continue;
            };
            for value in values {
                doc.add_text(field, value);
            }
        }
        doc
    }
}

/// Renders a scalar JSON value as text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
