//! Index schema derived from the `[index]` settings.
//!
//! Every catalogue field is stored. Text fields are tokenized with the
//! catalogue analyzer and keep positions for phrase matching; keyword fields
//! are indexed as a single raw token and marked fast.

use std::collections::BTreeMap;

use catalog_config::IndexSettings;
use tantivy::schema::{
    FAST, Field, FieldType, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing,
    TextOptions,
};
use tracing::warn;

use crate::analyzer::CATALOG_TOKENIZER;

/// How a field is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Analyzed full text.
    Text,
    /// Exact, unanalyzed value.
    Keyword,
}

/// Tantivy schema with catalogue field handles.
#[derive(Debug, Clone)]
pub struct CatalogSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Field handles and kinds by name.
    fields: BTreeMap<String, (Field, FieldKind)>,
}

impl CatalogSchema {
    /// Builds a schema from index settings.
    ///
    /// A field listed as both text and keyword is indexed as text.
    pub fn from_settings(settings: &IndexSettings) -> Self {
        let mut builder = Schema::builder();
        let mut fields = BTreeMap::new();

        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(CATALOG_TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();
        for name in &settings.text_fields {
            if fields.contains_key(name) {
                continue;
            }
            let field = builder.add_text_field(name, text_options.clone());
            fields.insert(name.clone(), (field, FieldKind::Text));
        }

        for name in &settings.keyword_fields {
            if fields.contains_key(name) {
                warn!(field = %name, "field declared as text and keyword; indexing as text");
                continue;
            }
            let field = builder.add_text_field(name, STRING | STORED | FAST);
            fields.insert(name.clone(), (field, FieldKind::Keyword));
        }

        Self {
            schema: builder.build(),
            fields,
        }
    }

    /// Recovers field kinds from an existing index's schema.
    ///
    /// Raw-tokenized string fields are keywords; other string fields are text.
    /// Non-string fields are ignored.
    pub fn from_schema(schema: Schema) -> Self {
        let fields = schema
            .fields()
            .filter_map(|(field, entry)| {
                let FieldType::Str(options) = entry.field_type() else {
                    return None;
                };
                let kind = match options.get_indexing_options() {
                    Some(indexing) if indexing.tokenizer() != "raw" => FieldKind::Text,
                    _ => FieldKind::Keyword,
                };
                Some((entry.name().to_string(), (field, kind)))
            })
            .collect();
        Self { schema, fields }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Looks up a field handle and its kind.
    pub fn field(&self, name: &str) -> Option<(Field, FieldKind)> {
        self.fields.get(name).copied()
    }

    /// Returns the kind of `name`, if indexed.
    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|(_, kind)| kind)
    }

    /// Iterates over field names with their handles, in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Field)> {
        self.fields
            .iter()
            .map(|(name, (field, _))| (name.as_str(), *field))
    }
}
