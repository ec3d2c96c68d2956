//! Facet label resolution.
//!
//! Raw facet values are usually identifiers or coded vocabulary terms. The
//! resolver scans the store once for `(id, name)` pairs and labels each value
//! with the matching name. Values without a match get a label derived from the
//! value itself by [`fallback_label`].

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    StoreError,
    facet::Facet,
    keyword::split_trimmed,
    store::{Document, SearchStore},
};

/// Default upper bound on documents fetched by the id/name scan.
pub const DEFAULT_MAX_QUANTITY: u32 = 10_000;

/// Settings for label resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSettings {
    /// Maximum number of documents fetched by the id/name scan.
    pub max_quantity: u32,
    /// Fields carrying a document's identifier, tried in order.
    pub id_fields: Vec<String>,
    /// Fields carrying a document's display name, tried in order.
    pub name_fields: Vec<String>,
    /// Display labels for facet fields, overriding the derived ones.
    pub facet_labels: BTreeMap<String, String>,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            max_quantity: DEFAULT_MAX_QUANTITY,
            id_fields: vec!["resource_internal_id".into()],
            name_fields: vec!["name".into(), "title".into()],
            facet_labels: BTreeMap::new(),
        }
    }
}

/// Capitalizes each `delimiter`-separated segment and rejoins with `joiner`.
///
/// An empty input is treated as `"-"`. Trailing empty segments are dropped;
/// any other empty segment leaves the input unchanged.
pub fn proper_case(value: &str, delimiter: char, joiner: &str) -> String {
    let value = if value.is_empty() { "-" } else { value };

    let mut segments = Vec::new();
    for segment in split_trimmed(value, |c| c == delimiter) {
        let mut chars = segment.chars();
        let Some(first) = chars.next() else {
            return value.to_string();
        };
        segments.push(first.to_uppercase().chain(chars).collect::<String>());
    }
    segments.join(joiner)
}

/// Derives a display label from a raw value.
///
/// Segments are capitalized around `-`, then `_` is replaced by a space with
/// the following segment capitalized:
/// `provider_category-agronomy_forestry` becomes
/// `Provider Category-Agronomy Forestry`.
pub fn fallback_label(value: &str) -> String {
    proper_case(&proper_case(value, '-', "-"), '_', " ")
}

/// Maps raw identifiers to display names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdNameIndex {
    /// Display name by identifier.
    names: BTreeMap<String, String>,
}

impl IdNameIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from scanned documents.
    ///
    /// A document contributes when it has one of `id_fields` and one of
    /// `name_fields`. A document with a name but no known id field still
    /// contributes if exactly one other field is present; that field is taken
    /// as the id.
    pub fn from_documents<'a>(
        documents: impl IntoIterator<Item = &'a Document>,
        id_fields: &[String],
        name_fields: &[String],
    ) -> Self {
        let mut index = Self::new();
        for doc in documents {
            let Some(name) = name_fields.iter().find_map(|field| doc.first(field)) else {
                debug!(?doc, "scanned document has no name field");
                continue;
            };
            let id = id_fields
                .iter()
                .find_map(|field| doc.first(field))
                .or_else(|| generic_id(doc, name_fields));
            match id {
                Some(id) => index.insert(id, name),
                None => debug!(?doc, "scanned document has no id field"),
            }
        }
        index
    }

    /// Maps `id` to `name`, replacing any previous name.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    /// Looks up the display name for `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Number of mapped identifiers.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Labels every facet and value.
    ///
    /// Value labels come from the index, else [`fallback_label`]. Facet labels
    /// come from `overrides`, else [`fallback_label`] of the field name.
    pub fn label(&self, facets: Vec<Facet>, overrides: &BTreeMap<String, String>) -> Vec<Facet> {
        facets
            .into_iter()
            .map(|mut facet| {
                facet.label = overrides
                    .get(&facet.field)
                    .cloned()
                    .unwrap_or_else(|| fallback_label(&facet.field));
                for value in &mut facet.values {
                    value.label = self
                        .get(&value.value)
                        .map(str::to_string)
                        .unwrap_or_else(|| fallback_label(&value.value));
                }
                facet
            })
            .collect()
    }
}

/// Returns the single non-name field of `doc`, if there is exactly one.
fn generic_id<'a>(doc: &'a Document, name_fields: &[String]) -> Option<&'a str> {
    let mut others = doc
        .fields
        .iter()
        .filter(|(field, values)| !values.is_empty() && !name_fields.contains(*field));
    let (_, values) = others.next()?;
    if others.next().is_some() {
        return None;
    }
    values.first().map(String::as_str)
}

/// Resolves facet labels against a search store.
#[derive(Debug)]
pub struct LabelResolver<S> {
    /// Store scanned for id/name pairs.
    store: S,
    /// Resolution settings.
    settings: LabelSettings,
}

impl<S: SearchStore> LabelResolver<S> {
    /// Creates a resolver.
    pub fn new(store: S, settings: LabelSettings) -> Self {
        Self { store, settings }
    }

    /// Scans the store and builds an id/name index.
    pub fn build_index(&self) -> Result<IdNameIndex, StoreError> {
        let fields: Vec<String> = self
            .settings
            .id_fields
            .iter()
            .chain(&self.settings.name_fields)
            .cloned()
            .collect();
        let documents = self.store.scan(&fields, self.settings.max_quantity)?;
        let index = IdNameIndex::from_documents(
            &documents,
            &self.settings.id_fields,
            &self.settings.name_fields,
        );
        debug!(
            scanned = documents.len(),
            mapped = index.len(),
            "built id/name index"
        );
        Ok(index)
    }

    /// Labels every facet and value.
    ///
    /// Never fails: if the scan fails, the failure is logged and every value
    /// gets a derived label.
    pub fn resolve(&self, facets: Vec<Facet>) -> Vec<Facet> {
        let index = self.build_index().unwrap_or_else(|err| {
            warn!(%err, "id/name scan failed; using derived labels");
            IdNameIndex::new()
        });
        index.label(facets, &self.settings.facet_labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::StructuredQuery, filter::OrderBy, store::Page};

    struct ScanStore {
        documents: Vec<Document>,
        fail: bool,
    }

    impl SearchStore for ScanStore {
        fn execute(
            &self,
            _query: &StructuredQuery,
            _from: u32,
            _quantity: u32,
            _sort: Option<&OrderBy>,
        ) -> Result<Page, StoreError> {
            Ok(Page::default())
        }

        fn aggregate(
            &self,
            _query: &StructuredQuery,
            _field: &str,
            _bucket_size: u32,
        ) -> Result<Vec<(String, u64)>, StoreError> {
            Ok(Vec::new())
        }

        fn scan(&self, _fields: &[String], limit: u32) -> Result<Vec<Document>, StoreError> {
            if self.fail {
                return Err(StoreError::new("connection refused"));
            }
            Ok(self.documents.iter().take(limit as usize).cloned().collect())
        }
    }

    fn facet(field: &str, values: &[&str]) -> Facet {
        Facet::from_buckets(field, values.iter().map(|v| (*v, 1)))
    }

    #[test]
    fn fallback_label_examples() {
        assert_eq!(
            fallback_label("provider_category-agronomy_forestry"),
            "Provider Category-Agronomy Forestry"
        );
        assert_eq!(fallback_label("open"), "Open");
        assert_eq!(fallback_label("tier-1"), "Tier-1");
    }

    #[test]
    fn fallback_label_empty_becomes_dash() {
        assert_eq!(fallback_label(""), "-");
    }

    #[test]
    fn fallback_label_trailing_delimiter_is_dropped() {
        assert_eq!(fallback_label("abc-"), "Abc");
    }

    #[test]
    fn fallback_label_interior_empty_segment_keeps_pass_input() {
        // The first pass aborts on the leading empty segment; the second
        // pass sees no underscore and capitalizes nothing.
        assert_eq!(fallback_label("-abc"), "-abc");
        // Only the second pass aborts.
        assert_eq!(fallback_label("a__b"), "A__b");
    }

    #[test]
    fn fallback_label_is_deterministic() {
        let value = "provider_category-agronomy_forestry";
        assert_eq!(fallback_label(value), fallback_label(value));
    }

    #[test]
    fn index_from_documents() {
        let docs = vec![
            Document::new()
                .with("resource_internal_id", "p1")
                .with("name", "Provider One"),
            Document::new()
                .with("resource_internal_id", "p2")
                .with("title", "Provider Two"),
            Document::new().with("slug", "p3").with("name", "Provider Three"),
            Document::new().with("name", "Nameless"),
            Document::new().with("resource_internal_id", "p4"),
        ];
        let index = IdNameIndex::from_documents(
            &docs,
            &["resource_internal_id".to_string()],
            &["name".to_string(), "title".to_string()],
        );
        assert_eq!(index.get("p1"), Some("Provider One"));
        assert_eq!(index.get("p2"), Some("Provider Two"));
        assert_eq!(index.get("p3"), Some("Provider Three"));
        assert_eq!(index.get("p4"), None);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn generic_id_requires_exactly_one_other_field() {
        let doc = Document::new()
            .with("name", "x")
            .with("a", "1")
            .with("b", "2");
        assert_eq!(generic_id(&doc, &["name".to_string()]), None);
    }

    #[test]
    fn resolve_uses_index_then_fallback() {
        let store = ScanStore {
            documents: vec![
                Document::new()
                    .with("resource_internal_id", "eosc.provider")
                    .with("name", "EOSC Provider"),
            ],
            fail: false,
        };
        let mut settings = LabelSettings::default();
        settings
            .facet_labels
            .insert("resource_providers".into(), "Providers".into());
        let resolver = LabelResolver::new(&store, settings);

        let facets = resolver.resolve(vec![
            facet("resource_providers", &["eosc.provider", "unknown_one"]),
            facet("access_type", &["open_access"]),
        ]);

        assert_eq!(facets[0].label, "Providers");
        assert_eq!(facets[0].values[0].label, "EOSC Provider");
        assert_eq!(facets[0].values[1].label, "Unknown One");
        assert_eq!(facets[1].label, "Access Type");
        assert_eq!(facets[1].values[0].label, "Open Access");
    }

    #[test]
    fn scan_failure_falls_back_to_derived_labels() {
        let store = ScanStore {
            documents: Vec::new(),
            fail: true,
        };
        let resolver = LabelResolver::new(store, LabelSettings::default());
        let facets = resolver.resolve(vec![facet(
            "category",
            &["provider_category-agronomy_forestry"],
        )]);
        assert_eq!(
            facets[0].values[0].label,
            "Provider Category-Agronomy Forestry"
        );
    }

    #[test]
    fn resolve_is_idempotent() {
        let store = ScanStore {
            documents: Vec::new(),
            fail: false,
        };
        let resolver = LabelResolver::new(store, LabelSettings::default());
        let once = resolver.resolve(vec![facet("category", &["a_b"])]);
        let twice = resolver.resolve(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn scan_respects_max_quantity() {
        let store = ScanStore {
            documents: (0..5)
                .map(|i| {
                    Document::new()
                        .with("resource_internal_id", format!("id{i}"))
                        .with("name", format!("Name {i}"))
                })
                .collect(),
            fail: false,
        };
        let settings = LabelSettings {
            max_quantity: 2,
            ..LabelSettings::default()
        };
        let index = LabelResolver::new(store, settings).build_index().unwrap();
        assert_eq!(index.len(), 2);
    }
}
