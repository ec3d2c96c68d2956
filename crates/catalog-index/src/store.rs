//! `SearchStore` over a Tantivy index.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use catalog_config::Config;
use catalog_query::{
    Document, OrderBy, Page, SearchStore, SortDirection, StoreError, StructuredQuery,
};
use tantivy::{
    DocAddress, Index, Searcher, TantivyDocument, TantivyError,
    collector::{Count, DocSetCollector, TopDocs},
    directory::MmapDirectory,
    query::{AllQuery, Query},
    schema::Value,
    tokenizer::TextAnalyzer,
};
use tracing::debug;

use crate::{
    IndexError,
    analyzer::{CATALOG_TOKENIZER, build_analyzer_from_name},
    location::index_directory,
    schema::CatalogSchema,
    translate::QueryTranslator,
    writer::META_FILE,
};

/// Read side of a catalogue index.
#[derive(Clone)]
pub struct TantivyStore {
    /// The Tantivy index.
    index: Index,
    /// Field handles recovered from the index.
    schema: CatalogSchema,
    /// Analyzer for text-field query input.
    analyzer: TextAnalyzer,
    /// Index directory.
    path: PathBuf,
}

impl TantivyStore {
    /// Opens an existing index for searching.
    pub fn open(path: &Path, language: &str) -> Result<Self, IndexError> {
        if !path.join(META_FILE).exists() {
            return Err(IndexError::OpenIndex {
                path: path.to_path_buf(),
                message: "index does not exist; run `catalog index` first".to_string(),
            });
        }

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;
        let index = Index::open(dir).map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        let analyzer = build_analyzer_from_name(language)?;
        index
            .tokenizers()
            .register(CATALOG_TOKENIZER, analyzer.clone());
        let schema = CatalogSchema::from_schema(index.schema());

        Ok(Self {
            index,
            schema,
            analyzer,
            path: path.to_path_buf(),
        })
    }

    /// Opens the index configured by `config`.
    pub fn open_with_config(config: &Config) -> Result<Self, IndexError> {
        let path = index_directory(config).ok_or(IndexError::NoLocation)?;
        Self::open(&path, &config.search.stemmer)
    }

    /// Returns the index directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the schema recovered from the index.
    pub fn schema(&self) -> &CatalogSchema {
        &self.schema
    }

    /// Returns the number of indexed documents.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        Ok(self.searcher()?.num_docs())
    }

    /// Translates a structured query into the Tantivy query it runs as.
    pub fn translate(&self, query: &StructuredQuery) -> Box<dyn Query> {
        QueryTranslator::new(&self.schema, self.analyzer.clone()).translate(query)
    }

    /// Opens a searcher on the latest commit.
    pub(crate) fn searcher(&self) -> Result<Searcher, IndexError> {
        let reader = self.index.reader().map_err(|e| IndexError::search(&e))?;
        Ok(reader.searcher())
    }

    /// Loads a stored document, optionally keeping only `fields`.
    pub(crate) fn load(
        &self,
        searcher: &Searcher,
        address: DocAddress,
        fields: Option<&[String]>,
    ) -> Result<Document, IndexError> {
        let stored: TantivyDocument = searcher.doc(address).map_err(|e| IndexError::search(&e))?;
        let mut doc = Document::new();
        for (name, field) in self.schema.fields() {
            if fields.is_some_and(|wanted| !wanted.iter().any(|w| w == name)) {
                continue;
            }
            for value in stored.get_all(field).filter_map(|v| v.as_str()) {
                doc.push(name, value);
            }
        }
        Ok(doc)
    }

    /// Relevance-ordered page.
    pub(crate) fn relevance_page(
        &self,
        searcher: &Searcher,
        query: &dyn Query,
        from: u32,
        quantity: u32,
    ) -> Result<Page, IndexError> {
        if quantity == 0 {
            let total = searcher.search(query, &Count).map_err(|e| IndexError::search(&e))?;
            return Ok(page(total, from, quantity, Vec::new()));
        }

        let top = TopDocs::with_limit(quantity as usize).and_offset(from as usize);
        let (hits, total) = searcher
            .search(query, &(top, Count))
            .map_err(|e| IndexError::search(&e))?;
        let results = hits
            .into_iter()
            .map(|(_, address)| self.load(searcher, address, None))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(page(total, from, quantity, results))
    }

    /// Page ordered by the first stored value of the sort field.
    ///
    /// Documents without a value sort last in either direction; ties keep
    /// index order.
    fn page_sorted(
        &self,
        searcher: &Searcher,
        query: &dyn Query,
        from: u32,
        quantity: u32,
        order: &OrderBy,
    ) -> Result<Page, IndexError> {
        let Some((field, _)) = self.schema.field(&order.field) else {
            debug!(field = %order.field, "sort field not indexed; using relevance order");
            return self.relevance_page(searcher, query, from, quantity);
        };

        let matching = searcher
            .search(query, &DocSetCollector)
            .map_err(|e| IndexError::search(&e))?;
        let mut keyed = matching
            .into_iter()
            .map(|address| {
                let stored: TantivyDocument =
                    searcher.doc(address).map_err(|e| IndexError::search(&e))?;
                let key = stored
                    .get_first(field)
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                Ok((key, address))
            })
            .collect::<Result<Vec<_>, IndexError>>()?;
        keyed.sort_by(|(a, a_addr), (b, b_addr)| {
            compare_sort_keys(a.as_deref(), b.as_deref(), order.direction)
                .then_with(|| a_addr.cmp(b_addr))
        });

        let total = keyed.len();
        let results = keyed
            .into_iter()
            .skip(from as usize)
            .take(quantity as usize)
            .map(|(_, address)| self.load(searcher, address, None))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(page(total, from, quantity, results))
    }

    /// Counts per-document distinct values of `field` over matches of `query`.
    fn count_values(
        &self,
        query: &StructuredQuery,
        field: &str,
    ) -> Result<BTreeMap<String, u64>, IndexError> {
        let mut counts = BTreeMap::new();
        let Some((handle, _)) = self.schema.field(field) else {
            debug!(field, "facet field not indexed; no buckets");
            return Ok(counts);
        };

        let searcher = self.searcher()?;
        let matching = searcher
            .search(&*self.translate(query), &DocSetCollector)
            .map_err(|e| IndexError::search(&e))?;
        for address in matching {
            let stored: TantivyDocument =
                searcher.doc(address).map_err(|e| IndexError::search(&e))?;
            let values: BTreeSet<&str> =
                stored.get_all(handle).filter_map(|v| v.as_str()).collect();
            for value in values {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

impl SearchStore for TantivyStore {
    fn execute(
        &self,
        query: &StructuredQuery,
        from: u32,
        quantity: u32,
        sort: Option<&OrderBy>,
    ) -> Result<Page, StoreError> {
        let searcher = self.searcher()?;
        let translated = self.translate(query);
        let result = match sort {
            Some(order) => self.page_sorted(&searcher, &*translated, from, quantity, order),
            None => self.relevance_page(&searcher, &*translated, from, quantity),
        }?;
        debug!(total = result.total, shown = result.results.len(), "executed query");
        Ok(result)
    }

    fn aggregate(
        &self,
        query: &StructuredQuery,
        field: &str,
        bucket_size: u32,
    ) -> Result<Vec<(String, u64)>, StoreError> {
        if bucket_size == 0 {
            return Ok(Vec::new());
        }
        let mut buckets: Vec<(String, u64)> =
            self.count_values(query, field)?.into_iter().collect();
        buckets.sort_by(|(a_value, a_count), (b_value, b_count)| {
            b_count.cmp(a_count).then_with(|| a_value.cmp(b_value))
        });
        buckets.truncate(bucket_size as usize);
        Ok(buckets)
    }

    fn scan(&self, fields: &[String], limit: u32) -> Result<Vec<Document>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let searcher = self.searcher()?;
        let hits = searcher
            .search(&AllQuery, &TopDocs::with_limit(limit as usize))
            .map_err(|e| IndexError::search(&e))?;
        let docs = hits
            .into_iter()
            .map(|(_, address)| self.load(&searcher, address, Some(fields)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs)
    }
}

/// Orders optional sort keys; missing keys sort last.
fn compare_sort_keys(a: Option<&str>, b: Option<&str>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp(b),
            SortDirection::Desc => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Builds a page from a collector count.
fn page(total: usize, from: u32, quantity: u32, results: Vec<Document>) -> Page {
    Page {
        total: total as u64,
        from,
        quantity,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sort_keys_go_last_both_ways() {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            assert_eq!(
                compare_sort_keys(Some("a"), None, direction),
                Ordering::Less
            );
            assert_eq!(
                compare_sort_keys(None, Some("a"), direction),
                Ordering::Greater
            );
        }
    }

    #[test]
    fn direction_flips_present_keys() {
        assert_eq!(
            compare_sort_keys(Some("a"), Some("b"), SortDirection::Asc),
            Ordering::Less
        );
        assert_eq!(
            compare_sort_keys(Some("a"), Some("b"), SortDirection::Desc),
            Ordering::Greater
        );
    }

    #[test]
    fn open_missing_index_fails() {
        let temp = tempfile::tempdir().unwrap();
        let err = TantivyStore::open(&temp.path().join("index"), "english")
            .err()
            .unwrap();
        assert!(err.to_string().contains("run `catalog index` first"));
    }
}
