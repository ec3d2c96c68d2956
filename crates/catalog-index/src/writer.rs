//! Index writer for loading catalogue documents into Tantivy.

use std::{fs, path::Path};

use catalog_config::IndexSettings;
use tantivy::{Index, IndexWriter as TantivyIndexWriter, TantivyError, directory::MmapDirectory};
use tracing::debug;

use crate::{
    CatalogDocument,
    analyzer::{CATALOG_TOKENIZER, build_analyzer_from_name},
    error::IndexError,
    schema::CatalogSchema,
};

/// Default heap size for the index writer (50 MB).
const DEFAULT_HEAP_SIZE: usize = 50_000_000;

/// Tantivy's marker file for an existing index.
pub(crate) const META_FILE: &str = "meta.json";

/// Writes catalogue documents to a Tantivy index.
pub struct IndexWriter {
    /// The Tantivy index.
    index: Index,
    /// The underlying Tantivy writer.
    writer: TantivyIndexWriter,
    /// Schema with field handles.
    schema: CatalogSchema,
}

impl IndexWriter {
    /// Opens the index at `path`, creating it from `settings` if absent.
    ///
    /// An existing index keeps its own schema; use [`IndexWriter::create`]
    /// when the layout has changed.
    pub fn open(path: &Path, settings: &IndexSettings, language: &str) -> Result<Self, IndexError> {
        fs::create_dir_all(path)?;
        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;

        let fresh = CatalogSchema::from_settings(settings);
        let index = Index::open_or_create(dir, fresh.schema().clone())
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        Self::from_index(index, path, language)
    }

    /// Creates an empty index at `path` from `settings`, replacing any index
    /// already there.
    pub fn create(
        path: &Path,
        settings: &IndexSettings,
        language: &str,
    ) -> Result<Self, IndexError> {
        if path.join(META_FILE).exists() {
            debug!(path = %path.display(), "removing existing index");
            fs::remove_dir_all(path)?;
        }
        fs::create_dir_all(path)?;

        let schema = CatalogSchema::from_settings(settings);
        let index = Index::create_in_dir(path, schema.schema().clone())
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        Self::from_index(index, path, language)
    }

    /// Registers the analyzer and starts a writer on an opened index.
    fn from_index(index: Index, path: &Path, language: &str) -> Result<Self, IndexError> {
        index
            .tokenizers()
            .register(CATALOG_TOKENIZER, build_analyzer_from_name(language)?);
        let writer = index
            .writer(DEFAULT_HEAP_SIZE)
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        let schema = CatalogSchema::from_schema(index.schema());

        Ok(Self {
            index,
            writer,
            schema,
        })
    }

    /// Returns the schema the index was opened with.
    pub fn schema(&self) -> &CatalogSchema {
        &self.schema
    }

    /// Stages a document; it becomes visible after [`IndexWriter::commit`].
    pub fn add_document(&mut self, doc: &CatalogDocument) -> Result<(), IndexError> {
        self.writer
            .add_document(doc.to_tantivy(&self.schema))
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Stages several documents.
    pub fn add_documents(&mut self, docs: &[CatalogDocument]) -> Result<(), IndexError> {
        docs.iter().try_for_each(|doc| self.add_document(doc))
    }

    /// Commits all pending changes to the index.
    pub fn commit(&mut self) -> Result<(), IndexError> {
        self.writer.commit().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Deletes all documents from the index.
    pub fn delete_all(&mut self) -> Result<(), IndexError> {
        self.writer
            .delete_all_documents()
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Returns the number of committed documents.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self.index.reader().map_err(|e| IndexError::write(&e))?;
        Ok(reader.searcher().num_docs())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::*;
    use crate::schema::FieldKind;

    fn settings() -> IndexSettings {
        IndexSettings {
            text_fields: vec!["name".into()],
            keyword_fields: vec!["resource_internal_id".into(), "category".into()],
        }
    }

    fn doc(id: &str, name: &str) -> CatalogDocument {
        CatalogDocument {
            fields: BTreeMap::from([
                ("resource_internal_id".to_string(), vec![id.to_string()]),
                ("name".to_string(), vec![name.to_string()]),
            ]),
        }
    }

    #[test]
    fn open_creates_index_in_empty_directory() {
        let temp = TempDir::new().unwrap();
        let writer = IndexWriter::open(temp.path(), &settings(), "english").unwrap();
        assert!(temp.path().join(META_FILE).exists());
        assert_eq!(writer.num_docs().unwrap(), 0);
    }

    #[test]
    fn adds_and_commits_documents() {
        let temp = TempDir::new().unwrap();
        let mut writer = IndexWriter::open(temp.path(), &settings(), "english").unwrap();
        writer
            .add_documents(&[doc("svc-1", "Open Cloud"), doc("svc-2", "Grid Storage")])
            .unwrap();
        assert_eq!(writer.num_docs().unwrap(), 0);
        writer.commit().unwrap();
        assert_eq!(writer.num_docs().unwrap(), 2);
    }

    #[test]
    fn delete_all_empties_index() {
        let temp = TempDir::new().unwrap();
        let mut writer = IndexWriter::open(temp.path(), &settings(), "english").unwrap();
        writer.add_document(&doc("svc-1", "Open Cloud")).unwrap();
        writer.commit().unwrap();

        writer.delete_all().unwrap();
        writer.commit().unwrap();
        assert_eq!(writer.num_docs().unwrap(), 0);
    }

    #[test]
    fn reopen_keeps_existing_schema() {
        let temp = TempDir::new().unwrap();
        let mut writer = IndexWriter::open(temp.path(), &settings(), "english").unwrap();
        writer.add_document(&doc("svc-1", "Open Cloud")).unwrap();
        writer.commit().unwrap();
        drop(writer);

        let reopened = IndexWriter::open(temp.path(), &settings(), "english").unwrap();
        assert_eq!(reopened.num_docs().unwrap(), 1);
        assert_eq!(reopened.schema().kind("category"), Some(FieldKind::Keyword));
    }

    #[test]
    fn create_replaces_index_with_new_layout() {
        let temp = TempDir::new().unwrap();
        let mut writer = IndexWriter::open(temp.path(), &settings(), "english").unwrap();
        writer.add_document(&doc("svc-1", "Open Cloud")).unwrap();
        writer.commit().unwrap();
        drop(writer);

        let layout = IndexSettings {
            text_fields: vec!["name".into(), "description".into()],
            keyword_fields: vec!["resource_internal_id".into()],
        };
        let writer = IndexWriter::create(temp.path(), &layout, "english").unwrap();
        assert_eq!(writer.num_docs().unwrap(), 0);
        assert_eq!(writer.schema().kind("description"), Some(FieldKind::Text));
        assert_eq!(writer.schema().kind("category"), None);
    }

    #[test]
    fn unknown_language_fails_to_open() {
        let temp = TempDir::new().unwrap();
        let err = IndexWriter::open(temp.path(), &settings(), "elvish").err().unwrap();
        assert!(matches!(err, IndexError::InvalidLanguage(_)));
    }
}
