//! Full rebuilds of the catalogue index.

use std::path::PathBuf;

use catalog_config::Config;
use tracing::info;

use crate::{
    CatalogDocument, IndexError, IndexWriter,
    layout::{compute_layout_hash, write_layout_hash},
    location::index_directory,
};

/// Outcome of a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    /// Index directory that was written.
    pub path: PathBuf,
    /// Documents in the index after the rebuild.
    pub documents: u64,
    /// Layout hash recorded for the index.
    pub layout_hash: String,
}

/// Replaces the configured index with `documents`.
///
/// The layout hash is written only after the commit succeeds, so an
/// interrupted rebuild leaves the index reported as stale.
pub fn rebuild_index(
    config: &Config,
    documents: &[CatalogDocument],
) -> Result<IndexSummary, IndexError> {
    let path = index_directory(config).ok_or(IndexError::NoLocation)?;
    let mut writer = IndexWriter::create(&path, &config.index, &config.search.stemmer)?;
    writer.add_documents(documents)?;
    writer.commit()?;

    let layout_hash = compute_layout_hash(config);
    write_layout_hash(&path, &layout_hash)?;
    let count = writer.num_docs()?;
    info!(path = %path.display(), documents = count, "index rebuilt");

    Ok(IndexSummary {
        path,
        documents: count,
        layout_hash,
    })
}
