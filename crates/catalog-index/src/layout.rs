//! Fingerprint of the settings an index was built with.
//!
//! The index records a hash of everything that shapes its contents. When the
//! configuration no longer hashes the same, the index is stale and has to be
//! rebuilt.

use std::{
    fs,
    hash::{Hash, Hasher},
    io,
    path::Path,
};

use catalog_config::Config;
use siphasher::sip::SipHasher24;

use crate::{
    location::{index_directory, layout_hash_path},
    writer::META_FILE,
};

/// Bumped when the way documents are indexed changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Settings that shape the index contents.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct IndexLayout {
    /// Schema version.
    pub schema_version: u32,
    /// Stemmer language for text fields.
    pub stemmer: String,
    /// Tokenized fields.
    pub text_fields: Vec<String>,
    /// Exact-match fields.
    pub keyword_fields: Vec<String>,
}

impl IndexLayout {
    /// Extracts the layout from a config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            stemmer: config.search.stemmer.to_lowercase(),
            text_fields: config.index.text_fields.clone(),
            keyword_fields: config.index.keyword_fields.clone(),
        }
    }

    /// Returns the layout hash as 16 hex digits.
    pub fn hash_string(&self) -> String {
        let mut hasher = SipHasher24::new();
        self.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

/// Computes the layout hash for `config`.
pub fn compute_layout_hash(config: &Config) -> String {
    IndexLayout::from_config(config).hash_string()
}

/// Reads the stored layout hash, if any.
pub fn read_stored_hash(index_dir: &Path) -> Option<String> {
    fs::read_to_string(layout_hash_path(index_dir))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Records the layout hash beside the index.
pub fn write_layout_hash(index_dir: &Path, hash: &str) -> io::Result<()> {
    fs::create_dir_all(index_dir)?;
    fs::write(layout_hash_path(index_dir), hash)
}

/// State of the index relative to the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// Built with the current layout.
    Current,
    /// Built with a different layout, or with no recorded layout.
    Stale,
    /// Not built yet.
    Missing,
}

impl IndexStatus {
    /// Short description for display.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Stale => "stale (layout changed)",
            Self::Missing => "missing",
        }
    }

    /// True unless the index is current.
    pub fn needs_rebuild(&self) -> bool {
        !matches!(self, Self::Current)
    }
}

/// Determines the index status for `config`.
pub fn detect_index_status(config: &Config) -> IndexStatus {
    let Some(index_dir) = index_directory(config) else {
        return IndexStatus::Missing;
    };
    if !index_dir.join(META_FILE).exists() {
        return IndexStatus::Missing;
    }
    match read_stored_hash(&index_dir) {
        Some(stored) if stored == compute_layout_hash(config) => IndexStatus::Current,
        _ => IndexStatus::Stale,
    }
}
