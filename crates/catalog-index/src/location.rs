//! Where the index lives on disk.
//!
//! The index sits in `.catalog/index/` beside the closest `.catalog.toml`.
//! With no config file at all it falls back to `~/.catalog/index/`.

use std::path::{Path, PathBuf};

use catalog_config::Config;
use directories::BaseDirs;

/// Data directory created beside `.catalog.toml`.
pub const DATA_DIR: &str = ".catalog";
/// Subdirectory of the data directory holding the Tantivy index.
const INDEX_DIR: &str = "index";
/// File inside the index directory recording the layout hash.
const LAYOUT_HASH_FILE: &str = "layout_hash";

/// Computes the index directory for `config`.
///
/// Returns `None` only when there is no config root and no home directory.
pub fn index_directory(config: &Config) -> Option<PathBuf> {
    match &config.config_root {
        Some(root) => Some(root.join(DATA_DIR).join(INDEX_DIR)),
        None => global_index_directory(),
    }
}

/// Returns the global index directory (`~/.catalog/index/`).
pub fn global_index_directory() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(DATA_DIR).join(INDEX_DIR))
}

/// Returns the path of the layout hash file for an index directory.
pub fn layout_hash_path(index_dir: &Path) -> PathBuf {
    index_dir.join(LAYOUT_HASH_FILE)
}
