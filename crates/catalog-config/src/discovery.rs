//! Configuration file discovery.
//!
//! Collects `.catalog.toml` files from the working directory upwards, then the
//! global `~/.catalog.toml`, closest first.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".catalog.toml";

/// Discovers the configuration files that apply to `cwd`.
///
/// Paths are returned highest precedence first: the file in `cwd`, then each
/// ancestor's, then the global file. A file with `root = true` ends the walk
/// and suppresses the global file.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let stop = is_root_config(&candidate);
        configs.push(candidate);
        if stop {
            return configs;
        }
    }

    if let Some(global) = global_config_path()
        && global.is_file()
        && !configs.contains(&global)
    {
        configs.push(global);
    }

    configs
}

/// Returns the path of the global configuration file (`~/.catalog.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
