//! Configuration merging.
//!
//! Folds parsed config files into one `Config`. Files arrive closest first;
//! they are applied in reverse so closer files overwrite farther ones.

use std::path::PathBuf;

use crate::{
    Config, ConfigError, FacetSettings, IndexSettings, SearchSettings,
    parse::{RawConfig, RawFacetSettings, RawIndexSettings, RawSearchSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges configuration files, highest precedence first.
///
/// Scalar and list settings take the value from the closest file defining
/// them. Facet labels merge per field, closest file winning. The config root
/// is the directory of the closest file.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(search) = &raw.search {
            apply_search(&mut config.search, search);
        }
        if let Some(facets) = &raw.facets {
            apply_facets(&mut config.facets, facets);
        }
        if let Some(index) = &raw.index {
            apply_index(&mut config.index, index);
        }
    }

    config.config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(|dir| dir.to_path_buf());

    Ok(config)
}

/// Overwrites search settings present in `raw`.
fn apply_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = &raw.search_fields {
        result.search_fields = v.clone();
    }
    if let Some(v) = raw.quantity {
        result.quantity = v;
    }
    if let Some(v) = &raw.filter_keys {
        result.filter_keys = v.clone();
    }
    if let Some(v) = &raw.backend {
        result.backend = v.clone();
    }
    if let Some(v) = &raw.stemmer {
        result.stemmer = v.clone();
    }
}

/// Overwrites facet settings present in `raw`.
fn apply_facets(result: &mut FacetSettings, raw: &RawFacetSettings) {
    if let Some(v) = &raw.fields {
        result.fields = v.clone();
    }
    if let Some(v) = raw.max_quantity {
        result.max_quantity = v;
    }
    if let Some(v) = raw.bucket_size {
        result.bucket_size = v;
    }
    if let Some(v) = &raw.id_fields {
        result.id_fields = v.clone();
    }
    if let Some(v) = &raw.name_fields {
        result.name_fields = v.clone();
    }
    if let Some(labels) = &raw.labels {
        for (field, label) in labels {
            result.labels.insert(field.clone(), label.clone());
        }
    }
}

/// Overwrites index settings present in `raw`.
fn apply_index(result: &mut IndexSettings, raw: &RawIndexSettings) {
    if let Some(v) = &raw.text_fields {
        result.text_fields = v.clone();
    }
    if let Some(v) = &raw.keyword_fields {
        result.keyword_fields = v.clone();
    }
}
