//! Configuration system for catalog search.
//!
//! Configuration lives in TOML files named `.catalog.toml`. Files are collected by walking up
//! the directory tree from the current working directory, then `~/.catalog.toml` is loaded as
//! the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawFacetSettings, RawIndexSettings, RawSearchSettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Backends accepted by `search.backend`.
pub const BACKENDS: [&str; 2] = ["structured", "textual"];

/// Top-level merged configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Query settings.
    pub search: SearchSettings,
    /// Facet aggregation and labelling settings.
    pub facets: FacetSettings,
    /// Index layout.
    pub index: IndexSettings,
    /// Directory containing the most specific config file (determines index location).
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.catalog.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from config file paths given highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML, in `.catalog.toml` layout.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            search: &self.search,
            facets: &self.facets,
            index: &self.index,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Query settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Fields the keyword is matched against when a request names none.
    pub search_fields: Vec<String>,
    /// Page size when a request names none.
    pub quantity: u32,
    /// Filter keys that gate results without affecting ranking.
    pub filter_keys: Vec<String>,
    /// Query backend.
    pub backend: String,
    /// Stemming language.
    pub stemmer: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            search_fields: vec![
                "resource_internal_id".into(),
                "name".into(),
                "title".into(),
            ],
            quantity: 10,
            filter_keys: Vec::new(),
            backend: String::from("structured"),
            stemmer: String::from("english"),
        }
    }
}

/// Facet aggregation and labelling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FacetSettings {
    /// Fields aggregated into facets.
    pub fields: Vec<String>,
    /// Maximum documents fetched by the label scan.
    pub max_quantity: u32,
    /// Maximum buckets per facet.
    pub bucket_size: u32,
    /// Fields carrying document identifiers, in lookup order.
    pub id_fields: Vec<String>,
    /// Fields carrying display names, in lookup order.
    pub name_fields: Vec<String>,
    /// Display labels for facet fields.
    pub labels: BTreeMap<String, String>,
}

impl Default for FacetSettings {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            max_quantity: 10_000,
            bucket_size: 20,
            id_fields: vec!["resource_internal_id".into()],
            name_fields: vec!["name".into(), "title".into()],
            labels: BTreeMap::new(),
        }
    }
}

/// Index layout: which document fields are indexed and how.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Tokenized full-text fields.
    pub text_fields: Vec<String>,
    /// Exact-match keyword fields, also usable as facets.
    pub keyword_fields: Vec<String>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            text_fields: vec!["name".into(), "title".into(), "description".into()],
            keyword_fields: vec!["resource_internal_id".into()],
        }
    }
}

impl IndexSettings {
    /// Returns true if `field` is indexed in either form.
    pub fn is_indexed(&self, field: &str) -> bool {
        self.text_fields.iter().any(|f| f == field)
            || self.keyword_fields.iter().any(|f| f == field)
    }
}

/// Borrowed view of the settings sections for TOML output.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Query settings.
    search: &'a SearchSettings,
    /// Facet settings.
    facets: &'a FacetSettings,
    /// Index layout.
    index: &'a IndexSettings,
}
