//! Configuration file parsing.
//!
//! Parses individual `.catalog.toml` files into intermediate `RawConfig`
//! structures that keep every field optional until merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
    /// Facet settings section.
    pub facets: Option<RawFacetSettings>,
    /// Index layout section.
    pub index: Option<RawIndexSettings>,
}

/// Raw search settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Fields the keyword is matched against by default.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub search_fields: Option<Vec<String>>,
    /// Default page size.
    pub quantity: Option<u32>,
    /// Filter keys that gate results without affecting ranking.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub filter_keys: Option<Vec<String>>,
    /// Query backend: `structured` or `textual`.
    pub backend: Option<String>,
    /// Stemming language.
    pub stemmer: Option<String>,
}

/// Raw facet settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFacetSettings {
    /// Fields aggregated into facets.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub fields: Option<Vec<String>>,
    /// Maximum documents fetched by the label scan.
    pub max_quantity: Option<u32>,
    /// Maximum buckets per facet.
    pub bucket_size: Option<u32>,
    /// Fields carrying document identifiers, in lookup order.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub id_fields: Option<Vec<String>>,
    /// Fields carrying display names, in lookup order.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub name_fields: Option<Vec<String>>,
    /// Display labels for facet fields.
    pub labels: Option<BTreeMap<String, String>>,
}

/// Raw index layout settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Tokenized full-text fields.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub text_fields: Option<Vec<String>>,
    /// Exact-match keyword fields.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub keyword_fields: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.search.is_none());
        assert!(config.facets.is_none());
        assert!(config.index.is_none());
    }

    #[test]
    fn test_parse_search_settings() {
        let toml = r#"
[search]
search_fields = ["name", "description"]
quantity = 25
filter_keys = ["active", "latest"]
backend = "textual"
stemmer = "french"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let search = config.search.unwrap();
        assert_eq!(
            search.search_fields,
            Some(vec!["name".to_string(), "description".to_string()])
        );
        assert_eq!(search.quantity, Some(25));
        assert_eq!(
            search.filter_keys,
            Some(vec!["active".to_string(), "latest".to_string()])
        );
        assert_eq!(search.backend.as_deref(), Some("textual"));
        assert_eq!(search.stemmer.as_deref(), Some("french"));
    }

    #[test]
    fn test_parse_single_string_lists() {
        let toml = r#"
[search]
search_fields = "name"

[facets]
fields = "category"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(
            config.search.unwrap().search_fields,
            Some(vec!["name".to_string()])
        );
        assert_eq!(
            config.facets.unwrap().fields,
            Some(vec!["category".to_string()])
        );
    }

    #[test]
    fn test_parse_facet_labels() {
        let toml = r#"
[facets]
max_quantity = 500
bucket_size = 5
labels = { resource_providers = "Providers", category = "Categories" }
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let facets = config.facets.unwrap();
        assert_eq!(facets.max_quantity, Some(500));
        assert_eq!(facets.bucket_size, Some(5));
        let labels = facets.labels.unwrap();
        assert_eq!(labels.get("category").map(String::as_str), Some("Categories"));
        assert!(facets.id_fields.is_none());
    }

    #[test]
    fn test_parse_index_settings() {
        let toml = r#"
[index]
text_fields = ["name", "title"]
keyword_fields = ["resource_internal_id", "category"]
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let index = config.index.unwrap();
        assert_eq!(index.text_fields.unwrap().len(), 2);
        assert_eq!(index.keyword_fields.unwrap()[1], "category");
    }

    #[test]
    fn test_parse_root_flag() {
        let config = parse_config_str("root = true\n", Path::new("test.toml")).unwrap();
        assert_eq!(config.root, Some(true));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_config_str("[search\n", Path::new("bad.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = parse_config_str("[search]\nquantity = \"ten\"\n", Path::new("bad.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_parse_config_file_missing() {
        let result = parse_config_file(Path::new("/nonexistent/.catalog.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_parse_config_without_path() {
        assert!(parse_config("[index]\ntext_fields = []\n").is_ok());
    }
}
