//! Configuration validation.
//!
//! Reports settings that load fine but will not behave as intended.

use std::fmt;

use crate::{BACKENDS, Config};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `search.backend` is not a known backend.
    UnknownBackend {
        /// The configured value.
        backend: String,
    },
    /// `search.search_fields` is empty.
    NoSearchFields,
    /// A search field is not indexed.
    SearchFieldNotIndexed {
        /// Field name.
        field: String,
    },
    /// A facet field is not an indexed keyword field.
    FacetFieldNotKeyword {
        /// Field name.
        field: String,
    },
    /// A filter key is not indexed.
    FilterKeyNotIndexed {
        /// Field name.
        field: String,
    },
    /// A field is declared as both text and keyword.
    FieldDeclaredTwice {
        /// Field name.
        field: String,
    },
    /// `facets.bucket_size` is zero, so every facet comes back empty.
    ZeroBucketSize,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBackend { backend } => write!(
                f,
                "unknown search backend '{backend}' (expected one of: {})",
                BACKENDS.join(", ")
            ),
            Self::NoSearchFields => write!(f, "no search fields are configured"),
            Self::SearchFieldNotIndexed { field } => {
                write!(f, "search field '{field}' is not an indexed field")
            }
            Self::FacetFieldNotKeyword { field } => {
                write!(f, "facet field '{field}' is not a keyword field")
            }
            Self::FilterKeyNotIndexed { field } => {
                write!(f, "filter key '{field}' is not an indexed field")
            }
            Self::FieldDeclaredTwice { field } => {
                write!(f, "field '{field}' is declared as both text and keyword")
            }
            Self::ZeroBucketSize => write!(f, "facet bucket size is zero"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let index = &config.index;

    if !BACKENDS.contains(&config.search.backend.to_ascii_lowercase().as_str()) {
        warnings.push(ConfigWarning::UnknownBackend {
            backend: config.search.backend.clone(),
        });
    }

    if config.search.search_fields.is_empty() {
        warnings.push(ConfigWarning::NoSearchFields);
    }
    for field in &config.search.search_fields {
        if !index.is_indexed(field) {
            warnings.push(ConfigWarning::SearchFieldNotIndexed {
                field: field.clone(),
            });
        }
    }

    for field in &config.facets.fields {
        if !index.keyword_fields.contains(field) {
            warnings.push(ConfigWarning::FacetFieldNotKeyword {
                field: field.clone(),
            });
        }
    }

    for field in &config.search.filter_keys {
        if !index.is_indexed(field) {
            warnings.push(ConfigWarning::FilterKeyNotIndexed {
                field: field.clone(),
            });
        }
    }

    for field in &index.text_fields {
        if index.keyword_fields.contains(field) {
            warnings.push(ConfigWarning::FieldDeclaredTwice {
                field: field.clone(),
            });
        }
    }

    if config.facets.bucket_size == 0 {
        warnings.push(ConfigWarning::ZeroBucketSize);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn unknown_backend() {
        let mut config = Config::default();
        config.search.backend = "sql".into();
        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![ConfigWarning::UnknownBackend {
                backend: "sql".into()
            }]
        );
        assert!(warnings[0].to_string().contains("structured, textual"));
    }

    #[test]
    fn backend_is_case_insensitive() {
        let mut config = Config::default();
        config.search.backend = "Textual".into();
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn unindexed_fields_are_reported() {
        let mut config = Config::default();
        config.search.search_fields.push("summary".into());
        config.facets.fields = vec!["name".into(), "category".into()];
        config.search.filter_keys = vec!["active".into()];

        let warnings = validate_config(&config);
        assert!(warnings.contains(&ConfigWarning::SearchFieldNotIndexed {
            field: "summary".into()
        }));
        assert!(warnings.contains(&ConfigWarning::FacetFieldNotKeyword {
            field: "name".into()
        }));
        assert!(warnings.contains(&ConfigWarning::FacetFieldNotKeyword {
            field: "category".into()
        }));
        assert!(warnings.contains(&ConfigWarning::FilterKeyNotIndexed {
            field: "active".into()
        }));
    }

    #[test]
    fn duplicate_declaration_and_zero_buckets() {
        let mut config = Config::default();
        config.index.keyword_fields.push("name".into());
        config.facets.bucket_size = 0;
        let warnings = validate_config(&config);
        assert!(warnings.contains(&ConfigWarning::FieldDeclaredTwice {
            field: "name".into()
        }));
        assert!(warnings.contains(&ConfigWarning::ZeroBucketSize));
    }

    #[test]
    fn empty_search_fields() {
        let mut config = Config::default();
        config.search.search_fields.clear();
        assert_eq!(validate_config(&config), vec![ConfigWarning::NoSearchFields]);
    }
}
