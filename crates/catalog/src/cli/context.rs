//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use catalog_config::Config;
use catalog_index::{IndexStatus, TantivyStore, detect_index_status};
use catalog_query::{
    Backend, BrowseSettings, Browser, FilterKeys, LabelSettings, Normalizer, NormalizerSettings,
    QueryCompiler,
};

/// Browser over the local index, gating configured filter keys.
pub type CatalogBrowser = Browser<TantivyStore, FilterKeys>;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default if no config files were found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Lets `init --force` repair a config file that no longer parses.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Builds the request normalizer from the search settings.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(NormalizerSettings {
            default_search_fields: self.config.search.search_fields.clone(),
            default_quantity: self.config.search.quantity,
        })
    }

    /// Builds the compiler, gating the configured filter keys.
    pub fn compiler(&self) -> QueryCompiler<FilterKeys> {
        QueryCompiler::with_hook(FilterKeys::new(&self.config.search.filter_keys))
    }

    /// Returns the configured backend, or exits on an unknown name.
    pub fn backend(&self) -> Result<Backend, ExitCode> {
        self.config.search.backend.parse().map_err(|e| {
            eprintln!("error: invalid search.backend in configuration: {e}");
            ExitCode::FAILURE
        })
    }

    /// Opens the index, failing with a hint when it has not been built.
    pub fn open_store(&self) -> Result<TantivyStore, ExitCode> {
        match detect_index_status(&self.config) {
            IndexStatus::Missing => {
                eprintln!("error: no index found");
                eprintln!("Run 'catalog index <FILE>' to build it.");
                return Err(ExitCode::FAILURE);
            }
            IndexStatus::Stale => {
                eprintln!(
                    "warning: index layout differs from configuration; run 'catalog index <FILE>' to rebuild"
                );
            }
            IndexStatus::Current => {}
        }

        TantivyStore::open_with_config(&self.config).map_err(|e| {
            eprintln!("error: failed to open index: {e}");
            ExitCode::FAILURE
        })
    }

    /// Builds a browser over `store` from the loaded configuration.
    pub fn browser(&self, store: TantivyStore) -> Result<CatalogBrowser, ExitCode> {
        let facets = &self.config.facets;
        let settings = BrowseSettings {
            backend: self.backend()?,
            facet_fields: facets.fields.clone(),
            bucket_size: facets.bucket_size,
        };
        let labels = LabelSettings {
            max_quantity: facets.max_quantity,
            id_fields: facets.id_fields.clone(),
            name_fields: facets.name_fields.clone(),
            facet_labels: facets.labels.clone(),
        };

        Ok(Browser::new(store.clone())
            .with_compiler(self.compiler())
            .with_normalizer(self.normalizer())
            .with_labels(labels)
            .with_settings(settings)
            .with_textual_store(store))
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
