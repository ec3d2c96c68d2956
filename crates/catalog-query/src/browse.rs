//! Request orchestration: parameters in, labeled results out.

use std::{fmt, str::FromStr};

use serde::Serialize;
use tracing::debug;

use crate::{
    QueryError,
    compile::QueryCompiler,
    facet::Facet,
    filter::FacetFilter,
    hook::{FilterHook, MustByDefault},
    labels::{LabelResolver, LabelSettings},
    normalize::Normalizer,
    params::Params,
    render::render,
    store::{Document, Page, SearchStore, TextualQueryStore},
};

/// Default number of buckets returned per facet.
pub const DEFAULT_BUCKET_SIZE: u32 = 20;

/// Which query representation a request is executed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Compiled query tree against a [`SearchStore`].
    #[default]
    Structured,
    /// Rendered query string against a [`TextualQueryStore`].
    Textual,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structured" => Ok(Self::Structured),
            "textual" => Ok(Self::Textual),
            other => Err(format!("unknown backend: {other}")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::Textual => write!(f, "textual"),
        }
    }
}

/// Per-deployment browse settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseSettings {
    /// Backend requests run against.
    pub backend: Backend,
    /// Fields aggregated into facets.
    pub facet_fields: Vec<String>,
    /// Maximum buckets per facet.
    pub bucket_size: u32,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            facet_fields: Vec::new(),
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// One page of results with labeled facets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Browsing {
    /// Total number of matching documents.
    pub total: u64,
    /// Offset of the first result.
    pub from: u32,
    /// Offset just past the last result.
    pub to: u32,
    /// Documents on this page.
    pub results: Vec<Document>,
    /// Labeled facets; empty for the textual backend.
    pub facets: Vec<Facet>,
}

impl Browsing {
    /// Wraps a store page with facets.
    fn from_page(page: Page, facets: Vec<Facet>) -> Self {
        let shown = u32::try_from(page.results.len()).unwrap_or(u32::MAX);
        Self {
            total: page.total,
            from: page.from,
            to: page.from.saturating_add(shown),
            results: page.results,
            facets,
        }
    }
}

/// Runs browse requests against a search store.
pub struct Browser<S, H = MustByDefault> {
    /// Structured store; also scanned for facet labels.
    store: S,
    /// Compiles filters for the structured store.
    compiler: QueryCompiler<H>,
    /// Parses request parameters.
    normalizer: Normalizer,
    /// Label resolution settings.
    labels: LabelSettings,
    /// Backend and facet settings.
    settings: BrowseSettings,
    /// Optional store for the textual backend.
    textual: Option<Box<dyn TextualQueryStore>>,
}

impl<S: SearchStore> Browser<S> {
    /// Creates a browser with default settings.
    pub fn new(store: S) -> Self {
        Self {
            store,
            compiler: QueryCompiler::new(),
            normalizer: Normalizer::default(),
            labels: LabelSettings::default(),
            settings: BrowseSettings::default(),
            textual: None,
        }
    }
}

impl<S: SearchStore, H: FilterHook> Browser<S, H> {
    /// Replaces the query compiler.
    pub fn with_compiler<H2: FilterHook>(self, compiler: QueryCompiler<H2>) -> Browser<S, H2> {
        Browser {
            store: self.store,
            compiler,
            normalizer: self.normalizer,
            labels: self.labels,
            settings: self.settings,
            textual: self.textual,
        }
    }

    /// Replaces the normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Replaces the label settings.
    pub fn with_labels(mut self, labels: LabelSettings) -> Self {
        self.labels = labels;
        self
    }

    /// Replaces the browse settings.
    pub fn with_settings(mut self, settings: BrowseSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Attaches a store for the textual backend.
    pub fn with_textual_store(mut self, store: impl TextualQueryStore + 'static) -> Self {
        self.textual = Some(Box::new(store));
        self
    }

    /// Returns the normalizer.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Returns the compiler.
    pub fn compiler(&self) -> &QueryCompiler<H> {
        &self.compiler
    }

    /// Normalizes `params` and browses with the configured backend.
    pub fn browse(&self, params: &Params) -> Result<Browsing, QueryError> {
        let filter = self.normalizer.normalize(params)?;
        self.browse_filter(&filter)
    }

    /// Browses a normalized filter with the configured backend.
    pub fn browse_filter(&self, filter: &FacetFilter) -> Result<Browsing, QueryError> {
        self.browse_with(filter, self.settings.backend)
    }

    /// Browses a normalized filter with an explicit backend.
    pub fn browse_with(
        &self,
        filter: &FacetFilter,
        backend: Backend,
    ) -> Result<Browsing, QueryError> {
        match backend {
            Backend::Structured => self.browse_structured(filter),
            Backend::Textual => self.browse_textual(filter),
        }
    }

    /// Compiles, executes, aggregates and labels.
    fn browse_structured(&self, filter: &FacetFilter) -> Result<Browsing, QueryError> {
        let query = self.compiler.compile(filter);
        debug!(%query, "executing structured query");

        let page = self.store.execute(
            &query,
            filter.from,
            filter.quantity,
            filter.order_by.as_ref(),
        )?;

        let mut facets = Vec::with_capacity(self.settings.facet_fields.len());
        for field in &self.settings.facet_fields {
            let buckets = self
                .store
                .aggregate(&query, field, self.settings.bucket_size)?;
            facets.push(Facet::from_buckets(field.as_str(), buckets));
        }
        if !facets.is_empty() {
            facets = LabelResolver::new(&self.store, self.labels.clone()).resolve(facets);
        }

        Ok(Browsing::from_page(page, facets))
    }

    /// Renders and executes against the textual store.
    fn browse_textual(&self, filter: &FacetFilter) -> Result<Browsing, QueryError> {
        let Some(store) = &self.textual else {
            return Err(QueryError::UnsupportedBackend {
                backend: Backend::Textual.to_string(),
            });
        };
        let query = render(filter);
        debug!(%query, "executing textual query");
        let page = store.execute(&query, filter.from, filter.quantity)?;
        Ok(Browsing::from_page(page, Vec::new()))
    }
}
