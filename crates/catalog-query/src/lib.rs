//! Faceted search query pipeline for catalog browsing.
//!
//! This crate turns browse requests into search-engine queries and labels the
//! facets that come back:
//! - **Normalization**: raw request parameters into a [`FacetFilter`]
//! - **Compilation**: a [`FacetFilter`] into a [`StructuredQuery`] tree
//! - **Rendering**: a [`FacetFilter`] into a flat textual query string
//! - **Filter hooks**: per-deployment routing of filter keys to scoring or gating clauses
//! - **Labels**: display labels for facet values via an id/name scan
//! - **Browsing**: the above wired together against a [`SearchStore`]
//!
//! Nothing here depends on a search engine. Stores translate the query tree
//! into their own representation.
//!
//! # Example
//!
//! ```
//! use catalog_query::{Normalizer, Params, QueryCompiler, render};
//!
//! let params = Params::from_pairs([("query", "cloud"), ("category", "compute,storage")]);
//! let filter = Normalizer::default().normalize(&params).unwrap();
//!
//! let query = QueryCompiler::new().compile(&filter);
//! assert_eq!(query.minimum_should_match, 1);
//!
//! let text = render(&filter);
//! assert!(text.ends_with("AND ( category=compute OR category=storage )"));
//! ```

#![warn(missing_docs)]

mod ast;
mod browse;
mod compile;
mod error;
mod facet;
mod filter;
mod hook;
mod keyword;
mod labels;
mod normalize;
mod params;
mod render;
mod store;

pub use ast::{Clause, DisMax, MatchExpr, StructuredQuery};
pub use browse::{Backend, BrowseSettings, Browser, Browsing, DEFAULT_BUCKET_SIZE};
pub use compile::{QueryCompiler, boost};
pub use error::{QueryError, StoreError};
pub use facet::{Facet, FacetValue};
pub use filter::{
    DEFAULT_QUANTITY, DEFAULT_SEARCH_FIELDS, FROM_PARAM, FacetFilter, ORDER_FIELD_PARAM,
    ORDER_PARAM, OrderBy, QUANTITY_PARAM, QUERY_PARAM, RESERVED_PARAMS, SEARCH_FIELDS_PARAM,
    SortDirection,
};
pub use hook::{ClauseClass, FilterHook, FilterKeys, MustByDefault};
pub use keyword::{
    FRAGMENT_DELIMITERS, KeywordParts, SHORT_KEYWORD_MAX_CHARS, analyze as analyze_keyword,
};
pub use labels::{
    DEFAULT_MAX_QUANTITY, IdNameIndex, LabelResolver, LabelSettings, fallback_label, proper_case,
};
pub use normalize::{Normalizer, NormalizerSettings};
pub use params::{FilterMap, Params};
pub use render::render;
pub use store::{Document, Page, SearchStore, TextualQueryStore};
