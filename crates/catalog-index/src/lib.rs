//! Tantivy-backed search store for catalog.
//!
//! This crate owns everything engine-specific:
//! - the index schema, derived from the `[index]` settings
//! - document ingestion from JSON Lines or JSON array files
//! - translation of compiled queries into Tantivy queries
//! - [`TantivyStore`], the `SearchStore` the browse pipeline runs against
//! - index location and layout tracking
//!
//! # Example
//!
//! ```no_run
//! use catalog_config::Config;
//! use catalog_index::{TantivyStore, load_documents, rebuild_index};
//! use catalog_query::{Browser, Params};
//!
//! let config = Config::load(".".as_ref()).unwrap();
//! let documents = load_documents("catalogue.jsonl".as_ref()).unwrap();
//! rebuild_index(&config, &documents).unwrap();
//!
//! let store = TantivyStore::open_with_config(&config).unwrap();
//! let browsing = Browser::new(store)
//!     .browse(&Params::from_pairs([("query", "cloud")]))
//!     .unwrap();
//! println!("{} matches", browsing.total);
//! ```

#![warn(missing_docs)]

mod analyzer;
mod document;
mod error;
mod indexer;
mod ingest;
mod layout;
mod location;
mod schema;
mod store;
mod textual;
mod translate;
mod writer;

pub use analyzer::{CATALOG_TOKENIZER, build_analyzer, build_analyzer_from_name, parse_language};
pub use document::CatalogDocument;
pub use error::IndexError;
pub use indexer::{IndexSummary, rebuild_index};
pub use ingest::{load_documents, parse_documents};
pub use layout::{
    IndexLayout, IndexStatus, SCHEMA_VERSION, compute_layout_hash, detect_index_status,
    read_stored_hash, write_layout_hash,
};
pub use location::{DATA_DIR, global_index_directory, index_directory, layout_hash_path};
pub use schema::{CatalogSchema, FieldKind};
pub use store::TantivyStore;
pub use textual::parse_textual;
pub use translate::QueryTranslator;
pub use writer::IndexWriter;
