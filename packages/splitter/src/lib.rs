//! UI Bakery Splitter - Split an application export into per-page fragments.
//!
//! An export holds four cross-referencing collections (pages, components,
//! slots and workflows). This crate works out which top-level page owns each
//! element, groups the elements by owner and writes every group as a small
//! set of JSON files under a directory named after the page URL.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use uibakery_splitter::{split_document, Document};
//!
//! let document = Document::from_value(json!({
//!     "rootPageList": [{ "id": "1" }, { "id": "2" }, { "id": "3", "parentPageId": "1" }]
//! }))
//! .unwrap();
//!
//! let fragments = split_document(&document).unwrap();
//! assert_eq!(fragments["1"].len(), 2);
//! assert_eq!(fragments["2"].len(), 1);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Field names, file names and path derivation
//! - [`types`]: Document, element and fragment types
//! - [`error`]: Error types and Result alias
//! - [`index`]: Identifier index over the four collections
//! - [`resolver`]: Per-kind ownership resolution
//! - [`partition`]: Grouping of elements by owner
//! - [`output`]: Output layout and the filesystem boundary
//! - [`cli`]: Command-line interface
//! - [`splitter`]: Main splitter service

pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod partition;
pub mod resolver;
pub mod splitter;
pub mod types;

// Re-export main functions
pub use splitter::{load_document, plan_split, split_document, split_export, summarize};

// Re-export commonly used items
pub use error::{Result, SplitterError};
pub use index::NodeIndex;
pub use output::{FileSink, FsSink, MemorySink};
pub use resolver::OwnerResolver;
pub use types::{CollectionKind, Document, Element, Fragment, Fragments, Owner};
