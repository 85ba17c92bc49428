//! SPARQL collaborators for classmap
//!
//! This crate talks to the outside world: it runs the fixed queries
//! against a triple store, decodes SPARQL JSON/XML results into the
//! core tabular model, and looks up Wikidata labels.

pub mod client;
pub mod error;
pub mod format;
pub mod labels;
pub mod queries;
pub mod sources;


pub use client::{QueryService, SparqlClient};
pub use error::{FormatError, SparqlError};
pub use labels::{resolve_labels_or_fallback, LabelResolver, NoLabels, WikidataLabels};
