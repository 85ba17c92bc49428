//! Errors raised by the query service and label resolver clients

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid SPARQL JSON results: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid SPARQL XML results at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("unexpected document structure: {0}")]
    Structure(String),
}

#[derive(Debug, Error)]
pub enum SparqlError {
    #[error("cannot reach SPARQL endpoint {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("SPARQL endpoint {endpoint} answered {status}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("cannot decode results from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: FormatError,
    },
}

pub type Result<T> = std::result::Result<T, SparqlError>;
