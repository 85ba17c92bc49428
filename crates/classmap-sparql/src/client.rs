//! Query service: runs a SELECT against a SPARQL endpoint

use async_trait::async_trait;
use classmap_core::ResultSet;

use crate::error::{Result, SparqlError};
use crate::format;

/// Something that answers SELECT queries with tabular results.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Run one query. Every failure is returned; callers decide whether it is fatal.
    async fn select(&self, query: &str) -> Result<ResultSet>;

    /// Endpoint URL, for logging.
    fn endpoint(&self) -> &str;
}

pub const DEFAULT_USER_AGENT: &str = concat!("classmap/", env!("CARGO_PKG_VERSION"));

/// HTTP SPARQL protocol client (GET with `?query=`).
pub struct SparqlClient {
    client: reqwest::Client,
    endpoint: String,
    user_agent: String,
}

impl SparqlClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Wikidata rejects requests without a descriptive user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl QueryService for SparqlClient {
    async fn select(&self, query: &str) -> Result<ResultSet> {
        tracing::debug!("GET {} ({} byte query)", self.endpoint, query.len());

        let connect = |source| SparqlError::Connect {
            endpoint: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query)])
            .header(reqwest::header::ACCEPT, format::ACCEPT)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(connect)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(connect)?;

        if !status.is_success() {
            return Err(SparqlError::Status {
                endpoint: self.endpoint.clone(),
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let results = format::decode(&body, content_type.as_deref()).map_err(|source| {
            SparqlError::Decode {
                endpoint: self.endpoint.clone(),
                source,
            }
        })?;
        tracing::debug!("{} rows from {}", results.len(), self.endpoint);
        Ok(results)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
