//! Label resolver: human-readable names for mediator keys

use std::collections::HashMap;

use async_trait::async_trait;
use classmap_core::MediatorKey;

use crate::client::{QueryService, SparqlClient};
use crate::error::Result;
use crate::queries;

/// Best-effort lookup of English labels. Omissions are expected.
#[async_trait]
pub trait LabelResolver: Send + Sync {
    async fn resolve(&self, keys: &[MediatorKey]) -> Result<HashMap<MediatorKey, String>>;

    fn name(&self) -> &str;
}

/// Resolves labels through the public Wikidata query service.
pub struct WikidataLabels<Q = SparqlClient> {
    service: Q,
}

impl WikidataLabels<SparqlClient> {
    pub fn new(user_agent: &str) -> Self {
        Self::with_service(SparqlClient::new(queries::WIKIDATA_ENDPOINT).with_user_agent(user_agent))
    }
}

impl<Q: QueryService> WikidataLabels<Q> {
    pub fn with_service(service: Q) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Q {
        &self.service
    }
}

#[async_trait]
impl<Q: QueryService> LabelResolver for WikidataLabels<Q> {
    async fn resolve(&self, keys: &[MediatorKey]) -> Result<HashMap<MediatorKey, String>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let results = self.service.select(&queries::wikidata_labels(keys)).await?;
        let labels: HashMap<MediatorKey, String> = results
            .into_iter()
            .filter_map(|row| {
                let entity = row.value("entity")?;
                let label = row.value("label")?;
                Some((MediatorKey::from(entity), label.to_string()))
            })
            .collect();
        Ok(labels)
    }

    fn name(&self) -> &str {
        "wikidata"
    }
}

/// Resolver that never finds a label.
pub struct NoLabels;

#[async_trait]
impl LabelResolver for NoLabels {
    async fn resolve(&self, _keys: &[MediatorKey]) -> Result<HashMap<MediatorKey, String>> {
        Ok(HashMap::new())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Resolve labels, degrading any failure to an empty map with a warning.
pub async fn resolve_labels_or_fallback(
    resolver: &dyn LabelResolver,
    keys: &[MediatorKey],
) -> HashMap<MediatorKey, String> {
    tracing::info!("Fetching {} labels from {}", keys.len(), resolver.name());
    match resolver.resolve(keys).await {
        Ok(labels) => {
            tracing::info!("Fetched {} labels", labels.len());
            labels
        }
        Err(e) => {
            tracing::warn!("Could not fetch labels: {}", e);
            tracing::warn!("Continuing with entity IDs as labels");
            HashMap::new()
        }
    }
}
