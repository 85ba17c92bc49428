//! CLI command implementations

use anyhow::Context;
use classmap_core::{
    assemble, build_report, direct_relation, mediated_identity, render_report, restrict_relations,
    shared_usage, to_turtle, DocumentHeader, EquivalenceCluster, MediatorKey, MediatorLinks,
};
use classmap_sparql::client::DEFAULT_USER_AGENT;
use classmap_sparql::queries::WIKIDATA_ENDPOINT;
use classmap_sparql::sources::{
    defined_from_results, fetch_direct_relations, fetch_mediator_links, fetch_usage,
    usage_from_results,
};
use classmap_sparql::{
    format, resolve_labels_or_fallback, LabelResolver, QueryService, SparqlClient, WikidataLabels,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_OUTPUT: &str = "../docker-backend/_precomputed_equivalences.ttl";

/// Input files expected by the class usage report.
pub const DEFINED_CLASSES_FILE: &str = "defined_classes.xml";
pub const USED_CLASSES_FILE: &str = "used_classes.xml";

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub endpoint: String,
    pub output: PathBuf,
    pub label_endpoint: String,
    pub user_agent: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            label_endpoint: WIKIDATA_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Run every evidence channel and assemble the clusters.
///
/// Any query failure aborts the run. Label lookup failures do not.
pub async fn generate(
    service: &dyn QueryService,
    resolver: &dyn LabelResolver,
) -> anyhow::Result<Vec<EquivalenceCluster>> {
    tracing::info!("Using SPARQL endpoint {}", service.endpoint());

    let index = fetch_usage(service)
        .await
        .context("failed to query class usage")?;

    let mut candidates = shared_usage(&index);
    tracing::info!("Found {} shared-class equivalences", candidates.len());

    let facts = fetch_direct_relations(service)
        .await
        .context("failed to query SKOS relations")?;
    let facts = restrict_relations(facts, &index);
    let direct = direct_relation(&index, &facts);
    tracing::info!("Found {} direct SKOS equivalence groups", direct.len());
    candidates.extend(direct);

    let links = fetch_mediator_links(service)
        .await
        .context("failed to query Wikidata links")?;
    let links = MediatorLinks::restricted(links, &index);
    let mediated = mediated_identity(&index, &links);
    tracing::info!("Found {} Wikidata-mediated equivalences", mediated.len());

    let keys: Vec<MediatorKey> = mediated
        .iter()
        .filter_map(|c| c.mediator.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let labels = if keys.is_empty() {
        Default::default()
    } else {
        resolve_labels_or_fallback(resolver, &keys).await
    };
    candidates.extend(mediated);

    Ok(assemble(&index, candidates, &labels))
}

/// Generate clusters from the configured endpoints and write the Turtle file.
pub async fn run_generate(config: &GenerateConfig) -> anyhow::Result<()> {
    let service = SparqlClient::new(config.endpoint.as_str()).with_user_agent(config.user_agent.as_str());
    let resolver = WikidataLabels::with_service(
        SparqlClient::new(config.label_endpoint.as_str()).with_user_agent(config.user_agent.as_str()),
    );

    let clusters = generate(&service, &resolver).await?;
    let header = DocumentHeader {
        generated_at: Some(chrono::Utc::now().to_rfc3339()),
    };
    write_document(&config.output, &to_turtle(&clusters, &header))?;

    tracing::info!("Wrote {} equivalences to {}", clusters.len(), config.output.display());
    Ok(())
}

/// Write `contents` to `path`, creating missing parent directories.
pub fn write_document(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn read_results(dir: &Path, name: &str) -> anyhow::Result<classmap_core::ResultSet> {
    let path = dir.join(name);
    let body = fs::read_to_string(&path).with_context(|| {
        format!(
            "cannot read {} (export the query results to {} first)",
            path.display(),
            name
        )
    })?;
    format::decode(&body, None).with_context(|| format!("cannot parse {}", path.display()))
}

/// Build the defined-vs-used report from exported result files in `dir`.
pub fn run_report(dir: &Path) -> anyhow::Result<String> {
    tracing::info!("Reading query results from {}", dir.display());

    let defined = defined_from_results(&read_results(dir, DEFINED_CLASSES_FILE)?);
    let used = usage_from_results(&read_results(dir, USED_CLASSES_FILE)?);
    tracing::info!(
        "Loaded {} defined and {} used classes",
        defined.len(),
        used.len()
    );

    Ok(render_report(&build_report(&defined, &used)))
}
