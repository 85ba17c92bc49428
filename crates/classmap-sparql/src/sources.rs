//! Row adapters turning query results into usage, relation and link facts.
//!
//! Rows missing an expected field are logged and skipped. Self-referential
//! relation rows are dropped silently.

use classmap_core::report::DefinedIndex;
use classmap_core::{ClassId, GraphId, MediatorKey, MediatorLink, RelationFact, ResultSet, Row, RowError, UsageIndex};

use crate::client::QueryService;
use crate::error::Result;
use crate::queries;

fn usage_row(row: &Row) -> std::result::Result<(GraphId, ClassId, u64, Option<String>), RowError> {
    let graph = GraphId::from(row.require("graph")?);
    let class = ClassId::from(row.require("classUri")?);
    let count = row.count_or("count", 0)?;
    let label = row.value("graphLabel").map(str::to_string);
    Ok((graph, class, count, label))
}

/// Build a usage index from rows binding `graph`, `classUri`, `count`, `graphLabel`.
pub fn usage_from_results(results: &ResultSet) -> UsageIndex {
    let mut index = UsageIndex::new();
    for (i, row) in results.rows.iter().enumerate() {
        match usage_row(row) {
            Ok((graph, class, count, label)) => {
                if let Some(label) = label {
                    index.set_graph_label(graph.clone(), label);
                }
                index.record(graph, class, count);
            }
            Err(e) => tracing::warn!("Row {} skipped: {}", i, e),
        }
    }
    index
}

/// Build defined classes per graph from rows binding `graph`, `classUri`, `graphLabel`.
pub fn defined_from_results(results: &ResultSet) -> DefinedIndex {
    let mut index = DefinedIndex::new();
    for (i, row) in results.rows.iter().enumerate() {
        let fields = row
            .require("graph")
            .and_then(|g| Ok((g, row.require("classUri")?)));
        match fields {
            Ok((graph, class)) => {
                let graph = GraphId::from(graph);
                if let Some(label) = row.value("graphLabel") {
                    index.set_graph_label(graph.clone(), label);
                }
                index.define(graph, ClassId::from(class));
            }
            Err(e) => tracing::warn!("Row {} skipped: {}", i, e),
        }
    }
    index
}

/// Relation facts from rows binding `class1`, `class2`.
pub fn relations_from_results(results: &ResultSet) -> Vec<RelationFact> {
    let mut facts = Vec::with_capacity(results.len());
    for (i, row) in results.rows.iter().enumerate() {
        let (Some(a), Some(b)) = (row.value("class1"), row.value("class2")) else {
            tracing::warn!("Row {} missing class1 or class2: {:?}", i, row);
            continue;
        };
        if let Some(fact) = RelationFact::new(ClassId::from(a), ClassId::from(b)) {
            facts.push(fact);
        }
    }
    facts
}

/// Mediator links from rows binding `class`, `wikidata`.
pub fn mediator_links_from_results(results: &ResultSet) -> Vec<MediatorLink> {
    let mut links = Vec::with_capacity(results.len());
    for (i, row) in results.rows.iter().enumerate() {
        let (Some(class), Some(key)) = (row.value("class"), row.value("wikidata")) else {
            tracing::warn!("Row {} missing class or wikidata: {:?}", i, row);
            continue;
        };
        links.push(MediatorLink {
            class: ClassId::from(class),
            key: MediatorKey::from(key),
        });
    }
    links
}

pub async fn fetch_usage(service: &dyn QueryService) -> Result<UsageIndex> {
    tracing::info!("Querying used classes...");
    let results = service.select(queries::USED_CLASSES).await?;
    let index = usage_from_results(&results);
    tracing::info!(
        "Found {} graphs with {} used classes",
        index.graph_count(),
        index.len()
    );
    Ok(index)
}

pub async fn fetch_direct_relations(service: &dyn QueryService) -> Result<Vec<RelationFact>> {
    tracing::info!("Querying direct SKOS relationships...");
    let results = service.select(queries::DIRECT_RELATIONS).await?;
    tracing::info!("Found {} total SKOS relationships", results.len());
    Ok(relations_from_results(&results))
}

pub async fn fetch_mediator_links(service: &dyn QueryService) -> Result<Vec<MediatorLink>> {
    tracing::info!("Querying Wikidata relationships...");
    let results = service.select(queries::WIKIDATA_LINKS).await?;
    tracing::info!("Found {} total class-to-Wikidata links", results.len());
    Ok(mediator_links_from_results(&results))
}
