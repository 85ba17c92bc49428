//! Turns evidence candidates into canonical, ordered cluster records

use std::collections::{BTreeSet, HashMap};

use sha2::{Digest, Sha256};

use crate::evidence::Candidate;
use crate::model::{EquivalenceCluster, EvidenceKind, GraphId, MediatorKey, UsageRecord};
use crate::usage::UsageIndex;

/// First 8 hex digits of the SHA-256 of `input`.
pub fn short_hash(input: &str) -> String {
    hex::encode(&Sha256::digest(input.as_bytes())[..4])
}

/// Every (graph, member) pair that occurs, sorted by graph then class.
fn provenance(index: &UsageIndex, candidate: &Candidate) -> Vec<UsageRecord> {
    let mut usage: Vec<UsageRecord> = candidate
        .members
        .iter()
        .flat_map(|class| {
            index.graphs_using(class).into_iter().filter_map(move |graph| {
                let count = index.count_of(&graph, class)?;
                Some(UsageRecord {
                    graph,
                    class: class.clone(),
                    count,
                })
            })
        })
        .collect();
    usage.sort();
    usage
}

fn cluster_id(candidate: &Candidate) -> String {
    let suffix = match (candidate.kind, &candidate.mediator) {
        // Non-entity keys may share a last segment with an entity IRI.
        (EvidenceKind::MediatedIdentity, Some(key)) => match key.wikidata_id() {
            Some(id) => id.to_string(),
            None => short_hash(key.as_str()),
        },
        _ => {
            let joined: String = candidate.members.iter().map(|c| c.as_str()).collect();
            short_hash(&joined)
        }
    };
    format!("equiv-{}-{}", candidate.kind.id_segment(), suffix)
}

fn cluster_label(candidate: &Candidate, labels: &HashMap<MediatorKey, String>) -> String {
    let first = candidate
        .members
        .iter()
        .next()
        .map(|c| c.local_name())
        .unwrap_or_default();
    match candidate.kind {
        EvidenceKind::SharedUsage => format!("Shared: {}", first),
        EvidenceKind::DirectRelation => format!("SKOS: {}", first),
        EvidenceKind::MediatedIdentity => match &candidate.mediator {
            Some(key) => labels
                .get(key)
                .cloned()
                .unwrap_or_else(|| key.local_name().to_string()),
            None => first.to_string(),
        },
    }
}

/// Build one cluster record; `None` if its usage spans fewer than two graphs.
pub fn assemble_one(
    index: &UsageIndex,
    candidate: &Candidate,
    labels: &HashMap<MediatorKey, String>,
) -> Option<EquivalenceCluster> {
    let usage = provenance(index, candidate);
    let graphs: BTreeSet<GraphId> = usage.iter().map(|u| u.graph.clone()).collect();
    if graphs.len() < 2 {
        tracing::debug!(
            "Dropping {} candidate {:?}: spans {} graph(s)",
            candidate.kind,
            candidate.members,
            graphs.len()
        );
        return None;
    }

    Some(EquivalenceCluster {
        id: cluster_id(candidate),
        kind: candidate.kind,
        label: cluster_label(candidate, labels),
        members: candidate.members.iter().cloned().collect(),
        mediator: candidate.mediator.clone(),
        graphs: graphs.into_iter().collect(),
        usage,
    })
}

/// Assemble all candidates. Output is ordered by evidence kind
/// (shared, direct, mediated), then by identifier.
pub fn assemble(
    index: &UsageIndex,
    candidates: impl IntoIterator<Item = Candidate>,
    labels: &HashMap<MediatorKey, String>,
) -> Vec<EquivalenceCluster> {
    let mut clusters: Vec<EquivalenceCluster> = candidates
        .into_iter()
        .filter_map(|candidate| assemble_one(index, &candidate, labels))
        .collect();
    clusters.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.id.cmp(&b.id)));

    for pair in clusters.windows(2) {
        if pair[0].id == pair[1].id {
            tracing::warn!("Duplicate cluster identifier {}", pair[0].id);
        }
    }

    tracing::info!("Assembled {} equivalences", clusters.len());
    clusters
}
