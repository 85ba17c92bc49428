//! Evidence collectors: three independent ways to group classes

use std::collections::{BTreeSet, HashMap};

use crate::merger::DisjointSet;
use crate::model::{ClassId, EvidenceKind, GraphId, MediatorKey, MediatorLink, RelationFact};
use crate::usage::UsageIndex;

/// A grouping proposed by one evidence channel, before assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: EvidenceKind,
    pub members: BTreeSet<ClassId>,
    /// Distinct graphs using any member.
    pub graphs: BTreeSet<GraphId>,
    pub mediator: Option<MediatorKey>,
}

impl Candidate {
    /// True when the candidate carries cross-graph signal.
    pub fn spans_multiple_graphs(&self) -> bool {
        self.graphs.len() >= 2
    }
}

/// Graphs in which any of `members` is used.
pub fn graph_span<'a>(
    index: &UsageIndex,
    members: impl IntoIterator<Item = &'a ClassId>,
) -> BTreeSet<GraphId> {
    members
        .into_iter()
        .flat_map(|class| index.graphs_using(class))
        .collect()
}

/// One candidate per class used in two or more graphs.
pub fn shared_usage(index: &UsageIndex) -> Vec<Candidate> {
    let candidates: Vec<Candidate> = index
        .all_used_classes()
        .into_iter()
        .filter_map(|class| {
            let graphs: BTreeSet<GraphId> = index.graphs_using(&class).into_iter().collect();
            (graphs.len() >= 2).then(|| Candidate {
                kind: EvidenceKind::SharedUsage,
                members: BTreeSet::from([class]),
                graphs,
                mediator: None,
            })
        })
        .collect();

    tracing::info!("Found {} shared classes", candidates.len());
    candidates
}

/// Keep only facts whose endpoints are both used by some graph.
pub fn restrict_relations(facts: Vec<RelationFact>, index: &UsageIndex) -> Vec<RelationFact> {
    let total = facts.len();
    let kept: Vec<RelationFact> = facts
        .into_iter()
        .filter(|fact| index.is_used(&fact.a) && index.is_used(&fact.b))
        .collect();
    tracing::info!(
        "Filtered {} relations to {} between used classes",
        total,
        kept.len()
    );
    kept
}

/// Merge related classes with union-find; drop groups used by fewer than two graphs.
///
/// Facts are expected to be restricted by the caller (see [`restrict_relations`]).
pub fn direct_relation(index: &UsageIndex, facts: &[RelationFact]) -> Vec<Candidate> {
    let mut merger = DisjointSet::new();
    for fact in facts {
        if fact.a == fact.b {
            continue;
        }
        merger.add(fact.a.clone());
        merger.add(fact.b.clone());
        merger.union(&fact.a, &fact.b);
    }

    let groups = merger.groups();
    let group_count = groups.len();
    let candidates: Vec<Candidate> = groups
        .into_iter()
        .filter_map(|group| {
            let members: BTreeSet<ClassId> = group.into_iter().collect();
            let graphs = graph_span(index, &members);
            let candidate = Candidate {
                kind: EvidenceKind::DirectRelation,
                members,
                graphs,
                mediator: None,
            };
            candidate.spans_multiple_graphs().then_some(candidate)
        })
        .collect();

    tracing::info!(
        "Found {} relation groups, {} spanning multiple graphs",
        group_count,
        candidates.len()
    );
    candidates
}

/// Class -> mediator key, one key per class.
///
/// When a class links to several keys the last one observed wins.
#[derive(Debug, Clone, Default)]
pub struct MediatorLinks {
    by_class: HashMap<ClassId, MediatorKey>,
}

impl MediatorLinks {
    pub fn new() -> Self {
        MediatorLinks::default()
    }

    /// Build from links, keeping only classes in the used-class universe.
    pub fn restricted(links: impl IntoIterator<Item = MediatorLink>, index: &UsageIndex) -> Self {
        let mut out = MediatorLinks::new();
        let mut total = 0usize;
        for link in links {
            total += 1;
            if index.is_used(&link.class) {
                out.insert(link);
            }
        }
        tracing::info!(
            "Filtered {} mediator links to {} for used classes",
            total,
            out.len()
        );
        out
    }

    pub fn insert(&mut self, link: MediatorLink) {
        if let Some(previous) = self.by_class.insert(link.class.clone(), link.key.clone()) {
            if previous != link.key {
                tracing::debug!(
                    "Class {} links to both {} and {}; keeping {}",
                    link.class,
                    previous,
                    link.key,
                    link.key
                );
            }
        }
    }

    pub fn key_of(&self, class: &ClassId) -> Option<&MediatorKey> {
        self.by_class.get(class)
    }

    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }

    /// Invert to mediator key -> classes.
    pub fn by_key(&self) -> HashMap<MediatorKey, BTreeSet<ClassId>> {
        let mut out: HashMap<MediatorKey, BTreeSet<ClassId>> = HashMap::new();
        for (class, key) in &self.by_class {
            out.entry(key.clone()).or_default().insert(class.clone());
        }
        out
    }
}

/// Group classes sharing a mediator key; keep keys linking two or more
/// classes whose usage spans at least two graphs.
pub fn mediated_identity(index: &UsageIndex, links: &MediatorLinks) -> Vec<Candidate> {
    let groups: Vec<(MediatorKey, BTreeSet<ClassId>)> = links
        .by_key()
        .into_iter()
        .filter(|(_, classes)| classes.len() >= 2)
        .collect();
    let group_count = groups.len();

    let candidates: Vec<Candidate> = groups
        .into_iter()
        .filter_map(|(key, members)| {
            let graphs = graph_span(index, &members);
            let candidate = Candidate {
                kind: EvidenceKind::MediatedIdentity,
                members,
                graphs,
                mediator: Some(key),
            };
            candidate.spans_multiple_graphs().then_some(candidate)
        })
        .collect();

    tracing::info!(
        "Found {} mediator groups, {} spanning multiple graphs",
        group_count,
        candidates.len()
    );
    candidates
}
