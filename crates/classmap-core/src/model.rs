//! Core data structures for class usage and equivalence clusters

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display segment of an IRI: text after the last `/`, then after the last `#`.
pub fn local_name(iri: &str) -> &str {
    let tail = iri.rsplit('/').next().unwrap_or(iri);
    tail.rsplit('#').next().unwrap_or(tail)
}

macro_rules! iri_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(iri: impl Into<String>) -> Self {
                $name(iri.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Last path/fragment segment of the IRI.
            pub fn local_name(&self) -> &str {
                local_name(&self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(iri: &str) -> Self {
                $name(iri.to_string())
            }
        }

        impl From<String> for $name {
            fn from(iri: String) -> Self {
                $name(iri)
            }
        }
    };
}

iri_newtype!(
    /// IRI of an ontology class, the unit being clustered.
    ClassId
);

iri_newtype!(
    /// IRI of a schema/knowledge graph under analysis.
    GraphId
);

iri_newtype!(
    /// Third-party identifier (e.g. a Wikidata entity) that groups classes.
    /// Never a cluster member itself.
    MediatorKey
);

/// IRI prefix identifying Wikidata entities.
pub const WIKIDATA_ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

impl MediatorKey {
    /// Entity id (e.g. `Q42`) when the key is a plain Wikidata entity IRI.
    pub fn wikidata_id(&self) -> Option<&str> {
        self.0
            .strip_prefix(WIKIDATA_ENTITY_PREFIX)
            .filter(|id| !id.is_empty() && !id.contains(['/', '#']))
    }
}

/// One (graph, class, count) observation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UsageRecord {
    pub graph: GraphId,
    pub class: ClassId,
    pub count: u64,
}

/// A symmetric "same concept" assertion between two distinct classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationFact {
    pub a: ClassId,
    pub b: ClassId,
}

impl RelationFact {
    /// Returns `None` for a self pair, which carries no information.
    pub fn new(a: ClassId, b: ClassId) -> Option<Self> {
        if a == b {
            None
        } else {
            Some(RelationFact { a, b })
        }
    }
}

/// A class declaring a link to a mediator key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediatorLink {
    pub class: ClassId,
    pub key: MediatorKey,
}

/// Evidence channel that produced a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EvidenceKind {
    /// One class used by two or more graphs.
    SharedUsage,
    /// Classes connected by SKOS mapping relations.
    DirectRelation,
    /// Classes linked to the same mediator key.
    MediatedIdentity,
}

impl EvidenceKind {
    /// Type tag written to the output document.
    pub fn type_tag(self) -> &'static str {
        match self {
            EvidenceKind::SharedUsage => "SharedClassEquivalence",
            EvidenceKind::DirectRelation => "DirectClassEquivalence",
            EvidenceKind::MediatedIdentity => "WikidataEquivalence",
        }
    }

    /// Segment used in synthetic cluster identifiers.
    pub fn id_segment(self) -> &'static str {
        match self {
            EvidenceKind::SharedUsage => "shared",
            EvidenceKind::DirectRelation => "direct",
            EvidenceKind::MediatedIdentity => "wikidata",
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvidenceKind::SharedUsage => "shared-usage",
            EvidenceKind::DirectRelation => "direct-relation",
            EvidenceKind::MediatedIdentity => "mediated-identity",
        };
        f.write_str(name)
    }
}

/// A group of classes believed equivalent, with usage provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceCluster {
    /// Synthetic identifier, stable across reruns on unchanged input.
    pub id: String,
    pub kind: EvidenceKind,
    pub label: String,
    /// Member classes, ascending. A single class for shared usage.
    pub members: Vec<ClassId>,
    /// Only set for mediated identity clusters.
    pub mediator: Option<MediatorKey>,
    /// Distinct graphs using any member, ascending. Always two or more.
    pub graphs: Vec<GraphId>,
    /// Every (graph, member) pair that occurs, sorted by graph then class.
    pub usage: Vec<UsageRecord>,
}
