//! Turtle serializer for equivalence clusters.
//!
//! Produces the precomputed-equivalences document loaded by the graph store.
//! Cluster order is kept exactly as given, so identical input yields a
//! byte-identical document (apart from the optional timestamp header).

use crate::model::{EquivalenceCluster, EvidenceKind, UsageRecord};

/// Predicate and prefix names of the output vocabulary.
pub mod vocab {
    pub const VERSION: &str = "1";

    pub const OKN: &str = "https://purl.org/okn/";
    pub const OKNS: &str = "https://purl.org/okn/schema/";
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const LABEL: &str = "rdfs:label";
    pub const SHARED_CLASS: &str = "okn:sharedClass";
    pub const EQUIVALENT_CLASS: &str = "okn:equivalentClass";
    pub const WIKIDATA_ENTITY: &str = "okn:wikidataEntity";
    pub const IN_GRAPH: &str = "okn:inGraph";
    pub const USAGE: &str = "okn:usage";
    pub const GRAPH: &str = "okn:graph";
    pub const CLASS: &str = "okn:class";
    pub const COUNT: &str = "okn:count";
}

/// Comment header written above the prefixes.
#[derive(Debug, Clone, Default)]
pub struct DocumentHeader {
    /// RFC 3339 generation time; omitted when `None`.
    pub generated_at: Option<String>,
}

/// Serializes clusters to a complete Turtle document.
#[must_use]
pub fn to_turtle(clusters: &[EquivalenceCluster], header: &DocumentHeader) -> String {
    let mut out = String::with_capacity(512 + clusters.len() * 512);

    out.push_str("# Precomputed Equivalence Relationships for OKN Map\n");
    if let Some(ts) = &header.generated_at {
        out.push_str(&format!("# Generated: {}\n", ts));
    }
    out.push_str(&format!("# Total equivalences: {}\n", clusters.len()));
    out.push_str(&format!("# Vocabulary version: {}\n\n", vocab::VERSION));

    for (prefix, iri) in [
        ("okn", vocab::OKN),
        ("okns", vocab::OKNS),
        ("rdf", vocab::RDF),
        ("rdfs", vocab::RDFS),
        ("xsd", vocab::XSD),
    ] {
        out.push_str(&format!("@prefix {}: <{}> .\n", prefix, iri));
    }

    for cluster in clusters {
        out.push('\n');
        out.push_str(&cluster_to_turtle(cluster));
    }

    out
}

/// Serializes one cluster as a top-level subject block ending in ` .\n`.
#[must_use]
pub fn cluster_to_turtle(cluster: &EquivalenceCluster) -> String {
    let mut parts = vec![
        format!("a okn:{}", cluster.kind.type_tag()),
        format!("{} {}", vocab::LABEL, turtle_string(&cluster.label)),
    ];

    match cluster.kind {
        EvidenceKind::SharedUsage => {
            for class in &cluster.members {
                parts.push(format!("{} {}", vocab::SHARED_CLASS, iri_ref(class.as_str())));
            }
        }
        EvidenceKind::DirectRelation => {
            for class in &cluster.members {
                parts.push(format!("{} {}", vocab::EQUIVALENT_CLASS, iri_ref(class.as_str())));
            }
        }
        EvidenceKind::MediatedIdentity => {
            if let Some(key) = &cluster.mediator {
                parts.push(format!("{} {}", vocab::WIKIDATA_ENTITY, iri_ref(key.as_str())));
            }
            for class in &cluster.members {
                parts.push(format!("{} {}", vocab::EQUIVALENT_CLASS, iri_ref(class.as_str())));
            }
        }
    }

    for graph in &cluster.graphs {
        parts.push(format!("{} {}", vocab::IN_GRAPH, iri_ref(graph.as_str())));
    }

    for usage in &cluster.usage {
        parts.push(usage_block(usage));
    }

    format!("okn:{} {} .\n", cluster.id, parts.join(" ;\n    "))
}

fn usage_block(usage: &UsageRecord) -> String {
    format!(
        "{} [\n        {} {} ;\n        {} {} ;\n        {} {}\n    ]",
        vocab::USAGE,
        vocab::GRAPH,
        iri_ref(usage.graph.as_str()),
        vocab::CLASS,
        iri_ref(usage.class.as_str()),
        vocab::COUNT,
        usage.count
    )
}

fn turtle_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{}\"", escaped)
}

/// `<iri>` with characters Turtle forbids in IRIREF percent-encoded.
fn iri_ref(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len() + 2);
    out.push('<');
    for c in iri.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\u{0}'..='\u{20}' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out.push('>');
    out
}
