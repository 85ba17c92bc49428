//! Test utilities for building usage and relation fixtures

use crate::model::{ClassId, GraphId, MediatorKey, MediatorLink, RelationFact};
use crate::usage::UsageIndex;

pub fn class(name: &str) -> ClassId {
    ClassId::new(format!("http://example.org/class/{}", name))
}

pub fn graph(name: &str) -> GraphId {
    GraphId::new(format!("https://purl.org/okn/graph/{}", name))
}

pub fn key(name: &str) -> MediatorKey {
    MediatorKey::new(format!("http://www.wikidata.org/entity/{}", name))
}

pub fn fact(a: &str, b: &str) -> RelationFact {
    RelationFact::new(class(a), class(b)).expect("fixture pairs are distinct")
}

pub fn link(class_name: &str, key_name: &str) -> MediatorLink {
    MediatorLink {
        class: class(class_name),
        key: key(key_name),
    }
}

/// Build an index from (graph, class, count) short names.
pub fn usage(entries: &[(&str, &str, u64)]) -> UsageIndex {
    let mut index = UsageIndex::new();
    for (g, c, n) in entries {
        index.record(graph(g), class(c), *n);
    }
    index
}
