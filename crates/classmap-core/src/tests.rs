//! Unit tests for classmap-core: end-to-end clustering scenarios

use crate::test_utils::*;
use crate::*;
use std::collections::HashMap;

fn cluster_all(
    index: &UsageIndex,
    facts: &[RelationFact],
    links: &MediatorLinks,
    labels: &HashMap<MediatorKey, String>,
) -> Vec<EquivalenceCluster> {
    let mut candidates = shared_usage(index);
    candidates.extend(direct_relation(index, facts));
    candidates.extend(mediated_identity(index, links));
    assemble(index, candidates, labels)
}

#[test]
fn test_usage_overwrites_not_accumulates() {
    let mut index = UsageIndex::new();
    index.record(graph("G"), class("C"), 5);
    index.record(graph("G"), class("C"), 9);

    assert_eq!(index.count_of(&graph("G"), &class("C")), Some(9));
    assert_eq!(index.len(), 1);
    assert_eq!(index.count_of(&graph("G"), &class("missing")), None);
}

#[test]
fn test_usage_views() {
    let index = usage(&[("A", "X", 1), ("A", "Y", 2), ("B", "X", 3)]);

    assert_eq!(index.used_classes(&graph("A")).len(), 2);
    assert_eq!(index.all_used_classes().len(), 2);
    assert_eq!(index.graphs_using(&class("X")).len(), 2);
    assert!(index.graphs_using(&class("Z")).is_empty());
    assert_eq!(index.graph_count(), 2);
    assert_eq!(index.records().count(), 3);
}

#[test]
fn test_shared_class_across_two_graphs() {
    let index = usage(&[("A", "X", 3), ("B", "X", 7)]);
    let clusters = cluster_all(&index, &[], &MediatorLinks::new(), &HashMap::new());

    assert_eq!(clusters.len(), 1);
    let c = &clusters[0];
    assert_eq!(c.kind, EvidenceKind::SharedUsage);
    assert_eq!(c.members, vec![class("X")]);
    assert_eq!(c.graphs, vec![graph("A"), graph("B")]);
    let usage: Vec<(GraphId, ClassId, u64)> = c
        .usage
        .iter()
        .map(|u| (u.graph.clone(), u.class.clone(), u.count))
        .collect();
    assert_eq!(
        usage,
        vec![(graph("A"), class("X"), 3), (graph("B"), class("X"), 7)]
    );
}

#[test]
fn test_relation_chain_through_unused_class() {
    let index = usage(&[("A", "X", 1), ("B", "Z", 1)]);
    let facts = [fact("X", "Y"), fact("Y", "Z")];
    let clusters = cluster_all(&index, &facts, &MediatorLinks::new(), &HashMap::new());

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].kind, EvidenceKind::DirectRelation);
    assert_eq!(clusters[0].members, vec![class("X"), class("Y"), class("Z")]);
    assert_eq!(clusters[0].graphs, vec![graph("A"), graph("B")]);
}

#[test]
fn test_relation_within_one_graph_is_not_emitted() {
    let index = usage(&[("A", "X", 1), ("A", "Y", 1)]);
    let clusters = cluster_all(&index, &[fact("X", "Y")], &MediatorLinks::new(), &HashMap::new());
    assert!(clusters.is_empty());
}

#[test]
fn test_mediated_cluster_without_label() {
    let index = usage(&[("A", "X", 1), ("B", "Y", 1)]);
    let links = MediatorLinks::restricted(vec![link("X", "W"), link("Y", "W")], &index);
    let clusters = cluster_all(&index, &[], &links, &HashMap::new());

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].kind, EvidenceKind::MediatedIdentity);
    assert_eq!(clusters[0].label, "W");
    assert_eq!(clusters[0].mediator, Some(key("W")));
}

#[test]
fn test_self_pairs_are_rejected() {
    assert!(RelationFact::new(class("X"), class("X")).is_none());
    assert!(RelationFact::new(class("X"), class("Y")).is_some());
}

#[test]
fn test_every_cluster_spans_two_graphs() {
    let index = usage(&[
        ("A", "X", 1),
        ("B", "X", 2),
        ("A", "P", 1),
        ("A", "Q", 1),
        ("C", "R", 4),
        ("B", "S", 1),
    ]);
    let facts = [fact("P", "Q"), fact("Q", "R"), fact("X", "S")];
    let links = MediatorLinks::restricted(vec![link("P", "K1"), link("Q", "K1"), link("R", "K2"), link("S", "K2")], &index);
    let clusters = cluster_all(&index, &facts, &links, &HashMap::new());

    assert!(!clusters.is_empty());
    for c in &clusters {
        let graphs: std::collections::BTreeSet<&GraphId> = c.usage.iter().map(|u| &u.graph).collect();
        assert!(graphs.len() >= 2, "{} spans {} graph(s)", c.id, graphs.len());
        assert!(!c.usage.is_empty());
    }
    // K1 groups P and Q, both only in graph A.
    assert!(clusters.iter().all(|c| c.mediator != Some(key("K1"))));
}

#[test]
fn test_assembly_is_idempotent_and_byte_stable() {
    let index = usage(&[("A", "X", 1), ("B", "X", 2), ("B", "Y", 4), ("C", "Z", 5)]);
    let facts = [fact("Z", "Y"), fact("X", "Y")];
    let links = MediatorLinks::restricted(vec![link("Y", "Q1"), link("Z", "Q1")], &index);

    let first = cluster_all(&index, &facts, &links, &HashMap::new());
    let second = cluster_all(&index, &facts, &links, &HashMap::new());
    assert_eq!(first, second);

    let header = DocumentHeader::default();
    assert_eq!(to_turtle(&first, &header), to_turtle(&second, &header));
}

#[test]
fn test_cluster_serialization() {
    let index = usage(&[("A", "X", 3), ("B", "X", 7)]);
    let clusters = cluster_all(&index, &[], &MediatorLinks::new(), &HashMap::new());

    let json = serde_json::to_string(&clusters[0]).unwrap();
    let back: EquivalenceCluster = serde_json::from_str(&json).unwrap();
    assert_eq!(back, clusters[0]);
    assert!(json.contains("\"kind\":\"SharedUsage\""));
}

#[test]
fn test_local_name() {
    assert_eq!(local_name("http://example.org/onto#Person"), "Person");
    assert_eq!(local_name("https://schema.org/Place"), "Place");
    assert_eq!(local_name("urn:x"), "urn:x");
    assert_eq!(local_name("http://example.org/dir/"), "");
}

#[test]
fn test_row_helpers() {
    let row = Row::new()
        .with("graph", Term::Iri("https://g.org/A".to_string()))
        .with("count", Term::Literal(" 12 ".to_string()));

    assert_eq!(row.require("graph"), Ok("https://g.org/A"));
    assert_eq!(row.require("classUri"), Err(RowError::MissingField("classUri".to_string())));
    assert_eq!(row.count_or("count", 0), Ok(12));
    assert_eq!(row.count_or("absent", 0), Ok(0));
    assert!(Row::new().with("count", Term::Literal("x".into())).count_or("count", 0).is_err());
    assert!(row.get("graph").is_some_and(Term::is_iri));
}
