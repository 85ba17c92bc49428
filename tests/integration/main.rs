//! Integration tests for classmap
//!
//! These drive the full generator pipeline and the usage report with
//! in-memory query services, so no triple store is needed.

use async_trait::async_trait;
use classmap::commands::{self, GenerateConfig};
use classmap_core::{
    to_turtle, ClassId, DocumentHeader, EvidenceKind, GraphId, MediatorKey, ResultSet, Row, Term,
};
use classmap_sparql::error::Result as SparqlResult;
use classmap_sparql::queries::{DIRECT_RELATIONS, USED_CLASSES, WIKIDATA_LINKS};
use classmap_sparql::{FormatError, LabelResolver, NoLabels, QueryService, SparqlError};
use std::collections::HashMap;
use tempfile::TempDir;

const A: &str = "https://purl.org/okn/graph/a";
const B: &str = "https://purl.org/okn/graph/b";
const W: &str = "http://www.wikidata.org/entity/Q42";

fn class(name: &str) -> String {
    format!("http://example.org/class/{name}")
}

fn usage_row(graph: &str, class_name: &str, count: u64) -> Row {
    Row::new()
        .with("graph", Term::Iri(graph.to_string()))
        .with("classUri", Term::Iri(class(class_name)))
        .with("count", Term::Literal(count.to_string()))
}

fn relation_row(a: &str, b: &str) -> Row {
    Row::new()
        .with("class1", Term::Iri(class(a)))
        .with("class2", Term::Iri(class(b)))
}

fn link_row(class_name: &str, key: &str) -> Row {
    Row::new()
        .with("class", Term::Iri(class(class_name)))
        .with("wikidata", Term::Iri(key.to_string()))
}

fn decode_failure(endpoint: &str, what: &str) -> SparqlError {
    SparqlError::Decode {
        endpoint: endpoint.to_string(),
        source: FormatError::Structure(what.to_string()),
    }
}

/// Answers the fixed pipeline queries from canned result sets.
#[derive(Default)]
struct FakeStore {
    usage: Vec<Row>,
    relations: Vec<Row>,
    links: Vec<Row>,
    fail_on: Option<&'static str>,
}

#[async_trait]
impl QueryService for FakeStore {
    async fn select(&self, query: &str) -> SparqlResult<ResultSet> {
        if self.fail_on == Some(query) {
            return Err(decode_failure(self.endpoint(), "store unavailable"));
        }
        let rows = if query == USED_CLASSES {
            self.usage.clone()
        } else if query == DIRECT_RELATIONS {
            self.relations.clone()
        } else if query == WIKIDATA_LINKS {
            self.links.clone()
        } else {
            return Err(decode_failure(self.endpoint(), "unexpected query"));
        };
        Ok(ResultSet::new(vec![], rows))
    }

    fn endpoint(&self) -> &str {
        "memory://store"
    }
}

struct FixedLabels(HashMap<MediatorKey, String>);

#[async_trait]
impl LabelResolver for FixedLabels {
    async fn resolve(&self, keys: &[MediatorKey]) -> SparqlResult<HashMap<MediatorKey, String>> {
        Ok(keys
            .iter()
            .filter_map(|k| self.0.get(k).map(|l| (k.clone(), l.clone())))
            .collect())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct UnreachableLabels;

#[async_trait]
impl LabelResolver for UnreachableLabels {
    async fn resolve(&self, _keys: &[MediatorKey]) -> SparqlResult<HashMap<MediatorKey, String>> {
        Err(decode_failure("memory://labels", "timed out"))
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

#[tokio::test]
async fn test_shared_class_across_two_graphs() {
    let store = FakeStore {
        usage: vec![usage_row(A, "X", 3), usage_row(B, "X", 7)],
        ..Default::default()
    };

    let clusters = commands::generate(&store, &NoLabels).await.unwrap();

    assert_eq!(clusters.len(), 1);
    let cluster = &clusters[0];
    assert_eq!(cluster.kind, EvidenceKind::SharedUsage);
    assert!(cluster.id.starts_with("equiv-shared-"));
    assert_eq!(cluster.label, "Shared: X");
    assert_eq!(cluster.graphs, vec![GraphId::from(A), GraphId::from(B)]);
    let usage: Vec<(&str, u64)> = cluster
        .usage
        .iter()
        .map(|u| (u.graph.as_str(), u.count))
        .collect();
    assert_eq!(usage, vec![(A, 3), (B, 7)]);
}

#[tokio::test]
async fn test_all_three_channels() {
    let store = FakeStore {
        usage: vec![
            usage_row(A, "X", 1),
            usage_row(B, "X", 2),
            usage_row(A, "P", 4),
            usage_row(B, "Q", 5),
            usage_row(A, "M", 6),
            usage_row(B, "N", 7),
        ],
        relations: vec![relation_row("P", "Q"), relation_row("P", "P")],
        links: vec![link_row("M", W), link_row("N", W)],
        ..Default::default()
    };
    let labels = FixedLabels(HashMap::from([(MediatorKey::from(W), "Douglas Adams".to_string())]));

    let clusters = commands::generate(&store, &labels).await.unwrap();

    let kinds: Vec<EvidenceKind> = clusters.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EvidenceKind::SharedUsage,
            EvidenceKind::DirectRelation,
            EvidenceKind::MediatedIdentity,
        ]
    );

    let direct = &clusters[1];
    assert_eq!(direct.members, vec![ClassId::from(class("P")), ClassId::from(class("Q"))]);
    assert_eq!(direct.label, "SKOS: P");

    let mediated = &clusters[2];
    assert_eq!(mediated.id, "equiv-wikidata-Q42");
    assert_eq!(mediated.label, "Douglas Adams");
    assert_eq!(mediated.mediator, Some(MediatorKey::from(W)));
    assert_eq!(mediated.usage.len(), 2);
}

#[tokio::test]
async fn test_single_graph_relation_is_dropped() {
    let store = FakeStore {
        usage: vec![usage_row(A, "X", 1), usage_row(A, "Y", 1)],
        relations: vec![relation_row("X", "Y")],
        ..Default::default()
    };

    let clusters = commands::generate(&store, &NoLabels).await.unwrap();
    assert!(clusters.is_empty());
}

#[tokio::test]
async fn test_relations_through_unused_classes_are_ignored() {
    // Y is unused, so neither fact survives restriction to used classes.
    let store = FakeStore {
        usage: vec![usage_row(A, "X", 1), usage_row(B, "Z", 1)],
        relations: vec![relation_row("X", "Y"), relation_row("Y", "Z")],
        ..Default::default()
    };

    let clusters = commands::generate(&store, &NoLabels).await.unwrap();
    assert!(clusters.is_empty());
}

#[tokio::test]
async fn test_label_failure_falls_back_to_entity_id() {
    let store = FakeStore {
        usage: vec![usage_row(A, "M", 1), usage_row(B, "N", 1)],
        links: vec![link_row("M", W), link_row("N", W)],
        ..Default::default()
    };

    let clusters = commands::generate(&store, &UnreachableLabels).await.unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].kind, EvidenceKind::MediatedIdentity);
    assert_eq!(clusters[0].label, "Q42");
}

#[tokio::test]
async fn test_query_failure_is_fatal() {
    let store = FakeStore {
        usage: vec![usage_row(A, "X", 3), usage_row(B, "X", 7)],
        fail_on: Some(WIKIDATA_LINKS),
        ..Default::default()
    };

    let err = commands::generate(&store, &NoLabels).await.unwrap_err();
    assert!(err.to_string().contains("Wikidata links"));
}

#[tokio::test]
async fn test_unreachable_endpoint_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out").join("equivalences.ttl");
    let config = GenerateConfig {
        endpoint: "http://127.0.0.1:1/sparql".to_string(),
        output: output.clone(),
        ..GenerateConfig::default()
    };

    assert!(commands::run_generate(&config).await.is_err());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_document_is_stable_across_runs() {
    let store = FakeStore {
        usage: vec![
            usage_row(A, "X", 1),
            usage_row(B, "X", 2),
            usage_row(A, "Y", 3),
            usage_row(B, "Y", 4),
        ],
        ..Default::default()
    };
    let header = DocumentHeader::default();

    let first = to_turtle(&commands::generate(&store, &NoLabels).await.unwrap(), &header);
    let second = to_turtle(&commands::generate(&store, &NoLabels).await.unwrap(), &header);

    assert_eq!(first, second);
    assert!(first.contains("# Total equivalences: 2\n"));
    assert_eq!(first.matches("a okn:SharedClassEquivalence").count(), 2);
}

#[test]
fn test_write_document_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("doc.ttl");

    commands::write_document(&path, "# empty\n").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# empty\n");
}

const DEFINED_XML: &str = r#"<?xml version="1.0"?>
<sparql xmlns="http://www.w3.org/2005/sparql-results#">
  <head><variable name="graph"/><variable name="classUri"/><variable name="graphLabel"/></head>
  <results>
    <result>
      <binding name="graph"><uri>https://purl.org/okn/graph/a</uri></binding>
      <binding name="classUri"><uri>http://example.org/class/X</uri></binding>
      <binding name="graphLabel"><literal>Alpha</literal></binding>
    </result>
    <result>
      <binding name="graph"><uri>https://purl.org/okn/graph/a</uri></binding>
      <binding name="classUri"><uri>http://example.org/class/Unused</uri></binding>
    </result>
  </results>
</sparql>"#;

const USED_XML: &str = r#"<?xml version="1.0"?>
<sparql xmlns="http://www.w3.org/2005/sparql-results#">
  <head><variable name="graph"/><variable name="classUri"/><variable name="count"/></head>
  <results>
    <result>
      <binding name="graph"><uri>https://purl.org/okn/graph/a</uri></binding>
      <binding name="classUri"><uri>http://example.org/class/X</uri></binding>
      <binding name="count"><literal>10</literal></binding>
    </result>
    <result>
      <binding name="graph"><uri>https://purl.org/okn/graph/a</uri></binding>
      <binding name="classUri"><uri>http://schema.org/Thing</uri></binding>
      <binding name="count"><literal>4</literal></binding>
    </result>
  </results>
</sparql>"#;

#[test]
fn test_class_usage_report_from_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(commands::DEFINED_CLASSES_FILE), DEFINED_XML).unwrap();
    std::fs::write(dir.path().join(commands::USED_CLASSES_FILE), USED_XML).unwrap();

    let report = commands::run_report(dir.path()).unwrap();

    assert!(report.contains("Alpha"));
    assert!(report.contains("http://example.org/class/Unused"));
    assert!(report.contains("http://schema.org/Thing"));
}

#[test]
fn test_class_usage_report_requires_inputs() {
    let dir = TempDir::new().unwrap();

    let err = commands::run_report(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains(commands::DEFINED_CLASSES_FILE));
}
