//! Usage index: (graph, class) -> occurrence count

use std::collections::{HashMap, HashSet};

use crate::model::{ClassId, GraphId, UsageRecord};

/// Occurrence counts per graph, with a reverse class -> graphs view.
///
/// Iteration order is unspecified; consumers sort before producing output.
#[derive(Debug, Clone, Default)]
pub struct UsageIndex {
    by_graph: HashMap<GraphId, HashMap<ClassId, u64>>,
    by_class: HashMap<ClassId, HashSet<GraphId>>,
    graph_labels: HashMap<GraphId, String>,
}

impl UsageIndex {
    pub fn new() -> Self {
        UsageIndex::default()
    }

    /// Insert or overwrite the count for a pair. Counts never accumulate.
    pub fn record(&mut self, graph: GraphId, class: ClassId, count: u64) {
        self.by_class
            .entry(class.clone())
            .or_default()
            .insert(graph.clone());
        self.by_graph.entry(graph).or_default().insert(class, count);
    }

    /// Last label observed for a graph wins.
    pub fn set_graph_label(&mut self, graph: GraphId, label: impl Into<String>) {
        self.graph_labels.insert(graph, label.into());
    }

    pub fn graph_label(&self, graph: &GraphId) -> Option<&str> {
        self.graph_labels.get(graph).map(String::as_str)
    }

    pub fn used_classes(&self, graph: &GraphId) -> HashSet<ClassId> {
        self.by_graph
            .get(graph)
            .map(|classes| classes.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Union of used classes across all graphs.
    pub fn all_used_classes(&self) -> HashSet<ClassId> {
        self.by_class.keys().cloned().collect()
    }

    pub fn is_used(&self, class: &ClassId) -> bool {
        self.by_class.contains_key(class)
    }

    pub fn graphs_using(&self, class: &ClassId) -> HashSet<GraphId> {
        self.by_class.get(class).cloned().unwrap_or_default()
    }

    pub fn count_of(&self, graph: &GraphId, class: &ClassId) -> Option<u64> {
        self.by_graph.get(graph)?.get(class).copied()
    }

    /// Class -> count map for one graph, if the graph has any usage.
    pub fn classes_of(&self, graph: &GraphId) -> Option<&HashMap<ClassId, u64>> {
        self.by_graph.get(graph)
    }

    pub fn graphs(&self) -> impl Iterator<Item = &GraphId> {
        self.by_graph.keys()
    }

    /// Every recorded (graph, class, count) triple, unordered.
    pub fn records(&self) -> impl Iterator<Item = UsageRecord> + '_ {
        self.by_graph.iter().flat_map(|(graph, classes)| {
            classes.iter().map(move |(class, &count)| UsageRecord {
                graph: graph.clone(),
                class: class.clone(),
                count,
            })
        })
    }

    pub fn graph_count(&self) -> usize {
        self.by_graph.len()
    }

    /// Number of recorded (graph, class) pairs.
    pub fn len(&self) -> usize {
        self.by_graph.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_graph.is_empty()
    }
}
