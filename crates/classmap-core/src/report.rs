//! Defined-vs-used class report per graph

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use crate::model::{ClassId, GraphId};
use crate::usage::UsageIndex;

const PREVIEW: usize = 5;

/// Classes each graph's schema declares.
#[derive(Debug, Clone, Default)]
pub struct DefinedIndex {
    by_graph: HashMap<GraphId, BTreeSet<ClassId>>,
    graph_labels: HashMap<GraphId, String>,
}

impl DefinedIndex {
    pub fn new() -> Self {
        DefinedIndex::default()
    }

    pub fn define(&mut self, graph: GraphId, class: ClassId) {
        self.by_graph.entry(graph).or_default().insert(class);
    }

    pub fn set_graph_label(&mut self, graph: GraphId, label: impl Into<String>) {
        self.graph_labels.insert(graph, label.into());
    }

    pub fn graph_label(&self, graph: &GraphId) -> Option<&str> {
        self.graph_labels.get(graph).map(String::as_str)
    }

    pub fn defined_classes(&self, graph: &GraphId) -> BTreeSet<ClassId> {
        self.by_graph.get(graph).cloned().unwrap_or_default()
    }

    pub fn graphs(&self) -> impl Iterator<Item = &GraphId> {
        self.by_graph.keys()
    }

    pub fn len(&self) -> usize {
        self.by_graph.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_graph.is_empty()
    }
}

/// One class with its usage count in the graph being summarised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedClass {
    pub class: ClassId,
    pub count: u64,
}

/// Set algebra between defined and used classes of one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphUsageSummary {
    pub graph: GraphId,
    /// Graph label, or the last path segment of its IRI.
    pub display_name: String,
    pub defined: usize,
    pub used: usize,
    /// Defined and used, by count descending.
    pub both: Vec<CountedClass>,
    /// Defined but never used, by IRI.
    pub defined_not_used: Vec<ClassId>,
    /// Used but declared elsewhere, by count descending.
    pub used_not_defined: Vec<CountedClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTotals {
    pub defined: usize,
    pub used: usize,
    pub both: usize,
    pub defined_not_used: usize,
    pub used_not_defined: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUsageReport {
    /// Ascending by graph IRI.
    pub graphs: Vec<GraphUsageSummary>,
    pub totals: ReportTotals,
}

/// Count descending, IRI ascending as tie-break.
fn by_count(index: &UsageIndex, graph: &GraphId, classes: BTreeSet<ClassId>) -> Vec<CountedClass> {
    let mut out: Vec<CountedClass> = classes
        .into_iter()
        .map(|class| {
            let count = index.count_of(graph, &class).unwrap_or(0);
            CountedClass { class, count }
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.class.cmp(&b.class)));
    out
}

pub fn build_report(defined: &DefinedIndex, used: &UsageIndex) -> ClassUsageReport {
    let all_graphs: BTreeSet<GraphId> = defined.graphs().chain(used.graphs()).cloned().collect();

    let mut totals = ReportTotals::default();
    let mut graphs = Vec::with_capacity(all_graphs.len());

    for graph in all_graphs {
        let display_name = used
            .graph_label(&graph)
            .or_else(|| defined.graph_label(&graph))
            .map(str::to_string)
            .unwrap_or_else(|| graph.as_str().rsplit('/').next().unwrap_or_default().to_string());

        let defined_classes = defined.defined_classes(&graph);
        let used_classes: BTreeSet<ClassId> = used.used_classes(&graph).into_iter().collect();

        let both: BTreeSet<ClassId> = defined_classes.intersection(&used_classes).cloned().collect();
        let defined_not_used: Vec<ClassId> =
            defined_classes.difference(&used_classes).cloned().collect();
        let used_not_defined: BTreeSet<ClassId> =
            used_classes.difference(&defined_classes).cloned().collect();

        let summary = GraphUsageSummary {
            display_name,
            defined: defined_classes.len(),
            used: used_classes.len(),
            both: by_count(used, &graph, both),
            defined_not_used,
            used_not_defined: by_count(used, &graph, used_not_defined),
            graph,
        };

        totals.defined += summary.defined;
        totals.used += summary.used;
        totals.both += summary.both.len();
        totals.defined_not_used += summary.defined_not_used.len();
        totals.used_not_defined += summary.used_not_defined.len();
        graphs.push(summary);
    }

    ClassUsageReport { graphs, totals }
}

fn preview_counted(out: &mut String, title: &str, classes: &[CountedClass]) {
    if classes.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n  {} ({}):", title, classes.len());
    for c in classes.iter().take(PREVIEW) {
        let _ = writeln!(out, "    - {} (count: {})", c.class, c.count);
    }
    if classes.len() > PREVIEW {
        let _ = writeln!(out, "    ... and {} more", classes.len() - PREVIEW);
    }
}

/// Plain-text rendering: per-graph sections, summary table, legend.
pub fn render_report(report: &ClassUsageReport) -> String {
    let rule = "=".repeat(80);
    let thin = "-".repeat(80);
    let mut out = String::new();

    let _ = writeln!(out, "Total T1 graphs: {}", report.graphs.len());
    let _ = writeln!(out, "{}", rule);

    for g in &report.graphs {
        let _ = writeln!(out, "\n{}", g.display_name);
        let _ = writeln!(out, "{}", thin);
        let _ = writeln!(out, "  Total defined classes: {}", g.defined);
        let _ = writeln!(out, "  Total used classes: {}", g.used);
        let _ = writeln!(out, "  Both defined AND used (internal): {}", g.both.len());
        let _ = writeln!(out, "  Defined but NOT used: {}", g.defined_not_used.len());
        let _ = writeln!(out, "  Used but NOT defined (external): {}", g.used_not_defined.len());

        if !g.defined_not_used.is_empty() {
            let _ = writeln!(out, "\n  Defined but not used ({}):", g.defined_not_used.len());
            for class in g.defined_not_used.iter().take(PREVIEW) {
                let _ = writeln!(out, "    - {}", class);
            }
            if g.defined_not_used.len() > PREVIEW {
                let _ = writeln!(out, "    ... and {} more", g.defined_not_used.len() - PREVIEW);
            }
        }
        preview_counted(&mut out, "Used but not defined", &g.used_not_defined);
        preview_counted(&mut out, "Both defined and used", &g.both);
    }

    let _ = writeln!(out, "\n\n{}", rule);
    let _ = writeln!(out, "SUMMARY TABLE");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "{:<30} {:>6} {:>6} {:>6} {:>8} {:>8}",
        "Graph", "Def", "Used", "Both", "Def!Use", "Use!Def"
    );
    let _ = writeln!(out, "{}", thin);
    for g in &report.graphs {
        let _ = writeln!(
            out,
            "{:<30} {:>6} {:>6} {:>6} {:>8} {:>8}",
            g.display_name,
            g.defined,
            g.used,
            g.both.len(),
            g.defined_not_used.len(),
            g.used_not_defined.len()
        );
    }
    let t = &report.totals;
    let _ = writeln!(out, "{}", thin);
    let _ = writeln!(
        out,
        "{:<30} {:>6} {:>6} {:>6} {:>8} {:>8}",
        "TOTAL", t.defined, t.used, t.both, t.defined_not_used, t.used_not_defined
    );

    out.push_str("\n\nLegend:\n");
    out.push_str("  Def      = Classes defined in this graph\n");
    out.push_str("  Used     = Classes with usage counts in this graph\n");
    out.push_str("  Both     = Classes both defined AND used (internal usage)\n");
    out.push_str("  Def!Use  = Classes defined but NOT used (no instances)\n");
    out.push_str("  Use!Def  = Classes used but NOT defined (external classes)\n");
    out
}
