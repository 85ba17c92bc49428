//! Classmap Core: usage index, union-find merging, equivalence clusters,
//! Turtle output, and the defined-vs-used report

pub mod model;
pub mod results;
pub mod usage;
pub mod merger;
pub mod evidence;
pub mod assembler;
pub mod turtle;
pub mod report;

#[cfg(test)]
pub mod tests;

#[cfg(test)]
pub mod test_utils;

pub use model::{local_name, ClassId, GraphId, MediatorKey, UsageRecord, RelationFact, MediatorLink, EvidenceKind, EquivalenceCluster};
pub use results::{Term, Row, RowError, ResultSet};
pub use usage::UsageIndex;
pub use merger::DisjointSet;
pub use evidence::{Candidate, MediatorLinks, shared_usage, restrict_relations, direct_relation, mediated_identity};
pub use assembler::{assemble, assemble_one};
pub use turtle::{to_turtle, DocumentHeader};
pub use report::{DefinedIndex, ClassUsageReport, build_report, render_report};
