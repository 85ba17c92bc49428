//! Tabular query results, independent of the wire format they arrived in

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A bound value in a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// A resource identifier.
    Iri(String),
    /// A literal's lexical form. Datatype and language tag are not kept.
    Literal(String),
}

impl Term {
    pub fn as_str(&self) -> &str {
        match self {
            Term::Iri(s) | Term::Literal(s) => s,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row is missing field `{0}`")]
    MissingField(String),
    #[error("field `{field}` has unusable value `{value}`")]
    InvalidValue { field: String, value: String },
}

/// One solution: variable name to bound term. Unbound variables are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    bindings: BTreeMap<String, Term>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    /// Bind a variable, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, term: Term) {
        self.bindings.insert(name.into(), term);
    }

    pub fn with(mut self, name: impl Into<String>, term: Term) -> Self {
        self.bind(name, term);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    /// String view of a binding regardless of term kind.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(Term::as_str)
    }

    /// Like [`Row::value`], but a missing binding is an error.
    pub fn require(&self, name: &str) -> Result<&str, RowError> {
        self.value(name)
            .ok_or_else(|| RowError::MissingField(name.to_string()))
    }

    /// Parse an optional non-negative integer binding, using `default` when unbound.
    pub fn count_or(&self, name: &str, default: u64) -> Result<u64, RowError> {
        match self.value(name) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| RowError::InvalidValue {
                field: name.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Ordered list of rows plus the declared variable names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub variables: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(variables: Vec<String>, rows: Vec<Row>) -> Self {
        ResultSet { variables, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
