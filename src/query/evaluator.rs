use crate::query::matcher::{evaluate_term, resolve};
use crate::query::value::{Mode, Query};
use crate::record::types::{Record, RecordId};
use std::fmt;

/// Non-fatal condition found while evaluating a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryWarning {
    /// The record has no such field; it was left out of the combination
    UnknownField { field: String, record: RecordId },
}

impl fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryWarning::UnknownField { field, .. } => {
                write!(f, "`{}` is not a valid parameter", field)
            }
        }
    }
}

/// Evaluates one query against individual records
pub struct QueryEvaluator<'a> {
    query: &'a Query,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(query: &'a Query) -> Self {
        Self { query }
    }

    /// Decide whether `record` satisfies the query
    ///
    /// Fields the record lacks push a warning and are skipped: they count
    /// neither for nor against the record. Every field is visited in both
    /// modes so the warnings do not depend on evaluation outcome. With no
    /// fields requested, AND mode accepts and OR mode rejects.
    pub fn evaluate(&self, record: &Record, warnings: &mut Vec<QueryWarning>) -> bool {
        let mut satisfied = match self.query.mode {
            Mode::And => true,
            Mode::Or => false,
        };

        for (field, value) in &self.query.terms {
            let Some(row) = resolve(record, field) else {
                log::debug!("`{}` is not a valid parameter (record {})", field, record.identifier);
                warnings.push(QueryWarning::UnknownField {
                    field: field.clone(),
                    record: record.identifier,
                });
                continue;
            };

            match self.query.mode {
                Mode::And => {
                    if satisfied && !evaluate_term(value, row) {
                        satisfied = false;
                    }
                }
                Mode::Or => {
                    if !satisfied && evaluate_term(value, row) {
                        satisfied = true;
                    }
                }
            }
        }

        satisfied
    }

    /// Evaluate without collecting warnings
    pub fn matches(&self, record: &Record) -> bool {
        let mut warnings = Vec::new();
        self.evaluate(record, &mut warnings)
    }
}
