//! Per-field matching: row lookup, value existence and term evaluation.

use crate::query::value::{OrTerm, QueryValue};
use crate::record::types::{Record, Row, RowElement, Scalar};

/// Look up the row of `field`, or `None` if the record does not carry it
pub fn resolve<'r>(record: &'r Record, field: &str) -> Option<&'r Row> {
    record.fields.get(field)
}

/// Check whether `value` is present in `row`
///
/// A scalar element matches when it equals `value`; a nested element
/// matches when `value` is one of its members. Equality is exact.
pub fn exists(value: &Scalar, row: &[RowElement]) -> bool {
    row.iter().any(|element| match element {
        RowElement::Nested(items) => items.contains(value),
        RowElement::Scalar(scalar) => scalar == value,
    })
}

/// Evaluate one field's query value against that field's row
pub fn evaluate_term(value: &QueryValue, row: &[RowElement]) -> bool {
    match value {
        QueryValue::Scalar(scalar) => exists(scalar, row),
        // Empty OR-list is never satisfied
        QueryValue::Any(terms) => terms.iter().any(|term| match term {
            OrTerm::Scalar(scalar) => exists(scalar, row),
            OrTerm::All(group) => group.values().iter().all(|scalar| exists(scalar, row)),
        }),
    }
}
