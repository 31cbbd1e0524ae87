//! Collapse the category/field hierarchy of a metadata document into a
//! single field namespace.
//!
//! ```text
//! gid = 51                       gid              -> [51]
//! [metrics]                      weight           -> [321]
//! weight = 321           =>      texture_sources  -> [["IMG_7082", "IMG_7083"]]
//! [model]
//! texture_sources = ["IMG_7082", "IMG_7083"]
//! ```

use crate::error::{json_kind, Error, Result};
use crate::record::types::{Record, Row, RowElement, Scalar};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Field holding the record identifier
pub const IDENTIFIER_FIELD: &str = "gid";

/// Flatten a validated metadata document into a [`Record`]
pub fn flatten(document: &Value, path: &Path) -> Result<Record> {
    let root = document.as_object().ok_or_else(|| Error::Parse {
        path: path.to_path_buf(),
        message: format!("expected a table at the top level, got {}", json_kind(document)),
    })?;

    let identifier = root
        .get(IDENTIFIER_FIELD)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::MissingIdentifier {
            path: path.to_path_buf(),
        })?;

    let mut fields = BTreeMap::new();
    for (name, value) in root {
        match value {
            Value::Object(group) => {
                for (field, field_value) in group {
                    fields.insert(field.clone(), to_row(field_value, field, path)?);
                }
            }
            other => {
                fields.insert(name.clone(), to_row(other, name, path)?);
            }
        }
    }

    Ok(Record {
        identifier,
        fields,
        source: Some(path.to_path_buf()),
    })
}

/// Convert one field value into its row
fn to_row(value: &Value, field: &str, path: &Path) -> Result<Row> {
    let unsupported = |reason: String| Error::UnsupportedValue {
        path: path.to_path_buf(),
        field: field.to_string(),
        reason,
    };

    match value {
        Value::Array(items) if items.iter().all(Value::is_array) && !items.is_empty() => items
            .iter()
            .map(|inner| {
                let Value::Array(inner) = inner else {
                    return Err(unsupported("expected a list".to_string()));
                };
                scalars(inner)
                    .map(RowElement::Nested)
                    .map_err(|found| unsupported(format!("nested list contains {}", found)))
            })
            .collect(),
        Value::Array(items) => scalars(items)
            .map(|list| vec![RowElement::Nested(list)])
            .map_err(|found| unsupported(format!("list contains {}", found))),
        other => Scalar::from_json(other)
            .map(|s| vec![RowElement::Scalar(s)])
            .ok_or_else(|| unsupported(format!("found {}", json_kind(other)))),
    }
}

/// Convert a list whose items must all be scalars; the error names the first offender
fn scalars(items: &[Value]) -> std::result::Result<Vec<Scalar>, String> {
    items
        .iter()
        .map(|item| Scalar::from_json(item).ok_or_else(|| json_kind(item)))
        .collect()
}
