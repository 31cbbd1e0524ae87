use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Unique identifier of a record (the `gid` of its metadata file)
pub type RecordId = i64;

/// A single raw value
///
/// Equality is exact: `Int(321)`, `Float(321.0)` and `Str("321")` are all
/// different values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Convert a JSON scalar, returning `None` for null, lists and objects
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Scalar::Int(i)),
                None => n.as_f64().map(Scalar::Float),
            },
            serde_json::Value::String(s) => Some(Scalar::Str(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Int(i) => serde_json::Value::from(*i),
            Scalar::Float(f) => serde_json::Value::from(*f),
            Scalar::Str(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

/// One element of a row: a plain value or a sub-list of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowElement {
    Scalar(Scalar),
    Nested(Vec<Scalar>),
}

impl RowElement {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            RowElement::Scalar(s) => s.to_json(),
            RowElement::Nested(items) => {
                serde_json::Value::Array(items.iter().map(Scalar::to_json).collect())
            }
        }
    }
}

/// Ordered values associated with one field of one record
pub type Row = Vec<RowElement>;

/// One scanned item, flattened into a field name -> row mapping
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub identifier: RecordId,
    pub fields: BTreeMap<String, Row>,
    /// Metadata file the record was loaded from
    pub source: Option<PathBuf>,
}

impl Record {
    pub fn new(identifier: RecordId) -> Self {
        Self {
            identifier,
            fields: BTreeMap::new(),
            source: None,
        }
    }

    /// Builder-style field insertion, mostly for tests and synthetic data
    pub fn with_field(mut self, name: impl Into<String>, row: Row) -> Self {
        self.fields.insert(name.into(), row);
        self
    }

    /// Render the flattened record as a JSON object
    ///
    /// Single-element rows are unwrapped so the output reads like the
    /// metadata file it came from.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, row) in &self.fields {
            let value = match row.as_slice() {
                [single] => single.to_json(),
                elements => {
                    serde_json::Value::Array(elements.iter().map(RowElement::to_json).collect())
                }
            };
            map.insert(name.clone(), value);
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_equality_is_exact() {
        assert_eq!(Scalar::Int(321), Scalar::from(321));
        assert_ne!(Scalar::Int(321), Scalar::Float(321.0));
        assert_ne!(Scalar::Int(321), Scalar::Str("321".to_string()));
        assert_ne!(Scalar::from("Apple"), Scalar::from("apple"));
    }

    #[test]
    fn test_scalar_from_json() {
        assert_eq!(Scalar::from_json(&serde_json::json!(5)), Some(Scalar::Int(5)));
        assert_eq!(Scalar::from_json(&serde_json::json!(2.5)), Some(Scalar::Float(2.5)));
        assert_eq!(Scalar::from_json(&serde_json::json!(true)), Some(Scalar::Bool(true)));
        assert_eq!(Scalar::from_json(&serde_json::json!("x")), Some(Scalar::from("x")));
        assert_eq!(Scalar::from_json(&serde_json::json!(null)), None);
        assert_eq!(Scalar::from_json(&serde_json::json!([1])), None);
    }

    #[test]
    fn test_record_to_json_unwraps_single_values() {
        let record = Record::new(7)
            .with_field("weight", vec![RowElement::Scalar(Scalar::Int(12))])
            .with_field(
                "texture_sources",
                vec![RowElement::Nested(vec!["a".into(), "b".into()])],
            );

        let json = record.to_json();
        assert_eq!(json["weight"], serde_json::json!(12));
        assert_eq!(json["texture_sources"], serde_json::json!(["a", "b"]));
    }
}
