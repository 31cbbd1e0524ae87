use crate::error::{json_kind, QueryError};
use crate::record::types::Scalar;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How per-field results combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every resolvable field must match
    #[default]
    And,
    /// At least one resolvable field must match
    Or,
}

impl FromStr for Mode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" | "all" => Ok(Mode::And),
            "or" | "any" => Ok(Mode::Or),
            _ => Err(QueryError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::And => write!(f, "and"),
            Mode::Or => write!(f, "or"),
        }
    }
}

/// One field's accepted values
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// A single value that must be present
    Scalar(Scalar),
    /// Alternatives; at least one term must be satisfied
    Any(Vec<OrTerm>),
}

/// One alternative of an OR-list
#[derive(Debug, Clone, PartialEq)]
pub enum OrTerm {
    Scalar(Scalar),
    /// AND-group: every value must be present
    All(AndGroup),
}

impl OrTerm {
    /// AND-group term, or `None` if `values` is empty
    pub fn all<I, S>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        AndGroup::new(values).map(OrTerm::All)
    }
}

/// Values that must all be present in a row
///
/// Never empty: an empty group would hold for every row.
#[derive(Debug, Clone, PartialEq)]
pub struct AndGroup(Vec<Scalar>);

impl AndGroup {
    pub fn new<I, S>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        (!values.is_empty()).then_some(AndGroup(values))
    }

    pub fn values(&self) -> &[Scalar] {
        &self.0
    }
}

impl QueryValue {
    /// Build a value from JSON, rejecting shapes outside the grammar
    ///
    /// `"a"` is a scalar, `["a", "b"]` an OR-list, and `[["a", "b"], "c"]`
    /// an OR-list whose first term is an AND-group.
    pub fn from_json(field: &str, value: &Value) -> Result<Self, QueryError> {
        match value {
            Value::Array(terms) => terms
                .iter()
                .map(|term| or_term_from_json(field, term))
                .collect::<Result<Vec<_>, _>>()
                .map(QueryValue::Any),
            other => scalar_from_json(field, other).map(QueryValue::Scalar),
        }
    }

    /// OR-list of plain values
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        QueryValue::Any(values.into_iter().map(|v| OrTerm::Scalar(v.into())).collect())
    }
}

macro_rules! scalar_query_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_query_value!(Scalar, bool, i32, i64, f64, &str, String);

fn or_term_from_json(field: &str, term: &Value) -> Result<OrTerm, QueryError> {
    match term {
        Value::Array(group) => {
            let values = group
                .iter()
                .map(|item| match item {
                    Value::Array(_) => Err(QueryError::TooDeep {
                        field: field.to_string(),
                    }),
                    other => scalar_from_json(field, other),
                })
                .collect::<Result<Vec<_>, _>>()?;
            OrTerm::all(values).ok_or_else(|| QueryError::EmptyGroup {
                field: field.to_string(),
            })
        }
        other => scalar_from_json(field, other).map(OrTerm::Scalar),
    }
}

fn scalar_from_json(field: &str, value: &Value) -> Result<Scalar, QueryError> {
    Scalar::from_json(value).ok_or_else(|| QueryError::InvalidValue {
        field: field.to_string(),
        found: json_kind(value),
    })
}

/// A field -> value query with its combination mode
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    /// Requested fields, in evaluation order
    pub terms: Vec<(String, QueryValue)>,
    pub mode: Mode,
}

impl Query {
    pub fn new(mode: Mode) -> Self {
        Self {
            terms: Vec::new(),
            mode,
        }
    }

    /// Add a field constraint
    pub fn field(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.terms.push((name.into(), value.into()));
        self
    }

    /// Build a query from a JSON object of field -> value
    pub fn from_json(mode: Mode, value: &Value) -> Result<Self, QueryError> {
        let map = value
            .as_object()
            .ok_or_else(|| QueryError::NotAnObject(json_kind(value)))?;

        let terms = map
            .iter()
            .map(|(field, v)| Ok((field.clone(), QueryValue::from_json(field, v)?)))
            .collect::<Result<Vec<_>, QueryError>>()?;

        Ok(Self { terms, mode })
    }

    /// Parse a JSON query string
    pub fn parse(mode: Mode, input: &str) -> Result<Self, QueryError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| QueryError::NotAnObject(format!("invalid JSON ({})", e)))?;
        Self::from_json(mode, &value)
    }

    /// Check if no field is requested
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_value() {
        let v = QueryValue::from_json("weight", &json!(321)).unwrap();
        assert_eq!(v, QueryValue::Scalar(Scalar::Int(321)));
    }

    #[test]
    fn test_or_list() {
        let v = QueryValue::from_json("texture_sources", &json!(["IMG_7082"])).unwrap();
        assert_eq!(v, QueryValue::Any(vec![OrTerm::Scalar("IMG_7082".into())]));
    }

    #[test]
    fn test_and_groups_inside_or_list() {
        let v = QueryValue::from_json("texture_sources", &json!([["IMG_7088", "IMG_7089"], "x"]))
            .unwrap();
        assert_eq!(
            v,
            QueryValue::Any(vec![
                OrTerm::all(["IMG_7088", "IMG_7089"]).unwrap(),
                OrTerm::Scalar("x".into()),
            ])
        );
    }

    #[test]
    fn test_empty_or_list_is_allowed() {
        let v = QueryValue::from_json("weight", &json!([])).unwrap();
        assert_eq!(v, QueryValue::Any(vec![]));
    }

    #[test]
    fn test_too_deep_is_rejected() {
        let err = QueryValue::from_json("weight", &json!([[["a"]]])).unwrap_err();
        assert_eq!(err, QueryError::TooDeep { field: "weight".to_string() });
    }

    #[test]
    fn test_empty_and_group_is_rejected() {
        let err = QueryValue::from_json("weight", &json!([[]])).unwrap_err();
        assert_eq!(err, QueryError::EmptyGroup { field: "weight".to_string() });
    }

    #[test]
    fn test_empty_and_group_cannot_be_built() {
        assert!(AndGroup::new(Vec::<Scalar>::new()).is_none());
        assert!(OrTerm::all(Vec::<&str>::new()).is_none());

        let group = AndGroup::new(["IMG_1", "IMG_2"]).unwrap();
        assert_eq!(group.values(), &[Scalar::from("IMG_1"), Scalar::from("IMG_2")]);
    }

    #[test]
    fn test_non_scalars_are_rejected() {
        assert!(matches!(
            QueryValue::from_json("weight", &json!(null)),
            Err(QueryError::InvalidValue { .. })
        ));
        assert!(matches!(
            QueryValue::from_json("weight", &json!([{ "a": 1 }])),
            Err(QueryError::InvalidValue { .. })
        ));
        assert!(matches!(
            QueryValue::from_json("weight", &json!([["a", null]])),
            Err(QueryError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_query_from_json() {
        let q = Query::from_json(Mode::Or, &json!({ "weight": 321, "started": "14:38:34" })).unwrap();
        assert_eq!(q.mode, Mode::Or);
        assert_eq!(q.terms.len(), 2);
        assert!(q.terms.iter().any(|(f, _)| f == "weight"));
    }

    #[test]
    fn test_query_must_be_object() {
        assert!(matches!(
            Query::from_json(Mode::And, &json!([1, 2])),
            Err(QueryError::NotAnObject(_))
        ));
        assert!(matches!(
            Query::parse(Mode::And, "{ nope"),
            Err(QueryError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_query_builder() {
        let q = Query::new(Mode::And)
            .field("weight", 321)
            .field("texture_sources", QueryValue::any_of(["IMG_1", "IMG_2"]));
        assert_eq!(q.terms[0], ("weight".to_string(), QueryValue::Scalar(Scalar::Int(321))));
        assert!(!q.is_empty());
        assert!(Query::new(Mode::Or).is_empty());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("AND".parse::<Mode>().unwrap(), Mode::And);
        assert_eq!("any".parse::<Mode>().unwrap(), Mode::Or);
        assert!(matches!("xor".parse::<Mode>(), Err(QueryError::InvalidMode(_))));
    }
}
