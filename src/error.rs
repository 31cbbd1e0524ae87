use std::path::PathBuf;

/// Errors raised while loading records or building queries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data directory not found: {0}")]
    DataDirNotFound(PathBuf),

    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Malformed metadata file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Schema file not found: {0}")]
    SchemaNotFound(PathBuf),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("{path} does not satisfy the schema: {}", .errors.join("; "))]
    SchemaViolation { path: PathBuf, errors: Vec<String> },

    #[error("{path} has no integer `gid`")]
    MissingIdentifier { path: PathBuf },

    #[error("Field `{field}` in {path} cannot be represented as a row: {reason}")]
    UnsupportedValue {
        path: PathBuf,
        field: String,
        reason: String,
    },
}

/// Errors raised when a query value does not fit the OR-list / AND-group grammar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Query must be a JSON object mapping field names to values, got {0}")]
    NotAnObject(String),

    #[error("Unknown combination mode `{0}` (expected `and` or `or`)")]
    InvalidMode(String),

    #[error("Value for `{field}` must be a string, number or boolean, got {found}")]
    InvalidValue { field: String, found: String },

    #[error("Value for `{field}` nests lists more than two levels deep")]
    TooDeep { field: String },

    #[error("Value for `{field}` contains an empty AND-group")]
    EmptyGroup { field: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Short description of a JSON value's kind for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(_) => "a boolean".to_string(),
        serde_json::Value::Number(_) => "a number".to_string(),
        serde_json::Value::String(_) => "a string".to_string(),
        serde_json::Value::Array(_) => "a list".to_string(),
        serde_json::Value::Object(_) => "an object".to_string(),
    }
}
