use crate::config::SchemaLocation;
use crate::error::{Error, Result};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Schema bundled with the crate, used when no schema path is configured
pub const BUILTIN_SCHEMA: &str = include_str!("../../schema/record.schema.json");

/// A compiled metadata schema
///
/// Built once before loading and shared by reference between loader threads.
pub struct Schema {
    compiled: JSONSchema,
}

impl Schema {
    /// Read and compile the schema at `location`
    pub fn load(location: &SchemaLocation) -> Result<Self> {
        match location {
            SchemaLocation::Builtin => Self::from_str(BUILTIN_SCHEMA),
            SchemaLocation::Path(path) => Self::from_path(path),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::SchemaNotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&raw)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(raw: &str) -> Result<Self> {
        let document: Value =
            serde_json::from_str(raw).map_err(|e| Error::InvalidSchema(e.to_string()))?;
        Self::from_value(&document)
    }

    pub fn from_value(document: &Value) -> Result<Self> {
        let compiled =
            JSONSchema::compile(document).map_err(|e| Error::InvalidSchema(e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Validate a metadata document, collecting every violation message
    pub fn validate(&self, document: &Value, path: &Path) -> Result<()> {
        match self.compiled.validate(document) {
            Ok(()) => Ok(()),
            Err(errors) => {
                let errors = errors
                    .map(|e| {
                        let at = e.instance_path.to_string();
                        if at.is_empty() {
                            e.to_string()
                        } else {
                            format!("{} (at {})", e, at)
                        }
                    })
                    .collect();
                Err(Error::SchemaViolation {
                    path: path.to_path_buf(),
                    errors,
                })
            }
        }
    }
}
