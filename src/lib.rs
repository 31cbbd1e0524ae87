//! # mdframe - queries over food-scan metadata
//!
//! Each scanned food item is described by one metadata file (TOML). mdframe
//! loads a directory of those files, validates them against a JSON schema,
//! flattens each into a [`record::Record`] and answers structured queries
//! with the sorted identifiers of matching records.
//!
//! ## Architecture
//!
//! - [`record`] - Record types, schema validation, flattening and loading
//! - [`query`] - Query grammar, per-field matching, evaluation and collection
//! - [`config`] - Loader configuration and persisted settings
//! - [`output`] - Terminal output for the `mdframe` binary
//! - [`error`] - Error types
//!
//! ## Query grammar
//!
//! A query maps field names to values and carries an AND/OR mode:
//!
//! - `321` - the field must contain 321
//! - `["IMG_1", "IMG_2"]` - the field must contain at least one of them
//! - `[["IMG_1", "IMG_2"], "IMG_3"]` - both IMG_1 and IMG_2, or IMG_3
//!
//! Fields a record lacks produce a warning and are left out of that
//! record's evaluation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mdframe::config::Config;
//! use mdframe::query::{filter_records, Mode, Query, QueryValue};
//!
//! let config = Config::new("data");
//! let query = Query::new(Mode::And)
//!     .field("weight", 321)
//!     .field("texture_sources", QueryValue::any_of(["IMG_7082"]));
//!
//! let outcome = filter_records(&config, &query).unwrap();
//! for id in &outcome.ids {
//!     println!("{}", id);
//! }
//! for warning in &outcome.warnings {
//!     eprintln!("{}", warning);
//! }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod query;
pub mod record;
pub mod utils;

pub use error::{Error, QueryError, Result};
