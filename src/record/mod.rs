//! Records and the loader that produces them from metadata files.
//!
//! - [`types`] - `Record`, `Row`, `RowElement` and `Scalar`
//! - [`schema`] - JSON-Schema compilation and validation
//! - [`flatten`] - category/field hierarchy -> flat field namespace
//! - [`loader`] - directory discovery, parsing and parallel loading

pub mod flatten;
pub mod loader;
pub mod schema;
pub mod types;

pub use flatten::{flatten, IDENTIFIER_FIELD};
pub use loader::{discover_files, load_records, load_records_with_progress};
pub use schema::Schema;
pub use types::*;
