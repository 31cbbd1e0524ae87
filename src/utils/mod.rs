//! Shared helpers.
//!
//! - [`progress`] - progress bar, or a no-op shim without the `progress` feature

pub mod progress;
