//! Observers for rendering and exporting counters and diffs.
//!
//! - [`table`] - Pretty-print counters and diffs as tables using the `tabled` crate
//! - [`json`] - Serialize counters and diffs to JSON
//!
//! # Feature Flags
//!
//! Each observer is gated behind a feature flag to minimize dependencies:
//!
//! - `table` - Enables the [`table`] module
//! - `json` - Enables the [`json`] module and the [`ObserverError`] type
//! - `full` - Enables all observer modules

#[cfg(feature = "json")]
mod error;

#[cfg(feature = "json")]
pub use error::{ObserverError, Result};

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;
