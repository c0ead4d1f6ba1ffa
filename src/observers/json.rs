//! JSON observer for serializing counters and diffs.
//!
//! This module provides [`JsonObserver`], which serializes a [`Counter`] or
//! a [`Diff`] to JSON using serde.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! tally = { version = "0.1", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use tally::counter::Counter;
//! use tally::diff::DiffOptions;
//! use tally::observers::json::JsonObserver;
//!
//! let picked: Counter = Counter::with_reference([("apples", 2)], [("apples", 3)]);
//!
//! let observer = JsonObserver::new();
//! println!("{}", observer.counter_to_json(&picked)?);
//! // {"count":{"apples":2},"reference":{"apples":3}}
//!
//! let diff = picked.diff(DiffOptions::default())?;
//! println!("{}", observer.diff_to_json(&diff)?);
//! // {"apples":{"mine":2,"other":3,"diff":-1}}
//! ```

use crate::counter::Counter;
use crate::diff::Diff;
use crate::observers::Result;
use crate::quantity::Quantity;
use serde::Serialize;

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to wrap the output in a `{"timestamp_ms": .., "data": ..}` envelope.
    pub include_timestamp: bool,
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    timestamp_ms: u64,
    data: &'a T,
}

/// An observer that serializes counters and diffs to JSON.
///
/// # Examples
///
/// ```rust,ignore
/// use tally::observers::json::JsonObserver;
///
/// let observer = JsonObserver::new()
///     .pretty(true)
///     .include_timestamp(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables the timestamp envelope.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Serializes a counter, including its reference when present.
    pub fn counter_to_json<V: Quantity + Serialize>(&self, counter: &Counter<V>) -> Result<String> {
        self.to_json(counter)
    }

    /// Serializes a diff as an object keyed by identifier.
    pub fn diff_to_json<V: Quantity + Serialize>(&self, diff: &Diff<V>) -> Result<String> {
        self.to_json(diff)
    }

    /// Serializes a diff to a JSON byte vector, honouring the same options as
    /// [`diff_to_json`](Self::diff_to_json).
    pub fn diff_to_json_bytes<V: Quantity + Serialize>(&self, diff: &Diff<V>) -> Result<Vec<u8>> {
        Ok(self.to_json(diff)?.into_bytes())
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.config.include_timestamp {
            let envelope = Envelope {
                timestamp_ms: current_timestamp_ms(),
                data: value,
            };
            if self.config.pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            }
        } else if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

/// Returns the current timestamp in milliseconds since Unix epoch.
fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
