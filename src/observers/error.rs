//! Unified error type for all observers.

use thiserror::Error;

/// Unified error type for observer operations.
///
/// Rendering tables cannot fail; only serialization does.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// Error from the JSON observer.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for observer operations.
pub type Result<T> = std::result::Result<T, ObserverError>;
