//! Error type for counter operations.
//!
//! Only two conditions are errors. Rejected adds and lookups of identifiers
//! that were never counted are ordinary outcomes and are reported through
//! return values (`false` and zero respectively).

use thiserror::Error;

/// Errors returned by [`Counter`](crate::counter::Counter) operations.
///
/// Each variant carries a stable string code, available through
/// [`CounterError::code`], for callers that match on codes rather than on
/// the enum.
///
/// # Examples
///
/// ```rust
/// use tally::counter::Counter;
/// use tally::diff::DiffOptions;
/// use tally::error::CounterError;
///
/// let counter: Counter = Counter::from_counts([("a", 1)]);
/// let err = counter.diff(DiffOptions::default()).unwrap_err();
///
/// assert!(matches!(err, CounterError::NoCounter));
/// assert_eq!(err.code(), "E_NO_COUNTER");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CounterError {
    /// A diff was requested without an explicit counter and no reference is set.
    #[error("unable to generate diff as no counter or reference is available")]
    NoCounter,

    /// The reference was queried on a counter built without one.
    #[error("counter has no reference")]
    NoReference,
}

impl CounterError {
    /// Returns the stable code of this error.
    pub fn code(&self) -> &'static str {
        match self {
            CounterError::NoCounter => "E_NO_COUNTER",
            CounterError::NoReference => "E_NO_REFERENCE",
        }
    }
}

/// Result type for counter operations.
pub type Result<T> = std::result::Result<T, CounterError>;
