//! # Tally - Associative Counters with a Reference
//!
//! A small library for counting quantities per identifier, optionally
//! bounded by a *reference* counter, and for computing structured
//! differences between two counters.
//!
//! ## The Problem
//!
//! Many workflows count things against an expected total: picking items
//! for an order, tallying ballots against a register, reconciling stock
//! against an inventory. Two questions come up every time: "may I count one
//! more of this?" and "what is still missing, or in excess?".
//!
//! ## The Solution
//!
//! A [`Counter`](counter::Counter) maps identifiers to quantities. When
//! built with a reference, every add is checked against it:
//!
//! ```text
//!   reference   {a: 1, b: 3}
//!   count       {b: 2}
//!
//!   add("a")  → true    count {a: 1, b: 2}
//!   add("a")  → false   (1 + 1 > 1)
//!   diff()    → {b: {mine: 2, other: 3, diff: -1}}
//! ```
//!
//! ### Design Principles
//!
//! 1. **Zero by default**: identifiers that were never counted read as zero,
//!    everywhere.
//!
//! 2. **Rejection is not an error**: an add that would exceed the reference
//!    returns `false` and leaves the counter untouched. Forced adds bypass the
//!    reference entirely.
//!
//! 3. **Explicit diff targets**: [`diff`](counter::Counter::diff) compares
//!    against the reference and fails with `E_NO_COUNTER` when there is none;
//!    [`diff_against`](counter::Counter::diff_against) compares against any
//!    other counter.
//!
//! ## Quantity Types
//!
//! Quantities are any signed integer or floating point type (see
//! [`Quantity`](quantity::Quantity)). `Counter` defaults to `i64`.
//!
//! ## Quick Start
//!
//! ```rust
//! use tally::counter::{AddOptions, Counter};
//! use tally::diff::DiffOptions;
//!
//! let mut picked: Counter = Counter::with_reference([] as [(&str, i64); 0], [("a", 1), ("b", 3)]);
//!
//! assert!(picked.add("a"));
//! assert!(!picked.add("a"));
//! assert!(picked.add_with("b", AddOptions::new().qty(2)));
//!
//! let missing = picked.diff(DiffOptions::default()).unwrap();
//! assert_eq!(missing.get("b").unwrap().diff, -1);
//! assert!(!missing.contains("a"));
//!
//! let everything = picked.compare().unwrap();
//! assert_eq!(everything.len(), 2);
//! ```
//!
//! ## Thread Safety
//!
//! Counters do no internal locking. `Counter<V>` is `Send + Sync` whenever
//! `V` is; wrap it in a `Mutex` to share mutation across threads.
//!
//! ## Observers
//!
//! Optional observer modules render counters and diffs. Each is gated
//! behind a feature flag:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | [`observers::table`] | Pretty-print counters and diffs as tables |
//! | `json` | [`observers::json`] | Serialize counters and diffs to JSON |
//! | `serde` | - | `Serialize`/`Deserialize` for counters and diffs |
//! | `full` | All observers | Enables all observer modules |
//!
//! ### Example: Table Output
//!
//! ```rust,ignore
//! use tally::observers::table::TableObserver;
//!
//! let diff = picked.diff(DiffOptions::default())?;
//! println!("{}", TableObserver::new().render_diff(&diff));
//! ```
//!
//! ### Example: JSON Output
//!
//! ```rust,ignore
//! use tally::observers::json::JsonObserver;
//!
//! let json = JsonObserver::new().pretty(true).counter_to_json(&picked)?;
//! ```

pub mod counter;
pub mod diff;
pub mod error;
pub mod observers;
pub mod quantity;

pub use counter::{AddOptions, Counter};
pub use diff::{Diff, DiffEntry, DiffOptions};
pub use error::{CounterError, Result};
