//! Structured differences between two counters.
//!
//! A [`Diff`] maps identifiers to [`DiffEntry`] records describing how the
//! quantity held by one counter (`mine`) relates to the quantity held by
//! another (`other`). Diffs are produced by
//! [`Counter::diff`](crate::counter::Counter::diff),
//! [`Counter::diff_against`](crate::counter::Counter::diff_against) and their
//! `compare` counterparts.
//!
//! # Algorithm
//!
//! The comparison runs in two passes:
//!
//! 1. Every identifier counted on our side is emitted when `mine != other`
//!    (or always, with [`DiffOptions::include_same`]), with
//!    `diff = mine - other`.
//! 2. Every identifier counted on the other side is emitted when our
//!    quantity is zero and theirs is not (or always, with `include_same`),
//!    with `diff = -other`.
//!
//! An explicit zero on our side is indistinguishable from an identifier we
//! never counted. With `include_same`, identifiers present on both sides are
//! rewritten by the second pass, so their `diff` is `-other`.
//!
//! For integer quantities both `mine - other` and `-other` saturate at the
//! bounds of the type instead of overflowing.
//!
//! ```text
//!   mine  {a: 1, b: 0, d: 1}        other {a: 2, b: 2, c: 3}
//!
//!   pass 1:  a → {1, 2, -1}   b → {0, 2, -2}   d → {1, 0, 1}
//!   pass 2:  b → {0, 2, -2}   c → {0, 3, -3}
//! ```

use crate::counter::Counter;
use crate::quantity::Quantity;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options controlling which identifiers a diff reports.
///
/// # Examples
///
/// ```rust
/// use tally::diff::DiffOptions;
///
/// let options = DiffOptions::new().include_same(true);
/// assert!(options.includes_same());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    include_same: bool,
}

impl DiffOptions {
    /// Creates the default options: identifiers with equal quantities are omitted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether identifiers with equal quantities on both sides are reported.
    pub fn include_same(mut self, enabled: bool) -> Self {
        self.include_same = enabled;
        self
    }

    /// Returns `true` if identifiers with equal quantities are reported.
    pub fn includes_same(&self) -> bool {
        self.include_same
    }
}

/// The discrepancy between two counters for a single identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffEntry<V = i64> {
    /// Quantity held by the counter the diff was computed on.
    pub mine: V,
    /// Quantity held by the counter it was compared with.
    pub other: V,
    /// Signed difference, see the [module documentation](self) for how it is derived.
    pub diff: V,
}

impl<V: Quantity> DiffEntry<V> {
    /// Creates an entry with `diff = mine - other`, saturating at the bounds of `V`.
    pub fn new(mine: V, other: V) -> Self {
        Self {
            mine,
            other,
            diff: mine.saturating_difference(other),
        }
    }

    /// Creates an entry for an identifier the other side holds and we do not.
    fn missing(mine: V, other: V) -> Self {
        Self {
            mine,
            other,
            diff: other.saturating_negation(),
        }
    }
}

impl<V: Display> Display for DiffEntry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mine={} other={} diff={}",
            self.mine, self.other, self.diff
        )
    }
}

/// The result of comparing two counters, keyed by identifier.
///
/// Entries iterate in identifier order.
///
/// # Examples
///
/// ```rust
/// use tally::counter::Counter;
/// use tally::diff::DiffOptions;
///
/// let ours: Counter = Counter::from_counts([("a", 1), ("b", 2)]);
/// let theirs: Counter = Counter::from_counts([("a", 1), ("c", 4)]);
///
/// let diff = ours.diff_against(&theirs, DiffOptions::default());
///
/// assert!(!diff.contains("a"));
/// assert_eq!(diff.get("b").unwrap().diff, 2);
/// assert_eq!(diff.get("c").unwrap().diff, -4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Diff<V = i64> {
    entries: BTreeMap<String, DiffEntry<V>>,
}

impl<V> Default for Diff<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V: Quantity> Diff<V> {
    /// Returns the entry for `id`, if it was reported.
    pub fn get(&self, id: &str) -> Option<&DiffEntry<V>> {
        self.entries.get(id)
    }

    /// Returns `true` if `id` was reported.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns the number of reported identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(id, entry)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiffEntry<V>)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Iterates over the reported identifiers.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries where we hold more than the other side.
    pub fn surplus(&self) -> impl Iterator<Item = (&str, &DiffEntry<V>)> {
        self.iter().filter(|(_, e)| e.mine > e.other)
    }

    /// Entries where we hold less than the other side.
    pub fn deficit(&self) -> impl Iterator<Item = (&str, &DiffEntry<V>)> {
        self.iter().filter(|(_, e)| e.mine < e.other)
    }

    /// Returns `true` if every reported entry has equal quantities on both sides.
    ///
    /// Compares `mine` with `other` rather than reading `diff`, which the
    /// second pass sets to `-other` for shared identifiers under
    /// `include_same`. A diff computed without `include_same` is balanced
    /// exactly when it is empty.
    pub fn is_balanced(&self) -> bool {
        self.entries.values().all(|e| e.mine == e.other)
    }

    /// Consumes the diff and returns the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, DiffEntry<V>> {
        self.entries
    }
}

impl<V> IntoIterator for Diff<V> {
    type Item = (String, DiffEntry<V>);
    type IntoIter = btree_map::IntoIter<String, DiffEntry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Display> Display for Diff<V> {
    /// One `id: mine=.. other=.. diff=..` line per entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, entry) in &self.entries {
            writeln!(f, "{}: {}", id, entry)?;
        }
        Ok(())
    }
}

/// Compares `mine` against `other`.
pub(crate) fn compute<V: Quantity>(
    mine: &Counter<V>,
    other: &Counter<V>,
    options: DiffOptions,
) -> Diff<V> {
    let include_same = options.include_same;
    let mut entries = BTreeMap::new();

    for id in mine.counts().keys() {
        let ours = mine.get(id);
        let theirs = other.get(id);

        if ours != theirs || include_same {
            entries.insert(id.clone(), DiffEntry::new(ours, theirs));
        }
    }

    for id in other.counts().keys() {
        let ours = mine.get(id);
        let theirs = other.get(id);

        if (ours.is_zero() && !theirs.is_zero()) || include_same {
            entries.insert(id.clone(), DiffEntry::missing(ours, theirs));
        }
    }

    tracing::trace!(
        entries = entries.len(),
        include_same,
        "computed counter diff"
    );

    Diff { entries }
}
