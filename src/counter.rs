//! Associative counter bounded by an optional reference.
//!
//! This module provides [`Counter`], a mapping from identifiers to
//! quantities. A counter may own a second counter, its *reference*, which
//! caps how far [`Counter::add_with`] can raise each identifier and serves as
//! the default target of [`Counter::diff`] and [`Counter::compare`].
//!
//! ```text
//!   reference  {apples: 3, pears: 1}
//!                 ▲          ▲
//!                 │ cap      │ cap
//!   count      {apples: 2}  (pears: 0)
//!
//!   add("apples")       → true   (2 + 1 <= 3)
//!   add("apples")       → false  (3 + 1 >  3)
//!   add("plums")        → false  (0 + 1 >  0)
//!   add_with("plums", AddOptions::new().force(true)) → true
//! ```

use crate::diff::{self, Diff, DiffOptions};
use crate::error::{CounterError, Result};
use crate::quantity::{quantity_or_zero, Quantity};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};

/// Options for [`Counter::add_with`].
///
/// By default an add raises the quantity by one and respects the reference.
///
/// # Examples
///
/// ```rust
/// use tally::counter::{AddOptions, Counter};
///
/// let mut counter: Counter = Counter::with_reference([("a", 0)], [("a", 1)]);
///
/// assert!(!counter.add_with("a", AddOptions::new().qty(2)));
/// assert!(counter.add_with("a", AddOptions::new().qty(2).force(true)));
/// assert_eq!(counter.get("a"), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddOptions<V = i64> {
    qty: V,
    force: bool,
}

impl<V: Quantity> Default for AddOptions<V> {
    fn default() -> Self {
        Self {
            qty: V::one(),
            force: false,
        }
    }
}

impl<V: Quantity> AddOptions<V> {
    /// Creates the default options: quantity one, reference enforced.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quantity to add. Zero is allowed.
    pub fn qty(mut self, qty: V) -> Self {
        self.qty = qty;
        self
    }

    /// Sets whether the reference bound is bypassed.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// A mapping from identifiers to quantities, optionally bounded by a reference.
///
/// Identifiers that were never counted read as zero. When a reference is
/// present, a non-forced add only succeeds if the resulting quantity does not
/// exceed the reference's quantity for the same identifier.
///
/// The reference is built once, at construction, and has no reference of
/// its own. Only shared access to it is exposed.
///
/// # Examples
///
/// Unbounded counting:
///
/// ```rust
/// use tally::counter::{AddOptions, Counter};
///
/// let mut counter: Counter = Counter::new();
/// counter.add("a");
/// counter.add_with("a", AddOptions::new().qty(2));
///
/// assert_eq!(counter.get("a"), 3);
/// assert_eq!(counter.get("never-seen"), 0);
/// ```
///
/// Counting against a reference:
///
/// ```rust
/// use tally::counter::Counter;
/// use tally::diff::DiffOptions;
///
/// let mut picked: Counter = Counter::with_reference([] as [(&str, i64); 0], [("a", 1), ("b", 3)]);
/// picked.add("b");
/// picked.add("b");
///
/// let missing = picked.diff(DiffOptions::default()).unwrap();
/// assert_eq!(missing.get("a").unwrap().mine, 0);
/// assert_eq!(missing.get("b").unwrap().diff, -1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Counter<V = i64> {
    count: BTreeMap<String, V>,
    reference: Option<Box<Counter<V>>>,
}

impl<V> Default for Counter<V> {
    fn default() -> Self {
        Self {
            count: BTreeMap::new(),
            reference: None,
        }
    }
}

impl<V: Quantity> Counter<V> {
    /// Creates an empty counter with no reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a counter prefilled with `counts` and no reference.
    ///
    /// Later pairs overwrite earlier ones with the same identifier.
    pub fn from_counts<I, K>(counts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        Self {
            count: collect_counts(counts),
            reference: None,
        }
    }

    /// Creates a counter prefilled with `counts` and bounded by `reference`.
    ///
    /// The reference is always constructed, even from an empty iterator; an
    /// empty reference rejects every non-forced add with a positive quantity.
    pub fn with_reference<I, K, R, Q>(counts: I, reference: R) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        R: IntoIterator<Item = (Q, V)>,
        Q: Into<String>,
    {
        Self {
            count: collect_counts(counts),
            reference: Some(Box::new(Self::from_counts(reference))),
        }
    }

    /// Adds one to `id`.
    ///
    /// Equivalent to `add_with(id, AddOptions::default())`.
    pub fn add(&mut self, id: &str) -> bool {
        self.add_with(id, AddOptions::default())
    }

    /// Adds `options.qty` to `id`, returning whether the add was accepted.
    ///
    /// The add is accepted when forced, when there is no reference, or when
    /// the new quantity does not exceed the reference's quantity for `id`.
    /// A rejected add leaves the counter untouched. An add whose result does
    /// not fit in `V` is rejected even when forced.
    pub fn add_with(&mut self, id: &str, options: AddOptions<V>) -> bool {
        let current = self.get(id);
        let Some(new_qty) = current.checked_sum(options.qty) else {
            tracing::debug!(id, current = %current, qty = %options.qty, "add rejected on overflow");
            return false;
        };

        let accepted = options.force
            || match &self.reference {
                None => true,
                Some(reference) => new_qty <= reference.get(id),
            };

        if !accepted {
            tracing::debug!(
                id,
                requested = %new_qty,
                "add rejected by reference"
            );
            return false;
        }

        tracing::trace!(id, qty = %new_qty, force = options.force, "count updated");
        self.count.insert(id.to_owned(), new_qty);
        true
    }

    /// Returns the quantity counted for `id`, or zero if it was never counted.
    pub fn get(&self, id: &str) -> V {
        quantity_or_zero(&self.count, id)
    }

    /// Returns every counted identifier with its quantity.
    ///
    /// Identifiers that were never added are not present. Identifiers added
    /// with a zero quantity are.
    pub fn counts(&self) -> &BTreeMap<String, V> {
        &self.count
    }

    /// Iterates over `(id, quantity)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, V)> {
        self.count.iter().map(|(id, qty)| (id.as_str(), *qty))
    }

    /// Returns the number of counted identifiers.
    pub fn len(&self) -> usize {
        self.count.len()
    }

    /// Returns `true` if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.count.is_empty()
    }

    /// Returns `true` if the counter was built with a reference.
    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Returns the reference counter, if any.
    pub fn reference(&self) -> Option<&Counter<V>> {
        self.reference.as_deref()
    }

    /// Returns the reference quantity for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::NoReference`] if the counter has no reference.
    /// Identifiers missing from an existing reference read as zero.
    pub fn get_reference(&self, id: &str) -> Result<V> {
        self.require_reference().map(|reference| reference.get(id))
    }

    /// Returns every identifier counted by the reference.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::NoReference`] if the counter has no reference.
    pub fn reference_counts(&self) -> Result<&BTreeMap<String, V>> {
        self.require_reference().map(Counter::counts)
    }

    /// Diffs this counter against its reference.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::NoCounter`] if the counter has no reference.
    pub fn diff(&self, options: DiffOptions) -> Result<Diff<V>> {
        let reference = self.reference.as_deref().ok_or(CounterError::NoCounter)?;
        Ok(diff::compute(self, reference, options))
    }

    /// Diffs this counter against `other`.
    pub fn diff_against(&self, other: &Counter<V>, options: DiffOptions) -> Diff<V> {
        diff::compute(self, other, options)
    }

    /// Diffs this counter against its reference, reporting every identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::NoCounter`] if the counter has no reference.
    pub fn compare(&self) -> Result<Diff<V>> {
        self.diff(DiffOptions::new().include_same(true))
    }

    /// Diffs this counter against `other`, reporting every identifier.
    pub fn compare_against(&self, other: &Counter<V>) -> Diff<V> {
        self.diff_against(other, DiffOptions::new().include_same(true))
    }

    fn require_reference(&self) -> Result<&Counter<V>> {
        self.reference.as_deref().ok_or(CounterError::NoReference)
    }
}

fn collect_counts<I, K, V>(counts: I) -> BTreeMap<String, V>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
{
    counts.into_iter().map(|(id, qty)| (id.into(), qty)).collect()
}

impl<V: Quantity, K: Into<String>> FromIterator<(K, V)> for Counter<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_counts(iter)
    }
}

impl<V: Quantity> From<BTreeMap<String, V>> for Counter<V> {
    fn from(count: BTreeMap<String, V>) -> Self {
        Self {
            count,
            reference: None,
        }
    }
}

impl<V: Quantity> From<HashMap<String, V>> for Counter<V> {
    fn from(count: HashMap<String, V>) -> Self {
        Self::from_counts(count)
    }
}

impl<V: Display> Display for Counter<V> {
    /// Formats the counts as `{a: 1, b: 2}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (id, qty)) in self.count.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", id, qty)?;
        }
        write!(f, "}}")
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Counter;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct CounterRef<'a, V> {
        count: &'a BTreeMap<String, V>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reference: Option<&'a BTreeMap<String, V>>,
    }

    #[derive(Deserialize)]
    struct CounterOwned<V> {
        count: BTreeMap<String, V>,
        reference: Option<BTreeMap<String, V>>,
    }

    /// Serializes as `{"count": {..}, "reference": {..}}`, with the
    /// reference omitted when absent.
    impl<V: Serialize> Serialize for Counter<V> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            CounterRef {
                count: &self.count,
                reference: self.reference.as_ref().map(|r| &r.count),
            }
            .serialize(serializer)
        }
    }

    impl<'de, V: Deserialize<'de>> Deserialize<'de> for Counter<V> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let owned = CounterOwned::<V>::deserialize(deserializer)?;
            Ok(Counter {
                count: owned.count,
                reference: owned.reference.map(|count| {
                    Box::new(Counter {
                        count,
                        reference: None,
                    })
                }),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::{btreemap, hashmap};
    use tracing_test::traced_test;

    fn empty() -> [(&'static str, i64); 0] {
        []
    }

    #[test]
    fn test_new() {
        let counter: Counter = Counter::new();
        assert!(counter.is_empty());
        assert!(!counter.has_reference());
    }

    #[test]
    fn test_prefilled() {
        let counter: Counter = Counter::from_counts([("a", 1)]);
        assert_eq!(counter.get("a"), 1);
        assert_eq!(counter.len(), 1);
    }

    #[test]
    fn test_missing_is_zero() {
        let counter: Counter = Counter::new();
        assert_eq!(counter.get("a"), 0);
        assert!(counter.counts().is_empty());
    }

    #[test]
    fn test_add_one() {
        let mut counter: Counter = Counter::new();
        assert!(counter.add("a"));
        assert_eq!(counter.get("a"), 1);
    }

    #[test]
    fn test_add_accumulates() {
        let mut counter: Counter = Counter::new();
        counter.add("a");
        counter.add("a");
        counter.add("a");
        assert_eq!(counter.get("a"), 3);
    }

    #[test]
    fn test_add_custom_quantity() {
        let mut counter: Counter = Counter::new();
        counter.add("a");
        counter.add_with("a", AddOptions::new().qty(2));
        counter.add("a");
        assert_eq!(counter.get("a"), 4);
    }

    #[test]
    fn test_add_zero_quantity() {
        let mut counter: Counter = Counter::new();
        assert!(counter.add_with("a", AddOptions::new().qty(0)));
        assert_eq!(counter.get("a"), 0);
        assert_eq!(counter.counts().get("a"), Some(&0));
    }

    #[test]
    fn test_reference_bounds_adds() {
        let mut counter: Counter = Counter::with_reference(empty(), [("a", 1)]);

        assert!(counter.add_with("a", AddOptions::new().qty(0)));
        assert!(counter.add("a"));
        assert!(!counter.add("a"));
        assert!(!counter.add("b"));

        assert_eq!(counter.get("a"), 1);
        assert_eq!(counter.get("b"), 0);
        assert!(!counter.counts().contains_key("b"));
    }

    #[test]
    fn test_force_ignores_reference() {
        let mut counter: Counter = Counter::with_reference(empty(), [("a", 1)]);

        assert!(counter.add_with("a", AddOptions::new().qty(0)));
        assert!(counter.add("a"));
        assert!(counter.add_with("b", AddOptions::new().force(true)));
        assert!(counter.add_with("a", AddOptions::new().qty(1).force(true)));

        assert_eq!(counter.get("a"), 2);
        assert_eq!(counter.get("b"), 1);
    }

    #[test]
    fn test_add_overflow_is_rejected() {
        let mut counter: Counter = Counter::from_counts([("a", i64::MAX)]);

        assert!(!counter.add("a"));
        assert!(!counter.add_with("a", AddOptions::new().force(true)));
        assert_eq!(counter.get("a"), i64::MAX);

        assert!(counter.add_with("a", AddOptions::new().qty(-1)));
        assert_eq!(counter.get("a"), i64::MAX - 1);
    }

    #[test]
    fn test_add_underflow_is_rejected() {
        let mut counter: Counter<i8> = Counter::new();

        assert!(counter.add_with("a", AddOptions::new().qty(i8::MIN)));
        assert!(!counter.add_with("a", AddOptions::new().qty(-1)));
        assert_eq!(counter.get("a"), i8::MIN);
    }

    #[test]
    fn test_diff_against_saturates() {
        let ours: Counter = Counter::from_counts([("a", i64::MAX)]);
        let theirs: Counter = Counter::from_counts([("a", -1), ("b", i64::MIN)]);

        let diff = ours.diff_against(&theirs, DiffOptions::default());
        assert_eq!(diff.get("a").unwrap().diff, i64::MAX);
        let b = diff.get("b").unwrap();
        assert_eq!((b.mine, b.other, b.diff), (0, i64::MIN, i64::MAX));
    }

    #[test]
    fn test_empty_reference_rejects() {
        let mut counter: Counter = Counter::with_reference(empty(), empty());

        assert!(counter.has_reference());
        assert!(!counter.add("a"));
        assert!(counter.add_with("a", AddOptions::new().qty(0)));
    }

    #[test]
    fn test_counts_view() {
        let mut counter: Counter = Counter::new();
        counter.add_with("a", AddOptions::new().qty(0));
        counter.add("b");
        counter.add_with("c", AddOptions::new().qty(2));

        assert_eq!(
            counter.counts(),
            &btreemap! {
                "a".to_string() => 0,
                "b".to_string() => 1,
                "c".to_string() => 2,
            }
        );
    }

    #[test]
    fn test_iter() {
        let counter: Counter = Counter::from_counts([("b", 2), ("a", 1)]);
        let pairs: Vec<_> = counter.iter().collect();
        assert_eq!(pairs, vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn test_get_reference() {
        let counter: Counter = Counter::with_reference(empty(), [("a", 1)]);

        assert_eq!(counter.get_reference("a"), Ok(1));
        assert_eq!(counter.get_reference("b"), Ok(0));
        assert_eq!(
            counter.reference_counts().unwrap().get("a"),
            Some(&1)
        );
        assert!(!counter.reference().unwrap().has_reference());
    }

    #[test]
    fn test_get_reference_without_reference() {
        let counter: Counter = Counter::from_counts([("a", 1)]);

        let err = counter.get_reference("a").unwrap_err();
        assert_eq!(err, CounterError::NoReference);
        assert_eq!(err.code(), "E_NO_REFERENCE");
        assert_eq!(counter.reference_counts(), Err(CounterError::NoReference));
    }

    #[test]
    fn test_diff_against_counter() {
        let c1: Counter = Counter::from_counts([
            ("a", 2),
            ("b", 2),
            ("c", 3),
            ("e", 2),
            ("f", 1),
            ("g", 0),
            ("h", 1),
            ("i", 0),
            ("l", 0),
        ]);
        let c2: Counter = Counter::from_counts([
            ("a", 1),
            ("b", 0),
            ("d", 1),
            ("e", 0),
            ("f", 2),
            ("i", 2),
            ("l", 0),
        ]);

        let diff = c2.diff_against(&c1, DiffOptions::default());

        let a = diff.get("a").unwrap();
        assert_eq!((a.mine, a.other, a.diff), (1, 2, -1));
        assert_eq!(diff.get("b").unwrap().mine, 0);
        let c = diff.get("c").unwrap();
        assert_eq!((c.mine, c.other, c.diff), (0, 3, -3));
        assert_eq!(diff.get("d").unwrap().mine, 1);
        assert_eq!(diff.get("e").unwrap().mine, 0);
        assert_eq!(diff.get("f").unwrap().mine, 2);
        assert!(diff.get("g").is_none());
        assert!(diff.get("l").is_none());
    }

    #[test]
    fn test_diff_against_reference() {
        let mut counter: Counter = Counter::with_reference(empty(), [("a", 1), ("b", 3)]);
        assert!(counter.add_with("b", AddOptions::new().qty(2)));

        let diff = counter.diff(DiffOptions::default()).unwrap();
        assert_eq!(diff.get("a").unwrap().mine, 0);
        assert_eq!(diff.get("b").unwrap().mine, 2);
    }

    #[test]
    fn test_diff_without_counter() {
        let counter: Counter = Counter::from_counts([("a", 1)]);

        let err = counter.diff(DiffOptions::default()).unwrap_err();
        assert_eq!(err.code(), "E_NO_COUNTER");
        assert_eq!(counter.compare(), Err(CounterError::NoCounter));
    }

    #[test]
    fn test_diff_omits_same() {
        let ours: Counter = Counter::from_counts([("a", 1), ("b", 2)]);
        let theirs: Counter = Counter::from_counts([("a", 1), ("b", 3)]);

        let diff = ours.diff_against(&theirs, DiffOptions::default());
        assert!(!diff.contains("a"));
        assert!(diff.contains("b"));
    }

    #[test]
    fn test_compare_against_reference() {
        let counter: Counter =
            Counter::with_reference([("a", 1), ("b", 1), ("d", 3)], [("b", 2), ("c", 1), ("d", 3)]);

        let comparison = counter.compare().unwrap();
        assert_eq!(comparison.len(), 4);

        let pairs: Vec<_> = comparison
            .iter()
            .map(|(id, e)| (id, e.mine, e.other))
            .collect();
        assert_eq!(
            pairs,
            vec![("a", 1, 0), ("b", 1, 2), ("c", 0, 1), ("d", 3, 3)]
        );
    }

    #[test]
    fn test_compare_against_counter() {
        let c1: Counter = Counter::from_counts([("a", 1), ("b", 1), ("d", 3)]);
        let c2: Counter = Counter::from_counts([("b", 2), ("c", 1), ("d", 3)]);

        let comparison = c1.compare_against(&c2);
        let d = comparison.get("d").unwrap();
        assert_eq!((d.mine, d.other), (3, 3));
        assert_eq!(comparison.get("a").unwrap().other, 0);
        assert_eq!(comparison.get("c").unwrap().mine, 0);
    }

    #[test]
    fn test_from_maps() {
        let from_hash: Counter = Counter::from(hashmap! { "a".to_string() => 2 });
        let from_tree: Counter = Counter::from(btreemap! { "a".to_string() => 2 });
        let collected: Counter = vec![("a", 2)].into_iter().collect();

        assert_eq!(from_hash, from_tree);
        assert_eq!(from_tree, collected);
    }

    #[test]
    fn test_real_quantities() {
        let mut counter: Counter<f64> = Counter::with_reference([("w", 0.5)], [("w", 1.0)]);

        assert!(counter.add_with("w", AddOptions::new().qty(0.5)));
        assert!(!counter.add_with("w", AddOptions::new().qty(0.25)));
        assert_eq!(counter.get("w"), 1.0);
    }

    #[test]
    fn test_display() {
        let counter: Counter = Counter::from_counts([("b", 2), ("a", 1)]);
        assert_eq!(counter.to_string(), "{a: 1, b: 2}");
        assert_eq!(Counter::<i64>::new().to_string(), "{}");
    }

    #[test]
    #[traced_test]
    fn test_rejected_add_is_logged() {
        let mut counter: Counter = Counter::with_reference(empty(), [("a", 1)]);
        counter.add("a");
        counter.add("a");

        assert!(logs_contain("count updated"));
        assert!(logs_contain("add rejected by reference"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_serde_roundtrip_keeps_one_level() {
        let counter: Counter = Counter::with_reference([("a", 1)], [("a", 2)]);

        let json = serde_json::to_string(&counter).unwrap();
        assert_eq!(json, r#"{"count":{"a":1},"reference":{"a":2}}"#);

        let back: Counter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counter);
        assert!(!back.reference().unwrap().has_reference());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_deserialize_without_reference() {
        let counter: Counter = serde_json::from_str(r#"{"count":{"x":4}}"#).unwrap();
        assert_eq!(counter.get("x"), 4);
        assert!(!counter.has_reference());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_deserialize_rejects_nested_reference() {
        let json = r#"{"count":{},"reference":{"count":{"a":1}}}"#;
        assert!(serde_json::from_str::<Counter>(json).is_err());
    }
}
