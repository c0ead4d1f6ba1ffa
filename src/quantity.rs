//! Numeric quantities stored by a [`Counter`](crate::counter::Counter).
//!
//! A quantity is any signed integer or floating point type. Signedness is
//! required because a [`DiffEntry`](crate::diff::DiffEntry) carries
//! `mine - other`, which is negative whenever the other side holds more.
//!
//! The zero default for identifiers that were never counted comes from
//! [`num_traits::Zero`], so every lookup in the crate goes through
//! [`quantity_or_zero`] instead of spelling out the default at each call site.
//!
//! # Overflow
//!
//! Integer quantities never wrap. An add that would overflow is refused
//! (see [`Quantity::checked_sum`]) and diff arithmetic saturates at the
//! bounds of the type. Floating point quantities follow IEEE semantics and
//! reach infinity instead.

use num_traits::{CheckedAdd, Signed};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

/// A numeric type that can be tallied.
///
/// Implemented for `i8` through `i128`, `isize`, `f32` and `f64`.
///
/// # Examples
///
/// ```rust
/// use tally::quantity::Quantity;
///
/// assert_eq!(20i64.checked_sum(22), Some(42));
/// assert_eq!(i64::MAX.checked_sum(1), None);
/// assert_eq!(i64::MIN.saturating_difference(1), i64::MIN);
/// assert_eq!(0.25f64.checked_sum(0.25), Some(0.5));
/// ```
pub trait Quantity: Signed + Copy + PartialOrd + Debug + Display {
    /// Returns `self + rhs`, or `None` if the sum is not representable.
    fn checked_sum(self, rhs: Self) -> Option<Self>;

    /// Returns `self - rhs`, clamped to the bounds of the type.
    fn saturating_difference(self, rhs: Self) -> Self;

    /// Returns `-self`, clamped to the bounds of the type.
    fn saturating_negation(self) -> Self;
}

macro_rules! integer_quantity {
    ($($t:ty),*) => {
        $(
            impl Quantity for $t {
                #[inline]
                fn checked_sum(self, rhs: Self) -> Option<Self> {
                    CheckedAdd::checked_add(&self, &rhs)
                }

                #[inline]
                fn saturating_difference(self, rhs: Self) -> Self {
                    <$t>::saturating_sub(self, rhs)
                }

                #[inline]
                fn saturating_negation(self) -> Self {
                    <$t>::saturating_neg(self)
                }
            }
        )*
    };
}

macro_rules! float_quantity {
    ($($t:ty),*) => {
        $(
            impl Quantity for $t {
                #[inline]
                fn checked_sum(self, rhs: Self) -> Option<Self> {
                    Some(self + rhs)
                }

                #[inline]
                fn saturating_difference(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline]
                fn saturating_negation(self) -> Self {
                    -self
                }
            }
        )*
    };
}

integer_quantity!(i8, i16, i32, i64, i128, isize);
float_quantity!(f32, f64);

/// Looks up `id`, falling back to zero when it is absent.
#[inline]
pub(crate) fn quantity_or_zero<V: Quantity>(counts: &BTreeMap<String, V>, id: &str) -> V {
    counts.get(id).copied().unwrap_or_else(V::zero)
}
