//! A total order over floats with NaN placed last.
//!
//! `partial_cmp` is undefined once NaN is involved, so comparison sorts and
//! selections over raw floats have no fixed result. [`nan_last_cmp`] fixes
//! the order used by every sort, median and percentile in this crate:
//!
//! - non-NaN values compare by IEEE ordering, so `-∞ < … < +∞`;
//! - `-0.0` and `+0.0` compare equal;
//! - every NaN (of either sign) is greater than every non-NaN value,
//!   including `+∞`, and all NaNs compare equal to each other.
//!
//! Unlike [`f64::total_cmp`], a negative-signed NaN does not sort first.

use std::cmp::Ordering;

use num_traits::Float;

/// Compares two floats under the NaN-last total order.
///
/// # Example
///
/// ```
/// use fast_dp::kernels::total_order::nan_last_cmp;
///
/// let mut data = vec![3.0, f64::NAN, -1.0, f64::INFINITY, 0.5];
/// data.sort_by(nan_last_cmp);
/// assert_eq!(&data[..4], &[-1.0, 0.5, 3.0, f64::INFINITY]);
/// assert!(data[4].is_nan());
/// ```
#[inline]
pub fn nan_last_cmp<T: Float>(a: &T, b: &T) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Returns the greater of two floats under the NaN-last order.
#[inline]
pub fn nan_last_max<T: Float>(a: T, b: T) -> T {
    if nan_last_cmp(&a, &b) == Ordering::Less {
        b
    } else {
        a
    }
}
