//! Percentile engine.
//!
//! Computes the fixed percentile set for ranks `0, 5, 10, …, 100` (21 values)
//! from a sorted copy of the data, using linear interpolation between the
//! two closest ranks.
//!
//! # Interpolation and Tie Policy
//!
//! For rank `p` over `n` sorted values:
//!
//! ```text
//! position = p / 100 * (n - 1)
//! lo = floor(position), hi = ceil(position), frac = position - lo
//! value = sorted[lo] + frac * (sorted[hi] - sorted[lo])
//! ```
//!
//! When `position` is integral (`frac == 0`) the value is exactly
//! `sorted[lo]`, so rank 0 is always the minimum and rank 100 the maximum,
//! and an infinity next to an exact rank cannot turn the result into NaN.
//! Repeated values need no special handling: equal neighbours interpolate
//! to themselves.
//!
//! Sorting follows the NaN-last order, so if the data contains NaN the
//! highest ranks (at least rank 100) are NaN.
//!
//! # Example
//!
//! ```
//! use fast_dp::percentile::percentiles;
//!
//! let data: Vec<f64> = (0..=100).map(f64::from).collect();
//! let p = percentiles(&data).unwrap();
//!
//! assert_eq!(p.min(), 0.0);
//! assert_eq!(p.get(25), Some(25.0));
//! assert_eq!(p.max(), 100.0);
//! ```

use std::ops::Index;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::sort::sort_in_place;
use crate::traits::{SeriesElement, ValidatedInput};

/// Number of ranks in a [`PercentileSet`].
pub const PERCENTILE_COUNT: usize = 21;

/// The ranks reported by [`percentiles`], in order.
pub const PERCENTILE_RANKS: [u32; PERCENTILE_COUNT] = [
    0, 5, 10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100,
];

/// Percentile values for ranks `0, 5, …, 100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileSet<T> {
    values: [T; PERCENTILE_COUNT],
}

impl<T: SeriesElement> PercentileSet<T> {
    /// Returns the 21 values in rank order.
    #[must_use]
    pub const fn values(&self) -> &[T; PERCENTILE_COUNT] {
        &self.values
    }

    /// Returns the value for `rank`, if `rank` is one of `0, 5, …, 100`.
    #[must_use]
    pub fn get(&self, rank: u32) -> Option<T> {
        if rank > 100 || rank % 5 != 0 {
            return None;
        }
        self.values.get((rank / 5) as usize).copied()
    }

    /// Rank 0: the minimum of the data.
    #[must_use]
    pub const fn min(&self) -> T {
        self.values[0]
    }

    /// Rank 50.
    #[must_use]
    pub const fn median(&self) -> T {
        self.values[10]
    }

    /// Rank 100: the maximum of the data.
    #[must_use]
    pub const fn max(&self) -> T {
        self.values[PERCENTILE_COUNT - 1]
    }

    /// Iterates over `(rank, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, T)> + '_ {
        PERCENTILE_RANKS.iter().copied().zip(self.values.iter().copied())
    }

    /// Returns the values as a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.values.to_vec()
    }
}

impl<T> Index<usize> for PercentileSet<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}

/// Computes the 21 percentiles of `data`.
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `data` is empty.
///
/// # Performance
///
/// One sorted scratch copy (O(n log n)); the lookups themselves are O(1).
pub fn percentiles<T: SeriesElement>(data: &[T]) -> Result<PercentileSet<T>> {
    percentiles_with(data, &EngineConfig::default())
}

/// Computes a single percentile of `data` for `rank` in `[0, 100]`.
///
/// # Errors
///
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InvalidPercentile` if `rank` is outside `[0, 100]` or NaN
pub fn percentile<T: SeriesElement>(data: &[T], rank: f64) -> Result<T> {
    validate_rank(rank)?;
    data.validate_not_empty()?;
    let mut sorted = data.to_vec();
    sort_in_place(&mut sorted, &EngineConfig::default());
    percentile_of_sorted(&sorted, rank)
}

/// Computes the 21 percentiles of data that is already sorted.
///
/// Use this after [`crate::sort::sorted_copy`] to avoid a second full-size
/// copy. The caller is responsible for the ordering; unsorted input yields
/// meaningless values.
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `sorted` is empty.
pub fn percentiles_of_sorted<T: SeriesElement>(sorted: &[T]) -> Result<PercentileSet<T>> {
    sorted.validate_not_empty()?;
    let mut values = [T::zero(); PERCENTILE_COUNT];
    for (value, &rank) in values.iter_mut().zip(PERCENTILE_RANKS.iter()) {
        *value = interpolate(sorted, f64::from(rank))?;
    }
    Ok(PercentileSet { values })
}

/// Computes a single percentile of data that is already sorted.
///
/// # Errors
///
/// - `Error::EmptyInput` if `sorted` is empty
/// - `Error::InvalidPercentile` if `rank` is outside `[0, 100]` or NaN
pub fn percentile_of_sorted<T: SeriesElement>(sorted: &[T], rank: f64) -> Result<T> {
    validate_rank(rank)?;
    sorted.validate_not_empty()?;
    interpolate(sorted, rank)
}

pub(crate) fn percentiles_with<T: SeriesElement>(
    data: &[T],
    config: &EngineConfig,
) -> Result<PercentileSet<T>> {
    data.validate_not_empty()?;
    debug!(len = data.len(), "percentiles");
    let mut sorted = data.to_vec();
    sort_in_place(&mut sorted, config);
    percentiles_of_sorted(&sorted)
}

pub(crate) fn validate_rank(rank: f64) -> Result<()> {
    if (0.0..=100.0).contains(&rank) {
        Ok(())
    } else {
        Err(Error::InvalidPercentile { rank })
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn interpolate<T: SeriesElement>(sorted: &[T], rank: f64) -> Result<T> {
    let last = sorted.len() - 1;
    let position = rank / 100.0 * last as f64;
    let lo = (position.floor() as usize).min(last);
    let hi = (position.ceil() as usize).min(last);
    let frac = position - position.floor();

    if lo == hi || frac == 0.0 {
        return Ok(sorted[lo]);
    }

    let frac_t = T::from_f64(frac)?;
    Ok(sorted[lo] + frac_t * (sorted[hi] - sorted[lo]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentiles_of_0_to_100() {
        let data: Vec<f64> = (0..=100).rev().map(f64::from).collect();
        let p = percentiles(&data).unwrap();
        for (rank, value) in p.iter() {
            assert!((value - f64::from(rank)).abs() < 1e-12, "rank {rank}");
        }
    }

    #[test]
    fn test_interpolation_between_ranks() {
        // n = 5 -> position = p/100 * 4; rank 5 -> 0.2 between 10 and 20.
        let data = [10.0_f64, 20.0, 30.0, 40.0, 50.0];
        let p = percentiles(&data).unwrap();
        assert!((p.get(5).unwrap() - 12.0).abs() < 1e-12);
        assert!((p.get(50).unwrap() - 30.0).abs() < 1e-12);
        assert!((p.get(95).unwrap() - 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_element() {
        let p = percentiles(&[7.0_f64]).unwrap();
        assert!(p.values().iter().all(|&v| v == 7.0));
    }

    #[test]
    fn test_ties_interpolate_to_themselves() {
        let data = [1.0_f64, 2.0, 2.0, 2.0, 3.0];
        let p = percentiles(&data).unwrap();
        assert_eq!(p.get(30), Some(2.0));
        assert_eq!(p.get(50), Some(2.0));
        assert_eq!(p.get(70), Some(2.0));
    }

    #[test]
    fn test_min_and_max() {
        let data = [3.5_f64, -2.0, 8.25, 0.0, 1.0, 1.0];
        let p = percentiles(&data).unwrap();
        assert_eq!(p.min(), -2.0);
        assert_eq!(p.max(), 8.25);
        assert_eq!(p[0], -2.0);
        assert_eq!(p[20], 8.25);
    }

    #[test]
    fn test_empty_is_error() {
        let empty: Vec<f64> = vec![];
        assert_eq!(percentiles(&empty), Err(Error::EmptyInput));
        assert_eq!(percentile(&empty, 50.0), Err(Error::EmptyInput));
    }

    #[test]
    fn test_invalid_rank() {
        let data = [1.0_f64, 2.0];
        assert_eq!(
            percentile(&data, 101.0),
            Err(Error::InvalidPercentile { rank: 101.0 })
        );
        assert!(matches!(
            percentile(&data, f64::NAN),
            Err(Error::InvalidPercentile { .. })
        ));
    }

    #[test]
    fn test_single_percentile_matches_set() {
        let data: Vec<f64> = (0..37).map(|i| (f64::from(i) * 0.9).sin()).collect();
        let set = percentiles(&data).unwrap();
        for (rank, value) in set.iter() {
            assert_eq!(percentile(&data, f64::from(rank)).unwrap(), value);
        }
    }

    #[test]
    fn test_nan_lands_in_top_rank() {
        let data = [1.0_f64, 2.0, f64::NAN];
        let p = percentiles(&data).unwrap();
        assert_eq!(p.min(), 1.0);
        assert!(p.max().is_nan());
    }

    #[test]
    fn test_infinity_at_exact_rank() {
        let data = [f64::NEG_INFINITY, 0.0, f64::INFINITY];
        let p = percentiles(&data).unwrap();
        assert_eq!(p.min(), f64::NEG_INFINITY);
        assert_eq!(p.median(), 0.0);
        assert_eq!(p.max(), f64::INFINITY);
    }

    #[test]
    fn test_get_rejects_off_grid_ranks() {
        let p = percentiles(&[1.0_f64, 2.0]).unwrap();
        assert_eq!(p.get(7), None);
        assert_eq!(p.get(105), None);
        assert_eq!(p.to_vec().len(), PERCENTILE_COUNT);
    }
}
