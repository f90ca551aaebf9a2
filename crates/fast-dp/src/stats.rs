//! Statistics engine: mean, median and population standard deviation.
//!
//! # Algorithm
//!
//! - **Mean and variance** come from a single Welford pass
//!   ([`RunningStat`]). With the `parallel` feature and buffers above the
//!   configured threshold, fixed-size chunks are reduced on the rayon pool
//!   and merged pairwise; the result agrees with the sequential pass up to
//!   floating-point rounding.
//! - **Median** uses selection (`select_nth_unstable_by`) on one scratch
//!   copy, O(n) on average, instead of a full sort. Selection uses the same
//!   NaN-last order as [`crate::sort`], so the value is the one the
//!   full-sort definition gives: the central element for odd lengths, the
//!   mean of the two central elements for even lengths.
//!
//! # Mathematical Conventions
//!
//! - **Population standard deviation**: ÷n, not ÷(n−1)
//! - **NaN**: any NaN makes mean and standard deviation NaN; the median
//!   treats NaN as the greatest value
//! - **Infinity**: the mean is the sign of the infinities present (NaN if
//!   both signs occur); the standard deviation is NaN
//!
//! # Example
//!
//! ```
//! use fast_dp::stats::stats;
//!
//! let data: Vec<f64> = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
//! let s = stats(&data).unwrap();
//!
//! assert!((s.mean - 5.0).abs() < 1e-12);
//! assert!((s.median - 4.5).abs() < 1e-12);
//! assert!((s.std_dev - 2.0).abs() < 1e-12);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::kernels::running_stat::RunningStat;
use crate::kernels::total_order::{nan_last_cmp, nan_last_max};
use crate::traits::{SeriesElement, ValidatedInput};

#[cfg(feature = "parallel")]
const REDUCTION_CHUNK: usize = 1 << 14;

/// Mean, median and population standard deviation of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics<T> {
    /// Arithmetic mean.
    pub mean: T,
    /// Median of the sorted data.
    pub median: T,
    /// Population standard deviation (÷n).
    pub std_dev: T,
}

impl<T: Copy> Statistics<T> {
    /// Returns the triple `(mean, median, std_dev)`.
    #[must_use]
    pub const fn as_tuple(&self) -> (T, T, T) {
        (self.mean, self.median, self.std_dev)
    }
}

impl<T> From<Statistics<T>> for (T, T, T) {
    fn from(s: Statistics<T>) -> Self {
        (s.mean, s.median, s.std_dev)
    }
}

/// Computes mean, median and population standard deviation.
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `data` is empty.
///
/// # Performance
///
/// - Time: O(n) average (one Welford pass plus one selection)
/// - Space: one scratch copy of `data` for the median
pub fn stats<T: SeriesElement>(data: &[T]) -> Result<Statistics<T>> {
    stats_with(data, &EngineConfig::default())
}

/// Computes the arithmetic mean.
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `data` is empty.
pub fn mean<T: SeriesElement>(data: &[T]) -> Result<T> {
    data.validate_not_empty()?;
    Ok(moments(data, &EngineConfig::default())?.mean())
}

/// Computes the population variance (÷n).
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `data` is empty.
pub fn variance<T: SeriesElement>(data: &[T]) -> Result<T> {
    data.validate_not_empty()?;
    Ok(moments(data, &EngineConfig::default())?.variance())
}

/// Computes the population standard deviation (÷n).
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `data` is empty.
pub fn std_dev<T: SeriesElement>(data: &[T]) -> Result<T> {
    data.validate_not_empty()?;
    Ok(moments(data, &EngineConfig::default())?.std_dev())
}

/// Computes the median.
///
/// # Errors
///
/// Returns `Error::EmptyInput` if `data` is empty.
pub fn median<T: SeriesElement>(data: &[T]) -> Result<T> {
    data.validate_not_empty()?;
    let mut scratch = data.to_vec();
    Ok(select_median(&mut scratch))
}

pub(crate) fn stats_with<T: SeriesElement>(
    data: &[T],
    config: &EngineConfig,
) -> Result<Statistics<T>> {
    data.validate_not_empty()?;
    debug!(len = data.len(), "stats");

    let moments = moments(data, config)?;
    let mut scratch = data.to_vec();
    let median = select_median(&mut scratch);

    Ok(Statistics {
        mean: moments.mean(),
        median,
        std_dev: moments.std_dev(),
    })
}

fn moments<T: SeriesElement>(data: &[T], config: &EngineConfig) -> Result<RunningStat<T>> {
    #[cfg(feature = "parallel")]
    if config.use_parallel(data.len()) {
        return data
            .par_chunks(REDUCTION_CHUNK)
            .map(RunningStat::from_slice)
            .try_reduce(RunningStat::new, RunningStat::merge);
    }

    #[cfg(not(feature = "parallel"))]
    let _ = config;

    RunningStat::from_slice(data)
}

/// Median by selection. Reorders `scratch`; it must be non-empty.
pub(crate) fn select_median<T: SeriesElement>(scratch: &mut [T]) -> T {
    let n = scratch.len();
    let mid = n / 2;
    let (lower, &mut upper, _) = scratch.select_nth_unstable_by(mid, nan_last_cmp);

    if n % 2 == 1 {
        return upper;
    }

    // Everything left of `mid` is <= upper; its maximum is the other central element.
    let below = lower
        .iter()
        .copied()
        .fold(T::neg_infinity(), nan_last_max);
    midpoint(below, upper)
}

/// Mean of two values; halves first when only the sum overflows.
fn midpoint<T: SeriesElement>(low: T, high: T) -> T {
    let sum = low + high;
    if sum.is_finite() || !low.is_finite() || !high.is_finite() {
        sum / T::two()
    } else {
        low / T::two() + high / T::two()
    }
}
