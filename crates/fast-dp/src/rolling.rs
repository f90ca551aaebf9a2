//! Windowed mean engine.
//!
//! Computes a left-clamped, causal moving average: at position `i` the
//! window covers indices `[max(0, i - width + 1), i]`, so the first
//! `width - 1` outputs average a shorter prefix instead of being padded.
//! The output always has the same length as the input.
//!
//! # Algorithm
//!
//! A running sum is updated in O(1) per element: add the entering value,
//! subtract the value leaving the window once the window is full. Total
//! time is O(n) regardless of width.
//!
//! The running sum is kept with Neumaier compensation, so rounding error
//! does not accumulate across billions of add/subtract steps. Non-finite
//! values are counted separately instead of being added to the sum: a NaN
//! (or `+∞` and `-∞` together) makes only the windows that contain it NaN,
//! an infinity makes only its windows infinite, and later windows recover
//! once the value has left. This gives the same result as recomputing each
//! window from scratch ([`rolling_mean_naive`]) up to rounding.
//!
//! If the finite part of a window overflows, that window is summed again
//! from its elements, so the overflow ends with the window that caused it.
//! A window whose elements are all identical yields that value exactly.
//!
//! # Example
//!
//! ```
//! use fast_dp::rolling::rolling_mean;
//!
//! let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//! let result = rolling_mean(&data, 3).unwrap();
//!
//! // Left-clamped: early positions see a shorter window.
//! assert_eq!(result[0], 1.0);
//! assert_eq!(result[1], 1.5);
//! assert_eq!(result[2], 2.0);
//! assert_eq!(result[4], 4.0);
//! ```

use tracing::debug;

use crate::error::Result;
use crate::kernels::compensated::CompensatedSum;
use crate::traits::{validate_window, SeriesElement, ValidatedInput};

/// Computes the left-clamped rolling mean of `data`.
///
/// Empty input yields an empty output.
///
/// # Errors
///
/// Returns `Error::InvalidWindow` if `width` is zero.
///
/// # Performance
///
/// - Time complexity: O(n), independent of `width`
/// - Space complexity: O(n) for the output vector only
pub fn rolling_mean<T: SeriesElement>(data: &[T], width: usize) -> Result<Vec<T>> {
    validate_window(width)?;
    let mut output = vec![T::zero(); data.len()];
    rolling_mean_into(data, width, &mut output)?;
    Ok(output)
}

/// Computes the rolling mean into a pre-allocated output buffer.
///
/// Only the first `data.len()` elements of `output` are written.
///
/// # Errors
///
/// - `Error::InvalidWindow` if `width` is zero
/// - `Error::BufferTooSmall` if `output` is shorter than `data`
pub fn rolling_mean_into<T: SeriesElement>(
    data: &[T],
    width: usize,
    output: &mut [T],
) -> Result<()> {
    validate_window(width)?;
    data.validate_output(output.len())?;
    debug!(len = data.len(), width, "rolling_mean");

    if width == 1 {
        output[..data.len()].copy_from_slice(data);
        return Ok(());
    }

    let width_t = T::from_usize(width)?;
    let mut window = WindowSum::new();
    // Length of the run of equal values ending at `i`.
    let mut run = 0;

    for (i, (&value, out)) in data.iter().zip(output.iter_mut()).enumerate() {
        window.push(value);
        if i >= width {
            window.pop(data[i - width]);
        }
        if !window.finite.is_finite() {
            window.rebuild(&data[(i + 1).saturating_sub(width)..=i]);
        }

        run = if i > 0 && data[i - 1] == value { run + 1 } else { 1 };
        if run >= width.min(i + 1) {
            *out = value;
            continue;
        }

        let count = if i < width {
            T::from_usize(i + 1)?
        } else {
            width_t
        };
        *out = window.mean(count);
    }

    Ok(())
}

/// Computes the rolling mean by summing every window from scratch.
///
/// O(n × width). Provided as a reference for testing [`rolling_mean`];
/// not intended for production use.
///
/// # Errors
///
/// Returns `Error::InvalidWindow` if `width` is zero.
pub fn rolling_mean_naive<T: SeriesElement>(data: &[T], width: usize) -> Result<Vec<T>> {
    validate_window(width)?;

    let mut result = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let start = (i + 1).saturating_sub(width);
        let window = &data[start..=i];
        let sum = window.iter().fold(T::zero(), |acc, &x| acc + x);
        result.push(sum / T::from_usize(window.len())?);
    }

    Ok(result)
}

/// Running sum of a sliding window with non-finite values tracked apart.
#[derive(Debug)]
struct WindowSum<T> {
    finite: CompensatedSum<T>,
    nan: usize,
    pos_inf: usize,
    neg_inf: usize,
}

impl<T: SeriesElement> WindowSum<T> {
    fn new() -> Self {
        Self {
            finite: CompensatedSum::new(),
            nan: 0,
            pos_inf: 0,
            neg_inf: 0,
        }
    }

    #[inline]
    fn push(&mut self, value: T) {
        if value.is_finite() {
            self.finite.add(value);
        } else if value.is_nan() {
            self.nan += 1;
        } else if value > T::zero() {
            self.pos_inf += 1;
        } else {
            self.neg_inf += 1;
        }
    }

    #[inline]
    fn pop(&mut self, value: T) {
        if value.is_finite() {
            self.finite.sub(value);
        } else if value.is_nan() {
            self.nan -= 1;
        } else if value > T::zero() {
            self.pos_inf -= 1;
        } else {
            self.neg_inf -= 1;
        }
    }

    /// Re-sums the finite elements of `window`; the non-finite counts stay exact.
    fn rebuild(&mut self, window: &[T]) {
        self.finite = window.iter().copied().filter(|x| x.is_finite()).collect();
    }

    #[inline]
    fn mean(&self, count: T) -> T {
        if self.nan > 0 || (self.pos_inf > 0 && self.neg_inf > 0) {
            T::nan()
        } else if self.pos_inf > 0 {
            T::infinity()
        } else if self.neg_inf > 0 {
            T::neg_infinity()
        } else {
            self.finite.value() / count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const EPSILON: f64 = 1e-10;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            if e.is_nan() {
                assert!(a.is_nan(), "index {i}: expected NaN, got {a}");
            } else if e.is_infinite() {
                assert_eq!(a, e, "index {i}");
            } else {
                assert!((a - e).abs() < EPSILON, "index {i}: {a} vs {e}");
            }
        }
    }

    #[test]
    fn test_left_clamped_window() {
        let data = [2.0_f64, 4.0, 6.0, 8.0, 10.0, 12.0];
        let result = rolling_mean(&data, 3).unwrap();
        assert_close(&result, &[2.0, 3.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_width_one_is_identity() {
        let data = [1.5_f64, -2.0, 7.25, 0.0];
        assert_eq!(rolling_mean(&data, 1).unwrap(), data.to_vec());
    }

    #[test]
    fn test_width_larger_than_data_is_cumulative_mean() {
        let data = [1.0_f64, 2.0, 3.0, 4.0];
        let result = rolling_mean(&data, 100).unwrap();
        assert_close(&result, &[1.0, 1.5, 2.0, 2.5]);
    }

    #[test]
    fn test_zero_width_is_error() {
        let data = [1.0_f64, 2.0];
        assert_eq!(
            rolling_mean(&data, 0),
            Err(Error::InvalidWindow { width: 0 })
        );
        assert_eq!(
            rolling_mean_naive(&data, 0),
            Err(Error::InvalidWindow { width: 0 })
        );
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let empty: Vec<f64> = vec![];
        assert!(rolling_mean(&empty, 5).unwrap().is_empty());
    }

    #[test]
    fn test_matches_naive() {
        let data: Vec<f64> = (0..500).map(|i| (f64::from(i) * 0.7).sin() * 1e3).collect();
        for width in [1, 2, 3, 10, 499, 500, 501] {
            let fast = rolling_mean(&data, width).unwrap();
            let naive = rolling_mean_naive(&data, width).unwrap();
            for (a, b) in fast.iter().zip(&naive) {
                assert!((a - b).abs() < 1e-9, "width {width}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_nan_only_affects_its_windows() {
        let data = [1.0_f64, f64::NAN, 3.0, 5.0, 7.0];
        let result = rolling_mean(&data, 2).unwrap();
        assert_close(&result, &[1.0, f64::NAN, f64::NAN, 4.0, 6.0]);
        assert_close(&result, &rolling_mean_naive(&data, 2).unwrap());
    }

    #[test]
    fn test_infinities_match_naive() {
        let data = [1.0_f64, f64::INFINITY, 2.0, f64::NEG_INFINITY, 4.0, 6.0];
        let result = rolling_mean(&data, 2).unwrap();
        assert_close(
            &result,
            &[1.0, f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY, 5.0],
        );

        let wide = rolling_mean(&data, 3).unwrap();
        assert_close(&wide, &rolling_mean_naive(&data, 3).unwrap());
    }

    #[test]
    fn test_overflowing_window_recovers() {
        let data = [f64::MAX, f64::MAX, 1.0, 1.0, 1.0, 1.0];
        let result = rolling_mean(&data, 2).unwrap();
        assert_close(&result, &[f64::MAX, f64::MAX, f64::MAX / 2.0, 1.0, 1.0, 1.0]);
        assert_close(&result[2..], &rolling_mean_naive(&data, 2).unwrap()[2..]);

        // A window whose true sum overflows reports infinity until it leaves.
        let data = [f64::MAX, 0.75 * f64::MAX, 2.0, 4.0];
        let result = rolling_mean(&data, 2).unwrap();
        assert_close(&result, &[f64::MAX, f64::INFINITY, 0.375 * f64::MAX, 3.0]);
    }

    #[test]
    fn test_opposite_extremes_cancel() {
        let data = [f64::MAX, -f64::MAX, f64::MAX, 3.0, 5.0];
        let result = rolling_mean(&data, 2).unwrap();
        assert_close(&result, &[f64::MAX, 0.0, 0.0, f64::MAX / 2.0, 4.0]);
    }

    #[test]
    fn test_constant_windows_are_exact() {
        let data = [0.1_f64; 200];
        for width in [1, 2, 3, 7, 500] {
            assert!(rolling_mean(&data, width).unwrap().iter().all(|&x| x == 0.1));
        }

        // Only the windows made entirely of the repeated value are exact.
        let result = rolling_mean(&[1.0_f64, 0.1, 0.1, 0.1], 3).unwrap();
        assert_eq!(result[3], 0.1);
        assert!((result[2] - 0.4).abs() < EPSILON);
    }

    #[test]
    fn test_rolling_mean_into() {
        let data = [1.0_f64, 3.0, 5.0];
        let mut out = [0.0_f64; 4];
        rolling_mean_into(&data, 2, &mut out).unwrap();
        assert_close(&out[..3], &[1.0, 2.0, 4.0]);

        let mut short = [0.0_f64; 2];
        assert_eq!(
            rolling_mean_into(&data, 2, &mut short),
            Err(Error::BufferTooSmall {
                required: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_large_offset_does_not_drift() {
        let data: Vec<f64> = (0..200_000).map(|i| 1e12 + f64::from(i % 3)).collect();
        let result = rolling_mean(&data, 3).unwrap();
        for &value in &result[2..] {
            assert!((value - (1e12 + 1.0)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_f32_support() {
        let data = [1.0_f32, 2.0, 3.0];
        let result = rolling_mean(&data, 2).unwrap();
        assert!((result[2] - 2.5).abs() < 1e-6);
    }
}
