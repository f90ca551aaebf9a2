//! Running mean and variance using Welford's algorithm.
//!
//! [`RunningStat`] accumulates count, mean and the sum of squared deviations
//! (`m2`) in a single pass. It is numerically stable where the textbook
//! `E[x²] − E[x]²` formula suffers catastrophic cancellation, which matters
//! for buffers of billions of elements with a large common offset.
//!
//! Two accumulators over disjoint parts of a buffer can be combined with
//! [`RunningStat::merge`] (Chan et al. pairwise update), which is how the
//! parallel reduction in [`crate::stats`] splits its work.
//!
//! Mean and `m2` are stored relative to a power-of-two scale that grows with
//! the largest magnitude seen, so every scaled value lies in `(-2, 2)` and
//! `x - mean` cannot overflow even for inputs near `f64::MAX`. Rescaling by
//! a power of two is exact, and the scale stays at 1 until a value of
//! magnitude 2 or more arrives.
//!
//! # Formula
//!
//! ```text
//! For each new value x:
//!   count += 1
//!   delta = x - mean
//!   mean += delta / count
//!   m2 += delta * (x - mean)
//!
//! Merging (a, b):
//!   n = n_a + n_b
//!   delta = mean_b - mean_a
//!   mean = mean_a + delta * n_b / n
//!   m2 = m2_a + m2_b + delta² * n_a * n_b / n
//!
//! Population variance = m2 / count
//! ```
//!
//! # Example
//!
//! ```
//! use fast_dp::kernels::running_stat::RunningStat;
//!
//! let mut stat: RunningStat<f64> = RunningStat::new();
//! stat.update(2.0);
//! stat.update(4.0);
//! stat.update(6.0);
//! assert!((stat.mean() - 4.0).abs() < 1e-12);
//! assert!((stat.variance() - 8.0 / 3.0).abs() < 1e-12);
//! ```
//!
//! # References
//!
//! - Welford, B. P. (1962). "Note on a method for calculating corrected sums
//!   of squares and products". Technometrics. 4 (3): 419–420.
//! - Chan, T. F., Golub, G. H., LeVeque, R. J. (1979). "Updating formulae and
//!   a pairwise algorithm for computing sample variances".

use crate::error::Result;
use crate::traits::SeriesElement;

/// A running statistics accumulator using Welford's algorithm.
///
/// NaN inputs propagate: once a NaN has been folded in, mean and variance
/// are NaN. Infinities are counted instead of being folded into the Welford
/// state, so `[1, +∞, 3]` has mean `+∞` rather than the `∞ - ∞` NaN a raw
/// update would produce. Opposite infinities give a NaN mean, and any
/// infinity gives a NaN variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStat<T> {
    finite: usize,
    scale: T,
    mean: T,
    m2: T,
    pos_inf: usize,
    neg_inf: usize,
}

impl<T: SeriesElement> Default for RunningStat<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> RunningStat<T> {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            finite: 0,
            scale: T::one(),
            mean: T::zero(),
            m2: T::zero(),
            pos_inf: 0,
            neg_inf: 0,
        }
    }

    /// Builds an accumulator over a whole slice.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if a running count cannot be
    /// represented in `T`.
    pub fn from_slice(data: &[T]) -> Result<Self> {
        let mut stat = Self::new();
        for &value in data {
            stat.update_checked(value)?;
        }
        Ok(stat)
    }

    /// Folds one value into the accumulator.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the new count cannot be
    /// represented in `T`.
    #[inline]
    pub fn update_checked(&mut self, value: T) -> Result<()> {
        if value.is_infinite() {
            if value > T::zero() {
                self.pos_inf += 1;
            } else {
                self.neg_inf += 1;
            }
            return Ok(());
        }

        let magnitude = value.abs();
        if magnitude >= self.scale + self.scale {
            self.rescale(power_of_two_floor(magnitude));
        }

        self.finite += 1;
        let count_t = T::from_usize(self.finite)?;
        let x = value / self.scale;
        let delta = x - self.mean;
        self.mean = self.mean + delta / count_t;
        self.m2 = self.m2 + delta * (x - self.mean);
        Ok(())
    }

    /// Moves the scaled state to a larger power-of-two `scale`.
    fn rescale(&mut self, scale: T) {
        if scale <= self.scale {
            return;
        }
        let ratio = self.scale / scale;
        self.mean = self.mean * ratio;
        self.m2 = self.m2 * ratio * ratio;
        self.scale = scale;
    }

    /// Folds one value into the accumulator.
    ///
    /// Counts are always representable in `f32` and `f64` (they only lose
    /// precision past 2^24 / 2^53), so the conversion cannot fail for the
    /// float types this crate is used with.
    #[inline]
    pub fn update(&mut self, value: T) {
        if self.update_checked(value).is_err() {
            self.mean = T::nan();
            self.m2 = T::nan();
        }
    }

    /// Combines two accumulators built over disjoint data.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if a count cannot be represented in `T`.
    pub fn merge(mut self, mut other: Self) -> Result<Self> {
        let pos_inf = self.pos_inf + other.pos_inf;
        let neg_inf = self.neg_inf + other.neg_inf;

        if self.finite == 0 {
            return Ok(Self {
                pos_inf,
                neg_inf,
                ..other
            });
        }
        if other.finite == 0 {
            return Ok(Self {
                pos_inf,
                neg_inf,
                ..self
            });
        }

        self.rescale(other.scale);
        other.rescale(self.scale);

        let finite = self.finite + other.finite;
        let n_a = T::from_usize(self.finite)?;
        let n_b = T::from_usize(other.finite)?;
        let n = T::from_usize(finite)?;

        let delta = other.mean - self.mean;
        let mean = self.mean + delta * (n_b / n);
        let m2 = self.m2 + other.m2 + delta * delta * (n_a * n_b / n);

        Ok(Self {
            finite,
            scale: self.scale,
            mean,
            m2,
            pos_inf,
            neg_inf,
        })
    }

    /// Returns the number of values folded in.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.finite + self.pos_inf + self.neg_inf
    }

    /// Returns the arithmetic mean, or NaN if no values were folded in.
    #[must_use]
    pub fn mean(&self) -> T {
        if self.count() == 0 || self.mean.is_nan() || (self.pos_inf > 0 && self.neg_inf > 0) {
            T::nan()
        } else if self.pos_inf > 0 {
            T::infinity()
        } else if self.neg_inf > 0 {
            T::neg_infinity()
        } else {
            self.mean * self.scale
        }
    }

    /// Returns the population variance (`m2 / count`), or NaN when empty.
    ///
    /// Overflows to `+∞` when the true variance exceeds the range of `T`;
    /// [`RunningStat::std_dev`] stays finite in that case.
    #[must_use]
    pub fn variance(&self) -> T {
        self.scaled_variance() * self.scale * self.scale
    }

    /// Returns the population standard deviation, or NaN when empty.
    #[must_use]
    pub fn std_dev(&self) -> T {
        self.scaled_variance().sqrt() * self.scale
    }

    fn scaled_variance(&self) -> T {
        if self.count() == 0 || self.pos_inf > 0 || self.neg_inf > 0 {
            return T::nan();
        }
        match T::from_usize(self.finite) {
            Ok(n) => {
                let variance = self.m2 / n;
                // Rounding can leave m2 a hair below zero for constant input.
                if variance < T::zero() {
                    T::zero()
                } else {
                    variance
                }
            }
            Err(_) => T::nan(),
        }
    }
}

/// Largest power of two not above `magnitude`, and never below one.
fn power_of_two_floor<T: SeriesElement>(magnitude: T) -> T {
    let (mantissa, exponent, _) = magnitude.integer_decode();
    if mantissa == 0 {
        return T::one();
    }
    let top_bit = i32::try_from(mantissa.ilog2()).unwrap_or(0);
    let power = i32::from(exponent) + top_bit;
    if power <= 0 {
        T::one()
    } else {
        T::two().powi(power)
    }
}
