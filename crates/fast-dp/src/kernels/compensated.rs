//! Compensated (Neumaier) summation.
//!
//! [`CompensatedSum`] carries a running correction term alongside the sum so
//! that low-order bits lost in each addition are recovered. It tolerates
//! terms larger in magnitude than the running sum (the case plain Kahan
//! summation gets wrong), which is what a sliding window produces when it
//! subtracts a leaving element.
//!
//! Once the running sum overflows, the correction term is no longer
//! meaningful: [`CompensatedSum::value`] then reports the raw sum, and
//! [`CompensatedSum::is_finite`] lets a caller notice and re-sum.
//!
//! ```
//! use fast_dp::kernels::compensated::CompensatedSum;
//!
//! let mut sum = CompensatedSum::new();
//! for term in [1.0_f64, 1e100, 1.0, -1e100] {
//!     sum.add(term);
//! }
//! assert_eq!(sum.value(), 2.0);
//! ```

use crate::traits::SeriesElement;

/// Neumaier compensated accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompensatedSum<T> {
    sum: T,
    compensation: T,
}

impl<T: SeriesElement> Default for CompensatedSum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> CompensatedSum<T> {
    /// Creates a zero sum.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sum: T::zero(),
            compensation: T::zero(),
        }
    }

    /// Adds one term.
    #[inline]
    pub fn add(&mut self, value: T) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation = self.compensation + ((self.sum - total) + value);
        } else {
            self.compensation = self.compensation + ((value - total) + self.sum);
        }
        self.sum = total;
    }

    /// Subtracts one term.
    #[inline]
    pub fn sub(&mut self, value: T) {
        self.add(-value);
    }

    /// Returns the compensated total.
    #[inline]
    #[must_use]
    pub fn value(&self) -> T {
        if self.sum.is_finite() {
            self.sum + self.compensation
        } else {
            self.sum
        }
    }

    /// Returns true while neither the sum nor its correction has overflowed.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.sum.is_finite() && self.compensation.is_finite()
    }
}

impl<T: SeriesElement> FromIterator<T> for CompensatedSum<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sum = Self::new();
        for value in iter {
            sum.add(value);
        }
        sum
    }
}
