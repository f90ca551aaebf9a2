//! Owned numeric buffer.
//!
//! [`NumericBuffer`] is an ordered, 0-indexed sequence of values. It owns a
//! contiguous `Vec<T>` and dereferences to `[T]`, so every engine that takes
//! a slice accepts it directly. The methods here call the engines and wrap
//! buffer-shaped results in a new `NumericBuffer`; none of them modify `self`.
//!
//! # Example
//!
//! ```
//! use fast_dp::NumericBuffer;
//!
//! let buffer: NumericBuffer<f64> = vec![4.0, 1.0, 3.0, 2.0].into();
//!
//! let filtered = buffer.filter(1.5);
//! assert_eq!(filtered.as_slice(), &[4.0, 3.0, 2.0]);
//!
//! let stats = filtered.stats().unwrap();
//! assert_eq!(stats.median, 3.0);
//!
//! // The original is untouched.
//! assert_eq!(buffer.len(), 4);
//! ```

use std::ops::Deref;

use crate::elementwise;
use crate::error::Result;
use crate::percentile::{self, PercentileSet};
use crate::rolling;
use crate::sort;
use crate::stats::{self, Statistics};
use crate::traits::SeriesElement;

/// An owned, ordered sequence of numeric values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericBuffer<T> {
    data: Vec<T>,
}

impl<T: SeriesElement> NumericBuffer<T> {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates a buffer of `len` copies of `value`.
    #[must_use]
    pub fn filled(value: T, len: usize) -> Self {
        Self {
            data: vec![value; len],
        }
    }

    /// Returns the values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consumes the buffer and returns the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// See [`stats::stats`].
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if the buffer is empty.
    pub fn stats(&self) -> Result<Statistics<T>> {
        stats::stats(&self.data)
    }

    /// See [`sort::sorted_copy`].
    #[must_use]
    pub fn sorted(&self) -> Self {
        sort::sorted_copy(&self.data).into()
    }

    /// See [`percentile::percentiles`].
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if the buffer is empty.
    pub fn percentiles(&self) -> Result<PercentileSet<T>> {
        percentile::percentiles(&self.data)
    }

    /// See [`rolling::rolling_mean`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidWindow` if `width` is zero.
    pub fn rolling_mean(&self, width: usize) -> Result<Self> {
        rolling::rolling_mean(&self.data, width).map(Self::from)
    }

    /// See [`elementwise::transform`].
    #[must_use]
    pub fn transform(&self, factor: T) -> Self {
        elementwise::transform(&self.data, factor).into()
    }

    /// See [`elementwise::filter`].
    #[must_use]
    pub fn filter(&self, threshold: T) -> Self {
        elementwise::filter(&self.data, threshold).into()
    }
}

impl<T> Deref for NumericBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> AsRef<[T]> for NumericBuffer<T> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

impl<T> From<Vec<T>> for NumericBuffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Copy> From<&[T]> for NumericBuffer<T> {
    fn from(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl<T> From<NumericBuffer<T>> for Vec<T> {
    fn from(buffer: NumericBuffer<T>) -> Self {
        buffer.data
    }
}

impl<T> FromIterator<T> for NumericBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for NumericBuffer<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a NumericBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
