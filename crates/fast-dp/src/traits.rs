//! Core traits and argument validation for fast-dp numeric operations.
//!
//! The primary trait is [`SeriesElement`], which abstracts over `f32` and
//! `f64` buffers. [`ValidatedInput`] and the `validate_*` functions implement
//! the argument checks shared by every engine, and the `*_from_i64` helpers
//! turn signed host-language integers into the unsigned counts the engines
//! take, rejecting negative values with the matching error.
//!
//! # Example
//!
//! ```
//! use fast_dp::traits::{SeriesElement, ValidatedInput};
//!
//! fn average<T: SeriesElement>(data: &[T]) -> fast_dp::Result<T> {
//!     data.validate_not_empty()?;
//!     let total = data.iter().fold(T::zero(), |acc, &x| acc + x);
//!     Ok(total / T::from_usize(data.len())?)
//! }
//!
//! assert!((average(&[1.0_f64, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-12);
//! assert!(average::<f64>(&[]).is_err());
//! ```

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A trait for types that can be used as elements of a numeric buffer.
///
/// Blanket-implemented for every `Float + NumCast` type that is `Send + Sync`,
/// which in practice means `f32` and `f64`.
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Creates an element from a `usize` value (counts, indices).
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates an element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Widens the element to `f64`, mapping unrepresentable values to NaN.
    #[inline]
    #[must_use]
    fn to_f64_lossy(self) -> f64 {
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }

    /// Returns the constant 2 as this type.
    #[inline]
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Returns the constant 4 as this type.
    #[inline]
    #[must_use]
    fn four() -> Self {
        Self::two() + Self::two()
    }

    /// Returns the constant 0.5 as this type.
    #[inline]
    #[must_use]
    fn half() -> Self {
        Self::one() / Self::two()
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Trait for validating input buffers before computation.
pub trait ValidatedInput {
    /// The element type of the buffer.
    type Element: SeriesElement;

    /// Returns the length of the buffer.
    fn len(&self) -> usize;

    /// Returns true if the buffer is empty.
    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates that the buffer is not empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if the buffer is empty.
    #[inline]
    fn validate_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(())
        }
    }

    /// Validates that an output buffer of `output_len` elements can hold a
    /// result of the same length as this buffer.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if `output_len` is shorter.
    #[inline]
    fn validate_output(&self, output_len: usize) -> Result<()> {
        if output_len < self.len() {
            Err(Error::BufferTooSmall {
                required: self.len(),
                actual: output_len,
            })
        } else {
            Ok(())
        }
    }
}

impl<T: SeriesElement> ValidatedInput for [T] {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T: SeriesElement> ValidatedInput for Vec<T> {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }
}

/// Validates a window width.
///
/// # Errors
///
/// Returns `Error::InvalidWindow` if the width is zero.
#[inline]
pub const fn validate_window(width: usize) -> Result<()> {
    if width == 0 {
        Err(Error::InvalidWindow { width: 0 })
    } else {
        Ok(())
    }
}

/// Validates a quadrature interval count.
///
/// # Errors
///
/// Returns `Error::InvalidIntervalCount` if `n` is zero.
#[inline]
pub const fn validate_interval_count(n: usize) -> Result<()> {
    if n == 0 {
        Err(Error::InvalidIntervalCount { n: 0 })
    } else {
        Ok(())
    }
}

/// Validates that both integration bounds are finite.
///
/// # Errors
///
/// Returns `Error::InvalidBounds` if either bound is NaN or infinite.
#[inline]
pub fn validate_bounds<T: SeriesElement>(a: T, b: T) -> Result<()> {
    if a.is_finite() && b.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidBounds {
            a: a.to_f64_lossy(),
            b: b.to_f64_lossy(),
        })
    }
}

/// Converts a signed host window width into an engine width.
///
/// # Errors
///
/// Returns `Error::InvalidWindow` if `width <= 0`.
pub fn window_from_i64(width: i64) -> Result<usize> {
    match usize::try_from(width) {
        Ok(w) if w > 0 => Ok(w),
        _ => Err(Error::InvalidWindow { width }),
    }
}

/// Converts a signed host interval count into an engine interval count.
///
/// # Errors
///
/// Returns `Error::InvalidIntervalCount` if `n < 1`.
pub fn interval_count_from_i64(n: i64) -> Result<usize> {
    match usize::try_from(n) {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(Error::InvalidIntervalCount { n }),
    }
}

/// Converts a signed host term count into an engine term count.
///
/// Zero is a valid count (the empty sum).
///
/// # Errors
///
/// Returns `Error::InvalidTermCount` if `n_terms < 0`.
pub fn term_count_from_i64(n_terms: i64) -> Result<usize> {
    usize::try_from(n_terms).map_err(|_| Error::InvalidTermCount { n_terms })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_element_from_usize() {
        let val: f64 = SeriesElement::from_usize(42).unwrap();
        assert!((val - 42.0).abs() < 1e-10);

        let val_f32: f32 = SeriesElement::from_usize(100).unwrap();
        assert!((val_f32 - 100.0).abs() < 1e-5);
    }

    #[test]
    fn test_series_element_constants() {
        assert!((<f64 as SeriesElement>::two() - 2.0).abs() < 1e-15);
        assert!((<f64 as SeriesElement>::four() - 4.0).abs() < 1e-15);
        assert!((<f64 as SeriesElement>::half() - 0.5).abs() < 1e-15);
        assert!((<f32 as SeriesElement>::half() - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_to_f64_lossy() {
        assert!((1.5_f32.to_f64_lossy() - 1.5).abs() < 1e-15);
        assert!(f64::NAN.to_f64_lossy().is_nan());
    }

    #[test]
    fn test_validate_not_empty() {
        let data: Vec<f64> = vec![1.0];
        assert!(data.validate_not_empty().is_ok());

        let empty: Vec<f64> = vec![];
        assert!(matches!(empty.validate_not_empty(), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_validate_output() {
        let data: &[f64] = &[1.0, 2.0, 3.0];
        assert!(data.validate_output(3).is_ok());
        assert!(data.validate_output(8).is_ok());
        assert_eq!(
            data.validate_output(2),
            Err(Error::BufferTooSmall {
                required: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_validate_window() {
        assert!(validate_window(1).is_ok());
        assert_eq!(validate_window(0), Err(Error::InvalidWindow { width: 0 }));
    }

    #[test]
    fn test_validate_interval_count() {
        assert!(validate_interval_count(1).is_ok());
        assert_eq!(
            validate_interval_count(0),
            Err(Error::InvalidIntervalCount { n: 0 })
        );
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_bounds(0.0_f64, 1.0).is_ok());
        assert!(validate_bounds(1.0_f64, 0.0).is_ok());
        assert!(matches!(
            validate_bounds(f64::NAN, 1.0),
            Err(Error::InvalidBounds { .. })
        ));
        assert!(matches!(
            validate_bounds(0.0_f32, f32::INFINITY),
            Err(Error::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_window_from_i64() {
        assert_eq!(window_from_i64(5), Ok(5));
        assert_eq!(window_from_i64(0), Err(Error::InvalidWindow { width: 0 }));
        assert_eq!(window_from_i64(-7), Err(Error::InvalidWindow { width: -7 }));
    }

    #[test]
    fn test_interval_count_from_i64() {
        assert_eq!(interval_count_from_i64(1000), Ok(1000));
        assert_eq!(
            interval_count_from_i64(0),
            Err(Error::InvalidIntervalCount { n: 0 })
        );
        assert_eq!(
            interval_count_from_i64(-2),
            Err(Error::InvalidIntervalCount { n: -2 })
        );
    }

    #[test]
    fn test_term_count_from_i64() {
        assert_eq!(term_count_from_i64(0), Ok(0));
        assert_eq!(term_count_from_i64(10), Ok(10));
        assert_eq!(
            term_count_from_i64(-1),
            Err(Error::InvalidTermCount { n_terms: -1 })
        );
    }

    #[test]
    fn test_series_element_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<f64>();
        assert_send_sync::<f32>();
    }
}
