//! Elementwise engine: scaling and threshold filtering.
//!
//! Both operations return a new buffer and leave the input untouched.
//!
//! - [`transform`] multiplies every element by a factor.
//! - [`filter`] keeps, in original order, every element strictly greater
//!   than a threshold. NaN is never greater than anything, so NaNs are
//!   dropped. An empty result is a valid output; statistics over it report
//!   `Error::EmptyInput`.
//!
//! # Example
//!
//! ```
//! use fast_dp::elementwise::{filter, transform};
//!
//! let data = vec![-1.0, 0.5, 2.0, 0.5];
//! assert_eq!(transform(&data, 2.0), vec![-2.0, 1.0, 4.0, 1.0]);
//! assert_eq!(filter(&data, 0.5), vec![2.0]);
//! ```

use tracing::debug;

use crate::error::Result;
use crate::traits::{SeriesElement, ValidatedInput};

/// Returns a new buffer with every element multiplied by `factor`.
#[must_use]
pub fn transform<T: SeriesElement>(data: &[T], factor: T) -> Vec<T> {
    debug!(len = data.len(), "transform");
    data.iter().map(|&x| x * factor).collect()
}

/// Writes every element multiplied by `factor` into `output`.
///
/// Only the first `data.len()` elements of `output` are written.
///
/// # Errors
///
/// Returns `Error::BufferTooSmall` if `output` is shorter than `data`.
pub fn transform_into<T: SeriesElement>(data: &[T], factor: T, output: &mut [T]) -> Result<()> {
    data.validate_output(output.len())?;
    for (out, &x) in output.iter_mut().zip(data) {
        *out = x * factor;
    }
    Ok(())
}

/// Returns the elements strictly greater than `threshold`, in original order.
#[must_use]
pub fn filter<T: SeriesElement>(data: &[T], threshold: T) -> Vec<T> {
    debug!(len = data.len(), "filter");
    data.iter().copied().filter(|&x| x > threshold).collect()
}
