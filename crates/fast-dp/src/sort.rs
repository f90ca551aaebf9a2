//! Sort engine.
//!
//! Produces a sorted copy of a buffer in non-decreasing order under the
//! NaN-last total order of [`crate::kernels::total_order`]: NaNs are placed
//! after every other value, including `+∞`. The relative order among NaNs,
//! and between `-0.0` and `+0.0`, is unspecified but deterministic for a
//! given input.
//!
//! The input is never modified. The copy is sorted in place with an
//! unstable pattern-defeating quicksort, so the only allocation is the
//! output itself. With the `parallel` feature, buffers above
//! [`EngineConfig::threshold`](crate::EngineConfig::threshold) are sorted
//! with rayon.
//!
//! # Example
//!
//! ```
//! use fast_dp::sort::sorted_copy;
//!
//! let data = vec![3.0, f64::NAN, 1.0, f64::INFINITY, 2.0];
//! let sorted = sorted_copy(&data);
//!
//! assert_eq!(&sorted[..4], &[1.0, 2.0, 3.0, f64::INFINITY]);
//! assert!(sorted[4].is_nan());
//! // The input is left untouched.
//! assert_eq!(data[0], 3.0);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::kernels::total_order::nan_last_cmp;
use crate::traits::{SeriesElement, ValidatedInput};

/// Returns a sorted copy of `data`.
#[must_use]
pub fn sorted_copy<T: SeriesElement>(data: &[T]) -> Vec<T> {
    sorted_copy_with(data, &EngineConfig::default())
}

/// Writes a sorted copy of `data` into `output`.
///
/// Only the first `data.len()` elements of `output` are written.
///
/// # Errors
///
/// Returns `Error::BufferTooSmall` if `output` is shorter than `data`.
pub fn sort_into<T: SeriesElement>(data: &[T], output: &mut [T]) -> Result<()> {
    data.validate_output(output.len())?;
    let target = &mut output[..data.len()];
    target.copy_from_slice(data);
    sort_in_place(target, &EngineConfig::default());
    Ok(())
}

pub(crate) fn sorted_copy_with<T: SeriesElement>(data: &[T], config: &EngineConfig) -> Vec<T> {
    debug!(len = data.len(), "sorted_copy");
    let mut sorted = data.to_vec();
    sort_in_place(&mut sorted, config);
    sorted
}

/// Sorts a scratch buffer owned by the engine.
pub(crate) fn sort_in_place<T: SeriesElement>(buffer: &mut [T], config: &EngineConfig) {
    #[cfg(feature = "parallel")]
    if config.use_parallel(buffer.len()) {
        buffer.par_sort_unstable_by(nan_last_cmp);
        return;
    }

    #[cfg(not(feature = "parallel"))]
    let _ = config;

    buffer.sort_unstable_by(nan_last_cmp);
}
