//! Running one engine over many independent buffers.
//!
//! Engines are stateless, so disjoint buffers can be processed concurrently.
//! With the `parallel` feature, [`BatchProcessor`] spreads buffers across the
//! rayon pool once there are enough of them; otherwise, and below the
//! threshold, it processes them in order on the calling thread. Results come
//! back in input order either way, and the first error (in input order for
//! the sequential path, in completion order for the parallel path) is
//! returned.
//!
//! Callback engines (quadrature and series) take `&mut` callbacks and are not
//! run through this module.
//!
//! # Example
//!
//! ```
//! use fast_dp::batch::BatchProcessor;
//! use fast_dp::rolling::rolling_mean;
//!
//! let buffers = vec![
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0],
//!     vec![5.0, 4.0, 3.0, 2.0, 1.0],
//! ];
//!
//! let results = BatchProcessor::new()
//!     .process(&buffers, |b| rolling_mean(b, 3))
//!     .unwrap();
//! assert_eq!(results[0][2], 2.0);
//! assert_eq!(results[1][2], 4.0);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::traits::SeriesElement;

/// Default minimum number of buffers before work is split across threads.
pub const DEFAULT_MIN_PARALLEL_BUFFERS: usize = 4;

/// Applies one engine to many buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProcessor {
    min_parallel_buffers: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProcessor {
    /// Creates a batch processor with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_parallel_buffers: DEFAULT_MIN_PARALLEL_BUFFERS,
        }
    }

    /// Sets the minimum number of buffers for parallel processing.
    ///
    /// Smaller batches run sequentially. Has no effect without the
    /// `parallel` feature.
    #[must_use]
    pub const fn min_parallel_buffers(mut self, count: usize) -> Self {
        self.min_parallel_buffers = count;
        self
    }

    /// Applies `engine` to each buffer and collects the results in order.
    ///
    /// # Errors
    ///
    /// Returns an error if `engine` fails on any buffer.
    #[cfg(feature = "parallel")]
    pub fn process<T, F, R>(&self, buffers: &[Vec<T>], engine: F) -> Result<Vec<R>>
    where
        T: SeriesElement,
        F: Fn(&[T]) -> Result<R> + Send + Sync,
        R: Send,
    {
        debug!(buffers = buffers.len(), "batch");
        if buffers.len() < self.min_parallel_buffers {
            buffers.iter().map(|b| engine(b)).collect()
        } else {
            buffers.par_iter().map(|b| engine(b)).collect()
        }
    }

    /// Applies `engine` to each buffer and collects the results in order.
    ///
    /// # Errors
    ///
    /// Returns an error if `engine` fails on any buffer.
    #[cfg(not(feature = "parallel"))]
    pub fn process<T, F, R>(&self, buffers: &[Vec<T>], engine: F) -> Result<Vec<R>>
    where
        T: SeriesElement,
        F: Fn(&[T]) -> Result<R>,
    {
        debug!(buffers = buffers.len(), "batch");
        buffers.iter().map(|b| engine(b)).collect()
    }

    /// Like [`process`](Self::process), over borrowed slices.
    ///
    /// # Errors
    ///
    /// Returns an error if `engine` fails on any buffer.
    #[cfg(feature = "parallel")]
    pub fn process_refs<T, F, R>(&self, buffers: &[&[T]], engine: F) -> Result<Vec<R>>
    where
        T: SeriesElement,
        F: Fn(&[T]) -> Result<R> + Send + Sync,
        R: Send,
    {
        debug!(buffers = buffers.len(), "batch");
        if buffers.len() < self.min_parallel_buffers {
            buffers.iter().map(|b| engine(b)).collect()
        } else {
            buffers.par_iter().map(|b| engine(b)).collect()
        }
    }

    /// Like [`process`](Self::process), over borrowed slices.
    ///
    /// # Errors
    ///
    /// Returns an error if `engine` fails on any buffer.
    #[cfg(not(feature = "parallel"))]
    pub fn process_refs<T, F, R>(&self, buffers: &[&[T]], engine: F) -> Result<Vec<R>>
    where
        T: SeriesElement,
        F: Fn(&[T]) -> Result<R>,
    {
        debug!(buffers = buffers.len(), "batch");
        buffers.iter().map(|b| engine(b)).collect()
    }
}

/// Shorthand for [`BatchProcessor::new`] followed by [`BatchProcessor::process`].
///
/// # Errors
///
/// Returns an error if `engine` fails on any buffer.
#[cfg(feature = "parallel")]
pub fn process_batch<T, F, R>(buffers: &[Vec<T>], engine: F) -> Result<Vec<R>>
where
    T: SeriesElement,
    F: Fn(&[T]) -> Result<R> + Send + Sync,
    R: Send,
{
    BatchProcessor::new().process(buffers, engine)
}

/// Shorthand for [`BatchProcessor::new`] followed by [`BatchProcessor::process`].
///
/// # Errors
///
/// Returns an error if `engine` fails on any buffer.
#[cfg(not(feature = "parallel"))]
pub fn process_batch<T, F, R>(buffers: &[Vec<T>], engine: F) -> Result<Vec<R>>
where
    T: SeriesElement,
    F: Fn(&[T]) -> Result<R>,
{
    BatchProcessor::new().process(buffers, engine)
}
