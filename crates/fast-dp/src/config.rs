//! Engine tuning knobs.
//!
//! [`EngineConfig`] holds the only two settings the engines consult. Neither
//! changes results beyond floating-point rounding of parallel reductions;
//! they trade memory and scheduling overhead against throughput.
//!
//! ```
//! use fast_dp::EngineConfig;
//!
//! let config = EngineConfig::new()
//!     .parallel_threshold(1 << 20)
//!     .batch_size(8192);
//! assert_eq!(config.batch(), 8192);
//! ```

/// Default minimum buffer length before the `parallel` feature splits work.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 16;

/// Default number of sample points handed to a callback per batch.
pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Tuning knobs for the engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    parallel_threshold: usize,
    batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Creates a configuration with the default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the minimum buffer length for parallel sort and reduction.
    ///
    /// Buffers shorter than this are processed on the calling thread. Has no
    /// effect unless the crate is built with the `parallel` feature.
    #[must_use]
    pub const fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets how many sample points are evaluated per callback batch.
    ///
    /// Quadrature and series engines allocate two buffers of this many
    /// elements regardless of the interval or term count. A batch size of
    /// zero is treated as one.
    #[must_use]
    pub const fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Returns the parallel threshold.
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Returns the effective batch size (never zero).
    #[must_use]
    pub const fn batch(&self) -> usize {
        if self.batch_size == 0 {
            1
        } else {
            self.batch_size
        }
    }

    /// Returns true if a buffer of `len` elements should be split across threads.
    #[must_use]
    pub const fn use_parallel(&self, len: usize) -> bool {
        cfg!(feature = "parallel") && len >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.threshold(), DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.batch(), DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new().parallel_threshold(10).batch_size(3);
        assert_eq!(config.threshold(), 10);
        assert_eq!(config.batch(), 3);
    }

    #[test]
    fn test_zero_batch_is_one() {
        assert_eq!(EngineConfig::new().batch_size(0).batch(), 1);
    }

    #[test]
    fn test_use_parallel_respects_feature() {
        let config = EngineConfig::new().parallel_threshold(100);
        assert!(!config.use_parallel(99));
        assert_eq!(config.use_parallel(100), cfg!(feature = "parallel"));
    }
}
