//! Commonly used types and traits for convenient importing.
//!
//! ```
//! use fast_dp::prelude::*;
//!
//! let data = vec![3.0_f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
//!
//! let s = stats(&data).unwrap();
//! let p = percentiles(&data).unwrap();
//! let smoothed = rolling_mean(&data, 3).unwrap();
//! let area = integrate_trapezoid(&mut |x: f64| x, 0.0, 2.0, 4).unwrap();
//!
//! assert_eq!(p.min(), 1.0);
//! assert_eq!(smoothed.len(), data.len());
//! assert!((area - 2.0).abs() < 1e-12);
//! assert!(s.std_dev > 0.0);
//! ```

// Error types
pub use crate::error::{CallError, Error, Result};

// Traits
pub use crate::callback::{CountingFn, Fallible, FallibleTerm, ScalarFn, TermFn};
pub use crate::traits::{SeriesElement, ValidatedInput};

// Host integer conversions
pub use crate::traits::{interval_count_from_i64, term_count_from_i64, window_from_i64};

// Buffer, processor and configuration
pub use crate::buffer::NumericBuffer;
pub use crate::config::EngineConfig;
pub use crate::processor::DataProcessor;

// Engines
pub use crate::elementwise::{filter, transform, transform_into};
pub use crate::percentile::{
    percentile, percentile_of_sorted, percentiles, percentiles_of_sorted, PercentileSet,
};
pub use crate::quadrature::{
    integrate, integrate_rectangle, integrate_simpson, integrate_trapezoid, Rule,
};
pub use crate::rolling::{rolling_mean, rolling_mean_into};
pub use crate::series::{product_series, sum_series, sum_series_compensated};
pub use crate::sort::{sort_into, sorted_copy};
pub use crate::stats::{mean, median, stats, std_dev, variance, Statistics};
