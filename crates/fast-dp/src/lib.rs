//! fast-dp: native engine for bulk numeric processing
//!
//! This crate implements the numeric core behind the `fast_dp` Python
//! module: descriptive statistics, sorting and percentiles over large
//! one-dimensional buffers, and quadrature and series summation over
//! caller-supplied functions.
//!
//! # Features
//!
//! - **Predictable cost**: O(n) statistics, rolling means and filters; one
//!   scratch copy at most for medians and percentiles
//! - **Numerically sound**: Welford mean/variance, compensated running sums,
//!   an explicit NaN-last total order for every sort
//! - **Cheap callbacks**: quadrature and series engines evaluate points in
//!   batches and never evaluate the same point twice
//! - **Generics**: works with both `f32` and `f64`
//!
//! # Quick Start
//!
//! ```
//! use fast_dp::prelude::*;
//!
//! let data = vec![2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
//! let s = stats(&data).unwrap();
//! assert!((s.mean - 5.0).abs() < 1e-12);
//! assert!((s.std_dev - 2.0).abs() < 1e-12);
//!
//! let area = integrate_simpson(&mut |x: f64| x * x, 0.0, 10.0, 1000).unwrap();
//! assert!((area - 1000.0 / 3.0).abs() < 1e-9);
//! ```
//!
//! # Engines
//!
//! - [`stats`](mod@stats): mean, median, population standard deviation
//! - [`sort`]: sorted copy, NaN last
//! - [`percentile`]: the 21 percentiles at ranks `0, 5, …, 100`
//! - [`rolling`]: left-clamped rolling mean
//! - [`elementwise`]: scale and threshold filter
//! - [`quadrature`]: rectangle, trapezoid and Simpson rules
//! - [`series`]: partial sums and products of a term function
//!
//! [`DataProcessor`] bundles all of them behind one configurable value.
//!
//! # Error Handling
//!
//! Every fallible engine returns [`Result<T, Error>`]; the engines that call
//! back into caller code return [`CallError`], which also carries the
//! callback's own error unchanged:
//!
//! ```
//! use fast_dp::prelude::*;
//!
//! let empty: Vec<f64> = vec![];
//! assert_eq!(stats(&empty), Err(Error::EmptyInput));
//!
//! let mut f = Fallible(|x: f64| if x > 0.5 { Err("too large") } else { Ok(x) });
//! let err = integrate_trapezoid(&mut f, 0.0, 1.0, 10).unwrap_err();
//! assert_eq!(err, CallError::Callback("too large"));
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod buffer;
pub mod callback;
pub mod config;
pub mod elementwise;
pub mod error;
pub mod kernels;
pub mod percentile;
pub mod prelude;
pub mod processor;
pub mod quadrature;
pub mod rolling;
pub mod series;
pub mod sort;
pub mod stats;
pub mod traits;

// Re-export commonly used types at crate root
pub use buffer::NumericBuffer;
pub use config::EngineConfig;
pub use error::{CallError, Error, Result};
pub use processor::DataProcessor;
pub use traits::{
    interval_count_from_i64, term_count_from_i64, window_from_i64, SeriesElement, ValidatedInput,
};
