//! The stateless processor facade.
//!
//! [`DataProcessor`] groups every engine behind one value that carries only
//! an [`EngineConfig`]. It holds no data between calls, is `Copy`, and can be
//! shared freely across threads; two processors with the same configuration
//! are interchangeable. The free functions in each engine module behave like
//! `DataProcessor::default()`.
//!
//! # Example
//!
//! ```
//! use fast_dp::{DataProcessor, EngineConfig};
//!
//! let processor = DataProcessor::with_config(EngineConfig::new().batch_size(1024));
//! let data = vec![1.0, 2.0, 3.0, 4.0];
//!
//! let stats = processor.stats(&data).unwrap();
//! assert_eq!(stats.mean, 2.5);
//!
//! let area = processor
//!     .integrate_simpson(&mut |x: f64| 3.0 * x * x, 0.0, 1.0, 100)
//!     .unwrap();
//! assert!((area - 1.0).abs() < 1e-12);
//! ```

use crate::callback::{ScalarFn, TermFn};
use crate::config::EngineConfig;
use crate::elementwise;
use crate::error::{CallError, Result};
use crate::percentile::{self, PercentileSet};
use crate::quadrature::{self, Rule};
use crate::rolling;
use crate::series;
use crate::sort;
use crate::stats::{self, Statistics};
use crate::traits::SeriesElement;

/// Stateless entry point to every engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataProcessor {
    config: EngineConfig,
}

impl DataProcessor {
    /// Creates a processor with the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: EngineConfig::new(),
        }
    }

    /// Creates a processor with the given configuration.
    #[must_use]
    pub const fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mean, median and population standard deviation.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if `data` is empty.
    pub fn stats<T: SeriesElement>(&self, data: &[T]) -> Result<Statistics<T>> {
        stats::stats_with(data, &self.config)
    }

    /// A sorted copy of `data`, NaN last.
    #[must_use]
    pub fn sorted_copy<T: SeriesElement>(&self, data: &[T]) -> Vec<T> {
        sort::sorted_copy_with(data, &self.config)
    }

    /// The 21 percentiles at ranks `0, 5, …, 100`.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if `data` is empty.
    pub fn percentiles<T: SeriesElement>(&self, data: &[T]) -> Result<PercentileSet<T>> {
        percentile::percentiles_with(data, &self.config)
    }

    /// A single percentile for `rank` in `[0, 100]`.
    ///
    /// # Errors
    ///
    /// - `Error::EmptyInput` if `data` is empty
    /// - `Error::InvalidPercentile` if `rank` is out of range
    pub fn percentile<T: SeriesElement>(&self, data: &[T], rank: f64) -> Result<T> {
        percentile::validate_rank(rank)?;
        let sorted = sort::sorted_copy_with(data, &self.config);
        percentile::percentile_of_sorted(&sorted, rank)
    }

    /// Left-clamped rolling mean.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidWindow` if `width` is zero.
    pub fn rolling_mean<T: SeriesElement>(&self, data: &[T], width: usize) -> Result<Vec<T>> {
        rolling::rolling_mean(data, width)
    }

    /// Every element multiplied by `factor`.
    #[must_use]
    pub fn transform<T: SeriesElement>(&self, data: &[T], factor: T) -> Vec<T> {
        elementwise::transform(data, factor)
    }

    /// The elements strictly greater than `threshold`, in order.
    #[must_use]
    pub fn filter<T: SeriesElement>(&self, data: &[T], threshold: T) -> Vec<T> {
        elementwise::filter(data, threshold)
    }

    /// Integrates `f` over `[a, b]` with `n` subintervals using `rule`.
    ///
    /// # Errors
    ///
    /// See [`quadrature::integrate`].
    pub fn integrate<T, F>(
        &self,
        rule: Rule,
        f: &mut F,
        a: T,
        b: T,
        n: usize,
    ) -> std::result::Result<T, CallError<F::Error>>
    where
        T: SeriesElement,
        F: ScalarFn<T> + ?Sized,
    {
        quadrature::integrate_with(rule, f, a, b, n, &self.config)
    }

    /// Midpoint rectangle rule.
    ///
    /// # Errors
    ///
    /// See [`quadrature::integrate`].
    pub fn integrate_rectangle<T, F>(
        &self,
        f: &mut F,
        a: T,
        b: T,
        n: usize,
    ) -> std::result::Result<T, CallError<F::Error>>
    where
        T: SeriesElement,
        F: ScalarFn<T> + ?Sized,
    {
        self.integrate(Rule::Rectangle, f, a, b, n)
    }

    /// Trapezoid rule.
    ///
    /// # Errors
    ///
    /// See [`quadrature::integrate`].
    pub fn integrate_trapezoid<T, F>(
        &self,
        f: &mut F,
        a: T,
        b: T,
        n: usize,
    ) -> std::result::Result<T, CallError<F::Error>>
    where
        T: SeriesElement,
        F: ScalarFn<T> + ?Sized,
    {
        self.integrate(Rule::Trapezoid, f, a, b, n)
    }

    /// Simpson's rule; an odd `n` is promoted to `n + 1`.
    ///
    /// # Errors
    ///
    /// See [`quadrature::integrate`].
    pub fn integrate_simpson<T, F>(
        &self,
        f: &mut F,
        a: T,
        b: T,
        n: usize,
    ) -> std::result::Result<T, CallError<F::Error>>
    where
        T: SeriesElement,
        F: ScalarFn<T> + ?Sized,
    {
        self.integrate(Rule::Simpson, f, a, b, n)
    }

    /// `Σ_{k=1}^{n_terms} term(k)`, plain summation.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Callback` if `term` fails.
    pub fn sum_series<T, F>(
        &self,
        term: &mut F,
        n_terms: usize,
    ) -> std::result::Result<T, CallError<F::Error>>
    where
        T: SeriesElement,
        F: TermFn<T> + ?Sized,
    {
        series::sum_series_with(term, n_terms, &self.config)
    }

    /// `Σ_{k=1}^{n_terms} term(k)`, compensated summation.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Callback` if `term` fails.
    pub fn sum_series_compensated<T, F>(
        &self,
        term: &mut F,
        n_terms: usize,
    ) -> std::result::Result<T, CallError<F::Error>>
    where
        T: SeriesElement,
        F: TermFn<T> + ?Sized,
    {
        series::sum_series_compensated_with(term, n_terms, &self.config)
    }

    /// `Π_{k=1}^{n_terms} term(k)`.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Callback` if `term` fails.
    pub fn product_series<T, F>(
        &self,
        term: &mut F,
        n_terms: usize,
    ) -> std::result::Result<T, CallError<F::Error>>
    where
        T: SeriesElement,
        F: TermFn<T> + ?Sized,
    {
        series::product_series_with(term, n_terms, &self.config)
    }
}
