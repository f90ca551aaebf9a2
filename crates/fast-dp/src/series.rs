//! Series engine: partial sums and products of a caller-supplied term function.
//!
//! Terms are indexed from 1: a series of `n_terms` terms evaluates
//! `term(1), term(2), …, term(n_terms)` in that order. Terms are requested
//! through [`TermFn::term_batch`] in chunks of [`EngineConfig::batch`], so a
//! vectorised host callback crosses the boundary once per chunk.
//!
//! # Accumulation
//!
//! [`sum_series`] adds terms left to right with plain floating-point
//! addition, which reproduces a naive loop bit for bit.
//! [`sum_series_compensated`] uses Neumaier summation instead; it is more
//! accurate for long alternating or slowly converging series but may differ
//! from the naive result in the last bits.
//!
//! # Example
//!
//! ```
//! use fast_dp::series::{product_series, sum_series};
//!
//! // 1 + 2 + … + 100
//! let mut k = |k: usize| k as f64;
//! assert_eq!(sum_series(&mut k, 100).unwrap(), 5050.0);
//!
//! // 5! as a product of k
//! assert_eq!(product_series(&mut k, 5).unwrap(), 120.0);
//! ```

use tracing::debug;

use crate::callback::TermFn;
use crate::config::EngineConfig;
use crate::error::CallError;
use crate::kernels::compensated::CompensatedSum;
use crate::traits::SeriesElement;

/// Computes `Σ_{k=1}^{n_terms} term(k)` with plain summation.
///
/// Zero terms sum to `0`.
///
/// # Errors
///
/// Returns `CallError::Callback(e)` with the first error raised by `term`.
/// No partial sum is returned.
pub fn sum_series<T, F>(term: &mut F, n_terms: usize) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: TermFn<T> + ?Sized,
{
    sum_series_with(term, n_terms, &EngineConfig::default())
}

/// Computes `Σ_{k=1}^{n_terms} term(k)` with Neumaier compensated summation.
///
/// # Errors
///
/// Returns `CallError::Callback(e)` with the first error raised by `term`.
pub fn sum_series_compensated<T, F>(term: &mut F, n_terms: usize) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: TermFn<T> + ?Sized,
{
    sum_series_compensated_with(term, n_terms, &EngineConfig::default())
}

/// Computes `Π_{k=1}^{n_terms} term(k)`.
///
/// Zero terms multiply to `1`.
///
/// # Errors
///
/// Returns `CallError::Callback(e)` with the first error raised by `term`.
pub fn product_series<T, F>(term: &mut F, n_terms: usize) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: TermFn<T> + ?Sized,
{
    product_series_with(term, n_terms, &EngineConfig::default())
}

pub(crate) fn sum_series_with<T, F>(
    term: &mut F,
    n_terms: usize,
    config: &EngineConfig,
) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: TermFn<T> + ?Sized,
{
    debug!(n_terms, "sum_series");
    fold_terms(term, n_terms, config, T::zero(), |acc, x| acc + x)
}

pub(crate) fn sum_series_compensated_with<T, F>(
    term: &mut F,
    n_terms: usize,
    config: &EngineConfig,
) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: TermFn<T> + ?Sized,
{
    debug!(n_terms, "sum_series_compensated");
    let sum = fold_terms(term, n_terms, config, CompensatedSum::new(), |mut acc, x| {
        acc.add(x);
        acc
    })?;
    Ok(sum.value())
}

pub(crate) fn product_series_with<T, F>(
    term: &mut F,
    n_terms: usize,
    config: &EngineConfig,
) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: TermFn<T> + ?Sized,
{
    debug!(n_terms, "product_series");
    fold_terms(term, n_terms, config, T::one(), |acc, x| acc * x)
}

/// Folds terms `1..=n_terms` in order, fetching them in batches.
fn fold_terms<T, F, A, G>(
    term: &mut F,
    n_terms: usize,
    config: &EngineConfig,
    init: A,
    mut step: G,
) -> Result<A, CallError<F::Error>>
where
    T: SeriesElement,
    F: TermFn<T> + ?Sized,
    G: FnMut(A, T) -> A,
{
    if n_terms == 0 {
        return Ok(init);
    }

    let chunk = config.batch().min(n_terms);
    let mut buf = vec![T::zero(); chunk];
    let mut acc = init;

    let mut done = 0;
    while done < n_terms {
        let len = chunk.min(n_terms - done);
        term.term_batch(done + 1, &mut buf[..len])
            .map_err(CallError::Callback)?;
        acc = buf[..len].iter().fold(acc, |acc, &x| step(acc, x));
        done += len;
    }

    Ok(acc)
}
