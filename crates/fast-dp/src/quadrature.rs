//! Quadrature engine: rectangle, trapezoid and Simpson rules.
//!
//! Each rule integrates a caller-supplied [`ScalarFn`] over `[a, b]` split
//! into `n` equal subintervals of width `h = (b - a) / n`:
//!
//! | Rule | Formula | Evaluations |
//! |---|---|---|
//! | [`Rule::Rectangle`] (midpoint) | `h · Σ f(a + (i + ½)h)` | `n` |
//! | [`Rule::Trapezoid`] | `h · [(f(a) + f(b)) / 2 + Σ f(a + ih)]` | `n + 1` |
//! | [`Rule::Simpson`] | `h/3 · [f(a) + f(b) + 4Σ_odd + 2Σ_even]` | `n + 1`, `n` even |
//!
//! Simpson's rule needs an even interval count; an odd `n` is promoted to
//! `n + 1` (see [`simpson_interval_count`]).
//!
//! # Evaluation
//!
//! No sample point is evaluated twice. Points are computed as `a + i·h`
//! rather than by repeated addition, and the last point is `b` exactly.
//! They are handed to [`ScalarFn::eval_batch`] in chunks of
//! [`EngineConfig::batch`] points, in increasing order, so a vectorised
//! callback crosses the language boundary once per chunk and the engine
//! never holds more than two chunk buffers regardless of `n`. Weighted
//! values are accumulated with Neumaier compensation.
//!
//! # Bounds
//!
//! - `a == b` integrates to zero without evaluating `f`
//! - `a > b` gives the signed integral, `-∫_b^a f`
//! - a NaN or infinite bound is rejected with `Error::InvalidBounds`
//!
//! # Example
//!
//! ```
//! use fast_dp::quadrature::{integrate_simpson, integrate_trapezoid};
//!
//! let mut square = |x: f64| x * x;
//! let simpson = integrate_simpson(&mut square, 0.0, 3.0, 10).unwrap();
//! assert!((simpson - 9.0).abs() < 1e-12);
//!
//! let trapezoid = integrate_trapezoid(&mut square, 0.0, 3.0, 10).unwrap();
//! assert!((trapezoid - 9.0).abs() < 0.05);
//! ```

use tracing::{debug, trace};

use crate::callback::ScalarFn;
use crate::config::EngineConfig;
use crate::error::{CallError, Error};
use crate::kernels::compensated::CompensatedSum;
use crate::traits::{validate_bounds, validate_interval_count, SeriesElement};

/// A quadrature rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Midpoint rectangle rule.
    Rectangle,
    /// Composite trapezoid rule.
    Trapezoid,
    /// Composite Simpson's 1/3 rule.
    Simpson,
}

impl Rule {
    /// All rules, in order of increasing accuracy on smooth integrands.
    pub const ALL: [Self; 3] = [Self::Rectangle, Self::Trapezoid, Self::Simpson];

    /// Returns the number of function evaluations for `n` subintervals,
    /// when the bounds differ.
    #[must_use]
    pub const fn evaluations(self, n: usize) -> usize {
        match self {
            Self::Rectangle => n,
            Self::Trapezoid => n + 1,
            Self::Simpson => n + n % 2 + 1,
        }
    }

    /// Returns the rule's name in lowercase.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Trapezoid => "trapezoid",
            Self::Simpson => "simpson",
        }
    }
}

/// Returns the even interval count Simpson's rule uses for a requested `n`.
///
/// # Errors
///
/// - `Error::InvalidIntervalCount` if `n` is zero
/// - `Error::NumericConversion` if promoting an odd `n` overflows
pub fn simpson_interval_count(n: usize) -> Result<usize, Error> {
    validate_interval_count(n)?;
    if n % 2 == 0 {
        Ok(n)
    } else {
        n.checked_add(1).ok_or(Error::NumericConversion {
            context: "simpson interval count",
        })
    }
}

/// Integrates `f` over `[a, b]` with `n` subintervals using `rule`.
///
/// # Errors
///
/// - `CallError::Engine(Error::InvalidIntervalCount)` if `n` is zero
/// - `CallError::Engine(Error::InvalidBounds)` if a bound is not finite
/// - `CallError::Callback(e)` with the first error raised by `f`
pub fn integrate<T, F>(rule: Rule, f: &mut F, a: T, b: T, n: usize) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: ScalarFn<T> + ?Sized,
{
    integrate_with(rule, f, a, b, n, &EngineConfig::default())
}

/// Integrates `f` over `[a, b]` with the midpoint rectangle rule.
///
/// Evaluates `f` exactly `n` times.
///
/// # Errors
///
/// See [`integrate`].
pub fn integrate_rectangle<T, F>(f: &mut F, a: T, b: T, n: usize) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: ScalarFn<T> + ?Sized,
{
    integrate(Rule::Rectangle, f, a, b, n)
}

/// Integrates `f` over `[a, b]` with the trapezoid rule.
///
/// Evaluates `f` exactly `n + 1` times; the endpoints once each.
///
/// # Errors
///
/// See [`integrate`].
pub fn integrate_trapezoid<T, F>(f: &mut F, a: T, b: T, n: usize) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: ScalarFn<T> + ?Sized,
{
    integrate(Rule::Trapezoid, f, a, b, n)
}

/// Integrates `f` over `[a, b]` with Simpson's rule.
///
/// An odd `n` is promoted to `n + 1`. Evaluates `f` exactly
/// `simpson_interval_count(n) + 1` times.
///
/// # Errors
///
/// See [`integrate`].
pub fn integrate_simpson<T, F>(f: &mut F, a: T, b: T, n: usize) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: ScalarFn<T> + ?Sized,
{
    integrate(Rule::Simpson, f, a, b, n)
}

pub(crate) fn integrate_with<T, F>(
    rule: Rule,
    f: &mut F,
    a: T,
    b: T,
    n: usize,
    config: &EngineConfig,
) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: ScalarFn<T> + ?Sized,
{
    validate_interval_count(n)?;
    validate_bounds(a, b)?;
    if a == b {
        return Ok(T::zero());
    }

    let intervals = match rule {
        Rule::Simpson => simpson_interval_count(n)?,
        Rule::Rectangle | Rule::Trapezoid => n,
    };
    debug!(rule = rule.name(), intervals, "integrate");

    let h = (b - a) / T::from_usize(intervals)?;
    let grid = Grid { a, b, h, intervals };

    match rule {
        Rule::Rectangle => {
            let sum = weighted_sum(f, intervals, config, |i| grid.midpoint(i), |_| T::one())?;
            Ok(h * sum)
        }
        Rule::Trapezoid => {
            let sum = weighted_sum(
                f,
                node_count(intervals)?,
                config,
                |i| grid.node(i),
                |i| {
                    if i == 0 || i == intervals {
                        T::half()
                    } else {
                        T::one()
                    }
                },
            )?;
            Ok(h * sum)
        }
        Rule::Simpson => {
            let sum = weighted_sum(
                f,
                node_count(intervals)?,
                config,
                |i| grid.node(i),
                |i| {
                    if i == 0 || i == intervals {
                        T::one()
                    } else if i % 2 == 1 {
                        T::four()
                    } else {
                        T::two()
                    }
                },
            )?;
            Ok(h / (T::two() + T::one()) * sum)
        }
    }
}

/// Number of nodes bounding `intervals` subintervals.
fn node_count(intervals: usize) -> Result<usize, Error> {
    intervals.checked_add(1).ok_or(Error::NumericConversion {
        context: "quadrature node count",
    })
}

/// Equally spaced sample points over `[a, b]`.
#[derive(Debug, Clone, Copy)]
struct Grid<T> {
    a: T,
    b: T,
    h: T,
    intervals: usize,
}

impl<T: SeriesElement> Grid<T> {
    /// The `i`-th node, `a + i·h`, with the last node pinned to `b`.
    #[inline]
    fn node(&self, i: usize) -> Result<T, Error> {
        if i == self.intervals {
            Ok(self.b)
        } else {
            Ok(self.a + T::from_usize(i)? * self.h)
        }
    }

    /// The midpoint of the `i`-th subinterval.
    #[inline]
    fn midpoint(&self, i: usize) -> Result<T, Error> {
        Ok(self.a + (T::from_usize(i)? + T::half()) * self.h)
    }
}

/// Evaluates `f` at `point(0..count)` in chunks and returns `Σ weight(i)·f(point(i))`.
fn weighted_sum<T, F, P, W>(
    f: &mut F,
    count: usize,
    config: &EngineConfig,
    point: P,
    weight: W,
) -> Result<T, CallError<F::Error>>
where
    T: SeriesElement,
    F: ScalarFn<T> + ?Sized,
    P: Fn(usize) -> Result<T, Error>,
    W: Fn(usize) -> T,
{
    let chunk = config.batch().min(count);
    let mut xs = vec![T::zero(); chunk];
    let mut ys = vec![T::zero(); chunk];
    let mut sum = CompensatedSum::new();

    let mut start = 0;
    while start < count {
        let len = chunk.min(count - start);
        for (offset, x) in xs[..len].iter_mut().enumerate() {
            *x = point(start + offset)?;
        }

        trace!(start, len, "quadrature chunk");
        f.eval_batch(&xs[..len], &mut ys[..len])
            .map_err(CallError::Callback)?;

        for (offset, &y) in ys[..len].iter().enumerate() {
            sum.add(weight(start + offset) * y);
        }
        start += len;
    }

    Ok(sum.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{CountingFn, Fallible};

    #[test]
    fn test_evaluation_counts() {
        for n in [1_usize, 2, 3, 10, 11, 1000] {
            for rule in Rule::ALL {
                let mut f = CountingFn::new(|x: f64| x.sin());
                integrate(rule, &mut f, 0.0, 1.0, n).unwrap();
                assert_eq!(f.calls(), rule.evaluations(n), "{} n={n}", rule.name());
            }
        }
    }

    #[test]
    fn test_evaluation_counts_across_small_batches() {
        let config = EngineConfig::new().batch_size(7);
        for rule in Rule::ALL {
            let mut f = CountingFn::new(|x: f64| x);
            integrate_with(rule, &mut f, 0.0, 1.0, 50, &config).unwrap();
            assert_eq!(f.calls(), rule.evaluations(50));
        }
    }

    #[test]
    fn test_no_point_evaluated_twice() {
        for rule in Rule::ALL {
            let mut seen: Vec<f64> = Vec::new();
            let mut f = |x: f64| {
                seen.push(x);
                x
            };
            integrate_with(rule, &mut f, -1.0, 2.0, 9, &EngineConfig::new().batch_size(4)).unwrap();
            let mut sorted = seen.clone();
            sorted.sort_by(f64::total_cmp);
            sorted.dedup();
            assert_eq!(sorted.len(), seen.len(), "{}", rule.name());
            assert!(seen.windows(2).all(|w| w[0] < w[1]), "points in increasing order");
        }
    }

    #[test]
    fn test_endpoints_are_exact() {
        let mut seen = Vec::new();
        let mut f = |x: f64| {
            seen.push(x);
            x
        };
        integrate_trapezoid(&mut f, 0.1, 0.7, 3).unwrap();
        assert_eq!(seen.first(), Some(&0.1));
        assert_eq!(seen.last(), Some(&0.7));
    }

    #[test]
    fn test_midpoints() {
        let mut seen = Vec::new();
        let mut f = |x: f64| {
            seen.push(x);
            x
        };
        integrate_rectangle(&mut f, 0.0, 4.0, 4).unwrap();
        assert_eq!(seen, vec![0.5, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_square_from_0_to_10() {
        let exact = 1000.0 / 3.0;
        let mut square = |x: f64| x * x;
        let rect = integrate_rectangle(&mut square, 0.0, 10.0, 100_000).unwrap();
        let trap = integrate_trapezoid(&mut square, 0.0, 10.0, 100_000).unwrap();
        let simp = integrate_simpson(&mut square, 0.0, 10.0, 100_000).unwrap();

        assert!((rect - exact).abs() < 1e-6);
        assert!((trap - exact).abs() < 1e-6);
        assert!((simp - exact).abs() < 1e-9);
        assert!((simp - exact).abs() < (rect - exact).abs());
        assert!((simp - exact).abs() < (trap - exact).abs());
    }

    #[test]
    fn test_linear_is_exact_for_all_rules() {
        for rule in Rule::ALL {
            let mut f = |x: f64| 3.0 * x + 1.0;
            let value = integrate(rule, &mut f, 0.0, 2.0, 8).unwrap();
            assert!((value - 8.0).abs() < 1e-12, "{}", rule.name());
        }
    }

    #[test]
    fn test_cubic_is_exact_for_simpson() {
        let mut cube = |x: f64| x * x * x;
        let value = integrate_simpson(&mut cube, 0.0, 2.0, 2).unwrap();
        assert!((value - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_promotes_odd_n() {
        assert_eq!(simpson_interval_count(1), Ok(2));
        assert_eq!(simpson_interval_count(4), Ok(4));
        assert_eq!(simpson_interval_count(7), Ok(8));
        assert_eq!(
            simpson_interval_count(0),
            Err(Error::InvalidIntervalCount { n: 0 })
        );

        let mut f = |x: f64| x.exp();
        let odd = integrate_simpson(&mut f, 0.0, 1.0, 5).unwrap();
        let even = integrate_simpson(&mut f, 0.0, 1.0, 6).unwrap();
        assert_eq!(odd, even);
    }

    #[test]
    fn test_zero_intervals_is_error() {
        for rule in Rule::ALL {
            let mut f = CountingFn::new(|x: f64| x);
            let err = integrate(rule, &mut f, 0.0, 1.0, 0).unwrap_err();
            assert_eq!(err.engine(), Some(&Error::InvalidIntervalCount { n: 0 }));
            assert_eq!(f.calls(), 0);
        }
    }

    #[test]
    fn test_node_count_overflow_is_error() {
        for rule in [Rule::Trapezoid, Rule::Simpson] {
            let mut f = CountingFn::new(|x: f64| x);
            let err = integrate(rule, &mut f, 0.0, 1.0, usize::MAX).unwrap_err();
            assert!(matches!(err.engine(), Some(Error::NumericConversion { .. })));
            assert_eq!(f.calls(), 0);
        }
        assert_eq!(node_count(usize::MAX - 1), Ok(usize::MAX));
    }

    #[test]
    fn test_non_finite_bounds() {
        let mut f = |x: f64| x;
        let err = integrate_trapezoid(&mut f, 0.0, f64::INFINITY, 10).unwrap_err();
        assert!(matches!(err.engine(), Some(Error::InvalidBounds { .. })));
        let err = integrate_simpson(&mut f, f64::NAN, 1.0, 10).unwrap_err();
        assert!(matches!(err.engine(), Some(Error::InvalidBounds { .. })));
    }

    #[test]
    fn test_equal_bounds_is_zero_without_calls() {
        for rule in Rule::ALL {
            let mut f = CountingFn::new(|x: f64| x + 1.0);
            assert_eq!(integrate(rule, &mut f, 2.5, 2.5, 10).unwrap(), 0.0);
            assert_eq!(f.calls(), 0);
        }
    }

    #[test]
    fn test_reversed_bounds_negate() {
        for rule in Rule::ALL {
            let mut f = |x: f64| x.cos() + x * x;
            let forward = integrate(rule, &mut f, 0.0, 2.0, 200).unwrap();
            let backward = integrate(rule, &mut f, 2.0, 0.0, 200).unwrap();
            assert!((forward + backward).abs() < 1e-12, "{}", rule.name());
        }
    }

    #[test]
    fn test_callback_error_aborts() {
        let mut calls = 0;
        let mut f = Fallible(|x: f64| {
            calls += 1;
            if x > 0.5 {
                Err("out of domain")
            } else {
                Ok(x)
            }
        });
        let err = integrate_with(
            Rule::Trapezoid,
            &mut f,
            0.0,
            1.0,
            100,
            &EngineConfig::new().batch_size(10),
        )
        .unwrap_err();
        assert_eq!(err, CallError::Callback("out of domain"));
        drop(f);
        // Stops at the first failing point (x = 0.51, index 51).
        assert_eq!(calls, 52);
    }

    #[test]
    fn test_dyn_callback() {
        let mut square = |x: f64| x * x;
        let f: &mut dyn ScalarFn<f64, Error = std::convert::Infallible> = &mut square;
        let value = integrate_simpson(f, 0.0, 1.0, 10).unwrap();
        assert!((value - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_f32_integration() {
        let mut f = |x: f32| 2.0 * x;
        let value = integrate_trapezoid(&mut f, 0.0_f32, 1.0, 10).unwrap();
        assert!((value - 1.0).abs() < 1e-5);
    }
}
