//! Caller-supplied functions evaluated inside numeric loops.
//!
//! The quadrature engine evaluates a scalar function `x ↦ f(x)` and the
//! series engine a term function `k ↦ term(k)`. When these live on the other
//! side of a language boundary, every call is expensive, so both traits
//! expose a batched entry point alongside the scalar one. Engines always call
//! the batched form with a contiguous chunk of sample points; the default
//! implementation loops over the scalar form, and a binding can override it
//! to cross the boundary once per chunk.
//!
//! Plain closures implement the traits directly and cannot fail. Wrap a
//! closure returning `Result` in [`Fallible`] to let it abort an evaluation.
//! Wrap either in [`CountingFn`] to observe how many sample points an engine
//! evaluated.
//!
//! # Determinism
//!
//! Engines evaluate points in increasing index order on the calling thread.
//! A function with side effects or hidden state still runs correctly, but
//! the engine can no longer promise reproducible results.
//!
//! # Example
//!
//! ```
//! use fast_dp::callback::{CountingFn, Fallible, ScalarFn};
//!
//! let mut square = |x: f64| x * x;
//! assert_eq!(square.eval(3.0), Ok(9.0));
//!
//! let mut checked = Fallible(|x: f64| if x < 0.0 { Err("negative") } else { Ok(x.sqrt()) });
//! assert_eq!(checked.eval(-1.0), Err("negative"));
//!
//! let mut counted = CountingFn::new(|x: f64| x + 1.0);
//! let mut out = [0.0; 3];
//! counted.eval_batch(&[1.0, 2.0, 3.0], &mut out).unwrap();
//! assert_eq!(out, [2.0, 3.0, 4.0]);
//! assert_eq!(counted.calls(), 3);
//! ```

use std::convert::Infallible;

/// A scalar function `x ↦ y` evaluated by the quadrature engine.
pub trait ScalarFn<T: Copy> {
    /// Error raised by the function.
    type Error;

    /// Evaluates the function at one point.
    ///
    /// # Errors
    ///
    /// Returns the function's own error; the engine aborts on the first one.
    fn eval(&mut self, x: T) -> Result<T, Self::Error>;

    /// Evaluates the function at every point of `xs`, writing to `out`.
    ///
    /// `out` has the same length as `xs`. Implementations must write every
    /// element on success.
    ///
    /// # Errors
    ///
    /// Returns the first error raised; the contents of `out` are then
    /// unspecified and the engine discards them.
    fn eval_batch(&mut self, xs: &[T], out: &mut [T]) -> Result<(), Self::Error> {
        for (y, &x) in out.iter_mut().zip(xs) {
            *y = self.eval(x)?;
        }
        Ok(())
    }
}

/// A term function `k ↦ a_k` evaluated by the series engine.
///
/// Indices are 1-based: a series of `n` terms evaluates `k = 1, …, n`.
pub trait TermFn<T: Copy> {
    /// Error raised by the function.
    type Error;

    /// Evaluates term `k`.
    ///
    /// # Errors
    ///
    /// Returns the function's own error; the engine aborts on the first one.
    fn term(&mut self, k: usize) -> Result<T, Self::Error>;

    /// Evaluates terms `first, first + 1, …, first + out.len() - 1`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised; the contents of `out` are then
    /// unspecified and the engine discards them.
    fn term_batch(&mut self, first: usize, out: &mut [T]) -> Result<(), Self::Error> {
        for (offset, y) in out.iter_mut().enumerate() {
            *y = self.term(first + offset)?;
        }
        Ok(())
    }
}

impl<T: Copy, F: FnMut(T) -> T> ScalarFn<T> for F {
    type Error = Infallible;

    #[inline]
    fn eval(&mut self, x: T) -> Result<T, Infallible> {
        Ok(self(x))
    }
}

impl<T: Copy, F: FnMut(usize) -> T> TermFn<T> for F {
    type Error = Infallible;

    #[inline]
    fn term(&mut self, k: usize) -> Result<T, Infallible> {
        Ok(self(k))
    }
}

/// Adapts a closure returning `Result` into a fallible [`ScalarFn`] or [`TermFn`].
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<T: Copy, E, F: FnMut(T) -> Result<T, E>> ScalarFn<T> for Fallible<F> {
    type Error = E;

    #[inline]
    fn eval(&mut self, x: T) -> Result<T, E> {
        (self.0)(x)
    }
}

/// Adapts a closure `usize -> Result<T, E>` into a fallible [`TermFn`].
#[derive(Debug, Clone, Copy)]
pub struct FallibleTerm<F>(pub F);

impl<T: Copy, E, F: FnMut(usize) -> Result<T, E>> TermFn<T> for FallibleTerm<F> {
    type Error = E;

    #[inline]
    fn term(&mut self, k: usize) -> Result<T, E> {
        (self.0)(k)
    }
}

/// Counts the sample points submitted to the wrapped function.
///
/// Both scalar and batched calls are counted per point, and batched calls
/// are forwarded as batches, so wrapping does not change how often a
/// boundary is crossed.
#[derive(Debug, Clone, Copy)]
pub struct CountingFn<F> {
    inner: F,
    calls: usize,
}

impl<F> CountingFn<F> {
    /// Wraps `inner` with a zeroed counter.
    pub const fn new(inner: F) -> Self {
        Self { inner, calls: 0 }
    }

    /// Returns the number of points submitted so far.
    #[must_use]
    pub const fn calls(&self) -> usize {
        self.calls
    }

    /// Resets the counter to zero.
    pub fn reset(&mut self) {
        self.calls = 0;
    }

    /// Returns the wrapped function.
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<T: Copy, F: ScalarFn<T>> ScalarFn<T> for CountingFn<F> {
    type Error = F::Error;

    fn eval(&mut self, x: T) -> Result<T, F::Error> {
        self.calls += 1;
        self.inner.eval(x)
    }

    fn eval_batch(&mut self, xs: &[T], out: &mut [T]) -> Result<(), F::Error> {
        self.calls += xs.len();
        self.inner.eval_batch(xs, out)
    }
}

impl<T: Copy, F: TermFn<T>> TermFn<T> for CountingFn<F> {
    type Error = F::Error;

    fn term(&mut self, k: usize) -> Result<T, F::Error> {
        self.calls += 1;
        self.inner.term(k)
    }

    fn term_batch(&mut self, first: usize, out: &mut [T]) -> Result<(), F::Error> {
        self.calls += out.len();
        self.inner.term_batch(first, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_scalar_fn() {
        let mut f = |x: f64| 2.0 * x;
        assert_eq!(f.eval(4.0), Ok(8.0));
    }

    #[test]
    fn test_default_batch_loops_scalar() {
        let mut seen = Vec::new();
        let mut f = |x: f64| {
            seen.push(x);
            -x
        };
        let mut out = [0.0; 3];
        f.eval_batch(&[1.0, 2.0, 3.0], &mut out).unwrap();
        assert_eq!(out, [-1.0, -2.0, -3.0]);
        assert_eq!(seen, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_fallible_stops_at_first_error() {
        let mut calls = 0;
        let mut f = Fallible(|x: f64| {
            calls += 1;
            if x > 1.5 {
                Err(format!("bad point {x}"))
            } else {
                Ok(x)
            }
        });
        let mut out = [0.0; 4];
        let err = f.eval_batch(&[1.0, 2.0, 3.0, 4.0], &mut out).unwrap_err();
        assert_eq!(err, "bad point 2");
        drop(f);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_term_fn_batch_indices() {
        let mut f = |k: usize| k as f64;
        let mut out = [0.0; 4];
        f.term_batch(5, &mut out).unwrap();
        assert_eq!(out, [5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_fallible_term() {
        let mut f = FallibleTerm(|k: usize| if k == 3 { Err(()) } else { Ok(1.0_f64) });
        assert_eq!(f.term(1), Ok(1.0));
        assert_eq!(f.term(3), Err(()));
    }

    #[test]
    fn test_counting_scalar_and_batch() {
        let mut f = CountingFn::new(|x: f64| x);
        f.eval(1.0).unwrap();
        let mut out = [0.0; 5];
        f.eval_batch(&[0.0; 5], &mut out).unwrap();
        assert_eq!(f.calls(), 6);
        f.reset();
        assert_eq!(f.calls(), 0);
    }

    #[test]
    fn test_counting_terms() {
        let mut f = CountingFn::new(|k: usize| k as f64);
        let mut out = [0.0; 7];
        f.term_batch(1, &mut out).unwrap();
        f.term(8).unwrap();
        assert_eq!(f.calls(), 8);
    }
}
