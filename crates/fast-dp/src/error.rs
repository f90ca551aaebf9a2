//! Error types for fast-dp.
//!
//! Engine failures are reported through [`Error`]. Operations that call back
//! into caller-supplied code (quadrature and series) return [`CallError`],
//! which carries either an engine error or the callback's own error value
//! unchanged.

use std::convert::Infallible;

use thiserror::Error;

/// The main error type for fast-dp operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The input buffer is empty.
    ///
    /// Returned by statistics and percentile operations, which have no
    /// meaningful value over zero elements.
    #[error("empty input: no data provided")]
    EmptyInput,

    /// The window width is not positive.
    #[error("invalid window width {width}: width must be at least 1")]
    InvalidWindow {
        /// The width that was requested.
        width: i64,
    },

    /// The number of quadrature subintervals is less than one.
    #[error("invalid interval count {n}: at least 1 subinterval is required")]
    InvalidIntervalCount {
        /// The interval count that was requested.
        n: i64,
    },

    /// The number of series terms is negative.
    #[error("invalid term count {n_terms}: term count must not be negative")]
    InvalidTermCount {
        /// The term count that was requested.
        n_terms: i64,
    },

    /// An integration bound is NaN or infinite.
    #[error("invalid integration bounds [{a}, {b}]: bounds must be finite")]
    InvalidBounds {
        /// Lower bound.
        a: f64,
        /// Upper bound.
        b: f64,
    },

    /// A percentile rank outside `[0, 100]` was requested.
    #[error("invalid percentile rank {rank}: rank must lie in [0, 100]")]
    InvalidPercentile {
        /// The rank that was requested.
        rank: f64,
    },

    /// A caller-provided output buffer is shorter than the result.
    #[error("output buffer too small: required {required} elements, got {actual}")]
    BufferTooSmall {
        /// The number of elements the result needs.
        required: usize,
        /// The length of the buffer that was provided.
        actual: usize,
    },

    /// Failed to convert a numeric value to the target type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },
}

/// Convenience type alias for Results using the fast-dp [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by operations that invoke a caller-supplied function.
///
/// `E` is the callback's error type. A callback failure aborts the
/// in-progress accumulation and is handed back untouched in
/// [`CallError::Callback`]; no partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError<E> {
    /// The engine rejected its arguments before or during evaluation.
    #[error(transparent)]
    Engine(#[from] Error),

    /// The caller-supplied function failed.
    #[error("callback failed: {0}")]
    Callback(E),
}

impl<E> CallError<E> {
    /// Returns the engine error, if this is one.
    #[must_use]
    pub const fn engine(&self) -> Option<&Error> {
        match self {
            Self::Engine(err) => Some(err),
            Self::Callback(_) => None,
        }
    }

    /// Consumes the error and returns the callback's error, if this is one.
    #[must_use]
    pub fn into_callback(self) -> Option<E> {
        match self {
            Self::Engine(_) => None,
            Self::Callback(err) => Some(err),
        }
    }
}

impl From<CallError<Infallible>> for Error {
    fn from(err: CallError<Infallible>) -> Self {
        match err {
            CallError::Engine(err) => err,
            CallError::Callback(never) => match never {},
        }
    }
}
