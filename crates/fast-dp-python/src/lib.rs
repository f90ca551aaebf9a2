//! Python bindings for the fast-dp numeric engine.
//!
//! This module exposes the buffer engines (statistics, sort, percentiles,
//! rolling mean, transform, filter) over `NumPy` `float64` arrays, and the
//! quadrature and series engines over Python callables.
//!
//! Buffer functions that produce an array of the input's length accept an
//! optional `out` parameter following `NumPy` conventions:
//! - If `out` is provided, results are written directly (zero-copy)
//! - If `out` is None, a new array is allocated and returned
//!
//! Callables are invoked once per sample point. Passing `vectorized=True`
//! instead hands the callable a whole batch of points as a `NumPy` array and
//! expects an array of the same length back.

// Pedantic lint suppressions for Python bindings
#![allow(clippy::too_many_arguments)] // Python functions mirror engine signatures
#![allow(clippy::type_complexity)] // PyO3 types are complex by nature
#![allow(clippy::needless_pass_by_value)] // PyO3 requires pass-by-value for Python interop

use fast_dp::callback::{ScalarFn, TermFn};
use fast_dp::quadrature::Rule;
use fast_dp::{CallError, EngineConfig, Error};
use numpy::{PyArray1, PyArrayMethods, PyReadonlyArray1};
use pyo3::create_exception;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

create_exception!(_fast_dp, EmptyInputError, PyValueError, "The input buffer is empty.");
create_exception!(
    _fast_dp,
    InvalidWindowError,
    PyValueError,
    "The window width is not positive."
);
create_exception!(
    _fast_dp,
    InvalidIntervalCountError,
    PyValueError,
    "The number of subintervals is less than one."
);
create_exception!(
    _fast_dp,
    InvalidTermCountError,
    PyValueError,
    "The number of series terms is negative."
);

/// Convert a fast-dp error to the matching Python exception.
fn to_py_err(e: Error) -> PyErr {
    let message = e.to_string();
    match e {
        Error::EmptyInput => EmptyInputError::new_err(message),
        Error::InvalidWindow { .. } => InvalidWindowError::new_err(message),
        Error::InvalidIntervalCount { .. } => InvalidIntervalCountError::new_err(message),
        Error::InvalidTermCount { .. } => InvalidTermCountError::new_err(message),
        _ => PyValueError::new_err(message),
    }
}

/// Re-raise a callback's exception untouched; map engine errors as usual.
fn call_err(e: CallError<PyErr>) -> PyErr {
    match e {
        CallError::Engine(e) => to_py_err(e),
        CallError::Callback(e) => e,
    }
}

fn batch_length_err(expected: usize, actual: usize) -> PyErr {
    PyValueError::new_err(format!(
        "vectorized callback returned {actual} values for {expected} points"
    ))
}

// =============================================================================
// Callback adapters
// =============================================================================

/// A Python callable used as an integrand.
struct PyScalarFn<'py> {
    f: Bound<'py, PyAny>,
    vectorized: bool,
}

impl<'py> PyScalarFn<'py> {
    fn new(f: Bound<'py, PyAny>, vectorized: bool) -> PyResult<Self> {
        if !f.is_callable() {
            return Err(PyValueError::new_err("f must be callable"));
        }
        Ok(Self { f, vectorized })
    }
}

impl ScalarFn<f64> for PyScalarFn<'_> {
    type Error = PyErr;

    fn eval(&mut self, x: f64) -> PyResult<f64> {
        self.f.call1((x,))?.extract()
    }

    fn eval_batch(&mut self, xs: &[f64], out: &mut [f64]) -> PyResult<()> {
        if !self.vectorized {
            for (y, &x) in out.iter_mut().zip(xs) {
                *y = self.eval(x)?;
            }
            return Ok(());
        }

        let points = PyArray1::from_slice(self.f.py(), xs);
        let result = self.f.call1((points,))?;
        let values: PyReadonlyArray1<'_, f64> = result.extract()?;
        let values = values.as_slice()?;
        if values.len() != out.len() {
            return Err(batch_length_err(out.len(), values.len()));
        }
        out.copy_from_slice(values);
        Ok(())
    }
}

/// A Python callable used as a series term, called with 1-based indices.
struct PyTermFn<'py> {
    term: Bound<'py, PyAny>,
    vectorized: bool,
}

impl<'py> PyTermFn<'py> {
    fn new(term: Bound<'py, PyAny>, vectorized: bool) -> PyResult<Self> {
        if !term.is_callable() {
            return Err(PyValueError::new_err("term must be callable"));
        }
        Ok(Self { term, vectorized })
    }
}

impl TermFn<f64> for PyTermFn<'_> {
    type Error = PyErr;

    fn term(&mut self, k: usize) -> PyResult<f64> {
        self.term.call1((k,))?.extract()
    }

    #[allow(clippy::cast_possible_wrap)]
    fn term_batch(&mut self, first: usize, out: &mut [f64]) -> PyResult<()> {
        if !self.vectorized {
            for (offset, y) in out.iter_mut().enumerate() {
                *y = self.term(first + offset)?;
            }
            return Ok(());
        }

        let indices: Vec<i64> = (first..first + out.len()).map(|k| k as i64).collect();
        let indices = PyArray1::from_vec(self.term.py(), indices);
        let result = self.term.call1((indices,))?;
        let values: PyReadonlyArray1<'_, f64> = result.extract()?;
        let values = values.as_slice()?;
        if values.len() != out.len() {
            return Err(batch_length_err(out.len(), values.len()));
        }
        out.copy_from_slice(values);
        Ok(())
    }
}

// =============================================================================
// Shared implementations
// =============================================================================

/// Runs `fill` on the caller's `out=` array and hands the array back.
///
/// The write goes through numpy's borrow tracking, so an `out` that is (or
/// overlaps) an input array still borrowed for reading raises `ValueError`.
fn fill_output<'py, F>(
    output: Bound<'py, PyArray1<f64>>,
    fill: F,
) -> PyResult<Bound<'py, PyArray1<f64>>>
where
    F: FnOnce(&mut [f64]) -> fast_dp::Result<()>,
{
    {
        let mut guard = output
            .try_readwrite()
            .map_err(|e| PyValueError::new_err(format!("cannot write to out: {e}")))?;
        fill(guard.as_slice_mut()?).map_err(to_py_err)?;
    }
    Ok(output)
}

fn stats_impl(processor: &fast_dp::DataProcessor, data: &[f64]) -> PyResult<(f64, f64, f64)> {
    processor
        .stats(data)
        .map(|s| s.as_tuple())
        .map_err(to_py_err)
}

fn sort_impl<'py>(
    py: Python<'py>,
    processor: &fast_dp::DataProcessor,
    data: &[f64],
    out: Option<Bound<'py, PyArray1<f64>>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    if let Some(output) = out {
        fill_output(output, |slice| fast_dp::sort::sort_into(data, slice))
    } else {
        Ok(PyArray1::from_vec(py, processor.sorted_copy(data)))
    }
}

fn percentiles_impl<'py>(
    py: Python<'py>,
    processor: &fast_dp::DataProcessor,
    data: &[f64],
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let set = processor.percentiles(data).map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, set.to_vec()))
}

fn rolling_mean_impl<'py>(
    py: Python<'py>,
    processor: &fast_dp::DataProcessor,
    data: &[f64],
    width: i64,
    out: Option<Bound<'py, PyArray1<f64>>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let width = fast_dp::window_from_i64(width).map_err(to_py_err)?;
    if let Some(output) = out {
        fill_output(output, |slice| fast_dp::rolling::rolling_mean_into(data, width, slice))
    } else {
        let result = processor.rolling_mean(data, width).map_err(to_py_err)?;
        Ok(PyArray1::from_vec(py, result))
    }
}

fn transform_impl<'py>(
    py: Python<'py>,
    processor: &fast_dp::DataProcessor,
    data: &[f64],
    factor: f64,
    out: Option<Bound<'py, PyArray1<f64>>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    if let Some(output) = out {
        fill_output(output, |slice| fast_dp::elementwise::transform_into(data, factor, slice))
    } else {
        Ok(PyArray1::from_vec(py, processor.transform(data, factor)))
    }
}

fn integrate_impl(
    processor: &fast_dp::DataProcessor,
    rule: Rule,
    f: Bound<'_, PyAny>,
    a: f64,
    b: f64,
    n: i64,
    vectorized: bool,
) -> PyResult<f64> {
    let n = fast_dp::interval_count_from_i64(n).map_err(to_py_err)?;
    let mut f = PyScalarFn::new(f, vectorized)?;
    processor.integrate(rule, &mut f, a, b, n).map_err(call_err)
}

fn sum_series_impl(
    processor: &fast_dp::DataProcessor,
    term: Bound<'_, PyAny>,
    n: i64,
    vectorized: bool,
    compensated: bool,
) -> PyResult<f64> {
    let n = fast_dp::term_count_from_i64(n).map_err(to_py_err)?;
    let mut term = PyTermFn::new(term, vectorized)?;
    if compensated {
        processor.sum_series_compensated(&mut term, n)
    } else {
        processor.sum_series(&mut term, n)
    }
    .map_err(call_err)
}

fn product_series_impl(
    processor: &fast_dp::DataProcessor,
    term: Bound<'_, PyAny>,
    n: i64,
    vectorized: bool,
) -> PyResult<f64> {
    let n = fast_dp::term_count_from_i64(n).map_err(to_py_err)?;
    let mut term = PyTermFn::new(term, vectorized)?;
    processor.product_series(&mut term, n).map_err(call_err)
}

const DEFAULT: fast_dp::DataProcessor = fast_dp::DataProcessor::new();

// =============================================================================
// DataProcessor class
// =============================================================================

/// Stateless processor exposing every engine as a method.
///
/// Args:
///     batch_size: Number of sample points evaluated per callback batch
///     parallel_threshold: Minimum buffer length before work is split across
///         threads (only used when built with the `parallel` feature)
#[pyclass(name = "DataProcessor", module = "fast_dp", frozen)]
struct PyDataProcessor {
    inner: fast_dp::DataProcessor,
}

#[pymethods]
impl PyDataProcessor {
    #[new]
    #[pyo3(signature = (batch_size=None, parallel_threshold=None))]
    fn new(batch_size: Option<usize>, parallel_threshold: Option<usize>) -> Self {
        let mut config = EngineConfig::new();
        if let Some(size) = batch_size {
            config = config.batch_size(size);
        }
        if let Some(threshold) = parallel_threshold {
            config = config.parallel_threshold(threshold);
        }
        Self {
            inner: fast_dp::DataProcessor::with_config(config),
        }
    }

    /// Mean, median and population standard deviation as a tuple.
    fn calculate_stats(&self, data: PyReadonlyArray1<'_, f64>) -> PyResult<(f64, f64, f64)> {
        stats_impl(&self.inner, data.as_slice()?)
    }

    /// Multiply every element by `factor`.
    #[pyo3(signature = (data, factor, out=None))]
    fn transform<'py>(
        &self,
        py: Python<'py>,
        data: PyReadonlyArray1<'py, f64>,
        factor: f64,
        out: Option<Bound<'py, PyArray1<f64>>>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        transform_impl(py, &self.inner, data.as_slice()?, factor, out)
    }

    /// Elements strictly greater than `threshold`, in their original order.
    fn filter<'py>(
        &self,
        py: Python<'py>,
        data: PyReadonlyArray1<'py, f64>,
        threshold: f64,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(PyArray1::from_vec(
            py,
            self.inner.filter(data.as_slice()?, threshold),
        ))
    }

    /// Ascending copy of the data with NaN values last.
    #[pyo3(signature = (data, out=None))]
    fn sort_data<'py>(
        &self,
        py: Python<'py>,
        data: PyReadonlyArray1<'py, f64>,
        out: Option<Bound<'py, PyArray1<f64>>>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        sort_impl(py, &self.inner, data.as_slice()?, out)
    }

    /// The 21 percentiles at ranks 0, 5, ..., 100.
    fn calculate_percentiles<'py>(
        &self,
        py: Python<'py>,
        data: PyReadonlyArray1<'py, f64>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        percentiles_impl(py, &self.inner, data.as_slice()?)
    }

    /// Left-clamped moving average of width `width`.
    #[pyo3(signature = (data, width, out=None))]
    fn calculate_rolling_mean<'py>(
        &self,
        py: Python<'py>,
        data: PyReadonlyArray1<'py, f64>,
        width: i64,
        out: Option<Bound<'py, PyArray1<f64>>>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        rolling_mean_impl(py, &self.inner, data.as_slice()?, width, out)
    }

    /// Midpoint rectangle rule over `[a, b]` with `n` subintervals.
    #[pyo3(signature = (f, a, b, n=1000, vectorized=false))]
    fn integrate_rectangle(
        &self,
        f: Bound<'_, PyAny>,
        a: f64,
        b: f64,
        n: i64,
        vectorized: bool,
    ) -> PyResult<f64> {
        integrate_impl(&self.inner, Rule::Rectangle, f, a, b, n, vectorized)
    }

    /// Trapezoid rule over `[a, b]` with `n` subintervals.
    #[pyo3(signature = (f, a, b, n=1000, vectorized=false))]
    fn integrate_trapezoid(
        &self,
        f: Bound<'_, PyAny>,
        a: f64,
        b: f64,
        n: i64,
        vectorized: bool,
    ) -> PyResult<f64> {
        integrate_impl(&self.inner, Rule::Trapezoid, f, a, b, n, vectorized)
    }

    /// Simpson's rule over `[a, b]`; an odd `n` is raised to the next even count.
    #[pyo3(signature = (f, a, b, n=1000, vectorized=false))]
    fn integrate_simpson(
        &self,
        f: Bound<'_, PyAny>,
        a: f64,
        b: f64,
        n: i64,
        vectorized: bool,
    ) -> PyResult<f64> {
        integrate_impl(&self.inner, Rule::Simpson, f, a, b, n, vectorized)
    }

    /// `term(1) + term(2) + ... + term(n)`.
    #[pyo3(signature = (term, n, vectorized=false, compensated=false))]
    fn sum_series(
        &self,
        term: Bound<'_, PyAny>,
        n: i64,
        vectorized: bool,
        compensated: bool,
    ) -> PyResult<f64> {
        sum_series_impl(&self.inner, term, n, vectorized, compensated)
    }

    /// `term(1) * term(2) * ... * term(n)`; 1.0 when `n` is zero.
    #[pyo3(signature = (term, n, vectorized=false))]
    fn product_series(&self, term: Bound<'_, PyAny>, n: i64, vectorized: bool) -> PyResult<f64> {
        product_series_impl(&self.inner, term, n, vectorized)
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "DataProcessor(batch_size={}, parallel_threshold={})",
            config.batch(),
            config.threshold()
        )
    }
}

// =============================================================================
// Module-level functions
// =============================================================================

/// Mean, median and population standard deviation
///
/// Args:
///     data: Input array (`NumPy` array of f64)
///
/// Returns:
///     Tuple `(mean, median, std_dev)`
///
/// Raises:
///     EmptyInputError: if `data` is empty
#[pyfunction]
fn stats(data: PyReadonlyArray1<'_, f64>) -> PyResult<(f64, f64, f64)> {
    stats_impl(&DEFAULT, data.as_slice()?)
}

/// Sorted copy of the data (ascending, NaN last)
#[pyfunction]
#[pyo3(signature = (data, out=None))]
fn sort_data<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, f64>,
    out: Option<Bound<'py, PyArray1<f64>>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    sort_impl(py, &DEFAULT, data.as_slice()?, out)
}

/// The 21 percentiles at ranks 0, 5, ..., 100 with linear interpolation
///
/// Raises:
///     EmptyInputError: if `data` is empty
#[pyfunction]
fn percentiles<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    percentiles_impl(py, &DEFAULT, data.as_slice()?)
}

/// A single percentile at `rank` in `[0, 100]`
#[pyfunction]
fn percentile(data: PyReadonlyArray1<'_, f64>, rank: f64) -> PyResult<f64> {
    DEFAULT
        .percentile(data.as_slice()?, rank)
        .map_err(to_py_err)
}

/// Left-clamped moving average
///
/// Args:
///     data: Input array (`NumPy` array of f64)
///     width: Window width (must be positive)
///     out: Optional pre-allocated output array for zero-copy writes
///
/// Returns:
///     `NumPy` array of the same length; element `i` averages the last
///     `min(i + 1, width)` values
#[pyfunction]
#[pyo3(signature = (data, width, out=None))]
fn rolling_mean<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, f64>,
    width: i64,
    out: Option<Bound<'py, PyArray1<f64>>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    rolling_mean_impl(py, &DEFAULT, data.as_slice()?, width, out)
}

/// Multiply every element by `factor`
#[pyfunction]
#[pyo3(signature = (data, factor, out=None))]
fn transform<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, f64>,
    factor: f64,
    out: Option<Bound<'py, PyArray1<f64>>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    transform_impl(py, &DEFAULT, data.as_slice()?, factor, out)
}

/// Elements strictly greater than `threshold`
#[pyfunction]
fn filter<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, f64>,
    threshold: f64,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    Ok(PyArray1::from_vec(
        py,
        DEFAULT.filter(data.as_slice()?, threshold),
    ))
}

/// Midpoint rectangle rule
///
/// Args:
///     f: Callable taking a float (or an array of floats when `vectorized`)
///     a: Lower bound
///     b: Upper bound (may be less than `a`; the result changes sign)
///     n: Number of subintervals
///     vectorized: Call `f` once per batch with a `NumPy` array
///
/// Raises:
///     InvalidIntervalCountError: if `n < 1`
///     Any exception raised by `f`
#[pyfunction]
#[pyo3(signature = (f, a, b, n=1000, vectorized=false))]
fn integrate_rectangle(f: Bound<'_, PyAny>, a: f64, b: f64, n: i64, vectorized: bool) -> PyResult<f64> {
    integrate_impl(&DEFAULT, Rule::Rectangle, f, a, b, n, vectorized)
}

/// Trapezoid rule (see `integrate_rectangle` for arguments)
#[pyfunction]
#[pyo3(signature = (f, a, b, n=1000, vectorized=false))]
fn integrate_trapezoid(f: Bound<'_, PyAny>, a: f64, b: f64, n: i64, vectorized: bool) -> PyResult<f64> {
    integrate_impl(&DEFAULT, Rule::Trapezoid, f, a, b, n, vectorized)
}

/// Simpson's rule; an odd `n` is raised to the next even count
#[pyfunction]
#[pyo3(signature = (f, a, b, n=1000, vectorized=false))]
fn integrate_simpson(f: Bound<'_, PyAny>, a: f64, b: f64, n: i64, vectorized: bool) -> PyResult<f64> {
    integrate_impl(&DEFAULT, Rule::Simpson, f, a, b, n, vectorized)
}

/// Partial sum `term(1) + ... + term(n)`
///
/// Args:
///     term: Callable taking a 1-based index (or an int64 array when `vectorized`)
///     n: Number of terms; 0 returns 0.0
///     vectorized: Call `term` once per batch with a `NumPy` array
///     compensated: Use compensated (Neumaier) summation
///
/// Raises:
///     InvalidTermCountError: if `n < 0`
///     Any exception raised by `term`
#[pyfunction]
#[pyo3(signature = (term, n, vectorized=false, compensated=false))]
fn sum_series(term: Bound<'_, PyAny>, n: i64, vectorized: bool, compensated: bool) -> PyResult<f64> {
    sum_series_impl(&DEFAULT, term, n, vectorized, compensated)
}

/// Partial product `term(1) * ... * term(n)`; 1.0 when `n` is zero
#[pyfunction]
#[pyo3(signature = (term, n, vectorized=false))]
fn product_series(term: Bound<'_, PyAny>, n: i64, vectorized: bool) -> PyResult<f64> {
    product_series_impl(&DEFAULT, term, n, vectorized)
}

// =============================================================================
// Module Definition
// =============================================================================

/// fast-dp Python module
///
/// Bulk statistics, windowed means and callback-driven quadrature over
/// `NumPy` arrays.
#[pymodule]
fn _fast_dp(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();

    // Exceptions
    m.add("EmptyInputError", py.get_type::<EmptyInputError>())?;
    m.add("InvalidWindowError", py.get_type::<InvalidWindowError>())?;
    m.add(
        "InvalidIntervalCountError",
        py.get_type::<InvalidIntervalCountError>(),
    )?;
    m.add("InvalidTermCountError", py.get_type::<InvalidTermCountError>())?;

    m.add_class::<PyDataProcessor>()?;

    // Buffer engines
    m.add_function(wrap_pyfunction!(stats, m)?)?;
    m.add_function(wrap_pyfunction!(sort_data, m)?)?;
    m.add_function(wrap_pyfunction!(percentiles, m)?)?;
    m.add_function(wrap_pyfunction!(percentile, m)?)?;
    m.add_function(wrap_pyfunction!(rolling_mean, m)?)?;
    m.add_function(wrap_pyfunction!(transform, m)?)?;
    m.add_function(wrap_pyfunction!(filter, m)?)?;

    // Callback engines
    m.add_function(wrap_pyfunction!(integrate_rectangle, m)?)?;
    m.add_function(wrap_pyfunction!(integrate_trapezoid, m)?)?;
    m.add_function(wrap_pyfunction!(integrate_simpson, m)?)?;
    m.add_function(wrap_pyfunction!(sum_series, m)?)?;
    m.add_function(wrap_pyfunction!(product_series, m)?)?;

    Ok(())
}
