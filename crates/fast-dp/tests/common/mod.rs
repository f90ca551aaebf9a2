//! Shared test utilities for fast-dp tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Approximate equality check for floating-point values.
///
/// Two NaN values are considered equal; two equal infinities are equal.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() < eps
}

/// Asserts two slices are elementwise [`approx_eq`].
#[allow(dead_code)]
pub fn assert_slices_close(actual: &[f64], expected: &[f64], eps: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        assert!(approx_eq(a, e, eps), "index {i}: got {a}, expected {e}");
    }
}

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for comparisons involving accumulated floating-point operations.
#[allow(dead_code)]
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Deterministic uniform data in `[low, high)`.
#[allow(dead_code)]
pub fn uniform_data(len: usize, low: f64, high: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(low..high)).collect()
}

/// Mean of a slice computed by plain summation.
#[allow(dead_code)]
pub fn naive_mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Returns a copy sorted with `f64::total_cmp`, which agrees with the
/// engine order on non-NaN, non-zero data.
#[allow(dead_code)]
pub fn reference_sort(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}
