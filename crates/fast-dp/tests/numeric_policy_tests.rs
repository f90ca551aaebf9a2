//! Numeric policy tests.
//!
//! These tests pin down NaN and infinity handling, the sort order, signed
//! zeros and the accuracy guarantees of the accumulators.

#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::unreadable_literal)]

mod common;

use common::{approx_eq, EPSILON};
use fast_dp::percentile::percentiles;
use fast_dp::quadrature::{integrate_simpson, integrate_trapezoid};
use fast_dp::rolling::rolling_mean;
use fast_dp::series::{sum_series, sum_series_compensated};
use fast_dp::sort::sorted_copy;
use fast_dp::stats::{median, stats};

// ==================== Sort Order ====================

#[test]
fn numeric_policy_nan_sorts_last() {
    let data = vec![f64::NAN, 1.0, f64::INFINITY, -2.0, f64::NAN, f64::NEG_INFINITY];
    let sorted = sorted_copy(&data);

    assert_eq!(sorted[0], f64::NEG_INFINITY);
    assert_eq!(sorted[1], -2.0);
    assert_eq!(sorted[2], 1.0);
    assert_eq!(sorted[3], f64::INFINITY);
    assert!(sorted[4].is_nan());
    assert!(sorted[5].is_nan());
}

#[test]
fn numeric_policy_sort_is_deterministic() {
    let data = vec![0.0_f64, f64::NAN, -0.0, 3.0, f64::NAN, -0.0, 0.0];
    let first = sorted_copy(&data);
    for _ in 0..10 {
        let again = sorted_copy(&data);
        assert_eq!(
            first.iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
            again.iter().map(|x| x.to_bits()).collect::<Vec<_>>()
        );
    }
}

#[test]
fn numeric_policy_signed_zeros_compare_equal() {
    let sorted = sorted_copy(&[0.0_f64, -1.0, -0.0]);
    assert_eq!(sorted[0], -1.0);
    assert_eq!(sorted[1], 0.0);
    assert_eq!(sorted[2], 0.0);
}

#[test]
fn numeric_policy_sort_does_not_modify_input() {
    let data = vec![3.0_f64, f64::NAN, 1.0];
    let _ = sorted_copy(&data);
    assert_eq!(data[0], 3.0);
    assert!(data[1].is_nan());
    assert_eq!(data[2], 1.0);
}

// ==================== Statistics ====================

#[test]
fn numeric_policy_nan_in_stats() {
    let s = stats(&[1.0_f64, 2.0, f64::NAN, 4.0]).unwrap();
    assert!(s.mean.is_nan());
    assert!(s.std_dev.is_nan());
    // Sorted: [1, 2, 4, NaN]
    assert_eq!(s.median, 3.0);
}

#[test]
fn numeric_policy_all_nan_median() {
    assert!(median(&[f64::NAN, f64::NAN, f64::NAN]).unwrap().is_nan());
}

#[test]
fn numeric_policy_infinity_in_stats() {
    let s = stats(&[1.0_f64, f64::INFINITY, 3.0]).unwrap();
    assert_eq!(s.mean, f64::INFINITY);
    assert_eq!(s.median, 3.0);
    assert!(s.std_dev.is_nan());

    let mixed = stats(&[f64::NEG_INFINITY, 0.0, f64::INFINITY]).unwrap();
    assert!(mixed.mean.is_nan());
    assert_eq!(mixed.median, 0.0);
}

#[test]
fn numeric_policy_large_offset_variance() {
    // Welford keeps the variance accurate where E[x²] - E[x]² cancels.
    let data: Vec<f64> = (0..10_000).map(|i| 1e9 + f64::from(i % 2)).collect();
    let s = stats(&data).unwrap();
    assert!(approx_eq(s.mean, 1e9 + 0.5, 1e-6));
    assert!(approx_eq(s.std_dev, 0.5, 1e-6));
}

// ==================== Percentiles ====================

#[test]
fn numeric_policy_nan_in_percentiles() {
    let data = vec![5.0_f64, f64::NAN, 1.0, 3.0, 2.0];
    let p = percentiles(&data).unwrap();
    assert_eq!(p.min(), 1.0);
    assert!(p.max().is_nan());
    // position 2 of [1, 2, 3, 5, NaN]
    assert_eq!(p.median(), 3.0);
}

#[test]
fn numeric_policy_infinities_at_exact_ranks() {
    let data = vec![f64::INFINITY, 0.0, f64::NEG_INFINITY, 1.0, 2.0];
    let p = percentiles(&data).unwrap();
    assert_eq!(p.min(), f64::NEG_INFINITY);
    assert_eq!(p.get(25), Some(0.0));
    assert_eq!(p.get(50), Some(1.0));
    assert_eq!(p.max(), f64::INFINITY);
}

// ==================== Rolling Mean ====================

#[test]
fn numeric_policy_rolling_recovers_after_nan() {
    let data = vec![1.0_f64, 2.0, f64::NAN, 4.0, 5.0, 6.0, 7.0];
    let result = rolling_mean(&data, 3).unwrap();

    assert!(approx_eq(result[1], 1.5, EPSILON));
    assert!(result[2].is_nan());
    assert!(result[3].is_nan());
    assert!(result[4].is_nan());
    assert!(approx_eq(result[5], 5.0, EPSILON));
    assert!(approx_eq(result[6], 6.0, EPSILON));
}

#[test]
fn numeric_policy_rolling_opposite_infinities() {
    let data = vec![f64::INFINITY, f64::NEG_INFINITY, 1.0, 1.0];
    let result = rolling_mean(&data, 2).unwrap();
    assert_eq!(result[0], f64::INFINITY);
    assert!(result[1].is_nan());
    assert_eq!(result[2], f64::NEG_INFINITY);
    assert_eq!(result[3], 1.0);
}

#[test]
fn numeric_policy_rolling_no_drift_over_long_input() {
    let n = 1_000_000;
    let data: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 1e8 } else { 1e-8 }).collect();
    let result = rolling_mean(&data, 2).unwrap();
    let expected = (1e8 + 1e-8) / 2.0;
    assert!((result[n - 1] - expected).abs() < 1e-6);
}

// ==================== Quadrature ====================

#[test]
fn numeric_policy_quadrature_nan_integrand_propagates() {
    let mut f = |x: f64| if x > 0.5 { f64::NAN } else { x };
    assert!(integrate_trapezoid(&mut f, 0.0, 1.0, 10).unwrap().is_nan());
}

#[test]
fn numeric_policy_simpson_sin_accuracy() {
    let mut f = f64::sin;
    let value = integrate_simpson(&mut f, 0.0, std::f64::consts::PI, 1000).unwrap();
    assert!((value - 2.0).abs() < 1e-10);
}

// ==================== Series ====================

#[test]
fn numeric_policy_plain_and_compensated_sums() {
    let mut f = |k: usize| 1.0 / (k as f64);
    let plain = sum_series(&mut f, 100_000).unwrap();
    let compensated = sum_series_compensated(&mut f, 100_000).unwrap();
    // Harmonic number H_100000 ≈ ln(100000) + γ + 1/(2n)
    let expected = 100_000_f64.ln() + 0.577_215_664_901_532_9 + 1.0 / 200_000.0;
    assert!((compensated - expected).abs() < 1e-9);
    assert!((plain - compensated).abs() < 1e-10);
}
