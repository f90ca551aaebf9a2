//! Numeric kernels shared by the engines.
//!
//! # Kernels
//!
//! - [`running_stat`]: Welford accumulator for mean and variance, mergeable
//!   across chunks for parallel reduction
//! - [`compensated`]: Neumaier compensated summation, used by the windowed
//!   mean's running sum, quadrature accumulation and the compensated
//!   series sum
//! - [`total_order`]: the NaN-last comparator behind every sort, median and
//!   percentile
//!
//! # Numeric Stability
//!
//! Kernels are chosen so that error does not grow with input length: Welford
//! instead of sum-of-squares for variance, compensated instead of plain
//! running sums for sliding windows.

pub mod compensated;
pub mod running_stat;
pub mod total_order;

pub use compensated::CompensatedSum;
pub use running_stat::RunningStat;
pub use total_order::{nan_last_cmp, nan_last_max};
