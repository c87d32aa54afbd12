//! Step totals and the increment count derived from them.

use crate::models::PointSeries;

/// Sum every `intVal` in every point. Negative values are summed as-is.
pub fn total_steps(series: &PointSeries) -> i64 {
    series
        .point
        .iter()
        .flat_map(|p| p.value.iter())
        .map(|v| v.int_val)
        .sum()
}

/// Floor of `total_steps / divisor`, never below zero.
///
/// `divisor` must be non-zero; `Config::validate` enforces this.
pub fn increment_count(total_steps: i64, divisor: u64) -> u64 {
    let divisor = i64::try_from(divisor).unwrap_or(i64::MAX);
    total_steps.div_euclid(divisor).max(0) as u64
}
