//! Confidence intervals read off a sample of replicate estimates
//!
//! - Shortest (narrowest order-statistic window with the requested coverage)
//! - Percentile (equal-tailed)

mod percentile;
mod shortest;

pub use percentile::{percentile_interval, quantile};
pub use shortest::{
    shortest_interval, shortest_interval_in_place, shortest_interval_sorted, shortest_intervals,
    window_size,
};

use crate::errors::{StatsError, StatsResult};
use crate::types::{Interval, IntervalMethod};

/// Compute an interval from `sample` with the given method
pub fn compute_interval(
    sample: &[f64],
    level: f64,
    method: IntervalMethod,
) -> StatsResult<Interval> {
    match method {
        IntervalMethod::Shortest => shortest_interval(sample, level),
        IntervalMethod::Percentile => percentile_interval(sample, level),
    }
}

pub(crate) fn validate_level(level: f64) -> StatsResult<()> {
    // NaN fails both comparisons
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidLevel(level))
    }
}

pub(crate) fn check_finite(sample: &[f64]) -> StatsResult<()> {
    match sample.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(StatsError::InvalidValue {
            field: "sample",
            value,
        }),
        None => Ok(()),
    }
}

fn is_sorted(sample: &[f64]) -> bool {
    sample.windows(2).all(|w| w[0] <= w[1])
}

fn sort_values(sample: &mut [f64]) {
    sample.sort_unstable_by(f64::total_cmp);
}
