//! Equal-tailed percentile interval

use super::{check_finite, is_sorted, sort_values, validate_level};
use crate::errors::{StatsError, StatsResult};
use crate::types::Interval;

/// Sample quantile of an ascending slice
///
/// Linear interpolation between the order statistics around `h = (n - 1) p`
/// (Hyndman & Fan type 7).
pub fn quantile(sorted: &[f64], p: f64) -> StatsResult<f64> {
    if sorted.is_empty() {
        return Err(StatsError::EmptyInput { field: "sample" });
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::InvalidInput(format!(
            "probability {} must be in [0, 1]",
            p
        )));
    }

    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Percentile interval covering `level` of `sample`
///
/// Bounds are the `alpha / 2` and `1 - alpha / 2` quantiles, `alpha = 1 - level`.
/// The caller's slice is left untouched.
pub fn percentile_interval(sample: &[f64], level: f64) -> StatsResult<Interval> {
    if sample.is_empty() {
        return Err(StatsError::EmptyInput { field: "sample" });
    }
    validate_level(level)?;
    if sample.len() < 2 {
        return Err(StatsError::InsufficientDataMsg(
            "Percentile interval requires at least 2 observations".into(),
        ));
    }
    check_finite(sample)?;

    let owned;
    let sorted = if is_sorted(sample) {
        sample
    } else {
        let mut copy = sample.to_vec();
        sort_values(&mut copy);
        owned = copy;
        &owned
    };

    let alpha = 1.0 - level;
    Ok(Interval {
        lower: quantile(sorted, alpha / 2.0)?,
        upper: quantile(sorted, 1.0 - alpha / 2.0)?,
        level,
    })
}
