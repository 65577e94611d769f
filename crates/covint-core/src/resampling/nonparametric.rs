//! Non-parametric bootstrap of a scalar statistic

use super::blocks::{CircularBlockBootstrap, IidBootstrap, Resampler, StationaryBootstrap};
use super::{filter_nan, mean, std_dev};
use crate::errors::{StatsError, StatsResult};
use crate::intervals::{compute_interval, validate_level};
use crate::types::{BootstrapOptions, BootstrapResult};

/// Bootstrap a statistic of `data`
///
/// NaN values are dropped before resampling. The resampling scheme follows
/// `block_length`:
///
/// - 0: observations drawn iid with replacement
/// - 1: stationary bootstrap with expected block length 1
/// - above 1: circular blocks of `block_length` consecutive observations
///
/// # Arguments
/// * `data` - Sample data
/// * `statistic` - Function evaluated on the original data and on each resample
/// * `options` - Bootstrap options
pub fn bootstrap<F>(
    data: &[f64],
    statistic: F,
    options: &BootstrapOptions,
) -> StatsResult<BootstrapResult>
where
    F: Fn(&[f64]) -> f64,
{
    validate_level(options.confidence_level)?;

    let filtered = filter_nan(data);
    if filtered.len() < 2 {
        return Err(StatsError::InsufficientDataMsg(
            "Bootstrap requires at least 2 observations".into(),
        ));
    }
    if options.n_bootstrap < 2 {
        return Err(StatsError::InvalidInput(format!(
            "n_bootstrap must be at least 2, got {}",
            options.n_bootstrap
        )));
    }

    let original = statistic(&filtered);
    let block_length = options.block_length.min(filtered.len());
    log::debug!(
        "bootstrap: {} replicates of {} observations (block length {})",
        options.n_bootstrap,
        filtered.len(),
        block_length
    );

    let mut resampler: Box<dyn Resampler> = match block_length {
        0 => Box::new(IidBootstrap::new(options.seed)),
        1 => Box::new(StationaryBootstrap::new(1.0, options.seed)),
        len => Box::new(CircularBlockBootstrap::new(len, options.seed)),
    };
    let mut resample = Vec::with_capacity(filtered.len());
    let mut replicates = Vec::with_capacity(options.n_bootstrap);
    let mut dropped = 0usize;

    for _ in 0..options.n_bootstrap {
        resampler.resample_into(&filtered, filtered.len(), &mut resample);

        let value = statistic(&resample);
        if value.is_finite() {
            replicates.push(value);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        log::warn!(
            "bootstrap: dropped {} of {} replicates with non-finite statistic",
            dropped,
            options.n_bootstrap
        );
    }
    if replicates.len() < 2 {
        return Err(StatsError::NoValidData);
    }

    let interval = compute_interval(&replicates, options.confidence_level, options.method)?;

    Ok(BootstrapResult {
        statistic: original,
        se: std_dev(&replicates),
        bias: mean(&replicates) - original,
        interval,
        replicates,
        n_bootstrap: options.n_bootstrap,
    })
}

/// Bootstrap confidence interval for the mean
///
/// # Arguments
/// * `data` - Sample data
/// * `options` - Bootstrap options
pub fn bootstrap_mean(data: &[f64], options: &BootstrapOptions) -> StatsResult<BootstrapResult> {
    bootstrap(data, mean, options)
}
