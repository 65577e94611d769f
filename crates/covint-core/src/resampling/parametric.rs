//! Parametric bootstrap
//!
//! Simulate responses from a fitted model, refit the model to each simulated
//! response and collect the parameter estimates. The draws are summarized per
//! parameter with shortest or percentile intervals.

use super::{make_rng, std_dev};
use crate::errors::{StatsError, StatsResult};
use crate::intervals::compute_interval;
use crate::types::{IntervalMethod, ParameterInterval, ParametricBootstrapOptions};
use rand::Rng;

/// A fitted model that can simulate new responses and be refitted to them
pub trait ParametricModel {
    /// Names of the parameters, in the order returned by `parameters`
    fn parameter_names(&self) -> Vec<String>;

    /// Point estimates from the original fit
    fn parameters(&self) -> Vec<f64>;

    /// Draw a response vector from the fitted model
    fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64>;

    /// Refit the model to `response` and return the new parameter estimates
    fn refit(&self, response: &[f64]) -> StatsResult<Vec<f64>>;
}

/// Replicate draws of a vector-valued parameter, stored per parameter
#[derive(Debug, Clone)]
pub struct BootstrapSample {
    names: Vec<String>,
    estimates: Vec<f64>,
    draws: Vec<Vec<f64>>,
}

impl BootstrapSample {
    /// Build from named columns of replicate values
    ///
    /// All columns must have the same length, and there must be one name and
    /// one point estimate per column.
    pub fn new(names: Vec<String>, estimates: Vec<f64>, draws: Vec<Vec<f64>>) -> StatsResult<Self> {
        if draws.is_empty() {
            return Err(StatsError::EmptyInput { field: "draws" });
        }
        if names.len() != draws.len() || estimates.len() != draws.len() {
            return Err(StatsError::InvalidInput(format!(
                "{} names and {} estimates for {} parameter columns",
                names.len(),
                estimates.len(),
                draws.len()
            )));
        }
        let n = draws[0].len();
        if draws.iter().any(|col| col.len() != n) {
            return Err(StatsError::InvalidInput(
                "all parameter columns must have the same number of replicates".into(),
            ));
        }
        Ok(Self {
            names,
            estimates,
            draws,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    pub fn n_replicates(&self) -> usize {
        self.draws[0].len()
    }

    /// Replicate values of the named parameter
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.draws[i].as_slice())
    }

    /// Bootstrap standard error of each parameter
    pub fn std_errors(&self) -> Vec<f64> {
        self.draws.iter().map(|col| std_dev(col)).collect()
    }

    /// One interval per parameter
    pub fn intervals(
        &self,
        level: f64,
        method: IntervalMethod,
    ) -> StatsResult<Vec<ParameterInterval>> {
        self.names
            .iter()
            .zip(&self.estimates)
            .zip(&self.draws)
            .map(|((name, &estimate), col)| {
                Ok(ParameterInterval {
                    name: name.clone(),
                    estimate,
                    interval: compute_interval(col, level, method)?,
                })
            })
            .collect()
    }

    pub fn shortest_intervals(&self, level: f64) -> StatsResult<Vec<ParameterInterval>> {
        self.intervals(level, IntervalMethod::Shortest)
    }
}

/// Run a parametric bootstrap of `model`
///
/// Replicates whose refit fails or returns non-finite estimates are skipped.
///
/// # Arguments
/// * `model` - Fitted model to simulate from
/// * `options` - Number of replicates and optional seed
pub fn parametric_bootstrap<M: ParametricModel>(
    model: &M,
    options: &ParametricBootstrapOptions,
) -> StatsResult<BootstrapSample> {
    if options.n_bootstrap == 0 {
        return Err(StatsError::InvalidInput(
            "n_bootstrap must be at least 1".into(),
        ));
    }

    let names = model.parameter_names();
    let estimates = model.parameters();
    let n_params = names.len();
    if n_params == 0 {
        return Err(StatsError::EmptyInput { field: "parameters" });
    }

    log::debug!(
        "parametric bootstrap: {} replicates of {} parameters",
        options.n_bootstrap,
        n_params
    );

    let mut rng = make_rng(options.seed);
    let mut draws: Vec<Vec<f64>> = (0..n_params)
        .map(|_| Vec::with_capacity(options.n_bootstrap))
        .collect();
    let mut skipped = 0usize;

    for replicate in 0..options.n_bootstrap {
        let response = model.simulate(&mut rng);
        match model.refit(&response) {
            Ok(params) if params.len() == n_params && params.iter().all(|v| v.is_finite()) => {
                for (col, value) in draws.iter_mut().zip(params) {
                    col.push(value);
                }
            }
            Ok(_) => skipped += 1,
            Err(e) => {
                log::debug!("parametric bootstrap: replicate {} failed: {}", replicate, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!(
            "parametric bootstrap: skipped {} of {} replicates",
            skipped,
            options.n_bootstrap
        );
    }
    if draws[0].is_empty() {
        return Err(StatsError::NoValidData);
    }

    BootstrapSample::new(names, estimates, draws)
}
