//! covint-core: Bootstrap confidence intervals
//!
//! This crate reads confidence intervals off samples of bootstrap replicates,
//! most notably the shortest interval (the narrowest window of order
//! statistics holding the requested coverage), and provides the
//! non-parametric and parametric bootstrap drivers that produce those samples.

pub mod errors;
pub mod intervals;
pub mod models;
pub mod resampling;
pub mod types;

pub use errors::{StatsError, StatsResult};
pub use intervals::{compute_interval, percentile_interval, shortest_interval};
pub use resampling::{
    bootstrap, bootstrap_mean, parametric_bootstrap, BootstrapSample, ParametricModel,
};
pub use types::*;
