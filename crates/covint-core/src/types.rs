use std::fmt;

// ============================================================================
// Interval Types
// ============================================================================

/// A closed interval `[lower, upper]` with the coverage level it was built for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound (always >= lower)
    pub upper: f64,
    /// Coverage level used (e.g., 0.95)
    pub level: f64,
}

impl Interval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Endpoints as a `(lower, upper)` tuple
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}] ({}%)",
            self.lower,
            self.upper,
            self.level * 100.0
        )
    }
}

/// How a confidence interval is read off a sample of bootstrap replicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalMethod {
    /// Narrowest window of order statistics with the requested coverage
    #[default]
    Shortest,
    /// Equal-tailed interval between the alpha/2 and 1 - alpha/2 quantiles
    Percentile,
}

/// Interval for one named parameter of a vector-valued bootstrap sample
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInterval {
    /// Parameter name
    pub name: String,
    /// Point estimate from the original fit
    pub estimate: f64,
    /// Interval computed from the bootstrap replicates
    pub interval: Interval,
}

// ============================================================================
// Bootstrap Types
// ============================================================================

/// Options for the non-parametric bootstrap
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Number of bootstrap samples
    pub n_bootstrap: usize,
    /// Confidence level
    pub confidence_level: f64,
    /// Block length: 0 for iid, 1 for stationary, above 1 for circular block bootstrap
    pub block_length: usize,
    /// Interval method applied to the replicates
    pub method: IntervalMethod,
    /// Optional seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            n_bootstrap: 10000,
            confidence_level: 0.95,
            block_length: 0,
            method: IntervalMethod::Shortest,
            seed: None,
        }
    }
}

/// Bootstrap result for a scalar statistic
#[derive(Debug, Clone)]
pub struct BootstrapResult {
    /// Statistic evaluated on the original data
    pub statistic: f64,
    /// Bootstrap standard error
    pub se: f64,
    /// Mean of the replicates minus the original statistic
    pub bias: f64,
    /// Confidence interval from the replicates
    pub interval: Interval,
    /// Replicate statistics, in draw order
    pub replicates: Vec<f64>,
    /// Number of bootstrap samples requested
    pub n_bootstrap: usize,
}

/// Options for the parametric bootstrap
#[derive(Debug, Clone)]
pub struct ParametricBootstrapOptions {
    /// Number of simulated replicates
    pub n_bootstrap: usize,
    /// Optional seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for ParametricBootstrapOptions {
    fn default() -> Self {
        Self {
            n_bootstrap: 1000,
            seed: None,
        }
    }
}

// ============================================================================
// Linear Model Types
// ============================================================================

/// Core result from model fitting - always computed
#[derive(Debug, Clone)]
pub struct FitResultCore {
    /// Regression coefficients (excluding intercept)
    pub coefficients: Vec<f64>,
    /// Intercept term (if fitted with intercept)
    pub intercept: Option<f64>,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
    /// Adjusted R-squared
    pub adj_r_squared: f64,
    /// Residual standard error
    pub residual_std_error: f64,
    /// Number of observations used
    pub n_observations: usize,
    /// Number of features (excluding intercept)
    pub n_features: usize,
}

/// Inference results - only computed if requested
///
/// Vectors are ordered like the design columns: intercept first when fitted.
#[derive(Debug, Clone)]
pub struct FitResultInference {
    /// Standard errors of coefficients
    pub std_errors: Vec<f64>,
    /// t-statistics for coefficients
    pub t_values: Vec<f64>,
    /// Two-sided p-values for coefficients
    pub p_values: Vec<f64>,
    /// Lower bound of confidence intervals
    pub ci_lower: Vec<f64>,
    /// Upper bound of confidence intervals
    pub ci_upper: Vec<f64>,
    /// Confidence level used (e.g., 0.95)
    pub confidence_level: f64,
}

/// Combined fit result
#[derive(Debug, Clone)]
pub struct FitResult {
    pub core: FitResultCore,
    pub inference: Option<FitResultInference>,
}

/// Options for OLS fitting
#[derive(Debug, Clone)]
pub struct OlsOptions {
    /// Whether to fit an intercept term
    pub fit_intercept: bool,
    /// Whether to compute inference statistics (std errors, p-values, etc.)
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95)
    pub confidence_level: f64,
}

impl Default for OlsOptions {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            compute_inference: false,
            confidence_level: 0.95,
        }
    }
}
