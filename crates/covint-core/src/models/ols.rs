//! Ordinary Least Squares (OLS) regression on top of faer
//!
//! With an intercept the feature columns are centred before a Householder QR
//! of the design, so columns far from zero keep their precision. The fitted
//! model keeps the factorization so that parametric bootstrap replicates can
//! be refitted without refactoring.

use crate::errors::{StatsError, StatsResult};
use crate::intervals::validate_level;
use crate::resampling::ParametricModel;
use crate::types::{FitResult, FitResultCore, FitResultInference, OlsOptions};
use faer::linalg::solvers::{Qr, SolveLstsq};
use faer::linalg::triangular_solve::solve_upper_triangular_in_place;
use faer::{Mat, Par};
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Name used for the intercept parameter
pub const INTERCEPT_NAME: &str = "(Intercept)";

/// Smallest accepted `|R[j, j]|` relative to the norm of design column `j`
const RANK_TOLERANCE: f64 = 1e-10;

/// A fitted linear model
#[derive(Debug, Clone)]
pub struct OlsFit {
    result: FitResult,
    fit_intercept: bool,
    /// Coefficients in parameter order (intercept first when fitted)
    beta: Vec<f64>,
    /// Feature design, centred when an intercept is fitted
    design: Mat<f64>,
    /// QR factorization of `design`
    qr: Qr<f64>,
    /// Column means subtracted from the design, empty without intercept
    x_means: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    noise: Normal,
}

impl OlsFit {
    pub fn result(&self) -> &FitResult {
        &self.result
    }

    pub fn into_result(self) -> FitResult {
        self.result
    }

    /// Fitted values for the rows used in the fit
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Residual degrees of freedom
    pub fn df_residual(&self) -> usize {
        self.fitted.len() - self.beta.len()
    }
}

/// Coefficients, fitted values and residuals of one response on a fixed design
struct Solution {
    beta: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

impl Solution {
    fn rss(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }
}

/// Fit an OLS regression model
///
/// # Arguments
/// * `y` - Response variable (n observations)
/// * `x` - Feature columns (p columns of n observations)
/// * `options` - Fitting options
///
/// # Returns
/// * `OlsFit` holding the `FitResult` and what is needed to refit simulated responses
pub fn fit_ols(y: &[f64], x: &[Vec<f64>], options: &OlsOptions) -> StatsResult<OlsFit> {
    // Validate inputs
    if y.is_empty() {
        return Err(StatsError::EmptyInput { field: "y" });
    }
    if x.is_empty() {
        return Err(StatsError::EmptyInput { field: "x" });
    }
    if options.compute_inference {
        validate_level(options.confidence_level)?;
    }

    let n_obs = y.len();
    let n_features = x.len();

    for col in x.iter() {
        if col.len() != n_obs {
            return Err(StatsError::DimensionMismatch {
                y_len: n_obs,
                x_rows: col.len(),
            });
        }
    }

    let n_params = if options.fit_intercept {
        n_features + 1
    } else {
        n_features
    };
    if n_obs <= n_params {
        return Err(StatsError::InsufficientData {
            rows: n_obs,
            cols: n_params,
        });
    }

    // Filter out rows with NaN or infinite values
    let valid_indices: Vec<usize> = (0..n_obs)
        .filter(|&i| y[i].is_finite() && x.iter().all(|col| col[i].is_finite()))
        .collect();

    if valid_indices.is_empty() {
        return Err(StatsError::NoValidData);
    }

    let n_valid = valid_indices.len();
    if n_valid <= n_params {
        return Err(StatsError::InsufficientData {
            rows: n_valid,
            cols: n_params,
        });
    }

    let x_means: Vec<f64> = if options.fit_intercept {
        x.iter()
            .map(|col| valid_indices.iter().map(|&i| col[i]).sum::<f64>() / n_valid as f64)
            .collect()
    } else {
        Vec::new()
    };
    let design = Mat::from_fn(n_valid, n_features, |i, j| {
        let value = x[j][valid_indices[i]];
        x_means.get(j).map_or(value, |m| value - m)
    });
    let response: Vec<f64> = valid_indices.iter().map(|&i| y[i]).collect();

    let qr = Qr::new(design.as_ref());
    let r = qr.thin_R();
    let rank_deficient = (0..n_features).any(|j| {
        let col_norm = design.col(j).norm_l2();
        !(col_norm > 0.0 && r[(j, j)].abs() > RANK_TOLERANCE * col_norm)
    });
    if rank_deficient {
        return Err(StatsError::SingularMatrix);
    }

    let solution = least_squares(&design, &qr, &x_means, options.fit_intercept, &response);
    let rss = solution.rss();
    let df_resid = (n_valid - n_params) as f64;
    let sigma = (rss / df_resid).sqrt();

    let tss: f64 = if options.fit_intercept {
        let mean = response.iter().sum::<f64>() / n_valid as f64;
        response.iter().map(|v| (v - mean).powi(2)).sum()
    } else {
        response.iter().map(|v| v * v).sum()
    };
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { 1.0 };
    let df_total = if options.fit_intercept {
        (n_valid - 1) as f64
    } else {
        n_valid as f64
    };
    let adj_r_squared = 1.0 - (1.0 - r_squared) * df_total / df_resid;

    let beta = solution.beta;
    let (intercept, coefficients) = if options.fit_intercept {
        (Some(beta[0]), beta[1..].to_vec())
    } else {
        (None, beta.clone())
    };

    let core = FitResultCore {
        coefficients,
        intercept,
        r_squared,
        adj_r_squared,
        residual_std_error: sigma,
        n_observations: n_valid,
        n_features,
    };

    let inference = if options.compute_inference {
        let variances = coefficient_variances(&qr, &x_means, n_valid, options.fit_intercept);
        Some(wald_inference(
            &beta,
            &variances,
            sigma,
            df_resid,
            options.confidence_level,
        )?)
    } else {
        None
    };

    let noise = Normal::new(0.0, 1.0).map_err(|e| StatsError::InvalidInput(e.to_string()))?;

    Ok(OlsFit {
        result: FitResult { core, inference },
        fit_intercept: options.fit_intercept,
        beta,
        design,
        qr,
        x_means,
        fitted: solution.fitted,
        residuals: solution.residuals,
        noise,
    })
}

/// Solve `response` against the factorized design
///
/// With an intercept the response is centred and the intercept is recovered
/// from the column means.
fn least_squares(
    design: &Mat<f64>,
    qr: &Qr<f64>,
    x_means: &[f64],
    fit_intercept: bool,
    response: &[f64],
) -> Solution {
    let y_mean = if fit_intercept {
        response.iter().sum::<f64>() / response.len() as f64
    } else {
        0.0
    };
    let rhs = Mat::from_fn(response.len(), 1, |i, _| response[i] - y_mean);
    let slope_mat = qr.solve_lstsq(rhs.as_ref());
    let centred_fit = design.as_ref() * slope_mat.as_ref();
    let slopes: Vec<f64> = (0..slope_mat.nrows()).map(|j| slope_mat[(j, 0)]).collect();

    let fitted: Vec<f64> = (0..response.len())
        .map(|i| y_mean + centred_fit[(i, 0)])
        .collect();
    let residuals = response
        .iter()
        .zip(&fitted)
        .map(|(obs, fit)| obs - fit)
        .collect();

    let mut beta = Vec::with_capacity(slopes.len() + 1);
    if fit_intercept {
        let shift: f64 = slopes.iter().zip(x_means).map(|(b, m)| b * m).sum();
        beta.push(y_mean - shift);
    }
    beta.extend(slopes);

    Solution {
        beta,
        fitted,
        residuals,
    }
}

/// Diagonal of `inv(X'X)` in parameter order, from the R factor
///
/// The intercept term is `1/n + m' inv(Xc'Xc) m` for the centred design `Xc`
/// and column means `m`.
fn coefficient_variances(
    qr: &Qr<f64>,
    x_means: &[f64],
    n: usize,
    fit_intercept: bool,
) -> Vec<f64> {
    let r = qr.thin_R();
    let p = r.ncols();
    let mut r_inv = Mat::<f64>::identity(p, p);
    solve_upper_triangular_in_place(r, r_inv.as_mut(), Par::Seq);
    let cov = r_inv.as_ref() * r_inv.transpose();

    let mut variances = Vec::with_capacity(p + 1);
    if fit_intercept {
        let quad: f64 = (0..p)
            .flat_map(|i| (0..p).map(move |j| (i, j)))
            .map(|(i, j)| x_means[i] * cov[(i, j)] * x_means[j])
            .sum();
        variances.push(1.0 / n as f64 + quad);
    }
    variances.extend((0..p).map(|j| cov[(j, j)]));
    variances
}

fn wald_inference(
    beta: &[f64],
    variances: &[f64],
    sigma: f64,
    df_resid: f64,
    confidence_level: f64,
) -> StatsResult<FitResultInference> {
    let t_dist = StudentsT::new(0.0, 1.0, df_resid)
        .map_err(|e| StatsError::InvalidInput(e.to_string()))?;
    let alpha = 1.0 - confidence_level;
    let t_crit = t_dist.inverse_cdf(1.0 - alpha / 2.0);

    let std_errors: Vec<f64> = variances.iter().map(|v| sigma * v.sqrt()).collect();
    let t_values: Vec<f64> = beta
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b / se)
        .collect();
    let p_values = t_values
        .iter()
        .map(|t| 2.0 * (1.0 - t_dist.cdf(t.abs())))
        .collect();
    let ci_lower = beta
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b - t_crit * se)
        .collect();
    let ci_upper = beta
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b + t_crit * se)
        .collect();

    Ok(FitResultInference {
        std_errors,
        t_values,
        p_values,
        ci_lower,
        ci_upper,
        confidence_level,
    })
}

impl ParametricModel for OlsFit {
    fn parameter_names(&self) -> Vec<String> {
        let n_features = self.result.core.n_features;
        let mut names = Vec::with_capacity(self.beta.len() + 1);
        if self.fit_intercept {
            names.push(INTERCEPT_NAME.to_string());
        }
        names.extend((1..=n_features).map(|j| format!("x{}", j)));
        names.push("sigma".to_string());
        names
    }

    fn parameters(&self) -> Vec<f64> {
        let mut params = self.beta.clone();
        params.push(self.result.core.residual_std_error);
        params
    }

    fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let sigma = self.result.core.residual_std_error;
        self.fitted
            .iter()
            .map(|mu| mu + sigma * rng.sample(&self.noise))
            .collect()
    }

    fn refit(&self, response: &[f64]) -> StatsResult<Vec<f64>> {
        if response.len() != self.fitted.len() {
            return Err(StatsError::DimensionMismatch {
                y_len: response.len(),
                x_rows: self.fitted.len(),
            });
        }

        let solution = least_squares(
            &self.design,
            &self.qr,
            &self.x_means,
            self.fit_intercept,
            response,
        );
        let sigma = (solution.rss() / self.df_residual() as f64).sqrt();
        let mut params = solution.beta;
        params.push(sigma);
        Ok(params)
    }
}
