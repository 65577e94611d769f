//! Resampling methods
//!
//! - Non-parametric bootstrap (iid, stationary, circular block)
//! - Parametric bootstrap of a fitted model

mod blocks;
mod nonparametric;
mod parametric;

pub use blocks::{CircularBlockBootstrap, IidBootstrap, Resampler, StationaryBootstrap};
pub use nonparametric::{bootstrap, bootstrap_mean};
pub use parametric::{parametric_bootstrap, BootstrapSample, ParametricModel};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded generator when a seed is given, entropy-seeded otherwise
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Filter NaN values from a slice
fn filter_nan(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| !x.is_nan()).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); NaN below two values
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    (ss / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;

    #[test]
    fn test_std_dev() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        assert_relative_eq!(std_dev(&values), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert!(std_dev(&[1.0]).is_nan());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut r1 = make_rng(Some(7));
        let mut r2 = make_rng(Some(7));
        let a: Vec<u32> = (0..5).map(|_| r1.gen()).collect();
        let b: Vec<u32> = (0..5).map(|_| r2.gen()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_filter_nan() {
        assert_eq!(filter_nan(&[1.0, f64::NAN, 2.0]), vec![1.0, 2.0]);
    }
}
