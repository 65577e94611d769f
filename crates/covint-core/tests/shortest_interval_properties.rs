use covint_core::intervals::{
    percentile_interval, shortest_interval, shortest_interval_in_place, window_size,
};
use covint_core::models::fit_ols;
use covint_core::{parametric_bootstrap, OlsOptions, ParametricBootstrapOptions, StatsError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn brute_force_min_width(sorted: &[f64], k: usize) -> f64 {
    sorted
        .windows(k)
        .map(|w| w[k - 1] - w[0])
        .fold(f64::INFINITY, f64::min)
}

fn random_sample(rng: &mut StdRng, n: usize) -> Vec<f64> {
    // right-skewed: exponential-ish draws
    (0..n).map(|_| -(1.0 - rng.gen::<f64>()).ln()).collect()
}

#[test]
fn width_matches_brute_force_minimum() {
    let mut rng = StdRng::seed_from_u64(2024);
    for &n in &[5usize, 17, 64, 301] {
        for &level in &[0.5, 0.8, 0.9] {
            let mut sample = random_sample(&mut rng, n);
            let Ok(k) = window_size(n, level) else {
                continue;
            };
            let ci = shortest_interval(&sample, level).unwrap();

            sample.sort_by(f64::total_cmp);
            assert_eq!(ci.width(), brute_force_min_width(&sample, k));
            assert!(ci.lower <= ci.upper);
            assert!(sample.contains(&ci.lower));
            assert!(sample.contains(&ci.upper));

            let covered = sample
                .iter()
                .filter(|v| ci.contains(**v))
                .count();
            assert!(covered >= k);
        }
    }
}

#[test]
fn permutations_give_identical_output() {
    let mut rng = StdRng::seed_from_u64(99);
    let sorted = {
        let mut s = random_sample(&mut rng, 50);
        s.sort_by(f64::total_cmp);
        s
    };
    let expected = shortest_interval(&sorted, 0.9).unwrap();

    for _ in 0..20 {
        let mut shuffled = sorted.clone();
        shuffled.shuffle(&mut rng);
        assert_eq!(shortest_interval(&shuffled, 0.9).unwrap(), expected);
        assert_eq!(shortest_interval_in_place(&mut shuffled, 0.9).unwrap(), expected);
        assert_eq!(shuffled, sorted);
    }
}

#[test]
fn levels_outside_unit_interval_fail() {
    let sample: Vec<f64> = (0..100).map(f64::from).collect();
    for level in [0.0, 1.0, -1.0, 2.0, f64::NAN, f64::INFINITY] {
        let err = shortest_interval(&sample, level).unwrap_err();
        assert!(matches!(err, StatsError::InvalidLevel(_)));
        assert!(err.is_invalid_argument());
    }
}

#[test]
fn infeasible_windows_fail() {
    // ceil(0.99 * 10) = 10 = n
    let sample: Vec<f64> = (0..10).map(f64::from).collect();
    let err = shortest_interval(&sample, 0.99).unwrap_err();
    assert!(matches!(
        err,
        StatsError::InfeasibleWindow {
            n: 10,
            window: 10,
            ..
        }
    ));
    assert!(err.is_invalid_argument());

    // ceil(0.01 * 10) = 1
    assert!(matches!(
        shortest_interval(&sample, 0.01),
        Err(StatsError::InfeasibleWindow { window: 1, .. })
    ));

    // no level is feasible for two points
    assert!(shortest_interval(&[1.0, 2.0], 0.5).is_err());
}

#[test]
fn shortest_is_narrower_than_percentile_on_skewed_sample() {
    let mut rng = StdRng::seed_from_u64(5);
    let sample = random_sample(&mut rng, 2000);
    let shortest = shortest_interval(&sample, 0.9).unwrap();
    let percentile = percentile_interval(&sample, 0.9).unwrap();
    assert!(shortest.width() < percentile.width());
    // mass piles up near zero, so the shortest interval starts lower
    assert!(shortest.lower < percentile.lower);
}

#[test]
fn ols_parametric_bootstrap_end_to_end() {
    let mut rng = StdRng::seed_from_u64(31);
    let x: Vec<f64> = (0..40).map(|i| i as f64 / 4.0).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|xi| 1.5 + 0.8 * xi + (rng.gen::<f64>() - 0.5))
        .collect();

    let fit = fit_ols(&y, &[x], &OlsOptions::default()).unwrap();
    let opts = ParametricBootstrapOptions {
        n_bootstrap: 400,
        seed: Some(17),
    };
    let sample = parametric_bootstrap(&fit, &opts).unwrap();
    assert_eq!(sample.n_replicates(), 400);
    assert_eq!(sample.names().len(), 3);

    let cis = sample.shortest_intervals(0.95).unwrap();
    for ci in &cis {
        assert!(ci.interval.contains(ci.estimate), "{}: {}", ci.name, ci.interval);
    }
    let slope = cis.iter().find(|ci| ci.name == "x1").unwrap();
    assert!((slope.estimate - 0.8).abs() < 0.1);
}
