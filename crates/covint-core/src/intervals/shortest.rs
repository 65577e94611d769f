//! Shortest coverage interval
//!
//! Among all intervals bounded by two order statistics that hold at least a
//! `level` proportion of the sample, pick the narrowest one.

use super::{check_finite, is_sorted, sort_values, validate_level};
use crate::errors::{StatsError, StatsResult};
use crate::types::Interval;

/// Number of points (endpoints included) an interval at `level` must cover
///
/// Returns `ceil(level * n)`, which must lie strictly between 1 and `n`.
pub fn window_size(n: usize, level: f64) -> StatsResult<usize> {
    validate_level(level)?;

    let window = (level * n as f64).ceil() as usize;
    if window <= 1 || window >= n {
        return Err(StatsError::InfeasibleWindow { level, n, window });
    }
    Ok(window)
}

/// Shortest interval covering `level` of `sample`
///
/// The caller's slice is left untouched; an unsorted sample is sorted in a
/// working copy.
///
/// # Arguments
/// * `sample` - Replicate values (any order)
/// * `level` - Coverage proportion in (0, 1)
///
/// # Example
/// ```
/// use covint_core::intervals::shortest_interval;
///
/// let ci = shortest_interval(&[5.0, 1.0, 100.0, 3.0, 2.0, 4.0], 0.5)?;
/// assert_eq!(ci.bounds(), (1.0, 3.0));
/// # Ok::<(), covint_core::StatsError>(())
/// ```
pub fn shortest_interval(sample: &[f64], level: f64) -> StatsResult<Interval> {
    let window = validate(sample, level)?;

    if is_sorted(sample) {
        return Ok(narrowest_window(sample, window, level));
    }

    let mut sorted = sample.to_vec();
    sort_values(&mut sorted);
    Ok(narrowest_window(&sorted, window, level))
}

/// Shortest interval, sorting `sample` in place
///
/// Avoids the working copy for large replicate buffers the caller owns. On
/// success the buffer is left in ascending order.
pub fn shortest_interval_in_place(sample: &mut [f64], level: f64) -> StatsResult<Interval> {
    let window = validate(sample, level)?;

    if !is_sorted(sample) {
        sort_values(sample);
    }
    Ok(narrowest_window(sample, window, level))
}

/// Shortest interval of a sample already in ascending order
pub fn shortest_interval_sorted(sorted: &[f64], level: f64) -> StatsResult<Interval> {
    let window = validate(sorted, level)?;

    if !is_sorted(sorted) {
        return Err(StatsError::InvalidInput(
            "sample must be sorted in ascending order".into(),
        ));
    }
    Ok(narrowest_window(sorted, window, level))
}

/// Shortest interval for each column of a vector-valued sample
///
/// # Arguments
/// * `columns` - One vector of replicate values per parameter
/// * `level` - Coverage proportion in (0, 1)
pub fn shortest_intervals(columns: &[Vec<f64>], level: f64) -> StatsResult<Vec<Interval>> {
    if columns.is_empty() {
        return Err(StatsError::EmptyInput { field: "columns" });
    }
    columns
        .iter()
        .map(|col| shortest_interval(col, level))
        .collect()
}

fn validate(sample: &[f64], level: f64) -> StatsResult<usize> {
    if sample.is_empty() {
        return Err(StatsError::EmptyInput { field: "sample" });
    }
    let window = window_size(sample.len(), level)?;
    check_finite(sample)?;
    Ok(window)
}

/// Scan all windows of `window` consecutive sorted values, keeping the first
/// one of minimal width.
fn narrowest_window(sorted: &[f64], window: usize, level: f64) -> Interval {
    let span = window - 1;
    let mut best = 0;
    let mut best_width = sorted[span] - sorted[0];

    for start in 1..sorted.len() - span {
        let width = sorted[start + span] - sorted[start];
        // strict: ties keep the earlier window
        if width < best_width {
            best = start;
            best_width = width;
        }
    }

    Interval {
        lower: sorted[best],
        upper: sorted[best + span],
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_size() {
        assert_eq!(window_size(6, 0.5).unwrap(), 3);
        assert_eq!(window_size(10, 0.8).unwrap(), 8);
        // ceil rounds partial points up
        assert_eq!(window_size(7, 0.5).unwrap(), 4);
    }

    #[test]
    fn test_window_size_infeasible() {
        // window equal to n
        assert!(matches!(
            window_size(10, 0.95),
            Err(StatsError::InfeasibleWindow {
                n: 10,
                window: 10,
                ..
            })
        ));
        // window of a single point
        assert!(matches!(
            window_size(10, 0.05),
            Err(StatsError::InfeasibleWindow { window: 1, .. })
        ));
        assert!(window_size(2, 0.5).is_err());
        assert!(window_size(0, 0.5).is_err());
    }

    #[test]
    fn test_window_size_invalid_level() {
        for level in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = window_size(100, level).unwrap_err();
            assert!(matches!(err, StatsError::InvalidLevel(_)));
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_tie_broken_to_first_window() {
        let sample = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let ci = shortest_interval(&sample, 0.5).unwrap();
        assert_eq!(ci.lower, 1.0);
        assert_eq!(ci.upper, 3.0);
        assert_eq!(ci.level, 0.5);
    }

    #[test]
    fn test_picks_dense_region() {
        // k = 4; densest run is 10.0..10.3
        let sample = vec![0.0, 3.0, 10.0, 10.1, 10.2, 10.3, 20.0, 40.0];
        let ci = shortest_interval(&sample, 0.5).unwrap();
        assert_eq!(ci.bounds(), (10.0, 10.3));
    }

    #[test]
    fn test_unsorted_input_left_untouched() {
        let sample = vec![100.0, 4.0, 1.0, 5.0, 3.0, 2.0];
        let before = sample.clone();
        let ci = shortest_interval(&sample, 0.5).unwrap();
        assert_eq!(ci.bounds(), (1.0, 3.0));
        assert_eq!(sample, before);
    }

    #[test]
    fn test_in_place_sorts_buffer() {
        let mut sample = vec![100.0, 4.0, 1.0, 5.0, 3.0, 2.0];
        let ci = shortest_interval_in_place(&mut sample, 0.5).unwrap();
        assert_eq!(ci.bounds(), (1.0, 3.0));
        assert_eq!(sample, vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
    }

    #[test]
    fn test_sorted_variant_rejects_unsorted() {
        let result = shortest_interval_sorted(&[3.0, 1.0, 2.0, 4.0], 0.5);
        assert!(matches!(result, Err(StatsError::InvalidInput(_))));

        let ci = shortest_interval_sorted(&[1.0, 2.0, 2.5, 9.0], 0.5).unwrap();
        assert_eq!(ci.bounds(), (2.0, 2.5));
    }

    #[test]
    fn test_rejects_non_finite() {
        let result = shortest_interval(&[1.0, f64::NAN, 2.0, 3.0], 0.5);
        assert!(matches!(
            result,
            Err(StatsError::InvalidValue {
                field: "sample",
                ..
            })
        ));
        assert!(shortest_interval(&[1.0, f64::INFINITY, 2.0, 3.0], 0.5).is_err());
    }

    #[test]
    fn test_empty_sample() {
        assert!(matches!(
            shortest_interval(&[], 0.5),
            Err(StatsError::EmptyInput { field: "sample" })
        ));
    }

    #[test]
    fn test_constant_sample() {
        let ci = shortest_interval(&[2.0; 10], 0.8).unwrap();
        assert_eq!(ci.bounds(), (2.0, 2.0));
        assert_eq!(ci.width(), 0.0);
    }

    #[test]
    fn test_shortest_intervals_per_column() {
        let columns = vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0],
            vec![-100.0, 1.0, 1.5, 2.0, 8.0, 9.0],
        ];
        let cis = shortest_intervals(&columns, 0.5).unwrap();
        assert_eq!(cis.len(), 2);
        assert_eq!(cis[0].bounds(), (1.0, 3.0));
        assert_eq!(cis[1].bounds(), (1.0, 2.0));

        assert!(shortest_intervals(&[], 0.5).is_err());
    }
}
