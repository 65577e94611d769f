//! C FFI boundary for covint
//!
//! This crate provides C-compatible functions over covint-core so bootstrap
//! intervals can be computed from a C/C++ host.

mod types;

pub use types::*;

use covint_core::{
    bootstrap_mean,
    intervals::{percentile_interval, shortest_interval},
    models::fit_ols,
    parametric_bootstrap, BootstrapOptions, Interval, OlsOptions, ParametricBootstrapOptions,
    StatsError, StatsResult,
};
use std::panic::AssertUnwindSafe;
use std::slice;

/// Record `err` in `out_error` if the caller supplied one
unsafe fn report_error(out_error: *mut CovintError, err: &StatsError) {
    if !out_error.is_null() {
        (*out_error).set(ErrorCode::from(err), &err.to_string());
    }
}

unsafe fn report(out_error: *mut CovintError, code: ErrorCode, msg: &str) {
    if !out_error.is_null() {
        (*out_error).set(code, msg);
    }
}

/// Copy `values` into a malloc'd buffer owned by the caller
unsafe fn alloc_copy(values: &[f64]) -> Option<*mut f64> {
    if values.is_empty() {
        return Some(std::ptr::null_mut());
    }
    let ptr = libc::malloc(std::mem::size_of_val(values)) as *mut f64;
    if ptr.is_null() {
        return None;
    }
    std::ptr::copy_nonoverlapping(values.as_ptr(), ptr, values.len());
    Some(ptr)
}

unsafe fn free_array(ptr: &mut *mut f64) {
    if !ptr.is_null() {
        libc::free(*ptr as *mut libc::c_void);
        *ptr = std::ptr::null_mut();
    }
}

/// Shared body of the single-sample interval functions
unsafe fn interval_ffi(
    data: DataArray,
    level: f64,
    out_result: *mut IntervalFFI,
    out_error: *mut CovintError,
    compute: fn(&[f64], f64) -> StatsResult<Interval>,
    name: &str,
) -> bool {
    if !out_error.is_null() {
        *out_error = CovintError::success();
    }

    if out_result.is_null() {
        report(out_error, ErrorCode::InvalidInput, "out_result is NULL");
        return false;
    }

    let values = data.valid_values();

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| compute(&values, level)));

    match result {
        Ok(Ok(ci)) => {
            *out_result = IntervalFFI {
                lower: ci.lower,
                upper: ci.upper,
                level: ci.level,
            };
            true
        }
        Ok(Err(e)) => {
            report_error(out_error, &e);
            false
        }
        Err(_) => {
            report(
                out_error,
                ErrorCode::InternalError,
                &format!("Internal panic in {}", name),
            );
            false
        }
    }
}

// ============================================================================
// Interval FFI Functions
// ============================================================================

/// Shortest interval covering `level` of the sample
///
/// NULL entries and NaN data values are skipped before the interval is
/// computed. Infinite values are rejected with `InvalidInput`.
///
/// # Safety
/// - `data` must be a valid DataArray; NULL and NaN entries are skipped
/// - `out_result` must be a valid pointer
/// - `out_error` can be NULL if error details are not needed
///
/// # Returns
/// `true` on success, `false` on error (check `out_error` for details)
#[no_mangle]
pub unsafe extern "C" fn covint_shortest_interval(
    data: DataArray,
    level: f64,
    out_result: *mut IntervalFFI,
    out_error: *mut CovintError,
) -> bool {
    interval_ffi(
        data,
        level,
        out_result,
        out_error,
        shortest_interval,
        "shortest interval",
    )
}

/// Equal-tailed percentile interval covering `level` of the sample
///
/// NULL entries and NaN data values are skipped, as in
/// [`covint_shortest_interval`].
///
/// # Safety
/// Same requirements as [`covint_shortest_interval`]
#[no_mangle]
pub unsafe extern "C" fn covint_percentile_interval(
    data: DataArray,
    level: f64,
    out_result: *mut IntervalFFI,
    out_error: *mut CovintError,
) -> bool {
    interval_ffi(
        data,
        level,
        out_result,
        out_error,
        percentile_interval,
        "percentile interval",
    )
}

// ============================================================================
// Bootstrap FFI Functions
// ============================================================================

/// Bootstrap confidence interval for the mean
///
/// # Safety
/// - `data` must be a valid DataArray
/// - `out_result` must be a valid pointer
/// - `out_error` can be NULL if error details are not needed
#[no_mangle]
pub unsafe extern "C" fn covint_bootstrap_mean(
    data: DataArray,
    options: BootstrapOptionsFFI,
    out_result: *mut BootstrapResultFFI,
    out_error: *mut CovintError,
) -> bool {
    if !out_error.is_null() {
        *out_error = CovintError::success();
    }

    if out_result.is_null() {
        report(out_error, ErrorCode::InvalidInput, "out_result is NULL");
        return false;
    }

    let values = data.to_vec();
    let opts = BootstrapOptions::from(options);

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| bootstrap_mean(&values, &opts)));

    match result {
        Ok(Ok(boot)) => {
            *out_result = BootstrapResultFFI {
                statistic: boot.statistic,
                se: boot.se,
                bias: boot.bias,
                ci_lower: boot.interval.lower,
                ci_upper: boot.interval.upper,
                confidence_level: boot.interval.level,
                n_bootstrap: boot.n_bootstrap,
                n_replicates: boot.replicates.len(),
            };
            true
        }
        Ok(Err(e)) => {
            report_error(out_error, &e);
            false
        }
        Err(_) => {
            report(out_error, ErrorCode::InternalError, "Internal panic in bootstrap");
            false
        }
    }
}

/// Fit an OLS model and bootstrap its parameters parametrically
///
/// # Safety
/// - `y` must be a valid DataArray
/// - `x` must point to `x_count` valid DataArray structs
/// - `out_result` must be a valid pointer; on success its arrays must be
///   released with [`covint_free_parameter_intervals`]
/// - `out_error` can be NULL if error details are not needed
#[no_mangle]
pub unsafe extern "C" fn covint_ols_parametric_bootstrap(
    y: DataArray,
    x: *const DataArray,
    x_count: usize,
    options: ParametricBootstrapOptionsFFI,
    out_result: *mut ParameterIntervalsFFI,
    out_error: *mut CovintError,
) -> bool {
    if !out_error.is_null() {
        *out_error = CovintError::success();
    }

    if out_result.is_null() {
        report(out_error, ErrorCode::InvalidInput, "out_result is NULL");
        return false;
    }

    if x.is_null() || x_count == 0 {
        report(out_error, ErrorCode::InvalidInput, "x is NULL or empty");
        return false;
    }

    let y_vec = y.to_vec();
    let x_arrays = slice::from_raw_parts(x, x_count);
    let x_vecs: Vec<Vec<f64>> = x_arrays.iter().map(|arr| arr.to_vec()).collect();

    let ols_opts = OlsOptions {
        fit_intercept: options.fit_intercept,
        ..Default::default()
    };
    let boot_opts = ParametricBootstrapOptions {
        n_bootstrap: options.n_bootstrap,
        seed: options.has_seed.then_some(options.seed),
    };

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        let fit = fit_ols(&y_vec, &x_vecs, &ols_opts)?;
        let sample = parametric_bootstrap(&fit, &boot_opts)?;
        let intervals = sample.intervals(options.confidence_level, options.method.into())?;
        Ok::<_, StatsError>((sample, intervals))
    }));

    let (sample, intervals) = match result {
        Ok(Ok(r)) => r,
        Ok(Err(e)) => {
            report_error(out_error, &e);
            return false;
        }
        Err(_) => {
            report(
                out_error,
                ErrorCode::InternalError,
                "Internal panic in parametric bootstrap",
            );
            return false;
        }
    };

    let lower: Vec<f64> = intervals.iter().map(|p| p.interval.lower).collect();
    let upper: Vec<f64> = intervals.iter().map(|p| p.interval.upper).collect();

    let mut filled = ParameterIntervalsFFI {
        len: intervals.len(),
        n_replicates: sample.n_replicates(),
        confidence_level: options.confidence_level,
        ..Default::default()
    };
    let allocations = [
        (&mut filled.estimates, sample.estimates().to_vec()),
        (&mut filled.std_errors, sample.std_errors()),
        (&mut filled.ci_lower, lower),
        (&mut filled.ci_upper, upper),
    ];

    let mut ok = true;
    for (slot, values) in allocations {
        match alloc_copy(&values) {
            Some(ptr) => *slot = ptr,
            None => {
                ok = false;
                break;
            }
        }
    }

    if !ok {
        covint_free_parameter_intervals(&mut filled);
        report(
            out_error,
            ErrorCode::AllocationFailure,
            "Failed to allocate parameter intervals",
        );
        return false;
    }

    *out_result = filled;
    true
}

/// Free memory allocated by covint_ols_parametric_bootstrap
///
/// # Safety
/// `result` must be a pointer to a ParameterIntervalsFFI previously filled by
/// covint_ols_parametric_bootstrap
#[no_mangle]
pub unsafe extern "C" fn covint_free_parameter_intervals(result: *mut ParameterIntervalsFFI) {
    if result.is_null() {
        return;
    }
    free_array(&mut (*result).estimates);
    free_array(&mut (*result).std_errors);
    free_array(&mut (*result).ci_lower);
    free_array(&mut (*result).ci_upper);
    (*result).len = 0;
}

/// Get library version string
#[no_mangle]
pub extern "C" fn covint_version() -> *const libc::c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const libc::c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(values: &[f64]) -> DataArray {
        DataArray {
            data: values.as_ptr(),
            validity: std::ptr::null(),
            len: values.len(),
        }
    }

    #[test]
    fn test_shortest_interval_ffi() {
        let values = vec![5.0, 1.0, 100.0, 3.0, 2.0, 4.0];
        let mut out = IntervalFFI::default();
        let mut err = CovintError::success();

        let ok = unsafe { covint_shortest_interval(array(&values), 0.5, &mut out, &mut err) };

        assert!(ok);
        assert_eq!(err.code, ErrorCode::Success);
        assert_eq!((out.lower, out.upper), (1.0, 3.0));
    }

    #[test]
    fn test_shortest_interval_ffi_skips_nulls() {
        // 100.0 is masked out; 7 valid values remain
        let values = vec![1.0, 2.0, 100.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let validity = [0b1111_1011u8];
        let data = DataArray {
            data: values.as_ptr(),
            validity: validity.as_ptr(),
            len: values.len(),
        };
        let mut out = IntervalFFI::default();
        let mut err = CovintError::success();

        let ok = unsafe { covint_shortest_interval(data, 0.5, &mut out, &mut err) };

        assert!(ok);
        assert_eq!((out.lower, out.upper), (1.0, 4.0));
    }

    #[test]
    fn test_interval_ffi_skips_nan_values() {
        // NaN is dropped like a NULL entry; 7 values remain
        let values = vec![1.0, 2.0, f64::NAN, 3.0, 4.0, 5.0, 6.0, 7.0];
        let mut out = IntervalFFI::default();
        let mut err = CovintError::success();

        let ok = unsafe { covint_shortest_interval(array(&values), 0.5, &mut out, &mut err) };
        assert!(ok);
        assert_eq!(err.code, ErrorCode::Success);
        assert_eq!((out.lower, out.upper), (1.0, 4.0));

        let ok = unsafe { covint_percentile_interval(array(&values), 0.5, &mut out, &mut err) };
        assert!(ok);
        assert!(out.lower.is_finite() && out.upper.is_finite());

        let values = vec![1.0, 2.0, f64::INFINITY, 3.0, 4.0];
        let ok = unsafe { covint_shortest_interval(array(&values), 0.5, &mut out, &mut err) };
        assert!(!ok);
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_shortest_interval_ffi_errors() {
        let values = vec![1.0, 2.0, 3.0];
        let mut out = IntervalFFI::default();
        let mut err = CovintError::success();

        let ok = unsafe { covint_shortest_interval(array(&values), 1.5, &mut out, &mut err) };
        assert!(!ok);
        assert_eq!(err.code, ErrorCode::InvalidLevel);
        assert!(err.message().contains("1.5"));

        let ok = unsafe { covint_shortest_interval(array(&values), 0.99, &mut out, &mut err) };
        assert!(!ok);
        assert_eq!(err.code, ErrorCode::InfeasibleWindow);

        let ok = unsafe {
            covint_shortest_interval(array(&values), 0.5, std::ptr::null_mut(), &mut err)
        };
        assert!(!ok);
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_percentile_interval_ffi() {
        let values = vec![5.0, 3.0, 1.0, 4.0, 2.0];
        let mut out = IntervalFFI::default();
        let ok = unsafe {
            covint_percentile_interval(array(&values), 0.5, &mut out, std::ptr::null_mut())
        };
        assert!(ok);
        assert_eq!((out.lower, out.upper), (2.0, 4.0));
    }

    #[test]
    fn test_bootstrap_mean_ffi() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let options = BootstrapOptionsFFI {
            n_bootstrap: 500,
            has_seed: true,
            seed: 42,
            ..Default::default()
        };
        let mut out = BootstrapResultFFI {
            statistic: f64::NAN,
            se: f64::NAN,
            bias: f64::NAN,
            ci_lower: f64::NAN,
            ci_upper: f64::NAN,
            confidence_level: f64::NAN,
            n_bootstrap: 0,
            n_replicates: 0,
        };
        let mut err = CovintError::success();

        let ok = unsafe { covint_bootstrap_mean(array(&values), options, &mut out, &mut err) };

        assert!(ok);
        assert!((out.statistic - 5.5).abs() < 1e-12);
        assert!(out.ci_lower < 5.5 && out.ci_upper > 5.5);
        assert_eq!(out.n_replicates, 500);
    }

    #[test]
    fn test_ols_parametric_bootstrap_ffi() {
        let x: Vec<f64> = (0..30).map(f64::from).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, xi)| 2.0 + 0.5 * xi + if i % 2 == 0 { 0.3 } else { -0.3 })
            .collect();
        let xs = [array(&x)];
        let options = ParametricBootstrapOptionsFFI {
            n_bootstrap: 200,
            has_seed: true,
            seed: 7,
            ..Default::default()
        };
        let mut out = ParameterIntervalsFFI::default();
        let mut err = CovintError::success();

        let ok = unsafe {
            covint_ols_parametric_bootstrap(
                array(&y),
                xs.as_ptr(),
                xs.len(),
                options,
                &mut out,
                &mut err,
            )
        };

        assert!(ok, "{}", err.message());
        // intercept, slope, sigma
        assert_eq!(out.len, 3);
        assert_eq!(out.n_replicates, 200);
        unsafe {
            let estimates = slice::from_raw_parts(out.estimates, out.len);
            let lower = slice::from_raw_parts(out.ci_lower, out.len);
            let upper = slice::from_raw_parts(out.ci_upper, out.len);
            for i in 0..out.len {
                assert!(lower[i] <= estimates[i] && estimates[i] <= upper[i]);
            }
            covint_free_parameter_intervals(&mut out);
        }
        assert!(out.estimates.is_null());
    }

    #[test]
    fn test_ols_parametric_bootstrap_ffi_rejects_empty_x() {
        let y = vec![1.0, 2.0, 3.0];
        let mut out = ParameterIntervalsFFI::default();
        let mut err = CovintError::success();
        let ok = unsafe {
            covint_ols_parametric_bootstrap(
                array(&y),
                std::ptr::null(),
                0,
                ParametricBootstrapOptionsFFI::default(),
                &mut out,
                &mut err,
            )
        };
        assert!(!ok);
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_version() {
        let version = unsafe { std::ffi::CStr::from_ptr(covint_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
