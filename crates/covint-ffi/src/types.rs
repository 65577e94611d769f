//! C-compatible types for FFI boundary

use covint_core::{BootstrapOptions, IntervalMethod, StatsError};
use libc::c_char;

/// Error codes for FFI boundary
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,
    InvalidInput = 1,
    SingularMatrix = 2,
    InvalidLevel = 3,
    InfeasibleWindow = 4,
    InsufficientData = 5,
    AllocationFailure = 6,
    DimensionMismatch = 7,
    NoValidData = 8,
    InternalError = 99,
}

impl From<&StatsError> for ErrorCode {
    fn from(err: &StatsError) -> Self {
        match err {
            StatsError::InvalidLevel(_) => ErrorCode::InvalidLevel,
            StatsError::InfeasibleWindow { .. } => ErrorCode::InfeasibleWindow,
            StatsError::InsufficientData { .. } => ErrorCode::InsufficientData,
            StatsError::InsufficientDataMsg(_) => ErrorCode::InsufficientData,
            StatsError::NoValidData => ErrorCode::NoValidData,
            StatsError::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            StatsError::EmptyInput { .. } => ErrorCode::InvalidInput,
            StatsError::InvalidInput(_) => ErrorCode::InvalidInput,
            StatsError::InvalidValue { .. } => ErrorCode::InvalidInput,
            StatsError::SingularMatrix => ErrorCode::SingularMatrix,
        }
    }
}

/// Error information for FFI
#[repr(C)]
pub struct CovintError {
    pub code: ErrorCode,
    pub message: [c_char; 256],
}

impl CovintError {
    pub fn success() -> Self {
        Self {
            code: ErrorCode::Success,
            message: [0; 256],
        }
    }

    pub fn set(&mut self, code: ErrorCode, msg: &str) {
        self.code = code;
        let bytes = msg.as_bytes();
        let len = bytes.len().min(255);
        for (i, &b) in bytes[..len].iter().enumerate() {
            self.message[i] = b as c_char;
        }
        self.message[len] = 0;
    }

    /// Message as a Rust string, up to the first NUL
    pub fn message(&self) -> String {
        let bytes: Vec<u8> = self
            .message
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Array of f64 values with validity mask for NULL handling
#[repr(C)]
pub struct DataArray {
    /// Pointer to data values
    pub data: *const f64,
    /// Validity bitmask: bit i is 1 if data[i] is valid, 0 if NULL
    /// Can be NULL if all values are valid
    pub validity: *const u8,
    /// Number of elements
    pub len: usize,
}

impl DataArray {
    /// Check if index i is valid (not NULL)
    ///
    /// # Safety
    /// Caller must ensure index is within bounds
    pub unsafe fn is_valid(&self, i: usize) -> bool {
        if self.validity.is_null() {
            return true;
        }
        let byte_idx = i / 8;
        let bit_idx = i % 8;
        ((*self.validity.add(byte_idx)) >> bit_idx) & 1 == 1
    }

    /// Convert to Vec<f64>, replacing NULL with NaN
    ///
    /// # Safety
    /// Caller must ensure pointers are valid and len is correct
    pub unsafe fn to_vec(&self) -> Vec<f64> {
        if self.data.is_null() {
            return Vec::new();
        }
        (0..self.len)
            .map(|i| {
                if self.is_valid(i) {
                    *self.data.add(i)
                } else {
                    f64::NAN
                }
            })
            .collect()
    }

    /// Valid values only: NULL entries and NaN data values are dropped
    ///
    /// # Safety
    /// Same requirements as [`DataArray::to_vec`]
    pub unsafe fn valid_values(&self) -> Vec<f64> {
        self.to_vec().into_iter().filter(|v| !v.is_nan()).collect()
    }
}

/// Interval method selector
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalMethodFFI {
    Shortest = 0,
    Percentile = 1,
}

impl From<IntervalMethodFFI> for IntervalMethod {
    fn from(method: IntervalMethodFFI) -> Self {
        match method {
            IntervalMethodFFI::Shortest => IntervalMethod::Shortest,
            IntervalMethodFFI::Percentile => IntervalMethod::Percentile,
        }
    }
}

/// Interval result
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IntervalFFI {
    pub lower: f64,
    pub upper: f64,
    pub level: f64,
}

impl Default for IntervalFFI {
    fn default() -> Self {
        Self {
            lower: f64::NAN,
            upper: f64::NAN,
            level: f64::NAN,
        }
    }
}

/// Bootstrap options for FFI
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BootstrapOptionsFFI {
    /// Number of bootstrap samples
    pub n_bootstrap: usize,
    /// Confidence level
    pub confidence_level: f64,
    /// Block length: 0 for iid, 1 for stationary, above 1 for circular block bootstrap
    pub block_length: usize,
    /// Interval method
    pub method: IntervalMethodFFI,
    /// Whether `seed` is used
    pub has_seed: bool,
    /// Seed for reproducibility
    pub seed: u64,
}

impl Default for BootstrapOptionsFFI {
    fn default() -> Self {
        Self {
            n_bootstrap: 10000,
            confidence_level: 0.95,
            block_length: 0,
            method: IntervalMethodFFI::Shortest,
            has_seed: false,
            seed: 0,
        }
    }
}

impl From<BootstrapOptionsFFI> for BootstrapOptions {
    fn from(opts: BootstrapOptionsFFI) -> Self {
        Self {
            n_bootstrap: opts.n_bootstrap,
            confidence_level: opts.confidence_level,
            block_length: opts.block_length,
            method: opts.method.into(),
            seed: opts.has_seed.then_some(opts.seed),
        }
    }
}

/// Bootstrap result for FFI
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BootstrapResultFFI {
    pub statistic: f64,
    pub se: f64,
    pub bias: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub confidence_level: f64,
    /// Number of bootstrap samples requested
    pub n_bootstrap: usize,
    /// Number of replicates kept (finite statistic)
    pub n_replicates: usize,
}

/// Options for the OLS parametric bootstrap
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ParametricBootstrapOptionsFFI {
    /// Whether to fit intercept
    pub fit_intercept: bool,
    /// Number of simulated replicates
    pub n_bootstrap: usize,
    /// Confidence level for intervals
    pub confidence_level: f64,
    /// Interval method
    pub method: IntervalMethodFFI,
    /// Whether `seed` is used
    pub has_seed: bool,
    /// Seed for reproducibility
    pub seed: u64,
}

impl Default for ParametricBootstrapOptionsFFI {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            n_bootstrap: 1000,
            confidence_level: 0.95,
            method: IntervalMethodFFI::Shortest,
            has_seed: false,
            seed: 0,
        }
    }
}

/// Per-parameter intervals from a parametric bootstrap
///
/// Parameters are ordered intercept (if fitted), then one slope per feature,
/// then the residual standard deviation.
#[repr(C)]
pub struct ParameterIntervalsFFI {
    /// Point estimates from the original fit
    pub estimates: *mut f64,
    /// Bootstrap standard errors
    pub std_errors: *mut f64,
    /// Lower interval bounds
    pub ci_lower: *mut f64,
    /// Upper interval bounds
    pub ci_upper: *mut f64,
    /// Number of parameters (length of each array)
    pub len: usize,
    /// Number of replicates kept
    pub n_replicates: usize,
    /// Confidence level used
    pub confidence_level: f64,
}

impl Default for ParameterIntervalsFFI {
    fn default() -> Self {
        Self {
            estimates: std::ptr::null_mut(),
            std_errors: std::ptr::null_mut(),
            ci_lower: std::ptr::null_mut(),
            ci_upper: std::ptr::null_mut(),
            len: 0,
            n_replicates: 0,
            confidence_level: f64::NAN,
        }
    }
}
