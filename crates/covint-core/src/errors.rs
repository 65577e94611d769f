use thiserror::Error;

/// Errors that can occur during interval and bootstrap computations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    // Input validation errors
    #[error("Invalid coverage level: {0} (must be strictly between 0 and 1)")]
    InvalidLevel(f64),

    #[error(
        "Infeasible interval: level {level} on {n} values gives a window of {window} points (need 1 < window < {n})"
    )]
    InfeasibleWindow { level: f64, n: usize, window: usize },

    #[error("Insufficient data: {rows} rows, {cols} parameters (need rows > parameters)")]
    InsufficientData { rows: usize, cols: usize },

    #[error("Insufficient data: {0}")]
    InsufficientDataMsg(String),

    #[error("All rows filtered due to NULL/NaN values")]
    NoValidData,

    #[error("Dimension mismatch: y has {y_len} elements, X has {x_rows} rows")]
    DimensionMismatch { y_len: usize, x_rows: usize },

    #[error("Empty input: {field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid value in {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    // Numerical errors
    #[error("Matrix is singular or near-singular")]
    SingularMatrix,
}

impl StatsError {
    /// Whether the error stems from the caller's arguments rather than from
    /// the numerics.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            StatsError::InvalidLevel(_)
                | StatsError::InfeasibleWindow { .. }
                | StatsError::EmptyInput { .. }
                | StatsError::InvalidInput(_)
                | StatsError::InvalidValue { .. }
        )
    }
}

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;
