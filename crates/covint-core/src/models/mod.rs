//! Regression models used to drive the parametric bootstrap

mod ols;

pub use ols::{fit_ols, OlsFit, INTERCEPT_NAME};
