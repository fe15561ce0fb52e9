//! Error types of this crate.
//!
//! Only malformed input and a failing Newton refinement are errors. A branch of the
//! bisection search that holds no root is a regular, empty outcome.

use thiserror::Error;

/// Errors raised by the minimizers, the refiner and the root finder.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("bounds have different dimensions: low has {low}, high has {high}")]
    DimensionMismatch { low: usize, high: usize },

    #[error("bounds must have at least one dimension")]
    EmptyBounds,

    #[error("invalid bounds at index {index}: low={low} must be finite and <= high={high}")]
    InvalidBounds { index: usize, low: f64, high: f64 },

    #[error("system dimension mismatch: expected {expected}, got {got}")]
    SystemDimension { expected: usize, got: usize },

    #[error("jacobian has shape {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    JacobianShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("invalid `{name}`: must be finite and > 0. got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("jacobian is not invertible")]
    SingularJacobian,

    #[error("newton iteration left the finite domain after {iterations} iterations")]
    NonFinite { iterations: usize },
}

pub type Result<T> = ::std::result::Result<T, Error>;

/// Checks that a tolerance-like parameter is usable.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParameter { name, value });
    }
    Ok(value)
}
