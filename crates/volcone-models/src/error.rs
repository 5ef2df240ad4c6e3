//! Error types for volatility estimation.

use thiserror::Error;

/// Result type for estimator operations.
pub type Result<T> = std::result::Result<T, VolatilityError>;

/// Errors that can occur while configuring or running an estimator.
///
/// Every error is raised during parameter validation, before any
/// computation starts. Short input is not an error: it yields a series
/// with no defined values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VolatilityError {
    /// A parameter is outside the range the estimator is defined for
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Estimator name not recognized by the selector
    #[error("Unknown estimator: {0}")]
    UnknownEstimator(String),

    /// Series that must be aligned have different lengths
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },
}

impl VolatilityError {
    /// Shorthand for [`VolatilityError::InvalidParameter`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
