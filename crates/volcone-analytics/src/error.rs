//! Error types for analytics.

use thiserror::Error;
use volcone_models::VolatilityError;

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while computing analytics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Estimator configuration or dispatch failed
    #[error(transparent)]
    Estimator(#[from] VolatilityError),

    /// Quantile pair is not a symmetric lower/upper band
    #[error("Invalid quantiles: lower {lower} and upper {upper} must be ordered and sum to 1.0")]
    InvalidQuantiles {
        /// Lower quantile
        lower: f64,
        /// Upper quantile
        upper: f64,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Too few defined values for the statistic
    #[error("Insufficient data: need at least {required} values, got {actual}")]
    InsufficientData {
        /// Required number of values
        required: usize,
        /// Actual number of values
        actual: usize,
    },

    /// Subject and benchmark differ in shape
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },
}

impl AnalyticsError {
    /// Whether this error stems from an invalid parameter
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_)
                | Self::InvalidQuantiles { .. }
                | Self::Estimator(VolatilityError::InvalidParameter(_))
        )
    }
}
