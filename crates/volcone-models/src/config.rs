//! Estimator configuration

use crate::error::{Result, VolatilityError};
use serde::{Deserialize, Serialize};

/// Trading periods per year for daily data
pub const DEFAULT_TRADING_PERIODS: usize = 252;

/// Default rolling window in trading periods
pub const DEFAULT_WINDOW: usize = 30;

/// Price the close is compared against in close-based cross terms
///
/// Garman-Klass subtracts a close term from the range term and Yang-Zhang
/// weighs an intraday close term. Both have been published with the
/// close measured against the same period's open and against the prior
/// period's close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloseReference {
    /// `ln(close / open)` of the same period
    #[default]
    Open,
    /// `ln(close / previous close)`
    PriorClose,
}

/// Parameters for one estimator call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Rolling window size in trading periods (default: 30)
    pub window: usize,

    /// Periods per year used for annualization (default: 252)
    pub trading_periods: usize,

    /// Drop leading undefined values from the output (default: true)
    pub clean: bool,

    /// Scale by the overlapping-sample variance adjustment (default: true)
    pub use_overlapping_adjustment: bool,

    /// Close cross term used by Garman-Klass and Yang-Zhang (default: `Open`)
    pub close_reference: CloseReference,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl EstimatorConfig {
    /// Configuration with the given window and defaults elsewhere
    pub const fn new(window: usize) -> Self {
        Self {
            window,
            trading_periods: DEFAULT_TRADING_PERIODS,
            clean: true,
            use_overlapping_adjustment: true,
            close_reference: CloseReference::Open,
        }
    }

    /// Set the annualization constant
    pub const fn with_trading_periods(mut self, trading_periods: usize) -> Self {
        self.trading_periods = trading_periods;
        self
    }

    /// Set whether leading undefined values are dropped
    pub const fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Set whether the overlapping-sample adjustment is applied
    pub const fn with_overlapping_adjustment(mut self, enabled: bool) -> Self {
        self.use_overlapping_adjustment = enabled;
        self
    }

    /// Set the close cross term variant
    pub const fn with_close_reference(mut self, close_reference: CloseReference) -> Self {
        self.close_reference = close_reference;
        self
    }

    /// Same parameters with a different window
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Check the parameters every estimator requires
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(VolatilityError::invalid("window must be positive"));
        }
        if self.trading_periods == 0 {
            return Err(VolatilityError::invalid(
                "trading_periods must be positive",
            ));
        }
        Ok(())
    }

    /// Multiplier turning a per-period standard deviation into an annual one
    pub fn annualization(&self) -> f64 {
        (self.trading_periods as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EstimatorConfig::default();
        assert_eq!(config.window, 30);
        assert_eq!(config.trading_periods, 252);
        assert!(config.clean);
        assert!(config.use_overlapping_adjustment);
        assert_eq!(config.close_reference, CloseReference::Open);
    }

    #[test]
    fn test_zero_window_invalid() {
        let config = EstimatorConfig::new(0);
        assert!(matches!(
            config.validate(),
            Err(VolatilityError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_trading_periods_invalid() {
        let config = EstimatorConfig::new(10).with_trading_periods(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = EstimatorConfig::new(20)
            .with_clean(false)
            .with_overlapping_adjustment(false)
            .with_close_reference(CloseReference::PriorClose)
            .with_trading_periods(365);
        assert_eq!(config.window, 20);
        assert!(!config.clean);
        assert!(!config.use_overlapping_adjustment);
        assert_eq!(config.close_reference, CloseReference::PriorClose);
        assert!((config.annualization() - 365.0_f64.sqrt()).abs() < 1e-12);
    }
}
