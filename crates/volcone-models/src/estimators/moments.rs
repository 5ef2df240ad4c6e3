//! Rolling higher moments of log returns
//!
//! Skew and kurtosis share the estimator signature so the selector can
//! dispatch to them, but they are not volatilities. They are never
//! annualized, and the overlapping-sample adjustment has no defined effect
//! on a standardized moment: `use_overlapping_adjustment` and
//! `trading_periods` are accepted and ignored.

use crate::{
    config::EstimatorConfig,
    error::Result,
    rolling::{finish, log_returns, rolling_kurtosis, rolling_skew},
    series::{PriceSeries, VolatilitySeries},
};
use tracing::debug;

fn log_unused_adjustment(config: &EstimatorConfig, moment: &str) {
    if config.use_overlapping_adjustment {
        debug!(moment, "overlapping adjustment does not apply to moments");
    }
}

/// Rolling skewness of close-to-close log returns
///
/// Adjusted Fisher-Pearson coefficient per window; windows with no
/// dispersion are NaN. First defined at position `window`.
pub fn skew(prices: &PriceSeries, config: &EstimatorConfig) -> Result<VolatilitySeries> {
    config.validate()?;
    log_unused_adjustment(config, "skew");

    let returns = log_returns(prices.close());
    let values = rolling_skew(&returns, config.window);
    Ok(finish(values, config.clean))
}

/// Rolling excess kurtosis of close-to-close log returns
///
/// Bias-corrected, zero for a normal sample; windows with no dispersion
/// are NaN. First defined at position `window`.
pub fn kurtosis(prices: &PriceSeries, config: &EstimatorConfig) -> Result<VolatilitySeries> {
    config.validate()?;
    log_unused_adjustment(config, "kurtosis");

    let returns = log_returns(prices.close());
    let values = rolling_kurtosis(&returns, config.window);
    Ok(finish(values, config.clean))
}
