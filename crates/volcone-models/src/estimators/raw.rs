//! Raw (close-to-close) volatility
//!
//! Rolling sample standard deviation of close-to-close log returns,
//! annualized. This is the reference estimator the range-based ones are
//! measured against.

use super::variance_multiplier;
use crate::{
    config::EstimatorConfig,
    error::Result,
    rolling::{finish, log_returns, rolling_std},
    series::{PriceSeries, VolatilitySeries},
};

/// Close-to-close volatility
///
/// `std(ln(C[t] / C[t-1])) · √trading_periods · √m` over each window. The
/// first defined value is at position `window` since the first return
/// needs a prior close.
pub fn raw(prices: &PriceSeries, config: &EstimatorConfig) -> Result<VolatilitySeries> {
    let m = variance_multiplier(prices, config)?;
    let scale = config.annualization() * m.sqrt();

    let returns = log_returns(prices.close());
    let values = rolling_std(&returns, config.window).mapv(|sd| sd * scale);

    Ok(finish(values, config.clean))
}
