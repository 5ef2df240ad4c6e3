//! Rogers-Satchell volatility
//!
//! Drift-independent range estimator using the open as numeraire.

use super::{rogers_satchell_term, variance_multiplier};
use crate::{
    config::EstimatorConfig,
    error::Result,
    rolling::{finish, rolling_mean},
    series::{PriceSeries, VolatilitySeries},
};

/// Rogers-Satchell volatility
///
/// `sqrt(mean(ln(H/C)·ln(H/O) + ln(L/C)·ln(L/O)) · trading_periods · m)`
///
/// Each product is non-negative for consistent OHLC data. Inconsistent
/// bars can produce a negative window mean; that window is NaN and is not
/// treated as an error.
pub fn rogers_satchell(
    prices: &PriceSeries,
    config: &EstimatorConfig,
) -> Result<VolatilitySeries> {
    let m = variance_multiplier(prices, config)?;
    let scale = config.trading_periods as f64 * m;

    let term = rogers_satchell_term(prices);
    let values = rolling_mean(&term, config.window).mapv(|mean| (mean * scale).sqrt());

    Ok(finish(values, config.clean))
}
