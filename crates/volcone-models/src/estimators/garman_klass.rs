//! Garman-Klass volatility
//!
//! Combines the high/low range with the open-to-close move. The estimator
//! subtracts the close term from the range term, so sample variances can
//! go negative even though the population variance cannot.

use super::variance_multiplier;
use crate::{
    config::{CloseReference, EstimatorConfig},
    error::Result,
    rolling::{clamp_non_negative, finish, log_ratio, log_returns, rolling_mean},
    series::{PriceSeries, VolatilitySeries},
};
use std::f64::consts::LN_2;
use tracing::warn;

/// Garman-Klass volatility
///
/// ```text
/// term1 = 0.5 · ln(H/L)²
/// term2 = (2 ln 2 - 1) · ln(C/O)²
/// sqrt(max(mean(term1) - mean(term2), 0) · trading_periods · m)
/// ```
///
/// With [`CloseReference::PriorClose`] the close term uses `ln(C[t]/C[t-1])`
/// and the first defined value moves from `window - 1` to `window`.
///
/// Negative window variances are clamped to zero rather than producing NaN.
pub fn garman_klass(prices: &PriceSeries, config: &EstimatorConfig) -> Result<VolatilitySeries> {
    let m = variance_multiplier(prices, config)?;
    let scale = config.trading_periods as f64 * m;

    let hl = log_ratio(prices.high(), prices.low());
    let co = match config.close_reference {
        CloseReference::Open => log_ratio(prices.close(), prices.open()),
        CloseReference::PriorClose => log_returns(prices.close()),
    };

    let range_term = hl.mapv(|x| 0.5 * x * x);
    let close_term = co.mapv(|x| (2.0 * LN_2 - 1.0) * x * x);
    let variance =
        rolling_mean(&range_term, config.window) - rolling_mean(&close_term, config.window);

    let clamped = variance.iter().filter(|v| **v < 0.0).count();
    if clamped > 0 {
        warn!(
            symbol = prices.symbol(),
            window = config.window,
            clamped,
            "clamped negative Garman-Klass variances"
        );
    }

    let values = variance.mapv(|v| (clamp_non_negative(v) * scale).sqrt());
    Ok(finish(values, config.clean))
}
