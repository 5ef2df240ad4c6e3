//! Hodges-Tompkins bias-corrected close-to-close volatility

use super::variance_multiplier;
use crate::{
    config::EstimatorConfig,
    error::Result,
    overlapping::hodges_tompkins_factor,
    rolling::{finish, log_returns, rolling_std},
    series::{PriceSeries, VolatilitySeries},
};
use tracing::debug;

/// Close-to-close volatility with the Hodges-Tompkins small-sample correction
///
/// `std(r) · √trading_periods · √ht`, where `ht` is
/// [`hodges_tompkins_factor`] computed from the number of valid log
/// returns. With `use_overlapping_adjustment` the result is additionally
/// scaled by `√m`; the two corrections are independent and the flag
/// decides whether they compose.
///
/// A series with fewer valid returns than the window has no defined value
/// and no correction is computed.
pub fn hodges_tompkins(
    prices: &PriceSeries,
    config: &EstimatorConfig,
) -> Result<VolatilitySeries> {
    let m = variance_multiplier(prices, config)?;

    let returns = log_returns(prices.close());
    let valid_returns = returns.iter().filter(|r| !r.is_nan()).count();
    let ht = if valid_returns >= config.window {
        hodges_tompkins_factor(config.window, valid_returns)?
    } else {
        debug!(
            symbol = prices.symbol(),
            window = config.window,
            valid_returns,
            "too few returns for a Hodges-Tompkins correction"
        );
        1.0
    };

    let scale = config.annualization() * ht.sqrt() * m.sqrt();
    let values = rolling_std(&returns, config.window).mapv(|sd| sd * scale);

    Ok(finish(values, config.clean))
}
