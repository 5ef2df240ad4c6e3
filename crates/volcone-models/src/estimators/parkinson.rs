//! Parkinson range-based volatility
//!
//! Uses only the high/low range of each period, so it ignores opening
//! jumps and drift.

use super::variance_multiplier;
use crate::{
    config::EstimatorConfig,
    error::Result,
    rolling::{clamp_non_negative, finish, log_ratio, rolling_mean},
    series::{PriceSeries, VolatilitySeries},
};
use std::f64::consts::LN_2;

/// Parkinson volatility
///
/// `sqrt(trading_periods · mean(ln(H/L)²) / (4 ln 2)) · √m`
///
/// The rolling mean is clamped at zero before the square root. A mean of
/// squares can only be negative through rounding, and NaN from
/// non-positive prices is left as NaN.
pub fn parkinson(prices: &PriceSeries, config: &EstimatorConfig) -> Result<VolatilitySeries> {
    let m = variance_multiplier(prices, config)?;
    let trading_periods = config.trading_periods as f64;

    let term = log_ratio(prices.high(), prices.low()).mapv(|x| x * x);
    let values = rolling_mean(&term, config.window).mapv(|mean| {
        (trading_periods * clamp_non_negative(mean) / (4.0 * LN_2)).sqrt() * m.sqrt()
    });

    Ok(finish(values, config.clean))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{series::Ohlc, synthetic};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_constant_range() {
        // ln(H/L) = ln(1.02) every period
        let bars = vec![Ohlc::new(100.0, 101.0, 101.0 / 1.02, 100.0); 40];
        let prices = PriceSeries::from_bars("RNG", &bars).unwrap();
        let config = EstimatorConfig::new(10).with_overlapping_adjustment(false);
        let vol = parkinson(&prices, &config).unwrap();

        let expected = (252.0 * 1.02_f64.ln().powi(2) / (4.0 * LN_2)).sqrt();
        assert_eq!(vol.len(), 31);
        assert_eq!(vol.offset(), 9);
        for v in vol.values() {
            assert_abs_diff_eq!(*v, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_first_defined_at_window_minus_one() {
        let prices = synthetic::oscillating("SYN", 100, 100.0).unwrap();
        let vol = parkinson(&prices, &EstimatorConfig::new(15).with_clean(false)).unwrap();
        assert!(vol.get(13).unwrap().is_nan());
        assert!(vol.get(14).unwrap() > 0.0);
    }
}
