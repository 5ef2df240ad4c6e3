//! Yang-Zhang volatility
//!
//! Weighted combination of overnight jump variance, intraday variance and
//! the Rogers-Satchell range variance. The weight `k` minimizes the
//! estimator's variance for the given window.

use super::{rogers_satchell_term, variance_multiplier};
use crate::{
    config::{CloseReference, EstimatorConfig},
    error::{Result, VolatilityError},
    rolling::{finish, lagged_log_ratio, log_ratio, log_returns, rolling_sum},
    series::{PriceSeries, VolatilitySeries},
};

/// Weight of the intraday component for a window of `window` periods
pub fn yang_zhang_k(window: usize) -> f64 {
    let w = window as f64;
    0.34 / (1.34 + (w + 1.0) / (w - 1.0))
}

/// Yang-Zhang volatility
///
/// ```text
/// overnight = Σ ln(O[t]/C[t-1])² / (w - 1)
/// intraday  = Σ ln(C[t]/O[t])²   / (w - 1)
/// range     = Σ rs[t]            / (w - 1)
/// sqrt((overnight + k·intraday + (1 - k)·range) · trading_periods · m)
/// ```
///
/// With [`CloseReference::PriorClose`] the intraday component uses
/// `ln(C[t]/C[t-1])`. Both forms need the prior close, so the first
/// defined value is at position `window`.
///
/// # Errors
/// `InvalidParameter` for a window of 1, where `w - 1` is zero.
pub fn yang_zhang(prices: &PriceSeries, config: &EstimatorConfig) -> Result<VolatilitySeries> {
    if config.window == 1 {
        return Err(VolatilityError::invalid(
            "Yang-Zhang requires a window greater than 1",
        ));
    }
    let m = variance_multiplier(prices, config)?;
    let scale = config.trading_periods as f64 * m;
    let window = config.window;
    let norm = 1.0 / (window as f64 - 1.0);

    let overnight = lagged_log_ratio(prices.open(), prices.close()).mapv(|x| x * x);
    let intraday = match config.close_reference {
        CloseReference::Open => log_ratio(prices.close(), prices.open()),
        CloseReference::PriorClose => log_returns(prices.close()),
    }
    .mapv(|x| x * x);
    let range = rogers_satchell_term(prices);

    let overnight_var = rolling_sum(&overnight, window) * norm;
    let intraday_var = rolling_sum(&intraday, window) * norm;
    let range_var = rolling_sum(&range, window) * norm;

    let k = yang_zhang_k(window);
    let variance = overnight_var + intraday_var * k + range_var * (1.0 - k);
    let values = variance.mapv(|v| (v * scale).sqrt());

    Ok(finish(values, config.clean))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{series::Ohlc, synthetic};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_k_weight() {
        // window 30: 0.34 / (1.34 + 31/29)
        assert_abs_diff_eq!(yang_zhang_k(30), 0.34 / (1.34 + 31.0 / 29.0), epsilon = 1e-15);
        assert!(yang_zhang_k(2) < yang_zhang_k(100));
    }

    #[test]
    fn test_window_one_rejected() {
        let prices = synthetic::oscillating("SYN", 50, 100.0).unwrap();
        let result = yang_zhang(&prices, &EstimatorConfig::new(1));
        assert!(matches!(result, Err(VolatilityError::InvalidParameter(_))));
    }

    #[test]
    fn test_first_defined_needs_prior_close() {
        let prices = synthetic::oscillating("SYN", 100, 100.0).unwrap();
        let vol = yang_zhang(&prices, &EstimatorConfig::new(10).with_clean(false)).unwrap();
        assert_eq!(vol.first_defined_position(), Some(10));
        assert_eq!(vol.len(), 100);
    }

    #[test]
    fn test_known_components() {
        // Constant bars: no overnight gap after the first period
        let bar = Ohlc::new(100.0, 103.0, 98.0, 101.0);
        let bars: Vec<Ohlc> = (0..20).map(|_| bar).collect();
        let prices = PriceSeries::from_bars("YZ", &bars).unwrap();
        let window = 5;
        let config = EstimatorConfig::new(window).with_overlapping_adjustment(false);
        let vol = yang_zhang(&prices, &config).unwrap();

        let w = window as f64;
        let overnight = (100.0_f64 / 101.0).ln().powi(2) * w / (w - 1.0);
        let intraday = (101.0_f64 / 100.0).ln().powi(2) * w / (w - 1.0);
        let rs = (103.0_f64 / 101.0).ln() * (103.0_f64 / 100.0).ln()
            + (98.0_f64 / 101.0).ln() * (98.0_f64 / 100.0).ln();
        let range = rs * w / (w - 1.0);
        let k = yang_zhang_k(window);
        let expected = ((overnight + k * intraday + (1.0 - k) * range) * 252.0).sqrt();

        assert_eq!(vol.offset(), window);
        assert_abs_diff_eq!(vol.get(0).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_prior_close_variant() {
        let prices = synthetic::oscillating("SYN", 120, 100.0).unwrap();
        let config = EstimatorConfig::new(20);
        let open_ref = yang_zhang(&prices, &config).unwrap();
        let prior = yang_zhang(
            &prices,
            &config.with_close_reference(CloseReference::PriorClose),
        )
        .unwrap();
        assert_eq!(open_ref.len(), prior.len());
        assert_ne!(open_ref.last(), prior.last());
    }
}
