//! Volatility estimators
//!
//! Each estimator is a pure function from a [`PriceSeries`] and an
//! [`EstimatorConfig`] to a [`VolatilitySeries`]. Parameters are validated
//! before any computation, so a call either fails up front or returns a
//! complete series.

pub mod garman_klass;
pub mod hodges_tompkins;
pub mod moments;
pub mod parkinson;
pub mod raw;
pub mod rogers_satchell;
pub mod yang_zhang;

pub use garman_klass::garman_klass;
pub use hodges_tompkins::hodges_tompkins;
pub use moments::{kurtosis, skew};
pub use parkinson::parkinson;
pub use raw::raw;
pub use rogers_satchell::rogers_satchell;
pub use yang_zhang::yang_zhang;

use crate::{
    config::EstimatorConfig,
    error::Result,
    overlapping::overlapping_adjustment_factor,
    series::{PriceSeries, VolatilitySeries},
};

/// Signature shared by every estimator
pub type EstimatorFn = fn(&PriceSeries, &EstimatorConfig) -> Result<VolatilitySeries>;

/// Validate `config` and return the variance multiplier `m`
///
/// `m` is the overlapping-sample factor when the adjustment is enabled and
/// 1 otherwise.
pub(crate) fn variance_multiplier(prices: &PriceSeries, config: &EstimatorConfig) -> Result<f64> {
    config.validate()?;
    if config.use_overlapping_adjustment {
        overlapping_adjustment_factor(config.window, prices.len())
    } else {
        Ok(1.0)
    }
}

/// Per-period Rogers-Satchell term
///
/// `ln(H/C)·ln(H/O) + ln(L/C)·ln(L/O)`
pub(crate) fn rogers_satchell_term(prices: &PriceSeries) -> ndarray::Array1<f64> {
    use crate::rolling::log_ratio;

    let hc = log_ratio(prices.high(), prices.close());
    let ho = log_ratio(prices.high(), prices.open());
    let lc = log_ratio(prices.low(), prices.close());
    let lo = log_ratio(prices.low(), prices.open());
    &hc * &ho + &lc * &lo
}
