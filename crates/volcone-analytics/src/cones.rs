//! Volatility cones
//!
//! A cone summarizes the distribution of an estimator across several
//! rolling windows: for each window the max, upper quantile, median, lower
//! quantile and min of the cleaned series, plus the latest (realized) value.
//! Windows are independent, so they are computed on the rayon pool.

use crate::{
    error::{AnalyticsError, Result},
    quantile::{QuantileBand, describe, quantile},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use volcone_models::{Estimator, EstimatorConfig, PriceSeries, VolatilitySeries};

/// Minimum number of windows in a cone
pub const MIN_CONE_WINDOWS: usize = 2;

/// Cone statistics for a single window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeSlice {
    /// Rolling window of the estimator
    pub window: usize,
    /// Largest value
    pub max: f64,
    /// Upper quantile of the band
    pub upper: f64,
    /// Median
    pub median: f64,
    /// Lower quantile of the band
    pub lower: f64,
    /// Smallest value
    pub min: f64,
    /// Most recent defined value
    pub realized: f64,
    /// Defined values the statistics were taken from
    #[serde(skip)]
    pub values: Vec<f64>,
}

impl ConeSlice {
    /// Percentile rank of the realized value within this window's values
    ///
    /// NaN when the realized value is undefined.
    pub fn realized_rank(&self) -> f64 {
        if self.realized.is_nan() || self.values.is_empty() {
            return f64::NAN;
        }
        let below = self.values.iter().filter(|v| **v <= self.realized).count();
        below as f64 / self.values.len() as f64
    }
}

/// Summarize one estimator series into a cone slice
///
/// # Errors
/// `InsufficientData` if the series has no defined value.
pub fn cone_slice(
    series: &VolatilitySeries,
    window: usize,
    band: QuantileBand,
) -> Result<ConeSlice> {
    let values: Vec<f64> = series.defined().collect();
    let stats = describe(values.iter().copied()).ok_or(AnalyticsError::InsufficientData {
        required: 1,
        actual: 0,
    })?;
    let upper = quantile(values.iter().copied(), band.upper()).unwrap_or(f64::NAN);
    let lower = quantile(values.iter().copied(), band.lower()).unwrap_or(f64::NAN);

    Ok(ConeSlice {
        window,
        max: stats.max,
        upper,
        median: stats.median,
        lower,
        min: stats.min,
        realized: values.last().copied().unwrap_or(f64::NAN),
        values,
    })
}

/// Cone of one estimator over several windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityCone {
    symbol: String,
    estimator: Estimator,
    band: QuantileBand,
    slices: Vec<ConeSlice>,
}

impl VolatilityCone {
    /// Symbol of the priced asset
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Estimator the cone was built from
    pub const fn estimator(&self) -> Estimator {
        self.estimator
    }

    /// Quantile band of the upper/lower lines
    pub const fn band(&self) -> QuantileBand {
        self.band
    }

    /// Slices in the order the windows were requested
    pub fn slices(&self) -> &[ConeSlice] {
        &self.slices
    }

    /// Requested windows
    pub fn windows(&self) -> Vec<usize> {
        self.slices.iter().map(|s| s.window).collect()
    }

    /// Slice for `window`, if it was requested
    pub fn slice(&self, window: usize) -> Option<&ConeSlice> {
        self.slices.iter().find(|s| s.window == window)
    }
}

/// Compute a volatility cone
///
/// Each window runs `estimator` with `base` (window replaced, cleaning
/// forced on). Windows are processed in parallel; slices come back in the
/// order of `windows`.
///
/// # Errors
/// * `InvalidParameter` with fewer than two windows
/// * any estimator error for a window, e.g. a window too long for the
///   overlapping adjustment
/// * `InsufficientData` if a window yields no defined value
pub fn compute_cone(
    prices: &PriceSeries,
    estimator: Estimator,
    windows: &[usize],
    band: QuantileBand,
    base: &EstimatorConfig,
) -> Result<VolatilityCone> {
    if windows.len() < MIN_CONE_WINDOWS {
        return Err(AnalyticsError::InvalidParameter(format!(
            "cone requires at least {MIN_CONE_WINDOWS} windows, got {}",
            windows.len()
        )));
    }

    debug!(
        estimator = estimator.name(),
        symbol = prices.symbol(),
        ?windows,
        "computing cone"
    );

    let slices = windows
        .par_iter()
        .map(|&window| {
            let config = base.with_window(window).with_clean(true);
            let series = estimator.compute(prices, &config)?;
            cone_slice(&series, window, band)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(VolatilityCone {
        symbol: prices.symbol().to_string(),
        estimator,
        band,
        slices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use volcone_models::synthetic;

    #[test]
    fn test_cone_slice_statistics() {
        let series = VolatilitySeries::new(3, array![0.1, 0.4, 0.2, 0.3, 0.5]);
        let slice = cone_slice(&series, 10, QuantileBand::default()).unwrap();
        assert_eq!(slice.window, 10);
        assert_abs_diff_eq!(slice.max, 0.5);
        assert_abs_diff_eq!(slice.upper, 0.4);
        assert_abs_diff_eq!(slice.median, 0.3);
        assert_abs_diff_eq!(slice.lower, 0.2);
        assert_abs_diff_eq!(slice.min, 0.1);
        assert_abs_diff_eq!(slice.realized, 0.5);
        assert_abs_diff_eq!(slice.realized_rank(), 1.0);
    }

    #[test]
    fn test_cone_slice_realized_skips_trailing_nan() {
        let series = VolatilitySeries::new(3, array![0.1, 0.4, 0.3, f64::NAN]);
        let slice = cone_slice(&series, 10, QuantileBand::default()).unwrap();
        assert_abs_diff_eq!(slice.realized, 0.3);
        assert_abs_diff_eq!(slice.realized_rank(), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cone_slice_empty_series() {
        let series = VolatilitySeries::aligned(array![f64::NAN, f64::NAN]);
        let err = cone_slice(&series, 5, QuantileBand::default()).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn test_cone_requires_two_windows() {
        let prices = synthetic::oscillating("SYN", 300, 100.0).unwrap();
        let result = compute_cone(
            &prices,
            Estimator::Raw,
            &[30],
            QuantileBand::default(),
            &EstimatorConfig::default(),
        );
        assert!(result.unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_cone_keeps_window_order() {
        let prices = synthetic::oscillating("SYN", 400, 100.0).unwrap();
        let windows = [90, 30, 60];
        let cone = compute_cone(
            &prices,
            Estimator::Parkinson,
            &windows,
            QuantileBand::default(),
            &EstimatorConfig::default(),
        )
        .unwrap();
        assert_eq!(cone.windows(), windows.to_vec());
        assert_eq!(cone.symbol(), "SYN");
        assert!(cone.slice(60).is_some());
        assert!(cone.slice(45).is_none());
    }

    #[test]
    fn test_cone_propagates_estimator_errors() {
        let prices = synthetic::oscillating("SYN", 100, 100.0).unwrap();
        let result = compute_cone(
            &prices,
            Estimator::Raw,
            &[20, 60],
            QuantileBand::default(),
            &EstimatorConfig::default(),
        );
        assert!(matches!(result, Err(AnalyticsError::Estimator(_))));
    }
}
