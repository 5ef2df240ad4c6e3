//! Rolling statistics of an estimator series
//!
//! Each function rolls a second window over an already computed (usually
//! cleaned) volatility series. Outputs share the input's offset so they
//! stay aligned with the source prices.

use crate::{
    error::{AnalyticsError, Result},
    quantile::{QuantileBand, quantile},
};
use ndarray::{Array1, Zip};
use volcone_models::{
    VolatilitySeries,
    rolling::{rolling_apply, rolling_mean, rolling_std},
};

fn check_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "rolling window must be positive".to_string(),
        ));
    }
    Ok(())
}

fn like(series: &VolatilitySeries, values: Array1<f64>) -> VolatilitySeries {
    VolatilitySeries::new(series.offset(), values)
}

/// Rolling lower quantile, median and upper quantile
#[derive(Debug, Clone, PartialEq)]
pub struct RollingQuantiles {
    /// Lower quantile of the band
    pub lower: VolatilitySeries,
    /// Median
    pub median: VolatilitySeries,
    /// Upper quantile of the band
    pub upper: VolatilitySeries,
    /// Band used
    pub band: QuantileBand,
}

/// Rolling maximum and minimum
#[derive(Debug, Clone, PartialEq)]
pub struct RollingExtremes {
    /// Largest value in each window
    pub max: VolatilitySeries,
    /// Smallest value in each window
    pub min: VolatilitySeries,
}

/// Rolling mean, standard deviation and z-score of the current value
#[derive(Debug, Clone, PartialEq)]
pub struct RollingDescriptives {
    /// Rolling mean
    pub mean: VolatilitySeries,
    /// Rolling sample standard deviation
    pub std: VolatilitySeries,
    /// `(value - mean) / std`; NaN where the window has no dispersion
    pub z_score: VolatilitySeries,
}

impl RollingDescriptives {
    /// Most recent z-score
    pub fn last_z_score(&self) -> Option<f64> {
        self.z_score.last()
    }
}

/// Rolling quantiles of `series`
///
/// # Errors
/// `InvalidParameter` if `window` is zero.
pub fn rolling_quantiles(
    series: &VolatilitySeries,
    window: usize,
    band: QuantileBand,
) -> Result<RollingQuantiles> {
    check_window(window)?;
    let values = series.values();
    let at = |q: f64| {
        rolling_apply(values, window, |w| {
            quantile(w.iter().copied(), q).unwrap_or(f64::NAN)
        })
    };

    Ok(RollingQuantiles {
        lower: like(series, at(band.lower())),
        median: like(series, at(0.5)),
        upper: like(series, at(band.upper())),
        band,
    })
}

/// Rolling max and min of `series`
///
/// # Errors
/// `InvalidParameter` if `window` is zero.
pub fn rolling_extremes(series: &VolatilitySeries, window: usize) -> Result<RollingExtremes> {
    check_window(window)?;
    let values = series.values();
    let max = rolling_apply(values, window, |w| w.fold(f64::NEG_INFINITY, |a, &b| a.max(b)));
    let min = rolling_apply(values, window, |w| w.fold(f64::INFINITY, |a, &b| a.min(b)));

    Ok(RollingExtremes {
        max: like(series, max),
        min: like(series, min),
    })
}

/// Rolling mean, standard deviation and z-score of `series`
///
/// # Errors
/// `InvalidParameter` if `window` is zero.
pub fn rolling_descriptives(
    series: &VolatilitySeries,
    window: usize,
) -> Result<RollingDescriptives> {
    check_window(window)?;
    let values = series.values();
    let mean = rolling_mean(values, window);
    let std = rolling_std(values, window);

    let mut z_score = Array1::from_elem(values.len(), f64::NAN);
    Zip::from(&mut z_score)
        .and(values)
        .and(&mean)
        .and(&std)
        .for_each(|z, &v, &m, &s| {
            if s > f64::EPSILON * m.abs() {
                *z = (v - m) / s;
            }
        });

    Ok(RollingDescriptives {
        mean: like(series, mean),
        std: like(series, std),
        z_score: like(series, z_score),
    })
}
