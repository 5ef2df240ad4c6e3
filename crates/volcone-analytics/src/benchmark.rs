//! Subject versus benchmark comparison
//!
//! Both series must come from price series with the same index. Values are
//! paired by source position, so cleaned series with different warmups
//! line up on their common range.

use crate::error::{AnalyticsError, Result};
use ndarray::{Array1, ArrayView1, s};
use serde::{Deserialize, Serialize};
use volcone_models::VolatilitySeries;

/// Overlapping part of two series: start position and the two views
fn overlap<'a>(
    subject: &'a VolatilitySeries,
    benchmark: &'a VolatilitySeries,
) -> (usize, ArrayView1<'a, f64>, ArrayView1<'a, f64>) {
    let start = subject.offset().max(benchmark.offset());
    let end = subject.positions().end.min(benchmark.positions().end);
    let view = |series: &'a VolatilitySeries| {
        if end <= start {
            return series.values().slice(s![0..0]);
        }
        let from = start - series.offset();
        let to = end - series.offset();
        series.values().slice(s![from..to])
    };
    (start, view(subject), view(benchmark))
}

/// Ratio of subject to benchmark at every common position
pub fn volatility_ratio(subject: &VolatilitySeries, benchmark: &VolatilitySeries) -> VolatilitySeries {
    let (start, y, x) = overlap(subject, benchmark);
    VolatilitySeries::new(start, &y / &x)
}

fn pearson(y: ArrayView1<'_, f64>, x: ArrayView1<'_, f64>) -> f64 {
    let n = y.len() as f64;
    let (my, mx) = (y.sum() / n, x.sum() / n);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in y.iter().zip(x.iter()) {
        let (dy, dx) = (a - my, b - mx);
        sxy += dy * dx;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom > 0.0 { sxy / denom } else { f64::NAN }
}

/// Rolling Pearson correlation of subject and benchmark
///
/// Windows containing an undefined value on either side are undefined.
///
/// # Errors
/// `InvalidParameter` if `window` is below two.
pub fn rolling_correlation(
    subject: &VolatilitySeries,
    benchmark: &VolatilitySeries,
    window: usize,
) -> Result<VolatilitySeries> {
    if window < 2 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "correlation window must be at least 2, got {window}"
        )));
    }
    let (start, y, x) = overlap(subject, benchmark);
    let mut out = Array1::from_elem(y.len(), f64::NAN);
    if window <= y.len() {
        for (i, (wy, wx)) in y.windows(window).into_iter().zip(x.windows(window)).enumerate() {
            if wy.iter().chain(wx.iter()).any(|v| v.is_nan()) {
                continue;
            }
            out[i + window - 1] = pearson(wy, wx);
        }
    }
    Ok(VolatilitySeries::new(start, out))
}

/// Least squares fit of `subject = beta * benchmark`, without intercept
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    /// Slope on the benchmark
    pub beta: f64,
    /// Uncentered R-squared, as reported for a model without constant
    pub r_squared: f64,
    /// Standard error of `beta`
    pub std_err: f64,
    /// `beta / std_err`
    pub t_stat: f64,
    /// Number of paired observations
    pub n: usize,
}

/// Regress the subject series on the benchmark series
///
/// Only positions where both values are defined are used.
///
/// # Errors
/// * `InsufficientData` with fewer than two pairs
/// * `InvalidParameter` if the benchmark is identically zero
pub fn regress(subject: &VolatilitySeries, benchmark: &VolatilitySeries) -> Result<RegressionSummary> {
    let (_, y, x) = overlap(subject, benchmark);
    let pairs: Vec<(f64, f64)> = y
        .iter()
        .zip(x.iter())
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(&a, &b)| (a, b))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            actual: n,
        });
    }

    let sxx: f64 = pairs.iter().map(|(_, b)| b * b).sum();
    let sxy: f64 = pairs.iter().map(|(a, b)| a * b).sum();
    let syy: f64 = pairs.iter().map(|(a, _)| a * a).sum();
    if sxx <= 0.0 {
        return Err(AnalyticsError::InvalidParameter(
            "benchmark series is identically zero".to_string(),
        ));
    }

    let beta = sxy / sxx;
    let ssr: f64 = pairs.iter().map(|(a, b)| (a - beta * b).powi(2)).sum();
    let std_err = (ssr / (n as f64 - 1.0) / sxx).sqrt();
    let t_stat = if std_err > 0.0 { beta / std_err } else { f64::INFINITY };
    let r_squared = if syy > 0.0 { 1.0 - ssr / syy } else { f64::NAN };

    Ok(RegressionSummary {
        beta,
        r_squared,
        std_err,
        t_stat,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_ratio_aligns_by_position() {
        let subject = VolatilitySeries::new(2, array![0.2, 0.4, 0.6]);
        let bench = VolatilitySeries::new(3, array![0.2, 0.3, 0.9]);
        let ratio = volatility_ratio(&subject, &bench);
        assert_eq!(ratio.offset(), 3);
        assert_eq!(ratio.len(), 2);
        assert_abs_diff_eq!(ratio.get(0).unwrap(), 2.0);
        assert_abs_diff_eq!(ratio.get(1).unwrap(), 2.0);
    }

    #[test]
    fn test_disjoint_series_give_empty_ratio() {
        let subject = VolatilitySeries::new(0, array![0.2, 0.4]);
        let bench = VolatilitySeries::new(5, array![0.2]);
        assert!(volatility_ratio(&subject, &bench).is_empty());
    }

    #[test]
    fn test_rolling_correlation() {
        let subject = VolatilitySeries::aligned(array![1.0, 2.0, 3.0, 4.0, 3.0]);
        let bench = VolatilitySeries::aligned(array![2.0, 4.0, 6.0, 8.0, 10.0]);
        let corr = rolling_correlation(&subject, &bench, 3).unwrap();
        assert!(corr.get(1).unwrap().is_nan());
        assert_abs_diff_eq!(corr.get(2).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(corr.get(3).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(corr.get(4).unwrap(), 0.0, epsilon = 1e-12);
        assert!(rolling_correlation(&subject, &bench, 1).is_err());
    }

    #[test]
    fn test_regression_exact_fit() {
        let bench = VolatilitySeries::aligned(array![0.1, 0.2, 0.3, 0.4]);
        let subject = VolatilitySeries::aligned(array![0.15, 0.3, 0.45, 0.6]);
        let fit = regress(&subject, &bench).unwrap();
        assert_abs_diff_eq!(fit.beta, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.r_squared, 1.0, epsilon = 1e-12);
        assert_eq!(fit.n, 4);
    }

    #[test]
    fn test_regression_with_noise() {
        let bench = VolatilitySeries::aligned(array![1.0, 2.0, 3.0]);
        let subject = VolatilitySeries::aligned(array![1.0, 3.0, 3.0]);
        let fit = regress(&subject, &bench).unwrap();
        // sxy = 16, sxx = 14
        assert_abs_diff_eq!(fit.beta, 16.0 / 14.0, epsilon = 1e-12);
        let ssr: f64 = 19.0 - 16.0 * 16.0 / 14.0;
        assert_abs_diff_eq!(fit.std_err, (ssr / 2.0 / 14.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(fit.r_squared, 1.0 - ssr / 19.0, epsilon = 1e-12);
    }

    #[test]
    fn test_regression_needs_two_pairs() {
        let bench = VolatilitySeries::aligned(array![f64::NAN, 1.0]);
        let subject = VolatilitySeries::aligned(array![1.0, 2.0]);
        assert_eq!(
            regress(&subject, &bench),
            Err(AnalyticsError::InsufficientData {
                required: 2,
                actual: 1
            })
        );
    }
}
