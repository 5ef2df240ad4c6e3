//! Log-ratio and rolling-window helpers shared by the estimators
//!
//! Rolling statistics follow the usual fixed-window convention: the value
//! at position `i` summarizes `values[i + 1 - window..=i]`, positions
//! before `window - 1` are NaN, and a window containing any NaN yields NaN.

use crate::series::VolatilitySeries;
use ndarray::{Array1, ArrayView1, Zip};

/// Relative dispersion below which a window is treated as constant
const DEGENERATE_DISPERSION: f64 = 1e-10;

/// Element-wise `ln(numerator / denominator)`
pub fn log_ratio(numerator: &Array1<f64>, denominator: &Array1<f64>) -> Array1<f64> {
    Zip::from(numerator)
        .and(denominator)
        .map_collect(|&n, &d| (n / d).ln())
}

/// `ln(numerator[t] / denominator[t - 1])`, NaN at position 0
pub fn lagged_log_ratio(numerator: &Array1<f64>, denominator: &Array1<f64>) -> Array1<f64> {
    let mut out = Array1::from_elem(numerator.len(), f64::NAN);
    for t in 1..numerator.len() {
        out[t] = (numerator[t] / denominator[t - 1]).ln();
    }
    out
}

/// Close-to-close log returns, NaN at position 0
pub fn log_returns(close: &Array1<f64>) -> Array1<f64> {
    lagged_log_ratio(close, close)
}

/// Apply `f` to every full window of `values`
///
/// Windows containing NaN are skipped and left undefined. A window of 0 or
/// one longer than the input gives an all-NaN result.
pub fn rolling_apply<F>(values: &Array1<f64>, window: usize, f: F) -> Array1<f64>
where
    F: Fn(ArrayView1<'_, f64>) -> f64,
{
    let mut out = Array1::from_elem(values.len(), f64::NAN);
    if window == 0 || window > values.len() {
        return out;
    }

    for (i, w) in values.windows(window).into_iter().enumerate() {
        if w.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i + window - 1] = f(w);
    }
    out
}

/// Rolling sum
pub fn rolling_sum(values: &Array1<f64>, window: usize) -> Array1<f64> {
    rolling_apply(values, window, |w| w.sum())
}

/// Rolling arithmetic mean
pub fn rolling_mean(values: &Array1<f64>, window: usize) -> Array1<f64> {
    rolling_apply(values, window, |w| w.sum() / w.len() as f64)
}

/// Rolling sample standard deviation (n - 1 denominator)
pub fn rolling_std(values: &Array1<f64>, window: usize) -> Array1<f64> {
    rolling_apply(values, window, sample_std)
}

/// Rolling adjusted Fisher-Pearson skewness
pub fn rolling_skew(values: &Array1<f64>, window: usize) -> Array1<f64> {
    rolling_apply(values, window, sample_skewness)
}

/// Rolling bias-corrected excess kurtosis
pub fn rolling_kurtosis(values: &Array1<f64>, window: usize) -> Array1<f64> {
    rolling_apply(values, window, sample_excess_kurtosis)
}

/// Sample standard deviation, NaN for fewer than two observations
pub fn sample_std(values: ArrayView1<'_, f64>) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean = values.sum() / n as f64;
    let ss: f64 = values.iter().map(|&v| (v - mean).powi(2)).sum();
    (ss / (n as f64 - 1.0)).sqrt()
}

/// Central moments `(m2, m3, m4)` with population (1/n) normalization
fn central_moments(values: ArrayView1<'_, f64>) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let mean = values.sum() / n;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Whether the spread of `values` is indistinguishable from rounding noise
fn is_degenerate(values: ArrayView1<'_, f64>, m2: f64) -> bool {
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    m2.sqrt() <= DEGENERATE_DISPERSION * scale
}

/// Adjusted Fisher-Pearson skewness `G1`
///
/// NaN for fewer than three observations or a constant sample.
pub fn sample_skewness(values: ArrayView1<'_, f64>) -> f64 {
    let n = values.len();
    if n < 3 {
        return f64::NAN;
    }
    let (m2, m3, _) = central_moments(values);
    if is_degenerate(values, m2) {
        return f64::NAN;
    }
    let n = n as f64;
    let g1 = m3 / m2.powf(1.5);
    (n * (n - 1.0)).sqrt() / (n - 2.0) * g1
}

/// Bias-corrected excess kurtosis `G2`
///
/// NaN for fewer than four observations or a constant sample.
pub fn sample_excess_kurtosis(values: ArrayView1<'_, f64>) -> f64 {
    let n = values.len();
    if n < 4 {
        return f64::NAN;
    }
    let (m2, _, m4) = central_moments(values);
    if is_degenerate(values, m2) {
        return f64::NAN;
    }
    let n = n as f64;
    let g2 = m4 / (m2 * m2) - 3.0;
    (n - 1.0) / ((n - 2.0) * (n - 3.0)) * ((n + 1.0) * g2 + 6.0)
}

/// Clamp negative values to zero, leaving NaN untouched
///
/// `f64::max` would turn NaN into 0.0, hiding undefined windows.
pub fn clamp_non_negative(value: f64) -> f64 {
    if value < 0.0 { 0.0 } else { value }
}

/// Wrap raw estimator output, trimming leading NaN when `clean` is set
pub fn finish(values: Array1<f64>, clean: bool) -> VolatilitySeries {
    let series = VolatilitySeries::aligned(values);
    if clean {
        series.trim_leading_undefined()
    } else {
        series
    }
}
