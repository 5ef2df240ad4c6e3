//! Finite-sample corrections for overlapping rolling windows
//!
//! Consecutive rolling windows share `h - 1` observations, so the `n`
//! estimates taken from a series are autocorrelated and their naive
//! variance understates the true sampling variance. Both corrections here
//! rescale the variance by
//!
//! ```text
//! 1 / (1 - h/n + (h² - 1) / (3n²))
//! ```
//!
//! and differ only in what `n` is counted from. Estimators apply the
//! square root of the factor to a volatility.

use crate::error::{Result, VolatilityError};
use tracing::debug;

/// Variance inflation for `n` overlapping windows of length `h`
fn variance_inflation(h: f64, n: f64) -> f64 {
    let a = h / n;
    let b = (h * h - 1.0) / (3.0 * n * n);
    1.0 / (1.0 - a + b)
}

/// Overlapping-sample variance adjustment factor
///
/// With `h = window`, `T = series_len` and `n = T - h + 1` overlapping
/// windows. The correction is only meaningful when the window is small
/// relative to the sample.
///
/// # Errors
/// `InvalidParameter` if `window` is 0 or not strictly less than half of
/// `series_len`.
pub fn overlapping_adjustment_factor(window: usize, series_len: usize) -> Result<f64> {
    if window == 0 {
        return Err(VolatilityError::invalid("window must be positive"));
    }
    if window >= series_len.div_ceil(2) {
        return Err(VolatilityError::invalid(format!(
            "window {window} must be less than half the series length {series_len}"
        )));
    }

    let n = series_len - window + 1;
    let factor = variance_inflation(window as f64, n as f64);
    debug!(window, series_len, factor, "overlapping adjustment factor");
    Ok(factor)
}

/// Hodges-Tompkins small-sample bias correction
///
/// Same form as [`overlapping_adjustment_factor`] with `n` counted from the
/// valid log returns: `n = valid_returns - h + 1`.
///
/// # Errors
/// `InvalidParameter` if `window` is 0, exceeds `valid_returns`, or the
/// correction's denominator is not positive. That happens only when a
/// single window fits (`window == valid_returns`, so `n = 1`) and the
/// window is 1 or 2, where the denominator is `(h - 1)(h - 2) / 3`.
pub fn hodges_tompkins_factor(window: usize, valid_returns: usize) -> Result<f64> {
    if window == 0 {
        return Err(VolatilityError::invalid("window must be positive"));
    }
    if valid_returns < window {
        return Err(VolatilityError::invalid(format!(
            "window {window} exceeds the {valid_returns} valid returns"
        )));
    }

    let h = window as f64;
    let n = (valid_returns - window + 1) as f64;
    let denominator = 1.0 - h / n + (h * h - 1.0) / (3.0 * n * n);
    if denominator <= 0.0 {
        return Err(VolatilityError::invalid(format!(
            "Hodges-Tompkins correction undefined for window {window} and {valid_returns} returns"
        )));
    }

    let factor = 1.0 / denominator;
    debug!(window, valid_returns, factor, "Hodges-Tompkins factor");
    Ok(factor)
}
