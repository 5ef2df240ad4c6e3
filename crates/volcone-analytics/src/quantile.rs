//! Quantiles and descriptive statistics over defined values

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};

/// Tolerance when checking that a band's quantiles sum to one
const BAND_SUM_TOLERANCE: f64 = 1e-9;

/// Symmetric pair of quantiles, e.g. 25% / 75%
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileBand {
    lower: f64,
    upper: f64,
}

impl Default for QuantileBand {
    fn default() -> Self {
        Self {
            lower: 0.25,
            upper: 0.75,
        }
    }
}

impl QuantileBand {
    /// Create a band
    ///
    /// # Errors
    /// `InvalidQuantiles` unless `0 <= lower <= upper <= 1` and
    /// `lower + upper == 1`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        let in_range = (0.0..=1.0).contains(&lower) && (0.0..=1.0).contains(&upper);
        if !in_range || lower > upper || (lower + upper - 1.0).abs() > BAND_SUM_TOLERANCE {
            return Err(AnalyticsError::InvalidQuantiles { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Lower quantile
    pub const fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper quantile
    pub const fn upper(&self) -> f64 {
        self.upper
    }

    /// Percent labels for the two quantiles, e.g. `("25%", "75%")`
    pub fn labels(&self) -> (String, String) {
        (
            format!("{:.0}%", self.lower * 100.0),
            format!("{:.0}%", self.upper * 100.0),
        )
    }
}

fn sorted_defined(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.into_iter().filter(|x| !x.is_nan()).collect();
    v.sort_by(f64::total_cmp);
    v
}

fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Quantile `q` of the defined values, linearly interpolated
///
/// NaN values are ignored. `None` if no value is defined.
pub fn quantile(values: impl IntoIterator<Item = f64>, q: f64) -> Option<f64> {
    quantile_sorted(&sorted_defined(values), q)
}

/// Summary statistics of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Descriptives {
    /// Number of defined values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (NaN for a single value)
    pub std: f64,
    /// Smallest value
    pub min: f64,
    /// Median
    pub median: f64,
    /// Largest value
    pub max: f64,
}

impl Descriptives {
    /// Spread between the largest and smallest value
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Describe the defined values, `None` if there are none
pub fn describe(values: impl IntoIterator<Item = f64>) -> Option<Descriptives> {
    let sorted = sorted_defined(values);
    let count = sorted.len();
    let median = quantile_sorted(&sorted, 0.5)?;

    let n = count as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std = if count < 2 {
        f64::NAN
    } else {
        (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    };

    Some(Descriptives {
        count,
        mean,
        std,
        min: sorted[0],
        median,
        max: sorted[count - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.25, 0.75)]
    #[case(0.1, 0.9)]
    #[case(0.5, 0.5)]
    fn test_valid_band(#[case] lower: f64, #[case] upper: f64) {
        assert!(QuantileBand::new(lower, upper).is_ok());
    }

    #[rstest]
    #[case(0.75, 0.25)]
    #[case(0.2, 0.7)]
    #[case(-0.1, 1.1)]
    fn test_invalid_band(#[case] lower: f64, #[case] upper: f64) {
        let err = QuantileBand::new(lower, upper).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_band_labels() {
        let band = QuantileBand::new(0.1, 0.9).unwrap();
        assert_eq!(band.labels(), ("10%".to_string(), "90%".to_string()));
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = vec![4.0, 1.0, 3.0, 2.0];
        assert_abs_diff_eq!(quantile(values.clone(), 0.5).unwrap(), 2.5);
        assert_abs_diff_eq!(quantile(values.clone(), 0.25).unwrap(), 1.75);
        assert_abs_diff_eq!(quantile(values.clone(), 0.0).unwrap(), 1.0);
        assert_abs_diff_eq!(quantile(values, 1.0).unwrap(), 4.0);
    }

    #[test]
    fn test_quantile_ignores_nan() {
        let values = vec![f64::NAN, 1.0, 3.0];
        assert_abs_diff_eq!(quantile(values, 0.5).unwrap(), 2.0);
        assert!(quantile(vec![f64::NAN], 0.5).is_none());
    }

    #[test]
    fn test_describe() {
        let d = describe(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(d.count, 5);
        assert_abs_diff_eq!(d.mean, 3.0);
        assert_abs_diff_eq!(d.std, 2.5_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(d.median, 3.0);
        assert_abs_diff_eq!(d.range(), 4.0);
        assert!(describe(Vec::new()).is_none());
    }
}
