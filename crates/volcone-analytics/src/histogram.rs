//! Histogram of estimator values

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use volcone_models::VolatilitySeries;

/// Equal-width histogram of the defined values of a series
///
/// Bins are half-open `[edge[i], edge[i + 1])` except the last, which also
/// includes the right edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins
    pub edges: Vec<f64>,
    /// Number of values in each bin
    pub counts: Vec<usize>,
    /// Density of each bin (integrates to one), when normalized
    pub density: Option<Vec<f64>>,
    /// Normal density at each edge with the sample mean and std, when normalized
    pub normal_pdf: Option<Vec<f64>>,
    /// Sample mean
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    /// Most recent defined value of the series
    pub last: f64,
}

impl Histogram {
    /// Number of bins
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of values counted
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Index of the bin containing `value`, if inside the range
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let (first, last) = (*self.edges.first()?, *self.edges.last()?);
        if value.is_nan() || value < first || value > last {
            return None;
        }
        let width = (last - first) / self.bins() as f64;
        let i = ((value - first) / width) as usize;
        Some(i.min(self.bins() - 1))
    }
}

fn normal_density(x: f64, mean: f64, std: f64) -> f64 {
    if std.is_nan() || std <= 0.0 {
        return f64::NAN;
    }
    let z = (x - mean) / std;
    (-0.5 * z * z).exp() / (std * (2.0 * PI).sqrt())
}

/// Histogram of the defined values of `series`
///
/// A constant sample is spread over `[v - 0.5, v + 0.5]`.
///
/// # Errors
/// * `InvalidParameter` if `bins` is zero
/// * `InsufficientData` if the series has no defined value
pub fn histogram(series: &VolatilitySeries, bins: usize, normed: bool) -> Result<Histogram> {
    if bins == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "histogram requires at least one bin".to_string(),
        ));
    }
    let values: Vec<f64> = series.defined().collect();
    if values.is_empty() {
        return Err(AnalyticsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() < 2 {
        f64::NAN
    } else {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    };

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for v in &values {
        let i = (((v - lo) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }

    let (density, normal_pdf) = if normed {
        let density = counts.iter().map(|&c| c as f64 / (n * width)).collect();
        let pdf = edges.iter().map(|&e| normal_density(e, mean, std)).collect();
        (Some(density), Some(pdf))
    } else {
        (None, None)
    };

    Ok(Histogram {
        edges,
        counts,
        density,
        normal_pdf,
        mean,
        std,
        last: values.last().copied().unwrap_or(f64::NAN),
    })
}
