#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/volcone/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod analyzer;
pub mod benchmark;
pub mod cones;
pub mod error;
pub mod histogram;
pub mod quantile;
pub mod rolling_stats;

pub use analyzer::{BenchmarkComparison, TermSheet, TermSheetConfig, VolatilityAnalyzer};
pub use benchmark::{RegressionSummary, regress, rolling_correlation, volatility_ratio};
pub use cones::{ConeSlice, VolatilityCone, compute_cone, cone_slice};
pub use error::{AnalyticsError, Result};
pub use histogram::{Histogram, histogram};
pub use quantile::{Descriptives, QuantileBand, describe, quantile};
pub use rolling_stats::{
    RollingDescriptives, RollingExtremes, RollingQuantiles, rolling_descriptives,
    rolling_extremes, rolling_quantiles,
};
