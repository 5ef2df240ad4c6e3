//! Volatility analyzer
//!
//! [`VolatilityAnalyzer`] binds a price series, an estimator and an
//! optional benchmark, and exposes every analytic of this crate against
//! them. Each call recomputes the cleaned estimator series for the window
//! it needs.

use crate::{
    benchmark::{RegressionSummary, regress, rolling_correlation, volatility_ratio},
    cones::{VolatilityCone, compute_cone},
    error::{AnalyticsError, Result},
    histogram::{Histogram, histogram},
    quantile::QuantileBand,
    rolling_stats::{
        RollingDescriptives, RollingExtremes, RollingQuantiles, rolling_descriptives,
        rolling_extremes, rolling_quantiles,
    },
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use volcone_models::{Estimator, EstimatorConfig, PriceSeries, VolatilitySeries};

/// Default cone windows
pub const DEFAULT_CONE_WINDOWS: [usize; 4] = [30, 60, 90, 120];

/// Default number of histogram bins
pub const DEFAULT_BINS: usize = 100;

/// Parameters of a term sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSheetConfig {
    /// Window of the rolling sections (default: 30)
    pub window: usize,
    /// Cone windows (default: 30, 60, 90, 120)
    pub windows: Vec<usize>,
    /// Quantile band of cones and rolling quantiles (default: 25% / 75%)
    pub band: QuantileBand,
    /// Histogram bins (default: 100)
    pub bins: usize,
    /// Normalize the histogram and attach a fitted normal density (default: true)
    pub normed: bool,
}

impl Default for TermSheetConfig {
    fn default() -> Self {
        Self {
            window: 30,
            windows: DEFAULT_CONE_WINDOWS.to_vec(),
            band: QuantileBand::default(),
            bins: DEFAULT_BINS,
            normed: true,
        }
    }
}

/// Benchmark section of a term sheet
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkComparison {
    /// Benchmark symbol
    pub symbol: String,
    /// Subject estimator series
    pub subject: VolatilitySeries,
    /// Benchmark estimator series
    pub benchmark: VolatilitySeries,
    /// Subject / benchmark
    pub ratio: VolatilitySeries,
    /// Rolling correlation of the two estimator series
    pub correlation: VolatilitySeries,
    /// Regression of subject on benchmark
    pub regression: RegressionSummary,
}

/// Every analytic for one symbol and estimator
#[derive(Debug, Clone, PartialEq)]
pub struct TermSheet {
    /// Subject symbol
    pub symbol: String,
    /// Estimator used throughout
    pub estimator: Estimator,
    /// First and last date of the price series, when dated
    pub period: Option<(NaiveDate, NaiveDate)>,
    /// Parameters the sheet was built with
    pub config: TermSheetConfig,
    /// Estimator series at the rolling window
    pub series: VolatilitySeries,
    /// Cone over the configured windows
    pub cone: VolatilityCone,
    /// Rolling quantiles
    pub quantiles: RollingQuantiles,
    /// Rolling max and min
    pub extremes: RollingExtremes,
    /// Rolling mean, std and z-score
    pub descriptives: RollingDescriptives,
    /// Histogram of the estimator series
    pub histogram: Histogram,
    /// Benchmark comparison, when a benchmark is attached
    pub benchmark: Option<BenchmarkComparison>,
}

/// Analytics facade over one price series and estimator
#[derive(Debug, Clone)]
pub struct VolatilityAnalyzer {
    prices: PriceSeries,
    benchmark: Option<PriceSeries>,
    estimator: Estimator,
    config: EstimatorConfig,
}

impl VolatilityAnalyzer {
    /// Create an analyzer with default estimator settings
    pub fn new(prices: PriceSeries, estimator: Estimator) -> Self {
        Self {
            prices,
            benchmark: None,
            estimator,
            config: EstimatorConfig::default(),
        }
    }

    /// Attach a benchmark series
    ///
    /// # Errors
    /// `DimensionMismatch` if the benchmark length differs from the subject.
    pub fn with_benchmark(mut self, benchmark: PriceSeries) -> Result<Self> {
        if benchmark.len() != self.prices.len() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: self.prices.len(),
                actual: benchmark.len(),
            });
        }
        self.benchmark = Some(benchmark);
        Ok(self)
    }

    /// Replace the base estimator configuration
    ///
    /// The window is overridden per call and output is always cleaned.
    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Subject prices
    pub const fn prices(&self) -> &PriceSeries {
        &self.prices
    }

    /// Benchmark prices, if attached
    pub const fn benchmark(&self) -> Option<&PriceSeries> {
        self.benchmark.as_ref()
    }

    /// Estimator in use
    pub const fn estimator(&self) -> Estimator {
        self.estimator
    }

    /// Base estimator configuration
    pub const fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// First and last date of the subject prices
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.prices.dates()?;
        Some((*dates.first()?, *dates.last()?))
    }

    fn compute(&self, prices: &PriceSeries, window: usize) -> Result<VolatilitySeries> {
        let config = self.config.with_window(window).with_clean(true);
        Ok(self.estimator.compute(prices, &config)?)
    }

    fn require_benchmark(&self) -> Result<&PriceSeries> {
        self.benchmark.as_ref().ok_or_else(|| {
            AnalyticsError::InvalidParameter("no benchmark series attached".to_string())
        })
    }

    /// Cleaned estimator series of the subject
    pub fn series(&self, window: usize) -> Result<VolatilitySeries> {
        self.compute(&self.prices, window)
    }

    /// Cleaned estimator series of the benchmark
    pub fn benchmark_series(&self, window: usize) -> Result<VolatilitySeries> {
        self.compute(self.require_benchmark()?, window)
    }

    /// Volatility cone over `windows`
    pub fn cones(&self, windows: &[usize], band: QuantileBand) -> Result<VolatilityCone> {
        compute_cone(&self.prices, self.estimator, windows, band, &self.config)
    }

    /// Rolling quantiles of the estimator series, rolled over the same window
    pub fn rolling_quantiles(&self, window: usize, band: QuantileBand) -> Result<RollingQuantiles> {
        rolling_quantiles(&self.series(window)?, window, band)
    }

    /// Rolling max and min of the estimator series
    pub fn rolling_extremes(&self, window: usize) -> Result<RollingExtremes> {
        rolling_extremes(&self.series(window)?, window)
    }

    /// Rolling mean, std and z-score of the estimator series
    pub fn rolling_descriptives(&self, window: usize) -> Result<RollingDescriptives> {
        rolling_descriptives(&self.series(window)?, window)
    }

    /// Histogram of the estimator series
    pub fn histogram(&self, window: usize, bins: usize, normed: bool) -> Result<Histogram> {
        histogram(&self.series(window)?, bins, normed)
    }

    /// Ratio of subject to benchmark estimator series
    ///
    /// # Errors
    /// `InvalidParameter` without a benchmark.
    pub fn benchmark_ratio(&self, window: usize) -> Result<VolatilitySeries> {
        let benchmark = self.benchmark_series(window)?;
        Ok(volatility_ratio(&self.series(window)?, &benchmark))
    }

    /// Rolling correlation of subject and benchmark estimator series
    pub fn benchmark_correlation(&self, window: usize) -> Result<VolatilitySeries> {
        let benchmark = self.benchmark_series(window)?;
        rolling_correlation(&self.series(window)?, &benchmark, window)
    }

    /// Regression of the subject estimator series on the benchmark's
    pub fn benchmark_regression(&self, window: usize) -> Result<RegressionSummary> {
        let benchmark = self.benchmark_series(window)?;
        regress(&self.series(window)?, &benchmark)
    }

    fn compare(&self, benchmark: &PriceSeries, window: usize) -> Result<BenchmarkComparison> {
        let subject = self.series(window)?;
        let bench = self.compute(benchmark, window)?;
        Ok(BenchmarkComparison {
            symbol: benchmark.symbol().to_string(),
            ratio: volatility_ratio(&subject, &bench),
            correlation: rolling_correlation(&subject, &bench, window)?,
            regression: regress(&subject, &bench)?,
            subject,
            benchmark: bench,
        })
    }

    /// Build every analytic into one term sheet
    ///
    /// The benchmark section is filled only when a benchmark is attached.
    ///
    /// # Errors
    /// Any error of the individual analytics.
    pub fn term_sheet(&self, config: &TermSheetConfig) -> Result<TermSheet> {
        info!(
            symbol = self.prices.symbol(),
            estimator = self.estimator.name(),
            window = config.window,
            benchmark = self.benchmark.as_ref().map(PriceSeries::symbol),
            "building term sheet"
        );

        let series = self.series(config.window)?;
        let benchmark = self
            .benchmark
            .as_ref()
            .map(|b| self.compare(b, config.window))
            .transpose()?;

        Ok(TermSheet {
            symbol: self.prices.symbol().to_string(),
            estimator: self.estimator,
            period: self.period(),
            cone: self.cones(&config.windows, config.band)?,
            quantiles: rolling_quantiles(&series, config.window, config.band)?,
            extremes: rolling_extremes(&series, config.window)?,
            descriptives: rolling_descriptives(&series, config.window)?,
            histogram: histogram(&series, config.bins, config.normed)?,
            benchmark,
            series,
            config: config.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volcone_models::synthetic;

    fn analyzer() -> VolatilityAnalyzer {
        let prices = synthetic::oscillating("SYN", 400, 100.0).unwrap();
        VolatilityAnalyzer::new(prices, Estimator::YangZhang)
    }

    #[test]
    fn test_benchmark_length_checked() {
        let bench = synthetic::oscillating("BENCH", 399, 50.0).unwrap();
        let err = analyzer().with_benchmark(bench).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::DimensionMismatch {
                expected: 400,
                actual: 399
            }
        );
    }

    #[test]
    fn test_benchmark_required() {
        let err = analyzer().benchmark_ratio(30).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_series_is_cleaned() {
        let series = analyzer().series(30).unwrap();
        assert_eq!(series.offset(), 30);
        assert_eq!(series.len(), 370);
    }

    #[test]
    fn test_term_sheet_without_benchmark() {
        let sheet = analyzer().term_sheet(&TermSheetConfig::default()).unwrap();
        assert_eq!(sheet.symbol, "SYN");
        assert!(sheet.benchmark.is_none());
        assert!(sheet.period.is_none());
        assert_eq!(sheet.cone.windows(), vec![30, 60, 90, 120]);
        assert_eq!(sheet.histogram.bins(), 100);
        assert_eq!(sheet.histogram.total(), sheet.series.defined_count());
    }

    #[test]
    fn test_term_sheet_with_benchmark() {
        let bench = synthetic::oscillating("BENCH", 400, 50.0).unwrap();
        let analyzer = analyzer().with_benchmark(bench).unwrap();
        let sheet = analyzer.term_sheet(&TermSheetConfig::default()).unwrap();
        let comparison = sheet.benchmark.unwrap();
        assert_eq!(comparison.symbol, "BENCH");
        // identical returns, so the two series coincide
        for v in comparison.ratio.defined() {
            approx::assert_abs_diff_eq!(v, 1.0, epsilon = 1e-9);
        }
        approx::assert_abs_diff_eq!(comparison.regression.beta, 1.0, epsilon = 1e-9);
    }
}
