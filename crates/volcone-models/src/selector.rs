//! Estimator selection
//!
//! [`Estimator`] names every model and maps it to its function through an
//! exhaustive `match`, so adding a variant without wiring it fails to
//! compile. [`get_estimator`] is the string-keyed entry point used by the
//! analytics layer and the CLI.

use crate::{
    config::{CloseReference, EstimatorConfig},
    error::{Result, VolatilityError},
    estimators::{self, EstimatorFn},
    series::{PriceSeries, VolatilitySeries},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::debug;

/// Available volatility models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Estimator {
    /// Close-to-close standard deviation
    Raw,
    /// High/low range
    Parkinson,
    /// Range with open-to-close correction
    GarmanKlass,
    /// Drift-independent range
    RogersSatchell,
    /// Overnight, intraday and range combination
    YangZhang,
    /// Close-to-close with small-sample bias correction
    HodgesTompkins,
    /// Rolling skewness of log returns
    Skew,
    /// Rolling excess kurtosis of log returns
    Kurtosis,
}

impl Estimator {
    /// Every estimator, in registry order
    pub const ALL: [Self; 8] = [
        Self::Raw,
        Self::Parkinson,
        Self::GarmanKlass,
        Self::RogersSatchell,
        Self::YangZhang,
        Self::HodgesTompkins,
        Self::Skew,
        Self::Kurtosis,
    ];

    /// Canonical name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::Parkinson => "Parkinson",
            Self::GarmanKlass => "GarmanKlass",
            Self::RogersSatchell => "RogersSatchell",
            Self::YangZhang => "YangZhang",
            Self::HodgesTompkins => "HodgesTompkins",
            Self::Skew => "Skew",
            Self::Kurtosis => "Kurtosis",
        }
    }

    /// Function implementing this estimator
    pub const fn function(self) -> EstimatorFn {
        match self {
            Self::Raw => estimators::raw,
            Self::Parkinson => estimators::parkinson,
            Self::GarmanKlass => estimators::garman_klass,
            Self::RogersSatchell => estimators::rogers_satchell,
            Self::YangZhang => estimators::yang_zhang,
            Self::HodgesTompkins => estimators::hodges_tompkins,
            Self::Skew => estimators::skew,
            Self::Kurtosis => estimators::kurtosis,
        }
    }

    /// Whether output is an annualized volatility
    ///
    /// False for the moment estimators, whose values are dimensionless.
    pub const fn is_annualized(self) -> bool {
        !matches!(self, Self::Skew | Self::Kurtosis)
    }

    /// Number of leading undefined positions for `config`
    ///
    /// `window - 1` for estimators that only look at the current period,
    /// `window` for those that need the prior close.
    pub const fn warmup(self, config: &EstimatorConfig) -> usize {
        let needs_prior_close = match self {
            Self::Parkinson | Self::RogersSatchell => false,
            Self::GarmanKlass => matches!(config.close_reference, CloseReference::PriorClose),
            Self::Raw | Self::YangZhang | Self::HodgesTompkins | Self::Skew | Self::Kurtosis => {
                true
            }
        };
        if needs_prior_close {
            config.window
        } else {
            config.window.saturating_sub(1)
        }
    }

    /// Run the estimator
    pub fn compute(self, prices: &PriceSeries, config: &EstimatorConfig) -> Result<VolatilitySeries> {
        debug!(
            estimator = self.name(),
            symbol = prices.symbol(),
            observations = prices.len(),
            window = config.window,
            clean = config.clean,
            adjusted = config.use_overlapping_adjustment,
            "computing estimator"
        );
        (self.function())(prices, config)
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Estimator {
    type Err = VolatilityError;

    /// Case-insensitive; `_`, `-` and spaces are ignored, so `GarmanKlass`,
    /// `garman_klass` and `garman-klass` all parse.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(&key))
            .ok_or_else(|| VolatilityError::UnknownEstimator(s.to_string()))
    }
}

/// Compute an estimator selected by name
///
/// # Errors
/// * `UnknownEstimator` if `name` matches no estimator
/// * any validation error of the selected estimator
pub fn get_estimator(
    name: &str,
    prices: &PriceSeries,
    window: usize,
    trading_periods: usize,
    clean: bool,
    use_overlapping_adjustment: bool,
) -> Result<VolatilitySeries> {
    let estimator: Estimator = name.parse()?;
    let config = EstimatorConfig::new(window)
        .with_trading_periods(trading_periods)
        .with_clean(clean)
        .with_overlapping_adjustment(use_overlapping_adjustment);
    estimator.compute(prices, &config)
}
