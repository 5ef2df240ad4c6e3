//! Price and volatility series
//!
//! [`PriceSeries`] is the column-oriented OHLC input shared by every
//! estimator. [`VolatilitySeries`] is the output: a run of values that
//! remembers where it starts in the source series, so trimmed output can
//! still be matched back to dates.

use crate::error::{Result, VolatilityError};
use chrono::NaiveDate;
use ndarray::{Array1, Array2, ArrayView1, s};
use serde::{Deserialize, Serialize};

/// Symbol assigned to series built from bare arrays
pub const UNNAMED_SYMBOL: &str = "-NA-";

/// A single open/high/low/close observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlc {
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
}

impl Ohlc {
    /// Create a new observation
    pub const fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// Observation where all four prices are equal
    pub const fn flat(price: f64) -> Self {
        Self::new(price, price, price, price)
    }
}

/// Ordered OHLC observations for one symbol
///
/// Prices are expected to be positive with `high >= max(open, close)` and
/// `low <= min(open, close)`. This is not validated: estimators propagate
/// whatever the logarithms of the inputs produce.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    dates: Option<Vec<NaiveDate>>,
    open: Array1<f64>,
    high: Array1<f64>,
    low: Array1<f64>,
    close: Array1<f64>,
}

impl PriceSeries {
    /// Create a series from its four price columns
    ///
    /// # Errors
    /// * `InvalidParameter` if the symbol is empty
    /// * `DimensionMismatch` if the columns differ in length
    pub fn new(
        symbol: impl Into<String>,
        open: Array1<f64>,
        high: Array1<f64>,
        low: Array1<f64>,
        close: Array1<f64>,
    ) -> Result<Self> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(VolatilityError::invalid(
                "symbol is required for a price series",
            ));
        }

        let expected = close.len();
        for column in [&open, &high, &low] {
            if column.len() != expected {
                return Err(VolatilityError::DimensionMismatch {
                    expected,
                    actual: column.len(),
                });
            }
        }

        Ok(Self {
            symbol,
            dates: None,
            open,
            high,
            low,
            close,
        })
    }

    /// Create a series from a sequence of observations
    pub fn from_bars(symbol: impl Into<String>, bars: &[Ohlc]) -> Result<Self> {
        Self::new(
            symbol,
            bars.iter().map(|b| b.open).collect(),
            bars.iter().map(|b| b.high).collect(),
            bars.iter().map(|b| b.low).collect(),
            bars.iter().map(|b| b.close).collect(),
        )
    }

    /// Create a series from an `(r, 4)` matrix with columns open, high, low, close
    ///
    /// Without a symbol the series is labelled [`UNNAMED_SYMBOL`].
    pub fn from_rows(symbol: Option<&str>, rows: &Array2<f64>) -> Result<Self> {
        if rows.ncols() != 4 {
            return Err(VolatilityError::DimensionMismatch {
                expected: 4,
                actual: rows.ncols(),
            });
        }

        Self::new(
            symbol.unwrap_or(UNNAMED_SYMBOL),
            rows.column(0).to_owned(),
            rows.column(1).to_owned(),
            rows.column(2).to_owned(),
            rows.column(3).to_owned(),
        )
    }

    /// Attach a date index, one date per observation
    pub fn with_dates(mut self, dates: Vec<NaiveDate>) -> Result<Self> {
        if dates.len() != self.len() {
            return Err(VolatilityError::DimensionMismatch {
                expected: self.len(),
                actual: dates.len(),
            });
        }
        self.dates = Some(dates);
        Ok(self)
    }

    /// Symbol label
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Date index, if the series has one
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    /// Date of the observation at `position`
    pub fn date_at(&self, position: usize) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|d| d.get(position).copied())
    }

    /// Opening prices
    pub const fn open(&self) -> &Array1<f64> {
        &self.open
    }

    /// High prices
    pub const fn high(&self) -> &Array1<f64> {
        &self.high
    }

    /// Low prices
    pub const fn low(&self) -> &Array1<f64> {
        &self.low
    }

    /// Closing prices
    pub const fn close(&self) -> &Array1<f64> {
        &self.close
    }

    /// Observation at `position`
    pub fn bar(&self, position: usize) -> Option<Ohlc> {
        (position < self.len()).then(|| {
            Ohlc::new(
                self.open[position],
                self.high[position],
                self.low[position],
                self.close[position],
            )
        })
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Whether the series has no observations
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

/// Estimator output aligned with a [`PriceSeries`]
///
/// `offset` is the position in the source series of the first value. An
/// uncleaned series starts at 0 and has NaN where a full window is not yet
/// available; a cleaned series starts at the first defined value.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilitySeries {
    offset: usize,
    values: Array1<f64>,
}

impl VolatilitySeries {
    /// Create a series whose first value sits at `offset` in the source index
    pub const fn new(offset: usize, values: Array1<f64>) -> Self {
        Self { offset, values }
    }

    /// Series aligned with the start of the source index
    pub const fn aligned(values: Array1<f64>) -> Self {
        Self::new(0, values)
    }

    /// Drop every undefined value before the first defined one
    ///
    /// NaN after the first defined value is kept so the series stays
    /// contiguous in the source index. An all-undefined series becomes empty.
    pub fn trim_leading_undefined(self) -> Self {
        let lead = self
            .values
            .iter()
            .position(|v| !v.is_nan())
            .unwrap_or(self.values.len());
        if lead == 0 {
            return self;
        }
        let values = self.values.slice(s![lead..]).to_owned();
        Self::new(self.offset + lead, values)
    }

    /// Position in the source series of the first value
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Values, NaN marking undefined entries
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Borrowed view of the values
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Consume the series, returning its values
    pub fn into_values(self) -> Array1<f64> {
        self.values
    }

    /// Number of entries, defined or not
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at index `i` of this series
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied()
    }

    /// Value at `position` of the source index
    pub fn at_position(&self, position: usize) -> Option<f64> {
        position
            .checked_sub(self.offset)
            .and_then(|i| self.get(i))
    }

    /// Last entry, the most recent estimate
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Most recent defined value, skipping trailing NaN
    pub fn last_defined(&self) -> Option<f64> {
        self.values.iter().rev().copied().find(|v| !v.is_nan())
    }

    /// Source-index positions covered by this series
    pub fn positions(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.values.len()
    }

    /// Defined (non-NaN) values in order
    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| !v.is_nan())
    }

    /// Number of defined values
    pub fn defined_count(&self) -> usize {
        self.defined().count()
    }

    /// Source-index position of the first defined value
    pub fn first_defined_position(&self) -> Option<usize> {
        self.values
            .iter()
            .position(|v| !v.is_nan())
            .map(|i| i + self.offset)
    }

    /// Dates of the entries, taken from the source series
    pub fn dates<'a>(&self, prices: &'a PriceSeries) -> Option<&'a [NaiveDate]> {
        prices.dates().and_then(|d| d.get(self.positions()))
    }
}
