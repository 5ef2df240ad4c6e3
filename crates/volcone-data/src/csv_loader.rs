//! Daily OHLC prices from CSV.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use ndarray::Array1;
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, warn};
use volcone_models::PriceSeries;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Options applied while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Rescale open, high, low and close by `Adj Close / Close`
    pub adjust_prices: bool,
    /// Drop rows before this date
    pub start: Option<NaiveDate>,
    /// Drop rows after this date
    pub end: Option<NaiveDate>,
}

impl LoadOptions {
    /// Options with price adjustment enabled
    pub const fn adjusted() -> Self {
        Self {
            adjust_prices: true,
            start: None,
            end: None,
        }
    }

    /// Restrict to the inclusive range `start..=end`
    pub const fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(())
    }

    fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// One CSV row; unparseable prices (Yahoo writes `null`) read as `None`
#[derive(Debug, Deserialize)]
struct QuoteRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open", deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(rename = "High", deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(rename = "Low", deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(rename = "Close", deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(rename = "Adj Close", default, deserialize_with = "csv::invalid_option")]
    adj_close: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Quote {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    adj_close: Option<f64>,
}

/// Load prices for `symbol` from a CSV file
///
/// # Errors
/// See [`read_csv`]; additionally `Io` if the file cannot be opened.
pub fn load_csv(path: impl AsRef<Path>, symbol: &str, options: LoadOptions) -> Result<PriceSeries> {
    let path = path.as_ref();
    debug!(path = %path.display(), symbol, "loading prices");
    read_csv(File::open(path)?, symbol, options)
}

/// Read prices for `symbol` from CSV data
///
/// Requires the `Date`, `Open`, `High`, `Low` and `Close` columns; `Adj
/// Close` is needed only with `adjust_prices`. Rows are sorted by date.
///
/// # Errors
/// * `InvalidDateRange` if the option range is inverted
/// * `Csv` for malformed CSV or missing columns
/// * `Parse` for a bad date or a repeated date
/// * `MissingData` if no row survives, or adjustment lacks `Adj Close`
/// * `Series` for an empty symbol
pub fn read_csv<R: Read>(reader: R, symbol: &str, options: LoadOptions) -> Result<PriceSeries> {
    options.validate()?;

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut quotes = Vec::new();
    let mut skipped = 0usize;

    for record in rdr.deserialize::<QuoteRecord>() {
        let record = record?;
        let date = NaiveDate::parse_from_str(&record.date, DATE_FORMAT)
            .map_err(|e| DataError::Parse(format!("date '{}': {e}", record.date)))?;
        if !options.contains(date) {
            continue;
        }
        match (record.open, record.high, record.low, record.close) {
            (Some(open), Some(high), Some(low), Some(close)) => quotes.push(Quote {
                date,
                open,
                high,
                low,
                close,
                adj_close: record.adj_close,
            }),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(symbol, skipped, "skipped rows with missing prices");
    }
    if quotes.is_empty() {
        return Err(DataError::MissingData {
            symbol: symbol.to_string(),
            reason: "no complete price rows".to_string(),
        });
    }

    quotes.sort_by_key(|q| q.date);
    if let Some(pair) = quotes.windows(2).find(|p| p[0].date == p[1].date) {
        return Err(DataError::Parse(format!("duplicate date {}", pair[0].date)));
    }

    if options.adjust_prices {
        adjust(&mut quotes, symbol)?;
    }

    debug!(symbol, rows = quotes.len(), "loaded prices");

    let column = |f: fn(&Quote) -> f64| quotes.iter().map(f).collect::<Array1<f64>>();
    let series = PriceSeries::new(
        symbol,
        column(|q| q.open),
        column(|q| q.high),
        column(|q| q.low),
        column(|q| q.close),
    )?;
    Ok(series.with_dates(quotes.iter().map(|q| q.date).collect())?)
}

fn adjust(quotes: &mut [Quote], symbol: &str) -> Result<()> {
    for q in quotes.iter_mut() {
        let adj_close = q.adj_close.ok_or_else(|| DataError::MissingData {
            symbol: symbol.to_string(),
            reason: format!("no Adj Close on {}", q.date),
        })?;
        let ratio = adj_close / q.close;
        q.open *= ratio;
        q.high *= ratio;
        q.low *= ratio;
        q.close = adj_close;
    }
    Ok(())
}
