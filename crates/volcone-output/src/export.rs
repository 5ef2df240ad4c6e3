//! Export of estimator series and volatility cones.
//!
//! Series export one record per position with its date when the source
//! prices are dated. Undefined values are written as empty CSV fields and
//! JSON `null`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write, path::Path, str::FromStr};
use thiserror::Error;
use volcone_analytics::VolatilityCone;
use volcone_models::{Estimator, PriceSeries, VolatilitySeries};

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty" | "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One estimator value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesRecord {
    /// Position in the source price series.
    pub position: usize,

    /// Date of the position, when the prices are dated.
    pub date: Option<NaiveDate>,

    /// Estimator value, `None` where undefined.
    pub value: Option<f64>,
}

/// An estimator series with its labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesExport {
    /// Symbol of the priced asset.
    pub symbol: String,

    /// Estimator name.
    pub estimator: String,

    /// Rolling window.
    pub window: usize,

    /// Values in chronological order.
    pub records: Vec<SeriesRecord>,
}

impl SeriesExport {
    /// Label `series`, computed from `prices`, for export.
    pub fn new(
        prices: &PriceSeries,
        estimator: Estimator,
        window: usize,
        series: &VolatilitySeries,
    ) -> Self {
        let records = series
            .positions()
            .zip(series.values().iter())
            .map(|(position, &v)| SeriesRecord {
                position,
                date: prices.date_at(position),
                value: (!v.is_nan()).then_some(v),
            })
            .collect();

        Self {
            symbol: prices.symbol().to_string(),
            estimator: estimator.name().to_string(),
            window,
            records,
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

fn to_json<T: Serialize>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    Ok(match format {
        ExportFormat::PrettyJson => serde_json::to_string_pretty(value)?,
        _ => serde_json::to_string(value)?,
    })
}

impl Exporter for SeriesExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in &self.records {
                    wtr.serialize(record)?;
                }
                into_string(wtr)
            }
            ExportFormat::Json | ExportFormat::PrettyJson => to_json(self, format),
        }
    }
}

impl Exporter for VolatilityCone {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for slice in self.slices() {
                    wtr.serialize(slice)?;
                }
                into_string(wtr)
            }
            ExportFormat::Json | ExportFormat::PrettyJson => to_json(self, format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use volcone_models::{EstimatorConfig, synthetic};

    fn dated_series() -> (PriceSeries, VolatilitySeries) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let prices = synthetic::oscillating("SYN", 40, 100.0).unwrap();
        let dates = (0..40).map(|i| start + chrono::Days::new(i)).collect();
        let prices = prices.with_dates(dates).unwrap();
        let series = Estimator::Raw
            .compute(&prices, &EstimatorConfig::new(10).with_clean(false))
            .unwrap();
        (prices, series)
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty", ExportFormat::PrettyJson)]
    fn test_parse_format(#[case] name: &str, #[case] expected: ExportFormat) {
        assert_eq!(name.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_series_records() {
        let (prices, series) = dated_series();
        let export = SeriesExport::new(&prices, Estimator::Raw, 10, &series);
        assert_eq!(export.records.len(), 40);
        assert_eq!(export.records[0].value, None);
        assert!(export.records[10].value.is_some());
        assert_eq!(
            export.records[10].date,
            NaiveDate::from_ymd_opt(2024, 1, 11)
        );
    }

    #[test]
    fn test_series_csv() {
        let (prices, series) = dated_series();
        let csv = SeriesExport::new(&prices, Estimator::Raw, 10, &series)
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("position,date,value"));
        assert_eq!(lines.next(), Some("0,2024-01-01,"));
        assert_eq!(csv.lines().count(), 41);
    }

    #[test]
    fn test_series_json_uses_null() {
        let (prices, series) = dated_series();
        let json = SeriesExport::new(&prices, Estimator::Raw, 10, &series)
            .export_to_string(ExportFormat::Json)
            .unwrap();
        assert!(json.contains("\"estimator\":\"Raw\""));
        assert!(json.contains("\"value\":null"));
        assert!(!json.contains("NaN"));
    }
}
