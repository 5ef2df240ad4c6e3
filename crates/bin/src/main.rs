//! volcone CLI binary.
//!
//! Loads daily OHLC prices from CSV and prints estimator series, volatility
//! cones and term sheets.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::{path::PathBuf, process};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use volcone_analytics::{QuantileBand, TermSheetConfig, VolatilityAnalyzer, VolatilityCone};
use volcone_data::{LoadOptions, load_csv};
use volcone_models::{
    CloseReference, Estimator, EstimatorConfig, EstimatorInfo, PriceSeries, available_estimators,
    estimators_using_only,
    config::{DEFAULT_TRADING_PERIODS, DEFAULT_WINDOW},
    series::UNNAMED_SYMBOL,
};
use volcone_output::{ExportFormat, Exporter, SeriesExport, TermSheetReport, format_value};

#[derive(Parser)]
#[command(name = "volcone")]
#[command(about = "volcone: historical volatility estimators and volatility cones", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PriceArgs {
    /// CSV file with Date, Open, High, Low, Close and optional Adj Close columns
    path: PathBuf,

    /// Symbol label (default: file name)
    #[arg(long)]
    symbol: Option<String>,

    /// Rescale prices by Adj Close / Close
    #[arg(long)]
    adjust_prices: bool,

    /// First date to load (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last date to load (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl PriceArgs {
    fn options(&self) -> LoadOptions {
        LoadOptions {
            adjust_prices: self.adjust_prices,
            start: self.start,
            end: self.end,
        }
    }

    fn load(&self) -> Result<PriceSeries, Box<dyn std::error::Error>> {
        let symbol = self.symbol.clone().unwrap_or_else(|| symbol_from_path(&self.path));
        Ok(load_csv(&self.path, &symbol, self.options())?)
    }
}

#[derive(Args)]
struct EstimatorArgs {
    /// Estimator name (see `volcone estimators`)
    #[arg(short, long, default_value = "YangZhang")]
    estimator: Estimator,

    /// Trading periods per year
    #[arg(long, default_value_t = DEFAULT_TRADING_PERIODS)]
    trading_periods: usize,

    /// Skip the overlapping-sample adjustment
    #[arg(long)]
    no_adjustment: bool,

    /// Measure close cross terms against the prior close instead of the open
    #[arg(long)]
    prior_close: bool,
}

impl EstimatorArgs {
    fn config(&self, window: usize) -> EstimatorConfig {
        let close_reference = if self.prior_close {
            CloseReference::PriorClose
        } else {
            CloseReference::Open
        };
        EstimatorConfig::new(window)
            .with_trading_periods(self.trading_periods)
            .with_overlapping_adjustment(!self.no_adjustment)
            .with_close_reference(close_reference)
    }
}

#[derive(Args)]
struct ConeArgs {
    /// Cone windows, comma separated
    #[arg(long, value_delimiter = ',', default_value = "30,60,90,120")]
    windows: Vec<usize>,

    /// Lower quantile of the cone band
    #[arg(long, default_value_t = 0.25)]
    lower: f64,

    /// Upper quantile of the cone band
    #[arg(long, default_value_t = 0.75)]
    upper: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// List available estimators
    Estimators {
        /// Only estimators computable from these fields (e.g. `close`)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Compute one estimator series
    Series {
        #[command(flatten)]
        prices: PriceArgs,

        #[command(flatten)]
        estimator: EstimatorArgs,

        /// Rolling window
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Keep leading undefined values
        #[arg(long)]
        no_clean: bool,

        /// Output format (csv, json or pretty)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Volatility cone across several windows
    Cones {
        #[command(flatten)]
        prices: PriceArgs,

        #[command(flatten)]
        estimator: EstimatorArgs,

        #[command(flatten)]
        cone: ConeArgs,

        /// Export format (csv, json or pretty); prints a table when omitted
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Text term sheet with cones, rolling statistics and benchmark comparison
    TermSheet {
        #[command(flatten)]
        prices: PriceArgs,

        #[command(flatten)]
        estimator: EstimatorArgs,

        #[command(flatten)]
        cone: ConeArgs,

        /// Window of the rolling statistics
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Histogram bins
        #[arg(long, default_value_t = 100)]
        bins: usize,

        /// Benchmark CSV file with the same rows as the subject
        #[arg(long)]
        bench: Option<PathBuf>,

        /// Benchmark symbol label (default: file name)
        #[arg(long)]
        bench_symbol: Option<String>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Estimators { fields } => list_estimators(&fields),
        Commands::Series {
            prices,
            estimator,
            window,
            no_clean,
            format,
            output,
        } => {
            let data = prices.load()?;
            let config = estimator.config(window).with_clean(!no_clean);
            let warmup = estimator.estimator.warmup(&config);
            if data.len() <= warmup {
                warn!(
                    rows = data.len(),
                    warmup,
                    estimator = estimator.estimator.name(),
                    "series too short for any defined value"
                );
            }
            let series = estimator.estimator.compute(&data, &config)?;
            let export = SeriesExport::new(&data, estimator.estimator, window, &series);
            emit(&export, format, output)?;
        }
        Commands::Cones {
            prices,
            estimator,
            cone,
            format,
            output,
        } => {
            let analyzer = VolatilityAnalyzer::new(prices.load()?, estimator.estimator)
                .with_config(estimator.config(DEFAULT_WINDOW));
            let band = QuantileBand::new(cone.lower, cone.upper)?;
            let result = analyzer.cones(&cone.windows, band)?;
            match format {
                Some(format) => emit(&result, format, output)?,
                None => print_cone(&result),
            }
        }
        Commands::TermSheet {
            prices,
            estimator,
            cone,
            window,
            bins,
            bench,
            bench_symbol,
        } => {
            let mut analyzer = VolatilityAnalyzer::new(prices.load()?, estimator.estimator)
                .with_config(estimator.config(window));
            if let Some(path) = bench {
                let symbol = bench_symbol.unwrap_or_else(|| symbol_from_path(&path));
                let benchmark = load_csv(&path, &symbol, prices.options())?;
                analyzer = analyzer.with_benchmark(benchmark)?;
            }
            let config = TermSheetConfig {
                window,
                windows: cone.windows,
                band: QuantileBand::new(cone.lower, cone.upper)?,
                bins,
                normed: true,
            };
            let sheet = analyzer.term_sheet(&config)?;
            print!("{}", TermSheetReport::new(&sheet));
        }
    }

    Ok(())
}

fn symbol_from_path(path: &std::path::Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map_or_else(|| UNNAMED_SYMBOL.to_string(), str::to_uppercase)
}

fn emit<T: Exporter>(
    data: &T,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            data.export_to_file(&path, format)?;
            info!(path = %path.display(), extension = format.extension(), "export written");
        }
        None => print!("{}", data.export_to_string(format)?),
    }
    Ok(())
}

fn select_estimators(fields: &[String]) -> Vec<EstimatorInfo> {
    if fields.is_empty() {
        return available_estimators();
    }
    let fields: Vec<String> = fields.iter().map(|f| f.trim().to_lowercase()).collect();
    let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
    estimators_using_only(&fields)
}

fn list_estimators(fields: &[String]) {
    println!("{:<16} {:<10} {:<28} Description", "Name", "Output", "Fields");
    println!("{}", "-".repeat(100));
    for info in select_estimators(fields) {
        let output = if info.annualized { "vol" } else { "moment" };
        println!(
            "{:<16} {:<10} {:<28} {}",
            info.name,
            output,
            info.required_fields.join(","),
            info.description
        );
    }
}

fn print_cone(cone: &VolatilityCone) {
    let annualized = cone.estimator().is_annualized();
    let (lower, upper) = cone.band().labels();

    println!("\n{} cone: {}", cone.estimator(), cone.symbol());
    println!("{}", "=".repeat(80));
    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8}",
        "Window", "Max", upper, "Median", lower, "Min", "Realized", "Rank"
    );
    println!("{}", "-".repeat(80));
    for slice in cone.slices() {
        println!(
            "{:<8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8}",
            slice.window,
            format_value(slice.max, annualized),
            format_value(slice.upper, annualized),
            format_value(slice.median, annualized),
            format_value(slice.lower, annualized),
            format_value(slice.min, annualized),
            format_value(slice.realized, annualized),
            format_value(slice.realized_rank(), false),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cone_windows_parse() {
        let cli = Cli::try_parse_from([
            "volcone",
            "cones",
            "spy.csv",
            "--windows",
            "20,40",
            "-e",
            "Parkinson",
        ])
        .unwrap();
        let Commands::Cones {
            prices,
            estimator,
            cone,
            format,
            ..
        } = cli.command
        else {
            panic!("expected cones");
        };
        assert_eq!(cone.windows, vec![20, 40]);
        assert_eq!(estimator.estimator, Estimator::Parkinson);
        assert!(format.is_none());
        assert_eq!(symbol_from_path(&prices.path), "SPY");
    }

    #[test]
    fn test_estimators_filtered_by_fields() {
        let cli = Cli::try_parse_from(["volcone", "estimators", "--fields", "Close"]).unwrap();
        let Commands::Estimators { fields } = cli.command else {
            panic!("expected estimators");
        };
        let names: Vec<_> = select_estimators(&fields).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Raw", "HodgesTompkins", "Skew", "Kurtosis"]);
        assert_eq!(select_estimators(&[]).len(), Estimator::ALL.len());
    }

    #[test]
    fn test_unknown_estimator_rejected() {
        assert!(Cli::try_parse_from(["volcone", "series", "spy.csv", "-e", "Nope"]).is_err());
    }
}
