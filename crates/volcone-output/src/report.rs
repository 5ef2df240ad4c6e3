//! Plain-text term sheet.

use std::fmt;
use volcone_analytics::TermSheet;
use volcone_models::VolatilitySeries;

const WIDTH: usize = 80;

/// Format an estimator value: percent for annualized volatility, plain
/// otherwise, `-` when undefined.
pub fn format_value(value: f64, annualized: bool) -> String {
    if value.is_nan() {
        "-".to_string()
    } else if annualized {
        format!("{:.2}%", value * 100.0)
    } else {
        format!("{value:.4}")
    }
}

/// Text rendering of a [`TermSheet`].
#[derive(Debug, Clone, Copy)]
pub struct TermSheetReport<'a> {
    sheet: &'a TermSheet,
}

impl<'a> TermSheetReport<'a> {
    /// Wrap a term sheet for rendering.
    pub const fn new(sheet: &'a TermSheet) -> Self {
        Self { sheet }
    }

    /// Render to a string.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    fn fmt_value(&self, value: f64) -> String {
        format_value(value, self.sheet.estimator.is_annualized())
    }

    fn latest(&self, series: &VolatilitySeries) -> String {
        self.fmt_value(series.last_defined().unwrap_or(f64::NAN))
    }

    fn write_cone(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cone = &self.sheet.cone;
        let (lower, upper) = cone.band().labels();
        writeln!(f, "Volatility Cone")?;
        writeln!(
            f,
            "{:<8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8}",
            "Window", "Max", upper, "Median", lower, "Min", "Realized", "Rank"
        )?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        for slice in cone.slices() {
            writeln!(
                f,
                "{:<8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8}",
                slice.window,
                self.fmt_value(slice.max),
                self.fmt_value(slice.upper),
                self.fmt_value(slice.median),
                self.fmt_value(slice.lower),
                self.fmt_value(slice.min),
                self.fmt_value(slice.realized),
                format_value(slice.realized_rank(), false),
            )?;
        }
        Ok(())
    }

    fn write_rolling(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sheet = self.sheet;
        let (lower, upper) = sheet.quantiles.band.labels();
        let rows = [
            ("Realized".to_string(), self.latest(&sheet.series)),
            (format!("{upper} Prctl"), self.latest(&sheet.quantiles.upper)),
            ("Median".to_string(), self.latest(&sheet.quantiles.median)),
            (format!("{lower} Prctl"), self.latest(&sheet.quantiles.lower)),
            ("Max".to_string(), self.latest(&sheet.extremes.max)),
            ("Min".to_string(), self.latest(&sheet.extremes.min)),
            ("Mean".to_string(), self.latest(&sheet.descriptives.mean)),
            ("Std. Dev.".to_string(), self.latest(&sheet.descriptives.std)),
            (
                "Z-Score".to_string(),
                format_value(sheet.descriptives.last_z_score().unwrap_or(f64::NAN), false),
            ),
        ];

        writeln!(f, "Rolling Statistics (window {}, latest)", sheet.config.window)?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        for (label, value) in rows {
            writeln!(f, "{label:<20} {value:>12}")?;
        }
        Ok(())
    }

    fn write_histogram(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.sheet.histogram;
        writeln!(f, "Distribution ({} bins, {} values)", h.bins(), h.total())?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        writeln!(f, "{:<20} {:>12}", "Mean", self.fmt_value(h.mean))?;
        writeln!(f, "{:<20} {:>12}", "Std. Dev.", self.fmt_value(h.std))?;
        writeln!(f, "{:<20} {:>12}", "Last", self.fmt_value(h.last))?;
        if let Some(bin) = h.bin_of(h.last) {
            let below: usize = h.counts[..bin].iter().sum();
            writeln!(
                f,
                "{:<20} {:>11.1}%",
                "Last Percentile",
                below as f64 / h.total() as f64 * 100.0
            )?;
        }
        Ok(())
    }

    fn write_benchmark(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(bench) = &self.sheet.benchmark else {
            return Ok(());
        };
        let reg = &bench.regression;
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(f, "Benchmark: {} v. {}", self.sheet.symbol, bench.symbol)?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        writeln!(f, "{:<20} {:>12}", self.sheet.symbol, self.latest(&bench.subject))?;
        writeln!(f, "{:<20} {:>12}", bench.symbol, self.latest(&bench.benchmark))?;
        writeln!(
            f,
            "{:<20} {:>12}",
            "Ratio",
            format_value(bench.ratio.last().unwrap_or(f64::NAN), false)
        )?;
        writeln!(
            f,
            "{:<20} {:>12}",
            "Correlation",
            format_value(bench.correlation.last().unwrap_or(f64::NAN), false)
        )?;
        writeln!(f)?;
        writeln!(f, "OLS (no intercept), {} observations", reg.n)?;
        writeln!(
            f,
            "{:<12} {:>12} {:>12} {:>12}",
            "", "coef", "std err", "t"
        )?;
        writeln!(
            f,
            "{:<12} {:>12.4} {:>12.4} {:>12.3}",
            bench.symbol, reg.beta, reg.std_err, reg.t_stat
        )?;
        writeln!(f, "R-squared (uncentered): {:.4}", reg.r_squared)?;
        Ok(())
    }
}

impl fmt::Display for TermSheetReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sheet = self.sheet;
        writeln!(f, "{} Term Sheet: {}", sheet.estimator, sheet.symbol)?;
        if let Some((start, end)) = sheet.period {
            writeln!(f, "Period: daily {start} to {end}")?;
        }
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        self.write_cone(f)?;
        writeln!(f)?;
        self.write_rolling(f)?;
        writeln!(f)?;
        self.write_histogram(f)?;
        self.write_benchmark(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.1234, true, "12.34%")]
    #[case(0.1234, false, "0.1234")]
    #[case(-1.5, false, "-1.5000")]
    #[case(f64::NAN, true, "-")]
    fn test_format_value(#[case] value: f64, #[case] annualized: bool, #[case] expected: &str) {
        assert_eq!(format_value(value, annualized), expected);
    }
}
