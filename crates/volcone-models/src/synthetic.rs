//! Deterministic synthetic price series
//!
//! Closed-form generators for demos, benchmarks and tests. Nothing here is
//! random, so every series is reproducible across runs and platforms.

use crate::{
    error::Result,
    series::{Ohlc, PriceSeries},
};

/// Close-to-close log return of [`oscillating`] at period `t` (for `t >= 1`)
pub fn oscillating_return(t: usize) -> f64 {
    let t = t as f64;
    0.012 * (0.9 * t).sin() + 0.007 * (2.3 * t).cos() + 0.0004
}

/// Series where every price of every period equals `price`
pub fn flat(symbol: &str, len: usize, price: f64) -> Result<PriceSeries> {
    PriceSeries::from_bars(symbol, &vec![Ohlc::flat(price); len])
}

/// Series with `close[t] = start * growth^t` and open = high = low = close
pub fn constant_growth(symbol: &str, len: usize, start: f64, growth: f64) -> Result<PriceSeries> {
    let bars: Vec<Ohlc> = (0..len)
        .map(|t| Ohlc::flat(start * growth.powi(t as i32)))
        .collect();
    PriceSeries::from_bars(symbol, &bars)
}

/// Series with oscillating log returns and consistent OHLC ranges
///
/// Close follows [`oscillating_return`]; the open gaps away from the prior
/// close, and high/low bracket both open and close.
pub fn oscillating(symbol: &str, len: usize, start: f64) -> Result<PriceSeries> {
    let mut bars = Vec::with_capacity(len);
    let mut prior_close = start;

    for t in 0..len {
        let (open, close) = if t == 0 {
            (start, start)
        } else {
            let r = oscillating_return(t);
            let gap = 0.3 * r + 0.002 * (1.7 * t as f64).sin();
            (prior_close * gap.exp(), prior_close * r.exp())
        };

        let phase = 0.5 * t as f64;
        let high = open.max(close) * (0.004 + 0.003 * phase.sin().abs()).exp();
        let low = open.min(close) * (-(0.004 + 0.003 * phase.cos().abs())).exp();

        bars.push(Ohlc::new(open, high, low, close));
        prior_close = close;
    }

    PriceSeries::from_bars(symbol, &bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_oscillating_returns_match_closed_form() {
        let prices = oscillating("SYN", 50, 100.0).unwrap();
        let close = prices.close();
        for t in 1..50 {
            assert_abs_diff_eq!(
                (close[t] / close[t - 1]).ln(),
                oscillating_return(t),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_oscillating_ranges_are_sane() {
        let prices = oscillating("SYN", 200, 50.0).unwrap();
        for t in 0..prices.len() {
            let bar = prices.bar(t).unwrap();
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
            assert!(bar.low > 0.0);
        }
    }

    #[test]
    fn test_constant_growth() {
        let prices = constant_growth("SYN", 5, 10.0, 1.01).unwrap();
        assert_abs_diff_eq!(prices.close()[4], 10.0 * 1.01_f64.powi(4), epsilon = 1e-12);
        assert_eq!(prices.open(), prices.close());
    }
}
