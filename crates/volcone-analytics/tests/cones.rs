//! Cone invariants on random and synthetic price series.

use rand::{Rng, SeedableRng, rngs::StdRng};
use rstest::rstest;
use volcone_analytics::{AnalyticsError, QuantileBand, VolatilityAnalyzer, compute_cone, cone_slice};
use volcone_models::{Estimator, EstimatorConfig, Ohlc, PriceSeries, synthetic};

fn random_walk(len: usize, seed: u64) -> PriceSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut close = 100.0_f64;
    let bars: Vec<Ohlc> = (0..len)
        .map(|_| {
            let open = close * rng.gen_range(-0.004..0.004_f64).exp();
            close = open * rng.gen_range(-0.025..0.025_f64).exp();
            let high = open.max(close) * rng.gen_range(0.0..0.012_f64).exp();
            let low = open.min(close) * (-rng.gen_range(0.0..0.012_f64)).exp();
            Ohlc::new(open, high, low, close)
        })
        .collect();
    PriceSeries::from_bars("RW", &bars).unwrap()
}

#[rstest]
#[case(Estimator::Raw)]
#[case(Estimator::Parkinson)]
#[case(Estimator::GarmanKlass)]
#[case(Estimator::RogersSatchell)]
#[case(Estimator::YangZhang)]
#[case(Estimator::HodgesTompkins)]
fn cone_lines_are_ordered(#[case] estimator: Estimator) {
    let prices = random_walk(600, 17);
    let cone = compute_cone(
        &prices,
        estimator,
        &[20, 40, 60, 120],
        QuantileBand::new(0.1, 0.9).unwrap(),
        &EstimatorConfig::default(),
    )
    .unwrap();

    for slice in cone.slices() {
        assert!(slice.max >= slice.upper, "{estimator} window {}", slice.window);
        assert!(slice.upper >= slice.median);
        assert!(slice.median >= slice.lower);
        assert!(slice.lower >= slice.min);
        assert!((slice.min..=slice.max).contains(&slice.realized));
    }
}

#[test]
fn parallel_cone_matches_sequential() {
    let prices = random_walk(500, 23);
    let windows = [10, 30, 45, 90, 120];
    let band = QuantileBand::default();
    let config = EstimatorConfig::default();

    let cone = compute_cone(&prices, Estimator::GarmanKlass, &windows, band, &config).unwrap();

    for (slice, &window) in cone.slices().iter().zip(&windows) {
        let series = Estimator::GarmanKlass
            .compute(&prices, &config.with_window(window))
            .unwrap();
        let expected = cone_slice(&series, window, band).unwrap();
        assert_eq!(slice, &expected);
    }
}

#[test]
fn cone_window_too_long_for_adjustment() {
    let prices = synthetic::oscillating("SYN", 200, 100.0).unwrap();
    let result = compute_cone(
        &prices,
        Estimator::Raw,
        &[30, 100],
        QuantileBand::default(),
        &EstimatorConfig::default(),
    );
    assert!(result.unwrap_err().is_invalid_parameter());

    let unadjusted = EstimatorConfig::default().with_overlapping_adjustment(false);
    let cone = compute_cone(
        &prices,
        Estimator::Raw,
        &[30, 100],
        QuantileBand::default(),
        &unadjusted,
    )
    .unwrap();
    assert_eq!(cone.slices().len(), 2);
}

#[test]
fn moments_cone_is_not_annualized() {
    let prices = random_walk(400, 5);
    let cone = compute_cone(
        &prices,
        Estimator::Skew,
        &[30, 60],
        QuantileBand::default(),
        &EstimatorConfig::default(),
    )
    .unwrap();
    assert!(!cone.estimator().is_annualized());
    // skewness of a symmetric walk stays well inside a few units
    for slice in cone.slices() {
        assert!(slice.max < 5.0 && slice.min > -5.0);
    }
}

#[test]
fn analyzer_rejects_bad_quantiles() {
    let err = QuantileBand::new(0.3, 0.6).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidQuantiles { .. }));

    let analyzer = VolatilityAnalyzer::new(random_walk(300, 1), Estimator::Raw);
    assert!(analyzer.cones(&[30], QuantileBand::default()).is_err());
}
