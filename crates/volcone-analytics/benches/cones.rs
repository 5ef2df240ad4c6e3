use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use volcone_analytics::{QuantileBand, compute_cone};
use volcone_models::{Estimator, EstimatorConfig, synthetic};

fn estimator_benchmarks(c: &mut Criterion) {
    let prices = synthetic::oscillating("BENCH", 2520, 100.0).expect("synthetic series");
    let config = EstimatorConfig::new(60);
    let mut group = c.benchmark_group("estimators");
    group.throughput(Throughput::Elements(prices.len() as u64));

    for estimator in Estimator::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(estimator),
            &estimator,
            |b, estimator| b.iter(|| black_box(estimator.compute(&prices, &config))),
        );
    }
    group.finish();
}

fn cone_benchmarks(c: &mut Criterion) {
    let prices = synthetic::oscillating("BENCH", 2520, 100.0).expect("synthetic series");
    let windows = [20, 30, 60, 90, 120, 180, 250];
    let band = QuantileBand::default();
    let config = EstimatorConfig::default();

    c.bench_function("cone_yang_zhang", |b| {
        b.iter(|| {
            black_box(compute_cone(
                &prices,
                Estimator::YangZhang,
                &windows,
                band,
                &config,
            ))
        })
    });
}

criterion_group!(benches, estimator_benchmarks, cone_benchmarks);
criterion_main!(benches);
