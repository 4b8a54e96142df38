use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use knn_sweep::{Experiment, ExperimentConfig, NeighborStrategy};
use std::time::Duration;

fn bench_config(train_count: usize, strategy: NeighborStrategy) -> ExperimentConfig {
    ExperimentConfig::default()
        .with_train_count(train_count)
        .with_test_count(500)
        .with_k_max(200)
        .with_seed(7)
        .with_strategy(strategy)
}

fn benchmark_cached_vs_rebuilt_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_sweep");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    let ks: Vec<usize> = (10..=200).step_by(10).collect();
    for train_count in [1000, 4000].iter() {
        let experiment = Experiment::new(bench_config(*train_count, NeighborStrategy::FullSort))
            .expect("benchmark config is valid");

        group.bench_with_input(BenchmarkId::new("cached_table", train_count), train_count, |b, _| {
            b.iter(|| black_box(experiment.sweep(ks.iter().copied()).expect("ks within k_max")))
        });

        group.bench_with_input(BenchmarkId::new("rebuilt_per_k", train_count), train_count, |b, _| {
            b.iter(|| black_box(experiment.reference_sweep(ks.iter().copied()).expect("ks within k_max")))
        });
    }
    group.finish();
}

fn benchmark_table_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_table");
    group.sample_size(10);

    for strategy in [NeighborStrategy::FullSort, NeighborStrategy::BoundedHeap] {
        group.bench_function(format!("{:?}", strategy), |b| {
            b.iter(|| black_box(Experiment::new(bench_config(2000, strategy)).expect("benchmark config is valid")))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_cached_vs_rebuilt_sweep, benchmark_table_strategies);
criterion_main!(benches);
