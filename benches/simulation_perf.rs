
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand_distr::{LogNormal, Poisson};

use hurricane_loss::registry::catalog;
use hurricane_loss::strategy::Workers;
use hurricane_loss::variates::VariateSource;

use fixtures::{ACTIVE, CANONICAL, request};

// ── Group 1: strategies — every registered strategy, sample-count scaling ───

fn bench_strategies(c: &mut Criterion) {
    let workers = Workers::global();
    let mut group = c.benchmark_group("strategies");
    for &years in &[1_000usize, 20_000, 100_000] {
        if years >= 100_000 {
            group.sample_size(10);
        }
        group.throughput(Throughput::Elements(years as u64));
        let req = request(&CANONICAL, years, 123_456_789);
        for d in catalog() {
            group.bench_with_input(BenchmarkId::new(d.strategy.name(), years), &req, |b, req| {
                b.iter(|| {
                    let mut source = VariateSource::new(req.rng_seed);
                    d.strategy.execute(req, &mut source, &workers).expect("valid request")
                })
            });
        }
    }
    group.finish();
}

// ── Group 2: active_season — higher landfall rates, fixed sample count ──────

fn bench_active_season(c: &mut Criterion) {
    let workers = Workers::global();
    let req = request(&ACTIVE, 20_000, 42);
    let mut group = c.benchmark_group("active_season");
    for d in catalog() {
        group.bench_function(BenchmarkId::from_parameter(d.strategy.name()), |b| {
            b.iter(|| {
                let mut source = VariateSource::new(req.rng_seed);
                d.strategy.execute(&req, &mut source, &workers).expect("valid request")
            })
        });
    }
    group.finish();
}

// ── Group 3: parallel_scaling — worker count for the parallel strategies ────

fn bench_parallel_scaling(c: &mut Criterion) {
    let req = request(&CANONICAL, 100_000, 7);
    let mut group = c.benchmark_group("parallel_scaling");
    group.sample_size(10);
    for &threads in &[1usize, 2, 4, 8] {
        let workers = Workers::capped(threads).expect("thread pool");
        for d in catalog().iter().filter(|d| d.strategy.is_parallel()) {
            group.bench_with_input(BenchmarkId::new(d.strategy.name(), threads), &threads, |b, _| {
                b.iter(|| {
                    let mut source = VariateSource::new(req.rng_seed);
                    d.strategy.execute(&req, &mut source, &workers).expect("valid request")
                })
            });
        }
    }
    group.finish();
}

// ── Group 4: variates — raw draw cost in isolation ──────────────────────────

fn bench_variates(c: &mut Criterion) {
    let mut group = c.benchmark_group("variates");
    let n = 100_000usize;
    group.throughput(Throughput::Elements(n as u64));

    let poisson = Poisson::new(10.0).expect("valid lambda");
    group.bench_function("poisson_batch", |b| {
        let mut source = VariateSource::seeded(1);
        b.iter(|| source.draw_event_counts(&poisson, n))
    });

    let lognormal = LogNormal::new(2.0_f64.ln(), 0.6).expect("valid params");
    group.bench_function("lognormal_fill", |b| {
        let mut source = VariateSource::seeded(1);
        let mut buf = vec![0.0; n];
        b.iter(|| {
            source.fill_severities(&lognormal, &mut buf);
            std::hint::black_box(buf.iter().sum::<f64>())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_strategies,
    bench_active_season,
    bench_parallel_scaling,
    bench_variates,
);
criterion_main!(benches);
