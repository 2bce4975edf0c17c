use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use secchi::config::{Config, Variant};
use secchi::coordinator::Coordinator;

const NUM_THREADS: usize = 8;
const ITERATIONS_PER_THREAD: u64 = 100_000;

fn bench_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_pool");
    group.sample_size(10);

    for (label, variant) in [
        ("single-lock", Variant::SingleLock),
        ("budget", Variant::Budget),
        ("bucketed", Variant::Bucketed),
    ] {
        group.bench_function(
            BenchmarkId::new(
                label,
                format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
            ),
            |b| {
                let config = Config::new(NUM_THREADS, ITERATIONS_PER_THREAD, 10)
                    .unwrap()
                    .with_variant(variant)
                    .with_seed(1);
                b.iter(|| black_box(Coordinator::new(config).run().unwrap()))
            },
        );
    }

    group.finish();
}

fn bench_bucket_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucketed_contention");
    group.sample_size(10);

    for buckets in [1usize, 2, 10, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &buckets, |b, &buckets| {
            let config = Config::new(NUM_THREADS, ITERATIONS_PER_THREAD / 10, buckets)
                .unwrap()
                .with_seed(1);
            b.iter(|| black_box(Coordinator::new(config).run().unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_variants, bench_bucket_count);
criterion_main!(benches);
