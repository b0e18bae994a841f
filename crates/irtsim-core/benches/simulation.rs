use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use irtsim_core::adaptive::{run_adaptive_test, select_max_information, NoopReporter};
use irtsim_core::generator::{generate, GeneratorConfig};
use irtsim_core::model::{ItemPool, ModelKind};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for model in [ModelKind::OnePL, ModelKind::ThreePL] {
        let config = GeneratorConfig {
            n_students: 500,
            n_items: 20,
            model,
            seed: 42,
        };
        group.bench_function(format!("500x20_{model}"), |b| {
            b.iter(|| generate(black_box(&config)))
        });
    }

    group.finish();
}

fn bench_adaptive(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive");

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let small = ItemPool::demonstration(20, &mut rng).unwrap();
    let large = ItemPool::demonstration(500, &mut rng).unwrap();

    group.bench_function("select_from_500", |b| {
        b.iter(|| select_max_information(black_box(0.3), large.items()))
    });

    group.bench_function("session_10_of_20", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            run_adaptive_test(black_box(&small), 1.2, 10, &mut rng, &NoopReporter)
        })
    });

    group.bench_function("session_50_of_500", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            run_adaptive_test(black_box(&large), 1.2, 50, &mut rng, &NoopReporter)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_generate, bench_adaptive);
criterion_main!(benches);
