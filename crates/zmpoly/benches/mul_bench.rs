//! Benchmarks for polynomial multiplication and exact division.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use zmpoly::prelude::*;

/// `(1 + x + y + z + t)^n`, the classic dense-ish Fateman operand.
fn fateman(ctx: PolyContext, n: u32) -> Polynomial {
    let engine = Engine::new();
    let mut base = Polynomial::one(ctx);
    for k in 0..ctx.nvars() {
        base = base.add(&Polynomial::var(ctx, k)).unwrap();
    }
    let mut p = Polynomial::one(ctx);
    for _ in 0..n {
        engine.mul_assign(&mut p, &base).unwrap();
    }
    p
}

/// Random sparse polynomial with `terms` terms of degree below `max_exp`
/// in each variable.
fn random_sparse(ctx: PolyContext, terms: usize, max_exp: u64, rng: &mut ChaCha8Rng) -> Polynomial {
    let terms: Vec<(i64, Vec<u64>)> = (0..terms)
        .map(|_| {
            let exps = (0..ctx.nvars()).map(|_| rng.gen_range(0..max_exp)).collect();
            (rng.gen_range(-1000..=1000), exps)
        })
        .collect();
    Polynomial::from_terms(ctx, terms).unwrap()
}

fn bench_fateman(c: &mut Criterion) {
    let mut group = c.benchmark_group("fateman_mul");
    group.sample_size(10);

    let ctx = PolyContext::new(4, MonomialOrder::Grevlex);
    let pool = WorkerPool::with_available_parallelism().unwrap();
    let heap = Engine::with_config(EngineConfig::heap_only());
    let array = Engine::new();
    let threaded = Engine::with_config(EngineConfig::heap_only()).with_pool(&pool);

    for n in [8, 12, 16] {
        let f = fateman(ctx, n);
        let g = f.add(&Polynomial::one(ctx)).unwrap();

        group.bench_with_input(BenchmarkId::new("heap", n), &n, |b, _| {
            b.iter(|| black_box(heap.mul(&f, &g).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("array", n), &n, |b, _| {
            b.iter(|| black_box(array.mul(&f, &g).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("threaded_heap", n), &n, |b, _| {
            b.iter(|| black_box(threaded.mul(&f, &g).unwrap()));
        });
    }

    group.finish();
}

fn bench_sparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_mul");

    let ctx = PolyContext::new(5, MonomialOrder::Lex);
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let engine = Engine::new();

    for terms in [100, 1000, 4000] {
        let f = random_sparse(ctx, terms, 1000, &mut rng);
        let g = random_sparse(ctx, terms, 1000, &mut rng);

        group.bench_with_input(BenchmarkId::new("heap", terms), &terms, |b, _| {
            b.iter(|| black_box(engine.mul(&f, &g).unwrap()));
        });
    }

    group.finish();
}

fn bench_univariate(c: &mut Criterion) {
    let mut group = c.benchmark_group("univariate_mul");

    let ctx = PolyContext::new(1, MonomialOrder::Lex);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let dense = Engine::new();
    let heap = Engine::with_config(EngineConfig::heap_only());

    for degree in [64, 512, 2048] {
        let f = random_sparse(ctx, degree, degree as u64, &mut rng);
        let g = random_sparse(ctx, degree, degree as u64, &mut rng);

        group.bench_with_input(BenchmarkId::new("dense", degree), &degree, |b, _| {
            b.iter(|| black_box(dense.mul(&f, &g).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("heap", degree), &degree, |b, _| {
            b.iter(|| black_box(heap.mul(&f, &g).unwrap()));
        });
    }

    group.finish();
}

fn bench_divides(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_division");
    group.sample_size(10);

    let ctx = PolyContext::new(4, MonomialOrder::Grevlex);
    let engine = Engine::new();

    for n in [8, 12] {
        let f = fateman(ctx, n);
        let g = f.add(&Polynomial::one(ctx)).unwrap();
        let product = engine.mul(&f, &g).unwrap();

        group.bench_with_input(BenchmarkId::new("heap", n), &n, |b, _| {
            b.iter(|| black_box(engine.divides(&product, &f).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fateman, bench_sparse, bench_univariate, bench_divides);

criterion_main!(benches);
