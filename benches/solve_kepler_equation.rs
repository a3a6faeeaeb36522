use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use keplot::kepler::{solve_kepler_equation, KeplerParams};
use keplot::pipeline::{OrbitConfig, OrbitPipeline};

/// Uniform random in [0, 2π)
#[inline]
fn rand_angle(rng: &mut StdRng) -> f64 {
    rng.random::<f64>() * std::f64::consts::TAU
}

fn params() -> KeplerParams {
    KeplerParams::builder().tolerance(1e-12).build().unwrap()
}

/// Pre-generated (M, e) pairs so the RNG stays out of the timed section.
fn cases(rng: &mut StdRng, samples: usize, e_range: std::ops::Range<f64>) -> Vec<(f64, f64)> {
    (0..samples)
        .map(|_| (rand_angle(rng), rng.random_range(e_range.clone())))
        .collect()
}

/// Typical regime: e ∈ [0.0, 0.7)
fn bench_typical(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let p = params();

    c.bench_function("solve_kepler_equation/typical_e<0.7", |b| {
        b.iter_batched(
            || cases(&mut rng, 10_000, 0.0..0.7),
            |cases| {
                for (m, e) in cases {
                    let sol = solve_kepler_equation(black_box(m), black_box(e), &p).unwrap();
                    black_box(sol);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// High-eccentricity (still elliptic): e ∈ [0.7, 0.9)
fn bench_high_e(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);
    let p = params();

    c.bench_function("solve_kepler_equation/high_e_0.7..0.9", |b| {
        b.iter_batched(
            || cases(&mut rng, 10_000, 0.7..0.9),
            |cases| {
                for (m, e) in cases {
                    let _ = black_box(solve_kepler_equation(black_box(m), black_box(e), &p));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Full default pipeline: 1000 samples at e = 0.5, without figures.
fn bench_pipeline(c: &mut Criterion) {
    let pipeline = OrbitPipeline::new(OrbitConfig::default());

    c.bench_function("orbit_pipeline/default_1000_samples", |b| {
        b.iter(|| {
            let track = pipeline.run().unwrap();
            black_box(track);
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_typical, bench_high_e, bench_pipeline
);
criterion_main!(benches);
