//! Benchmarks for CPU-side field generation and per-frame motion updates.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gesture_galaxy::{FieldGenerator, GalaxyParams, Gesture, GestureSession, MotionConfig, MotionController};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let generator = FieldGenerator::new(GalaxyParams::default());

    for count in [10_000u32, 85_000, 250_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| black_box(generator.generate_with_rng(count, &mut rng).unwrap()))
        });
    }

    group.finish();
}

fn bench_vertices(c: &mut Criterion) {
    let field = FieldGenerator::new(GalaxyParams::default())
        .generate_with_rng(85_000, &mut SmallRng::seed_from_u64(0))
        .unwrap();
    c.bench_function("to_vertices_85k", |b| b.iter(|| black_box(field.to_vertices())));
}

fn bench_frame(c: &mut Criterion) {
    c.bench_function("gesture_and_advance", |b| {
        let mut motion = MotionController::new(MotionConfig::default()).unwrap();
        let mut session = GestureSession::new(Duration::from_secs(2)).unwrap();
        let now = Instant::now();
        b.iter(|| {
            session.apply(Gesture::MoveLeft, &mut motion, now);
            session.tick(&mut motion, now);
            motion.advance(1.0 / 60.0);
            black_box(motion.transform())
        })
    });
}

criterion_group!(benches, bench_generate, bench_vertices, bench_frame);
criterion_main!(benches);
