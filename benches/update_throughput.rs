//! Benchmarks for burst generation and the per-tick update.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use pyro::prelude::*;

const STEP: f32 = 1.0 / 60.0;

fn bench_emitters(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    let config = FireworkConfig::default();
    let burst = Burst::new(Vec3::new(0.0, 8.0, 0.0), Vec4::ONE, 150, 3.0);

    for emitter in [
        Emitter::Sphere,
        Emitter::Ring,
        Emitter::MultiLayer,
        Emitter::Spiral,
        Emitter::Heart,
        Emitter::DoubleExplosion,
    ] {
        group.bench_function(format!("{:?}", emitter.shape()), |b| {
            let mut ctx = SpawnContext::seeded(1);
            let mut out = Vec::with_capacity(150);
            b.iter(|| {
                out.clear();
                black_box(emitter.emit(&mut ctx, &config, &burst, &mut out));
            })
        });
    }

    group.finish();
}

/// System with `shells` shells that have all burst and are mid-flight.
fn busy_system(shells: usize) -> FireworkSystem {
    let mut config = FireworkConfig::default();
    config.launch.scatter_default_pad = true;
    let mut sim = FireworkSystem::new(config).with_rng(SpawnContext::seeded(7));
    for i in 0..shells {
        let shape = ShapeKind::ALL[i % 6];
        sim.launch(
            LaunchParams::new(Vec3::new(0.0, 0.5, 0.0), shape)
                .with_life(0.2)
                .with_secondary(Vec4::new(0.2, 0.4, 1.0, 1.0)),
        )
        .ok();
    }
    for _ in 0..20 {
        sim.update(STEP).ok();
    }
    sim
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for shells in [1, 10, 50] {
        let sim = busy_system(shells);
        group.bench_with_input(
            BenchmarkId::new("shells", shells),
            &sim.particle_count(),
            |b, _| {
                b.iter_batched(
                    || busy_system(shells),
                    |mut sim| black_box(sim.update(STEP).ok()),
                    BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_vertices(c: &mut Criterion) {
    let sim = busy_system(50);
    c.bench_function("vertices", |b| b.iter(|| black_box(sim.vertices())));
}

criterion_group!(benches, bench_emitters, bench_update, bench_vertices);
criterion_main!(benches);
