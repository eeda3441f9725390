//! Benchmarks for the CPU-side explosion simulation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

use fireworks::config::FireworkConfig;
use fireworks::emitter::ParticleEmitter;
use fireworks::registry::EmitterRegistry;
use fireworks::scene::Scene;
use fireworks::spawn::{hsl_to_rgb, RandomSampler};

fn bench_emitter_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("emitter_step");

    for count in [100u32, 500, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = FireworkConfig::default().with_particle_count(count);
            let mut sampler = RandomSampler::seeded(1);
            let mut emitter = ParticleEmitter::new(Vec3::ZERO, &config, &mut sampler);
            b.iter(|| {
                emitter.step();
                black_box(emitter.positions());
            })
        });
    }

    group.finish();
}

fn bench_spawn(c: &mut Criterion) {
    let config = FireworkConfig::default();
    let mut sampler = RandomSampler::seeded(2);

    c.bench_function("spawn_500", |b| {
        b.iter(|| black_box(ParticleEmitter::new(Vec3::ZERO, &config, &mut sampler)))
    });

    c.bench_function("hsl_to_rgb", |b| {
        b.iter(|| black_box(hsl_to_rgb(black_box(0.37), 1.0, 0.5)))
    });
}

fn bench_advance_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_all");

    for live in [1usize, 10, 50] {
        group.bench_with_input(BenchmarkId::new("live", live), &live, |b, &live| {
            b.iter_batched(
                || {
                    let mut registry = EmitterRegistry::new(FireworkConfig::default());
                    let mut scene = Scene::new();
                    let mut sampler = RandomSampler::seeded(3);
                    for i in 0..live {
                        registry.spawn(Vec3::splat(i as f32 * 0.1), &mut sampler, &mut scene);
                    }
                    (registry, scene)
                },
                |(mut registry, mut scene)| {
                    for _ in 0..67 {
                        black_box(registry.advance_all(&mut scene));
                    }
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_emitter_step, bench_spawn, bench_advance_all);
criterion_main!(benches);
