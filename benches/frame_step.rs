//! Benchmarks for the per-frame CPU work: formation, floating, instances.
//!
//! Run with: `cargo bench --bench frame_step`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use papillon::{ButterflyConfig, ButterflyField, Phase};

const DT: f32 = 1.0 / 60.0;

fn field(count: u32) -> ButterflyField {
    let config = ButterflyConfig {
        particle_count: count,
        seed: Some(1),
        ..Default::default()
    };
    let mut field = ButterflyField::new(config, Vec2::new(1920.0, 1080.0)).unwrap();
    field.mount();
    field
}

fn formed_field(count: u32) -> ButterflyField {
    let mut field = field(count);
    while field.phase() != Phase::Formed {
        field.frame(DT);
    }
    field
}

fn bench_forming(c: &mut Criterion) {
    let mut group = c.benchmark_group("forming_frame");
    for count in [1500u32, 10_000] {
        group.bench_with_input(BenchmarkId::new("particles", count), &count, |b, &count| {
            let mut f = field(count);
            // Stay inside the run: restart once it finishes
            b.iter(|| {
                f.frame(DT);
                if f.phase() == Phase::Formed {
                    f.reset();
                }
            })
        });
    }
    group.finish();
}

fn bench_floating(c: &mut Criterion) {
    let mut group = c.benchmark_group("floating_frame");
    for count in [1500u32, 10_000] {
        group.bench_with_input(BenchmarkId::new("particles", count), &count, |b, &count| {
            let mut f = formed_field(count);
            let mut x = 0.0;
            b.iter(|| {
                x = (x + 7.0) % 1920.0;
                f.pointer_moved(Vec2::new(x, 540.0));
                f.frame(DT);
            })
        });
    }
    group.finish();
}

fn bench_instances(c: &mut Criterion) {
    let f = formed_field(1500);
    c.bench_function("instances_1500", |b| b.iter(|| black_box(f.instances())));
}

criterion_group!(benches, bench_forming, bench_floating, bench_instances);
criterion_main!(benches);
