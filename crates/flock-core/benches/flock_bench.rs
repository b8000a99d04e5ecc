use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use flock_core::{ArenaBounds, DisplaySettings, Flock, FlockConfig, FrameInput, TuningParams};

fn bench_input() -> FrameInput {
    FrameInput {
        dt: 1.0 / 60.0,
        bounds: ArenaBounds::new(800.0, 600.0),
        tuning: TuningParams {
            // Wide visibility so the neighbor scan actually finds work.
            visibility: 25.0,
            ..TuningParams::default()
        },
        display: DisplaySettings::default(),
    }
}

fn seeded_flock(count: usize) -> Flock {
    let config = FlockConfig {
        count,
        rng_seed: Some(0xBE_BC),
        ..FlockConfig::default()
    };
    match Flock::new(config) {
        Ok(flock) => flock,
        Err(err) => panic!("bench config must be valid: {err}"),
    }
}

fn bench_step(c: &mut Criterion) {
    let input = bench_input();
    let mut group = c.benchmark_group("flock_step");
    for count in [50usize, 200, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || seeded_flock(count),
                |mut flock| {
                    for _ in 0..10 {
                        flock.step(&input);
                    }
                    flock
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_spawn(c: &mut Criterion) {
    c.bench_function("flock_spawn_500", |b| {
        b.iter(|| seeded_flock(500));
    });
}

criterion_group!(benches, bench_step, bench_spawn);
criterion_main!(benches);
