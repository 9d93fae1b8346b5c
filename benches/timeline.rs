//! Benchmarks for timeline building and simulated playback.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use stair_timeline::{
    AlgorithmKind, Engine, EngineConfig,
    algorithms,
    render::Scene,
};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for kind in AlgorithmKind::ALL {
        for n in [5i64, 20, 45] {
            group.bench_with_input(
                BenchmarkId::new(kind.as_str(), n),
                &n,
                |b, &n| {
                    b.iter(|| algorithms::build(kind, black_box(n)));
                },
            );
        }
    }

    group.finish();
}

fn bench_scene_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_fold");

    for n in [10i64, 45] {
        let solution = algorithms::build(AlgorithmKind::Dp, n);
        let last = solution.timeline.len() - 1;

        group.bench_with_input(BenchmarkId::from_parameter(n), &last, |b, &last| {
            b.iter(|| Scene::at(&solution.timeline, black_box(last)));
        });
    }

    group.finish();
}

fn bench_playback(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback_60fps");

    for n in [5i64, 20] {
        let config = EngineConfig {
            stairs: n,
            ..EngineConfig::default()
        };

        group.bench_with_input(BenchmarkId::from_parameter(n), &config, |b, config| {
            b.iter(|| {
                let mut engine = Engine::new(config.clone());
                engine.set_playback_speed(10.0);
                engine.play_pause();
                let mut now = 0.0;
                while engine.state().is_playing() || !engine.is_idle() {
                    engine.tick(black_box(now));
                    now += 1000.0 / 60.0;
                }
                engine.state().current_step()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_scene_fold, bench_playback);
criterion_main!(benches);
