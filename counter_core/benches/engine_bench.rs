use counter_core::config::EngineConfig;
use counter_core::engine::TrackingEngine;
use counter_core::line::LineGeometry;
use counter_core::types::Detection;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// `n_lines` side-by-side lanes, 200 px wide, all on row 500.
fn make_config(n_lines: usize) -> EngineConfig {
    let lines = (0..n_lines)
        .map(|i| {
            let x1 = i as i32 * 200;
            LineGeometry::new(x1, x1 + 190, 500, 10)
        })
        .collect();
    EngineConfig::with_lines(lines)
}

/// `per_line` vehicles spread inside every lane band, shifted by `step` px.
fn make_frame(n_lines: usize, per_line: usize, step: i32) -> Vec<Detection> {
    (0..n_lines)
        .flat_map(|i| {
            (0..per_line).map(move |k| {
                let x = i as i32 * 200 + (k as i32 * 190) / per_line.max(1) as i32;
                Detection::new(x, 495 + step)
            })
        })
        .collect()
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    for n in [7, 50, 200] {
        group.bench_function(format!("{n}_lines"), |b| {
            b.iter(|| {
                let mut engine =
                    TrackingEngine::new(make_config(n)).expect("bench config is valid");
                // Warm up with one frame to create tracks
                engine.process_frame(&make_frame(n, 4, 0), 30.0);
                // Measure full frame processing with established tracks
                let frame = make_frame(n, 4, 2);
                black_box(engine.process_frame(&frame, 30.0));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
