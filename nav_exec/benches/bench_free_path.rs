//! # Free Path Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Point2;

use nav_lib::{
    loc::Pose2D,
    obst_anal::{free_path_distance, transform_to_frame, Params},
};

fn free_path_benchmark(c: &mut Criterion) {
    // ---- Build a dummy scan ----

    let params = Params {
        width_m: 0.281,
        length_m: 0.535,
        wheelbase_m: 0.324,
        margin_m: 0.1,
        min_curvature_m: 1e-3,
        max_range_m: 10.0,
    };

    // A full 1080 beam scan of a 4 m radius room with a bumpy wall
    let cloud: Vec<Point2<f64>> = (0..1080)
        .map(|i| {
            let angle = (i as f64 / 1080.0) * std::f64::consts::TAU;
            let range = 4.0 + 0.2 * (angle * 7.0).sin();
            Point2::new(range * angle.cos(), range * angle.sin())
        })
        .collect();

    let from = Pose2D::new(0.0, 0.0, 0.0);
    let to = Pose2D::new(0.3, 0.05, 0.1);

    c.bench_function("transform_to_frame", |b| {
        b.iter(|| transform_to_frame(black_box(&cloud), &from, &to))
    });

    c.bench_function("free_path_distance::straight", |b| {
        b.iter(|| free_path_distance(black_box(&cloud), 0.0, &params))
    });

    c.bench_function("free_path_distance::curved", |b| {
        b.iter(|| free_path_distance(black_box(&cloud), black_box(0.8), &params))
    });
}

criterion_group!(benches, free_path_benchmark);
criterion_main!(benches);
