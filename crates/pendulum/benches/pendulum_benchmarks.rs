//! Benchmarks for the pendulum core.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pendulum::{rk4_step, step, PendulumParams, PendulumState, Point, Readout, SimulationControls, Trail};

fn benchmark_rk4(c: &mut Criterion) {
    c.bench_function("rk4_step validated", |b| {
        b.iter(|| rk4_step(black_box(0.7), black_box(-0.2), 2.0, 1.0 / 60.0, 9.81, 0.005));
    });

    let params = PendulumParams::new(2.0, 9.81, 0.005).unwrap();
    c.bench_function("PendulumParams::step", |b| {
        b.iter(|| params.step(black_box(0.7), black_box(-0.2), 1.0 / 60.0));
    });
}

fn benchmark_step(c: &mut Criterion) {
    let controls = SimulationControls::initial();
    let state = PendulumState::initial();

    c.bench_function("step with trail", |b| {
        b.iter(|| step(black_box(&state), &controls, 1.0 / 60.0));
    });

    let hidden = controls.with_trail_visible(false);
    c.bench_function("step without trail", |b| {
        b.iter(|| step(black_box(&state), &hidden, 1.0 / 60.0));
    });
}

fn benchmark_trail(c: &mut Criterion) {
    let full: Trail = (0..100).map(|i| Point::new(f64::from(i), 0.0)).collect();

    c.bench_function("Trail::push full", |b| {
        b.iter(|| {
            let mut trail = full.clone();
            trail.push(black_box(Point::new(1.0, 2.0)));
            trail
        });
    });
}

fn benchmark_readout(c: &mut Criterion) {
    let controls = SimulationControls::initial();
    let state = PendulumState::initial();

    c.bench_function("Readout::new", |b| {
        b.iter(|| Readout::new(black_box(&state), &controls));
    });
}

criterion_group!(
    benches,
    benchmark_rk4,
    benchmark_step,
    benchmark_trail,
    benchmark_readout
);
criterion_main!(benches);
