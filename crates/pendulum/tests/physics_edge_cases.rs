#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::float_cmp)]

//! Integration tests for the pendulum core covering long-run energy
//! behaviour, trail bookkeeping, pausing, reset and extreme parameters.

use std::f64::consts::{FRAC_PI_4, PI};

use pendulum::{
    Projection, PendulumState, SimulationControls, StepError, TRAIL_CAPACITY, compute_energy,
    compute_max_energy, compute_max_speed, compute_period, kinetic_energy, reset, reset_trail,
    step, total_energy, try_step,
};

const FRAME: f64 = 1.0 / 60.0;

fn run(mut state: PendulumState, controls: &SimulationControls, dt: f64, frames: usize) -> PendulumState {
    for _ in 0..frames {
        state = step(&state, controls, dt);
    }
    state
}

// =============================================================================
// Worked example
// =============================================================================

#[test]
fn first_tick_from_initial_state() {
    let state = PendulumState::initial();
    let controls = SimulationControls::initial().with_damping(0.0);

    let next = step(&state, &controls, 0.01);

    assert!(next.angular_velocity < 0.0, "ω should turn negative");
    assert!(next.angular_velocity > -0.05, "ω should be small, got {}", next.angular_velocity);
    assert!(next.angle < FRAC_PI_4);
    assert!(FRAC_PI_4 - next.angle < 1e-3);
}

// =============================================================================
// Energy: conservation without damping
// =============================================================================

#[test]
fn undamped_energy_stays_in_band() {
    let controls = SimulationControls::initial().with_damping(0.0);
    let mut state = PendulumState::initial();
    let initial = total_energy(&state, controls.gravity);

    // 60 seconds at 60 FPS
    for _ in 0..3600 {
        state = step(&state, &controls, FRAME);
        let energy = total_energy(&state, controls.gravity);
        assert!(
            ((energy - initial) / initial).abs() < 1e-5,
            "energy drifted: {energy} vs {initial}"
        );
    }
}

#[test]
fn undamped_energy_across_parameter_grid() {
    for length in [0.5, 1.0, 2.5, 4.0] {
        for gravity in [1.0, 9.81, 20.0] {
            let controls = SimulationControls::initial()
                .with_damping(0.0)
                .with_gravity(gravity);
            let start = PendulumState::initial().with_length(length).with_angle(1.2);
            let initial = total_energy(&start, gravity);
            let end = run(start, &controls, FRAME, 1200);
            let relative = ((total_energy(&end, gravity) - initial) / initial).abs();
            assert!(relative < 1e-4, "L={length} g={gravity}: drift {relative}");
        }
    }
}

// =============================================================================
// Energy: decay under damping
// =============================================================================

#[test]
fn damped_energy_trend_decays() {
    let controls = SimulationControls::initial().with_damping(10.0);
    let mut state = PendulumState::initial();
    let initial = total_energy(&state, controls.gravity);

    let mut previous = initial;
    // Sample once per second for 30 seconds.
    for _ in 0..30 {
        state = run(state, &controls, FRAME, 60);
        let energy = total_energy(&state, controls.gravity);
        assert!(energy <= previous + 1e-9, "energy rose: {previous} -> {energy}");
        previous = energy;
    }

    assert!(previous < initial * 0.1, "energy should be mostly gone, got {previous}");
}

#[test]
fn default_damping_decays_slowly() {
    let controls = SimulationControls::initial();
    let state = PendulumState::initial();
    let initial = total_energy(&state, controls.gravity);
    let end = run(state, &controls, FRAME, 600);
    let energy = total_energy(&end, controls.gravity);

    // 0.5 % damping over 10 s loses roughly 5 % of the energy.
    assert!(energy < initial);
    assert!(energy > initial * 0.9);
}

#[test]
fn full_damping_comes_to_rest() {
    let controls = SimulationControls::initial().with_damping(100.0);
    let end = run(PendulumState::initial(), &controls, FRAME, 60 * 60);
    assert!(end.angle.abs() < 1e-3);
    assert!(end.angular_velocity.abs() < 1e-3);
}

// =============================================================================
// Trail
// =============================================================================

#[test]
fn trail_is_last_fifty_bob_positions() {
    let controls = SimulationControls::initial();
    let projection = Projection::default();
    let mut state = PendulumState::initial();
    let mut history = Vec::new();

    for _ in 0..137 {
        state = step(&state, &controls, FRAME);
        history.push(projection.bob(&state));
        assert!(state.trail.len() <= TRAIL_CAPACITY);
    }

    let expected = &history[history.len() - TRAIL_CAPACITY..];
    assert!(state.trail.iter().eq(expected.iter().copied()));
}

#[test]
fn hiding_trail_freezes_it() {
    let visible = SimulationControls::initial();
    let hidden = visible.with_trail_visible(false);

    let state = run(PendulumState::initial(), &visible, FRAME, 20);
    let frozen = run(state.clone(), &hidden, FRAME, 40);
    assert_eq!(frozen.trail, state.trail);

    let resumed = run(frozen, &visible, FRAME, 1);
    assert_eq!(resumed.trail.len(), 21);
}

#[test]
fn reset_trail_then_regrow() {
    let controls = SimulationControls::initial();
    let state = run(PendulumState::initial(), &controls, FRAME, 80);
    let cleared = reset_trail(&state);
    assert!(cleared.trail.is_empty());

    let regrown = run(cleared, &controls, FRAME, 3);
    assert_eq!(regrown.trail.len(), 3);
}

// =============================================================================
// Pause and reset
// =============================================================================

#[test]
fn paused_ticks_do_not_drift() {
    let running = SimulationControls::initial();
    let paused = running.with_running(false);
    let state = run(PendulumState::initial(), &running, FRAME, 45);

    let after = run(state.clone(), &paused, FRAME, 10_000);
    assert_eq!(after.angle.to_bits(), state.angle.to_bits());
    assert_eq!(after.angular_velocity.to_bits(), state.angular_velocity.to_bits());
    assert_eq!(after.trail, state.trail);
}

#[test]
fn reset_twice_equals_reset_once() {
    let (state, controls) = reset();
    let moved = run(state, &controls, FRAME, 100);
    assert_ne!(moved, PendulumState::initial());

    let once = reset();
    let twice = {
        let _ = reset();
        reset()
    };
    assert_eq!(once, twice);
    assert_eq!(once.0, PendulumState::initial());
    assert!(once.1.is_running);
}

// =============================================================================
// Extreme parameters
// =============================================================================

#[test]
fn shortest_string_strongest_gravity_is_stable() {
    let controls = SimulationControls::initial().with_gravity(20.0).with_damping(0.0);
    let mut state = PendulumState::initial().with_length(0.5).with_angle(3.0);
    for _ in 0..6000 {
        state = step(&state, &controls, FRAME);
        assert!(state.angle.is_finite());
        assert!(state.angular_velocity.is_finite());
    }
}

#[test]
fn over_the_top_angle_is_not_wrapped() {
    let controls = SimulationControls::initial().with_damping(0.0);
    let mut state = PendulumState::initial();
    state.angular_velocity = 10.0;
    let end = run(state, &controls, FRAME, 600);
    assert!(end.angle > 2.0 * PI, "angle should accumulate, got {}", end.angle);
}

#[test]
fn large_delta_is_integrated_without_failure() {
    let controls = SimulationControls::initial();
    let state = PendulumState::initial();
    let result = try_step(&state, &controls, 0.5, &Projection::default());
    assert!(matches!(result, Ok(outcome) if outcome.is_advanced()));
}

#[test]
fn invalid_length_is_reported() {
    let mut state = PendulumState::initial();
    state.length = -1.0;
    let result = try_step(&state, &SimulationControls::initial(), FRAME, &Projection::default());
    assert!(matches!(result, Err(StepError::InvalidParameter(_))));
}

// =============================================================================
// Derived quantities through the public aliases
// =============================================================================

#[test]
fn compute_aliases_match() {
    let state = run(PendulumState::initial(), &SimulationControls::initial(), FRAME, 17);
    let g = 9.81;
    assert_eq!(compute_energy(&state, g), total_energy(&state, g));
    assert_eq!(compute_max_energy(&state, g), 2.0 * state.mass * g * state.length);
    assert_eq!(compute_period(&state, g), 2.0 * PI * (state.length / g).sqrt());
    assert_eq!(
        compute_max_speed(&state, g),
        (2.0 * g * state.length).sqrt() * (1.0 - state.angle.cos())
    );
    assert!(kinetic_energy(&state) > 0.0);
}
