#![allow(clippy::float_cmp)]

use std::time::Duration;

use pendulum::{PendulumState, SimulationControls, Trail, step, total_energy};
use pendulum_loop::{MAX_FRAME_DELTA, Session, SessionOptions, clamp_delta};
use proptest::prelude::*;

fn arb_delta() -> impl Strategy<Value = Duration> {
    prop_oneof![
        Just(Duration::ZERO),
        (0u64..40_000).prop_map(Duration::from_micros),
        (0u64..5_000).prop_map(Duration::from_millis),
    ]
}

// =============================================================================
// Delta clamping
// =============================================================================

proptest! {
    #[test]
    fn clamp_delta_stays_in_range(seconds in any::<f64>(), max in 0.0f64..1.0) {
        let clamped = clamp_delta(seconds, max);
        prop_assert!((0.0..=max).contains(&clamped));
        prop_assert_eq!(clamp_delta(clamped, max), clamped);
    }

    #[test]
    fn session_ticks_match_core_steps(deltas in prop::collection::vec(arb_delta(), 0..120)) {
        let mut session = Session::new(SessionOptions::default());
        let controls = SimulationControls::initial();
        let mut state = PendulumState::initial();

        for delta in deltas {
            session.tick(delta);
            state = step(&state, &controls, clamp_delta(delta.as_secs_f64(), MAX_FRAME_DELTA));
        }

        prop_assert_eq!(session.state(), &state);
    }
}

// =============================================================================
// Long frames
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn long_frames_conserve_undamped_energy(
        angle in -1.5f64..1.5,
        length in 0.5f64..4.0,
        gravity in 1.0f64..20.0,
        frame_time in MAX_FRAME_DELTA..1.0,
        frames in 1usize..60,
    ) {
        let state = PendulumState {
            angle,
            angular_velocity: 0.0,
            length,
            mass: 1.0,
            trail: Trail::new(),
        };
        let controls = SimulationControls::initial()
            .with_damping(0.0)
            .with_gravity(gravity);
        let start = total_energy(&state, gravity);
        prop_assume!(start > 1e-6);

        let mut session = Session::new(
            SessionOptions::new()
                .state(state)
                .controls(controls)
                .max_frame_time(frame_time),
        );
        for _ in 0..frames {
            session.tick_seconds(frame_time);
        }

        let end = total_energy(session.state(), gravity);
        prop_assert!(((end - start) / start).abs() < 1e-3, "{} -> {}", start, end);
    }
}
