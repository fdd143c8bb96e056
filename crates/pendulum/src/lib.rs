#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::float_cmp)]

//! # Pendulum
//!
//! Physics core for an interactive damped single pendulum.
//!
//! Pendulum provides:
//! - **State**: [`PendulumState`] and [`SimulationControls`] value types
//! - **Integrator**: classical RK4 on the nonlinear damped pendulum ODE
//! - **Trail**: a fixed-capacity FIFO of recent bob positions
//! - **Energy**: kinetic/potential/total energy, gauge ceiling, period and
//!   speed estimates
//! - **Driver**: [`step`], the per-frame state transition
//!
//! The crate owns no clock and no canvas. A host calls [`step`] once per
//! frame with the elapsed time and renders whatever state comes back.
//!
//! ## Example
//!
//! ```rust
//! use pendulum::{reset, step, total_energy, TRAIL_CAPACITY};
//!
//! let (mut state, controls) = reset();
//! let start = total_energy(&state, controls.gravity);
//!
//! // Ten seconds at 60 FPS
//! for _ in 0..600 {
//!     state = step(&state, &controls, 1.0 / 60.0);
//! }
//!
//! assert!(state.trail.len() <= TRAIL_CAPACITY);
//! assert!(total_energy(&state, controls.gravity) < start);
//! ```
//!
//! ## Features
//!
//! - `std` (default): use the standard library's float functions
//! - `libm`: with `std` disabled, use `libm` for `sin`, `cos` and `sqrt`
//! - `serde`: `Serialize` for states, trails and readouts

mod driver;
mod energy;
mod error;
mod integrator;
mod math;
mod state;
mod trail;

pub use driver::{
    reset_trail, step, step_with, try_step, Projection, StepOutcome, DEFAULT_PIVOT,
    DEFAULT_PIXELS_PER_METER,
};
pub use energy::{
    gauge_fraction, kinetic_energy, max_energy, max_speed, period, potential_energy,
    total_energy, Readout,
};
pub use error::{PendulumError, StepError};
pub use integrator::{derivative, rk4_step, Derivative, PendulumParams};
pub use state::{
    create_initial_controls, create_initial_state, reset, ControlRange, PendulumState,
    SimulationControls, DAMPING_RANGE, GRAVITY_RANGE, INITIAL_ANGLE, INITIAL_DAMPING,
    INITIAL_GRAVITY, INITIAL_LENGTH, INITIAL_MASS, LENGTH_RANGE, MASS_RANGE,
};
pub use trail::{Point, Trail, TrailIter, TRAIL_CAPACITY};

/// Alias for [`total_energy`], the value the energy gauge displays.
#[inline]
pub fn compute_energy(state: &PendulumState, gravity: f64) -> f64 {
    total_energy(state, gravity)
}

/// Alias for [`max_energy`].
#[inline]
pub fn compute_max_energy(state: &PendulumState, gravity: f64) -> f64 {
    max_energy(state, gravity)
}

/// Alias for [`period`].
#[inline]
pub fn compute_period(state: &PendulumState, gravity: f64) -> f64 {
    period(state, gravity)
}

/// Alias for [`max_speed`].
#[inline]
pub fn compute_max_speed(state: &PendulumState, gravity: f64) -> f64 {
    max_speed(state, gravity)
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::driver::{reset_trail, step, try_step, Projection, StepOutcome};
    pub use crate::energy::{total_energy, Readout};
    pub use crate::error::{PendulumError, StepError};
    pub use crate::state::{reset, PendulumState, SimulationControls};
    pub use crate::trail::{Point, Trail, TRAIL_CAPACITY};
}
