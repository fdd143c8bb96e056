//! Per-tick state transition.
//!
//! [`try_step`] is the only function that produces a new [`PendulumState`]
//! from an old one. It integrates, projects the bob into rendering space and
//! appends the projected point to the trail, all on a fresh value, so callers
//! either see the whole tick or none of it.

use crate::error::{PendulumError, StepError};
use crate::integrator::PendulumParams;
use crate::math::{cos, sin};
use crate::state::{PendulumState, SimulationControls};
use crate::trail::Point;

/// Default pivot position in rendering space.
pub const DEFAULT_PIVOT: Point = Point::new(300.0, 100.0);

/// Default rendering scale.
pub const DEFAULT_PIXELS_PER_METER: f64 = 100.0;

/// Maps a physical bob position to rendering space.
///
/// The pivot is fixed at construction; rendering-space `y` grows downward,
/// so a hanging bob sits below the pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Pivot position in rendering space.
    pub pivot: Point,
    /// Pixels per meter of string.
    pub pixels_per_meter: f64,
}

impl Projection {
    /// Creates a projection around `pivot` at the given scale.
    pub const fn new(pivot: Point, pixels_per_meter: f64) -> Self {
        Self {
            pivot,
            pixels_per_meter,
        }
    }

    /// Rendering-space position of a bob at `angle` on a string of `length`.
    #[inline]
    pub fn project(&self, angle: f64, length: f64) -> Point {
        let reach = length * self.pixels_per_meter;
        Point::new(
            self.pivot.x + reach * sin(angle),
            self.pivot.y + reach * cos(angle),
        )
    }

    /// Rendering-space position of the bob in `state`.
    #[inline]
    pub fn bob(&self, state: &PendulumState) -> Point {
        self.project(state.angle, state.length)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(DEFAULT_PIVOT, DEFAULT_PIXELS_PER_METER)
    }
}

/// What a tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Physics advanced; the new state is attached.
    Advanced(PendulumState),
    /// The simulation is paused; the state is unchanged.
    Paused,
    /// The elapsed time was zero or negative; the state is unchanged.
    Idle,
}

impl StepOutcome {
    /// Returns the new state, or a clone of `previous` when nothing advanced.
    pub fn into_state(self, previous: &PendulumState) -> PendulumState {
        match self {
            Self::Advanced(state) => state,
            Self::Paused | Self::Idle => previous.clone(),
        }
    }

    /// Returns `true` if physics advanced.
    pub const fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced(_))
    }
}

/// Applies one tick of `delta_time` seconds.
///
/// A paused simulation is a no-op: the integrator is not called at all, so
/// repeated paused ticks cannot drift the state.
///
/// # Errors
///
/// Returns [`StepError::InvalidParameter`] when the length is not positive or
/// gravity, damping or `delta_time` is not finite, and
/// [`StepError::NumericalInstability`] when integration yields a non-finite
/// angle or angular velocity. In both cases `state` is left as it was.
pub fn try_step(
    state: &PendulumState,
    controls: &SimulationControls,
    delta_time: f64,
    projection: &Projection,
) -> Result<StepOutcome, StepError> {
    if !controls.is_running {
        return Ok(StepOutcome::Paused);
    }

    let params = PendulumParams::new(state.length, controls.gravity, controls.damping_coefficient())?;
    let delta_time = PendulumError::require_finite("delta time", delta_time)?;
    if delta_time <= 0.0 {
        return Ok(StepOutcome::Idle);
    }

    let (angle, angular_velocity) = params.step(state.angle, state.angular_velocity, delta_time);
    if !angle.is_finite() || !angular_velocity.is_finite() {
        return Err(StepError::NumericalInstability {
            angle,
            angular_velocity,
        });
    }

    let mut next = PendulumState {
        angle,
        angular_velocity,
        ..state.clone()
    };
    if controls.show_trail {
        next.trail.push(projection.project(angle, next.length));
    }

    tracing::trace!(angle, angular_velocity, delta_time, "pendulum advanced");
    Ok(StepOutcome::Advanced(next))
}

/// Applies one tick using `projection`, turning any failure into a no-op.
///
/// Failures are reported through `tracing` and the input state is returned
/// unchanged, so a bad parameter freezes the pendulum instead of breaking the
/// render loop.
pub fn step_with(
    state: &PendulumState,
    controls: &SimulationControls,
    delta_time: f64,
    projection: &Projection,
) -> PendulumState {
    match try_step(state, controls, delta_time, projection) {
        Ok(outcome) => outcome.into_state(state),
        Err(error) => {
            tracing::warn!(%error, "tick rejected; keeping previous state");
            state.clone()
        }
    }
}

/// Applies one tick with the default [`Projection`].
///
/// # Example
///
/// ```rust
/// use pendulum::{step, PendulumState, SimulationControls};
///
/// let state = PendulumState::initial();
/// let controls = SimulationControls::initial();
///
/// let next = step(&state, &controls, 1.0 / 60.0);
/// assert!(next.angle < state.angle);
/// assert_eq!(next.trail.len(), 1);
/// ```
pub fn step(state: &PendulumState, controls: &SimulationControls, delta_time: f64) -> PendulumState {
    step_with(state, controls, delta_time, &Projection::default())
}

/// Returns `state` with its trail cleared.
pub fn reset_trail(state: &PendulumState) -> PendulumState {
    state.clone().without_trail()
}
