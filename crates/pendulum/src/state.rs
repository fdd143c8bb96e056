//! Pendulum state and user-tunable controls.
//!
//! Both types are plain values. Transitions produce a new value instead of
//! mutating a shared one, so a reader holding an old snapshot never sees a
//! half-applied tick.

use core::f64::consts::FRAC_PI_4;

use crate::trail::{Point, Trail};

/// Inclusive range a control surface enforces for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRange {
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value.
    pub max: f64,
}

impl ControlRange {
    /// Creates a range from `min` to `max` inclusive.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `value` lies within the range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps `value` into the range. NaN stays NaN.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// String length slider range, meters.
pub const LENGTH_RANGE: ControlRange = ControlRange::new(0.5, 4.0);

/// Bob mass slider range, kilograms.
pub const MASS_RANGE: ControlRange = ControlRange::new(0.5, 2.0);

/// Gravity slider range, m/s².
pub const GRAVITY_RANGE: ControlRange = ControlRange::new(1.0, 20.0);

/// Damping slider range, percent.
pub const DAMPING_RANGE: ControlRange = ControlRange::new(0.0, 100.0);

/// Initial release angle, radians.
pub const INITIAL_ANGLE: f64 = FRAC_PI_4;

/// Initial string length, meters.
pub const INITIAL_LENGTH: f64 = 2.0;

/// Initial bob mass, kilograms.
pub const INITIAL_MASS: f64 = 1.0;

/// Initial gravity, m/s².
pub const INITIAL_GRAVITY: f64 = 9.81;

/// Initial damping, percent.
pub const INITIAL_DAMPING: f64 = 0.5;

/// Physical state of the pendulum plus its rendered trail.
///
/// `angle` is not wrapped: a pendulum that goes over the top keeps
/// accumulating angle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PendulumState {
    /// Angular displacement from the downward vertical, radians.
    pub angle: f64,
    /// Angular velocity, radians per second.
    pub angular_velocity: f64,
    /// String length, meters.
    pub length: f64,
    /// Bob mass, kilograms.
    pub mass: f64,
    /// Recent bob positions in rendering space, oldest first.
    pub trail: Trail,
}

impl PendulumState {
    /// The state every session starts from: released at 45° from rest on a
    /// 2 m string with a 1 kg bob and no trail.
    pub const fn initial() -> Self {
        Self {
            angle: INITIAL_ANGLE,
            angular_velocity: 0.0,
            length: INITIAL_LENGTH,
            mass: INITIAL_MASS,
            trail: Trail::new(),
        }
    }

    /// Returns a copy with the given string length.
    ///
    /// The value is stored as given. Slider limits belong to whoever drives
    /// the controls; see [`LENGTH_RANGE`].
    pub const fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Returns a copy with the given bob mass, stored as given.
    pub const fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Returns a copy released from `angle` at rest.
    ///
    /// Non-finite input leaves the state unchanged.
    pub fn with_angle(mut self, angle: f64) -> Self {
        if angle.is_finite() {
            self.angle = angle;
            self.angular_velocity = 0.0;
        }
        self
    }

    /// Returns a copy with `point` appended to the trail.
    pub fn with_trail_point(mut self, point: Point) -> Self {
        self.trail.push(point);
        self
    }

    /// Returns a copy with an empty trail.
    pub fn without_trail(mut self) -> Self {
        self.trail.clear();
        self
    }
}

impl Default for PendulumState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Parameters the user tunes while the simulation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationControls {
    /// When `false` ticks are no-ops.
    pub is_running: bool,
    /// Gravitational acceleration, m/s².
    pub gravity: f64,
    /// Damping as a percentage, 0–100.
    pub damping: f64,
    /// When `false` no new points are appended to the trail. The existing
    /// trail is kept.
    pub show_trail: bool,
}

impl SimulationControls {
    /// The controls every session starts with: running, Earth gravity,
    /// 0.5 % damping, trail visible.
    pub const fn initial() -> Self {
        Self {
            is_running: true,
            gravity: INITIAL_GRAVITY,
            damping: INITIAL_DAMPING,
            show_trail: true,
        }
    }

    /// The dimensionless damping coefficient the integrator consumes.
    #[inline]
    pub fn damping_coefficient(&self) -> f64 {
        self.damping / 100.0
    }

    /// Returns a copy with gravity clamped into [`GRAVITY_RANGE`].
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        if gravity.is_finite() {
            self.gravity = GRAVITY_RANGE.clamp(gravity);
        }
        self
    }

    /// Returns a copy with damping clamped into [`DAMPING_RANGE`].
    pub fn with_damping(mut self, damping: f64) -> Self {
        if damping.is_finite() {
            self.damping = DAMPING_RANGE.clamp(damping);
        }
        self
    }

    /// Returns a copy that is running or paused.
    pub const fn with_running(mut self, running: bool) -> Self {
        self.is_running = running;
        self
    }

    /// Returns a copy that does or does not record trail points.
    pub const fn with_trail_visible(mut self, visible: bool) -> Self {
        self.show_trail = visible;
        self
    }
}

impl Default for SimulationControls {
    fn default() -> Self {
        Self::initial()
    }
}

/// Creates the initial [`PendulumState`].
pub const fn create_initial_state() -> PendulumState {
    PendulumState::initial()
}

/// Creates the initial [`SimulationControls`].
pub const fn create_initial_controls() -> SimulationControls {
    SimulationControls::initial()
}

/// Restores both state and controls to their initial values.
///
/// Resetting also re-enables running. Calling it any number of times gives
/// the same result.
pub const fn reset() -> (PendulumState, SimulationControls) {
    (PendulumState::initial(), SimulationControls::initial())
}
