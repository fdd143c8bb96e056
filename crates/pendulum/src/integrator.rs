//! Classical fourth-order Runge-Kutta integration of the damped pendulum.
//!
//! The equations of motion are
//!
//! ```text
//! dθ/dt = ω
//! dω/dt = -(g / L)·sin θ - c·ω
//! ```
//!
//! where `c` is the dimensionless damping coefficient. Each step samples the
//! right-hand side four times and combines the slopes with the standard
//! `(k1 + 2·k2 + 2·k3 + k4) / 6` weights.
//!
//! # Example
//!
//! ```rust
//! use pendulum::rk4_step;
//!
//! let (angle, velocity) = rk4_step(0.5, 0.0, 2.0, 0.01, 9.81, 0.0).unwrap();
//! assert!(angle < 0.5);
//! assert!(velocity < 0.0);
//! ```

use crate::error::PendulumError;
use crate::math::sin;

/// Time derivative of the pendulum state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Derivative {
    /// dθ/dt, rad/s.
    pub d_angle: f64,
    /// dω/dt, rad/s².
    pub d_velocity: f64,
}

/// Validated physical parameters for one integration step.
///
/// Construction is where the integrator's preconditions are checked, so a
/// `PendulumParams` value can always be integrated without dividing by zero
/// or producing NaN from a bad input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumParams {
    gravity_over_length: f64,
    damping_coefficient: f64,
}

impl PendulumParams {
    /// Validates `length`, `gravity` and `damping_coefficient`.
    ///
    /// # Errors
    ///
    /// Returns [`PendulumError::NonFinite`] if any value is NaN or infinite
    /// and [`PendulumError::NonPositiveLength`] if `length <= 0`.
    pub fn new(length: f64, gravity: f64, damping_coefficient: f64) -> Result<Self, PendulumError> {
        let length = PendulumError::require_finite("length", length)?;
        let gravity = PendulumError::require_finite("gravity", gravity)?;
        let damping_coefficient =
            PendulumError::require_finite("damping coefficient", damping_coefficient)?;

        if length <= 0.0 {
            return Err(PendulumError::NonPositiveLength(length));
        }

        Ok(Self {
            gravity_over_length: gravity / length,
            damping_coefficient,
        })
    }

    /// `g / L`, the squared small-angle natural frequency.
    #[inline]
    pub const fn gravity_over_length(&self) -> f64 {
        self.gravity_over_length
    }

    /// The linear damping coefficient `c`.
    #[inline]
    pub const fn damping_coefficient(&self) -> f64 {
        self.damping_coefficient
    }

    /// Advances `(angle, velocity)` by `dt` seconds with one RK4 step.
    ///
    /// `dt` is not clamped here; any finite value is integrated.
    #[inline]
    pub fn step(&self, angle: f64, velocity: f64, dt: f64) -> (f64, f64) {
        let half = dt * 0.5;

        let k1 = derivative(angle, velocity, self);
        let k2 = derivative(angle + k1.d_angle * half, velocity + k1.d_velocity * half, self);
        let k3 = derivative(angle + k2.d_angle * half, velocity + k2.d_velocity * half, self);
        let k4 = derivative(angle + k3.d_angle * dt, velocity + k3.d_velocity * dt, self);

        let sixth = dt / 6.0;
        let new_angle = angle
            + sixth * (k1.d_angle + 2.0 * k2.d_angle + 2.0 * k3.d_angle + k4.d_angle);
        let new_velocity = velocity
            + sixth * (k1.d_velocity + 2.0 * k2.d_velocity + 2.0 * k3.d_velocity + k4.d_velocity);

        (new_angle, new_velocity)
    }
}

/// Evaluates the pendulum ODE at `(angle, velocity)`.
#[inline]
pub fn derivative(angle: f64, velocity: f64, params: &PendulumParams) -> Derivative {
    Derivative {
        d_angle: velocity,
        d_velocity: -params.gravity_over_length * sin(angle)
            - params.damping_coefficient * velocity,
    }
}

/// Advances the pendulum by one RK4 step of `dt` seconds.
///
/// Returns `(new_angle, new_angular_velocity)`. The function is pure:
/// identical inputs always produce bit-identical outputs.
///
/// # Errors
///
/// Returns [`PendulumError::NonPositiveLength`] when `length <= 0` and
/// [`PendulumError::NonFinite`] when `length`, `gravity`,
/// `damping_coefficient` or `dt` is not finite.
pub fn rk4_step(
    angle: f64,
    angular_velocity: f64,
    length: f64,
    dt: f64,
    gravity: f64,
    damping_coefficient: f64,
) -> Result<(f64, f64), PendulumError> {
    let params = PendulumParams::new(length, gravity, damping_coefficient)?;
    let dt = PendulumError::require_finite("dt", dt)?;
    Ok(params.step(angle, angular_velocity, dt))
}
