//! Error types for the pendulum core.
//!
//! Nothing here is fatal to a host: every error is local to one tick and the
//! caller recovers by keeping the previous state or resetting.

use thiserror::Error;

/// A precondition of the integrator was violated.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PendulumError {
    /// The string length was zero or negative.
    #[error("pendulum length must be positive, got {0}")]
    NonPositiveLength(f64),

    /// A physical parameter was NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending parameter.
        name: &'static str,
        /// The value that was passed.
        value: f64,
    },
}

impl PendulumError {
    /// Checks that `value` is finite, naming it in the error otherwise.
    pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { name, value })
        }
    }
}

/// Why a single simulation tick was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StepError {
    /// The integrator refused its inputs.
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] PendulumError),

    /// Integration produced a NaN or infinite angle or angular velocity.
    #[error("numerical instability: angle={angle}, angular_velocity={angular_velocity}")]
    NumericalInstability {
        /// The angle produced by the rejected step.
        angle: f64,
        /// The angular velocity produced by the rejected step.
        angular_velocity: f64,
    },
}
