//! Derived quantities shown by the energy gauge and the info panel.
//!
//! Everything here is a pure function of the current state and gravity and
//! is recomputed every frame. `period` uses the small-angle approximation and
//! `max_speed` keeps the gauge's historical approximation; neither is exact
//! for large amplitudes.

use core::f64::consts::{PI, TAU};
use core::fmt;

use crate::math::{cos, sqrt};
use crate::state::{PendulumState, SimulationControls};

/// Kinetic energy of the bob, `½·m·(ω·L)²`, joules.
#[inline]
pub fn kinetic_energy(state: &PendulumState) -> f64 {
    let speed = state.angular_velocity * state.length;
    0.5 * state.mass * speed * speed
}

/// Potential energy relative to the lowest point, `m·g·L·(1 − cos θ)`, joules.
#[inline]
pub fn potential_energy(state: &PendulumState, gravity: f64) -> f64 {
    state.mass * gravity * state.length * (1.0 - cos(state.angle))
}

/// Kinetic plus potential energy, joules.
#[inline]
pub fn total_energy(state: &PendulumState, gravity: f64) -> f64 {
    kinetic_energy(state) + potential_energy(state, gravity)
}

/// Energy of the bob held at rest straight above the pivot, `2·m·g·L`.
///
/// Used as the full-scale value of the energy gauge.
#[inline]
pub fn max_energy(state: &PendulumState, gravity: f64) -> f64 {
    2.0 * state.mass * gravity * state.length
}

/// Small-angle period estimate, `2π·√(L / g)`, seconds.
///
/// Returns infinity when `gravity` is zero.
#[inline]
pub fn period(state: &PendulumState, gravity: f64) -> f64 {
    TAU * sqrt(state.length / gravity)
}

/// Speed estimate shown in the info panel, `√(2·g·L)·(1 − cos θ)`, m/s.
#[inline]
pub fn max_speed(state: &PendulumState, gravity: f64) -> f64 {
    sqrt(2.0 * gravity * state.length) * (1.0 - cos(state.angle))
}

/// Fill level of the energy gauge, `total / max` clamped to `[0, 1]`.
pub fn gauge_fraction(state: &PendulumState, gravity: f64) -> f64 {
    let max = max_energy(state, gravity);
    if max > 0.0 {
        (total_energy(state, gravity) / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Every derived quantity for one snapshot, computed together.
///
/// `Display` renders the info-panel text.
///
/// # Example
///
/// ```rust
/// use pendulum::{PendulumState, Readout, SimulationControls};
///
/// let readout = Readout::new(&PendulumState::initial(), &SimulationControls::initial());
/// assert!(readout.period > 2.8 && readout.period < 2.9);
/// assert!(readout.to_string().contains("Period"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Readout {
    /// String length, meters.
    pub length: f64,
    /// Bob mass, kilograms.
    pub mass: f64,
    /// Gravity, m/s².
    pub gravity: f64,
    /// Damping, percent.
    pub damping: f64,
    /// Angle in degrees.
    pub angle_degrees: f64,
    /// Kinetic energy, joules.
    pub kinetic: f64,
    /// Potential energy, joules.
    pub potential: f64,
    /// Total energy, joules.
    pub total: f64,
    /// Gauge full-scale energy, joules.
    pub max: f64,
    /// Gauge fill level in `[0, 1]`.
    pub gauge: f64,
    /// Small-angle period, seconds.
    pub period: f64,
    /// Speed estimate, m/s.
    pub max_speed: f64,
}

impl Readout {
    /// Computes the readout for `state` under `controls`.
    pub fn new(state: &PendulumState, controls: &SimulationControls) -> Self {
        let gravity = controls.gravity;
        let kinetic = kinetic_energy(state);
        let potential = potential_energy(state, gravity);
        Self {
            length: state.length,
            mass: state.mass,
            gravity,
            damping: controls.damping,
            angle_degrees: state.angle * 180.0 / PI,
            kinetic,
            potential,
            total: kinetic + potential,
            max: max_energy(state, gravity),
            gauge: gauge_fraction(state, gravity),
            period: period(state, gravity),
            max_speed: max_speed(state, gravity),
        }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Length: {:.2} m", self.length)?;
        writeln!(f, "Mass: {:.2} kg", self.mass)?;
        writeln!(f, "Gravity: {:.2} m/s²", self.gravity)?;
        writeln!(f, "Damping: {:.1} %", self.damping)?;
        writeln!(f, "Angle: {:.1}°", self.angle_degrees)?;
        writeln!(f, "Period: {:.2} s", self.period)?;
        writeln!(f, "Energy: {:.2} J ({:.0}%)", self.total, self.gauge * 100.0)?;
        write!(f, "Max Speed: {:.2} m/s", self.max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    const TOLERANCE: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn state(angle: f64, angular_velocity: f64) -> PendulumState {
        PendulumState {
            angle,
            angular_velocity,
            ..PendulumState::initial()
        }
    }

    #[test]
    fn test_kinetic_energy() {
        // ½·1·(3·2)² = 18
        assert!(approx_eq(kinetic_energy(&state(0.0, 3.0)), 18.0));
        assert!(approx_eq(kinetic_energy(&state(1.0, 0.0)), 0.0));
    }

    #[test]
    fn test_potential_energy() {
        assert!(approx_eq(potential_energy(&state(0.0, 0.0), 9.81), 0.0));
        // Horizontal: m·g·L
        assert!(approx_eq(potential_energy(&state(FRAC_PI_2, 0.0), 10.0), 20.0));
        // Inverted equals the gauge ceiling.
        let top = state(PI, 0.0);
        assert!(approx_eq(potential_energy(&top, 9.81), max_energy(&top, 9.81)));
    }

    #[test]
    fn test_total_energy_sums_parts() {
        let s = state(0.4, -1.1);
        assert!(approx_eq(
            total_energy(&s, 9.81),
            kinetic_energy(&s) + potential_energy(&s, 9.81)
        ));
    }

    #[test]
    fn test_max_energy() {
        assert!(approx_eq(max_energy(&state(0.0, 0.0), 9.81), 2.0 * 1.0 * 9.81 * 2.0));
    }

    #[test]
    fn test_period_small_angle() {
        let s = PendulumState::initial().with_length(1.0);
        assert!(approx_eq(period(&s, 9.81), 2.0 * PI * (1.0f64 / 9.81).sqrt()));
        assert!(period(&s, 0.0).is_infinite());
    }

    #[test]
    fn test_max_speed_formula_preserved() {
        let s = state(FRAC_PI_2, 0.0);
        let expected = (2.0 * 9.81 * 2.0f64).sqrt() * (1.0 - FRAC_PI_2.cos());
        assert!(approx_eq(max_speed(&s, 9.81), expected));
        // At the bottom the estimate is zero regardless of velocity.
        assert!(approx_eq(max_speed(&state(0.0, 5.0), 9.81), 0.0));
    }

    #[test]
    fn test_gauge_fraction_clamped() {
        assert!(approx_eq(gauge_fraction(&state(0.0, 0.0), 9.81), 0.0));
        assert!(approx_eq(gauge_fraction(&state(PI, 0.0), 9.81), 1.0));
        // Fast spin exceeds the ceiling; the gauge saturates.
        assert!(approx_eq(gauge_fraction(&state(0.0, 100.0), 9.81), 1.0));
        assert!(approx_eq(gauge_fraction(&state(0.5, 0.0), 0.0), 0.0));
    }

    #[test]
    fn test_readout_consistency() {
        let s = state(0.6, 0.8);
        let controls = SimulationControls::initial().with_gravity(12.0);
        let r = Readout::new(&s, &controls);
        assert!(approx_eq(r.total, total_energy(&s, 12.0)));
        assert!(approx_eq(r.max, max_energy(&s, 12.0)));
        assert!(approx_eq(r.period, period(&s, 12.0)));
        assert!(approx_eq(r.angle_degrees, 0.6 * 180.0 / PI));
        assert!(approx_eq(r.gravity, 12.0));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_readout_display() {
        let r = Readout::new(&PendulumState::initial(), &SimulationControls::initial());
        let text = r.to_string();
        assert!(text.contains("Length: 2.00 m"));
        assert!(text.contains("Mass: 1.00 kg"));
        assert!(text.contains("Angle: 45.0°"));
        assert!(text.contains("Period: 2.84 s"));
        assert!(text.lines().last().unwrap().starts_with("Max Speed:"));
    }
}
