//! Runtime configuration for the `pendulum` binary.
//!
//! [`Config`] is the single source of truth for a run, however its values
//! were supplied. Resolution order is built-in defaults, then the TOML file,
//! then flags and `PENDULUM_*` environment variables. Values are checked by
//! [`Config::validate`] instead of being clamped, so a typo in a config file
//! is an error and not a silently different pendulum.
//!
//! ```toml
//! [pendulum]
//! length = 2.0
//! mass = 1.0
//! angle_deg = 45.0
//!
//! [controls]
//! gravity = 9.81
//! damping = 0.5
//! show_trail = true
//! running = true
//!
//! [run]
//! duration = 10.0
//! fps = 60
//! realtime = false
//! report_every = 60
//!
//! [projection]
//! pivot_x = 300.0
//! pivot_y = 100.0
//! pixels_per_meter = 100.0
//! ```

use std::path::{Path, PathBuf};

use pendulum::{
    ControlRange, DAMPING_RANGE, DEFAULT_PIVOT, DEFAULT_PIXELS_PER_METER, GRAVITY_RANGE,
    INITIAL_ANGLE, INITIAL_DAMPING, INITIAL_GRAVITY, INITIAL_LENGTH, INITIAL_MASS, LENGTH_RANGE,
    MASS_RANGE, PendulumState, Point, Projection, SimulationControls,
};
use pendulum_loop::{DEFAULT_FPS, MAX_FPS, MAX_FRAME_DELTA, MIN_FPS, SessionOptions};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Longest run accepted, in simulated seconds.
pub const MAX_DURATION: f64 = 24.0 * 60.0 * 60.0;

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Physical pendulum.
    pub pendulum: PendulumSection,
    /// Environment controls.
    pub controls: ControlsSection,
    /// Run length and pacing.
    pub run: RunSection,
    /// Mapping from meters to trail coordinates.
    pub projection: ProjectionSection,
}

/// `[pendulum]` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PendulumSection {
    /// String length in meters.
    pub length: f64,
    /// Bob mass in kilograms.
    pub mass: f64,
    /// Release angle in degrees.
    pub angle_deg: f64,
}

impl Default for PendulumSection {
    fn default() -> Self {
        Self {
            length: INITIAL_LENGTH,
            mass: INITIAL_MASS,
            angle_deg: INITIAL_ANGLE.to_degrees(),
        }
    }
}

/// `[controls]` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlsSection {
    /// Gravitational acceleration in m/s².
    pub gravity: f64,
    /// Damping in percent.
    pub damping: f64,
    /// Whether trail points are recorded.
    pub show_trail: bool,
    /// Whether the simulation starts running.
    pub running: bool,
}

impl Default for ControlsSection {
    fn default() -> Self {
        Self {
            gravity: INITIAL_GRAVITY,
            damping: INITIAL_DAMPING,
            show_trail: true,
            running: true,
        }
    }
}

/// `[run]` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    /// Simulated seconds.
    pub duration: f64,
    /// Frames per second.
    pub fps: u32,
    /// Pace frames against the wall clock.
    pub realtime: bool,
    /// Frames between readouts.
    pub report_every: u64,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            duration: 10.0,
            fps: DEFAULT_FPS,
            realtime: false,
            report_every: u64::from(DEFAULT_FPS),
        }
    }
}

/// `[projection]` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionSection {
    /// Pivot x coordinate.
    pub pivot_x: f64,
    /// Pivot y coordinate.
    pub pivot_y: f64,
    /// Scale from meters to trail units.
    pub pixels_per_meter: f64,
}

impl Default for ProjectionSection {
    fn default() -> Self {
        Self {
            pivot_x: DEFAULT_PIVOT.x,
            pivot_y: DEFAULT_PIVOT.y,
            pixels_per_meter: DEFAULT_PIXELS_PER_METER,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// A number was NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite {
        /// Dotted field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A number fell outside its accepted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Dotted field name.
        field: &'static str,
        /// Offending value.
        value: f64,
        /// Lowest accepted value.
        min: f64,
        /// Highest accepted value.
        max: f64,
    },

    /// Frame rate outside `MIN_FPS..=MAX_FPS`.
    #[error("run.fps must be between {min} and {max}, got {0}", min = MIN_FPS, max = MAX_FPS)]
    InvalidFps(u32),

    /// Report interval of zero frames.
    #[error("run.report_every must be at least 1")]
    ZeroReportInterval,
}

impl Config {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Resolves defaults, the optional config file and flags, then validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file fails to load or the result is invalid.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Overlays every flag that was given onto this config.
    pub fn apply_cli(&mut self, cli: &Cli) {
        let overlay = |slot: &mut f64, value: Option<f64>| {
            if let Some(value) = value {
                *slot = value;
            }
        };
        overlay(&mut self.pendulum.length, cli.length);
        overlay(&mut self.pendulum.mass, cli.mass);
        overlay(&mut self.pendulum.angle_deg, cli.angle_deg);
        overlay(&mut self.controls.gravity, cli.gravity);
        overlay(&mut self.controls.damping, cli.damping);
        overlay(&mut self.run.duration, cli.duration);

        if cli.no_trail {
            self.controls.show_trail = false;
        }
        if cli.paused {
            self.controls.running = false;
        }
        if cli.realtime {
            self.run.realtime = true;
        }
        if let Some(fps) = cli.fps {
            self.run.fps = fps;
        }
        if let Some(every) = cli.report_every {
            self.run.report_every = every;
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range("pendulum.length", self.pendulum.length, LENGTH_RANGE)?;
        in_range("pendulum.mass", self.pendulum.mass, MASS_RANGE)?;
        finite("pendulum.angle_deg", self.pendulum.angle_deg)?;
        in_range("controls.gravity", self.controls.gravity, GRAVITY_RANGE)?;
        in_range("controls.damping", self.controls.damping, DAMPING_RANGE)?;
        in_range(
            "run.duration",
            self.run.duration,
            ControlRange::new(0.0, MAX_DURATION),
        )?;
        if !(MIN_FPS..=MAX_FPS).contains(&self.run.fps) {
            return Err(ConfigError::InvalidFps(self.run.fps));
        }
        if self.run.report_every == 0 {
            return Err(ConfigError::ZeroReportInterval);
        }
        finite("projection.pivot_x", self.projection.pivot_x)?;
        finite("projection.pivot_y", self.projection.pivot_y)?;
        finite(
            "projection.pixels_per_meter",
            self.projection.pixels_per_meter,
        )?;
        Ok(())
    }

    /// Number of frames needed to cover `run.duration` at `run.fps`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "duration is validated to a non-negative bounded range"
    )]
    pub fn frame_count(&self) -> u64 {
        (self.run.duration * f64::from(self.run.fps)).round().max(0.0) as u64
    }

    /// Builds the initial session for this config.
    ///
    /// Integration steps stay capped at [`MAX_FRAME_DELTA`]. Below 60 fps a
    /// tick covers one whole frame in several such steps, so a headless run
    /// still covers `run.duration` of simulated time.
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        let state = PendulumState::initial()
            .with_length(self.pendulum.length)
            .with_mass(self.pendulum.mass)
            .with_angle(self.pendulum.angle_deg.to_radians());
        let controls = SimulationControls::initial()
            .with_gravity(self.controls.gravity)
            .with_damping(self.controls.damping)
            .with_running(self.controls.running)
            .with_trail_visible(self.controls.show_trail);
        let projection = Projection::new(
            Point::new(self.projection.pivot_x, self.projection.pivot_y),
            self.projection.pixels_per_meter,
        );

        SessionOptions::new()
            .state(state)
            .controls(controls)
            .projection(projection)
            .max_frame_delta(MAX_FRAME_DELTA)
            .max_frame_time((1.0 / f64::from(self.run.fps)).max(MAX_FRAME_DELTA))
    }

    /// Serializes the config back to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn in_range(field: &'static str, value: f64, range: ControlRange) -> Result<(), ConfigError> {
    finite(field, value)?;
    if range.contains(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: range.min,
            max: range.max,
        })
    }
}
