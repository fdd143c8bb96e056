//! Command-line interface for the `pendulum` binary.
//!
//! # Examples
//!
//! ```bash
//! # Ten simulated seconds with the default pendulum, reported once a second
//! pendulum --duration 10
//!
//! # Undamped, longer string, JSON lines every frame
//! pendulum --damping 0 --length 3 --format json --report-every 1
//!
//! # Start from a config file and override gravity
//! pendulum --config moon.toml --gravity 1.62
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Headless damped-pendulum simulator.
///
/// Runs the physics at a fixed frame rate and prints periodic readouts of
/// angle, energy and period.
#[derive(Parser, Debug, Clone, Default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "CLI flags are naturally bools"
)]
#[command(name = "pendulum", author, version, about)]
pub struct Cli {
    /// TOML config file
    ///
    /// Values from the file sit between built-in defaults and flags
    #[arg(long, short = 'c', env = "PENDULUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// String length in meters (0.5 to 4)
    #[arg(long, env = "PENDULUM_LENGTH")]
    pub length: Option<f64>,

    /// Bob mass in kilograms (0.5 to 2)
    #[arg(long, env = "PENDULUM_MASS")]
    pub mass: Option<f64>,

    /// Gravitational acceleration in m/s² (1 to 20)
    #[arg(long, env = "PENDULUM_GRAVITY")]
    pub gravity: Option<f64>,

    /// Damping in percent (0 to 100)
    #[arg(long, env = "PENDULUM_DAMPING")]
    pub damping: Option<f64>,

    /// Release angle in degrees from straight down
    #[arg(long, allow_negative_numbers = true)]
    pub angle_deg: Option<f64>,

    /// Do not record trail points
    #[arg(long)]
    pub no_trail: bool,

    /// Start paused
    #[arg(long)]
    pub paused: bool,

    /// Simulated seconds to run
    #[arg(long, short = 'd', env = "PENDULUM_DURATION")]
    pub duration: Option<f64>,

    /// Frames per second (1 to 240)
    #[arg(long, env = "PENDULUM_FPS")]
    pub fps: Option<u32>,

    /// Pace frames against the wall clock instead of running flat out
    #[arg(long)]
    pub realtime: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print a readout every N frames
    #[arg(long, env = "PENDULUM_REPORT_EVERY")]
    pub report_every: Option<u64>,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Report output formats.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter directive implied by `-v`.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["pendulum"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.length.is_none());
        assert!(!cli.no_trail);
        assert!(!cli.paused);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn cli_physics_flags() {
        let cli = Cli::try_parse_from([
            "pendulum",
            "--length",
            "3.5",
            "--mass",
            "1.5",
            "--gravity",
            "1.62",
            "--damping",
            "0",
            "--angle-deg",
            "-30",
        ])
        .unwrap();
        assert_eq!(cli.length, Some(3.5));
        assert_eq!(cli.mass, Some(1.5));
        assert_eq!(cli.gravity, Some(1.62));
        assert_eq!(cli.damping, Some(0.0));
        assert_eq!(cli.angle_deg, Some(-30.0));
    }

    #[test]
    fn cli_run_flags() {
        let cli = Cli::try_parse_from([
            "pendulum",
            "--no-trail",
            "--paused",
            "-d",
            "2.5",
            "--fps",
            "120",
            "--realtime",
            "-f",
            "json",
            "--report-every",
            "10",
        ])
        .unwrap();
        assert!(cli.no_trail);
        assert!(cli.paused);
        assert_eq!(cli.duration, Some(2.5));
        assert_eq!(cli.fps, Some(120));
        assert!(cli.realtime);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.report_every, Some(10));
    }

    #[test]
    fn cli_verbosity_counts() {
        let cli = Cli::try_parse_from(["pendulum", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level(), "debug");
        let cli = Cli::try_parse_from(["pendulum", "-vvvv"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
    }

    #[test]
    fn cli_rejects_bad_format() {
        assert!(Cli::try_parse_from(["pendulum", "--format", "yaml"]).is_err());
    }

    #[test]
    fn cli_rejects_non_numeric_length() {
        assert!(Cli::try_parse_from(["pendulum", "--length", "long"]).is_err());
    }
}
