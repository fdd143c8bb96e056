#![forbid(unsafe_code)]

//! # Pendulum CLI
//!
//! Headless runner for the [`pendulum`] simulation.
//!
//! - [`cli`]: flag definitions
//! - [`config`]: TOML configuration, flag overlay and validation
//! - [`run`]: the frame loop wired to a scheduler and a reporter
//! - [`report`]: text and JSON-lines readouts

pub mod cli;
pub mod config;
pub mod report;
pub mod run;

pub use cli::{Cli, OutputFormat};
pub use config::{Config, ConfigError};
pub use report::{Record, Reporter};
pub use run::{RunSummary, run, scheduler_for};
