#![forbid(unsafe_code)]

//! `pendulum`: run the damped pendulum simulation from the command line.

use std::io::{self, BufWriter};

use anyhow::Context;
use pendulum_cli::{Cli, Config, run, scheduler_for};
use pendulum_loop::CancelToken;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    let config = Config::from_cli(&cli).context("invalid configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let mut scheduler = scheduler_for(&config, CancelToken::new());
    let out = BufWriter::new(io::stdout().lock());
    let summary = run(&config, cli.format, scheduler.as_mut(), out)?;

    tracing::info!(
        frames = summary.stats.frames,
        simulated = summary.simulated,
        "run finished"
    );
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
