//! Drives a session from a resolved [`Config`] and reports as it goes.

use std::io::{self, Write};

use pendulum_loop::{
    CancelToken, FrameLimit, FrameScheduler, IntervalScheduler, RunStats, Session, SteadyScheduler,
    TickKind, clamp_delta,
};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::report::Reporter;

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Tick counters.
    pub stats: RunStats,
    /// Simulated seconds covered.
    pub simulated: f64,
}

/// Builds the scheduler a config asks for.
///
/// Headless runs step as fast as possible; `run.realtime` paces against the
/// wall clock. Either way the run ends after `run.duration`, or sooner if the
/// caller cancels `cancel`.
pub fn scheduler_for(config: &Config, cancel: CancelToken) -> Box<dyn FrameScheduler> {
    let frames = config.frame_count();
    if config.run.realtime {
        Box::new(FrameLimit::new(
            IntervalScheduler::new(config.run.fps, cancel),
            frames,
        ))
    } else {
        Box::new(FrameLimit::new(
            SteadyScheduler::new(config.run.fps).with_cancel(cancel),
            frames,
        ))
    }
}

/// Runs `config` to completion, writing readouts to `out`.
///
/// # Errors
///
/// Returns any error from writing the report.
pub fn run<W: Write>(
    config: &Config,
    format: OutputFormat,
    scheduler: &mut dyn FrameScheduler,
    out: W,
) -> io::Result<RunSummary> {
    let options = config.session_options();
    let projection = options.projection;
    let frame_time = options.max_frame_time;
    let mut session = Session::new(options);
    let mut reporter = Reporter::new(out, format, config.run.report_every, projection)
        .flush_each(config.run.realtime);

    tracing::info!(
        frames = config.frame_count(),
        fps = config.run.fps,
        realtime = config.run.realtime,
        "starting run"
    );

    let mut simulated = 0.0;
    reporter.frame(&session.snapshot(), simulated)?;
    while let Some(elapsed) = scheduler.next_frame() {
        if session.tick(elapsed) == TickKind::Advanced {
            simulated += clamp_delta(elapsed.as_secs_f64(), frame_time);
        }
        reporter.frame(&session.snapshot(), simulated)?;
    }

    let stats = session.stats();
    reporter.summary(&session.snapshot(), &stats, simulated)?;
    reporter.finish()?;

    Ok(RunSummary { stats, simulated })
}
