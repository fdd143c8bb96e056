//! Periodic readouts in text or JSON-lines form.

use std::io::{self, Write};

use pendulum::{Point, Projection, Readout, Trail};
use pendulum_loop::{RunStats, Snapshot};
use serde::Serialize;

use crate::cli::OutputFormat;

/// One line of JSON output.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record<'a> {
    /// A periodic readout.
    Frame {
        /// Ticks applied so far.
        frame: u64,
        /// Simulated seconds so far.
        time: f64,
        /// Whether the simulation was running.
        running: bool,
        /// Angle in radians.
        angle: f64,
        /// Angular velocity in rad/s.
        angular_velocity: f64,
        /// Bob position in trail coordinates.
        bob: Point,
        /// Points currently in the trail.
        trail_len: usize,
        /// Derived quantities.
        readout: Readout,
    },
    /// End-of-run totals.
    Summary {
        /// Tick counters for the run.
        frames: u64,
        /// Ticks that advanced physics.
        advanced: u64,
        /// Ticks skipped while paused.
        paused: u64,
        /// Ticks with nothing to integrate.
        idle: u64,
        /// Ticks the core refused.
        rejected: u64,
        /// Simulated seconds covered.
        time: f64,
        /// Final derived quantities.
        readout: Readout,
        /// Final trail, oldest point first.
        trail: &'a Trail,
    },
}

/// Writes readouts every `every` frames.
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
    format: OutputFormat,
    every: u64,
    projection: Projection,
    flush_each: bool,
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter. An interval of zero is treated as one.
    pub fn new(out: W, format: OutputFormat, every: u64, projection: Projection) -> Self {
        Self {
            out,
            format,
            every: every.max(1),
            projection,
            flush_each: false,
        }
    }

    /// Flushes the writer after every record, so a paced run that is killed
    /// midway still leaves its readouts behind.
    #[must_use]
    pub const fn flush_each(mut self, flush: bool) -> Self {
        self.flush_each = flush;
        self
    }

    /// Writes a readout if `snapshot.frame` falls on the interval.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn frame(&mut self, snapshot: &Snapshot, time: f64) -> io::Result<()> {
        if snapshot.frame % self.every != 0 {
            return Ok(());
        }
        self.write_frame(snapshot, time)?;
        if self.flush_each {
            self.out.flush()?;
        }
        Ok(())
    }

    fn write_frame(&mut self, snapshot: &Snapshot, time: f64) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let readout = &snapshot.readout;
                writeln!(
                    self.out,
                    "t={time:>8.3}s frame={:>6} angle={:>8.2}° omega={:>8.3} rad/s energy={:>7.3} J ({:>3.0}%){}",
                    snapshot.frame,
                    readout.angle_degrees,
                    snapshot.state.angular_velocity,
                    readout.total,
                    readout.gauge * 100.0,
                    if snapshot.controls.is_running {
                        ""
                    } else {
                        " [paused]"
                    },
                )
            }
            OutputFormat::Json => self.json(&Record::Frame {
                frame: snapshot.frame,
                time,
                running: snapshot.controls.is_running,
                angle: snapshot.state.angle,
                angular_velocity: snapshot.state.angular_velocity,
                bob: self.projection.bob(&snapshot.state),
                trail_len: snapshot.state.trail.len(),
                readout: snapshot.readout,
            }),
        }
    }

    /// Writes the end-of-run summary.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn summary(&mut self, snapshot: &Snapshot, stats: &RunStats, time: f64) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "--")?;
                writeln!(
                    self.out,
                    "Frames: {} (advanced {}, paused {}, idle {}, rejected {})",
                    stats.frames, stats.advanced, stats.paused, stats.idle, stats.rejected
                )?;
                writeln!(self.out, "Simulated: {time:.3} s")?;
                writeln!(self.out, "Trail: {} points", snapshot.state.trail.len())?;
                writeln!(self.out, "{}", snapshot.readout)
            }
            OutputFormat::Json => self.json(&Record::Summary {
                frames: stats.frames,
                advanced: stats.advanced,
                paused: stats.paused,
                idle: stats.idle,
                rejected: stats.rejected,
                time,
                readout: snapshot.readout,
                trail: &snapshot.state.trail,
            }),
        }
    }

    /// Flushes and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns any error from flushing.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn json(&mut self, record: &Record<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)
    }
}
