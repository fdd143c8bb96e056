//! The simulation session: single owner of state and controls.
//!
//! A [`Session`] is the only thing that mutates the pendulum. Every tick or
//! control change replaces the published [`Snapshot`] with a new immutable
//! one, and readers holding a [`SnapshotReader`] clone the `Arc` of whatever
//! snapshot is current. A reader therefore sees either the whole tick or
//! none of it.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use pendulum::{
    LENGTH_RANGE, MASS_RANGE, PendulumState, Projection, Readout, SimulationControls, StepError,
    StepOutcome, reset, reset_trail, try_step,
};

use crate::scheduler::FrameScheduler;

/// Longest frame delta a tick integrates, in seconds.
///
/// Longer gaps (a backgrounded window, a dropped frame) are cut to this so a
/// single tick never jumps far.
pub const MAX_FRAME_DELTA: f64 = 1.0 / 60.0;

/// Clamps a frame delta to `[0, max]` seconds. Non-finite input becomes 0.
///
/// # Example
///
/// ```rust
/// use pendulum_loop::{clamp_delta, MAX_FRAME_DELTA};
///
/// assert_eq!(clamp_delta(0.5, MAX_FRAME_DELTA), MAX_FRAME_DELTA);
/// assert_eq!(clamp_delta(-1.0, MAX_FRAME_DELTA), 0.0);
/// assert_eq!(clamp_delta(f64::NAN, MAX_FRAME_DELTA), 0.0);
/// ```
pub fn clamp_delta(seconds: f64, max: f64) -> f64 {
    if seconds.is_finite() {
        seconds.clamp(0.0, max.max(0.0))
    } else {
        0.0
    }
}

/// Number of equal sub-steps needed to cover `dt` with none longer than
/// `max_step`. Always at least one.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the ratio is finite and positive, and `as` saturates"
)]
fn substeps(dt: f64, max_step: f64) -> u32 {
    if !(dt > 0.0 && max_step > 0.0) {
        return 1;
    }
    let ratio = dt / max_step;
    if !ratio.is_finite() {
        return MAX_SUBSTEPS;
    }
    (ratio.ceil() as u32).clamp(1, MAX_SUBSTEPS)
}

/// Upper bound on sub-steps per tick.
const MAX_SUBSTEPS: u32 = 10_000;

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Number of ticks applied before this snapshot was taken.
    pub frame: u64,
    /// Pendulum state.
    pub state: PendulumState,
    /// Controls in effect.
    pub controls: SimulationControls,
    /// Derived quantities for `state` under `controls`.
    pub readout: Readout,
}

impl Snapshot {
    fn capture(frame: u64, state: &PendulumState, controls: &SimulationControls) -> Self {
        Self {
            frame,
            state: state.clone(),
            controls: *controls,
            readout: Readout::new(state, controls),
        }
    }
}

/// Cloneable read handle to the latest published [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    shared: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotReader {
    /// Returns the most recent snapshot.
    pub fn latest(&self) -> Arc<Snapshot> {
        Arc::clone(&self.shared.read())
    }
}

/// How one tick was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Physics advanced.
    Advanced,
    /// Controls were paused; nothing changed.
    Paused,
    /// The clamped delta was zero; nothing changed.
    Idle,
    /// The core refused the tick; the previous state was kept.
    Rejected,
}

/// Tick counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Ticks received.
    pub frames: u64,
    /// Ticks that advanced physics.
    pub advanced: u64,
    /// Ticks skipped while paused.
    pub paused: u64,
    /// Ticks with nothing to integrate.
    pub idle: u64,
    /// Ticks the core rejected.
    pub rejected: u64,
}

impl RunStats {
    fn record(&mut self, kind: TickKind) {
        self.frames += 1;
        match kind {
            TickKind::Advanced => self.advanced += 1,
            TickKind::Paused => self.paused += 1,
            TickKind::Idle => self.idle += 1,
            TickKind::Rejected => self.rejected += 1,
        }
    }

    /// Counts accumulated since `earlier` was taken.
    pub const fn since(&self, earlier: &Self) -> Self {
        Self {
            frames: self.frames - earlier.frames,
            advanced: self.advanced - earlier.advanced,
            paused: self.paused - earlier.paused,
            idle: self.idle - earlier.idle,
            rejected: self.rejected - earlier.rejected,
        }
    }
}

/// Options for starting a [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Starting pendulum state.
    pub state: PendulumState,
    /// Starting controls.
    pub controls: SimulationControls,
    /// Rendering projection for trail points.
    pub projection: Projection,
    /// Longest single integration step, seconds.
    pub max_frame_delta: f64,
    /// Longest elapsed time one tick covers, seconds. A tick longer than
    /// `max_frame_delta` is integrated as equal consecutive sub-steps.
    pub max_frame_time: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            state: PendulumState::initial(),
            controls: SimulationControls::initial(),
            projection: Projection::default(),
            max_frame_delta: MAX_FRAME_DELTA,
            max_frame_time: MAX_FRAME_DELTA,
        }
    }
}

impl SessionOptions {
    /// Creates options with the initial state and controls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting state.
    pub fn state(mut self, state: PendulumState) -> Self {
        self.state = state;
        self
    }

    /// Sets the starting controls.
    pub const fn controls(mut self, controls: SimulationControls) -> Self {
        self.controls = controls;
        self
    }

    /// Sets the trail projection.
    pub const fn projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Sets the integration step cap in seconds.
    pub const fn max_frame_delta(mut self, seconds: f64) -> Self {
        self.max_frame_delta = seconds;
        self
    }

    /// Sets how much elapsed time one tick may cover, in seconds.
    pub const fn max_frame_time(mut self, seconds: f64) -> Self {
        self.max_frame_time = seconds;
        self
    }
}

/// Owns the pendulum between ticks and publishes snapshots.
///
/// # Example
///
/// ```rust
/// use pendulum_loop::{ScriptedScheduler, Session, SessionOptions};
///
/// let mut session = Session::new(SessionOptions::default());
/// let reader = session.reader();
///
/// let stats = session.run(&mut ScriptedScheduler::fixed(60, 120));
/// assert_eq!(stats.advanced, 120);
/// assert_eq!(reader.latest().frame, 120);
/// ```
#[derive(Debug)]
pub struct Session {
    state: PendulumState,
    controls: SimulationControls,
    projection: Projection,
    max_frame_delta: f64,
    max_frame_time: f64,
    frame: u64,
    stats: RunStats,
    shared: Arc<RwLock<Arc<Snapshot>>>,
}

impl Session {
    /// Starts a session from `options`.
    pub fn new(options: SessionOptions) -> Self {
        let SessionOptions {
            state,
            controls,
            projection,
            max_frame_delta,
            max_frame_time,
        } = options;
        let snapshot = Arc::new(Snapshot::capture(0, &state, &controls));

        tracing::info!(
            length = state.length,
            mass = state.mass,
            gravity = controls.gravity,
            damping = controls.damping,
            "pendulum session started"
        );

        Self {
            state,
            controls,
            projection,
            max_frame_delta,
            max_frame_time,
            frame: 0,
            stats: RunStats::default(),
            shared: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Returns a handle that always reads the latest snapshot.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.shared.read())
    }

    /// Current pendulum state.
    pub const fn state(&self) -> &PendulumState {
        &self.state
    }

    /// Current controls.
    pub const fn controls(&self) -> &SimulationControls {
        &self.controls
    }

    /// Number of ticks applied so far.
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Tick counters since the session started.
    pub const fn stats(&self) -> RunStats {
        self.stats
    }

    /// Applies one tick of `elapsed` wall-clock time.
    pub fn tick(&mut self, elapsed: Duration) -> TickKind {
        self.tick_seconds(elapsed.as_secs_f64())
    }

    /// Applies one tick of `seconds`, clamped to the session's frame time.
    ///
    /// The clamped time is integrated in equal sub-steps no longer than the
    /// step cap, in order. If any sub-step fails the whole tick is dropped.
    pub fn tick_seconds(&mut self, seconds: f64) -> TickKind {
        let dt = clamp_delta(seconds, self.max_frame_time);
        let kind = match self.integrate(dt) {
            Ok(StepOutcome::Advanced(next)) => {
                self.state = next;
                TickKind::Advanced
            }
            Ok(StepOutcome::Paused) => TickKind::Paused,
            Ok(StepOutcome::Idle) => TickKind::Idle,
            Err(error) => {
                tracing::warn!(frame = self.frame, %error, "tick rejected; keeping previous state");
                TickKind::Rejected
            }
        };

        self.frame += 1;
        self.stats.record(kind);
        tracing::trace!(frame = self.frame, ?kind, dt, "tick");
        self.publish();
        kind
    }

    /// Runs until `scheduler` stops yielding frames.
    ///
    /// Returns the counters for this run only.
    pub fn run<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> RunStats {
        self.run_with(scheduler, |_, _| {})
    }

    /// Runs until `scheduler` stops, calling `on_frame` after every tick.
    pub fn run_with<S, F>(&mut self, scheduler: &mut S, mut on_frame: F) -> RunStats
    where
        S: FrameScheduler + ?Sized,
        F: FnMut(&Snapshot, TickKind),
    {
        let before = self.stats;
        while let Some(elapsed) = scheduler.next_frame() {
            let kind = self.tick(elapsed);
            on_frame(&self.snapshot(), kind);
        }
        let stats = self.stats.since(&before);
        tracing::info!(
            frames = stats.frames,
            advanced = stats.advanced,
            rejected = stats.rejected,
            "frame loop stopped"
        );
        stats
    }

    /// Runs on the tokio runtime at `fps` until `cancel` fires.
    #[cfg(feature = "async")]
    pub async fn run_async(
        &mut self,
        fps: u32,
        cancel: tokio_util::sync::CancellationToken,
    ) -> RunStats {
        use tokio::time::{Instant, MissedTickBehavior, interval};

        let before = self.stats;
        let mut frames = interval(crate::scheduler::frame_duration(fps));
        frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                now = frames.tick() => {
                    let elapsed = now.saturating_duration_since(last);
                    last = now;
                    self.tick(elapsed);
                }
            }
        }

        let stats = self.stats.since(&before);
        tracing::info!(frames = stats.frames, "async frame loop cancelled");
        stats
    }

    /// Sets the string length, clamped to [`LENGTH_RANGE`]. Non-finite
    /// input is ignored.
    pub fn set_length(&mut self, length: f64) {
        if !length.is_finite() {
            return;
        }
        self.replace_state(self.state.clone().with_length(LENGTH_RANGE.clamp(length)));
        tracing::debug!(length = self.state.length, "length changed");
    }

    /// Sets the bob mass, clamped to [`MASS_RANGE`]. Non-finite input is
    /// ignored.
    pub fn set_mass(&mut self, mass: f64) {
        if !mass.is_finite() {
            return;
        }
        self.replace_state(self.state.clone().with_mass(MASS_RANGE.clamp(mass)));
        tracing::debug!(mass = self.state.mass, "mass changed");
    }

    /// Sets gravity, clamped to the slider range.
    pub fn set_gravity(&mut self, gravity: f64) {
        self.replace_controls(self.controls.with_gravity(gravity));
        tracing::debug!(gravity = self.controls.gravity, "gravity changed");
    }

    /// Sets damping in percent, clamped to the slider range.
    pub fn set_damping(&mut self, damping: f64) {
        self.replace_controls(self.controls.with_damping(damping));
        tracing::debug!(damping = self.controls.damping, "damping changed");
    }

    /// Pauses or resumes the simulation.
    pub fn set_running(&mut self, running: bool) {
        self.replace_controls(self.controls.with_running(running));
        tracing::debug!(running, "running changed");
    }

    /// Flips between running and paused; returns the new running flag.
    pub fn toggle_running(&mut self) -> bool {
        let running = !self.controls.is_running;
        self.set_running(running);
        running
    }

    /// Starts or stops recording trail points. The existing trail is kept.
    pub fn set_trail_visible(&mut self, visible: bool) {
        self.replace_controls(self.controls.with_trail_visible(visible));
        tracing::debug!(visible, "trail visibility changed");
    }

    /// Replaces the controls with `f(current)`.
    pub fn update_controls(&mut self, f: impl FnOnce(SimulationControls) -> SimulationControls) {
        self.replace_controls(f(self.controls));
    }

    /// Empties the trail without touching the motion.
    pub fn clear_trail(&mut self) {
        self.replace_state(reset_trail(&self.state));
        tracing::debug!("trail cleared");
    }

    /// Restores the initial state and controls and resumes running.
    pub fn reset(&mut self) {
        let (state, controls) = reset();
        self.state = state;
        self.controls = controls;
        self.publish();
        tracing::info!("pendulum session reset");
    }

    fn integrate(&self, dt: f64) -> Result<StepOutcome, StepError> {
        let steps = substeps(dt, self.max_frame_delta);
        let h = dt / f64::from(steps);
        let mut state = match try_step(&self.state, &self.controls, h, &self.projection)? {
            StepOutcome::Advanced(next) => next,
            other => return Ok(other),
        };
        for _ in 1..steps {
            state = try_step(&state, &self.controls, h, &self.projection)?.into_state(&state);
        }
        Ok(StepOutcome::Advanced(state))
    }

    fn replace_state(&mut self, state: PendulumState) {
        self.state = state;
        self.publish();
    }

    fn replace_controls(&mut self, controls: SimulationControls) {
        self.controls = controls;
        self.publish();
    }

    fn publish(&self) {
        let snapshot = Arc::new(Snapshot::capture(self.frame, &self.state, &self.controls));
        *self.shared.write() = snapshot;
    }
}
