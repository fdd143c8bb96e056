//! Frame scheduling.
//!
//! The session never sleeps or reads a clock itself. It asks a
//! [`FrameScheduler`] for the next frame and receives the elapsed time, or
//! `None` once the schedule is cancelled or exhausted. Hosts plug in a
//! real-time scheduler, a scripted one for headless runs, or their own.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Lowest frame rate a scheduler accepts.
pub const MIN_FPS: u32 = 1;

/// Highest frame rate a scheduler accepts.
pub const MAX_FPS: u32 = 240;

/// Frame rate used when none is configured.
pub const DEFAULT_FPS: u32 = 60;

/// Returns the frame length for `fps`, clamped to `MIN_FPS..=MAX_FPS`.
///
/// # Example
///
/// ```rust
/// use pendulum_loop::frame_duration;
/// use std::time::Duration;
///
/// assert_eq!(frame_duration(50), Duration::from_millis(20));
/// assert_eq!(frame_duration(0), Duration::from_secs(1));
/// ```
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.clamp(MIN_FPS, MAX_FPS)))
}

/// Source of frame signals for a session.
pub trait FrameScheduler {
    /// Waits for the next frame and returns the time elapsed since the
    /// previous one, or `None` when no further frames will come.
    fn next_frame(&mut self) -> Option<Duration>;
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn next_frame(&mut self) -> Option<Duration> {
        (**self).next_frame()
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Box<S> {
    fn next_frame(&mut self) -> Option<Duration> {
        (**self).next_frame()
    }
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Shared cancellation flag for frame schedulers.
///
/// Cancelling wakes any scheduler currently waiting for a frame, so no tick
/// fires after teardown.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the token and wakes every waiter.
    pub fn cancel(&self) {
        let mut cancelled = self.state.cancelled.lock();
        *cancelled = true;
        self.state.wake.notify_all();
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        *self.state.cancelled.lock()
    }

    /// Blocks for up to `timeout`, returning early if the token is cancelled.
    ///
    /// Returns `true` if the token is cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cancelled = self.state.cancelled.lock();
        while !*cancelled {
            if self.state.wake.wait_until(&mut cancelled, deadline).timed_out() {
                break;
            }
        }
        *cancelled
    }
}

/// Real-time scheduler that paces frames at a fixed rate.
///
/// Each call sleeps until one frame length after the previous frame and
/// reports the wall-clock time that actually passed.
#[derive(Debug)]
pub struct IntervalScheduler {
    frame: Duration,
    last: Instant,
    cancel: CancelToken,
}

impl IntervalScheduler {
    /// Creates a scheduler running at `fps` (clamped to `MIN_FPS..=MAX_FPS`).
    pub fn new(fps: u32, cancel: CancelToken) -> Self {
        Self {
            frame: frame_duration(fps),
            last: Instant::now(),
            cancel,
        }
    }

    /// The target frame length.
    pub const fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// The token that stops this scheduler.
    pub const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

impl FrameScheduler for IntervalScheduler {
    fn next_frame(&mut self) -> Option<Duration> {
        let wait = (self.last + self.frame).saturating_duration_since(Instant::now());
        if self.cancel.wait_timeout(wait) {
            tracing::debug!("frame scheduler cancelled");
            return None;
        }
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        Some(elapsed)
    }
}

/// Scheduler that replays a fixed list of frame deltas.
///
/// Used for headless runs and tests: the sequence of deltas fully determines
/// the simulation, and nothing sleeps.
///
/// # Example
///
/// ```rust
/// use pendulum_loop::{FrameScheduler, ScriptedScheduler};
/// use std::time::Duration;
///
/// let mut frames = ScriptedScheduler::fixed(50, 2);
/// assert_eq!(frames.next_frame(), Some(Duration::from_millis(20)));
/// assert_eq!(frames.next_frame(), Some(Duration::from_millis(20)));
/// assert_eq!(frames.next_frame(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedScheduler {
    deltas: VecDeque<Duration>,
    cancel: Option<CancelToken>,
}

impl ScriptedScheduler {
    /// Creates a scheduler that yields `deltas` in order.
    pub fn new(deltas: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            deltas: deltas.into_iter().collect(),
            cancel: None,
        }
    }

    /// Creates a scheduler yielding `frames` frames at a steady `fps`.
    pub fn fixed(fps: u32, frames: usize) -> Self {
        Self::new(std::iter::repeat_n(frame_duration(fps), frames))
    }

    /// Stops yielding frames once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Queues one more frame.
    pub fn push(&mut self, delta: Duration) {
        self.deltas.push_back(delta);
    }

    /// Number of frames left.
    pub fn remaining(&self) -> usize {
        self.deltas.len()
    }
}

impl FrameScheduler for ScriptedScheduler {
    fn next_frame(&mut self) -> Option<Duration> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return None;
        }
        self.deltas.pop_front()
    }
}

/// Headless scheduler reporting a constant frame length without sleeping.
///
/// Runs forever unless cancelled; pair it with [`FrameLimit`] for a bounded
/// run.
#[derive(Debug, Clone)]
pub struct SteadyScheduler {
    frame: Duration,
    cancel: Option<CancelToken>,
}

impl SteadyScheduler {
    /// Creates a scheduler reporting one frame at `fps` per call.
    pub fn new(fps: u32) -> Self {
        Self {
            frame: frame_duration(fps),
            cancel: None,
        }
    }

    /// Stops yielding frames once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl FrameScheduler for SteadyScheduler {
    fn next_frame(&mut self) -> Option<Duration> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return None;
        }
        Some(self.frame)
    }
}

/// Adapter that ends a schedule after a fixed number of frames.
///
/// # Example
///
/// ```rust
/// use pendulum_loop::{FrameLimit, FrameScheduler, SteadyScheduler};
///
/// let mut frames = FrameLimit::new(SteadyScheduler::new(60), 3);
/// assert_eq!(std::iter::from_fn(|| frames.next_frame()).count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct FrameLimit<S> {
    inner: S,
    remaining: u64,
}

impl<S> FrameLimit<S> {
    /// Wraps `inner`, yielding at most `frames` frames.
    pub const fn new(inner: S, frames: u64) -> Self {
        Self {
            inner,
            remaining: frames,
        }
    }

    /// Frames still allowed.
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns the wrapped scheduler.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: FrameScheduler> FrameScheduler for FrameLimit<S> {
    fn next_frame(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        let elapsed = self.inner.next_frame()?;
        self.remaining -= 1;
        Some(elapsed)
    }
}
