#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]

//! # Pendulum Loop
//!
//! Drives the [`pendulum`] core one frame at a time.
//!
//! A [`Session`] owns the state and controls and is the only writer. Each
//! frame it asks a [`FrameScheduler`] for the elapsed time, clamps it, steps
//! the physics and publishes an immutable [`Snapshot`]. Readers clone a
//! [`SnapshotReader`] and see whole ticks only.
//!
//! ## Example
//!
//! ```rust
//! use pendulum_loop::{ScriptedScheduler, Session, SessionOptions, TickKind};
//!
//! let mut session = Session::new(SessionOptions::default());
//! session.set_damping(0.0);
//!
//! let stats = session.run(&mut ScriptedScheduler::fixed(60, 60));
//! assert_eq!(stats.advanced, 60);
//!
//! session.set_running(false);
//! assert_eq!(session.tick_seconds(1.0 / 60.0), TickKind::Paused);
//! ```
//!
//! ## Features
//!
//! - `async`: [`Session::run_async`] on a tokio interval, stopped by a
//!   `tokio_util` cancellation token

pub mod scheduler;
pub mod session;

pub use scheduler::{
    CancelToken, DEFAULT_FPS, FrameLimit, FrameScheduler, IntervalScheduler, MAX_FPS, MIN_FPS,
    ScriptedScheduler, SteadyScheduler, frame_duration,
};
pub use session::{
    MAX_FRAME_DELTA, RunStats, Session, SessionOptions, Snapshot, SnapshotReader, TickKind,
    clamp_delta,
};
