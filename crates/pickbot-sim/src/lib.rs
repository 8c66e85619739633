//! Step-by-step playback of a planned pick route.
//!
//! A [`StepScheduler`] holds one session and moves the robot one cell per
//! [`tick`](StepScheduler::tick), reporting progress as [`SimEvent`]s over a
//! channel. [`run`] drives the ticks at a [`Cadence`], waiting through a
//! [`Ticker`] so tests can replace real sleeps with a [`ManualTicker`].

pub mod cadence;
pub mod config;
pub mod events;
pub mod scheduler;

pub use cadence::{
    Cadence, Context, Control, ManualTicker, RunOutcome, SleepTicker, Ticker, run,
};
pub use config::SimConfig;
pub use events::SimEvent;
pub use scheduler::{RunState, SessionSnapshot, StepScheduler};
