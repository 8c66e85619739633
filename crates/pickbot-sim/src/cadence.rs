//! Driving a [`StepScheduler`] at a steady pace.
//!
//! The pace comes from a [`Cadence`] and the waiting from a [`Ticker`], so
//! tests can run whole sessions with a [`ManualTicker`] and no real delays.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::scheduler::{RunState, StepScheduler};

pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 10.0;
pub const DEFAULT_BASE_PERIOD: Duration = Duration::from_millis(500);

/// Tick period: `base_period / speed_multiplier`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    base_period: Duration,
    speed_multiplier: f64,
}

impl Cadence {
    /// Multipliers are clamped to `[MIN_SPEED, MAX_SPEED]`; a non-finite one
    /// counts as 1.
    pub fn new(base_period: Duration, speed_multiplier: f64) -> Self {
        let mut c = Self {
            base_period,
            speed_multiplier: 1.0,
        };
        c.set_speed(speed_multiplier);
        c
    }

    pub fn base_period(&self) -> Duration {
        self.base_period
    }

    pub fn speed(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn set_speed(&mut self, multiplier: f64) {
        self.speed_multiplier = if multiplier.is_finite() {
            multiplier.clamp(MIN_SPEED, MAX_SPEED)
        } else {
            1.0
        };
    }

    /// Time between two ticks. Faster multipliers give shorter periods.
    pub fn period(&self) -> Duration {
        self.base_period.div_f64(self.speed_multiplier)
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PERIOD, 1.0)
    }
}

/// Waits out one tick period.
pub trait Ticker {
    fn wait(&mut self, period: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepTicker;

impl Ticker for SleepTicker {
    fn wait(&mut self, period: Duration) {
        thread::sleep(period);
    }
}

/// Returns immediately, recording every requested period.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    waits: Vec<Duration>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    /// Simulated time spent waiting.
    pub fn elapsed(&self) -> Duration {
        self.waits.iter().sum()
    }
}

impl Ticker for ManualTicker {
    fn wait(&mut self, period: Duration) {
        self.waits.push(period);
    }
}

/// A cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands accepted by [`run`] between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Pause,
    Resume,
    TogglePause,
    Stop,
    SetSpeed(f64),
}

/// Why [`run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The robot reached the end of its path.
    Completed,
    /// The session was stopped by a [`Control::Stop`], or was not running.
    Stopped,
    /// The session is paused and the control channel is closed, so nothing
    /// can resume it from here.
    Paused,
    /// The context was cancelled; the session was stopped.
    Cancelled,
}

/// Tick `scheduler` at the cadence's pace until its session leaves the
/// running state.
///
/// Pending `controls` are applied before every tick. While paused, `run`
/// blocks on `controls` for at most one period at a time so cancellation is
/// still noticed.
pub fn run<T: Ticker>(
    scheduler: &mut StepScheduler,
    ticker: &mut T,
    cadence: &mut Cadence,
    ctx: &Context,
    controls: &Receiver<Control>,
) -> RunOutcome {
    let mut closed = false;
    loop {
        if ctx.is_done() {
            scheduler.stop();
            log::info!("sim: cancelled");
            return RunOutcome::Cancelled;
        }
        while !closed {
            match controls.try_recv() {
                Ok(c) => apply(scheduler, cadence, c),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => closed = true,
            }
        }
        match scheduler.state() {
            RunState::Running => {
                ticker.wait(cadence.period());
                if !ctx.is_done() {
                    scheduler.tick();
                }
            }
            RunState::Paused if closed => return RunOutcome::Paused,
            RunState::Paused => match controls.recv_timeout(cadence.period()) {
                Ok(c) => apply(scheduler, cadence, c),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => closed = true,
            },
            RunState::Completed => return RunOutcome::Completed,
            RunState::Idle => return RunOutcome::Stopped,
        }
    }
}

fn apply(scheduler: &mut StepScheduler, cadence: &mut Cadence, control: Control) {
    log::debug!("sim: {control:?}");
    match control {
        Control::Pause => {
            scheduler.pause();
        }
        Control::Resume => {
            scheduler.resume();
        }
        Control::TogglePause => {
            scheduler.toggle_pause();
        }
        Control::Stop => scheduler.stop(),
        Control::SetSpeed(m) => cadence.set_speed(m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SimEvent;
    use pickbot_core::layout;
    use pickbot_route::{PlanConfig, Planner, Route, ScenarioProfile};
    use std::sync::mpsc::{self, Sender};

    fn route() -> Arc<Route> {
        let grid = layout::parse("R...\n....\n....\n...P").unwrap();
        let planner = Planner::new(&grid, PlanConfig::default()).unwrap();
        Arc::new(planner.plan_in_order(&[]))
    }

    fn started() -> (StepScheduler, mpsc::Receiver<SimEvent>) {
        let (tx, rx) = mpsc::channel();
        let mut s = StepScheduler::new(tx, 5.0, ScenarioProfile::NORMAL);
        s.start(route());
        (s, rx)
    }

    /// A control channel with `cmds` queued and the sender dropped.
    fn controls(cmds: &[Control]) -> Receiver<Control> {
        let (tx, rx): (Sender<Control>, _) = mpsc::channel();
        for &c in cmds {
            tx.send(c).unwrap();
        }
        rx
    }

    /// Cancels the context after `n` waits.
    struct CancelAfter {
        n: usize,
        ctx: Context,
    }

    impl Ticker for CancelAfter {
        fn wait(&mut self, _period: Duration) {
            self.n = self.n.saturating_sub(1);
            if self.n == 0 {
                self.ctx.cancel();
            }
        }
    }

    #[test]
    fn period_scales_with_speed() {
        let base = Duration::from_millis(500);
        assert_eq!(Cadence::new(base, 1.0).period(), base);
        assert_eq!(Cadence::new(base, 2.0).period(), Duration::from_millis(250));
        assert_eq!(Cadence::new(base, 0.5).period(), Duration::from_secs(1));
        assert_eq!(Cadence::new(base, 100.0).speed(), MAX_SPEED);
        assert_eq!(Cadence::new(base, 0.0).speed(), MIN_SPEED);
        assert_eq!(Cadence::new(base, f64::NAN).speed(), 1.0);
        assert!(Cadence::new(base, 4.0).period() < Cadence::new(base, 3.0).period());
    }

    #[test]
    fn runs_session_to_completion() {
        let (mut s, rx) = started();
        let mut ticker = ManualTicker::new();
        let mut cadence = Cadence::new(Duration::from_millis(500), 2.0);
        let out = run(&mut s, &mut ticker, &mut cadence, &Context::new(), &controls(&[]));
        assert_eq!(out, RunOutcome::Completed);
        assert_eq!(ticker.waits().len(), 6);
        assert!(ticker.waits().iter().all(|&d| d == Duration::from_millis(250)));
        assert_eq!(ticker.elapsed(), Duration::from_millis(1500));
        assert!(matches!(rx.try_iter().last(), Some(SimEvent::Completed { .. })));
    }

    #[test]
    fn speed_change_applies_to_next_wait() {
        let (mut s, _rx) = started();
        let mut ticker = ManualTicker::new();
        let mut cadence = Cadence::default();
        let ctl = controls(&[Control::SetSpeed(4.0)]);
        run(&mut s, &mut ticker, &mut cadence, &Context::new(), &ctl);
        assert_eq!(ticker.waits()[0], Duration::from_millis(125));
    }

    #[test]
    fn cancellation_stops_the_session() {
        let (mut s, rx) = started();
        let ctx = Context::new();
        let mut ticker = CancelAfter {
            n: 2,
            ctx: ctx.clone(),
        };
        let out = run(&mut s, &mut ticker, &mut Cadence::default(), &ctx, &controls(&[]));
        assert_eq!(out, RunOutcome::Cancelled);
        assert_eq!(s.state(), RunState::Idle);
        assert_eq!(s.snapshot().step_index, 0);
        let events: Vec<SimEvent> = rx.try_iter().collect();
        let steps = events
            .iter()
            .filter(|e| matches!(e, SimEvent::Step { .. }))
            .count();
        assert_eq!(steps, 1);
        assert_eq!(events.last(), Some(&SimEvent::Stopped));
    }

    #[test]
    fn paused_with_closed_controls_returns() {
        let (mut s, _rx) = started();
        let mut ticker = ManualTicker::new();
        let mut cadence = Cadence::default();
        let ctx = Context::new();
        let out = run(&mut s, &mut ticker, &mut cadence, &ctx, &controls(&[Control::Pause]));
        assert_eq!(out, RunOutcome::Paused);
        assert!(ticker.waits().is_empty());

        s.resume();
        let out = run(&mut s, &mut ticker, &mut cadence, &ctx, &controls(&[]));
        assert_eq!(out, RunOutcome::Completed);
        assert_eq!(ticker.waits().len(), 6);
    }

    #[test]
    fn stop_control_ends_run() {
        let (mut s, rx) = started();
        let ctl = controls(&[Control::TogglePause, Control::TogglePause, Control::Stop]);
        let out = run(
            &mut s,
            &mut ManualTicker::new(),
            &mut Cadence::default(),
            &Context::new(),
            &ctl,
        );
        assert_eq!(out, RunOutcome::Stopped);
        let events: Vec<SimEvent> = rx.try_iter().collect();
        assert!(events.contains(&SimEvent::Paused));
        assert!(events.contains(&SimEvent::Resumed));
        assert_eq!(events.last(), Some(&SimEvent::Stopped));
    }

    #[test]
    fn idle_scheduler_returns_immediately() {
        let (tx, _rx) = mpsc::channel();
        let mut s = StepScheduler::new(tx, 5.0, ScenarioProfile::NORMAL);
        let mut ticker = ManualTicker::new();
        let out = run(
            &mut s,
            &mut ticker,
            &mut Cadence::default(),
            &Context::new(),
            &controls(&[]),
        );
        assert_eq!(out, RunOutcome::Stopped);
        assert!(ticker.waits().is_empty());
    }
}
