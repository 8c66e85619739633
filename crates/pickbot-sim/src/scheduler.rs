//! The step scheduler: a session state machine advanced one cell per tick.
//!
//! ```text
//!            start              pause
//!   Idle ───────────▶ Running ◀──────▶ Paused
//!    ▲                   │      resume
//!    │ stop (any)        │ last cell
//!    └───────────── Completed
//! ```
//!
//! The scheduler owns no timer. Something else calls [`StepScheduler::tick`]
//! (see [`run`](crate::run)), and every operation takes `&mut self`, so two
//! ticks on one session can never overlap.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use pickbot_core::Point;
use pickbot_route::{
    Metrics, Route, ScenarioProfile, StepNotification, StepTracker, compute_metrics,
};

use crate::events::SimEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Completed => "completed",
        })
    }
}

/// Point-in-time view of a session for display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSnapshot {
    pub state: RunState,
    pub step_index: usize,
    /// `None` when no route is loaded.
    pub position: Option<Point>,
    pub path_len: usize,
    /// Labels of collected waypoints, in route order.
    pub collected: Vec<String>,
    pub remaining_waypoints: usize,
    pub metrics: Metrics,
}

struct Session {
    route: Arc<Route>,
    index: usize,
    tracker: StepTracker,
}

impl Session {
    fn last_index(&self) -> usize {
        self.route.path.len().saturating_sub(1)
    }
}

pub struct StepScheduler {
    events: Sender<SimEvent>,
    travel_speed: f64,
    profile: ScenarioProfile,
    state: RunState,
    session: Option<Session>,
    metrics: Metrics,
}

impl StepScheduler {
    /// `travel_speed` is in metres per second; the profile's speed factor is
    /// applied on top.
    pub fn new(events: Sender<SimEvent>, travel_speed: f64, profile: ScenarioProfile) -> Self {
        Self {
            events,
            travel_speed,
            profile,
            state: RunState::Idle,
            session: None,
            metrics: Metrics::default(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn profile(&self) -> &ScenarioProfile {
        &self.profile
    }

    pub fn route(&self) -> Option<&Arc<Route>> {
        self.session.as_ref().map(|s| &s.route)
    }

    /// Live metrics over the distance travelled so far.
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Begin a session on `route`. Ignored (returns `false`) while a session
    /// is running or paused.
    ///
    /// Waypoints on the first path cell are collected immediately.
    pub fn start(&mut self, route: Arc<Route>) -> bool {
        if matches!(self.state, RunState::Running | RunState::Paused) {
            log::debug!("scheduler: start ignored while {}", self.state);
            return false;
        }
        let mut session = Session {
            tracker: StepTracker::new(&route),
            route,
            index: 0,
        };
        if let Some(&first) = session.route.path.first() {
            session.tracker.collect_at(&session.route, first);
        }
        self.metrics = self.live_metrics(&session);
        self.state = RunState::Running;
        log::info!(
            "scheduler: started, {} cells, {} waypoints",
            session.route.path.len(),
            session.route.waypoints.len()
        );
        self.emit(SimEvent::Started {
            path_len: session.route.path.len(),
            waypoints: session.route.waypoints.len(),
        });
        for warning in &session.route.warnings {
            self.emit(SimEvent::Warning(warning.clone()));
        }
        self.session = Some(session);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        self.state = RunState::Paused;
        log::info!("scheduler: paused");
        self.emit(SimEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != RunState::Paused {
            return false;
        }
        self.state = RunState::Running;
        log::info!("scheduler: resumed");
        self.emit(SimEvent::Resumed);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            RunState::Idle | RunState::Completed => false,
        }
    }

    /// Drop the session and return to Idle from any state.
    pub fn stop(&mut self) {
        self.state = RunState::Idle;
        self.metrics = Metrics::default();
        if self.session.take().is_some() {
            log::info!("scheduler: stopped");
            self.emit(SimEvent::Stopped);
        }
    }

    /// Advance one cell. Does nothing unless Running.
    ///
    /// On the final cell the session becomes Completed and the returned
    /// notification is the last one.
    pub fn tick(&mut self) -> Option<StepNotification> {
        if self.state != RunState::Running {
            return None;
        }
        let mut session = self.session.take()?;
        let step = if session.index < session.last_index() {
            session.index += 1;
            session.tracker.visit(&session.route, session.index)
        } else {
            None
        };
        self.metrics = self.live_metrics(&session);
        if let Some(step) = &step {
            log::debug!(
                "scheduler: step {} at {}: {}",
                step.step_index,
                step.position,
                step.action
            );
            self.emit(SimEvent::Step {
                step: step.clone(),
                metrics: self.metrics,
            });
        }
        if session.index >= session.last_index() {
            self.state = RunState::Completed;
            log::info!("scheduler: completed, {}", self.metrics);
            self.emit(SimEvent::Completed {
                metrics: self.metrics,
            });
        }
        self.session = Some(session);
        step
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match &self.session {
            Some(s) => SessionSnapshot {
                state: self.state,
                step_index: s.index,
                position: s.route.path.get(s.index).copied(),
                path_len: s.route.path.len(),
                collected: s.tracker.collected(&s.route).map(str::to_string).collect(),
                remaining_waypoints: s.tracker.remaining(),
                metrics: self.metrics,
            },
            None => SessionSnapshot {
                state: self.state,
                step_index: 0,
                position: None,
                path_len: 0,
                collected: Vec::new(),
                remaining_waypoints: 0,
                metrics: self.metrics,
            },
        }
    }

    fn live_metrics(&self, session: &Session) -> Metrics {
        let travelled = session.index as f64 * session.route.cell_length;
        compute_metrics(
            travelled,
            session.route.optimal_distance,
            self.travel_speed,
            &self.profile,
        )
    }

    fn emit(&self, event: SimEvent) {
        // A dropped receiver only means nobody is listening.
        self.events.send(event).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickbot_core::layout;
    use pickbot_route::{PlanConfig, Planner, StepAction, Waypoint};
    use std::sync::mpsc::{self, Receiver};

    fn route(picks: &[(i32, i32, &str)]) -> Arc<Route> {
        let grid = layout::parse(
            "\
R....
.....
.....
.....
....P",
        )
        .unwrap();
        let planner = Planner::new(&grid, PlanConfig::default()).unwrap();
        let wps: Vec<Waypoint> = picks
            .iter()
            .map(|&(x, y, l)| Waypoint::new(Point::new(x, y), l))
            .collect();
        Arc::new(planner.plan_in_order(&wps))
    }

    fn scheduler() -> (StepScheduler, Receiver<SimEvent>) {
        let (tx, rx) = mpsc::channel();
        (StepScheduler::new(tx, 5.0, ScenarioProfile::NORMAL), rx)
    }

    fn drain(rx: &Receiver<SimEvent>) -> Vec<SimEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn stop_after_three_ticks_resets() {
        let (mut s, rx) = scheduler();
        assert!(s.start(route(&[(0, 1, "A"), (2, 2, "B")])));
        for _ in 0..3 {
            assert!(s.tick().is_some());
        }
        assert_eq!(s.snapshot().step_index, 3);
        assert_eq!(s.snapshot().collected, vec!["A".to_string()]);

        s.stop();
        let snap = s.snapshot();
        assert_eq!(s.state(), RunState::Idle);
        assert_eq!(snap.step_index, 0);
        assert!(snap.collected.is_empty());

        drain(&rx);
        assert_eq!(s.tick(), None);
        assert_eq!(s.snapshot().step_index, 0);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn runs_to_completion() {
        let (mut s, rx) = scheduler();
        let r = route(&[(2, 2, "Milk")]);
        s.start(r.clone());
        let mut steps = Vec::new();
        while let Some(step) = s.tick() {
            steps.push(step);
        }
        assert_eq!(steps.len(), r.step_count());
        assert_eq!(s.state(), RunState::Completed);
        assert_eq!(steps[3].action, StepAction::PickingUp(vec!["Milk".into()]));
        assert_eq!(steps.last().unwrap().action, StepAction::Delivering);
        assert_eq!(s.metrics().total_distance, r.total_distance);
        assert_eq!(s.metrics().efficiency, 100);

        let events = drain(&rx);
        assert_eq!(
            events[0],
            SimEvent::Started {
                path_len: 9,
                waypoints: 1
            }
        );
        assert!(matches!(events.last(), Some(SimEvent::Completed { .. })));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        // Ticks after completion do nothing.
        assert_eq!(s.tick(), None);

        // Neither does pausing or resuming a finished session.
        assert!(!s.pause());
        assert!(!s.resume());
        assert!(!s.toggle_pause());
        assert_eq!(s.state(), RunState::Completed);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn steps_match_route_schedule() {
        let (mut s, _rx) = scheduler();
        let r = route(&[(3, 0, "a"), (1, 3, "b")]);
        s.start(r.clone());
        let mut ticked = Vec::new();
        while let Some(step) = s.tick() {
            ticked.push(step);
        }
        assert_eq!(ticked, r.steps()[1..].to_vec());
    }

    #[test]
    fn pause_blocks_ticks() {
        let (mut s, rx) = scheduler();
        assert!(!s.pause());
        assert!(!s.resume());
        s.start(route(&[]));
        assert!(s.pause());
        assert_eq!(s.tick(), None);
        assert_eq!(s.snapshot().step_index, 0);
        assert!(s.toggle_pause());
        assert_eq!(s.state(), RunState::Running);
        assert!(s.tick().is_some());
        let events = drain(&rx);
        assert!(events.contains(&SimEvent::Paused));
        assert!(events.contains(&SimEvent::Resumed));
    }

    #[test]
    fn start_ignored_while_active() {
        let (mut s, _rx) = scheduler();
        let first = route(&[]);
        s.start(first.clone());
        s.tick();
        assert!(!s.start(route(&[(1, 1, "x")])));
        assert!(Arc::ptr_eq(s.route().unwrap(), &first));
        s.pause();
        assert!(!s.start(route(&[])));
        assert_eq!(s.snapshot().step_index, 1);
    }

    #[test]
    fn restart_after_completion() {
        let (mut s, _rx) = scheduler();
        s.start(route(&[]));
        while s.tick().is_some() {}
        assert_eq!(s.state(), RunState::Completed);
        assert!(s.start(route(&[(4, 0, "z")])));
        assert_eq!(s.state(), RunState::Running);
        assert_eq!(s.snapshot().step_index, 0);
        assert_eq!(s.snapshot().remaining_waypoints, 1);
    }

    #[test]
    fn waypoint_on_start_cell_is_collected_at_start() {
        let (mut s, _rx) = scheduler();
        s.start(route(&[(0, 0, "here"), (4, 4, "there")]));
        let snap = s.snapshot();
        assert_eq!(snap.collected, vec!["here".to_string()]);
        assert_eq!(snap.remaining_waypoints, 1);
        // "there" sits on the last cell: picking up wins over delivering.
        let mut last = None;
        while let Some(step) = s.tick() {
            last = Some(step);
        }
        assert_eq!(
            last.unwrap().action,
            StepAction::PickingUp(vec!["there".into()])
        );
    }

    #[test]
    fn single_cell_route_completes_without_moving() {
        let (mut s, rx) = scheduler();
        let r = Arc::new(Route {
            waypoints: vec![],
            path: vec![Point::new(2, 2)],
            total_distance: 0.0,
            optimal_distance: 0.0,
            cell_length: 1.0,
            warnings: vec![],
        });
        s.start(r);
        assert_eq!(s.tick(), None);
        assert_eq!(s.state(), RunState::Completed);
        assert_eq!(s.metrics().efficiency, 100);
        assert!(matches!(drain(&rx).last(), Some(SimEvent::Completed { .. })));
    }

    #[test]
    fn warnings_are_forwarded() {
        let grid = layout::parse("R.#\n.##\n##P").unwrap();
        let planner = Planner::new(&grid, PlanConfig::default()).unwrap();
        let r = Arc::new(planner.plan_in_order(&[]));
        let (mut s, rx) = scheduler();
        s.start(r.clone());
        let events = drain(&rx);
        assert_eq!(events[1], SimEvent::Warning(r.warnings[0].clone()));
    }

    #[test]
    fn dropped_receiver_is_harmless() {
        let (mut s, rx) = scheduler();
        drop(rx);
        s.start(route(&[(1, 0, "a")]));
        assert!(s.tick().is_some());
        s.stop();
        assert_eq!(s.state(), RunState::Idle);
    }
}
