//! Notifications emitted by the [`StepScheduler`](crate::StepScheduler).

use pickbot_route::{Metrics, RouteWarning, StepNotification};

/// A simulation event. Delivered over an `mpsc` channel handed to the
/// scheduler at construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SimEvent {
    /// A session began. `path_len` counts cells, including the start.
    Started { path_len: usize, waypoints: usize },
    /// The robot moved one cell.
    Step {
        step: StepNotification,
        metrics: Metrics,
    },
    /// Advisory notice carried over from planning.
    Warning(RouteWarning),
    Paused,
    Resumed,
    Stopped,
    /// The robot reached the end of its path.
    Completed { metrics: Metrics },
}

impl SimEvent {
    /// Whether no further events follow for this session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SimEvent::Stopped | SimEvent::Completed { .. })
    }
}
