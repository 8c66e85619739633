//! Per-cell step notifications along a planned route.

use std::fmt;

use pickbot_core::Point;

use crate::planner::Route;

/// What the robot is doing on a given path cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StepAction {
    Moving,
    /// Labels of the waypoints collected on this cell, in visit order.
    PickingUp(Vec<String>),
    Delivering,
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepAction::Moving => f.write_str("Moving"),
            StepAction::PickingUp(labels) => write!(f, "Picking up {}", labels.join(", ")),
            StepAction::Delivering => f.write_str("Delivering"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepNotification {
    pub step_index: usize,
    pub position: Point,
    pub action: StepAction,
    pub remaining_waypoints: usize,
}

/// Tracks which of a route's waypoints have been collected so far.
///
/// A waypoint is collected the first time the robot stands on its cell.
/// Several waypoints on the same cell are collected together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTracker {
    collected: Vec<bool>,
}

impl StepTracker {
    pub fn new(route: &Route) -> Self {
        Self {
            collected: vec![false; route.waypoints.len()],
        }
    }

    /// Collect every pending waypoint at `pos`, returning their labels.
    pub fn collect_at(&mut self, route: &Route, pos: Point) -> Vec<String> {
        let mut labels = Vec::new();
        for (wp, done) in route.waypoints.iter().zip(self.collected.iter_mut()) {
            if !*done && wp.pos == pos {
                *done = true;
                labels.push(wp.label.clone());
            }
        }
        labels
    }

    /// Waypoints not yet collected.
    pub fn remaining(&self) -> usize {
        self.collected.iter().filter(|&&c| !c).count()
    }

    /// Labels of collected waypoints, in route order.
    pub fn collected<'a>(&'a self, route: &'a Route) -> impl Iterator<Item = &'a str> + 'a {
        route
            .waypoints
            .iter()
            .zip(&self.collected)
            .filter(|(_, done)| **done)
            .map(|(wp, _)| wp.label.as_str())
    }

    /// Arrive on `route.path[index]` and describe the step. Picking up takes
    /// precedence over delivering when the last cell holds a waypoint.
    ///
    /// Returns `None` if `index` is past the end of the path.
    pub fn visit(&mut self, route: &Route, index: usize) -> Option<StepNotification> {
        let position = *route.path.get(index)?;
        let labels = self.collect_at(route, position);
        let action = if !labels.is_empty() {
            StepAction::PickingUp(labels)
        } else if index + 1 == route.path.len() {
            StepAction::Delivering
        } else {
            StepAction::Moving
        };
        Some(StepNotification {
            step_index: index,
            position,
            action,
            remaining_waypoints: self.remaining(),
        })
    }
}
