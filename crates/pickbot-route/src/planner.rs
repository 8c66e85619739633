//! Route planning: stitch shortest legs between consecutive stops.

use std::fmt;

use pickbot_core::{Grid, GridError, Point};
use pickbot_paths::{Pathfinder, manhattan};

use crate::error::PlanError;
use crate::optimizer::{OrderingMode, order_waypoints};
use crate::step::{StepNotification, StepTracker};
use crate::waypoint::Waypoint;

/// Planning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlanConfig {
    /// Length of one grid step, in metres.
    pub cell_length: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self { cell_length: 1.0 }
    }
}

/// Non-fatal problem found while planning.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RouteWarning {
    /// No path exists for this leg. It was skipped and the robot stayed at
    /// `from`. `label` is `None` for the final leg to the packing station.
    UnreachableLeg {
        from: Point,
        to: Point,
        label: Option<String>,
    },
}

impl fmt::Display for RouteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteWarning::UnreachableLeg {
                from,
                to,
                label: Some(label),
            } => write!(f, "cannot reach \"{label}\" at {to} from {from}, skipped"),
            RouteWarning::UnreachableLeg {
                from,
                to,
                label: None,
            } => write!(f, "cannot reach the packing station at {to} from {from}"),
        }
    }
}

/// A planned route. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Waypoints in the order they are reached. Skipped waypoints are only
    /// reported in `warnings`.
    pub waypoints: Vec<Waypoint>,
    /// Every cell the robot occupies, from the robot start onwards.
    pub path: Vec<Point>,
    /// Travelled distance in metres.
    pub total_distance: f64,
    /// Manhattan baseline over the travelled legs, in metres.
    pub optimal_distance: f64,
    pub cell_length: f64,
    pub warnings: Vec<RouteWarning>,
}

impl Route {
    /// Number of moves along the path.
    pub fn step_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// The full step schedule, one notification per path cell.
    pub fn steps(&self) -> Vec<StepNotification> {
        let mut tracker = StepTracker::new(self);
        (0..self.path.len())
            .filter_map(|i| tracker.visit(self, i))
            .collect()
    }
}

/// Plan a route visiting `ordered` in the given order.
///
/// Both anchors are mandatory and must lie inside the grid. Unreachable legs
/// are skipped and reported in [`Route::warnings`].
pub fn plan_route(
    grid: &Grid,
    start: Option<Point>,
    end: Option<Point>,
    ordered: &[Waypoint],
    config: &PlanConfig,
) -> Result<Route, PlanError> {
    let start = start.ok_or(PlanError::MissingRobotStart)?;
    let end = end.ok_or(PlanError::MissingPackingStation)?;
    for p in [start, end] {
        if !grid.contains(p) {
            return Err(GridError::OutOfBounds(p).into());
        }
    }
    Ok(plan_legs(grid, start, end, ordered, config))
}

fn plan_legs(
    grid: &Grid,
    start: Point,
    end: Point,
    ordered: &[Waypoint],
    config: &PlanConfig,
) -> Route {
    let mut pf = Pathfinder::new(grid);
    let mut path: Vec<Point> = Vec::new();
    let mut reached = Vec::with_capacity(ordered.len());
    let mut warnings = Vec::new();
    let mut baseline = 0;
    let mut at = start;

    let stops = ordered
        .iter()
        .map(|wp| (wp.pos, Some(wp)))
        .chain(std::iter::once((end, None)));
    for (to, wp) in stops {
        let leg = pf.find_path(at, to);
        if leg.is_empty() {
            let warning = RouteWarning::UnreachableLeg {
                from: at,
                to,
                label: wp.map(|w| w.label.clone()),
            };
            log::warn!("planner: {warning}");
            warnings.push(warning);
            continue;
        }
        let skip = usize::from(path.last() == leg.first());
        path.extend_from_slice(&leg[skip..]);
        baseline += manhattan(at, to);
        at = to;
        if let Some(wp) = wp {
            reached.push(wp.clone());
        }
    }
    if path.is_empty() {
        path.push(start);
    }

    let steps = path.len() - 1;
    let route = Route {
        waypoints: reached,
        path,
        total_distance: steps as f64 * config.cell_length,
        optimal_distance: f64::from(baseline) * config.cell_length,
        cell_length: config.cell_length,
        warnings,
    };
    log::info!(
        "planner: {} of {} waypoints, {} steps, {:.1} m (baseline {:.1} m)",
        route.waypoints.len(),
        ordered.len(),
        steps,
        route.total_distance,
        route.optimal_distance
    );
    route
}

/// Planning bound to one grid snapshot with its anchors already resolved.
#[derive(Debug, Clone)]
pub struct Planner {
    grid: Grid,
    start: Point,
    end: Point,
    config: PlanConfig,
}

impl Planner {
    /// Locate the robot start and packing station on `grid`.
    pub fn new(grid: &Grid, config: PlanConfig) -> Result<Self, PlanError> {
        let start = grid.robot_start().ok_or(PlanError::MissingRobotStart)?;
        let end = grid
            .packing_station()
            .ok_or(PlanError::MissingPackingStation)?;
        Ok(Self {
            grid: grid.clone(),
            start,
            end,
            config,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Order the waypoints with `mode`, then plan.
    pub fn plan(&self, waypoints: &[Waypoint], mode: OrderingMode) -> Route {
        let ordered = order_waypoints(self.start, waypoints, self.end, mode);
        self.plan_in_order(&ordered)
    }

    /// Plan with the waypoints visited exactly in the given order.
    pub fn plan_in_order(&self, waypoints: &[Waypoint]) -> Route {
        plan_legs(&self.grid, self.start, self.end, waypoints, &self.config)
    }
}
