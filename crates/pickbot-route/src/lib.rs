//! Pick route planning for a single warehouse robot.
//!
//! - [`optimizer`]: choose the order in which waypoints are visited
//! - [`planner`]: stitch A* legs into a [`Route`] and report skipped legs
//! - [`metrics`]: time, efficiency and savings figures for a route
//! - [`scenario`]: seasonal multiplier presets
//! - [`waypoint`]: pick targets and product name lookup
//! - [`layoutgen`]: seeded random warehouse layouts

pub mod error;
pub mod layoutgen;
pub mod metrics;
pub mod optimizer;
pub mod planner;
pub mod scenario;
pub mod step;
pub mod waypoint;

pub use error::PlanError;
pub use metrics::{Metrics, compute_metrics};
pub use optimizer::{MAX_EXACT_WAYPOINTS, OrderingMode, chain_cost, order_waypoints};
pub use planner::{PlanConfig, Planner, Route, RouteWarning, plan_route};
pub use scenario::{Scenario, ScenarioProfile};
pub use step::{StepAction, StepNotification, StepTracker};
pub use waypoint::{OrderItem, Resolution, ShelfMap, Waypoint, resolve_items};
