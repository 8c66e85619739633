//! Route metrics: travel time, efficiency and savings figures.
//!
//! Every figure is finite. Degenerate inputs (zero speed, zero distance,
//! NaN) produce 0 rather than propagating.

use std::fmt;

use crate::planner::Route;
use crate::scenario::ScenarioProfile;

/// Operating cost per metre travelled.
pub const COST_PER_METRE: f64 = 0.12;
/// CO2 emitted per metre travelled, in kilograms.
pub const CARBON_KG_PER_METRE: f64 = 0.015;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Metres.
    pub total_distance: f64,
    /// Seconds.
    pub total_time: f64,
    /// Percent, 0 to 100.
    pub efficiency: u8,
    pub cost_savings: f64,
    /// Kilograms of CO2.
    pub carbon_reduction: f64,
}

impl Metrics {
    /// Metrics of a route against its own Manhattan baseline.
    pub fn for_route(route: &Route, travel_speed: f64, profile: &ScenarioProfile) -> Self {
        compute_metrics(
            route.total_distance,
            route.optimal_distance,
            travel_speed,
            profile,
        )
    }

    /// Metrics of `optimized`, with savings measured against the distance of
    /// `baseline` (e.g. the same picks visited in input order).
    pub fn against_baseline(
        optimized: &Route,
        baseline: &Route,
        travel_speed: f64,
        profile: &ScenarioProfile,
    ) -> Self {
        let mut m = Self::for_route(optimized, travel_speed, profile);
        let saved = non_negative(baseline.total_distance) - non_negative(optimized.total_distance);
        m.cost_savings = savings(saved, COST_PER_METRE, profile);
        m.carbon_reduction = savings(saved, CARBON_KG_PER_METRE, profile);
        m
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} m in {:.1} s, {}% efficient, saved {:.2} ({:.3} kg CO2)",
            self.total_distance,
            self.total_time,
            self.efficiency,
            self.cost_savings,
            self.carbon_reduction
        )
    }
}

/// Compute metrics for `actual` metres travelled against an `optimal`
/// baseline at `travel_speed` m/s.
pub fn compute_metrics(
    actual: f64,
    optimal: f64,
    travel_speed: f64,
    profile: &ScenarioProfile,
) -> Metrics {
    let actual = non_negative(actual);
    let optimal = non_negative(optimal);
    let speed = travel_speed * profile.speed_factor;

    let efficiency = if actual == 0.0 {
        100
    } else {
        finite_or_zero((optimal / actual * 100.0).round()).clamp(0.0, 100.0) as u8
    };
    Metrics {
        total_distance: actual,
        total_time: finite_or_zero(actual / speed).max(0.0),
        efficiency,
        cost_savings: savings(optimal - actual, COST_PER_METRE, profile),
        carbon_reduction: savings(optimal - actual, CARBON_KG_PER_METRE, profile),
    }
}

fn savings(delta: f64, per_metre: f64, profile: &ScenarioProfile) -> f64 {
    finite_or_zero(delta * per_metre * profile.cost_multiplier).max(0.0)
}

#[inline]
fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

#[inline]
fn non_negative(x: f64) -> f64 {
    finite_or_zero(x).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{PlanConfig, Planner};
    use crate::scenario::Scenario;
    use crate::waypoint::Waypoint;
    use pickbot_core::{Point, layout};

    fn all_finite(m: &Metrics) -> bool {
        [m.total_distance, m.total_time, m.cost_savings, m.carbon_reduction]
            .iter()
            .all(|x| x.is_finite())
    }

    #[test]
    fn optimal_route() {
        let m = compute_metrics(8.0, 8.0, 5.0, &ScenarioProfile::NORMAL);
        assert_eq!(m.total_distance, 8.0);
        assert_eq!(m.total_time, 1.6);
        assert_eq!(m.efficiency, 100);
        assert_eq!(m.cost_savings, 0.0);
        assert_eq!(m.carbon_reduction, 0.0);
    }

    #[test]
    fn detour_lowers_efficiency_without_negative_savings() {
        let m = compute_metrics(10.0, 8.0, 5.0, &ScenarioProfile::NORMAL);
        assert_eq!(m.efficiency, 80);
        assert_eq!(m.cost_savings, 0.0);
        assert_eq!(m.carbon_reduction, 0.0);
    }

    #[test]
    fn zero_distance_is_fully_efficient() {
        let m = compute_metrics(0.0, 0.0, 5.0, &ScenarioProfile::NORMAL);
        assert_eq!(m.efficiency, 100);
        assert_eq!(m.total_time, 0.0);
    }

    #[test]
    fn efficiency_is_clamped() {
        let m = compute_metrics(2.0, 10.0, 5.0, &ScenarioProfile::NORMAL);
        assert_eq!(m.efficiency, 100);
        assert!(m.cost_savings > 0.0);
        for (a, o) in [(1.0, 0.0), (3.0, 1.0), (1e-12, 1e12), (7.0, 7.0)] {
            let e = compute_metrics(a, o, 1.0, &ScenarioProfile::NORMAL).efficiency;
            assert!(e <= 100);
        }
    }

    #[test]
    fn degenerate_inputs_stay_finite() {
        let p = ScenarioProfile::NORMAL;
        for m in [
            compute_metrics(8.0, 8.0, 0.0, &p),
            compute_metrics(f64::NAN, 8.0, 5.0, &p),
            compute_metrics(8.0, f64::INFINITY, 5.0, &p),
            compute_metrics(-3.0, -1.0, -5.0, &p),
            compute_metrics(8.0, 4.0, f64::NAN, &p),
        ] {
            assert!(all_finite(&m), "{m:?}");
            assert!(m.efficiency <= 100);
            assert!(m.cost_savings >= 0.0 && m.carbon_reduction >= 0.0);
        }
        assert_eq!(compute_metrics(8.0, 8.0, 0.0, &p).total_time, 0.0);
    }

    #[test]
    fn scenario_scales_time_and_cost() {
        let p = Scenario::BlackFriday.profile();
        let m = compute_metrics(9.0, 12.0, 5.0, &p);
        assert!((m.total_time - 9.0 / (5.0 * 0.9)).abs() < 1e-9);
        assert!((m.cost_savings - 3.0 * COST_PER_METRE * 1.5).abs() < 1e-9);
        assert!((m.carbon_reduction - 3.0 * CARBON_KG_PER_METRE * 1.5).abs() < 1e-9);
    }

    #[test]
    fn savings_against_input_order() {
        let grid = layout::parse("R....\n.....\n.....\n.....\n....P").unwrap();
        let planner = Planner::new(&grid, PlanConfig::default()).unwrap();
        let picks = [
            Waypoint::new(Point::new(4, 0), "far"),
            Waypoint::new(Point::new(0, 4), "side"),
            Waypoint::new(Point::new(1, 0), "near"),
        ];
        let baseline = planner.plan_in_order(&picks);
        let optimized = planner.plan(&picks, crate::OrderingMode::Exact);
        assert!(optimized.total_distance < baseline.total_distance);

        let m = Metrics::against_baseline(&optimized, &baseline, 5.0, &ScenarioProfile::NORMAL);
        let saved = baseline.total_distance - optimized.total_distance;
        assert!((m.cost_savings - saved * COST_PER_METRE).abs() < 1e-9);
        assert!(m.carbon_reduction > 0.0);
        assert_eq!(m.total_distance, optimized.total_distance);

        let own = Metrics::for_route(&optimized, 5.0, &ScenarioProfile::NORMAL);
        assert_eq!(own.cost_savings, 0.0);
    }
}
