//! Simulation settings.

use std::time::Duration;

use pickbot_route::{OrderingMode, PlanConfig, Scenario, ScenarioProfile};

use crate::cadence::Cadence;

/// Everything needed to plan and pace one simulation run.
///
/// With the `serde` feature every field is optional when deserializing;
/// missing ones take their default.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Metres per grid step.
    pub cell_length: f64,
    /// Metres per second before the scenario's speed factor.
    pub robot_speed: f64,
    pub base_tick_ms: u64,
    pub speed_multiplier: f64,
    pub scenario: Scenario,
    /// Forces an ordering mode; by default it follows the scenario.
    pub ordering: Option<OrderingMode>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cell_length: PlanConfig::default().cell_length,
            robot_speed: 5.0,
            base_tick_ms: 500,
            speed_multiplier: 1.0,
            scenario: Scenario::Normal,
            ordering: None,
        }
    }
}

impl SimConfig {
    pub fn plan_config(&self) -> PlanConfig {
        PlanConfig {
            cell_length: self.cell_length,
        }
    }

    pub fn profile(&self) -> ScenarioProfile {
        self.scenario.profile()
    }

    pub fn ordering_mode(&self) -> OrderingMode {
        self.ordering
            .unwrap_or_else(|| OrderingMode::for_profile(&self.profile()))
    }

    pub fn cadence(&self) -> Cadence {
        Cadence::new(
            Duration::from_millis(self.base_tick_ms),
            self.speed_multiplier,
        )
    }
}
