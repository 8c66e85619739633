//! Scenario profiles: multiplier sets describing operating conditions such
//! as peak-season demand.

use std::fmt;
use std::str::FromStr;

/// Multipliers applied to a simulation run. The default applies 1 to all.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioProfile {
    /// Order volume relative to normal operation.
    pub volume_multiplier: f64,
    /// Expected picking efficiency relative to normal operation.
    pub efficiency_factor: f64,
    /// Scales the robot's travel speed.
    pub speed_factor: f64,
    /// Scales cost and emission figures.
    pub cost_multiplier: f64,
}

impl ScenarioProfile {
    pub const NORMAL: Self = Self {
        volume_multiplier: 1.0,
        efficiency_factor: 1.0,
        speed_factor: 1.0,
        cost_multiplier: 1.0,
    };

    /// Elevated, priority-driven operation.
    #[inline]
    pub fn is_demand_surge(&self) -> bool {
        self.volume_multiplier > 1.0
    }

    /// Efficiency adjustment as a signed percentage, e.g. `-15` for 0.85.
    pub fn efficiency_adjustment_percent(&self) -> f64 {
        ((self.efficiency_factor - 1.0) * 100.0).round()
    }
}

impl Default for ScenarioProfile {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Named seasonal presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Scenario {
    #[default]
    Normal,
    BlackFriday,
    Christmas,
    Holiday,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Normal,
        Scenario::BlackFriday,
        Scenario::Christmas,
        Scenario::Holiday,
    ];

    pub fn profile(self) -> ScenarioProfile {
        match self {
            Scenario::Normal => ScenarioProfile::NORMAL,
            Scenario::BlackFriday => ScenarioProfile {
                volume_multiplier: 2.5,
                efficiency_factor: 0.85,
                speed_factor: 0.9,
                cost_multiplier: 1.5,
            },
            Scenario::Christmas => ScenarioProfile {
                volume_multiplier: 2.0,
                efficiency_factor: 0.9,
                speed_factor: 0.95,
                cost_multiplier: 1.3,
            },
            Scenario::Holiday => ScenarioProfile {
                volume_multiplier: 1.8,
                efficiency_factor: 0.95,
                speed_factor: 1.0,
                cost_multiplier: 1.2,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Normal => "normal",
            Scenario::BlackFriday => "black-friday",
            Scenario::Christmas => "christmas",
            Scenario::Holiday => "holiday",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised scenario name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scenario \"{0}\" (expected normal, black-friday, christmas or holiday)")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_ones() {
        let p = ScenarioProfile::default();
        assert_eq!(p, Scenario::Normal.profile());
        assert!(!p.is_demand_surge());
        assert_eq!(p.efficiency_adjustment_percent(), 0.0);
    }

    #[test]
    fn peak_seasons_are_surges() {
        for sc in [Scenario::BlackFriday, Scenario::Christmas, Scenario::Holiday] {
            assert!(sc.profile().is_demand_surge(), "{sc}");
        }
        assert_eq!(
            Scenario::BlackFriday.profile().efficiency_adjustment_percent(),
            -15.0
        );
    }

    #[test]
    fn names_round_trip() {
        for sc in Scenario::ALL {
            assert_eq!(sc.to_string().parse::<Scenario>(), Ok(sc));
        }
        assert_eq!("Black-Friday".parse::<Scenario>(), Ok(Scenario::BlackFriday));
        assert!("summer".parse::<Scenario>().is_err());
    }
}
