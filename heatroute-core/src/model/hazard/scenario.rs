//! Heat scenario tiers and the fixed hazard profile attached to each of them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Classified heat-risk tier for a location and time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    Low,
    Moderate,
    High,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Low, Scenario::Moderate, Scenario::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Low => "Low",
            Scenario::Moderate => "Moderate",
            Scenario::High => "High",
        }
    }

    /// Hazard constants for this tier
    pub fn profile(self) -> HazardProfile {
        HazardProfile::for_scenario(self)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    /// Parses the labels produced by scenario classifiers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScenario`] for anything other than
    /// `Low`, `Moderate` or `High`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Low" => Ok(Scenario::Low),
            "Moderate" => Ok(Scenario::Moderate),
            "High" => Ok(Scenario::High),
            other => Err(Error::InvalidScenario(other.to_string())),
        }
    }
}

/// Fixed per-scenario constants used by the cost model and route statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardProfile {
    /// Hazard magnitude per meter of exposed street
    pub base_hazard: f64,
    /// Pedestrian speed in km/h
    pub walking_speed_kmh: f64,
    /// Drinking water consumption in liters per walked kilometer
    pub water_rate_per_km: f64,
    /// Exposure multiplier, fixed for individual route planning
    pub exposure: f64,
    /// Vulnerability multiplier, fixed for a general user
    pub vulnerability: f64,
}

impl HazardProfile {
    pub const fn for_scenario(scenario: Scenario) -> Self {
        let (base_hazard, walking_speed_kmh, water_rate_per_km) = match scenario {
            Scenario::Low => (20.0, 5.0, 0.2),
            Scenario::Moderate => (50.0, 4.0, 0.4),
            Scenario::High => (80.0, 3.0, 0.6),
        };
        Self {
            base_hazard,
            walking_speed_kmh,
            water_rate_per_km,
            exposure: 1.0,
            vulnerability: 1.0,
        }
    }

    /// Walking speed in m/s
    pub fn walking_speed_ms(&self) -> f64 {
        self.walking_speed_kmh / 3.6
    }
}
