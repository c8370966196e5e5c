//! Heat cost model for pedestrian edges
//!
//! The hazard cost of an edge is the scenario's base hazard, halved when
//! the edge passes through a park. Traversal cost is hazard cost times
//! edge length and is kept in a per-request [`CostOverlay`] next to the
//! immutable street graph.

mod assignment;

pub use assignment::CostOverlay;

use crate::model::HazardProfile;

/// Hazard multiplier for edges intersecting green space
pub const PARK_HAZARD_FACTOR: f64 = 0.5;

/// Hazard cost per meter of an edge
pub fn hazard_cost(profile: &HazardProfile, in_park: bool) -> f64 {
    if in_park {
        profile.base_hazard * PARK_HAZARD_FACTOR
    } else {
        profile.base_hazard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scenario;

    #[test]
    fn parks_halve_hazard_for_every_scenario() {
        for scenario in Scenario::ALL {
            let profile = scenario.profile();
            let open = hazard_cost(&profile, false);
            let park = hazard_cost(&profile, true);
            assert_eq!(park * 2.0, open);
            assert!(park > 0.0);
        }
        assert_eq!(hazard_cost(&Scenario::High.profile(), true), 40.0);
    }
}
