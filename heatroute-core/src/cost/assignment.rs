use log::debug;
use petgraph::{graph::EdgeIndex, visit::EdgeRef};

use super::hazard_cost;
use crate::model::{ParkOverlay, Scenario, StreetGraph};

/// Hazard and traversal cost of every edge of one pedestrian graph,
/// computed for a single request.
#[derive(Debug, Clone)]
pub struct CostOverlay {
    scenario: Scenario,
    hazard_costs: Vec<f64>,
    costs: Vec<f64>,
}

impl CostOverlay {
    /// Assigns `cost = hazard_cost * length` to every edge of `graph`,
    /// including edges no search will ever reach.
    pub fn assign(graph: &StreetGraph, scenario: Scenario, parks: &ParkOverlay) -> Self {
        let profile = scenario.profile();
        let edge_count = graph.edge_count();
        let mut hazard_costs = Vec::with_capacity(edge_count);
        let mut costs = Vec::with_capacity(edge_count);

        // edge_references yields edges in index order
        for edge in graph.edge_references() {
            let hazard = hazard_cost(&profile, parks.contains(edge.id()));
            hazard_costs.push(hazard);
            costs.push(hazard * edge.weight().length);
        }

        debug!(
            "Assigned {scenario} heat costs to {edge_count} edges ({} in parks)",
            parks.len()
        );

        Self {
            scenario,
            hazard_costs,
            costs,
        }
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn hazard_cost(&self, edge: EdgeIndex) -> Option<f64> {
        self.hazard_costs.get(edge.index()).copied()
    }

    pub fn cost(&self, edge: EdgeIndex) -> Option<f64> {
        self.costs.get(edge.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}
