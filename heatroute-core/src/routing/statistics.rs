//! Aggregation of distance, time, heat risk, water and population
//! vulnerability along computed paths

use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    Path,
    rounding::{serialize_round2, serialize_round2_opt},
};
use crate::{
    cost::CostOverlay,
    model::{Scenario, StreetGraph, VulnerabilityLevel, VulnerabilityOverlay},
};

/// Fixed vehicle speed in km/h
pub const DRIVING_SPEED_KMH: f64 = 30.0;

/// Length and edge count of a path's edges sharing one vulnerability level
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LevelSummary {
    #[serde(rename = "total_length_m", serialize_with = "serialize_round2")]
    pub total_length: f64,
    pub edge_count: usize,
}

/// Statistics of one evacuation request. Values keep full precision and
/// are rounded to two decimals only when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStatistics {
    pub scenario: Scenario,
    #[serde(serialize_with = "serialize_round2")]
    pub heat_hazard: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub heat_exposure: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub heat_vulnerability: f64,
    /// Meters walked along the least heat-exposed path
    #[serde(serialize_with = "serialize_round2")]
    pub distance_walk_heat: f64,
    /// Minutes needed for that walk at the scenario's walking speed
    #[serde(serialize_with = "serialize_round2")]
    pub time_walk_heat: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub total_risk_walk_heat: f64,
    /// Heat risk of the shortest walking path, the comparison baseline
    #[serde(serialize_with = "serialize_round2")]
    pub total_risk_walk_distance: f64,
    /// `None` when the baseline risk is zero
    #[serde(serialize_with = "serialize_round2_opt")]
    pub heat_risk_reduction_pct: Option<f64>,
    #[serde(serialize_with = "serialize_round2")]
    pub water_needed_liters: f64,
    pub max_vulnerability_level: VulnerabilityLevel,
    /// Only levels present on the path appear
    pub vulnerability_summary: BTreeMap<VulnerabilityLevel, LevelSummary>,
    #[serde(
        serialize_with = "serialize_round2_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance_drive: Option<f64>,
    #[serde(
        serialize_with = "serialize_round2_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_drive: Option<f64>,
}

impl RouteStatistics {
    /// Pedestrian statistics for the heat-optimal path compared against
    /// the distance-optimal one. Driving fields stay empty.
    pub fn walking(
        graph: &StreetGraph,
        costs: &CostOverlay,
        vulnerability: &VulnerabilityOverlay,
        heat_path: &Path,
        distance_path: &Path,
    ) -> Self {
        let scenario = costs.scenario();
        let profile = scenario.profile();

        let distance_walk_heat = path_length(graph, heat_path);
        let total_risk_walk_heat = path_risk(costs, heat_path);
        let total_risk_walk_distance = path_risk(costs, distance_path);
        let (vulnerability_summary, max_vulnerability_level) =
            vulnerability_along(graph, vulnerability, heat_path);

        Self {
            scenario,
            heat_hazard: profile.base_hazard,
            heat_exposure: profile.exposure,
            heat_vulnerability: profile.vulnerability,
            distance_walk_heat,
            time_walk_heat: distance_walk_heat / profile.walking_speed_ms() / 60.0,
            total_risk_walk_heat,
            total_risk_walk_distance,
            heat_risk_reduction_pct: risk_reduction_pct(
                total_risk_walk_distance,
                total_risk_walk_heat,
            ),
            water_needed_liters: profile.water_rate_per_km * (distance_walk_heat / 1000.0),
            max_vulnerability_level,
            vulnerability_summary,
            distance_drive: None,
            time_drive: None,
        }
    }

    /// Adds distance and time of the driving path
    #[must_use]
    pub fn with_drive(mut self, graph: &StreetGraph, drive_path: &Path) -> Self {
        let distance = path_length(graph, drive_path);
        self.distance_drive = Some(distance);
        self.time_drive = Some(distance / (DRIVING_SPEED_KMH / 3.6) / 60.0);
        self
    }

    /// Total number of heat-path edges counted in the vulnerability summary
    pub fn summarized_edge_count(&self) -> usize {
        self.vulnerability_summary
            .values()
            .map(|summary| summary.edge_count)
            .sum()
    }
}

/// Sum of edge lengths in meters, `0.0` for a path without edges
pub fn path_length(graph: &StreetGraph, path: &Path) -> f64 {
    path.hops()
        .filter_map(|hop| graph.edge(hop.edge))
        .fold(0.0, |total, edge| total + edge.length)
}

/// Sum of `hazard_cost * length` along the path. Edges without a cost
/// contribute nothing.
pub fn path_risk(costs: &CostOverlay, path: &Path) -> f64 {
    path.hops()
        .fold(0.0, |total, hop| total + costs.cost(hop.edge).unwrap_or(0.0))
}

/// Relative risk saved by the heat-optimal path, in percent
pub fn risk_reduction_pct(baseline_risk: f64, optimized_risk: f64) -> Option<f64> {
    if baseline_risk == 0.0 {
        None
    } else {
        Some((baseline_risk - optimized_risk) / baseline_risk * 100.0)
    }
}

/// Per-level length and count of the path's edges, and the highest level
/// met (`Low` for a path without edges)
pub fn vulnerability_along(
    graph: &StreetGraph,
    overlay: &VulnerabilityOverlay,
    path: &Path,
) -> (BTreeMap<VulnerabilityLevel, LevelSummary>, VulnerabilityLevel) {
    let mut summary: BTreeMap<VulnerabilityLevel, LevelSummary> = BTreeMap::new();
    let mut max_level = VulnerabilityLevel::Low;

    for hop in path.hops() {
        let Some(street) = graph.edge(hop.edge) else {
            continue;
        };
        let level = overlay.level(hop.edge);
        let entry = summary.entry(level).or_default();
        entry.total_length += street.length;
        entry.edge_count += 1;
        max_level = max_level.max(level);
    }

    (summary, max_level)
}
