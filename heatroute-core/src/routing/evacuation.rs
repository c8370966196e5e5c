//! Heat-aware routing core: cost assignment, the three searches,
//! statistics and segments for one request

use log::debug;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use super::{
    Path, RouteSegments, RouteStatistics, SearchOptions, drive_path, walk_distance_path,
    walk_heat_path,
};
use crate::{
    Error,
    cost::CostOverlay,
    model::{ParkOverlay, Scenario, StreetGraph, VulnerabilityOverlay},
};

/// Everything the routing core needs for one request. Graphs and overlays
/// are borrowed read-only.
#[derive(Debug, Clone, Copy)]
pub struct RoutingInputs<'a> {
    pub scenario: Scenario,
    pub walk_graph: &'a StreetGraph,
    pub drive_graph: &'a StreetGraph,
    pub walk_start: NodeIndex,
    pub walk_end: NodeIndex,
    pub drive_start: NodeIndex,
    pub drive_end: NodeIndex,
    pub parks: &'a ParkOverlay,
    pub vulnerability: &'a VulnerabilityOverlay,
}

/// Computed paths of one request
#[derive(Debug, Clone, PartialEq)]
pub struct EvacuationPaths {
    pub walk_heat: Path,
    pub walk_distance: Path,
    pub drive: Path,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOutcome {
    pub statistics: RouteStatistics,
    pub segments: RouteSegments,
    #[serde(skip)]
    pub paths: EvacuationPaths,
}

/// Assigns heat costs for the scenario, runs the three searches
/// concurrently and aggregates the result.
///
/// # Errors
///
/// Fails as a whole if any search fails: [`Error::UnknownNode`] or
/// [`Error::NoPathFound`] naming the first failing route in the order
/// heat walk, distance walk, drive.
pub fn compute_evacuation_routes(
    inputs: &RoutingInputs<'_>,
    options: &SearchOptions,
) -> Result<RouteOutcome, Error> {
    let costs = CostOverlay::assign(inputs.walk_graph, inputs.scenario, inputs.parks);

    let ((walk_heat, walk_distance), drive) = rayon::join(
        || {
            rayon::join(
                || {
                    walk_heat_path(
                        inputs.walk_graph,
                        &costs,
                        inputs.walk_start,
                        inputs.walk_end,
                        options,
                    )
                },
                || {
                    walk_distance_path(
                        inputs.walk_graph,
                        inputs.walk_start,
                        inputs.walk_end,
                        options,
                    )
                },
            )
        },
        || {
            drive_path(
                inputs.drive_graph,
                inputs.drive_start,
                inputs.drive_end,
                options,
            )
        },
    );
    let paths = EvacuationPaths {
        walk_heat: walk_heat?,
        walk_distance: walk_distance?,
        drive: drive?,
    };

    let statistics = RouteStatistics::walking(
        inputs.walk_graph,
        &costs,
        inputs.vulnerability,
        &paths.walk_heat,
        &paths.walk_distance,
    )
    .with_drive(inputs.drive_graph, &paths.drive);

    let segments = RouteSegments::new(
        inputs.walk_graph,
        inputs.vulnerability,
        &paths.walk_heat,
        inputs.drive_graph,
        &paths.drive,
    );

    debug!(
        "{} scenario: heat walk {:.1} m, baseline risk {:.1}, heat risk {:.1}",
        inputs.scenario,
        statistics.distance_walk_heat,
        statistics.total_risk_walk_distance,
        statistics.total_risk_walk_heat
    );

    Ok(RouteOutcome {
        statistics,
        segments,
        paths,
    })
}
