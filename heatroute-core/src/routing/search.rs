//! The three path searches run for every evacuation request

use std::{
    fmt,
    time::{Duration, Instant},
};

use log::{debug, warn};
use petgraph::{
    graph::{EdgeReference, NodeIndex},
    visit::EdgeRef,
};
use serde::Serialize;

use super::{
    Path,
    dijkstra::{SearchOutcome, dijkstra_path},
};
use crate::{
    Error,
    cost::CostOverlay,
    model::{StreetEdge, StreetGraph},
};

/// Which of the three searches a result or failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKind {
    /// Pedestrian graph weighted by heat cost
    HeatWalk,
    /// Pedestrian graph weighted by length
    DistanceWalk,
    /// Vehicle graph weighted by length
    Drive,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouteKind::HeatWalk => "heat-walk",
            RouteKind::DistanceWalk => "distance-walk",
            RouteKind::Drive => "drive",
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Searches still running at this instant give up with `NoPathFound`
    pub deadline: Option<Instant>,
}

impl SearchOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }
}

/// Least heat-exposed walking path, weighted by the request's edge costs
///
/// # Errors
///
/// [`Error::UnknownNode`] for nodes outside `graph`, [`Error::NoPathFound`]
/// when `end` is unreachable or the deadline passes, and
/// [`Error::InvalidData`] if `costs` was assigned on a different graph.
pub fn walk_heat_path(
    graph: &StreetGraph,
    costs: &CostOverlay,
    start: NodeIndex,
    end: NodeIndex,
    options: &SearchOptions,
) -> Result<Path, Error> {
    if costs.len() != graph.edge_count() {
        return Err(Error::InvalidData(format!(
            "Cost overlay covers {} edges, graph has {}",
            costs.len(),
            graph.edge_count()
        )));
    }
    search(RouteKind::HeatWalk, graph, start, end, options, |edge| {
        costs.cost(edge.id()).unwrap_or(0.0)
    })
}

/// Shortest walking path by length, used as the exposure baseline
///
/// # Errors
///
/// See [`walk_heat_path`].
pub fn walk_distance_path(
    graph: &StreetGraph,
    start: NodeIndex,
    end: NodeIndex,
    options: &SearchOptions,
) -> Result<Path, Error> {
    search(RouteKind::DistanceWalk, graph, start, end, options, by_length)
}

/// Shortest driving path by length
///
/// # Errors
///
/// See [`walk_heat_path`].
pub fn drive_path(
    graph: &StreetGraph,
    start: NodeIndex,
    end: NodeIndex,
    options: &SearchOptions,
) -> Result<Path, Error> {
    search(RouteKind::Drive, graph, start, end, options, by_length)
}

fn by_length(edge: EdgeReference<'_, StreetEdge>) -> f64 {
    edge.weight().length
}

fn search<F>(
    kind: RouteKind,
    graph: &StreetGraph,
    start: NodeIndex,
    end: NodeIndex,
    options: &SearchOptions,
    weight: F,
) -> Result<Path, Error>
where
    F: Fn(EdgeReference<'_, StreetEdge>) -> f64,
{
    graph.check_node(start)?;
    graph.check_node(end)?;

    match dijkstra_path(graph, start, end, weight, options.deadline) {
        SearchOutcome::Found(path) => {
            debug!("{kind} path found with {} edges", path.edges().len());
            Ok(path)
        }
        SearchOutcome::Unreachable => Err(Error::NoPathFound(kind)),
        SearchOutcome::DeadlineExceeded => {
            warn!("{kind} search exceeded its deadline, reporting no path");
            Err(Error::NoPathFound(kind))
        }
    }
}
