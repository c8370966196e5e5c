//! Loaded data needed to answer evacuation route requests

use super::{
    ParkOverlay, ShelterIndex, StreetGraph, StudyArea, VulnerabilityOverlay,
};

/// Read-only bundle of the street graphs, study area, shelters and the
/// overlays resolved onto the pedestrian graph. Built once and shared
/// between requests; per-request state lives in the cost overlay.
#[derive(Debug, Clone)]
pub struct EvacuationModel {
    pub walk_graph: StreetGraph,
    pub drive_graph: StreetGraph,
    pub area: StudyArea,
    pub shelters: ShelterIndex,
    pub parks: ParkOverlay,
    pub vulnerability: VulnerabilityOverlay,
}

impl EvacuationModel {
    pub fn summary(&self) -> String {
        format!(
            "walk network: {} nodes / {} edges, drive network: {} nodes / {} edges, \
             {} shelters, {} park edges, {} vulnerable edges",
            self.walk_graph.node_count(),
            self.walk_graph.edge_count(),
            self.drive_graph.node_count(),
            self.drive_graph.edge_count(),
            self.shelters.len(),
            self.parks.len(),
            self.vulnerability.len(),
        )
    }
}
