//! Data model for heat-aware evacuation routing
//!
//! Contains the street networks, the hazard model and the study area data.

pub mod area;
pub mod evacuation_model;
pub mod hazard;
pub mod shelters;
pub mod streets;

pub use area::StudyArea;
pub use evacuation_model::EvacuationModel;
pub use hazard::{
    HazardProfile, ParkOverlay, Scenario, VulnerabilityAttr, VulnerabilityLevel,
    VulnerabilityOverlay,
};
pub use shelters::{MAX_SHELTER_CANDIDATES, Shelter, ShelterCandidate, ShelterIndex};
pub use streets::{EdgeGeometry, IndexedPoint, NetworkKind, StreetEdge, StreetGraph, StreetNode};
