use std::path::PathBuf;

use serde::Deserialize;

/// Locations of the input datasets for an [`EvacuationModel`](crate::EvacuationModel)
#[derive(Debug, Clone, Deserialize)]
pub struct EvacuationModelConfig {
    /// `GeoJSON` edges of the pedestrian network
    pub walk_network_path: PathBuf,
    /// `GeoJSON` edges of the vehicle network
    pub drive_network_path: PathBuf,
    /// `GeoJSON` study area boundary (polygon or boundary line)
    pub boundary_path: PathBuf,
    /// CSV with `Name`, `Capacity`, `latitude`, `longitude`
    pub shelters_path: PathBuf,
    /// `GeoJSON` park polygons
    #[serde(default)]
    pub parks_path: Option<PathBuf>,
    /// `GeoJSON` population parcels
    #[serde(default)]
    pub population_path: Option<PathBuf>,
    /// Parcel property holding the elderly population count
    #[serde(default = "default_population_field")]
    pub population_field: String,
}

fn default_population_field() -> String {
    "Pop20_75".to_string()
}
