//! Loading of the input datasets (street networks, study area, shelters,
//! parks and population parcels) and assembly of the evacuation model.

mod builder;
mod config;
pub mod network;
pub mod overlays;
mod parser;
mod shelters;

pub use builder::{create_evacuation_model, load_study_area};
pub use config::EvacuationModelConfig;
pub use network::{street_graph_from_features, street_graph_from_geojson};
pub use overlays::{
    PopulationParcel, load_parks, load_population_parcels, park_overlay, vulnerability_overlay,
};
pub use parser::{deserialize_csv_file, read_geojson_features};
pub use shelters::load_shelters;
