use thiserror::Error;

use crate::model::NetworkKind;
use crate::routing::RouteKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid heat scenario: {0:?}")]
    InvalidScenario(String),
    #[error("Unknown node {node} in {network} network")]
    UnknownNode { network: NetworkKind, node: usize },
    #[error("No path found for {0} route")]
    NoPathFound(RouteKind),
    #[error("No nearby points found for snapping")]
    NoPointsFound,
    #[error("Location (lon {lon}, lat {lat}) is outside the study area")]
    OutsideStudyArea { lon: f64, lat: f64 },
    #[error("Invalid shelter id {id}: {available} shelters available")]
    InvalidShelter { id: usize, available: usize },
    #[error("Geocoding failed: {0}")]
    GeocodingFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Unrecoverable error: {0}")]
    UnrecoverableError(&'static str),
}
