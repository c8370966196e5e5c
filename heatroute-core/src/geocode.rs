//! Resolution of free-text addresses to coordinates

use std::path::Path;

use geo::Point;
use hashbrown::HashMap;
use serde::Deserialize;

use crate::{Error, loading::deserialize_csv_file};

pub trait Geocoder: Send + Sync {
    /// Returns the address location as a lon/lat point.
    ///
    /// # Errors
    ///
    /// [`Error::GeocodingFailed`] if the address cannot be resolved.
    fn geocode(&self, address: &str) -> Result<Point<f64>, Error>;
}

#[derive(Debug, Deserialize)]
struct GazetteerRow {
    address: String,
    latitude: f64,
    longitude: f64,
}

/// Geocoder backed by a fixed address table
#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder {
    entries: HashMap<String, Point<f64>>,
}

impl GazetteerGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a CSV table with `address`, `latitude` and `longitude` columns
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_csv(path: &Path) -> Result<Self, Error> {
        let rows: Vec<GazetteerRow> = deserialize_csv_file(path)?;
        let mut gazetteer = Self::new();
        for row in rows {
            gazetteer.insert(&row.address, Point::new(row.longitude, row.latitude));
        }
        log::info!("Loaded {} gazetteer entries", gazetteer.entries.len());
        Ok(gazetteer)
    }

    pub fn insert(&mut self, address: &str, location: Point<f64>) {
        self.entries.insert(normalize(address), location);
    }
}

impl Geocoder for GazetteerGeocoder {
    fn geocode(&self, address: &str) -> Result<Point<f64>, Error> {
        self.entries
            .get(&normalize(address))
            .copied()
            .ok_or_else(|| Error::GeocodingFailed(format!("address not found: {address}")))
    }
}

fn normalize(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
