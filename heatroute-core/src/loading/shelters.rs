use std::path::Path;

use geo::Point;
use log::{info, warn};
use serde::Deserialize;

use super::parser::deserialize_csv_file;
use crate::{
    Error,
    model::{Shelter, ShelterIndex},
};

#[derive(Debug, Deserialize)]
struct ShelterRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Capacity")]
    capacity: f64,
    latitude: f64,
    longitude: f64,
}

impl ShelterRecord {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn into_shelter(self) -> Option<Shelter> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return None;
        }
        let capacity = if self.capacity.is_finite() && self.capacity > 0.0 {
            self.capacity as u32
        } else {
            0
        };
        Some(Shelter {
            name: self.name,
            capacity,
            location: Point::new(self.longitude, self.latitude),
        })
    }
}

/// Reads shelters from a CSV with `Name`, `Capacity`, `latitude` and `longitude` columns
///
/// # Errors
///
/// Returns an error if the file cannot be opened or contains no usable shelter.
pub fn load_shelters(path: &Path) -> Result<ShelterIndex, Error> {
    let records: Vec<ShelterRecord> = deserialize_csv_file(path)?;
    let total = records.len();
    let shelters: Vec<Shelter> = records
        .into_iter()
        .filter_map(ShelterRecord::into_shelter)
        .collect();

    if shelters.len() < total {
        warn!(
            "Skipped {} shelters with non-finite coordinates",
            total - shelters.len()
        );
    }
    if shelters.is_empty() {
        return Err(Error::InvalidData(format!(
            "No shelters found in {}",
            path.display()
        )));
    }

    info!("Loaded {} shelters", shelters.len());
    Ok(ShelterIndex::new(shelters))
}
