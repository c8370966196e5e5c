//! Evacuation shelters and nearest-shelter ranking

use geo::{Distance, Haversine, Point};
use serde::Serialize;

/// Number of nearest shelters offered to a user
pub const MAX_SHELTER_CANDIDATES: usize = 5;

#[derive(Debug, Clone)]
pub struct Shelter {
    pub name: String,
    pub capacity: u32,
    pub location: Point<f64>,
}

/// Shelter ranked by distance from a search origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterCandidate {
    /// 1-based rank, used to select the shelter in a route request
    pub id: usize,
    pub name: String,
    pub capacity: u32,
    /// Great-circle distance from the origin in meters
    pub distance: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ShelterIndex {
    shelters: Vec<Shelter>,
}

impl ShelterIndex {
    pub fn new(shelters: Vec<Shelter>) -> Self {
        Self { shelters }
    }

    /// The `limit` shelters closest to `origin`, nearest first
    pub fn nearest(&self, origin: &Point<f64>, limit: usize) -> Vec<ShelterCandidate> {
        let mut ranked: Vec<(f64, &Shelter)> = self
            .shelters
            .iter()
            .map(|shelter| (Haversine.distance(*origin, shelter.location), shelter))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        ranked
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(rank, (distance, shelter))| ShelterCandidate {
                id: rank + 1,
                name: shelter.name.clone(),
                capacity: shelter.capacity,
                distance,
                latitude: shelter.location.y(),
                longitude: shelter.location.x(),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shelter> {
        self.shelters.iter()
    }

    pub fn len(&self) -> usize {
        self.shelters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shelters.is_empty()
    }
}
