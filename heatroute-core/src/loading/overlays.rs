//! Spatial joins between pedestrian edges and polygon layers

use std::path::Path;

use geo::{BoundingRect, Geometry, Intersects};
use geojson::Feature;
use log::{debug, info};
use petgraph::graph::EdgeIndex;
use rayon::prelude::*;
use rstar::{AABB, RTree, primitives::GeomWithData, primitives::Rectangle};

use super::parser::{feature_geometry, numeric_property, read_geojson_features};
use crate::{
    Error,
    model::{ParkOverlay, StreetGraph, VulnerabilityLevel, VulnerabilityOverlay},
};

/// Population parcel classified by its elderly population
#[derive(Debug, Clone)]
pub struct PopulationParcel {
    pub geometry: Geometry<f64>,
    pub level: VulnerabilityLevel,
    pub factor: f64,
}

impl PopulationParcel {
    pub fn new(geometry: Geometry<f64>, population: f64) -> Self {
        let level = VulnerabilityLevel::from_population(population);
        Self {
            geometry,
            level,
            factor: level.factor(),
        }
    }
}

type IndexedEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// For every edge of `graph` intersecting at least one of `shapes`,
/// the indices of those shapes
pub fn edges_overlapping(graph: &StreetGraph, shapes: &[Geometry<f64>]) -> Vec<(EdgeIndex, Vec<usize>)> {
    let envelopes: Vec<IndexedEnvelope> = shapes
        .iter()
        .enumerate()
        .filter_map(|(idx, shape)| {
            let rect = shape.bounding_rect()?;
            Some(IndexedEnvelope::new(
                Rectangle::from_corners(rect.min().x_y().into(), rect.max().x_y().into()),
                idx,
            ))
        })
        .collect();
    let tree = RTree::bulk_load(envelopes);

    (0..graph.edge_count())
        .into_par_iter()
        .filter_map(|idx| {
            let edge = EdgeIndex::new(idx);
            let geometry = graph.edge(edge)?.geometry.to_geometry();
            let rect = geometry.bounding_rect()?;
            let query: AABB<[f64; 2]> =
                AABB::from_corners(rect.min().x_y().into(), rect.max().x_y().into());

            let mut hits: Vec<usize> = tree
                .locate_in_envelope_intersecting(&query)
                .map(|candidate| candidate.data)
                .filter(|&shape| geometry.intersects(&shapes[shape]))
                .collect();
            if hits.is_empty() {
                None
            } else {
                hits.sort_unstable();
                Some((edge, hits))
            }
        })
        .collect()
}

/// Edges whose geometry intersects any park
pub fn park_overlay(graph: &StreetGraph, parks: &[Geometry<f64>]) -> ParkOverlay {
    edges_overlapping(graph, parks)
        .into_iter()
        .map(|(edge, _)| edge)
        .collect()
}

/// Vulnerability of every edge overlapping population parcels
pub fn vulnerability_overlay(
    graph: &StreetGraph,
    parcels: &[PopulationParcel],
) -> VulnerabilityOverlay {
    let shapes: Vec<Geometry<f64>> = parcels.iter().map(|p| p.geometry.clone()).collect();
    let overlaps = edges_overlapping(graph, &shapes);

    VulnerabilityOverlay::from_overlaps(overlaps.into_iter().map(|(edge, hits)| {
        let parcels = hits
            .into_iter()
            .map(|idx| (parcels[idx].level, parcels[idx].factor))
            .collect::<Vec<_>>();
        (edge, parcels)
    }))
}

/// Loads the polygonal geometries of a park layer
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_parks(path: &Path) -> Result<Vec<Geometry<f64>>, Error> {
    let features = read_geojson_features(path)?;
    let mut parks = Vec::with_capacity(features.len());
    for feature in &features {
        if let Some(geometry @ (Geometry::Polygon(_) | Geometry::MultiPolygon(_))) =
            feature_geometry(feature)?
        {
            parks.push(geometry);
        }
    }
    info!("Loaded {} park polygons", parks.len());
    Ok(parks)
}

/// Loads population parcels, reading the count from `population_field`
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_population_parcels(
    path: &Path,
    population_field: &str,
) -> Result<Vec<PopulationParcel>, Error> {
    let features = read_geojson_features(path)?;
    let parcels = population_parcels_from_features(&features, population_field)?;
    info!("Loaded {} population parcels", parcels.len());
    Ok(parcels)
}

pub(crate) fn population_parcels_from_features(
    features: &[Feature],
    population_field: &str,
) -> Result<Vec<PopulationParcel>, Error> {
    let mut parcels = Vec::with_capacity(features.len());
    let mut unknown = 0usize;
    for feature in features {
        let Some(geometry) = feature_geometry(feature)? else {
            continue;
        };
        let population = numeric_property(feature, population_field).unwrap_or_else(|| {
            unknown += 1;
            f64::NAN
        });
        parcels.push(PopulationParcel::new(geometry, population));
    }
    if unknown > 0 {
        debug!("{unknown} parcels without a numeric '{population_field}' count are classed High");
    }
    Ok(parcels)
}
