//! Route geometry for map rendering

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde::{Serialize, Serializer};
use serde_json::json;

use super::Path;
use crate::{
    Error,
    model::{StreetGraph, VulnerabilityLevel, VulnerabilityOverlay},
};

/// One line of the walking route, tagged with the vulnerability level of
/// the edge it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkSegment {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(serialize_with = "serialize_line")]
    pub geometry: LineString<f64>,
    pub vulnerability_level: VulnerabilityLevel,
}

/// Driving route as a node-to-node polyline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveSegment {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(serialize_with = "serialize_line")]
    pub geometry: LineString<f64>,
    pub mode: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteSegments {
    pub walk: Vec<WalkSegment>,
    pub drive: Vec<DriveSegment>,
}

fn serialize_line<S: Serializer>(line: &LineString<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    Geometry::new(GeoJsonValue::from(line)).serialize(serializer)
}

/// One segment per traversed edge; multi-part edges yield one segment per
/// part, all carrying the parent edge's level.
pub fn walk_segments(
    graph: &StreetGraph,
    vulnerability: &VulnerabilityOverlay,
    path: &Path,
) -> Vec<WalkSegment> {
    let mut segments = Vec::with_capacity(path.edges().len());
    for hop in path.hops() {
        let Some(street) = graph.edge(hop.edge) else {
            continue;
        };
        let vulnerability_level = vulnerability.level(hop.edge);
        segments.extend(street.geometry.parts().map(|part| WalkSegment {
            kind: "LineString",
            geometry: part.clone(),
            vulnerability_level,
        }));
    }
    segments
}

/// A single polyline through the path's node coordinates. Paths that do
/// not leave their start node produce no segment.
pub fn drive_segments(graph: &StreetGraph, path: &Path) -> Vec<DriveSegment> {
    if path.is_trivial() {
        return Vec::new();
    }
    let coords: Vec<Coord<f64>> = path
        .nodes()
        .iter()
        .filter_map(|&node| graph.node(node))
        .map(|node| node.geometry.into())
        .collect();

    vec![DriveSegment {
        kind: "LineString",
        geometry: LineString::new(coords),
        mode: "drive",
    }]
}

impl RouteSegments {
    pub fn new(
        walk_graph: &StreetGraph,
        vulnerability: &VulnerabilityOverlay,
        heat_path: &Path,
        drive_graph: &StreetGraph,
        drive_path: &Path,
    ) -> Self {
        Self {
            walk: walk_segments(walk_graph, vulnerability, heat_path),
            drive: drive_segments(drive_graph, drive_path),
        }
    }

    /// Converts both routes to a `GeoJSON` `FeatureCollection`.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.walk.len() + self.drive.len());

        for (idx, segment) in self.walk.iter().enumerate() {
            features.push(create_feature(
                &segment.geometry,
                json!({
                    "leg_type": "walk",
                    "segment_index": idx,
                    "vulnerability_level": segment.vulnerability_level,
                }),
            )?);
        }
        for (idx, segment) in self.drive.iter().enumerate() {
            features.push(create_feature(
                &segment.geometry,
                json!({
                    "leg_type": segment.mode,
                    "segment_index": idx,
                }),
            )?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn create_feature(line: &LineString<f64>, properties: serde_json::Value) -> Result<Feature, Error> {
    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(line)),
        "properties": properties,
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
