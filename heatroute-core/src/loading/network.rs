//! Street graph construction from `GeoJSON` edge features
//!
//! Every feature is one directed edge with integer `u` and `v` node ids,
//! an optional `key` for parallel edges, an optional `length` in meters and
//! an optional `oneway` flag. Edges that are not one-way also get a reverse
//! twin with reversed geometry.

use std::path::Path;

use geo::{Geometry, Haversine, Point, line_measures::LengthMeasurable};
use geojson::Feature;
use log::{info, warn};

use super::parser::{feature_geometry, numeric_property, read_geojson_features};
use crate::{
    Error,
    model::{EdgeGeometry, NetworkKind, StreetEdge, StreetGraph},
};

/// Loads a street graph from a `GeoJSON` file of edges
///
/// # Errors
///
/// Returns an error if the file cannot be read or an edge lacks node ids
/// or carries a negative length.
pub fn street_graph_from_geojson(path: &Path, kind: NetworkKind) -> Result<StreetGraph, Error> {
    info!("Loading {kind} network from {}", path.display());
    let features = read_geojson_features(path)?;
    let graph = street_graph_from_features(&features, kind)?;
    info!(
        "Loaded {kind} network: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Builds a street graph from already parsed edge features
///
/// # Errors
///
/// See [`street_graph_from_geojson`].
pub fn street_graph_from_features(
    features: &[Feature],
    kind: NetworkKind,
) -> Result<StreetGraph, Error> {
    let mut graph = StreetGraph::new(kind);
    let mut skipped = 0usize;

    for (idx, feature) in features.iter().enumerate() {
        let geometry = match feature_geometry(feature)? {
            Some(Geometry::LineString(line)) if line.0.len() >= 2 => EdgeGeometry::Line(line),
            Some(Geometry::MultiLineString(lines)) if !lines.0.is_empty() => {
                EdgeGeometry::MultiLine(lines)
            }
            _ => {
                skipped += 1;
                continue;
            }
        };
        let (Some(start), Some(end)) = (geometry.first_coord(), geometry.last_coord()) else {
            skipped += 1;
            continue;
        };

        let u = node_id(feature, "u", idx)?;
        let v = node_id(feature, "v", idx)?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let key = numeric_property(feature, "key").map_or(0, |key| key as u32);
        let length = match numeric_property(feature, "length") {
            Some(length) => length,
            None => geometry.parts().map(|part| part.length(&Haversine)).sum(),
        };
        if length.is_nan() || length < 0.0 {
            return Err(Error::InvalidData(format!(
                "Edge {idx} ({u} -> {v}) has invalid length {length}"
            )));
        }
        let oneway = feature
            .property("oneway")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        let reverse = (!oneway).then(|| geometry.reversed());
        let from = graph.add_node(u, Point::from(start));
        let to = graph.add_node(v, Point::from(end));
        graph.add_edge(from, to, StreetEdge::new(length, geometry).with_key(key));
        if let Some(reverse) = reverse {
            graph.add_edge(to, from, StreetEdge::new(length, reverse).with_key(key));
        }
    }

    if skipped > 0 {
        warn!("Skipped {skipped} {kind} edges without usable line geometry");
    }
    Ok(graph)
}

fn node_id(feature: &Feature, name: &str, idx: usize) -> Result<i64, Error> {
    feature
        .property(name)
        .and_then(|value| value.as_i64().or_else(|| value.as_str()?.parse().ok()))
        .ok_or_else(|| Error::InvalidData(format!("Edge {idx} has no integer '{name}' node id")))
}
