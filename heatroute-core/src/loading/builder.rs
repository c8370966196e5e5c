use std::path::{Path, PathBuf};

use geo::{ConvexHull, Geometry, GeometryCollection, Intersects, MultiPoint};
use log::{info, warn};

use super::config::EvacuationModelConfig;
use super::network::street_graph_from_geojson;
use super::overlays::{load_parks, load_population_parcels, park_overlay, vulnerability_overlay};
use super::parser::{feature_geometry, read_geojson_features};
use super::shelters::load_shelters;
use crate::{
    Error,
    model::{
        EvacuationModel, NetworkKind, ParkOverlay, ShelterIndex, StreetGraph, StudyArea,
        VulnerabilityOverlay,
    },
};

/// Creates an evacuation model based on the provided configuration
///
/// # Errors
///
/// Returns an error if there are problems reading or processing data
pub fn create_evacuation_model(config: &EvacuationModelConfig) -> Result<EvacuationModel, Error> {
    validate_config(config)?;

    info!(
        "Processing street networks: {} (walk), {} (drive)",
        config.walk_network_path.display(),
        config.drive_network_path.display()
    );

    // Both networks are parsed in separate threads while the smaller
    // layers load on this one
    let walk_path = config.walk_network_path.clone();
    let walk_handle =
        std::thread::spawn(move || street_graph_from_geojson(&walk_path, NetworkKind::Walk));
    let drive_path = config.drive_network_path.clone();
    let drive_handle =
        std::thread::spawn(move || street_graph_from_geojson(&drive_path, NetworkKind::Drive));

    let area = load_study_area(&config.boundary_path)?;
    let shelters = load_shelters(&config.shelters_path)?;
    let parks = config.parks_path.as_deref().map(load_parks).transpose()?;
    let parcels = config
        .population_path
        .as_deref()
        .map(|path| load_population_parcels(path, &config.population_field))
        .transpose()?;

    let walk_graph = walk_handle
        .join()
        .map_err(|_| Error::UnrecoverableError("Walk network processing thread panicked"))??;
    let drive_graph = drive_handle
        .join()
        .map_err(|_| Error::UnrecoverableError("Drive network processing thread panicked"))??;

    validate_shelter_coverage(&walk_graph, &shelters);

    let parks = parks.map_or_else(ParkOverlay::new, |parks| park_overlay(&walk_graph, &parks));
    info!("Marked {} walk edges as passing through parks", parks.len());

    let vulnerability = parcels.map_or_else(VulnerabilityOverlay::new, |parcels| {
        vulnerability_overlay(&walk_graph, &parcels)
    });
    info!(
        "Resolved vulnerability for {} walk edges",
        vulnerability.len()
    );

    let model = EvacuationModel {
        walk_graph,
        drive_graph,
        area,
        shelters,
        parks,
        vulnerability,
    };
    info!("Evacuation model created successfully: {}", model.summary());
    Ok(model)
}

/// Reads the study area boundary, merging every feature of the document
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no areal geometry.
pub fn load_study_area(path: &Path) -> Result<StudyArea, Error> {
    let features = read_geojson_features(path)?;
    let mut geometries = Vec::with_capacity(features.len());
    for feature in &features {
        if let Some(geometry) = feature_geometry(feature)? {
            geometries.push(geometry);
        }
    }
    let area = StudyArea::from_geometry(Geometry::GeometryCollection(
        GeometryCollection::from(geometries),
    ))?;
    if area.boundary().0.is_empty() {
        return Err(Error::InvalidData(format!(
            "No study area boundary found in {}",
            path.display()
        )));
    }
    Ok(area)
}

fn validate_config(config: &EvacuationModelConfig) -> Result<(), Error> {
    let required = [
        ("Walk network", &config.walk_network_path),
        ("Drive network", &config.drive_network_path),
        ("Study area boundary", &config.boundary_path),
        ("Shelters", &config.shelters_path),
    ];
    let optional = [
        ("Parks", config.parks_path.as_ref()),
        ("Population", config.population_path.as_ref()),
    ];

    let all = required
        .into_iter()
        .chain(optional.into_iter().filter_map(|(label, path)| Some((label, path?))));
    for (label, path) in all {
        ensure_exists(label, path)?;
    }

    if config.population_field.trim().is_empty() {
        return Err(Error::InvalidData(
            "Population field name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn ensure_exists(label: &str, path: &PathBuf) -> Result<(), Error> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{label} file not found: {}", path.display()),
        )))
    }
}

#[allow(clippy::cast_precision_loss)]
fn validate_shelter_coverage(walk_graph: &StreetGraph, shelters: &ShelterIndex) {
    let graph_nodes: MultiPoint = walk_graph
        .graph
        .node_weights()
        .map(|node| node.geometry)
        .collect();
    let graph_hull = graph_nodes.convex_hull();

    let outside = shelters
        .iter()
        .filter(|shelter| !shelter.location.intersects(&graph_hull))
        .count();
    let total = shelters.len();

    if outside > 0 {
        let percentage = (outside as f64 / total as f64) * 100.0;
        warn!(
            "{outside} of {total} shelters ({percentage:.1}%) are outside the walk network \
             coverage area. Routes to them will end at the nearest network node."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &Path) -> EvacuationModelConfig {
        EvacuationModelConfig {
            walk_network_path: root.join("walk.geojson"),
            drive_network_path: root.join("drive.geojson"),
            boundary_path: root.join("boundary.geojson"),
            shelters_path: root.join("shelters.csv"),
            parks_path: None,
            population_path: None,
            population_field: "Pop20_75".to_string(),
        }
    }

    #[test]
    fn missing_files_are_reported() {
        let root = std::env::temp_dir().join("heatroute-missing-inputs");
        let err = create_evacuation_model(&config(&root)).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
        assert!(err.to_string().contains("Walk network"));
    }

    #[test]
    fn builds_model_from_files() {
        let root = std::env::temp_dir().join(format!("heatroute-builder-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        let network = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature",
             "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [0.001, 0.0]]},
             "properties": {"u": 1, "v": 2, "length": 111.0}},
            {"type": "Feature",
             "geometry": {"type": "LineString", "coordinates": [[0.001, 0.0], [0.001, 0.001]]},
             "properties": {"u": 2, "v": 3, "length": 111.0}}
        ]}"#;
        std::fs::write(root.join("walk.geojson"), network).unwrap();
        std::fs::write(root.join("drive.geojson"), network).unwrap();
        std::fs::write(
            root.join("boundary.geojson"),
            r#"{"type": "Polygon", "coordinates": [[[-1, -1], [1, -1], [1, 1], [-1, 1], [-1, -1]]]}"#,
        )
        .unwrap();
        std::fs::write(
            root.join("parks.geojson"),
            r#"{"type": "Polygon", "coordinates": [[[0.0002, -0.0001], [0.0004, -0.0001], [0.0004, 0.0001], [0.0002, 0.0001], [0.0002, -0.0001]]]}"#,
        )
        .unwrap();
        std::fs::write(
            root.join("shelters.csv"),
            "Name,Capacity,latitude,longitude\nHall,100,0.001,0.001\n",
        )
        .unwrap();

        let mut config = config(&root);
        config.parks_path = Some(root.join("parks.geojson"));
        let model = create_evacuation_model(&config).unwrap();

        assert_eq!(model.walk_graph.node_count(), 3);
        assert_eq!(model.walk_graph.edge_count(), 4);
        assert_eq!(model.drive_graph.kind, NetworkKind::Drive);
        assert_eq!(model.shelters.len(), 1);
        // forward edge and its reverse twin
        assert_eq!(model.parks.len(), 2);
        assert!(model.vulnerability.is_empty());
        assert!(model.area.contains(&geo::Point::new(0.5, 0.5)));

        std::fs::remove_dir_all(root).unwrap();
    }
}
