use std::fs::File;
use std::path::Path;

use geojson::{Feature, GeoJson};
use log::warn;

use crate::Error;

/// Reads all rows of a CSV file, skipping rows that fail to deserialize
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn deserialize_csv_file<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;

    let mut skipped = 0usize;
    let rows = csv::Reader::from_reader(file)
        .deserialize()
        .filter_map(|row| row.map_err(|_| skipped += 1).ok())
        .collect::<Vec<T>>();

    if skipped > 0 {
        warn!("Skipped {skipped} malformed rows in '{}'", path.display());
    }
    Ok(rows)
}

/// Reads a `GeoJSON` document as a list of features. A bare geometry
/// becomes a single feature without properties.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid `GeoJSON`.
pub fn read_geojson_features(path: &Path) -> Result<Vec<Feature>, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to read file '{}': {}", path.display(), e),
        )
    })?;
    parse_geojson_features(&text)
        .map_err(|e| Error::GeoJsonError(format!("{}: {e}", path.display())))
}

pub(crate) fn parse_geojson_features(text: &str) -> Result<Vec<Feature>, geojson::Error> {
    let geojson: GeoJson = text.parse()?;

    Ok(match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature::from(geometry)],
    })
}

/// Converts the geometry of a feature, `None` for features without one
pub(crate) fn feature_geometry(feature: &Feature) -> Result<Option<geo::Geometry<f64>>, Error> {
    feature
        .geometry
        .clone()
        .map(|geometry| {
            geo::Geometry::<f64>::try_from(geometry)
                .map_err(|e| Error::GeoJsonError(e.to_string()))
        })
        .transpose()
}

/// Numeric property, also accepting numbers encoded as strings
pub(crate) fn numeric_property(feature: &Feature, name: &str) -> Option<f64> {
    match feature.property(name)? {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
