//! Bounded study area that routing requests must start in

use geo::{Contains, Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use log::warn;

use crate::Error;

#[derive(Debug, Clone)]
pub struct StudyArea {
    boundary: MultiPolygon<f64>,
}

impl StudyArea {
    pub fn new(boundary: MultiPolygon<f64>) -> Self {
        Self { boundary }
    }

    /// Accepts polygonal boundaries as well as boundary lines, which are
    /// closed into a ring when their endpoints differ.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for point geometries or degenerate rings.
    pub fn from_geometry(geometry: Geometry<f64>) -> Result<Self, Error> {
        let boundary = match geometry {
            Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon]),
            Geometry::MultiPolygon(polygons) => polygons,
            Geometry::LineString(line) => MultiPolygon::new(vec![ring_to_polygon(line)?]),
            Geometry::MultiLineString(lines) => MultiPolygon::new(
                lines
                    .0
                    .into_iter()
                    .map(ring_to_polygon)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Geometry::GeometryCollection(collection) => {
                let mut polygons = Vec::new();
                for geometry in collection {
                    polygons.extend(Self::from_geometry(geometry)?.boundary.0);
                }
                MultiPolygon::new(polygons)
            }
            other => {
                return Err(Error::InvalidData(format!(
                    "Study area must be polygonal or a closed line, got {other:?}"
                )));
            }
        };
        Ok(Self { boundary })
    }

    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.boundary.contains(point)
    }

    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }
}

fn ring_to_polygon(line: LineString<f64>) -> Result<Polygon<f64>, Error> {
    let mut coords: Vec<Coord<f64>> = line.0;
    if coords.len() < 3 {
        return Err(Error::InvalidData(format!(
            "Boundary line has {} coordinates, at least 3 are needed for a ring",
            coords.len()
        )));
    }
    if coords.first() != coords.last() {
        warn!("Boundary line is not closed, closing it into a ring");
        coords.push(coords[0]);
    }
    Ok(Polygon::new(LineString::new(coords), vec![]))
}
