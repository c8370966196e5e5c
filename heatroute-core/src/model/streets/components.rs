//! Street network components - nodes and edges

use geo::{Coord, Geometry, LineString, MultiLineString, Point};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// Source (OSM) identifier of the node
    pub id: i64,
    /// Node coordinates, longitude/latitude
    pub geometry: Point<f64>,
}

/// Street graph edge (street segment)
#[derive(Debug, Clone)]
pub struct StreetEdge {
    /// Segment length in meters
    pub length: f64,
    /// Street geometry, oriented from source to target node
    pub geometry: EdgeGeometry,
    /// Disambiguates parallel edges between the same node pair in the source data
    pub key: u32,
}

impl StreetEdge {
    pub fn new(length: f64, geometry: EdgeGeometry) -> Self {
        Self {
            length,
            geometry,
            key: 0,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: u32) -> Self {
        self.key = key;
        self
    }
}

/// Edge geometry as delivered by the network source: a single line,
/// or a line made of several parts.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeGeometry {
    Line(LineString<f64>),
    MultiLine(MultiLineString<f64>),
}

impl EdgeGeometry {
    /// Straight segment between two points
    pub fn straight(from: Point<f64>, to: Point<f64>) -> Self {
        EdgeGeometry::Line(LineString::new(vec![from.into(), to.into()]))
    }

    /// Constituent lines, in order
    pub fn parts(&self) -> impl Iterator<Item = &LineString<f64>> {
        let parts: &[LineString<f64>] = match self {
            EdgeGeometry::Line(line) => std::slice::from_ref(line),
            EdgeGeometry::MultiLine(lines) => &lines.0,
        };
        parts.iter()
    }

    pub fn first_coord(&self) -> Option<Coord<f64>> {
        self.parts().find_map(|line| line.0.first().copied())
    }

    pub fn last_coord(&self) -> Option<Coord<f64>> {
        self.parts()
            .filter_map(|line| line.0.last().copied())
            .last()
    }

    /// Same geometry traversed in the opposite direction
    #[must_use]
    pub fn reversed(&self) -> Self {
        let reverse_line = |line: &LineString<f64>| {
            let mut coords = line.0.clone();
            coords.reverse();
            LineString::new(coords)
        };
        match self {
            EdgeGeometry::Line(line) => EdgeGeometry::Line(reverse_line(line)),
            EdgeGeometry::MultiLine(lines) => {
                EdgeGeometry::MultiLine(MultiLineString::new(
                    lines.0.iter().rev().map(reverse_line).collect(),
                ))
            }
        }
    }

    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            EdgeGeometry::Line(line) => Geometry::LineString(line.clone()),
            EdgeGeometry::MultiLine(lines) => Geometry::MultiLineString(lines.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    #[test]
    fn multi_part_reversal_keeps_parts() {
        let geometry = EdgeGeometry::MultiLine(MultiLineString::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
            line_string![(x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
        ]));
        let reversed = geometry.reversed();

        assert_eq!(reversed.parts().count(), 2);
        assert_eq!(reversed.first_coord(), Some(Coord { x: 1.0, y: 1.0 }));
        assert_eq!(reversed.last_coord(), Some(Coord { x: 0.0, y: 0.0 }));
    }
}
