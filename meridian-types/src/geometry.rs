use serde::{Deserialize, Serialize};

use crate::geo::Position;

/// Input geometry in geographic coordinates.
///
/// Serializes as a GeoJSON geometry object. Polygons are lists of rings, the first ring is the outer boundary and the
/// rest are holes. GeoJSON rings repeat the first position at the end; this is allowed but not required.
///
/// Geometry objects with a `type` that is not one of the GeoJSON geometry types deserialize into
/// [`Geometry::Unsupported`] instead of failing, so that data with future or custom geometry types can still be
/// processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Single point.
    Point {
        /// Position of the point.
        coordinates: Position,
    },
    /// Set of points.
    MultiPoint {
        /// Positions of the points.
        coordinates: Vec<Position>,
    },
    /// Polyline.
    LineString {
        /// Vertices of the line.
        coordinates: Vec<Position>,
    },
    /// Set of polylines.
    MultiLineString {
        /// Lines.
        coordinates: Vec<Vec<Position>>,
    },
    /// Polygon with optional holes.
    Polygon {
        /// Outer ring followed by hole rings.
        coordinates: Vec<Vec<Position>>,
    },
    /// Set of polygons.
    MultiPolygon {
        /// Polygons, each is an outer ring followed by hole rings.
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    /// Heterogeneous set of geometries.
    GeometryCollection {
        /// Geometries of the collection.
        geometries: Vec<Geometry>,
    },
    /// Geometry of unknown type.
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// Total number of positions in the geometry, including nested collections.
    pub fn position_count(&self) -> usize {
        match self {
            Geometry::Point { .. } => 1,
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.len()
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().map(Vec::len).sum()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flat_map(|polygon| polygon.iter().map(Vec::len))
                .sum(),
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().map(Geometry::position_count).sum()
            }
            Geometry::Unsupported => 0,
        }
    }
}

impl From<Position> for Geometry {
    fn from(value: Position) -> Self {
        Self::Point { coordinates: value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lonlat;
    use assert_matches::assert_matches;

    #[test]
    fn parses_geojson_geometries() {
        let json = r#"{
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [1.0, 2.0]},
                {"type": "LineString", "coordinates": [[0, 0], [10, 10, 5]]},
                {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}
            ]
        }"#;

        let geometry: Geometry = serde_json::from_str(json).unwrap();
        let Geometry::GeometryCollection { geometries } = &geometry else {
            panic!("expected collection, got {geometry:?}");
        };

        assert_eq!(
            geometries[0],
            Geometry::Point {
                coordinates: lonlat!(1.0, 2.0)
            }
        );
        assert_matches!(&geometries[1], Geometry::LineString { coordinates } if coordinates[1] == lonlat!(10.0, 10.0, 5.0));
        assert_eq!(geometry.position_count(), 7);
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let json = r#"{"type": "Curve", "coordinates": [[0, 0], [1, 1]]}"#;
        let geometry: Geometry = serde_json::from_str(json).unwrap();

        assert_eq!(geometry, Geometry::Unsupported);
        assert_eq!(geometry.position_count(), 0);
    }

    #[test]
    fn serializes_as_geojson() {
        let geometry = Geometry::from(lonlat!(3.0, 4.0));
        let value = serde_json::to_value(&geometry).unwrap();

        assert_eq!(value["type"], "Point");
        assert_eq!(value["coordinates"], serde_json::json!([3.0, 4.0]));
    }
}
