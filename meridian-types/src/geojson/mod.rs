//! Conversion from the types of the [`geojson`] crate.

use geojson::Value;

use crate::error::MeridianTypesError;
use crate::geo::Position;
use crate::Geometry;

fn position(value: &[f64]) -> Result<Position, MeridianTypesError> {
    Position::try_from(value.to_vec())
}

fn positions(value: &[Vec<f64>]) -> Result<Vec<Position>, MeridianTypesError> {
    value.iter().map(|p| position(p)).collect()
}

fn rings(value: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<Position>>, MeridianTypesError> {
    value.iter().map(|ring| positions(ring)).collect()
}

impl TryFrom<&Value> for Geometry {
    type Error = MeridianTypesError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Point(p) => Geometry::Point {
                coordinates: position(p)?,
            },
            Value::MultiPoint(points) => Geometry::MultiPoint {
                coordinates: positions(points)?,
            },
            Value::LineString(line) => Geometry::LineString {
                coordinates: positions(line)?,
            },
            Value::MultiLineString(lines) => Geometry::MultiLineString {
                coordinates: rings(lines)?,
            },
            Value::Polygon(polygon) => Geometry::Polygon {
                coordinates: rings(polygon)?,
            },
            Value::MultiPolygon(polygons) => Geometry::MultiPolygon {
                coordinates: polygons
                    .iter()
                    .map(|polygon| rings(polygon))
                    .collect::<Result<_, _>>()?,
            },
            Value::GeometryCollection(geometries) => Geometry::GeometryCollection {
                geometries: geometries
                    .iter()
                    .map(Geometry::try_from)
                    .collect::<Result<_, _>>()?,
            },
        })
    }
}

impl TryFrom<&geojson::Geometry> for Geometry {
    type Error = MeridianTypesError;

    fn try_from(value: &geojson::Geometry) -> Result<Self, Self::Error> {
        Self::try_from(&value.value)
    }
}

impl TryFrom<geojson::Geometry> for Geometry {
    type Error = MeridianTypesError;

    fn try_from(value: geojson::Geometry) -> Result<Self, Self::Error> {
        Self::try_from(&value.value)
    }
}
