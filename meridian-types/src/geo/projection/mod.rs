//! Cylindrical map projections.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::cartesian::{CartesianPoint2d, Point2};
use crate::geo::{Datum, GeoPoint, LatLon};

mod equirectangular;
mod web_mercator;

pub use equirectangular::Equirectangular;
pub use web_mercator::WebMercator;

/// Cylindrical projection from geographic coordinates into planar map coordinates.
///
/// Longitude maps linearly to `x`, so the projected world repeats every [`Projection::x_span`] units along the x
/// axis. Latitude maps monotonically to `y`, which may grow without bound towards the poles; usable range of `y` is
/// limited by [`Projection::min_usable_y`] and [`Projection::max_usable_y`].
pub trait Projection: Debug + Send + Sync {
    /// Projects longitude (radians) into x coordinate.
    fn lon_to_x(&self, lon_rad: f64) -> f64;
    /// Projects latitude (radians) into y coordinate.
    fn lat_to_y(&self, lat_rad: f64) -> f64;
    /// Inverse of [`Projection::lon_to_x`].
    fn x_to_lon(&self, x: f64) -> f64;
    /// Inverse of [`Projection::lat_to_y`].
    fn y_to_lat(&self, y: f64) -> f64;
    /// Width of the world in projected units. Points `x` and `x + x_span` are the same place on the map.
    fn x_span(&self) -> f64;
    /// Lowest `y` that can be displayed, the south pole edge of the map.
    fn min_usable_y(&self) -> f64;
    /// Highest `y` that can be displayed, the north pole edge of the map.
    fn max_usable_y(&self) -> f64;
    /// Serializable description of the projection, that can be used to create the same projection elsewhere.
    fn descriptor(&self) -> ProjectionDescriptor;

    /// X coordinate of the central meridian (longitude 0).
    fn central_meridian_x(&self) -> f64 {
        self.lon_to_x(0.0)
    }

    /// Projects the point, clamping `y` to the usable range.
    fn project_clamped(&self, point: &LatLon) -> Point2 {
        let y = self
            .lat_to_y(point.lat_rad())
            .clamp(self.min_usable_y(), self.max_usable_y());
        Point2::new(self.lon_to_x(point.lon_rad()), y)
    }

    /// Projects the point. Returns `None` if the result is not finite.
    fn project(&self, input: &LatLon) -> Option<Point2> {
        let x = self.lon_to_x(input.lon_rad());
        let y = self.lat_to_y(input.lat_rad());

        if x.is_finite() && y.is_finite() {
            Some(Point2::new(x, y))
        } else {
            None
        }
    }

    /// Converts a projected point back into geographic coordinates.
    fn unproject(&self, input: &Point2) -> Option<LatLon> {
        let lat = self.y_to_lat(input.y());
        let lon = self.x_to_lon(input.x());

        if lat.is_finite() && lon.is_finite() {
            Some(LatLon::new(lat, lon))
        } else {
            None
        }
    }
}

/// Name and parameters of a projection.
///
/// Descriptors are sent to other threads or processes instead of the projections themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum ProjectionDescriptor {
    /// See [`WebMercator`].
    WebMercator {
        /// Datum of the projection.
        datum: Datum,
    },
    /// See [`Equirectangular`].
    Equirectangular {
        /// Radius of the sphere in meters.
        radius: f64,
    },
}

impl ProjectionDescriptor {
    /// Creates the projection described by the descriptor.
    pub fn build(&self) -> Box<dyn Projection> {
        match *self {
            ProjectionDescriptor::WebMercator { datum } => Box::new(WebMercator::new(datum)),
            ProjectionDescriptor::Equirectangular { radius } => {
                Box::new(Equirectangular::new(radius))
            }
        }
    }
}

impl Default for ProjectionDescriptor {
    fn default() -> Self {
        ProjectionDescriptor::WebMercator {
            datum: Datum::WGS84,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_round_trip() {
        for projection in [
            Box::new(WebMercator::default()) as Box<dyn Projection>,
            Box::new(Equirectangular::default()),
        ] {
            let descriptor = projection.descriptor();
            let json = serde_json::to_string(&descriptor).unwrap();
            let restored: ProjectionDescriptor = serde_json::from_str(&json).unwrap();
            assert_eq!(restored, descriptor);

            let rebuilt = restored.build();
            assert_eq!(rebuilt.x_span(), projection.x_span());
            assert_eq!(rebuilt.lat_to_y(0.7), projection.lat_to_y(0.7));
        }
    }

    #[test]
    fn descriptor_json_uses_names() {
        let json = serde_json::to_value(ProjectionDescriptor::Equirectangular { radius: 1.0 })
            .unwrap();
        assert_eq!(json["name"], "Equirectangular");
    }

    #[test]
    fn project_clamped_keeps_poles_finite() {
        let projection = WebMercator::default();
        let north = projection.project_clamped(&LatLon::from_degrees(90.0, 0.0));
        assert_eq!(north.y(), projection.max_usable_y());

        let south = projection.project_clamped(&LatLon::from_degrees(-89.0, 0.0));
        assert_eq!(south.y(), projection.min_usable_y());

        let unclamped = projection
            .project(&LatLon::from_degrees(89.0, 0.0))
            .expect("finite projection");
        assert!(unclamped.y() > projection.max_usable_y());
    }
}
