use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::MeridianTypesError;

/// Point on the surface of a celestial body.
pub trait GeoPoint {
    /// Latitude in degrees.
    fn lat(&self) -> f64;
    /// Longitude in degrees.
    fn lon(&self) -> f64;

    /// Latitude in radians.
    fn lat_rad(&self) -> f64 {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> f64 {
        self.lon().to_radians()
    }
}

/// Input position: longitude and latitude in degrees with optional altitude in meters.
///
/// Serializes as a GeoJSON position array: `[lon, lat]` or `[lon, lat, alt]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position {
    lon: f64,
    lat: f64,
    alt: Option<f64>,
}

impl Position {
    /// Creates a new position without altitude.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            alt: None,
        }
    }

    /// Returns the same position at the given altitude.
    pub const fn with_altitude(self, alt: f64) -> Self {
        Self {
            lon: self.lon,
            lat: self.lat,
            alt: Some(alt),
        }
    }

    /// Altitude in meters, if set.
    pub fn altitude(&self) -> Option<f64> {
        self.alt
    }

    /// Altitude in meters, or `0` if not set.
    pub fn altitude_or_zero(&self) -> f64 {
        self.alt.unwrap_or(0.0)
    }

    /// Converts the position into radians.
    pub fn to_latlon(&self) -> LatLon {
        LatLon::from(self)
    }
}

impl GeoPoint for Position {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = MeridianTypesError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        match value[..] {
            [lon, lat] => Ok(Self::new(lon, lat)),
            [lon, lat, alt, ..] => Ok(Self::new(lon, lat).with_altitude(alt)),
            _ => Err(MeridianTypesError::ShortPosition(value.len())),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(value: Position) -> Self {
        match value.alt {
            Some(alt) => vec![value.lon, value.lat, alt],
            None => vec![value.lon, value.lat],
        }
    }
}

/// Creates a [`Position`] from longitude and latitude values (in degrees), with optional altitude.
///
/// ```
/// use meridian_types::geo::GeoPoint;
/// use meridian_types::lonlat;
///
/// let point = lonlat!(52.0, 38.0);
/// assert_eq!(point.lat(), 38.0);
/// assert_eq!(lonlat!(1.0, 2.0, 100.0).altitude(), Some(100.0));
/// ```
#[macro_export]
macro_rules! lonlat {
    ($lon:expr, $lat:expr) => {
        $crate::geo::Position::new($lon, $lat)
    };
    ($lon:expr, $lat:expr, $alt:expr) => {
        $crate::geo::Position::new($lon, $lat).with_altitude($alt)
    };
}

/// Geographic point in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    lat_rad: f64,
    lon_rad: f64,
}

impl LatLon {
    /// Creates a point from latitude and longitude in radians.
    pub const fn new(lat_rad: f64, lon_rad: f64) -> Self {
        Self { lat_rad, lon_rad }
    }

    /// Creates a point from latitude and longitude in degrees.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self::new(lat.to_radians(), lon.to_radians())
    }

    /// Unit vector from the center of the unit sphere to the point.
    ///
    /// The z axis points to the north pole, the x axis to the intersection of the prime meridian and the equator.
    pub fn to_unit_vector(&self) -> Vector3<f64> {
        let (sin_lat, cos_lat) = self.lat_rad.sin_cos();
        let (sin_lon, cos_lon) = self.lon_rad.sin_cos();
        Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Point corresponding to the direction of the vector. The vector does not need to be normalized.
    pub fn from_vector(v: &Vector3<f64>) -> Self {
        let horizontal = (v.x * v.x + v.y * v.y).sqrt();
        Self::new(v.z.atan2(horizontal), v.y.atan2(v.x))
    }

    /// Returns true if both coordinates differ by no more than `epsilon` radians.
    pub fn approx_eq(&self, other: &LatLon, epsilon: f64) -> bool {
        (self.lat_rad - other.lat_rad).abs() <= epsilon
            && (self.lon_rad - other.lon_rad).abs() <= epsilon
    }
}

impl GeoPoint for LatLon {
    fn lat(&self) -> f64 {
        self.lat_rad.to_degrees()
    }

    fn lon(&self) -> f64 {
        self.lon_rad.to_degrees()
    }

    fn lat_rad(&self) -> f64 {
        self.lat_rad
    }

    fn lon_rad(&self) -> f64 {
        self.lon_rad
    }
}

impl From<&Position> for LatLon {
    fn from(value: &Position) -> Self {
        Self::new(value.lat_rad(), value.lon_rad())
    }
}
