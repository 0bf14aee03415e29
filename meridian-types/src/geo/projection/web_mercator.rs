use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::geo::projection::{Projection, ProjectionDescriptor};
use crate::geo::Datum;

/// Spherical Mercator projection (EPSG:3857).
///
/// Usable area is the square `[-PI*R, PI*R]` on both axes, which corresponds to latitudes of about `±85.0511`
/// degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercator {
    datum: Datum,
}

impl WebMercator {
    /// Creates a new projection with the given datum. Only the semimajor axis of the datum is used.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            datum: Datum::WGS84,
        }
    }
}

impl Projection for WebMercator {
    fn lon_to_x(&self, lon_rad: f64) -> f64 {
        self.datum.semimajor() * lon_rad
    }

    fn lat_to_y(&self, lat_rad: f64) -> f64 {
        self.datum.semimajor() * (FRAC_PI_4 + lat_rad / 2.0).tan().ln()
    }

    fn x_to_lon(&self, x: f64) -> f64 {
        x / self.datum.semimajor()
    }

    fn y_to_lat(&self, y: f64) -> f64 {
        FRAC_PI_2 - 2.0 * (-y / self.datum.semimajor()).exp().atan()
    }

    fn x_span(&self) -> f64 {
        2.0 * PI * self.datum.semimajor()
    }

    fn min_usable_y(&self) -> f64 {
        -PI * self.datum.semimajor()
    }

    fn max_usable_y(&self) -> f64 {
        PI * self.datum.semimajor()
    }

    fn descriptor(&self) -> ProjectionDescriptor {
        ProjectionDescriptor::WebMercator { datum: self.datum }
    }
}
