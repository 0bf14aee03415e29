use std::f64::consts::{FRAC_PI_2, PI};

use crate::geo::projection::{Projection, ProjectionDescriptor};
use crate::geo::Datum;

/// Equirectangular (plate carrée) projection on a sphere: both longitude and latitude map linearly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Equirectangular {
    radius: f64,
}

impl Equirectangular {
    /// Creates a new projection for the sphere of the given radius (meters).
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for Equirectangular {
    fn default() -> Self {
        Self::new(Datum::WGS84.semimajor())
    }
}

impl Projection for Equirectangular {
    fn lon_to_x(&self, lon_rad: f64) -> f64 {
        self.radius * lon_rad
    }

    fn lat_to_y(&self, lat_rad: f64) -> f64 {
        self.radius * lat_rad
    }

    fn x_to_lon(&self, x: f64) -> f64 {
        x / self.radius
    }

    fn y_to_lat(&self, y: f64) -> f64 {
        y / self.radius
    }

    fn x_span(&self) -> f64 {
        2.0 * PI * self.radius
    }

    fn min_usable_y(&self) -> f64 {
        -FRAC_PI_2 * self.radius
    }

    fn max_usable_y(&self) -> f64 {
        FRAC_PI_2 * self.radius
    }

    fn descriptor(&self) -> ProjectionDescriptor {
        ProjectionDescriptor::Equirectangular {
            radius: self.radius,
        }
    }
}
