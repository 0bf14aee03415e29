use serde::{Deserialize, Serialize};

/// Reference ellipsoid of the celestial body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// World Geodetic System 1984.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Creates a new datum from its semimajor axis (meters) and inverse flattening.
    pub const fn new(semimajor: f64, inv_flattening: f64) -> Self {
        Self {
            semimajor,
            inv_flattening,
        }
    }

    /// Semimajor axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening of the ellipsoid.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Mean radius of the ellipsoid (IUGG definition `(2a + b) / 3`).
    pub fn mean_radius(&self) -> f64 {
        self.semimajor * (1.0 - 1.0 / (3.0 * self.inv_flattening))
    }

    /// Circumference of the sphere with the mean radius.
    pub fn mean_circumference(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.mean_radius()
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wgs84_mean_radius() {
        assert_abs_diff_eq!(Datum::WGS84.mean_radius(), 6_371_008.77, epsilon = 0.01);
        assert_abs_diff_eq!(
            Datum::WGS84.mean_circumference(),
            4.003e7,
            epsilon = 1.0e4
        );
    }
}
