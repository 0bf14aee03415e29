use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, LatLon};

/// Path between two points on the sphere: `frac` in `[0, 1]` maps to a point on the path.
pub type InterpolatedPath = Box<dyn Fn(f64) -> LatLon + Send>;

/// Defines what a "straight line" between two geographic points is.
pub trait Interpolator: Send + Sync {
    /// Returns the path from `a` (at `frac == 0`) to `b` (at `frac == 1`).
    fn interpolate(&self, a: LatLon, b: LatLon) -> InterpolatedPath;

    /// Serializable description of the interpolator.
    fn descriptor(&self) -> InterpolatorDescriptor;
}

/// Shortest path on the sphere (great circle arc).
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct GreatCircle;

impl Interpolator for GreatCircle {
    fn interpolate(&self, a: LatLon, b: LatLon) -> InterpolatedPath {
        let va = a.to_unit_vector();
        let vb = b.to_unit_vector();
        let cos_omega = va.dot(&vb).clamp(-1.0, 1.0);
        let omega = cos_omega.acos();
        let sin_omega = omega.sin();

        if sin_omega.abs() < 1e-12 {
            if cos_omega > 0.0 {
                return Box::new(move |_: f64| a);
            }

            // Antipodal points: any great circle through both is the shortest path, pick the one through
            // a direction orthogonal to `a`.
            let ortho = orthogonal(&va);
            return Box::new(move |frac: f64| {
                let angle = PI * frac;
                LatLon::from_vector(&(va * angle.cos() + ortho * angle.sin()))
            });
        }

        Box::new(move |frac: f64| {
            let wa = ((1.0 - frac) * omega).sin() / sin_omega;
            let wb = (frac * omega).sin() / sin_omega;
            LatLon::from_vector(&(va * wa + vb * wb))
        })
    }

    fn descriptor(&self) -> InterpolatorDescriptor {
        InterpolatorDescriptor::GreatCircle
    }
}

fn orthogonal(v: &Vector3<f64>) -> Vector3<f64> {
    let axis = if v.z.abs() < 0.9 {
        Vector3::z()
    } else {
        Vector3::x()
    };
    v.cross(&axis).normalize()
}

/// Path of constant bearing (loxodrome). Takes the shorter way around in longitude.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RhumbLine;

const MAX_RHUMB_LAT: f64 = FRAC_PI_2 - 1e-9;

fn mercator_lat(lat_rad: f64) -> f64 {
    (FRAC_PI_4 + lat_rad.clamp(-MAX_RHUMB_LAT, MAX_RHUMB_LAT) / 2.0)
        .tan()
        .ln()
}

fn inverse_mercator_lat(psi: f64) -> f64 {
    2.0 * psi.exp().atan() - FRAC_PI_2
}

impl Interpolator for RhumbLine {
    fn interpolate(&self, a: LatLon, b: LatLon) -> InterpolatedPath {
        let psi_a = mercator_lat(a.lat_rad());
        let psi_b = mercator_lat(b.lat_rad());
        let lon_a = a.lon_rad();
        let d_lon = (b.lon_rad() - lon_a + PI).rem_euclid(2.0 * PI) - PI;

        Box::new(move |frac: f64| {
            if frac <= 0.0 {
                return a;
            }
            if frac >= 1.0 {
                return b;
            }

            let psi = psi_a + (psi_b - psi_a) * frac;
            LatLon::new(inverse_mercator_lat(psi), lon_a + d_lon * frac)
        })
    }

    fn descriptor(&self) -> InterpolatorDescriptor {
        InterpolatorDescriptor::RhumbLine
    }
}

/// Name of an interpolator.
///
/// Descriptors are sent to other threads or processes instead of the interpolators themselves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolatorDescriptor {
    /// See [`GreatCircle`].
    #[default]
    GreatCircle,
    /// See [`RhumbLine`].
    RhumbLine,
}

impl InterpolatorDescriptor {
    /// Creates the interpolator described by the descriptor.
    pub fn build(&self) -> Box<dyn Interpolator> {
        match self {
            InterpolatorDescriptor::GreatCircle => Box::new(GreatCircle),
            InterpolatorDescriptor::RhumbLine => Box::new(RhumbLine),
        }
    }
}
