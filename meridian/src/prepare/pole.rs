//! Polygon rings that enclose a pole.
//!
//! On a cylindrical projection a ring around a pole is not closed: it goes around the whole world and ends a world
//! span away from where it started. To fill such a ring, it is closed along the map edge nearest to the pole.

use std::f64::consts::PI;

use meridian_types::cartesian::{CartesianPoint2d, Point2};
use meridian_types::geo::{GeoPoint, LatLon, Projection};
use nalgebra::Vector3;

use crate::resample::{project_path, Resampler};

/// Pole of the Earth.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pole {
    /// North pole.
    North,
    /// South pole.
    South,
}

impl Pole {
    /// `y` of the map edge nearest to the pole.
    pub fn edge_y(&self, projection: &dyn Projection) -> f64 {
        match self {
            Pole::North => projection.max_usable_y(),
            Pole::South => projection.min_usable_y(),
        }
    }
}

/// Returns the pole enclosed by the ring, if any.
///
/// A ring encloses a pole if it winds once around the polar axis (the sum of its longitude steps is a full turn).
/// Which of the two poles it is, is decided by the hemisphere of the centroid of the ring vertices on the sphere.
pub fn enclosed_pole(ring: &[LatLon]) -> Option<Pole> {
    if ring.len() < 3 {
        return None;
    }

    let next = ring.iter().skip(1).chain(ring.first());
    let winding: f64 = ring
        .iter()
        .zip(next)
        .map(|(a, b)| normalize_angle(b.lon_rad() - a.lon_rad()))
        .sum();

    if winding.abs() < PI {
        return None;
    }

    let centroid: Vector3<f64> = ring.iter().map(LatLon::to_unit_vector).sum();
    if centroid.z >= 0.0 {
        Some(Pole::North)
    } else {
        Some(Pole::South)
    }
}

/// Normalizes the angle into `[-PI, PI)`.
fn normalize_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// Projects a ring enclosing the `pole` into a simple planar ring over the x window
/// `[window_start, window_start + x_span]`.
///
/// The ring is projected (and resampled if `resampler` is given) with the closing edge, and the resulting path,
/// which ends a world span away from where it started, is cut where it crosses the window edge. The ring starts at
/// the cut on the west side of the window, follows the path to the cut on the east side, and is closed through the
/// map edge nearest to the pole.
///
/// All rings of one polygon must be closed over the same window, otherwise the areas between the rings and the map
/// edge do not cancel out. The returned ring is implicitly closed. All `y` values are within the usable range of
/// the projection.
pub fn close_through_pole(
    ring: &[LatLon],
    pole: Pole,
    projection: &dyn Projection,
    resampler: Option<&Resampler>,
    window_start: f64,
) -> Vec<Point2> {
    let span = projection.x_span();
    let mut path = project_path(projection, resampler, ring, window_start, true);
    let (Some(first), Some(last)) = (path.first().copied(), path.last().copied()) else {
        return path;
    };

    if last.x() < first.x() {
        path.reverse();
    }

    let (min_y, max_y) = (projection.min_usable_y(), projection.max_usable_y());
    let mut closed: Vec<Point2> = cut_at_window(&path, window_start, span)
        .into_iter()
        .map(|point| point.with_y(point.y().clamp(min_y, max_y)))
        .collect();

    let edge_y = pole.edge_y(projection);
    closed.push(Point2::new(window_start + span, edge_y));
    closed.push(Point2::new(window_start, edge_y));

    // Cuts at the window edges may land next to existing vertices.
    let tolerance = span * f64::EPSILON * 16.0;
    closed.dedup_by(|a, b| (a.x() - b.x()).abs() <= tolerance && (a.y() - b.y()).abs() <= tolerance);

    log::trace!(
        "Closed ring of {} vertices through {pole:?} pole",
        closed.len()
    );

    closed
}

/// Reorders an eastward path going once around the world, so that it runs from `window_start` to
/// `window_start + span`.
///
/// The last point of the path must be the first one shifted by `span`.
fn cut_at_window(path: &[Point2], window_start: f64, span: f64) -> Vec<Point2> {
    let Some(first) = path.first() else {
        return vec![];
    };

    let shift = ((first.x() - window_start) / span).floor() * span;
    let shifted: Vec<Point2> = path
        .iter()
        .map(|p| Point2::new(p.x() - shift, p.y()))
        .collect();

    let window_end = window_start + span;
    let Some(cut) = shifted
        .windows(2)
        .position(|pair| pair[0].x() < window_end && pair[1].x() >= window_end)
    else {
        return shifted;
    };

    let (from, to) = (shifted[cut], shifted[cut + 1]);
    let t = (window_end - from.x()) / (to.x() - from.x());
    let cut_y = from.y() + (to.y() - from.y()) * t;

    let mut ring = Vec::with_capacity(shifted.len() + 4);
    ring.push(Point2::new(window_start, cut_y));
    ring.extend(
        shifted[cut + 1..shifted.len() - 1]
            .iter()
            .map(|p| Point2::new(p.x() - span, p.y())),
    );
    ring.extend_from_slice(&shifted[..=cut]);
    ring.push(Point2::new(window_end, cut_y));

    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_types::geo::{GreatCircle, WebMercator};

    fn circle(lat: f64, step: usize) -> Vec<LatLon> {
        (0..360)
            .step_by(step)
            .map(|lon| LatLon::from_degrees(lat, lon as f64 - 180.0))
            .collect()
    }

    fn cross(o: &Point2, a: &Point2, b: &Point2) -> f64 {
        (a.x() - o.x()) * (b.y() - o.y()) - (a.y() - o.y()) * (b.x() - o.x())
    }

    fn segments_cross(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
        let d1 = cross(c, d, a);
        let d2 = cross(c, d, b);
        let d3 = cross(a, b, c);
        let d4 = cross(a, b, d);
        d1 * d2 < 0.0 && d3 * d4 < 0.0
    }

    fn is_simple(ring: &[Point2]) -> bool {
        let n = ring.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    continue;
                }

                if segments_cross(&ring[i], &ring[(i + 1) % n], &ring[j], &ring[(j + 1) % n]) {
                    return false;
                }
            }
        }

        true
    }

    #[test]
    fn detects_north_pole() {
        assert_eq!(enclosed_pole(&circle(70.0, 45)), Some(Pole::North));
    }

    #[test]
    fn detects_south_pole_in_either_direction() {
        let mut ring = circle(-60.0, 30);
        assert_eq!(enclosed_pole(&ring), Some(Pole::South));

        ring.reverse();
        assert_eq!(enclosed_pole(&ring), Some(Pole::South));
    }

    #[test]
    fn ring_across_antimeridian_does_not_enclose_pole() {
        let ring = [
            LatLon::from_degrees(10.0, 170.0),
            LatLon::from_degrees(10.0, -170.0),
            LatLon::from_degrees(20.0, -170.0),
            LatLon::from_degrees(20.0, 170.0),
        ];
        assert_eq!(enclosed_pole(&ring), None);
    }

    #[test]
    fn small_ring_does_not_enclose_pole() {
        let ring = [
            LatLon::from_degrees(0.0, 0.0),
            LatLon::from_degrees(0.0, 10.0),
            LatLon::from_degrees(10.0, 10.0),
        ];
        assert_eq!(enclosed_pole(&ring), None);
    }

    #[test]
    fn closed_ring_is_simple_and_within_usable_range() {
        let projection = WebMercator::default();
        let resampler = Resampler::new(&GreatCircle, &projection, 10_000.0);

        for (ring, pole) in [
            (circle(70.0, 45), Pole::North),
            (circle(-75.0, 20), Pole::South),
        ] {
            let mut rotated_start = ring.clone();
            rotated_start.rotate_left(3);

            let window_start = projection.lon_to_x(-100f64.to_radians());
            let closed = close_through_pole(
                &rotated_start,
                pole,
                &projection,
                Some(&resampler),
                window_start,
            );

            assert!(closed.len() > ring.len() + 2);
            assert!(closed.iter().all(|p| p.y() >= projection.min_usable_y()
                && p.y() <= projection.max_usable_y()));
            assert!(is_simple(&closed), "ring around {pole:?} is not simple");

            let min_x = closed.iter().map(|p| p.x()).fold(f64::INFINITY, f64::min);
            let max_x = closed.iter().map(|p| p.x()).fold(f64::NEG_INFINITY, f64::max);
            assert!((min_x - window_start).abs() < 1e-3);
            assert!((max_x - window_start - projection.x_span()).abs() < 1e-3);
        }
    }

    #[test]
    fn ring_is_cut_at_window_start() {
        let projection = WebMercator::default();
        let ring = [
            LatLon::from_degrees(60.0, -180.0),
            LatLon::from_degrees(60.0, -60.0),
            LatLon::from_degrees(80.0, 60.0),
        ];
        let x = |lon: f64| projection.lon_to_x(lon.to_radians());
        let y60 = projection.lat_to_y(60f64.to_radians());
        let max_y = projection.max_usable_y();

        let closed = close_through_pole(&ring, Pole::North, &projection, None, x(-120.0));

        let expected_x = [-120.0, -60.0, 60.0, 180.0, 240.0, 240.0, -120.0];
        assert_eq!(closed.len(), expected_x.len());
        for (point, lon) in closed.iter().zip(expected_x) {
            assert!((point.x() - x(lon)).abs() < 1e-6, "{point:?} is not at {lon}");
        }

        assert!((closed[0].y() - y60).abs() < 1e-6);
        assert!((closed[4].y() - y60).abs() < 1e-6);
        assert_eq!(closed[5].y(), max_y);
        assert_eq!(closed[6].y(), max_y);
    }

    #[test]
    fn westward_ring_is_closed_over_the_same_window() {
        let projection = WebMercator::default();
        let mut ring = circle(65.0, 30);
        let window_start = projection.lon_to_x(-30f64.to_radians());

        let eastward = close_through_pole(&ring, Pole::North, &projection, None, window_start);
        ring.reverse();
        let westward = close_through_pole(&ring, Pole::North, &projection, None, window_start);

        let area = |points: &[Point2]| meridian_types::cartesian::area_signed(points).abs();
        assert!((area(&eastward) - area(&westward)).abs() < area(&eastward) * 1e-9);
        assert_eq!(eastward[0], westward[0]);
    }
}
