//! Approximation of curved paths with projected polylines.

use meridian_types::cartesian::{CartesianPoint2d, Point2};
use meridian_types::geo::{GeoPoint, InterpolatedPath, Interpolator, LatLon, Projection};

use crate::split::wrap_near;

/// Maximum depth of midpoint subdivision.
pub const MAX_DEPTH: u32 = 24;

/// Besides the midpoint, deviation of a sub-path is measured at this fraction from both of its ends.
const QUARTER: f64 = 0.25;

/// Share of the perceptible distance a segment may deviate by at the sampled points. The rest covers the
/// deviation between the samples.
const ACCEPTED_DEVIATION: f64 = 0.5;

/// Two positions closer than this (radians) are considered the same point.
const SAME_POINT_RAD: f64 = 1e-12;

/// Traces paths produced by an interpolator and approximates them with straight projected segments.
///
/// A segment is split at its midpoint as long as the projected path, sampled at its quarter points, deviates from
/// the straight segment between the projected ends by more than half of `perceptible_distance` (in projected
/// units). This keeps the whole resampled polyline within `perceptible_distance` of the path.
pub struct Resampler<'a> {
    interpolator: &'a dyn Interpolator,
    projection: &'a dyn Projection,
    perceptible_distance: f64,
}

impl<'a> Resampler<'a> {
    /// Creates a new resampler.
    ///
    /// Non-positive or non-finite `perceptible_distance` disables subdivision.
    pub fn new(
        interpolator: &'a dyn Interpolator,
        projection: &'a dyn Projection,
        perceptible_distance: f64,
    ) -> Self {
        Self {
            interpolator,
            projection,
            perceptible_distance,
        }
    }

    /// Projection used by the resampler.
    pub fn projection(&self) -> &'a dyn Projection {
        self.projection
    }

    /// Resamples the path from `a` to `b`. Both ends are included into the result.
    pub fn resample(&self, a: LatLon, b: LatLon) -> Vec<Point2> {
        let start_x = self.projection.lon_to_x(a.lon_rad());
        self.resample_from(start_x, a, b)
    }

    /// Resamples the path from `a` to `b`, wrapping the x coordinate of the first point near `start_x`, and every
    /// next point near the previous one.
    pub fn resample_from(&self, start_x: f64, a: LatLon, b: LatLon) -> Vec<Point2> {
        let span = self.projection.x_span();
        let first = self.project_near(&a, start_x);
        let last = self.project_near(&b, first.x());

        if !self.subdivides() || a.approx_eq(&b, SAME_POINT_RAD) {
            return vec![first, last];
        }

        let path = self.interpolator.interpolate(a, b);
        let mut result = vec![first];
        self.subdivide(&path, (0.0, first), (1.0, last), 0, &mut result);

        // The end point is wrapped near its actual predecessor, which may differ from the straight guess above when
        // the path goes the long way around.
        let previous_x = result.last().map_or(first.x(), |p| p.x());
        result.push(last.with_x(wrap_near(last.x(), previous_x, span)));
        result
    }

    fn subdivides(&self) -> bool {
        self.perceptible_distance.is_finite() && self.perceptible_distance > 0.0
    }

    fn project_near(&self, point: &LatLon, reference_x: f64) -> Point2 {
        let projected = self.projection.project_clamped(point);
        projected.with_x(wrap_near(
            projected.x(),
            reference_x,
            self.projection.x_span(),
        ))
    }

    /// Pushes the inner points of the `(start, end)` range of the path into `result`.
    fn subdivide(
        &self,
        path: &InterpolatedPath,
        start: (f64, Point2),
        end: (f64, Point2),
        depth: u32,
        result: &mut Vec<Point2>,
    ) {
        if depth >= MAX_DEPTH {
            return;
        }

        let (start_frac, start_point) = start;
        let (end_frac, end_point) = end;
        let mid_frac = (start_frac + end_frac) / 2.0;
        let mid_point = self.project_near(&path(mid_frac), start_point.x());
        let end_point = end_point.with_x(wrap_near(
            end_point.x(),
            mid_point.x(),
            self.projection.x_span(),
        ));

        let sample_at = |fraction: f64| {
            let reference_x = start_point.x() + (end_point.x() - start_point.x()) * fraction;
            self.project_near(&path(start_frac + (end_frac - start_frac) * fraction), reference_x)
        };
        let samples = [sample_at(QUARTER), mid_point, sample_at(1.0 - QUARTER)];

        // NaN deviations (unprojectable samples) are ignored by `f64::max`.
        let deviation = samples
            .iter()
            .map(|sample| sample.distance_to_segment(&start_point, &end_point))
            .fold(0.0, f64::max);

        if deviation <= self.perceptible_distance * ACCEPTED_DEVIATION {
            return;
        }

        self.subdivide(path, start, (mid_frac, mid_point), depth + 1, result);
        result.push(mid_point);
        self.subdivide(path, (mid_frac, mid_point), (end_frac, end_point), depth + 1, result);
    }
}

/// Projects a sequence of positions into a continuous planar path.
///
/// The first point is wrapped near `reference_x` and every next one near its predecessor, so consecutive points
/// are never more than half of the world apart. If `resampler` is given, every pair of consecutive positions is
/// resampled with it.
///
/// For `closed` paths the edge from the last position back to the first one is traced too, and the result ends with
/// a copy of the first point. The copy is shifted by a multiple of the world span if the path goes around the world.
pub fn project_path(
    projection: &dyn Projection,
    resampler: Option<&Resampler>,
    positions: &[LatLon],
    reference_x: f64,
    closed: bool,
) -> Vec<Point2> {
    let Some(first) = positions.first() else {
        return vec![];
    };

    let span = projection.x_span();
    let projected_first = projection.project_clamped(first);
    let mut result = vec![projected_first.with_x(wrap_near(projected_first.x(), reference_x, span))];

    let closing = closed.then_some(first);
    for (from, to) in positions
        .iter()
        .zip(positions.iter().skip(1).chain(closing))
    {
        let previous_x = result.last().map_or(reference_x, |p| p.x());
        match resampler {
            Some(resampler) => {
                let segment = resampler.resample_from(previous_x, *from, *to);
                result.extend(segment.into_iter().skip(1));
            }
            None => {
                let projected = projection.project_clamped(to);
                result.push(projected.with_x(wrap_near(projected.x(), previous_x, span)));
            }
        }
    }

    result
}
