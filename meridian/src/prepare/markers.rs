use meridian_types::cartesian::{CartesianPoint2d, Point3};
use meridian_types::geo::{GeoPoint, LatLon, Position};

use crate::prepare::vertex::{MarkerVertex, QUAD_CORNERS};
use crate::prepare::{PreRenderable, PrepareContext};
use crate::score::RenderableScores;
use crate::split::wrap_near;

/// Builds marker quads for the points.
///
/// Markers are ordered by altitude (lower first), and then from north to south, so that markers that are closer
/// to the viewer are drawn on top.
pub(super) fn build(points: &[Position], context: &PrepareContext) -> Option<PreRenderable> {
    if points.is_empty() {
        return None;
    }

    let mut sorted: Vec<&Position> = points.iter().collect();
    sorted.sort_by(|a, b| {
        a.altitude_or_zero()
            .total_cmp(&b.altitude_or_zero())
            .then(b.lat().total_cmp(&a.lat()))
    });

    let projection = context.projection();
    let central_x = projection.central_meridian_x();
    let span = projection.x_span();

    let mut vertices = Vec::with_capacity(sorted.len() * QUAD_CORNERS.len());
    let mut projected = Vec::with_capacity(sorted.len());
    for position in sorted {
        let point = projection.project_clamped(&LatLon::from(position));
        let point = point.with_x(wrap_near(point.x(), central_x, span));
        let split = context.splitter().split_point(&point);

        vertices.extend(QUAD_CORNERS.iter().map(|&corner| MarkerVertex {
            x: split.x,
            y: split.y,
            corner,
        }));
        projected.push(Point3::new(point.x(), point.y(), position.altitude_or_zero()));
    }

    Some(PreRenderable::Markers {
        vertices,
        scores: RenderableScores::compute(&projected),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_types::cartesian::Point2;
    use meridian_types::geo::{Projection, WebMercator};
    use meridian_types::lonlat;

    fn marker_y(vertices: &[MarkerVertex], index: usize) -> f64 {
        let vertex = vertices[index * 6];
        vertex.y[0] as f64 + vertex.y[1] as f64
    }

    #[test]
    fn six_vertices_per_marker() {
        let projection = WebMercator::default();
        let context = PrepareContext::new(&projection, None, 1.0);
        let Some(PreRenderable::Markers { vertices, .. }) =
            build(&[lonlat!(0.0, 0.0), lonlat!(1.0, 1.0)], &context)
        else {
            panic!("expected markers");
        };

        assert_eq!(vertices.len(), 12);
        let corners: Vec<[f32; 2]> = vertices[..6].iter().map(|v| v.corner).collect();
        assert_eq!(corners, QUAD_CORNERS.to_vec());
    }

    #[test]
    fn ordered_by_altitude_then_north_to_south() {
        let projection = WebMercator::default();
        let context = PrepareContext::new(&projection, None, 1.0);
        let points = [
            lonlat!(0.0, -10.0),
            lonlat!(0.0, 30.0, 100.0),
            lonlat!(0.0, 20.0),
            lonlat!(0.0, 40.0, -5.0),
        ];

        let Some(PreRenderable::Markers { vertices, scores }) = build(&points, &context) else {
            panic!("expected markers");
        };

        let lats: Vec<f64> = (0..4)
            .map(|i| {
                projection
                    .unproject(&Point2::new(0.0, marker_y(&vertices, i)))
                    .unwrap()
                    .lat()
            })
            .map(f64::round)
            .collect();
        assert_eq!(lats, vec![40.0, 20.0, -10.0, 30.0]);
        assert_eq!(scores.altitude_score, 100.0);
    }

    #[test]
    fn markers_wrap_near_central_meridian() {
        let projection = WebMercator::default();
        let context = PrepareContext::new(&projection, None, 1.0);
        let Some(PreRenderable::Markers { vertices, .. }) =
            build(&[lonlat!(540.0, 0.0)], &context)
        else {
            panic!("expected markers");
        };

        let x = vertices[0].x[0] as f64 + vertices[0].x[1] as f64;
        assert!((x.abs() - projection.x_span() / 2.0).abs() < 1.0);
    }

    #[test]
    fn no_points_no_markers() {
        let projection = WebMercator::default();
        let context = PrepareContext::new(&projection, None, 1.0);
        assert!(build(&[], &context).is_none());
    }
}
