use meridian_types::cartesian::{area_signed, CartesianPoint2d, Point2};
use meridian_types::geo::{LatLon, Position};

use crate::error::MeridianError;
use crate::prepare::pole::{close_through_pole, enclosed_pole};
use crate::prepare::stroke::{push_joins, push_segments};
use crate::prepare::triangulate::{LyonTriangulator, Triangulator};
use crate::prepare::{PreRenderable, PrepareContext};
use crate::resample::project_path;
use crate::score::{ProjectedPolygon, RenderableScores};

/// Polygon projected and ready to be triangulated.
struct ProjectedRings {
    /// Rings to fill, implicitly closed. Rings around a pole are closed through the map edge.
    fill: Vec<Vec<Point2>>,
    /// Projected rings as they are, ending with a copy of the first point.
    outline: Vec<Vec<Point2>>,
    altitude: f64,
    area: f64,
}

pub(super) fn build(
    polygons: &[Vec<Vec<Position>>],
    context: &PrepareContext,
) -> Result<Option<PreRenderable>, MeridianError> {
    build_with(polygons, context, &mut LyonTriangulator::new())
}

/// Builds fill and outline buffers for the polygons, triangulating them with the given triangulator.
///
/// Polygons are ordered by altitude, and then larger polygons go first, so that polygons nested inside others are
/// drawn over them.
pub(super) fn build_with(
    polygons: &[Vec<Vec<Position>>],
    context: &PrepareContext,
    triangulator: &mut impl Triangulator,
) -> Result<Option<PreRenderable>, MeridianError> {
    let mut projected: Vec<ProjectedRings> = polygons
        .iter()
        .filter_map(|polygon| project_polygon(polygon, context))
        .collect();

    if projected.is_empty() {
        return Ok(None);
    }

    projected.sort_by(|a, b| {
        a.altitude
            .total_cmp(&b.altitude)
            .then((-a.area).total_cmp(&-b.area))
    });

    let splitter = context.splitter();
    let mut fill = vec![];
    let mut segments = vec![];
    let mut joins = vec![];

    for polygon in &projected {
        triangulator.begin_polygon();
        for ring in &polygon.fill {
            triangulator.begin_contour();
            for point in ring {
                triangulator.add_vertex(*point);
            }
            triangulator.end_contour();
        }

        let triangles = triangulator.end_polygon()?;
        fill.extend(triangles.iter().map(|p| splitter.split_point(p)));

        for ring in &polygon.outline {
            push_segments(&mut segments, ring, splitter);
            push_joins(&mut joins, ring, splitter, true);
        }
    }

    let scored: Vec<ProjectedPolygon> = projected
        .into_iter()
        .map(|polygon| ProjectedPolygon {
            rings: polygon.fill,
            altitude: polygon.altitude,
        })
        .collect();

    Ok(Some(PreRenderable::Polygons {
        fill,
        segments,
        joins,
        scores: RenderableScores::compute(&scored),
    }))
}

/// Drops the closing position of a GeoJSON ring.
fn open_ring(ring: &[Position]) -> Vec<LatLon> {
    let end = match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => ring.len() - 1,
        _ => ring.len(),
    };

    ring[..end].iter().map(LatLon::from).collect()
}

fn has_distinct_positions(ring: &[LatLon]) -> bool {
    ring.first()
        .is_some_and(|first| ring.iter().any(|p| p != first))
}

fn project_polygon(polygon: &[Vec<Position>], context: &PrepareContext) -> Option<ProjectedRings> {
    let projection = context.projection();
    let resampler = context.resampler();

    let outer = open_ring(polygon.first()?);
    if !has_distinct_positions(&outer) {
        log::trace!("Skipping polygon with degenerate outer ring");
        return None;
    }

    let central_x = projection.central_meridian_x();
    let outer_path = project_path(projection, resampler, &outer, central_x, true);
    let (min_x, max_x) = outer_path
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
            (min.min(p.x()), max.max(p.x()))
        });
    let mid_x = (min_x + max_x) / 2.0;
    let pole_window_start = mid_x - projection.x_span() / 2.0;

    let mut fill = vec![];
    let mut outline = vec![];
    for (index, ring) in polygon.iter().enumerate() {
        let (positions, path) = if index == 0 {
            (outer.clone(), outer_path.clone())
        } else {
            let positions = open_ring(ring);
            if !has_distinct_positions(&positions) {
                log::trace!("Skipping degenerate hole {index}");
                continue;
            }
            let path = project_path(projection, resampler, &positions, mid_x, true);
            (positions, path)
        };

        let fill_ring = match enclosed_pole(&positions) {
            Some(pole) => {
                close_through_pole(&positions, pole, projection, resampler, pole_window_start)
            }
            None => path[..path.len().saturating_sub(1)].to_vec(),
        };

        fill.push(fill_ring);
        outline.push(path);
    }

    let altitude = polygon
        .iter()
        .flatten()
        .map(Position::altitude_or_zero)
        .fold(f64::NEG_INFINITY, f64::max);
    let area = fill.first().map_or(0.0, |ring| area_signed(ring).abs());

    Some(ProjectedRings {
        fill,
        outline,
        altitude,
        area,
    })
}
