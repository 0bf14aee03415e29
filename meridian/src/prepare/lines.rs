use meridian_types::cartesian::{CartesianPoint2d, Point3};
use meridian_types::geo::{LatLon, Position};

use crate::prepare::stroke::{push_joins, push_segments};
use crate::prepare::{PreRenderable, PrepareContext};
use crate::resample::project_path;
use crate::score::RenderableScores;

/// Builds segment and join buffers for the lines.
///
/// The first vertex of every line is wrapped near the central meridian, and the rest of the line follows it, so
/// every segment takes the short way around the world.
pub(super) fn build(lines: &[Vec<Position>], context: &PrepareContext) -> Option<PreRenderable> {
    let projection = context.projection();
    let central_x = projection.central_meridian_x();

    let mut segments = vec![];
    let mut joins = vec![];
    let mut projected = vec![];

    for line in lines {
        if line.is_empty() {
            log::trace!("Skipping empty line");
            continue;
        }

        let positions: Vec<LatLon> = line.iter().map(LatLon::from).collect();
        let path = project_path(projection, context.resampler(), &positions, central_x, false);

        push_segments(&mut segments, &path, context.splitter());
        push_joins(&mut joins, &path, context.splitter(), false);

        let altitude = line
            .iter()
            .map(Position::altitude_or_zero)
            .fold(f64::NEG_INFINITY, f64::max);
        projected.push(
            path.iter()
                .map(|p| Point3::new(p.x(), p.y(), altitude))
                .collect::<Vec<_>>(),
        );
    }

    if projected.is_empty() {
        return None;
    }

    Some(PreRenderable::Lines {
        segments,
        joins,
        scores: RenderableScores::compute(&projected),
    })
}
