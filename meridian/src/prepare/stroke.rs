//! Stroke geometry of lines and polygon outlines.
//!
//! Lines are drawn in screen space by the shader: every segment is extruded into a ribbon of the line width, and a
//! circle is drawn at every vertex to round off joins and caps.

use meridian_types::cartesian::{CartesianPoint2d, Point2};

use crate::prepare::vertex::{JoinVertex, SegmentVertex};
use crate::split::XSplitter;

/// Which end of the segment a vertex is anchored at, and to which side it is extruded.
const SEGMENT_CORNERS: [(bool, f32); 6] = [
    (false, -1.0),
    (false, 1.0),
    (true, -1.0),
    (true, -1.0),
    (false, 1.0),
    (true, 1.0),
];

/// Adds six vertices for every segment of the path with non-zero length.
pub fn push_segments(out: &mut Vec<SegmentVertex>, path: &[Point2], splitter: &XSplitter) {
    for pair in path.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        if dx == 0.0 && dy == 0.0 {
            continue;
        }

        let a = splitter.split_point(from);
        let b = splitter.split_point(to);
        let forward = [dx as f32, dy as f32];
        let backward = [-forward[0], -forward[1]];

        out.extend(SEGMENT_CORNERS.iter().map(|&(at_end, side)| SegmentVertex {
            a,
            b,
            direction: if at_end { forward } else { backward },
            side,
        }));
    }
}

/// Adds a join point for every distinct vertex of the path.
///
/// Consecutive duplicates are collapsed. For `closed` paths (that end with a copy of the first point) the last
/// point is skipped if it coincides with the first one.
pub fn push_joins(out: &mut Vec<JoinVertex>, path: &[Point2], splitter: &XSplitter, closed: bool) {
    let end = match (closed, path.first(), path.last()) {
        (true, Some(first), Some(last)) if path.len() > 1 && first == last => path.len() - 1,
        _ => path.len(),
    };

    let mut previous: Option<&Point2> = None;
    for point in &path[..end] {
        if previous != Some(point) {
            out.push(splitter.split_point(point));
        }
        previous = Some(point);
    }
}
