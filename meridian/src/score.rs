//! Scores used to order prepared geometries for drawing.

use std::cmp::Ordering;

use meridian_types::cartesian::{area_signed, CartesianPoint2d, Point2, Point3};
use serde::{Deserialize, Serialize};

/// Type of the prepared geometry, in the order they are drawn: polygons first, markers last.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderableKind {
    /// Filled polygons with outlines.
    Polygons,
    /// Lines.
    Lines,
    /// Point markers.
    Markers,
}

/// Coordinates that scores can be computed from.
///
/// Implemented for single projected points (`z` is the altitude), polygons, and slices of any of them, so nested
/// structures reduce recursively.
pub trait ScoreSource {
    /// Maximum projected `y`, `-inf` if there are no points.
    fn max_y(&self) -> f64;
    /// Maximum altitude, `-inf` if there are no points.
    fn max_altitude(&self) -> f64;
    /// Total area of outer rings of all polygons. Zero for points and lines.
    fn outer_area(&self) -> f64;
}

impl ScoreSource for Point3 {
    fn max_y(&self) -> f64 {
        self.y()
    }

    fn max_altitude(&self) -> f64 {
        self.z()
    }

    fn outer_area(&self) -> f64 {
        0.0
    }
}

impl<T: ScoreSource> ScoreSource for [T] {
    fn max_y(&self) -> f64 {
        self.iter().map(T::max_y).fold(f64::NEG_INFINITY, f64::max)
    }

    fn max_altitude(&self) -> f64 {
        self.iter()
            .map(T::max_altitude)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn outer_area(&self) -> f64 {
        self.iter().map(T::outer_area).sum()
    }
}

impl<T: ScoreSource> ScoreSource for Vec<T> {
    fn max_y(&self) -> f64 {
        self.as_slice().max_y()
    }

    fn max_altitude(&self) -> f64 {
        self.as_slice().max_altitude()
    }

    fn outer_area(&self) -> f64 {
        self.as_slice().outer_area()
    }
}

/// Projected polygon rings (outer ring first) with the altitude of the polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPolygon {
    /// Outer ring followed by holes.
    pub rings: Vec<Vec<Point2>>,
    /// Altitude of the polygon.
    pub altitude: f64,
}

impl ScoreSource for ProjectedPolygon {
    fn max_y(&self) -> f64 {
        self.rings
            .iter()
            .flatten()
            .map(|p| p.y())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn max_altitude(&self) -> f64 {
        self.altitude
    }

    fn outer_area(&self) -> f64 {
        self.rings
            .first()
            .map_or(0.0, |ring| area_signed(ring).abs())
    }
}

/// Scores of a prepared geometry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableScores {
    /// Negated maximum projected `y`, so northern objects have lower score.
    pub lat_score: f64,
    /// Maximum altitude, `0` if there are no points.
    pub altitude_score: f64,
    /// Negated area of the outer rings, so larger polygons have lower score. `0` for points and lines.
    pub area_score: f64,
}

impl RenderableScores {
    /// Computes the scores of the coordinates.
    pub fn compute(source: &(impl ScoreSource + ?Sized)) -> Self {
        let max_y = source.max_y();
        let max_altitude = source.max_altitude();

        Self {
            lat_score: if max_y.is_finite() { -max_y } else { 0.0 },
            altitude_score: if max_altitude.is_finite() {
                max_altitude
            } else {
                0.0
            },
            area_score: -source.outer_area(),
        }
    }
}

/// Everything that defines the draw order of a prepared geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawKey {
    /// Type of the geometry.
    pub kind: RenderableKind,
    /// Z-index set by the caller.
    pub z_index: i32,
    /// Scores of the geometry.
    pub scores: RenderableScores,
}

/// Compares two geometries by draw order: the one that must be drawn first is `Less`.
///
/// Order is by kind (polygons, then lines, then markers), then by z-index, then by altitude. Markers are then ordered
/// north to south, and finally geometries with larger area go first.
pub fn compare_draw_order(a: &DrawKey, b: &DrawKey) -> Ordering {
    a.kind
        .cmp(&b.kind)
        .then(a.z_index.cmp(&b.z_index))
        .then(a.scores.altitude_score.total_cmp(&b.scores.altitude_score))
        .then_with(|| match (a.kind, b.kind) {
            (RenderableKind::Markers, RenderableKind::Markers) => {
                a.scores.lat_score.total_cmp(&b.scores.lat_score)
            }
            _ => Ordering::Equal,
        })
        .then(a.scores.area_score.total_cmp(&b.scores.area_score))
}

/// Stable sorts the items in draw order.
pub fn sort_in_draw_order<T>(items: &mut [T], key: impl Fn(&T) -> DrawKey) {
    items.sort_by(|a, b| compare_draw_order(&key(a), &key(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    fn key(kind: RenderableKind, scores: RenderableScores) -> DrawKey {
        DrawKey {
            kind,
            z_index: 0,
            scores,
        }
    }

    #[test]
    fn point_scores() {
        let points = vec![Point3::new(0.0, 10.0, 5.0), Point3::new(1.0, 20.0, 1.0)];
        let scores = RenderableScores::compute(&points);

        assert_eq!(scores.lat_score, -20.0);
        assert_eq!(scores.altitude_score, 5.0);
        assert_eq!(scores.area_score, 0.0);
    }

    #[test]
    fn nested_lines_reduce_recursively() {
        let lines = vec![
            vec![Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 2.0, 0.0)],
            vec![Point3::new(0.0, -5.0, 7.0)],
        ];
        let scores = RenderableScores::compute(&lines);

        assert_eq!(scores.lat_score, -2.0);
        assert_eq!(scores.altitude_score, 7.0);
    }

    #[test]
    fn empty_source_has_zero_scores() {
        let empty: Vec<Point3> = vec![];
        assert_eq!(
            RenderableScores::compute(&empty),
            RenderableScores::default()
        );
    }

    #[test]
    fn polygon_area_ignores_winding() {
        let ccw = ProjectedPolygon {
            rings: vec![square(2.0)],
            altitude: 0.0,
        };
        let mut reversed = square(2.0);
        reversed.reverse();
        let cw = ProjectedPolygon {
            rings: vec![reversed],
            altitude: 0.0,
        };

        assert_eq!(RenderableScores::compute(&ccw).area_score, -4.0);
        assert_eq!(RenderableScores::compute(&cw).area_score, -4.0);
    }

    #[test]
    fn larger_polygon_draws_first() {
        let small = RenderableScores::compute(&ProjectedPolygon {
            rings: vec![square(1.0)],
            altitude: 0.0,
        });
        let large = RenderableScores::compute(&ProjectedPolygon {
            rings: vec![square(10.0)],
            altitude: 0.0,
        });

        let mut items = vec![("small", small), ("large", large)];
        sort_in_draw_order(&mut items, |(_, scores)| {
            key(RenderableKind::Polygons, *scores)
        });

        assert_eq!(items[0].0, "large");
    }

    #[test]
    fn kind_and_z_index_come_first() {
        let high = RenderableScores {
            altitude_score: 100.0,
            ..Default::default()
        };
        let low = RenderableScores::default();

        let marker = key(RenderableKind::Markers, low);
        let polygon = key(RenderableKind::Polygons, high);
        assert_eq!(compare_draw_order(&polygon, &marker), Ordering::Less);

        let raised_line = DrawKey {
            z_index: 1,
            ..key(RenderableKind::Lines, low)
        };
        let line = key(RenderableKind::Lines, high);
        assert_eq!(compare_draw_order(&line, &raised_line), Ordering::Less);
    }

    #[test]
    fn latitude_orders_only_markers() {
        let north = RenderableScores {
            lat_score: -10.0,
            area_score: -1.0,
            ..Default::default()
        };
        let south = RenderableScores {
            lat_score: 10.0,
            area_score: -2.0,
            ..Default::default()
        };

        assert_eq!(
            compare_draw_order(
                &key(RenderableKind::Markers, north),
                &key(RenderableKind::Markers, south)
            ),
            Ordering::Less
        );
        assert_eq!(
            compare_draw_order(
                &key(RenderableKind::Polygons, north),
                &key(RenderableKind::Polygons, south)
            ),
            Ordering::Greater
        );
    }

    #[test]
    fn ties_keep_original_order() {
        let scores = RenderableScores::default();
        let mut items = vec![1, 2, 3, 4];
        sort_in_draw_order(&mut items, |_| key(RenderableKind::Lines, scores));

        assert_eq!(items, vec![1, 2, 3, 4]);
    }

    #[test]
    fn nan_scores_are_ordered() {
        let nan = RenderableScores {
            altitude_score: f64::NAN,
            ..Default::default()
        };
        let zero = RenderableScores::default();

        assert_eq!(
            compare_draw_order(
                &key(RenderableKind::Lines, zero),
                &key(RenderableKind::Lines, nan)
            ),
            Ordering::Less
        );
    }
}
