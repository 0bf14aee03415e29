//! Triangulation of polygons for the fill buffer.

use lyon::lyon_tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    VertexBuffers,
};
use lyon::path::{EndpointId, Path};
use lyon::tessellation::VertexSource;
use meridian_types::cartesian::{CartesianPoint2d, Point2};

use crate::error::MeridianError;

/// Triangulation engine.
///
/// A polygon is submitted contour by contour. The first contour is the outer boundary, the rest are holes. Regions
/// are filled according to the even-odd rule, so direction of the contours does not matter.
pub trait Triangulator {
    /// Starts a new polygon, discarding any unfinished one.
    fn begin_polygon(&mut self);
    /// Starts a new contour of the current polygon.
    fn begin_contour(&mut self);
    /// Adds a vertex to the current contour.
    fn add_vertex(&mut self, point: Point2);
    /// Finishes the current contour. Contours are closed implicitly.
    fn end_contour(&mut self);
    /// Finishes the polygon and returns its triangles as a flat list, three vertices per triangle.
    fn end_polygon(&mut self) -> Result<Vec<Point2>, MeridianError>;
}

/// Triangulator using the `lyon` fill tessellator.
///
/// Lyon works in single precision, so the vertices are submitted relative to the first vertex of the polygon. The
/// output vertices are then restored in double precision from the submitted ones.
#[derive(Debug, Default)]
pub struct LyonTriangulator {
    contours: Vec<Vec<Point2>>,
}

impl LyonTriangulator {
    /// Creates a new triangulator.
    pub fn new() -> Self {
        Self::default()
    }

    fn build_path(&self, origin: Point2) -> (Path, Vec<Point2>) {
        let mut builder = Path::builder();
        let mut originals = vec![];

        for contour in self.contours.iter().filter(|c| c.len() >= 3) {
            let id = builder.begin(relative(&contour[0], &origin));
            set_original(&mut originals, id, contour[0]);

            for point in &contour[1..] {
                let id = builder.line_to(relative(point, &origin));
                set_original(&mut originals, id, *point);
            }

            builder.end(true);
        }

        (builder.build(), originals)
    }
}

fn relative(point: &Point2, origin: &Point2) -> lyon::math::Point {
    lyon::math::point((point.x() - origin.x()) as f32, (point.y() - origin.y()) as f32)
}

fn set_original(originals: &mut Vec<Point2>, id: EndpointId, point: Point2) {
    let index = id.to_usize();
    if originals.len() <= index {
        originals.resize(index + 1, Point2::default());
    }
    originals[index] = point;
}

impl Triangulator for LyonTriangulator {
    fn begin_polygon(&mut self) {
        self.contours.clear();
    }

    fn begin_contour(&mut self) {
        self.contours.push(vec![]);
    }

    fn add_vertex(&mut self, point: Point2) {
        match self.contours.last_mut() {
            Some(contour) => contour.push(point),
            None => self.contours.push(vec![point]),
        }
    }

    fn end_contour(&mut self) {}

    fn end_polygon(&mut self) -> Result<Vec<Point2>, MeridianError> {
        let Some(origin) = self.contours.iter().flatten().next().copied() else {
            return Ok(vec![]);
        };

        let (path, originals) = self.build_path(origin);
        self.contours.clear();

        let mut buffers: VertexBuffers<Point2, u32> = VertexBuffers::new();
        FillTessellator::new()
            .tessellate_path(
                &path,
                &FillOptions::even_odd(),
                &mut BuffersBuilder::new(
                    &mut buffers,
                    SourceVertexConstructor {
                        originals: &originals,
                        origin,
                    },
                ),
            )
            .map_err(|err| MeridianError::Triangulation(err.to_string()))?;

        Ok(buffers
            .indices
            .iter()
            .filter_map(|&index| buffers.vertices.get(index as usize).copied())
            .collect())
    }
}

/// Restores double precision position of a tessellator output vertex from the vertices it was produced from.
struct SourceVertexConstructor<'a> {
    originals: &'a [Point2],
    origin: Point2,
}

impl SourceVertexConstructor<'_> {
    fn original(&self, id: EndpointId) -> Option<Point2> {
        self.originals.get(id.to_usize()).copied()
    }
}

impl FillVertexConstructor<Point2> for SourceVertexConstructor<'_> {
    fn new_vertex(&mut self, vertex: FillVertex) -> Point2 {
        let restored = match vertex.sources().next() {
            Some(VertexSource::Endpoint { id }) => self.original(id),
            Some(VertexSource::Edge { from, to, t }) => {
                match (self.original(from), self.original(to)) {
                    (Some(from), Some(to)) => {
                        let t = t as f64;
                        Some(Point2::new(
                            from.x() + (to.x() - from.x()) * t,
                            from.y() + (to.y() - from.y()) * t,
                        ))
                    }
                    _ => None,
                }
            }
            None => None,
        };

        restored.unwrap_or_else(|| {
            let position = vertex.position();
            Point2::new(
                self.origin.x() + position.x as f64,
                self.origin.y() + position.y as f64,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use meridian_types::cartesian::area_signed;

    fn total_area(triangles: &[Point2]) -> f64 {
        triangles
            .chunks(3)
            .map(|triangle| area_signed(triangle).abs())
            .sum()
    }

    fn triangulate(contours: &[Vec<Point2>]) -> Vec<Point2> {
        let mut triangulator = LyonTriangulator::new();
        triangulator.begin_polygon();
        for contour in contours {
            triangulator.begin_contour();
            for point in contour {
                triangulator.add_vertex(*point);
            }
            triangulator.end_contour();
        }

        triangulator.end_polygon().unwrap()
    }

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2> {
        vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ]
    }

    #[test]
    fn square_with_hole() {
        let triangles = triangulate(&[square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)]);

        assert_eq!(triangles.len() % 3, 0);
        assert_abs_diff_eq!(total_area(&triangles), 96.0, epsilon = 1e-6);
    }

    #[test]
    fn hole_direction_does_not_matter() {
        let mut hole = square(4.0, 4.0, 2.0);
        hole.reverse();
        let triangles = triangulate(&[square(0.0, 0.0, 10.0), hole]);

        assert_abs_diff_eq!(total_area(&triangles), 96.0, epsilon = 1e-6);
    }

    #[test]
    fn restores_vertices_in_double_precision() {
        let outer = square(20_037_508.342_789, -7_000_000.123_456, 0.5);
        let triangles = triangulate(&[outer.clone()]);

        assert!(!triangles.is_empty());
        for vertex in &triangles {
            assert!(outer.contains(vertex), "{vertex:?} is not an input vertex");
        }
    }

    #[test]
    fn self_intersection_is_interpolated() {
        let bow_tie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ];
        let triangles = triangulate(&[bow_tie.clone()]);

        assert_abs_diff_eq!(total_area(&triangles), 2.0, epsilon = 1e-4);
        for vertex in &triangles {
            let is_center = (vertex.x() - 1.0).abs() < 1e-4 && (vertex.y() - 1.0).abs() < 1e-4;
            assert!(bow_tie.contains(vertex) || is_center);
        }
    }

    #[test]
    fn empty_polygon_has_no_triangles() {
        let mut triangulator = LyonTriangulator::new();
        triangulator.begin_polygon();
        assert!(triangulator.end_polygon().unwrap().is_empty());
    }
}
