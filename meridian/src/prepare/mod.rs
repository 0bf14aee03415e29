//! Conversion of input geometries into GPU-ready vertex buffers.
//!
//! The entry point is [`create_pre_renderables`]. It walks the geometry and hands points to the marker builder,
//! lines to the line builder and polygons to the polygon builder. Every builder produces one [`PreRenderable`] with
//! its vertex buffers and [`RenderableScores`] used to order the renderables for drawing.

use meridian_types::geo::{Interpolator, Projection};
use meridian_types::Geometry;
use serde::{Deserialize, Serialize};

use crate::error::MeridianError;
use crate::resample::Resampler;
use crate::score::{DrawKey, RenderableKind, RenderableScores};
use crate::split::XSplitter;

mod lines;
mod markers;
pub mod pole;
mod polygons;
pub mod stroke;
pub mod triangulate;
pub mod vertex;

pub use vertex::{as_f32, FillVertex, JoinVertex, MarkerVertex, SegmentVertex};

/// Vertex buffers of a prepared geometry, ready to be uploaded to the GPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PreRenderable {
    /// Point markers, six vertices (two triangles) per point.
    Markers {
        /// Marker quads.
        vertices: Vec<MarkerVertex>,
        /// Draw order scores.
        scores: RenderableScores,
    },
    /// Lines.
    Lines {
        /// Segment ribbons, six vertices per segment.
        segments: Vec<SegmentVertex>,
        /// Join points, one per distinct vertex.
        joins: Vec<JoinVertex>,
        /// Draw order scores.
        scores: RenderableScores,
    },
    /// Filled polygons with outlines.
    Polygons {
        /// Fill triangles, three vertices per triangle.
        fill: Vec<FillVertex>,
        /// Outline segment ribbons.
        segments: Vec<SegmentVertex>,
        /// Outline join points.
        joins: Vec<JoinVertex>,
        /// Draw order scores.
        scores: RenderableScores,
    },
}

impl PreRenderable {
    /// Type of the renderable.
    pub fn kind(&self) -> RenderableKind {
        match self {
            PreRenderable::Markers { .. } => RenderableKind::Markers,
            PreRenderable::Lines { .. } => RenderableKind::Lines,
            PreRenderable::Polygons { .. } => RenderableKind::Polygons,
        }
    }

    /// Draw order scores of the renderable.
    pub fn scores(&self) -> RenderableScores {
        match self {
            PreRenderable::Markers { scores, .. }
            | PreRenderable::Lines { scores, .. }
            | PreRenderable::Polygons { scores, .. } => *scores,
        }
    }

    /// Key to sort the renderable in draw order with the given z-index.
    pub fn draw_key(&self, z_index: i32) -> DrawKey {
        DrawKey {
            kind: self.kind(),
            z_index,
            scores: self.scores(),
        }
    }

    /// Marker vertices as flat `f32` values. Empty for other kinds.
    pub fn marker_f32(&self) -> &[f32] {
        match self {
            PreRenderable::Markers { vertices, .. } => as_f32(vertices),
            _ => &[],
        }
    }

    /// Segment vertices as flat `f32` values. Empty for markers.
    pub fn segments_f32(&self) -> &[f32] {
        match self {
            PreRenderable::Lines { segments, .. } | PreRenderable::Polygons { segments, .. } => {
                as_f32(segments)
            }
            PreRenderable::Markers { .. } => &[],
        }
    }

    /// Join vertices as flat `f32` values. Empty for markers.
    pub fn joins_f32(&self) -> &[f32] {
        match self {
            PreRenderable::Lines { joins, .. } | PreRenderable::Polygons { joins, .. } => {
                as_f32(joins)
            }
            PreRenderable::Markers { .. } => &[],
        }
    }

    /// Fill vertices as flat `f32` values. Empty for other kinds.
    pub fn fill_f32(&self) -> &[f32] {
        match self {
            PreRenderable::Polygons { fill, .. } => as_f32(fill),
            _ => &[],
        }
    }
}

/// Everything the builders need to prepare a geometry.
pub struct PrepareContext<'a> {
    projection: &'a dyn Projection,
    resampler: Option<Resampler<'a>>,
    splitter: XSplitter,
}

impl<'a> PrepareContext<'a> {
    /// Creates a new context.
    ///
    /// If `interpolator` is `None`, vertices are connected with straight projected segments.
    pub fn new(
        projection: &'a dyn Projection,
        interpolator: Option<&'a dyn Interpolator>,
        perceptible_distance: f64,
    ) -> Self {
        Self {
            projection,
            resampler: interpolator
                .map(|interpolator| Resampler::new(interpolator, projection, perceptible_distance)),
            splitter: XSplitter::new(projection.x_span()),
        }
    }

    /// Replaces the splitter, for example with one taken from a [`SplitterCache`](crate::split::SplitterCache).
    pub fn with_splitter(mut self, splitter: XSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub(crate) fn projection(&self) -> &'a dyn Projection {
        self.projection
    }

    pub(crate) fn resampler(&self) -> Option<&Resampler<'a>> {
        self.resampler.as_ref()
    }

    pub(crate) fn splitter(&self) -> &XSplitter {
        &self.splitter
    }

    /// Prepares the geometry, appending the results to `out`.
    pub fn prepare_into(
        &self,
        geometry: &Geometry,
        out: &mut Vec<PreRenderable>,
    ) -> Result<(), MeridianError> {
        let prepared = match geometry {
            Geometry::Point { coordinates } => {
                markers::build(std::slice::from_ref(coordinates), self)
            }
            Geometry::MultiPoint { coordinates } => markers::build(coordinates, self),
            Geometry::LineString { coordinates } => {
                lines::build(std::slice::from_ref(coordinates), self)
            }
            Geometry::MultiLineString { coordinates } => lines::build(coordinates, self),
            Geometry::Polygon { coordinates } => {
                polygons::build(std::slice::from_ref(coordinates), self)?
            }
            Geometry::MultiPolygon { coordinates } => polygons::build(coordinates, self)?,
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    self.prepare_into(geometry, out)?;
                }
                None
            }
            Geometry::Unsupported => {
                log::debug!("Skipping geometry of unsupported type");
                None
            }
        };

        out.extend(prepared);
        Ok(())
    }
}

/// Converts the geometry into vertex buffers.
///
/// `perceptible_distance` (in projected units) is the maximum allowed deviation of the produced straight segments
/// from the paths traced by the `interpolator`. Without an interpolator the vertices are connected with straight
/// segments in projected space.
///
/// The result has one renderable per point, line or polygon set of the geometry (collections are flattened).
/// Geometries of unsupported types and empty geometries produce nothing.
pub fn create_pre_renderables(
    geometry: &Geometry,
    interpolator: Option<&dyn Interpolator>,
    projection: &dyn Projection,
    perceptible_distance: f64,
) -> Result<Vec<PreRenderable>, MeridianError> {
    let context = PrepareContext::new(projection, interpolator, perceptible_distance);
    let mut out = vec![];
    context.prepare_into(geometry, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_types::geo::{Equirectangular, GreatCircle, RhumbLine, WebMercator};
    use meridian_types::lonlat;

    fn sample_collection() -> Geometry {
        serde_json::from_value(serde_json::json!({
            "type": "GeometryCollection",
            "geometries": [
                {"type": "MultiPoint", "coordinates": [[10.0, 20.0, 5.0], [-170.0, 60.0]]},
                {"type": "LineString", "coordinates": [[170.0, 50.0], [-170.0, 55.0], [-150.0, 40.0]]},
                {"type": "Polygon", "coordinates": [
                    [[0.0, 0.0], [30.0, 0.0], [30.0, 30.0], [0.0, 30.0], [0.0, 0.0]],
                    [[10.0, 10.0], [20.0, 10.0], [20.0, 20.0], [10.0, 10.0]]
                ]},
                {"type": "Polygon", "coordinates": [[
                    [-180.0, 70.0], [-90.0, 70.0], [0.0, 70.0], [90.0, 70.0], [-180.0, 70.0]
                ]]},
                {"type": "CircularString", "coordinates": []}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn collection_is_flattened() {
        let projection = WebMercator::default();
        let result = create_pre_renderables(
            &sample_collection(),
            Some(&GreatCircle),
            &projection,
            1000.0,
        )
        .unwrap();

        let kinds: Vec<RenderableKind> = result.iter().map(PreRenderable::kind).collect();
        assert_eq!(
            kinds,
            vec![
                RenderableKind::Markers,
                RenderableKind::Lines,
                RenderableKind::Polygons,
                RenderableKind::Polygons,
            ]
        );

        for renderable in &result {
            match renderable {
                PreRenderable::Markers { vertices, .. } => assert_eq!(vertices.len(), 12),
                PreRenderable::Lines { segments, joins, .. } => {
                    assert!(segments.len() >= 12);
                    assert!(joins.len() >= 3);
                }
                PreRenderable::Polygons { fill, segments, .. } => {
                    assert!(!fill.is_empty());
                    assert_eq!(fill.len() % 3, 0);
                    assert!(!segments.is_empty());
                }
            }
        }
    }

    #[test]
    fn preparing_is_deterministic() {
        for projection in [
            Box::new(WebMercator::default()) as Box<dyn Projection>,
            Box::new(Equirectangular::default()) as Box<dyn Projection>,
        ] {
            let geometry = sample_collection();
            let first =
                create_pre_renderables(&geometry, Some(&RhumbLine), projection.as_ref(), 500.0)
                    .unwrap();
            let second =
                create_pre_renderables(&geometry, Some(&RhumbLine), projection.as_ref(), 500.0)
                    .unwrap();

            assert_eq!(first.len(), second.len());
            for (a, b) in first.iter().zip(&second) {
                assert_eq!(
                    bytemuck::cast_slice::<f32, u32>(a.segments_f32()),
                    bytemuck::cast_slice::<f32, u32>(b.segments_f32())
                );
                assert_eq!(
                    bytemuck::cast_slice::<f32, u32>(a.fill_f32()),
                    bytemuck::cast_slice::<f32, u32>(b.fill_f32())
                );
                assert_eq!(
                    bytemuck::cast_slice::<f32, u32>(a.marker_f32()),
                    bytemuck::cast_slice::<f32, u32>(b.marker_f32())
                );
                assert_eq!(
                    bytemuck::cast_slice::<f32, u32>(a.joins_f32()),
                    bytemuck::cast_slice::<f32, u32>(b.joins_f32())
                );
            }
        }
    }

    #[test]
    fn unsupported_and_empty_geometries_produce_nothing() {
        let projection = WebMercator::default();
        for geometry in [
            Geometry::Unsupported,
            Geometry::MultiPoint {
                coordinates: vec![],
            },
            Geometry::LineString {
                coordinates: vec![],
            },
            Geometry::Polygon {
                coordinates: vec![vec![lonlat!(1.0, 1.0)]],
            },
        ] {
            let result = create_pre_renderables(&geometry, None, &projection, 1.0).unwrap();
            assert!(result.is_empty(), "{geometry:?} produced {result:?}");
        }
    }

    #[test]
    fn f32_views_match_buffer_sizes() {
        let projection = WebMercator::default();
        let geometry = Geometry::LineString {
            coordinates: vec![lonlat!(0.0, 0.0), lonlat!(10.0, 10.0)],
        };
        let result = create_pre_renderables(&geometry, None, &projection, 1.0).unwrap();

        assert_eq!(result[0].segments_f32().len(), 6 * 11);
        assert_eq!(result[0].joins_f32().len(), 2 * 4);
        assert!(result[0].fill_f32().is_empty());
        assert!(result[0].marker_f32().is_empty());
    }

    #[test]
    fn renderables_sort_polygons_first() {
        let projection = WebMercator::default();
        let mut result =
            create_pre_renderables(&sample_collection(), None, &projection, 1.0).unwrap();
        crate::score::sort_in_draw_order(&mut result, |r| r.draw_key(0));

        assert_eq!(result[0].kind(), RenderableKind::Polygons);
        assert_eq!(result[3].kind(), RenderableKind::Markers);
    }
}
