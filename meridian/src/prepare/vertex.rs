//! Vertex types of the prepared buffers.
//!
//! All vertices are `#[repr(C)]` plain old data, so buffers can be uploaded to the GPU as is or viewed as flat `f32`
//! slices with [`as_f32`].

use serde::{Deserialize, Serialize};

use crate::split::SplitPoint;

/// Vertex of a triangulated polygon fill.
pub type FillVertex = SplitPoint;

/// Vertex of the join buffer: a point where a circle is drawn to round off joins and caps of lines.
pub type JoinVertex = SplitPoint;

/// Vertex of a marker quad.
#[repr(C)]
#[derive(
    Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
pub struct MarkerVertex {
    /// `[high, low]` parts of the X coordinate of the marker anchor.
    pub x: [f32; 2],
    /// `[high, low]` parts of the Y coordinate of the marker anchor.
    pub y: [f32; 2],
    /// Corner of the quad this vertex belongs to, each component is `0` or `1`.
    pub corner: [f32; 2],
}

/// Corners of the two triangles of a marker quad.
pub(crate) const QUAD_CORNERS: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 1.0],
];

/// Vertex of a line segment ribbon.
///
/// Every segment is drawn as two triangles. All six vertices carry both segment ends. The sign of `direction` tells
/// the shader which end the vertex is placed at, and `side` tells to which side of the segment it is extruded.
#[repr(C)]
#[derive(
    Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
pub struct SegmentVertex {
    /// Start of the segment.
    pub a: SplitPoint,
    /// End of the segment.
    pub b: SplitPoint,
    /// `(dx, dy)` of the segment for vertices anchored at `b`, `-(dx, dy)` for vertices anchored at `a`.
    pub direction: [f32; 2],
    /// Extrusion side, `-1` or `1`.
    pub side: f32,
}

/// Views a vertex buffer as a flat slice of `f32` values.
pub fn as_f32<V: bytemuck::Pod>(vertices: &[V]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}
