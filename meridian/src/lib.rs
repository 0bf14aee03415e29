//! Meridian turns geographic geometries into vertex buffers that a GPU can draw without losing precision and
//! without tearing at the antimeridian.
//!
//! # Quick start
//!
//! ```
//! use meridian::create_pre_renderables;
//! use meridian::meridian_types::geo::{GreatCircle, WebMercator};
//! use meridian::meridian_types::Geometry;
//!
//! let geometry: Geometry = serde_json::from_str(
//!     r#"{"type": "LineString", "coordinates": [[-120.0, 40.0], [10.0, 50.0]]}"#,
//! )
//! .unwrap();
//!
//! let renderables =
//!     create_pre_renderables(&geometry, Some(&GreatCircle), &WebMercator::default(), 1000.0).unwrap();
//! assert_eq!(renderables.len(), 1);
//! ```
//!
//! # Main components
//!
//! * [`split`] represents projected coordinates as pairs of `f32` values (`high + low`), which keeps millimeter
//!   precision on the GPU anywhere on the map. Splitting of every vertex goes through an [`XSplitter`].
//! * [`resample`] inserts intermediate vertices into segments, so that straight segments in projected space follow
//!   great circles or rhumb lines within a given tolerance.
//! * [`prepare`] builds marker, line and polygon buffers ([`PreRenderable`]s), triangulating polygon fills and
//!   closing rings that go around a pole through the edge of the map.
//! * [`score`] computes the values that define in which order renderables are drawn.
//! * [`dispatch`] runs preparation on a pool of worker threads.

pub mod dispatch;
pub mod error;
pub mod prepare;
pub mod resample;
pub mod score;
pub mod split;

pub use dispatch::{CallKey, DispatchConfig, PrepareCall, PrepareResponse, WorkerPool};
pub use error::MeridianError;
pub use prepare::{create_pre_renderables, PreRenderable, PrepareContext};
pub use score::{DrawKey, RenderableKind, RenderableScores};
pub use split::{SplitPoint, SplitterCache, XSplitter};

// Reexport meridian_types
pub use meridian_types;
