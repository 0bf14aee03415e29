//! Types used by the `meridian` geometry preparation pipeline.
//!
//! * [`geo`] contains positions in geographic coordinates, map projections and interpolators that trace paths
//!   between two geographic points.
//! * [`cartesian`] contains points and vectors in projected (planar) coordinates and ring operations on them.
//! * [`Geometry`] is the GeoJSON-shaped input geometry.

pub mod cartesian;
pub mod error;
pub mod geo;
mod geometry;

#[cfg(feature = "geojson")]
mod geojson;

pub use geometry::Geometry;
