//! Positions in geographic coordinates (latitude and longitude) (see [`Position`], [`LatLon`]), map projections
//! into planar coordinates (see [`Projection`]) and paths between two geographic points (see [`Interpolator`]).

mod datum;
mod interpolate;
mod position;
mod projection;

pub use datum::Datum;
pub use interpolate::{
    GreatCircle, InterpolatedPath, Interpolator, InterpolatorDescriptor, RhumbLine,
};
pub use position::{GeoPoint, LatLon, Position};
pub use projection::{Equirectangular, Projection, ProjectionDescriptor, WebMercator};
