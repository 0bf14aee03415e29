//! Types and functions on geometries in projected (cartesian) coordinates.

mod point;
mod ring;

pub use point::{CartesianPoint2d, Point2, Point3, Vector2};
pub use ring::area_signed;
