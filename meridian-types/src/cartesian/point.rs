use approx::AbsDiffEq;
use num_traits::{Float, One, Zero};
use serde::{Deserialize, Serialize};

/// Point in 2d cartesian coordinate space.
pub trait CartesianPoint2d {
    /// Numeric type of the coordinates.
    type Num: Float;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Vector from `other` to `self`.
    fn sub(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Vector2<Self::Num> {
        Vector2::new(self.x() - other.x(), self.y() - other.y())
    }

    /// Squared distance between two points.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        self.sub(other).magnitude_sq()
    }

    /// Distance between two points.
    fn distance(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        self.distance_sq(other).sqrt()
    }

    /// Distance from the point to the infinite line through `a` and `b`.
    ///
    /// If `a` and `b` coincide, returns the distance to `a`.
    fn distance_to_line(
        &self,
        a: &impl CartesianPoint2d<Num = Self::Num>,
        b: &impl CartesianPoint2d<Num = Self::Num>,
    ) -> Self::Num {
        let ab = b.sub(a);
        let length = ab.magnitude();
        if length == Self::Num::zero() {
            return self.distance(a);
        }

        let ap = self.sub(a);
        (ab.dx() * ap.dy() - ab.dy() * ap.dx()).abs() / length
    }

    /// Distance from the point to the segment between `a` and `b`.
    fn distance_to_segment(
        &self,
        a: &impl CartesianPoint2d<Num = Self::Num>,
        b: &impl CartesianPoint2d<Num = Self::Num>,
    ) -> Self::Num {
        let ab = b.sub(a);
        let length_sq = ab.magnitude_sq();
        if length_sq == Self::Num::zero() {
            return self.distance(a);
        }

        let ap = self.sub(a);
        let t = ((ap.dx() * ab.dx() + ap.dy() * ab.dy()) / length_sq)
            .max(Self::Num::zero())
            .min(Self::Num::one());
        let dx = ap.dx() - ab.dx() * t;
        let dy = ap.dy() - ab.dy() * t;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A point in 2-dimensional cartesian coordinate space.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point2<Num = f64> {
    x: Num,
    y: Num,
}

impl<Num> Point2<Num> {
    /// Creates a new point with the given coordinates.
    pub const fn new(x: Num, y: Num) -> Self {
        Self { x, y }
    }

    /// Returns a copy of the point with the x coordinate replaced.
    pub fn with_x(self, x: Num) -> Self {
        Self { x, y: self.y }
    }

    /// Returns a copy of the point with the y coordinate replaced.
    pub fn with_y(self, y: Num) -> Self {
        Self { x: self.x, y }
    }
}

impl<Num: Float> CartesianPoint2d for Point2<Num> {
    type Num = Num;

    fn x(&self) -> Num {
        self.x
    }

    fn y(&self) -> Num {
        self.y
    }
}

/// Vector between two points in 2-dimensional cartesian coordinate space.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector2<Num = f64> {
    dx: Num,
    dy: Num,
}

impl<Num: Copy> Vector2<Num> {
    /// Creates a new vector with the given coordinates.
    pub fn new(dx: Num, dy: Num) -> Self {
        Self { dx, dy }
    }

    /// Returns x coordinate of the vector.
    pub fn dx(&self) -> Num {
        self.dx
    }

    /// Returns y coordinate of the vector.
    pub fn dy(&self) -> Num {
        self.dy
    }

    /// Returns squared magnitude (squared length) of the vector.
    pub fn magnitude_sq(&self) -> Num
    where
        Num: num_traits::Num,
    {
        self.dx * self.dx + self.dy * self.dy
    }

    /// Returns magnitude (length) of the vector.
    pub fn magnitude(&self) -> Num
    where
        Num: Float,
    {
        self.magnitude_sq().sqrt()
    }
}

impl<Num> std::ops::Sub<Point2<Num>> for Point2<Num>
where
    Num: std::ops::Sub<Num, Output = Num>,
{
    type Output = Vector2<Num>;

    fn sub(self, rhs: Point2<Num>) -> Self::Output {
        Vector2 {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

impl<Num> std::ops::Add<Vector2<Num>> for Point2<Num>
where
    Num: std::ops::Add<Num, Output = Num>,
{
    type Output = Point2<Num>;

    fn add(self, rhs: Vector2<Num>) -> Self::Output {
        Self {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

impl<Num> std::ops::Mul<Num> for Vector2<Num>
where
    Num: std::ops::Mul<Num, Output = Num> + Copy,
{
    type Output = Vector2<Num>;

    fn mul(self, rhs: Num) -> Self::Output {
        Self {
            dx: self.dx * rhs,
            dy: self.dy * rhs,
        }
    }
}

impl<Num> AbsDiffEq for Point2<Num>
where
    Num: AbsDiffEq<Num, Epsilon = Num> + Copy,
{
    type Epsilon = Num;

    fn default_epsilon() -> Self::Epsilon {
        Num::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

/// A projected point with altitude.
///
/// `x` and `y` are in projected units, `z` is the altitude in meters above the surface.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point3<Num = f64> {
    x: Num,
    y: Num,
    z: Num,
}

impl<Num: Copy> Point3<Num> {
    /// Creates a new instance of the point by its coordinates.
    pub const fn new(x: Num, y: Num, z: Num) -> Self {
        Self { x, y, z }
    }

    /// Altitude of the point.
    pub fn z(&self) -> Num {
        self.z
    }
}

impl<Num: Float> CartesianPoint2d for Point3<Num> {
    type Num = Num;

    fn x(&self) -> Num {
        self.x
    }

    fn y(&self) -> Num {
        self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn distance_to_line_is_perpendicular() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);

        assert_abs_diff_eq!(Point2::new(5.0, 3.0).distance_to_line(&a, &b), 3.0);
        assert_abs_diff_eq!(Point2::new(20.0, -2.0).distance_to_line(&a, &b), 2.0);
    }

    #[test]
    fn distance_to_degenerate_line() {
        let a = Point2::new(1.0, 1.0);
        assert_abs_diff_eq!(Point2::new(4.0, 5.0).distance_to_line(&a, &a), 5.0);
    }

    #[test]
    fn distance_to_segment_clamps_to_ends() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);

        assert_abs_diff_eq!(Point2::new(5.0, 3.0).distance_to_segment(&a, &b), 3.0);
        assert_abs_diff_eq!(Point2::new(13.0, 4.0).distance_to_segment(&a, &b), 5.0);
        assert_abs_diff_eq!(Point2::new(-3.0, 0.0).distance_to_segment(&a, &b), 3.0);
    }

    #[test]
    fn point_ops() {
        let p = Point2::new(1.0, 2.0);
        let q = Point2::new(4.0, 6.0);
        let v = q - p;

        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(p + v * 2.0, Point2::new(7.0, 10.0));
        assert_eq!(p.with_x(3.0), Point2::new(3.0, 2.0));
    }
}
