//! Geometric primitives: points in the plane.

use kurbo::Vec2;

/// A two-dimensional point.
///
/// Equality is exact: two points are equal only if both coordinates are
/// bit-for-bit equal (up to the usual `0.0 == -0.0`). Nothing in this crate
/// compares points with a tolerance except where it says so.
#[derive(Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, the one the sweep advances along.
    pub y: f64,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Are both coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// The point halfway between `self` and `other`.
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Convert this point into a `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Point::new(p.x, p.y)
    }
}

impl std::ops::Add<Vec2> for Point {
    type Output = Point;

    fn add(self, v: Vec2) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

impl std::ops::Sub<Vec2> for Point {
    type Output = Point;

    fn sub(self, v: Vec2) -> Point {
        Point::new(self.x - v.x, self.y - v.y)
    }
}

impl std::ops::Sub<Point> for Point {
    type Output = Vec2;

    fn sub(self, other: Point) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::num::tests::Reasonable;
    use proptest::prelude::*;

    impl Reasonable for Point {
        type Strategy = BoxedStrategy<Point>;

        fn reasonable() -> Self::Strategy {
            (f64::reasonable(), f64::reasonable())
                .prop_map(|(x, y)| Point::new(x, y))
                .boxed()
        }
    }

    #[test]
    fn finiteness() {
        assert!(Point::new(1.0, -2.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
        assert_eq!(
            Point::new(0.0, 1.0).midpoint(Point::new(3.0, -1.0)),
            Point::new(1.5, 0.0)
        );
    }

    #[test]
    fn exact_equality() {
        let p = Point::new(0.1 + 0.2, 1.0);
        assert_ne!(p, Point::new(0.3, 1.0));
        assert_eq!(p, Point::new(0.1 + 0.2, 1.0));
    }

    #[test]
    fn distance() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(p in Point::reasonable(), q in Point::reasonable()) {
            prop_assert_eq!(p.distance(q), q.distance(p));
        }

        #[test]
        fn translation(p in Point::reasonable(), q in Point::reasonable()) {
            let v = q - p;
            let r = p + v;
            prop_assert!(r.distance(q) <= 1e-9 * (1.0 + q.x.abs().max(q.y.abs())));
        }
    }
}
