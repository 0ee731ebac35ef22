//! Beachline arcs as parabolas.
//!
//! Every point on an arc is equidistant from the arc's site (the focus) and
//! the sweep line (the directrix). Coefficients are recomputed from the site
//! and the sweep position whenever they are needed, so nothing here can go
//! stale when the sweep advances.

use arrayvec::ArrayVec;

use crate::{geom::Point, site::Site, Error};

/// The arc of a single site at a single sweep position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Parabola {
    /// A proper parabola, `y = a x² + b x + c`.
    Curve {
        /// Quadratic coefficient.
        a: f64,
        /// Linear coefficient.
        b: f64,
        /// Constant coefficient.
        c: f64,
    },
    /// The sweep line passes through the site, collapsing the parabola into a
    /// vertical ray at the site.
    Ray {
        /// The site's horizontal coordinate.
        x: f64,
        /// The site's vertical coordinate (also the sweep position).
        y: f64,
    },
}

impl Parabola {
    /// The parabola with focus `focus` and horizontal directrix `y = directrix`.
    pub fn new(focus: Point, directrix: f64) -> Self {
        let d = focus.y - directrix;
        if d == 0.0 {
            Parabola::Ray {
                x: focus.x,
                y: focus.y,
            }
        } else {
            Parabola::Curve {
                a: 0.5 / d,
                b: -focus.x / d,
                c: 0.5 * (focus.x * focus.x / d + focus.y + directrix),
            }
        }
    }

    /// Has the parabola collapsed into a vertical ray?
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Parabola::Ray { .. })
    }

    /// The height of the parabola above `x`, or `None` for a ray.
    pub fn eval(&self, x: f64) -> Option<f64> {
        match *self {
            Parabola::Curve { a, b, c } => Some((a * x + b) * x + c),
            Parabola::Ray { .. } => None,
        }
    }
}

fn eval_curve(a: f64, b: f64, c: f64, x: f64) -> Point {
    Point::new(x, (a * x + b) * x + c)
}

/// Intersects the arcs of two sites at the sweep position `directrix`.
///
/// Returns zero, one, or two points. When both arcs have collapsed into rays,
/// the single answer is the point halfway between them at their shared
/// height. When only one has, the answer is where the ray meets the other
/// arc. Two arcs on the same parabola (only possible for sites at the same
/// position) are reported as [`Error::SameParabola`].
pub fn crosspoints(
    first: &Site,
    second: &Site,
    directrix: f64,
) -> Result<ArrayVec<Point, 2>, Error> {
    let mut ret = ArrayVec::new();
    match (
        Parabola::new(first.position(), directrix),
        Parabola::new(second.position(), directrix),
    ) {
        (Parabola::Ray { .. }, Parabola::Ray { .. }) => {
            if first.same_position(second) {
                return Err(Error::SameParabola {
                    first: first.id(),
                    second: second.id(),
                });
            }
            ret.push(first.position().midpoint(second.position()));
        }
        (Parabola::Ray { x, .. }, Parabola::Curve { a, b, c })
        | (Parabola::Curve { a, b, c }, Parabola::Ray { x, .. }) => {
            ret.push(eval_curve(a, b, c, x));
        }
        (
            Parabola::Curve {
                a: a0,
                b: b0,
                c: c0,
            },
            Parabola::Curve {
                a: a1,
                b: b1,
                c: c1,
            },
        ) => {
            let (a, b, c) = (a0 - a1, b0 - b1, c0 - c1);
            if a != 0.0 {
                let discriminant = b * b - 4.0 * a * c;
                if discriminant > 0.0 {
                    let root = discriminant.sqrt();
                    ret.push(eval_curve(a0, b0, c0, (-b + root) / (2.0 * a)));
                    ret.push(eval_curve(a0, b0, c0, (-b - root) / (2.0 * a)));
                } else if discriminant == 0.0 {
                    ret.push(eval_curve(a0, b0, c0, -b / (2.0 * a)));
                }
            } else if b != 0.0 {
                ret.push(eval_curve(a0, b0, c0, -c / b));
            } else {
                return Err(Error::SameParabola {
                    first: first.id(),
                    second: second.id(),
                });
            }
        }
    }
    Ok(ret)
}

/// The horizontal position of the breakpoint between the arc of `left` and
/// the arc of `right` immediately to its right.
///
/// Two parabolas usually cross twice, and only one of the crossings is the
/// breakpoint with `left` on its left. If exactly one crossing lies strictly
/// between the sites, that's the one. Otherwise the arc whose site is farther
/// from the sweep line is the wider one, and it owns the outer span: the
/// breakpoint is the smaller crossing if `left` is the older site and the
/// larger one if `right` is.
pub fn breakpoint(left: &Site, right: &Site, directrix: f64) -> Result<f64, Error> {
    let points = crosspoints(left, right, directrix)?;
    match points.as_slice() {
        [p] => Ok(p.x),
        [p, q] => {
            let (lo, hi) = if p.x <= q.x { (p.x, q.x) } else { (q.x, p.x) };
            let between = |x: f64| left.x() < x && x < right.x();
            Ok(match (between(lo), between(hi)) {
                (true, false) => lo,
                (false, true) => hi,
                _ if left.y() < right.y() => lo,
                _ => hi,
            })
        }
        _ => Ok(tangency(left, right, directrix)),
    }
}

// Rounding can push the discriminant of a double root below zero. The two
// arcs then nearly touch, at the vertex of their difference.
fn tangency(left: &Site, right: &Site, directrix: f64) -> f64 {
    match (
        Parabola::new(left.position(), directrix),
        Parabola::new(right.position(), directrix),
    ) {
        (Parabola::Curve { a: a0, b: b0, .. }, Parabola::Curve { a: a1, b: b1, .. }) => {
            -(b0 - b1) / (2.0 * (a0 - a1))
        }
        // Rays always cross, so `crosspoints` never comes back empty for them.
        _ => (left.x() + right.x()) / 2.0,
    }
}
