//! Voronoi edges.
//!
//! The sweep produces [`HalfEdge`]s: directed fragments that start at a
//! breakpoint and follow it as the sweep advances. A half-edge starts out as
//! a ray and becomes a segment once the breakpoint it traces runs into a
//! vertex. Most boundaries between two cells are traced by two half-edges
//! running in opposite directions from a common start, one for each
//! left/right orientation of the pair. The optimizer in
//! [`diagram`](crate::diagram) glues those back together into [`FullEdge`]s.

use kurbo::Vec2;

use crate::{geom::Point, site::Site};

/// An index into the sweep's arena of half-edges.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIdx(pub usize);

/// The sweep's arena of half-edges.
#[derive(Clone)]
pub struct EdgeVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(EdgeVec, EdgeIdx, "edge");

/// Common view of the two edge representations.
pub trait Edge {
    /// The two sites this edge separates, as `(left, right)`.
    fn sites(&self) -> (Site, Site);

    /// Both endpoints, with the end at infinity (if there is one) first.
    fn ends(&self) -> (Point, Point);

    /// Does either end of the edge go off to infinity?
    fn is_infinite(&self) -> bool;

    /// Does this edge bound the cell of `site`?
    fn borders(&self, site: &Site) -> bool {
        let (left, right) = self.sites();
        left.same_identity(site) || right.same_identity(site)
    }
}

/// A directed edge fragment produced by the sweep.
///
/// The fragment starts at [`start`](Self::start) and runs perpendicular to
/// the segment between its two sites, keeping the left site on its
/// counter-clockwise side. While it is open, its far end is a point one
/// tenth of the site distance along that direction, marking which way the
/// ray goes.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct HalfEdge {
    start: Point,
    end: Point,
    direction: Vec2,
    left: Site,
    right: Site,
    infinite: bool,
}

impl HalfEdge {
    /// An open half-edge starting at `start`, separating `left` from `right`.
    pub fn new(start: Point, left: Site, right: Site) -> Self {
        let direction = Vec2::new(
            (left.y() - right.y()) / 10.0,
            (right.x() - left.x()) / 10.0,
        );
        HalfEdge {
            start,
            end: start + direction,
            direction,
            left,
            right,
            infinite: true,
        }
    }

    /// Where the fragment starts.
    pub fn start(&self) -> Point {
        self.start
    }

    /// The far end: a vertex if the fragment is closed, otherwise a point on
    /// the ray.
    pub fn end(&self) -> Point {
        self.end
    }

    /// The direction the fragment runs in.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// The site on the counter-clockwise side of the direction.
    pub fn left(&self) -> Site {
        self.left
    }

    /// The site on the clockwise side of the direction.
    pub fn right(&self) -> Site {
        self.right
    }

    /// Is the far end still open?
    pub fn is_open(&self) -> bool {
        self.infinite
    }

    /// Ends the fragment at `end`.
    pub fn close(&mut self, end: Point) {
        self.end = end;
        self.infinite = false;
    }

    /// The distance between the two ends. Only meaningful once closed.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Do `self` and `other` separate the same two sites, in opposite orientations?
    pub fn is_twin_of(&self, other: &HalfEdge) -> bool {
        self.left.same_identity(&other.right) && self.right.same_identity(&other.left)
    }

    /// Is `p` on the forward side of the start point?
    ///
    /// `p` is assumed to lie on the fragment's line; it passes if it is no
    /// more than `eps` behind the start.
    pub fn has_point(&self, p: Point, eps: f64) -> bool {
        (p - self.start).dot(self.direction) >= -eps * self.direction.hypot()
    }

    /// Where two open fragments will meet, if they ever do.
    ///
    /// Returns `None` if either fragment is closed, if they are parallel, or
    /// if their lines cross behind the start of either one.
    pub fn crosspoint(e1: &HalfEdge, e2: &HalfEdge, eps: f64) -> Option<Point> {
        HalfEdge::crossing(e1, e2, [false, false], eps)
    }

    /// Like [`crosspoint`](Self::crosspoint), except that a fragment flagged
    /// in `whole_line` may also be met behind its start.
    pub fn crossing(
        e1: &HalfEdge,
        e2: &HalfEdge,
        whole_line: [bool; 2],
        eps: f64,
    ) -> Option<Point> {
        if !e1.infinite || !e2.infinite {
            return None;
        }
        let denom = e1.direction.cross(e2.direction);
        if denom == 0.0 {
            return None;
        }
        let t = (e2.start - e1.start).cross(e2.direction) / denom;
        let p = e1.start + e1.direction * t;
        let ahead = |e: &HalfEdge, line: bool| line || e.has_point(p, eps);
        (ahead(e1, whole_line[0]) && ahead(e2, whole_line[1])).then_some(p)
    }

    /// Promotes this fragment to a finished edge on its own. The start is a
    /// finite vertex; the far end stays open if the fragment is.
    pub fn to_full_edge(&self) -> FullEdge {
        FullEdge {
            a: self.start,
            b: self.end,
            left: self.left,
            right: self.right,
            a_infinite: false,
            b_infinite: self.infinite,
        }
    }
}

impl Edge for HalfEdge {
    fn sites(&self) -> (Site, Site) {
        (self.left, self.right)
    }

    fn ends(&self) -> (Point, Point) {
        (self.end, self.start)
    }

    fn is_infinite(&self) -> bool {
        self.infinite
    }
}

/// An undirected, finished edge.
///
/// Each end is either a Voronoi vertex or at infinity; an end at infinity
/// holds a point along the edge that gives its direction.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct FullEdge {
    /// One end.
    pub a: Point,
    /// The other end.
    pub b: Point,
    /// One of the separated sites.
    pub left: Site,
    /// The other separated site.
    pub right: Site,
    /// Is `a` at infinity?
    pub a_infinite: bool,
    /// Is `b` at infinity?
    pub b_infinite: bool,
}

impl FullEdge {
    /// Does this edge separate `s` from `t`, in either order?
    pub fn separates(&self, s: &Site, t: &Site) -> bool {
        (self.left.same_identity(s) && self.right.same_identity(t))
            || (self.left.same_identity(t) && self.right.same_identity(s))
    }

    /// The finite ends of this edge.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        let a = (!self.a_infinite).then_some(self.a);
        let b = (!self.b_infinite).then_some(self.b);
        a.into_iter().chain(b)
    }
}

impl Edge for FullEdge {
    fn sites(&self) -> (Site, Site) {
        (self.left, self.right)
    }

    fn ends(&self) -> (Point, Point) {
        if self.a_infinite {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    fn is_infinite(&self) -> bool {
        self.a_infinite || self.b_infinite
    }
}
