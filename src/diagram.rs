//! The finished diagram, and the things you can ask of it.

use std::collections::HashMap;

use crate::{
    edge::{Edge, FullEdge, HalfEdge},
    geom::Point,
    num::CheapOrderedFloat,
    site::{Site, SiteId},
    Error,
};

/// The edges of a diagram, in one of two representations.
#[derive(Clone, Debug, serde::Serialize)]
pub enum Edges {
    /// Edge fragments straight out of the sweep.
    Half(Vec<HalfEdge>),
    /// Edges with their fragments glued back together.
    Full(Vec<FullEdge>),
}

impl Edges {
    /// The number of edges.
    pub fn len(&self) -> usize {
        match self {
            Edges::Half(edges) => edges.len(),
            Edges::Full(edges) => edges.len(),
        }
    }

    /// Are there no edges at all?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The boundary of one site's cell, as a sequence of points.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// The cell is unbounded. The first and last points are markers along
    /// the two edges that go off to infinity; the rest are vertices.
    Open(Vec<Point>),
    /// The cell is bounded, and the points are its vertices in order. The
    /// last one connects back to the first.
    Closed(Vec<Point>),
}

impl Cell {
    /// The points along the boundary.
    pub fn vertices(&self) -> &[Point] {
        match self {
            Cell::Open(v) | Cell::Closed(v) => v,
        }
    }

    /// Is the cell unbounded?
    pub fn is_open(&self) -> bool {
        matches!(self, Cell::Open(_))
    }

    /// The number of points, negated for an unbounded cell.
    pub fn signed_len(&self) -> isize {
        let len = self.vertices().len() as isize;
        if self.is_open() {
            -len
        } else {
            len
        }
    }
}

/// A Voronoi diagram: the input sites and the edges between their cells.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Diagram {
    sites: Vec<Site>,
    edges: Edges,
}

impl Diagram {
    pub(crate) fn new(sites: Vec<Site>, edges: Vec<HalfEdge>) -> Self {
        Diagram {
            sites,
            edges: Edges::Half(edges),
        }
    }

    /// The sites, in the order they were given.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// The edges, in whichever representation they are currently in.
    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    /// Have the half-edges been glued together?
    pub fn is_optimized(&self) -> bool {
        matches!(self.edges, Edges::Full(_))
    }

    /// The half-edges, if the diagram has not been optimized.
    pub fn half_edges(&self) -> Result<&[HalfEdge], Error> {
        match &self.edges {
            Edges::Half(edges) => Ok(edges),
            Edges::Full(_) => Err(Error::Structure("diagram holds full edges")),
        }
    }

    /// The full edges, if the diagram has been optimized.
    pub fn full_edges(&self) -> Result<&[FullEdge], Error> {
        match &self.edges {
            Edges::Full(edges) => Ok(edges),
            Edges::Half(_) => Err(Error::Structure("diagram holds half-edges")),
        }
    }

    /// Glues twin half-edges into full edges. Does nothing if that has
    /// already happened.
    pub fn optimize(&mut self) {
        if let Edges::Half(edges) = &mut self.edges {
            let edges = std::mem::take(edges);
            self.edges = Edges::Full(optimize(edges));
        }
    }

    /// All the finite Voronoi vertices, sorted and without exact duplicates.
    pub fn vertices(&self) -> Vec<Point> {
        let mut points: Vec<Point> = match &self.edges {
            Edges::Half(edges) => edges
                .iter()
                .filter(|e| !e.is_open())
                .map(|e| e.end())
                .collect(),
            Edges::Full(edges) => edges.iter().flat_map(|e| e.vertices()).collect(),
        };
        points.sort_by_key(|p| (CheapOrderedFloat::from(p.x), CheapOrderedFloat::from(p.y)));
        points.dedup();
        points
    }

    /// Walks the boundary of the cell of the site at `idx`.
    ///
    /// The walk goes tip to tail over the edges bordering the site. It starts
    /// from an edge going off to infinity, if there is one, and then always
    /// continues with the first unused edge that has an end exactly equal to
    /// the current point. An unbounded cell can have a boundary in more than
    /// one piece (think of the middle one of three collinear sites), in which
    /// case the pieces are listed one after the other.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn cell(&self, idx: usize) -> Result<Cell, Error> {
        let site = &self.sites[idx];
        match &self.edges {
            Edges::Half(edges) => walk_cell(edges, site),
            Edges::Full(edges) => walk_cell(edges, site),
        }
    }

    /// Draws the sites and edges, for debugging.
    ///
    /// Ends at infinity are stretched across the picture.
    #[cfg(feature = "debug-svg")]
    pub fn dump_svg(&self) -> svg::Document {
        use svg::node::element::{path::Data, Circle, Path};

        let bbox = self
            .sites
            .iter()
            .map(|s| {
                let p = s.position().to_kurbo();
                kurbo::Rect::from_points(p, p)
            })
            .reduce(|a, b| a.union(b))
            .unwrap_or(kurbo::Rect::ZERO);
        let pad = 1.0 + bbox.width().max(bbox.height()) / 8.0;
        let bbox = bbox.inflate(pad, pad);
        let reach = bbox.width().hypot(bbox.height());
        let stroke_width = reach / 512.0;

        let mut document = svg::Document::new().set(
            "viewBox",
            (bbox.x0, bbox.y0, bbox.width(), bbox.height()),
        );
        let segment = |a: Point, b: Point| {
            Path::new()
                .set("stroke", "black")
                .set("stroke-width", stroke_width)
                .set("stroke-linecap", "round")
                .set("fill", "none")
                .set("d", Data::new().move_to((a.x, a.y)).line_to((b.x, b.y)))
        };
        let extend = |from: Point, toward: Point| {
            let v = toward - from;
            let len = v.hypot();
            if len > 0.0 {
                from + v * (reach / len)
            } else {
                toward
            }
        };

        match &self.edges {
            Edges::Half(edges) => {
                for e in edges {
                    let end = if e.is_open() {
                        extend(e.start(), e.end())
                    } else {
                        e.end()
                    };
                    document = document.add(segment(e.start(), end));
                }
            }
            Edges::Full(edges) => {
                for e in edges {
                    let a = if e.a_infinite { extend(e.b, e.a) } else { e.a };
                    let b = if e.b_infinite { extend(e.a, e.b) } else { e.b };
                    document = document.add(segment(a, b));
                }
            }
        }

        for site in &self.sites {
            let circle = Circle::new()
                .set("cx", site.x())
                .set("cy", site.y())
                .set("r", 3.0 * stroke_width)
                .set("fill", "red");
            document = document.add(circle);
        }
        document
    }
}

fn walk_cell<E: Edge>(edges: &[E], site: &Site) -> Result<Cell, Error> {
    let mut remaining: Vec<&E> = edges.iter().filter(|e| e.borders(site)).collect();
    if remaining.is_empty() {
        return Ok(Cell::Closed(Vec::new()));
    }

    let first = remaining.iter().position(|e| e.is_infinite());
    let open = first.is_some();
    let (tip, mut next) = remaining.remove(first.unwrap_or(0)).ends();
    let mut vertices = vec![tip];
    while !remaining.is_empty() {
        let connected = remaining.iter().position(|e| {
            let (p, q) = e.ends();
            p == next || q == next
        });
        let pos = match connected {
            Some(pos) => pos,
            None if open => {
                // The boundary of a strip between parallel edges comes in
                // two pieces. Carry on from another edge at infinity.
                let pos = remaining
                    .iter()
                    .position(|e| e.is_infinite())
                    .ok_or(Error::Structure("cell boundary is not connected"))?;
                let (tip, tail) = remaining.remove(pos).ends();
                vertices.push(next);
                vertices.push(tip);
                next = tail;
                continue;
            }
            None => return Err(Error::Structure("cell boundary is not connected")),
        };
        let (p, q) = remaining.remove(pos).ends();
        vertices.push(next);
        next = if p == next { q } else { p };
    }
    vertices.push(next);

    if open {
        Ok(Cell::Open(vertices))
    } else {
        // The walk came back to where it started.
        vertices.pop();
        Ok(Cell::Closed(vertices))
    }
}

/// Glues pairs of twin half-edges into full edges.
///
/// Twins separate the same two sites in opposite orientations and start at
/// the same point; the full edge runs from one's far end to the other's.
/// Half-edges without a twin are kept on their own.
pub fn optimize(edges: Vec<HalfEdge>) -> Vec<FullEdge> {
    let mut unpaired: HashMap<(SiteId, SiteId), Vec<usize>> = HashMap::new();
    for (idx, e) in edges.iter().enumerate() {
        unpaired
            .entry((e.left().id(), e.right().id()))
            .or_default()
            .push(idx);
    }

    let mut used = vec![false; edges.len()];
    let mut full = Vec::with_capacity(edges.len());
    for (idx, he1) in edges.iter().enumerate() {
        if used[idx] {
            continue;
        }
        used[idx] = true;

        let twin = unpaired
            .get(&(he1.right().id(), he1.left().id()))
            .and_then(|candidates| {
                candidates
                    .iter()
                    .copied()
                    .find(|&j| !used[j] && edges[j].start() == he1.start())
            });
        match twin {
            Some(j) => {
                used[j] = true;
                let he2 = &edges[j];
                full.push(FullEdge {
                    a: he1.end(),
                    b: he2.end(),
                    left: he1.left(),
                    right: he1.right(),
                    a_infinite: he1.is_open(),
                    b_infinite: he2.is_open(),
                });
            }
            None => full.push(he1.to_full_edge()),
        }
    }
    full
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calculate, Options};
    use assert_matches::assert_matches;

    fn diagram(points: &[(f64, f64)]) -> Diagram {
        let sites: Vec<_> = points.iter().map(|&(x, y)| Site::new(x, y)).collect();
        calculate(&sites, &Options::default()).unwrap()
    }

    #[test]
    fn representations() {
        let mut d = diagram(&[(0.0, 0.0), (2.0, 0.0)]);
        assert!(!d.is_optimized());
        assert_eq!(d.half_edges().unwrap().len(), 2);
        assert_matches!(d.full_edges(), Err(Error::Structure(_)));

        d.optimize();
        assert!(d.is_optimized());
        assert_matches!(d.half_edges(), Err(Error::Structure(_)));
        let full = d.full_edges().unwrap();
        assert_eq!(full.len(), 1);
        assert!(full[0].a_infinite && full[0].b_infinite);
        assert_eq!(full[0].a, Point::new(1.0, 0.2));
        assert_eq!(full[0].b, Point::new(1.0, -0.2));

        d.optimize();
        assert_eq!(d.edges().len(), 1);
    }

    #[test]
    fn two_cells() {
        let d = diagram(&[(0.0, 0.0), (2.0, 0.0)]);
        let expected = vec![
            Point::new(1.0, 0.2),
            Point::new(1.0, 0.0),
            Point::new(1.0, -0.2),
        ];
        for idx in 0..2 {
            let cell = d.cell(idx).unwrap();
            assert_eq!(cell.signed_len(), -3);
            assert_eq!(cell.vertices(), &expected[..]);
        }
    }

    #[test]
    fn lonely_site() {
        let d = diagram(&[(1.0, 1.0)]);
        assert!(d.edges().is_empty());
        assert!(d.vertices().is_empty());
        let cell = d.cell(0).unwrap();
        assert_eq!(cell, Cell::Closed(Vec::new()));
        assert_eq!(cell.signed_len(), 0);
    }

    #[test]
    fn square() {
        let mut d = diagram(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (2.0, 2.0)]);
        let before = d.vertices();
        assert_eq!(before.len(), 1);
        assert!(before[0].distance(Point::new(1.0, 1.0)) < 1e-9);
        for idx in 0..4 {
            let cell = d.cell(idx).unwrap();
            assert!(cell.is_open());
            assert!(cell.vertices().contains(&before[0]));
        }

        d.optimize();
        assert_eq!(d.full_edges().unwrap().len(), 4);
        assert_eq!(d.vertices(), before);
        for idx in 0..4 {
            let cell = d.cell(idx).unwrap();
            // Marker, vertex, marker.
            assert_eq!(cell.signed_len(), -3);
            assert_eq!(cell.vertices()[1], before[0]);
        }
    }

    #[test]
    fn closed_cell() {
        // A site in the middle of a diamond has a square cell.
        let mut d = diagram(&[(0.0, -2.0), (-2.0, 0.0), (0.0, 0.0), (2.0, 0.0), (0.0, 2.0)]);
        d.optimize();
        let cell = d.cell(2).unwrap();
        assert!(!cell.is_open());
        assert_eq!(cell.signed_len(), 4);
        let mut corners: Vec<_> = cell
            .vertices()
            .iter()
            .map(|p| ((p.x * 1e6).round() / 1e6, (p.y * 1e6).round() / 1e6))
            .collect();
        corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            corners,
            vec![(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)]
        );

        for idx in [0, 1, 3, 4] {
            assert!(d.cell(idx).unwrap().is_open());
        }
    }

    #[test]
    fn strip() {
        let d = diagram(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        let cell = d.cell(1).unwrap();
        assert_eq!(
            cell,
            Cell::Open(vec![
                Point::new(-0.1, 0.5),
                Point::new(0.0, 0.5),
                Point::new(0.1, 0.5),
                Point::new(-0.1, 1.5),
                Point::new(0.0, 1.5),
                Point::new(0.1, 1.5),
            ])
        );
        assert_eq!(d.cell(0).unwrap().signed_len(), -3);
        assert_eq!(d.cell(2).unwrap().signed_len(), -3);
    }

    #[test]
    fn broken_chain() {
        let l = Site::new(0.0, 0.0);
        let r = Site::new(2.0, 0.0);
        let mut e1 = HalfEdge::new(Point::new(1.0, 0.0), l, r);
        e1.close(Point::new(1.0, 1.0));
        let mut e2 = HalfEdge::new(Point::new(1.0, 5.0), r, l);
        e2.close(Point::new(1.0, 6.0));
        let d = Diagram::new(vec![l, r], vec![e1, e2]);
        assert_matches!(d.cell(0), Err(Error::Structure(_)));
    }

    #[test]
    fn optimize_pairs_twins_only() {
        let l = Site::new(0.0, 0.0);
        let r = Site::new(2.0, 0.0);
        let start = Point::new(1.0, 0.0);
        let mut closed = HalfEdge::new(Point::new(1.0, 3.0), l, r);
        closed.close(Point::new(1.0, 4.0));
        let edges = vec![
            HalfEdge::new(start, l, r),
            closed,
            HalfEdge::new(start, r, l),
        ];
        let full = optimize(edges);
        assert_eq!(full.len(), 2);
        assert!(full[0].a_infinite && full[0].b_infinite);
        assert_eq!(full[1].a, Point::new(1.0, 3.0));
        assert_eq!(full[1].b, Point::new(1.0, 4.0));
        assert!(!full[1].a_infinite && !full[1].b_infinite);
    }
}
