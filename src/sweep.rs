//! The sweep-line engine.
//!
//! The sweep line moves toward increasing `y`, stopping at two kinds of
//! events. When it reaches a site, a new arc appears on the beachline,
//! splitting the arc above it and starting a pair of half-edges. When the two
//! breakpoints around an arc meet, the arc vanishes: the half-edges it was
//! tracing end at that point (a Voronoi vertex) and a new one starts there.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    beachline::{ArcIdx, Beachline},
    edge::{EdgeIdx, EdgeVec, HalfEdge},
    event::{Event, EventQueue},
    geom::Point,
    parabola::crosspoints,
    site::Site,
    Error, Options,
};

/// Relative tolerance of the equidistance check on closed vertices.
const VERTEX_TOLERANCE: f64 = 1e-5;

/// The state of a sweep in progress.
pub(crate) struct Sweeper<'a> {
    options: &'a Options,
    eps: f64,
    sweep: f64,
    beachline: Beachline,
    queue: EventQueue,
    // Edges that turned out to have zero length are dropped by
    // replacing them with `None`, which keeps the indices stable.
    edges: EdgeVec<Option<HalfEdge>>,
    // Bisectors of two sites in the first row are whole lines. The traced
    // fragment maps to its twin, which runs the other way from the same start.
    lines: HashMap<EdgeIdx, EdgeIdx>,
    // Vertices and arc starts from events at about the current sweep position.
    fresh: Vec<(Point, f64)>,
    last_appeared: Option<Site>,
    processed: usize,
    limit: usize,
}

impl<'a> Sweeper<'a> {
    /// Prepares a sweep over `sites`, which must already have been checked
    /// for duplicates and non-finite coordinates.
    pub fn new(sites: &[Site], eps: f64, options: &'a Options) -> Self {
        let mut queue = EventQueue::new();
        for &site in sites {
            queue.insert(Event::Appear(site));
        }
        Sweeper {
            options,
            eps,
            sweep: f64::NEG_INFINITY,
            beachline: Beachline::new(),
            queue,
            edges: EdgeVec::with_capacity(3 * sites.len()),
            lines: HashMap::new(),
            fresh: Vec::new(),
            last_appeared: None,
            processed: 0,
            limit: options.event_limit_for(sites.len()),
        }
    }

    /// Runs the sweep to completion, returning the half-edges in the order
    /// they were created.
    pub fn run(mut self) -> Result<Vec<HalfEdge>, Error> {
        while let Some(event) = self.queue.pop() {
            self.processed += 1;
            if self.processed > self.limit {
                return Err(Error::EventLimit { limit: self.limit });
            }
            match event {
                Event::Appear(site) => self.appear(site)?,
                Event::Remove { arc, vertex, radius } => self.remove(arc, vertex, radius)?,
            }
            self.check_invariants();
        }

        let edges: Vec<_> = self.edges.into_vec().into_iter().flatten().collect();
        debug!(
            events = self.processed,
            edges = edges.len(),
            "sweep finished"
        );
        Ok(edges)
    }

    fn appear(&mut self, site: Site) -> Result<(), Error> {
        self.sweep = site.y();
        trace!(?site, sweep = self.sweep, "site event");

        // Sites at the same position appear one right after the other.
        if let Some(last) = self.last_appeared.replace(site) {
            if last.same_position(&site) {
                return Err(Error::SameParabola {
                    first: last.id(),
                    second: site.id(),
                });
            }
        }

        if self.beachline.is_empty() {
            self.beachline.push_first(site);
            return Ok(());
        }

        let (slot, above) = self.beachline.locate(site.x(), self.sweep)?;
        self.cancel_removal(above);
        let above_site = self.beachline[above].site;
        let start = crosspoints(&site, &above_site, self.sweep)?
            .first()
            .copied()
            .ok_or(Error::Structure("new arc does not meet the arc above it"))?;
        let start = self.nearby_vertex(start).unwrap_or(start);
        self.fresh.push((start, self.sweep));

        // The breakpoint on the new arc's left traces `left`, the one on its
        // right traces `right`. Both start where the new arc touches the old.
        let left = self
            .edges
            .push(Some(HalfEdge::new(start, above_site, site)));
        let right = self
            .edges
            .push(Some(HalfEdge::new(start, site, above_site)));

        let old_right = self.beachline[above].right_edge;
        let new = self.beachline.insert_after(slot, site);
        self.beachline[above].right_edge = Some(left);
        self.beachline[new].left_edge = Some(left);

        if site.y() != above_site.y() {
            let copy = self.beachline.insert_after(slot + 1, above_site);
            self.beachline[new].right_edge = Some(right);
            self.beachline[copy].left_edge = Some(right);
            self.beachline[copy].right_edge = old_right;
        } else {
            // Both sites are in the first row, so the arc above is a vertical
            // ray and there is nothing to its right to split off. Their
            // breakpoint comes up from infinitely far back along the bisector,
            // which `left` and `right` cover between them.
            trace!(?site, ?above_site, "appearing next to a ray");
            self.lines.insert(left, right);
        }

        let prev = self.beachline.prev(new);
        let next = self.beachline.next(new);
        for arc in [prev, Some(new), next].into_iter().flatten() {
            self.check_for_remove(arc);
        }
        Ok(())
    }

    fn remove(&mut self, arc: ArcIdx, vertex: Point, radius: f64) -> Result<(), Error> {
        self.sweep = self.sweep.max(vertex.y + radius);
        trace!(?arc, ?vertex, radius, sweep = self.sweep, "circle event");

        let (Some(prev), Some(next)) = (self.beachline.prev(arc), self.beachline.next(arc)) else {
            return Err(Error::Structure("vanishing arc is missing a neighbor"));
        };
        self.beachline[arc].pending = None;
        self.cancel_removal(prev);
        self.cancel_removal(next);

        if self.options.check_vertices {
            self.check_vertex(vertex, radius, [prev, arc, next])?;
        }

        // Everything that meets at this point has to agree on it exactly, so
        // snap to a vertex or breakpoint start already there.
        let vanishing = &self.beachline[arc];
        let closing = [vanishing.left_edge, vanishing.right_edge];
        let vertex = match self.nearby_vertex(vertex) {
            Some(v) => v,
            None => closing
                .into_iter()
                .flatten()
                .filter_map(|edge| self.edges[edge].map(|e| e.start()))
                .find(|start| start.distance(vertex) <= self.eps)
                .unwrap_or(vertex),
        };
        self.fresh.push((vertex, self.sweep));
        for edge in closing.into_iter().flatten() {
            match self.lines.remove(&edge) {
                Some(twin) => self.end_line(edge, twin, vertex),
                None => self.close_edge(edge, vertex),
            }
        }

        let left = self.beachline[prev].site;
        let right = self.beachline[next].site;
        let edge = self.edges.push(Some(HalfEdge::new(vertex, left, right)));
        self.beachline[prev].right_edge = Some(edge);
        self.beachline[next].left_edge = Some(edge);
        self.beachline.remove(arc, vertex.x, self.sweep)?;

        self.check_for_remove(prev);
        self.check_for_remove(next);
        Ok(())
    }

    /// Schedules the removal of `arc` if its two breakpoints are going to meet.
    ///
    /// Any removal already scheduled for `arc` is cancelled first, since it
    /// was computed for a different pair of neighbors.
    fn check_for_remove(&mut self, arc: ArcIdx) {
        self.cancel_removal(arc);

        let (Some(prev), Some(next)) = (self.beachline.prev(arc), self.beachline.next(arc)) else {
            return;
        };
        let middle = &self.beachline[arc];
        let l = self.beachline[prev].site;
        let a = middle.site;
        let r = self.beachline[next].site;
        if l.same_identity(&r) {
            return;
        }

        // The breakpoints only converge if the sites turn the right way.
        // Without this, an arc squeezed to zero width between two breakpoints
        // that are moving apart would be removed as soon as it appeared.
        let turn = (a.position() - l.position()).cross(r.position() - a.position());
        if turn <= 0.0 {
            return;
        }

        let (Some(left_edge), Some(right_edge)) = (middle.left_edge, middle.right_edge) else {
            return;
        };
        let (Some(e1), Some(e2)) = (&self.edges[left_edge], &self.edges[right_edge]) else {
            return;
        };
        let whole_line = [left_edge, right_edge].map(|e| self.lines.contains_key(&e));
        // Nearly parallel edges can meet absurdly far away.
        let Some(vertex) =
            HalfEdge::crossing(e1, e2, whole_line, self.eps).filter(Point::is_finite)
        else {
            return;
        };

        let radius = vertex.distance(a.position());
        if vertex.y + radius < self.sweep - self.eps {
            trace!(?arc, ?vertex, radius, "circle event is behind the sweep line");
            return;
        }
        let key = self.queue.insert(Event::Remove {
            arc,
            vertex,
            radius,
        });
        self.beachline[arc].pending = Some(key);
    }

    fn cancel_removal(&mut self, arc: ArcIdx) {
        if let Some(key) = self.beachline[arc].pending.take() {
            if self.queue.remove(key).is_some() {
                debug!(?arc, "cancelled circle event");
            }
        }
    }

    fn close_edge(&mut self, idx: EdgeIdx, vertex: Point) {
        let Some(edge) = self.edges[idx].as_mut() else {
            return;
        };
        edge.close(vertex);
        if edge.length() <= self.eps {
            debug!(edge = ?idx, ?vertex, "dropping zero-length edge");
            self.edges[idx] = None;
        }
    }

    // The traced half of a first-row bisector met a vertex. Only the part of
    // the line behind the vertex is an edge, and that is what the twin
    // becomes.
    fn end_line(&mut self, traced: EdgeIdx, twin: EdgeIdx, vertex: Point) {
        debug!(edge = ?traced, ?vertex, "bisector line ends");
        self.edges[traced] = None;
        if let Some(t) = self.edges[twin] {
            self.edges[twin] = Some(HalfEdge::new(vertex, t.left(), t.right()));
        }
    }

    fn nearby_vertex(&mut self, p: Point) -> Option<Point> {
        let horizon = self.sweep - self.eps;
        self.fresh.retain(|&(_, seen)| seen >= horizon);
        self.fresh
            .iter()
            .map(|&(v, _)| v)
            .find(|v| v.distance(p) <= self.eps)
    }

    fn check_vertex(&self, vertex: Point, radius: f64, arcs: [ArcIdx; 3]) -> Result<(), Error> {
        let distances = arcs.map(|arc| vertex.distance(self.beachline[arc].site.position()));
        let tolerance = VERTEX_TOLERANCE * radius.max(1.0);
        if !distances.iter().all(|d| (d - radius).abs() <= tolerance) {
            return Err(Error::VertexMismatch { vertex, distances });
        }
        Ok(())
    }

    #[cfg(feature = "slow-asserts")]
    fn check_invariants(&self) {
        self.beachline.check_invariants();
        for arc in self.beachline.iter() {
            let edges = [self.beachline[arc].left_edge, self.beachline[arc].right_edge];
            for edge in edges.into_iter().flatten() {
                assert!(
                    self.edges[edge].is_some_and(|e| e.is_open()),
                    "{arc:?} traces {edge:?}, which is not open"
                );
            }
        }
    }

    #[cfg(not(feature = "slow-asserts"))]
    fn check_invariants(&self) {}
}
