//! The beachline: the sweep's frontier of parabolic arcs, left to right.
//!
//! Arcs live in an arena and are never moved or reused, so an [`ArcIdx`] stays
//! valid (if perhaps stale) after its arc leaves the beachline. The left to
//! right order is kept twice: as links between neighbors, for constant-time
//! neighbor queries, and in a [`TreeVec`], for searching.
//!
//! No geometry is cached. Every search recomputes breakpoints at the sweep
//! position it is given.

use crate::{
    edge::EdgeIdx, event::EventKey, parabola::breakpoint, site::Site, treevec::TreeVec, Error,
};

/// An index into the beachline's arena of arcs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcIdx(pub usize);

/// The arena of arcs.
#[derive(Clone)]
pub struct ArcVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(ArcVec, ArcIdx, "arc");

/// One site's arc on the beachline.
#[derive(Clone, Debug)]
pub struct ParabolaArc {
    /// The site whose parabola this arc is a piece of.
    pub site: Site,
    /// The half-edge traced by the breakpoint on this arc's left.
    pub left_edge: Option<EdgeIdx>,
    /// The half-edge traced by the breakpoint on this arc's right.
    pub right_edge: Option<EdgeIdx>,
    /// The scheduled removal of this arc, if there is one.
    pub pending: Option<EventKey>,
    prev: Option<ArcIdx>,
    next: Option<ArcIdx>,
}

/// The beachline.
#[derive(Clone, Debug, Default)]
pub struct Beachline {
    arcs: ArcVec<ParabolaArc>,
    order: TreeVec<ArcIdx, 32>,
}

impl Beachline {
    /// An empty beachline.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of arcs currently on the beachline.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Is the beachline empty?
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The arc to the left of `arc`.
    pub fn prev(&self, arc: ArcIdx) -> Option<ArcIdx> {
        self.arcs[arc].prev
    }

    /// The arc to the right of `arc`.
    pub fn next(&self, arc: ArcIdx) -> Option<ArcIdx> {
        self.arcs[arc].next
    }

    /// The arcs on the beachline, left to right.
    pub fn iter(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        self.order.iter().copied()
    }

    /// Starts the beachline off with a single arc.
    pub fn push_first(&mut self, site: Site) -> ArcIdx {
        debug_assert!(self.is_empty());
        let idx = self.arcs.push(ParabolaArc {
            site,
            left_edge: None,
            right_edge: None,
            pending: None,
            prev: None,
            next: None,
        });
        self.order.insert(0, idx);
        idx
    }

    /// The horizontal position of the breakpoint to the right of `arc`, or
    /// `None` if `arc` is the rightmost one.
    pub fn right_breakpoint(&self, arc: ArcIdx, sweep: f64) -> Result<Option<f64>, Error> {
        let Some(next) = self.arcs[arc].next else {
            return Ok(None);
        };
        breakpoint(&self.arcs[arc].site, &self.arcs[next].site, sweep).map(Some)
    }

    /// Finds the arc directly above `x` with the sweep line at `sweep`.
    ///
    /// Returns the arc and its position on the beachline. A point exactly on
    /// a breakpoint belongs to the arc on its left. The rightmost arc is
    /// unbounded on the right, which also covers a first row of sites that
    /// share the sweep's starting height.
    pub fn locate(&self, x: f64, sweep: f64) -> Result<(usize, ArcIdx), Error> {
        let mut failure = None;
        let slot = self
            .order
            .partition_point(|&arc| match self.right_breakpoint(arc, sweep) {
                Ok(Some(bx)) => x > bx,
                Ok(None) => false,
                Err(e) => {
                    failure.get_or_insert(e);
                    false
                }
            });
        if let Some(e) = failure {
            return Err(e);
        }
        let arc = self
            .order
            .get(slot)
            .copied()
            .ok_or(Error::Structure("no arc above a new site"))?;
        Ok((slot, arc))
    }

    /// Inserts a new arc for `site` just to the right of the arc at position
    /// `slot`.
    pub fn insert_after(&mut self, slot: usize, site: Site) -> ArcIdx {
        let after = self.order[slot];
        let next = self.arcs[after].next;
        let idx = self.arcs.push(ParabolaArc {
            site,
            left_edge: None,
            right_edge: None,
            pending: None,
            prev: Some(after),
            next,
        });
        self.arcs[after].next = Some(idx);
        if let Some(next) = next {
            self.arcs[next].prev = Some(idx);
        }
        self.order.insert(slot + 1, idx);
        idx
    }

    /// Takes `arc` off the beachline.
    ///
    /// `near_x` is where the arc is expected to be, which is usually enough
    /// to find it without a linear scan.
    pub fn remove(&mut self, arc: ArcIdx, near_x: f64, sweep: f64) -> Result<(), Error> {
        let slot = self
            .slot_of(arc, near_x, sweep)
            .ok_or(Error::Structure("vanishing arc is not on the beachline"))?;
        self.order.remove(slot);

        let (prev, next) = (self.arcs[arc].prev, self.arcs[arc].next);
        if let Some(prev) = prev {
            self.arcs[prev].next = next;
        }
        if let Some(next) = next {
            self.arcs[next].prev = prev;
        }
        self.arcs[arc].prev = None;
        self.arcs[arc].next = None;
        Ok(())
    }

    fn slot_of(&self, arc: ArcIdx, near_x: f64, sweep: f64) -> Option<usize> {
        let guess = self.order.partition_point(
            |&a| matches!(self.right_breakpoint(a, sweep), Ok(Some(bx)) if bx < near_x),
        );
        // Breakpoints around a vanishing arc are all close to `near_x`, and
        // rounding can put the arc a few places off the guess.
        let len = self.order.len();
        (0..len).find_map(|d| {
            let after = guess + d;
            if after < len && self.order[after] == arc {
                return Some(after);
            }
            let before = guess.checked_sub(d + 1)?;
            (self.order[before] == arc).then_some(before)
        })
    }

    /// Panics if the links between arcs disagree with the arcs' order.
    pub fn check_invariants(&self) {
        self.order.check_invariants();
        let order: Vec<_> = self.iter().collect();
        for (i, &arc) in order.iter().enumerate() {
            let prev = i.checked_sub(1).map(|j| order[j]);
            let next = order.get(i + 1).copied();
            assert_eq!(self.arcs[arc].prev, prev, "bad left link at {arc:?}");
            assert_eq!(self.arcs[arc].next, next, "bad right link at {arc:?}");
        }
    }
}

impl std::ops::Index<ArcIdx> for Beachline {
    type Output = ParabolaArc;

    fn index(&self, index: ArcIdx) -> &ParabolaArc {
        &self.arcs[index]
    }
}

impl std::ops::IndexMut<ArcIdx> for Beachline {
    fn index_mut(&mut self, index: ArcIdx) -> &mut ParabolaArc {
        &mut self.arcs[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites(line: &Beachline) -> Vec<(f64, f64)> {
        line.iter()
            .map(|arc| (line[arc].site.x(), line[arc].site.y()))
            .collect()
    }

    #[test]
    fn first_row() {
        let mut line = Beachline::new();
        assert!(line.locate(0.0, 0.0).is_err());

        let a = line.push_first(Site::new(0.0, 0.0));
        // The only arc covers everything, including sites at its own height.
        assert_eq!(line.locate(-5.0, 0.0).unwrap(), (0, a));
        assert_eq!(line.locate(5.0, 0.0).unwrap(), (0, a));

        let b = line.insert_after(0, Site::new(4.0, 0.0));
        assert_eq!(line.locate(1.0, 0.0).unwrap(), (0, a));
        assert_eq!(line.locate(6.0, 0.0).unwrap(), (1, b));
        assert_eq!(line.right_breakpoint(a, 0.0).unwrap(), Some(2.0));
        assert_eq!(line.right_breakpoint(b, 0.0).unwrap(), None);
        line.check_invariants();
    }

    #[test]
    fn split() {
        let mut line = Beachline::new();
        let outer = Site::new(0.0, 0.0);
        let a = line.push_first(outer);
        let b = line.insert_after(0, Site::new(1.0, 5.0));
        let c = line.insert_after(1, outer);
        line.check_invariants();
        assert_eq!(sites(&line), vec![(0.0, 0.0), (1.0, 5.0), (0.0, 0.0)]);
        assert_eq!(line.prev(b), Some(a));
        assert_eq!(line.next(b), Some(c));

        // Once the sweep moves on, the new arc widens around x = 1.
        assert_eq!(line.locate(1.0, 6.0).unwrap(), (1, b));
        assert_eq!(line.locate(-10.0, 6.0).unwrap(), (0, a));
        assert_eq!(line.locate(10.0, 6.0).unwrap(), (2, c));

        line.remove(b, 1.0, 6.0).unwrap();
        line.check_invariants();
        assert_eq!(line.len(), 2);
        assert_eq!(line.next(a), Some(c));
        assert_eq!(line.prev(c), Some(a));
        assert!(line.remove(b, 1.0, 6.0).is_err());
    }

    #[test]
    fn many_arcs() {
        let mut line = Beachline::new();
        let first = line.push_first(Site::new(0.0, 0.0));
        let mut arcs = vec![first];
        for i in 1..200 {
            arcs.push(line.insert_after(i - 1, Site::new(i as f64, 0.0)));
        }
        line.check_invariants();
        for (i, &arc) in arcs.iter().enumerate() {
            assert_eq!(line.locate(i as f64 + 0.25, 1.0).unwrap(), (i, arc));
        }
        // Remove every other arc, with a deliberately poor hint.
        for &arc in arcs.iter().step_by(2) {
            line.remove(arc, 100.0, 1.0).unwrap();
        }
        line.check_invariants();
        assert_eq!(line.len(), 100);
    }
}
