//! The sweep's event queue.
//!
//! The sweep line moves toward increasing `y`. Events come out of the queue
//! ordered by their position: by `y`, then by `x`, and at exactly equal
//! positions, removals before appearances (a removal at that position
//! changes the beachline an appearance would search). Events that tie on
//! all of that come out in the order they went in.

use std::collections::BTreeMap;

use crate::{beachline::ArcIdx, geom::Point, num::CheapOrderedFloat, site::Site};

/// Something that happens when the sweep line reaches a certain position.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// The sweep line reaches a site, and a new arc appears on the beachline.
    Appear(Site),
    /// An arc shrinks to nothing at `vertex`. The event fires when the sweep
    /// line touches the bottom of the circle of the given `radius` about
    /// `vertex`, which passes through the arc's site and both neighbors'
    /// sites.
    Remove {
        /// The vanishing arc.
        arc: ArcIdx,
        /// Where the arc's breakpoints meet.
        vertex: Point,
        /// Distance from `vertex` to each of the three sites.
        radius: f64,
    },
}

impl Event {
    /// The sweep position at which this event fires.
    pub fn position(&self) -> Point {
        match *self {
            Event::Appear(site) => site.position(),
            Event::Remove { vertex, radius, .. } => Point::new(vertex.x, vertex.y + radius),
        }
    }

    fn kind(&self) -> Kind {
        match self {
            Event::Appear(_) => Kind::Appear,
            Event::Remove { .. } => Kind::Remove,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
    Remove,
    Appear,
}

/// The position of an event in the queue, good for cancelling it later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventKey {
    y: CheapOrderedFloat,
    x: CheapOrderedFloat,
    kind: Kind,
    seq: u64,
}

/// Pending events, earliest first.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: BTreeMap<EventKey, Event>,
    next_seq: u64,
}

impl EventQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `event`, returning the key that identifies it.
    pub fn insert(&mut self, event: Event) -> EventKey {
        let position = event.position();
        let key = EventKey {
            y: position.y.into(),
            x: position.x.into(),
            kind: event.kind(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.events.insert(key, event);
        key
    }

    /// The earliest event, if any.
    pub fn peek(&self) -> Option<&Event> {
        self.events.values().next()
    }

    /// Removes and returns the earliest event, if any.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_first().map(|(_, event)| event)
    }

    /// Removes the event scheduled under `key`, if it is still pending.
    pub fn remove(&mut self, key: EventKey) -> Option<Event> {
        self.events.remove(&key)
    }

    /// Removes every event matching `pred`, returning how many were removed.
    pub fn cancel(&mut self, mut pred: impl FnMut(&Event) -> bool) -> usize {
        let before = self.events.len();
        self.events.retain(|_, event| !pred(event));
        before - self.events.len()
    }

    /// The number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Is anything pending?
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn remove(arc: usize, x: f64, y: f64, radius: f64) -> Event {
        Event::Remove {
            arc: ArcIdx(arc),
            vertex: Point::new(x, y),
            radius,
        }
    }

    fn drain(queue: &mut EventQueue) -> Vec<Point> {
        std::iter::from_fn(|| queue.pop())
            .map(|e| e.position())
            .collect()
    }

    #[test]
    fn ordered_by_y_then_x() {
        let mut queue = EventQueue::new();
        queue.insert(Event::Appear(Site::new(1.0, 2.0)));
        queue.insert(Event::Appear(Site::new(0.0, 2.0)));
        queue.insert(Event::Appear(Site::new(5.0, -1.0)));
        queue.insert(remove(0, 3.0, 0.0, 1.0));
        assert_eq!(queue.len(), 4);
        assert_eq!(
            drain(&mut queue),
            vec![
                Point::new(5.0, -1.0),
                Point::new(3.0, 1.0),
                Point::new(0.0, 2.0),
                Point::new(1.0, 2.0)
            ]
        );
        assert!(queue.is_empty());
        assert_matches!(queue.pop(), None);
        assert_matches!(queue.peek(), None);
    }

    #[test]
    fn removals_before_appearances() {
        let mut queue = EventQueue::new();
        queue.insert(Event::Appear(Site::new(1.0, 2.0)));
        queue.insert(remove(7, 1.0, 1.0, 1.0));
        assert_matches!(queue.peek(), Some(Event::Remove { arc: ArcIdx(7), .. }));
        assert_matches!(queue.pop(), Some(Event::Remove { .. }));
        assert_matches!(queue.pop(), Some(Event::Appear(_)));
    }

    #[test]
    fn ties_are_fifo() {
        let mut queue = EventQueue::new();
        for arc in 0..5 {
            queue.insert(remove(arc, 0.0, 0.0, 1.0));
        }
        let arcs: Vec<_> = std::iter::from_fn(|| queue.pop())
            .map(|e| match e {
                Event::Remove { arc, .. } => arc.0,
                Event::Appear(_) => unreachable!(),
            })
            .collect();
        assert_eq!(arcs, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn cancel() {
        let mut queue = EventQueue::new();
        let site = Site::new(0.0, 10.0);
        queue.insert(Event::Appear(site));
        queue.insert(remove(1, 0.0, 0.0, 1.0));
        let key = queue.insert(remove(2, 0.0, 0.0, 2.0));
        queue.insert(remove(1, 4.0, 0.0, 3.0));

        let removed = queue.cancel(|e| matches!(e, Event::Remove { arc: ArcIdx(1), .. }));
        assert_eq!(removed, 2);
        assert_eq!(queue.cancel(|_| false), 0);

        assert_matches!(queue.remove(key), Some(Event::Remove { arc: ArcIdx(2), .. }));
        assert_matches!(queue.remove(key), None);
        assert_matches!(queue.pop(), Some(Event::Appear(s)) if s.same_identity(&site));
    }
}
