//! Input sites and their identities.
//!
//! Sites are compared two different ways. Structural bookkeeping (which edge
//! separates which pair of cells) goes by *identity*, because two sites may
//! sit at exactly the same coordinates and still be distinct inputs. Geometry
//! goes by *position*. The two are separate, explicitly named methods, and
//! [`Site`] deliberately has no `PartialEq`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{geom::Point, Error};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// The identity of a [`Site`].
///
/// Identities handed out by [`Site::new`] come from a process-wide counter,
/// so they are unique and never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct SiteId(pub usize);

impl std::fmt::Debug for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "site_{}", self.0)
    }
}

impl SiteId {
    fn fresh() -> Self {
        SiteId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A point the diagram is built around.
///
/// A `Site` is `Copy`, and a copy keeps the identity of its original. Passing
/// the same site twice to [`calculate`](crate::calculate) is therefore an
/// error, while passing two different sites at the same position is not.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct Site {
    id: SiteId,
    position: Point,
}

impl Site {
    /// Creates a site at `(x, y)` with a fresh identity.
    pub fn new(x: f64, y: f64) -> Self {
        Site::at(Point::new(x, y))
    }

    /// Creates a site at `position` with a fresh identity.
    pub fn at(position: Point) -> Self {
        Site {
            id: SiteId::fresh(),
            position,
        }
    }

    /// Creates a site with a caller-chosen identity.
    ///
    /// Nothing stops this from colliding with an identity handed out by
    /// [`Site::new`]; collisions are caught when the sites are swept.
    pub fn with_id(id: SiteId, position: Point) -> Self {
        Site { id, position }
    }

    /// This site's identity.
    pub fn id(&self) -> SiteId {
        self.id
    }

    /// This site's position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Horizontal coordinate.
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Vertical coordinate.
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Are these the same input site?
    pub fn same_identity(&self, other: &Site) -> bool {
        self.id == other.id
    }

    /// Do these sites sit at exactly the same coordinates?
    pub fn same_position(&self, other: &Site) -> bool {
        self.position == other.position
    }

    /// Euclidean distance from this site to `p`.
    pub fn distance(&self, p: Point) -> f64 {
        self.position.distance(p)
    }
}

/// Rejects inputs in which two entries share an identity.
pub(crate) fn check_identities(sites: &[Site]) -> Result<(), Error> {
    let mut seen = HashSet::with_capacity(sites.len());
    for site in sites {
        if !seen.insert(site.id) {
            return Err(Error::DuplicateSite { id: site.id });
        }
    }
    Ok(())
}
