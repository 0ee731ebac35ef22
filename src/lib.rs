#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod beachline;
pub mod diagram;
pub mod edge;
pub mod event;
mod geom;
mod num;
pub mod parabola;
mod site;
mod sweep;

#[cfg(feature = "generators")]
pub mod generators;

// pub so that we can use it in fuzz tests, but it's really private
#[doc(hidden)]
pub mod treevec;

pub use diagram::{Cell, Diagram, Edges};
pub use edge::{Edge, FullEdge, HalfEdge};
pub use geom::Point;
pub use site::{Site, SiteId};

use sweep::Sweeper;

/// Things that can go wrong while computing a diagram.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Two input entries are the same site.
    #[error("{id:?} appears more than once in the input")]
    DuplicateSite {
        /// The repeated identity.
        id: SiteId,
    },
    /// At least one of the inputs was not a number.
    #[error("one of the sites has a NaN coordinate")]
    NaN,
    /// At least one of the inputs was infinite.
    #[error("one of the sites has an infinite coordinate")]
    Infinity,
    /// The parabolas of two sites coincide, so their intersection is not a
    /// finite set of points.
    #[error("{first:?} and {second:?} have the same parabola")]
    SameParabola {
        /// One of the two sites.
        first: SiteId,
        /// The other one.
        second: SiteId,
    },
    /// The sweep's bookkeeping, or the diagram, is not in the shape an
    /// operation needs.
    #[error("structural inconsistency: {0}")]
    Structure(&'static str),
    /// A Voronoi vertex was not equidistant from the three sites whose arcs
    /// met there.
    #[error("vertex {vertex:?} is not equidistant from its sites: {distances:?}")]
    VertexMismatch {
        /// The vertex.
        vertex: Point,
        /// Its distances from the three sites.
        distances: [f64; 3],
    },
    /// The sweep processed more events than its limit allows.
    #[error("gave up after {limit} events")]
    EventLimit {
        /// The limit that was hit.
        limit: usize,
    },
}

/// Knobs for [`calculate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Glue twin half-edges into full edges once the sweep is done.
    pub optimize: bool,
    /// Check that every Voronoi vertex is equidistant from its three sites,
    /// failing with [`Error::VertexMismatch`] if it isn't.
    pub check_vertices: bool,
    /// The most events the sweep may process before failing with
    /// [`Error::EventLimit`]. If `None`, the limit is `8n + 64` for `n`
    /// sites, which a correct sweep never reaches.
    pub event_limit: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            optimize: false,
            check_vertices: cfg!(debug_assertions),
            event_limit: None,
        }
    }
}

impl Options {
    /// Sets [`Options::optimize`].
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Sets [`Options::check_vertices`].
    pub fn with_check_vertices(mut self, check: bool) -> Self {
        self.check_vertices = check;
        self
    }

    /// Sets [`Options::event_limit`].
    pub fn with_event_limit(mut self, limit: Option<usize>) -> Self {
        self.event_limit = limit;
        self
    }

    pub(crate) fn event_limit_for(&self, num_sites: usize) -> usize {
        self.event_limit
            .unwrap_or_else(|| num_sites.saturating_mul(8).saturating_add(64))
    }
}

/// Computes the Voronoi diagram of a set of sites.
///
/// Sites may share positions, but not identities: passing two copies of the
/// same [`Site`] is an error. The sites are kept in the diagram in the order
/// given.
pub fn calculate(sites: &[Site], options: &Options) -> Result<Diagram, Error> {
    // Find the extremal values, to figure out how much precision we can support.
    let mut max = 0.0f64;
    for site in sites {
        let Point { x, y } = site.position();
        if x.is_nan() || y.is_nan() {
            return Err(Error::NaN);
        }
        if x.is_infinite() || y.is_infinite() {
            return Err(Error::Infinity);
        }
        max = max.max(x.abs()).max(y.abs());
    }
    site::check_identities(sites)?;

    let eps = max * (f64::EPSILON * 64.0);
    let eps = eps.max(1e-12);
    debug_assert!(eps.is_finite());

    let edges = Sweeper::new(sites, eps, options).run()?;
    let mut diagram = Diagram::new(sites.to_vec(), edges);
    if options.optimize {
        diagram.optimize();
    }

    #[cfg(feature = "debug-svg")]
    {
        if let Err(e) = svg::save("out.svg", &diagram.dump_svg()) {
            tracing::warn!("failed to write out.svg: {e}");
        }
    }

    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn bad_inputs() {
        let opts = Options::default();
        assert_matches!(
            calculate(&[Site::new(0.0, 0.0), Site::new(f64::NAN, 1.0)], &opts),
            Err(Error::NaN)
        );
        assert_matches!(
            calculate(&[Site::new(f64::NEG_INFINITY, 1.0)], &opts),
            Err(Error::Infinity)
        );
        let s = Site::new(1.0, 1.0);
        assert_matches!(
            calculate(&[s, Site::new(2.0, 2.0), s], &opts),
            Err(Error::DuplicateSite { id }) if id == s.id()
        );
    }

    #[test]
    fn messages() {
        insta::assert_snapshot!(Error::NaN, @"one of the sites has a NaN coordinate");
        insta::assert_snapshot!(
            Error::Structure("diagram holds full edges"),
            @"structural inconsistency: diagram holds full edges"
        );
        insta::assert_snapshot!(
            Error::SameParabola { first: SiteId(3), second: SiteId(4) },
            @"site_3 and site_4 have the same parabola"
        );
        insta::assert_snapshot!(Error::EventLimit { limit: 12 }, @"gave up after 12 events");
    }

    #[test]
    fn empty_input() {
        let d = calculate(&[], &Options::default()).unwrap();
        assert!(d.sites().is_empty());
        assert!(d.edges().is_empty());
    }

    #[test]
    fn options() {
        let opts = Options::default()
            .with_optimize(true)
            .with_check_vertices(false)
            .with_event_limit(Some(7));
        assert!(opts.optimize);
        assert!(!opts.check_vertices);
        assert_eq!(opts.event_limit_for(1000), 7);
        assert_eq!(Options::default().event_limit_for(2), 80);

        let sites = [Site::new(0.0, 0.0), Site::new(2.0, 0.0)];
        let d = calculate(&sites, &Options::default().with_optimize(true)).unwrap();
        assert!(d.is_optimized());
        assert_eq!(d.full_edges().unwrap().len(), 1);
    }

    #[test]
    fn coincident_sites() {
        // Distinct sites at the same place pass the identity check, but their
        // parabolas can't be told apart once the sweep moves on.
        let a = Site::new(0.0, 0.0);
        let b = Site::new(0.0, 0.0);
        let sites = [a, Site::new(3.0, 1.0), b];
        assert_matches!(
            calculate(&sites, &Options::default()),
            Err(Error::SameParabola { first, second }) if first == a.id() && second == b.id()
        );
    }
}
