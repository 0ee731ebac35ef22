//! Utilities for generating examples, benchmarks, and test cases.
//!
//! All of these are deterministic. Several are deliberately degenerate,
//! because rows of sites at the same height and many sites on one circle are
//! where a sweep spends its time on special cases.

use crate::{Point, Site};

fn sites(points: impl IntoIterator<Item = Point>) -> Vec<Site> {
    points.into_iter().map(Site::at).collect()
}

/// An `n` by `n` square grid of sites, `spacing` apart.
///
/// Every row shares a height and every four neighboring sites share a
/// circle, so this is about as degenerate as inputs get.
pub fn grid(n: usize, spacing: f64) -> Vec<Site> {
    sites((0..n).flat_map(|j| {
        (0..n).map(move |i| Point::new(i as f64 * spacing, j as f64 * spacing))
    }))
}

/// Like [`grid`], but every site is nudged by a small, deterministic amount
/// so that no two share a row, a column, or (generically) a circle.
pub fn jittered_grid(n: usize, spacing: f64) -> Vec<Site> {
    // Multiples of the golden ratio, mod 1, are spread evenly but never repeat.
    let phi = (5.0f64.sqrt() - 1.0) / 2.0;
    let jitter = |k: usize| ((k as f64 * phi).fract() - 0.5) * spacing * 0.25;
    sites((0..n).flat_map(|j| {
        (0..n).map(move |i| {
            let k = j * n + i;
            Point::new(
                i as f64 * spacing + jitter(2 * k + 1),
                j as f64 * spacing + jitter(2 * k + 2),
            )
        })
    }))
}

/// Rows of sites in a hexagonal (triangular lattice) pattern.
///
/// Odd rows are shifted by half a spacing, so every site has six
/// equidistant neighbors.
pub fn hexagonal(rows: usize, cols: usize, spacing: f64) -> Vec<Site> {
    let row_height = spacing * 3.0f64.sqrt() / 2.0;
    sites((0..rows).flat_map(|j| {
        let shift = if j % 2 == 1 { spacing / 2.0 } else { 0.0 };
        (0..cols).map(move |i| Point::new(i as f64 * spacing + shift, j as f64 * row_height))
    }))
}

/// `n` sites along a sunflower spiral, filling a disk of radius `radius`.
pub fn spiral(n: usize, radius: f64) -> Vec<Site> {
    let golden_angle = std::f64::consts::PI * (3.0 - 5.0f64.sqrt());
    sites((0..n).map(|k| {
        let r = radius * ((k as f64 + 0.5) / n as f64).sqrt();
        let theta = k as f64 * golden_angle;
        Point::new(r * theta.cos(), r * theta.sin())
    }))
}

/// `n` sites evenly spaced on a circle of radius `radius` about the origin.
pub fn circle(n: usize, radius: f64) -> Vec<Site> {
    let step = std::f64::consts::TAU / n as f64;
    sites((0..n).map(|k| {
        let theta = k as f64 * step;
        Point::new(radius * theta.cos(), radius * theta.sin())
    }))
}

/// `n` sites on the line through the origin with direction `(dx, dy)`.
pub fn collinear(n: usize, dx: f64, dy: f64) -> Vec<Site> {
    sites((0..n).map(|k| Point::new(k as f64 * dx, k as f64 * dy)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(grid(4, 1.0).len(), 16);
        assert_eq!(jittered_grid(5, 1.0).len(), 25);
        assert_eq!(hexagonal(3, 7, 1.0).len(), 21);
        assert_eq!(spiral(100, 10.0).len(), 100);
        assert_eq!(circle(12, 1.0).len(), 12);
        assert_eq!(collinear(9, 0.0, 1.0).len(), 9);
    }

    #[test]
    fn jitter_breaks_ties() {
        let sites = jittered_grid(6, 10.0);
        for (i, s) in sites.iter().enumerate() {
            for t in &sites[i + 1..] {
                assert_ne!(s.x(), t.x());
                assert_ne!(s.y(), t.y());
            }
        }
    }

    #[test]
    fn spiral_fits() {
        for s in spiral(500, 3.0) {
            assert!(s.position().distance(Point::new(0.0, 0.0)) <= 3.0);
        }
    }
}
