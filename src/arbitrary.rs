//! Utilities for fuzz and/or property testing using `arbitrary`.
//!
//! Uniformly random sites are the easy case for a sweep, so the generators
//! here go out of their way to produce the awkward ones: sites sharing a
//! row or a column, sites nearly on top of one another, and sites on a
//! common circle.

use arbitrary::Unstructured;

use crate::{Point, Site};

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate a float in some range, but give it a chance to be equal or very
/// close to another float.
fn another_float_in_range(
    orig: f64,
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    match u.int_in_range(0..=3)? {
        0 => Ok(orig),
        1 => {
            let ulps: i32 = u.int_in_range(-32..=32)?;
            let scale = 1.0f64 + ulps as f64 * f64::EPSILON;
            Ok((orig * scale).clamp(start, end))
        }
        _ => float_in_range(start, end, u),
    }
}

/// Generate an arbitrary point with coordinates of magnitude at most `size`.
pub fn point(size: f64, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(
        float_in_range(-size, size, u)?,
        float_in_range(-size, size, u)?,
    ))
}

/// Generate a point with a chance of sharing a coordinate with `orig`, or
/// of nearly coinciding with it.
pub fn another_point(
    orig: Point,
    size: f64,
    u: &mut Unstructured<'_>,
) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(
        another_float_in_range(orig.x, -size, size, u)?,
        another_float_in_range(orig.y, -size, size, u)?,
    ))
}

/// Generate a point on the circle through `center` with radius `radius`,
/// at one of a handful of angles that make the coordinates come out exact.
fn cocircular_point(
    center: Point,
    radius: f64,
    u: &mut Unstructured<'_>,
) -> Result<Point, arbitrary::Error> {
    let (dx, dy) = *u.choose(&[
        (1.0, 0.0),
        (0.0, 1.0),
        (-1.0, 0.0),
        (0.0, -1.0),
        (0.6, 0.8),
        (-0.8, 0.6),
        (-0.6, -0.8),
        (0.8, -0.6),
    ])?;
    Ok(Point::new(center.x + radius * dx, center.y + radius * dy))
}

/// Generate up to `max_len` sites with coordinates of magnitude at most `size`.
///
/// Every site gets its own identity, so the result is always a valid input,
/// although positions may repeat.
pub fn sites(
    max_len: usize,
    size: f64,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Site>, arbitrary::Error> {
    let len = u.int_in_range(0..=max_len)?;
    let mut points: Vec<Point> = Vec::with_capacity(len);
    while points.len() < len {
        let p = match (points.last(), u.int_in_range(0..=3)?) {
            (Some(&last), 0 | 1) => another_point(last, size, u)?,
            (Some(&last), 2) => {
                let center = Point::new(last.x.clamp(-size, size), last.y.clamp(-size, size));
                let radius = float_in_range(1.0, size.max(1.0), u)?;
                cocircular_point(center, radius, u)?
            }
            _ => point(size, u)?,
        };
        points.push(p);
    }
    Ok(points.into_iter().map(Site::at).collect())
}

/// Generate sites whose positions are all distinct.
pub fn distinct_sites(
    max_len: usize,
    size: f64,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Site>, arbitrary::Error> {
    let mut sites = sites(max_len, size, u)?;
    let mut seen = std::collections::HashSet::new();
    // Adding zero folds -0.0 into 0.0, which compares equal to it.
    sites.retain(|s| seen.insert(((s.x() + 0.0).to_bits(), (s.y() + 0.0).to_bits())));
    Ok(sites)
}
