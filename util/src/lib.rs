//! Reading sites from text, and writing diagrams back out.
//!
//! Both formats are whitespace-separated. A site file is a flat list of
//! numbers read in `x y` pairs. A diagram file starts with the number of
//! sites and their coordinates, one site per line, and then describes each
//! cell in turn: the number of points on its boundary (negated if the cell
//! is open) followed by the points, one per line.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use voronoi_sweep::{Diagram, Site};

/// Failures while reading sites.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The input couldn't be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The numbers don't pair up into coordinates.
    #[error("expected pairs of coordinates, but found {count} numbers")]
    OddEntryCount {
        /// How many numbers there were.
        count: usize,
    },
    /// Something in the input isn't a number.
    #[error("entry {index} ({token:?}) is not a number")]
    InvalidEntry {
        /// The position of the bad entry, counting from zero.
        index: usize,
        /// The bad entry.
        token: String,
    },
}

/// Failures while writing a diagram.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The output couldn't be written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A cell boundary couldn't be walked.
    #[error(transparent)]
    Diagram(#[from] voronoi_sweep::Error),
}

/// Reads sites from whitespace-separated `x y` pairs.
pub fn read_sites(mut input: impl Read) -> Result<Vec<Site>, ReadError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    let numbers = text
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|_| ReadError::InvalidEntry {
                index,
                token: token.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if numbers.len() % 2 != 0 {
        return Err(ReadError::OddEntryCount {
            count: numbers.len(),
        });
    }
    Ok(numbers
        .chunks_exact(2)
        .map(|xy| Site::new(xy[0], xy[1]))
        .collect())
}

/// Reads sites from the file at `path`.
pub fn read_sites_from_path(path: impl AsRef<Path>) -> Result<Vec<Site>, ReadError> {
    read_sites(File::open(path)?)
}

/// Writes out the sites of `diagram` and the boundary of each of their cells.
pub fn write_diagram(mut out: impl Write, diagram: &Diagram) -> Result<(), WriteError> {
    let sites = diagram.sites();
    writeln!(out, "{}", sites.len())?;
    for site in sites {
        writeln!(out, "{} {}", site.x(), site.y())?;
    }
    for idx in 0..sites.len() {
        let cell = diagram.cell(idx)?;
        writeln!(out, "{}", cell.signed_len())?;
        for p in cell.vertices() {
            writeln!(out, "{} {}", p.x, p.y)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Writes `diagram` to the file at `path`, creating any missing directories
/// along the way.
pub fn write_diagram_to_path(path: impl AsRef<Path>, diagram: &Diagram) -> Result<(), WriteError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_diagram(BufWriter::new(File::create(path)?), diagram)
}

/// Checks the things any correct diagram satisfies, describing the first
/// one that fails.
///
/// Every cell boundary must be walkable. Once optimized, no two edges may
/// separate the same pair of sites, and every finite vertex must be
/// equidistant from the sites on either side of its edges with no site any
/// closer. Finally, the pairs of sites with an edge between them are
/// compared against a brute-force search for neighbors, so a missing edge is
/// caught too. Distances are compared with a tolerance relative to the size
/// of the input.
pub fn check_diagram(diagram: &Diagram) -> Result<(), String> {
    let sites = diagram.sites();
    for idx in 0..sites.len() {
        diagram
            .cell(idx)
            .map_err(|e| format!("cell of site {idx}: {e}"))?;
    }

    let mut optimized = diagram.clone();
    optimized.optimize();
    let edges = optimized.full_edges().map_err(|e| e.to_string())?;

    let scale = sites
        .iter()
        .map(|s| s.x().abs().max(s.y().abs()))
        .fold(1.0, f64::max);
    let tolerance = 1e-6 * scale;

    let mut pairs = std::collections::HashSet::new();
    for e in edges {
        if e.left.same_identity(&e.right) {
            return Err(format!("edge {e:?} separates a site from itself"));
        }
        let pair = (e.left.id().min(e.right.id()), e.left.id().max(e.right.id()));
        if !pairs.insert(pair) {
            return Err(format!("more than one edge between {:?} and {:?}", pair.0, pair.1));
        }

        for v in e.vertices() {
            let r = e.left.distance(v);
            if (r - e.right.distance(v)).abs() > tolerance {
                return Err(format!("vertex {v:?} of {e:?} is off the bisector"));
            }
            if let Some(closer) = sites.iter().find(|s| s.distance(v) < r - tolerance) {
                return Err(format!("{closer:?} is inside the circle around {v:?}"));
            }
        }
    }

    for (i, s) in sites.iter().enumerate() {
        for t in &sites[i + 1..] {
            let span = shared_boundary(s, t, sites);
            let pair = (s.id().min(t.id()), s.id().max(t.id()));
            let found = pairs.contains(&pair);
            if span > tolerance && !found {
                return Err(format!("no edge between neighbors {s:?} and {t:?}"));
            }
            if span < -tolerance && found {
                return Err(format!("edge between {s:?} and {t:?}, which aren't neighbors"));
            }
        }
    }
    Ok(())
}

/// The length of the stretch of the bisector of `s` and `t` where no other
/// site is closer than they are.
///
/// This is infinite for an unbounded edge and negative when the two cells
/// don't touch at all.
fn shared_boundary(s: &Site, t: &Site, sites: &[Site]) -> f64 {
    // Work relative to `s`, along the bisector `mid + lambda * dir`.
    let (vx, vy) = (t.x() - s.x(), t.y() - s.y());
    let len = vx.hypot(vy);
    if len == 0.0 {
        return f64::NEG_INFINITY;
    }
    let (mx, my) = (vx / 2.0, vy / 2.0);
    let (dx, dy) = (-vy / len, vx / len);

    let (mut lo, mut hi) = (f64::NEG_INFINITY, f64::INFINITY);
    for u in sites {
        if u.same_identity(s) || u.same_identity(t) {
            continue;
        }
        // Closer to `s` than to `u` means `2 p.w <= |w|^2`.
        let (wx, wy) = (u.x() - s.x(), u.y() - s.y());
        let a = 2.0 * (dx * wx + dy * wy);
        let b = wx * wx + wy * wy - 2.0 * (mx * wx + my * wy);
        if a > 0.0 {
            hi = hi.min(b / a);
        } else if a < 0.0 {
            lo = lo.max(b / a);
        } else if b < 0.0 {
            // `u` sits on the line through `s` and `t`, between them.
            return b / (2.0 * wx.hypot(wy));
        }
    }
    hi - lo
}
