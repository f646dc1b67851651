//! Barycentric coordinates and the local-to-global tile mapping.
//!
//! A [`Bary`] is `(u, v)` with implied `w = 1 - u - v`. It is either local to a
//! tile (spanning one tile) or global to a face (spanning the whole icosahedron
//! face). Out-of-range input is always rejected with [`BaryError`]; nothing in
//! this module clamps.

use thiserror::Error;

use crate::TileAddress;

/// Slack allowed on the `u + v <= 1` bound so lattice samples such as
/// `1/3 + 2/3` survive rounding.
pub const BARY_EPSILON: f64 = 1e-9;

/// Smallest mesh resolution (vertices per tile edge).
pub const MIN_RESOLUTION: u32 = 2;

/// Errors raised by the barycentric mapping functions.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BaryError {
    /// A component is negative, non-finite, or `u + v > 1`.
    #[error("barycentric ({u}, {v}) is outside the unit triangle")]
    OutOfRange {
        /// Offending `u`.
        u: f64,
        /// Offending `v`.
        v: f64,
    },
    /// Fewer than [`MIN_RESOLUTION`] vertices per edge.
    #[error("resolution {0} is below the minimum of 2")]
    Resolution(u32),
    /// `(x, y, depth)` does not name a tile.
    #[error("({x}, {y}) is not a tile at depth {depth}")]
    InvalidTile {
        /// Grid x.
        x: u32,
        /// Grid y.
        y: u32,
        /// Subdivision depth.
        depth: u8,
    },
}

/// A barycentric coordinate inside the unit triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bary {
    /// Weight of corner `b`.
    pub u: f64,
    /// Weight of corner `c`.
    pub v: f64,
}

impl Bary {
    /// Construct a `Bary`, rejecting coordinates outside the unit triangle.
    ///
    /// # Errors
    ///
    /// Returns [`BaryError::OutOfRange`] if `u` or `v` is negative or
    /// non-finite, or if `u + v` exceeds 1 by more than [`BARY_EPSILON`].
    pub fn new(u: f64, v: f64) -> Result<Self, BaryError> {
        let in_range = u.is_finite()
            && v.is_finite()
            && u >= 0.0
            && v >= 0.0
            && u + v <= 1.0 + BARY_EPSILON;
        if in_range {
            Ok(Self { u, v })
        } else {
            Err(BaryError::OutOfRange { u, v })
        }
    }

    /// Construct without checking. Caller guarantees the point is inside the
    /// unit triangle.
    #[must_use]
    pub fn new_unchecked(u: f64, v: f64) -> Self {
        debug_assert!(
            u >= -BARY_EPSILON && v >= -BARY_EPSILON,
            "negative barycentric: ({u}, {v})"
        );
        debug_assert!(u + v <= 1.0 + BARY_EPSILON, "u + v > 1: ({u}, {v})");
        Self { u, v }
    }

    /// Weight of corner `a`.
    #[must_use]
    pub fn w(&self) -> f64 {
        1.0 - self.u - self.v
    }
}

/// Number of samples [`tile_vertex_barys`] yields at `resolution`.
#[must_use]
pub fn tile_vertex_count(resolution: u32) -> usize {
    if resolution < MIN_RESOLUTION {
        return 0;
    }
    let r = resolution as usize;
    r * (r + 1) / 2
}

/// Enumerate the local sample grid of a tile meshed with `resolution`
/// vertices per edge.
///
/// Order: rows of increasing `v` (`j = 0..=s`), and within a row increasing
/// `u` (`i = 0..=s-j`), where `s = resolution - 1`. The order never changes;
/// mesh consumers index into it. Yields nothing below [`MIN_RESOLUTION`].
#[must_use]
pub fn tile_vertex_barys(resolution: u32) -> TileVertexBarys {
    TileVertexBarys {
        steps: resolution.saturating_sub(1),
        i: 0,
        j: 0,
        remaining: tile_vertex_count(resolution),
    }
}

/// Iterator returned by [`tile_vertex_barys`].
#[derive(Clone, Debug)]
pub struct TileVertexBarys {
    steps: u32,
    i: u32,
    j: u32,
    remaining: usize,
}

impl Iterator for TileVertexBarys {
    type Item = Bary;

    fn next(&mut self) -> Option<Bary> {
        if self.remaining == 0 {
            return None;
        }
        let s = f64::from(self.steps);
        let sample = Bary::new_unchecked(f64::from(self.i) / s, f64::from(self.j) / s);
        self.remaining -= 1;
        if self.i + self.j >= self.steps {
            self.i = 0;
            self.j += 1;
        } else {
            self.i += 1;
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for TileVertexBarys {}

/// Map a tile-local barycentric sample into its face's global barycentric
/// space.
///
/// The tile is given by explicit `(depth, x, y)`; `resolution` is the mesh
/// resolution the sample belongs to. The arithmetic is carried out in the
/// tile's lattice units (`resolution - 1` steps per tile edge) so that two
/// tiles sharing an edge produce the same global value for the same lattice
/// point, whichever side computes it.
///
/// # Errors
///
/// Returns [`BaryError::Resolution`] below [`MIN_RESOLUTION`],
/// [`BaryError::InvalidTile`] if `(x, y)` is not a tile at `depth`, and
/// [`BaryError::OutOfRange`] if `local` lies outside the unit triangle.
pub fn bary_local_to_global(
    resolution: u32,
    depth: u8,
    x: u32,
    y: u32,
    local: Bary,
) -> Result<Bary, BaryError> {
    if resolution < MIN_RESOLUTION {
        return Err(BaryError::Resolution(resolution));
    }
    // Face index does not affect the lattice frame.
    let tile =
        TileAddress::try_new(0, x, y, depth).ok_or(BaryError::InvalidTile { x, y, depth })?;
    let local = Bary::new(local.u, local.v)?;
    let ((ox, oy), sign) = tile.lattice_frame();
    let steps = f64::from(resolution - 1);
    let sign = f64::from(sign);
    let denom = f64::from(TileAddress::grid_size(depth)) * steps;

    let gu = (f64::from(ox) * steps + sign * (local.u * steps)) / denom;
    let gv = (f64::from(oy) * steps + sign * (local.v * steps)) / denom;
    Ok(Bary::new_unchecked(gu, gv))
}

impl TileAddress {
    /// Convenience wrapper over [`bary_local_to_global`] for this tile.
    ///
    /// # Errors
    ///
    /// See [`bary_local_to_global`].
    pub fn local_to_global(&self, local: Bary, resolution: u32) -> Result<Bary, BaryError> {
        bary_local_to_global(resolution, self.depth(), self.x(), self.y(), local)
    }
}
