//! Face-global barycentric to world-space projection.
//!
//! Interpolating the three corner directions is planar; renormalizing pushes
//! the point back onto the unit sphere, which makes the subdivision geodesic
//! rather than a flat facet grid.

use glam::DVec3;

use crate::{Bary, BaryError, IcoFace, IcosahedronGeometry, TileAddress};

/// Project a face-global barycentric onto the unit sphere.
///
/// # Errors
///
/// Returns [`BaryError::OutOfRange`] if `global` lies outside the unit
/// triangle, under the same rule as [`Bary::new`].
#[inline]
pub fn bary_to_world_direction(
    geometry: &IcosahedronGeometry,
    face: IcoFace,
    global: Bary,
) -> Result<DVec3, BaryError> {
    let global = Bary::new(global.u, global.v)?;
    Ok(project(geometry, face, global))
}

#[inline]
fn project(geometry: &IcosahedronGeometry, face: IcoFace, global: Bary) -> DVec3 {
    let [a, b, c] = geometry.corners(face);
    (a * global.w() + b * global.u + c * global.v).normalize()
}

/// Unit directions of a tile's three corners, ordered as local `(0,0)`,
/// `(1,0)`, `(0,1)`.
#[must_use]
pub fn tile_corner_directions(geometry: &IcosahedronGeometry, tile: &TileAddress) -> [DVec3; 3] {
    let n = f64::from(TileAddress::grid_size(tile.depth()));
    let face = tile.ico_face();
    tile.corner_lattice().map(|(u, v)| {
        let global = Bary::new_unchecked(f64::from(u) / n, f64::from(v) / n);
        project(geometry, face, global)
    })
}

/// Map a tile-local sample straight to a unit direction.
///
/// # Errors
///
/// Propagates the [`BaryError`] of [`TileAddress::local_to_global`].
pub fn tile_sample_direction(
    geometry: &IcosahedronGeometry,
    tile: &TileAddress,
    local: Bary,
    resolution: u32,
) -> Result<DVec3, BaryError> {
    let global = tile.local_to_global(local, resolution)?;
    Ok(project(geometry, tile.ico_face(), global))
}
