//! Unique tile identifier on the geodesic sphere.

use crate::ico_face::FACE_COUNT;
use crate::{Bary, IcoFace};

/// Whether a tile is an upright or an inverted triangle of its face lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileOrientation {
    /// Corners `(i, j)`, `(i+1, j)`, `(i, j+1)` in face lattice units.
    Upright,
    /// Corners `(i+1, j+1)`, `(i, j+1)`, `(i+1, j)` in face lattice units.
    Inverted,
}

/// Uniquely identifies a subdivision cell on the geodesic sphere.
///
/// - `face`: which of the 20 icosahedron faces the tile lies on.
/// - `x`, `y`: cell coordinates in the face's `grid_size(depth)` square grid.
/// - `depth`: subdivision level; each face holds `4^depth` tiles.
///
/// The square grid over-covers the triangular face. A cell whose centre
/// `((x+0.5)/n, (y+0.5)/n)` satisfies `u + v <= 1` names the upright
/// triangle of that cell. The remaining cells are the mirrored half of the
/// grid: they are folded by point reflection through the square's centre
/// onto the inverted triangle of cell `(n-1-x, n-1-y)`. Every in-range
/// `(x, y)` therefore names exactly one triangle of the face.
///
/// Fields are only reachable through [`Self::new`], [`Self::try_new`] and
/// [`Self::from_packed_id`], so every `TileAddress` value is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileAddress {
    face: u8,
    x: u32,
    y: u32,
    depth: u8,
}

impl TileAddress {
    /// Deepest supported subdivision level.
    pub const MAX_DEPTH: u8 = 15;

    /// Number of cells along one axis of a face grid at `depth`.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds [`Self::MAX_DEPTH`].
    #[must_use]
    pub fn grid_size(depth: u8) -> u32 {
        assert!(
            depth <= Self::MAX_DEPTH,
            "depth {depth} exceeds MAX_DEPTH {}",
            Self::MAX_DEPTH
        );
        1 << depth
    }

    /// Whether `(x, y)` names a tile at `depth`.
    #[must_use]
    pub fn is_valid(x: u32, y: u32, depth: u8) -> bool {
        if depth > Self::MAX_DEPTH {
            return false;
        }
        let n = 1u32 << depth;
        x < n && y < n
    }

    /// Count the valid addresses at `depth` by enumerating every face grid.
    #[must_use]
    pub fn valid_count(depth: u8) -> usize {
        if depth > Self::MAX_DEPTH {
            return 0;
        }
        let n = Self::grid_size(depth);
        let per_face = (0..n)
            .flat_map(|y| (0..n).map(move |x| (x, y)))
            .filter(|&(x, y)| Self::is_valid(x, y, depth))
            .count();
        per_face * FACE_COUNT
    }

    /// Closed-form tile count at `depth`: `20 * 4^depth`.
    #[must_use]
    pub fn expected_count(depth: u8) -> usize {
        FACE_COUNT << (2 * depth as usize)
    }

    /// Construct a `TileAddress`, validating face, depth and grid bounds.
    ///
    /// # Panics
    ///
    /// Panics if the address is not valid.
    #[must_use]
    pub fn new(face: u8, x: u32, y: u32, depth: u8) -> Self {
        assert!(
            (face as usize) < FACE_COUNT,
            "face {face} out of range (max {})",
            FACE_COUNT - 1
        );
        assert!(
            Self::is_valid(x, y, depth),
            "({x}, {y}) out of range for depth {depth}"
        );
        Self { face, x, y, depth }
    }

    /// Construct a `TileAddress`, returning `None` if it is not valid.
    #[must_use]
    pub fn try_new(face: u8, x: u32, y: u32, depth: u8) -> Option<Self> {
        ((face as usize) < FACE_COUNT && Self::is_valid(x, y, depth))
            .then_some(Self { face, x, y, depth })
    }

    /// Icosahedron face index in `0..20`.
    #[must_use]
    pub fn face(&self) -> u8 {
        self.face
    }

    /// Horizontal grid coordinate within the face.
    #[must_use]
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Vertical grid coordinate within the face.
    #[must_use]
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Subdivision level (0 = one tile per face).
    #[must_use]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The face this tile lies on.
    #[must_use]
    pub fn ico_face(&self) -> IcoFace {
        IcoFace::ALL[self.face as usize]
    }

    /// Cell-centre test `u + v <= 1`, evaluated exactly in lattice units.
    #[must_use]
    pub fn orientation(&self) -> TileOrientation {
        let n = u64::from(Self::grid_size(self.depth));
        if u64::from(self.x) + u64::from(self.y) < n {
            TileOrientation::Upright
        } else {
            TileOrientation::Inverted
        }
    }

    /// Lattice origin of local barycentric `(0, 0)` and the direction local
    /// axes run in (`+1` upright, `-1` inverted).
    #[must_use]
    pub fn lattice_frame(&self) -> ((u32, u32), i8) {
        let n = Self::grid_size(self.depth);
        match self.orientation() {
            TileOrientation::Upright => ((self.x, self.y), 1),
            TileOrientation::Inverted => ((n - self.x, n - self.y), -1),
        }
    }

    /// The three corners in face lattice units (denominator `grid_size`),
    /// ordered as local `(0,0)`, `(1,0)`, `(0,1)`.
    #[must_use]
    pub fn corner_lattice(&self) -> [(u32, u32); 3] {
        let ((ox, oy), sign) = self.lattice_frame();
        if sign > 0 {
            [(ox, oy), (ox + 1, oy), (ox, oy + 1)]
        } else {
            [(ox, oy), (ox - 1, oy), (ox, oy - 1)]
        }
    }

    /// Global barycentric coordinate of the tile's centroid.
    #[must_use]
    pub fn center_bary(&self) -> Bary {
        let n = f64::from(Self::grid_size(self.depth));
        let corners = self.corner_lattice();
        let (su, sv) = corners
            .iter()
            .fold((0.0, 0.0), |(su, sv), &(u, v)| (su + f64::from(u), sv + f64::from(v)));
        Bary::new_unchecked(su / (3.0 * n), sv / (3.0 * n))
    }

    /// Lattice cell `(i, j)` and orientation in the triangle tiling.
    fn triangle_cell(&self) -> (u32, u32, TileOrientation) {
        let n = Self::grid_size(self.depth);
        match self.orientation() {
            TileOrientation::Upright => (self.x, self.y, TileOrientation::Upright),
            TileOrientation::Inverted => {
                (n - 1 - self.x, n - 1 - self.y, TileOrientation::Inverted)
            }
        }
    }

    fn from_triangle_cell(
        face: u8,
        depth: u8,
        i: u32,
        j: u32,
        orientation: TileOrientation,
    ) -> Self {
        let n = Self::grid_size(depth);
        match orientation {
            TileOrientation::Upright => Self { face, x: i, y: j, depth },
            TileOrientation::Inverted => Self {
                face,
                x: n - 1 - i,
                y: n - 1 - j,
                depth,
            },
        }
    }

    /// The tile at `depth - 1` that contains this one.
    ///
    /// Returns `None` at depth 0.
    #[must_use]
    pub fn parent(&self) -> Option<TileAddress> {
        if self.depth == 0 {
            return None;
        }
        let (i, j, orientation) = self.triangle_cell();
        let both_odd = i % 2 == 1 && j % 2 == 1;
        let both_even = i % 2 == 0 && j % 2 == 0;
        let parent_orientation = match orientation {
            TileOrientation::Upright if both_odd => TileOrientation::Inverted,
            TileOrientation::Upright => TileOrientation::Upright,
            TileOrientation::Inverted if both_even => TileOrientation::Upright,
            TileOrientation::Inverted => TileOrientation::Inverted,
        };
        Some(Self::from_triangle_cell(
            self.face,
            self.depth - 1,
            i / 2,
            j / 2,
            parent_orientation,
        ))
    }

    /// The four tiles at `depth + 1` that subdivide this one.
    ///
    /// Returns `None` at [`Self::MAX_DEPTH`].
    #[must_use]
    pub fn children(&self) -> Option<[TileAddress; 4]> {
        if self.depth >= Self::MAX_DEPTH {
            return None;
        }
        let (i, j, orientation) = self.triangle_cell();
        let (ci, cj) = (i * 2, j * 2);
        let d = self.depth + 1;
        let f = self.face;
        use TileOrientation::{Inverted, Upright};
        Some(match orientation {
            Upright => [
                Self::from_triangle_cell(f, d, ci, cj, Upright),
                Self::from_triangle_cell(f, d, ci + 1, cj, Upright),
                Self::from_triangle_cell(f, d, ci, cj + 1, Upright),
                Self::from_triangle_cell(f, d, ci, cj, Inverted),
            ],
            Inverted => [
                Self::from_triangle_cell(f, d, ci + 1, cj, Inverted),
                Self::from_triangle_cell(f, d, ci, cj + 1, Inverted),
                Self::from_triangle_cell(f, d, ci + 1, cj + 1, Inverted),
                Self::from_triangle_cell(f, d, ci + 1, cj + 1, Upright),
            ],
        })
    }

    /// Pack the address into a single integer id, usable as an external
    /// graph identifier.
    #[must_use]
    pub fn packed_id(&self) -> i64 {
        (i64::from(self.face) << 36)
            | (i64::from(self.depth) << 32)
            | (i64::from(self.y) << 16)
            | i64::from(self.x)
    }

    /// Inverse of [`Self::packed_id`]. Returns `None` for ids that do not
    /// decode to a valid address.
    #[must_use]
    pub fn from_packed_id(id: i64) -> Option<Self> {
        if id < 0 || id >> 41 != 0 {
            return None;
        }
        let face = ((id >> 36) & 0x1f) as u8;
        let depth = ((id >> 32) & 0xf) as u8;
        let y = ((id >> 16) & 0xffff) as u32;
        let x = (id & 0xffff) as u32;
        Self::try_new(face, x, y, depth)
    }
}

impl std::fmt::Display for TileAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(face={}, x={}, y={}, depth={})",
            self.face, self.x, self.y, self.depth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_valid_count_matches_closed_form() {
        for depth in 0..=6 {
            assert_eq!(
                TileAddress::valid_count(depth),
                20 * 4usize.pow(u32::from(depth)),
                "depth {depth}"
            );
            assert_eq!(
                TileAddress::valid_count(depth),
                TileAddress::expected_count(depth)
            );
        }
    }

    #[test]
    fn test_depth_zero_has_single_cell() {
        assert!(TileAddress::is_valid(0, 0, 0));
        assert!(!TileAddress::is_valid(1, 0, 0));
        assert!(!TileAddress::is_valid(0, 1, 0));
        assert_eq!(TileAddress::valid_count(0), 20);
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert!(!TileAddress::is_valid(4, 0, 2));
        assert!(!TileAddress::is_valid(0, 0, TileAddress::MAX_DEPTH + 1));
        assert!(TileAddress::try_new(20, 0, 0, 0).is_none());
        assert!(TileAddress::try_new(3, 2, 2, 1).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_invalid_coordinates_panic() {
        let _ = TileAddress::new(0, 8, 0, 3);
    }

    #[test]
    fn test_orientation_follows_cell_centre() {
        // depth 1: cells (0,0), (1,0), (0,1) pass u+v <= 1, (1,1) is mirrored.
        assert_eq!(TileAddress::new(0, 0, 0, 1).orientation(), TileOrientation::Upright);
        assert_eq!(TileAddress::new(0, 1, 0, 1).orientation(), TileOrientation::Upright);
        assert_eq!(TileAddress::new(0, 0, 1, 1).orientation(), TileOrientation::Upright);
        assert_eq!(TileAddress::new(0, 1, 1, 1).orientation(), TileOrientation::Inverted);
    }

    #[test]
    fn test_tiles_partition_the_face() {
        // Twice the summed lattice areas of all tiles on a face equals n^2.
        for depth in 0..=4 {
            let n = TileAddress::grid_size(depth);
            let mut corners = HashSet::new();
            for y in 0..n {
                for x in 0..n {
                    let t = TileAddress::new(0, x, y, depth);
                    let c = t.corner_lattice();
                    for &(u, v) in &c {
                        assert!(u + v <= n, "corner outside face: {t}");
                    }
                    let mut key = c;
                    key.sort_unstable();
                    assert!(corners.insert(key), "duplicate triangle {t}");
                }
            }
            assert_eq!(corners.len(), (n * n) as usize);
        }
    }

    #[test]
    fn test_parent_of_children_is_self() {
        for depth in 0..=3 {
            let n = TileAddress::grid_size(depth);
            for y in 0..n {
                for x in 0..n {
                    let tile = TileAddress::new(7, x, y, depth);
                    let children = tile.children().expect("should have children");
                    let unique: HashSet<_> = children.iter().collect();
                    assert_eq!(unique.len(), 4);
                    for child in &children {
                        assert_eq!(child.depth(), depth + 1);
                        assert_eq!(child.parent(), Some(tile), "child {child} of {tile}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_children_cover_next_depth() {
        let depth = 2;
        let n = TileAddress::grid_size(depth);
        let mut all = HashSet::new();
        for y in 0..n {
            for x in 0..n {
                all.extend(TileAddress::new(0, x, y, depth).children().unwrap());
            }
        }
        assert_eq!(all.len(), 4 * (n * n) as usize);
    }

    #[test]
    fn test_out_of_range_cells_cannot_be_built() {
        // (9, 0) at depth 1 and face 25 would underflow the lattice frame and
        // index past the face table.
        assert!(TileAddress::try_new(0, 9, 0, 1).is_none());
        assert!(TileAddress::try_new(25, 0, 0, 0).is_none());
        assert!(TileAddress::from_packed_id((1 << 32) | 9).is_none());
        assert!(TileAddress::from_packed_id(25 << 36).is_none());
    }

    #[test]
    fn test_navigation_total_on_every_address() {
        for depth in 0..=3 {
            let n = TileAddress::grid_size(depth);
            for face in [0, 19] {
                for y in 0..n {
                    for x in 0..n {
                        let tile = TileAddress::try_new(face, x, y, depth).unwrap();
                        let corners = tile.corner_lattice();
                        assert!(corners.iter().all(|&(u, v)| u + v <= n), "{tile}");
                        assert_eq!(tile.ico_face().index(), face);
                        if let Some(parent) = tile.parent() {
                            assert_eq!(parent.depth(), depth - 1);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_depth_zero_has_no_parent() {
        assert!(TileAddress::new(5, 0, 0, 0).parent().is_none());
    }

    #[test]
    fn test_max_depth_has_no_children() {
        let addr = TileAddress::new(0, 0, 0, TileAddress::MAX_DEPTH);
        assert!(addr.children().is_none());
    }

    #[test]
    fn test_packed_id_roundtrip() {
        let addr = TileAddress::new(19, 1234, 4321, 13);
        assert_eq!(TileAddress::from_packed_id(addr.packed_id()), Some(addr));
        assert!(TileAddress::from_packed_id(-1).is_none());
        // face 0, depth 1, x = 2 is out of range
        assert!(TileAddress::from_packed_id((1 << 32) | 2).is_none());
    }

    #[test]
    fn test_center_bary_inside_face() {
        let tile = TileAddress::new(2, 3, 3, 2);
        let c = tile.center_bary();
        assert!(c.u > 0.0 && c.v > 0.0 && c.w() > 0.0);
    }

    #[test]
    fn test_display() {
        let s = format!("{}", TileAddress::new(4, 1, 2, 3));
        assert!(s.contains("face=4"));
        assert!(s.contains("depth=3"));
    }
}
