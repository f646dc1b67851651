//! Edge adjacency between tiles of one depth, across face boundaries.
//!
//! A tile corner is identified by its integer barycentric weights over the
//! icosahedron's shared vertex ids, so the same corner reached from two faces
//! produces the same key with no floating-point comparison. Two tiles are
//! neighbours iff they share two corner keys.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{DepthTiles, IcosahedronGeometry, TileAddress};

/// Exact identity of a lattice point on the icosahedron surface.
///
/// Holds `(vertex id, weight)` pairs sorted by vertex id; unused slots are
/// `(u8::MAX, 0)`. Weights sum to the depth's grid size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey([(u8, u32); 3]);

impl VertexKey {
    fn new(ids: [u8; 3], weights: [u32; 3]) -> Self {
        let mut slots = [(u8::MAX, 0); 3];
        for (slot, (id, w)) in slots.iter_mut().zip(ids.into_iter().zip(weights)) {
            if w > 0 {
                *slot = (id, w);
            }
        }
        slots.sort_unstable();
        Self(slots)
    }
}

/// Corner keys of `tile`, ordered as local `(0,0)`, `(1,0)`, `(0,1)`.
#[must_use]
pub fn corner_keys(geometry: &IcosahedronGeometry, tile: &TileAddress) -> [VertexKey; 3] {
    let n = TileAddress::grid_size(tile.depth());
    let ids = geometry.vertex_ids(tile.ico_face());
    tile.corner_lattice()
        .map(|(p, q)| VertexKey::new(ids, [n - p - q, p, q]))
}

/// Errors raised while building adjacency.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AdjacencyError {
    /// An edge is not shared by exactly two tiles.
    #[error("edge of tile {tile} is shared by {count} tiles")]
    NonManifoldEdge {
        /// A tile on the offending edge.
        tile: TileAddress,
        /// Number of tiles found on the edge.
        count: usize,
    },
}

/// The three edge neighbours of every tile at one depth.
#[derive(Clone, Debug)]
pub struct TileAdjacency {
    depth: u8,
    neighbors: FxHashMap<TileAddress, [TileAddress; 3]>,
}

impl TileAdjacency {
    /// Build adjacency for all tiles of `tiles`.
    ///
    /// Neighbour `k` shares the edge from corner `k` to corner `k + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`AdjacencyError::NonManifoldEdge`] if the tiles do not form a
    /// closed surface (an edge with one tile, or more than two).
    pub fn from_tiles(
        geometry: &IcosahedronGeometry,
        tiles: &DepthTiles,
    ) -> Result<Self, AdjacencyError> {
        let mut edges: FxHashMap<(VertexKey, VertexKey), Vec<TileAddress>> = FxHashMap::default();
        let mut tile_edges = Vec::with_capacity(tiles.len());

        for entry in tiles.iter() {
            let keys = corner_keys(geometry, &entry.address);
            let mut own = [(keys[0], keys[0]); 3];
            for k in 0..3 {
                let (p, q) = (keys[k], keys[(k + 1) % 3]);
                let edge = (p.min(q), p.max(q));
                edges.entry(edge).or_default().push(entry.address);
                own[k] = edge;
            }
            tile_edges.push((entry.address, own));
        }

        let mut neighbors = FxHashMap::default();
        neighbors.reserve(tile_edges.len());
        for (address, own) in tile_edges {
            let mut found = [address; 3];
            for (slot, edge) in found.iter_mut().zip(&own) {
                let sharing = &edges[edge];
                if sharing.len() != 2 {
                    return Err(AdjacencyError::NonManifoldEdge {
                        tile: address,
                        count: sharing.len(),
                    });
                }
                *slot = if sharing[0] == address {
                    sharing[1]
                } else {
                    sharing[0]
                };
            }
            neighbors.insert(address, found);
        }

        tracing::debug!(depth = tiles.depth(), edges = edges.len(), "built tile adjacency");
        Ok(Self {
            depth: tiles.depth(),
            neighbors,
        })
    }

    /// Depth the adjacency was built for.
    #[must_use]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The three edge neighbours of `tile`, or `None` if it is not part of
    /// this depth.
    #[must_use]
    pub fn neighbors(&self, tile: &TileAddress) -> Option<&[TileAddress; 3]> {
        self.neighbors.get(tile)
    }

    /// Number of tiles covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns true if no tiles are covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}
