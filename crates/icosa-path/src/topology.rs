//! Dense graph topology built from an externally supplied tile description.

use std::path::Path;

use glam::DVec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::SparseIndex;

/// Errors raised while loading or building a topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// A neighbour id is never declared as a tile.
    #[error("tile {tile} references undeclared neighbour {neighbor}")]
    DanglingNeighbor {
        /// Declaring tile.
        tile: i64,
        /// Missing neighbour.
        neighbor: i64,
    },

    /// The same tile id is declared twice.
    #[error("tile {tile} is declared more than once")]
    DuplicateTile {
        /// Repeated id.
        tile: i64,
    },

    /// The sparse index already held an id the configuration never declares.
    #[error("sparse index holds id {id} with no tile declaration")]
    UndeclaredNode {
        /// Orphan id.
        id: i64,
    },

    /// Failed to read or write a topology file.
    #[error("topology file I/O failed: {0}")]
    Io(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse topology: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// Failed to serialize to RON.
    #[error("failed to serialize topology: {0}")]
    Serialize(#[source] ron::Error),
}

/// One tile of a topology description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopologyTileConfig {
    /// Caller-assigned node id.
    pub external_id: i64,
    /// Ids reachable from this tile.
    pub neighbors: Vec<i64>,
    /// Position used for edge costs and the search heuristic.
    pub center: [f64; 3],
}

/// Ordered list of tile declarations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Tile declarations, one per node.
    pub tiles: Vec<TopologyTileConfig>,
}

impl TopologyConfig {
    /// Read a configuration from a RON file.
    pub fn load(path: &Path) -> Result<Self, TopologyError> {
        let contents = std::fs::read_to_string(path).map_err(TopologyError::Io)?;
        let config: Self = ron::from_str(&contents).map_err(TopologyError::Parse)?;
        tracing::debug!(path = %path.display(), tiles = config.tiles.len(), "loaded topology");
        Ok(config)
    }

    /// Write the configuration as RON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), TopologyError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(TopologyError::Io)?;
        }
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(TopologyError::Serialize)?;
        std::fs::write(path, serialized).map_err(TopologyError::Io)
    }
}

/// Dense graph: node `i` has external id `nodes()[i]`, position `center(i)`,
/// and out-neighbours `neighbors(i)`.
///
/// Adjacency is stored in compressed rows. Declared edges are taken as-is,
/// so an asymmetric description yields a directed graph.
#[derive(Clone, Debug, Default)]
pub struct GraphTopology {
    nodes: Vec<i64>,
    neighbor_offsets: Vec<usize>,
    neighbor_indices: Vec<usize>,
    centers: Vec<DVec3>,
}

impl GraphTopology {
    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// External ids in node order.
    #[must_use]
    pub fn nodes(&self) -> &[i64] {
        &self.nodes
    }

    /// Out-neighbours of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node >= node_count()`.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbor_indices[self.neighbor_offsets[node]..self.neighbor_offsets[node + 1]]
    }

    /// Position of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node >= node_count()`.
    #[must_use]
    pub fn center(&self, node: usize) -> DVec3 {
        self.centers[node]
    }

    /// Total number of directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbor_indices.len()
    }
}

/// Build a dense topology from `config`, assigning node indices through
/// `index`.
///
/// Ids already present in `index` keep their indices; every such id must be
/// declared by `config`. New ids are written to `index` only once the whole
/// configuration has validated, so a failed build leaves `index` unchanged.
///
/// # Errors
///
/// Returns [`TopologyError::DuplicateTile`] for a repeated declaration,
/// [`TopologyError::UndeclaredNode`] for an index entry without a
/// declaration, and [`TopologyError::DanglingNeighbor`] for a neighbour id
/// that is never declared.
pub fn build_topology(
    config: &TopologyConfig,
    index: &mut SparseIndex,
) -> Result<GraphTopology, TopologyError> {
    let known = index.len();
    let mut pending: FxHashMap<i64, usize> = FxHashMap::default();
    let lookup = |pending: &FxHashMap<i64, usize>, id: i64| {
        index.get(id).or_else(|| pending.get(&id).copied())
    };

    let mut declared: Vec<Option<&TopologyTileConfig>> = vec![None; known];
    for tile in &config.tiles {
        let i = match lookup(&pending, tile.external_id) {
            Some(i) => i,
            None => {
                let i = known + pending.len();
                pending.insert(tile.external_id, i);
                declared.push(None);
                i
            }
        };
        if declared[i].is_some() {
            return Err(TopologyError::DuplicateTile {
                tile: tile.external_id,
            });
        }
        declared[i] = Some(tile);
    }

    let mut tiles = Vec::with_capacity(declared.len());
    for (i, slot) in declared.into_iter().enumerate() {
        match slot {
            Some(tile) => tiles.push(tile),
            None => {
                return Err(TopologyError::UndeclaredNode {
                    id: index.id(i).unwrap_or_default(),
                });
            }
        }
    }

    let mut neighbor_offsets = Vec::with_capacity(tiles.len() + 1);
    let mut neighbor_indices = Vec::new();
    let mut centers = Vec::with_capacity(tiles.len());
    neighbor_offsets.push(0);
    for tile in &tiles {
        for &neighbor in &tile.neighbors {
            let n = lookup(&pending, neighbor).ok_or(TopologyError::DanglingNeighbor {
                tile: tile.external_id,
                neighbor,
            })?;
            neighbor_indices.push(n);
        }
        neighbor_offsets.push(neighbor_indices.len());
        centers.push(DVec3::from_array(tile.center));
    }

    // Declaration order is the order `pending` handed out indices.
    for tile in &config.tiles {
        index.get_or_insert(tile.external_id);
    }

    tracing::debug!(
        nodes = tiles.len(),
        added = pending.len(),
        edges = neighbor_indices.len(),
        "built graph topology"
    );

    Ok(GraphTopology {
        nodes: index.ids().to_vec(),
        neighbor_offsets,
        neighbor_indices,
        centers,
    })
}
