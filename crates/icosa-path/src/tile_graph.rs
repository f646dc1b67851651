//! Topology descriptions derived from the tile registry.

use icosa_geo::{DepthTiles, TileAdjacency};

use crate::{TopologyConfig, TopologyTileConfig};

/// Describe every tile of `tiles` as a graph node keyed by its packed id,
/// centred on the tile centroid, with its three edge neighbours.
///
/// Tiles missing from `adjacency` are emitted with no neighbours.
#[must_use]
pub fn tile_topology_config(tiles: &DepthTiles, adjacency: &TileAdjacency) -> TopologyConfig {
    let tiles = tiles
        .iter()
        .map(|entry| TopologyTileConfig {
            external_id: entry.address.packed_id(),
            neighbors: adjacency
                .neighbors(&entry.address)
                .map(|ns| ns.iter().map(|n| n.packed_id()).collect())
                .unwrap_or_default(),
            center: entry.centroid().to_array(),
        })
        .collect();
    TopologyConfig { tiles }
}
