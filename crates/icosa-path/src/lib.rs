//! Sparse graph topology and A* pathfinding over tile graphs.

mod path_buffer;
mod pathfinder;
mod sparse_index;
mod tile_graph;
mod topology;

pub use path_buffer::PathBuffer;
pub use pathfinder::Pathfinder;
pub use sparse_index::SparseIndex;
pub use tile_graph::tile_topology_config;
pub use topology::{
    GraphTopology, TopologyConfig, TopologyError, TopologyTileConfig, build_topology,
};
