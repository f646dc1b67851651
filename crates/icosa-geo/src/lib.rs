//! Geodesic icosphere geometry: tile addressing, barycentric mapping, and the
//! per-depth tile registry.

mod adjacency;
mod bary;
mod ico_face;
mod projection;
mod tile_address;
mod tile_registry;

pub use adjacency::{AdjacencyError, TileAdjacency, VertexKey, corner_keys};
pub use bary::{
    BARY_EPSILON, Bary, BaryError, MIN_RESOLUTION, TileVertexBarys, bary_local_to_global,
    tile_vertex_barys, tile_vertex_count,
};
pub use ico_face::{FACE_COUNT, IcoFace, IcosahedronGeometry, VERTEX_COUNT};
pub use projection::{bary_to_world_direction, tile_corner_directions, tile_sample_direction};
pub use tile_address::{TileAddress, TileOrientation};
pub use tile_registry::{
    DEFAULT_MAX_TILES, DepthTiles, RegistryEntry, RegistryError, RegistrySettings, TileRegistry,
};
