//! Depth selection, horizon culling, and tile visibility management.

mod horizon_culling;
mod selector;
mod visibility;

pub use horizon_culling::HorizonCuller;
pub use selector::{DepthSelector, DepthThresholds};
pub use visibility::{TileHost, TileVisibilityManager, VisibilityChange, VisibilitySettings};
