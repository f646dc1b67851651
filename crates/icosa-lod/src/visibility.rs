//! Tile visibility manager: keeps the set of spawned tiles in step with the
//! active depth and the camera horizon.

use std::sync::Arc;

use icosa_geo::{
    DepthTiles, MIN_RESOLUTION, RegistryEntry, RegistryError, TileAddress, TileRegistry,
};
use rustc_hash::FxHashMap;

use crate::HorizonCuller;

/// Receiver of spawned tiles, typically a scene graph or renderer.
///
/// The manager hands `root` to every spawn call but never creates or
/// destroys it.
pub trait TileHost {
    /// Parent under which tiles are attached.
    type Root;
    /// Opaque reference to one spawned tile.
    type Handle: Clone;

    /// Attach a tile built at `resolution` samples per edge.
    fn spawn(&mut self, root: &Self::Root, entry: &RegistryEntry, resolution: u32) -> Self::Handle;

    /// Release a tile previously returned by [`TileHost::spawn`].
    fn despawn(&mut self, handle: Self::Handle);
}

/// Tunables for [`TileVisibilityManager`].
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilitySettings {
    /// Samples per tile edge when a spawn request does not name one.
    pub default_resolution: u32,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            default_resolution: 8,
        }
    }
}

/// Outcome of [`TileVisibilityManager::update_visible`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityChange {
    /// Tiles spawned by the update.
    pub spawned: usize,
    /// Tiles despawned by the update.
    pub despawned: usize,
}

/// Spawns and despawns registry tiles through a [`TileHost`].
pub struct TileVisibilityManager<H: TileHost> {
    registry: Arc<TileRegistry>,
    host: H,
    root: H::Root,
    settings: VisibilitySettings,
    tiles: Option<Arc<DepthTiles>>,
    active: FxHashMap<TileAddress, H::Handle>,
}

impl<H: TileHost> TileVisibilityManager<H> {
    /// Create a manager with no active depth.
    pub fn new(
        registry: Arc<TileRegistry>,
        host: H,
        root: H::Root,
        settings: VisibilitySettings,
    ) -> Self {
        Self {
            registry,
            host,
            root,
            settings,
            tiles: None,
            active: FxHashMap::default(),
        }
    }

    /// Switch to `depth`, computing it in the registry if needed.
    ///
    /// Changing depth despawns every active tile. Setting the current depth
    /// again is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates [`RegistryError`] from the registry; the manager keeps its
    /// previous depth and tiles in that case.
    pub fn set_depth(&mut self, depth: u8) -> Result<(), RegistryError> {
        if self.depth() == Some(depth) {
            return Ok(());
        }
        let tiles = self.registry.ensure_depth(depth)?;
        let released = self.despawn_all();
        tracing::debug!(depth, tiles = tiles.len(), released, "visibility depth changed");
        self.tiles = Some(tiles);
        Ok(())
    }

    /// Current depth, if one has been set.
    #[must_use]
    pub fn depth(&self) -> Option<u8> {
        self.tiles.as_ref().map(|t| t.depth())
    }

    /// Spawn the tile at `address`, or return its existing handle.
    ///
    /// Returns `None` when no depth is set, when `address` is not a tile of
    /// the current depth, or when `resolution` is below the sampling minimum.
    pub fn try_spawn_tile(
        &mut self,
        address: TileAddress,
        resolution: Option<u32>,
    ) -> Option<H::Handle> {
        if let Some(handle) = self.active.get(&address) {
            return Some(handle.clone());
        }
        let resolution = resolution.unwrap_or(self.settings.default_resolution);
        if resolution < MIN_RESOLUTION {
            tracing::debug!(%address, resolution, "spawn rejected: resolution too low");
            return None;
        }
        let entry = self.tiles.as_ref()?.get(&address)?;
        let handle = self.host.spawn(&self.root, entry, resolution);
        self.active.insert(address, handle.clone());
        Some(handle)
    }

    /// Despawn the tile at `address`. Returns false if it was not active.
    pub fn despawn_tile(&mut self, address: &TileAddress) -> bool {
        match self.active.remove(address) {
            Some(handle) => {
                self.host.despawn(handle);
                true
            }
            None => false,
        }
    }

    /// Despawn every active tile, returning how many were released.
    pub fn despawn_all(&mut self) -> usize {
        let count = self.active.len();
        for (_, handle) in self.active.drain() {
            self.host.despawn(handle);
        }
        count
    }

    /// Spawn tiles of the current depth above the horizon and despawn those
    /// below it.
    pub fn update_visible(&mut self, culler: &HorizonCuller) -> VisibilityChange {
        let Some(tiles) = self.tiles.clone() else {
            return VisibilityChange::default();
        };
        let resolution = self.settings.default_resolution;
        let mut change = VisibilityChange::default();
        for entry in tiles.iter() {
            let visible = culler.is_entry_visible(entry);
            let active = self.active.contains_key(&entry.address);
            if visible && !active && resolution >= MIN_RESOLUTION {
                let handle = self.host.spawn(&self.root, entry, resolution);
                self.active.insert(entry.address, handle);
                change.spawned += 1;
            } else if !visible && active && self.despawn_tile(&entry.address) {
                change.despawned += 1;
            }
        }
        tracing::trace!(
            spawned = change.spawned,
            despawned = change.despawned,
            active = self.active.len(),
            "visibility updated"
        );
        change
    }

    /// Whether the tile at `address` is spawned.
    #[must_use]
    pub fn is_active(&self, address: &TileAddress) -> bool {
        self.active.contains_key(address)
    }

    /// Number of spawned tiles.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Host handle of the tile at `address`, if spawned.
    #[must_use]
    pub fn handle(&self, address: &TileAddress) -> Option<&H::Handle> {
        self.active.get(address)
    }

    /// Parent passed to every spawn.
    #[must_use]
    pub fn root(&self) -> &H::Root {
        &self.root
    }

    /// The tile host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<TileRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn settings(&self) -> &VisibilitySettings {
        &self.settings
    }
}
