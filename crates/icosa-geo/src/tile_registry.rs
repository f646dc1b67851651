//! Tile registry: per-depth precomputed corner positions and normals.
//!
//! The registry is an explicit cache object. A depth is computed the first
//! time it is requested and then shared, immutable, for the registry's
//! lifetime. Requests for a depth already computed return the same
//! [`DepthTiles`] without recomputation.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use dashmap::DashMap;
use glam::DVec3;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{IcoFace, IcosahedronGeometry, TileAddress, tile_corner_directions};

/// Default ceiling on the number of tiles a single depth may hold.
pub const DEFAULT_MAX_TILES: usize = 1 << 21;

/// Precomputed geometry of one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryEntry {
    /// The tile this entry describes.
    pub address: TileAddress,
    /// World-space corners, ordered as local `(0,0)`, `(1,0)`, `(0,1)`.
    pub corners: [DVec3; 3],
    /// Normalized mean of the three corner directions.
    pub normal: DVec3,
}

impl RegistryEntry {
    /// Mean of the three world corners.
    #[must_use]
    pub fn centroid(&self) -> DVec3 {
        (self.corners[0] + self.corners[1] + self.corners[2]) / 3.0
    }

    /// Radius of a sphere around [`Self::centroid`] enclosing all corners.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        let c = self.centroid();
        self.corners
            .iter()
            .map(|p| p.distance(c))
            .fold(0.0, f64::max)
    }
}

/// Every tile of one depth, in enumeration order (face, then `y`, then `x`).
#[derive(Debug)]
pub struct DepthTiles {
    depth: u8,
    entries: Vec<RegistryEntry>,
    index: FxHashMap<TileAddress, usize>,
}

impl DepthTiles {
    /// The depth these tiles belong to.
    #[must_use]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Look up a tile. Invalid addresses and addresses at another depth
    /// return `None`.
    #[must_use]
    pub fn get(&self, address: &TileAddress) -> Option<&RegistryEntry> {
        self.index.get(address).map(|&i| &self.entries[i])
    }

    /// Position of `address` in enumeration order.
    #[must_use]
    pub fn position(&self, address: &TileAddress) -> Option<usize> {
        self.index.get(address).copied()
    }

    /// Whether `address` is present.
    #[must_use]
    pub fn contains(&self, address: &TileAddress) -> bool {
        self.index.contains_key(address)
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Entries as a slice, in enumeration order.
    #[must_use]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }
}

/// World placement of the sphere the registry describes.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistrySettings {
    /// Sphere radius corners are scaled by.
    pub base_radius: f64,
    /// Sphere centre corners are offset by.
    pub center: DVec3,
    /// Largest tile count a single depth may allocate.
    pub max_tiles: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_radius: 1.0,
            center: DVec3::ZERO,
            max_tiles: DEFAULT_MAX_TILES,
        }
    }
}

/// Errors that can occur when requesting a depth.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The depth is deeper than [`TileAddress::MAX_DEPTH`].
    #[error("depth {depth} exceeds the maximum depth {max}")]
    DepthOutOfRange {
        /// Requested depth.
        depth: u8,
        /// Deepest supported depth.
        max: u8,
    },
    /// The depth would hold more tiles than the configured ceiling.
    #[error("depth {depth} holds {tiles} tiles, above the ceiling of {limit}")]
    CapacityExceeded {
        /// Requested depth.
        depth: u8,
        /// Tiles the depth would hold.
        tiles: usize,
        /// Configured ceiling.
        limit: usize,
    },
}

/// Depth-keyed cache of precomputed tile geometry.
///
/// Safe to share across threads (`Arc<TileRegistry>`). Each depth sits behind
/// its own once-cell, so concurrent first requests for the same depth compute
/// it once and all observe the same `Arc<DepthTiles>`.
pub struct TileRegistry {
    geometry: IcosahedronGeometry,
    settings: RegistrySettings,
    depths: DashMap<u8, Arc<OnceLock<Arc<DepthTiles>>>>,
}

impl TileRegistry {
    /// Create an empty registry over `geometry`.
    #[must_use]
    pub fn new(geometry: IcosahedronGeometry, settings: RegistrySettings) -> Self {
        Self {
            geometry,
            settings,
            depths: DashMap::new(),
        }
    }

    /// The base geometry tiles are computed from.
    #[must_use]
    pub fn geometry(&self) -> &IcosahedronGeometry {
        &self.geometry
    }

    /// World placement and limits.
    #[must_use]
    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Return every tile of `depth`, computing it on first request.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DepthOutOfRange`] beyond
    /// [`TileAddress::MAX_DEPTH`] and [`RegistryError::CapacityExceeded`] if
    /// the depth would hold more than `max_tiles` tiles. Nothing is allocated
    /// in either case.
    pub fn ensure_depth(&self, depth: u8) -> Result<Arc<DepthTiles>, RegistryError> {
        if depth > TileAddress::MAX_DEPTH {
            return Err(RegistryError::DepthOutOfRange {
                depth,
                max: TileAddress::MAX_DEPTH,
            });
        }
        let tiles = TileAddress::expected_count(depth);
        if tiles > self.settings.max_tiles {
            return Err(RegistryError::CapacityExceeded {
                depth,
                tiles,
                limit: self.settings.max_tiles,
            });
        }

        let cell = Arc::clone(&*self.depths.entry(depth).or_default());
        if let Some(cached) = cell.get() {
            tracing::trace!(depth, "tile registry hit");
            return Ok(Arc::clone(cached));
        }
        Ok(Arc::clone(cell.get_or_init(|| Arc::new(self.compute_depth(depth)))))
    }

    /// Look up one tile, if its depth has already been computed.
    #[must_use]
    pub fn get(&self, address: &TileAddress) -> Option<RegistryEntry> {
        let cell = self.depths.get(&address.depth())?;
        cell.value().get()?.get(address).cloned()
    }

    /// Whether `depth` has been computed.
    #[must_use]
    pub fn is_computed(&self, depth: u8) -> bool {
        self.depths
            .get(&depth)
            .is_some_and(|cell| cell.value().get().is_some())
    }

    /// Depths computed so far, ascending.
    #[must_use]
    pub fn computed_depths(&self) -> Vec<u8> {
        let mut depths: Vec<u8> = self
            .depths
            .iter()
            .filter(|e| e.value().get().is_some())
            .map(|e| *e.key())
            .collect();
        depths.sort_unstable();
        depths
    }

    fn compute_depth(&self, depth: u8) -> DepthTiles {
        let started = Instant::now();
        let n = TileAddress::grid_size(depth);
        let mut entries = Vec::with_capacity(TileAddress::expected_count(depth));
        let mut index = FxHashMap::default();
        index.reserve(entries.capacity());

        for face in IcoFace::ALL {
            for y in 0..n {
                for x in 0..n {
                    let Some(address) = TileAddress::try_new(face.index(), x, y, depth) else {
                        continue;
                    };
                    index.insert(address, entries.len());
                    entries.push(self.compute_entry(address));
                }
            }
        }

        tracing::debug!(
            depth,
            tiles = entries.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "computed tile registry depth"
        );
        DepthTiles {
            depth,
            entries,
            index,
        }
    }

    fn compute_entry(&self, address: TileAddress) -> RegistryEntry {
        let dirs = tile_corner_directions(&self.geometry, &address);
        let radius = self.settings.base_radius;
        let center = self.settings.center;
        RegistryEntry {
            address,
            corners: dirs.map(|d| center + d * radius),
            normal: ((dirs[0] + dirs[1] + dirs[2]) / 3.0).normalize(),
        }
    }
}

impl Default for TileRegistry {
    fn default() -> Self {
        Self::new(IcosahedronGeometry::unit(), RegistrySettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn registry(radius: f64, center: DVec3) -> TileRegistry {
        TileRegistry::new(
            IcosahedronGeometry::unit(),
            RegistrySettings {
                base_radius: radius,
                center,
                ..RegistrySettings::default()
            },
        )
    }

    #[test]
    fn test_depth_zero_entries() {
        let reg = TileRegistry::default();
        let tiles = reg.ensure_depth(0).unwrap();
        assert_eq!(tiles.len(), 20);
        for entry in tiles.iter() {
            assert_eq!(entry.corners.len(), 3);
            let len = entry.normal.length();
            assert!(len > 0.9 && len <= 1.0 + 1e-12, "normal length {len}");
        }
    }

    #[test]
    fn test_entry_counts_per_depth() {
        let reg = TileRegistry::default();
        for depth in 0..=4 {
            let tiles = reg.ensure_depth(depth).unwrap();
            assert_eq!(tiles.len(), TileAddress::valid_count(depth));
            assert_eq!(tiles.depth(), depth);
        }
    }

    #[test]
    fn test_ensure_depth_is_idempotent() {
        let reg = TileRegistry::default();
        let first = reg.ensure_depth(2).unwrap();
        let second = reg.ensure_depth(2).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.address, b.address);
            assert_eq!(a.corners, b.corners);
        }
    }

    #[test]
    fn test_independent_registries_agree() {
        let a = TileRegistry::default().ensure_depth(1).unwrap();
        let b = TileRegistry::default().ensure_depth(1).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn test_corners_scaled_and_offset() {
        let center = DVec3::new(10.0, -4.0, 2.5);
        let reg = registry(3.0, center);
        let tiles = reg.ensure_depth(1).unwrap();
        for entry in tiles.iter() {
            for corner in &entry.corners {
                assert!(((*corner - center).length() - 3.0).abs() < 1e-10);
            }
            assert!(entry.normal.dot(entry.centroid() - center) > 0.0);
        }
    }

    #[test]
    fn test_lookup_invalid_address_is_none() {
        let reg = TileRegistry::default();
        let tiles = reg.ensure_depth(1).unwrap();
        let other_depth = TileAddress::new(0, 0, 0, 2);
        assert!(tiles.get(&other_depth).is_none());
        assert!(TileAddress::try_new(0, 9, 0, 1).is_none());
        assert!(tiles.get(&TileAddress::new(0, 1, 1, 1)).is_some());
    }

    #[test]
    fn test_registry_get_requires_computed_depth() {
        let reg = TileRegistry::default();
        let addr = TileAddress::new(3, 0, 0, 0);
        assert!(reg.get(&addr).is_none());
        assert!(!reg.is_computed(0));
        reg.ensure_depth(0).unwrap();
        assert!(reg.is_computed(0));
        assert_eq!(reg.get(&addr).map(|e| e.address), Some(addr));
    }

    #[test]
    fn test_depth_out_of_range_rejected() {
        let reg = TileRegistry::default();
        let err = reg.ensure_depth(TileAddress::MAX_DEPTH + 1).unwrap_err();
        assert!(matches!(err, RegistryError::DepthOutOfRange { .. }));
        assert!(reg.computed_depths().is_empty());
    }

    #[test]
    fn test_capacity_ceiling_rejected() {
        let reg = TileRegistry::new(
            IcosahedronGeometry::unit(),
            RegistrySettings {
                max_tiles: 100,
                ..RegistrySettings::default()
            },
        );
        assert!(reg.ensure_depth(1).is_ok());
        assert_eq!(
            reg.ensure_depth(2).unwrap_err(),
            RegistryError::CapacityExceeded {
                depth: 2,
                tiles: 320,
                limit: 100
            }
        );
        assert_eq!(reg.computed_depths(), vec![1]);
    }

    #[test]
    fn test_concurrent_first_use_computes_once() {
        let reg = Arc::new(TileRegistry::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&reg);
                thread::spawn(move || reg.ensure_depth(3).unwrap())
            })
            .collect();
        let results: Vec<Arc<DepthTiles>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], r));
        }
    }

    #[test]
    fn test_tile_normals_point_outward() {
        let reg = TileRegistry::default();
        let tiles = reg.ensure_depth(2).unwrap();
        for entry in tiles.iter() {
            let [a, b, c] = entry.corners;
            let flat = (b - a).cross(c - a);
            assert!(flat.dot(entry.normal) > 0.0, "{} winds inward", entry.address);
        }
    }
}
