//! Discovery-order map from external node ids to dense indices.

use rustc_hash::FxHashMap;

/// Maps arbitrary external ids to dense indices `0..len`.
///
/// The first time an id is seen it receives the next sequential index. An
/// index is never reassigned.
#[derive(Clone, Debug, Default)]
pub struct SparseIndex {
    /// Dense array where `index == position`.
    ids: Vec<i64>,
    /// Reverse lookup: id → index.
    index: FxHashMap<i64, usize>,
}

impl SparseIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `id`, assigning the next one if it is new.
    pub fn get_or_insert(&mut self, id: i64) -> usize {
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.ids.len();
        self.ids.push(id);
        self.index.insert(id, i);
        i
    }

    /// The index of `id`, if it has been seen.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// The external id at `index`.
    #[must_use]
    pub fn id(&self, index: usize) -> Option<i64> {
        self.ids.get(index).copied()
    }

    /// External ids in index order.
    #[must_use]
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Number of ids seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no ids have been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_assigned_in_discovery_order() {
        let mut idx = SparseIndex::new();
        assert_eq!(idx.get_or_insert(500), 0);
        assert_eq!(idx.get_or_insert(-3), 1);
        assert_eq!(idx.get_or_insert(42), 2);
        assert_eq!(idx.ids(), &[500, -3, 42]);
    }

    #[test]
    fn test_reseen_id_keeps_index() {
        let mut idx = SparseIndex::new();
        idx.get_or_insert(7);
        idx.get_or_insert(8);
        assert_eq!(idx.get_or_insert(7), 0);
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn test_lookup_both_directions() {
        let mut idx = SparseIndex::new();
        idx.get_or_insert(10);
        idx.get_or_insert(20);
        assert_eq!(idx.get(20), Some(1));
        assert_eq!(idx.id(0), Some(10));
        assert!(idx.get(30).is_none());
        assert!(idx.id(2).is_none());
    }

    #[test]
    fn test_empty_index() {
        let idx = SparseIndex::default();
        assert!(idx.is_empty());
        assert_eq!(idx.len(), 0);
    }
}
