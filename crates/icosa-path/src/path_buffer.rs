/// Fixed-capacity output buffer for a path of node indices.
///
/// Capacity is chosen at construction and never grows; a search whose path
/// does not fit reports failure rather than reallocating.
#[derive(Clone, Debug)]
pub struct PathBuffer {
    nodes: Vec<usize>,
    capacity: usize,
}

impl PathBuffer {
    /// Create an empty buffer that holds at most `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Most nodes a path may hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Nodes in the current path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no path is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Path from start to goal, inclusive.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.nodes
    }

    /// Drop the current path, keeping the allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Replace the contents with `path`. Returns false, leaving the buffer
    /// empty, if `path` exceeds the capacity.
    pub(crate) fn fill_from(&mut self, path: impl ExactSizeIterator<Item = usize>) -> bool {
        self.nodes.clear();
        if path.len() > self.capacity {
            return false;
        }
        self.nodes.extend(path);
        true
    }
}
