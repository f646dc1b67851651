//! A* search over a [`GraphTopology`] with reusable scratch storage.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{GraphTopology, PathBuffer};

/// An entry in the open set.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f64,
    h: f64,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    // Reversed so the max-heap pops lowest f, then lowest h, then lowest node.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Reusable A* search state.
///
/// Edge cost and heuristic are both the Euclidean distance between node
/// centres. Per-node scratch arrays are stamped with a search counter, so a
/// search only touches the nodes it reaches and repeated searches over the
/// same topology do not allocate.
#[derive(Debug, Default)]
pub struct Pathfinder {
    g: Vec<f64>,
    came_from: Vec<usize>,
    seen: Vec<u32>,
    closed: Vec<u32>,
    stamp: u32,
    open: BinaryHeap<OpenEntry>,
    trace: Vec<usize>,
}

impl Pathfinder {
    /// Empty scratch space; grows on first search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch space pre-sized for `node_count` nodes.
    #[must_use]
    pub fn with_node_capacity(node_count: usize) -> Self {
        let mut finder = Self::default();
        finder.prepare(node_count);
        finder
    }

    /// Find a path from `start` to `goal` and write it, inclusive of both
    /// ends, into `path`.
    ///
    /// Returns false when either index is out of range, no path exists, or
    /// the path does not fit in `path`'s capacity. The buffer contents are
    /// only meaningful when true is returned.
    pub fn try_find_path(
        &mut self,
        topology: &GraphTopology,
        start: usize,
        goal: usize,
        path: &mut PathBuffer,
    ) -> bool {
        let node_count = topology.node_count();
        if start >= node_count || goal >= node_count {
            tracing::warn!(start, goal, node_count, "path query index out of range");
            path.clear();
            return false;
        }

        self.prepare(node_count);
        let stamp = self.stamp;
        let goal_center = topology.center(goal);
        let heuristic = |n: usize| topology.center(n).distance(goal_center);

        self.open.clear();
        self.g[start] = 0.0;
        self.came_from[start] = start;
        self.seen[start] = stamp;
        let h0 = heuristic(start);
        self.open.push(OpenEntry {
            f: h0,
            h: h0,
            node: start,
        });

        let mut expanded = 0_usize;
        while let Some(OpenEntry { node, .. }) = self.open.pop() {
            if self.closed[node] == stamp {
                continue;
            }
            if node == goal {
                tracing::trace!(start, goal, expanded, cost = self.g[goal], "path found");
                return self.write_path(start, goal, path);
            }
            self.closed[node] = stamp;
            expanded += 1;

            let here = topology.center(node);
            for &next in topology.neighbors(node) {
                if self.closed[next] == stamp {
                    continue;
                }
                let tentative = self.g[node] + here.distance(topology.center(next));
                if self.seen[next] != stamp || tentative < self.g[next] {
                    self.seen[next] = stamp;
                    self.g[next] = tentative;
                    self.came_from[next] = node;
                    let h = heuristic(next);
                    self.open.push(OpenEntry {
                        f: tentative + h,
                        h,
                        node: next,
                    });
                }
            }
        }

        tracing::trace!(start, goal, expanded, "no path");
        path.clear();
        false
    }

    /// Grow scratch arrays to `node_count` and advance the search stamp.
    fn prepare(&mut self, node_count: usize) {
        if self.g.len() < node_count {
            self.g.resize(node_count, 0.0);
            self.came_from.resize(node_count, 0);
            self.seen.resize(node_count, 0);
            self.closed.resize(node_count, 0);
        }
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.seen.fill(0);
            self.closed.fill(0);
            self.stamp = 1;
        }
    }

    fn write_path(&mut self, start: usize, goal: usize, path: &mut PathBuffer) -> bool {
        self.trace.clear();
        let mut node = goal;
        self.trace.push(node);
        while node != start {
            node = self.came_from[node];
            self.trace.push(node);
            if self.trace.len() > path.capacity() {
                path.clear();
                return false;
            }
        }
        path.fill_from(self.trace.iter().rev().copied())
    }
}
