use std::collections::HashSet;

use log::warn;

use crate::graph::{Graph, Weight};
use crate::Result;

/// Result of a shortest path algorithm execution
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathResult<W>
where
    W: Weight,
{
    /// Distances from source to each vertex, `W::infinity()` when unreachable
    pub distances: Vec<W>,

    /// Predecessor vertices in the shortest path tree, when tracked
    pub predecessors: Option<Vec<Option<usize>>>,

    /// Source vertex ID
    pub source: usize,
}

impl<W> ShortestPathResult<W>
where
    W: Weight,
{
    /// Distance to `vertex`, `None` if it is unreachable or out of range
    pub fn distance(&self, vertex: usize) -> Option<W> {
        self.distances.get(vertex).copied().filter(|d| !d.is_infinite())
    }

    /// True if `vertex` was reached from the source
    pub fn is_reachable(&self, vertex: usize) -> bool {
        self.distance(vertex).is_some()
    }

    /// Number of vertices reached, the source included
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| !d.is_infinite()).count()
    }

    /// Predecessor of `vertex` on its shortest path, if predecessors were tracked
    pub fn predecessor(&self, vertex: usize) -> Option<usize> {
        self.predecessors.as_ref()?.get(vertex).copied().flatten()
    }

    /// Rebuilds the vertex sequence `source ..= target` from the predecessors
    ///
    /// Returns `None` if the target is unreachable, predecessors were not
    /// tracked, or the predecessor chain is broken.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        let predecessors = self.predecessors.as_ref()?;
        if target >= predecessors.len() || !self.is_reachable(target) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = target;
        let mut visited = HashSet::new();

        // Build path in reverse order
        while current != self.source {
            if !visited.insert(current) {
                warn!("Cycle detected in path reconstruction at vertex {}", current);
                return None;
            }
            path.push(current);
            current = predecessors[current]?;
        }

        path.push(self.source);
        path.reverse();
        Some(path)
    }
}

/// Trait for shortest path algorithms
pub trait ShortestPathAlgorithm<W, G>
where
    W: Weight,
    G: Graph<W>,
{
    /// Compute shortest paths from a source vertex to all other vertices
    fn compute_shortest_paths(&self, graph: &G, source: usize) -> Result<ShortestPathResult<W>>;

    /// Get the name of the algorithm
    fn name(&self) -> &'static str;

    /// Get the shortest path from source to target as a sequence of vertices
    fn get_path(&self, result: &ShortestPathResult<W>, target: usize) -> Option<Vec<usize>> {
        result.path_to(target)
    }
}
