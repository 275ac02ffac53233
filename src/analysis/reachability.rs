use crate::graph::FileGraph;
use petgraph::Direction;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use tracing::debug;

/// Breadth-first reachability over the import graph.
pub struct ReachabilityWalker;

impl ReachabilityWalker {
    pub fn new() -> Self {
        Self
    }

    /// Compute the set of files reachable from the union of entry
    /// points. A node is marked the moment it is enqueued and never
    /// revisited, which makes the walk idempotent and cycle-safe.
    pub fn walk(&self, graph: &FileGraph, entry_points: &[PathBuf]) -> HashSet<PathBuf> {
        let inner = graph.inner();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        for entry in entry_points {
            if let Some(index) = graph.node_index(entry) {
                if visited.insert(index) {
                    queue.push_back(index);
                }
            }
        }

        while let Some(index) = queue.pop_front() {
            for neighbor in inner.neighbors_directed(index, Direction::Outgoing) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        let reachable: HashSet<PathBuf> = visited
            .into_iter()
            .filter_map(|index| graph.path_of(index).cloned())
            .collect();

        debug!(
            "Reachability: {} of {} files reachable",
            reachable.len(),
            graph.node_count()
        );
        reachable
    }
}

impl Default for ReachabilityWalker {
    fn default() -> Self {
        Self::new()
    }
}
