//! The import graph: one node per file, one edge per resolved import.

mod builder;

pub use builder::GraphBuilder;

use crate::parser::{ExportDecl, Import, ImportKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Per-node facts retained for classification and reporting
#[derive(Debug, Clone, Default)]
pub struct NodeInfo {
    pub size_bytes: u64,
    pub lines: usize,
    pub exports: Vec<ExportDecl>,
    /// Imports that resolved External; recorded for reporting, never
    /// traversed
    pub unresolved: Vec<Import>,
    pub parse_error: Option<String>,
}

/// Directed graph of file nodes and import edges.
///
/// Mutated only during construction (the builder owns node and edge
/// creation); read-only afterward. The walker is cycle-safe via its
/// visited set, so no cycle breaking happens here.
#[derive(Debug, Default)]
pub struct FileGraph {
    inner: DiGraph<PathBuf, ImportKind>,
    node_map: HashMap<PathBuf, NodeIndex>,
    info: HashMap<PathBuf, NodeInfo>,
    edge_set: HashSet<(NodeIndex, NodeIndex)>,
}

impl FileGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or lazily create the node for a path
    pub(crate) fn ensure_node(&mut self, path: &Path) -> NodeIndex {
        if let Some(&index) = self.node_map.get(path) {
            return index;
        }
        let index = self.inner.add_node(path.to_path_buf());
        self.node_map.insert(path.to_path_buf(), index);
        index
    }

    /// Add an import edge; duplicate edges between the same pair collapse
    /// to one for traversal.
    pub(crate) fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: ImportKind) {
        if self.edge_set.insert((from, to)) {
            self.inner.add_edge(from, to, kind);
        }
    }

    pub(crate) fn set_info(&mut self, path: &Path, info: NodeInfo) {
        self.info.insert(path.to_path_buf(), info);
    }

    pub fn node_index(&self, path: &Path) -> Option<NodeIndex> {
        self.node_map.get(path).copied()
    }

    pub fn path_of(&self, index: NodeIndex) -> Option<&PathBuf> {
        self.inner.node_weight(index)
    }

    pub fn info(&self, path: &Path) -> Option<&NodeInfo> {
        self.info.get(path)
    }

    /// All node paths, in insertion order
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.inner.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Number of files importing this one, from anywhere in the tree
    pub fn incoming_count(&self, path: &Path) -> usize {
        let Some(&index) = self.node_map.get(path) else {
            return 0;
        };
        self.inner
            .neighbors_directed(index, Direction::Incoming)
            .count()
    }

    /// Paths of the files importing this one
    pub fn importers(&self, path: &Path) -> Vec<&PathBuf> {
        let Some(&index) = self.node_map.get(path) else {
            return Vec::new();
        };
        self.inner
            .neighbors_directed(index, Direction::Incoming)
            .filter_map(|n| self.inner.node_weight(n))
            .collect()
    }

    pub fn inner(&self) -> &DiGraph<PathBuf, ImportKind> {
        &self.inner
    }
}
