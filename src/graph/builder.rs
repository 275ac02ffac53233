//! Folds extraction results and resolved edges into the file graph.

use super::{FileGraph, NodeInfo};
use crate::discovery::FileHandle;
use crate::parser::ParseResult;
use crate::resolver::{Resolution, Resolver};
use std::path::Path;
use tracing::{debug, trace};

/// Exclusive owner of node and edge creation. Feed it every discovered
/// file with its extraction result; take the finished graph at the end.
pub struct GraphBuilder<'a> {
    resolver: &'a Resolver,
    graph: FileGraph,
    resolved_edges: usize,
    external_edges: usize,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(resolver: &'a Resolver) -> Self {
        Self {
            resolver,
            graph: FileGraph::new(),
            resolved_edges: 0,
            external_edges: 0,
        }
    }

    /// Add one file and its resolved import edges. Targets are created
    /// lazily if not yet added themselves; their info arrives when their
    /// own `add_file` call comes around.
    pub fn add_file(&mut self, handle: &FileHandle, result: &ParseResult) {
        let from = self.graph.ensure_node(&handle.path);
        let importer_dir = handle.path.parent().unwrap_or_else(|| Path::new(""));

        let mut info = NodeInfo {
            size_bytes: handle.size_bytes,
            lines: result.metadata.lines,
            exports: result.exports.clone(),
            unresolved: Vec::new(),
            parse_error: result.metadata.error.clone(),
        };

        for import in &result.imports {
            match self.resolver.resolve(&import.specifier, importer_dir) {
                Resolution::Internal(target) => {
                    trace!(
                        "{} → {} ('{}')",
                        handle.path.display(),
                        target.display(),
                        import.specifier
                    );
                    let to = self.graph.ensure_node(&target);
                    self.graph.add_edge(from, to, import.kind);
                    self.resolved_edges += 1;
                }
                Resolution::External => {
                    self.external_edges += 1;
                    info.unresolved.push(import.clone());
                }
            }
        }

        self.graph.set_info(&handle.path, info);
    }

    pub fn build(self) -> FileGraph {
        debug!(
            "Graph built: {} nodes, {} edges ({} imports external)",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.external_edges
        );
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Language;
    use crate::parser::{Import, ImportKind};
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn handle(path: &str) -> FileHandle {
        FileHandle::new(
            PathBuf::from(path),
            PathBuf::from(path),
            10,
            Language::TypeScript,
        )
    }

    fn result_with_imports(specs: &[&str]) -> ParseResult {
        let mut result = ParseResult::new();
        for (i, spec) in specs.iter().enumerate() {
            result
                .imports
                .push(Import::new(*spec, ImportKind::Static, i + 1));
        }
        result
    }

    fn resolver(files: &[&str]) -> Resolver {
        Resolver::new(
            vec![".ts".into()],
            vec!["index".into()],
            vec![],
            vec![],
            files.iter().map(PathBuf::from).collect::<HashSet<_>>(),
        )
    }

    #[test]
    fn resolved_imports_become_edges() {
        let resolver = resolver(&["src/a.ts", "src/b.ts"]);
        let mut builder = GraphBuilder::new(&resolver);

        builder.add_file(&handle("src/a.ts"), &result_with_imports(&["./b", "react"]));
        builder.add_file(&handle("src/b.ts"), &ParseResult::new());

        let graph = builder.build();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.incoming_count(Path::new("src/b.ts")), 1);

        // The external import is metadata, not an edge
        let info = graph.info(Path::new("src/a.ts")).unwrap();
        assert_eq!(info.unresolved.len(), 1);
        assert_eq!(info.unresolved[0].specifier, "react");
    }

    #[test]
    fn target_nodes_are_created_lazily() {
        let resolver = resolver(&["src/a.ts", "src/b.ts"]);
        let mut builder = GraphBuilder::new(&resolver);

        // b.ts is imported before (and without) being added itself
        builder.add_file(&handle("src/a.ts"), &result_with_imports(&["./b"]));

        let graph = builder.build();
        assert!(graph.node_index(Path::new("src/b.ts")).is_some());
    }
}
