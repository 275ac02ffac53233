use crate::config::{glob_match, Config};
use crate::graph::FileGraph;
use crate::resolver::{Resolver, WorkspacePackage};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Detects traversal roots: files assumed always reachable.
pub struct EntryPointDetector<'a> {
    config: &'a Config,
}

impl<'a> EntryPointDetector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Collect entry points from, in order: the configured structural
    /// patterns, workspace manifest entry files, explicitly configured
    /// files, and caller-supplied files. Deduplicated and sorted so the
    /// walk order is deterministic.
    pub fn detect(
        &self,
        graph: &FileGraph,
        packages: &[WorkspacePackage],
        resolver: &Resolver,
        extra: &[PathBuf],
    ) -> Vec<PathBuf> {
        let mut entry_points = HashSet::new();

        // 1. Structural patterns over every discovered path
        for path in graph.paths() {
            let path_str = path.to_string_lossy().replace('\\', "/");
            for pattern in &self.config.entry_points.patterns {
                if glob_match(pattern, &path_str) {
                    debug!("Entry point (pattern '{}'): {}", pattern, path.display());
                    entry_points.insert(path.clone());
                    break;
                }
            }
        }

        // 2. Manifest-declared package entry files
        for package in packages {
            let candidate = if package.entry.is_empty() {
                package.dir.clone()
            } else {
                package.dir.join(&package.entry)
            };
            if let Some(resolved) = resolver.probe_root_relative(&candidate) {
                debug!(
                    "Entry point (package '{}'): {}",
                    package.name,
                    resolved.display()
                );
                entry_points.insert(resolved);
            }
        }

        // 3. Configured and caller-supplied files; tolerate extensionless
        // spellings via the same probing the resolver uses
        for file in self.config.entry_points.files.iter().chain(extra) {
            if let Some(resolved) = resolver.probe_root_relative(file) {
                debug!("Entry point (explicit): {}", resolved.display());
                entry_points.insert(resolved);
            } else {
                debug!("Explicit entry point not found: {}", file.display());
            }
        }

        let mut sorted: Vec<PathBuf> = entry_points.into_iter().collect();
        sorted.sort();
        info!("Detected {} entry points", sorted.len());
        sorted
    }
}
