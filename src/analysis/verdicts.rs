use super::{Confidence, DeadFile, Evidence, Verdict};
use crate::config::{glob_match, Config};
use crate::graph::FileGraph;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

// Score weights. The verdict taxonomy is the contract; these are the
// tunable part.
const ISOLATED_CONFIDENCE: f64 = 0.9;
const DEAD_SUBGRAPH_CONFIDENCE: f64 = 0.6;
const DYNAMIC_MATCH_CAP: f64 = 0.35;

/// Scores every unreached node with a verdict and confidence.
pub struct VerdictClassifier<'a> {
    config: &'a Config,
}

impl<'a> VerdictClassifier<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Classify all nodes outside the reachable set. Findings come back
    /// sorted by path for stable output.
    pub fn classify(
        &self,
        graph: &FileGraph,
        reachable: &HashSet<PathBuf>,
        entry_points: &[PathBuf],
    ) -> Vec<DeadFile> {
        let mut dead_files = Vec::new();

        for path in graph.paths() {
            if reachable.contains(path) {
                continue;
            }

            let importers = graph.importers(path);
            let incoming_edges = importers.len();
            let incoming_reachable = importers
                .iter()
                .filter(|importer| reachable.contains(**importer))
                .count();
            let dynamic_match = self.dynamic_match(path);

            let (verdict, confidence) = match &dynamic_match {
                Some(_) => {
                    let base = if incoming_edges == 0 {
                        ISOLATED_CONFIDENCE
                    } else {
                        DEAD_SUBGRAPH_CONFIDENCE
                    };
                    (Verdict::PossiblyLive, base.min(DYNAMIC_MATCH_CAP))
                }
                None if incoming_edges == 0 => (Verdict::Unreachable, ISOLATED_CONFIDENCE),
                None => (Verdict::PartiallyUnreachable, DEAD_SUBGRAPH_CONFIDENCE),
            };

            debug!(
                "{}: {} (confidence {:.2})",
                path.display(),
                verdict,
                confidence
            );

            let info = graph.info(path).cloned().unwrap_or_default();
            dead_files.push(DeadFile {
                path: path.clone(),
                size_bytes: info.size_bytes,
                lines: info.lines,
                exports: info.exports.iter().map(|e| e.name.clone()).collect(),
                verdict,
                evidence: Evidence {
                    entry_points_total: entry_points.len(),
                    entry_points_reaching: 0,
                    incoming_edges,
                    incoming_reachable,
                    dynamic_match,
                    confidence,
                    label: Confidence::from_score(confidence),
                },
            });
        }

        dead_files.sort_by(|a, b| a.path.cmp(&b.path));
        dead_files
    }

    /// First configured dynamic-usage pattern matching the path, if any
    fn dynamic_match(&self, path: &Path) -> Option<String> {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.config
            .dynamic
            .patterns
            .iter()
            .find(|pattern| glob_match(pattern, &path_str))
            .cloned()
    }
}
