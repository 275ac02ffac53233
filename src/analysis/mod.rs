//! Reachability analysis and dead-file classification.

mod entry_points;
mod reachability;
mod verdicts;

pub use entry_points::EntryPointDetector;
pub use reachability::ReachabilityWalker;
pub use verdicts::VerdictClassifier;

use crate::cache::CacheStats;
use serde::Serialize;
use std::path::PathBuf;

/// Human label for a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }

    /// Label for a score in [0, 1]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            Confidence::High
        } else if score >= 0.5 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a file by strength of dead-code evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// On a path from an entry point
    Reachable,
    /// Unreached, but a dynamic-usage pattern matched; confidence capped
    PossiblyLive,
    /// Unreached with incoming edges, none themselves reachable: part
    /// of a dead subgraph
    PartiallyUnreachable,
    /// Unreached, no incoming edges anywhere, no dynamic match
    Unreachable,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Reachable => "reachable",
            Verdict::PossiblyLive => "possibly-live",
            Verdict::PartiallyUnreachable => "partially-unreachable",
            Verdict::Unreachable => "unreachable",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a verdict was reached
#[derive(Debug, Clone, Serialize)]
pub struct Evidence {
    /// Entry points in the scan
    pub entry_points_total: usize,
    /// Entry points with a path to this file (always 0 for dead files)
    pub entry_points_reaching: usize,
    /// Files importing this one, from anywhere in the tree
    pub incoming_edges: usize,
    /// How many of those importers are themselves reachable
    pub incoming_reachable: usize,
    /// The dynamic-usage pattern that matched, if any
    pub dynamic_match: Option<String>,
    /// Normalized [0, 1] estimate that the verdict is correct
    pub confidence: f64,
    pub label: Confidence,
}

/// One dead-code finding
#[derive(Debug, Clone, Serialize)]
pub struct DeadFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub lines: usize,
    /// Names the file exports (what a removal would delete)
    pub exports: Vec<String>,
    pub verdict: Verdict,
    pub evidence: Evidence,
}

/// The complete scan outcome, read-only to reporters
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub total_files: usize,
    pub entry_points: Vec<PathBuf>,
    pub reachable_count: usize,
    pub dead_files: Vec<DeadFile>,
    pub cache: CacheStats,
}

impl ScanResult {
    pub fn dead_count(&self) -> usize {
        self.dead_files.len()
    }
}
