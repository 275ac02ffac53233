//! deadwood - reachability-based dead file detection for monorepos
//!
//! Given a project root and a set of entry points, deadwood determines,
//! for every source file, whether it is reachable by following declared
//! import/include/require relationships, and reports confidence-scored
//! verdicts for files that appear unreachable.
//!
//! # Architecture
//!
//! The scan pipeline consists of:
//! 1. **Discovery** - Find source files across a dozen-plus languages
//! 2. **Hashing & Cache** - Skip extraction for unchanged files
//! 3. **Extraction** - Lexical import/export scanning on a worker pool
//! 4. **Resolution** - Ecosystem-aware specifier → file mapping
//! 5. **Graph & Reachability** - Import graph walked from entry points
//! 6. **Classification** - Confidence-scored verdicts for dead files
//! 7. **Reporting** - Terminal, JSON, or markdown output

pub mod analysis;
pub mod cache;
pub mod config;
pub mod discovery;
pub mod graph;
pub mod parser;
pub mod pool;
pub mod report;
pub mod resolver;
pub mod scanner;

pub use analysis::{
    Confidence, DeadFile, EntryPointDetector, Evidence, ReachabilityWalker, ScanResult, Verdict,
    VerdictClassifier,
};
pub use cache::{content_hash, CacheStats, CacheStore};
pub use config::Config;
pub use discovery::{FileFinder, FileHandle, Language};
pub use graph::{FileGraph, GraphBuilder};
pub use parser::{Extractor, ParseResult, ParserRegistry};
pub use pool::{PoolError, WorkerPool};
pub use report::{ReportFormat, Reporter};
pub use resolver::{PathAlias, Resolution, Resolver, WorkspacePackage};
pub use scanner::{scan_project, Scanner};
