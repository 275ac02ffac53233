//! Incremental scan cache
//!
//! Persists extraction results across invocations so unchanged files are
//! never re-parsed. Keyed by project-relative path, validated by content
//! hash: any byte change forces a miss, never partial reuse.

use crate::parser::ParseResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Cache errors. Only `save` surfaces these; `load` recovers silently.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to write cache file: {0}")]
    WriteError(#[from] std::io::Error),
    #[error("Failed to serialize cache: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Current cache format version. Bump when the entry layout changes;
/// a mismatch invalidates the whole snapshot.
const CACHE_VERSION: u32 = 2;

/// Directory under the project root holding the snapshot
const CACHE_DIR: &str = ".deadwood";
const CACHE_FILE: &str = "cache.json";

/// Stable short digest of file bytes: SHA-256 truncated to 16 bytes,
/// rendered as 32 lowercase hex characters. Deterministic across
/// processes, which the persisted cache requires.
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
}

/// Cached extraction result for a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Content hash the result was computed from
    pub hash: String,
    /// The extraction result itself
    pub result: ParseResult,
    /// Seconds since the epoch when the entry was stored
    pub timestamp: u64,
}

/// On-disk snapshot layout
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    entries: HashMap<PathBuf, CacheEntry>,
}

/// Run-scoped cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entry_count: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} hits, {} misses, {} entries",
            self.hits, self.misses, self.entry_count
        )
    }
}

/// Project-scoped parse cache.
///
/// Instantiate one per scan: the hit/miss counters are run-scoped state,
/// not process-wide. Only the orchestrator mutates the store; worker
/// executors never touch it. The snapshot file carries no lock, so
/// concurrent scans of one project race with last-writer-wins semantics.
pub struct CacheStore {
    cache_path: PathBuf,
    entries: HashMap<PathBuf, CacheEntry>,
    hits: usize,
    misses: usize,
}

impl CacheStore {
    /// Create a store for a project, loading the existing snapshot if one
    /// is present. A missing, unreadable, malformed, or version-mismatched
    /// snapshot all degrade identically to an empty cache.
    pub fn load(project_root: &Path) -> Self {
        let cache_path = Self::cache_path(project_root);
        let entries = Self::read_snapshot(&cache_path).unwrap_or_default();

        Self {
            cache_path,
            entries,
            hits: 0,
            misses: 0,
        }
    }

    /// Fresh empty store that ignores any snapshot on disk. Used when
    /// caching is disabled for the run.
    pub fn empty(project_root: &Path) -> Self {
        Self {
            cache_path: Self::cache_path(project_root),
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// The snapshot location for a project root
    pub fn cache_path(project_root: &Path) -> PathBuf {
        project_root.join(CACHE_DIR).join(CACHE_FILE)
    }

    fn read_snapshot(path: &Path) -> Option<HashMap<PathBuf, CacheEntry>> {
        let file = fs::File::open(path).ok()?;
        let reader = BufReader::new(file);
        let snapshot: Snapshot = serde_json::from_reader(reader).ok()?;

        if snapshot.version != CACHE_VERSION {
            tracing::debug!(
                "Cache version mismatch ({} != {}), discarding",
                snapshot.version,
                CACHE_VERSION
            );
            return None;
        }

        Some(snapshot.entries)
    }

    /// Pure lookup: returns the stored result only when the stored hash
    /// matches the current content hash. Counts a hit or a miss.
    pub fn get(&mut self, path: &Path, hash: &str) -> Option<&ParseResult> {
        match self.entries.get(path) {
            Some(entry) if entry.hash == hash => {
                self.hits += 1;
                Some(&entry.result)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a result, overwriting any previous entry for the path
    pub fn set(&mut self, path: &Path, hash: String, result: ParseResult) {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                hash,
                result,
                timestamp,
            },
        );
    }

    /// Drop entries for paths no longer present in the scan
    pub fn retain_paths(&mut self, live: &std::collections::HashSet<PathBuf>) {
        self.entries.retain(|path, _| live.contains(path));
    }

    /// Write the full table to disk, creating the cache directory if
    /// absent. A crash mid-write may corrupt the file; `load` tolerates
    /// that by starting empty.
    pub fn save(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let snapshot = Snapshot {
            version: CACHE_VERSION,
            entries: self.entries.clone(),
        };

        let file = fs::File::create(&self.cache_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, &snapshot)?;
        Ok(())
    }

    /// Delete the snapshot file and reset all state, counters included
    pub fn clear(&mut self) {
        let _ = fs::remove_file(&self.cache_path);
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entry_count: self.entries.len(),
        }
    }
}
