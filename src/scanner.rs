//! Scan orchestration: discover → hash/cache → extract → resolve →
//! walk → classify.
//!
//! The orchestrator runs single-threaded; CPU-bound extraction happens on
//! the worker pool, file hashing on rayon. Only the orchestrator touches
//! the cache store.

use crate::analysis::{EntryPointDetector, ReachabilityWalker, ScanResult, VerdictClassifier};
use crate::cache::{content_hash, CacheStore};
use crate::config::Config;
use crate::discovery::{FileFinder, FileHandle};
use crate::graph::GraphBuilder;
use crate::parser::{ParseResult, ParserRegistry};
use crate::pool::{default_pool_size, WorkerPool};
use crate::resolver::{discover_workspace_packages, Resolver};
use indicatif::{ProgressBar, ProgressStyle};
use miette::Result;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How many files go to the pool per batch; bounds progress-bar
/// granularity, not parallelism.
const BATCH_SIZE: usize = 256;

/// A file with its content hash and (for cache misses) its content
struct LoadedFile {
    handle: FileHandle,
    hash: String,
    content: Option<String>,
    read_error: Option<String>,
}

/// Library facade over the whole pipeline.
pub struct Scanner {
    root: PathBuf,
    config: Config,
    progress: bool,
}

impl Scanner {
    pub fn new(root: PathBuf, config: Config) -> Self {
        Self {
            root,
            config,
            progress: false,
        }
    }

    /// Show an extraction progress bar (CLI use)
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Run a full scan. `extra_entry_points` are caller-supplied
    /// traversal roots, merged with the configured ones.
    pub fn scan(&self, extra_entry_points: &[PathBuf]) -> Result<ScanResult> {
        // Startup configuration problems are the only fatal errors;
        // everything per-file degrades gracefully.
        self.config.validate()?;

        let finder = FileFinder::new(&self.config);
        let files = finder.find_files(&self.root)?;
        info!("Discovered {} files", files.len());

        let packages = discover_workspace_packages(&self.root)?;
        if !packages.is_empty() {
            info!("Workspace packages: {}", packages.len());
        }

        let mut cache = if self.config.cache.enabled {
            CacheStore::load(&self.root)
        } else {
            CacheStore::empty(&self.root)
        };

        // Hash (and read) every file in parallel; the orchestrator then
        // consults the cache serially.
        let loaded: Vec<LoadedFile> = files
            .into_par_iter()
            .map(|handle| match std::fs::read(&handle.absolute_path) {
                Ok(bytes) => {
                    let hash = content_hash(&bytes);
                    let content = String::from_utf8_lossy(&bytes).into_owned();
                    LoadedFile {
                        handle,
                        hash,
                        content: Some(content),
                        read_error: None,
                    }
                }
                Err(e) => LoadedFile {
                    read_error: Some(format!("read failed: {}", e)),
                    hash: String::new(),
                    content: None,
                    handle,
                },
            })
            .collect();

        let results = self.extract(&loaded, &mut cache);

        // Build the graph over the discovered-file universe
        let known: HashSet<PathBuf> = loaded.iter().map(|f| f.handle.path.clone()).collect();
        let resolver = Resolver::new(
            self.config.resolver.extensions.clone(),
            self.config.resolver.index_names.clone(),
            self.config.resolver.aliases.clone(),
            packages.clone(),
            known,
        );

        let mut builder = GraphBuilder::new(&resolver);
        for (file, result) in loaded.iter().zip(results.iter()) {
            builder.add_file(&file.handle, result);
        }
        let graph = builder.build();

        let detector = EntryPointDetector::new(&self.config);
        let entry_points = detector.detect(&graph, &packages, &resolver, extra_entry_points);

        let reachable = ReachabilityWalker::new().walk(&graph, &entry_points);

        let classifier = VerdictClassifier::new(&self.config);
        let dead_files = classifier.classify(&graph, &reachable, &entry_points);

        if self.config.cache.enabled {
            let live: HashSet<PathBuf> = loaded.iter().map(|f| f.handle.path.clone()).collect();
            cache.retain_paths(&live);
            if let Err(e) = cache.save() {
                warn!("Could not persist cache: {}", e);
            }
        }

        let stats = cache.stats();
        info!(
            "Scan complete: {} reachable, {} dead, cache {}",
            reachable.len(),
            dead_files.len(),
            stats
        );

        Ok(ScanResult {
            total_files: loaded.len(),
            entry_points,
            reachable_count: reachable.len(),
            dead_files,
            cache: stats,
        })
    }

    /// Produce one ParseResult per loaded file, in order: cache hits are
    /// reused, misses go to the worker pool, read failures become empty
    /// results with an error note.
    fn extract(&self, loaded: &[LoadedFile], cache: &mut CacheStore) -> Vec<ParseResult> {
        let mut results: Vec<Option<ParseResult>> = vec![None; loaded.len()];
        let mut pending: Vec<(usize, PathBuf, String)> = Vec::new();

        for (index, file) in loaded.iter().enumerate() {
            if let Some(error) = &file.read_error {
                results[index] = Some(ParseResult::with_error(error.clone()));
                continue;
            }
            if let Some(cached) = cache.get(&file.handle.path, &file.hash) {
                results[index] = Some(cached.clone());
                continue;
            }
            let content = file.content.clone().unwrap_or_default();
            pending.push((index, file.handle.path.clone(), content));
        }

        debug!(
            "Extraction: {} cached, {} to parse",
            loaded.len() - pending.len(),
            pending.len()
        );

        if !pending.is_empty() {
            let registry = Arc::new(ParserRegistry::with_default_extractors());
            let workers = self.config.pool.workers.unwrap_or_else(default_pool_size);
            let mut pool = WorkerPool::new(registry, workers);

            let bar = if self.progress {
                let bar = ProgressBar::new(pending.len() as u64);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                Some(bar)
            } else {
                None
            };

            for batch in pending.chunks(BATCH_SIZE) {
                let inputs: Vec<(PathBuf, String)> = batch
                    .iter()
                    .map(|(_, path, content)| (path.clone(), content.clone()))
                    .collect();

                let outputs = pool.parse_files(inputs);

                for ((index, path, _), outcome) in batch.iter().zip(outputs) {
                    let result = match outcome {
                        Ok(result) => {
                            // Only clean extractions are cached: a pool
                            // failure is not a function of file content
                            if self.config.cache.enabled {
                                cache.set(path, loaded[*index].hash.clone(), result.clone());
                            }
                            result
                        }
                        Err(e) => {
                            warn!("Extraction failed for {}: {}", path.display(), e);
                            ParseResult::with_error(e.to_string())
                        }
                    };
                    results[*index] = Some(result);
                }

                if let Some(bar) = &bar {
                    bar.inc(batch.len() as u64);
                }
            }

            if let Some(bar) = &bar {
                bar.finish_and_clear();
            }
            pool.shutdown();
        }

        results
            .into_iter()
            .map(|slot| slot.unwrap_or_default())
            .collect()
    }
}

/// Convenience wrapper: scan a root with configuration discovered from
/// its default locations.
pub fn scan_project(root: &Path) -> Result<ScanResult> {
    let config = Config::from_default_locations(root)?;
    Scanner::new(root.to_path_buf(), config).scan(&[])
}
