//! Cache behavior across repeated scans of one project tree.

use deadwood::cache::{content_hash, CacheStore};
use deadwood::config::Config;
use deadwood::scanner::Scanner;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn scan(root: &Path) -> deadwood::ScanResult {
    Scanner::new(root.to_path_buf(), Config::default())
        .scan(&[])
        .unwrap()
}

#[test]
fn second_scan_of_unchanged_project_hits_fully() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "import './util';\n");
    write(dir.path(), "src/util.ts", "export {};\n");
    write(dir.path(), "src/orphan.ts", "export const x = 1;\n");

    let first = scan(dir.path());
    assert_eq!(first.cache.hits, 0);
    assert_eq!(first.cache.misses, 3);

    let second = scan(dir.path());
    assert_eq!(second.cache.hits, 3);
    assert_eq!(second.cache.misses, 0);

    // Identical reachable/dead sets on the cached run
    assert_eq!(first.reachable_count, second.reachable_count);
    assert_eq!(
        first.dead_files.iter().map(|d| &d.path).collect::<Vec<_>>(),
        second.dead_files.iter().map(|d| &d.path).collect::<Vec<_>>()
    );
}

#[test]
fn byte_change_forces_a_miss_for_that_file_only() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "import './util';\n");
    write(dir.path(), "src/util.ts", "export {};\n");

    scan(dir.path());
    write(dir.path(), "src/util.ts", "export const changed = 1;\n");

    let second = scan(dir.path());
    assert_eq!(second.cache.hits, 1);
    assert_eq!(second.cache.misses, 1);
}

#[test]
fn disabling_the_cache_skips_persistence() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "export {};\n");

    let mut config = Config::default();
    config.cache.enabled = false;
    Scanner::new(dir.path().to_path_buf(), config.clone())
        .scan(&[])
        .unwrap();

    assert!(!CacheStore::cache_path(dir.path()).exists());

    // And a later cached run starts cold
    let result = Scanner::new(dir.path().to_path_buf(), Config::default())
        .scan(&[])
        .unwrap();
    assert_eq!(result.cache.hits, 0);
}

#[test]
fn deleted_files_are_pruned_from_the_snapshot() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "export {};\n");
    write(dir.path(), "src/gone.ts", "export {};\n");

    scan(dir.path());
    std::fs::remove_file(dir.path().join("src/gone.ts")).unwrap();
    scan(dir.path());

    // Reload the snapshot directly and check the stale entry is gone
    let mut store = CacheStore::load(dir.path());
    assert_eq!(store.stats().entry_count, 1);
    let hash = content_hash(b"export {};\n");
    assert!(store.get(&PathBuf::from("src/main.ts"), &hash).is_some());
}

#[test]
fn corrupted_snapshot_recovers_as_cold_cache() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "export {};\n");

    scan(dir.path());
    std::fs::write(CacheStore::cache_path(dir.path()), "garbage{{{").unwrap();

    let result = scan(dir.path());
    assert_eq!(result.cache.hits, 0);
    assert_eq!(result.cache.misses, 1);
}
