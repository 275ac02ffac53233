//! End-to-end pipeline tests over on-disk fixture trees.

use deadwood::analysis::Verdict;
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
    let config = Config::default();
    Scanner::new(root.to_path_buf(), config).scan(&[]).unwrap()
}

#[test]
fn orphan_file_is_unreachable_with_high_confidence() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "import { helper } from './util';\nhelper();\n");
    write(dir.path(), "src/util.ts", "import { inner } from './helper';\nexport const helper = inner;\n");
    write(dir.path(), "src/helper.ts", "export const inner = 1;\n");
    write(dir.path(), "src/orphan.ts", "const unused = true;\n");

    let result = scan(dir.path());

    assert_eq!(result.total_files, 4);
    assert!(result.entry_points.contains(&PathBuf::from("src/main.ts")));
    assert_eq!(result.reachable_count, 3);

    assert_eq!(result.dead_files.len(), 1);
    let orphan = &result.dead_files[0];
    assert_eq!(orphan.path, PathBuf::from("src/orphan.ts"));
    assert_eq!(orphan.verdict, Verdict::Unreachable);
    assert_eq!(orphan.evidence.label.as_str(), "high");
    assert_eq!(orphan.evidence.entry_points_reaching, 0);
}

#[test]
fn dead_subgraph_is_partially_unreachable() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.py", "print('entry')\n");
    // legacy_a and legacy_b import each other; nothing reachable imports them
    write(dir.path(), "src/legacy_a.py", "from .legacy_b import b\n");
    write(dir.path(), "src/legacy_b.py", "from .legacy_a import a\n");

    let result = scan(dir.path());

    assert_eq!(result.dead_files.len(), 2);
    for dead in &result.dead_files {
        assert_eq!(dead.verdict, Verdict::PartiallyUnreachable);
        assert_eq!(dead.evidence.incoming_edges, 1);
        assert_eq!(dead.evidence.incoming_reachable, 0);
    }
}

#[test]
fn dynamic_pattern_downgrades_to_possibly_live() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.js", "console.log('entry');\n");
    write(dir.path(), "plugins/extra.js", "module.exports = {};\n");

    let result = scan(dir.path());

    assert_eq!(result.dead_files.len(), 1);
    let plugin = &result.dead_files[0];
    assert_eq!(plugin.verdict, Verdict::PossiblyLive);
    assert!(plugin.evidence.confidence <= 0.35);
    assert!(plugin.evidence.dynamic_match.is_some());
}

#[test]
fn workspace_package_imports_link_across_packages() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "packages/core/package.json",
        r#"{"name": "@acme/core", "main": "./src/index.ts"}"#,
    );
    write(dir.path(), "packages/core/src/index.ts", "export * from './api';\n");
    write(dir.path(), "packages/core/src/api.ts", "export const api = 1;\n");
    write(
        dir.path(),
        "apps/web/src/main.ts",
        "import { api } from '@acme/core';\nconsole.log(api);\n",
    );

    let result = scan(dir.path());

    // Everything hangs off the app entry or the package manifest entry
    assert!(result.dead_files.is_empty(), "dead: {:?}", result.dead_files);
}

#[test]
fn rescan_of_unchanged_project_is_identical() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "import './used';\n");
    write(dir.path(), "src/used.ts", "export {};\n");
    write(dir.path(), "src/dead.ts", "export const gone = 1;\n");

    let first = scan(dir.path());
    let second = scan(dir.path());

    assert_eq!(first.reachable_count, second.reachable_count);
    assert_eq!(
        first
            .dead_files
            .iter()
            .map(|d| d.path.clone())
            .collect::<Vec<_>>(),
        second
            .dead_files
            .iter()
            .map(|d| d.path.clone())
            .collect::<Vec<_>>()
    );
    assert_eq!(first.entry_points, second.entry_points);
}

#[test]
fn unparseable_file_does_not_abort_the_scan() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.rs", "mod util;\nfn main() {}\n");
    write(dir.path(), "src/util.rs", "pub fn x() {}\n");
    // Binary junk with a source extension
    std::fs::write(dir.path().join("src/junk.py"), [0xff_u8, 0xfe, 0x00, 0x01]).unwrap();

    let result = scan(dir.path());
    assert_eq!(result.total_files, 3);
}
