//! Resolver behavior through the public API and through full scans with
//! configuration files on disk.

use deadwood::config::Config;
use deadwood::resolver::{PathAlias, Resolution, Resolver, WorkspacePackage};
use deadwood::scanner::Scanner;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn known(paths: &[&str]) -> HashSet<PathBuf> {
    paths.iter().map(PathBuf::from).collect()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn alias_resolves_from_any_importer() {
    let resolver = Resolver::new(
        vec![".ts".into(), ".js".into()],
        vec!["index".into()],
        vec![PathAlias {
            pattern: "@app/*".into(),
            replacement: "src/*".into(),
        }],
        vec![],
        known(&["src/util.ts"]),
    );

    for importer in ["src", "apps/web", "deep/nested/dir", ""] {
        assert_eq!(
            resolver.resolve("@app/util", Path::new(importer)),
            Resolution::Internal(PathBuf::from("src/util.ts")),
            "importer: {}",
            importer
        );
    }
}

#[test]
fn resolution_is_independent_of_probe_history() {
    let resolver = Resolver::new(
        vec![".ts".into()],
        vec!["index".into()],
        vec![],
        vec![],
        known(&["src/a.ts", "src/b.ts", "src/b/index.ts"]),
    );

    // Interleave resolutions in different orders; answers never change
    let expect_b = Resolution::Internal(PathBuf::from("src/b.ts"));
    let expect_a = Resolution::Internal(PathBuf::from("src/a.ts"));

    assert_eq!(resolver.resolve("./b", Path::new("src")), expect_b);
    assert_eq!(resolver.resolve("./a", Path::new("src")), expect_a);
    assert_eq!(resolver.resolve("./b", Path::new("src")), expect_b);
}

#[test]
fn scoped_package_deep_import() {
    let resolver = Resolver::new(
        vec![".ts".into()],
        vec!["index".into()],
        vec![],
        vec![WorkspacePackage {
            name: "@acme/ui".into(),
            dir: PathBuf::from("packages/ui"),
            entry: "index.ts".into(),
        }],
        known(&["packages/ui/index.ts", "packages/ui/button/index.ts"]),
    );

    assert_eq!(
        resolver.resolve("@acme/ui/button", Path::new("apps/web")),
        Resolution::Internal(PathBuf::from("packages/ui/button/index.ts"))
    );
}

#[test]
fn configured_alias_applies_in_full_scan() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        ".deadwood.yml",
        "resolver:\n  aliases:\n    - pattern: \"@app/*\"\n      replacement: \"src/*\"\n",
    );
    write(
        dir.path(),
        "src/main.ts",
        "import { helper } from '@app/util';\nhelper();\n",
    );
    write(dir.path(), "src/util.ts", "export const helper = () => {};\n");

    let config = Config::from_default_locations(dir.path()).unwrap();
    let result = Scanner::new(dir.path().to_path_buf(), config)
        .scan(&[])
        .unwrap();

    // util is reachable through the alias, so nothing is dead
    assert!(result.dead_files.is_empty(), "dead: {:?}", result.dead_files);
    assert_eq!(result.reachable_count, 2);
}

#[test]
fn malformed_alias_fails_fast() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        ".deadwood.yml",
        "resolver:\n  aliases:\n    - pattern: \"@a/*/x/*\"\n      replacement: \"src/*\"\n",
    );
    write(dir.path(), "src/main.ts", "export {};\n");

    let result = Config::from_default_locations(dir.path());
    assert!(result.is_err());
}

#[test]
fn malformed_workspace_manifest_fails_fast() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "package.json", "{ definitely not json");
    write(dir.path(), "src/main.ts", "export {};\n");

    let config = Config::default();
    let result = Scanner::new(dir.path().to_path_buf(), config).scan(&[]);
    assert!(result.is_err());
}

#[test]
fn quoted_c_include_resolves_within_tree() {
    let resolver = Resolver::new(
        vec![".c".into(), ".h".into()],
        vec![],
        vec![],
        vec![],
        known(&["src/util.h", "src/main.c"]),
    );

    // The extractor rewrites `#include "util.h"` to `./util.h`
    assert_eq!(
        resolver.resolve("./util.h", Path::new("src")),
        Resolution::Internal(PathBuf::from("src/util.h"))
    );
    // Angle includes stay bare and fall through to External
    assert_eq!(resolver.resolve("stdio.h", Path::new("src")), Resolution::External);
}
