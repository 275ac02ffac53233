//! CLI smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn fixture_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "import { u } from './util';\nu();\n");
    write(dir.path(), "src/util.ts", "export const u = () => {};\n");
    write(dir.path(), "src/orphan.ts", "export const unused = 1;\n");
    dir
}

#[test]
fn reports_dead_files_on_terminal() {
    let dir = fixture_project();

    Command::cargo_bin("deadwood")
        .unwrap()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("src/orphan.ts"))
        .stdout(predicate::str::contains("unreachable"));
}

#[test]
fn json_format_emits_machine_readable_report() {
    let dir = fixture_project();

    Command::cargo_bin("deadwood")
        .unwrap()
        .arg(dir.path())
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dead_count\": 1"))
        .stdout(predicate::str::contains("src/orphan.ts"));
}

#[test]
fn fail_on_dead_sets_exit_code() {
    let dir = fixture_project();

    Command::cargo_bin("deadwood")
        .unwrap()
        .arg(dir.path())
        .arg("--fail-on-dead")
        .assert()
        .failure();
}

#[test]
fn clean_project_passes_fail_on_dead() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "import './util';\n");
    write(dir.path(), "src/util.ts", "export {};\n");

    Command::cargo_bin("deadwood")
        .unwrap()
        .arg(dir.path())
        .arg("--fail-on-dead")
        .assert()
        .success()
        .stdout(predicate::str::contains("No dead files found"));
}

#[test]
fn extra_entry_rescues_a_file() {
    let dir = fixture_project();

    Command::cargo_bin("deadwood")
        .unwrap()
        .arg(dir.path())
        .args(["--entry", "src/orphan.ts", "--fail-on-dead"])
        .assert()
        .success();
}

#[test]
fn markdown_report_writes_to_output_file() {
    let dir = fixture_project();
    let report = dir.path().join("report.md");

    Command::cargo_bin("deadwood")
        .unwrap()
        .arg(dir.path())
        .args(["--format", "markdown", "--output"])
        .arg(&report)
        .assert()
        .success();

    let markdown = std::fs::read_to_string(&report).unwrap();
    assert!(markdown.contains("# Dead file report"));
    assert!(markdown.contains("src/orphan.ts"));
}

#[test]
fn missing_project_root_is_a_fatal_error() {
    Command::cargo_bin("deadwood")
        .unwrap()
        .arg("/definitely/not/a/real/path")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project root not found"));
}
