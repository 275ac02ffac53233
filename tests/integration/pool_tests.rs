//! Worker pool behavior through the public API, with scripted extractors
//! registered the same way callers plug in their own languages.

use deadwood::discovery::Language;
use deadwood::parser::{Extractor, ParseResult, ParserRegistry};
use deadwood::pool::{PoolError, WorkerPool};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Delays on `sleep:<ms>` lines, crashes on a `panic` line.
struct ScriptedExtractor;

impl Extractor for ScriptedExtractor {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult {
        for line in content.lines() {
            if let Some(ms) = line.strip_prefix("sleep:") {
                std::thread::sleep(Duration::from_millis(ms.trim().parse().unwrap_or(0)));
            }
            if line == "panic" {
                panic!("scripted extractor crash");
            }
        }
        let mut result = ParseResult::new();
        result.metadata.package = Some(content.trim().to_string());
        result
    }
}

fn scripted_pool(size: usize) -> WorkerPool {
    let mut registry = ParserRegistry::new();
    registry.register(Language::Python, Box::new(ScriptedExtractor));
    WorkerPool::new(Arc::new(registry), size)
}

#[test]
fn batch_results_are_positional_even_when_later_tasks_finish_first() {
    let mut pool = scripted_pool(3);

    // f1 is the slowest by far; f3 completes first
    let files = vec![
        (PathBuf::from("f1.py"), "sleep:120\nfirst".to_string()),
        (PathBuf::from("f2.py"), "sleep:40\nsecond".to_string()),
        (PathBuf::from("f3.py"), "third".to_string()),
    ];

    let results = pool.parse_files(files);

    let packages: Vec<_> = results
        .into_iter()
        .map(|r| r.unwrap().metadata.package.unwrap())
        .collect();
    assert_eq!(packages, vec!["sleep:120\nfirst", "sleep:40\nsecond", "third"]);
}

#[test]
fn killed_executor_is_replaced_for_subsequent_tasks() {
    let mut pool = scripted_pool(2);

    let poisoned = pool.parse_file(PathBuf::from("boom.py"), "panic".to_string());
    assert!(matches!(
        poisoned.wait_timeout(Duration::from_secs(5)),
        Err(PoolError::Extraction(_))
    ));

    // Dispatch more tasks than slots so every executor, including the
    // replacement, must participate.
    let files: Vec<_> = (0..6)
        .map(|i| (PathBuf::from(format!("f{}.py", i)), format!("pkg{}", i)))
        .collect();
    let results = pool.parse_files(files);
    assert!(results.iter().all(|r| r.is_ok()));
}

#[test]
fn large_batch_completes_with_small_pool() {
    let mut pool = scripted_pool(2);
    let files: Vec<_> = (0..200)
        .map(|i| (PathBuf::from(format!("f{}.py", i)), format!("p{}", i)))
        .collect();

    let results = pool.parse_files(files);
    assert_eq!(results.len(), 200);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(
            result.as_ref().unwrap().metadata.package.as_deref(),
            Some(format!("p{}", i).as_str())
        );
    }
}

#[test]
fn default_registry_parses_real_sources_in_parallel() {
    let registry = Arc::new(ParserRegistry::with_default_extractors());
    let mut pool = WorkerPool::new(registry, 4);

    let results = pool.parse_files(vec![
        (
            PathBuf::from("a.ts"),
            "import { x } from './b';\nexport const a = x;\n".to_string(),
        ),
        (PathBuf::from("b.py"), "from .c import thing\n".to_string()),
        (PathBuf::from("c.go"), "package main\nimport \"fmt\"\n".to_string()),
    ]);

    assert_eq!(results[0].as_ref().unwrap().imports[0].specifier, "./b");
    assert_eq!(results[1].as_ref().unwrap().imports[0].specifier, "./c");
    assert_eq!(results[2].as_ref().unwrap().imports[0].specifier, "fmt");
}
