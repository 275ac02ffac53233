//! PHP include/use extraction.

use super::common::{ExportDecl, ExportKind, Extractor, Import, ImportKind, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static RE_INCLUDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:require|include)(?:_once)?\s*\(?\s*(__DIR__\s*\.\s*)?['"]([^'"]+)['"]"#)
        .expect("include regex")
});

static RE_USE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*use\s+([\w\\]+)\s*(?:as\s+\w+)?\s*;").expect("use regex"));

static RE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:abstract\s+|final\s+)?(?:class|interface|trait|function)\s+(\w+)")
        .expect("decl regex")
});

pub struct PhpExtractor;

impl Extractor for PhpExtractor {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult {
        let mut result = ParseResult::new();

        for (line_idx, line) in content.lines().enumerate() {
            let lineno = line_idx + 1;
            let trimmed = line.trim_start();

            if trimmed.starts_with("//") || trimmed.starts_with('#') || trimmed.starts_with('*') {
                continue;
            }

            for caps in RE_INCLUDE.captures_iter(line) {
                let spec = &caps[2];
                let specifier = if caps.get(1).is_some() {
                    // `__DIR__ . '/x.php'` is relative to the including file
                    format!("./{}", spec.trim_start_matches('/'))
                } else {
                    spec.to_string()
                };
                result
                    .imports
                    .push(Import::new(specifier, ImportKind::Require, lineno));
            }

            if let Some(caps) = RE_USE.captures(line) {
                result.imports.push(Import::new(
                    caps[1].replace('\\', "/"),
                    ImportKind::Static,
                    lineno,
                ));
            }

            if let Some(caps) = RE_DECL.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            }
        }

        result
    }
}
