//! Java and Kotlin import extraction. One extractor serves both: the
//! import/package syntax is close enough for lexical matching.

use super::common::{ExportDecl, ExportKind, Extractor, Import, ImportKind, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static RE_PACKAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^package\s+([\w.]+)").expect("package regex"));

static RE_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^import\s+(?:static\s+)?([\w.]+)(?:\.\*)?\s*(?:as\s+\w+)?\s*;?\s*$")
        .expect("import regex")
});

static RE_TYPE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:public\s+|open\s+|internal\s+|abstract\s+|final\s+|data\s+|sealed\s+)*(?:class|interface|enum(?:\s+class)?|object|record)\s+(\w+)",
    )
    .expect("type decl regex")
});

static RE_TOP_FUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:suspend\s+)?fun\s+(?:<[^>]+>\s+)?(\w+)").expect("fun regex"));

static RE_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*@(\w+)").expect("annotation regex"));

pub struct JvmExtractor;

impl Extractor for JvmExtractor {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult {
        let mut result = ParseResult::new();

        for (line_idx, line) in content.lines().enumerate() {
            let lineno = line_idx + 1;
            let trimmed = line.trim_start();

            if trimmed.starts_with("//") || trimmed.starts_with('*') || trimmed.starts_with("/*") {
                continue;
            }

            if let Some(caps) = RE_IMPORT.captures(line) {
                result.imports.push(Import::new(
                    caps[1].replace('.', "/"),
                    ImportKind::Static,
                    lineno,
                ));
                continue;
            }

            if let Some(caps) = RE_PACKAGE.captures(line) {
                result.metadata.package = Some(caps[1].to_string());
            }

            if let Some(caps) = RE_TYPE_DECL.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            }

            // Kotlin top-level functions
            if let Some(caps) = RE_TOP_FUN.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            }

            if let Some(caps) = RE_ANNOTATION.captures(line) {
                result.annotations.push(caps[1].to_string());
            }
        }

        result
    }
}
