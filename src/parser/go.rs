//! Go import extraction, including parenthesized import blocks.

use super::common::{ExportDecl, ExportKind, Extractor, Import, ImportKind, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static RE_PACKAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^package\s+(\w+)").expect("package regex"));

static RE_IMPORT_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^import\s+(?:\w+\s+|\.\s+|_\s+)?"([^"]+)""#).expect("import regex"));

static RE_IMPORT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*(?:\w+\s+|\.\s+|_\s+)?"([^"]+)""#).expect("import line regex"));

static RE_EXPORTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:func(?:\s+\([^)]*\))?|type|var|const)\s+([A-Z]\w*)").expect("exported regex")
});

pub struct GoExtractor;

impl Extractor for GoExtractor {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult {
        let mut result = ParseResult::new();
        let mut in_import_block = false;

        for (line_idx, line) in content.lines().enumerate() {
            let lineno = line_idx + 1;
            let trimmed = line.trim();

            if trimmed.starts_with("//") {
                continue;
            }

            if in_import_block {
                if trimmed.starts_with(')') {
                    in_import_block = false;
                } else if let Some(caps) = RE_IMPORT_LINE.captures(line) {
                    result
                        .imports
                        .push(Import::new(&caps[1], ImportKind::Static, lineno));
                }
                continue;
            }

            if trimmed == "import (" || trimmed.starts_with("import (") {
                in_import_block = true;
                continue;
            }

            if let Some(caps) = RE_IMPORT_SINGLE.captures(line) {
                result
                    .imports
                    .push(Import::new(&caps[1], ImportKind::Static, lineno));
            }

            if let Some(caps) = RE_PACKAGE.captures(line) {
                result.metadata.package = Some(caps[1].to_string());
            }

            if let Some(caps) = RE_EXPORTED.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            }
        }

        result
    }
}
