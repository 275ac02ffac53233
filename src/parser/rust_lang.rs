//! Rust module extraction.
//!
//! File-level reachability in Rust flows through `mod` declarations, so
//! those become the import edges; `use` paths stay within already-declared
//! modules and are ignored here.

use super::common::{ExportDecl, ExportKind, Extractor, Import, ImportKind, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static RE_MOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:pub(?:\([\w: ]+\))?\s+)?mod\s+(\w+)\s*;").expect("mod regex"));

static RE_PUB_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*pub(?:\([\w: ]+\))?\s+(?:async\s+|unsafe\s+|const\s+)*(?:fn|struct|enum|trait|type|mod|const|static|union)\s+(\w+)",
    )
    .expect("pub item regex")
});

static RE_PUB_USE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*pub(?:\([\w: ]+\))?\s+use\s+([\w:]+)").expect("pub use regex")
});

static RE_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*#\[(\w+)").expect("attr regex"));

pub struct RustExtractor;

impl Extractor for RustExtractor {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult {
        let mut result = ParseResult::new();

        for (line_idx, line) in content.lines().enumerate() {
            let lineno = line_idx + 1;
            let trimmed = line.trim_start();

            if trimmed.starts_with("//") {
                continue;
            }

            if let Some(caps) = RE_MOD.captures(line) {
                result.imports.push(Import::new(
                    format!("./{}", &caps[1]),
                    ImportKind::Static,
                    lineno,
                ));
            }

            if let Some(caps) = RE_PUB_ITEM.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            }

            if let Some(caps) = RE_PUB_USE.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::ReExport, lineno));
            }

            if let Some(caps) = RE_ATTR.captures(line) {
                result.annotations.push(caps[1].to_string());
            }
        }

        result
    }
}
