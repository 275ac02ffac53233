//! Ruby require extraction.

use super::common::{ExportDecl, ExportKind, Extractor, Import, ImportKind, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static RE_REQUIRE_RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*require_relative\s+['"]([^'"]+)['"]"#).expect("require_relative regex")
});

static RE_REQUIRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*require\s+['"]([^'"]+)['"]"#).expect("require regex"));

static RE_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*def\s+(?:self\.)?(\w+[?!]?)").expect("def regex"));

static RE_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:class|module)\s+(\w+)").expect("class/module regex"));

pub struct RubyExtractor;

impl Extractor for RubyExtractor {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult {
        let mut result = ParseResult::new();

        for (line_idx, line) in content.lines().enumerate() {
            let lineno = line_idx + 1;

            if line.trim_start().starts_with('#') {
                continue;
            }

            if let Some(caps) = RE_REQUIRE_RELATIVE.captures(line) {
                let spec = &caps[1];
                let specifier = if spec.starts_with("./") || spec.starts_with("../") {
                    spec.to_string()
                } else {
                    format!("./{}", spec)
                };
                result
                    .imports
                    .push(Import::new(specifier, ImportKind::Include, lineno));
                continue;
            }

            if let Some(caps) = RE_REQUIRE.captures(line) {
                result
                    .imports
                    .push(Import::new(&caps[1], ImportKind::Require, lineno));
                continue;
            }

            if let Some(caps) = RE_TYPE.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            } else if let Some(caps) = RE_DEF.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            }
        }

        result
    }
}
