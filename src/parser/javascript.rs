//! JavaScript/TypeScript import and export extraction.
//!
//! Lexical line scanning, deliberately best-effort: imports declared
//! inside template literals or multi-line expressions may be missed.

use super::common::{ExportDecl, ExportKind, Extractor, Import, ImportKind, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

// Static imports: import X from 'y'; import { A } from 'y'; import 'y'
static RE_STATIC_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*import\s+(?:(?:type\s+)?(?:\{[^}]*\}|\*\s+as\s+\w+|\w+(?:\s*,\s*\{[^}]*\})?)\s+from\s+)?['"]([^'"]+)['"]"#,
    )
    .expect("static import regex")
});

// Dynamic imports: import('...')
static RE_DYNAMIC_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("dynamic import regex"));

// Re-exports: export { ... } from '...'; export * from '...'
static RE_REEXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*export\s+(?:(?:type\s+)?\{[^}]*\}\s+from|\*\s+(?:as\s+\w+\s+)?from)\s+['"]([^'"]+)['"]"#,
    )
    .expect("reexport regex")
});

// CommonJS require: require('...')
static RE_REQUIRE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[=\s(,])require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("require regex")
});

// Named exports: export const/let/var/function/class/enum/interface/type
static RE_NAMED_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*export\s+(?:declare\s+)?(?:const|let|var|async\s+function\*?|function\*?|class|enum|interface|type|abstract\s+class)\s+(\w+)"#,
    )
    .expect("named export regex")
});

static RE_DEFAULT_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*export\s+default\s+"#).expect("default export regex"));

pub struct JavaScriptExtractor;

impl Extractor for JavaScriptExtractor {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult {
        let mut result = ParseResult::new();

        for (line_idx, line) in content.lines().enumerate() {
            let lineno = line_idx + 1;
            let trimmed = line.trim();

            if trimmed.starts_with("//") || trimmed.starts_with('*') || trimmed.starts_with("/*") {
                continue;
            }

            // Re-exports before static imports to avoid double-counting
            if let Some(caps) = RE_REEXPORT.captures(line) {
                let spec = caps[1].to_string();
                result
                    .imports
                    .push(Import::new(spec.clone(), ImportKind::ReExport, lineno));
                let kind = if line.contains('*') {
                    ExportKind::Namespace
                } else {
                    ExportKind::ReExport
                };
                result.exports.push(ExportDecl::new(spec, kind, lineno));
                continue;
            }

            if let Some(caps) = RE_STATIC_IMPORT.captures(line) {
                let kind = if trimmed.starts_with("import '") || trimmed.starts_with("import \"") {
                    ImportKind::SideEffect
                } else {
                    ImportKind::Static
                };
                result.imports.push(Import::new(&caps[1], kind, lineno));
            }

            for caps in RE_DYNAMIC_IMPORT.captures_iter(line) {
                result
                    .imports
                    .push(Import::new(&caps[1], ImportKind::Dynamic, lineno));
            }

            for caps in RE_REQUIRE.captures_iter(line) {
                result
                    .imports
                    .push(Import::new(&caps[1], ImportKind::Require, lineno));
            }

            if let Some(caps) = RE_NAMED_EXPORT.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            }

            if RE_DEFAULT_EXPORT.is_match(line) {
                result
                    .exports
                    .push(ExportDecl::new("default", ExportKind::Default, lineno));
            }
        }

        result
    }
}
