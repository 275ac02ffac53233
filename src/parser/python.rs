//! Python import extraction.
//!
//! Dotted module paths are rewritten to path-ish specifiers at extraction
//! time (`from .sub import x` → `./sub`, `import pkg.mod` → `pkg/mod`) so
//! the resolver applies one policy across ecosystems.

use super::common::{ExportDecl, ExportKind, Extractor, Import, ImportKind, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static RE_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^import\s+([\w.]+(?:\s*,\s*[\w.]+)*)").expect("import regex"));

static RE_FROM_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^from\s+(\.*)([\w.]*)\s+import\s+(.+)").expect("from-import regex")
});

static RE_DYNAMIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"importlib\.import_module\(\s*['"]([\w.]+)['"]"#).expect("dynamic import regex")
});

static RE_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:async\s+)?def\s+(\w+)").expect("def regex"));

static RE_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^class\s+(\w+)").expect("class regex"));

static RE_DECORATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([\w.]+)").expect("decorator regex"));

/// Turn `N` leading dots plus a dotted tail into a path-ish specifier:
/// one dot is the current package, each further dot walks one level up.
fn relative_specifier(dots: usize, tail: &str) -> String {
    let prefix = if dots <= 1 {
        "./".to_string()
    } else {
        "../".repeat(dots - 1)
    };

    if tail.is_empty() {
        prefix.trim_end_matches('/').to_string()
    } else {
        format!("{}{}", prefix, tail.replace('.', "/"))
    }
}

pub struct PythonExtractor;

impl Extractor for PythonExtractor {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult {
        let mut result = ParseResult::new();

        for (line_idx, line) in content.lines().enumerate() {
            let lineno = line_idx + 1;

            if line.trim_start().starts_with('#') {
                continue;
            }

            if let Some(caps) = RE_FROM_IMPORT.captures(line) {
                let dots = caps[1].len();
                let module = &caps[2];
                let names = &caps[3];

                if dots > 0 {
                    if module.is_empty() {
                        // `from . import sibling` - each name is a module
                        for name in names.split(',') {
                            let name = name.trim().split_whitespace().next().unwrap_or("");
                            if !name.is_empty() && name != "(" {
                                result.imports.push(Import::new(
                                    relative_specifier(dots, name),
                                    ImportKind::Static,
                                    lineno,
                                ));
                            }
                        }
                    } else {
                        result.imports.push(Import::new(
                            relative_specifier(dots, module),
                            ImportKind::Static,
                            lineno,
                        ));
                    }
                } else {
                    result.imports.push(Import::new(
                        module.replace('.', "/"),
                        ImportKind::Static,
                        lineno,
                    ));
                }
                continue;
            }

            if let Some(caps) = RE_IMPORT.captures(line) {
                for module in caps[1].split(',') {
                    let module = module.trim();
                    if !module.is_empty() {
                        result.imports.push(Import::new(
                            module.replace('.', "/"),
                            ImportKind::Static,
                            lineno,
                        ));
                    }
                }
            }

            for caps in RE_DYNAMIC.captures_iter(line) {
                result.imports.push(Import::new(
                    caps[1].replace('.', "/"),
                    ImportKind::Dynamic,
                    lineno,
                ));
            }

            // Only column-zero definitions are module exports
            if let Some(caps) = RE_DEF.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            }
            if let Some(caps) = RE_CLASS.captures(line) {
                result
                    .exports
                    .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
            }
            if let Some(caps) = RE_DECORATOR.captures(line) {
                result.annotations.push(caps[1].to_string());
            }
        }

        result
    }
}
