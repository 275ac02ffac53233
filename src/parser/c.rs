//! C/C++ include extraction. Quoted includes resolve relative to the
//! including file; angle-bracket includes always end up external.

use super::common::{ExportDecl, ExportKind, Extractor, Import, ImportKind, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static RE_INCLUDE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*#\s*include\s+"([^"]+)""#).expect("quoted include regex"));

static RE_INCLUDE_ANGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#\s*include\s+<([^>]+)>").expect("angle include regex"));

static RE_FUNC_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\w[\w\s*]*?)\s+\**(\w+)\s*\([^;]*$").expect("function def regex")
});

pub struct CExtractor;

impl Extractor for CExtractor {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult {
        let mut result = ParseResult::new();

        for (line_idx, line) in content.lines().enumerate() {
            let lineno = line_idx + 1;
            let trimmed = line.trim_start();

            if trimmed.starts_with("//") || trimmed.starts_with('*') || trimmed.starts_with("/*") {
                continue;
            }

            if let Some(caps) = RE_INCLUDE_QUOTED.captures(line) {
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

            if let Some(caps) = RE_INCLUDE_ANGLE.captures(line) {
                result
                    .imports
                    .push(Import::new(&caps[1], ImportKind::Include, lineno));
                continue;
            }

            // Heuristic: top-level function definitions double as exports
            if !line.starts_with(char::is_whitespace)
                && !trimmed.starts_with('#')
                && line.contains('(')
                && !trimmed.starts_with("if")
                && !trimmed.starts_with("for")
                && !trimmed.starts_with("while")
                && !trimmed.starts_with("switch")
                && !trimmed.starts_with("return")
            {
                if let Some(caps) = RE_FUNC_DEF.captures(line) {
                    result
                        .exports
                        .push(ExportDecl::new(&caps[1], ExportKind::Named, lineno));
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> ParseResult {
        CExtractor.parse(Path::new("main.c"), content)
    }

    #[test]
    fn quoted_includes_are_relative() {
        let result = parse("#include \"util.h\"\n#include \"../shared/log.h\"\n");
        let specs: Vec<_> = result.imports.iter().map(|i| i.specifier.as_str()).collect();
        assert_eq!(specs, vec!["./util.h", "../shared/log.h"]);
        assert!(result.imports.iter().all(|i| i.kind == ImportKind::Include));
    }

    #[test]
    fn angle_includes_keep_bare_specifier() {
        let result = parse("#include <stdio.h>\n");
        assert_eq!(result.imports[0].specifier, "stdio.h");
    }

    #[test]
    fn function_definitions_are_exports() {
        let result = parse("int main(int argc, char **argv) {\n    return 0;\n}\n");
        assert_eq!(result.exports[0].name, "main");
    }
}
