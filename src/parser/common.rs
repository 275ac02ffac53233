// Shared extraction model - every language extractor produces these types

use serde::{Deserialize, Serialize};
use std::path::Path;

/// How an import was declared in source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportKind {
    /// Module-level import statement (`import`, `use`, `from .. import`)
    Static,
    /// Runtime import expression (`import(...)`, lazy loads)
    Dynamic,
    /// Re-export (`export .. from`, `pub use`)
    ReExport,
    /// CommonJS-style `require(...)`
    Require,
    /// Preprocessor/interpreter include (`#include`, `require_relative`)
    Include,
    /// Import evaluated only for its side effects (`import './setup'`)
    SideEffect,
}

/// A declared import, unresolved until processed by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Raw specifier string as written in source (e.g. `./utils`, `react`)
    pub specifier: String,
    pub kind: ImportKind,
    /// 1-based line the declaration was found on
    pub line: usize,
}

impl Import {
    pub fn new(specifier: impl Into<String>, kind: ImportKind, line: usize) -> Self {
        Self {
            specifier: specifier.into(),
            kind,
            line,
        }
    }
}

/// Kind of exported symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    Named,
    Default,
    Namespace,
    ReExport,
}

/// A single exported symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDecl {
    pub name: String,
    pub kind: ExportKind,
    pub line: usize,
}

impl ExportDecl {
    pub fn new(name: impl Into<String>, kind: ExportKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            line,
        }
    }
}

/// Per-file facts that are not imports or exports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseMetadata {
    /// Total source lines, for reporting
    pub lines: usize,
    /// Declared package/namespace, when the language has one
    pub package: Option<String>,
    /// Set when extraction failed internally; the file is then treated as
    /// having no imports or exports
    pub error: Option<String>,
}

/// Uniform result of extracting one source file.
///
/// Must be a pure function of file content: identical bytes always
/// reproduce an identical result. The cache depends on this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Declared imports, in source order
    pub imports: Vec<Import>,
    /// Declared exports, in source order
    pub exports: Vec<ExportDecl>,
    /// Decorators/attributes seen at top level (best-effort)
    pub annotations: Vec<String>,
    pub metadata: ParseMetadata,
}

impl ParseResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty result recording an internal extraction failure
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            metadata: ParseMetadata {
                error: Some(message.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Trait for language-specific import/export extractors.
///
/// Implementations must never panic or return an error: any internal
/// failure is recorded in `ParseResult.metadata.error` instead. They must
/// also be pure functions of `(path, content)`, required for cache
/// correctness.
pub trait Extractor: Send + Sync {
    fn parse(&self, path: &Path, content: &str) -> ParseResult;
}
