//! Per-language import extraction behind a uniform registry.
//!
//! Each source language gets one `Extractor` implementation; the registry
//! dispatches on the file's language tag so the orchestrator never
//! branches on language itself.

mod c;
mod common;
mod go;
mod javascript;
mod jvm;
mod php;
mod python;
mod ruby;
mod rust_lang;

pub use c::CExtractor;
pub use common::{
    ExportDecl, ExportKind, Extractor, Import, ImportKind, ParseMetadata, ParseResult,
};
pub use go::GoExtractor;
pub use javascript::JavaScriptExtractor;
pub use jvm::JvmExtractor;
pub use php::PhpExtractor;
pub use python::PythonExtractor;
pub use ruby::RubyExtractor;
pub use rust_lang::RustExtractor;

use crate::discovery::Language;
use std::collections::HashMap;
use std::path::Path;

/// Maps a language tag to its extractor. Unknown tags produce an empty
/// result rather than an error: extraction is never fatal.
pub struct ParserRegistry {
    extractors: HashMap<Language, Box<dyn Extractor>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry covering every built-in language
    pub fn with_default_extractors() -> Self {
        let mut registry = Self::new();
        registry.register(Language::JavaScript, Box::new(JavaScriptExtractor));
        registry.register(Language::TypeScript, Box::new(JavaScriptExtractor));
        registry.register(Language::Python, Box::new(PythonExtractor));
        registry.register(Language::Rust, Box::new(RustExtractor));
        registry.register(Language::Go, Box::new(GoExtractor));
        registry.register(Language::Java, Box::new(JvmExtractor));
        registry.register(Language::Kotlin, Box::new(JvmExtractor));
        registry.register(Language::C, Box::new(CExtractor));
        registry.register(Language::Cpp, Box::new(CExtractor));
        registry.register(Language::Ruby, Box::new(RubyExtractor));
        registry.register(Language::Php, Box::new(PhpExtractor));
        registry
    }

    pub fn register(&mut self, language: Language, extractor: Box<dyn Extractor>) {
        self.extractors.insert(language, extractor);
    }

    pub fn supports(&self, language: Language) -> bool {
        self.extractors.contains_key(&language)
    }

    /// Extract imports/exports from one file. Never fails: an unknown
    /// language yields an empty result with a metadata note. The line
    /// count is filled in centrally so extractors don't repeat it.
    pub fn parse(&self, path: &Path, content: &str) -> ParseResult {
        let mut result = match Language::from_path(path) {
            Some(language) => match self.extractors.get(&language) {
                Some(extractor) => extractor.parse(path, content),
                None => ParseResult::with_error(format!("no extractor for {}", language)),
            },
            None => ParseResult::with_error("unclassified file"),
        };

        result.metadata.lines = content.lines().count();
        result
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_default_extractors()
    }
}
