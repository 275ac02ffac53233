use crate::config::Config;
use ignore::WalkBuilder;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Source language classification, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Rust,
    Go,
    Java,
    Kotlin,
    C,
    Cpp,
    Ruby,
    Php,
}

impl Language {
    /// Classify a path by extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension {
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "py" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            "go" => Some(Language::Go),
            "java" => Some(Language::Java),
            "kt" | "kts" => Some(Language::Kotlin),
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Some(Language::Cpp),
            "rb" => Some(Language::Ruby),
            "php" => Some(Language::Php),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Ruby => "ruby",
            Language::Php => "php",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discovered source file. Created once at discovery time, immutable after.
#[derive(Debug, Clone)]
pub struct FileHandle {
    /// Path relative to the project root, forward slashes
    pub path: PathBuf,

    /// Absolute on-disk path
    pub absolute_path: PathBuf,

    /// File size in bytes
    pub size_bytes: u64,

    /// Language classification
    pub language: Language,
}

impl FileHandle {
    pub fn new(path: PathBuf, absolute_path: PathBuf, size_bytes: u64, language: Language) -> Self {
        Self {
            path,
            absolute_path,
            size_bytes,
            language,
        }
    }

    /// Load the file contents from disk
    pub fn read_contents(&self) -> Result<String> {
        std::fs::read_to_string(&self.absolute_path).into_diagnostic()
    }

    /// Load the raw bytes from disk (for hashing)
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.absolute_path).into_diagnostic()
    }
}

/// File finder for discovering source files in a project
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Find all source files under the project root.
    ///
    /// Respects gitignore files and the configured exclusion globs. The
    /// result is sorted by relative path so every downstream phase sees a
    /// deterministic order.
    pub fn find_files(&self, root: &Path) -> Result<Vec<FileHandle>> {
        debug!("Scanning for files in: {}", root.display());

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .follow_links(false)
            .build();

        let mut files: Vec<FileHandle> = walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let absolute = entry.path();
                let relative = absolute.strip_prefix(root).unwrap_or(absolute);

                if self.config.should_exclude(relative) {
                    trace!("Excluding: {}", relative.display());
                    return None;
                }

                let language = Language::from_path(absolute)?;
                let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);

                trace!("Found {}: {}", language, relative.display());
                Some(FileHandle::new(
                    relative.to_path_buf(),
                    absolute.to_path_buf(),
                    size_bytes,
                    language,
                ))
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Found {} files", files.len());
        Ok(files)
    }
}
