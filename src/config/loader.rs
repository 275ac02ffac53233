use crate::resolver::PathAlias;
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a deadwood scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Patterns excluded from discovery (in addition to gitignore)
    pub exclude: Vec<String>,

    /// Entry point detection
    pub entry_points: EntryPointConfig,

    /// Specifier resolution
    pub resolver: ResolverConfig,

    /// "Possibly loaded dynamically" patterns; a match downgrades
    /// dead-code confidence
    pub dynamic: DynamicConfig,

    /// Worker pool sizing
    pub pool: PoolConfig,

    /// Parse cache
    pub cache: CacheConfig,

    /// Report rendering
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryPointConfig {
    /// Ordered structural patterns; files matching any are traversal
    /// roots
    pub patterns: Vec<String>,

    /// Explicit entry files, project-relative
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Extension probe order
    pub extensions: Vec<String>,

    /// Directory index file stems, probed under the same extension list
    pub index_names: Vec<String>,

    /// Ordered path aliases, first match wins
    pub aliases: Vec<PathAlias>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicConfig {
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Executor count; None means available parallelism minus one
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json, markdown
    pub format: String,

    /// Include the evidence bundle per finding
    pub show_evidence: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: vec![
                "node_modules".to_string(),
                "target".to_string(),
                "dist".to_string(),
                "build".to_string(),
                "out".to_string(),
                "vendor".to_string(),
                "coverage".to_string(),
                "__pycache__".to_string(),
                "*.min.js".to_string(),
            ],
            entry_points: EntryPointConfig::default(),
            resolver: ResolverConfig::default(),
            dynamic: DynamicConfig::default(),
            pool: PoolConfig::default(),
            cache: CacheConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for EntryPointConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                "**/src/main.*".to_string(),
                "**/src/index.*".to_string(),
                "**/src/cli.*".to_string(),
                "**/main.*".to_string(),
                "**/app.*".to_string(),
                "bin/**".to_string(),
                "cli/**".to_string(),
                "cmd/**".to_string(),
                "**/commands/**".to_string(),
                "scripts/**".to_string(),
                "**/routes/**".to_string(),
                "**/controllers/**".to_string(),
                "**/handlers/**".to_string(),
                "pages/**".to_string(),
                "**/tests/**".to_string(),
                "**/*test*".to_string(),
                "**/*spec*".to_string(),
            ],
            files: vec![],
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extensions: vec![
                ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".py", ".rs", ".go", ".java",
                ".kt", ".rb", ".php", ".c", ".h", ".cpp", ".hpp",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            index_names: vec!["index", "mod", "main", "__init__"]
                .into_iter()
                .map(String::from)
                .collect(),
            aliases: vec![],
        }
    }
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                "**/plugins/**".to_string(),
                "plugins/**".to_string(),
                "**/templates/**".to_string(),
                "templates/**".to_string(),
                "**/migrations/**".to_string(),
                "**/*plugin*".to_string(),
            ],
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { workers: None }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            show_evidence: true,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Config = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config")?,
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config")?,
            _ => {
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    config
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")?
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Try default config locations under the project root
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".deadwood.yml",
            ".deadwood.yaml",
            ".deadwood.toml",
            "deadwood.yml",
            "deadwood.yaml",
            "deadwood.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Fail fast on configuration that would silently corrupt resolution
    /// accuracy for the whole run.
    pub fn validate(&self) -> Result<()> {
        for alias in &self.resolver.aliases {
            if alias.pattern.is_empty() {
                return Err(miette!("Alias with empty pattern (replacement: '{}')", alias.replacement));
            }
            if alias.pattern.matches('*').count() > 1 {
                return Err(miette!(
                    "Alias pattern '{}' has more than one wildcard",
                    alias.pattern
                ));
            }
            if alias.replacement.matches('*').count() > 1 {
                return Err(miette!(
                    "Alias replacement '{}' has more than one wildcard",
                    alias.replacement
                ));
            }
            if alias.replacement.contains('*') && !alias.pattern.contains('*') {
                return Err(miette!(
                    "Alias '{}' → '{}': replacement has a wildcard but the pattern captures nothing",
                    alias.pattern,
                    alias.replacement
                ));
            }
        }

        for ext in &self.resolver.extensions {
            if !ext.starts_with('.') {
                return Err(miette!("Extension '{}' must start with '.'", ext));
            }
        }

        Ok(())
    }

    /// Check a project-relative path against the exclusion patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.exclude.iter().any(|pattern| glob_match(pattern, &path_str))
    }
}

/// Segment-wise glob matching over forward-slash paths.
///
/// `**` crosses segment boundaries, `*` matches within one segment. A
/// pattern without `/` matches if any single segment matches it.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains('/') {
        return text.split('/').any(|segment| match_segment(pattern, segment));
    }

    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let text_segments: Vec<&str> = text.split('/').collect();
    match_segments(&pattern_segments, &text_segments)
}

fn match_segments(pattern: &[&str], text: &[&str]) -> bool {
    match pattern.first() {
        None => text.is_empty(),
        Some(&"**") => {
            (0..=text.len()).any(|skip| match_segments(&pattern[1..], &text[skip..]))
        }
        Some(first) => match text.first() {
            Some(segment) if match_segment(first, segment) => {
                match_segments(&pattern[1..], &text[1..])
            }
            _ => false,
        },
    }
}

/// Wildcard match within a single segment
fn match_segment(pattern: &str, text: &str) -> bool {
    fn matches(pattern: &[u8], text: &[u8]) -> bool {
        match pattern.first() {
            None => text.is_empty(),
            Some(b'*') => {
                matches(&pattern[1..], text)
                    || (!text.is_empty() && matches(pattern, &text[1..]))
            }
            Some(&c) => !text.is_empty() && text[0] == c && matches(&pattern[1..], &text[1..]),
        }
    }
    matches(pattern.as_bytes(), text.as_bytes())
}
