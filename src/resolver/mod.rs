//! Module specifier resolution.
//!
//! Turns a raw import specifier plus the importing file's directory into
//! a concrete project-relative target, reproducing the resolution rules
//! of the ecosystems we scan: relative paths, extension probing,
//! directory index files, workspace package names, configured path
//! aliases. The policy is strictly ordered and first-match-wins, with no
//! heuristic guessing. Probing consults the discovered-file set, never
//! the filesystem, so resolution is deterministic and independent of
//! traversal order.

mod workspace;

pub use workspace::{discover_workspace_packages, WorkspacePackage};

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Aliases can chain (an alias may substitute to something another alias
/// matches). Bound the chain so a cyclic table cannot loop forever.
const MAX_ALIAS_DEPTH: usize = 8;

/// A configured path alias. The pattern and replacement each carry at
/// most one `*` wildcard segment; the table is ordered, first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathAlias {
    pub pattern: String,
    pub replacement: String,
}

impl PathAlias {
    /// Apply this alias to a specifier, returning the substituted
    /// specifier on match.
    pub fn apply(&self, specifier: &str) -> Option<String> {
        match self.pattern.split_once('*') {
            None => {
                if self.pattern == specifier {
                    Some(self.replacement.clone())
                } else {
                    None
                }
            }
            Some((prefix, suffix)) => {
                if specifier.len() < prefix.len() + suffix.len()
                    || !specifier.starts_with(prefix)
                    || !specifier.ends_with(suffix)
                {
                    return None;
                }
                let captured = &specifier[prefix.len()..specifier.len() - suffix.len()];
                Some(self.replacement.replacen('*', captured, 1))
            }
        }
    }
}

/// Outcome of resolving one specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Resolved to a discovered file, project-relative path
    Internal(PathBuf),
    /// Not ours: an external dependency, excluded from the graph
    External,
}

/// Ecosystem-aware specifier resolver, read-only per scan.
pub struct Resolver {
    extensions: Vec<String>,
    index_names: Vec<String>,
    aliases: Vec<PathAlias>,
    packages: Vec<WorkspacePackage>,
    package_index: HashMap<String, usize>,
    known_files: HashSet<PathBuf>,
}

impl Resolver {
    pub fn new(
        extensions: Vec<String>,
        index_names: Vec<String>,
        aliases: Vec<PathAlias>,
        packages: Vec<WorkspacePackage>,
        known_files: HashSet<PathBuf>,
    ) -> Self {
        let package_index = packages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();

        Self {
            extensions,
            index_names,
            aliases,
            packages,
            package_index,
            known_files,
        }
    }

    /// Resolve `specifier` as imported from `importer_dir` (the importing
    /// file's directory, project-relative).
    pub fn resolve(&self, specifier: &str, importer_dir: &Path) -> Resolution {
        self.resolve_depth(specifier, importer_dir, 0)
    }

    /// Probe a project-root-relative path with the standard extension
    /// and index-file policy. Used for entry files whose configured
    /// spelling omits the extension.
    pub fn probe_root_relative(&self, path: &Path) -> Option<PathBuf> {
        self.probe(&normalize_path(path))
    }

    fn resolve_depth(&self, specifier: &str, importer_dir: &Path, depth: usize) -> Resolution {
        if depth > MAX_ALIAS_DEPTH {
            trace!("Alias chain too deep for '{}'", specifier);
            return Resolution::External;
        }

        // 1. Relative and absolute specifiers. Absolute means absolute
        // within the project: a scanner must never follow imports outside
        // its own tree.
        if specifier.starts_with("./") || specifier.starts_with("../") {
            let candidate = normalize_path(&importer_dir.join(specifier));
            return match self.probe(&candidate) {
                Some(path) => Resolution::Internal(path),
                None => Resolution::External,
            };
        }
        if let Some(rooted) = specifier.strip_prefix('/') {
            let candidate = normalize_path(Path::new(rooted));
            return match self.probe(&candidate) {
                Some(path) => Resolution::Internal(path),
                None => Resolution::External,
            };
        }

        // 2. Workspace package names, with deep imports resolved against
        // the package root.
        if let Some((package, rest)) = self.match_package(specifier) {
            let candidate = if rest.is_empty() {
                if package.entry.is_empty() {
                    package.dir.clone()
                } else {
                    normalize_path(&package.dir.join(&package.entry))
                }
            } else {
                normalize_path(&package.dir.join(rest))
            };
            return match self.probe(&candidate) {
                Some(path) => Resolution::Internal(path),
                None => Resolution::External,
            };
        }

        // 3. Path aliases, in declared order; the first matching pattern
        // decides. The substituted specifier re-enters resolution, and
        // also probes as a project-root-relative path.
        for alias in &self.aliases {
            if let Some(substituted) = alias.apply(specifier) {
                trace!("Alias '{}' → '{}'", specifier, substituted);
                if let Resolution::Internal(path) =
                    self.resolve_depth(&substituted, importer_dir, depth + 1)
                {
                    return Resolution::Internal(path);
                }
                let candidate = normalize_path(Path::new(&substituted));
                return match self.probe(&candidate) {
                    Some(path) => Resolution::Internal(path),
                    None => Resolution::External,
                };
            }
        }

        Resolution::External
    }

    /// Match the specifier's leading segment(s) against the workspace
    /// package index; scoped names (`@scope/name`) consume two segments.
    fn match_package<'a, 'b>(
        &'a self,
        specifier: &'b str,
    ) -> Option<(&'a WorkspacePackage, &'b str)> {
        let (name, rest) = if specifier.starts_with('@') {
            let mut split = specifier.splitn(3, '/');
            let scope = split.next()?;
            let pkg = split.next()?;
            let rest = split.next().unwrap_or("");
            (format!("{}/{}", scope, pkg), rest)
        } else {
            match specifier.split_once('/') {
                Some((name, rest)) => (name.to_string(), rest),
                None => (specifier.to_string(), ""),
            }
        };

        let index = *self.package_index.get(&name)?;
        Some((&self.packages[index], rest))
    }

    /// Ordered existence probing against the discovered-file set:
    /// the literal path first (a specifier with a valid explicit
    /// extension is accepted without probing), then the literal path
    /// with each configured extension appended, then the path as a
    /// directory holding an index file under the same extension list.
    fn probe(&self, candidate: &Path) -> Option<PathBuf> {
        if self.known_files.contains(candidate) {
            return Some(candidate.to_path_buf());
        }

        for ext in &self.extensions {
            let with_ext = append_extension(candidate, ext);
            if self.known_files.contains(&with_ext) {
                return Some(with_ext);
            }
        }

        for index_name in &self.index_names {
            for ext in &self.extensions {
                let index_file = candidate.join(format!("{}{}", index_name, ext));
                if self.known_files.contains(&index_file) {
                    return Some(index_file);
                }
            }
        }

        None
    }
}

/// Append (not replace) an extension: `./util.test` + `.ts` must probe
/// `util.test.ts`.
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(ext);
    PathBuf::from(s)
}

/// Resolve `.` and `..` components without touching the filesystem.
/// `..` at the project root clamps instead of escaping the tree.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                components.pop();
            }
            other => components.push(other),
        }
    }
    components.iter().collect()
}
