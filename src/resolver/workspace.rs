//! Workspace package discovery.
//!
//! Scans the project tree for `package.json` manifests and derives the
//! package index the resolver consults for bare specifiers. Runs once per
//! scan; the result is read-only afterward.

use ignore::WalkBuilder;
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A named unit within the monorepo with its own root directory and
/// entry file, derived from its manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspacePackage {
    /// Package name as imported (`@scope/name` or bare)
    pub name: String,
    /// Package root, project-relative
    pub dir: PathBuf,
    /// Entry file relative to the package root; empty means "probe the
    /// package root's index files"
    pub entry: String,
}

#[derive(Deserialize)]
struct Manifest {
    name: Option<String>,
    main: Option<String>,
    module: Option<String>,
}

/// Discover workspace packages under the project root.
///
/// A manifest that fails to parse is a fatal configuration error:
/// silently skipping it would corrupt resolution accuracy for every
/// import of that package.
pub fn discover_workspace_packages(root: &Path) -> Result<Vec<WorkspacePackage>> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build();

    let mut packages = Vec::new();

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if path.file_name().and_then(|n| n.to_str()) != Some("package.json") {
            continue;
        }
        // Vendored trees carry manifests that are not ours
        if path
            .components()
            .any(|c| c.as_os_str() == "node_modules" || c.as_os_str() == "vendor")
        {
            continue;
        }

        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read manifest: {}", path.display()))?;

        let manifest: Manifest = serde_json::from_str(&contents)
            .into_diagnostic()
            .wrap_err_with(|| format!("Malformed workspace manifest: {}", path.display()))?;

        let Some(name) = manifest.name else {
            // Anonymous manifest (e.g. fixture config), not a package
            continue;
        };

        let dir = path
            .parent()
            .ok_or_else(|| miette!("Manifest has no parent directory: {}", path.display()))?
            .strip_prefix(root)
            .unwrap_or_else(|_| Path::new(""))
            .to_path_buf();

        let entry_file = manifest
            .main
            .or(manifest.module)
            .map(|e| e.trim_start_matches("./").to_string())
            .unwrap_or_default();

        debug!(
            "Workspace package '{}' at {} (entry: {:?})",
            name,
            dir.display(),
            entry_file
        );

        packages.push(WorkspacePackage {
            name,
            dir,
            entry: entry_file,
        });
    }

    packages.sort_by(|a, b| a.dir.cmp(&b.dir));
    Ok(packages)
}
