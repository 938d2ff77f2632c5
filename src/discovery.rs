// src/discovery.rs
//! Source file discovery and the internal-module whitelist.

use crate::config::{Config, ScanConfig};
use crate::error::{AnalyzerError, Result};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A Python file that belongs to the analyzed project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the scanned root.
    pub relative: PathBuf,
    /// Dotted module name, e.g. `pkg.sub.mod`.
    pub module: String,
}

/// Result of one directory walk.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub files: Vec<SourceFile>,
    /// Full dotted names and top-level components of every project module.
    pub whitelist: BTreeSet<String>,
    pub walk_errors: usize,
}

/// Walks `root` once, collecting project sources and the module whitelist.
///
/// Cache, VCS and test directories are pruned, as are files named like
/// tests and any path matching a configured exclude pattern.
///
/// # Errors
/// Returns error if `root` is not a directory.
pub fn discover(root: &Path, config: &Config) -> Result<Discovery> {
    if !root.is_dir() {
        return Err(AnalyzerError::Walk(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let root_name = root_name(root);
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !should_prune(e, root, config));

    let mut discovery = Discovery::default();
    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable path");
                discovery.walk_errors += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_ext(entry.path(), &config.scan.source_ext) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        let Some(module) = module_name(&relative, &root_name, &config.scan.package_marker) else {
            tracing::debug!(path = %relative.display(), "no module name, skipping");
            continue;
        };

        discovery.whitelist.insert(top_level(&module).to_string());
        discovery.whitelist.insert(module.clone());
        discovery.files.push(SourceFile {
            path: entry.path().to_path_buf(),
            relative,
            module,
        });
    }

    if discovery.walk_errors > 0 {
        tracing::warn!(errors = discovery.walk_errors, "file walk finished with errors");
    }
    tracing::debug!(
        files = discovery.files.len(),
        modules = discovery.whitelist.len(),
        "discovery complete"
    );
    Ok(discovery)
}

fn should_prune(entry: &DirEntry, root: &Path, config: &Config) -> bool {
    let name = entry.file_name().to_string_lossy();
    if is_pruned_name(&name, entry.file_type().is_dir(), &config.scan) {
        return true;
    }
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    config.is_excluded(&normalize_path(relative))
}

/// Cache / VCS directory names, test directories and test-prefixed names.
#[must_use]
pub fn is_pruned_name(name: &str, is_dir: bool, scan: &ScanConfig) -> bool {
    if is_dir && scan.prune_dirs.iter().any(|d| d == name) {
        return true;
    }
    if name.starts_with(&scan.test_prefix) {
        return true;
    }
    scan.test_dirs.iter().any(|d| d == name)
}

fn has_ext(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

/// Normalizes a path to use forward slashes (cross-platform pattern matching).
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn root_name(root: &Path) -> String {
    let resolved = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    resolved
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("root")
        .to_string()
}

/// Dotted module name of a source file relative to the scanned root.
///
/// `pkg/sub/mod.py` → `pkg.sub.mod`; a package marker collapses to its
/// directory (`pkg/sub/__init__.py` → `pkg.sub`), and a marker at the root
/// takes the root directory's name.
#[must_use]
pub fn module_name(relative: &Path, root_name: &str, package_marker: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }

    let file = parts.pop()?;
    if file == package_marker {
        if parts.is_empty() {
            return Some(root_name.to_string());
        }
        return Some(parts.join("."));
    }

    let stem = Path::new(file).file_stem()?.to_str()?;
    parts.push(stem);
    Some(parts.join("."))
}

/// First dotted component of a module name.
#[must_use]
pub fn top_level(module: &str) -> &str {
    module.split('.').next().unwrap_or(module)
}
