// src/metrics/audit.rs
//! Implementation compliance: does a file import only what it was allowed to?

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::resolve::{root_token, Importer};
use super::snapshot::Snapshot;
use crate::config::Config;
use crate::discovery::{module_name, top_level};
use crate::error::Result;
use crate::translate;

/// Outcome of auditing one file against an allowed-dependency list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub file: PathBuf,
    /// Module name of the file when it lies under the scanned root.
    pub module: Option<String>,
    /// Root tokens of every import in the file.
    pub imports: BTreeSet<String>,
    /// In-project modules imported without permission.
    pub violations: BTreeSet<String>,
    /// Set when the file could not be read or parsed.
    pub error: Option<String>,
}

impl AuditReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.violations.is_empty()
    }
}

impl Snapshot {
    /// Re-translates `file` and checks its import nodes against `allowed`.
    ///
    /// An import fails the audit when its root token is an internal module
    /// that is neither allowed nor the file's own module or package. An
    /// allowed entry also admits its top-level component. Relative paths
    /// that do not exist are looked up under the snapshot root.
    pub fn audit_file<S: AsRef<str>>(&self, file: &Path, allowed: &[S]) -> AuditReport {
        let path = self.locate(file);
        let module = self.module_of(&path);
        let mut report = AuditReport {
            file: path.clone(),
            module: module.clone(),
            ..AuditReport::default()
        };

        let tokens = match read_import_tokens(&path, module.as_deref(), &self.config) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "audit could not parse file");
                report.error = Some(e.to_string());
                return report;
            }
        };

        let allowed: BTreeSet<&str> = allowed
            .iter()
            .flat_map(|a| [a.as_ref(), top_level(a.as_ref())])
            .collect();
        let own = module.as_deref().map(|m| Importer {
            module: m,
            is_package: false,
        });

        for token in tokens {
            let internal = self.internal_modules.contains(&token);
            let is_own = own.map_or(false, |o| o.is_self(&token));
            if internal && !is_own && !allowed.contains(token.as_str()) {
                report.violations.insert(token.clone());
            }
            report.imports.insert(token);
        }

        if !report.violations.is_empty() {
            tracing::info!(
                path = %path.display(),
                violations = ?report.violations,
                "audit failed"
            );
        }
        report
    }

    /// True when `file` imports no internal module outside `allowed`.
    pub fn audit_implementation<S: AsRef<str>>(&self, file: &Path, allowed: &[S]) -> bool {
        self.audit_file(file, allowed).passed()
    }

    fn locate(&self, file: &Path) -> PathBuf {
        if file.is_absolute() || file.exists() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        }
    }

    fn module_of(&self, path: &Path) -> Option<String> {
        let resolved = path.canonicalize().ok()?;
        let relative = resolved.strip_prefix(&self.root).ok()?;
        let root_name = self.root.file_name()?.to_str()?;
        module_name(relative, root_name, &self.config.scan.package_marker)
    }
}

/// Root tokens of every import node the file translates to.
fn read_import_tokens(
    path: &Path,
    module: Option<&str>,
    config: &Config,
) -> Result<Vec<String>> {
    let graph = translate::translate_file(path, &config.markers)?;
    let is_package = path
        .file_name()
        .map_or(false, |n| n == config.scan.package_marker.as_str());
    let importer = module.map(|m| Importer { module: m, is_package });

    let tokens = graph
        .nodes()
        .filter_map(|n| n.meta.as_import())
        .flat_map(|meta| meta.targets.iter())
        .filter_map(|t| root_token(t, importer).map(str::to_string))
        .collect();
    Ok(tokens)
}
