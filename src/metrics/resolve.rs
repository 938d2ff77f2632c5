// src/metrics/resolve.rs
//! Resolves import targets to in-project modules.

use std::collections::BTreeSet;

use crate::discovery::top_level;
use crate::graph::{Graph, ImportTarget};

/// The importing module, as needed to anchor relative imports.
#[derive(Debug, Clone, Copy)]
pub struct Importer<'a> {
    pub module: &'a str,
    /// True when the module is a package marker file.
    pub is_package: bool,
}

impl<'a> Importer<'a> {
    /// The package relative imports are anchored at.
    fn package(&self) -> Vec<&'a str> {
        let mut parts: Vec<&str> = self.module.split('.').collect();
        if !self.is_package {
            parts.pop();
        }
        parts
    }

    /// True if `token` names the importer itself or its top-level package.
    #[must_use]
    pub fn is_self(&self, token: &str) -> bool {
        token == self.module || token == top_level(self.module)
    }
}

/// Root token of an import target: the first dotted component of the
/// absolute module name it refers to.
///
/// Relative imports are made absolute against the importer's package. When
/// that package is empty, or the dots climb above it, the target's own
/// module part (or first imported name) is used instead.
#[must_use]
pub fn root_token<'t>(target: &'t ImportTarget, importer: Option<Importer<'t>>) -> Option<&'t str> {
    if target.level == 0 {
        return target.root_token();
    }
    let Some(importer) = importer else {
        return target.root_token();
    };

    let package = importer.package();
    let climb = target.level - 1;
    if climb >= package.len() {
        return target.root_token();
    }
    package.first().copied().or_else(|| target.root_token())
}

/// In-project modules a module graph imports.
///
/// Every root token found on an import node is kept when it is in the
/// whitelist and does not name the importer itself.
#[must_use]
pub fn dependencies(graph: &Graph, importer: Importer<'_>, whitelist: &BTreeSet<String>) -> BTreeSet<String> {
    graph
        .nodes()
        .filter_map(|n| n.meta.as_import())
        .flat_map(|meta| meta.targets.iter())
        .filter_map(|target| root_token(target, Some(importer)))
        .filter(|token| whitelist.contains(*token) && !importer.is_self(token))
        .map(str::to_string)
        .collect()
}
