// src/metrics/snapshot.rs
//! The preprocess pass: one immutable analysis snapshot per scanned root.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use super::code::{self, CodeMetrics};
use super::resolve::{self, Importer};
use crate::config::Config;
use crate::discovery::{self, SourceFile};
use crate::error::{AnalyzerError, Result};
use crate::graph::Graph;
use crate::lang;
use crate::translate;

/// The translated graph of one source file.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleGraph {
    pub name: String,
    pub path: PathBuf,
    pub relative: PathBuf,
    /// True for package marker files (`__init__.py`).
    pub is_package: bool,
    pub graph: Graph,
    pub code: CodeMetrics,
}

impl ModuleGraph {
    #[must_use]
    pub fn importer(&self) -> Importer<'_> {
        Importer {
            module: &self.name,
            is_package: self.is_package,
        }
    }
}

/// A file left out of the snapshot, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub module: String,
    /// Line of the first syntax error, when known.
    pub line: Option<usize>,
    pub message: String,
}

/// Everything derived from one preprocess pass over a root.
///
/// Built eagerly, immutable afterwards. Metric queries read from it and
/// never re-parse.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(super) root: PathBuf,
    pub(super) config: Config,
    pub(super) internal_modules: BTreeSet<String>,
    pub(super) module_graphs: BTreeMap<String, ModuleGraph>,
    pub(super) dependencies: BTreeMap<String, BTreeSet<String>>,
    pub(super) failures: Vec<ParseFailure>,
}

type Parsed = (ModuleGraph, BTreeSet<String>);

impl Snapshot {
    /// Scans `root`, translates every project file in parallel and derives
    /// the dependency relation.
    ///
    /// Files with syntax errors or read failures are logged, recorded in
    /// [`Snapshot::failures`] and skipped.
    ///
    /// # Errors
    /// Returns error if `root` cannot be walked or the grammar fails to load.
    pub fn build(root: &Path, config: &Config) -> Result<Self> {
        let start = Instant::now();
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let found = discovery::discover(&root, config)?;
        let whitelist = &found.whitelist;

        let outcomes: Vec<(&SourceFile, Result<Parsed>)> = found
            .files
            .par_iter()
            .map(|file| (file, preprocess(file, whitelist, config)))
            .collect();

        let mut module_graphs = BTreeMap::new();
        let mut dependencies = BTreeMap::new();
        let mut failures = Vec::new();

        for (file, outcome) in outcomes {
            match outcome {
                Ok((module, deps)) => {
                    if module_graphs.contains_key(&module.name) {
                        tracing::warn!(
                            module = %module.name,
                            path = %file.relative.display(),
                            "duplicate module name, keeping first"
                        );
                        continue;
                    }
                    dependencies.insert(module.name.clone(), deps);
                    module_graphs.insert(module.name.clone(), module);
                }
                Err(e) if is_skippable(&e) => {
                    tracing::warn!(path = %file.relative.display(), error = %e, "skipping file");
                    failures.push(failure(file, &e));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            root = %root.display(),
            modules = module_graphs.len(),
            skipped = failures.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "preprocess complete"
        );

        Ok(Self {
            root,
            config: config.clone(),
            internal_modules: found.whitelist,
            module_graphs,
            dependencies,
            failures,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The internal-module whitelist.
    #[must_use]
    pub fn internal_modules(&self) -> &BTreeSet<String> {
        &self.internal_modules
    }

    #[must_use]
    pub fn module_graphs(&self) -> &BTreeMap<String, ModuleGraph> {
        &self.module_graphs
    }

    #[must_use]
    pub fn module_graph(&self, module: &str) -> Option<&ModuleGraph> {
        self.module_graphs.get(module)
    }

    #[must_use]
    pub fn dependencies(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.dependencies
    }

    #[must_use]
    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    /// Names of all translated modules, sorted.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.module_graphs.keys().map(String::as_str)
    }
}

fn preprocess(file: &SourceFile, whitelist: &BTreeSet<String>, config: &Config) -> Result<Parsed> {
    let source = fs::read_to_string(&file.path).map_err(|e| AnalyzerError::io(e, &file.path))?;
    let tree = lang::parse(&source, &file.path)?;
    let graph = translate::translate_tree(&tree, &source, &config.markers)?;
    let code = code::analyze(&tree, &source, &graph)?;
    let is_package = file
        .relative
        .file_name()
        .map_or(false, |n| n == config.scan.package_marker.as_str());

    let module = ModuleGraph {
        name: file.module.clone(),
        path: file.path.clone(),
        relative: file.relative.clone(),
        is_package,
        graph,
        code,
    };
    let deps = resolve::dependencies(&module.graph, module.importer(), whitelist);

    tracing::debug!(
        module = %module.name,
        nodes = module.graph.node_count(),
        deps = deps.len(),
        "translated"
    );
    Ok((module, deps))
}

fn is_skippable(e: &AnalyzerError) -> bool {
    e.is_parse() || matches!(e, AnalyzerError::Io { .. })
}

fn failure(file: &SourceFile, e: &AnalyzerError) -> ParseFailure {
    let line = match e {
        AnalyzerError::Parse { line, .. } => Some(*line),
        _ => None,
    };
    ParseFailure {
        path: file.relative.clone(),
        module: file.module.clone(),
        line,
        message: e.to_string(),
    }
}
