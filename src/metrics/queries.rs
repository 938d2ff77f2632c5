// src/metrics/queries.rs
//! Metric queries over a snapshot.
//!
//! A module missing from the snapshot is not an error. It gets the
//! favorable defaults: coupling 100, no classes, abstractness 0, and an
//! instability computed as if it imported nothing.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::code::CodeMetrics;
use super::cohesion::{self, ClassCohesion};
use super::complexity::{self, qualified_name, FunctionStats};
use super::coupling::Coupling;
use super::snapshot::Snapshot;
use crate::discovery::top_level;
use crate::graph::{detect_cycles, NodeKind};

/// Module names and internal dependency edges, for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl Snapshot {
    /// Afferent and efferent counts of `module`.
    #[must_use]
    pub fn coupling_counts(&self, module: &str) -> Coupling {
        let efferent = self.dependencies.get(module).map_or(0, BTreeSet::len);
        let afferent = self
            .dependencies
            .iter()
            .filter(|(name, deps)| name.as_str() != module && deps.contains(module))
            .count();
        Coupling::new(afferent, efferent)
    }

    /// `100 · e^(−k·Ce)` with the configured decay constant.
    #[must_use]
    pub fn coupling(&self, module: &str) -> f64 {
        self.coupling_with(module, self.config.metrics.decay_constant)
    }

    /// Coupling score with an explicit decay constant.
    #[must_use]
    pub fn coupling_with(&self, module: &str, decay_constant: f64) -> f64 {
        self.coupling_counts(module).score(decay_constant)
    }

    /// `Ce / (Ca + Ce)`, or 0.5 for an unconnected module.
    #[must_use]
    pub fn instability(&self, module: &str) -> f64 {
        self.coupling_counts(module).instability()
    }

    /// LCOM4 and density per class.
    #[must_use]
    pub fn cohesion(&self, module: &str) -> BTreeMap<String, ClassCohesion> {
        self.module_graphs
            .get(module)
            .map(|m| cohesion::cohesion(&m.graph))
            .unwrap_or_default()
    }

    /// Abstract classes over all classes; 0 without classes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn abstractness(&self, module: &str) -> f64 {
        let Some(m) = self.module_graphs.get(module) else {
            return 0.0;
        };
        let (total, abstract_count) = m
            .graph
            .nodes_of_kind(NodeKind::Class)
            .filter_map(|n| n.meta.as_class())
            .fold((0usize, 0usize), |(t, a), c| (t + 1, a + usize::from(c.is_abstract)));

        if total == 0 {
            return 0.0;
        }
        abstract_count as f64 / total as f64
    }

    /// Distance from the main sequence: `|A + I − 1|`.
    #[must_use]
    pub fn distance(&self, module: &str) -> f64 {
        (self.abstractness(module) + self.instability(module) - 1.0).abs()
    }

    #[must_use]
    pub fn complexity(&self, module: &str) -> BTreeMap<String, FunctionStats> {
        self.module_graphs
            .get(module)
            .map(|m| complexity::complexity(&m.graph))
            .unwrap_or_default()
    }

    /// Raw, Halstead and maintainability measures of one module's source.
    #[must_use]
    pub fn code_metrics(&self, module: &str) -> CodeMetrics {
        self.module_graphs
            .get(module)
            .map(|m| m.code)
            .unwrap_or_default()
    }

    /// Simple cycles of the real dependency relation.
    #[must_use]
    pub fn project_cycles(&self) -> Vec<Vec<String>> {
        detect_cycles(&self.dependencies)
    }

    #[must_use]
    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph {
            nodes: self.internal_modules.iter().cloned().collect(),
            edges: self
                .dependencies
                .iter()
                .flat_map(|(from, deps)| deps.iter().map(move |to| (from.clone(), to.clone())))
                .collect(),
        }
    }

    /// Qualified function names (`Class.method` for methods) grouped by
    /// top-level module, sorted and deduplicated.
    #[must_use]
    pub fn function_distribution(&self) -> BTreeMap<String, Vec<String>> {
        let mut distribution: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, module) in &self.module_graphs {
            let functions = distribution.entry(top_level(name).to_string()).or_default();
            functions.extend(
                module
                    .graph
                    .nodes()
                    .filter_map(|n| n.meta.as_function())
                    .map(qualified_name),
            );
        }
        distribution
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().collect()))
            .collect()
    }

    /// Names from `expected` that have no translated graph.
    #[must_use]
    pub fn missing_modules<I, S>(&self, expected: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        expected
            .into_iter()
            .filter(|name| !self.module_graphs.contains_key(name.as_ref()))
            .map(|name| name.as_ref().to_string())
            .collect()
    }
}
