// src/metrics/report.rs
//! Aggregated, serializable per-module and project reports.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use super::code::CodeMetrics;
use super::cohesion::ClassCohesion;
use super::complexity::FunctionStats;
use super::coupling::{compute_coupling, Coupling};
use super::snapshot::{ParseFailure, Snapshot};
use crate::config::MetricsConfig;

/// Traffic-light grade of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Green,
    Yellow,
    Red,
}

impl Health {
    #[must_use]
    pub fn grade(score: f64, metrics: &MetricsConfig) -> Self {
        if score >= metrics.green_threshold {
            Self::Green
        } else if score >= metrics.yellow_threshold {
            Self::Yellow
        } else {
            Self::Red
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

/// Health score: coupling minus a penalty for poorly cohesive classes.
///
/// The penalty is 20 when mean LCOM4 exceeds 1 and 50 when it exceeds 2.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn health_score(coupling: f64, classes: &BTreeMap<String, ClassCohesion>) -> f64 {
    if classes.is_empty() {
        return coupling;
    }
    let mean = classes.values().map(|c| c.lcom4 as f64).sum::<f64>() / classes.len() as f64;
    let penalty = if mean > 2.0 {
        50.0
    } else if mean > 1.0 {
        20.0
    } else {
        0.0
    };
    (coupling - penalty).max(0.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub module: String,
    pub path: Option<PathBuf>,
    pub afferent: usize,
    pub efferent: usize,
    pub coupling: f64,
    pub instability: f64,
    pub abstractness: f64,
    pub distance: f64,
    pub classes: BTreeMap<String, ClassCohesion>,
    pub worst_lcom4: usize,
    pub functions: BTreeMap<String, FunctionStats>,
    pub code: CodeMetrics,
    pub dependencies: BTreeSet<String>,
    pub health_score: f64,
    pub health: Health,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub root: PathBuf,
    pub modules: Vec<ModuleReport>,
    pub cycles: Vec<Vec<String>>,
    pub failures: Vec<ParseFailure>,
}

impl ProjectReport {
    #[must_use]
    pub fn count(&self, health: Health) -> usize {
        self.modules.iter().filter(|m| m.health == health).count()
    }
}

impl Snapshot {
    /// Every metric of one module. Unknown modules get the favorable defaults.
    #[must_use]
    pub fn module_report(&self, module: &str) -> ModuleReport {
        self.report_with_counts(module, self.coupling_counts(module))
    }

    #[must_use]
    pub fn project_report(&self) -> ProjectReport {
        let counts = compute_coupling(&self.dependencies);
        ProjectReport {
            root: self.root.clone(),
            modules: self
                .modules()
                .map(|m| self.report_with_counts(m, counts.get(m).copied().unwrap_or_default()))
                .collect(),
            cycles: self.project_cycles(),
            failures: self.failures.clone(),
        }
    }

    fn report_with_counts(&self, module: &str, counts: Coupling) -> ModuleReport {
        let coupling = counts.score(self.config.metrics.decay_constant);
        let classes = self.cohesion(module);
        let score = health_score(coupling, &classes);
        let abstractness = self.abstractness(module);

        ModuleReport {
            module: module.to_string(),
            path: self.module_graph(module).map(|m| m.relative.clone()),
            afferent: counts.afferent(),
            efferent: counts.efferent(),
            coupling,
            instability: counts.instability(),
            abstractness,
            distance: (abstractness + counts.instability() - 1.0).abs(),
            worst_lcom4: classes.values().map(|c| c.lcom4).max().unwrap_or(1),
            classes,
            functions: self.complexity(module),
            code: self.code_metrics(module),
            dependencies: self.dependencies.get(module).cloned().unwrap_or_default(),
            health_score: score,
            health: Health::grade(score, &self.config.metrics),
        }
    }
}
