// src/config/types.rs
use serde::{Deserialize, Serialize};

/// Scoring constants for the metric formulas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Decay constant `k` in `100 · e^(−k·Ce)`. Larger values punish coupling harder.
    #[serde(default = "default_decay")]
    pub decay_constant: f64,
    /// Health score at or above which a module is green.
    #[serde(default = "default_green")]
    pub green_threshold: f64,
    /// Health score at or above which a module is yellow.
    #[serde(default = "default_yellow")]
    pub yellow_threshold: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            decay_constant: default_decay(),
            green_threshold: default_green(),
            yellow_threshold: default_yellow(),
        }
    }
}

const fn default_decay() -> f64 { 0.2 }
const fn default_green() -> f64 { 80.0 }
const fn default_yellow() -> f64 { 60.0 }

/// Directory walk conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_prune_dirs")]
    pub prune_dirs: Vec<String>,
    #[serde(default = "default_test_prefix")]
    pub test_prefix: String,
    #[serde(default = "default_test_dirs")]
    pub test_dirs: Vec<String>,
    #[serde(default = "default_package_marker")]
    pub package_marker: String,
    #[serde(default = "default_source_ext")]
    pub source_ext: String,
    /// Regexes matched against the forward-slash relative path.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            prune_dirs: default_prune_dirs(),
            test_prefix: default_test_prefix(),
            test_dirs: default_test_dirs(),
            package_marker: default_package_marker(),
            source_ext: default_source_ext(),
            exclude: Vec::new(),
        }
    }
}

fn default_prune_dirs() -> Vec<String> {
    [
        "__pycache__",
        ".git",
        ".hg",
        ".svn",
        ".mypy_cache",
        ".pytest_cache",
        ".venv",
        "venv",
        "node_modules",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}
fn default_test_prefix() -> String { "test_".to_string() }
fn default_test_dirs() -> Vec<String> { vec!["test".into(), "tests".into()] }
fn default_package_marker() -> String { "__init__.py".to_string() }
fn default_source_ext() -> String { "py".to_string() }

/// Names the translator recognizes in source code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    #[serde(default = "default_abstract_bases")]
    pub abstract_bases: Vec<String>,
    #[serde(default = "default_abstract_metaclasses")]
    pub abstract_metaclasses: Vec<String>,
    #[serde(default = "default_abstract_methods")]
    pub abstract_methods: Vec<String>,
    #[serde(default = "default_self_names")]
    pub self_names: Vec<String>,
    #[serde(default = "default_output_calls")]
    pub output_calls: Vec<String>,
    #[serde(default = "default_input_calls")]
    pub input_calls: Vec<String>,
    #[serde(default = "default_conversion_calls")]
    pub conversion_calls: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            abstract_bases: default_abstract_bases(),
            abstract_metaclasses: default_abstract_metaclasses(),
            abstract_methods: default_abstract_methods(),
            self_names: default_self_names(),
            output_calls: default_output_calls(),
            input_calls: default_input_calls(),
            conversion_calls: default_conversion_calls(),
        }
    }
}

impl MarkerConfig {
    #[must_use]
    pub fn is_self(&self, name: &str) -> bool {
        self.self_names.iter().any(|s| s == name)
    }

    #[must_use]
    pub fn is_io_call(&self, name: &str) -> bool {
        self.output_calls.iter().any(|s| s == name) || self.is_input_call(name)
    }

    #[must_use]
    pub fn is_input_call(&self, name: &str) -> bool {
        self.input_calls.iter().any(|s| s == name)
    }

    #[must_use]
    pub fn is_conversion_call(&self, name: &str) -> bool {
        self.conversion_calls.iter().any(|s| s == name)
    }

    #[must_use]
    pub fn is_abstract_base(&self, name: &str) -> bool {
        self.abstract_bases.iter().any(|s| s == name)
    }

    #[must_use]
    pub fn is_abstract_metaclass(&self, name: &str) -> bool {
        self.abstract_metaclasses.iter().any(|s| s == name)
    }

    #[must_use]
    pub fn is_abstract_method(&self, name: &str) -> bool {
        self.abstract_methods.iter().any(|s| s == name)
    }
}

fn default_abstract_bases() -> Vec<String> { vec!["ABC".into()] }
fn default_abstract_metaclasses() -> Vec<String> { vec!["ABCMeta".into()] }
fn default_abstract_methods() -> Vec<String> { vec!["abstractmethod".into()] }
fn default_self_names() -> Vec<String> { vec!["self".into()] }
fn default_output_calls() -> Vec<String> { vec!["print".into()] }
fn default_input_calls() -> Vec<String> { vec!["input".into()] }
fn default_conversion_calls() -> Vec<String> {
    vec!["int".into(), "float".into(), "str".into()]
}

/// On-disk shape of `archgauge.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArchGaugeToml {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub markers: MarkerConfig,
}

/// Runtime configuration with compiled exclude patterns.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub metrics: MetricsConfig,
    pub scan: ScanConfig,
    pub markers: MarkerConfig,
    pub exclude_patterns: Vec<regex::Regex>,
}
