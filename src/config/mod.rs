// src/config/mod.rs
pub mod types;

pub use self::types::{ArchGaugeToml, Config, MarkerConfig, MetricsConfig, ScanConfig};

use crate::error::{AnalyzerError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// File looked up at the scanned root.
pub const CONFIG_FILE: &str = "archgauge.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `archgauge.toml` from `root`, falling back to defaults when absent.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed, or if an
    /// exclude pattern is not a valid regex.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| AnalyzerError::io(e, &path))?;
        Self::parse_toml(&content, &path)
    }

    /// Parses TOML content into a runtime config.
    ///
    /// # Errors
    /// Returns error on malformed TOML or invalid exclude regexes.
    pub fn parse_toml(content: &str, origin: &Path) -> Result<Self> {
        let file: ArchGaugeToml = toml::from_str(content).map_err(|e| AnalyzerError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(file)
    }

    /// Builds a runtime config, compiling the exclude patterns.
    ///
    /// # Errors
    /// Returns error if an exclude pattern is not a valid regex.
    pub fn from_toml(file: ArchGaugeToml) -> Result<Self> {
        let exclude_patterns = file
            .scan
            .exclude
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            metrics: file.metrics,
            scan: file.scan,
            markers: file.markers,
            exclude_patterns,
        })
    }

    /// Returns a copy with a different coupling decay constant.
    #[must_use]
    pub fn with_decay(mut self, decay_constant: f64) -> Self {
        self.metrics.decay_constant = decay_constant;
        self
    }

    /// True if the forward-slash relative path matches an exclude pattern.
    #[must_use]
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude_patterns.iter().any(|re| re.is_match(relative))
    }
}
