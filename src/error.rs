// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::graph::GraphError;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Syntax error in {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Failed to load Python grammar: {0}")]
    Grammar(String),

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid exclude pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Directory walk failed: {0}")]
    Walk(String),
}

impl AnalyzerError {
    /// Attaches a path to a raw I/O error.
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// True for per-file syntax failures that the scan skips instead of aborting.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

// Allow `?` on std::io::Error by converting to AnalyzerError::Io with unknown path.
impl From<std::io::Error> for AnalyzerError {
    fn from(source: std::io::Error) -> Self {
        AnalyzerError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for AnalyzerError {
    fn from(e: walkdir::Error) -> Self {
        AnalyzerError::Walk(e.to_string())
    }
}
