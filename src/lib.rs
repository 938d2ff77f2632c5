// src/lib.rs
//! Architectural quality analysis for Python projects.
//!
//! Source files are translated into control-flow-annotated graphs
//! ([`translate`]), and a [`metrics::Snapshot`] of a whole project derives
//! coupling, cohesion, instability, abstractness, cycles and import audits
//! from them.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod graph;
pub mod lang;
pub mod metrics;
pub mod reporting;
pub mod translate;
pub mod workspace;

pub use error::{AnalyzerError, Result};
pub use metrics::Snapshot;
pub use workspace::Workspace;
