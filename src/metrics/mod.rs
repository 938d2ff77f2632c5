// src/metrics/mod.rs
//! Structural metrics engine.
//!
//! [`Snapshot::build`] walks a root once, translates every module and
//! resolves the dependency relation. Coupling, cohesion, instability,
//! abstractness, complexity, code metrics, cycles and compliance audits are all read
//! from that snapshot.

pub mod audit;
pub mod code;
pub mod cohesion;
pub mod complexity;
pub mod coupling;
pub mod queries;
pub mod report;
pub mod resolve;
pub mod snapshot;

pub use crate::graph::detect_cycles;
pub use audit::AuditReport;
pub use code::{CodeMetrics, Halstead, RawMetrics};
pub use cohesion::ClassCohesion;
pub use complexity::FunctionStats;
pub use coupling::{compute_coupling, Coupling};
pub use queries::DependencyGraph;
pub use report::{Health, ModuleReport, ProjectReport};
pub use snapshot::{ModuleGraph, ParseFailure, Snapshot};
