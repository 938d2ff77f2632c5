// src/graph/mod.rs
//! Generic flow-graph model shared by the translator and the metrics engine.

pub mod cycles;
pub mod model;
pub mod node;

pub use cycles::detect_cycles;
pub use model::{Edge, Graph};
pub use node::{
    BranchMeta, ClassMeta, FunctionMeta, ImportMeta, ImportTarget, Node, NodeId, NodeKind,
    NodeMeta, Scope, StatementMeta,
};

use thiserror::Error;

/// Misuse of the graph API. These are programmer errors, never input errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge references unknown node '{0}'")]
    InvalidReference(NodeId),
}
