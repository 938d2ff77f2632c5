// src/metrics/complexity.rs
//! Per-function size and cyclomatic complexity.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::graph::{FunctionMeta, Graph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FunctionStats {
    pub lineno: usize,
    pub end_lineno: usize,
    pub real_loc: usize,
    /// 1 + decision points in the body, nested definitions excluded.
    pub cyclomatic: usize,
}

/// `Class.method` for methods, the bare name otherwise.
#[must_use]
pub fn qualified_name(func: &FunctionMeta) -> String {
    match &func.parent_class {
        Some(class) => format!("{class}.{}", func.name),
        None => func.name.clone(),
    }
}

/// Stats for every function of a module graph, keyed by qualified name.
#[must_use]
pub fn complexity(graph: &Graph) -> BTreeMap<String, FunctionStats> {
    graph
        .nodes()
        .filter_map(|n| n.meta.as_function())
        .map(|func| {
            let stats = FunctionStats {
                lineno: func.lineno,
                end_lineno: func.end_lineno,
                real_loc: func.real_loc,
                cyclomatic: 1 + branch_count(graph, func),
            };
            (qualified_name(func), stats)
        })
        .collect()
}

/// Branches emitted directly in `func`'s scope within its line extent.
fn branch_count(graph: &Graph, func: &FunctionMeta) -> usize {
    graph
        .nodes()
        .filter_map(|n| n.meta.as_branch())
        .filter(|b| {
            b.scope.parent_method.as_deref() == Some(func.name.as_str())
                && b.scope.parent_class == func.parent_class
                && (func.lineno..=func.end_lineno).contains(&b.lineno)
        })
        .count()
}
