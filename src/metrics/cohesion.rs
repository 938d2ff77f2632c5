// src/metrics/cohesion.rs
//! Class cohesion: LCOM4 and method-graph density.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::graph::{Graph, NodeKind};

/// Cohesion of one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassCohesion {
    /// Connected components of the method graph. 1 is cohesive.
    pub lcom4: usize,
    /// Method-graph edges over the `n·(n−1)/2` possible pairs.
    pub density: f64,
}

impl ClassCohesion {
    pub const TRIVIAL: Self = Self {
        lcom4: 1,
        density: 1.0,
    };
}

/// Computes cohesion for every class node in a module graph.
#[must_use]
pub fn cohesion(graph: &Graph) -> BTreeMap<String, ClassCohesion> {
    graph
        .nodes_of_kind(NodeKind::Class)
        .filter_map(|n| n.meta.as_class())
        .map(|class| (class.name.clone(), class_cohesion(graph, &class.name)))
        .collect()
}

fn class_cohesion(graph: &Graph, class: &str) -> ClassCohesion {
    let methods = method_fields(graph, class);
    if methods.len() <= 1 {
        return ClassCohesion::TRIVIAL;
    }

    let names: Vec<&String> = methods.keys().collect();
    let (adj, edges) = build_adjacency_graph(&methods, &names);
    let lcom4 = count_components(&names, &adj);

    #[allow(clippy::cast_precision_loss)]
    let density = {
        let n = names.len() as f64;
        edges as f64 / (n * (n - 1.0) / 2.0)
    };
    ClassCohesion { lcom4, density }
}

/// Method name → union of fields its statements access.
fn method_fields(graph: &Graph, class: &str) -> BTreeMap<String, BTreeSet<String>> {
    let mut methods: BTreeMap<String, BTreeSet<String>> = graph
        .nodes_of_kind(NodeKind::Function)
        .filter_map(|n| n.meta.as_function())
        .filter(|f| f.parent_class.as_deref() == Some(class))
        .map(|f| (f.name.clone(), BTreeSet::new()))
        .collect();

    for stmt in graph.nodes().filter_map(|n| n.meta.as_statement()) {
        if stmt.scope.parent_class.as_deref() != Some(class) {
            continue;
        }
        let Some(method) = stmt.scope.parent_method.as_ref() else {
            continue;
        };
        if let Some(fields) = methods.get_mut(method) {
            fields.extend(stmt.accessed_fields.iter().cloned());
        }
    }
    methods
}

fn build_adjacency_graph<'a>(
    methods: &BTreeMap<String, BTreeSet<String>>,
    names: &[&'a String],
) -> (HashMap<&'a String, Vec<&'a String>>, usize) {
    let mut adj: HashMap<&String, Vec<&String>> = names.iter().map(|n| (*n, Vec::new())).collect();
    let mut edges = 0;

    for (i, name_a) in names.iter().enumerate() {
        let Some(fields_a) = methods.get(*name_a) else {
            continue;
        };
        for name_b in names.iter().skip(i + 1) {
            let Some(fields_b) = methods.get(*name_b) else {
                continue;
            };
            if fields_a.is_disjoint(fields_b) {
                continue;
            }
            edges += 1;
            if let Some(vec_a) = adj.get_mut(*name_a) {
                vec_a.push(*name_b);
            }
            if let Some(vec_b) = adj.get_mut(*name_b) {
                vec_b.push(*name_a);
            }
        }
    }
    (adj, edges)
}

fn count_components<'a>(names: &[&'a String], adj: &HashMap<&'a String, Vec<&'a String>>) -> usize {
    let mut visited = HashSet::new();
    let mut components = 0;

    for name in names {
        if !visited.contains(name) {
            components += 1;
            traverse(name, adj, &mut visited);
        }
    }
    components
}

fn traverse<'a>(
    start: &'a String,
    adj: &HashMap<&'a String, Vec<&'a String>>,
    visited: &mut HashSet<&'a String>,
) {
    let mut stack = vec![start];
    visited.insert(start);

    while let Some(current) = stack.pop() {
        let Some(neighbors) = adj.get(current) else {
            continue;
        };
        for neighbor in neighbors {
            if visited.insert(neighbor) {
                stack.push(neighbor);
            }
        }
    }
}
