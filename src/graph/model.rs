// src/graph/model.rs
//! The labeled directed multigraph every module is translated into.

use serde::Serialize;
use std::collections::HashMap;

use super::node::{Node, NodeId, NodeKind, NodeMeta};
use super::GraphError;

/// A directed edge with an optional branch label ("Yes", "No", "True", "False").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Write-once, read-many flow graph.
///
/// Nodes and edges keep insertion order so that traversals and serialized
/// output are deterministic.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
    #[serde(skip)]
    outgoing: Vec<Vec<usize>>,
    root: Option<NodeId>,
    #[serde(skip)]
    next_id: usize,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    ///
    /// A generated id is used when `id` is `None`. Re-using an existing id
    /// replaces that node's label and metadata in place.
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        meta: NodeMeta,
        id: Option<NodeId>,
    ) -> NodeId {
        let id = id.unwrap_or_else(|| self.fresh_id());
        let label = label.into();

        if let Some(&pos) = self.index.get(&id) {
            if let Some(node) = self.nodes.get_mut(pos) {
                node.label = label;
                node.meta = meta;
            }
            return id;
        }

        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node {
            id: id.clone(),
            label,
            meta,
        });
        self.outgoing.push(Vec::new());

        if self.root.is_none() {
            self.root = Some(id.clone());
        }
        id
    }

    /// Connects two existing nodes.
    ///
    /// # Errors
    /// Returns `GraphError::InvalidReference` if either endpoint is absent.
    pub fn add_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        label: Option<&str>,
    ) -> Result<(), GraphError> {
        let Some(&from) = self.index.get(source) else {
            return Err(GraphError::InvalidReference(source.clone()));
        };
        if !self.index.contains_key(target) {
            return Err(GraphError::InvalidReference(target.clone()));
        }

        let edge_pos = self.edges.len();
        self.edges.push(Edge {
            source: source.clone(),
            target: target.clone(),
            label: label.map(str::to_string),
        });
        if let Some(out) = self.outgoing.get_mut(from) {
            out.push(edge_pos);
        }
        Ok(())
    }

    #[must_use]
    pub fn node_info(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).and_then(|&pos| self.nodes.get(pos))
    }

    /// Successors of `id` with their edge labels, in insertion order.
    #[must_use]
    pub fn outgoing(&self, id: &NodeId) -> Vec<(NodeId, Option<String>)> {
        let Some(&pos) = self.index.get(id) else {
            return Vec::new();
        };
        self.outgoing
            .get(pos)
            .into_iter()
            .flatten()
            .filter_map(|&e| self.edges.get(e))
            .map(|e| (e.target.clone(), e.label.clone()))
            .collect()
    }

    /// The first node ever added.
    #[must_use]
    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn fresh_id(&mut self) -> NodeId {
        loop {
            let candidate = NodeId::new(format!("n{}", self.next_id));
            self.next_id += 1;
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}
