// src/translate/mod.rs
//! Source-to-graph translation.
//!
//! Walks one Python syntax tree and emits a flow graph whose shape mirrors
//! control flow. Branches and loops are single decision points, not basic
//! blocks. Nodes are decorated with the scope and field-access data the
//! metrics engine needs.
//!
//! Every step returns the [`Exit`]s through which control leaves it. An exit
//! carries the label the *next* edge out of it must have, so branch labels
//! are assigned when edges are created and never patched afterwards.

mod compound;
mod defs;
mod flow;
pub mod imports;
mod statements;
pub mod text;

use std::fs;
use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::config::MarkerConfig;
use crate::error::{AnalyzerError, Result};
use crate::graph::{Graph, NodeId, NodeMeta, Scope};
use crate::lang;

/// Label on the edge taken when an `if` condition holds.
pub const YES: &str = "Yes";
/// Label on the edge taken when an `if` condition fails, including the
/// fallthrough of an `if` without `else`.
pub const NO: &str = "No";
/// Label on the edge entering a loop body.
pub const TRUE: &str = "True";
/// Label on the edge leaving a loop once it terminates.
pub const FALSE: &str = "False";

pub const START_LABEL: &str = "Program Start";
pub const END_LABEL: &str = "Program End";

/// A node control can leave through, plus the label its next edge carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub id: NodeId,
    pub label: Option<&'static str>,
}

impl Exit {
    #[must_use]
    pub fn plain(id: NodeId) -> Self {
        Self { id, label: None }
    }

    #[must_use]
    pub fn labeled(id: NodeId, label: &'static str) -> Self {
        Self {
            id,
            label: Some(label),
        }
    }
}

/// Translates Python source into a flow graph.
///
/// # Errors
/// Returns `AnalyzerError::Parse` if the source has a syntax error.
pub fn translate_source(source: &str, path: &Path, markers: &MarkerConfig) -> Result<Graph> {
    let tree = lang::parse(source, path)?;
    translate_tree(&tree, source, markers)
}

/// Translates an already parsed, error-free tree of `source`.
///
/// # Errors
/// Returns `AnalyzerError::Graph` only if edge wiring references a missing node.
pub fn translate_tree(tree: &Tree, source: &str, markers: &MarkerConfig) -> Result<Graph> {
    let mut translator = Translator::new(source, markers);
    translator.translate_module(tree.root_node())?;
    Ok(translator.finish())
}

/// Reads and translates one file.
///
/// # Errors
/// Returns error if the file cannot be read or has a syntax error.
pub fn translate_file(path: &Path, markers: &MarkerConfig) -> Result<Graph> {
    let source = fs::read_to_string(path).map_err(|e| AnalyzerError::io(e, path))?;
    translate_source(&source, path, markers)
}

/// Recursive statement-list walker holding the lexical scope.
pub(crate) struct Translator<'a> {
    source: &'a str,
    lines: Vec<&'a str>,
    markers: &'a MarkerConfig,
    graph: Graph,
    current_class: Option<String>,
    current_method: Option<String>,
}

impl<'a> Translator<'a> {
    fn new(source: &'a str, markers: &'a MarkerConfig) -> Self {
        Self {
            source,
            lines: source.lines().collect(),
            markers,
            graph: Graph::new(),
            current_class: None,
            current_method: None,
        }
    }

    fn finish(self) -> Graph {
        self.graph
    }

    fn translate_module(&mut self, module: Node) -> Result<()> {
        let start = self.graph.add_node(START_LABEL, NodeMeta::Start, None);
        let exits = self.process_block(module, vec![Exit::plain(start)])?;
        let end = self.graph.add_node(END_LABEL, NodeMeta::End, None);
        self.connect(&exits, &end)
    }

    fn scope(&self) -> Scope {
        Scope {
            parent_class: self.current_class.clone(),
            parent_method: self.current_method.clone(),
        }
    }

    fn text(&self, node: Node) -> &'a str {
        text::node_text(node, self.source)
    }

    fn field_text(&self, node: Node, field: &str) -> &'a str {
        node.child_by_field_name(field)
            .map_or("", |child| text::node_text(child, self.source))
    }

    /// Connects every pending exit to `target`, labeling each edge with the
    /// exit's pending label.
    fn connect(&mut self, exits: &[Exit], target: &NodeId) -> Result<()> {
        for exit in exits {
            self.graph.add_edge(&exit.id, target, exit.label)?;
        }
        Ok(())
    }

    /// Adds a node and wires all incoming exits into it.
    fn emit(&mut self, label: String, meta: NodeMeta, incoming: &[Exit]) -> Result<NodeId> {
        let id = self.graph.add_node(label, meta, None);
        self.connect(incoming, &id)?;
        Ok(id)
    }

    /// Processes a statement list; the exits of each statement feed the next.
    fn process_block(&mut self, block: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let mut current = incoming;
        let mut cursor = block.walk();
        let statements: Vec<Node> = block.named_children(&mut cursor).collect();

        for stmt in statements {
            current = self.process_statement(stmt, current)?;
        }
        Ok(current)
    }

    fn process_block_field(
        &mut self,
        node: Node,
        field: &str,
        incoming: Vec<Exit>,
    ) -> Result<Vec<Exit>> {
        match node.child_by_field_name(field) {
            Some(block) => self.process_block(block, incoming),
            None => Ok(incoming),
        }
    }

    fn process_statement(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        match stmt.kind() {
            "comment" => Ok(incoming),
            "if_statement" => self.process_if(stmt, incoming),
            "while_statement" => self.process_while(stmt, incoming),
            "for_statement" => self.process_for(stmt, incoming),
            "try_statement" => self.process_try(stmt, incoming),
            "with_statement" => self.process_with(stmt, incoming),
            "match_statement" => self.process_match(stmt, incoming),
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                self.process_import(stmt, incoming)
            }
            "function_definition" => self.process_function(stmt, Vec::new(), incoming),
            "class_definition" => self.process_class(stmt, incoming),
            "decorated_definition" => self.process_decorated(stmt, incoming),
            _ => self.process_simple(stmt, incoming),
        }
    }
}
