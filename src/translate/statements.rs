// src/translate/statements.rs
//! Imports and plain statements.

use std::collections::BTreeSet;

use tree_sitter::Node;

use super::imports::parse_targets;
use super::text::{is_docstring, label_text, start_line};
use super::{Exit, Translator};
use crate::error::Result;
use crate::graph::{ImportMeta, NodeMeta, StatementMeta};
use crate::lang;

impl Translator<'_> {
    pub(super) fn process_import(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let meta = ImportMeta {
            lineno: start_line(stmt),
            scope: self.scope(),
            targets: parse_targets(stmt, self.source),
        };
        let id = self.emit(label_text(stmt, self.source), NodeMeta::Import(meta), &incoming)?;
        Ok(vec![Exit::plain(id)])
    }

    /// Any statement without structure of its own becomes one `io` or
    /// `process` node. Docstrings pass their exits through.
    pub(super) fn process_simple(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        if is_docstring(stmt) {
            return Ok(incoming);
        }

        let scope = self.scope();
        let mut accessed_fields = BTreeSet::new();
        if scope.in_method() {
            self.collect_fields(stmt, &mut accessed_fields);
        }

        let meta = StatementMeta {
            lineno: start_line(stmt),
            scope,
            accessed_fields,
        };
        let meta = if self.is_io(stmt) {
            NodeMeta::Io(meta)
        } else {
            NodeMeta::Process(meta)
        };

        let id = self.emit(label_text(stmt, self.source), meta, &incoming)?;
        Ok(vec![Exit::plain(id)])
    }

    fn is_io(&self, stmt: Node) -> bool {
        match stmt.kind() {
            "print_statement" => true,
            "expression_statement" => stmt.named_child(0).map_or(false, |e| self.is_io_expr(e)),
            _ => false,
        }
    }

    /// Looks through (chained) assignments at the value being assigned.
    fn is_io_expr(&self, expr: Node) -> bool {
        let mut current = expr;
        while matches!(current.kind(), "assignment" | "augmented_assignment") {
            match current.child_by_field_name("right") {
                Some(right) => current = right,
                None => return false,
            }
        }
        current.kind() == "call" && self.is_io_call(current)
    }

    /// `print(…)`, `input(…)`, or a conversion such as `int(input(…))`.
    fn is_io_call(&self, call: Node) -> bool {
        let Some(name) = self.callee_name(call) else {
            return false;
        };
        if self.markers.is_io_call(name) {
            return true;
        }
        if !self.markers.is_conversion_call(name) {
            return false;
        }

        first_positional_arg(call)
            .filter(|arg| arg.kind() == "call")
            .and_then(|arg| self.callee_name(arg))
            .map_or(false, |inner| self.markers.is_input_call(inner))
    }

    /// Name of a call's callee when it is a bare identifier.
    fn callee_name(&self, call: Node) -> Option<&str> {
        call.child_by_field_name("function")
            .filter(|f| f.kind() == "identifier")
            .map(|f| self.text(f))
    }

    /// Records `self.attr` accesses anywhere under `node`.
    pub(super) fn collect_fields(&self, node: Node, fields: &mut BTreeSet<String>) {
        lang::walk_named(node, |current| {
            if current.kind() == "attribute" {
                let receiver = current.child_by_field_name("object");
                let attr = current.child_by_field_name("attribute");
                if let (Some(receiver), Some(attr)) = (receiver, attr) {
                    if receiver.kind() == "identifier" && self.markers.is_self(self.text(receiver)) {
                        fields.insert(self.text(attr).to_string());
                    }
                }
            }
            true
        });
    }
}

fn first_positional_arg(call: Node) -> Option<Node> {
    let args = call.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let first = args
        .named_children(&mut cursor)
        .find(|a| !matches!(a.kind(), "keyword_argument" | "comment"));
    first
}
