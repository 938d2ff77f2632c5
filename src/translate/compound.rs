// src/translate/compound.rs
//! `try`, `with` and `match`: compound statements whose bodies are expanded
//! so their imports and definitions reach the graph.

use std::collections::BTreeSet;

use tree_sitter::Node;

use super::text::{collapse, start_line};
use super::{Exit, Translator, NO, YES};
use crate::error::Result;
use crate::graph::{NodeId, NodeMeta, StatementMeta};

impl Translator<'_> {
    /// The `try` node feeds the body and every handler. `else` continues
    /// from the body; `finally` joins all paths.
    pub(super) fn process_try(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let header = self.emit_header(stmt, "try".to_string(), None, &incoming)?;
        let entry = vec![Exit::plain(header)];

        let mut exits = self.process_block_field(stmt, "body", entry.clone())?;
        let mut handled = Vec::new();
        let mut finally = None;

        let mut cursor = stmt.walk();
        let clauses: Vec<Node> = stmt.named_children(&mut cursor).collect();
        for clause in clauses {
            match clause.kind() {
                "except_clause" | "except_group_clause" => {
                    handled.extend(self.process_clause(clause, entry.clone())?);
                }
                "else_clause" => exits = self.process_clause(clause, exits)?,
                "finally_clause" => finally = Some(clause),
                _ => {}
            }
        }

        exits.extend(handled);
        match finally {
            Some(clause) => self.process_clause(clause, exits),
            None => Ok(exits),
        }
    }

    pub(super) fn process_with(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let label = self.header_text(stmt);
        let mut cursor = stmt.walk();
        let items = stmt
            .named_children(&mut cursor)
            .find(|c| c.kind() == "with_clause");
        let header = self.emit_header(stmt, label, items, &incoming)?;
        self.process_block_field(stmt, "body", vec![Exit::plain(header)])
    }

    /// One decision for the whole `match`: each case hangs off its "Yes"
    /// side, and "No" falls through when no case applies.
    pub(super) fn process_match(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let mut cursor = stmt.walk();
        let subjects: Vec<String> = stmt
            .children_by_field_name("subject", &mut cursor)
            .map(|s| collapse(self.text(s)))
            .collect();
        let label = if subjects.is_empty() {
            format!("{}?", self.header_text(stmt))
        } else {
            format!("Match {}?", subjects.join(", "))
        };

        let meta = NodeMeta::Decision(self.branch_meta(stmt));
        let decision = self.emit(label, meta, &incoming)?;

        let mut exits = Vec::new();
        for case in case_clauses(stmt) {
            let entry = vec![Exit::labeled(decision.clone(), YES)];
            let block = case
                .child_by_field_name("consequence")
                .or_else(|| clause_block(case));
            match block {
                Some(block) => exits.extend(self.process_block(block, entry)?),
                None => exits.extend(entry),
            }
        }
        exits.push(Exit::labeled(decision, NO));
        Ok(exits)
    }

    fn process_clause(&mut self, clause: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        match clause_block(clause) {
            Some(block) => self.process_block(block, incoming),
            None => Ok(incoming),
        }
    }

    /// A process node standing for a compound statement's header line.
    /// Field accesses are collected from `fields_from` only, never the body.
    fn emit_header(
        &mut self,
        stmt: Node,
        label: String,
        fields_from: Option<Node>,
        incoming: &[Exit],
    ) -> Result<NodeId> {
        let scope = self.scope();
        let mut accessed_fields = BTreeSet::new();
        if let Some(part) = fields_from.filter(|_| scope.in_method()) {
            self.collect_fields(part, &mut accessed_fields);
        }

        let meta = StatementMeta {
            lineno: start_line(stmt),
            scope,
            accessed_fields,
        };
        self.emit(label, NodeMeta::Process(meta), incoming)
    }

    /// Source text before the statement's body, without the trailing colon.
    fn header_text(&self, stmt: Node) -> String {
        let end = clause_block(stmt).map_or(stmt.end_byte(), |b| b.start_byte());
        let head = self.source.get(stmt.start_byte()..end).unwrap_or("");
        collapse(head.trim_end().trim_end_matches(':'))
    }
}

/// The statement list of a clause, whether or not the grammar names it.
fn clause_block(clause: Node) -> Option<Node> {
    if let Some(body) = clause.child_by_field_name("body") {
        return Some(body);
    }
    let mut cursor = clause.walk();
    let block = clause
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "block")
        .last();
    block
}

/// `case` clauses, whether listed directly or inside the match body block.
fn case_clauses(stmt: Node) -> Vec<Node> {
    let mut cursor = stmt.walk();
    let mut cases = Vec::new();
    for child in stmt.named_children(&mut cursor) {
        match child.kind() {
            "case_clause" => cases.push(child),
            "block" => {
                let mut inner = child.walk();
                cases.extend(child.named_children(&mut inner).filter(|c| c.kind() == "case_clause"));
            }
            _ => {}
        }
    }
    cases
}
