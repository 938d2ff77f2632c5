// src/translate/flow.rs
//! Branches and loops.

use tree_sitter::Node;

use super::text::{collapse, start_line};
use super::{Exit, Translator, FALSE, NO, TRUE, YES};
use crate::error::Result;
use crate::graph::{BranchMeta, NodeId, NodeMeta};

impl Translator<'_> {
    pub(super) fn branch_meta(&self, node: Node) -> BranchMeta {
        BranchMeta {
            lineno: start_line(node),
            scope: self.scope(),
        }
    }

    fn decision_label(&self, node: Node) -> String {
        format!("If {}?", collapse(self.field_text(node, "condition")))
    }

    pub(super) fn process_if(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let meta = NodeMeta::Decision(self.branch_meta(stmt));
        let decision = self.emit(self.decision_label(stmt), meta, &incoming)?;

        let mut exits = self.process_block_field(
            stmt,
            "consequence",
            vec![Exit::labeled(decision.clone(), YES)],
        )?;

        let mut cursor = stmt.walk();
        let alternatives: Vec<Node> = stmt
            .children_by_field_name("alternative", &mut cursor)
            .collect();
        exits.extend(self.process_alternatives(&alternatives, decision)?);
        Ok(exits)
    }

    /// Walks the `elif` / `else` chain hanging off the "No" side of `from`.
    ///
    /// With no alternative left, `from` itself is the fallthrough exit and
    /// its onward edge is labeled "No".
    fn process_alternatives(&mut self, alternatives: &[Node], from: NodeId) -> Result<Vec<Exit>> {
        let entry = vec![Exit::labeled(from, NO)];
        let Some((first, rest)) = alternatives.split_first() else {
            return Ok(entry);
        };

        if first.kind() == "elif_clause" {
            let meta = NodeMeta::Decision(self.branch_meta(*first));
            let nested = self.emit(self.decision_label(*first), meta, &entry)?;
            let mut exits = self.process_block_field(
                *first,
                "consequence",
                vec![Exit::labeled(nested.clone(), YES)],
            )?;
            exits.extend(self.process_alternatives(rest, nested)?);
            return Ok(exits);
        }

        self.process_block_field(*first, "body", entry)
    }

    pub(super) fn process_while(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let label = format!("While {}?", collapse(self.field_text(stmt, "condition")));
        let meta = NodeMeta::Decision(self.branch_meta(stmt));
        let node = self.emit(label, meta, &incoming)?;
        self.close_loop(stmt, node)
    }

    pub(super) fn process_for(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let label = format!(
            "For {} in {}?",
            collapse(self.field_text(stmt, "left")),
            collapse(self.field_text(stmt, "right"))
        );
        let meta = NodeMeta::Loop(self.branch_meta(stmt));
        let node = self.emit(label, meta, &incoming)?;
        self.close_loop(stmt, node)
    }

    /// Recurses into a loop body, wires the body back to the loop head and
    /// returns the termination exit (or the `else` block's exits).
    fn close_loop(&mut self, stmt: Node, head: NodeId) -> Result<Vec<Exit>> {
        let body_exits =
            self.process_block_field(stmt, "body", vec![Exit::labeled(head.clone(), TRUE)])?;
        self.connect(&body_exits, &head)?;

        let termination = vec![Exit::labeled(head, FALSE)];
        match stmt.child_by_field_name("alternative") {
            Some(else_clause) => self.process_block_field(else_clause, "body", termination),
            None => Ok(termination),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::END_LABEL;
    use crate::graph::NodeKind;

    fn edge(target: &str, label: Option<&str>) -> (String, Option<String>) {
        (target.to_string(), label.map(str::to_string))
    }

    #[test]
    fn test_if_else_labels_both_branches() {
        let graph = translate("if x > 0:\n    a = 1\nelse:\n    a = 2\nb = a\n");
        assert_eq!(
            successors(&graph, "If x > 0?"),
            vec![edge("a = 1", Some("Yes")), edge("a = 2", Some("No"))]
        );
        assert_eq!(successors(&graph, "a = 1"), vec![edge("b = a", None)]);
        assert_eq!(successors(&graph, "a = 2"), vec![edge("b = a", None)]);
    }

    #[test]
    fn test_if_without_else_falls_through_with_no_label() {
        let graph = translate("if ready:\n    go()\ndone()\n");
        assert_eq!(
            successors(&graph, "If ready?"),
            vec![edge("go()", Some("Yes")), edge("done()", Some("No"))]
        );
    }

    #[test]
    fn test_if_at_end_of_module_reaches_end_with_no_label() {
        let graph = translate("if ready:\n    go()\n");
        let out = successors(&graph, "If ready?");
        assert!(out.contains(&edge(END_LABEL, Some("No"))));
    }

    #[test]
    fn test_elif_chain_nests_decisions_on_no_side() {
        let graph = translate("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n");
        assert_eq!(
            successors(&graph, "If a?"),
            vec![edge("x = 1", Some("Yes")), edge("If b?", Some("No"))]
        );
        assert_eq!(
            successors(&graph, "If b?"),
            vec![edge("x = 2", Some("Yes")), edge("x = 3", Some("No"))]
        );
        assert_eq!(graph.nodes_of_kind(NodeKind::Decision).count(), 2);
    }

    #[test]
    fn test_elif_without_else_falls_through_from_last_decision() {
        let graph = translate("if a:\n    x = 1\nelif b:\n    x = 2\ny = 0\n");
        assert!(successors(&graph, "If b?").contains(&edge("y = 0", Some("No"))));
        assert!(!successors(&graph, "If a?").contains(&edge("y = 0", Some("No"))));
    }

    #[test]
    fn test_while_loop_closes_cycle_and_exits_false() {
        let graph = translate("while n > 0:\n    n -= 1\nprint(n)\n");
        assert_eq!(
            successors(&graph, "While n > 0?"),
            vec![edge("n -= 1", Some("True")), edge("print(n)", Some("False"))]
        );
        assert_eq!(successors(&graph, "n -= 1"), vec![edge("While n > 0?", None)]);
        let head = find(&graph, "While n > 0?");
        assert_eq!(head.kind(), NodeKind::Decision);
    }

    #[test]
    fn test_for_loop_is_loop_node() {
        let graph = translate("for item in items:\n    use(item)\n");
        let head = find(&graph, "For item in items?");
        assert_eq!(head.kind(), NodeKind::Loop);
        assert_eq!(
            successors(&graph, "For item in items?"),
            vec![edge("use(item)", Some("True")), edge(END_LABEL, Some("False"))]
        );
    }

    #[test]
    fn test_for_else_enters_else_block_on_false() {
        let graph = translate("for x in xs:\n    f(x)\nelse:\n    g()\nh()\n");
        assert_eq!(
            successors(&graph, "For x in xs?"),
            vec![edge("f(x)", Some("True")), edge("g()", Some("False"))]
        );
        assert_eq!(successors(&graph, "g()"), vec![edge("h()", None)]);
    }

    #[test]
    fn test_if_inside_loop_returns_to_head() {
        let graph = translate("for x in xs:\n    if x:\n        f(x)\n");
        let back: Vec<_> = successors(&graph, "If x?");
        assert_eq!(
            back,
            vec![edge("f(x)", Some("Yes")), edge("For x in xs?", Some("No"))]
        );
        assert_eq!(successors(&graph, "f(x)"), vec![edge("For x in xs?", None)]);
    }

    #[test]
    fn test_branch_nodes_record_line() {
        let graph = translate("x = 1\n\nwhile x:\n    x = 0\n");
        let head = find(&graph, "While x?");
        assert_eq!(head.meta.lineno(), Some(3));
    }
}
