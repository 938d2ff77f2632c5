// src/lang.rs
//! Python grammar access via tree-sitter.

use crate::error::{AnalyzerError, Result};
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

#[must_use]
pub fn grammar() -> Language {
    tree_sitter_python::language()
}

/// Parses Python source into a syntax tree.
///
/// tree-sitter recovers from syntax errors instead of failing, so any
/// `ERROR` or missing node in the result is reported as a parse failure.
///
/// # Errors
/// Returns `AnalyzerError::Parse` on invalid syntax and
/// `AnalyzerError::Grammar` if the parser cannot be initialised.
pub fn parse(source: &str, path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(grammar())
        .map_err(|e| AnalyzerError::Grammar(e.to_string()))?;

    let Some(tree) = parser.parse(source, None) else {
        return Err(AnalyzerError::Parse {
            path: path.to_path_buf(),
            line: 0,
            message: "parser produced no tree".to_string(),
        });
    };

    let root = tree.root_node();
    if root.has_error() {
        let (line, message) = first_error(root).unwrap_or((1, "invalid syntax".to_string()));
        return Err(AnalyzerError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        });
    }

    Ok(tree)
}

fn first_error(node: Node) -> Option<(usize, String)> {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current.is_missing() {
            return Some((
                current.start_position().row + 1,
                format!("missing '{}'", current.kind()),
            ));
        }
        if current.is_error() {
            return Some((current.start_position().row + 1, "invalid syntax".to_string()));
        }
        if !current.has_error() {
            continue;
        }

        let mut cursor = current.walk();
        let children: Vec<Node> = current.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Visits `node` and its named descendants in source order.
///
/// Uses an explicit stack, so arbitrarily deep expressions cannot exhaust
/// the thread stack. Returning `false` from `visit` skips that node's
/// children.
pub fn walk_named<'t>(node: Node<'t>, mut visit: impl FnMut(Node<'t>) -> bool) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if !visit(current) {
            continue;
        }
        let mut cursor = current.walk();
        let children: Vec<Node<'t>> = current.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}
