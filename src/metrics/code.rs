// src/metrics/code.rs
//! Per-file code metrics: raw line counts, Halstead measures and the
//! maintainability index.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use crate::error::{AnalyzerError, Result};
use crate::graph::{Graph, NodeKind};
use crate::lang;
use crate::translate::text::{collapse, is_docstring, node_text};

/// Expressions whose operator and operands count towards Halstead.
const HALSTEAD_QUERY: &str = r"
    (binary_operator) @expr
    (unary_operator) @expr
    (not_operator) @expr
    (boolean_operator) @expr
    (augmented_assignment) @expr
    (comparison_operator) @expr
";

const OPERATOR_KINDS: [&str; 6] = [
    "binary_operator",
    "unary_operator",
    "not_operator",
    "boolean_operator",
    "augmented_assignment",
    "comparison_operator",
];

/// Line counts of one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RawMetrics {
    /// Total lines.
    pub loc: usize,
    /// Logical lines: statements, definitions and decorators.
    pub lloc: usize,
    /// Source lines: not blank, not comment-only, not part of a docstring.
    pub sloc: usize,
    /// Comments, including trailing ones.
    pub comments: usize,
    /// Lines holding nothing but a comment.
    pub single_comments: usize,
    /// Lines covered by docstrings.
    pub multi: usize,
    pub blank: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Halstead {
    pub distinct_operators: usize,
    pub distinct_operands: usize,
    pub total_operators: usize,
    pub total_operands: usize,
    pub vocabulary: usize,
    pub length: usize,
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
}

impl Halstead {
    #[must_use]
    pub fn from_counts(n1: usize, n2: usize, total_operators: usize, total_operands: usize) -> Self {
        let vocabulary = n1 + n2;
        let length = total_operators + total_operands;
        #[allow(clippy::cast_precision_loss)]
        let volume = if vocabulary > 0 {
            length as f64 * (vocabulary as f64).log2()
        } else {
            0.0
        };
        #[allow(clippy::cast_precision_loss)]
        let difficulty = if n2 > 0 {
            (n1 as f64 / 2.0) * (total_operands as f64 / n2 as f64)
        } else {
            0.0
        };

        Self {
            distinct_operators: n1,
            distinct_operands: n2,
            total_operators,
            total_operands,
            vocabulary,
            length,
            volume,
            difficulty,
            effort: difficulty * volume,
        }
    }
}

/// Everything measured on one file's source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CodeMetrics {
    pub raw: RawMetrics,
    pub halstead: Halstead,
    /// Sum of the module's own and its functions' cyclomatic complexity.
    pub total_complexity: usize,
    /// 0 (hard to maintain) to 100 (easy).
    pub maintainability: f64,
}

impl Default for CodeMetrics {
    fn default() -> Self {
        Self {
            raw: RawMetrics::default(),
            halstead: Halstead::default(),
            total_complexity: 1,
            maintainability: 100.0,
        }
    }
}

/// Measures a parsed file. `graph` is its translation, used for complexity.
///
/// # Errors
/// Returns `AnalyzerError::Grammar` if the Halstead query does not compile.
pub fn analyze(tree: &Tree, source: &str, graph: &Graph) -> Result<CodeMetrics> {
    let raw = raw_metrics(tree, source);
    let halstead = halstead(tree, source)?;
    let total_complexity = total_complexity(graph);

    #[allow(clippy::cast_precision_loss)]
    let comment_percent = if raw.sloc == 0 {
        0.0
    } else {
        (raw.comments + raw.multi) as f64 / raw.sloc as f64 * 100.0
    };

    Ok(CodeMetrics {
        raw,
        halstead,
        total_complexity,
        maintainability: maintainability_index(halstead.volume, total_complexity, raw.lloc, comment_percent),
    })
}

/// The SEI maintainability index rescaled to 0..=100, with the comment term.
///
/// Empty code (no volume or no logical lines) scores 100.
#[must_use]
pub fn maintainability_index(volume: f64, complexity: usize, lloc: usize, comment_percent: f64) -> f64 {
    if volume <= 0.0 || lloc == 0 {
        return 100.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let raw = 171.0
        - 5.2 * volume.ln()
        - 0.23 * complexity as f64
        - 16.2 * (lloc as f64).ln()
        + 50.0 * (2.46 * comment_percent.to_radians()).sqrt().sin();
    (raw * 100.0 / 171.0).clamp(0.0, 100.0)
}

/// 1 for the module, plus 1 per function, plus 1 per decision or loop.
#[must_use]
pub fn total_complexity(graph: &Graph) -> usize {
    1 + graph.nodes_of_kind(NodeKind::Function).count()
        + graph.nodes().filter(|n| n.kind().is_branch()).count()
}

#[must_use]
pub fn raw_metrics(tree: &Tree, source: &str) -> RawMetrics {
    let lines: Vec<&str> = source.lines().collect();
    let blank = lines.iter().filter(|l| l.trim().is_empty()).count();

    let mut comments = 0;
    let mut comment_only = BTreeSet::new();
    let mut doc_lines = BTreeSet::new();
    let mut lloc = 0;

    lang::walk_named(tree.root_node(), |node| {
        let kind = node.kind();
        if kind == "comment" {
            comments += 1;
            let row = node.start_position().row;
            let alone = lines
                .get(row)
                .map_or(false, |l| l.trim_start().starts_with('#'));
            if alone {
                comment_only.insert(row);
            }
            return false;
        }
        if is_docstring(node) {
            doc_lines.extend(node.start_position().row..=node.end_position().row);
        }
        if is_logical_line(kind) {
            lloc += 1;
        }
        true
    });

    let single_comments = comment_only.len();
    let multi = doc_lines.len();
    RawMetrics {
        loc: lines.len(),
        lloc,
        sloc: lines.len().saturating_sub(blank + single_comments + multi),
        comments,
        single_comments,
        multi,
        blank,
    }
}

fn is_logical_line(kind: &str) -> bool {
    kind.ends_with("_statement")
        || matches!(kind, "function_definition" | "class_definition" | "decorator")
}

/// Halstead counts over arithmetic, boolean, comparison and augmented
/// assignment expressions.
///
/// Operands that are themselves counted expressions contribute through
/// their own operators instead of as one opaque operand, and chains of the
/// same boolean operator (`a and b and c`) count as a single operation.
///
/// # Errors
/// Returns `AnalyzerError::Grammar` if the query does not compile.
pub fn halstead(tree: &Tree, source: &str) -> Result<Halstead> {
    let query =
        Query::new(lang::grammar(), HALSTEAD_QUERY).map_err(|e| AnalyzerError::Grammar(e.to_string()))?;
    let mut cursor = QueryCursor::new();

    let mut operators: HashSet<String> = HashSet::new();
    let mut operands: HashSet<String> = HashSet::new();
    let mut total_operators = 0;
    let mut total_operands = 0;

    for m in cursor.matches(&query, tree.root_node(), source.as_bytes()) {
        for capture in m.captures {
            let expr = capture.node;
            if continues_boolean_chain(expr, source) {
                continue;
            }
            let (ops, args) = split_expression(expr, source);
            total_operators += ops.len();
            operators.extend(ops);
            for arg in args {
                if is_counted_expression(arg) {
                    continue;
                }
                total_operands += 1;
                operands.insert(collapse(node_text(arg, source)));
            }
        }
    }

    Ok(Halstead::from_counts(
        operators.len(),
        operands.len(),
        total_operators,
        total_operands,
    ))
}

/// Operator tokens and operand nodes of one counted expression.
fn split_expression<'t>(expr: Node<'t>, source: &str) -> (Vec<String>, Vec<Node<'t>>) {
    let mut cursor = expr.walk();
    match expr.kind() {
        "comparison_operator" => {
            let ops = expr
                .children_by_field_name("operators", &mut cursor)
                .map(|op| collapse(node_text(op, source)))
                .collect();
            let mut cursor = expr.walk();
            let args = expr
                .named_children(&mut cursor)
                .filter(|c| c.kind() != "comment")
                .collect();
            (ops, args)
        }
        "boolean_operator" => {
            let op = operator_text(expr, source);
            let mut args = Vec::new();
            let mut current = expr;
            loop {
                args.extend(current.child_by_field_name("right"));
                match current.child_by_field_name("left") {
                    Some(left) if left.kind() == "boolean_operator" && operator_text(left, source) == op => {
                        current = left;
                    }
                    Some(left) => {
                        args.push(left);
                        break;
                    }
                    None => break,
                }
            }
            args.reverse();
            (vec![op], args)
        }
        "unary_operator" | "not_operator" => {
            let op = operator_text(expr, source);
            (vec![op], expr.child_by_field_name("argument").into_iter().collect())
        }
        _ => {
            let op = operator_text(expr, source);
            let args = ["left", "right"]
                .iter()
                .filter_map(|f| expr.child_by_field_name(f))
                .collect();
            (vec![op], args)
        }
    }
}

fn operator_text(expr: Node, source: &str) -> String {
    match expr.child_by_field_name("operator") {
        Some(op) => collapse(node_text(op, source)),
        None if expr.kind() == "not_operator" => "not".to_string(),
        None => String::new(),
    }
}

/// True for the inner links of `a and b and c`, which the outermost
/// operator already counted.
fn continues_boolean_chain(expr: Node, source: &str) -> bool {
    if expr.kind() != "boolean_operator" {
        return false;
    }
    expr.parent().map_or(false, |parent| {
        parent.kind() == "boolean_operator"
            && parent.child_by_field_name("left") == Some(expr)
            && operator_text(parent, source) == operator_text(expr, source)
    })
}

/// True when `node`, looking through parentheses, is itself a counted expression.
fn is_counted_expression(node: Node) -> bool {
    let mut current = node;
    while current.kind() == "parenthesized_expression" {
        match current.named_child(0) {
            Some(inner) => current = inner,
            None => return false,
        }
    }
    OPERATOR_KINDS.contains(&current.kind())
}
