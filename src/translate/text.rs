// src/translate/text.rs
//! Source text helpers: node text, labels, line extents and filtered LOC.

use tree_sitter::Node;

/// Raw source text covered by `node`.
#[must_use]
pub fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Statement text with whitespace runs collapsed, used as a node label.
#[must_use]
pub fn label_text(node: Node, source: &str) -> String {
    collapse(node_text(node, source))
}

#[must_use]
pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 1-based first line of `node`.
#[must_use]
pub fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

/// 1-based last line of `node`.
///
/// A node whose end sits at column 0 finished on the previous line.
#[must_use]
pub fn end_line(node: Node) -> usize {
    let start = node.start_position();
    let end = node.end_position();
    if end.column == 0 && end.row > start.row {
        end.row
    } else {
        end.row + 1
    }
}

/// Counts lines in `start..=end` (1-based) that are neither blank nor pure comments.
#[must_use]
pub fn count_real_loc(lines: &[&str], start: usize, end: usize) -> usize {
    if start == 0 || end < start {
        return 0;
    }
    lines
        .iter()
        .skip(start - 1)
        .take(end - start + 1)
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .count()
}

/// A bare string statement: a docstring, or a string used as a comment.
#[must_use]
pub fn is_docstring(stmt: Node) -> bool {
    stmt.kind() == "expression_statement"
        && stmt.named_child_count() == 1
        && stmt
            .named_child(0)
            .map_or(false, |e| matches!(e.kind(), "string" | "concatenated_string"))
}

/// Last dotted component of a decorator or base expression, without call arguments.
///
/// `@abc.abstractmethod` → `abstractmethod`, `Base[T]` → `Base`.
#[must_use]
pub fn last_component(expr: &str) -> &str {
    let expr = expr.trim().trim_start_matches('@');
    let head = expr
        .split(|c: char| c == '(' || c == '[')
        .next()
        .unwrap_or(expr);
    head.rsplit('.').next().unwrap_or(head).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_real_loc_skips_blank_and_comments() {
        let src = "def f():\n    # note\n\n    x = 1\n    return x\n";
        let lines: Vec<&str> = src.lines().collect();
        assert_eq!(count_real_loc(&lines, 1, 5), 3);
    }

    #[test]
    fn test_count_real_loc_out_of_range() {
        let lines = vec!["a", "b"];
        assert_eq!(count_real_loc(&lines, 0, 2), 0);
        assert_eq!(count_real_loc(&lines, 2, 1), 0);
        assert_eq!(count_real_loc(&lines, 2, 10), 1);
    }

    #[test]
    fn test_last_component() {
        assert_eq!(last_component("@abstractmethod"), "abstractmethod");
        assert_eq!(last_component("@abc.abstractmethod"), "abstractmethod");
        assert_eq!(last_component("abc.ABC"), "ABC");
        assert_eq!(last_component("Generic[T]"), "Generic");
        assert_eq!(last_component("@functools.lru_cache(maxsize=2)"), "lru_cache");
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse("x  =\n    1"), "x = 1");
    }
}
