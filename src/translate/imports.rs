// src/translate/imports.rs
//! Import statement parsing.

use tree_sitter::Node;

use super::text::node_text;
use crate::graph::ImportTarget;

/// Parses one import statement node into its targets.
///
/// `import a.b, c as d` yields one target per module; `from x import y, z`
/// yields a single target carrying the imported names.
#[must_use]
pub fn parse_targets(node: Node, source: &str) -> Vec<ImportTarget> {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            node.children_by_field_name("name", &mut cursor)
                .map(|name| ImportTarget {
                    module: dotted(name, source),
                    level: 0,
                    names: Vec::new(),
                })
                .collect()
        }
        "import_from_statement" => {
            let (module, level) = node
                .child_by_field_name("module_name")
                .map_or((String::new(), 0), |m| module_part(m, source));
            vec![ImportTarget {
                module,
                level,
                names: imported_names(node, source),
            }]
        }
        "future_import_statement" => vec![ImportTarget {
            module: "__future__".to_string(),
            level: 0,
            names: imported_names(node, source),
        }],
        _ => Vec::new(),
    }
}

fn module_part(node: Node, source: &str) -> (String, usize) {
    if node.kind() != "relative_import" {
        return (dotted(node, source), 0);
    }

    let mut level = 0;
    let mut module = String::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_prefix" => level = node_text(child, source).matches('.').count(),
            "dotted_name" => module = dotted(child, source),
            _ => {}
        }
    }
    (module, level)
}

fn imported_names(node: Node, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    let mut names: Vec<String> = node
        .children_by_field_name("name", &mut cursor)
        .map(|name| dotted(name, source))
        .collect();

    let mut cursor = node.walk();
    if node
        .named_children(&mut cursor)
        .any(|c| c.kind() == "wildcard_import")
    {
        names.push("*".to_string());
    }
    names
}

/// Dotted path of a `dotted_name` or of the original name of an `aliased_import`.
fn dotted(node: Node, source: &str) -> String {
    let target = if node.kind() == "aliased_import" {
        node.child_by_field_name("name").unwrap_or(node)
    } else {
        node
    };
    node_text(target, source).split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::translate;
    use super::*;
    use crate::graph::ImportMeta;

    /// Import nodes of the translated source, in emission order.
    fn sites(source: &str) -> Vec<ImportMeta> {
        translate(source)
            .nodes()
            .filter_map(|n| n.meta.as_import().cloned())
            .collect()
    }

    fn target(module: &str, level: usize, names: &[&str]) -> ImportTarget {
        ImportTarget {
            module: module.to_string(),
            level,
            names: names.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_plain_and_aliased_imports() {
        let found = sites("import os, numpy as np\nimport pkg.sub\n");
        assert_eq!(found.len(), 2);
        assert_eq!(
            found[0].targets,
            vec![target("os", 0, &[]), target("numpy", 0, &[])]
        );
        assert_eq!(found[1].targets, vec![target("pkg.sub", 0, &[])]);
        assert_eq!(found[1].lineno, 2);
    }

    #[test]
    fn test_from_import_names() {
        let found = sites("from pkg.models import User, Group as G\n");
        assert_eq!(
            found[0].targets,
            vec![target("pkg.models", 0, &["User", "Group"])]
        );
    }

    #[test]
    fn test_relative_imports() {
        let found = sites("from . import helpers\nfrom ..core.db import session\n");
        assert_eq!(found[0].targets, vec![target("", 1, &["helpers"])]);
        assert_eq!(found[1].targets, vec![target("core.db", 2, &["session"])]);
    }

    #[test]
    fn test_wildcard_and_future() {
        let found = sites("from __future__ import annotations\nfrom shapes import *\n");
        assert_eq!(found[0].targets, vec![target("__future__", 0, &["annotations"])]);
        assert_eq!(found[1].targets, vec![target("shapes", 0, &["*"])]);
    }

    #[test]
    fn test_nested_imports_are_found() {
        let src = "def load():\n    import json\n    return json\ntry:\n    import yaml\nexcept ImportError:\n    yaml = None\n";
        let modules: Vec<String> = sites(src)
            .into_iter()
            .flat_map(|s| s.targets)
            .map(|t| t.module)
            .collect();
        assert_eq!(modules, vec!["json".to_string(), "yaml".to_string()]);
    }
}
