// src/graph/node.rs
//! Node identities and per-kind metadata.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Stable identifier of a node inside one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The flowchart role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Process,
    Io,
    Decision,
    Loop,
    Import,
    Function,
    Class,
}

impl NodeKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Process => "process",
            Self::Io => "io",
            Self::Decision => "decision",
            Self::Loop => "loop",
            Self::Import => "import",
            Self::Function => "function",
            Self::Class => "class",
        }
    }

    /// Decision points counted by cyclomatic complexity.
    #[must_use]
    pub fn is_branch(self) -> bool {
        matches!(self, Self::Decision | Self::Loop)
    }
}

/// Lexical scope a statement was emitted inside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub parent_class: Option<String>,
    pub parent_method: Option<String>,
}

impl Scope {
    /// True when both a class and a method are open, i.e. inside a method body.
    #[must_use]
    pub fn in_method(&self) -> bool {
        self.parent_class.is_some() && self.parent_method.is_some()
    }
}

/// A plain statement (`process` or `io`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatementMeta {
    pub lineno: usize,
    #[serde(flatten)]
    pub scope: Scope,
    /// Instance attributes read through a self-like receiver.
    pub accessed_fields: BTreeSet<String>,
}

/// A single decision point (`decision` or `loop`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchMeta {
    pub lineno: usize,
    #[serde(flatten)]
    pub scope: Scope,
}

/// One imported module as written in an import statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportTarget {
    /// Dotted module path; empty for `from . import x`.
    pub module: String,
    /// Number of leading dots of a relative import.
    pub level: usize,
    /// Names pulled in by `from … import a, b`.
    pub names: Vec<String>,
}

impl ImportTarget {
    /// The first dotted component used for whitelist resolution.
    ///
    /// Relative imports without a module part resolve through their first
    /// imported name.
    #[must_use]
    pub fn root_token(&self) -> Option<&str> {
        let source = if self.module.is_empty() {
            self.names.first().map(String::as_str)?
        } else {
            self.module.as_str()
        };
        source.split('.').next().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportMeta {
    pub lineno: usize,
    #[serde(flatten)]
    pub scope: Scope,
    pub targets: Vec<ImportTarget>,
}

impl ImportMeta {
    pub fn root_tokens(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().filter_map(ImportTarget::root_token)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionMeta {
    pub name: String,
    pub lineno: usize,
    pub end_lineno: usize,
    /// Non-blank, non-comment lines in `lineno..=end_lineno`.
    pub real_loc: usize,
    pub parent_class: Option<String>,
    pub is_async: bool,
    pub decorators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassMeta {
    pub name: String,
    pub lineno: usize,
    pub end_lineno: usize,
    pub is_abstract: bool,
    pub bases: Vec<String>,
}

/// Kind-specific node metadata; each variant carries only what its kind needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeMeta {
    Start,
    End,
    Process(StatementMeta),
    Io(StatementMeta),
    Decision(BranchMeta),
    Loop(BranchMeta),
    Import(ImportMeta),
    Function(FunctionMeta),
    Class(ClassMeta),
}

impl NodeMeta {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Start => NodeKind::Start,
            Self::End => NodeKind::End,
            Self::Process(_) => NodeKind::Process,
            Self::Io(_) => NodeKind::Io,
            Self::Decision(_) => NodeKind::Decision,
            Self::Loop(_) => NodeKind::Loop,
            Self::Import(_) => NodeKind::Import,
            Self::Function(_) => NodeKind::Function,
            Self::Class(_) => NodeKind::Class,
        }
    }

    /// Source line the node starts at, if it maps to source.
    #[must_use]
    pub fn lineno(&self) -> Option<usize> {
        match self {
            Self::Start | Self::End => None,
            Self::Process(m) | Self::Io(m) => Some(m.lineno),
            Self::Decision(m) | Self::Loop(m) => Some(m.lineno),
            Self::Import(m) => Some(m.lineno),
            Self::Function(m) => Some(m.lineno),
            Self::Class(m) => Some(m.lineno),
        }
    }

    #[must_use]
    pub fn as_statement(&self) -> Option<&StatementMeta> {
        match self {
            Self::Process(m) | Self::Io(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_branch(&self) -> Option<&BranchMeta> {
        match self {
            Self::Decision(m) | Self::Loop(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionMeta> {
        match self {
            Self::Function(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&ClassMeta> {
        match self {
            Self::Class(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_import(&self) -> Option<&ImportMeta> {
        match self {
            Self::Import(m) => Some(m),
            _ => None,
        }
    }
}

/// A graph node: common base plus kind-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.meta.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_token_takes_first_component() {
        let t = ImportTarget {
            module: "pkg.sub.leaf".into(),
            level: 0,
            names: vec![],
        };
        assert_eq!(t.root_token(), Some("pkg"));
    }

    #[test]
    fn test_relative_import_without_module_uses_name() {
        let t = ImportTarget {
            module: String::new(),
            level: 1,
            names: vec!["helpers".into()],
        };
        assert_eq!(t.root_token(), Some("helpers"));
    }

    #[test]
    fn test_scope_in_method_requires_both() {
        let mut scope = Scope::default();
        assert!(!scope.in_method());
        scope.parent_method = Some("run".into());
        assert!(!scope.in_method());
        scope.parent_class = Some("Job".into());
        assert!(scope.in_method());
    }
}
