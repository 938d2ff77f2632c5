// src/translate/defs.rs
//! Function and class definitions.

use tree_sitter::Node;

use super::text::{collapse, count_real_loc, end_line, last_component, start_line};
use super::{Exit, Translator};
use crate::error::Result;
use crate::graph::{ClassMeta, FunctionMeta, NodeMeta};

impl Translator<'_> {
    pub(super) fn process_decorated(&mut self, stmt: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let decorators = self.decorators(stmt);
        match stmt.child_by_field_name("definition") {
            Some(def) if def.kind() == "function_definition" => {
                self.process_function(def, decorators, incoming)
            }
            Some(def) if def.kind() == "class_definition" => self.process_class(def, incoming),
            _ => self.process_simple(stmt, incoming),
        }
    }

    /// Emits the function node and translates its body as a sub-graph
    /// hanging off it. Control continues from the function node itself.
    pub(super) fn process_function(
        &mut self,
        def: Node,
        decorators: Vec<String>,
        incoming: Vec<Exit>,
    ) -> Result<Vec<Exit>> {
        let name = self.field_text(def, "name").to_string();
        let lineno = start_line(def);
        let end_lineno = end_line(def);

        let meta = FunctionMeta {
            name: name.clone(),
            lineno,
            end_lineno,
            real_loc: count_real_loc(&self.lines, lineno, end_lineno),
            parent_class: self.current_class.clone(),
            is_async: is_async(def),
            decorators,
        };
        let func = self.emit(format!("def {name}"), NodeMeta::Function(meta), &incoming)?;

        let saved_method = self.current_method.replace(name);
        let body = self.process_block_field(def, "body", vec![Exit::plain(func.clone())]);
        self.current_method = saved_method;
        body?;

        Ok(vec![Exit::plain(func)])
    }

    pub(super) fn process_class(&mut self, def: Node, incoming: Vec<Exit>) -> Result<Vec<Exit>> {
        let name = self.field_text(def, "name").to_string();
        let (bases, metaclass) = self.class_bases(def);

        let is_abstract = bases
            .iter()
            .any(|b| self.markers.is_abstract_base(last_component(b)))
            || metaclass.map_or(false, |m| self.markers.is_abstract_metaclass(last_component(m)))
            || def
                .child_by_field_name("body")
                .map_or(false, |body| self.has_abstract_method(body));

        let meta = ClassMeta {
            name: name.clone(),
            lineno: start_line(def),
            end_lineno: end_line(def),
            is_abstract,
            bases,
        };
        let class = self.emit(format!("class {name}"), NodeMeta::Class(meta), &incoming)?;

        let saved_class = self.current_class.replace(name);
        let saved_method = self.current_method.take();
        let body = self.process_block_field(def, "body", vec![Exit::plain(class.clone())]);
        self.current_class = saved_class;
        self.current_method = saved_method;
        body?;

        Ok(vec![Exit::plain(class)])
    }

    fn decorators(&self, decorated: Node) -> Vec<String> {
        let mut cursor = decorated.walk();
        let found: Vec<String> = decorated
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "decorator")
            .map(|d| collapse(self.text(d).trim_start_matches('@')))
            .collect();
        found
    }

    /// Declared base expressions and the `metaclass=` value, if any.
    fn class_bases(&self, def: Node) -> (Vec<String>, Option<&str>) {
        let Some(args) = def.child_by_field_name("superclasses") else {
            return (Vec::new(), None);
        };

        let mut bases = Vec::new();
        let mut metaclass = None;
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            match arg.kind() {
                "comment" => {}
                "keyword_argument" => {
                    if self.field_text(arg, "name") == "metaclass" {
                        metaclass = Some(self.field_text(arg, "value"));
                    }
                }
                _ => bases.push(collapse(self.text(arg))),
            }
        }
        (bases, metaclass)
    }

    /// True if any function defined in the class body, or in a definition
    /// nested inside it, carries an abstract-method decorator.
    ///
    /// Only definition structure is walked; expressions are never entered.
    fn has_abstract_method(&self, body: Node) -> bool {
        let mut stack = vec![body];
        while let Some(node) = stack.pop() {
            if node.kind() == "decorated_definition"
                && node
                    .child_by_field_name("definition")
                    .map_or(false, |d| d.kind() == "function_definition")
                && self
                    .decorators(node)
                    .iter()
                    .any(|d| self.markers.is_abstract_method(last_component(d)))
            {
                return true;
            }

            let mut cursor = node.walk();
            stack.extend(node.named_children(&mut cursor).filter(|c| {
                matches!(
                    c.kind(),
                    "block" | "decorated_definition" | "class_definition" | "function_definition"
                )
            }));
        }
        false
    }
}

fn is_async(def: Node) -> bool {
    def.child(0).map_or(false, |first| first.kind() == "async")
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::START_LABEL;
    use crate::graph::{ClassMeta, FunctionMeta, Graph, NodeKind};

    fn function(graph: &Graph, label: &str) -> FunctionMeta {
        match find(graph, label).meta.as_function() {
            Some(meta) => meta.clone(),
            None => panic!("{label} is not a function"),
        }
    }

    fn class(graph: &Graph, label: &str) -> ClassMeta {
        match find(graph, label).meta.as_class() {
            Some(meta) => meta.clone(),
            None => panic!("{label} is not a class"),
        }
    }

    #[test]
    fn test_function_extent_and_real_loc() {
        let src = "\
def compute(a, b):
    # add them

    total = a + b
    return total

x = compute(1, 2)
";
        let graph = translate(src);
        let meta = function(&graph, "def compute");
        assert_eq!(meta.name, "compute");
        assert_eq!(meta.lineno, 1);
        assert_eq!(meta.end_lineno, 5);
        assert_eq!(meta.real_loc, 3);
        assert_eq!(meta.parent_class, None);
        assert!(!meta.is_async);
    }

    #[test]
    fn test_function_is_its_own_exit() {
        let graph = translate("def f():\n    a = 1\nb = 2\n");
        assert_eq!(
            successors(&graph, "def f"),
            vec![("a = 1".to_string(), None), ("b = 2".to_string(), None)]
        );
        assert!(successors(&graph, "a = 1").is_empty());
    }

    #[test]
    fn test_async_and_decorated_functions() {
        let src = "\
@app.route('/x')
@cached
async def handler(req):
    return await req.json()
";
        let graph = translate(src);
        let meta = function(&graph, "def handler");
        assert!(meta.is_async);
        assert_eq!(meta.decorators, vec!["app.route('/x')".to_string(), "cached".to_string()]);
        assert_eq!(meta.lineno, 3);
        assert_eq!(successors(&graph, START_LABEL), vec![("def handler".to_string(), None)]);
    }

    #[test]
    fn test_methods_record_parent_class_and_scope_is_restored() {
        let src = "\
class Shape:
    def area(self):
        return 0

    class Inner:
        def size(self):
            return 1

def free():
    pass
";
        let graph = translate(src);
        assert_eq!(function(&graph, "def area").parent_class.as_deref(), Some("Shape"));
        assert_eq!(function(&graph, "def size").parent_class.as_deref(), Some("Inner"));
        assert_eq!(function(&graph, "def free").parent_class, None);
    }

    #[test]
    fn test_nested_function_scope() {
        let src = "def outer():\n    def inner():\n        x = 1\n    y = 2\n";
        let graph = translate(src);
        let x = find(&graph, "x = 1").meta.as_statement().cloned().unwrap_or_default();
        let y = find(&graph, "y = 2").meta.as_statement().cloned().unwrap_or_default();
        assert_eq!(x.scope.parent_method.as_deref(), Some("inner"));
        assert_eq!(y.scope.parent_method.as_deref(), Some("outer"));
    }

    #[test]
    fn test_abstract_by_base() {
        let graph = translate("import abc\nclass Repo(abc.ABC):\n    pass\n");
        let meta = class(&graph, "class Repo");
        assert!(meta.is_abstract);
        assert_eq!(meta.bases, vec!["abc.ABC".to_string()]);
    }

    #[test]
    fn test_abstract_by_metaclass() {
        let graph = translate("class Repo(Base, metaclass=ABCMeta):\n    pass\n");
        let meta = class(&graph, "class Repo");
        assert!(meta.is_abstract);
        assert_eq!(meta.bases, vec!["Base".to_string()]);
    }

    #[test]
    fn test_abstract_by_decorated_method() {
        let src = "\
class Repo:
    @abstractmethod
    def get(self, key):
        ...
";
        assert!(class(&translate(src), "class Repo").is_abstract);
    }

    #[test]
    fn test_concrete_class() {
        let src = "class Repo(Base):\n    @property\n    def size(self):\n        return 1\n";
        let graph = translate(src);
        let meta = class(&graph, "class Repo");
        assert!(!meta.is_abstract);
        assert_eq!(meta.lineno, 1);
        assert_eq!(meta.end_lineno, 4);
        assert_eq!(graph.nodes_of_kind(NodeKind::Class).count(), 1);
    }

    #[test]
    fn test_decorated_class_is_translated() {
        let graph = translate("@dataclass\nclass Point:\n    x: int = 0\n");
        assert_eq!(find(&graph, "class Point").kind(), NodeKind::Class);
    }
}
