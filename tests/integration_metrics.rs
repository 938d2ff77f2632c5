// tests/integration_metrics.rs
//! End-to-end metric properties over small Python projects on disk.

use archgauge_core::config::Config;
use archgauge_core::graph::detect_cycles;
use archgauge_core::metrics::{ClassCohesion, Snapshot};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(full, content).expect("write fixture");
    }
    dir
}

fn snapshot(dir: &TempDir) -> Snapshot {
    Snapshot::build(dir.path(), &Config::new()).expect("snapshot should build")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn modules_without_internal_imports_have_full_coupling() {
    let dir = project(&[
        ("alone.py", "x = 1\n"),
        ("stdlib_only.py", "import os\nimport sys\nfrom json import dumps\n"),
    ]);
    let snap = snapshot(&dir);
    assert!(close(snap.coupling("alone"), 100.0));
    assert!(close(snap.coupling("stdlib_only"), 100.0));
}

#[test]
fn coupling_decays_with_efferent_count() {
    let dir = project(&[
        ("m1.py", "a = 1\n"),
        ("m2.py", "a = 2\n"),
        ("m3.py", "a = 3\n"),
        ("m4.py", "a = 4\n"),
        ("m5.py", "a = 5\n"),
        ("one.py", "import m1\n"),
        ("two.py", "import m1\nimport m2\n"),
        ("hub.py", "import m1, m2\nfrom m3 import a\nimport m4\nimport m5.sub\n"),
    ]);
    let snap = snapshot(&dir);

    let hub = snap.coupling("hub");
    assert!((hub - 100.0 * (-1.0f64).exp()).abs() < 1e-9);
    assert!((hub - 36.79).abs() < 0.01);
    assert!(snap.coupling("one") > snap.coupling("two"));
    assert!(snap.coupling("two") > hub);
}

#[test]
fn decay_constant_is_configurable() {
    let dir = project(&[("a.py", "import b\n"), ("b.py", "x = 1\n")]);
    let config = Config::new().with_decay(1.0);
    let snap = Snapshot::build(dir.path(), &config).expect("snapshot should build");
    assert!(close(snap.coupling("a"), 100.0 * (-1.0f64).exp()));
    assert!(close(snap.coupling_with("a", 0.2), 100.0 * (-0.2f64).exp()));
}

#[test]
fn cohesion_properties() {
    let src = "\
class Single:
    def only(self):
        self.x = 1

class Disjoint:
    def left(self):
        self.a = 1
    def right(self):
        return self.b

class Shared:
    def write(self):
        self.value = 1
    def read(self):
        return self.value
";
    let dir = project(&[("shapes.py", src)]);
    let classes = snapshot(&dir).cohesion("shapes");

    assert_eq!(classes.get("Single"), Some(&ClassCohesion { lcom4: 1, density: 1.0 }));
    assert_eq!(classes.get("Disjoint"), Some(&ClassCohesion { lcom4: 2, density: 0.0 }));
    assert_eq!(classes.get("Shared"), Some(&ClassCohesion { lcom4: 1, density: 1.0 }));
}

#[test]
fn instability_of_isolated_and_connected_modules() {
    let dir = project(&[
        ("island.py", "x = 1\n"),
        ("client.py", "import service\n"),
        ("service.py", "y = 2\n"),
    ]);
    let snap = snapshot(&dir);
    assert!(close(snap.instability("island"), 0.5));
    assert!(close(snap.instability("client"), 1.0));
    assert!(close(snap.instability("service"), 0.0));
}

#[test]
fn fully_abstract_module() {
    let src = "\
from abc import ABC, abstractmethod

class Repository(ABC):
    @abstractmethod
    def get(self, key):
        pass
";
    let dir = project(&[("repo.py", src), ("impl.py", "class Memory:\n    pass\n")]);
    let snap = snapshot(&dir);
    assert!(close(snap.abstractness("repo"), 1.0));
    assert!(close(snap.abstractness("impl"), 0.0));
    assert!(close(snap.distance("repo"), 0.5));
}

#[test]
fn mutual_imports_form_one_cycle() {
    let dir = project(&[("a.py", "import b\n"), ("b.py", "from a import thing\n")]);
    let snap = snapshot(&dir);
    assert_eq!(snap.project_cycles(), vec![vec!["a".to_string(), "b".to_string()]]);

    let mut virtual_map: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    virtual_map.insert("A", vec!["B"]);
    virtual_map.insert("B", vec!["A"]);
    let cycles = detect_cycles(virtual_map);
    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].contains(&"A".to_string()) && cycles[0].contains(&"B".to_string()));
}

#[test]
fn audit_checks_allowed_dependencies() {
    let dir = project(&[
        ("models.py", "class User:\n    pass\n"),
        ("utils.py", "def helper():\n    return 1\n"),
        ("app.py", "import os\nimport models\nfrom utils import helper\nimport app\n"),
    ]);
    let snap = snapshot(&dir);
    let app = dir.path().join("app.py");

    assert!(!snap.audit_implementation(&app, &["models"]));
    assert!(snap.audit_implementation(&app, &["models", "utils"]));

    let report = snap.audit_file(&app, &["models"]);
    assert_eq!(report.module.as_deref(), Some("app"));
    assert!(report.violations.contains("utils"));
    assert!(!report.violations.contains("os"));
    assert!(!report.violations.contains("app"));
}

#[test]
fn audit_resolves_relative_paths_against_root() {
    let dir = project(&[("models.py", "x = 1\n"), ("svc.py", "import models\n")]);
    let snap = snapshot(&dir);
    let empty: [&str; 0] = [];
    assert!(!snap.audit_implementation(Path::new("svc.py"), &empty));
}

#[test]
fn audit_fails_for_unparsable_or_missing_files() {
    let dir = project(&[("ok.py", "x = 1\n"), ("broken.py", "def f(:\n")]);
    let snap = snapshot(&dir);
    let empty: [&str; 0] = [];

    let report = snap.audit_file(&dir.path().join("broken.py"), &empty);
    assert!(!report.passed());
    assert!(report.error.is_some());
    assert!(!snap.audit_implementation(&dir.path().join("nope.py"), &empty));
}

#[test]
fn preprocessing_is_deterministic() {
    let dir = project(&[
        ("pkg/__init__.py", ""),
        ("pkg/core.py", "import util\nclass Engine:\n    def run(self):\n        if self.ready:\n            self.go()\n"),
        ("util.py", "import pkg.core\nfor i in range(3):\n    print(i)\n"),
        ("main.py", "from pkg import core\nimport util\n"),
    ]);
    let first = serde_json::to_string(&snapshot(&dir).project_report()).expect("serialize");
    let second = serde_json::to_string(&snapshot(&dir).project_report()).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn syntax_errors_skip_only_the_broken_file() {
    let dir = project(&[
        ("good.py", "import broken\nx = 1\n"),
        ("broken.py", "class Oops(\n    pass\n"),
    ]);
    let snap = snapshot(&dir);

    assert!(snap.module_graph("good").is_some());
    assert!(snap.module_graph("broken").is_none());
    assert_eq!(snap.failures().len(), 1);
    assert_eq!(snap.failures()[0].module, "broken");
    assert_eq!(snap.missing_modules(["good", "broken"]), vec!["broken".to_string()]);

    // still whitelisted, so the import counts
    assert!(snap.internal_modules().contains("broken"));
    assert_eq!(snap.coupling_counts("good").efferent(), 1);
}

#[test]
fn unknown_modules_get_favorable_defaults() {
    let dir = project(&[("a.py", "x = 1\n")]);
    let snap = snapshot(&dir);
    assert!(close(snap.coupling("ghost"), 100.0));
    assert!(snap.cohesion("ghost").is_empty());
    assert!(close(snap.abstractness("ghost"), 0.0));
    assert!(close(snap.instability("ghost"), 0.5));
    assert!(snap.complexity("ghost").is_empty());
}

#[test]
fn scan_conventions_prune_tests_caches_and_excludes() {
    let dir = project(&[
        ("app.py", "x = 1\n"),
        ("test_app.py", "import app\n"),
        ("tests/helpers.py", "y = 1\n"),
        ("__pycache__/app.py", "z = 1\n"),
        ("generated/models.py", "m = 1\n"),
        ("archgauge.toml", "[scan]\nexclude = [\"^generated/\"]\n"),
    ]);
    let config = Config::load(dir.path()).expect("config loads");
    let snap = Snapshot::build(dir.path(), &config).expect("snapshot should build");

    let modules: Vec<&str> = snap.modules().collect();
    assert_eq!(modules, vec!["app"]);
    assert!(!snap.internal_modules().contains("helpers"));
    assert!(!snap.internal_modules().contains("generated.models"));
}

#[test]
fn packages_collapse_and_resolve_by_top_level() {
    let dir = project(&[
        ("shop/__init__.py", "from .cart import Cart\n"),
        ("shop/cart.py", "from . import pricing\nclass Cart:\n    pass\n"),
        ("shop/pricing.py", "RATE = 2\n"),
        ("main.py", "from shop.cart import Cart\nimport shop\n"),
    ]);
    let snap = snapshot(&dir);

    let modules: Vec<&str> = snap.modules().collect();
    assert_eq!(modules, vec!["main", "shop", "shop.cart", "shop.pricing"]);
    assert!(snap.internal_modules().contains("shop"));

    let main_deps: Vec<&String> = snap.dependencies()["main"].iter().collect();
    assert_eq!(main_deps, vec!["shop"]);
    // relative imports inside the package stay inside it
    assert!(snap.dependencies()["shop.cart"].is_empty());
    assert_eq!(snap.coupling_counts("shop").afferent(), 1);
}

#[test]
fn reports_aggregate_metrics() {
    let src = "\
class Split:
    def a(self):
        self.x = 1
    def b(self):
        self.y = 2
    def c(self):
        self.z = 3

def walk(items):
    for item in items:
        if item:
            print(item)
";
    let dir = project(&[("mod.py", src), ("user.py", "import mod\n")]);
    let snap = snapshot(&dir);

    let report = snap.module_report("mod");
    assert_eq!(report.worst_lcom4, 3);
    assert_eq!(report.afferent, 1);
    assert_eq!(report.functions.get("walk").map(|f| f.cyclomatic), Some(3));
    assert!(report.functions.contains_key("Split.a"));
    // coupling 100, mean LCOM4 3 ⇒ penalty 50
    assert!(close(report.health_score, 50.0));

    let project_report = snap.project_report();
    assert_eq!(project_report.modules.len(), 2);
    assert!(project_report.cycles.is_empty());

    let distribution = snap.function_distribution();
    assert_eq!(
        distribution.get("mod"),
        Some(&vec!["Split.a".to_string(), "Split.b".to_string(), "Split.c".to_string(), "walk".to_string()])
    );

    let deps = snap.dependency_graph();
    assert_eq!(deps.edges, vec![("user".to_string(), "mod".to_string())]);
}

#[test]
fn guarded_imports_count_for_dependencies_and_audit_alike() {
    let dir = project(&[
        ("a.py", "try:\n    import b\nexcept ImportError:\n    b = None\n"),
        ("b.py", "x = 1\n"),
    ]);
    let snap = snapshot(&dir);
    let empty: [&str; 0] = [];
    let a = dir.path().join("a.py");

    assert!(snap.dependencies()["a"].contains("b"));
    assert!(snap.coupling("a") < 100.0);
    let report = snap.audit_file(&a, &empty);
    assert!(report.violations.contains("b"));
    assert!(!snap.audit_implementation(&a, &empty));
    assert!(snap.audit_implementation(&a, &["b"]));
}

#[test]
fn classes_under_with_blocks_are_measured() {
    let src = "\
with lock:
    class Cache:
        def get(self):
            return self.items
        def put(self, value):
            self.items = value
";
    let dir = project(&[("cache.py", src)]);
    let classes = snapshot(&dir).cohesion("cache");
    assert_eq!(classes.get("Cache"), Some(&ClassCohesion { lcom4: 1, density: 1.0 }));
}

#[test]
fn module_reports_carry_code_metrics() {
    let src = "\
# pricing rules
def total(items, rate):
    value = 0
    for item in items:
        if item > 0:
            value += item * rate
    return value
";
    let dir = project(&[("pricing.py", src)]);
    let snap = snapshot(&dir);
    let code = snap.module_report("pricing").code;

    assert_eq!(code.raw.loc, 7);
    assert_eq!(code.raw.comments, 1);
    assert_eq!(code.raw.sloc, 6);
    assert!(code.halstead.volume > 0.0);
    assert!(code.total_complexity >= 3);
    assert!((0.0..=100.0).contains(&code.maintainability));
    assert!(code.maintainability < 100.0);

    let unknown = snap.code_metrics("ghost");
    assert!(close(unknown.maintainability, 100.0));
}

#[test]
fn allowed_submodule_admits_its_package() {
    let dir = project(&[
        ("pkg/__init__.py", ""),
        ("pkg/sub.py", "x = 1\n"),
        ("pkg/other.py", "y = 2\n"),
        ("app.py", "import pkg.other\n"),
    ]);
    let snap = snapshot(&dir);
    let app = dir.path().join("app.py");
    let empty: [&str; 0] = [];

    assert!(snap.audit_file(&app, &empty).violations.contains("pkg"));
    assert!(snap.audit_implementation(&app, &["pkg.sub"]));
}

#[test]
fn imports_of_the_own_package_are_exempt() {
    let dir = project(&[
        ("pkg/__init__.py", ""),
        ("pkg/a.py", "import pkg.b\nfrom pkg import c\nfrom . import b\n"),
        ("pkg/b.py", "x = 1\n"),
        ("pkg/c.py", "y = 2\n"),
    ]);
    let snap = snapshot(&dir);
    let empty: [&str; 0] = [];

    let report = snap.audit_file(&dir.path().join("pkg/a.py"), &empty);
    assert_eq!(report.module.as_deref(), Some("pkg.a"));
    assert!(report.imports.contains("pkg"));
    assert!(report.passed());
}

#[test]
fn relative_imports_climbing_out_of_the_package_are_audited() {
    let dir = project(&[
        ("pkg/__init__.py", ""),
        ("pkg/a.py", "from .. import util\n"),
        ("util.py", "z = 1\n"),
    ]);
    let snap = snapshot(&dir);
    let a = dir.path().join("pkg/a.py");
    let empty: [&str; 0] = [];

    let report = snap.audit_file(&a, &empty);
    assert_eq!(report.violations.iter().collect::<Vec<_>>(), vec!["util"]);
    assert!(snap.audit_implementation(&a, &["util"]));
    assert!(snap.dependencies()["pkg.a"].contains("util"));
}
