// src/graph/cycles.rs
//! Simple-cycle enumeration for dependency maps.
//!
//! Dependency cycles are architectural errors. Every elementary cycle is
//! reported (Johnson's algorithm), not just one per strongly connected
//! component, so a pre-flight check can show each loop a new module closes.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

/// Enumerates all simple cycles of a `{module: [imported, …]}` map.
///
/// Each cycle starts at its lexicographically smallest module and does not
/// repeat it at the end; a self-import is a one-element cycle. The result is
/// sorted, so equal inputs always give equal outputs.
pub fn detect_cycles<I, K, V, T>(map: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut edges: BTreeSet<(String, String)> = BTreeSet::new();
    let mut names: BTreeSet<String> = BTreeSet::new();

    for (from, targets) in map {
        let from = from.as_ref().to_string();
        names.insert(from.clone());
        for to in targets {
            let to = to.as_ref().to_string();
            names.insert(to.clone());
            edges.insert((from.clone(), to));
        }
    }

    // To ensure deterministic output, vertices are numbered in sorted order.
    let sorted: Vec<String> = names.into_iter().collect();
    let position: BTreeMap<&str, usize> = sorted
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); sorted.len()];
    for (from, to) in &edges {
        if let (Some(&a), Some(&b)) = (position.get(from.as_str()), position.get(to.as_str())) {
            if let Some(out) = adjacency.get_mut(a) {
                out.push(b);
            }
        }
    }

    let mut cycles: Vec<Vec<String>> = johnson(&adjacency)
        .into_iter()
        .map(|cycle| {
            cycle
                .into_iter()
                .filter_map(|i| sorted.get(i).cloned())
                .collect()
        })
        .collect();
    cycles.sort();
    cycles
}

/// Johnson's algorithm over an adjacency list with vertices `0..n`.
fn johnson(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut cycles = Vec::new();
    let mut start = 0;

    while start < adjacency.len() {
        let Some(component) = least_cyclic_component(adjacency, start) else {
            break;
        };
        let Some(&least) = component.iter().min() else {
            break;
        };

        let mut state = CircuitState::new(adjacency, component, least);
        state.circuit(least);
        cycles.append(&mut state.cycles);

        start = least + 1;
    }

    cycles
}

/// Among the SCCs of the subgraph induced by vertices `>= start`, returns
/// the one holding the smallest vertex that can take part in a cycle.
fn least_cyclic_component(adjacency: &[Vec<usize>], start: usize) -> Option<HashSet<usize>> {
    let mut sub: DiGraph<usize, ()> = DiGraph::new();
    let indices: Vec<_> = (start..adjacency.len()).map(|v| sub.add_node(v)).collect();

    for (offset, targets) in adjacency.iter().skip(start).enumerate() {
        for &to in targets {
            if to < start {
                continue;
            }
            if let (Some(&a), Some(&b)) = (indices.get(offset), indices.get(to - start)) {
                sub.add_edge(a, b, ());
            }
        }
    }

    tarjan_scc(&sub)
        .into_iter()
        .map(|scc| scc.into_iter().map(|ix| sub[ix]).collect::<HashSet<usize>>())
        .filter(|members| is_cyclic(adjacency, members))
        .min_by_key(|members| members.iter().min().copied().unwrap_or(usize::MAX))
}

fn is_cyclic(adjacency: &[Vec<usize>], members: &HashSet<usize>) -> bool {
    if members.len() > 1 {
        return true;
    }
    members
        .iter()
        .any(|&v| adjacency.get(v).is_some_and(|out| out.contains(&v)))
}

struct CircuitState<'a> {
    adjacency: &'a [Vec<usize>],
    members: HashSet<usize>,
    start: usize,
    blocked: HashSet<usize>,
    block_map: BTreeMap<usize, BTreeSet<usize>>,
    stack: Vec<usize>,
    cycles: Vec<Vec<usize>>,
}

impl<'a> CircuitState<'a> {
    fn new(adjacency: &'a [Vec<usize>], members: HashSet<usize>, start: usize) -> Self {
        Self {
            adjacency,
            members,
            start,
            blocked: HashSet::new(),
            block_map: BTreeMap::new(),
            stack: Vec::new(),
            cycles: Vec::new(),
        }
    }

    fn neighbors(&self, v: usize) -> Vec<usize> {
        self.adjacency
            .get(v)
            .map(|out| {
                out.iter()
                    .copied()
                    .filter(|w| self.members.contains(w))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn circuit(&mut self, v: usize) -> bool {
        let mut found = false;
        self.stack.push(v);
        self.blocked.insert(v);

        for w in self.neighbors(v) {
            if w == self.start {
                self.cycles.push(self.stack.clone());
                found = true;
            } else if !self.blocked.contains(&w) && self.circuit(w) {
                found = true;
            }
        }

        if found {
            self.unblock(v);
        } else {
            for w in self.neighbors(v) {
                self.block_map.entry(w).or_default().insert(v);
            }
        }

        self.stack.pop();
        found
    }

    fn unblock(&mut self, v: usize) {
        self.blocked.remove(&v);
        let dependents = self.block_map.remove(&v).unwrap_or_default();
        for w in dependents {
            if self.blocked.contains(&w) {
                self.unblock(w);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn map(list: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_cycle_detection_logic() {
        let cases: Vec<(BTreeMap<String, Vec<String>>, usize, &str)> = vec![
            (map(&[("a", &["b"]), ("b", &["c"])]), 0, "No cycles"),
            (map(&[("a", &["b"]), ("b", &["a"])]), 1, "Simple cycle"),
            (
                map(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"])]),
                0,
                "Diamond DAG (no cycle)",
            ),
            (map(&[("a", &["a"])]), 1, "Self loop"),
            (map(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]), 1, "Three node cycle"),
            (
                map(&[("a", &["b"]), ("b", &["a"]), ("c", &["d"]), ("d", &["c"])]),
                2,
                "Disjoint cycles",
            ),
            (
                map(&[("a", &["b"]), ("b", &["a", "c"]), ("c", &["b"])]),
                2,
                "Figure-8 (shared node)",
            ),
            (
                map(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"]), ("d", &["e"]), ("e", &["a"])]),
                1,
                "Long cycle (5 nodes)",
            ),
            (map(&[]), 0, "Empty graph"),
            (map(&[("a", &["b"])]), 0, "Single edge"),
            (
                map(&[("a", &["b", "c"]), ("b", &["c"]), ("c", &["a"])]),
                2,
                "Overlapping cycles through a chord",
            ),
        ];

        for (input, expected_count, desc) in cases {
            let cycles = detect_cycles(&input);
            assert_eq!(cycles.len(), expected_count, "Failed: {desc}");

            if desc == "Simple cycle" {
                assert_eq!(cycles[0], vec!["a".to_string(), "b".to_string()]);
            }
            if desc == "Self loop" {
                assert_eq!(cycles[0], vec!["a".to_string()]);
            }
        }
    }

    #[test]
    fn test_complete_graph_enumerates_every_circuit() {
        // K3 with both directions: three 2-cycles and two 3-cycles.
        let input = map(&[("a", &["b", "c"]), ("b", &["a", "c"]), ("c", &["a", "b"])]);
        assert_eq!(detect_cycles(&input).len(), 5);
    }

    #[test]
    fn test_cycle_content_starts_at_smallest() {
        let input = map(&[("z", &["x"]), ("x", &["y"]), ("y", &["z"])]);
        let cycles = detect_cycles(&input);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["x", "y", "z"]);
    }

    #[test]
    fn test_duplicate_edges_do_not_duplicate_cycles() {
        let input = vec![("a", vec!["b", "b"]), ("b", vec!["a"])];
        assert_eq!(detect_cycles(input).len(), 1);
    }

    #[test]
    fn test_targets_missing_from_keys_are_vertices() {
        let input = map(&[("a", &["ghost"])]);
        assert!(detect_cycles(&input).is_empty());
    }
}
