use crate::error::LookupError;
use crate::lineage::graph::FamilyGraph;
use std::collections::HashSet;
use tracing::debug;

/// Which relationships to follow when walking out from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMode {
    /// Follow parent -> child edges only.
    Descendants,
    /// Follow edges in both directions: ancestors and descendants.
    Full,
}

/// Lazy generation-by-generation walk from a root person.
///
/// Every call to [`Generations::new`] starts a fresh walk. Each person is
/// yielded at most once even when generations overlap, so diamond shapes
/// (shared ancestors, re-marriage) terminate and appear a single time.
pub struct Generations<'a> {
    graph: &'a FamilyGraph,
    mode: TraversalMode,
    current: Vec<String>,
    visited: HashSet<String>,
}

impl<'a> Generations<'a> {
    pub fn new(graph: &'a FamilyGraph, root: &str, mode: TraversalMode) -> Self {
        let mut visited = HashSet::new();
        visited.insert(root.to_string());
        Self {
            graph,
            mode,
            current: vec![root.to_string()],
            visited,
        }
    }
}

impl<'a> Iterator for Generations<'a> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_empty() {
            return None;
        }
        let generation = std::mem::take(&mut self.current);

        let mut next = Vec::new();
        for id in &generation {
            let mut related = self.graph.children(id);
            if self.mode == TraversalMode::Full {
                related.extend(self.graph.parents(id));
            }
            for other in related {
                if self.visited.insert(other.clone()) {
                    next.push(other);
                }
            }
        }
        self.current = next;

        Some(generation)
    }
}

/// Flattened traversal result shared by the serializers: visit order,
/// generation layers and the traversed parent -> child edges, all in a
/// deterministic order for a given input.
#[derive(Debug)]
pub struct TraversalPlan {
    pub generations: Vec<Vec<String>>,
    pub order: Vec<String>,
    pub edges: Vec<(String, String)>,
}

/// Walk the graph from `root` and collect the traversal plan.
///
/// Edge statements only ever reference visited persons, so serialized output
/// has no dangling references. A child reachable through several visited
/// parents keeps one node and one edge per parent: multiple-parent scenarios
/// produce a single merged subtree, never duplicated ones.
pub fn plan(
    graph: &FamilyGraph,
    root: &str,
    mode: TraversalMode,
) -> Result<TraversalPlan, LookupError> {
    if !graph.contains(root) {
        return Err(LookupError(root.to_string()));
    }

    let generations: Vec<Vec<String>> = Generations::new(graph, root, mode).collect();
    let order: Vec<String> = generations.iter().flatten().cloned().collect();
    let visited: HashSet<&str> = order.iter().map(String::as_str).collect();

    let mut edges = Vec::new();
    for id in &order {
        for child in graph.children(id) {
            if visited.contains(child.as_str()) {
                edges.push((id.clone(), child));
            }
        }
    }

    debug!(
        "traversal from {} visited {} persons over {} generations, {} edges",
        root,
        order.len(),
        generations.len(),
        edges.len()
    );
    Ok(TraversalPlan {
        generations,
        order,
        edges,
    })
}
