use crate::types::Family;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use tracing::debug;

/// Wrapper around a petgraph DiGraph of parent -> child relationships.
///
/// Nodes are person ids, added in input order; edges come from the parsed
/// households. The builder assumes no cycles are reachable from the chosen
/// root and does not check for them: cyclic input is an open risk of the
/// input format, not something this graph corrects.
pub struct FamilyGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl FamilyGraph {
    /// Build the relationship graph from a parsed family.
    pub fn from_family(family: &Family) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for person in family.persons_in_order() {
            let index = graph.add_node(person.id.clone());
            node_map.insert(person.id.clone(), index);
        }

        for (parent, child) in family.relationships() {
            if let (Some(&from), Some(&to)) = (node_map.get(parent), node_map.get(child)) {
                graph.add_edge(from, to, ());
            }
        }

        debug!(
            "built family graph with {} persons and {} relationships",
            graph.node_count(),
            graph.edge_count()
        );
        Self { graph, node_map }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Direct children of a person, in input order.
    pub fn children(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Direct parents of a person, in input order.
    pub fn parents(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<String> {
        let Some(&index) = self.node_map.get(id) else {
            return Vec::new();
        };

        let mut neighbors: Vec<String> = self
            .graph
            .neighbors_directed(index, direction)
            .filter_map(|neighbor| self.graph.node_weight(neighbor).cloned())
            .collect();
        // petgraph yields neighbors most-recently-added first.
        neighbors.reverse();
        neighbors
    }

    /// Persons with no parents, in input order. The first one is the default
    /// root when no ancestor is requested.
    pub fn roots(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .filter(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .filter_map(|index| self.graph.node_weight(index).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FamilyParser;

    fn build(text: &str) -> FamilyGraph {
        let family = FamilyParser::new().parse(text).unwrap();
        FamilyGraph::from_family(&family)
    }

    #[test]
    fn test_children_and_parents() {
        let graph = build("A\nB\n\tC\n\tD\n");

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.children("A"), vec!["C", "D"]);
        assert_eq!(graph.parents("C"), vec!["A", "B"]);
        assert!(graph.children("D").is_empty());
    }

    #[test]
    fn test_unknown_id_has_no_neighbors() {
        let graph = build("A\n\tB\n");
        assert!(graph.children("nobody").is_empty());
        assert!(graph.parents("nobody").is_empty());
    }

    #[test]
    fn test_roots_in_input_order() {
        let graph = build("A\n\tC\n\nB\n\tC\n");
        assert_eq!(graph.roots(), vec!["A", "B"]);
    }

    #[test]
    fn test_contains() {
        let graph = build("A\n\tB\n");
        assert!(graph.contains("A"));
        assert!(!graph.contains("Z"));
    }
}
