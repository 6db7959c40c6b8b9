use crate::lineage::{self, FamilyGraph, TraversalMode};
use crate::output::GraphFormatter;
use crate::types::{Family, Person};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Serializable dump of the traversed subgraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDump {
    pub root: String,
    pub persons: Vec<Person>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub parent: String,
    pub child: String,
}

/// JSON formatter, mostly useful for debugging and downstream tooling.
pub struct JsonFormatter;

impl GraphFormatter for JsonFormatter {
    fn format(
        &self,
        family: &Family,
        graph: &FamilyGraph,
        root: &str,
        mode: TraversalMode,
    ) -> Result<String> {
        let plan = lineage::plan(graph, root, mode)?;

        let dump = GraphDump {
            root: root.to_string(),
            persons: plan
                .order
                .iter()
                .filter_map(|id| family.person(id).cloned())
                .collect(),
            relationships: plan
                .edges
                .into_iter()
                .map(|(parent, child)| Relationship { parent, child })
                .collect(),
        };

        Ok(serde_json::to_string_pretty(&dump)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FamilyParser;

    #[test]
    fn test_json_dump_contains_visited_persons_and_edges() {
        let family = FamilyParser::new()
            .parse("Louis XIV (M)\n\tLouis, Grand Dauphin\n")
            .unwrap();
        let graph = FamilyGraph::from_family(&family);

        let output = JsonFormatter
            .format(&family, &graph, "LouisXIV", TraversalMode::Descendants)
            .unwrap();
        let dump: GraphDump = serde_json::from_str(&output).unwrap();

        assert_eq!(dump.root, "LouisXIV");
        assert_eq!(dump.persons.len(), 2);
        assert_eq!(
            dump.relationships,
            vec![Relationship {
                parent: "LouisXIV".to_string(),
                child: "LouisGrandDauphin".to_string(),
            }]
        );
    }

    #[test]
    fn test_json_output_is_identical_across_parses() {
        // Two independent parses must serialize attributes and flags in the
        // same order, byte for byte.
        let text = "Louis XIV (M, id=sunking, surname=le Grand, birthday=1638, \
                    deathday=1715, notes=the Sun King, reign=1643, crowned=1654, \
                    house=Bourbon)\n\tLouis, Grand Dauphin (M, birthday=1661)\n";

        let first_family = FamilyParser::new().parse(text).unwrap();
        let second_family = FamilyParser::new().parse(text).unwrap();

        let first = JsonFormatter
            .format(
                &first_family,
                &FamilyGraph::from_family(&first_family),
                "sunking",
                TraversalMode::Descendants,
            )
            .unwrap();
        let second = JsonFormatter
            .format(
                &second_family,
                &FamilyGraph::from_family(&second_family),
                "sunking",
                TraversalMode::Descendants,
            )
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_json_missing_root_is_an_error() {
        let family = FamilyParser::new().parse("A\n\tB\n").unwrap();
        let graph = FamilyGraph::from_family(&family);

        let result = JsonFormatter.format(&family, &graph, "nobody", TraversalMode::Descendants);
        assert!(result.is_err());
    }
}
