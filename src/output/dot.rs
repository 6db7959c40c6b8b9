use crate::config::RenderConfig;
use crate::lineage::{self, FamilyGraph, TraversalMode};
use crate::output::GraphFormatter;
use crate::types::{Family, Person};
use anyhow::Result;
use tracing::debug;

/// Generates a DOT graph description for the traversed part of a family.
///
/// Statement order is fixed: one node statement per visited person in
/// first-visit order, then one edge statement per traversed relationship in
/// traversal order, then optional rank groups. Given the same input the
/// output is byte-identical across runs.
pub struct DotGenerator {
    config: RenderConfig,
}

impl DotGenerator {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Produce the ordered DOT statements for a traversal from `root`.
    pub fn statements(
        &self,
        family: &Family,
        graph: &FamilyGraph,
        root: &str,
        mode: TraversalMode,
    ) -> Result<Vec<String>> {
        let plan = lineage::plan(graph, root, mode)?;
        let mut statements = Vec::new();

        for id in &plan.order {
            if let Some(person) = family.person(id) {
                statements.push(self.node_statement(person));
            }
        }

        for (parent, child) in &plan.edges {
            statements.push(format!("{} -> {};", quote(parent), quote(child)));
        }

        if mode == TraversalMode::Descendants && self.config.layout.rank_generations {
            for generation in &plan.generations {
                if generation.len() > 1 {
                    let ids: Vec<String> =
                        generation.iter().map(|id| quote(id)).collect();
                    statements.push(format!("{{ rank=same; {}; }}", ids.join("; ")));
                }
            }
        }

        debug!("emitting {} DOT statements", statements.len());
        Ok(statements)
    }

    /// Render the complete DOT document, header and footer included.
    pub fn render(
        &self,
        family: &Family,
        graph: &FamilyGraph,
        root: &str,
        mode: TraversalMode,
    ) -> Result<String> {
        let statements = self.statements(family, graph, root, mode)?;

        let mut out = String::from("digraph {\n");
        out.push_str(&format!("\tnode [shape={}];\n", self.config.graph.node_shape));
        out.push_str(&format!("\tedge [dir={}];\n", self.config.graph.edge_dir));
        out.push('\n');
        for statement in &statements {
            out.push('\t');
            out.push_str(statement);
            out.push('\n');
        }
        out.push_str("}\n");
        Ok(out)
    }

    fn node_statement(&self, person: &Person) -> String {
        let fillcolor = if person.is_female() {
            &self.config.colors.female
        } else if person.is_male() {
            &self.config.colors.male
        } else {
            &self.config.colors.unknown
        };

        format!(
            "{}[label=\"{}\",style=filled,fillcolor={}];",
            quote(&person.id),
            label(person),
            fillcolor
        )
    }
}

impl GraphFormatter for DotGenerator {
    fn format(
        &self,
        family: &Family,
        graph: &FamilyGraph,
        root: &str,
        mode: TraversalMode,
    ) -> Result<String> {
        self.render(family, graph, root, mode)
    }
}

/// Multi-line node label: name, surname, life dates and notes.
fn label(person: &Person) -> String {
    let mut lines = vec![escape(&person.name)];

    if let Some(surname) = person.attributes.get("surname") {
        lines.push(format!("« {}»", escape(surname)));
    }
    match (
        person.attributes.get("birthday"),
        person.attributes.get("deathday"),
    ) {
        (Some(birth), Some(death)) => {
            lines.push(format!("{} † {}", escape(birth), escape(death)))
        }
        (Some(birth), None) => lines.push(escape(birth)),
        (None, Some(death)) => lines.push(format!("† {}", escape(death))),
        (None, None) => {}
    }
    if let Some(notes) = person.attributes.get("notes") {
        lines.push(escape(notes));
    }

    lines.join("\\n")
}

/// Quote an identifier so it stays valid DOT whatever characters it holds.
fn quote(id: &str) -> String {
    format!("\"{}\"", escape(id))
}

/// Escape characters special to the DOT syntax inside a quoted string.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
