use crate::lineage::{FamilyGraph, TraversalMode};
use crate::types::Family;
use anyhow::Result;

pub mod dot;
pub mod json;

pub use dot::DotGenerator;
pub use json::JsonFormatter;

/// Trait for graph description formatters.
pub trait GraphFormatter {
    fn format(
        &self,
        family: &Family,
        graph: &FamilyGraph,
        root: &str,
        mode: TraversalMode,
    ) -> Result<String>;
}
