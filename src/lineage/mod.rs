pub mod graph;
pub mod traversal;

pub use graph::FamilyGraph;
pub use traversal::{plan, Generations, TraversalMode, TraversalPlan};
