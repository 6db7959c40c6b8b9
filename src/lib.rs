pub mod config;
pub mod error;
pub mod input;
pub mod lineage;
pub mod output;
pub mod types;
