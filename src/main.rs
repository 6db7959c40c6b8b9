use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use family_tree_maker::{
    config::RenderConfig,
    error::LookupError,
    input::FamilyParser,
    lineage::{FamilyGraph, TraversalMode},
    output::{DotGenerator, GraphFormatter, JsonFormatter},
    types::Family,
};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "familytree")]
#[command(about = "Generates a family tree graph in DOT format from a simple text file")]
#[command(version = "0.1.0")]
struct Cli {
    /// The formatted text file describing the family
    input: PathBuf,

    /// Build the tree from this ancestor (id or name); if omitted, the first
    /// person without parents is used
    #[arg(short, long)]
    ancestor: Option<String>,

    /// Traversal direction from the root
    #[arg(short, long, value_enum, default_value = "descendants")]
    mode: Mode,

    /// Output format
    #[arg(short = 'F', long, value_enum, default_value = "dot")]
    format: Format,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rendering configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Descendants of the root only
    Descendants,
    /// Ancestors and descendants of the root
    Full,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Dot,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level)?;

    let config = load_config(cli.config.as_ref())?;

    let mut parser = FamilyParser::new();
    let family = parser
        .parse_file(&cli.input)
        .context("Failed to parse the family description")?;

    let graph = FamilyGraph::from_family(&family);
    let root = resolve_root(&family, &graph, cli.ancestor.as_deref())?;
    let mode = match cli.mode {
        Mode::Descendants => TraversalMode::Descendants,
        Mode::Full => TraversalMode::Full,
    };
    info!("generating tree from root {}", root);

    let content = match cli.format {
        Format::Dot => DotGenerator::new(config).format(&family, &graph, &root, mode)?,
        Format::Json => {
            let mut dump = JsonFormatter.format(&family, &graph, &root, mode)?;
            dump.push('\n');
            dump
        }
    };

    if let Some(path) = &cli.output {
        fs::write(path, &content)
            .with_context(|| format!("Failed to write output to: {:?}", path))?;
        info!("graph description written to: {:?}", path);
    } else {
        print!("{}", content);
    }

    Ok(())
}

/// Initialize tracing with the specified log level
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}

/// Load rendering configuration from file or use defaults
fn load_config(config_path: Option<&PathBuf>) -> Result<RenderConfig> {
    if let Some(path) = config_path {
        if path.exists() {
            info!("loading render configuration from: {:?}", path);
            let config = RenderConfig::load_from_file(path)
                .with_context(|| format!("Failed to load configuration from: {:?}", path))?;
            config.validate()?;
            return Ok(config);
        }
        warn!("configuration file not found: {:?}, using defaults", path);
    }
    Ok(RenderConfig::default())
}

/// Resolve the requested root identifier, or fall back to the first person
/// without parents.
fn resolve_root(family: &Family, graph: &FamilyGraph, requested: Option<&str>) -> Result<String> {
    match requested {
        Some(identifier) => family
            .find(identifier)
            .map(|person| person.id.clone())
            .ok_or_else(|| LookupError(identifier.to_string()).into()),
        None => graph
            .roots()
            .into_iter()
            .next()
            .context("the family description contains no person without parents"),
    }
}
