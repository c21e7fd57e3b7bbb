//! Evigraph CLI
//!
//! Command-line front end for the evidence graph viewer core:
//! - `show`: load an RO-Crate JSON-LD document, expand, lay out, render
//!   (JSON view or Graphviz DOT)
//! - `path`: explain how two entities are related
//! - `inspect`: list the document's entities and their relations

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use evigraph_layout::Direction;
use evigraph_model::{entity_id, relation_targets, semantic_type, GraphDocument, Relation};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod session;

use config::ViewerConfig;
use render::{render_dot, render_json, GraphView};
use session::{GraphSession, Relationship};

#[derive(Parser)]
#[command(name = "evigraph")]
#[command(author, version, about = "Evigraph: interactive evidence graph viewer core")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the evidence graph of a JSON-LD document.
    Show {
        #[command(flatten)]
        graph: GraphArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Flow direction (LR|RL|TB|BT); overrides the config file
        #[arg(long)]
        direction: Option<Direction>,
        /// Highlight the relationship between two nodes
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
        highlight: Option<Vec<String>>,
        /// Write the rendering here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show how two entities are related.
    ///
    /// Searches the rendered graph first, then the raw document.
    Path {
        #[command(flatten)]
        graph: GraphArgs,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List entities with their semantic types and relation counts.
    Inspect {
        /// Input JSON-LD document
        input: PathBuf,
    },
}

#[derive(Args)]
struct GraphArgs {
    /// Input JSON-LD document
    input: PathBuf,
    /// Levels expanded on load; overrides the config file
    #[arg(long)]
    depth: Option<usize>,
    /// Expand this node after loading (repeatable, applied in order)
    #[arg(long = "expand", value_name = "ID")]
    expand: Vec<String>,
    /// Viewer config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Dot,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_document(path: &Path) -> Result<GraphDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    GraphDocument::from_json_str(&text).with_context(|| format!("failed to load {}", path.display()))
}

fn open_session(args: &GraphArgs, direction: Option<Direction>) -> Result<GraphSession> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.expansion.initial_depth = depth;
    }
    if let Some(direction) = direction {
        config.layout.direction = direction;
    }

    let mut session = GraphSession::new(config);
    session.load(read_document(&args.input)?);
    for id in &args.expand {
        let added = session.expand(id)?;
        info!(node = %id, nodes = added.node_ids.len(), edges = added.edges, "expand");
    }
    Ok(session)
}

fn cmd_show(
    graph: &GraphArgs,
    format: Format,
    direction: Option<Direction>,
    highlight: Option<&[String]>,
    out: Option<&Path>,
) -> Result<()> {
    let mut session = open_session(graph, direction)?;

    let pending = session.request_layout();
    if let Some(outcome) = session.apply_layout(pending) {
        info!(
            ranks = outcome.stats.ranks,
            crossings = outcome.stats.crossings,
            sweeps = outcome.stats.sweeps,
            "layout"
        );
    }

    if let Some([from, to]) = highlight {
        if session.find_relationship(from, to).is_none() {
            warn!(from = %from, to = %to, "no relationship to highlight");
        }
    }

    let view = GraphView::from_session(&session);
    let rendered = match format {
        Format::Json => render_json(&view)?,
        Format::Dot => render_dot(&view),
    };

    match out {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "Wrote".green(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_path(graph: &GraphArgs, from: &str, to: &str, json: bool) -> Result<()> {
    let mut session = open_session(graph, None)?;
    let relationship = session
        .find_relationship(from, to)
        .ok_or_else(|| anyhow!("no relationship between `{from}` and `{to}`"))?;

    if json {
        let value = match &relationship {
            Relationship::Rendered(path) => serde_json::json!({
                "source": "rendered",
                "nodeIds": path.node_ids,
                "edgeIds": path.edge_ids,
            }),
            Relationship::Raw {
                path,
                unmaterialized,
            } => serde_json::json!({
                "source": "document",
                "nodeIds": path,
                "unmaterialized": unmaterialized,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match relationship {
        Relationship::Rendered(path) => {
            println!("{} ({} hops)", "Rendered path".green().bold(), path.edge_ids.len());
            for id in &path.node_ids {
                println!("  {id}");
            }
        }
        Relationship::Raw {
            path,
            unmaterialized,
        } => {
            println!("{} ({} hops)", "Document path".yellow().bold(), path.len() - 1);
            for id in &path {
                if unmaterialized.contains(id) {
                    println!("  {id} {}", "(not expanded)".dimmed());
                } else {
                    println!("  {id}");
                }
            }
        }
    }
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<()> {
    let document = read_document(input)?;
    println!(
        "{} {} ({} entities)",
        "Document".bold(),
        input.display(),
        document.len()
    );
    for (i, entity) in document.entities().iter().enumerate() {
        let id = entity_id(entity).unwrap_or("<no @id>");
        let kind = semantic_type(entity).unwrap_or("Thing");
        let relations: Vec<String> = Relation::ENTITY_RELATIONS
            .iter()
            .filter_map(|&relation| {
                let count = relation_targets(entity, relation).len();
                (count > 0).then(|| format!("{}={count}", relation.key()))
            })
            .collect();
        let marker = if i == 0 { "*" } else { " " };
        println!(
            "{marker} {} {} {}",
            id.bold(),
            kind.cyan(),
            relations.join(" ").dimmed()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Show {
            graph,
            format,
            direction,
            highlight,
            out,
        } => cmd_show(&graph, format, direction, highlight.as_deref(), out.as_deref()),
        Commands::Path {
            graph,
            from,
            to,
            json,
        } => cmd_path(&graph, &from, &to, json),
        Commands::Inspect { input } => cmd_inspect(&input),
    }
}
