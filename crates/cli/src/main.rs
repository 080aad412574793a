//! Starmap CLI - builds orbit diagrams into KDL documents.
//!
//! The document is a template holding a `Background` layer and an
//! `OrbitsPrototype` layer with the glyphs every orbit is cloned from. The
//! orbit list can be XML, KDL or JSON.

mod logger;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use interchange::{orbits_to_kdl, Document, OrbitFile};
use logger::{log_section, StarmapLogger};
use orbits::{build_diagram, DiagramConfig, OrbitSpec};
use scene_graph::{LayerId, SceneGraph};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Starmap - lay out orbit diagrams from a template document
#[derive(Parser)]
#[command(name = "starmap")]
#[command(about = "Builds radial orbit diagrams from a template document")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also append log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the diagram into a copy of the document
    Build {
        /// Template document (.kdl)
        #[arg(short, long)]
        document: PathBuf,

        /// Orbit list (.xml, .kdl or .json)
        #[arg(short, long)]
        orbits: PathBuf,

        /// Diagram config (.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to write the result (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the layer tree of a document
    Inspect {
        /// Document (.kdl)
        #[arg(short, long)]
        document: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse an orbit list and print it, e.g. to convert XML to KDL
    Orbits {
        /// Orbit list (.xml, .kdl or .json)
        #[arg(short, long)]
        orbits: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OrbitOutput::Json)]
        format: OrbitOutput,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OrbitOutput {
    Json,
    Kdl,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    StarmapLogger::init(
        StarmapLogger::level_for_verbosity(cli.verbose),
        cli.log_file.as_deref(),
    )?;

    match cli.command {
        Commands::Build {
            document,
            orbits,
            config,
            out,
        } => build(&document, &orbits, config.as_deref(), out.as_deref()),
        Commands::Inspect { document, json } => inspect(&document, json),
        Commands::Orbits { orbits, format } => print_orbits(&orbits, format),
    }
}

fn load_config(path: Option<&Path>) -> Result<DiagramConfig> {
    let Some(path) = path else {
        return Ok(DiagramConfig::default());
    };
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    DiagramConfig::from_json(&input).with_context(|| format!("Invalid config {}", path.display()))
}

fn load_document(path: &Path) -> Result<Document> {
    Document::load(path).with_context(|| format!("Failed to load document {}", path.display()))
}

/// Build the diagram and write the resulting document.
fn build(document: &Path, orbits: &Path, config: Option<&Path>, out: Option<&Path>) -> Result<()> {
    log_section("build");
    let config = load_config(config)?;
    let mut doc = load_document(document)?;
    let mut source = OrbitFile::new(orbits)
        .with_context(|| format!("Failed to open orbit list {}", orbits.display()))?;

    let report = build_diagram(Some(&mut doc.scene), &mut source, &config)
        .with_context(|| format!("Failed to build diagram from {}", document.display()))?;

    for outcome in &report.orbits {
        log::info!(
            "orbit `{}`: {} items",
            outcome.title,
            doc.scene.item_count(outcome.layer)
        );
    }

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        eprintln!("{} warning(s):", warnings.len());
        for warning in warnings {
            eprintln!("  {}", warning);
        }
    }

    match out {
        Some(path) => {
            doc.save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", doc.to_kdl()),
    }
    Ok(())
}

fn inspect(path: &Path, json: bool) -> Result<()> {
    let doc = load_document(path)?;
    if json {
        let tree = layer_json(&doc.scene, doc.scene.root());
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", layer_tree(&doc.scene));
    }
    Ok(())
}

fn print_orbits(path: &Path, format: OrbitOutput) -> Result<()> {
    let orbits = OrbitFile::new(path)
        .and_then(|file| file.read())
        .with_context(|| format!("Failed to read orbit list {}", path.display()))?;
    print!("{}", render_orbits(&orbits, format)?);
    Ok(())
}

fn render_orbits(orbits: &[OrbitSpec], format: OrbitOutput) -> Result<String> {
    Ok(match format {
        OrbitOutput::Json => serde_json::to_string_pretty(orbits)? + "\n",
        OrbitOutput::Kdl => orbits_to_kdl(orbits),
    })
}

/// Renders the layers below the document root as an indented tree.
fn layer_tree(scene: &SceneGraph) -> String {
    let mut out = String::new();
    let mut stack: Vec<(LayerId, usize)> = scene
        .children(scene.root())
        .iter()
        .rev()
        .map(|&id| (id, 0))
        .collect();

    while let Some((id, depth)) = stack.pop() {
        let Some(layer) = scene.layer(id) else {
            continue;
        };
        let bounds = scene.bounds(id);
        let _ = write!(
            out,
            "{}{} ({} items",
            "  ".repeat(depth),
            layer.name(),
            scene.item_count(id)
        );
        if !bounds.is_empty() {
            let _ = write!(
                out,
                ", bounds {:.2} {:.2} {:.2} {:.2}",
                bounds.left, bounds.top, bounds.right, bounds.bottom
            );
        }
        out.push_str(")\n");

        stack.extend(layer.children().iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

fn layer_json(scene: &SceneGraph, id: LayerId) -> serde_json::Value {
    let Some(layer) = scene.layer(id) else {
        return serde_json::Value::Null;
    };
    let bounds = scene.bounds(id);
    serde_json::json!({
        "name": layer.name(),
        "opacity": layer.opacity(),
        "items": layer.items().len(),
        "bounds": (!bounds.is_empty()).then(|| [bounds.left, bounds.top, bounds.right, bounds.bottom]),
        "children": layer
            .children()
            .iter()
            .map(|&child| layer_json(scene, child))
            .collect::<Vec<_>>(),
    })
}
