// SPDX-License-Identifier: MIT OR Apache-2.0
//! `shaderbridge` command-line driver
//!
//! ```bash
//! shaderbridge export scene.json -o materials.json
//! shaderbridge import materials.json --hierarchy hierarchy.json --dump graph.json
//! shaderbridge hash materials.json
//! ```
//!
//! Log verbosity follows `RUST_LOG`, defaulting to `info` for the
//! shaderbridge crates.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use shaderbridge_graph::ContentHash;
use shaderbridge_translate::{
    export_scene_to_document, import_document_into_graph, load_document, ExportOptions, MemoryGraph, SourceScene,
    TargetGraph, TranslatorConfig,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "shaderbridge")]
#[command(about = "Translate Blender shading networks into Gaffer/Cycles graphs", long_about = None)]
struct Cli {
    /// Translator configuration (`.ron`, or `.json` label map)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a document into an in-memory target graph and print the report
    Import {
        /// Materials document, combined or materials-only
        document: PathBuf,

        /// Separate hierarchy document
        #[arg(long)]
        hierarchy: Option<PathBuf>,

        /// Write the built target graph as JSON
        #[arg(long)]
        dump: Option<PathBuf>,

        /// Write the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print the content hash of every network and list duplicates
    Hash {
        /// Materials document
        document: PathBuf,
    },

    /// Export a serialized source scene as a document
    Export {
        /// Source scene JSON
        scene: PathBuf,

        /// Root of the location paths
        #[arg(long)]
        root: Option<String>,

        /// Only export selected objects and their materials
        #[arg(long)]
        selected_only: bool,

        /// Output file, stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shaderbridge=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => TranslatorConfig::load(path)?,
        None => TranslatorConfig::default(),
    };

    match cli.command {
        Commands::Import {
            document,
            hierarchy,
            dump,
            report,
        } => import(&config, &document, hierarchy.as_deref(), dump.as_deref(), report.as_deref()),
        Commands::Hash { document } => hash(&document),
        Commands::Export {
            scene,
            root,
            selected_only,
            output,
        } => {
            let mut options = ExportOptions::from_config(&config);
            if let Some(root) = root {
                options.root = root;
            }
            options.selected_only = selected_only;
            export(&config, &scene, &options, output.as_deref())
        }
    }
}

fn import(
    config: &TranslatorConfig,
    document: &Path,
    hierarchy: Option<&Path>,
    dump: Option<&Path>,
    report: Option<&Path>,
) -> Result<()> {
    let document = load_document(document, hierarchy)?;
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let result = import_document_into_graph(&document, &mut graph, root, config)?;

    println!("{}", result.report.summary());
    for network in result.report.degraded_networks() {
        println!(
            "  degraded: {} ({} unknown nodes, {} dropped links, {} unresolved params)",
            network.network,
            network.unknown_nodes.len(),
            network.dropped_links.len(),
            network.unresolved_params.len()
        );
    }

    if let Some(path) = dump {
        write_json(path, &graph)?;
        tracing::info!("Wrote target graph to {:?}", path);
    }
    if let Some(path) = report {
        write_json(path, &result.report)?;
        tracing::info!("Wrote report to {:?}", path);
    }
    Ok(())
}

fn hash(document: &Path) -> Result<()> {
    let document = load_document(document, None)?;
    let mut groups: IndexMap<ContentHash, Vec<&str>> = IndexMap::new();

    for (name, entry) in &document.materials {
        let network = entry.to_network(name)?;
        let hash = network.content_hash();
        println!("{hash}  {name}");
        groups.entry(hash).or_default().push(name);
    }

    for (hash, names) in groups.iter().filter(|(_, names)| names.len() > 1) {
        println!("duplicate {}: {}", hash.short(), names.join(", "));
    }
    Ok(())
}

fn export(config: &TranslatorConfig, scene: &Path, options: &ExportOptions, output: Option<&Path>) -> Result<()> {
    let text = std::fs::read_to_string(scene).with_context(|| format!("Failed to read {scene:?}"))?;
    let scene: SourceScene = serde_json::from_str(&text).with_context(|| format!("Invalid source scene {scene:?}"))?;

    let document = export_scene_to_document(&scene, options, config);
    tracing::info!(
        "Exported {} materials, {} hierarchy entries",
        document.materials.len(),
        document.hierarchy.len()
    );

    let json = document.to_json_string()?;
    match output {
        Some(path) => std::fs::write(path, json).with_context(|| format!("Failed to write {path:?}"))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {path:?}"))
}
