//! metaclone command line tool.
//!
//! Provides the `metaclone` binary for working with JSON-serialized metadata
//! graphs:
//!
//! - `copy` registers cone roots, substitutes each of them and writes the
//!   graph (original nodes plus clones) back out.
//! - `inspect` summarizes a graph or the cone under one node.
//! - `sample` writes a small example graph to start from.
//!
//! Results are printed to stdout as JSON. Logs go to stderr, filtered by the
//! `METACLONE_LOG` environment variable (default `warn`).

mod sample;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use metaclone_copier::{Copier, CopierConfig, GraphHost};
use metaclone_core::{ConeShape, MetadataGraph, NodeId, NodeKind};

/// Identity-preserving deep copy of metadata graphs.
#[derive(Parser)]
#[command(name = "metaclone", about = "Identity-preserving deep copy of metadata graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Copy the cones under one or more roots.
    Copy {
        /// Path to the input graph (JSON).
        #[arg(short, long)]
        input: PathBuf,

        /// Path to write the graph with its clones to.
        #[arg(short, long)]
        output: PathBuf,

        /// Node id of a cone root. May be repeated.
        #[arg(short, long = "root", required = true)]
        roots: Vec<u32>,

        /// Leave copied type tables in traversal order.
        #[arg(long)]
        keep_traversal_order: bool,

        /// Do not resolve assembly references against assemblies in the graph.
        #[arg(long)]
        no_host_resolution: bool,

        /// Check that every copy is structurally isomorphic to its original.
        #[arg(long)]
        verify: bool,
    },

    /// Summarize a graph, or the cone under a node.
    Inspect {
        /// Path to the graph (JSON).
        #[arg(short, long)]
        input: PathBuf,

        /// Node id whose cone to describe.
        #[arg(short, long)]
        root: Option<u32>,
    },

    /// Write the built-in sample graph.
    Sample {
        /// Path to write the graph to.
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Copy {
            input,
            output,
            roots,
            keep_traversal_order,
            no_host_resolution,
            verify,
        } => {
            let config = CopierConfig {
                preserve_type_order: !keep_traversal_order,
                resolve_through_host: !no_host_resolution,
            };
            run_copy(&input, &output, &roots, config, verify)
        }
        Commands::Inspect { input, root } => run_inspect(&input, root),
        Commands::Sample { output } => run_sample(&output),
    };
    process::exit(exit_code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("METACLONE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute the copy subcommand.
///
/// Returns exit code: 0 = success, 1 = invalid graph, copy error or failed
/// verification, 3 = I/O error.
fn run_copy(input: &Path, output: &Path, roots: &[u32], config: CopierConfig, verify: bool) -> i32 {
    let mut graph = match load_graph(input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return e.exit_code();
        }
    };
    let before = graph.len();
    let host = GraphHost;

    let copies = {
        let mut copier = Copier::new(&mut graph).with_config(config).with_host(&host);
        for &root in roots {
            if let Err(e) = copier.register_root(NodeId(root)) {
                eprintln!("Copy error: {}", e);
                return 1;
            }
        }
        let mut copies = Vec::with_capacity(roots.len());
        for &root in roots {
            match copier.substitute(NodeId(root)) {
                Ok(copy) => copies.push((NodeId(root), copy)),
                Err(e) => {
                    eprintln!("Copy error: {}", e);
                    return 1;
                }
            }
        }
        debug!(roots = roots.len(), cached = copier.cache().len(), "copy finished");
        copies
    };

    if verify {
        for &(original, copy) in &copies {
            match shapes_match(&graph, original, copy) {
                Ok(true) => {}
                Ok(false) => {
                    eprintln!(
                        "Verification failed: copy {} of {} is not isomorphic to it",
                        copy,
                        graph.describe(original)
                    );
                    return 1;
                }
                Err(msg) => {
                    eprintln!("Verification failed: {}", msg);
                    return 1;
                }
            }
        }
    }

    if let Err(msg) = save_graph(&graph, output) {
        eprintln!("Error: {}", msg);
        return 3;
    }

    let summary = json!({
        "copies": copies
            .iter()
            .map(|(original, copy)| json!({ "original": original, "copy": copy }))
            .collect::<Vec<_>>(),
        "nodes_added": graph.len() - before,
        "verified": verify,
    });
    print_json(&summary);
    0
}

/// Execute the inspect subcommand.
///
/// Returns exit code: 0 = success, 1 = invalid graph or unknown node,
/// 3 = I/O error.
fn run_inspect(input: &Path, root: Option<u32>) -> i32 {
    let graph = match load_graph(input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return e.exit_code();
        }
    };

    let summary = match root {
        Some(root) => match ConeShape::of(&graph, NodeId(root)) {
            Ok(shape) => json!({
                "root": graph.describe(NodeId(root)),
                "nodes": shape.node_count(),
                "edges": shape.edge_count(),
                "members": shape
                    .members()
                    .map(|id| graph.describe(id))
                    .collect::<Vec<_>>(),
            }),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        None => graph_summary(&graph),
    };
    print_json(&summary);
    0
}

/// Execute the sample subcommand.
///
/// Returns exit code: 0 = success, 1 = build error, 3 = I/O error.
fn run_sample(output: &Path) -> i32 {
    let (graph, ids) = match sample::geometry() {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: failed to build sample graph: {}", e);
            return 1;
        }
    };
    if let Err(msg) = save_graph(&graph, output) {
        eprintln!("Error: {}", msg);
        return 3;
    }
    print_json(&json!({
        "assembly": ids.assembly,
        "point": ids.point,
        "clone_method": ids.clone_method,
        "nodes": graph.len(),
    }));
    0
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Why a graph could not be loaded.
enum LoadError {
    /// Reading or parsing the file failed.
    Io(String),
    /// The graph parsed but has edges to missing nodes.
    Invalid(String),
}

impl LoadError {
    fn exit_code(&self) -> i32 {
        match self {
            LoadError::Io(_) => 3,
            LoadError::Invalid(_) => 1,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(msg) | LoadError::Invalid(msg) => f.write_str(msg),
        }
    }
}

fn load_graph(path: &Path) -> Result<MetadataGraph, LoadError> {
    let text = fs::read_to_string(path)
        .map_err(|e| LoadError::Io(format!("failed to read '{}': {}", path.display(), e)))?;
    let graph: MetadataGraph = serde_json::from_str(&text)
        .map_err(|e| LoadError::Io(format!("failed to parse '{}': {}", path.display(), e)))?;
    graph
        .validate()
        .map_err(|e| LoadError::Invalid(format!("invalid graph '{}': {}", path.display(), e)))?;
    debug!(path = %path.display(), nodes = graph.len(), "loaded graph");
    Ok(graph)
}

fn save_graph(graph: &MetadataGraph, path: &Path) -> Result<(), String> {
    let text = serde_json::to_string(graph)
        .map_err(|e| format!("failed to serialize graph: {}", e))?;
    fs::write(path, text).map_err(|e| format!("failed to write '{}': {}", path.display(), e))
}

fn shapes_match(graph: &MetadataGraph, original: NodeId, copy: NodeId) -> Result<bool, String> {
    let a = ConeShape::of(graph, original).map_err(|e| e.to_string())?;
    let b = ConeShape::of(graph, copy).map_err(|e| e.to_string())?;
    Ok(a.is_isomorphic(&b))
}

/// Node counts per kind plus the type table of every unit.
fn graph_summary(graph: &MetadataGraph) -> serde_json::Value {
    let mut kinds: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut units = Vec::new();
    for (id, node) in graph.iter() {
        *kinds.entry(node.kind().as_str()).or_default() += 1;
        if matches!(node.kind(), NodeKind::Assembly | NodeKind::Module) {
            if let Some(module) = node.module_data() {
                let types: Vec<String> = module
                    .all_types
                    .iter()
                    .map(|&ty| graph.type_full_name(ty).unwrap_or_else(|| graph.describe(ty)))
                    .collect();
                units.push(json!({
                    "id": id,
                    "name": graph.resolve(module.name),
                    "kind": node.kind().as_str(),
                    "types": types,
                }));
            }
        }
    }
    json!({
        "nodes": graph.len(),
        "kinds": kinds,
        "units": units,
    })
}

fn print_json(value: &serde_json::Value) {
    let text = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", text);
}
