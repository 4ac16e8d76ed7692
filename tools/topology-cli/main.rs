use cdn_topology::prelude::*;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Convert and validate CDN topologies from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional path to an engine configuration JSON file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Skip the "every cache group has servers" check
    #[arg(long, global = true)]
    no_servers_check: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a flat topology into its nested tree form
    Tree {
        /// Path to the flat topology JSON file
        topology_path: String,
        /// Path to the cache group snapshot JSON file
        directory_path: String,
    },
    /// Flatten a nested tree back into the stored topology form
    Flatten {
        /// Path to the forest JSON file
        forest_path: String,
        /// Path to the cache group snapshot JSON file
        directory_path: String,
        /// Name of the resulting topology
        #[arg(short, long)]
        name: String,
        /// Description of the resulting topology
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Validate a flat topology
    Validate {
        /// Path to the flat topology JSON file
        topology_path: String,
        /// Path to the cache group snapshot JSON file
        directory_path: String,
        /// Report every violation instead of stopping at the first
        #[arg(short, long)]
        all: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EngineConfig::default(),
    };
    if cli.no_servers_check {
        config.require_servers = false;
    }

    match cli.command {
        Command::Tree {
            topology_path,
            directory_path,
        } => run_tree(&topology_path, &directory_path, config),
        Command::Flatten {
            forest_path,
            directory_path,
            name,
            description,
        } => run_flatten(&forest_path, &directory_path, &name, &description, config),
        Command::Validate {
            topology_path,
            directory_path,
            all,
        } => run_validate(&topology_path, &directory_path, all, config),
    }
}

fn run_tree(topology_path: &str, directory_path: &str, config: EngineConfig) {
    let start = Instant::now();
    let snapshot = load_snapshot(directory_path);
    let topology = load_topology(topology_path);

    let engine = TopologyEngine::builder(&snapshot, &snapshot)
        .with_config(config)
        .build();
    let forest = engine
        .topology_to_tree(&topology)
        .unwrap_or_else(|e| exit_with_error(&format!("Projection failed: {}", e)));

    print_json(&forest);
    eprintln!("Projected {} node(s) in {:?}", topology.nodes.len(), start.elapsed());
}

fn run_flatten(
    forest_path: &str,
    directory_path: &str,
    name: &str,
    description: &str,
    config: EngineConfig,
) {
    let start = Instant::now();
    let snapshot = load_snapshot(directory_path);
    let forest_json = fs::read_to_string(forest_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read forest file '{}': {}",
            forest_path, e
        ))
    });
    let forest: Forest = serde_json::from_str(&forest_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse forest JSON: {}", e)));

    let engine = TopologyEngine::builder(&snapshot, &snapshot)
        .with_config(config)
        .build();
    let topology = engine
        .tree_to_topology(name, description, &forest)
        .unwrap_or_else(|e| exit_with_error(&format!("Flattening failed: {}", e)));

    print_json(&topology);
    eprintln!("Flattened {} node(s) in {:?}", topology.nodes.len(), start.elapsed());
}

fn run_validate(topology_path: &str, directory_path: &str, all: bool, config: EngineConfig) {
    let snapshot = load_snapshot(directory_path);
    let topology = load_topology(topology_path);
    let engine = TopologyEngine::builder(&snapshot, &snapshot)
        .with_config(config)
        .build();

    if all {
        let violations = engine.violations(&topology);
        if violations.is_empty() {
            println!("OK: topology '{}' is valid", topology.name);
            return;
        }
        for violation in &violations {
            println!("  - {}", violation);
        }
        exit_with_error(&format!("{} violation(s) found", violations.len()));
    }

    match engine.validate(&topology) {
        Ok(graph) => {
            println!("OK: topology '{}' is valid", topology.name);
            for warning in graph.warnings() {
                println!("  warning: {}", warning);
            }
        }
        Err(e) => exit_with_error(&format!("{:?} error: {}", e.class(), e)),
    }
}

fn load_snapshot(path: &str) -> DirectorySnapshot {
    DirectorySnapshot::from_file(path, &TierMapping::default()).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load cache group snapshot: {}", e))
    })
}

fn load_topology(path: &str) -> FlatTopology {
    FlatTopology::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load topology: {}", e)))
}

fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));
    println!("{}", json);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
