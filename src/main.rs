use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use neuronet::{CapPolicy, EngineConfig, GraphEngine, SparseGraphEngine};

/// Printed by the `critical` task when the graph has no vertices.
const NO_CRITICAL_VERTEX: i64 = -1;

#[derive(Parser, Debug, Serialize)]
#[command(author, version, about)]
struct Args {

    /// Edge list file of whitespace separated "<src> <dst>" pairs.
    #[arg(short, long)]
    graph: PathBuf,

    /// The task to be performed: critical, bfs or stats.
    #[arg(short, long, default_value_t = String::from("critical"))]
    task: String,

    /// Start vertex of the bounded traversal.
    #[arg(short, long, default_value_t = 0)]
    start_vertex: i64,

    /// Maximum traversal depth in hops.
    #[arg(short, long, default_value_t = 2)]
    max_depth: i32,

    /// Optional YAML engine configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show a spinner while the edge list is scanned.
    #[arg(short, long, default_value_t = false)]
    progress: bool,

    /// Check the emission limit per vertex only, as older releases did.
    #[arg(long, default_value_t = false)]
    soft_cap: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Args = Args::parse();

    let mut config = match &args.config {
        None => EngineConfig::default(),
        Some(path) => match EngineConfig::from_yaml_file(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}");
                return ExitCode::FAILURE;
            }
        },
    };
    config.show_progress |= args.progress;
    if args.soft_cap {
        config.cap_policy = CapPolicy::Soft;
    }

    // Step 1: Build the CSR graph from the edge list.
    let mut engine = SparseGraphEngine::new(config);
    let start = Instant::now();
    if let Err(err) = engine.load_graph(&args.graph) {
        error!("{err}");
        return ExitCode::FAILURE;
    }
    println!("Load Elapsed Time: {:?} us", start.elapsed().as_micros());

    // Step 2: Perform the task, and report the time.
    let start = Instant::now();
    if args.task == "critical" {
        let critical = engine.critical_vertex().unwrap_or(NO_CRITICAL_VERTEX);
        println!("Critical Vertex: {}", critical);
    } else if args.task == "bfs" {
        let edges = engine.bounded_traversal(args.start_vertex, args.max_depth);
        for (src, dst) in &edges {
            println!("{} {}", src, dst);
        }
        println!("BFS Edges: {}", edges.len());
    } else if args.task == "stats" {
        let Some(stats) = engine.stats() else {
            return ExitCode::FAILURE;
        };
        match serde_yaml::to_string(&stats) {
            Ok(yaml) => print!("{}", yaml),
            Err(err) => {
                error!("{err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Task {} not supported in NeuroNet.", args.task);
        return ExitCode::FAILURE;
    }
    println!("{} Elapsed Time: {:?} us", args.task, start.elapsed().as_micros());

    ExitCode::SUCCESS
}
