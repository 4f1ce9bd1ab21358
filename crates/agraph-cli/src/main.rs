use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use agraph::{AgraphOptions, RankOptions, run_main};
use agraph_core::Result;

#[derive(Parser, Debug)]
#[command(
    name = "agraph",
    about = "agraph: export artifact dependency graphs as XML",
    version
)]
pub struct Cli {
    /// Artifact manifest (JSON)
    #[arg(short = 'm', long = "manifest", value_name = "FILE")]
    manifest: PathBuf,

    /// Output file path for the XML document
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: PathBuf,

    /// Pre-computed adjacency map (JSON) used instead of the built-in analyzer
    #[arg(short = 'g', long = "graph", value_name = "FILE")]
    graph: Option<PathBuf>,

    #[command(flatten)]
    rank: RankOptions,
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = AgraphOptions {
        manifest: args.manifest,
        output: args.output,
        graph: args.graph,
        rank: args.rank,
    };

    if let Err(e) = run_main(&opts) {
        tracing::error!(error = %e, "execution failed");
        return Err(e);
    }

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(())
}

pub fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}
