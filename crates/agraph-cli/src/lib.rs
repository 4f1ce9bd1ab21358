//! agraph command-line interface.
//!
pub mod options;
pub mod pipeline;

use std::path::PathBuf;

pub use options::RankOptions;
pub use pipeline::run_main;

/// Options for running agraph.
#[derive(Debug, Clone, Default)]
pub struct AgraphOptions {
    /// Artifact manifest (JSON).
    pub manifest: PathBuf,
    /// Destination of the XML document.
    pub output: PathBuf,
    /// Pre-computed adjacency map replacing the built-in analyzer.
    pub graph: Option<PathBuf>,
    pub rank: RankOptions,
}
