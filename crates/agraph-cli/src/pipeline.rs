//! Export pipeline: manifest → registry → analyzer → XML report.

use std::time::Instant;

use tracing::info;

use agraph_core::{Analyzer, ArtifactArena, CodeRankAnalyzer, GraphNodes, Manifest, Result};
use agraph_xml::DependenciesReport;

use crate::AgraphOptions;

/// Load the manifest, analyze it (or load `--graph`) and write the report.
pub fn run_main(opts: &AgraphOptions) -> Result<()> {
    let load_start = Instant::now();
    let manifest = Manifest::load(&opts.manifest)?;
    let arena = ArtifactArena::new();
    let namespaces = manifest.build(&arena)?;
    info!(
        namespaces = namespaces.len(),
        artifacts = arena.len(),
        secs = load_start.elapsed().as_secs_f64(),
        "manifest loaded"
    );

    let mut report = DependenciesReport::new();
    report.set_artifacts(namespaces.iter().copied());
    report.set_log_file(&opts.output);

    let analyze_start = Instant::now();
    let analyzer: Box<dyn Analyzer> = match &opts.graph {
        Some(path) => Box::new(GraphNodes::load(path)?),
        None => {
            let mut analyzer = CodeRankAnalyzer::with_config(opts.rank.rank_config());
            if let Some(filter) = opts.rank.type_filter() {
                analyzer = analyzer.with_type_filter(filter);
            }
            analyzer.analyze(namespaces.iter().copied());
            Box::new(analyzer)
        }
    };
    report.log(&*analyzer);
    info!(
        external = opts.graph.is_some(),
        secs = analyze_start.elapsed().as_secs_f64(),
        "analysis complete"
    );

    report.close()
}
