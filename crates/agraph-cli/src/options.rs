//! Command-line option groups.

use clap::Args;

use agraph_core::{CodeRankConfig, TypeFilter};

/// Options controlling the graph-rank analysis.
#[derive(Args, Debug, Clone, Default)]
pub struct RankOptions {
    /// Only analyze types of these kinds (comma separated), e.g. `Class,Interface`.
    #[arg(long = "types", value_name = "NAME", value_delimiter = ',')]
    pub types: Vec<String>,

    /// Damping factor of the rank computation.
    #[arg(long = "damping")]
    pub damping: Option<f64>,

    /// Iteration limit of the rank computation.
    #[arg(long = "max-iterations")]
    pub max_iterations: Option<usize>,
}

impl RankOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// A type filter, when any type was requested.
    pub fn type_filter(&self) -> Option<TypeFilter> {
        if self.types.is_empty() {
            None
        } else {
            Some(TypeFilter::from_list(self.types.iter().cloned()))
        }
    }

    pub fn rank_config(&self) -> CodeRankConfig {
        let mut config = CodeRankConfig::default();
        if let Some(damping) = self.damping {
            config.damping_factor = damping;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        config
    }
}
