//! Artifact model, registry, type filtering and graph-rank analysis.
pub mod analyzer;
pub mod artifact;
pub mod coderank;
pub mod filter;
pub mod manifest;
pub mod registry;

pub use agraph_error::{Error, ErrorKind, Result};

pub use analyzer::{Analyzer, GRAPH_RANK, GraphNode, GraphNodes};
pub use artifact::{Artifact, ArtifactArena, HasKind, NodeKind, TypeName};
pub use coderank::{CodeRankAnalyzer, CodeRankConfig, RankedNode};
pub use filter::{NodeFilter, NodeIterator, TypeFilter};
pub use manifest::Manifest;
pub use registry::{ArtifactDescriptor, ArtifactKind, ArtifactRegistry};
