//! Reference graph-rank analyzer.
//!
//! Derives the dependency adjacency map from declared artifact dependencies
//! and scores every node with a damped rank that flows from dependents to the
//! artifacts they depend on.

use std::collections::HashSet;

use tracing::debug;

use crate::analyzer::{Analyzer, GRAPH_RANK, GraphNodes};
use crate::artifact::{Artifact, HasKind, TypeName};
use crate::filter::{NodeIterator, TypeFilter};

/// Configuration options for the rank computation.
#[derive(Debug, Clone)]
pub struct CodeRankConfig {
    /// Damping factor used when random walkers jump to a random node.
    pub damping_factor: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Convergence tolerance (L1 delta between successive rank vectors).
    pub tolerance: f64,
}

impl Default for CodeRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// One node with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNode {
    pub id: String,
    pub rank: f64,
}

#[derive(Debug, Default)]
pub struct CodeRankAnalyzer {
    config: CodeRankConfig,
    type_filter: Option<TypeFilter>,
    nodes: GraphNodes,
    ranks: Vec<f64>,
    iterations: usize,
    converged: bool,
}

impl CodeRankAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodeRankConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Only analyze types the filter accepts.
    pub fn with_type_filter(mut self, filter: TypeFilter) -> Self {
        self.type_filter = Some(filter);
        self
    }

    pub fn config(&self) -> &CodeRankConfig {
        &self.config
    }

    /// Build the adjacency map from `artifacts` and compute ranks.
    ///
    /// Namespaces contribute their types; every type contributes an edge per
    /// declared dependency, plus a namespace level edge when the dependency
    /// lives in another namespace. Edges are recorded as declared, duplicates
    /// included. The type filter applies to namespace members and to types
    /// passed directly alike. Previous results are discarded.
    pub fn analyze<'a, I>(&mut self, artifacts: I)
    where
        I: IntoIterator<Item = &'a Artifact<'a>>,
    {
        self.nodes = GraphNodes::new();

        for artifact in artifacts {
            if artifact.is_a(TypeName::Namespace) {
                self.nodes.ensure(artifact.id());
                for ty in self.accepted(artifact.types()) {
                    self.visit_type(ty);
                }
            } else if artifact.is_a(TypeName::Type) {
                for ty in self.accepted(vec![artifact]) {
                    self.visit_type(ty);
                }
            }
        }

        self.compute_ranks();
        debug!(
            nodes = self.nodes.len(),
            iterations = self.iterations,
            converged = self.converged,
            "code rank computed"
        );
    }

    fn accepted<'a>(&self, types: Vec<&'a Artifact<'a>>) -> Vec<&'a Artifact<'a>> {
        match &self.type_filter {
            Some(filter) => NodeIterator::new(types, filter).collect(),
            None => types,
        }
    }

    fn visit_type(&mut self, ty: &Artifact<'_>) {
        if !ty.is_a(TypeName::Type) {
            return;
        }
        self.nodes.ensure(ty.id());

        for dependency in ty.dependencies() {
            self.nodes.add_edge(ty.id(), dependency.id());

            if let (Some(from), Some(to)) = (ty.namespace(), dependency.namespace()) {
                if from.id() != to.id() {
                    self.nodes.add_edge(from.id(), to.id());
                }
            }
        }
    }

    fn compute_ranks(&mut self) {
        let total_nodes = self.nodes.len();
        if total_nodes == 0 {
            self.ranks.clear();
            self.iterations = 0;
            self.converged = true;
            return;
        }

        // Distinct successors per node; duplicates carry no extra weight.
        let adjacency: Vec<Vec<usize>> = self
            .nodes
            .iter()
            .map(|node| {
                let mut seen = HashSet::new();
                node.outgoing
                    .iter()
                    .filter(|id| seen.insert(id.as_str()))
                    .filter_map(|id| self.nodes.position(id))
                    .collect()
            })
            .collect();

        let damping = self.config.damping_factor;
        let teleport = (1.0 - damping) / total_nodes as f64;
        let mut ranks = vec![1.0 / total_nodes as f64; total_nodes];
        let mut next_ranks = vec![0.0; total_nodes];

        self.iterations = 0;
        self.converged = false;

        for iter in 0..self.config.max_iterations {
            self.iterations = iter + 1;
            next_ranks.fill(teleport);

            let mut sink_mass = 0.0;
            for (idx, neighbours) in adjacency.iter().enumerate() {
                if neighbours.is_empty() {
                    sink_mass += ranks[idx];
                    continue;
                }

                let share = ranks[idx] * damping / neighbours.len() as f64;
                for &target_idx in neighbours {
                    next_ranks[target_idx] += share;
                }
            }

            if sink_mass > 0.0 {
                let redistributed = sink_mass * damping / total_nodes as f64;
                for value in &mut next_ranks {
                    *value += redistributed;
                }
            }

            let delta: f64 = next_ranks
                .iter()
                .zip(&ranks)
                .map(|(new_score, old_score)| (new_score - old_score).abs())
                .sum();

            ranks.copy_from_slice(&next_ranks);

            if delta < self.config.tolerance {
                self.converged = true;
                break;
            }
        }

        self.ranks = ranks;
    }

    pub fn rank(&self, id: &str) -> Option<f64> {
        self.nodes
            .position(id)
            .and_then(|idx| self.ranks.get(idx).copied())
    }

    /// All nodes by descending rank; ties keep analysis order.
    pub fn ranked(&self) -> Vec<RankedNode> {
        let mut ranked: Vec<RankedNode> = self
            .nodes
            .iter()
            .zip(&self.ranks)
            .map(|(node, &rank)| RankedNode {
                id: node.id.clone(),
                rank,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.rank
                .partial_cmp(&a.rank)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl Analyzer for CodeRankAnalyzer {
    fn capability(&self) -> &str {
        GRAPH_RANK
    }

    fn nodes(&self) -> Option<&GraphNodes> {
        Some(&self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactArena, NodeKind};
    use crate::type_filter;
    use pretty_assertions::assert_eq;

    #[test]
    fn records_type_and_namespace_edges() {
        let arena = ArtifactArena::new();
        let app = arena.namespace("ns:app", "app");
        let lib = arena.namespace("ns:lib", "lib");
        let user = arena.declare(app, "c:User", "User", NodeKind::Class);
        let repo = arena.declare(lib, "i:Repo", "Repo", NodeKind::Interface);
        let session = arena.declare(app, "c:Session", "Session", NodeKind::Class);
        user.add_dependency(repo);
        user.add_dependency(repo);
        user.add_dependency(session);

        let mut analyzer = CodeRankAnalyzer::new();
        analyzer.analyze([app, lib]);
        let nodes = analyzer.nodes().unwrap();

        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["ns:app", "c:User", "i:Repo", "ns:lib", "c:Session"]);
        assert_eq!(
            nodes.get("c:User").unwrap().outgoing,
            ["i:Repo", "i:Repo", "c:Session"]
        );
        assert_eq!(nodes.get("ns:app").unwrap().outgoing, ["ns:lib", "ns:lib"]);
        assert_eq!(nodes.get("ns:lib").unwrap().incoming, ["ns:app", "ns:app"]);
        assert!(nodes.get("c:Session").unwrap().outgoing.is_empty());
    }

    #[test]
    fn dependencies_rank_above_dependents() {
        let arena = ArtifactArena::new();
        let ns = arena.namespace("ns", "app");
        let base = arena.declare(ns, "base", "Base", NodeKind::Class);
        for i in 0..3 {
            let user = arena.declare(ns, &format!("user{i}"), "User", NodeKind::Class);
            user.add_dependency(base);
        }

        let mut analyzer = CodeRankAnalyzer::new();
        analyzer.analyze([ns]);

        assert!(analyzer.converged());
        assert!(analyzer.iterations() > 0);
        assert_eq!(analyzer.ranked()[0].id, "base");
        assert!(analyzer.rank("base").unwrap() > analyzer.rank("user0").unwrap());
        assert_eq!(analyzer.rank("missing"), None);
    }

    #[test]
    fn type_filter_limits_analyzed_types() {
        let arena = ArtifactArena::new();
        let ns = arena.namespace("ns", "app");
        let class = arena.declare(ns, "c", "C", NodeKind::Class);
        let iface = arena.declare(ns, "i", "I", NodeKind::Interface);
        class.add_dependency(iface);
        iface.add_dependency(class);

        let mut analyzer = CodeRankAnalyzer::new().with_type_filter(type_filter!("Interface"));
        analyzer.analyze([ns]);
        let nodes = analyzer.nodes().unwrap();

        assert_eq!(nodes.get("i").unwrap().outgoing, ["c"]);
        assert!(nodes.get("c").unwrap().outgoing.is_empty());
    }

    #[test]
    fn type_filter_applies_to_directly_passed_types() {
        let arena = ArtifactArena::new();
        let ns = arena.namespace("ns", "app");
        let class = arena.declare(ns, "c", "C", NodeKind::Class);
        let iface = arena.declare(ns, "i", "I", NodeKind::Interface);
        class.add_dependency(iface);

        let mut analyzer = CodeRankAnalyzer::new().with_type_filter(type_filter!("Interface"));
        analyzer.analyze([class, iface]);
        let nodes = analyzer.nodes().unwrap();

        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["i"]);
    }

    #[test]
    fn cyclic_graph_converges() {
        let arena = ArtifactArena::new();
        let ns = arena.namespace("ns", "app");
        let a = arena.declare(ns, "a", "A", NodeKind::Class);
        let b = arena.declare(ns, "b", "B", NodeKind::Class);
        a.add_dependency(b);
        b.add_dependency(a);

        let mut analyzer = CodeRankAnalyzer::new();
        analyzer.analyze([ns]);

        let a_rank = analyzer.rank("a").unwrap();
        let b_rank = analyzer.rank("b").unwrap();
        assert!((a_rank - b_rank).abs() < 1e-6);
    }

    #[test]
    fn empty_input_yields_empty_graph() {
        let mut analyzer = CodeRankAnalyzer::new();
        analyzer.analyze(std::iter::empty());
        assert!(analyzer.nodes().unwrap().is_empty());
        assert!(analyzer.ranked().is_empty());
        assert!(analyzer.converged());
    }
}
