//! Analyzer interface and the adjacency map analyzers hand to reports.

use std::collections::HashMap;
use std::path::Path;

use agraph_error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Capability tag of analyzers producing a dependency adjacency map.
pub const GRAPH_RANK: &str = "graph-rank";

/// A metric analyzer whose results reports may consume.
pub trait Analyzer {
    /// Capability tag reports match against, e.g. [`GRAPH_RANK`].
    fn capability(&self) -> &str;

    /// Adjacency map, for analyzers that compute one.
    fn nodes(&self) -> Option<&GraphNodes> {
        None
    }
}

/// Incoming and outgoing neighbor ids of one node, as recorded (duplicates kept).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "in", default)]
    pub incoming: Vec<String>,
    #[serde(rename = "out", default)]
    pub outgoing: Vec<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Ordered adjacency map keyed by artifact id.
///
/// Iteration follows first-insertion order; that order is the report order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<GraphNode>", into = "Vec<GraphNode>")]
pub struct GraphNodes {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
}

impl GraphNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON list form, `[{"id": .., "in": [..], "out": [..]}, ..]`.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("graph::from_json")
                .set_source(err)
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| Error::io_at(err, path.display().to_string()))?;
        Self::from_json(&text).map_err(|err| err.with_context("path", path.display().to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| {
            Error::unexpected(err.to_string())
                .with_operation("graph::to_json")
                .set_source(err)
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GraphNode> {
        self.nodes.iter()
    }

    /// Get the node for `id`, appending an empty one if it is new.
    pub fn ensure(&mut self, id: &str) -> &mut GraphNode {
        let position = match self.index.get(id) {
            Some(&position) => position,
            None => {
                self.nodes.push(GraphNode::new(id));
                self.index.insert(id.to_string(), self.nodes.len() - 1);
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[position]
    }

    /// Record `from -> to`: outgoing on `from`, incoming on `to`.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.ensure(from).outgoing.push(to.to_string());
        self.ensure(to).incoming.push(from.to_string());
    }

    /// Merge a node; edges of an existing id are appended.
    pub fn insert(&mut self, node: GraphNode) {
        let GraphNode {
            id,
            incoming,
            outgoing,
        } = node;
        let entry = self.ensure(&id);
        entry.incoming.extend(incoming);
        entry.outgoing.extend(outgoing);
    }
}

impl From<Vec<GraphNode>> for GraphNodes {
    fn from(nodes: Vec<GraphNode>) -> Self {
        let mut graph = GraphNodes::new();
        for node in nodes {
            graph.insert(node);
        }
        graph
    }
}

impl From<GraphNodes> for Vec<GraphNode> {
    fn from(graph: GraphNodes) -> Self {
        graph.nodes
    }
}

impl<'a> IntoIterator for &'a GraphNodes {
    type Item = &'a GraphNode;
    type IntoIter = std::slice::Iter<'a, GraphNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A pre-computed adjacency map is itself a graph-rank result, e.g. one
/// produced by an external tool and loaded from disk.
impl Analyzer for GraphNodes {
    fn capability(&self) -> &str {
        GRAPH_RANK
    }

    fn nodes(&self) -> Option<&GraphNodes> {
        Some(self)
    }
}
