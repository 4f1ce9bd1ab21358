//! The dependencies report: graph-rank adjacency data rendered as XML.

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use agraph_core::{
    Analyzer, Artifact, ArtifactKind, ArtifactRegistry, GRAPH_RANK, GraphNode, GraphNodes,
};
use agraph_error::{Error, Result};
use tempfile::NamedTempFile;
use tracing::{info, trace};

use crate::xml::XmlBuilder;

const UNRESOLVED_PREFIX: &str = "unresolved_";

/// Collects one graph-rank result plus the artifact registry and writes the
/// dependency graph as an XML document on [`close`](Self::close).
///
/// Every node of the adjacency map becomes an `<artifact>` element in map
/// order, with its deduplicated `<in>` and `<out>` neighbors as stubs. Ids the
/// registry does not know are rendered as `unresolved_<id>` of type `unknown`.
#[derive(Debug, Default)]
pub struct DependenciesReport {
    registry: ArtifactRegistry,
    nodes: Option<GraphNodes>,
    log_file: Option<PathBuf>,
}

impl DependenciesReport {
    /// Report name used in configuration errors.
    pub const NAME: &'static str = "dependencies";

    pub fn new() -> Self {
        Self::default()
    }

    /// Capability tags of the analyzers this report consumes.
    pub fn accepted_analyzers(&self) -> &'static [&'static str] {
        &[GRAPH_RANK]
    }

    /// Keep the adjacency map of a graph-rank analyzer; anything else is
    /// ignored. A later accepted analyzer replaces an earlier one.
    pub fn log(&mut self, analyzer: &dyn Analyzer) -> bool {
        let capability = analyzer.capability();
        if !self.accepted_analyzers().iter().any(|tag| *tag == capability) {
            trace!(capability, report = Self::NAME, "ignoring analyzer");
            return false;
        }
        match analyzer.nodes() {
            Some(nodes) => {
                self.nodes = Some(nodes.clone());
                true
            }
            None => {
                trace!(capability, report = Self::NAME, "analyzer has no nodes");
                false
            }
        }
    }

    /// Register `artifacts` and everything reachable from them.
    pub fn set_artifacts<'a, I>(&mut self, artifacts: I) -> usize
    where
        I: IntoIterator<Item = &'a Artifact<'a>>,
    {
        self.registry.register(artifacts)
    }

    pub fn set_log_file(&mut self, path: impl Into<PathBuf>) {
        self.log_file = Some(path.into());
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    /// Render the document without writing it.
    pub fn render(&self) -> String {
        let mut xml = XmlBuilder::new();
        let nodes = match &self.nodes {
            Some(nodes) if !nodes.is_empty() => nodes,
            _ => {
                xml.empty("artifacts", &[]);
                return xml.build();
            }
        };

        xml.open("artifacts", &[]);
        for node in nodes {
            self.render_node(&mut xml, node);
        }
        xml.close("artifacts");
        xml.build()
    }

    fn render_node(&self, xml: &mut XmlBuilder, node: &GraphNode) {
        let stub = self.stub(&node.id);
        xml.open("artifact", &stub.attrs());
        self.render_edges(xml, "in", &node.incoming);
        self.render_edges(xml, "out", &node.outgoing);
        xml.close("artifact");
    }

    fn render_edges(&self, xml: &mut XmlBuilder, tag: &str, ids: &[String]) {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect();

        if unique.is_empty() {
            xml.empty(tag, &[]);
            return;
        }
        xml.open(tag, &[]);
        for id in unique {
            xml.empty("artifact", &self.stub(id).attrs());
        }
        xml.close(tag);
    }

    fn stub<'r>(&'r self, id: &str) -> Stub<'r> {
        match self.registry.lookup(id) {
            Some(descriptor) => Stub {
                name: Cow::Borrowed(descriptor.name.as_str()),
                kind: descriptor.kind,
                namespace: match descriptor.kind {
                    ArtifactKind::Namespace => "",
                    _ => descriptor.namespace_name.as_str(),
                },
            },
            None => Stub {
                name: Cow::Owned(format!("{UNRESOLVED_PREFIX}{id}")),
                kind: ArtifactKind::Unknown,
                namespace: "",
            },
        }
    }

    /// Render and write the document to the configured log file.
    ///
    /// The document is written to a uniquely named temporary file in the
    /// destination directory and renamed into place, so readers never see a
    /// partial document. On failure the temporary file is removed.
    pub fn close(&self) -> Result<()> {
        let path = self
            .log_file
            .as_deref()
            .ok_or_else(|| Error::no_log_output(Self::NAME).with_operation("report::close"))?;

        let document = self.render();
        write_atomic(path, &document).map_err(|err| err.with_operation("report::close"))?;

        info!(
            path = %path.display(),
            artifacts = self.nodes.as_ref().map_or(0, GraphNodes::len),
            "dependencies report written"
        );
        Ok(())
    }
}

/// Resolved attributes of one rendered artifact.
struct Stub<'r> {
    name: Cow<'r, str>,
    kind: ArtifactKind,
    namespace: &'r str,
}

impl Stub<'_> {
    fn attrs(&self) -> [(&'static str, &str); 3] {
        [
            ("name", self.name.as_ref()),
            ("type", self.kind.label()),
            ("namespace", self.namespace),
        ]
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|err| Error::io_at(err, dir.display().to_string()))?;
    temp.write_all(contents.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|err| Error::io_at(err, temp.path().display().to_string()))?;
    // A failed persist drops the temporary file, which deletes it.
    temp.persist(path)
        .map_err(|err| Error::io_at(err.error, path.display().to_string()))?;
    Ok(())
}
