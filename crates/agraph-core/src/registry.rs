//! Id -> descriptor registry built from the artifact graph.

use std::collections::{HashMap, HashSet};

use strum_macros::{Display, EnumIter, IntoStaticStr};
use tracing::debug;

use crate::artifact::{Artifact, HasKind, TypeName};

/// Reported kind of a registered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ArtifactKind {
    Class,
    Interface,
    Namespace,
    #[default]
    Unknown,
}

/// Known kinds in classification order; the first type name a node is-a wins.
const KNOWN_KINDS: [(TypeName, ArtifactKind); 3] = [
    (TypeName::Class, ArtifactKind::Class),
    (TypeName::Interface, ArtifactKind::Interface),
    (TypeName::Namespace, ArtifactKind::Namespace),
];

impl ArtifactKind {
    /// Lowercase label used in reports.
    pub fn label(&self) -> &'static str {
        (*self).into()
    }
}

/// Resolved, link-free view of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub id: String,
    pub name: String,
    pub kind: ArtifactKind,
    /// Name of the owning namespace; always empty for namespaces.
    pub namespace_name: String,
}

impl ArtifactDescriptor {
    pub fn describe(artifact: &Artifact<'_>) -> Self {
        let kind = ArtifactRegistry::kind_of(artifact);
        let namespace_name = match kind {
            ArtifactKind::Namespace => String::new(),
            _ => artifact
                .namespace()
                .map(|ns| ns.name().to_string())
                .unwrap_or_default(),
        };
        Self {
            id: artifact.id().to_string(),
            name: artifact.name().to_string(),
            kind,
            namespace_name,
        }
    }
}

/// Mapping from artifact id to its descriptor.
///
/// Registration is additive: repeated [`register`](Self::register) calls merge
/// into the same map and nothing is dropped until [`reset`](Self::reset).
#[derive(Debug, Default, Clone)]
pub struct ArtifactRegistry {
    descriptors: HashMap<String, ArtifactDescriptor>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `artifacts` and everything reachable from them.
    ///
    /// Namespaces descend into their types, classes and interfaces into their
    /// declared dependencies. Each id is visited at most once per call, so
    /// cyclic and diamond-shaped graphs terminate. Within a call the first
    /// occurrence of an id wins and later artifacts reusing that id are not
    /// described; ids are expected to be unique. A later call overwrites
    /// descriptors it visits again. Returns the number of artifacts visited.
    pub fn register<'a, I>(&mut self, artifacts: I) -> usize
    where
        I: IntoIterator<Item = &'a Artifact<'a>>,
    {
        let mut visited: HashSet<&'a str> = HashSet::new();
        let mut worklist: Vec<&'a Artifact<'a>> = artifacts.into_iter().collect();
        // Stack order: reverse so artifacts are visited in the order given.
        worklist.reverse();

        while let Some(artifact) = worklist.pop() {
            if !visited.insert(artifact.id()) {
                continue;
            }
            self.insert(ArtifactDescriptor::describe(artifact));

            let children = if artifact.is_a(TypeName::Namespace) {
                artifact.types()
            } else if artifact.is_a(TypeName::ClassOrInterface) {
                artifact.dependencies()
            } else {
                Vec::new()
            };
            worklist.extend(
                children
                    .into_iter()
                    .rev()
                    .filter(|child| !visited.contains(child.id())),
            );
        }

        debug!(
            visited = visited.len(),
            total = self.descriptors.len(),
            "registered artifacts"
        );
        visited.len()
    }

    /// Store a descriptor, replacing any previous one with the same id.
    pub fn insert(&mut self, descriptor: ArtifactDescriptor) {
        self.descriptors.insert(descriptor.id.clone(), descriptor);
    }

    pub fn lookup(&self, id: &str) -> Option<&ArtifactDescriptor> {
        self.descriptors.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.descriptors.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Drop every descriptor.
    pub fn reset(&mut self) {
        self.descriptors.clear();
    }

    /// Classify a node against the closed list of reported kinds.
    pub fn kind_of<N: HasKind + ?Sized>(node: &N) -> ArtifactKind {
        KNOWN_KINDS
            .iter()
            .find(|(ty, _)| node.is_a(*ty))
            .map(|(_, kind)| *kind)
            .unwrap_or_default()
    }
}
