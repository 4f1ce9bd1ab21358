//! JSON manifest describing namespaces, their types and type dependencies.
//!
//! ```json
//! { "namespaces": [ { "id": "ns:app", "name": "app", "types": [
//!     { "id": "c:app.A", "name": "A", "kind": "class", "dependencies": ["c:app.B"] } ] } ] }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;

use agraph_error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::artifact::{Artifact, ArtifactArena, NodeKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub namespaces: Vec<NamespaceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub id: String,
    pub name: String,
    /// Kind name, e.g. `class`, `interface`, `trait`, `function`.
    pub kind: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("manifest::from_json")
                .set_source(err)
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| Error::io_at(err, path.display().to_string()))?;
        Self::from_json(&text).map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Allocate every artifact in `arena`, link types to their namespace and
    /// dependencies by id, and return the namespaces in manifest order.
    ///
    /// Dependencies naming ids the manifest does not declare are skipped.
    pub fn build<'a>(&self, arena: &'a ArtifactArena<'a>) -> Result<Vec<&'a Artifact<'a>>> {
        self.validate()?;

        let mut by_id: HashMap<&str, &'a Artifact<'a>> = HashMap::new();
        let mut namespaces = Vec::with_capacity(self.namespaces.len());

        for entry in &self.namespaces {
            let namespace = arena.namespace(&entry.id, &entry.name);
            by_id.insert(&entry.id, namespace);
            namespaces.push(namespace);

            for ty in &entry.types {
                let kind = parse_type_kind(ty)?;
                by_id.insert(&ty.id, arena.declare(namespace, &ty.id, &ty.name, kind));
            }
        }

        for ty in self.namespaces.iter().flat_map(|ns| &ns.types) {
            let Some(&artifact) = by_id.get(ty.id.as_str()) else {
                continue;
            };
            for dependency in &ty.dependencies {
                match by_id.get(dependency.as_str()) {
                    Some(&target) => artifact.add_dependency(target),
                    None => warn!(from = %ty.id, to = %dependency, "skipping unknown dependency"),
                }
            }
        }

        Ok(namespaces)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let ids = self
            .namespaces
            .iter()
            .flat_map(|ns| std::iter::once(&ns.id).chain(ns.types.iter().map(|ty| &ty.id)));
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(Error::invalid_format(format!("duplicate artifact id '{id}'"))
                    .with_operation("manifest::build")
                    .with_context("id", id.clone()));
            }
        }
        Ok(())
    }
}

fn parse_type_kind(ty: &TypeEntry) -> Result<NodeKind> {
    match NodeKind::from_str(ty.kind.trim()) {
        Ok(NodeKind::Namespace) | Err(_) => Err(Error::invalid_format(format!(
            "unsupported kind '{}' for type '{}'",
            ty.kind, ty.id
        ))
        .with_operation("manifest::build")
        .with_context("id", ty.id.clone())),
        Ok(kind) => Ok(kind),
    }
}
