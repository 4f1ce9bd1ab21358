//! Arena-allocated code artifacts and their kind hierarchy.
//!
//! Artifacts reference each other through `&'a Artifact<'a>` links held in
//! interior-mutable cells, so cyclic dependency relations (A -> B -> A) can be
//! expressed without reference counting.

use std::cell::{Cell, RefCell};
use std::fmt;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Concrete runtime kind of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NodeKind {
    Namespace,
    Class,
    Interface,
    Trait,
    Function,
}

/// A kind or capability a node can be matched against.
///
/// Concrete kinds specialize the abstract ones, see [`NodeKind::ancestors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display)]
#[strum(ascii_case_insensitive)]
pub enum TypeName {
    /// Every artifact.
    Artifact,
    /// Classes, interfaces and traits.
    Type,
    /// Classes and interfaces.
    ClassOrInterface,
    Class,
    Interface,
    Trait,
    Namespace,
    Function,
    /// Anything that can be invoked.
    Callable,
}

impl NodeKind {
    /// Every type name this kind is an instance of, most specific first.
    pub fn ancestors(self) -> &'static [TypeName] {
        match self {
            NodeKind::Namespace => &[TypeName::Namespace, TypeName::Artifact],
            NodeKind::Class => &[
                TypeName::Class,
                TypeName::ClassOrInterface,
                TypeName::Type,
                TypeName::Artifact,
            ],
            NodeKind::Interface => &[
                TypeName::Interface,
                TypeName::ClassOrInterface,
                TypeName::Type,
                TypeName::Artifact,
            ],
            NodeKind::Trait => &[TypeName::Trait, TypeName::Type, TypeName::Artifact],
            NodeKind::Function => &[TypeName::Function, TypeName::Callable, TypeName::Artifact],
        }
    }

    /// Polymorphic match: true if this kind is `ty` or specializes it.
    pub fn is_a(self, ty: TypeName) -> bool {
        self.ancestors().contains(&ty)
    }
}

/// Anything that exposes a runtime kind.
pub trait HasKind {
    fn node_kind(&self) -> NodeKind;

    fn is_a(&self, ty: TypeName) -> bool {
        self.node_kind().is_a(ty)
    }
}

impl HasKind for NodeKind {
    fn node_kind(&self) -> NodeKind {
        *self
    }
}

impl<T: HasKind + ?Sized> HasKind for &T {
    fn node_kind(&self) -> NodeKind {
        (**self).node_kind()
    }
}

/// A named code entity produced by the parser.
pub struct Artifact<'a> {
    id: String,
    name: String,
    kind: NodeKind,
    namespace: Cell<Option<&'a Artifact<'a>>>,
    types: RefCell<Vec<&'a Artifact<'a>>>,
    dependencies: RefCell<Vec<&'a Artifact<'a>>>,
}

impl<'a> Artifact<'a> {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            namespace: Cell::new(None),
            types: RefCell::new(Vec::new()),
            dependencies: RefCell::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The namespace owning this artifact, if it was attached to one.
    pub fn namespace(&self) -> Option<&'a Artifact<'a>> {
        self.namespace.get()
    }

    /// Types contained in this artifact (namespaces only).
    pub fn types(&self) -> Vec<&'a Artifact<'a>> {
        self.types.borrow().clone()
    }

    /// Artifacts this artifact declares as dependencies, in declaration order.
    pub fn dependencies(&self) -> Vec<&'a Artifact<'a>> {
        self.dependencies.borrow().clone()
    }

    /// Attach `ty` to this namespace and make this namespace its owner.
    pub fn add_type(&'a self, ty: &'a Artifact<'a>) {
        debug_assert_eq!(self.kind, NodeKind::Namespace, "only namespaces own types");
        ty.namespace.set(Some(self));
        self.types.borrow_mut().push(ty);
    }

    /// Record a dependency. Duplicates are kept as declared.
    pub fn add_dependency(&self, dependency: &'a Artifact<'a>) {
        self.dependencies.borrow_mut().push(dependency);
    }
}

impl HasKind for Artifact<'_> {
    fn node_kind(&self) -> NodeKind {
        self.kind
    }
}

// Links are printed by id only; following them could recurse forever.
impl fmt::Debug for Artifact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deps: Vec<&str> = self.dependencies.borrow().iter().map(|d| d.id()).collect();
        f.debug_struct("Artifact")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("namespace", &self.namespace().map(|ns| ns.id()))
            .field("types", &self.types.borrow().len())
            .field("dependencies", &deps)
            .finish()
    }
}

/// Owner of all artifacts of one analysis run.
#[derive(Default)]
pub struct ArtifactArena<'a> {
    artifacts: typed_arena::Arena<Artifact<'a>>,
}

impl<'a> ArtifactArena<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&'a self, artifact: Artifact<'a>) -> &'a Artifact<'a> {
        self.artifacts.alloc(artifact)
    }

    pub fn namespace(&'a self, id: &str, name: &str) -> &'a Artifact<'a> {
        self.alloc(Artifact::new(id, name, NodeKind::Namespace))
    }

    /// Allocate a type of `kind` and attach it to `namespace`.
    pub fn declare(
        &'a self,
        namespace: &'a Artifact<'a>,
        id: &str,
        name: &str,
        kind: NodeKind,
    ) -> &'a Artifact<'a> {
        let ty = self.alloc(Artifact::new(id, name, kind));
        namespace.add_type(ty);
        ty
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ArtifactArena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactArena")
            .field("len", &self.len())
            .finish()
    }
}
