//! Node filters and the iterator that applies them.

use std::str::FromStr;

use crate::artifact::{HasKind, TypeName};

/// Predicate consulted once per candidate node during iteration.
pub trait NodeFilter<N: ?Sized> {
    fn accept(&self, node: &N) -> bool;
}

/// Selects nodes whose runtime kind is, or specializes, one of the configured
/// type names.
///
/// Identifiers are checked in configuration order and the first match wins.
/// Identifiers that name no known type never match. A filter without any
/// identifier rejects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    types: Vec<String>,
    resolved: Vec<Option<TypeName>>,
}

impl TypeFilter {
    /// Build from a sequence of type identifiers.
    pub fn from_list<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        let resolved = types
            .iter()
            .map(|ty| TypeName::from_str(ty.trim()).ok())
            .collect();
        Self { types, resolved }
    }

    /// Build from individually listed identifiers; see also [`type_filter!`](crate::type_filter).
    pub fn from_items<S: AsRef<str>>(items: &[S]) -> Self {
        Self::from_list(items.iter().map(|item| item.as_ref().to_string()))
    }

    /// Configured identifiers in order, as given.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<N: HasKind + ?Sized> NodeFilter<N> for TypeFilter {
    fn accept(&self, node: &N) -> bool {
        let kind = node.node_kind();
        self.resolved
            .iter()
            .flatten()
            .any(|ty| kind.is_a(*ty))
    }
}

/// Variadic form of [`TypeFilter::from_items`].
///
/// ```rust
/// use agraph_core::{type_filter, TypeFilter};
///
/// assert_eq!(
///     type_filter!("Class", "Interface"),
///     TypeFilter::from_list(vec!["Class", "Interface"]),
/// );
/// ```
#[macro_export]
macro_rules! type_filter {
    () => {
        $crate::filter::TypeFilter::default()
    };
    ($($ty:expr),+ $(,)?) => {
        $crate::filter::TypeFilter::from_items(&[$($ty),+])
    };
}

/// Iterator adapter yielding only the items a filter accepts, in input order.
pub struct NodeIterator<'f, I, F: ?Sized> {
    inner: I,
    filter: &'f F,
}

impl<'f, I, F: ?Sized> NodeIterator<'f, I, F> {
    pub fn new<T>(nodes: T, filter: &'f F) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            inner: nodes.into_iter(),
            filter,
        }
    }
}

impl<I, F> Iterator for NodeIterator<'_, I, F>
where
    I: Iterator,
    F: NodeFilter<I::Item> + ?Sized,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.inner.find(|node| filter.accept(node))
    }
}
