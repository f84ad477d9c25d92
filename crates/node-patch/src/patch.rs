use std::{
    fmt::{self, Debug, Display, Formatter},
    sync::Arc,
};

use node_pointer::{NodePointer, TreeNode};

use crate::{ApplyPatchError, InvalidPatchError, Operation};

struct Link<N: TreeNode> {
    operation: Arc<Operation<N>>,
    next: NodePatch<N>,
}

/// An immutable, ordered chain of [`Operation`]s.
///
/// Every builder call returns a new chain; operations already in the chain are
/// shared with the new one, never copied or mutated.
pub struct NodePatch<N: TreeNode> {
    head: Option<Arc<Link<N>>>,
}

impl<N: TreeNode> NodePatch<N> {
    #[inline]
    pub fn empty() -> Self {
        Self { head: None }
    }

    pub fn from_operations<I>(operations: I) -> Self
    where
        I: IntoIterator<Item = Operation<N>>,
    {
        Self::from_shared(operations.into_iter().map(Arc::new).collect())
    }

    fn from_shared(operations: Vec<Arc<Operation<N>>>) -> Self {
        operations
            .into_iter()
            .rev()
            .fold(Self::empty(), |next, operation| Self {
                head: Some(Arc::new(Link { operation, next })),
            })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> Iter<'_, N> {
        Iter {
            current: self.head.as_deref(),
        }
    }

    /// Returns a new chain ending with `operation`.
    ///
    /// The links are rebuilt on every call, so building a long chain one
    /// operation at a time is quadratic; use [`NodePatch::from_operations`]
    /// or [`NodePatch::concat`] for bulk construction.
    #[must_use]
    pub fn append(&self, operation: Operation<N>) -> Self {
        let mut operations: Vec<_> = self.links().map(|link| link.operation.clone()).collect();
        operations.push(Arc::new(operation));
        Self::from_shared(operations)
    }

    /// Returns a new chain holding the operations of `self` followed by those of `other`.
    #[must_use]
    pub fn concat(&self, other: &NodePatch<N>) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        Self::from_shared(
            self.links()
                .chain(other.links())
                .map(|link| link.operation.clone())
                .collect(),
        )
    }

    #[must_use]
    pub fn add(&self, path: NodePointer<N::Name>, value: N) -> Self {
        self.append(Operation::add(path, value))
    }

    #[must_use]
    pub fn replace(&self, path: NodePointer<N::Name>, value: N) -> Self {
        self.append(Operation::replace(path, value))
    }

    #[must_use]
    pub fn test(&self, path: NodePointer<N::Name>, value: N) -> Self {
        self.append(Operation::test(path, value))
    }

    #[must_use]
    pub fn remove(&self, path: NodePointer<N::Name>) -> Self {
        self.append(Operation::remove(path))
    }

    pub fn copy(
        &self,
        from: NodePointer<N::Name>,
        path: NodePointer<N::Name>,
    ) -> Result<Self, InvalidPatchError> {
        Operation::copy(from, path).map(|operation| self.append(operation))
    }

    pub fn move_(
        &self,
        from: NodePointer<N::Name>,
        path: NodePointer<N::Name>,
    ) -> Result<Self, InvalidPatchError> {
        Operation::move_(from, path).map(|operation| self.append(operation))
    }

    /// Applies every operation in order, each one seeing the result of the
    /// previous, and returns the node at the position of `node` in the final
    /// tree.
    pub fn apply(&self, node: &N) -> Result<N, ApplyPatchError<N>> {
        let start = node.pointer();
        tracing::debug!(start = %start, operations = self.len(), "apply patch");

        self.iter().try_fold(node.clone(), |current, operation| {
            tracing::trace!(%operation, "apply operation");
            operation.apply(&current, &start).map_err(|kind| {
                tracing::debug!(%operation, error = %kind, "patch operation failed");
                ApplyPatchError {
                    operation: operation.clone(),
                    kind,
                }
            })
        })
    }

    fn links(&self) -> impl Iterator<Item = &Link<N>> {
        std::iter::successors(self.head.as_deref(), |link| link.next.head.as_deref())
    }
}

impl<N: TreeNode> Clone for NodePatch<N> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<N: TreeNode> Default for NodePatch<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<N: TreeNode> Drop for NodePatch<N> {
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(link) = head {
            match Arc::try_unwrap(link) {
                Ok(mut link) => head = link.next.head.take(),
                Err(_) => break,
            }
        }
    }
}

impl<N: TreeNode> PartialEq for NodePatch<N> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<N: TreeNode> Display for NodePatch<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (idx, operation) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            Display::fmt(operation, f)?;
        }
        Ok(())
    }
}

impl<N: TreeNode> Debug for NodePatch<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<N: TreeNode> FromIterator<Operation<N>> for NodePatch<N> {
    fn from_iter<T: IntoIterator<Item = Operation<N>>>(iter: T) -> Self {
        Self::from_operations(iter)
    }
}

impl<'a, N: TreeNode> IntoIterator for &'a NodePatch<N> {
    type Item = &'a Operation<N>;
    type IntoIter = Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, N: TreeNode> {
    current: Option<&'a Link<N>>,
}

impl<'a, N: TreeNode> Iterator for Iter<'a, N> {
    type Item = &'a Operation<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.current?;
        self.current = link.next.head.as_deref();
        Some(&link.operation)
    }
}
