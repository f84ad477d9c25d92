use std::fmt::{self, Debug, Display, Formatter};

use crate::{NodePointer, PointerComponent, TreeNode};

pub trait ToNodePointerRef<N> {
    fn to_node_pointer_ref(&self) -> NodePointerRef<'_, N>;
}

/// A borrowed pointer, optionally prefixed by the pointer it is relative to.
pub struct NodePointerRef<'a, N> {
    pub(crate) prefix: Option<&'a [PointerComponent<N>]>,
    pub(crate) path: &'a [PointerComponent<N>],
}

impl<N> Clone for NodePointerRef<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for NodePointerRef<'_, N> {}

impl<'a, N> ToNodePointerRef<N> for NodePointerRef<'a, N> {
    fn to_node_pointer_ref(&self) -> NodePointerRef<'_, N> {
        *self
    }
}

impl<N: PartialEq> PartialEq<NodePointer<N>> for NodePointerRef<'_, N> {
    fn eq(&self, other: &NodePointer<N>) -> bool {
        self.iter().eq(other.0.iter())
    }
}

impl<N: PartialEq> PartialEq for NodePointerRef<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<N: Eq> Eq for NodePointerRef<'_, N> {}

impl<N: Display> Display for NodePointerRef<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for component in self.iter() {
            f.write_str("/")?;
            Display::fmt(component, f)?;
        }

        Ok(())
    }
}

impl<N: Display> Debug for NodePointerRef<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl<'a, N> NodePointerRef<'a, N> {
    pub fn to_owned(&self) -> NodePointer<N>
    where
        N: Clone,
    {
        NodePointer(self.iter().cloned().collect())
    }

    pub fn split_last(&self) -> Option<(NodePointerRef<'a, N>, &'a PointerComponent<N>)> {
        if let Some((last, parent)) = self.path.split_last() {
            return Some((
                NodePointerRef {
                    prefix: self.prefix,
                    path: parent,
                },
                last,
            ));
        }

        self.prefix
            .and_then(|path| path.split_last())
            .map(|(last, parent)| {
                (
                    NodePointerRef {
                        prefix: None,
                        path: parent,
                    },
                    last,
                )
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PointerComponent<N>> {
        self.prefix
            .into_iter()
            .flat_map(|path| path.iter())
            .chain(self.path.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.prefix
            .map(|components| components.len())
            .unwrap_or_default()
            + self.path.len()
    }

    pub fn starts_with(&self, needle: NodePointerRef<'_, N>) -> bool
    where
        N: PartialEq,
    {
        let prefix_len = needle.len();
        if prefix_len > self.len() {
            return false;
        }

        self.iter()
            .zip(needle.iter())
            .take_while(|(a, b)| a == b)
            .count()
            == prefix_len
    }

    /// Resolves every component in turn, starting at `node`.
    pub fn traverse<T>(&self, node: &T) -> Option<T>
    where
        T: TreeNode<Name = N>,
    {
        self.iter()
            .try_fold(node.clone(), |acc, component| acc.child(component))
    }
}

#[cfg(test)]
mod tests {
    use crate::json_pointer;

    #[test]
    fn test_starts_with() {
        assert!(json_pointer!("/a/b/c")
            .as_ref()
            .starts_with(json_pointer!("/a/b").as_ref()));

        assert!(json_pointer!("/a/b/c")
            .as_ref()
            .starts_with(json_pointer!("/a/b/c").as_ref()));

        assert!(json_pointer!("/c")
            .with_prefix(&json_pointer!("/a/b"))
            .starts_with(json_pointer!("/a/b/c").as_ref()));

        assert!(!json_pointer!("/c")
            .with_prefix(&json_pointer!("/a1/b"))
            .starts_with(json_pointer!("/a/b").as_ref()));

        assert!(!json_pointer!("/a")
            .as_ref()
            .starts_with(json_pointer!("/a/b").as_ref()));

        assert!(json_pointer!("/c/d/e")
            .with_prefix(&json_pointer!("/a/b"))
            .starts_with(json_pointer!("/a").as_ref()));

        assert!(json_pointer!("/0/1")
            .as_ref()
            .starts_with(json_pointer!("").as_ref()));
    }

    #[test]
    fn test_split_last_through_prefix() {
        let prefix = json_pointer!("/a");
        let pointer = json_pointer!("");
        let (parent, last) = pointer.with_prefix(&prefix).split_last().unwrap();
        assert!(parent.is_empty());
        assert_eq!(last.to_string(), "a");
        assert!(parent.split_last().is_none());
    }

    #[test]
    fn test_to_owned() {
        let prefix = json_pointer!("/a/0");
        let pointer = json_pointer!("/b/-");
        let joined = pointer.with_prefix(&prefix);
        assert_eq!(joined.len(), 4);
        assert_eq!(joined.to_owned(), json_pointer!("/a/0/b/-"));
        assert_eq!(joined, json_pointer!("/a/0/b/-"));
    }
}
