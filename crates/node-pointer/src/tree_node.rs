use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

use crate::{NodePointer, PointerComponent, TreeError};

/// The name type used to address the named children of a tree.
pub trait PathName: Clone + Eq + Hash + Debug + Display + 'static {
    /// The default factory used when a pointer string carries no name type.
    fn parse_name(name: &str) -> Result<Self, String>;
}

/// An immutable node inside an immutable tree.
///
/// Edits never touch `self`; they return the node at the same position in a
/// new tree, from which [`TreeNode::root`] reaches the new document root.
pub trait TreeNode: Clone + PartialEq + Debug + Display + 'static {
    type Name: PathName;

    fn root(&self) -> Self;

    /// The address of this node relative to its root.
    fn pointer(&self) -> NodePointer<Self::Name>;

    /// Returns an equal value without any parent.
    fn detach(&self) -> Self;

    fn child(&self, component: &PointerComponent<Self::Name>) -> Option<Self>;

    /// Inserts `value` at `component`, overwriting a named child of the same
    /// name, inserting before an indexed child, or appending.
    fn set_child(
        &self,
        component: &PointerComponent<Self::Name>,
        value: Self,
    ) -> Result<Self, TreeError>;

    fn remove_child(&self, component: &PointerComponent<Self::Name>) -> Result<Self, TreeError>;
}
