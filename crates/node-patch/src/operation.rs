use std::fmt::{self, Debug, Display, Formatter};

use node_pointer::{NodePointer, NodePointerRef, TreeNode};

use crate::{ApplyErrorKind, InvalidPatchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    Replace,
    Test,
    Remove,
    Copy,
    Move,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Replace => "replace",
            OperationKind::Test => "test",
            OperationKind::Remove => "remove",
            OperationKind::Copy => "copy",
            OperationKind::Move => "move",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(OperationKind::Add),
            "replace" => Some(OperationKind::Replace),
            "test" => Some(OperationKind::Test),
            "remove" => Some(OperationKind::Remove),
            "copy" => Some(OperationKind::Copy),
            "move" => Some(OperationKind::Move),
            _ => None,
        }
    }

    #[inline]
    pub fn has_value(self) -> bool {
        matches!(
            self,
            OperationKind::Add | OperationKind::Replace | OperationKind::Test
        )
    }

    #[inline]
    pub fn has_from(self) -> bool {
        matches!(self, OperationKind::Copy | OperationKind::Move)
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq)]
pub(crate) enum Op<N: TreeNode> {
    Add {
        path: NodePointer<N::Name>,
        value: N,
    },
    Replace {
        path: NodePointer<N::Name>,
        value: N,
    },
    Test {
        path: NodePointer<N::Name>,
        value: N,
    },
    Remove {
        path: NodePointer<N::Name>,
    },
    Copy {
        from: NodePointer<N::Name>,
        path: NodePointer<N::Name>,
    },
    Move {
        from: NodePointer<N::Name>,
        path: NodePointer<N::Name>,
    },
}

/// A single edit. Values are detached from their parents when the operation
/// is created.
#[derive(Clone, PartialEq)]
pub struct Operation<N: TreeNode>(pub(crate) Op<N>);

fn check_from_and_path<M: PartialEq + Display>(
    from: &NodePointer<M>,
    path: &NodePointer<M>,
) -> Result<(), InvalidPatchError> {
    if from == path {
        return Err(InvalidPatchError::FromEqualsPath {
            path: path.to_string(),
        });
    }
    Ok(())
}

impl<N: TreeNode> Operation<N> {
    pub fn add(path: NodePointer<N::Name>, value: N) -> Self {
        Self(Op::Add {
            path,
            value: value.detach(),
        })
    }

    pub fn replace(path: NodePointer<N::Name>, value: N) -> Self {
        Self(Op::Replace {
            path,
            value: value.detach(),
        })
    }

    pub fn test(path: NodePointer<N::Name>, value: N) -> Self {
        Self(Op::Test {
            path,
            value: value.detach(),
        })
    }

    pub fn remove(path: NodePointer<N::Name>) -> Self {
        Self(Op::Remove { path })
    }

    pub fn copy(
        from: NodePointer<N::Name>,
        path: NodePointer<N::Name>,
    ) -> Result<Self, InvalidPatchError> {
        check_from_and_path(&from, &path)?;
        Ok(Self(Op::Copy { from, path }))
    }

    pub fn move_(
        from: NodePointer<N::Name>,
        path: NodePointer<N::Name>,
    ) -> Result<Self, InvalidPatchError> {
        check_from_and_path(&from, &path)?;
        Ok(Self(Op::Move { from, path }))
    }

    pub fn kind(&self) -> OperationKind {
        match &self.0 {
            Op::Add { .. } => OperationKind::Add,
            Op::Replace { .. } => OperationKind::Replace,
            Op::Test { .. } => OperationKind::Test,
            Op::Remove { .. } => OperationKind::Remove,
            Op::Copy { .. } => OperationKind::Copy,
            Op::Move { .. } => OperationKind::Move,
        }
    }

    pub fn path(&self) -> &NodePointer<N::Name> {
        match &self.0 {
            Op::Add { path, .. }
            | Op::Replace { path, .. }
            | Op::Test { path, .. }
            | Op::Remove { path }
            | Op::Copy { path, .. }
            | Op::Move { path, .. } => path,
        }
    }

    pub fn from(&self) -> Option<&NodePointer<N::Name>> {
        match &self.0 {
            Op::Copy { from, .. } | Op::Move { from, .. } => Some(from),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&N> {
        match &self.0 {
            Op::Add { value, .. } | Op::Replace { value, .. } | Op::Test { value, .. } => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Applies this operation to the tree holding `node`, resolving paths
    /// against `start`, and returns the node at `start` in the new tree.
    pub(crate) fn apply(
        &self,
        node: &N,
        start: &NodePointer<N::Name>,
    ) -> Result<N, ApplyErrorKind> {
        let root = match &self.0 {
            Op::Add { path, value } => add(node, path.with_prefix(start), value.clone())?,
            Op::Replace { path, value } => {
                let path = path.with_prefix(start);
                if path.is_empty() {
                    value.clone()
                } else {
                    add(&remove(node, path)?, path, value.clone())?
                }
            }
            Op::Test { path, value } => {
                let actual = path
                    .with_prefix(start)
                    .traverse(&node.root())
                    .ok_or_else(|| ApplyErrorKind::PathNotFound {
                        path: path.with_prefix(start).to_string(),
                    })?
                    .detach();
                if &actual != value {
                    return Err(ApplyErrorKind::TestFailed {
                        expected: value.to_string(),
                        actual: actual.to_string(),
                    });
                }
                return Ok(node.clone());
            }
            Op::Remove { path } => remove(node, path.with_prefix(start))?,
            Op::Copy { from, path } => {
                let copying = capture(node, from.with_prefix(start))?;
                add(node, path.with_prefix(start), copying)?
            }
            Op::Move { from, path } => {
                let (from, path) = (from.with_prefix(start), path.with_prefix(start));
                if path.len() > from.len() && path.starts_with(from) {
                    return Err(ApplyErrorKind::MoveIntoDescendant {
                        from: from.to_string(),
                        path: path.to_string(),
                    });
                }
                let moving = capture(node, from)?;
                add(&remove(node, from)?, path, moving)?
            }
        };

        start
            .traverse(&root)
            .ok_or_else(|| ApplyErrorKind::StartNotFound {
                start: start.to_string(),
            })
    }
}

fn capture<N: TreeNode>(node: &N, from: NodePointerRef<'_, N::Name>) -> Result<N, ApplyErrorKind> {
    from.traverse(&node.root())
        .map(|found| found.detach())
        .ok_or_else(|| ApplyErrorKind::FromNotFound {
            from: from.to_string(),
        })
}

/// Returns the new root.
fn add<N: TreeNode>(
    node: &N,
    path: NodePointerRef<'_, N::Name>,
    value: N,
) -> Result<N, ApplyErrorKind> {
    match path.split_last() {
        Some((parent_path, last)) => {
            let parent = parent_path.traverse(&node.root()).ok_or_else(|| {
                ApplyErrorKind::PathNotFound {
                    path: parent_path.to_string(),
                }
            })?;
            Ok(parent.set_child(last, value)?.root())
        }
        None => Ok(value),
    }
}

/// Returns the new root.
fn remove<N: TreeNode>(node: &N, path: NodePointerRef<'_, N::Name>) -> Result<N, ApplyErrorKind> {
    let (parent_path, last) = path.split_last().ok_or(ApplyErrorKind::RemoveRoot)?;
    let not_found = || ApplyErrorKind::PathNotFound {
        path: path.to_string(),
    };

    let parent = parent_path.traverse(&node.root()).ok_or_else(not_found)?;
    parent.child(last).ok_or_else(not_found)?;
    Ok(parent.remove_child(last)?.root())
}

impl<N: TreeNode> Display for Operation<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().as_str())?;
        if let Some(from) = self.from() {
            write!(f, " from=\"{}\"", from)?;
        }
        write!(f, " path=\"{}\"", self.path())?;
        if let Some(value) = self.value() {
            write!(f, " value={}", value)?;
        }
        Ok(())
    }
}

impl<N: TreeNode> Debug for Operation<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Operation({})", self)
    }
}
