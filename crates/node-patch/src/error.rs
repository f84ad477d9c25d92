use node_pointer::{TreeError, TreeNode};
use serde_json::Value;

use crate::Operation;

#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
pub enum InvalidPatchError {
    #[error("from and path are equal: {path}")]
    FromEqualsPath { path: String },
}

#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
pub enum ApplyErrorKind {
    #[error("unable to navigate to {path}")]
    PathNotFound { path: String },
    #[error("unable to navigate to node to copy from: {from}")]
    FromNotFound { from: String },
    #[error("unable to navigate to starting node: {start}")]
    StartNotFound { start: String },
    #[error("value test failed: expected {expected}, got {actual}")]
    TestFailed { expected: String, actual: String },
    #[error("cannot move {from} into its own descendant {path}")]
    MoveIntoDescendant { from: String, path: String },
    #[error("cannot remove the root")]
    RemoveRoot,
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Raised by `NodePatch::apply`; the input tree is left untouched.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {operation}")]
pub struct ApplyPatchError<N: TreeNode> {
    pub(crate) operation: Operation<N>,
    pub(crate) kind: ApplyErrorKind,
}

impl<N: TreeNode> ApplyPatchError<N> {
    /// The operation that failed.
    #[inline]
    pub fn operation(&self) -> &Operation<N> {
        &self.operation
    }

    #[inline]
    pub fn kind(&self) -> &ApplyErrorKind {
        &self.kind
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown type: `{type_name}`")]
    UnknownType { type_name: String },
    #[error("type `{type_name}` is a {found}, not a {expected}")]
    TypeMismatch {
        type_name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum MarshalError {
    #[error("type not registered: {rust_type}")]
    UnregisteredType { rust_type: &'static str },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum UnmarshalError {
    #[error("expected an array of operations, got {fragment}")]
    NotAnArray { fragment: Value },
    #[error("expected an operation object, got {fragment}")]
    NotAnObject { fragment: Value },
    #[error("unknown op `{op}` in {fragment}")]
    UnknownOperation { op: String, fragment: Value },
    #[error("unknown property `{property}` in {fragment}")]
    UnknownProperty { property: String, fragment: Value },
    #[error("required property `{property}` missing in {fragment}")]
    MissingProperty {
        property: &'static str,
        fragment: Value,
    },
    #[error("invalid `{property}` in {fragment}: {reason}")]
    InvalidProperty {
        property: &'static str,
        reason: String,
        fragment: Value,
    },
    #[error("unknown type `{type_name}` in {fragment}")]
    UnknownType { type_name: String, fragment: Value },
    #[error("type `{type_name}` is not a {expected} in {fragment}")]
    TypeMismatch {
        type_name: String,
        expected: &'static str,
        fragment: Value,
    },
    #[error("{source} in {fragment}")]
    InvalidPatch {
        source: InvalidPatchError,
        fragment: Value,
    },
}

impl UnmarshalError {
    /// Returns `true` for an unknown op or property.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            UnmarshalError::UnknownOperation { .. } | UnmarshalError::UnknownProperty { .. }
        )
    }

    /// The document fragment the error was raised for.
    pub fn fragment(&self) -> &Value {
        match self {
            UnmarshalError::NotAnArray { fragment }
            | UnmarshalError::NotAnObject { fragment }
            | UnmarshalError::UnknownOperation { fragment, .. }
            | UnmarshalError::UnknownProperty { fragment, .. }
            | UnmarshalError::MissingProperty { fragment, .. }
            | UnmarshalError::InvalidProperty { fragment, .. }
            | UnmarshalError::UnknownType { fragment, .. }
            | UnmarshalError::TypeMismatch { fragment, .. }
            | UnmarshalError::InvalidPatch { fragment, .. } => fragment,
        }
    }
}
