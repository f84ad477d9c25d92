#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
pub enum ParseNodePointerError {
    #[error("invalid node pointer: missing leading `/`")]
    MissingSlash,
    #[error("invalid node pointer: `-` must be the last component")]
    AppendNotLast,
    #[error("invalid node pointer: bad name `{name}`: {reason}")]
    InvalidName { name: String, reason: String },
}

#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
pub enum TreeError {
    #[error("not a container: {pointer}")]
    NotAContainer { pointer: String },
    #[error("invalid index `{component}` at {pointer}")]
    InvalidIndex { pointer: String, component: String },
    #[error("child `{component}` not found at {pointer}")]
    ChildNotFound { pointer: String, component: String },
}
