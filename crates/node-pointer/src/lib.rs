mod macros;

mod error;
mod json_node;
mod node_pointer;
mod node_pointer_ref;
mod parser;
mod tree_node;

pub use error::{ParseNodePointerError, TreeError};
pub use json_node::{JsonNode, JsonPropertyName};
pub use node_pointer::{NodePointer, PointerComponent};
pub use node_pointer_ref::{NodePointerRef, ToNodePointerRef};
pub use tree_node::{PathName, TreeNode};
