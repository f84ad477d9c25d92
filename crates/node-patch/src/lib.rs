mod error;
mod format;
mod marshal;
mod operation;
mod patch;
mod registry;
mod unmarshal;

pub use error::{
    ApplyErrorKind, ApplyPatchError, InvalidPatchError, MarshalError, RegistryError,
    UnmarshalError,
};
pub use format::PatchFormat;
pub use operation::{Operation, OperationKind};
pub use patch::{Iter, NodePatch};
pub use registry::TypeRegistry;
