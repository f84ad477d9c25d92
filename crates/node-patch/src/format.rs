use crate::OperationKind;

pub(crate) const OP: &str = "op";
pub(crate) const PATH_NAME_TYPE: &str = "path-name-type";
pub(crate) const FROM: &str = "from";
pub(crate) const PATH: &str = "path";
pub(crate) const VALUE_TYPE: &str = "value-type";
pub(crate) const VALUE: &str = "value";

/// The wire shape of a marshalled patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchFormat {
    /// `op`, `from`, `path` and `value` only.
    JsonPatch,
    /// Adds `path-name-type` and `value-type` so the exact name and value
    /// types are recovered by unmarshalling.
    TypePreserving,
}

impl PatchFormat {
    #[inline]
    pub fn is_type_preserving(self) -> bool {
        self == PatchFormat::TypePreserving
    }

    /// Properties an operation of `kind` may carry in this format.
    pub fn properties(self, kind: OperationKind) -> &'static [&'static str] {
        match (self, kind) {
            (PatchFormat::JsonPatch, OperationKind::Remove) => &[OP, PATH],
            (PatchFormat::JsonPatch, OperationKind::Copy | OperationKind::Move) => {
                &[OP, FROM, PATH]
            }
            (PatchFormat::JsonPatch, _) => &[OP, PATH, VALUE],
            (PatchFormat::TypePreserving, OperationKind::Remove) => &[OP, PATH_NAME_TYPE, PATH],
            (PatchFormat::TypePreserving, OperationKind::Copy | OperationKind::Move) => {
                &[OP, PATH_NAME_TYPE, FROM, PATH]
            }
            (PatchFormat::TypePreserving, _) => &[OP, PATH_NAME_TYPE, PATH, VALUE_TYPE, VALUE],
        }
    }

    /// Properties an operation of `kind` must carry in this format.
    pub fn required(self, kind: OperationKind) -> &'static [&'static str] {
        match (self, kind) {
            (_, OperationKind::Remove) => &[OP, PATH],
            (_, OperationKind::Copy | OperationKind::Move) => &[OP, FROM, PATH],
            (PatchFormat::JsonPatch, _) => &[OP, PATH, VALUE],
            (PatchFormat::TypePreserving, _) => &[OP, PATH, VALUE_TYPE, VALUE],
        }
    }
}
