use node_pointer::TreeNode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    format::{FROM, OP, PATH, PATH_NAME_TYPE, VALUE, VALUE_TYPE},
    MarshalError, NodePatch, Operation, PatchFormat, TypeRegistry,
};

impl<N: TreeNode + Serialize> NodePatch<N> {
    /// Marshals to the plain JSON Patch shape, without type metadata.
    pub fn to_json_patch(&self) -> Result<Value, MarshalError> {
        self.marshal(PatchFormat::JsonPatch, &TypeRegistry::new())
    }

    /// Marshals to the type preserving shape, naming types through `registry`.
    pub fn to_json_node(&self, registry: &TypeRegistry) -> Result<Value, MarshalError> {
        self.marshal(PatchFormat::TypePreserving, registry)
    }

    pub fn marshal(
        &self,
        format: PatchFormat,
        registry: &TypeRegistry,
    ) -> Result<Value, MarshalError> {
        let operations = self
            .iter()
            .map(|operation| operation.marshal(format, registry).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(?format, operations = operations.len(), "marshalled patch");
        Ok(Value::Array(operations))
    }
}

impl<N: TreeNode + Serialize> Operation<N> {
    pub fn marshal(
        &self,
        format: PatchFormat,
        registry: &TypeRegistry,
    ) -> Result<Map<String, Value>, MarshalError> {
        let mut object = Map::new();
        object.insert(OP.to_string(), Value::String(self.kind().as_str().to_string()));

        if format.is_type_preserving() {
            let named = match self.from() {
                Some(from) => from.has_named() || self.path().has_named(),
                None => self.path().has_named(),
            };
            if let Some(type_name) = named
                .then(|| registry.type_name_of::<N::Name>())
                .flatten()
            {
                object.insert(
                    PATH_NAME_TYPE.to_string(),
                    Value::String(type_name.to_string()),
                );
            }
        }

        if let Some(from) = self.from() {
            object.insert(FROM.to_string(), Value::String(from.to_string()));
        }
        object.insert(PATH.to_string(), Value::String(self.path().to_string()));

        if let Some(value) = self.value() {
            if format.is_type_preserving() {
                let type_name = registry.type_name_of::<N>().ok_or_else(|| {
                    MarshalError::UnregisteredType {
                        rust_type: std::any::type_name::<N>(),
                    }
                })?;
                object.insert(VALUE_TYPE.to_string(), Value::String(type_name.to_string()));
            }
            object.insert(VALUE.to_string(), serde_json::to_value(value)?);
        }

        Ok(object)
    }
}
