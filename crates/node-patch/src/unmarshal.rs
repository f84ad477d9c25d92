use node_pointer::{NodePointer, PathName, TreeNode};
use serde_json::{Map, Value};

use crate::{
    format::{FROM, OP, PATH, PATH_NAME_TYPE, VALUE, VALUE_TYPE},
    NodePatch, Operation, OperationKind, PatchFormat, RegistryError, TypeRegistry,
    UnmarshalError,
};

type NameFactory<'a, M> = dyn Fn(&str) -> Result<M, String> + 'a;
type ValueFactory<'a, N> = dyn Fn(&Value) -> Result<N, String> + 'a;

enum Factories<'a, N: TreeNode> {
    JsonPatch {
        name: &'a NameFactory<'a, N::Name>,
        value: &'a ValueFactory<'a, N>,
    },
    TypePreserving(&'a TypeRegistry),
}

impl<N: TreeNode> Factories<'_, N> {
    fn format(&self) -> PatchFormat {
        match self {
            Factories::JsonPatch { .. } => PatchFormat::JsonPatch,
            Factories::TypePreserving(_) => PatchFormat::TypePreserving,
        }
    }
}

impl<N: TreeNode> NodePatch<N> {
    /// Unmarshals the type preserving shape, building names and values
    /// through `registry`.
    ///
    /// Pointers without a `path-name-type` parse their names with
    /// [`PathName::parse_name`].
    pub fn from_json_node(json: &Value, registry: &TypeRegistry) -> Result<Self, UnmarshalError> {
        unmarshal(json, &Factories::TypePreserving(registry))
    }

    /// Unmarshals the plain JSON Patch shape with caller supplied factories.
    pub fn from_json_patch<F, V>(
        json: &Value,
        name_factory: F,
        value_factory: V,
    ) -> Result<Self, UnmarshalError>
    where
        F: Fn(&str) -> Result<N::Name, String>,
        V: Fn(&Value) -> Result<N, String>,
    {
        unmarshal(
            json,
            &Factories::JsonPatch {
                name: &name_factory,
                value: &value_factory,
            },
        )
    }
}

fn unmarshal<N: TreeNode>(
    json: &Value,
    factories: &Factories<'_, N>,
) -> Result<NodePatch<N>, UnmarshalError> {
    let fragments = json.as_array().ok_or_else(|| UnmarshalError::NotAnArray {
        fragment: json.clone(),
    })?;
    tracing::debug!(
        format = ?factories.format(),
        operations = fragments.len(),
        "unmarshal patch"
    );

    let operations = fragments
        .iter()
        .map(|fragment| {
            unmarshal_operation(fragment, factories).map_err(|err| {
                tracing::debug!(error = %err, "unmarshal operation failed");
                err
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NodePatch::from_operations(operations))
}

fn unmarshal_operation<N: TreeNode>(
    fragment: &Value,
    factories: &Factories<'_, N>,
) -> Result<Operation<N>, UnmarshalError> {
    let object = fragment
        .as_object()
        .ok_or_else(|| UnmarshalError::NotAnObject {
            fragment: fragment.clone(),
        })?;
    let reader = Reader { object, fragment };

    let op = reader.string(OP)?.ok_or_else(|| reader.missing(OP))?;
    let kind = OperationKind::from_name(op).ok_or_else(|| UnmarshalError::UnknownOperation {
        op: op.to_string(),
        fragment: fragment.clone(),
    })?;

    let format = factories.format();
    let allowed = format.properties(kind);
    if let Some(property) = object
        .keys()
        .find(|property| !allowed.contains(&property.as_str()))
    {
        return Err(UnmarshalError::UnknownProperty {
            property: property.clone(),
            fragment: fragment.clone(),
        });
    }
    if let Some(property) = format
        .required(kind)
        .iter()
        .find(|property| !object.contains_key(**property))
    {
        return Err(reader.missing(*property));
    }

    let path = reader.pointer(PATH, factories)?;
    let invalid_patch = |source| UnmarshalError::InvalidPatch {
        source,
        fragment: fragment.clone(),
    };

    Ok(match kind {
        OperationKind::Add => Operation::add(path, reader.value(factories)?),
        OperationKind::Replace => Operation::replace(path, reader.value(factories)?),
        OperationKind::Test => Operation::test(path, reader.value(factories)?),
        OperationKind::Remove => Operation::remove(path),
        OperationKind::Copy => {
            Operation::copy(reader.pointer(FROM, factories)?, path).map_err(invalid_patch)?
        }
        OperationKind::Move => {
            Operation::move_(reader.pointer(FROM, factories)?, path).map_err(invalid_patch)?
        }
    })
}

struct Reader<'a> {
    object: &'a Map<String, Value>,
    fragment: &'a Value,
}

impl<'a> Reader<'a> {
    fn missing(&self, property: &'static str) -> UnmarshalError {
        UnmarshalError::MissingProperty {
            property,
            fragment: self.fragment.clone(),
        }
    }

    fn invalid(&self, property: &'static str, reason: impl Into<String>) -> UnmarshalError {
        UnmarshalError::InvalidProperty {
            property,
            reason: reason.into(),
            fragment: self.fragment.clone(),
        }
    }

    fn registry_error(&self, property: &'static str, err: RegistryError) -> UnmarshalError {
        match err {
            RegistryError::UnknownType { type_name } => UnmarshalError::UnknownType {
                type_name,
                fragment: self.fragment.clone(),
            },
            RegistryError::TypeMismatch {
                type_name,
                expected,
                ..
            } => UnmarshalError::TypeMismatch {
                type_name,
                expected,
                fragment: self.fragment.clone(),
            },
            RegistryError::Json(err) => self.invalid(property, err.to_string()),
        }
    }

    fn string(&self, property: &'static str) -> Result<Option<&'a str>, UnmarshalError> {
        match self.object.get(property) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.invalid(property, "expected a string")),
        }
    }

    fn pointer<N: TreeNode>(
        &self,
        property: &'static str,
        factories: &Factories<'_, N>,
    ) -> Result<NodePointer<N::Name>, UnmarshalError> {
        let text = self
            .string(property)?
            .ok_or_else(|| self.missing(property))?;

        let parsed = match factories {
            Factories::JsonPatch { name, .. } => NodePointer::parse(text, name),
            Factories::TypePreserving(registry) => match self.string(PATH_NAME_TYPE)? {
                Some(type_name) => {
                    registry
                        .check::<N::Name>(type_name)
                        .map_err(|err| self.registry_error(PATH_NAME_TYPE, err))?;
                    NodePointer::parse(text, |name: &str| {
                        registry
                            .unmarshal::<N::Name>(type_name, &Value::String(name.to_string()))
                            .map_err(|err| err.to_string())
                    })
                }
                None => NodePointer::parse(text, <N::Name as PathName>::parse_name),
            },
        };
        parsed.map_err(|err| self.invalid(property, err.to_string()))
    }

    fn value<N: TreeNode>(&self, factories: &Factories<'_, N>) -> Result<N, UnmarshalError> {
        let value = self.object.get(VALUE).ok_or_else(|| self.missing(VALUE))?;
        match factories {
            Factories::JsonPatch { value: factory, .. } => {
                factory(value).map_err(|reason| self.invalid(VALUE, reason))
            }
            Factories::TypePreserving(registry) => {
                let type_name = self
                    .string(VALUE_TYPE)?
                    .ok_or_else(|| self.missing(VALUE_TYPE))?;
                registry
                    .unmarshal::<N>(type_name, value)
                    .map_err(|err| self.registry_error(VALUE, err))
            }
        }
    }
}
