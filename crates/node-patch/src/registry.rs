use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt::{self, Debug, Formatter},
};

use node_pointer::{JsonNode, JsonPropertyName};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::RegistryError;

type Factory = fn(&Value) -> Result<Box<dyn Any>, serde_json::Error>;

struct Entry {
    type_id: TypeId,
    rust_type: &'static str,
    factory: Factory,
}

fn deserialize<T: DeserializeOwned + Any>(value: &Value) -> Result<Box<dyn Any>, serde_json::Error> {
    T::deserialize(value).map(|value| Box::new(value) as Box<dyn Any>)
}

/// Maps the type names written by the type preserving format to Rust types.
#[derive(Default)]
pub struct TypeRegistry {
    entries: HashMap<String, Entry>,
    names: HashMap<TypeId, String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `json-node` and `json-property-name`.
    pub fn with_json_types() -> Self {
        Self::new()
            .with::<JsonNode>("json-node")
            .with::<JsonPropertyName>("json-property-name")
    }

    #[must_use]
    pub fn with<T: DeserializeOwned + Any>(mut self, type_name: impl Into<String>) -> Self {
        self.register::<T>(type_name);
        self
    }

    /// Registers `T` under `type_name`, replacing any previous registration
    /// of either.
    pub fn register<T: DeserializeOwned + Any>(&mut self, type_name: impl Into<String>) {
        let type_name = type_name.into();
        let type_id = TypeId::of::<T>();

        if let Some(previous) = self.names.insert(type_id, type_name.clone()) {
            self.entries.remove(&previous);
        }
        if let Some(previous) = self.entries.insert(
            type_name,
            Entry {
                type_id,
                rust_type: std::any::type_name::<T>(),
                factory: deserialize::<T>,
            },
        ) {
            self.names.remove(&previous.type_id);
        }
    }

    pub fn type_name_of<T: Any>(&self) -> Option<&str> {
        self.names.get(&TypeId::of::<T>()).map(String::as_str)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Checks that `type_name` is registered as `T`.
    pub fn check<T: Any>(&self, type_name: &str) -> Result<(), RegistryError> {
        self.entry::<T>(type_name).map(|_| ())
    }

    /// Builds a `T` from `value` with the factory registered as `type_name`.
    pub fn unmarshal<T: Any>(&self, type_name: &str, value: &Value) -> Result<T, RegistryError> {
        let entry = self.entry::<T>(type_name)?;
        let boxed = (entry.factory)(value)?;
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| RegistryError::TypeMismatch {
                type_name: type_name.to_string(),
                expected: std::any::type_name::<T>(),
                found: entry.rust_type,
            })
    }

    fn entry<T: Any>(&self, type_name: &str) -> Result<&Entry, RegistryError> {
        let entry = self
            .entries
            .get(type_name)
            .ok_or_else(|| RegistryError::UnknownType {
                type_name: type_name.to_string(),
            })?;
        if entry.type_id != TypeId::of::<T>() {
            return Err(RegistryError::TypeMismatch {
                type_name: type_name.to_string(),
                expected: std::any::type_name::<T>(),
                found: entry.rust_type,
            });
        }
        Ok(entry)
    }
}

impl Debug for TypeRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(name, entry)| (name, entry.rust_type)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_json_types() {
        let registry = TypeRegistry::with_json_types();
        assert_eq!(registry.type_name_of::<JsonNode>(), Some("json-node"));
        assert_eq!(
            registry.type_name_of::<JsonPropertyName>(),
            Some("json-property-name")
        );
        assert_eq!(registry.type_name_of::<Point>(), None);

        assert_eq!(
            registry
                .unmarshal::<JsonNode>("json-node", &json!({"a": [1]}))
                .unwrap(),
            JsonNode::new(json!({"a": [1]}))
        );
        assert_eq!(
            registry
                .unmarshal::<JsonPropertyName>("json-property-name", &json!("a1"))
                .unwrap(),
            JsonPropertyName::new("a1")
        );
    }

    #[test]
    fn test_custom_type() {
        let registry = TypeRegistry::new().with::<Point>("point");
        assert!(registry.contains("point"));
        assert_eq!(
            registry
                .unmarshal::<Point>("point", &json!({"x": 1, "y": 2}))
                .unwrap(),
            Point { x: 1, y: 2 }
        );
        assert!(matches!(
            registry.unmarshal::<Point>("point", &json!({"x": 1})),
            Err(RegistryError::Json(_))
        ));
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.unmarshal::<Point>("point", &json!({"x": 1, "y": 2})),
            Err(RegistryError::UnknownType { type_name }) if type_name == "point"
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let registry = TypeRegistry::with_json_types();
        assert!(matches!(
            registry.unmarshal::<JsonPropertyName>("json-node", &json!("a1")),
            Err(RegistryError::TypeMismatch { type_name, .. }) if type_name == "json-node"
        ));
        assert!(registry.check::<JsonNode>("json-node").is_ok());
        assert!(registry.check::<JsonNode>("json-property-name").is_err());
    }

    #[test]
    fn test_register_replaces() {
        let registry = TypeRegistry::new()
            .with::<Point>("point")
            .with::<Point>("point2");
        assert!(!registry.contains("point"));
        assert_eq!(registry.type_name_of::<Point>(), Some("point2"));

        let registry = TypeRegistry::with_json_types().with::<Point>("json-node");
        assert_eq!(registry.type_name_of::<JsonNode>(), None);
        assert_eq!(registry.type_name_of::<Point>(), Some("json-node"));
    }

    #[test]
    fn test_independent_registries() {
        let a = TypeRegistry::new().with::<Point>("point");
        let b = TypeRegistry::new().with::<Point>("pt");
        assert_eq!(a.type_name_of::<Point>(), Some("point"));
        assert_eq!(b.type_name_of::<Point>(), Some("pt"));
    }
}
