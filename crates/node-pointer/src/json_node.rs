use std::{
    fmt::{self, Debug, Display, Formatter},
    sync::Arc,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{NodePointer, PathName, PointerComponent, ToNodePointerRef, TreeError, TreeNode};

static NULL: Value = Value::Null;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPropertyName(String);

impl JsonPropertyName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for JsonPropertyName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PathName for JsonPropertyName {
    fn parse_name(name: &str) -> Result<Self, String> {
        Ok(Self::new(name))
    }
}

/// A node of a `serde_json` document.
///
/// The document is shared between every node taken from it; edits copy it.
#[derive(Clone)]
pub struct JsonNode {
    document: Arc<Value>,
    pointer: NodePointer<JsonPropertyName>,
}

impl JsonNode {
    pub fn new(value: Value) -> Self {
        Self {
            document: Arc::new(value),
            pointer: NodePointer::root(),
        }
    }

    /// The value this node addresses.
    pub fn value(&self) -> &Value {
        locate(&self.document, &self.pointer).unwrap_or(&NULL)
    }

    pub fn into_value(self) -> Value {
        self.value().clone()
    }

    fn edit<F>(&self, f: F) -> Result<Self, TreeError>
    where
        F: FnOnce(&mut Value) -> Result<(), TreeError>,
    {
        let mut document = Value::clone(&self.document);
        let target =
            locate_mut(&mut document, &self.pointer).ok_or_else(|| TreeError::NotAContainer {
                pointer: self.pointer.to_string(),
            })?;
        f(target)?;
        Ok(Self {
            document: Arc::new(document),
            pointer: self.pointer.clone(),
        })
    }

    fn invalid_index(&self, component: &PointerComponent<JsonPropertyName>) -> TreeError {
        TreeError::InvalidIndex {
            pointer: self.pointer.to_string(),
            component: component.to_string(),
        }
    }

    fn not_a_container(&self) -> TreeError {
        TreeError::NotAContainer {
            pointer: self.pointer.to_string(),
        }
    }
}

impl From<Value> for JsonNode {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl PartialEq for JsonNode {
    fn eq(&self, other: &Self) -> bool {
        self.pointer == other.pointer && self.value() == other.value()
    }
}

impl Display for JsonNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self.value(), f)
    }
}

impl Debug for JsonNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "JsonNode({} at \"{}\")", self.value(), self.pointer)
    }
}

impl Serialize for JsonNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::new)
    }
}

impl TreeNode for JsonNode {
    type Name = JsonPropertyName;

    fn root(&self) -> Self {
        Self {
            document: self.document.clone(),
            pointer: NodePointer::root(),
        }
    }

    fn pointer(&self) -> NodePointer<JsonPropertyName> {
        self.pointer.clone()
    }

    fn detach(&self) -> Self {
        Self::new(self.value().clone())
    }

    fn child(&self, component: &PointerComponent<JsonPropertyName>) -> Option<Self> {
        child_value(self.value(), component)?;

        let mut pointer = self.pointer.clone();
        pointer.0.push(component.clone());
        Some(Self {
            document: self.document.clone(),
            pointer,
        })
    }

    fn set_child(
        &self,
        component: &PointerComponent<JsonPropertyName>,
        value: Self,
    ) -> Result<Self, TreeError> {
        let value = value.into_value();
        self.edit(|target| match target {
            Value::Object(obj) => {
                let key = object_key(component).ok_or_else(|| self.invalid_index(component))?;
                obj.insert(key, value);
                Ok(())
            }
            Value::Array(array) => match component {
                PointerComponent::Append => {
                    array.push(value);
                    Ok(())
                }
                PointerComponent::Indexed(index) if *index <= array.len() => {
                    array.insert(*index, value);
                    Ok(())
                }
                _ => Err(self.invalid_index(component)),
            },
            _ => Err(self.not_a_container()),
        })
    }

    fn remove_child(&self, component: &PointerComponent<JsonPropertyName>) -> Result<Self, TreeError> {
        self.edit(|target| match target {
            Value::Object(obj) => object_key(component)
                .and_then(|key| obj.remove(&key))
                .map(|_| ())
                .ok_or_else(|| TreeError::ChildNotFound {
                    pointer: self.pointer.to_string(),
                    component: component.to_string(),
                }),
            Value::Array(array) => match component {
                PointerComponent::Indexed(index) if *index < array.len() => {
                    array.remove(*index);
                    Ok(())
                }
                _ => Err(self.invalid_index(component)),
            },
            _ => Err(self.not_a_container()),
        })
    }
}

fn object_key(component: &PointerComponent<JsonPropertyName>) -> Option<String> {
    match component {
        PointerComponent::Named(name) => Some(name.as_str().to_string()),
        PointerComponent::Indexed(index) => Some(index.to_string()),
        PointerComponent::Append => None,
    }
}

fn child_value<'a>(
    value: &'a Value,
    component: &PointerComponent<JsonPropertyName>,
) -> Option<&'a Value> {
    match (value, component) {
        (Value::Object(obj), PointerComponent::Named(name)) => obj.get(name.as_str()),
        (Value::Object(obj), PointerComponent::Indexed(index)) => obj.get(&index.to_string()),
        (Value::Array(array), PointerComponent::Indexed(index)) => array.get(*index),
        _ => None,
    }
}

fn child_value_mut<'a>(
    value: &'a mut Value,
    component: &PointerComponent<JsonPropertyName>,
) -> Option<&'a mut Value> {
    match (value, component) {
        (Value::Object(obj), PointerComponent::Named(name)) => obj.get_mut(name.as_str()),
        (Value::Object(obj), PointerComponent::Indexed(index)) => obj.get_mut(&index.to_string()),
        (Value::Array(array), PointerComponent::Indexed(index)) => array.get_mut(*index),
        _ => None,
    }
}

fn locate<T: ToNodePointerRef<JsonPropertyName>>(value: &Value, pointer: T) -> Option<&Value> {
    pointer
        .to_node_pointer_ref()
        .iter()
        .try_fold(value, |acc, component| child_value(acc, component))
}

fn locate_mut<T: ToNodePointerRef<JsonPropertyName>>(
    value: &mut Value,
    pointer: T,
) -> Option<&mut Value> {
    pointer
        .to_node_pointer_ref()
        .iter()
        .try_fold(value, |acc, component| child_value_mut(acc, component))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::json_pointer;

    fn node(value: Value) -> JsonNode {
        JsonNode::new(value)
    }

    #[test]
    fn test_traverse() {
        let root = node(json!({"a": {"b": [10, 20]}, "3": "three"}));

        let b1 = json_pointer!("/a/b/1").traverse(&root).unwrap();
        assert_eq!(b1.value(), &json!(20));
        assert_eq!(b1.pointer(), json_pointer!("/a/b/1"));
        assert_eq!(b1.root(), root);

        assert_eq!(
            json_pointer!("/3").traverse(&root).unwrap().value(),
            &json!("three")
        );
        assert!(json_pointer!("/a/b/2").traverse(&root).is_none());
        assert!(json_pointer!("/a/b/-").traverse(&root).is_none());
        assert!(json_pointer!("/a/x").traverse(&root).is_none());
        assert!(json_pointer!("/a/b/0/c").traverse(&root).is_none());
    }

    #[test]
    fn test_detach() {
        let root = node(json!({"a": {"b": 1}}));
        let a = json_pointer!("/a").traverse(&root).unwrap();
        let detached = a.detach();

        assert_ne!(a, detached);
        assert_eq!(detached, node(json!({"b": 1})));
        assert!(detached.pointer().is_root());
        assert_eq!(detached.root(), detached);
    }

    #[test]
    fn test_set_child_object() {
        let root = node(json!({"a": 1}));

        let updated = root
            .set_child(&PointerComponent::Named(JsonPropertyName::new("b")), node(json!(2)))
            .unwrap();
        assert_eq!(updated.value(), &json!({"a": 1, "b": 2}));

        let updated = updated
            .set_child(&PointerComponent::Named(JsonPropertyName::new("a")), node(json!(3)))
            .unwrap();
        assert_eq!(updated.value(), &json!({"a": 3, "b": 2}));

        // the original tree is untouched
        assert_eq!(root.value(), &json!({"a": 1}));

        assert!(matches!(
            root.set_child(&PointerComponent::Append, node(json!(1))),
            Err(TreeError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn test_set_child_array() {
        let root = node(json!({"list": [1, 2]}));
        let list = json_pointer!("/list").traverse(&root).unwrap();

        let updated = list
            .set_child(&PointerComponent::Indexed(0), node(json!(0)))
            .unwrap();
        assert_eq!(updated.value(), &json!([0, 1, 2]));
        assert_eq!(updated.root().value(), &json!({"list": [0, 1, 2]}));

        let updated = list
            .set_child(&PointerComponent::Append, node(json!(3)))
            .unwrap();
        assert_eq!(updated.value(), &json!([1, 2, 3]));

        assert!(matches!(
            list.set_child(&PointerComponent::Indexed(3), node(json!(3))),
            Err(TreeError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn test_set_child_scalar() {
        let root = node(json!({"a": 1}));
        let a = json_pointer!("/a").traverse(&root).unwrap();
        assert_eq!(
            a.set_child(&PointerComponent::Indexed(0), node(json!(1))),
            Err(TreeError::NotAContainer {
                pointer: "/a".to_string()
            })
        );
    }

    #[test]
    fn test_remove_child() {
        let root = node(json!({"a": 1, "b": [1, 2, 3]}));

        let updated = root
            .remove_child(&PointerComponent::Named(JsonPropertyName::new("a")))
            .unwrap();
        assert_eq!(updated.value(), &json!({"b": [1, 2, 3]}));

        let b = json_pointer!("/b").traverse(&root).unwrap();
        let updated = b.remove_child(&PointerComponent::Indexed(1)).unwrap();
        assert_eq!(updated.root().value(), &json!({"a": 1, "b": [1, 3]}));

        assert!(matches!(
            root.remove_child(&PointerComponent::Named(JsonPropertyName::new("x"))),
            Err(TreeError::ChildNotFound { .. })
        ));
        assert!(matches!(
            b.remove_child(&PointerComponent::Indexed(3)),
            Err(TreeError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn test_serde() {
        let root: JsonNode = serde_json::from_value(json!({"a": [1]})).unwrap();
        assert_eq!(root, node(json!({"a": [1]})));

        let a = json_pointer!("/a").traverse(&root).unwrap();
        assert_eq!(serde_json::to_value(&a).unwrap(), json!([1]));
        assert_eq!(a.to_string(), "[1]");

        let name: JsonPropertyName = serde_json::from_value(json!("key")).unwrap();
        assert_eq!(name, JsonPropertyName::new("key"));
    }
}
