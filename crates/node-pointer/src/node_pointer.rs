use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    parser::{escape_segment, parse_index, parse_node_pointer},
    NodePointerRef, ParseNodePointerError, PathName, ToNodePointerRef, TreeNode,
};

/// One step of a [`NodePointer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PointerComponent<N> {
    Named(N),
    Indexed(usize),
    /// The location after the last child of an array-like node.
    Append,
}

impl<N> PointerComponent<N> {
    pub fn name(&self) -> Option<&N> {
        match self {
            PointerComponent::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl<N: Display> PointerComponent<N> {
    /// A name that reads as an index or `-` becomes that component, so the
    /// pointer parses back to what it displays.
    fn normalized(self) -> Self {
        match self {
            PointerComponent::Named(name) => {
                let text = name.to_string();
                if text == "-" {
                    PointerComponent::Append
                } else if let Some(index) = parse_index(&text) {
                    PointerComponent::Indexed(index)
                } else {
                    PointerComponent::Named(name)
                }
            }
            component => component,
        }
    }
}

impl<N: Display> Display for PointerComponent<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PointerComponent::Named(name) => f.write_str(&escape_segment(&name.to_string())),
            PointerComponent::Indexed(index) => write!(f, "{}", index),
            PointerComponent::Append => f.write_str("-"),
        }
    }
}

/// An address relative to some node, rendered in RFC 6901 form.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NodePointer<N>(pub(crate) Vec<PointerComponent<N>>);

impl<N> ToNodePointerRef<N> for NodePointer<N> {
    fn to_node_pointer_ref(&self) -> NodePointerRef<'_, N> {
        self.as_ref()
    }
}

impl<'a, N> ToNodePointerRef<N> for &'a NodePointer<N> {
    fn to_node_pointer_ref(&self) -> NodePointerRef<'_, N> {
        (*self).as_ref()
    }
}

impl<N: PartialEq> PartialEq<NodePointerRef<'_, N>> for NodePointer<N> {
    fn eq(&self, other: &NodePointerRef<'_, N>) -> bool {
        self.0.iter().eq(other.iter())
    }
}

impl<N: Display> Display for NodePointer<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.as_ref(), f)
    }
}

impl<N: Display> Debug for NodePointer<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl<N: PathName> FromStr for NodePointer<N> {
    type Err = ParseNodePointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, N::parse_name)
    }
}

impl<N: Display> Serialize for NodePointer<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de, N: PathName> Deserialize<'de> for NodePointer<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(|err: ParseNodePointerError| D::Error::custom(err.to_string()))
    }
}

impl<N> Default for NodePointer<N> {
    fn default() -> Self {
        Self::root()
    }
}

impl<N: Display> FromIterator<PointerComponent<N>> for NodePointer<N> {
    fn from_iter<T: IntoIterator<Item = PointerComponent<N>>>(iter: T) -> Self {
        NodePointer(iter.into_iter().map(PointerComponent::normalized).collect())
    }
}

impl<N> NodePointer<N> {
    #[inline]
    pub fn root() -> NodePointer<N> {
        NodePointer(Vec::new())
    }

    /// Parses `input`, creating named components with `name_factory`.
    pub fn parse<F>(input: &str, name_factory: F) -> Result<Self, ParseNodePointerError>
    where
        F: FnMut(&str) -> Result<N, String>,
    {
        parse_node_pointer(input, name_factory).map(Self)
    }

    #[must_use]
    pub fn named(mut self, name: N) -> Self
    where
        N: Display,
    {
        self.0.push(PointerComponent::Named(name).normalized());
        self
    }

    #[must_use]
    pub fn indexed(mut self, index: usize) -> Self {
        self.0.push(PointerComponent::Indexed(index));
        self
    }

    #[must_use]
    pub fn append(mut self) -> Self {
        self.0.push(PointerComponent::Append);
        self
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_append(&self) -> bool {
        matches!(self.0.last(), Some(PointerComponent::Append))
    }

    pub fn has_named(&self) -> bool {
        self.first_name().is_some()
    }

    /// Returns the first named component, if any.
    pub fn first_name(&self) -> Option<&N> {
        self.0.iter().find_map(PointerComponent::name)
    }

    #[inline]
    pub fn as_ref(&self) -> NodePointerRef<'_, N> {
        NodePointerRef {
            prefix: None,
            path: &self.0,
        }
    }

    #[inline]
    pub fn with_prefix<'a>(&'a self, prefix: &'a NodePointer<N>) -> NodePointerRef<'a, N> {
        NodePointerRef {
            prefix: Some(prefix.0.as_slice()),
            path: &self.0,
        }
    }

    /// Resolves this pointer against `node`.
    pub fn traverse<T>(&self, node: &T) -> Option<T>
    where
        T: TreeNode<Name = N>,
    {
        self.as_ref().traverse(node)
    }
}

#[cfg(test)]
mod tests {
    use crate::{json_pointer, JsonPropertyName};

    use super::*;

    #[test]
    fn test_as_ref() {
        let pointer = json_pointer!("/a/b/c");
        let pointer_ref = pointer.as_ref();

        assert_eq!(pointer_ref.to_string(), "/a/b/c");

        let (parent, key) = pointer_ref.split_last().unwrap();
        assert_eq!(parent.to_string(), "/a/b");
        assert_eq!(key.to_string(), "c");
    }

    #[test]
    fn test_with_prefix() {
        let prefix = json_pointer!("/a/b/c");
        let pointer = json_pointer!("/d/e/f");
        let pointer_ref = pointer.with_prefix(&prefix);

        assert_eq!(pointer_ref.to_string(), "/a/b/c/d/e/f");

        let (parent, key) = pointer_ref.split_last().unwrap();
        assert_eq!(parent.to_string(), "/a/b/c/d/e");
        assert_eq!(key.to_string(), "f");

        let (parent, _) = parent.split_last().unwrap();
        let (parent, _) = parent.split_last().unwrap();
        assert_eq!(parent.to_string(), "/a/b/c");

        let (parent, key) = parent.split_last().unwrap();
        assert_eq!(parent.to_string(), "/a/b");
        assert_eq!(key.to_string(), "c");
    }

    #[test]
    fn test_display_escapes() {
        let pointer = NodePointer::root()
            .named(JsonPropertyName::new("a/b"))
            .indexed(2)
            .named(JsonPropertyName::new("m~n"))
            .append();
        assert_eq!(pointer.to_string(), "/a~1b/2/m~0n/-");
        assert_eq!(pointer.to_string().parse::<NodePointer<JsonPropertyName>>().unwrap(), pointer);
    }

    #[test]
    fn test_append_and_names() {
        assert!(json_pointer!("/a/-").is_append());
        assert!(!json_pointer!("/a/0").is_append());
        assert!(json_pointer!("").is_root());

        assert_eq!(json_pointer!("/0/1").first_name(), None);
        assert!(!json_pointer!("/0/-").has_named());
        assert!(json_pointer!("/0/b").has_named());
        assert_eq!(
            json_pointer!("/0/b/c").first_name(),
            Some(&JsonPropertyName::new("b"))
        );
    }

    #[test]
    fn test_named_index_like() {
        let pointer = NodePointer::root()
            .named(JsonPropertyName::new("a"))
            .named(JsonPropertyName::new("0"))
            .named(JsonPropertyName::new("-"));
        assert_eq!(pointer, json_pointer!("/a/0/-"));
        assert!(pointer.is_append());
        assert_eq!(
            pointer.to_string().parse::<NodePointer<JsonPropertyName>>().unwrap(),
            pointer
        );

        assert_eq!(
            NodePointer::root().named(JsonPropertyName::new("01")),
            json_pointer!("/01")
        );

        let collected: NodePointer<JsonPropertyName> = vec![
            PointerComponent::Named(JsonPropertyName::new("7")),
            PointerComponent::Named(JsonPropertyName::new("b")),
        ]
        .into_iter()
        .collect();
        assert_eq!(collected, json_pointer!("/7/b"));
    }

    #[test]
    fn test_serde() {
        let pointer = json_pointer!("/a/1");
        let value = serde_json::to_value(&pointer).unwrap();
        assert_eq!(value, serde_json::json!("/a/1"));
        assert_eq!(
            serde_json::from_value::<NodePointer<JsonPropertyName>>(value).unwrap(),
            pointer
        );
        assert!(serde_json::from_value::<NodePointer<JsonPropertyName>>(serde_json::json!("a")).is_err());
    }
}
