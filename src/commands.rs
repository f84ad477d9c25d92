use std::path::{Path, PathBuf};

use node_patch::{
    ApplyPatchError, MarshalError, NodePatch, PatchFormat, TypeRegistry, UnmarshalError,
};
use node_pointer::{JsonNode, JsonPropertyName, PathName};
use serde_json::Value;

use crate::config::{Command, Config};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Unmarshal(#[from] UnmarshalError),
    #[error(transparent)]
    Marshal(#[from] MarshalError),
    #[error(transparent)]
    Apply(#[from] ApplyPatchError<JsonNode>),
    #[error(transparent)]
    Write(#[from] serde_json::Error),
}

pub fn run(config: Config) -> Result<(), CommandError> {
    let registry = TypeRegistry::with_json_types();

    let (output, pretty) = match config.command {
        Command::Apply {
            document,
            patch,
            format,
            pretty,
        } => {
            let output = apply(
                read_json(&document)?,
                &read_json(&patch)?,
                format.into(),
                &registry,
            )?;
            (output, pretty)
        }
        Command::Convert {
            patch,
            from,
            to,
            pretty,
        } => {
            let output = convert(&read_json(&patch)?, from.into(), to.into(), &registry)?;
            (output, pretty)
        }
    };

    let output = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", output);
    Ok(())
}

fn read_json(path: &Path) -> Result<Value, CommandError> {
    let data = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| CommandError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn unmarshal(
    patch: &Value,
    format: PatchFormat,
    registry: &TypeRegistry,
) -> Result<NodePatch<JsonNode>, UnmarshalError> {
    match format {
        PatchFormat::JsonPatch => {
            NodePatch::from_json_patch(patch, JsonPropertyName::parse_name, |value| {
                Ok(JsonNode::new(value.clone()))
            })
        }
        PatchFormat::TypePreserving => NodePatch::from_json_node(patch, registry),
    }
}

pub fn apply(
    document: Value,
    patch: &Value,
    format: PatchFormat,
    registry: &TypeRegistry,
) -> Result<Value, CommandError> {
    let patch = unmarshal(patch, format, registry)?;
    tracing::info!(operations = patch.len(), "applying patch");
    Ok(patch.apply(&JsonNode::new(document))?.into_value())
}

pub fn convert(
    patch: &Value,
    from: PatchFormat,
    to: PatchFormat,
    registry: &TypeRegistry,
) -> Result<Value, CommandError> {
    let patch = unmarshal(patch, from, registry)?;
    tracing::info!(operations = patch.len(), ?from, ?to, "converting patch");
    Ok(patch.marshal(to, registry)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_apply() {
        let registry = TypeRegistry::with_json_types();
        assert_eq!(
            apply(
                json!({"baz": "qux", "foo": "bar"}),
                &json!([
                    {"op": "replace", "path": "/baz", "value": "boo"},
                    {"op": "add", "path": "/hello", "value": ["world"]},
                    {"op": "remove", "path": "/foo"},
                ]),
                PatchFormat::JsonPatch,
                &registry,
            )
            .unwrap(),
            json!({"baz": "boo", "hello": ["world"]})
        );
    }

    #[test]
    fn test_apply_failed() {
        let registry = TypeRegistry::with_json_types();
        let err = apply(
            json!({"a": 1}),
            &json!([{"op": "test", "path": "/a", "value": 2}]),
            PatchFormat::JsonPatch,
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::Apply(_)));

        let err = apply(
            json!({"a": 1}),
            &json!([{"op": "test", "path": "/a", "value": 1}]),
            PatchFormat::TypePreserving,
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::Unmarshal(_)));
    }

    #[test]
    fn test_convert() {
        let registry = TypeRegistry::with_json_types();
        let json_patch = json!([
            {"op": "add", "path": "/a", "value": {"b": 1}},
            {"op": "move", "from": "/a", "path": "/c"},
            {"op": "remove", "path": "/0"},
        ]);
        let typed = convert(
            &json_patch,
            PatchFormat::JsonPatch,
            PatchFormat::TypePreserving,
            &registry,
        )
        .unwrap();
        assert_eq!(
            typed,
            json!([
                {
                    "op": "add",
                    "path-name-type": "json-property-name",
                    "path": "/a",
                    "value-type": "json-node",
                    "value": {"b": 1},
                },
                {"op": "move", "path-name-type": "json-property-name", "from": "/a", "path": "/c"},
                {"op": "remove", "path": "/0"},
            ])
        );
        assert_eq!(
            convert(
                &typed,
                PatchFormat::TypePreserving,
                PatchFormat::JsonPatch,
                &registry
            )
            .unwrap(),
            json_patch
        );
    }
}
