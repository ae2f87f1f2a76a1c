//! The versioned JSON envelope.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "format": "procgraph",
//!   "timestamp": "2026-01-01T00:00:00Z",
//!   "metadata": { ... },
//!   "definition": { "nodes": [...], "flows": [...] },
//!   "validation": { ... }
//! }
//! ```
//!
//! A bare `{"nodes": [...], "flows": [...]}` object is accepted on import too.

use super::Parsed;
use crate::error::{ExportError, ImportError};
use crate::process::node::NodeRecord;
use crate::process::{ProcessDefinition, ProcessFlow, ProcessMetadata, ProcessNode};
use crate::validation::ValidationReport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FORMAT_VERSION: &str = "1.0";
pub const FORMAT_NAME: &str = "procgraph";

#[derive(Serialize)]
struct Envelope<'a> {
    version: &'static str,
    format: &'static str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a ProcessMetadata>,
    definition: &'a ProcessDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationReport>,
}

pub(crate) fn export(
    definition: &ProcessDefinition,
    metadata: Option<&ProcessMetadata>,
    validation: Option<ValidationReport>,
    pretty: bool,
) -> Result<String, ExportError> {
    let envelope = Envelope {
        version: FORMAT_VERSION,
        format: FORMAT_NAME,
        timestamp: chrono::Utc::now().to_rfc3339(),
        metadata,
        definition,
        validation,
    };
    let encoded = if pretty {
        serde_json::to_string_pretty(&envelope)
    } else {
        serde_json::to_string(&envelope)
    };
    encoded.map_err(|e| ExportError::Json(e.to_string()))
}

pub(crate) fn parse(content: &str) -> Result<Parsed, ImportError> {
    let root: Value =
        serde_json::from_str(content).map_err(|e| ImportError::InvalidJson(e.to_string()))?;

    let (body, metadata) = match root.get("definition") {
        Some(body) => (body, root.get("metadata")),
        None => (&root, None),
    };

    let nodes = body
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingArray("definition.nodes"))?;
    let flows = body
        .get("flows")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingArray("definition.flows"))?;

    let nodes = nodes
        .iter()
        .enumerate()
        .map(|(index, value)| parse_node(index, value))
        .collect::<Result<Vec<_>, _>>()?;
    let flows = flows
        .iter()
        .enumerate()
        .map(|(index, value)| {
            ProcessFlow::deserialize(value).map_err(|e| ImportError::MalformedEntry {
                kind: "flow",
                index,
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut warnings = Vec::new();
    let metadata = match metadata {
        None | Some(Value::Null) => None,
        Some(value) => match ProcessMetadata::deserialize(value) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warnings.push(format!("Ignored unreadable metadata: {}", e));
                None
            }
        },
    };

    Ok(Parsed {
        definition: ProcessDefinition::new(nodes, flows),
        metadata,
        warnings,
    })
}

fn parse_node(index: usize, value: &Value) -> Result<ProcessNode, ImportError> {
    let record = NodeRecord::deserialize(value).map_err(|e| ImportError::MalformedEntry {
        kind: "node",
        index,
        message: e.to_string(),
    })?;
    ProcessNode::try_from(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_definition_is_accepted() {
        let parsed = parse(
            r#"{"nodes":[{"id":"s","type":"start","name":"Start"}],"flows":[]}"#,
        )
        .expect("bare definition");
        assert_eq!(parsed.definition.nodes.len(), 1);
        assert!(parsed.metadata.is_none());
    }

    #[test]
    fn flows_must_be_an_array() {
        let err = parse(r#"{"definition":{"nodes":[],"flows":{}}}"#).err();
        assert_eq!(err, Some(ImportError::MissingArray("definition.flows")));
    }

    #[test]
    fn unknown_node_type_is_structural() {
        let err = parse(r#"{"nodes":[{"id":"x","type":"timer"}],"flows":[]}"#).err();
        assert!(matches!(err, Some(ImportError::UnknownNodeType { .. })));
    }
}
