use crate::process::{Attributes, NodeType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Domain data nested under a visual node's `data` key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualNodeData {
    #[serde(default)]
    pub label: String,
    /// Every other key: the node's type-specific attributes.
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// A node as the editor canvas holds it.
///
/// Fields after `data` are canvas state and are dropped on conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: VisualNodeData,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dragging: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

/// Domain data nested under a visual edge's `data` key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualEdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// An edge as the editor canvas holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEdge {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub data: VisualEdgeData,
    /// Routing style, e.g. `smoothstep`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sourceHandle", alias = "source_handle")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "targetHandle", alias = "target_handle")]
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

/// The complete canvas state of a graph, as sent by the editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualGraph {
    #[serde(default)]
    pub nodes: Vec<VisualNode>,
    #[serde(default)]
    pub edges: Vec<VisualEdge>,
}
