//! Translation between the editor's canvas graph and the canonical definition.
//!
//! This is the only place where canvas state (selection, sizes, styles, edge
//! routing) meets the canonical model. Mapping is lenient: malformed or missing
//! fields are defaulted, never rejected. Structural problems are left for the
//! validator to report.

use crate::error::ConversionError;
use crate::process::{
    IdSource, IntoProcess, NodeProps, NodeType, ProcessDefinition, ProcessFlow, ProcessNode,
    SystemIdSource, generate_edge_id_with, generate_node_id_with,
};
use crate::ui::{Position, VisualEdge, VisualEdgeData, VisualGraph, VisualNode, VisualNodeData};

/// Edge routing style assigned to every edge handed back to the canvas.
pub const DEFAULT_EDGE_TYPE: &str = "smoothstep";

/// Maps canvas nodes and edges to a canonical definition.
///
/// Coordinates are rounded to whole numbers and every canvas-only field is dropped.
pub fn to_canonical(nodes: &[VisualNode], edges: &[VisualEdge]) -> ProcessDefinition {
    ProcessDefinition {
        nodes: nodes.iter().map(node_to_canonical).collect(),
        flows: edges.iter().map(edge_to_canonical).collect(),
    }
}

/// Maps a canonical definition to canvas nodes and edges with default rendering.
pub fn to_visual(definition: &ProcessDefinition) -> (Vec<VisualNode>, Vec<VisualEdge>) {
    let nodes = definition.nodes.iter().map(node_to_visual).collect();
    let edges = definition.flows.iter().map(flow_to_visual).collect();
    (nodes, edges)
}

fn node_to_canonical(node: &VisualNode) -> ProcessNode {
    ProcessNode {
        id: node.id.clone(),
        name: node.data.label.clone(),
        x: round_coordinate(node.position.x),
        y: round_coordinate(node.position.y),
        props: NodeProps::from_attributes(node.node_type, node.data.attributes.clone()),
    }
}

fn edge_to_canonical(edge: &VisualEdge) -> ProcessFlow {
    ProcessFlow {
        id: edge.id.clone(),
        from: edge.source.clone(),
        to: edge.target.clone(),
        condition: non_blank(edge.data.condition.as_deref()),
        label: non_blank(edge.label.as_deref()),
    }
}

fn node_to_visual(node: &ProcessNode) -> VisualNode {
    VisualNode {
        id: node.id.clone(),
        node_type: node.node_type(),
        position: Position {
            x: node.x,
            y: node.y,
        },
        data: VisualNodeData {
            label: node.name.clone(),
            attributes: node.props.to_attributes(),
        },
        selected: false,
        dragging: false,
        width: None,
        height: None,
        style: None,
    }
}

fn flow_to_visual(flow: &ProcessFlow) -> VisualEdge {
    VisualEdge {
        id: flow.id.clone(),
        source: flow.from.clone(),
        target: flow.to.clone(),
        label: flow.label.clone(),
        data: VisualEdgeData {
            condition: flow.condition.clone(),
        },
        edge_type: Some(DEFAULT_EDGE_TYPE.to_string()),
        animated: false,
        selected: false,
        source_handle: None,
        target_handle: None,
        style: None,
    }
}

fn round_coordinate(value: f64) -> f64 {
    if value.is_finite() { value.round() } else { 0.0 }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Creates a canvas node of `node_type` with a fresh id, default label and default attributes.
pub fn new_visual_node(node_type: NodeType, position: Position) -> VisualNode {
    new_visual_node_with(&SystemIdSource, node_type, position)
}

pub fn new_visual_node_with(
    source: &dyn IdSource,
    node_type: NodeType,
    position: Position,
) -> VisualNode {
    let node = ProcessNode::new(
        generate_node_id_with(source, node_type),
        node_type,
        node_type.default_name(),
    )
    .at(position.x, position.y);
    node_to_visual(&node)
}

/// Creates a canvas edge between two nodes with a fresh id.
pub fn connect(source_id: &str, target_id: &str) -> VisualEdge {
    connect_with(&SystemIdSource, source_id, target_id)
}

pub fn connect_with(source: &dyn IdSource, source_id: &str, target_id: &str) -> VisualEdge {
    let flow = ProcessFlow::new(
        generate_edge_id_with(source, source_id, target_id),
        source_id,
        target_id,
    );
    flow_to_visual(&flow)
}

impl IntoProcess for VisualGraph {
    fn into_process(self) -> Result<ProcessDefinition, ConversionError> {
        Ok(to_canonical(&self.nodes, &self.edges))
    }
}

impl From<&ProcessDefinition> for VisualGraph {
    fn from(definition: &ProcessDefinition) -> Self {
        let (nodes, edges) = to_visual(definition);
        Self { nodes, edges }
    }
}
