//! Converter tests
//!
//! Canvas graph <-> canonical definition mapping.
//!
mod common;
use common::*;
use procgraph::converter::{DEFAULT_EDGE_TYPE, connect_with, new_visual_node_with};
use procgraph::prelude::*;
use procgraph::process::FixedIdSource;
use procgraph::ui::Position;
use serde_json::json;

#[cfg(test)]
mod converter_tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_definition() {
        let definition = create_approval_process();
        let (nodes, edges) = to_visual(&definition);
        assert_eq!(to_canonical(&nodes, &edges), definition);
    }

    #[test]
    fn test_visual_defaults_are_regenerated() {
        let (nodes, edges) = to_visual(&create_linear_process());
        assert!(nodes.iter().all(|n| !n.selected && n.width.is_none()));
        assert!(edges.iter().all(|e| !e.animated));
        assert!(
            edges
                .iter()
                .all(|e| e.edge_type.as_deref() == Some(DEFAULT_EDGE_TYPE))
        );
        assert_eq!(nodes[1].data.label, "Review");
    }

    #[test]
    fn test_canvas_payload_is_mapped_leniently() {
        let graph: VisualGraph = serde_json::from_value(json!({
            "nodes": [
                {
                    "id": "n1",
                    "type": "userTask",
                    "position": {"x": 10.4, "y": 20.6},
                    "data": {"label": "Approve", "assignee": "carol", "color": "red"},
                    "selected": true,
                    "width": 150.0
                },
                {
                    "id": "n2",
                    "type": "serviceTask",
                    "data": {"label": "Call", "timeout": "soon"}
                }
            ],
            "edges": [
                {
                    "id": "e1",
                    "source": "n1",
                    "target": "n2",
                    "label": "  ",
                    "data": {"condition": "ok"},
                    "sourceHandle": "bottom",
                    "animated": true
                }
            ]
        }))
        .expect("canvas graph");

        let definition = graph.into_process().expect("conversion");
        let approve = definition.node("n1").expect("n1");
        assert_eq!((approve.x, approve.y), (10.0, 21.0));
        assert_eq!(approve.props.assignee(), Some("carol"));
        assert_eq!(approve.props.extra().get("color"), Some(&json!("red")));

        let call = definition.node("n2").expect("n2");
        assert_eq!((call.x, call.y), (0.0, 0.0));
        // A timeout of the wrong type is kept as an unknown attribute.
        assert_eq!(call.props.extra().get("timeout"), Some(&json!("soon")));
        assert_eq!(call.props.to_attributes().get("method"), Some(&json!("POST")));

        let flow = definition.flow("e1").expect("e1");
        assert_eq!(flow.condition.as_deref(), Some("ok"));
        assert_eq!(flow.label, None);
    }

    #[test]
    fn test_edge_handles_are_written_in_camel_case() {
        let edge: VisualEdge = serde_json::from_value(json!({
            "id": "e1",
            "source": "a",
            "target": "b",
            "sourceHandle": "bottom",
            "targetHandle": "top"
        }))
        .expect("edge");
        assert_eq!(edge.source_handle.as_deref(), Some("bottom"));

        let written = serde_json::to_value(&edge).expect("serialize");
        assert_eq!(written["sourceHandle"], json!("bottom"));
        assert_eq!(written["targetHandle"], json!("top"));
        assert!(written.get("source_handle").is_none());
    }

    #[test]
    fn test_new_nodes_and_edges_use_generated_ids() {
        let ids = FixedIdSource::new(1_700_000_000_000, "k3j9x2");
        let node = new_visual_node_with(&ids, NodeType::ServiceTask, Position { x: 5.0, y: 6.0 });
        assert_eq!(node.id, "serviceTask_1700000000000_k3j9x2");
        assert_eq!(node.data.label, "Service Task");
        assert_eq!(node.data.attributes.get("method"), Some(&json!("POST")));

        let edge = connect_with(&ids, "a", "b");
        assert_eq!(edge.id, "flow_a_b_1700000000000_k3j9x2");
        assert_eq!((edge.source.as_str(), edge.target.as_str()), ("a", "b"));
    }

    #[test]
    fn test_visual_graph_from_definition() {
        let definition = create_linear_process();
        let graph = VisualGraph::from(&definition);
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.into_process().expect("conversion"), definition);
    }
}
