//! Common test utilities for building process definitions.
use procgraph::prelude::*;
use procgraph::process::{
    GatewayKind, GatewayProps, HttpMethod, ServiceTaskProps, UserTaskProps,
};

/// Creates a user task with the given assignee.
#[allow(dead_code)]
pub fn assigned_task(id: &str, name: &str, assignee: &str) -> ProcessNode {
    ProcessNode::new(id, NodeType::UserTask, name).with_props(NodeProps::UserTask(UserTaskProps {
        assignee: Some(assignee.to_string()),
        ..Default::default()
    }))
}

/// `start -> review (no assignee) -> end`
#[allow(dead_code)]
pub fn create_linear_process() -> ProcessDefinition {
    ProcessDefinition::new(
        vec![
            ProcessNode::new("start", NodeType::Start, "Start").at(100.0, 100.0),
            ProcessNode::new("review", NodeType::UserTask, "Review").at(250.0, 100.0),
            ProcessNode::new("end", NodeType::End, "End").at(400.0, 100.0),
        ],
        vec![
            ProcessFlow::new("f1", "start", "review"),
            ProcessFlow::new("f2", "review", "end"),
        ],
    )
}

/// A fully configured approval process with every node type and no findings.
///
/// ```text
/// start -> submit -> check --approved--> notify -> end
///                      \---rejected---> end
/// ```
#[allow(dead_code)]
pub fn create_approval_process() -> ProcessDefinition {
    ProcessDefinition::new(
        vec![
            ProcessNode::new("start", NodeType::Start, "Start").at(0.0, 100.0),
            assigned_task("submit", "Submit request", "alice").at(150.0, 100.0),
            ProcessNode::new("check", NodeType::Gateway, "Approved?")
                .at(300.0, 100.0)
                .with_props(NodeProps::Gateway(GatewayProps {
                    kind: GatewayKind::Exclusive,
                    condition: Some("${approved}".to_string()),
                    ..Default::default()
                })),
            ProcessNode::new("notify", NodeType::ServiceTask, "Notify requester")
                .at(450.0, 50.0)
                .with_props(NodeProps::ServiceTask(ServiceTaskProps {
                    endpoint: Some("https://example.test/notify".to_string()),
                    method: HttpMethod::Post,
                    timeout: Some(30),
                    ..Default::default()
                })),
            ProcessNode::new("end", NodeType::End, "End").at(600.0, 100.0),
        ],
        vec![
            ProcessFlow::new("f1", "start", "submit"),
            ProcessFlow::new("f2", "submit", "check"),
            ProcessFlow::new("f3", "check", "notify")
                .with_condition("approved == true")
                .with_label("approved"),
            ProcessFlow::new("f4", "check", "end")
                .with_condition("approved == false")
                .with_label("rejected"),
            ProcessFlow::new("f5", "notify", "end"),
        ],
    )
}

/// No start node, one end node and one unconnected user task.
#[allow(dead_code)]
pub fn create_headless_process() -> ProcessDefinition {
    ProcessDefinition::new(
        vec![
            ProcessNode::new("end", NodeType::End, "End"),
            ProcessNode::new("task", NodeType::UserTask, "Orphan"),
        ],
        vec![],
    )
}

/// A native document whose second flow points at a node that does not exist.
#[allow(dead_code)]
pub const DANGLING_FLOW_JSON: &str = r#"{
    "version": "1.0",
    "format": "procgraph",
    "timestamp": "2026-01-01T00:00:00Z",
    "definition": {
        "nodes": [
            {"id": "start", "type": "start", "name": "Start", "x": 0, "y": 0},
            {"id": "end", "type": "end", "name": "End", "x": 200, "y": 0}
        ],
        "flows": [
            {"id": "f1", "from": "start", "to": "end"},
            {"id": "f_ghost", "from": "start", "to": "ghost"}
        ]
    }
}"#;

/// A native document with colliding node ids and flow ids.
#[allow(dead_code)]
pub const COLLIDING_IDS_JSON: &str = r#"{
    "nodes": [
        {"id": "start", "type": "start", "name": "Start"},
        {"id": "task", "type": "userTask", "name": "First", "props": {"assignee": "bob"}},
        {"id": "task", "type": "userTask", "name": "Second", "props": {"assignee": "eve"}},
        {"id": "end", "type": "end", "name": "End"}
    ],
    "flows": [
        {"id": "f", "from": "start", "to": "task"},
        {"id": "f", "from": "task", "to": "end"}
    ]
}"#;
