use super::cycle::CycleDetectionRule;
use super::rule::{GraphView, ValidationRule};
use super::ValidationFinding;
use crate::error::RuleError;
use crate::process::{NodeProps, NodeType};
use ahash::AHashSet;
use std::sync::Arc;

/// The built-in rules, in the order their findings are reported.
pub fn default_rules() -> Vec<Arc<dyn ValidationRule>> {
    vec![
        Arc::new(UniqueIdsRule),
        Arc::new(SingleEntryRule),
        Arc::new(ExitExistenceRule),
        Arc::new(ConnectivityRule),
        Arc::new(EdgeIntegrityRule),
        Arc::new(AssignmentQualityRule),
        Arc::new(BranchingConditionRule),
        Arc::new(IntegrationConfigRule),
        Arc::new(IsolatedNodeRule),
        Arc::new(CycleDetectionRule),
    ]
}

/// Node and flow ids must be non-empty and unique.
pub struct UniqueIdsRule;

impl ValidationRule for UniqueIdsRule {
    fn id(&self) -> &str {
        "unique-ids"
    }

    fn description(&self) -> &str {
        "node and flow ids are present and unique"
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let mut findings = Vec::new();

        let mut seen = AHashSet::new();
        for node in graph.nodes {
            if node.id.trim().is_empty() {
                findings.push(
                    ValidationFinding::error(format!("Node '{}' has an empty id", node.name))
                        .with_suggestion("Give every node a unique id"),
                );
            } else if !seen.insert(node.id.as_str()) {
                findings.push(
                    ValidationFinding::error(format!("Duplicate node id '{}'", node.id))
                        .at_node(&node.id)
                        .with_suggestion("Rename one of the nodes"),
                );
            }
        }

        let mut seen = AHashSet::new();
        for flow in graph.flows {
            if flow.id.trim().is_empty() {
                findings.push(ValidationFinding::error(format!(
                    "Flow from '{}' to '{}' has an empty id",
                    flow.from, flow.to
                )));
            } else if !seen.insert(flow.id.as_str()) {
                findings.push(
                    ValidationFinding::error(format!("Duplicate flow id '{}'", flow.id))
                        .at_edge(&flow.id),
                );
            }
        }

        Ok(findings)
    }
}

/// Exactly one start node.
pub struct SingleEntryRule;

impl ValidationRule for SingleEntryRule {
    fn id(&self) -> &str {
        "single-entry"
    }

    fn description(&self) -> &str {
        "the process has exactly one start node"
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let starts: Vec<_> = graph
            .nodes
            .iter()
            .filter(|n| n.node_type() == NodeType::Start)
            .collect();

        let finding = match starts.as_slice() {
            [] => Some(
                ValidationFinding::error("Missing start node")
                    .with_suggestion("Add a start node to mark where the process begins"),
            ),
            [_] => None,
            [_, extra, ..] => Some(
                ValidationFinding::error(format!(
                    "Multiple start nodes found ({})",
                    starts.len()
                ))
                .at_node(&extra.id)
                .with_suggestion("Keep a single start node"),
            ),
        };
        Ok(finding.into_iter().collect())
    }
}

/// At least one end node.
pub struct ExitExistenceRule;

impl ValidationRule for ExitExistenceRule {
    fn id(&self) -> &str {
        "exit-existence"
    }

    fn description(&self) -> &str {
        "the process has at least one end node"
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        if graph.nodes.iter().any(|n| n.node_type() == NodeType::End) {
            return Ok(Vec::new());
        }
        Ok(vec![
            ValidationFinding::error("Missing end node")
                .with_suggestion("Add an end node so the process can complete"),
        ])
    }
}

/// Entry, exit and flow-through checks per node.
///
/// A non-end node without outgoing flows is always an error. A non-start node
/// without incoming flows is a warning, since graphs are often built incrementally.
pub struct ConnectivityRule;

impl ValidationRule for ConnectivityRule {
    fn id(&self) -> &str {
        "connectivity"
    }

    fn description(&self) -> &str {
        "every node can be entered and left as its type requires"
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let mut findings = Vec::new();
        for node in graph.nodes {
            let incoming = graph.incoming(&node.id);
            let outgoing = graph.outgoing(&node.id);
            let node_type = node.node_type();

            if node_type == NodeType::Start && incoming > 0 {
                findings.push(
                    ValidationFinding::error(format!(
                        "Start node '{}' must not have incoming flows",
                        node.name
                    ))
                    .at_node(&node.id),
                );
            }
            if node_type == NodeType::End && outgoing > 0 {
                findings.push(
                    ValidationFinding::error(format!(
                        "End node '{}' must not have outgoing flows",
                        node.name
                    ))
                    .at_node(&node.id),
                );
            }
            if node_type != NodeType::End && outgoing == 0 {
                findings.push(
                    ValidationFinding::error(format!(
                        "Node '{}' has no outgoing flow (dead end)",
                        node.name
                    ))
                    .at_node(&node.id)
                    .with_suggestion("Connect it to a following node or an end node"),
                );
            }
            if node_type != NodeType::Start && incoming == 0 {
                findings.push(
                    ValidationFinding::warning(format!(
                        "Node '{}' has no incoming flow (unreachable)",
                        node.name
                    ))
                    .at_node(&node.id)
                    .with_suggestion("Connect a preceding node to it"),
                );
            }
        }
        Ok(findings)
    }
}

/// Flows must connect two distinct, existing nodes.
pub struct EdgeIntegrityRule;

impl ValidationRule for EdgeIntegrityRule {
    fn id(&self) -> &str {
        "edge-integrity"
    }

    fn description(&self) -> &str {
        "flows reference existing nodes and are not self-loops"
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        let mut findings = Vec::new();
        for flow in graph.flows {
            for (end, node_id) in [("source", &flow.from), ("target", &flow.to)] {
                if !graph.contains(node_id) {
                    findings.push(
                        ValidationFinding::error(format!(
                            "Flow '{}' references missing {} node '{}'",
                            flow.id, end, node_id
                        ))
                        .at_edge(&flow.id)
                        .with_suggestion("Remove the flow or reconnect it"),
                    );
                }
            }
            if flow.is_self_loop() {
                findings.push(
                    ValidationFinding::error(format!(
                        "Flow '{}' connects node '{}' to itself",
                        flow.id, flow.from
                    ))
                    .at_edge(&flow.id)
                    .at_node(&flow.from),
                );
            }
        }
        Ok(findings)
    }
}

/// Defines warning-only rules that flag nodes of one type missing a required attribute.
macro_rules! define_attribute_rules {
    ( $( ($struct_name:ident, $rule_id:literal, $node_type:path, $accessor:ident, $label:literal, $suggestion:literal) ),* $(,)? ) => {
        $(
            pub struct $struct_name;

            impl ValidationRule for $struct_name {
                fn id(&self) -> &str {
                    $rule_id
                }

                fn description(&self) -> &str {
                    concat!($label, " nodes carry their ", stringify!($accessor))
                }

                fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
                    Ok(graph
                        .nodes
                        .iter()
                        .filter(|n| n.node_type() == $node_type && n.props.$accessor().is_none())
                        .map(|n| {
                            ValidationFinding::warning(format!(
                                concat!($label, " '{}' has no ", stringify!($accessor)),
                                n.name
                            ))
                            .at_node(&n.id)
                            .with_suggestion($suggestion)
                        })
                        .collect())
                }
            }
        )*
    };
}

define_attribute_rules! {
    (AssignmentQualityRule, "assignment-quality", NodeType::UserTask, assignee, "User task",
        "Set an assignee so the task reaches someone"),
    (IntegrationConfigRule, "integration-config", NodeType::ServiceTask, endpoint, "Service task",
        "Configure the endpoint the task should call"),
}

/// Gateways that branch need a condition to choose between branches.
pub struct BranchingConditionRule;

impl ValidationRule for BranchingConditionRule {
    fn id(&self) -> &str {
        "branching-condition"
    }

    fn description(&self) -> &str {
        "branching gateways carry a condition"
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        Ok(graph
            .nodes
            .iter()
            .filter(|n| matches!(n.props, NodeProps::Gateway(_)))
            .filter(|n| graph.outgoing(&n.id) > 1 && n.props.condition().is_none())
            .map(|n| {
                ValidationFinding::warning(format!(
                    "Gateway '{}' has {} outgoing flows but no condition",
                    n.name,
                    graph.outgoing(&n.id)
                ))
                .at_node(&n.id)
                .with_suggestion("Add a condition expression to the gateway")
            })
            .collect())
    }
}

/// Nodes touched by no flow at all, once the graph has more than one node.
pub struct IsolatedNodeRule;

impl ValidationRule for IsolatedNodeRule {
    fn id(&self) -> &str {
        "isolated-node"
    }

    fn description(&self) -> &str {
        "every node takes part in at least one flow"
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        if graph.nodes.len() <= 1 {
            return Ok(Vec::new());
        }
        Ok(graph
            .nodes
            .iter()
            .filter(|n| graph.incoming(&n.id) == 0 && graph.outgoing(&n.id) == 0)
            .map(|n| {
                ValidationFinding::warning(format!("Node '{}' is isolated", n.name))
                    .at_node(&n.id)
                    .with_suggestion("Connect the node or remove it")
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcessFlow, ProcessNode};

    #[test]
    fn attribute_rule_ignores_blank_values() {
        let mut node = ProcessNode::new("t", NodeType::UserTask, "Review");
        if let NodeProps::UserTask(props) = &mut node.props {
            props.assignee = Some("  ".to_string());
        }
        let nodes = vec![node];
        let flows: Vec<ProcessFlow> = Vec::new();
        let graph = GraphView::new(&nodes, &flows);
        let findings = AssignmentQualityRule.check(&graph).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "User task 'Review' has no assignee");
    }

    #[test]
    fn missing_endpoints_are_reported_separately() {
        let nodes = vec![ProcessNode::new("a", NodeType::Start, "A")];
        let flows = vec![ProcessFlow::new("f", "ghost", "phantom")];
        let graph = GraphView::new(&nodes, &flows);
        let findings = EdgeIntegrityRule.check(&graph).unwrap();
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.edge_id.as_deref() == Some("f")));
    }
}
