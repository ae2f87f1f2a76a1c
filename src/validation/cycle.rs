//! Directed cycle detection.

use super::rule::{GraphView, ValidationRule};
use super::ValidationFinding;
use crate::error::RuleError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// A flow that re-enters a node currently on the traversal stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackEdge {
    /// Index into `flows` of the closing flow.
    pub flow: usize,
    /// Index into `nodes` of the node the flow re-enters.
    pub node: usize,
}

/// Depth-first search with an explicit stack. O(V + E).
///
/// Roots are tried in node order and successors in flow order, so the result is
/// deterministic. Flows with an unresolved endpoint are ignored.
pub fn find_back_edges(graph: &GraphView<'_>) -> Vec<BackEdge> {
    let count = graph.nodes.len();
    let mut successors: Vec<Vec<(usize, usize)>> = vec![Vec::new(); count];
    for (flow_index, flow) in graph.flows.iter().enumerate() {
        if let (Some(from), Some(to)) = (graph.position(&flow.from), graph.position(&flow.to)) {
            successors[from].push((to, flow_index));
        }
    }

    let mut marks = vec![Mark::Unvisited; count];
    let mut back_edges = Vec::new();
    // (node, index of the next successor to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..count {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnStack;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            match successors[node].get(cursor) {
                Some(&(next, flow)) => {
                    frame.1 += 1;
                    match marks[next] {
                        Mark::Unvisited => {
                            marks[next] = Mark::OnStack;
                            stack.push((next, 0));
                        }
                        Mark::OnStack => back_edges.push(BackEdge { flow, node: next }),
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[node] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }

    back_edges
}

/// Reports one warning per flow that closes a directed cycle.
pub struct CycleDetectionRule;

impl ValidationRule for CycleDetectionRule {
    fn id(&self) -> &str {
        "cycle-detection"
    }

    fn description(&self) -> &str {
        "the flow graph contains no directed cycles"
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        Ok(find_back_edges(graph)
            .into_iter()
            .map(|edge| {
                let node = &graph.nodes[edge.node];
                let flow = &graph.flows[edge.flow];
                ValidationFinding::warning(format!(
                    "Cycle detected: flow '{}' returns to node '{}'",
                    flow.id, node.name
                ))
                .at_node(&node.id)
                .at_edge(&flow.id)
                .with_suggestion("Make sure the loop has an exit condition")
            })
            .collect())
    }
}
