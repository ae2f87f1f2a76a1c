use super::ValidationFinding;
use crate::error::RuleError;
use crate::process::{ProcessFlow, ProcessNode};
use ahash::AHashMap;

/// Read-only indexes over a graph, built once per validation pass and shared by all rules.
pub struct GraphView<'a> {
    pub nodes: &'a [ProcessNode],
    pub flows: &'a [ProcessFlow],
    index: AHashMap<&'a str, usize>,
    in_degree: AHashMap<&'a str, usize>,
    out_degree: AHashMap<&'a str, usize>,
}

impl<'a> GraphView<'a> {
    pub fn new(nodes: &'a [ProcessNode], flows: &'a [ProcessFlow]) -> Self {
        let mut index = AHashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            // First occurrence wins for duplicated ids.
            index.entry(node.id.as_str()).or_insert(i);
        }

        let mut in_degree: AHashMap<&str, usize> = AHashMap::new();
        let mut out_degree: AHashMap<&str, usize> = AHashMap::new();
        for flow in flows {
            *out_degree.entry(flow.from.as_str()).or_default() += 1;
            *in_degree.entry(flow.to.as_str()).or_default() += 1;
        }

        Self {
            nodes,
            flows,
            index,
            in_degree,
            out_degree,
        }
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index.contains_key(node_id)
    }

    /// Position in `nodes` of the first node with this id.
    pub fn position(&self, node_id: &str) -> Option<usize> {
        self.index.get(node_id).copied()
    }

    pub fn node(&self, node_id: &str) -> Option<&'a ProcessNode> {
        self.position(node_id).map(|i| &self.nodes[i])
    }

    /// Number of flows whose `to` names this id, resolved or not.
    pub fn incoming(&self, node_id: &str) -> usize {
        self.in_degree.get(node_id).copied().unwrap_or(0)
    }

    /// Number of flows whose `from` names this id, resolved or not.
    pub fn outgoing(&self, node_id: &str) -> usize {
        self.out_degree.get(node_id).copied().unwrap_or(0)
    }
}

/// A single, independent check over a process graph.
///
/// Rules must not keep state between calls; the engine may run the same rule
/// object for many graphs. A rule that returns `Err` or panics is reported as one
/// error finding and the rest of the pass continues.
pub trait ValidationRule: Send + Sync {
    /// Stable identifier, used for registration and stamped on findings.
    fn id(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError>;
}

/// A rule backed by a closure. Built with [`rule_fn`].
pub struct FnRule<F> {
    id: String,
    check: F,
}

impl<F> ValidationRule for FnRule<F>
where
    F: Fn(&GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self, graph: &GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> {
        (self.check)(graph)
    }
}

/// Wraps a closure as a [`ValidationRule`] with the given id.
pub fn rule_fn<F>(id: impl Into<String>, check: F) -> FnRule<F>
where
    F: Fn(&GraphView<'_>) -> Result<Vec<ValidationFinding>, RuleError> + Send + Sync,
{
    FnRule {
        id: id.into(),
        check,
    }
}
