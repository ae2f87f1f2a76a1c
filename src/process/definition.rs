use super::{ProcessFlow, ProcessNode};
use serde::{Deserialize, Serialize};

/// The canonical, storage-ready form of a process graph.
///
/// Structural invariants (single start, reachable ends, no dangling flows) are
/// checked by the [`Validator`](crate::validation::Validator), not enforced here,
/// so that partially built graphs can still be held and edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    pub nodes: Vec<ProcessNode>,
    pub flows: Vec<ProcessFlow>,
}

impl ProcessDefinition {
    pub fn new(nodes: Vec<ProcessNode>, flows: Vec<ProcessFlow>) -> Self {
        Self { nodes, flows }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.flows.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&ProcessNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn flow(&self, id: &str) -> Option<&ProcessFlow> {
        self.flows.iter().find(|f| f.id == id)
    }

    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a ProcessFlow> {
        self.flows.iter().filter(move |f| f.from == node_id)
    }

    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a ProcessFlow> {
        self.flows.iter().filter(move |f| f.to == node_id)
    }

    pub fn add_node(&mut self, node: ProcessNode) {
        self.nodes.push(node);
    }

    /// Applies `update` to the node with the given id. Returns `false` if there is no such node.
    pub fn update_node(&mut self, id: &str, update: impl FnOnce(&mut ProcessNode)) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                update(node);
                true
            }
            None => false,
        }
    }

    /// Removes a node together with every flow attached to it.
    pub fn remove_node(&mut self, id: &str) -> Option<ProcessNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.flows.retain(|f| f.from != id && f.to != id);
        Some(self.nodes.remove(index))
    }

    pub fn add_flow(&mut self, flow: ProcessFlow) {
        self.flows.push(flow);
    }

    pub fn update_flow(&mut self, id: &str, update: impl FnOnce(&mut ProcessFlow)) -> bool {
        match self.flows.iter_mut().find(|f| f.id == id) {
            Some(flow) => {
                update(flow);
                true
            }
            None => false,
        }
    }

    pub fn remove_flow(&mut self, id: &str) -> Option<ProcessFlow> {
        let index = self.flows.iter().position(|f| f.id == id)?;
        Some(self.flows.remove(index))
    }
}
