//! Structural comparison of two process definitions.
//!
//! Elements are matched by id. Anything only in the newer definition is
//! `added`, anything only in the older one is `removed`, and elements present
//! in both with at least one differing field are `modified`. When an id occurs
//! more than once, the first occurrence is the one compared.

use crate::process::{ProcessDefinition, ProcessFlow, ProcessNode};
use ahash::AHashMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeField {
    Name,
    Type,
    Position,
    Properties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowField {
    Source,
    Target,
    Condition,
    Label,
}

/// An element keyed by id whose fields can be compared one by one.
pub trait Diffable: Clone {
    type Field;

    fn diff_id(&self) -> &str;

    /// Fields whose values differ between `self` and `other`, in declaration order.
    fn changed_fields(&self, other: &Self) -> Vec<Self::Field>;
}

impl Diffable for ProcessNode {
    type Field = NodeField;

    fn diff_id(&self) -> &str {
        &self.id
    }

    fn changed_fields(&self, other: &Self) -> Vec<NodeField> {
        let mut fields = Vec::new();
        if self.name != other.name {
            fields.push(NodeField::Name);
        }
        if self.node_type() != other.node_type() {
            fields.push(NodeField::Type);
        }
        if self.x != other.x || self.y != other.y {
            fields.push(NodeField::Position);
        }
        // Map equality ignores key order.
        if self.props.to_attributes() != other.props.to_attributes() {
            fields.push(NodeField::Properties);
        }
        fields
    }
}

impl Diffable for ProcessFlow {
    type Field = FlowField;

    fn diff_id(&self) -> &str {
        &self.id
    }

    fn changed_fields(&self, other: &Self) -> Vec<FlowField> {
        let mut fields = Vec::new();
        if self.from != other.from {
            fields.push(FlowField::Source);
        }
        if self.to != other.to {
            fields.push(FlowField::Target);
        }
        if self.condition != other.condition {
            fields.push(FlowField::Condition);
        }
        if self.label != other.label {
            fields.push(FlowField::Label);
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modified<T, F> {
    pub id: String,
    pub before: T,
    pub after: T,
    pub fields: Vec<F>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementDiff<T, F> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
    pub modified: Vec<Modified<T, F>>,
}

impl<T, F> ElementDiff<T, F> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    pub nodes: ElementDiff<ProcessNode, NodeField>,
    pub flows: ElementDiff<ProcessFlow, FlowField>,
    pub identical: bool,
}

/// Compares `before` against `after`.
pub fn compare(before: &ProcessDefinition, after: &ProcessDefinition) -> DiffResult {
    let nodes = diff_elements(&before.nodes, &after.nodes);
    let flows = diff_elements(&before.flows, &after.flows);
    let identical = nodes.is_empty() && flows.is_empty();
    DiffResult {
        nodes,
        flows,
        identical,
    }
}

/// Added elements follow `after` order; removed and modified follow `before` order.
pub fn diff_elements<T: Diffable>(before: &[T], after: &[T]) -> ElementDiff<T, T::Field> {
    let before_index = first_by_id(before);
    let after_index = first_by_id(after);

    let mut removed = Vec::new();
    let mut modified = Vec::new();
    for (position, old) in before.iter().enumerate() {
        if before_index.get(old.diff_id()) != Some(&position) {
            continue;
        }
        match after_index.get(old.diff_id()) {
            None => removed.push(old.clone()),
            Some(&index) => {
                let new = &after[index];
                let fields = old.changed_fields(new);
                if !fields.is_empty() {
                    modified.push(Modified {
                        id: old.diff_id().to_string(),
                        before: old.clone(),
                        after: new.clone(),
                        fields,
                    });
                }
            }
        }
    }

    let added = after
        .iter()
        .enumerate()
        .filter(|(position, new)| {
            after_index.get(new.diff_id()) == Some(position)
                && !before_index.contains_key(new.diff_id())
        })
        .map(|(_, new)| new.clone())
        .collect();

    ElementDiff {
        added,
        removed,
        modified,
    }
}

fn first_by_id<T: Diffable>(elements: &[T]) -> AHashMap<&str, usize> {
    let mut index = AHashMap::with_capacity(elements.len());
    for (position, element) in elements.iter().enumerate() {
        index.entry(element.diff_id()).or_insert(position);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::NodeType;

    #[test]
    fn duplicate_ids_compare_first_occurrence_only() {
        let a = vec![
            ProcessNode::new("x", NodeType::UserTask, "one"),
            ProcessNode::new("x", NodeType::UserTask, "two"),
        ];
        let b = vec![ProcessNode::new("x", NodeType::UserTask, "one")];
        assert!(diff_elements(&a, &b).is_empty());
    }
}
