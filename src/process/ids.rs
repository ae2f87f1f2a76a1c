//! Identifier generation for nodes and flows.
//!
//! Ids combine the element kind, a millisecond stamp and a short random suffix.
//! That is unique enough within one editing session; it is not a distributed
//! uniqueness guarantee.

use super::{NodeProps, NodeType};
use rand::Rng;
use rand::distr::Alphanumeric;
use std::sync::atomic::{AtomicU64, Ordering};

const SUFFIX_LEN: usize = 6;

/// Source of the time stamp and random suffix that make up generated ids.
///
/// Swap in [`FixedIdSource`] where output must be reproducible.
pub trait IdSource: Send + Sync {
    /// A millisecond stamp. Implementations should never return a smaller value than before.
    fn stamp(&self) -> u64;
    fn suffix(&self) -> String;
}

/// Wall-clock stamps, forced to be strictly increasing within the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIdSource;

static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

impl IdSource for SystemIdSource {
    fn stamp(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut last = LAST_STAMP.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match LAST_STAMP.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }

    fn suffix(&self) -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }
}

/// Always yields the same stamp and suffix.
#[derive(Debug, Clone)]
pub struct FixedIdSource {
    pub stamp: u64,
    pub suffix: String,
}

impl FixedIdSource {
    pub fn new(stamp: u64, suffix: impl Into<String>) -> Self {
        Self {
            stamp,
            suffix: suffix.into(),
        }
    }
}

impl IdSource for FixedIdSource {
    fn stamp(&self) -> u64 {
        self.stamp
    }

    fn suffix(&self) -> String {
        self.suffix.clone()
    }
}

pub fn generate_node_id(node_type: NodeType) -> String {
    generate_node_id_with(&SystemIdSource, node_type)
}

pub fn generate_node_id_with(source: &dyn IdSource, node_type: NodeType) -> String {
    format!("{}_{}_{}", node_type, source.stamp(), source.suffix())
}

pub fn generate_edge_id(from: &str, to: &str) -> String {
    generate_edge_id_with(&SystemIdSource, from, to)
}

pub fn generate_edge_id_with(source: &dyn IdSource, from: &str, to: &str) -> String {
    format!("flow_{}_{}_{}_{}", from, to, source.stamp(), source.suffix())
}

/// The minimal valid attribute set for a new node of `node_type`.
pub fn default_node_props(node_type: NodeType) -> NodeProps {
    NodeProps::default_for(node_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_strictly_increase() {
        let source = SystemIdSource;
        let first = source.stamp();
        let second = source.stamp();
        assert!(second > first);
    }

    #[test]
    fn ids_carry_kind_and_suffix() {
        let id = generate_node_id(NodeType::UserTask);
        assert!(id.starts_with("userTask_"));
        assert_eq!(id.rsplit('_').next().map(str::len), Some(SUFFIX_LEN));
        assert_ne!(id, generate_node_id(NodeType::UserTask));
    }

    #[test]
    fn fixed_source_is_deterministic() {
        let source = FixedIdSource::new(42, "abc");
        assert_eq!(generate_edge_id_with(&source, "a", "b"), "flow_a_b_42_abc");
        assert_eq!(generate_node_id_with(&source, NodeType::Gateway), "gateway_42_abc");
    }
}
