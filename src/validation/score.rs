use crate::process::{ProcessFlow, ProcessNode};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Weights of the quality score heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub error_penalty: i64,
    pub warning_penalty: i64,
    /// Element count (nodes + flows) above which the size bonus starts.
    pub size_threshold: i64,
    pub size_bonus_cap: i64,
    /// Bonus per distinct node type present.
    pub type_bonus: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            error_penalty: 20,
            warning_penalty: 5,
            size_threshold: 5,
            size_bonus_cap: 10,
            type_bonus: 2,
        }
    }
}

/// A 0-100 summary of structural health. A UX signal, not a correctness gate.
pub fn quality_score(
    nodes: &[ProcessNode],
    flows: &[ProcessFlow],
    errors: usize,
    warnings: usize,
    weights: &ScoreWeights,
) -> u8 {
    let mut score: i64 = 100;
    score = score.saturating_sub(count(errors).saturating_mul(weights.error_penalty));
    score = score.saturating_sub(count(warnings).saturating_mul(weights.warning_penalty));

    let elements = count(nodes.len()).saturating_add(count(flows.len()));
    if elements > weights.size_threshold {
        score = score.saturating_add(
            (elements - weights.size_threshold).min(weights.size_bonus_cap),
        );
    }

    let distinct_types = nodes.iter().map(ProcessNode::node_type).unique().count();
    score = score.saturating_add(count(distinct_types).saturating_mul(weights.type_bonus));

    score.clamp(0, 100) as u8
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::NodeType;

    #[test]
    fn penalties_are_clamped_at_zero() {
        assert_eq!(quality_score(&[], &[], 10, 0, &ScoreWeights::default()), 0);
    }

    #[test]
    fn size_and_variety_bonuses_apply() {
        let nodes: Vec<ProcessNode> = (0..6)
            .map(|i| ProcessNode::new(format!("n{}", i), NodeType::UserTask, "t"))
            .collect();
        // 100 - 3 * 20 + min(10, 6 - 5) + 2
        assert_eq!(quality_score(&nodes, &[], 3, 0, &ScoreWeights::default()), 43);
    }
}
