//! Rule-based validation of canonical process graphs.
//!
//! A [`Validator`] holds an ordered list of independent [`ValidationRule`]s.
//! Each pass builds one read-only [`GraphView`], runs every rule against it in
//! registration order and partitions the findings by severity. A graph is valid
//! when no rule reported an error; warnings never block validity.
//!
//! ```rust
//! use procgraph::prelude::*;
//!
//! let definition = ProcessDefinition::new(
//!     vec![
//!         ProcessNode::new("start", NodeType::Start, "Start"),
//!         ProcessNode::new("end", NodeType::End, "End"),
//!     ],
//!     vec![ProcessFlow::new("f1", "start", "end")],
//! );
//! let report = Validator::default().validate_definition(&definition);
//! assert!(report.is_valid);
//! ```

use crate::error::RuleError;
use crate::process::{ProcessDefinition, ProcessFlow, ProcessNode};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub mod cycle;
mod finding;
mod rule;
pub mod rules;
mod score;

pub use finding::{Severity, ValidationFinding};
pub use rule::{FnRule, GraphView, ValidationRule, rule_fn};
pub use rules::default_rules;
pub use score::{ScoreWeights, quality_score};

/// The outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationFinding>,
    pub warnings: Vec<ValidationFinding>,
    pub infos: Vec<ValidationFinding>,
    pub score: u8,
}

impl ValidationReport {
    /// All findings, errors first, each group in rule order.
    pub fn findings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.infos.iter())
    }

    pub fn for_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a ValidationFinding> {
        self.findings()
            .filter(move |f| f.node_id.as_deref() == Some(node_id))
    }

    pub fn for_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a ValidationFinding> {
        self.findings()
            .filter(move |f| f.rule_id.as_deref() == Some(rule_id))
    }
}

/// Runs an ordered set of rules over a graph and scores the result.
///
/// Cloning is cheap: rules are shared. Clone the default validator and extend
/// it to add project-specific rules.
#[derive(Clone)]
pub struct Validator {
    rules: Vec<Arc<dyn ValidationRule>>,
    weights: ScoreWeights,
}

pub struct ValidatorBuilder {
    rules: Vec<Arc<dyn ValidationRule>>,
    weights: ScoreWeights,
}

impl ValidatorBuilder {
    /// Starts from the built-in rule set.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
            weights: ScoreWeights::default(),
        }
    }

    /// Starts from no rules at all.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            weights: ScoreWeights::default(),
        }
    }

    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        upsert(&mut self.rules, Arc::new(rule));
        self
    }

    pub fn without_rule(mut self, rule_id: &str) -> Self {
        self.rules.retain(|r| r.id() != rule_id);
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn build(self) -> Validator {
        Validator {
            rules: self.rules,
            weights: self.weights,
        }
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Validator {
    fn default() -> Self {
        ValidatorBuilder::new().build()
    }
}

impl Validator {
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Adds a rule after the existing ones. A rule with the same id is replaced in place.
    pub fn register(&mut self, rule: impl ValidationRule + 'static) {
        upsert(&mut self.rules, Arc::new(rule));
    }

    pub fn register_shared(&mut self, rule: Arc<dyn ValidationRule>) {
        upsert(&mut self.rules, rule);
    }

    /// Removes the rule with this id. Returns whether one was registered.
    pub fn remove(&mut self, rule_id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id() != rule_id);
        self.rules.len() != before
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn validate_definition(&self, definition: &ProcessDefinition) -> ValidationReport {
        self.validate(&definition.nodes, &definition.flows)
    }

    pub fn validate(&self, nodes: &[ProcessNode], flows: &[ProcessFlow]) -> ValidationReport {
        let graph = GraphView::new(nodes, flows);

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut infos = Vec::new();
        for rule in &self.rules {
            for finding in run_rule(rule.as_ref(), &graph) {
                match finding.severity {
                    Severity::Error => errors.push(finding),
                    Severity::Warning => warnings.push(finding),
                    Severity::Info => infos.push(finding),
                }
            }
        }

        let score = quality_score(nodes, flows, errors.len(), warnings.len(), &self.weights);
        debug!(
            "validated {} nodes / {} flows with {} rules: {} errors, {} warnings, score {}",
            nodes.len(),
            flows.len(),
            self.rules.len(),
            errors.len(),
            warnings.len(),
            score
        );

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            infos,
            score,
        }
    }
}

/// Validates with the built-in rule set.
pub fn validate(nodes: &[ProcessNode], flows: &[ProcessFlow]) -> ValidationReport {
    Validator::default().validate(nodes, flows)
}

fn upsert(rules: &mut Vec<Arc<dyn ValidationRule>>, rule: Arc<dyn ValidationRule>) {
    match rules.iter_mut().find(|r| r.id() == rule.id()) {
        Some(slot) => *slot = rule,
        None => rules.push(rule),
    }
}

fn run_rule(rule: &dyn ValidationRule, graph: &GraphView<'_>) -> Vec<ValidationFinding> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.check(graph)))
        .unwrap_or_else(|payload| Err(RuleError::Panicked(panic_message(payload.as_ref()))));

    match outcome {
        Ok(findings) => findings.into_iter().map(|f| f.or_rule(rule.id())).collect(),
        Err(err) => {
            warn!("validation rule '{}' failed: {}", rule.id(), err);
            vec![
                ValidationFinding::error(format!("Rule '{}' failed: {}", rule.id(), err))
                    .with_rule(rule.id()),
            ]
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
