use super::definition::ProcessDefinition;
use crate::error::ConversionError;

/// A trait for custom data models that can be converted into a `ProcessDefinition`.
///
/// This is the extension point for editors or storage formats other than the
/// built-in visual graph. Implement it on your own structs to feed them through
/// the validator and the exporters.
///
/// # Example
///
/// ```rust,no_run
/// use procgraph::prelude::*;
/// use procgraph::error::ConversionError;
///
/// struct Step { id: String, title: String }
/// struct Checklist { steps: Vec<Step> }
///
/// impl IntoProcess for Checklist {
///     fn into_process(self) -> std::result::Result<ProcessDefinition, ConversionError> {
///         let mut definition = ProcessDefinition::default();
///         definition.add_node(ProcessNode::new("start", NodeType::Start, "Start"));
///         let mut previous = "start".to_string();
///         for step in self.steps {
///             definition.add_node(ProcessNode::new(&step.id, NodeType::UserTask, step.title));
///             definition.add_flow(ProcessFlow::new(
///                 format!("{}_{}", previous, step.id),
///                 &previous,
///                 &step.id,
///             ));
///             previous = step.id;
///         }
///         definition.add_node(ProcessNode::new("end", NodeType::End, "End"));
///         definition.add_flow(ProcessFlow::new("to_end", previous, "end"));
///         Ok(definition)
///     }
/// }
/// ```
pub trait IntoProcess {
    /// Consumes the object and converts it into a canonical process definition.
    fn into_process(self) -> Result<ProcessDefinition, ConversionError>;
}
