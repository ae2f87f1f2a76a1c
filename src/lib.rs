//! # Procgraph - Process Graph Conversion and Validation Engine
//!
//! **Procgraph** is the model layer behind a visual workflow editor. It keeps a
//! canonical, storage-friendly representation of a business process (start and
//! end events, user tasks, service tasks and gateways joined by directed flows)
//! and provides everything an editor needs around it.
//!
//! ## Core Workflow
//!
//! 1.  **Convert**: Canvas state from the editor (`ui::VisualGraph`) is mapped to a
//!     `ProcessDefinition` with `converter::to_canonical`, and back with `converter::to_visual`.
//!     Other sources can implement the `IntoProcess` trait.
//! 2.  **Validate**: A `Validator` runs an ordered, extensible list of rules and returns a
//!     `ValidationReport` with errors, warnings and a 0-100 quality score.
//! 3.  **Exchange**: `format::export_to` writes the native JSON envelope, structured XML,
//!     BPMN-style XML or CSV. `format::import_from` reads native JSON and XML back, optionally
//!     repairing id collisions and dangling flows.
//! 4.  **Inspect**: `diff::compare` reports what changed between two definitions and
//!     `thumbnail::generate_thumbnail` renders a small SVG preview.
//!
//! Every call is synchronous and deterministic for a given input; the engine holds no
//! state between calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use procgraph::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let definition = ProcessDefinition::new(
//!         vec![
//!             ProcessNode::new("start", NodeType::Start, "Start").at(100.0, 100.0),
//!             ProcessNode::new("review", NodeType::UserTask, "Review").at(250.0, 100.0),
//!             ProcessNode::new("end", NodeType::End, "End").at(400.0, 100.0),
//!         ],
//!         vec![
//!             ProcessFlow::new("f1", "start", "review"),
//!             ProcessFlow::new("f2", "review", "end"),
//!         ],
//!     );
//!
//!     let report = Validator::default().validate_definition(&definition);
//!     assert!(report.is_valid);
//!     // The review task has no assignee.
//!     assert_eq!(report.warnings.len(), 1);
//!
//!     let json = export_to(ExportFormat::Native, &definition, None, &ExportOptions::default())?;
//!     let imported = import_from(ImportFormat::Native, &json, &ImportOptions::default());
//!     assert_eq!(imported.definition, Some(definition));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod converter;
pub mod diff;
pub mod error;
pub mod format;
pub mod prelude;
pub mod process;
pub mod thumbnail;
pub mod ui;
pub mod validation;
