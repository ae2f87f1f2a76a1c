//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the procgraph crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use procgraph::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let content = std::fs::read_to_string("path/to/process.json")?;
//! let result = import_from(ImportFormat::Native, &content, &ImportOptions::default());
//! if let Some(definition) = result.definition {
//!     let report = Validator::default().validate_definition(&definition);
//!     println!("score {}: {} errors", report.score, report.errors.len());
//! }
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::process::{
    IntoProcess, NodeProps, NodeType, ProcessDefinition, ProcessFlow, ProcessMetadata,
    ProcessNode, ProcessStatus,
};

// Canvas mirror and conversion
pub use crate::converter::{to_canonical, to_visual};
pub use crate::ui::{VisualEdge, VisualGraph, VisualNode};

// Validation
pub use crate::validation::{
    Severity, ValidationFinding, ValidationReport, ValidationRule, Validator,
};

// Formats, diff, preview
pub use crate::diff::{DiffResult, compare};
pub use crate::format::{
    ExportFormat, ExportOptions, ImportFormat, ImportOptions, ImportResult, export_to, import_from,
};
pub use crate::thumbnail::generate_thumbnail;

// Configuration and errors
pub use crate::config::EngineConfig;
pub use crate::error::{ConversionError, ExportError, ImportError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
