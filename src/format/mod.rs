//! Export to and import from the interchange formats.
//!
//! Four encoders share no state: the native JSON envelope, a structured XML
//! form, a BPMN-style XML form and a flat CSV table. The native and XML forms
//! can be read back; import hard-fails only on unparsable input or missing node
//! and flow collections, and otherwise always returns a definition.

use crate::error::{ExportError, ImportError};
use crate::process::{IdSource, ProcessDefinition, ProcessMetadata, SystemIdSource};
use crate::validation::Validator;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod correct;
pub mod interchange;
pub mod markup;
pub mod native;
pub mod tabular;

pub use correct::auto_correct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Versioned JSON envelope; the file format of record.
    Native,
    /// Structured XML.
    Markup,
    /// BPMN-style process XML with a diagram section.
    Interchange,
    /// One CSV row per node.
    Tabular,
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Native => "json",
            ExportFormat::Markup => "xml",
            ExportFormat::Interchange => "bpmn",
            ExportFormat::Tabular => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Native => "application/json",
            ExportFormat::Markup | ExportFormat::Interchange => "application/xml",
            ExportFormat::Tabular => "text/csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Native => "native",
            ExportFormat::Markup => "markup",
            ExportFormat::Interchange => "interchange",
            ExportFormat::Tabular => "tabular",
        })
    }
}

/// Formats that can be read back into a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Native,
    Markup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub pretty: bool,
    pub include_metadata: bool,
    /// Embed a validation report in the native envelope.
    pub include_validation: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            include_metadata: true,
            include_validation: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Repair id collisions and drop flows with unresolved endpoints, warning for each repair.
    pub auto_correct: bool,
    /// Run the validator and fold its findings into the result.
    pub validate_on_import: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<ProcessDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProcessMetadata>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ImportResult {
    fn failed(error: ImportError) -> Self {
        Self {
            success: false,
            definition: None,
            metadata: None,
            warnings: Vec::new(),
            errors: vec![error.to_string()],
        }
    }
}

/// What a format parser hands back before correction and validation.
pub(crate) struct Parsed {
    pub definition: ProcessDefinition,
    pub metadata: Option<ProcessMetadata>,
    pub warnings: Vec<String>,
}

/// Encodes `definition` in the given format.
pub fn export_to(
    format: ExportFormat,
    definition: &ProcessDefinition,
    metadata: Option<&ProcessMetadata>,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    export_to_with(format, definition, metadata, options, &Validator::default())
}

/// Like [`export_to`], embedding reports produced by `validator`.
pub fn export_to_with(
    format: ExportFormat,
    definition: &ProcessDefinition,
    metadata: Option<&ProcessMetadata>,
    options: &ExportOptions,
    validator: &Validator,
) -> Result<String, ExportError> {
    let metadata = metadata.filter(|_| options.include_metadata);
    debug!(
        "exporting {} nodes / {} flows as {}",
        definition.nodes.len(),
        definition.flows.len(),
        format
    );
    match format {
        ExportFormat::Native => {
            let report = options
                .include_validation
                .then(|| validator.validate_definition(definition));
            native::export(definition, metadata, report, options.pretty)
        }
        ExportFormat::Markup => markup::export(definition, metadata, options.pretty),
        ExportFormat::Interchange => interchange::export(definition, metadata, options.pretty),
        ExportFormat::Tabular => tabular::export(definition),
    }
}

/// Decodes `content` with default validator and system id generation.
pub fn import_from(format: ImportFormat, content: &str, options: &ImportOptions) -> ImportResult {
    Importer::new(*options).import(format, content)
}

/// Configurable import pipeline: parse, optionally auto-correct, optionally validate.
pub struct Importer {
    options: ImportOptions,
    validator: Validator,
    ids: Arc<dyn IdSource>,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            validator: Validator::default(),
            ids: Arc::new(SystemIdSource),
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Replaces the stamp source used when renaming colliding ids.
    pub fn with_id_source(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn import(&self, format: ImportFormat, content: &str) -> ImportResult {
        let parsed = match format {
            ImportFormat::Native => native::parse(content),
            ImportFormat::Markup => markup::parse(content),
        };
        let Parsed {
            mut definition,
            metadata,
            mut warnings,
        } = match parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("import failed: {}", err);
                return ImportResult::failed(err);
            }
        };

        if self.options.auto_correct {
            warnings.extend(auto_correct(&mut definition, self.ids.as_ref()));
        }

        let mut errors = Vec::new();
        if self.options.validate_on_import {
            let report = self.validator.validate_definition(&definition);
            errors.extend(report.errors.into_iter().map(|f| f.message));
            warnings.extend(report.warnings.into_iter().map(|f| f.message));
        }

        ImportResult {
            success: errors.is_empty(),
            definition: Some(definition),
            metadata,
            warnings,
            errors,
        }
    }
}
