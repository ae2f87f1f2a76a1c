use thiserror::Error;

/// Structural errors that make an import fail outright. No partial result is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Failed to parse JSON document: {0}")]
    InvalidJson(String),

    #[error("Failed to parse XML document: {0}")]
    InvalidMarkup(String),

    #[error("Invalid definition: '{0}' must be an array")]
    MissingArray(&'static str),

    #[error("Node '{node_id}' has an unknown type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Malformed {kind} at position {index}: {message}")]
    MalformedEntry {
        kind: &'static str,
        index: usize,
        message: String,
    },
}

/// Errors raised while encoding a definition into one of the export formats.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    #[error("Failed to serialize JSON: {0}")]
    Json(String),

    #[error("Failed to write XML: {0}")]
    Markup(String),

    #[error("Failed to write CSV: {0}")]
    Tabular(String),
}

/// A fault inside a single validation rule. The engine turns it into an error finding.
#[derive(Error, Debug, Clone)]
pub enum RuleError {
    #[error("{0}")]
    Failed(String),

    #[error("rule panicked: {0}")]
    Panicked(String),
}

/// Errors that can occur when converting a custom user format into a `ProcessDefinition`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Errors loading an `EngineConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
