//! Engine configuration loaded from TOML.
//!
//! ```toml
//! [validation]
//! disabled_rules = ["cycle-detection"]
//!
//! [scoring]
//! warning_penalty = 10
//!
//! [export]
//! pretty = false
//!
//! [import]
//! auto_correct = true
//!
//! [thumbnail]
//! width = 320
//! height = 240
//!
//! [log]
//! level = "debug"
//! ```
//!
//! Every section and every key is optional.

use crate::error::ConfigError;
use crate::format::{ExportOptions, ImportOptions};
use crate::thumbnail::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::validation::{ScoreWeights, Validator, ValidatorBuilder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub validation: ValidationConfig,
    pub scoring: ScoreWeights,
    pub export: ExportOptions,
    pub import: ImportOptions,
    pub thumbnail: ThumbnailConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Ids of built-in rules to skip.
    pub disabled_rules: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter for `env_logger`; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// The built-in rule set minus disabled rules, scored with the configured weights.
    pub fn validator(&self) -> Validator {
        self.validation
            .disabled_rules
            .iter()
            .fold(ValidatorBuilder::new(), |builder, id| builder.without_rule(id))
            .with_weights(self.scoring)
            .build()
    }

    pub fn export_options(&self) -> ExportOptions {
        self.export
    }

    pub fn import_options(&self) -> ImportOptions {
        self.import
    }
}
