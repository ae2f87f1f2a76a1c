use crate::validation::ValidationReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state of a stored process definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Draft => "draft",
            ProcessStatus::Published => "published",
            ProcessStatus::Archived => "archived",
        }
    }

    pub fn can_edit(&self) -> bool {
        matches!(self, ProcessStatus::Draft)
    }

    pub fn can_delete(&self) -> bool {
        matches!(self, ProcessStatus::Draft | ProcessStatus::Archived)
    }
}

/// Descriptive data owned by the persistence layer. Carried through export and
/// import, never interpreted by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetadata {
    pub key: String,
    pub name: String,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: ProcessStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn first_version() -> u32 {
    1
}

impl ProcessMetadata {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            version: first_version(),
            description: None,
            category: None,
            status: ProcessStatus::Draft,
            created_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// A draft may be published once its definition validates without errors.
    pub fn can_publish(&self, report: &ValidationReport) -> bool {
        self.status == ProcessStatus::Draft && report.is_valid
    }
}
