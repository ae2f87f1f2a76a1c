use serde::{Deserialize, Deserializer, Serialize};

/// A directed connection between two nodes of a process graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessFlow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    /// Boolean expression guarding this flow, e.g. `${approved} == true`.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
}

impl ProcessFlow {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            condition: None,
            label: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Empty strings are how older documents spell "no value".
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_condition_reads_as_none() {
        let flow: ProcessFlow = serde_json::from_str(
            r#"{"id":"f1","from":"a","to":"b","condition":"","label":"ok"}"#,
        )
        .unwrap();
        assert_eq!(flow.condition, None);
        assert_eq!(flow.label.as_deref(), Some("ok"));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_string(&ProcessFlow::new("f1", "a", "b")).unwrap();
        assert_eq!(json, r#"{"id":"f1","from":"a","to":"b"}"#);
    }
}
