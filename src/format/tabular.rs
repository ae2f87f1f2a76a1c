//! Flat CSV export, one row per node. Flows are not represented.

use crate::error::ExportError;
use crate::process::ProcessDefinition;
use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

pub const HEADER: [&str; 6] = ["id", "type", "name", "x", "y", "properties"];

pub(crate) fn export(definition: &ProcessDefinition) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(HEADER).map_err(tabular_error)?;
    for node in &definition.nodes {
        let properties = Value::Object(node.props.to_attributes()).to_string();
        writer
            .write_record([
                node.id.as_str(),
                node.node_type().as_str(),
                node.name.as_str(),
                node.x.to_string().as_str(),
                node.y.to_string().as_str(),
                properties.as_str(),
            ])
            .map_err(tabular_error)?;
    }

    let bytes = writer.into_inner().map_err(tabular_error)?;
    String::from_utf8(bytes).map_err(tabular_error)
}

fn tabular_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Tabular(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{NodeType, ProcessNode};

    #[test]
    fn every_field_is_quoted() {
        let definition = ProcessDefinition::new(
            vec![ProcessNode::new("s", NodeType::Start, "Start").at(1.5, 2.0)],
            vec![],
        );
        let csv = export(&definition).expect("export");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], r#""id","type","name","x","y","properties""#);
        assert_eq!(lines[1], r#""s","start","Start","1.5","2","{}""#);
    }
}
