//! Format tests
//!
//! Export to every format, import of native and markup documents, and auto-correction.
//!
mod common;
use common::*;
use procgraph::error::ImportError;
use procgraph::format::{Importer, export_to_with};
use procgraph::prelude::*;
use procgraph::process::FixedIdSource;
use serde_json::Value;
use std::sync::Arc;

#[cfg(test)]
mod format_tests {
    use super::*;

    fn sample_metadata() -> ProcessMetadata {
        let mut metadata = ProcessMetadata::new("approval", "Approval flow");
        metadata.version = 3;
        metadata.description = Some("Two-step approval".to_string());
        metadata.created_by = Some(7);
        metadata
    }

    fn corrected() -> ImportOptions {
        ImportOptions {
            auto_correct: true,
            validate_on_import: false,
        }
    }

    #[test]
    fn test_native_round_trip() {
        let definition = create_approval_process();
        let metadata = sample_metadata();
        let json = export_to(
            ExportFormat::Native,
            &definition,
            Some(&metadata),
            &ExportOptions::default(),
        )
        .expect("export");

        let result = import_from(ImportFormat::Native, &json, &ImportOptions::default());
        assert!(result.success);
        assert!(result.warnings.is_empty());
        assert_eq!(result.definition, Some(definition));
        assert_eq!(result.metadata, Some(metadata));
    }

    #[test]
    fn test_native_envelope_shape() {
        let options = ExportOptions {
            pretty: false,
            include_metadata: false,
            include_validation: true,
        };
        let json = export_to(
            ExportFormat::Native,
            &create_linear_process(),
            Some(&sample_metadata()),
            &options,
        )
        .expect("export");
        assert!(!json.contains('\n'));

        let envelope: Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(envelope["version"], "1.0");
        assert_eq!(envelope["format"], "procgraph");
        assert!(envelope["timestamp"].is_string());
        assert!(envelope.get("metadata").is_none());
        assert_eq!(envelope["definition"]["nodes"][1]["type"], "userTask");
        assert_eq!(envelope["validation"]["isValid"], true);
        assert_eq!(envelope["validation"]["warnings"][0]["ruleId"], "assignment-quality");
    }

    #[test]
    fn test_embedded_validation_uses_given_validator() {
        let mut validator = Validator::default();
        validator.remove("assignment-quality");
        let options = ExportOptions {
            include_validation: true,
            ..Default::default()
        };
        let json = export_to_with(
            ExportFormat::Native,
            &create_linear_process(),
            None,
            &options,
            &validator,
        )
        .expect("export");
        let envelope: Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(envelope["validation"]["warnings"], Value::Array(Vec::new()));
    }

    #[test]
    fn test_markup_round_trip() {
        let definition = create_approval_process();
        let metadata = sample_metadata();
        let xml = export_to(
            ExportFormat::Markup,
            &definition,
            Some(&metadata),
            &ExportOptions::default(),
        )
        .expect("export");
        assert!(xml.contains(r#"<process version="1.0">"#));
        assert!(xml.contains(r#"<node id="check" type="gateway" name="Approved?">"#));
        assert!(xml.contains("<label>approved</label>"));

        let result = import_from(ImportFormat::Markup, &xml, &ImportOptions::default());
        assert!(result.success, "{:?}", result.errors);
        assert_eq!(result.definition, Some(definition));
        assert_eq!(result.metadata, Some(metadata));
    }

    #[test]
    fn test_interchange_export() {
        let bpmn = export_to(
            ExportFormat::Interchange,
            &create_approval_process(),
            Some(&sample_metadata()),
            &ExportOptions::default(),
        )
        .expect("export");

        assert!(bpmn.starts_with("<?xml"));
        assert!(bpmn.contains(r#"<bpmn:process id="approval" name="Approval flow" isExecutable="true">"#));
        assert!(bpmn.contains(r#"<bpmn:startEvent id="start" name="Start"/>"#));
        assert!(bpmn.contains(r#"<bpmn:userTask id="submit" name="Submit request" assignee="alice"/>"#));
        assert!(bpmn.contains(r#"<bpmn:exclusiveGateway id="check" name="Approved?"/>"#));
        assert!(bpmn.contains(r#"<bpmn:sequenceFlow id="f3" sourceRef="check" targetRef="notify" name="approved">"#));
        assert!(bpmn.contains(r#"<bpmn:conditionExpression xsi:type="bpmn:tFormalExpression">approved == true</bpmn:conditionExpression>"#));
        assert_eq!(bpmn.matches("<bpmndi:BPMNShape ").count(), 5);
        assert_eq!(bpmn.matches("<bpmndi:BPMNEdge ").count(), 5);
        assert!(bpmn.contains(r#"<dc:Bounds x="0" y="100" width="100" height="80"/>"#));
    }

    #[test]
    fn test_tabular_export_has_one_row_per_node() {
        let csv = export_to(
            ExportFormat::Tabular,
            &create_linear_process(),
            None,
            &ExportOptions::default(),
        )
        .expect("export");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], r#""id","type","name","x","y","properties""#);
        for row in &lines[1..] {
            assert!(row.starts_with('"') && row.ends_with('"'));
            assert_eq!(row.split("\",\"").count(), 6);
        }
        assert_eq!(lines[2], r#""review","userTask","Review","250","100","{}""#);
    }

    #[test]
    fn test_tabular_escapes_embedded_quotes() {
        let definition = ProcessDefinition::new(
            vec![assigned_task("t", "Say \"hi\"", "dan")],
            vec![],
        );
        let csv = export_to(ExportFormat::Tabular, &definition, None, &ExportOptions::default())
            .expect("export");
        let row = csv.lines().nth(1).expect("row");
        assert_eq!(row, r#""t","userTask","Say ""hi""","0","0","{""assignee"":""dan""}""#);
    }

    #[test]
    fn test_format_descriptors() {
        assert_eq!(ExportFormat::Native.file_extension(), "json");
        assert_eq!(ExportFormat::Interchange.file_extension(), "bpmn");
        assert_eq!(ExportFormat::Tabular.mime_type(), "text/csv");
        assert_eq!(ExportFormat::Markup.mime_type(), "application/xml");
    }

    #[test]
    fn test_auto_correct_drops_dangling_flow() {
        let result = import_from(ImportFormat::Native, DANGLING_FLOW_JSON, &corrected());
        assert!(result.success);
        let definition = result.definition.expect("definition");
        assert_eq!(definition.flows.len(), 1);
        assert!(definition.flow("f_ghost").is_none());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("f_ghost"));
    }

    #[test]
    fn test_without_auto_correct_dangling_flow_is_kept() {
        let result = import_from(ImportFormat::Native, DANGLING_FLOW_JSON, &ImportOptions::default());
        assert!(result.success);
        assert_eq!(result.definition.expect("definition").flows.len(), 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_on_import_folds_findings() {
        let options = ImportOptions {
            auto_correct: false,
            validate_on_import: true,
        };
        let result = import_from(ImportFormat::Native, DANGLING_FLOW_JSON, &options);
        assert!(!result.success);
        assert!(result.definition.is_some());
        assert_eq!(
            result.errors,
            vec!["Flow 'f_ghost' references missing target node 'ghost'".to_string()]
        );
    }

    #[test]
    fn test_auto_correct_renames_collisions() {
        let importer = Importer::new(corrected())
            .with_id_source(Arc::new(FixedIdSource::new(1_700_000_000_000, "abc123")));
        let result = importer.import(ImportFormat::Native, COLLIDING_IDS_JSON);

        let definition = result.definition.expect("definition");
        let node_ids: Vec<&str> = definition.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(node_ids, vec!["start", "task", "task_1700000000000", "end"]);
        let flow_ids: Vec<&str> = definition.flows.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(flow_ids, vec!["f", "f_1700000000000"]);
        assert_eq!(
            result.warnings,
            vec![
                "Renamed duplicate node id 'task' to 'task_1700000000000'".to_string(),
                "Renamed duplicate flow id 'f' to 'f_1700000000000'".to_string(),
            ]
        );
    }

    #[test]
    fn test_auto_correct_is_idempotent_with_fixed_ids() {
        let importer = Importer::new(corrected())
            .with_id_source(Arc::new(FixedIdSource::new(42, "zzzzzz")));
        let first = importer.import(ImportFormat::Native, COLLIDING_IDS_JSON);
        let second = importer.import(ImportFormat::Native, COLLIDING_IDS_JSON);
        assert_eq!(first.definition, second.definition);

        // Re-importing the corrected output changes nothing further.
        let corrected_json = export_to(
            ExportFormat::Native,
            first.definition.as_ref().expect("definition"),
            None,
            &ExportOptions::default(),
        )
        .expect("export");
        let third = importer.import(ImportFormat::Native, &corrected_json);
        assert_eq!(third.definition, first.definition);
        assert!(third.warnings.is_empty());
    }

    #[test]
    fn test_structural_errors_fail_the_import() {
        let invalid_json = import_from(ImportFormat::Native, "{not json", &corrected());
        assert!(!invalid_json.success);
        assert!(invalid_json.definition.is_none());
        assert_eq!(invalid_json.errors.len(), 1);

        let missing_nodes = import_from(
            ImportFormat::Native,
            r#"{"definition": {"flows": []}}"#,
            &corrected(),
        );
        assert_eq!(
            missing_nodes.errors,
            vec![ImportError::MissingArray("definition.nodes").to_string()]
        );

        let unknown_type = import_from(
            ImportFormat::Native,
            r#"{"nodes": [{"id": "t", "type": "timer"}], "flows": []}"#,
            &corrected(),
        );
        assert_eq!(
            unknown_type.errors,
            vec!["Node 't' has an unknown type: 'timer'".to_string()]
        );

        let broken_xml = import_from(ImportFormat::Markup, "<process><nodes>", &corrected());
        assert!(!broken_xml.success);
    }

    #[test]
    fn test_native_entries_with_missing_keys_are_corrected() {
        let json = r#"{
            "nodes": [
                {"id": "s", "type": "start", "name": "Start"},
                {"type": "end", "name": "End"}
            ],
            "flows": [{"id": "f1", "from": "s"}]
        }"#;
        let importer = Importer::new(corrected())
            .with_id_source(Arc::new(FixedIdSource::new(5, "abc123")));
        let result = importer.import(ImportFormat::Native, json);

        assert!(result.success, "errors: {:?}", result.errors);
        let definition = result.definition.expect("definition");
        assert!(definition.node("end_5_abc123").is_some());
        assert!(definition.flows.is_empty());
        assert_eq!(
            result.warnings,
            vec![
                "Assigned id 'end_5_abc123' to node 'End' without an id".to_string(),
                "Removed flow 'f1' referencing missing node(s): ''".to_string(),
            ]
        );

        // Without correction the entries load as blanks and validation reports them.
        let raw = import_from(ImportFormat::Native, json, &ImportOptions::default());
        assert!(raw.success);
        assert_eq!(raw.definition.expect("definition").flows[0].to, "");
    }

    #[test]
    fn test_markup_keeps_surrounding_whitespace_in_text() {
        let definition = ProcessDefinition::new(
            vec![
                ProcessNode::new("s", NodeType::Start, "Start"),
                ProcessNode::new("e", NodeType::End, "End").at(200.0, 0.0),
            ],
            vec![ProcessFlow::new("f", "s", "e")
                .with_condition(" x > 1 ")
                .with_label("go ")],
        );
        let xml = export_to(ExportFormat::Markup, &definition, None, &ExportOptions::default())
            .expect("export");
        let result = import_from(ImportFormat::Markup, &xml, &ImportOptions::default());

        let flow = result
            .definition
            .expect("definition")
            .flow("f")
            .cloned()
            .expect("flow");
        assert_eq!(flow.condition.as_deref(), Some(" x > 1 "));
        assert_eq!(flow.label.as_deref(), Some("go "));
    }

    #[test]
    fn test_markup_import_with_defaults() {
        let xml = r#"
            <process version="1.0">
                <nodes>
                    <node id="s" type="start" name="Begin"/>
                    <node id="t" type="serviceTask" name="Call">
                        <position x="40" y="12.5"/>
                        <properties>{"endpoint": "https://example.test", "retries": 3}</properties>
                    </node>
                </nodes>
                <flows>
                    <flow id="f" from="s" to="t"><label>   </label></flow>
                </flows>
            </process>
        "#;
        let result = import_from(ImportFormat::Markup, xml, &ImportOptions::default());
        assert!(result.success);
        assert!(result.metadata.is_none());

        let definition = result.definition.expect("definition");
        let call = definition.node("t").expect("t");
        assert_eq!((call.x, call.y), (40.0, 12.5));
        assert_eq!(call.props.endpoint(), Some("https://example.test"));
        assert_eq!(call.props.extra().get("retries"), Some(&serde_json::json!(3)));
        assert_eq!(definition.flow("f").and_then(|f| f.label.clone()), None);
    }
}
