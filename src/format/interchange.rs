//! BPMN 2.0 style export with a diagram-interchange section.
//!
//! Export only. Gateways of every kind map to `exclusiveGateway`; the kind and
//! other attributes that BPMN has no slot for are dropped. Shapes are fixed
//! 100x80 boxes anchored at the node position and edges run centre to centre.

use super::markup::XmlWriter;
use crate::error::ExportError;
use crate::process::{NodeProps, NodeType, ProcessDefinition, ProcessMetadata, ProcessNode};
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};

const BPMN_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
const BPMNDI_NS: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
const DC_NS: &str = "http://www.omg.org/spec/DD/20100524/DC";
const DI_NS: &str = "http://www.omg.org/spec/DD/20100524/DI";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const TARGET_NS: &str = "http://bpmn.io/schema/bpmn";

pub const SHAPE_WIDTH: f64 = 100.0;
pub const SHAPE_HEIGHT: f64 = 80.0;

const DEFAULT_PROCESS_ID: &str = "Process_1";

fn element_name(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Start => "bpmn:startEvent",
        NodeType::End => "bpmn:endEvent",
        NodeType::UserTask => "bpmn:userTask",
        NodeType::ServiceTask => "bpmn:serviceTask",
        NodeType::Gateway => "bpmn:exclusiveGateway",
    }
}

pub(crate) fn export(
    definition: &ProcessDefinition,
    metadata: Option<&ProcessMetadata>,
    pretty: bool,
) -> Result<String, ExportError> {
    let process_id = metadata
        .map(|m| m.key.as_str())
        .filter(|key| !key.trim().is_empty())
        .unwrap_or(DEFAULT_PROCESS_ID);
    let process_name = metadata.map(|m| m.name.as_str()).unwrap_or_default();

    let mut out = XmlWriter::new(pretty);
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("bpmn:definitions");
    root.push_attribute(("xmlns:bpmn", BPMN_NS));
    root.push_attribute(("xmlns:bpmndi", BPMNDI_NS));
    root.push_attribute(("xmlns:dc", DC_NS));
    root.push_attribute(("xmlns:di", DI_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("id", format!("Definitions_{}", process_id).as_str()));
    root.push_attribute(("targetNamespace", TARGET_NS));
    out.event(Event::Start(root))?;

    let mut process = BytesStart::new("bpmn:process");
    process.push_attribute(("id", process_id));
    if !process_name.is_empty() {
        process.push_attribute(("name", process_name));
    }
    process.push_attribute(("isExecutable", "true"));
    out.event(Event::Start(process))?;

    for node in &definition.nodes {
        out.event(Event::Empty(node_element(node)))?;
    }

    for flow in &definition.flows {
        let mut element = BytesStart::new("bpmn:sequenceFlow");
        element.push_attribute(("id", flow.id.as_str()));
        element.push_attribute(("sourceRef", flow.from.as_str()));
        element.push_attribute(("targetRef", flow.to.as_str()));
        if let Some(label) = &flow.label {
            element.push_attribute(("name", label.as_str()));
        }
        match &flow.condition {
            None => out.event(Event::Empty(element))?,
            Some(condition) => {
                out.event(Event::Start(element))?;
                let mut expression = BytesStart::new("bpmn:conditionExpression");
                expression.push_attribute(("xsi:type", "bpmn:tFormalExpression"));
                out.event(Event::Start(expression))?;
                out.event(Event::Text(BytesText::new(condition)))?;
                out.close("bpmn:conditionExpression")?;
                out.close("bpmn:sequenceFlow")?;
            }
        }
    }
    out.close("bpmn:process")?;

    let mut diagram = BytesStart::new("bpmndi:BPMNDiagram");
    diagram.push_attribute(("id", "BPMNDiagram_1"));
    out.event(Event::Start(diagram))?;
    let mut plane = BytesStart::new("bpmndi:BPMNPlane");
    plane.push_attribute(("id", "BPMNPlane_1"));
    plane.push_attribute(("bpmnElement", process_id));
    out.event(Event::Start(plane))?;

    for node in &definition.nodes {
        let mut shape = BytesStart::new("bpmndi:BPMNShape");
        shape.push_attribute(("id", format!("{}_di", node.id).as_str()));
        shape.push_attribute(("bpmnElement", node.id.as_str()));
        out.event(Event::Start(shape))?;
        let mut bounds = BytesStart::new("dc:Bounds");
        bounds.push_attribute(("x", node.x.to_string().as_str()));
        bounds.push_attribute(("y", node.y.to_string().as_str()));
        bounds.push_attribute(("width", SHAPE_WIDTH.to_string().as_str()));
        bounds.push_attribute(("height", SHAPE_HEIGHT.to_string().as_str()));
        out.event(Event::Empty(bounds))?;
        out.close("bpmndi:BPMNShape")?;
    }

    for flow in &definition.flows {
        // Waypoints need both endpoints; dangling flows get no edge shape.
        let (Some(from), Some(to)) = (definition.node(&flow.from), definition.node(&flow.to))
        else {
            continue;
        };
        let mut edge = BytesStart::new("bpmndi:BPMNEdge");
        edge.push_attribute(("id", format!("{}_di", flow.id).as_str()));
        edge.push_attribute(("bpmnElement", flow.id.as_str()));
        out.event(Event::Start(edge))?;
        for (x, y) in [centre(from), centre(to)] {
            let mut waypoint = BytesStart::new("di:waypoint");
            waypoint.push_attribute(("x", x.to_string().as_str()));
            waypoint.push_attribute(("y", y.to_string().as_str()));
            out.event(Event::Empty(waypoint))?;
        }
        out.close("bpmndi:BPMNEdge")?;
    }

    out.close("bpmndi:BPMNPlane")?;
    out.close("bpmndi:BPMNDiagram")?;
    out.close("bpmn:definitions")?;
    out.finish()
}

fn node_element(node: &ProcessNode) -> BytesStart<'static> {
    let mut element = BytesStart::new(element_name(node.node_type()));
    element.push_attribute(("id", node.id.as_str()));
    element.push_attribute(("name", node.name.as_str()));
    match &node.props {
        NodeProps::UserTask(props) => {
            if let Some(assignee) = node.props.assignee() {
                element.push_attribute(("assignee", assignee));
            }
            if let Some(form_key) = props.form_key.as_deref() {
                element.push_attribute(("formKey", form_key));
            }
        }
        NodeProps::ServiceTask(props) => {
            if let Some(endpoint) = node.props.endpoint() {
                element.push_attribute(("endpoint", endpoint));
                element.push_attribute(("method", props.method.as_str()));
            }
        }
        _ => {}
    }
    element
}

fn centre(node: &ProcessNode) -> (f64, f64) {
    (node.x + SHAPE_WIDTH / 2.0, node.y + SHAPE_HEIGHT / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{GatewayKind, GatewayProps, ProcessFlow};

    #[test]
    fn gateways_map_to_exclusive_and_edges_get_waypoints() {
        let definition = ProcessDefinition::new(
            vec![
                ProcessNode::new("g", NodeType::Gateway, "Split").with_props(NodeProps::Gateway(
                    GatewayProps {
                        kind: GatewayKind::Parallel,
                        ..Default::default()
                    },
                )),
                ProcessNode::new("e", NodeType::End, "Done").at(200.0, 0.0),
            ],
            vec![ProcessFlow::new("f", "g", "e").with_condition("ok")],
        );
        let xml = export(&definition, None, false).expect("export");
        assert!(xml.contains(r#"<bpmn:exclusiveGateway id="g" name="Split"/>"#));
        assert!(xml.contains(r#"<bpmn:process id="Process_1" isExecutable="true">"#));
        assert!(xml.contains("<bpmn:conditionExpression xsi:type=\"bpmn:tFormalExpression\">ok</bpmn:conditionExpression>"));
        assert!(xml.contains(r#"<di:waypoint x="50" y="40"/><di:waypoint x="250" y="40"/>"#));
    }
}
