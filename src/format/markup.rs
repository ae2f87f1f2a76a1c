//! Structured XML form.
//!
//! ```xml
//! <process version="1.0">
//!   <metadata><key>..</key><name>..</name><version>1</version><status>draft</status></metadata>
//!   <nodes>
//!     <node id="start" type="start" name="Start">
//!       <position x="100" y="200"/>
//!       <properties>{"assignee":"alice"}</properties>
//!     </node>
//!   </nodes>
//!   <flows>
//!     <flow id="f1" from="start" to="end"><condition>approved</condition></flow>
//!   </flows>
//! </process>
//! ```
//!
//! Node properties travel as a JSON object in element text so arbitrary extra
//! attributes survive the round trip.

use super::Parsed;
use super::native::FORMAT_VERSION;
use crate::error::{ExportError, ImportError};
use crate::process::node::NodeRecord;
use crate::process::{ProcessDefinition, ProcessFlow, ProcessMetadata, ProcessNode, ProcessStatus};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::Value;

pub(crate) fn export(
    definition: &ProcessDefinition,
    metadata: Option<&ProcessMetadata>,
    pretty: bool,
) -> Result<String, ExportError> {
    let mut out = XmlWriter::new(pretty);
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("process");
    root.push_attribute(("version", FORMAT_VERSION));
    out.event(Event::Start(root))?;

    if let Some(metadata) = metadata {
        out.open("metadata")?;
        out.text_element("key", &metadata.key)?;
        out.text_element("name", &metadata.name)?;
        out.text_element("version", &metadata.version.to_string())?;
        out.text_element("status", metadata.status.as_str())?;
        if let Some(description) = &metadata.description {
            out.text_element("description", description)?;
        }
        if let Some(category) = &metadata.category {
            out.text_element("category", category)?;
        }
        if let Some(created_by) = metadata.created_by {
            out.text_element("createdBy", &created_by.to_string())?;
        }
        if let Some(created_at) = metadata.created_at {
            out.text_element("createdAt", &created_at.to_rfc3339())?;
        }
        if let Some(updated_at) = metadata.updated_at {
            out.text_element("updatedAt", &updated_at.to_rfc3339())?;
        }
        out.close("metadata")?;
    }

    out.open("nodes")?;
    for node in &definition.nodes {
        let mut element = BytesStart::new("node");
        element.push_attribute(("id", node.id.as_str()));
        element.push_attribute(("type", node.node_type().as_str()));
        element.push_attribute(("name", node.name.as_str()));
        out.event(Event::Start(element))?;

        let mut position = BytesStart::new("position");
        position.push_attribute(("x", node.x.to_string().as_str()));
        position.push_attribute(("y", node.y.to_string().as_str()));
        out.event(Event::Empty(position))?;

        let properties = Value::Object(node.props.to_attributes()).to_string();
        out.text_element("properties", &properties)?;
        out.close("node")?;
    }
    out.close("nodes")?;

    out.open("flows")?;
    for flow in &definition.flows {
        let mut element = BytesStart::new("flow");
        element.push_attribute(("id", flow.id.as_str()));
        element.push_attribute(("from", flow.from.as_str()));
        element.push_attribute(("to", flow.to.as_str()));
        if flow.condition.is_none() && flow.label.is_none() {
            out.event(Event::Empty(element))?;
            continue;
        }
        out.event(Event::Start(element))?;
        if let Some(condition) = &flow.condition {
            out.text_element("condition", condition)?;
        }
        if let Some(label) = &flow.label {
            out.text_element("label", label)?;
        }
        out.close("flow")?;
    }
    out.close("flows")?;

    out.close("process")?;
    out.finish()
}

pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub(crate) fn new(pretty: bool) -> Self {
        let writer = if pretty {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };
        Self { writer }
    }

    pub(crate) fn event(&mut self, event: Event<'_>) -> Result<(), ExportError> {
        self.writer
            .write_event(event)
            .map_err(|e| ExportError::Markup(e.to_string()))
    }

    pub(crate) fn open(&mut self, name: &str) -> Result<(), ExportError> {
        self.event(Event::Start(BytesStart::new(name)))
    }

    pub(crate) fn close(&mut self, name: &str) -> Result<(), ExportError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn text_element(&mut self, name: &str, text: &str) -> Result<(), ExportError> {
        self.open(name)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    pub(crate) fn finish(self) -> Result<String, ExportError> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| ExportError::Markup(e.to_string()))
    }
}

pub(crate) fn parse(content: &str) -> Result<Parsed, ImportError> {
    // Text is kept as written; only leaf elements read it, and blanks are decided per field.
    let mut reader = Reader::from_str(content);

    let mut state = ParseState::default();
    loop {
        match reader.read_event().map_err(markup_error)? {
            Event::Start(element) => state.open(&element)?,
            Event::Empty(element) => {
                state.open(&element)?;
                state.close()?;
            }
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(text.as_ref());
                let decoded = unescape(&raw).map_err(markup_error)?;
                state.text.push_str(&decoded);
            }
            Event::CData(data) => {
                state.text.push_str(&String::from_utf8_lossy(&data));
            }
            Event::End(_) => state.close()?,
            Event::Eof => break,
            _ => {}
        }
    }
    state.finish()
}

fn markup_error(err: impl std::fmt::Display) -> ImportError {
    ImportError::InvalidMarkup(err.to_string())
}

#[derive(Default)]
struct ParseState {
    path: Vec<String>,
    text: String,
    saw_root: bool,
    metadata: Option<AHashMap<String, String>>,
    nodes: Option<Vec<ProcessNode>>,
    flows: Option<Vec<ProcessFlow>>,
    node: Option<(usize, NodeRecord)>,
    flow: Option<ProcessFlow>,
    warnings: Vec<String>,
}

impl ParseState {
    fn parent(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    fn open(&mut self, element: &BytesStart<'_>) -> Result<(), ImportError> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.text.clear();
        let parent = self.parent().map(str::to_owned);

        match (parent.as_deref(), name.as_str()) {
            (None, "process") => self.saw_root = true,
            (Some("process"), "metadata") => self.metadata = Some(AHashMap::new()),
            (Some("process"), "nodes") => self.nodes = Some(Vec::new()),
            (Some("process"), "flows") => self.flows = Some(Vec::new()),
            (Some("nodes"), "node") => {
                let mut attrs = attributes(element)?;
                let index = self.nodes.as_ref().map_or(0, Vec::len);
                let record = NodeRecord {
                    id: attrs.remove("id").unwrap_or_default(),
                    node_type: attrs.remove("type").unwrap_or_default(),
                    name: attrs.remove("name").unwrap_or_default(),
                    x: 0.0,
                    y: 0.0,
                    props: Default::default(),
                };
                self.node = Some((index, record));
            }
            (Some("node"), "position") => {
                let attrs = attributes(element)?;
                if let Some((index, record)) = self.node.as_mut() {
                    record.x = coordinate(&attrs, "x", *index)?;
                    record.y = coordinate(&attrs, "y", *index)?;
                }
            }
            (Some("flows"), "flow") => {
                let mut attrs = attributes(element)?;
                self.flow = Some(ProcessFlow::new(
                    attrs.remove("id").unwrap_or_default(),
                    attrs.remove("from").unwrap_or_default(),
                    attrs.remove("to").unwrap_or_default(),
                ));
            }
            (None, other) => {
                return Err(markup_error(format!(
                    "expected <process> root element, found <{}>",
                    other
                )));
            }
            _ => {}
        }

        self.path.push(name);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ImportError> {
        let Some(name) = self.path.pop() else {
            return Ok(());
        };
        let text = std::mem::take(&mut self.text);
        let parent = self.parent().map(str::to_owned);

        match (parent.as_deref(), name.as_str()) {
            (Some("metadata"), field) => {
                if let Some(fields) = self.metadata.as_mut() {
                    fields.insert(field.to_string(), text);
                }
            }
            (Some("node"), "properties") => {
                if let Some((index, record)) = self.node.as_mut() {
                    record.props = properties(&text, *index)?;
                }
            }
            (Some("nodes"), "node") => {
                if let Some((_, record)) = self.node.take() {
                    let node = ProcessNode::try_from(record)?;
                    self.nodes.get_or_insert_with(Vec::new).push(node);
                }
            }
            (Some("flow"), "condition") => {
                if let Some(flow) = self.flow.as_mut() {
                    flow.condition = non_blank(text);
                }
            }
            (Some("flow"), "label") => {
                if let Some(flow) = self.flow.as_mut() {
                    flow.label = non_blank(text);
                }
            }
            (Some("flows"), "flow") => {
                if let Some(flow) = self.flow.take() {
                    self.flows.get_or_insert_with(Vec::new).push(flow);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Parsed, ImportError> {
        if !self.saw_root {
            return Err(markup_error("missing <process> root element"));
        }
        let nodes = self.nodes.take().ok_or(ImportError::MissingArray("nodes"))?;
        let flows = self.flows.take().ok_or(ImportError::MissingArray("flows"))?;
        let metadata = self
            .metadata
            .take()
            .and_then(|fields| read_metadata(fields, &mut self.warnings));

        Ok(Parsed {
            definition: ProcessDefinition::new(nodes, flows),
            metadata,
            warnings: self.warnings,
        })
    }
}

fn attributes(element: &BytesStart<'_>) -> Result<AHashMap<String, String>, ImportError> {
    let mut map = AHashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(markup_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw).map_err(markup_error)?.into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn coordinate(attrs: &AHashMap<String, String>, key: &str, index: usize) -> Result<f64, ImportError> {
    match attrs.get(key) {
        None => Ok(0.0),
        Some(raw) => raw.trim().parse().map_err(|_| ImportError::MalformedEntry {
            kind: "node",
            index,
            message: format!("position {} is not a number: '{}'", key, raw),
        }),
    }
}

fn properties(text: &str, index: usize) -> Result<serde_json::Map<String, Value>, ImportError> {
    if text.trim().is_empty() {
        return Ok(Default::default());
    }
    match serde_json::from_str(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ImportError::MalformedEntry {
            kind: "node",
            index,
            message: "properties must be a JSON object".to_string(),
        }),
        Err(e) => Err(ImportError::MalformedEntry {
            kind: "node",
            index,
            message: format!("properties are not valid JSON: {}", e),
        }),
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

fn read_metadata(mut fields: AHashMap<String, String>, warnings: &mut Vec<String>) -> Option<ProcessMetadata> {
    let (Some(key), Some(name)) = (fields.remove("key"), fields.remove("name")) else {
        warnings.push("Ignored metadata without key and name".to_string());
        return None;
    };
    let mut metadata = ProcessMetadata::new(key, name);

    if let Some(raw) = fields.remove("version") {
        match raw.trim().parse() {
            Ok(version) => metadata.version = version,
            Err(_) => warnings.push(format!("Ignored metadata version '{}'", raw)),
        }
    }
    if let Some(raw) = fields.remove("status") {
        match raw.trim() {
            "draft" => metadata.status = ProcessStatus::Draft,
            "published" => metadata.status = ProcessStatus::Published,
            "archived" => metadata.status = ProcessStatus::Archived,
            other => warnings.push(format!("Ignored metadata status '{}'", other)),
        }
    }
    metadata.description = fields.remove("description").and_then(non_blank);
    metadata.category = fields.remove("category").and_then(non_blank);
    metadata.created_by = fields.remove("createdBy").and_then(|raw| raw.trim().parse().ok());
    metadata.created_at = fields.remove("createdAt").and_then(|raw| timestamp(&raw));
    metadata.updated_at = fields.remove("updatedAt").and_then(|raw| timestamp(&raw));
    Some(metadata)
}

fn timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::NodeType;

    #[test]
    fn special_characters_survive() {
        let definition = ProcessDefinition::new(
            vec![ProcessNode::new("a", NodeType::UserTask, "Review <draft> & \"sign\"")],
            vec![ProcessFlow::new("f", "a", "a").with_condition("amount < 100 && ok")],
        );
        let xml = export(&definition, None, true).expect("export");
        let parsed = parse(&xml).expect("parse");
        assert_eq!(parsed.definition, definition);
    }

    #[test]
    fn missing_flows_section_is_structural() {
        let err = parse("<process><nodes/></process>").err();
        assert_eq!(err, Some(ImportError::MissingArray("flows")));
    }

    #[test]
    fn wrong_root_is_rejected() {
        assert!(matches!(
            parse("<graph/>").err(),
            Some(ImportError::InvalidMarkup(_))
        ));
    }
}
