use crate::error::ImportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Open attribute bag used for unknown, forward-compatible keys.
pub type Attributes = Map<String, Value>;

/// The closed set of node kinds a process graph may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Start,
    End,
    UserTask,
    ServiceTask,
    Gateway,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Start,
        NodeType::End,
        NodeType::UserTask,
        NodeType::ServiceTask,
        NodeType::Gateway,
    ];

    /// The wire name of this type, as it appears in `"type"` fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::UserTask => "userTask",
            NodeType::ServiceTask => "serviceTask",
            NodeType::Gateway => "gateway",
        }
    }

    /// Display label given to freshly created nodes of this type.
    pub fn default_name(&self) -> &'static str {
        match self {
            NodeType::Start => "Start",
            NodeType::End => "End",
            NodeType::UserTask => "User Task",
            NodeType::ServiceTask => "Service Task",
            NodeType::Gateway => "Gateway",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// HTTP verb used by a service task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ]
        .into_iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }
}

/// Routing semantics of a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GatewayKind {
    #[default]
    Exclusive,
    Parallel,
    Inclusive,
}

impl GatewayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayKind::Exclusive => "exclusive",
            GatewayKind::Parallel => "parallel",
            GatewayKind::Inclusive => "inclusive",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "exclusive" => Some(GatewayKind::Exclusive),
            "parallel" => Some(GatewayKind::Parallel),
            "inclusive" => Some(GatewayKind::Inclusive),
            _ => None,
        }
    }
}

/// Attributes of start and end events. Only unknown keys are kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventProps {
    pub extra: Attributes,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserTaskProps {
    pub assignee: Option<String>,
    pub form_key: Option<String>,
    pub priority: Option<i64>,
    pub required: Option<bool>,
    pub extra: Attributes,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceTaskProps {
    pub endpoint: Option<String>,
    pub method: HttpMethod,
    /// Timeout in seconds.
    pub timeout: Option<u64>,
    pub extra: Attributes,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GatewayProps {
    pub kind: GatewayKind,
    pub condition: Option<String>,
    pub extra: Attributes,
}

/// Type-specific node attributes, keyed by the node's type.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeProps {
    Start(EventProps),
    End(EventProps),
    UserTask(UserTaskProps),
    ServiceTask(ServiceTaskProps),
    Gateway(GatewayProps),
}

impl NodeProps {
    /// The minimal valid attribute set for a node of the given type.
    pub fn default_for(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Start => NodeProps::Start(EventProps::default()),
            NodeType::End => NodeProps::End(EventProps::default()),
            NodeType::UserTask => NodeProps::UserTask(UserTaskProps::default()),
            NodeType::ServiceTask => NodeProps::ServiceTask(ServiceTaskProps::default()),
            NodeType::Gateway => NodeProps::Gateway(GatewayProps::default()),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeProps::Start(_) => NodeType::Start,
            NodeProps::End(_) => NodeType::End,
            NodeProps::UserTask(_) => NodeType::UserTask,
            NodeProps::ServiceTask(_) => NodeType::ServiceTask,
            NodeProps::Gateway(_) => NodeType::Gateway,
        }
    }

    /// Builds typed attributes from a loose attribute bag.
    ///
    /// Never fails: known keys carrying a value of the wrong JSON type stay in
    /// `extra` untouched, and missing keys fall back to their defaults.
    pub fn from_attributes(node_type: NodeType, mut bag: Attributes) -> Self {
        match node_type {
            NodeType::Start => NodeProps::Start(EventProps { extra: bag }),
            NodeType::End => NodeProps::End(EventProps { extra: bag }),
            NodeType::UserTask => NodeProps::UserTask(UserTaskProps {
                assignee: take(&mut bag, "assignee", as_string),
                form_key: take(&mut bag, "formKey", as_string),
                priority: take(&mut bag, "priority", Value::as_i64),
                required: take(&mut bag, "required", Value::as_bool),
                extra: bag,
            }),
            NodeType::ServiceTask => NodeProps::ServiceTask(ServiceTaskProps {
                endpoint: take(&mut bag, "endpoint", as_string),
                method: take(&mut bag, "method", |v| v.as_str().and_then(HttpMethod::parse))
                    .unwrap_or_default(),
                timeout: take(&mut bag, "timeout", Value::as_u64),
                extra: bag,
            }),
            NodeType::Gateway => NodeProps::Gateway(GatewayProps {
                kind: take(&mut bag, "gatewayType", |v| {
                    v.as_str().and_then(GatewayKind::parse)
                })
                .unwrap_or_default(),
                condition: take(&mut bag, "condition", as_string),
                extra: bag,
            }),
        }
    }

    /// Flattens typed attributes back into a bag. `extra` is written last and wins on collision.
    pub fn to_attributes(&self) -> Attributes {
        let mut bag = Attributes::new();
        let extra = match self {
            NodeProps::Start(p) | NodeProps::End(p) => &p.extra,
            NodeProps::UserTask(p) => {
                put(&mut bag, "assignee", p.assignee.clone().map(Value::String));
                put(&mut bag, "formKey", p.form_key.clone().map(Value::String));
                put(&mut bag, "priority", p.priority.map(Value::from));
                put(&mut bag, "required", p.required.map(Value::Bool));
                &p.extra
            }
            NodeProps::ServiceTask(p) => {
                put(&mut bag, "endpoint", p.endpoint.clone().map(Value::String));
                put(&mut bag, "method", Some(Value::from(p.method.as_str())));
                put(&mut bag, "timeout", p.timeout.map(Value::from));
                &p.extra
            }
            NodeProps::Gateway(p) => {
                put(&mut bag, "gatewayType", Some(Value::from(p.kind.as_str())));
                put(&mut bag, "condition", p.condition.clone().map(Value::String));
                &p.extra
            }
        };
        for (key, value) in extra {
            bag.insert(key.clone(), value.clone());
        }
        bag
    }

    pub fn extra(&self) -> &Attributes {
        match self {
            NodeProps::Start(p) | NodeProps::End(p) => &p.extra,
            NodeProps::UserTask(p) => &p.extra,
            NodeProps::ServiceTask(p) => &p.extra,
            NodeProps::Gateway(p) => &p.extra,
        }
    }

    /// Assignee of a user task, ignoring blank values.
    pub fn assignee(&self) -> Option<&str> {
        match self {
            NodeProps::UserTask(p) => non_blank(p.assignee.as_deref()),
            _ => None,
        }
    }

    /// Endpoint of a service task, ignoring blank values.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            NodeProps::ServiceTask(p) => non_blank(p.endpoint.as_deref()),
            _ => None,
        }
    }

    /// Branching condition of a gateway, ignoring blank values.
    pub fn condition(&self) -> Option<&str> {
        match self {
            NodeProps::Gateway(p) => non_blank(p.condition.as_deref()),
            _ => None,
        }
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Removes `key` from the bag if `extract` accepts its value; otherwise leaves the bag as is.
fn take<T>(bag: &mut Attributes, key: &str, extract: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let parsed = bag.get(key).and_then(&extract)?;
    bag.remove(key);
    Some(parsed)
}

fn put(bag: &mut Attributes, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        bag.insert(key.to_string(), value);
    }
}

/// A canonical node of a process graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord", into = "NodeRecord")]
pub struct ProcessNode {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub props: NodeProps,
}

impl ProcessNode {
    /// Creates a node with the default attributes for its type.
    pub fn new(id: impl Into<String>, node_type: NodeType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x: 0.0,
            y: 0.0,
            props: NodeProps::default_for(node_type),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_props(mut self, props: NodeProps) -> Self {
        self.props = props;
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.props.node_type()
    }
}

/// The flat wire shape of a node: `{"id","type","name","x","y","props"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NodeRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: Attributes,
}

impl TryFrom<NodeRecord> for ProcessNode {
    type Error = ImportError;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        let node_type =
            NodeType::from_str(&record.node_type).map_err(|type_name| {
                ImportError::UnknownNodeType {
                    node_id: record.id.clone(),
                    type_name,
                }
            })?;
        Ok(Self {
            id: record.id,
            name: record.name,
            x: record.x,
            y: record.y,
            props: NodeProps::from_attributes(node_type, record.props),
        })
    }
}

impl From<ProcessNode> for NodeRecord {
    fn from(node: ProcessNode) -> Self {
        Self {
            node_type: node.node_type().as_str().to_string(),
            props: node.props.to_attributes(),
            id: node.id,
            name: node.name,
            x: node.x,
            y: node.y,
        }
    }
}
