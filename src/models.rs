#![allow(dead_code)]

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Object type reported by pw-dump for graph nodes
pub const NODE_KIND: &str = "PipeWire:Interface:Node";

/// Property holding a node's name
pub const NODE_NAME_PROP: &str = "node.name";

/// Identifier of a node, valid only within the snapshot it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// String form of a raw JSON id (numbers in decimal, strings verbatim)
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self(s.clone()),
            other => Self(other.to_string()),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Node ids sharing one name, in snapshot order
pub type NamedNodeSet = Vec<NodeId>;

/// The `info` block of a graph object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectInfo {
    #[serde(default)]
    pub props: Option<Map<String, Value>>,
}

/// One entry of a pw-dump array (node, port, link, client...)
#[derive(Debug, Clone, Deserialize)]
pub struct GraphObject {
    #[serde(default)]
    pub id: Value,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub info: Option<ObjectInfo>,
}

impl GraphObject {
    pub fn is_node(&self) -> bool {
        self.kind == NODE_KIND
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::from_value(&self.id)
    }

    /// `info.props["node.name"]`, empty when any level is missing
    pub fn name(&self) -> &str {
        self.info
            .as_ref()
            .and_then(|info| info.props.as_ref())
            .and_then(|props| props.get(NODE_NAME_PROP))
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

/// The graph as reported at one instant
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub objects: Vec<GraphObject>,
}

impl Snapshot {
    pub fn new(objects: Vec<GraphObject>) -> Self {
        Self { objects }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Ids of node objects whose name equals `name`
    pub fn nodes_named(&self, name: &str) -> NamedNodeSet {
        self.objects
            .iter()
            .filter(|obj| obj.is_node() && obj.name() == name)
            .map(GraphObject::node_id)
            .collect()
    }
}
