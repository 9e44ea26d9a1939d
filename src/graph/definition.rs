use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The complete step graph of one editor document, ready for compilation.
///
/// The compiler treats a `Graph` as an immutable snapshot: it is only ever borrowed
/// during a compilation and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Parses a graph from its canonical JSON shape.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// All entry points, in node-list order. Each one roots an independent test case.
    pub fn entry_points(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::EntryPoint)
    }
}

/// A single step in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// Kind-specific fields. Each kind reads only its own keys, see [`Step`](super::Step).
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            data: serde_json::Map::new(),
        }
    }

    /// Sets a field, builder style.
    pub fn with(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// The closed set of step kinds the compiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    EntryPoint,
    ElementDescriptor,
    Interact,
    Assert,
    Branch,
    Repeat,
    Delay,
    Capture,
    SetVariable,
    NetworkRule,
    LoadFixture,
    CustomCall,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A connection between two steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    /// `None` means [`SourceRole::Flow`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_role: Option<SourceRole>,
    /// `None` means [`TargetRole::Flow`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role: Option<TargetRole>,
}

impl Edge {
    /// A plain flow edge.
    pub fn flow(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_node_id: source.into(),
            target_node_id: target.into(),
            source_role: None,
            target_role: None,
        }
    }

    /// A flow-carrying edge leaving the source through a named role (`true`, `repeatBody`, ...).
    pub fn role(
        id: impl Into<String>,
        source: impl Into<String>,
        role: SourceRole,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source_role: Some(role),
            ..Self::flow(id, source, target)
        }
    }

    /// A locator-supplying edge from an element descriptor into a consumer step.
    pub fn data(id: impl Into<String>, element: impl Into<String>, consumer: impl Into<String>) -> Self {
        Self {
            target_role: Some(TargetRole::DataIn),
            ..Self::flow(id, element, consumer)
        }
    }

    pub fn source_role(&self) -> SourceRole {
        self.source_role.unwrap_or_default()
    }

    pub fn target_role(&self) -> TargetRole {
        self.target_role.unwrap_or_default()
    }
}

/// Connection point an edge leaves its source from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceRole {
    #[default]
    Flow,
    True,
    False,
    RepeatBody,
    RepeatDone,
}

/// Connection point an edge enters its target through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetRole {
    #[default]
    Flow,
    DataIn,
}
