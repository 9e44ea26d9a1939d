//! Import of the visual editor's export format.
//!
//! The editor names blocks by type (`start_session`, `loop`, ...) and connections by
//! handle (`true-out`, `data-in`, ...). [`EditorFlow`] maps both onto the canonical
//! [`Graph`] through [`IntoGraph`].

mod types;

pub use types::*;

use crate::error::GraphError;
use crate::graph::{Edge, Graph, IntoGraph, Node, NodeKind, SourceRole, TargetRole};
use ahash::AHashSet;

impl EditorFlow {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl IntoGraph for EditorFlow {
    fn into_graph(self) -> Result<Graph, GraphError> {
        let mut seen = AHashSet::with_capacity(self.nodes.len());
        let mut nodes = Vec::with_capacity(self.nodes.len());

        for node in self.nodes {
            if !seen.insert(node.id.clone()) {
                return Err(GraphError::ValidationError(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
            let kind = node_kind(&node.node_type).ok_or_else(|| GraphError::UnknownNodeType {
                node_id: node.id.clone(),
                type_name: node.node_type.clone(),
            })?;
            nodes.push(Node {
                id: node.id,
                kind,
                data: node.data,
            });
        }

        let edges = self
            .edges
            .into_iter()
            .enumerate()
            .map(|(i, edge)| Edge {
                id: edge.id.unwrap_or_else(|| format!("edge-{}", i)),
                source_role: Some(source_role(edge.source_handle.as_deref())),
                target_role: Some(target_role(edge.target_handle.as_deref())),
                source_node_id: edge.source,
                target_node_id: edge.target,
            })
            .collect();

        Ok(Graph { nodes, edges })
    }
}

/// The step kind for an editor block type.
pub fn node_kind(type_name: &str) -> Option<NodeKind> {
    let kind = match type_name {
        "start_session" => NodeKind::EntryPoint,
        "element" => NodeKind::ElementDescriptor,
        "interact" => NodeKind::Interact,
        "assert" => NodeKind::Assert,
        "condition" => NodeKind::Branch,
        "loop" => NodeKind::Repeat,
        "wait" => NodeKind::Delay,
        "screenshot" => NodeKind::Capture,
        "set_variable" => NodeKind::SetVariable,
        "network" => NodeKind::NetworkRule,
        "load_fixture" => NodeKind::LoadFixture,
        "custom_command" => NodeKind::CustomCall,
        _ => return None,
    };
    Some(kind)
}

fn source_role(handle: Option<&str>) -> SourceRole {
    match handle {
        Some("true-out") => SourceRole::True,
        Some("false-out") => SourceRole::False,
        Some("loop-body") => SourceRole::RepeatBody,
        Some("loop-done") => SourceRole::RepeatDone,
        _ => SourceRole::Flow,
    }
}

fn target_role(handle: Option<&str>) -> TargetRole {
    match handle {
        Some("data-in") => TargetRole::DataIn,
        _ => TargetRole::Flow,
    }
}
