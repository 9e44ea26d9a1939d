use serde::Deserialize;

/// Canvas position of a node. Carried through for completeness, never compiled.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct EditorPosition {
    pub x: f64,
    pub y: f64,
}

/// A block on the editor canvas.
#[derive(Debug, Deserialize, Clone)]
pub struct EditorNode {
    pub id: String,
    /// Block type such as `start_session` or `interact`.
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub position: Option<EditorPosition>,
}

/// A wire between two block handles.
#[derive(Debug, Deserialize, Clone)]
pub struct EditorEdge {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default)]
    #[serde(alias = "sourceHandle")]
    pub source_handle: Option<String>,
    #[serde(default)]
    #[serde(alias = "targetHandle")]
    pub target_handle: Option<String>,
}

/// A complete editor export. Extra top-level keys (`meta`, `viewport`, ...) are ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct EditorFlow {
    pub nodes: Vec<EditorNode>,
    #[serde(default)]
    pub edges: Vec<EditorEdge>,
}
