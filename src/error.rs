use thiserror::Error;

/// Errors that abort a compilation.
///
/// Per-node problems never end up here: a partially wired graph still compiles, with the
/// degraded steps reported as [`Diagnostic`](crate::compiler::Diagnostic)s instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("No entry point found: the graph needs at least one EntryPoint step to start a test case")]
    NoEntryPoint,

    #[error("Unknown backend '{0}', expected one of: selenium, cypress")]
    UnknownBackend(String),
}

/// Errors that can occur while reading a graph or converting a custom format into a [`Graph`](crate::graph::Graph).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Failed to parse graph JSON: {0}")]
    JsonParseError(String),

    #[error("Node '{node_id}' has an unregistered step type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Invalid graph data: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::JsonParseError(err.to_string())
    }
}
