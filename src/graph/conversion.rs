use super::definition::Graph;
use crate::error::GraphError;

/// A trait for custom document formats that can be converted into a testloom [`Graph`].
///
/// This is the extension point that keeps the compiler format-agnostic: the visual
/// editor's export format is supported through [`EditorFlow`](crate::editor::EditorFlow),
/// and any other tool producing step graphs can implement this trait on its own structs.
///
/// # Example
///
/// ```rust,no_run
/// use testloom::error::GraphError;
/// use testloom::graph::{Edge, Graph, IntoGraph, Node, NodeKind};
///
/// struct Recording {
///     url: String,
///     clicks: Vec<String>,
/// }
///
/// impl IntoGraph for Recording {
///     fn into_graph(self) -> Result<Graph, GraphError> {
///         let mut graph = Graph::default();
///         graph.nodes.push(Node::new("start", NodeKind::EntryPoint).with("url", self.url));
///         let mut previous = "start".to_string();
///         for (i, id) in self.clicks.into_iter().enumerate() {
///             let step = format!("click-{i}");
///             let element = format!("element-{i}");
///             graph.nodes.push(Node::new(&element, NodeKind::ElementDescriptor).with("selectorValue", id));
///             graph.nodes.push(Node::new(&step, NodeKind::Interact));
///             graph.edges.push(Edge::data(format!("d{i}"), &element, &step));
///             graph.edges.push(Edge::flow(format!("f{i}"), &previous, &step));
///             previous = step;
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a compilable step graph.
    fn into_graph(self) -> Result<Graph, GraphError>;
}

impl IntoGraph for Graph {
    fn into_graph(self) -> Result<Graph, GraphError> {
        Ok(self)
    }
}
