//! "What comes next" lookups over an immutable graph snapshot.
//!
//! All lookups scan the edge list in order and return the first edge that matches and
//! whose far end resolves to a node. Edges pointing at unknown node ids are skipped. When
//! several edges share a source and role (or several `dataIn` edges enter one consumer),
//! the one listed first in `Graph::edges` wins.

use crate::graph::{Edge, Graph, Node, NodeKind, SourceRole, TargetRole};
use ahash::AHashMap;

pub struct Traversal<'g> {
    graph: &'g Graph,
    nodes: AHashMap<&'g str, &'g Node>,
}

impl<'g> Traversal<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let mut nodes = AHashMap::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            // First definition of a duplicated id wins, same as the edge policy.
            nodes.entry(node.id.as_str()).or_insert(node);
        }
        Self { graph, nodes }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn node(&self, id: &str) -> Option<&'g Node> {
        self.nodes.get(id).copied()
    }

    /// The successor along `node`'s outgoing flow edge.
    pub fn next_flow(&self, node: &Node) -> Option<&'g Node> {
        self.branch_target(node, SourceRole::Flow)
    }

    /// The node at the far end of the outgoing edge tagged with `role`.
    ///
    /// Locator edges (target role `dataIn`) never carry control flow and are ignored.
    pub fn branch_target(&self, node: &Node, role: SourceRole) -> Option<&'g Node> {
        self.outgoing(node)
            .filter(|e| e.source_role() == role && e.target_role() == TargetRole::Flow)
            .find_map(|e| self.node(&e.target_node_id))
    }

    /// The element descriptor wired into `node` through an incoming `dataIn` edge.
    pub fn data_source(&self, node: &Node) -> Option<&'g Node> {
        self.graph
            .edges
            .iter()
            .filter(|e| e.target_node_id == node.id && e.target_role() == TargetRole::DataIn)
            .filter_map(|e| self.node(&e.source_node_id))
            .find(|source| source.kind == NodeKind::ElementDescriptor)
    }

    fn outgoing<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'g Edge> + 'a {
        self.graph
            .edges
            .iter()
            .filter(move |e| e.source_node_id == node.id)
    }
}
