//! Tests for successor and locator lookups.
mod common;
use common::*;
use testloom::prelude::*;
use testloom::traversal::Traversal;

fn step(id: &str) -> Node {
    Node::new(id, NodeKind::Delay)
}

#[test]
fn test_next_flow_follows_flow_edges_only() {
    let graph = Graph {
        nodes: vec![step("a"), step("b"), element_by_id("el", "x")],
        edges: vec![Edge::data("d", "el", "a"), Edge::flow("f", "a", "b")],
    };
    let traversal = Traversal::new(&graph);
    let a = graph.node("a").expect("a");
    let el = graph.node("el").expect("el");

    assert_eq!(traversal.next_flow(a).map(|n| n.id.as_str()), Some("b"));
    // A locator edge out of an element descriptor is not a flow edge.
    assert!(traversal.next_flow(el).is_none());
    assert!(traversal.next_flow(graph.node("b").expect("b")).is_none());
}

#[test]
fn test_first_matching_edge_wins() {
    let graph = Graph {
        nodes: vec![step("a"), step("b"), step("c")],
        edges: vec![Edge::flow("f1", "a", "c"), Edge::flow("f2", "a", "b")],
    };
    let traversal = Traversal::new(&graph);
    let a = graph.node("a").expect("a");
    assert_eq!(traversal.next_flow(a).map(|n| n.id.as_str()), Some("c"));
}

#[test]
fn test_dangling_edges_are_skipped() {
    let graph = Graph {
        nodes: vec![step("a"), step("b")],
        edges: vec![Edge::flow("f1", "a", "ghost"), Edge::flow("f2", "a", "b")],
    };
    let traversal = Traversal::new(&graph);
    let a = graph.node("a").expect("a");
    assert_eq!(traversal.next_flow(a).map(|n| n.id.as_str()), Some("b"));
}

#[test]
fn test_branch_targets_by_role() {
    let graph = Graph {
        nodes: vec![
            Node::new("if", NodeKind::Branch),
            step("yes"),
            step("no"),
            Node::new("loop", NodeKind::Repeat),
            step("body"),
            step("done"),
        ],
        edges: vec![
            Edge::role("t", "if", SourceRole::True, "yes"),
            Edge::role("f", "if", SourceRole::False, "no"),
            Edge::role("rb", "loop", SourceRole::RepeatBody, "body"),
            Edge::role("rd", "loop", SourceRole::RepeatDone, "done"),
        ],
    };
    let traversal = Traversal::new(&graph);
    let branch = graph.node("if").expect("if");
    let repeat = graph.node("loop").expect("loop");

    let target = |node: &Node, role| traversal.branch_target(node, role).map(|n| n.id.clone());
    assert_eq!(target(branch, SourceRole::True).as_deref(), Some("yes"));
    assert_eq!(target(branch, SourceRole::False).as_deref(), Some("no"));
    assert_eq!(target(branch, SourceRole::Flow), None);
    assert_eq!(target(repeat, SourceRole::RepeatBody).as_deref(), Some("body"));
    assert_eq!(target(repeat, SourceRole::RepeatDone).as_deref(), Some("done"));
}

#[test]
fn test_data_source_takes_first_element() {
    let graph = Graph {
        nodes: vec![
            step("consumer"),
            step("not-an-element"),
            element_by_id("first", "one"),
            element_by_id("second", "two"),
        ],
        edges: vec![
            Edge::data("d0", "missing", "consumer"),
            Edge::data("d1", "not-an-element", "consumer"),
            Edge::data("d2", "first", "consumer"),
            Edge::data("d3", "second", "consumer"),
        ],
    };
    let traversal = Traversal::new(&graph);
    let consumer = graph.node("consumer").expect("consumer");
    assert_eq!(
        traversal.data_source(consumer).map(|n| n.id.as_str()),
        Some("first")
    );
}

#[test]
fn test_data_source_ignores_flow_edges() {
    let graph = Graph {
        nodes: vec![step("consumer"), element_by_id("el", "x")],
        edges: vec![Edge::flow("f", "el", "consumer")],
    };
    let traversal = Traversal::new(&graph);
    assert!(traversal
        .data_source(graph.node("consumer").expect("consumer"))
        .is_none());
}
