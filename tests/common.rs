//! Common test utilities for building step graphs.
use testloom::prelude::*;

/// An EntryPoint opening `url` in Chrome.
#[allow(dead_code)]
pub fn entry(id: &str, name: &str, url: &str) -> Node {
    Node::new(id, NodeKind::EntryPoint)
        .with("testName", name)
        .with("browser", "Chrome")
        .with("url", url)
}

/// An ElementDescriptor located by id.
#[allow(dead_code)]
pub fn element_by_id(id: &str, value: &str) -> Node {
    Node::new(id, NodeKind::ElementDescriptor)
        .with("name", id)
        .with("selectorType", "ID")
        .with("selectorValue", value)
}

#[allow(dead_code)]
pub fn element(id: &str, selector_type: &str, value: &str) -> Node {
    Node::new(id, NodeKind::ElementDescriptor)
        .with("name", id)
        .with("selectorType", selector_type)
        .with("selectorValue", value)
}

/// Chains `ids` with plain flow edges, in order.
#[allow(dead_code)]
pub fn chain(ids: &[&str]) -> Vec<Edge> {
    ids.windows(2)
        .enumerate()
        .map(|(i, pair)| Edge::flow(format!("f{}", i), pair[0], pair[1]))
        .collect()
}

/// Opens a page, then clicks the element with id `go`.
///
/// start -> click, with `go` wired into the click.
#[allow(dead_code)]
pub fn create_click_flow() -> Graph {
    Graph {
        nodes: vec![
            entry("start", "Click Go", "https://example.com/x"),
            element_by_id("go", "go"),
            Node::new("click", NodeKind::Interact).with("action", "Click"),
        ],
        edges: vec![
            Edge::flow("e1", "start", "click"),
            Edge::data("e2", "go", "click"),
        ],
    }
}

/// A visibility branch whose only wired arm asserts on the same element.
#[allow(dead_code)]
pub fn create_branch_flow() -> Graph {
    Graph {
        nodes: vec![
            entry("start", "Banner", "https://example.com"),
            element_by_id("banner", "banner"),
            Node::new("if-banner", NodeKind::Branch).with("condition", "Is Visible"),
            Node::new("check", NodeKind::Assert)
                .with("condition", "Contains Text")
                .with("value", "Welcome"),
        ],
        edges: vec![
            Edge::flow("e1", "start", "if-banner"),
            Edge::data("e2", "banner", "if-banner"),
            Edge::role("e3", "if-banner", SourceRole::True, "check"),
            Edge::data("e4", "banner", "check"),
        ],
    }
}

/// Three screenshots in a counted loop, then a delay after it.
#[allow(dead_code)]
pub fn create_loop_flow() -> Graph {
    Graph {
        nodes: vec![
            entry("start", "Gallery", "https://example.com"),
            Node::new("loop", NodeKind::Repeat)
                .with("loopType", "Counter")
                .with("count", "3"),
            Node::new("shot", NodeKind::Capture)
                .with("directory", "./shots")
                .with("filename", "page"),
            Node::new("pause", NodeKind::Delay).with("duration", "2"),
        ],
        edges: vec![
            Edge::flow("e1", "start", "loop"),
            Edge::role("e2", "loop", SourceRole::RepeatBody, "shot"),
            Edge::role("e3", "loop", SourceRole::RepeatDone, "pause"),
        ],
    }
}

/// `a -> b -> c -> a`, rooted at an entry point.
#[allow(dead_code)]
pub fn create_cyclic_flow() -> Graph {
    Graph {
        nodes: vec![
            entry("start", "Cycle", "https://example.com"),
            Node::new("a", NodeKind::SetVariable)
                .with("varName", "a")
                .with("varValue", "1"),
            Node::new("b", NodeKind::Delay).with("duration", "1"),
            Node::new("c", NodeKind::SetVariable)
                .with("varName", "c")
                .with("varValue", "3"),
        ],
        edges: vec![
            Edge::flow("e0", "start", "a"),
            Edge::flow("e1", "a", "b"),
            Edge::flow("e2", "b", "c"),
            Edge::flow("e3", "c", "a"),
        ],
    }
}

/// Number of non-overlapping occurrences of `needle`.
#[allow(dead_code)]
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// The source line containing `needle`, with its indentation.
#[allow(dead_code)]
pub fn line_with<'a>(source: &'a str, needle: &str) -> &'a str {
    source
        .lines()
        .find(|line| line.contains(needle))
        .unwrap_or_else(|| panic!("no line contains {:?} in:\n{}", needle, source))
}

/// Leading spaces of the line containing `needle`.
#[allow(dead_code)]
pub fn indent_of(source: &str, needle: &str) -> usize {
    let line = line_with(source, needle);
    line.len() - line.trim_start().len()
}

#[allow(dead_code)]
pub fn compile(graph: Graph, backend: BackendChoice) -> CompiledSuite {
    Compiler::builder(graph)
        .backend(backend)
        .build()
        .compile()
        .expect("Failed to compile")
}

/// `start` followed by `steps` in order, with `elements` wired in by `(element, consumer)` pairs.
#[allow(dead_code)]
pub fn with_entry(steps: Vec<Node>, elements: Vec<Node>, data: &[(&str, &str)]) -> Graph {
    let mut ids = vec!["start".to_string()];
    ids.extend(steps.iter().map(|n| n.id.clone()));
    let order: Vec<&str> = ids.iter().map(String::as_str).collect();
    let mut edges = chain(&order);
    for (i, (el, consumer)) in data.iter().enumerate() {
        edges.push(Edge::data(format!("d{}", i), *el, *consumer));
    }

    let mut nodes = vec![entry("start", "Flow", "https://example.com")];
    nodes.extend(steps);
    nodes.extend(elements);
    Graph { nodes, edges }
}
