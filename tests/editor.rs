//! Tests for importing the visual editor's export format.
mod common;
use common::*;
use testloom::editor::node_kind;
use testloom::prelude::*;

const EXPORT: &str = r##"{
    "nodes": [
        { "id": "s", "type": "start_session", "position": { "x": 10, "y": 20 },
          "data": { "testName": "Editor Flow", "url": "https://example.com", "framework": "cypress" } },
        { "id": "el", "type": "element", "data": { "selectorType": "ID", "selectorValue": "#go" } },
        { "id": "if", "type": "condition", "data": { "condition": "Is Visible" } },
        { "id": "click", "type": "interact", "data": { "action": "Click" } },
        { "id": "loop", "type": "loop", "data": { "loopType": "Counter", "count": 2 } },
        { "id": "tick", "type": "wait", "data": { "duration": "" } },
        { "id": "end", "type": "custom_command", "data": { "commandName": "finish" } }
    ],
    "edges": [
        { "id": "a", "source": "s", "target": "if", "sourceHandle": "flow-out", "targetHandle": "flow-in" },
        { "source": "el", "target": "if", "targetHandle": "data-in" },
        { "id": "c", "source": "if", "target": "click", "sourceHandle": "true-out" },
        { "id": "d", "source": "el", "target": "click", "sourceHandle": null, "targetHandle": "data-in" },
        { "id": "e", "source": "if", "target": "loop", "sourceHandle": "false-out" },
        { "id": "f", "source": "loop", "target": "tick", "sourceHandle": "loop-body" },
        { "id": "g", "source": "loop", "target": "end", "sourceHandle": "loop-done" }
    ],
    "viewport": { "x": 0, "y": 0, "zoom": 1.5 }
}"##;

fn imported() -> Graph {
    EditorFlow::from_json(EXPORT)
        .and_then(IntoGraph::into_graph)
        .expect("Failed to import editor export")
}

#[test]
fn test_node_types_are_mapped() {
    let graph = imported();
    let kinds: Vec<NodeKind> = graph.nodes.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        [
            NodeKind::EntryPoint,
            NodeKind::ElementDescriptor,
            NodeKind::Branch,
            NodeKind::Interact,
            NodeKind::Repeat,
            NodeKind::Delay,
            NodeKind::CustomCall,
        ]
    );
    assert_eq!(graph.nodes[0].data["testName"], "Editor Flow");
}

#[test]
fn test_handles_are_mapped_to_roles() {
    let graph = imported();
    let roles: Vec<(&str, SourceRole, TargetRole)> = graph
        .edges
        .iter()
        .map(|e| (e.id.as_str(), e.source_role(), e.target_role()))
        .collect();
    assert_eq!(
        roles,
        [
            ("a", SourceRole::Flow, TargetRole::Flow),
            ("edge-1", SourceRole::Flow, TargetRole::DataIn),
            ("c", SourceRole::True, TargetRole::Flow),
            ("d", SourceRole::Flow, TargetRole::DataIn),
            ("e", SourceRole::False, TargetRole::Flow),
            ("f", SourceRole::RepeatBody, TargetRole::Flow),
            ("g", SourceRole::RepeatDone, TargetRole::Flow),
        ]
    );
}

#[test]
fn test_every_block_type() {
    let mapping = [
        ("start_session", NodeKind::EntryPoint),
        ("element", NodeKind::ElementDescriptor),
        ("interact", NodeKind::Interact),
        ("assert", NodeKind::Assert),
        ("condition", NodeKind::Branch),
        ("loop", NodeKind::Repeat),
        ("wait", NodeKind::Delay),
        ("screenshot", NodeKind::Capture),
        ("set_variable", NodeKind::SetVariable),
        ("network", NodeKind::NetworkRule),
        ("load_fixture", NodeKind::LoadFixture),
        ("custom_command", NodeKind::CustomCall),
    ];
    for (type_name, kind) in mapping {
        assert_eq!(node_kind(type_name), Some(kind), "{}", type_name);
    }
    assert_eq!(node_kind("Interact"), None);
}

#[test]
fn test_imported_flow_compiles() {
    let suite = Compiler::builder(imported()).build().compile().expect("compile");
    assert!(suite.is_clean(), "{:?}", suite.diagnostics);
    let src = &suite.source;
    assert!(src.contains("def test_editor_flow(self):"));
    assert!(src.contains(r##"driver.find_element(By.ID, "#go").click()"##));
    assert!(src.contains("for i in range(int(2)):"));
    // A blank duration falls back to one second.
    assert_eq!(indent_of(src, "time.sleep(float(1))"), 20);
    assert_eq!(indent_of(src, "finish()"), 16);

    let files = Compiler::builder(imported()).build().compile_files().expect("files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].backend, BackendChoice::Cypress);
    assert_eq!(files[0].filename, "editor_flow.cy.js");
    assert!(files[0].content.contains(r##"cy.get("#go").click();"##));
}

#[test]
fn test_unknown_block_type_is_rejected() {
    let json = r#"{ "nodes": [ { "id": "n1", "type": "teleport", "data": {} } ], "edges": [] }"#;
    let err = EditorFlow::from_json(json)
        .and_then(IntoGraph::into_graph)
        .expect_err("unknown type");
    assert_eq!(
        err,
        GraphError::UnknownNodeType {
            node_id: "n1".to_string(),
            type_name: "teleport".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Node 'n1' has an unregistered step type: 'teleport'"
    );
}

#[test]
fn test_duplicate_node_ids_are_rejected() {
    let json = r#"{ "nodes": [
        { "id": "x", "type": "wait" },
        { "id": "x", "type": "assert" }
    ] }"#;
    let err = EditorFlow::from_json(json)
        .and_then(IntoGraph::into_graph)
        .expect_err("duplicate id");
    assert!(matches!(err, GraphError::ValidationError(ref msg) if msg.contains("'x'")));
}

#[test]
fn test_malformed_export() {
    let err = EditorFlow::from_json(r#"{ "nodes": "nope" }"#).expect_err("bad shape");
    assert!(matches!(err, GraphError::JsonParseError(_)));
}
