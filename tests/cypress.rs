//! Tests for the Cypress JavaScript output.
mod common;
use common::*;
use testloom::prelude::*;

fn js(graph: Graph) -> CompiledSuite {
    compile(graph, BackendChoice::Cypress)
}

#[test]
fn test_spec_boilerplate() {
    let suite = js(with_entry(vec![], vec![], &[]));
    let src = &suite.source;
    assert!(src.starts_with(r#"/// <reference types="cypress" />"#));
    assert!(src.contains("function checked(message, verbose, check) {"));
    assert!(src.contains(r#"describe("Generated Suite", () => {"#));
    assert_eq!(indent_of(src, r#"context("Flow", () => {"#), 4);
    assert_eq!(indent_of(src, r#"it("Flow", () => {"#), 8);
    assert_eq!(indent_of(src, "let screenshotCounter = 0;"), 12);
    assert!(src.contains(r#"cy.log("Test finished. Cleaning up session.");"#));
    assert!(src.contains("    after(() => {"));
    assert!(src.trim_end().ends_with("});"));
    assert_eq!(suite.file_name, "generated_suite.cy.js");
    assert_eq!(count(src, "{"), count(src, "}"));
}

#[test]
fn test_session_setup_hooks() {
    let graph = Graph {
        nodes: vec![
            entry("start", "Clean", "${base}/login")
                .with("clearCookies", true)
                .with("clearSessionStorage", true),
        ],
        edges: vec![],
    };
    let suite = js(graph);
    let src = &suite.source;
    assert!(suite.is_clean(), "{:?}", suite.diagnostics);
    assert!(src.contains(r#"cy.visit(`${Cypress.env("base")}/login`);"#));
    assert_eq!(indent_of(src, "win.sessionStorage.clear();"), 16);
    let visit = src.find("cy.visit(").expect("visit");
    let cleared = src[..visit].rfind("cy.clearCookies();").expect("cookies cleared first");
    assert!(cleared > src.find("it(\"Clean\"").expect("test body"));
}

#[test]
fn test_interactions() {
    let graph = with_entry(
        vec![
            Node::new("type", NodeKind::Interact)
                .with("action", "Type")
                .with("value", "${user.email}"),
            Node::new("hover", NodeKind::Interact).with("action", "Hover"),
            Node::new("read", NodeKind::Interact)
                .with("action", "Get Text")
                .with("saveTo", "greeting"),
        ],
        vec![
            element_by_id("email", "email"),
            element_by_id("menu", "#menu"),
            element("title", "CSS Selector", "h1"),
        ],
        &[("email", "type"), ("menu", "hover"), ("title", "read")],
    );
    let suite = js(graph);
    let src = &suite.source;
    assert!(suite.is_clean(), "{:?}", suite.diagnostics);
    assert!(src.contains(r##"cy.get("#email").type(String(Cypress.env("user")["email"]));"##));
    assert!(src.contains(r##"cy.get("#menu").trigger("mouseover");"##));
    assert!(src.contains(r#"cy.get("h1").invoke("text").then((text) => {"#));
    assert_eq!(indent_of(src, r#"Cypress.env("greeting", text);"#), 16);
}

#[test]
fn test_locator_strategies() {
    let graph = with_entry(
        vec![
            Node::new("c1", NodeKind::Interact),
            Node::new("c2", NodeKind::Interact),
            Node::new("c3", NodeKind::Interact),
            Node::new("c4", NodeKind::Interact),
        ],
        vec![
            element("x", "XPath", "//button"),
            element("l", "Link Text", "Sign in"),
            element("n", "Name", "q"),
            element("r", "ID", "${ids.go}"),
        ],
        &[("x", "c1"), ("l", "c2"), ("n", "c3"), ("r", "c4")],
    );
    let src = js(graph).source;
    assert!(src.contains(r#"cy.xpath("//button").click();"#));
    assert!(src.contains(r#"cy.contains("a", "Sign in").click();"#));
    assert!(src.contains(r#"cy.get("[name='q']").click();"#));
    assert!(src.contains(r##"cy.get("#" + Cypress.env("ids")["go"]).click();"##));
}

#[test]
fn test_assertions_use_checked_helper() {
    let graph = with_entry(
        vec![
            Node::new("visible", NodeKind::Assert).with("printResults", true),
            Node::new("url", NodeKind::Assert)
                .with("condition", "URL Matches Regex")
                .with("value", "/dash.*/"),
            Node::new("status", NodeKind::Assert)
                .with("condition", "Network Status")
                .with("networkAlias", "login")
                .with("expectedStatus", "201"),
        ],
        vec![element_by_id("banner", "banner")],
        &[("banner", "visible")],
    );
    let suite = js(graph);
    let src = &suite.source;
    assert!(suite.is_clean(), "{:?}", suite.diagnostics);
    assert!(src.contains(r##"cy.get("#banner").then(($el) => {"##));
    assert!(src.contains(
        r#"checked("Element 'banner' is visible", true, () => expect($el).to.be.visible);"#
    ));
    assert!(src.contains(
        r#"checked("URL matches regex", false, () => expect(url).to.match(new RegExp("dash.*")));"#
    ));
    assert!(src.contains(r#"cy.wait("@login").then((interception) => {"#));
    assert!(src.contains("expect(interception.response.statusCode).to.equal(Number(201))"));
}

#[test]
fn test_missing_element_assertion() {
    let graph = with_entry(
        vec![Node::new("text", NodeKind::Assert).with("condition", "Contains Text")],
        vec![],
        &[],
    );
    let suite = js(graph);
    assert_eq!(suite.diagnostics[0].kind, DiagnosticKind::MissingElement);
    assert!(suite
        .source
        .contains("// Warning: 'Contains Text' check has no element connected"));
    assert!(!suite.source.contains("checked(\"Element"));
}

#[test]
fn test_network_rules_and_waits() {
    let graph = with_entry(
        vec![
            Node::new("mock", NodeKind::NetworkRule)
                .with("method", "post")
                .with("urlPattern", "**/api/login")
                .with("alias", "login")
                .with("mockResponse", true)
                .with("statusCode", 404)
                .with("responseBody", r#"{ "ok": false }"#),
            Node::new("spy", NodeKind::NetworkRule),
            Node::new("broken", NodeKind::NetworkRule)
                .with("mockResponse", true)
                .with("responseBody", "not json"),
            Node::new("wait", NodeKind::Delay)
                .with("waitType", "Network")
                .with("networkAlias", "login"),
        ],
        vec![],
        &[],
    );
    let suite = js(graph);
    let src = &suite.source;
    assert!(suite.is_clean(), "{:?}", suite.diagnostics);
    assert!(src.contains(r#"cy.intercept("POST", "**/api/login", {"#));
    assert!(src.contains("statusCode: Number(404),"));
    assert!(src.contains(r#"body: {"ok":false},"#));
    assert!(src.contains(r#"}).as("login");"#));
    assert!(src.contains(r#"cy.intercept("GET", "**/api/*").as("request");"#));
    assert!(src.contains("body: {},"));
    assert!(src.contains(r#"cy.wait("@login");"#));
}

#[test]
fn test_branch_conditions() {
    let src = js(create_branch_flow()).source;
    assert_eq!(indent_of(&src, r#"cy.get("body").then(($body) => {"#), 12);
    assert_eq!(indent_of(&src, r##"const $el = $body.find("#banner");"##), 16);
    assert!(src.contains(r#"return $el.length > 0 && $el.is(":visible");"#));

    let graph = with_entry(
        vec![Node::new("url", NodeKind::Branch)
            .with("condition", "URL Contains")
            .with("value", "${section}")],
        vec![],
        &[],
    );
    let src = js(graph).source;
    assert!(src.contains(
        r#"cy.url().then((url) => url.includes(String(Cypress.env("section")))).then((matched) => {"#
    ));

    let graph = with_entry(
        vec![Node::new("x", NodeKind::Branch).with("condition", "Contains Text").with("value", "Hi")],
        vec![element("box", "XPath", "//div")],
        &[("box", "x")],
    );
    let src = js(graph).source;
    assert!(src.contains(r#"ownerDocument.evaluate("//div", "#));
    assert!(src.contains(r#"return $el.length > 0 && $el.text().includes("Hi");"#));
    assert_eq!(count(&src, "return;"), 2);

    let graph = with_entry(vec![Node::new("odd", NodeKind::Branch).with("condition", "Is Sunny")], vec![], &[]);
    let suite = js(graph);
    assert_eq!(suite.diagnostics[0].kind, DiagnosticKind::UnrecognizedValue);
    assert!(suite.source.contains("cy.wrap(true).then((matched) => {"));
}

#[test]
fn test_loops() {
    let graph = with_entry(
        vec![Node::new("times", NodeKind::Repeat).with("count", "${n}")],
        vec![],
        &[],
    );
    let src = js(graph).source;
    assert!(src.contains(r#"cy.log(`Starting Loop (${Cypress.env("n")} iterations)`);"#));
    assert!(src.contains(r#"Cypress._.times(Number(Cypress.env("n")), (i) => {"#));
    assert!(src.contains("cy.log(`--- Loop Iteration ${i + 1} ---`);"));

    let graph = Graph {
        nodes: vec![
            entry("start", "Poll", "https://example.com"),
            Node::new("wait-for-spinner", NodeKind::Repeat).with("loopType", "While"),
            element("spinner", "css", ".spinner"),
            Node::new("tick", NodeKind::Delay).with("duration", "1"),
            Node::new("after", NodeKind::CustomCall).with("commandName", "done"),
        ],
        edges: vec![
            Edge::flow("e1", "start", "wait-for-spinner"),
            Edge::data("e2", "spinner", "wait-for-spinner"),
            Edge::role("e3", "wait-for-spinner", SourceRole::RepeatBody, "tick"),
            Edge::role("e4", "wait-for-spinner", SourceRole::RepeatDone, "after"),
        ],
    };
    let suite = js(graph);
    let src = &suite.source;
    assert!(suite.is_clean(), "{:?}", suite.diagnostics);
    assert_eq!(indent_of(src, "const repeatWhile_wait_for_spinner = () => {"), 12);
    assert_eq!(count(src, "repeatWhile_wait_for_spinner();"), 2);
    assert_eq!(indent_of(src, "cy.wait(1 * 1000);"), 20);
    assert!(src.contains(r#"const $el = $body.find(".spinner");"#));
    assert_eq!(indent_of(src, "cy.done();"), 12);
    assert!(src.find("cy.wait(1 * 1000);").expect("body") < src.find("cy.done();").expect("done"));
}

#[test]
fn test_unknown_enumerated_values_keep_defaults() {
    let graph = with_entry(
        vec![
            Node::new("click", NodeKind::Interact),
            Node::new("pause", NodeKind::Delay)
                .with("waitType", "Event")
                .with("duration", 3),
            Node::new("spin", NodeKind::Repeat)
                .with("loopType", "Forever")
                .with("count", 2),
        ],
        vec![element("go", "Shadow DOM", "go")],
        &[("go", "click")],
    );
    let suite = js(graph);
    let src = &suite.source;
    let kinds: Vec<DiagnosticKind> = suite.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, [DiagnosticKind::UnrecognizedValue; 3]);
    assert_eq!(suite.diagnostics[1].node_id, "pause");
    assert_eq!(suite.diagnostics[2].message, "unknown loop type 'Forever', using Counter");

    assert_eq!(indent_of(src, "// Warning: unknown selector type 'Shadow DOM', using ID"), 12);
    assert!(src.contains(r##"cy.get("#go").click();"##));

    assert_eq!(indent_of(src, "// Warning: unknown wait type 'Event', using a timed wait"), 12);
    assert!(src.contains("cy.wait(3 * 1000);"));

    assert_eq!(indent_of(src, "// Warning: unknown loop type 'Forever', using Counter"), 12);
    assert!(src.contains("cy.log(`Starting Loop (${2} iterations)`);"));
    assert_eq!(indent_of(src, "Cypress._.times(Number(2), (i) => {"), 12);
}

#[test]
fn test_data_steps() {
    let graph = with_entry(
        vec![
            Node::new("shot", NodeKind::Capture)
                .with("directory", "./shots")
                .with("filename", "page")
                .with("autoIncrement", true),
            Node::new("inc", NodeKind::SetVariable)
                .with("varName", "count")
                .with("varValue", "=${count}+1"),
            Node::new("load", NodeKind::LoadFixture)
                .with("filePath", "users.json")
                .with("varName", "users"),
            Node::new("call", NodeKind::CustomCall)
                .with("commandName", "login")
                .with("arguments", "a, ${b}, 3"),
            Node::new("default", NodeKind::CustomCall),
            Node::new("delay", NodeKind::Delay).with("duration", "${wait}"),
        ],
        vec![],
        &[],
    );
    let suite = js(graph);
    let src = &suite.source;
    assert!(suite.is_clean(), "{:?}", suite.diagnostics);
    assert!(src.contains("screenshotCounter += 1;"));
    assert!(src.contains("cy.screenshot(`shots/page_${screenshotCounter}`);"));
    assert!(src.contains(r#"Cypress.env("count", Cypress.env("count")+1);"#));
    assert!(src.contains(r#"cy.fixture("users.json").then((data) => {"#));
    assert!(src.contains(r#"Cypress.env("users", data);"#));
    assert!(src.contains(r#"cy.login("a", Cypress.env("b"), 3);"#));
    assert!(src.contains("cy.myCommand();"));
    assert!(src.contains(r#"cy.wait(Number(Cypress.env("wait")) * 1000);"#));
}

#[test]
fn test_entry_point_reached_mid_flow() {
    let graph = Graph {
        nodes: vec![
            entry("start", "First", "https://example.com"),
            entry("again", "Second", "https://example.org"),
        ],
        edges: vec![Edge::flow("e1", "start", "again")],
    };
    let suite = js(graph);
    assert_eq!(suite.diagnostics.len(), 1);
    assert_eq!(suite.diagnostics[0].kind, DiagnosticKind::MisplacedStep);
    assert!(suite.source.contains("// Entry point reached mid-flow: session setup skipped"));
    assert_eq!(count(&suite.source, r#"cy.visit("https://example.org");"#), 1);
}
