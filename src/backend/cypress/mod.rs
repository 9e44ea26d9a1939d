//! JavaScript Cypress specs.
//!
//! The suite is one `describe` block. Each entry point becomes a `context` holding a
//! single `it` plus an `afterEach` that releases the session, so cleanup runs even when a
//! command fails. Outcomes and timings are collected by the outer hooks and summarised in
//! `after`.

mod emitters;
mod syntax;

pub use syntax::JsSyntax;

use super::{Backend, BackendChoice, SuiteInfo, TestCase, one_line, quoted, snake};
use crate::compiler::{Code, EmitContext};
use crate::expression::ValueSyntax;
use crate::graph::Step;

pub struct Cypress;

const HEADER: &str = r#"/// <reference types="cypress" />
// XPath locators use the cypress-xpath plugin.

function checked(message, verbose, check) {
    try {
        check();
        if (verbose) {
            Cypress.log({ name: "pass", message });
        }
    } catch (error) {
        Cypress.log({ name: "fail", message });
        throw error;
    }
}

"#;

const BOOKKEEPING: &str = r#"    const results = [];
    let started = 0;

    beforeEach(() => {
        started = Date.now();
    });

    afterEach(function () {
        results.push({
            name: this.currentTest.title,
            passed: this.currentTest.state === "passed",
            elapsed: (Date.now() - started) / 1000,
        });
    });
"#;

const SUMMARY: &str = r#"
    after(() => {
        const passed = results.filter((r) => r.passed).length;
        const failed = results.length - passed;
        const total = results.reduce((sum, r) => sum + r.elapsed, 0);
        cy.log(`Summary: ${passed} passed, ${failed} failed, ${total.toFixed(2)}s total`);
        results.forEach((r) => {
            cy.log(`${r.passed ? "PASS" : "FAIL"} ${r.name} (${r.elapsed.toFixed(2)}s)`);
        });
    });
});
"#;

impl Backend for Cypress {
    fn choice(&self) -> BackendChoice {
        BackendChoice::Cypress
    }

    fn syntax(&self) -> &dyn ValueSyntax {
        &JsSyntax
    }

    fn comment(&self, text: &str) -> String {
        format!("// {}", one_line(text))
    }

    fn emit(&self, step: &Step, ctx: &EmitContext<'_>) -> String {
        let own = match step {
            Step::EntryPoint(entry) => emitters::entry_point(entry, ctx),
            Step::ElementDescriptor(_) => String::new(),
            Step::Interact(interact) => emitters::interact(interact, ctx),
            Step::Assert(assert) => emitters::assert(assert, ctx),
            Step::Branch(check) => return emitters::branch(check, ctx),
            Step::Repeat(repeat) => return emitters::repeat(repeat, ctx),
            Step::Delay(delay) => emitters::delay(delay, ctx),
            Step::Capture(capture) => emitters::capture(capture, ctx),
            Step::SetVariable(set) => emitters::set_variable(set, ctx),
            Step::NetworkRule(rule) => emitters::network_rule(rule, ctx),
            Step::LoadFixture(fixture) => emitters::load_fixture(fixture, ctx),
            Step::CustomCall(call) => emitters::custom_call(call, ctx),
        };
        own + &ctx.proceed()
    }

    fn body_indent(&self) -> usize {
        3
    }

    fn file_name(&self, stem: &str) -> String {
        let stem = snake(stem);
        if stem.is_empty() {
            "suite.cy.js".to_string()
        } else {
            format!("{}.cy.js", stem)
        }
    }

    fn test_name(&self, raw: Option<&str>, index: usize) -> String {
        match raw.map(one_line) {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("test_case_{}", index),
        }
    }

    fn prologue(&self, suite: &SuiteInfo) -> String {
        let mut out = String::from(HEADER);
        out.push_str(&format!("describe({}, () => {{\n", quoted(&suite.name)));
        out.push_str(BOOKKEEPING);
        out
    }

    fn test_case(&self, case: &TestCase<'_>, body: &str) -> String {
        let name = quoted(case.name);
        let mut code = Code::new(1);
        code.line("")
            .line(format!("context({}, () => {{", name))
            .line_at(1, "afterEach(() => {")
            .line_at(2, r#"cy.log("Test finished. Cleaning up session.");"#)
            .line_at(2, "cy.clearCookies();")
            .line_at(2, "cy.clearLocalStorage();")
            .line_at(1, "});")
            .line("")
            .line_at(1, format!("it({}, () => {{", name))
            .line_at(2, format!("cy.log({});", quoted(&format!("Starting Test Case: {}", case.name))))
            .line_at(2, "let screenshotCounter = 0;")
            .push(body)
            .line_at(1, "});")
            .line("});");
        code.finish()
    }

    fn epilogue(&self, _suite: &SuiteInfo) -> String {
        SUMMARY.to_string()
    }
}
