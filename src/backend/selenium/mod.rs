//! Python `unittest` suites driving Selenium WebDriver.
//!
//! Every entry point becomes one `test_*` method. The body runs inside
//! `try`/`except`/`finally` so the driver is released and the outcome recorded even when a
//! step raises; `tearDownClass` prints the summary once after all cases.

mod emitters;
mod syntax;

pub use syntax::PythonSyntax;

use super::{Backend, BackendChoice, SuiteInfo, TestCase, identifier, one_line, pascal, quoted, snake};
use crate::compiler::{Code, EmitContext};
use crate::expression::ValueSyntax;
use crate::graph::Step;

pub struct Selenium;

const HEADER: &str = r#"import datetime
import json
import os
import re
import time
import unittest

from selenium import webdriver
from selenium.webdriver.common.by import By

try:
    from colorama import Fore, Style, init

    init(autoreset=True)
except ImportError:
    class _NoColor:
        def __getattr__(self, name):
            return ""

    Fore = Style = _NoColor()


def log_step(message):
    timestamp = datetime.datetime.now().strftime("%H:%M:%S")
    print(f"{Fore.CYAN}[STEP {timestamp}] {message}")


def log_pass(message):
    print(f"{Fore.GREEN}[PASS] {message}")


def log_fail(message):
    print(f"{Fore.RED}[FAIL] {message}")


def log_info(message):
    print(f"{Style.DIM}[INFO] {message}")

"#;

const CLASS_BODY: &str = r#"    results = []

    def setUp(self):
        self.vars = {}
        self.screenshot_counter = 0

    @classmethod
    def record(cls, name, passed, elapsed):
        cls.results.append((name, passed, elapsed))
        status = "PASS" if passed else "FAIL"
        log_info(f"{status} {name} ({elapsed:.2f}s)")
"#;

const SUMMARY: &str = r#"
    @classmethod
    def tearDownClass(cls):
        passed = sum(1 for _, ok, _ in cls.results if ok)
        failed = len(cls.results) - passed
        total = sum(elapsed for _, _, elapsed in cls.results)
        print("=" * 60)
        print(f"Summary: {passed} passed, {failed} failed, {total:.2f}s total")
        for name, ok, elapsed in cls.results:
            print(f"  {'PASS' if ok else 'FAIL'}  {name} ({elapsed:.2f}s)")
        print("=" * 60)


if __name__ == "__main__":
    unittest.main()
"#;

impl Backend for Selenium {
    fn choice(&self) -> BackendChoice {
        BackendChoice::Selenium
    }

    fn syntax(&self) -> &dyn ValueSyntax {
        &PythonSyntax
    }

    fn comment(&self, text: &str) -> String {
        format!("# {}", one_line(text))
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
        if stem.starts_with("test") {
            format!("{}.py", stem)
        } else if stem.is_empty() {
            "test_suite.py".to_string()
        } else {
            format!("test_{}.py", stem)
        }
    }

    /// `unittest` only collects methods whose names start with `test`.
    fn test_name(&self, raw: Option<&str>, index: usize) -> String {
        let name = raw.map(snake).unwrap_or_default();
        if name.is_empty() {
            format!("test_case_{}", index)
        } else if name.starts_with("test") {
            name
        } else {
            format!("test_{}", name)
        }
    }

    fn prologue(&self, suite: &SuiteInfo) -> String {
        let class = identifier(pascal(&suite.name), "TestSuite");
        let mut out = String::from(HEADER);
        out.push_str(&format!("\nclass {}(unittest.TestCase):\n", class));
        out.push_str(&format!(
            "    \"\"\"{} ({} test case{})\"\"\"\n\n",
            one_line(&suite.name).replace('"', "'").replace('\\', "/"),
            suite.cases,
            if suite.cases == 1 { "" } else { "s" }
        ));
        out.push_str(CLASS_BODY);
        out
    }

    fn test_case(&self, case: &TestCase<'_>, body: &str) -> String {
        let name = quoted(case.name);
        let mut code = Code::new(1);
        code.line("")
            .line(format!("def {}(self):", case.name))
            .line_at(1, format!("log_info({})", quoted(&format!("Starting Test Case: {}", case.name))))
            .line_at(1, "started = time.time()")
            .line_at(1, "driver = None")
            .line_at(1, "try:")
            .push(body)
            .line_at(2, format!("self.record({}, True, time.time() - started)", name))
            .line_at(1, "except Exception:")
            .line_at(2, format!("self.record({}, False, time.time() - started)", name))
            .line_at(2, "raise")
            .line_at(1, "finally:")
            .line_at(2, "if driver is not None:")
            .line_at(3, r#"log_info("Test finished. Closing driver.")"#)
            .line_at(3, "driver.quit()");
        code.finish()
    }

    fn epilogue(&self, _suite: &SuiteInfo) -> String {
        SUMMARY.to_string()
    }
}
