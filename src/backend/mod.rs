//! Output formats the compiler can target.
//!
//! A backend bundles the value syntax used by the expression and selector translators,
//! one emitter per step kind and the file-level boilerplate. Traversal and cycle handling
//! live in the compiler's walker and are shared by every backend.

use crate::compiler::{DiagnosticKind, EmitContext};
use crate::error::CompileError;
use crate::expression::ValueSyntax;
use crate::graph::{Check, Condition, ElementStep, EntryStep, Step};
use std::fmt;
use std::str::FromStr;

pub mod cypress;
pub mod selenium;

/// The contract every output format implements.
pub trait Backend {
    fn choice(&self) -> BackendChoice;

    fn syntax(&self) -> &dyn ValueSyntax;

    /// A single-line comment in the target language, without indentation.
    fn comment(&self, text: &str) -> String;

    /// Emits `step` and everything reachable after it through `ctx`.
    fn emit(&self, step: &Step, ctx: &EmitContext<'_>) -> String;

    /// Indentation level of a test-case body inside its wrapper.
    fn body_indent(&self) -> usize;

    /// File name for generated source named after `stem`.
    fn file_name(&self, stem: &str) -> String;

    /// Test-case name from the entry's free-text name, or the 1-based default.
    fn test_name(&self, raw: Option<&str>, index: usize) -> String;

    /// File-level boilerplate emitted once before every test case.
    fn prologue(&self, suite: &SuiteInfo) -> String;

    /// Wraps one emitted body in its named test case with setup and guaranteed teardown.
    fn test_case(&self, case: &TestCase<'_>, body: &str) -> String;

    /// File-level boilerplate emitted once after every test case.
    fn epilogue(&self, suite: &SuiteInfo) -> String;
}

/// Suite-wide facts available to the boilerplate templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteInfo {
    pub name: String,
    pub cases: usize,
}

/// One test case about to be wrapped.
#[derive(Debug, Clone)]
pub struct TestCase<'a> {
    pub name: &'a str,
    /// 1-based position among the suite's entry points.
    pub index: usize,
    pub entry: &'a EntryStep,
}

/// The available output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BackendChoice {
    /// Python `unittest` suite driving Selenium WebDriver.
    #[default]
    Selenium,
    /// JavaScript Cypress spec.
    Cypress,
}

impl BackendChoice {
    pub const ALL: [BackendChoice; 2] = [BackendChoice::Selenium, BackendChoice::Cypress];

    /// The backend implementation for this choice.
    pub fn profile(self) -> &'static dyn Backend {
        match self {
            BackendChoice::Selenium => &selenium::Selenium,
            BackendChoice::Cypress => &cypress::Cypress,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendChoice::Selenium => "selenium",
            BackendChoice::Cypress => "cypress",
        }
    }
}

impl fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendChoice {
    type Err = CompileError;

    /// Accepts the identifiers case-insensitively, plus the language names the editor uses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selenium" | "python" | "py" => Ok(BackendChoice::Selenium),
            "cypress" | "javascript" | "js" => Ok(BackendChoice::Cypress),
            _ => Err(CompileError::UnknownBackend(s.to_string())),
        }
    }
}

/// Free text made safe for a single-line comment.
pub(crate) fn one_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// A double-quoted string literal valid in both Python and JavaScript source.
pub(crate) fn quoted(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// The element a check inspects, or the comment to emit when the check cannot run.
///
/// `Ok(Some(_))` is guaranteed for conditions that need an element.
pub(crate) fn check_target(check: &Check, ctx: &EmitContext<'_>) -> Result<Option<ElementStep>, String> {
    if let Condition::Unrecognized(raw) = &check.condition {
        ctx.warn(
            DiagnosticKind::UnrecognizedValue,
            format!("unknown condition '{}'", raw),
        );
        return Err(format!("Unknown condition '{}', check skipped", raw));
    }
    if !check.condition.needs_element() {
        return Ok(None);
    }
    match ctx.element() {
        Some(element) => Ok(Some(element)),
        None => {
            ctx.warn(
                DiagnosticKind::MissingElement,
                format!("'{}' check has no element connected", check.condition.label()),
            );
            Err(format!(
                "Warning: '{}' check has no element connected",
                check.condition.label()
            ))
        }
    }
}

/// Reduces free text to a snake_case identifier (`"Login Flow!"` becomes `login_flow`).
pub(crate) fn snake(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Reduces free text to a PascalCase identifier (`"smoke tests"` becomes `SmokeTests`).
pub(crate) fn pascal(raw: &str) -> String {
    raw.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Prefixes identifiers that would start with a digit.
pub(crate) fn identifier(candidate: String, fallback: &str) -> String {
    match candidate.chars().next() {
        None => fallback.to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{}", candidate),
        Some(_) => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_helpers() {
        assert_eq!(snake("  Login Flow! "), "login_flow");
        assert_eq!(snake("a--b"), "a_b");
        assert_eq!(pascal("smoke tests-v2"), "SmokeTestsV2");
        assert_eq!(identifier(String::new(), "Fallback"), "Fallback");
        assert_eq!(identifier("9lives".to_string(), "x"), "_9lives");
    }

    #[test]
    fn backend_choice_parsing() {
        assert_eq!("Cypress".parse::<BackendChoice>(), Ok(BackendChoice::Cypress));
        assert_eq!(" python ".parse::<BackendChoice>(), Ok(BackendChoice::Selenium));
        assert_eq!(
            "playwright".parse::<BackendChoice>(),
            Err(CompileError::UnknownBackend("playwright".to_string()))
        );
    }
}
