//! Locator values shared by every backend.
//!
//! A locator value that is exactly one `${path}` is read from the variable store at run
//! time; anything else is a literal. Backends decide how each [`LocatorKind`] maps to a
//! native locator constructor.

use crate::expression::{Segment, ValueSyntax, VarPath, scan};
use crate::graph::ElementStep;

pub use crate::graph::LocatorKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorValue {
    Reference(VarPath),
    Literal(String),
}

impl SelectorValue {
    pub fn resolve(raw: &str) -> Self {
        let trimmed = raw.trim();
        match scan(trimmed).as_slice() {
            [Segment::Reference(path)] => SelectorValue::Reference(path.clone()),
            _ => SelectorValue::Literal(trimmed.to_string()),
        }
    }

    /// The value as an expression: the raw accessor, or a quoted literal.
    pub fn render(&self, syntax: &dyn ValueSyntax) -> String {
        self.render_wrapped(syntax, "", "")
    }

    /// The value embedded between fixed text, e.g. `#` + id or `[name='` + name + `']`.
    ///
    /// Literals fold into a single quoted string; references become a concatenation.
    pub fn render_wrapped(&self, syntax: &dyn ValueSyntax, prefix: &str, suffix: &str) -> String {
        match self {
            SelectorValue::Literal(text) => {
                syntax.string_literal(&format!("{}{}{}", prefix, text, suffix))
            }
            SelectorValue::Reference(path) => {
                let mut parts = Vec::with_capacity(3);
                if !prefix.is_empty() {
                    parts.push(syntax.string_literal(prefix));
                }
                parts.push(syntax.accessor(path));
                if !suffix.is_empty() {
                    parts.push(syntax.string_literal(suffix));
                }
                syntax.concat(&parts)
            }
        }
    }
}

/// A locator kind paired with its resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub kind: LocatorKind,
    pub value: SelectorValue,
}

impl Selector {
    pub fn new(kind: LocatorKind, raw: &str) -> Self {
        Self {
            kind,
            value: SelectorValue::resolve(raw),
        }
    }

    pub fn of(element: &ElementStep) -> Self {
        Self::new(element.locator, &element.value)
    }
}
