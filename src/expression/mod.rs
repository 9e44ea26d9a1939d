//! Translation of free-text field values into backend-native expressions.
//!
//! A field value resolves through four rules, first match wins:
//!
//! 1. **Assignment** - the value starts with `=`. The rest is backend source code; each
//!    `${path}` in it becomes a variable-store accessor and everything else passes through.
//! 2. **Reference** - the whole value is exactly one `${path}`. It becomes the raw accessor,
//!    unquoted, so the stored value keeps its native type at the call site.
//! 3. **Interpolated** - the value mixes `${path}` references with text. It becomes the
//!    backend's string interpolation with the accessors inlined.
//! 4. **Literal** - no references. Decimal numbers are emitted unquoted, anything else as a
//!    quoted, escaped string literal.
//!
//! The order matters: `=${i}+1` is an assignment, never an interpolation.

mod path;
mod template;

pub use path::VarPath;
pub use template::{Segment, has_reference, scan};

/// One piece of an interpolated string, as handed to [`ValueSyntax::interpolation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    Expr(String),
}

/// The backend-specific half of expression translation.
///
/// Only the root lookup, string literals and interpolation differ between backends; the
/// walk over a dotted path is shared through [`ValueSyntax::accessor`].
pub trait ValueSyntax {
    /// Expression reading `root` out of the runtime variable store.
    fn store_lookup(&self, root: &str) -> String;

    /// A quoted string literal with backend-appropriate escaping.
    fn string_literal(&self, text: &str) -> String;

    /// A string interpolation construct built from text and expressions.
    fn interpolation(&self, pieces: &[Piece<'_>]) -> String;

    /// Accessor for a dotted path: root lookup, then one index access per key.
    fn accessor(&self, path: &VarPath) -> String {
        let mut out = self.store_lookup(&path.root);
        for key in &path.keys {
            if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
                out.push_str(&format!("[{}]", key));
            } else {
                out.push_str(&format!("[{}]", self.string_literal(key)));
            }
        }
        out
    }

    /// String concatenation of already-rendered expressions.
    fn concat(&self, parts: &[String]) -> String {
        parts.join(" + ")
    }
}

/// The rule a field value resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueForm {
    Assignment(Vec<Segment>),
    Reference(VarPath),
    Interpolated(Vec<Segment>),
    Number(String),
    Text(String),
}

impl ValueForm {
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Some(source) = trimmed.strip_prefix('=') {
            return ValueForm::Assignment(scan(source.trim()));
        }

        let segments = scan(trimmed);
        if let [Segment::Reference(path)] = segments.as_slice() {
            return ValueForm::Reference(path.clone());
        }
        if has_reference(&segments) {
            return ValueForm::Interpolated(segments);
        }
        if is_decimal(trimmed) {
            return ValueForm::Number(trimmed.to_string());
        }
        ValueForm::Text(trimmed.to_string())
    }

    pub fn render(&self, syntax: &dyn ValueSyntax) -> String {
        match self {
            ValueForm::Assignment(segments) => {
                let source: String = segments
                    .iter()
                    .map(|s| match s {
                        Segment::Text(t) => t.clone(),
                        Segment::Reference(path) => syntax.accessor(path),
                    })
                    .collect();
                if source.trim().is_empty() {
                    syntax.string_literal("")
                } else {
                    source
                }
            }
            ValueForm::Reference(path) => syntax.accessor(path),
            ValueForm::Interpolated(segments) => {
                let pieces: Vec<Piece<'_>> = segments
                    .iter()
                    .map(|s| match s {
                        Segment::Text(t) => Piece::Text(t),
                        Segment::Reference(path) => Piece::Expr(syntax.accessor(path)),
                    })
                    .collect();
                syntax.interpolation(&pieces)
            }
            ValueForm::Number(n) => n.clone(),
            ValueForm::Text(t) => syntax.string_literal(t),
        }
    }

    /// True for forms rendered as a quoted string (plain text or interpolation).
    pub fn is_string(&self) -> bool {
        matches!(self, ValueForm::Text(_) | ValueForm::Interpolated(_))
    }

    /// True when the value does not depend on the variable store.
    pub fn is_literal(&self) -> bool {
        matches!(self, ValueForm::Text(_) | ValueForm::Number(_))
    }
}

/// Translates a raw field value into a backend-native expression.
pub fn translate(raw: &str, syntax: &dyn ValueSyntax) -> String {
    ValueForm::classify(raw).render(syntax)
}

/// Plain decimal literal: optional minus, no leading zeros, optional fraction and exponent.
///
/// Stricter than a float parse so the result is a valid literal in every backend
/// language (`inf`, `NaN`, `0x1F` and `007` stay strings).
pub fn is_decimal(text: &str) -> bool {
    let body = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let (int, fraction) = match mantissa.split_once('.') {
        Some((int, fraction)) => (int, Some(fraction)),
        None => (mantissa, None),
    };

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(int) || (int.len() > 1 && int.starts_with('0')) {
        return false;
    }
    if fraction.is_some_and(|f| !digits(f)) {
        return false;
    }
    match exponent {
        Some(exp) => digits(exp.strip_prefix(['+', '-']).unwrap_or(exp)),
        None => true,
    }
}
