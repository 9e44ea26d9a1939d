use crate::backend::quoted;
use crate::expression::{Piece, ValueSyntax};

/// JavaScript value syntax over `Cypress.env`.
pub struct JsSyntax;

impl ValueSyntax for JsSyntax {
    fn store_lookup(&self, root: &str) -> String {
        format!("Cypress.env({})", quoted(root))
    }

    fn string_literal(&self, text: &str) -> String {
        quoted(text)
    }

    fn interpolation(&self, pieces: &[Piece<'_>]) -> String {
        let mut out = String::from("`");
        for piece in pieces {
            match piece {
                Piece::Text(text) => {
                    let mut chars = text.chars().peekable();
                    while let Some(c) = chars.next() {
                        match c {
                            '\\' => out.push_str("\\\\"),
                            '`' => out.push_str("\\`"),
                            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
                            other => out.push(other),
                        }
                    }
                }
                Piece::Expr(expr) => {
                    out.push_str("${");
                    out.push_str(expr);
                    out.push('}');
                }
            }
        }
        out.push('`');
        out
    }
}
