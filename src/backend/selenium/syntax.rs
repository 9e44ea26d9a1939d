use crate::backend::quoted;
use crate::expression::{Piece, ValueSyntax};

/// Python value syntax over the per-test `self.vars` dictionary.
pub struct PythonSyntax;

impl ValueSyntax for PythonSyntax {
    fn store_lookup(&self, root: &str) -> String {
        format!("self.vars.get({})", quoted(root))
    }

    fn string_literal(&self, text: &str) -> String {
        quoted(text)
    }

    /// An f-string in single quotes, so double-quoted accessor keys can sit inside the
    /// replacement fields on every Python 3 version. Expressions an f-string cannot hold
    /// before 3.12 switch the whole value to `str()` concatenation.
    fn interpolation(&self, pieces: &[Piece<'_>]) -> String {
        let concatenate = pieces
            .iter()
            .any(|piece| matches!(piece, Piece::Expr(expr) if !fits_replacement_field(expr)));
        if concatenate {
            let parts: Vec<String> = pieces
                .iter()
                .filter_map(|piece| match piece {
                    Piece::Text("") => None,
                    Piece::Text(text) => Some(quoted(text)),
                    Piece::Expr(expr) => Some(format!("str({})", expr)),
                })
                .collect();
            return self.concat(&parts);
        }

        let mut out = String::from("f'");
        for piece in pieces {
            match piece {
                Piece::Text(text) => {
                    for c in text.chars() {
                        match c {
                            '\\' => out.push_str("\\\\"),
                            '\'' => out.push_str("\\'"),
                            '{' => out.push_str("{{"),
                            '}' => out.push_str("}}"),
                            '\n' => out.push_str("\\n"),
                            '\r' => out.push_str("\\r"),
                            '\t' => out.push_str("\\t"),
                            other => out.push(other),
                        }
                    }
                }
                Piece::Expr(expr) => {
                    out.push('{');
                    out.push_str(expr);
                    out.push('}');
                }
            }
        }
        out.push('\'');
        out
    }
}

/// Whether `expr` is legal inside an f-string replacement field on Python 3.6 to 3.11.
fn fits_replacement_field(expr: &str) -> bool {
    !expr.contains(['\'', '\\', '{', '}', '#', '\n'])
}
