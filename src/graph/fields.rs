use serde_json::{Map, Value};

/// Read-only view over a node's untyped field map.
///
/// Blank strings and `null` count as missing so a field cleared in the editor falls back
/// to its default. Numbers and booleans are accepted wherever text is expected.
#[derive(Clone, Copy)]
pub(crate) struct Fields<'a>(pub(crate) &'a Map<String, Value>);

impl<'a> Fields<'a> {
    pub(crate) fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub(crate) fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    pub(crate) fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            _ => false,
        }
    }

    /// The field as a lenient enum key, see [`choice_key`].
    pub(crate) fn choice(&self, key: &str) -> Option<String> {
        self.text(key).map(|s| choice_key(&s))
    }
}

/// Normalizes an enumerated field value for matching: lowercase, letters and digits only.
///
/// `"Is Visible"`, `"isVisible"` and `"is_visible"` all become `"isvisible"`.
pub(crate) fn choice_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
