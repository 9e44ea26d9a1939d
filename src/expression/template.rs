use super::path::VarPath;

/// A piece of a field value: literal text or a `${path}` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Reference(VarPath),
}

/// Splits a raw field value into text and `${path}` references.
///
/// An unterminated `${` or an empty reference like `${}` is kept as literal text.
/// Adjacent text pieces are merged, so a value without references yields at most one
/// `Segment::Text`.
pub fn scan(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = raw;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        text.push_str(&rest[..start]);
        match VarPath::parse(&after[..end]) {
            Some(path) => {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Reference(path));
            }
            None => text.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

/// Whether any segment is a variable reference.
pub fn has_reference(segments: &[Segment]) -> bool {
    segments
        .iter()
        .any(|s| matches!(s, Segment::Reference(_)))
}
