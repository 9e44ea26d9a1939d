/// One level of indentation in every generated language.
pub const INDENT: &str = "    ";

pub fn indentation(level: usize) -> String {
    INDENT.repeat(level)
}

/// Line buffer for emitted code, anchored at a base indentation level.
#[derive(Debug, Default)]
pub struct Code {
    indent: usize,
    buf: String,
}

impl Code {
    pub fn new(indent: usize) -> Self {
        Self {
            indent,
            buf: String::new(),
        }
    }

    /// Writes `text` at the base indentation. Multi-line text is indented line by line.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.line_at(0, text)
    }

    /// Writes `text` nested `depth` levels below the base indentation.
    pub fn line_at(&mut self, depth: usize, text: impl AsRef<str>) -> &mut Self {
        let prefix = indentation(self.indent + depth);
        let text = text.as_ref();
        if text.is_empty() {
            self.buf.push('\n');
            return self;
        }
        for line in text.lines() {
            if line.is_empty() {
                self.buf.push('\n');
            } else {
                self.buf.push_str(&prefix);
                self.buf.push_str(line);
                self.buf.push('\n');
            }
        }
        self
    }

    /// Appends text that is already indented, e.g. the output of a nested walk.
    pub fn push(&mut self, emitted: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(emitted.as_ref());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
