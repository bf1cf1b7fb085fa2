//! Indentation-aware line buffer.

const INDENT: &str = "    ";

/// Accumulates lines at the current brace depth.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one indented line.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Writes `{` and indents.
    pub fn open(&mut self) {
        self.line("{");
        self.depth += 1;
    }

    /// Dedents and writes `}`.
    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Runs `f` one level deeper without braces.
    pub fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_indent_by_four() {
        let mut w = CodeWriter::new();
        w.line("namespace Acme");
        w.open();
        w.line("interface IFoo");
        w.indented(|w| w.line("where T : class"));
        w.open();
        w.close();
        w.close();
        assert_eq!(
            w.finish(),
            "namespace Acme\n{\n    interface IFoo\n        where T : class\n    {\n    }\n}\n"
        );
    }
}
