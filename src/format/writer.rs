//! Output writer with indentation tracking
//!
//! Handles writing formatted code with proper indentation. Lines are always joined with `\n` here; the configured
//! newline is applied once the whole file is written.

/// Writer that tracks indentation and builds formatted output
pub struct FormatWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// One level of indentation
    indent: String,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl FormatWriter {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent: indent.into(),
            at_line_start: true,
        }
    }

    /// Get the formatted output
    pub fn finish(self) -> String {
        self.output
    }

    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn set_indent_level(&mut self, level: usize) {
        self.indent_level = level;
    }

    /// Write indentation if at line start
    fn write_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.indent);
            }
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a string at column zero, whatever the indentation.
    pub fn write_unindented(&mut self, s: &str) {
        self.output.push_str(s);
        self.at_line_start = false;
    }

    pub fn space(&mut self) {
        if !self.at_line_start {
            self.output.push(' ');
        }
    }

    /// Write just a newline
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write `count` line breaks (a break plus blank lines).
    pub fn line_breaks(&mut self, count: usize) {
        for _ in 0..count {
            self.newline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_applies_at_line_start_only() {
        let mut w = FormatWriter::new("  ");
        w.write("a");
        w.set_indent_level(1);
        w.write("b");
        w.newline();
        w.write("c");
        w.space();
        w.write("d");
        assert_eq!(w.finish(), "ab\n  c d");
    }

    #[test]
    fn test_unindented_text() {
        let mut w = FormatWriter::new("\t");
        w.set_indent_level(2);
        w.write_unindented("#version 100");
        w.newline();
        w.write("x");
        assert_eq!(w.finish(), "#version 100\n\t\tx");
    }

    #[test]
    fn test_space_is_dropped_at_line_start() {
        let mut w = FormatWriter::new("  ");
        w.space();
        w.write("x");
        assert_eq!(w.finish(), "x");
    }
}
