//! GLSL text buffer.
//!
//! Tokens are appended one at a time. In minified mode the buffer inserts a space only where two tokens would
//! otherwise merge (`float x`, `a- -b`); in pretty mode callers also ask for spaces and line breaks explicitly, which
//! are dropped again when minifying.

/// A buffer for building GLSL source with optional indentation.
#[derive(Debug)]
pub struct GlslEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: &'static str,
    pretty: bool,
    at_line_start: bool,
}

impl GlslEmitter {
    pub fn new(pretty: bool) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: "  ",
            pretty,
            at_line_start: true,
        }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Get the generated code
    pub fn finish(mut self) -> String {
        while self.buffer.ends_with('\n') {
            self.buffer.pop();
        }
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Append one token, separating it from the previous one if they would merge.
    pub fn token(&mut self, s: &str) {
        let Some(first) = s.chars().next() else {
            return;
        };
        if self.at_line_start {
            self.write_indent();
        } else if let Some(last) = self.buffer.chars().next_back() {
            if needs_space(last, first) {
                self.buffer.push(' ');
            }
        }
        self.buffer.push_str(s);
    }

    /// Append text with no separation check (member access dots).
    pub fn raw(&mut self, s: &str) {
        if self.at_line_start {
            self.write_indent();
        }
        self.buffer.push_str(s);
    }

    /// A space in pretty mode only.
    pub fn space(&mut self) {
        if self.pretty && !self.at_line_start && !self.buffer.ends_with(' ') {
            self.buffer.push(' ');
        }
    }

    /// A binary or assignment operator, spaced in pretty mode.
    pub fn operator(&mut self, op: &str) {
        self.space();
        self.token(op);
        self.space();
    }

    pub fn comma(&mut self) {
        self.token(",");
        self.space();
    }

    /// A line break in pretty mode only.
    pub fn newline(&mut self) {
        if self.pretty && !self.at_line_start {
            self.buffer.push('\n');
            self.at_line_start = true;
        }
    }

    /// An empty line between top-level items in pretty mode.
    pub fn blank_line(&mut self) {
        if self.pretty && !self.buffer.is_empty() {
            self.newline();
            self.buffer.push('\n');
        }
    }

    /// A preprocessor line; always ends with a real newline.
    pub fn directive(&mut self, line: &str) {
        if !self.at_line_start {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn write_indent(&mut self) {
        if self.pretty {
            for _ in 0..self.indent_level {
                self.buffer.push_str(self.indent_str);
            }
        }
        self.at_line_start = false;
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `prev` followed directly by `next` would lex differently from the two tokens.
fn needs_space(prev: char, next: char) -> bool {
    (is_word_char(prev) && (is_word_char(next) || next == '.'))
        || (prev == '+' && next == '+')
        || (prev == '-' && next == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minified_spacing() {
        let mut out = GlslEmitter::new(false);
        for token in ["uniform", "float", "a", ";", "return", ".5", ";", "a", "-", "-1", ";", "b", "+", "++c"] {
            out.token(token);
        }
        assert_eq!(out.finish(), "uniform float a;return .5;a- -1;b+ ++c");
    }

    #[test]
    fn test_pretty_lines_and_indent() {
        let mut out = GlslEmitter::new(true);
        out.directive("#version 100");
        out.token("{");
        out.indent();
        out.newline();
        out.token("x");
        out.operator("=");
        out.token("1");
        out.token(";");
        out.dedent();
        out.newline();
        out.token("}");
        assert_eq!(out.finish(), "#version 100\n{\n  x = 1;\n}");
    }
}
