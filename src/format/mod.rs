//! glslx Code Formatter
//!
//! This module provides code formatting for glslx source files. It is independent of compilation: the input is
//! lexed, never parsed or checked, so files with errors format too.
//!
//! Defaults:
//! - 2-space indentation
//! - `\n` line breaks
//! - a single trailing newline

mod config;
mod formatter;
mod writer;

pub use config::{FormatArgs, TrailingNewline};
pub use formatter::Formatter;

use crate::frontend::lexer;
use crate::frontend::source::SourceId;

/// Format glslx source code.
///
/// ## Notes
/// - Idempotent: formatting the output again with the same args returns it unchanged.
#[tracing::instrument(skip_all, fields(bytes = source.len()))]
pub fn format(source: &str, args: &FormatArgs) -> String {
    let lexed = lexer::lex_all(source, SourceId(0));
    let mut text = Formatter::new(source, &args.indent).format(&lexed);

    let trailing = match args.trailing_newline {
        TrailingNewline::Insert => !text.is_empty(),
        TrailingNewline::Remove => false,
        TrailingNewline::Preserve => !text.is_empty() && source.ends_with('\n'),
    };
    if trailing {
        text.push('\n');
    }
    if args.newline != "\n" {
        text = text.replace('\n', &args.newline);
    }
    text
}

/// Check if source code is already formatted
pub fn check_formatted(source: &str, args: &FormatArgs) -> bool {
    format(source, args) == source
}

/// Get the diff between original and formatted source
pub fn format_diff(source: &str, args: &FormatArgs) -> Option<String> {
    let formatted = format(source, args);

    if source == formatted {
        return None;
    }

    // Simple line-by-line diff
    let mut diff = String::new();
    let original_lines: Vec<&str> = source.lines().collect();
    let formatted_lines: Vec<&str> = formatted.lines().collect();

    let max_lines = original_lines.len().max(formatted_lines.len());

    for i in 0..max_lines {
        let orig = original_lines.get(i).unwrap_or(&"");
        let fmt = formatted_lines.get(i).unwrap_or(&"");

        if orig != fmt {
            if !orig.is_empty() {
                diff.push_str(&format!("-{:4} | {}\n", i + 1, orig));
            }
            if !fmt.is_empty() {
                diff.push_str(&format!("+{:4} | {}\n", i + 1, fmt));
            }
        }
    }

    Some(diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(source: &str) -> String {
        format(source, &FormatArgs::default())
    }

    // ========================================
    // spacing
    // ========================================

    #[test]
    fn test_format_spacing() {
        assert_eq!(
            fmt("float f(float x){return -x*2.0+vec2(1.0,2.0).x;}"),
            "float f(float x) { return -x * 2.0 + vec2(1.0, 2.0).x; }\n"
        );
        assert_eq!(fmt("for(int i=0;i<3;i++){}"), "for (int i = 0; i < 3; i++) {}\n");
        assert_eq!(fmt("x = a - -b; y = - -c; z = a++ + ++b;"), "x = a - -b; y = - -c; z = a++ + ++b;\n");
        assert_eq!(fmt("c = a?b:c[ i ];"), "c = a ? b : c[i];\n");
    }

    #[test]
    fn test_format_indentation() {
        let source = "export void main() {\nif (x) {\ny = 1.0;\n}\nz = f(a,\nb);\n}\n";
        let expected = "export void main() {\n  if (x) {\n    y = 1.0;\n  }\n  z = f(a,\n    b);\n}\n";
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_format_blank_lines_collapse() {
        assert_eq!(fmt("\n\nfloat a;\n\n\n\nfloat b;\n\n"), "float a;\n\nfloat b;\n");
    }

    #[test]
    fn test_format_keeps_comments_and_directives() {
        let source = "#version 100\n  #extension GL_OES_standard_derivatives : enable\n/* block\n   comment */\nfloat a; // trailing   \n";
        let expected =
            "#version 100\n#extension GL_OES_standard_derivatives : enable\n/* block\n   comment */\nfloat a; // trailing\n";
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_format_broken_input() {
        assert_eq!(fmt("float x = ;{"), "float x =; {\n");
    }

    #[test]
    fn test_format_unterminated_comment_is_stable() {
        for newline in ["\n", "\r\n"] {
            let args = FormatArgs::new().with_newline(newline);
            let once = format("int x; /* unterminated", &args);
            assert_eq!(once, format!("int x; /* unterminated{newline}"));
            assert_eq!(format(&once, &args), once);
        }
        assert_eq!(fmt("/*/\n\n"), "/*/\n");
    }

    #[test]
    fn test_format_continuation_lines() {
        assert_eq!(fmt("a = b\n+ c;"), "a = b\n  + c;\n");
        assert_eq!(fmt("void f() {\nx = a *\nb;\n}"), "void f() {\n  x = a *\n    b;\n}\n");
        assert_eq!(fmt("void f()\n{\nx;\n}"), "void f()\n{\n  x;\n}\n");
        let once = fmt("a = b\n  + c;");
        assert_eq!(fmt(&once), once);
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(fmt(""), "");
        assert_eq!(fmt("  \n\n"), "");
    }

    // ========================================
    // options
    // ========================================

    #[test]
    fn test_format_custom_indent_and_newline() {
        let args = FormatArgs::new().with_indent("\t").with_newline("\r\n");
        assert_eq!(format("void f() {\nx;\n}", &args), "void f() {\r\n\tx;\r\n}\r\n");
    }

    #[test]
    fn test_format_trailing_newline_policies() {
        let remove = FormatArgs::new().with_trailing_newline(TrailingNewline::Remove);
        let preserve = FormatArgs::new().with_trailing_newline(TrailingNewline::Preserve);
        assert_eq!(format("float a;\n", &remove), "float a;");
        assert_eq!(format("float a;", &preserve), "float a;");
        assert_eq!(format("float a;\n\n", &preserve), "float a;\n");
    }

    #[test]
    fn test_format_is_idempotent_with_crlf() {
        let args = FormatArgs::new().with_newline("\r\n");
        let once = format("void f(){\n// note\nx=1;\n}\n", &args);
        assert_eq!(format(&once, &args), once);
    }

    // ========================================
    // check_formatted / format_diff
    // ========================================

    #[test]
    fn test_check_formatted() {
        let args = FormatArgs::default();
        assert!(check_formatted("float a;\n", &args));
        assert!(!check_formatted("float  a ;", &args));
    }

    #[test]
    fn test_format_diff() {
        let args = FormatArgs::default();
        assert_eq!(format_diff("float a;\n", &args), None);
        let diff = format_diff("float  a;\n", &args).unwrap();
        assert!(diff.contains("-   1 | float  a;"));
        assert!(diff.contains("+   1 | float a;"));
    }
}
