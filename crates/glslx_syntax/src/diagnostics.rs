//! Diagnostics and error reporting for glslx.
//!
//! Every stage (loader, parser, resolver, emitter) reports problems as [`CompileError`] values pushed into a
//! [`Diagnostics`] collector. Nothing is thrown: analysis continues and callers decide what a non-empty error list
//! means (batch compile yields no output, the IDE keeps answering queries).
//!
//! Two renderings exist:
//! - [`Diagnostics::render_log`]: the plain-text log returned by `compile` (`name:line:col: error: text`, then the
//!   source line and a caret underline).
//! - [`DiagnosticReport`]: a `miette` diagnostic for rich terminal output in the CLI.

use std::collections::HashSet;
use std::fmt;

use miette::{LabeledSpan, NamedSource, Severity, SourceCode, SourceSpan};

use crate::ast::Span;
use crate::source::{SourceFile, SourceSet};

/// A diagnostic with optional location information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompileError {
    pub message: String,
    pub span: Option<Span>,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Syntax, message, Some(span))
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Type, message, Some(span))
    }

    pub fn include(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(ErrorKind::Include, message, span)
    }

    pub fn emit(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(ErrorKind::Emit, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Warning, message, Some(span))
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Everything except warnings blocks code generation.
    pub fn is_error(&self) -> bool {
        self.kind.is_error()
    }
}

/// Diagnostic taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Parse-time; parsing recovers and continues.
    Syntax,
    /// Resolution or type checking; analysis continues with placeholder types.
    Type,
    /// Missing or cyclic `#include`.
    Include,
    /// Code generation failed; no output is produced.
    Emit,
    Warning,
    Error,
}

impl ErrorKind {
    pub fn is_error(self) -> bool {
        !matches!(self, ErrorKind::Warning)
    }

    /// Severity word used in logs.
    pub fn severity(self) -> &'static str {
        if self.is_error() { "error" } else { "warning" }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Type => write!(f, "type error"),
            ErrorKind::Include => write!(f, "include error"),
            ErrorKind::Emit => write!(f, "emit error"),
            ErrorKind::Warning => write!(f, "warning"),
            ErrorKind::Error => write!(f, "error"),
        }
    }
}

// ============================================================================
// Collector
// ============================================================================

/// Append-only, order-preserving diagnostic list.
///
/// ## Notes
/// - Only exact `(kind, message, span)` repeats are dropped; everything else keeps first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<CompileError>,
    seen: HashSet<(ErrorKind, String, Option<Span>)>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: CompileError) {
        let key = (error.kind, error.message.clone(), error.span);
        if self.seen.insert(key) {
            self.items.push(error);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(CompileError::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|e| e.is_error()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompileError> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[CompileError] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<CompileError> {
        self.items
    }

    /// Render every diagnostic as the plain-text compile log.
    pub fn render_log(&self, sources: &SourceSet) -> String {
        let mut out = String::new();
        for error in &self.items {
            render_entry(&mut out, error, sources);
        }
        out
    }
}

impl Extend<CompileError> for Diagnostics {
    fn extend<I: IntoIterator<Item = CompileError>>(&mut self, iter: I) {
        for error in iter {
            self.push(error);
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a CompileError;
    type IntoIter = std::slice::Iter<'a, CompileError>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn render_entry(out: &mut String, error: &CompileError, sources: &SourceSet) {
    use std::fmt::Write;

    let located = error.span.and_then(|span| sources.get(span.source).map(|file| (span, file)));
    match located {
        Some((span, file)) => {
            let start = file.line_column(span.start);
            let _ = writeln!(
                out,
                "{}:{}: {}: {}",
                file.name,
                start,
                error.kind.severity(),
                error.message
            );
            let line = file.line_text(start.line);
            let end = file.line_column(span.end);
            let line_width = line.chars().count();
            let underline_end = if end.line == start.line { end.column } else { line_width };
            let width = underline_end.saturating_sub(start.column).max(1);
            let _ = writeln!(out, "{line}");
            let _ = writeln!(out, "{}{}", " ".repeat(start.column), caret(width));
        }
        None => {
            let _ = writeln!(out, "{}: {}", error.kind.severity(), error.message);
        }
    }
    for note in &error.notes {
        let _ = writeln!(out, "note: {note}");
    }
}

fn caret(width: usize) -> String {
    let mut s = String::with_capacity(width);
    s.push('^');
    s.push_str(&"~".repeat(width - 1));
    s
}

// ============================================================================
// miette rendering
// ============================================================================

/// A [`CompileError`] bound to its source text, renderable with `miette`.
#[derive(Debug)]
pub struct DiagnosticReport {
    message: String,
    kind: ErrorKind,
    source: NamedSource<String>,
    span: Option<SourceSpan>,
    notes: Vec<String>,
    hints: Vec<String>,
}

impl DiagnosticReport {
    pub fn new(error: &CompileError, file: Option<&SourceFile>) -> Self {
        let (source, span) = match (file, error.span) {
            (Some(file), Some(span)) => (
                NamedSource::new(file.name.clone(), file.contents.clone()),
                Some(SourceSpan::from((span.start, span.len()))),
            ),
            (Some(file), None) => (NamedSource::new(file.name.clone(), file.contents.clone()), None),
            (None, _) => (NamedSource::new("<unknown>", String::new()), None),
        };
        Self {
            message: error.message.clone(),
            kind: error.kind,
            source,
            span,
            notes: error.notes.clone(),
            hints: error.hints.clone(),
        }
    }

    /// Build reports for every diagnostic in `diagnostics`.
    pub fn collect(diagnostics: &Diagnostics, sources: &SourceSet) -> Vec<Self> {
        diagnostics
            .iter()
            .map(|e| Self::new(e, e.span.and_then(|s| sources.get(s.source))))
            .collect()
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DiagnosticReport {}

impl miette::Diagnostic for DiagnosticReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind))
    }

    fn severity(&self) -> Option<Severity> {
        Some(if self.kind.is_error() { Severity::Error } else { Severity::Warning })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let lines: Vec<&str> = self
            .notes
            .iter()
            .chain(self.hints.iter())
            .map(String::as_str)
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(Box::new(lines.join("\n")))
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.span.map(|_| &self.source as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.kind.to_string()),
            span,
        ))))
    }
}

// ============================================================================
// Error catalog
// ============================================================================

/// Constructors for common diagnostics, so wording stays consistent across stages.
pub mod errors {
    use super::*;

    pub fn expected_token(expected: &str, found: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("Expected {expected} but found {found}"), span)
    }

    pub fn unexpected_token(found: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("Unexpected {found}"), span)
    }

    pub fn unknown_symbol(name: &str, span: Span) -> CompileError {
        CompileError::type_error(format!("\"{name}\" is not declared"), span)
    }

    pub fn unknown_type(name: &str, span: Span) -> CompileError {
        CompileError::type_error(format!("\"{name}\" is not a type"), span)
    }

    pub fn duplicate_definition(name: &str, span: Span, previous: Option<String>) -> CompileError {
        let error = CompileError::type_error(format!("\"{name}\" is already declared"), span);
        match previous {
            Some(at) => error.with_note(format!("The previous declaration is at {at}")),
            None => error,
        }
    }

    pub fn type_mismatch(expected: &str, found: &str, span: Span) -> CompileError {
        CompileError::type_error(format!("Cannot convert from type \"{found}\" to type \"{expected}\""), span)
    }

    pub fn not_a_variable(name: &str, kind: &str, span: Span) -> CompileError {
        CompileError::type_error(format!("\"{name}\" is a {kind}, not a variable"), span)
    }

    pub fn invalid_unary(op: &str, ty: &str, span: Span) -> CompileError {
        CompileError::type_error(format!("No unary operator \"{op}\" for type \"{ty}\""), span)
    }

    pub fn invalid_binary(op: &str, left: &str, right: &str, span: Span) -> CompileError {
        CompileError::type_error(
            format!("No binary operator \"{op}\" for types \"{left}\" and \"{right}\""),
            span,
        )
    }

    pub fn no_matching_overload(call: &str, span: Span) -> CompileError {
        CompileError::type_error(format!("No matching overload for \"{call}\""), span)
    }

    pub fn wrong_argument_count(what: &str, expected: usize, found: usize, span: Span) -> CompileError {
        let plural = if expected == 1 { "" } else { "s" };
        CompileError::type_error(
            format!("Expected {expected} argument{plural} for {what} but found {found}"),
            span,
        )
    }

    pub fn not_constant(span: Span) -> CompileError {
        CompileError::type_error("Expected a constant expression", span)
    }

    pub fn invalid_array_size(span: Span) -> CompileError {
        CompileError::type_error("Array sizes must be positive constant integers", span)
    }

    pub fn index_out_of_bounds(index: i64, size: usize, span: Span) -> CompileError {
        CompileError::type_error(format!("Index {index} is out of bounds for a size of {size}"), span)
    }

    pub fn reserved_identifier(name: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("\"{name}\" is a reserved word"), span)
    }

    pub fn not_assignable(span: Span) -> CompileError {
        CompileError::type_error("This expression cannot be assigned to", span)
    }

    pub fn missing_extension(name: &str, extension: &str, span: Span) -> CompileError {
        CompileError::type_error(format!("\"{name}\" requires the \"{extension}\" extension"), span)
            .with_hint(format!("Add \"#extension {extension} : enable\" to this file"))
    }

    pub fn missing_include(path: &str, span: Option<Span>) -> CompileError {
        CompileError::include(format!("Could not read file \"{path}\""), span)
    }

    pub fn include_cycle(chain: &[String], span: Option<Span>) -> CompileError {
        CompileError::include(format!("Include cycle: {}", chain.join(" -> ")), span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceId;

    #[test]
    fn collector_dedupes_exact_repeats_only() {
        let span = Span::new(SourceId(0), 0, 1);
        let mut diags = Diagnostics::new();
        diags.push(CompileError::syntax("a", span));
        diags.push(CompileError::syntax("a", span));
        diags.push(CompileError::type_error("a", span));
        diags.push(CompileError::syntax("a", Span::new(SourceId(0), 1, 2)));
        assert_eq!(diags.len(), 3);
        assert_eq!(diags.as_slice()[1].kind, ErrorKind::Type);
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut diags = Diagnostics::new();
        diags.push(CompileError::warning("\"x\" is never used", Span::new(SourceId(0), 0, 1)));
        assert!(!diags.has_errors());
        diags.push(CompileError::emit("boom", None));
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn log_rendering_is_one_based_with_caret() {
        let mut sources = SourceSet::new();
        let id = sources.add("main.glslx", "float x = ;\n");
        let mut diags = Diagnostics::new();
        diags.push(errors::unexpected_token("\";\"", Span::new(id, 10, 11)));
        assert_eq!(
            diags.render_log(&sources),
            "main.glslx:1:11: error: Unexpected \";\"\nfloat x = ;\n          ^\n"
        );
    }

    #[test]
    fn unlocated_errors_render_without_source_line() {
        let mut diags = Diagnostics::new();
        diags.push(CompileError::emit("No entry points", None).with_note("Mark a function with \"export\""));
        assert_eq!(
            diags.render_log(&SourceSet::new()),
            "error: No entry points\nnote: Mark a function with \"export\"\n"
        );
    }
}
