//! Convert glslx diagnostics to LSP diagnostics

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, DiagnosticTag, Range, Url};

use crate::ide::{self, DiagnosticKind, IdeSession};

use super::convert::{source_name, to_range};

const SOURCE: &str = "glslx";

fn severity(kind: DiagnosticKind) -> DiagnosticSeverity {
    match kind {
        DiagnosticKind::Error => DiagnosticSeverity::ERROR,
        DiagnosticKind::Warning => DiagnosticSeverity::WARNING,
    }
}

fn diagnostic(range: Range, severity: DiagnosticSeverity, message: String) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(severity),
        code: None,
        code_description: None,
        source: Some(SOURCE.to_string()),
        message,
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Convert one compile diagnostic for the document at `uri`.
///
/// Problems located in another file (an include) are summarized at the top of the document, naming the file.
pub fn to_lsp_diagnostic(diag: &ide::Diagnostic, uri: &Url) -> Diagnostic {
    let document = source_name(uri);
    match &diag.range {
        Some(range) if range.source == document => diagnostic(to_range(range), severity(diag.kind), diag.text.clone()),
        Some(range) => diagnostic(
            Range::default(),
            severity(diag.kind),
            format!("{} ({}:{})", diag.text, range.source, range.start.line + 1),
        ),
        None => diagnostic(Range::default(), severity(diag.kind), diag.text.clone()),
    }
}

/// Unused symbols become faded hints.
pub fn unused_symbol_hint(unused: &ide::UnusedSymbol, uri: &Url) -> Option<Diagnostic> {
    let range = unused.range.as_ref().filter(|r| r.source == source_name(uri))?;
    let mut hint = diagnostic(
        to_range(range),
        DiagnosticSeverity::HINT,
        format!("\"{}\" is never used", unused.name),
    );
    hint.tags = Some(vec![DiagnosticTag::UNNECESSARY]);
    Some(hint)
}

/// Everything to publish for the document at `uri`.
pub fn collect(session: &IdeSession, uri: &Url) -> Vec<Diagnostic> {
    let mut out: Vec<Diagnostic> = session
        .diagnostics()
        .iter()
        .map(|d| to_lsp_diagnostic(d, uri))
        .collect();
    out.extend(session.unused_symbols().iter().filter_map(|u| unused_symbol_hint(u, uri)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::loader::{Input, NoFileAccess};
    use crate::ide::compile_ide;

    fn untitled() -> Url {
        Url::parse("untitled:shader").unwrap()
    }

    #[test]
    fn test_error_maps_to_its_range() {
        let uri = untitled();
        let session = compile_ide(Input::new(source_name(&uri), "float x = ;"), &NoFileAccess);
        let diags = collect(&session, &uri);
        assert!(!diags.is_empty());
        assert_eq!(diags[0].severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diags[0].range.start.line, 0);
        assert_eq!(diags[0].source.as_deref(), Some("glslx"));
    }

    #[test]
    fn test_unused_symbols_are_unnecessary_hints() {
        let uri = untitled();
        let source = "struct S { float a; };\nexport void main() { gl_FragColor = vec4(1.0); }\n";
        let session = compile_ide(Input::new(source_name(&uri), source), &NoFileAccess);
        let diags = collect(&session, &uri);
        let hint = diags
            .iter()
            .find(|d| d.severity == Some(DiagnosticSeverity::HINT))
            .unwrap();
        assert_eq!(hint.message, "\"S\" is never used");
        assert_eq!(hint.tags, Some(vec![DiagnosticTag::UNNECESSARY]));
    }

    #[test]
    fn test_problem_in_other_file_is_summarized() {
        let diag = ide::Diagnostic {
            kind: DiagnosticKind::Error,
            text: "Undefined symbol \"x\"".to_string(),
            range: Some(ide::Range {
                source: "/shaders/common.glslx".to_string(),
                start: ide::LineColumn { line: 4, column: 2 },
                end: ide::LineColumn { line: 4, column: 3 },
            }),
        };
        let lsp = to_lsp_diagnostic(&diag, &untitled());
        assert_eq!(lsp.range, Range::default());
        assert_eq!(lsp.message, "Undefined symbol \"x\" (/shaders/common.glslx:5)");
    }
}
