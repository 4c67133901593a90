//! Conversions between IDE query shapes and LSP types

use tower_lsp::lsp_types::{CompletionItemKind, Position, Range, SymbolKind, Url};

use crate::ide::{self, CompletionKind, SymbolKindName};

pub fn to_position(lc: ide::LineColumn) -> Position {
    Position::new(lc.line as u32, lc.column as u32)
}

pub fn to_range(range: &ide::Range) -> Range {
    Range::new(to_position(range.start), to_position(range.end))
}

/// The source name a document is compiled under: its file path when it has one.
///
/// Includes resolve relative to this name, so a real path makes `#include "common.glslx"` work from an editor.
pub fn source_name(uri: &Url) -> String {
    uri.to_file_path()
        .map(|path| path.to_string_lossy().to_string())
        .unwrap_or_else(|_| uri.to_string())
}

/// The document a source name belongs to.
pub fn source_uri(name: &str, document: &Url) -> Option<Url> {
    if name == source_name(document) {
        return Some(document.clone());
    }
    Url::from_file_path(name).ok()
}

/// Position just past the last character of `source`.
pub fn document_end(source: &str) -> Position {
    let line = source.matches('\n').count();
    let column = source.rsplit('\n').next().map(|last| last.chars().count()).unwrap_or(0);
    Position::new(line as u32, column as u32)
}

pub fn completion_kind(kind: CompletionKind) -> CompletionItemKind {
    match kind {
        CompletionKind::Variable => CompletionItemKind::VARIABLE,
        CompletionKind::Function => CompletionItemKind::FUNCTION,
        CompletionKind::Struct => CompletionItemKind::STRUCT,
        CompletionKind::Keyword => CompletionItemKind::KEYWORD,
    }
}

pub fn symbol_kind(kind: SymbolKindName) -> SymbolKind {
    match kind {
        SymbolKindName::Variable => SymbolKind::VARIABLE,
        SymbolKindName::Function => SymbolKind::FUNCTION,
        SymbolKindName::Struct => SymbolKind::STRUCT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_end() {
        assert_eq!(document_end(""), Position::new(0, 0));
        assert_eq!(document_end("float a;"), Position::new(0, 8));
        assert_eq!(document_end("a\nbc\n"), Position::new(2, 0));
        assert_eq!(document_end("a\nbé"), Position::new(1, 2));
    }

    #[test]
    fn test_to_range() {
        let range = ide::Range {
            source: "a.glslx".to_string(),
            start: ide::LineColumn { line: 1, column: 4 },
            end: ide::LineColumn { line: 1, column: 9 },
        };
        assert_eq!(to_range(&range), Range::new(Position::new(1, 4), Position::new(1, 9)));
    }

    #[test]
    fn test_source_names_round_trip_for_untitled_documents() {
        let uri = Url::parse("untitled:Untitled-1").unwrap();
        let name = source_name(&uri);
        assert_eq!(name, "untitled:Untitled-1");
        assert_eq!(source_uri(&name, &uri), Some(uri));
    }
}
