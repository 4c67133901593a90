//! Request and response shapes of the IDE queries.
//!
//! Field names serialize in camelCase so the JSON form matches what editor integrations already speak. Absence is
//! always a `null` field, never an error.

use serde::{Deserialize, Serialize};

use crate::frontend::source;

/// A 0-based line and column (columns count Unicode scalar values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl From<source::LineColumn> for LineColumn {
    fn from(lc: source::LineColumn) -> Self {
        Self {
            line: lc.line,
            column: lc.column,
        }
    }
}

/// An end-exclusive range in a named source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Range {
    pub source: String,
    pub start: LineColumn,
    pub end: LineColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub text: String,
    pub range: Option<Range>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedSymbol {
    pub name: String,
    pub range: Option<Range>,
}

// ============================================================================
// Requests
// ============================================================================

/// A probe point: `line` and `column` are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRequest {
    pub source: String,
    pub line: usize,
    pub column: usize,
}

impl PositionRequest {
    pub fn new(source: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }
}

pub type DefinitionRequest = PositionRequest;
pub type RenameRequest = PositionRequest;
pub type CompletionRequest = PositionRequest;
pub type SignatureRequest = PositionRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipRequest {
    pub source: String,
    pub line: usize,
    pub column: usize,
    /// Answer even where a diagnostic covers the probe.
    #[serde(default)]
    pub ignore_diagnostics: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolsRequest {
    pub source: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipResponse {
    pub tooltip: Option<String>,
    pub range: Option<Range>,
    pub symbol: Option<String>,
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionResponse {
    /// Declaring range; `None` for builtins.
    pub definition: Option<Range>,
    /// The occurrence under the probe.
    pub range: Option<Range>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKindName {
    Variable,
    Function,
    Struct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKindName,
    pub range: Range,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolsResponse {
    pub symbols: Option<Vec<Symbol>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameResponse {
    pub ranges: Option<Vec<Range>>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Variable,
    Function,
    Struct,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub kind: CompletionKind,
    pub name: String,
    pub detail: String,
    pub documentation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub completions: Vec<Completion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub text: String,
    pub arguments: Vec<String>,
    pub documentation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureResponse {
    pub signatures: Vec<Signature>,
    pub active_argument: usize,
    pub active_signature: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_fields() {
        let response = SignatureResponse {
            signatures: vec![],
            active_argument: 1,
            active_signature: 0,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["activeArgument"], 1);

        let request: TooltipRequest =
            serde_json::from_str(r#"{"source":"a","line":0,"column":3,"ignoreDiagnostics":true}"#).unwrap();
        assert!(request.ignore_diagnostics);
    }

    #[test]
    fn test_kinds_are_lowercase() {
        assert_eq!(serde_json::to_string(&CompletionKind::Keyword).unwrap(), "\"keyword\"");
        assert_eq!(serde_json::to_string(&DiagnosticKind::Warning).unwrap(), "\"warning\"");
    }
}
