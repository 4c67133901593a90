//! Signature help.
//!
//! The call is found by scanning tokens backwards from the probe to the unmatched `(`, so calls that do not parse
//! yet (`mix(a, |`) still get help.

use crate::frontend::ast::Span;
use crate::frontend::lexer::{Token, TokenKind};
use crate::frontend::symbols::{Symbol, SymbolId, SymbolKind};
use glslx_core::lang::punctuation::PunctuationId;

use super::{IdeSession, Signature, SignatureRequest, SignatureResponse};

/// The call the probe sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenCall {
    callee: String,
    callee_span: Span,
    /// Number of top-level commas between `(` and the probe.
    active_argument: usize,
}

impl IdeSession {
    /// Overloads of the call around the probe.
    ///
    /// ## Notes
    /// - Struct constructors get a synthesized signature listing the fields.
    /// - The active signature is the overload the checker resolved, or else the first one with enough
    ///   parameters for the active argument.
    #[tracing::instrument(skip_all, fields(source = %request.source, line = request.line, column = request.column))]
    pub fn signature_query(&self, request: &SignatureRequest) -> SignatureResponse {
        let Some(probe) = self.probe(&request.source, request.line, request.column) else {
            return SignatureResponse::default();
        };
        let Some(lexed) = self.unit.lexed.get(&probe.source) else {
            return SignatureResponse::default();
        };
        let Some(call) = open_call(&lexed.tokens, probe.offset) else {
            return SignatureResponse::default();
        };

        let candidates: Vec<(SymbolId, &Symbol)> = self
            .unit
            .symbols
            .visible_at(probe.source, probe.offset)
            .into_iter()
            .filter_map(|id| Some((id, self.unit.symbols.get(id)?)))
            .filter(|(_, s)| s.name == call.callee)
            .filter(|(_, s)| !matches!(s.kind, SymbolKind::Variable(_)))
            .collect();
        if candidates.is_empty() {
            return SignatureResponse::default();
        }

        let resolved = self.unit.info.symbol_at(call.callee_span);
        let active_signature = candidates
            .iter()
            .position(|(id, _)| Some(*id) == resolved)
            .or_else(|| {
                candidates
                    .iter()
                    .position(|(_, s)| arity(s) > call.active_argument)
            })
            .unwrap_or(0);

        SignatureResponse {
            signatures: candidates.iter().filter_map(|(_, s)| signature_of(s)).collect(),
            active_argument: call.active_argument,
            active_signature,
        }
    }
}

fn arity(symbol: &Symbol) -> usize {
    match &symbol.kind {
        SymbolKind::Function(info) => info.params.len(),
        SymbolKind::Struct(info) => info.fields.len(),
        SymbolKind::Variable(_) => 0,
    }
}

fn signature_of(symbol: &Symbol) -> Option<Signature> {
    let documentation = symbol.doc.clone().unwrap_or_default();
    match &symbol.kind {
        SymbolKind::Function(info) => Some(Signature {
            text: info.signature(&symbol.name),
            arguments: info.argument_texts(),
            documentation,
        }),
        SymbolKind::Struct(info) => {
            let arguments: Vec<String> = info.fields.iter().map(|f| format!("{} {}", f.ty, f.name)).collect();
            Some(Signature {
                text: format!("{0} {0}({1})", symbol.name, arguments.join(", ")),
                arguments,
                documentation,
            })
        }
        SymbolKind::Variable(_) => None,
    }
}

fn punct(token: &Token) -> Option<PunctuationId> {
    match token.kind {
        TokenKind::Punctuation(id) => Some(id),
        _ => None,
    }
}

/// Scan back from `offset` to the `(` of the innermost call that is still open.
///
/// Parentheses not preceded by a name (grouping) and brackets are stepped out of; `;`, `{` and `}` end the search.
fn open_call(tokens: &[Token], offset: usize) -> Option<OpenCall> {
    let end = tokens
        .iter()
        .position(|t| t.span.start >= offset || matches!(t.kind, TokenKind::Eof))
        .unwrap_or(tokens.len());
    let mut depth = 0usize;
    let mut commas = 0usize;
    for index in (0..end).rev() {
        match punct(&tokens[index]) {
            Some(PunctuationId::RParen | PunctuationId::RBracket) => depth += 1,
            Some(PunctuationId::LParen | PunctuationId::LBracket) if depth > 0 => depth -= 1,
            Some(PunctuationId::LParen) => {
                if let Some(Token {
                    kind: TokenKind::Ident(name),
                    span,
                    ..
                }) = index.checked_sub(1).and_then(|i| tokens.get(i))
                {
                    return Some(OpenCall {
                        callee: name.clone(),
                        callee_span: *span,
                        active_argument: commas,
                    });
                }
                if matches!(index.checked_sub(1).map(|i| &tokens[i].kind), Some(TokenKind::Keyword(_))) {
                    return None;
                }
                commas = 0;
            }
            Some(PunctuationId::LBracket) => commas = 0,
            Some(PunctuationId::Comma) if depth == 0 => commas += 1,
            Some(PunctuationId::Semicolon | PunctuationId::LBrace | PunctuationId::RBrace) => return None,
            _ => {}
        }
    }
    None
}
