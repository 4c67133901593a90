//! Completion: visible symbols, struct members and context keywords.

use std::collections::BTreeMap;

use crate::frontend::lexer::{Token, TokenKind};
use crate::frontend::symbols::{ResolvedType, ScopeKind, Symbol, SymbolKind};
use glslx_core::lang::keywords::{self, KeywordUsage};
use glslx_core::lang::punctuation::PunctuationId;
use glslx_core::lang::types::BUILTIN_TYPES;

use super::{Completion, CompletionKind, CompletionRequest, CompletionResponse, IdeSession, Probe};

impl IdeSession {
    /// Names that may be typed at the probe.
    ///
    /// ## Notes
    /// - After `.` only the fields of a struct-typed base are offered.
    /// - Otherwise: visible symbols (inner declarations shadow outer ones, overloads collapse to one entry), then
    ///   keywords for the context and the builtin type names.
    /// - Inside a comment nothing is offered.
    #[tracing::instrument(skip_all, fields(source = %request.source, line = request.line, column = request.column))]
    pub fn completion_query(&self, request: &CompletionRequest) -> CompletionResponse {
        let Some(probe) = self.probe(&request.source, request.line, request.column) else {
            return CompletionResponse::default();
        };
        let Some(lexed) = self.unit.lexed.get(&probe.source) else {
            return CompletionResponse::default();
        };
        if lexed
            .comments
            .iter()
            .any(|c| c.span.start < probe.offset && probe.offset <= c.span.end)
        {
            return CompletionResponse::default();
        }

        let completions = match member_access_dot(&lexed.tokens, probe.offset) {
            Some(dot) => self.member_completions(probe, &lexed.tokens, dot),
            None => self.scope_completions(probe),
        };
        CompletionResponse { completions }
    }

    fn member_completions(&self, probe: Probe, tokens: &[Token], dot: usize) -> Vec<Completion> {
        let dot_start = tokens[dot].span.start;
        let typed_base = self
            .unit
            .info
            .expr_types
            .iter()
            .filter(|(span, _)| span.source == probe.source && span.end == dot_start)
            .min_by_key(|(span, _)| span.len())
            .map(|(_, ty)| ty.clone());

        // The statement may not have parsed yet; fall back to the variable named right before the dot.
        let base = typed_base.or_else(|| {
            let TokenKind::Ident(name) = &tokens.get(dot.checked_sub(1)?)?.kind else {
                return None;
            };
            self.visible(probe)
                .into_iter()
                .find(|s| s.name == *name)
                .and_then(Symbol::as_variable)
                .map(|v| v.ty.clone())
        });

        let Some(ResolvedType::Struct(id, _)) = base else {
            return Vec::new();
        };
        let Some(info) = self.unit.symbols.get(id).and_then(Symbol::as_struct) else {
            return Vec::new();
        };
        info.fields
            .iter()
            .map(|field| Completion {
                kind: CompletionKind::Variable,
                name: field.name.clone(),
                detail: format!("{} {}", field.ty, field.name),
                documentation: self
                    .unit
                    .symbols
                    .get(field.symbol)
                    .and_then(|s| s.doc.clone())
                    .unwrap_or_default(),
            })
            .collect()
    }

    fn scope_completions(&self, probe: Probe) -> Vec<Completion> {
        let mut by_name: BTreeMap<String, Completion> = BTreeMap::new();
        let visible = self.visible(probe);
        for symbol in &visible {
            if by_name.contains_key(&symbol.name) {
                continue;
            }
            let overloads = visible.iter().filter(|s| s.name == symbol.name).count();
            let mut detail = symbol.signature();
            if overloads > 1 {
                detail.push_str(&format!(" (+{} overloads)", overloads - 1));
            }
            by_name.insert(
                symbol.name.clone(),
                Completion {
                    kind: match symbol.kind {
                        SymbolKind::Variable(_) => CompletionKind::Variable,
                        SymbolKind::Function(_) => CompletionKind::Function,
                        SymbolKind::Struct(_) => CompletionKind::Struct,
                    },
                    name: symbol.name.clone(),
                    detail,
                    documentation: symbol.doc.clone().unwrap_or_default(),
                },
            );
        }

        let at_module_level = self
            .unit
            .symbols
            .scope(self.unit.symbols.scope_at(probe.source, probe.offset))
            .is_none_or(|scope| scope.kind == ScopeKind::Module);
        let usages: &[KeywordUsage] = if at_module_level {
            &[KeywordUsage::TopLevel]
        } else {
            &[KeywordUsage::Statement, KeywordUsage::Expression]
        };
        for usage in usages {
            for info in keywords::keywords_for(*usage) {
                by_name.entry(info.canonical.to_string()).or_insert_with(|| Completion {
                    kind: CompletionKind::Keyword,
                    name: info.canonical.to_string(),
                    detail: "keyword".to_string(),
                    documentation: info.description.to_string(),
                });
            }
        }
        for ty in BUILTIN_TYPES {
            by_name.entry(ty.canonical.to_string()).or_insert_with(|| Completion {
                kind: CompletionKind::Keyword,
                name: ty.canonical.to_string(),
                detail: "type".to_string(),
                documentation: ty.description.to_string(),
            });
        }
        by_name.into_values().collect()
    }
}

/// Index of the `.` the probe completes after, skipping a partially typed name.
fn member_access_dot(tokens: &[Token], offset: usize) -> Option<usize> {
    let mut last = tokens
        .iter()
        .rposition(|t| t.span.end <= offset && !matches!(t.kind, TokenKind::Eof))?;
    if is_word(&tokens[last].kind) && tokens[last].span.end == offset {
        last = last.checked_sub(1)?;
    }
    matches!(tokens[last].kind, TokenKind::Punctuation(PunctuationId::Dot)).then_some(last)
}

fn is_word(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Ident(_) | TokenKind::Keyword(_))
}
