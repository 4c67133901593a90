//! Tooltip, go-to-definition, document symbols and rename.

use crate::frontend::symbols::{ScopeKind, SymbolKind};

use super::{
    DefinitionRequest, DefinitionResponse, IdeSession, RenameRequest, RenameResponse, Symbol, SymbolKindName,
    SymbolsRequest, SymbolsResponse, TooltipRequest, TooltipResponse,
};

impl IdeSession {
    /// Describe what is under the probe.
    ///
    /// ## Notes
    /// - A symbol occurrence yields its declaration text and documentation.
    /// - Anywhere else the innermost typed expression yields its type.
    /// - Unless `ignore_diagnostics` is set, a probe covered by a diagnostic answers with nulls so the editor
    ///   shows the diagnostic instead.
    #[tracing::instrument(skip_all, fields(source = %request.source, line = request.line, column = request.column))]
    pub fn tooltip_query(&self, request: &TooltipRequest) -> TooltipResponse {
        let Some(probe) = self.probe(&request.source, request.line, request.column) else {
            return TooltipResponse::default();
        };
        if !request.ignore_diagnostics && self.has_diagnostic_at(probe) {
            return TooltipResponse::default();
        }

        if let Some(occurrence) = self.occurrence_at(probe) {
            if let Some(symbol) = self.unit.symbols.get(occurrence.symbol) {
                return TooltipResponse {
                    tooltip: Some(symbol.signature()),
                    range: self.range(occurrence.span),
                    symbol: Some(symbol.name.clone()),
                    documentation: symbol.doc.clone(),
                };
            }
        }

        let innermost = self
            .unit
            .info
            .expr_types
            .iter()
            .filter(|(span, ty)| span.touches(probe.source, probe.offset) && !ty.is_unknown())
            .min_by_key(|(span, _)| (span.len(), span.start));
        match innermost {
            Some((span, ty)) => TooltipResponse {
                tooltip: Some(ty.to_string()),
                range: self.range(*span),
                symbol: None,
                documentation: None,
            },
            None => TooltipResponse::default(),
        }
    }

    /// Where the symbol under the probe is declared.
    #[tracing::instrument(skip_all, fields(source = %request.source, line = request.line, column = request.column))]
    pub fn definition_query(&self, request: &DefinitionRequest) -> DefinitionResponse {
        let Some(probe) = self.probe(&request.source, request.line, request.column) else {
            return DefinitionResponse::default();
        };
        let Some(occurrence) = self.occurrence_at(probe) else {
            return DefinitionResponse::default();
        };
        let Some(symbol) = self.unit.symbols.get(occurrence.symbol) else {
            return DefinitionResponse::default();
        };
        DefinitionResponse {
            definition: if symbol.is_builtin { None } else { self.range(symbol.span) },
            range: self.range(occurrence.span),
            symbol: Some(symbol.name.clone()),
        }
    }

    /// Every top-level symbol declared in one source, in source order.
    #[tracing::instrument(skip_all, fields(source = %request.source))]
    pub fn symbols_query(&self, request: &SymbolsRequest) -> SymbolsResponse {
        let Some(source) = self.unit.source_id(&request.source) else {
            return SymbolsResponse::default();
        };
        let mut found: Vec<_> = self
            .unit
            .symbols
            .iter()
            .filter(|(_, s)| !s.is_builtin && s.span.source == source)
            .filter(|(_, s)| {
                self.unit
                    .symbols
                    .scope(s.scope)
                    .is_some_and(|scope| scope.kind == ScopeKind::Module)
            })
            .collect();
        found.sort_by_key(|(_, s)| s.span);

        let symbols = found
            .into_iter()
            .filter_map(|(_, s)| {
                Some(Symbol {
                    name: s.name.clone(),
                    kind: match s.kind {
                        SymbolKind::Variable(_) => SymbolKindName::Variable,
                        SymbolKind::Function(_) => SymbolKindName::Function,
                        SymbolKind::Struct(_) => SymbolKindName::Struct,
                    },
                    range: self.range(s.span)?,
                })
            })
            .collect();
        SymbolsResponse { symbols: Some(symbols) }
    }

    /// Every range naming the symbol under the probe: declarations and uses, across all files.
    ///
    /// ## Notes
    /// - Builtins cannot be renamed; the response is all nulls.
    #[tracing::instrument(skip_all, fields(source = %request.source, line = request.line, column = request.column))]
    pub fn rename_query(&self, request: &RenameRequest) -> RenameResponse {
        let Some(probe) = self.probe(&request.source, request.line, request.column) else {
            return RenameResponse::default();
        };
        let Some(symbol) = self
            .occurrence_at(probe)
            .and_then(|o| self.unit.symbols.get(o.symbol))
            .filter(|s| !s.is_builtin)
        else {
            return RenameResponse::default();
        };

        let mut spans: Vec<_> = symbol.declarations.iter().chain(&symbol.references).copied().collect();
        spans.sort();
        spans.dedup();
        RenameResponse {
            ranges: Some(spans.into_iter().filter_map(|span| self.range(span)).collect()),
            symbol: Some(symbol.name.clone()),
        }
    }
}
