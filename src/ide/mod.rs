//! glslx language service
//!
//! An [`IdeSession`] answers position-based queries against one analyzed [`CompiledUnit`]. The unit is shared
//! behind an `Arc` and never mutated, so a session is cheap to clone and its queries may run on any thread while
//! the editor keeps typing; a recompile builds a new session.
//!
//! ## Notes
//!
//! - Probe points are 0-based `(line, column)` pairs in a named user source. A probe touches a range when
//!   `start <= probe <= end`, so a cursor right after an identifier still addresses it.
//! - Queries never fail. A probe in an unknown file, past the end, or on nothing answers with `None` fields.
//!
//! ## Module Organization
//!
//! - `protocol.rs` - request/response shapes (serde, camelCase)
//! - `navigate.rs` - tooltip, definition, symbols and rename
//! - `completion.rs` - scope-aware completion
//! - `signature.rs` - signature help for (possibly incomplete) calls

mod completion;
mod navigate;
pub mod protocol;
mod signature;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use protocol::*;

use crate::frontend::ast::Span;
use crate::frontend::loader::{CompileInput, FileAccess};
use crate::frontend::source::SourceId;
use crate::frontend::typechecker::Occurrence;
use crate::frontend::unit::{self, CompiledUnit};

/// Analyze `input` for interactive use.
#[tracing::instrument(skip_all)]
pub fn compile_ide(input: impl Into<CompileInput>, access: &dyn FileAccess) -> IdeSession {
    IdeSession::new(unit::analyze(input, access))
}

/// Read-only query engine over one compiled unit.
#[derive(Debug, Clone)]
pub struct IdeSession {
    unit: Arc<CompiledUnit>,
}

/// A resolved probe point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Probe {
    pub source: SourceId,
    pub offset: usize,
}

impl IdeSession {
    pub fn new(unit: CompiledUnit) -> Self {
        Self { unit: Arc::new(unit) }
    }

    pub fn unit(&self) -> &CompiledUnit {
        &self.unit
    }

    /// Every diagnostic of the compile, errors and warnings, in first-seen order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.unit
            .diagnostics
            .iter()
            .map(|error| Diagnostic {
                kind: if error.is_error() {
                    DiagnosticKind::Error
                } else {
                    DiagnosticKind::Warning
                },
                text: error.message.clone(),
                range: error.span.and_then(|span| self.range(span)),
            })
            .collect()
    }

    /// Declared but never referenced user symbols, in declaration order.
    pub fn unused_symbols(&self) -> Vec<UnusedSymbol> {
        self.unit
            .unused
            .iter()
            .filter_map(|&id| self.unit.symbols.get(id))
            .map(|symbol| UnusedSymbol {
                name: symbol.name.clone(),
                range: self.range(symbol.span),
            })
            .collect()
    }

    // ========================================================================
    // Position helpers
    // ========================================================================

    pub(crate) fn probe(&self, source: &str, line: usize, column: usize) -> Option<Probe> {
        let id = self.unit.source_id(source)?;
        let offset = self.unit.sources.get(id)?.offset(line, column)?;
        Some(Probe { source: id, offset })
    }

    pub(crate) fn range(&self, span: Span) -> Option<Range> {
        let file = self.unit.sources.get(span.source)?;
        Some(Range {
            source: file.name.clone(),
            start: file.line_column(span.start).into(),
            end: file.line_column(span.end).into(),
        })
    }

    /// The name occurrence under `probe`, preferring one that contains it over one that only ends at it.
    pub(crate) fn occurrence_at(&self, probe: Probe) -> Option<&Occurrence> {
        self.unit
            .info
            .occurrences_in(probe.source)
            .filter(|o| o.span.touches(probe.source, probe.offset))
            .min_by_key(|o| (o.span.end == probe.offset, o.span.len()))
    }

    /// Symbols visible at `probe`, innermost first.
    pub(crate) fn visible(&self, probe: Probe) -> Vec<&crate::frontend::symbols::Symbol> {
        self.unit
            .symbols
            .visible_at(probe.source, probe.offset)
            .into_iter()
            .filter_map(|id| self.unit.symbols.get(id))
            .collect()
    }

    /// Whether a diagnostic covers `probe`.
    pub(crate) fn has_diagnostic_at(&self, probe: Probe) -> bool {
        self.unit
            .diagnostics
            .iter()
            .filter_map(|error| error.span)
            .any(|span| span.touches(probe.source, probe.offset))
    }
}
