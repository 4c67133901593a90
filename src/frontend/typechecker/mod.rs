//! Type checker for glslx shaders.
//!
//! Resolves every name to a symbol, assigns a type to every expression, and validates the GLSL ES 1.00 rules
//! glslx enforces. The checker runs in two passes over the prelude plus the merged user program and fills a
//! [`SymbolTable`] that later stages (emitter, IDE queries) read without re-deriving anything from the AST.
//!
//! ## Notes
//!
//! - **Two-pass model**: the first pass ([`collect`]) registers structs, global variables and function signatures
//!   in the module scope, so top-level symbols may be referenced before their declaration. The second pass checks
//!   initializers and function bodies; block-scoped variables must be declared before use.
//! - **Error accumulation**: errors are collected, never returned early. An invalid expression gets
//!   [`ResolvedType::Unknown`], which matches every type so one mistake does not cascade.
//! - **Occurrences**: every declaring or referencing name range is recorded once in [`TypeCheckInfo`]. Rename,
//!   definition, tooltips and the emitter's renamer all work from that list.
//!
//! ## What is validated
//!
//! - All referenced types and symbols are known; reserved names are not declared
//! - Exact type agreement at initializers, assignments, calls, returns and conditions
//! - Overload resolution, constructor component counts, swizzles and index bounds
//! - Storage qualifier placement, l-values, `break`/`continue` placement
//! - Entry point signatures, extension-gated builtins and static recursion
//!
//! ## See also
//!
//! - [`symbols`](super::symbols) – symbol table and scope management
//! - [`diagnostics`](super::diagnostics) – error types and log rendering

mod check_decl;
mod check_expr;
mod check_stmt;
mod collect;
pub(crate) mod const_eval;
mod usage;

pub use const_eval::ConstValue;
#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::frontend::ast::*;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::source::{SourceId, SourceSet};
use crate::frontend::symbols::*;
use glslx_core::lang::extensions::{self, ExtensionId};
use glslx_core::lang::reserved;
use glslx_core::lang::types as builtin_types;

/// One name range bound to a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub span: Span,
    pub symbol: SymbolId,
    pub is_declaration: bool,
}

/// Capture reusable typechecking output for later stages.
///
/// ## Notes
/// - Expression types are keyed by span; a parenthesized expression shares the span of its contents.
/// - Occurrences are stored in the order they were resolved and indexed by span.
#[derive(Debug, Default, Clone)]
pub struct TypeCheckInfo {
    pub expr_types: HashMap<Span, ResolvedType>,
    pub occurrences: Vec<Occurrence>,
    occurrence_index: HashMap<Span, usize>,
    /// Exported functions, in declaration order.
    pub entry_points: Vec<SymbolId>,
    /// Extensions turned on by `#extension NAME : enable|require|warn`.
    pub enabled_extensions: BTreeSet<ExtensionId>,
}

impl TypeCheckInfo {
    pub fn expr_type(&self, span: Span) -> Option<&ResolvedType> {
        self.expr_types.get(&span)
    }

    /// The symbol whose name occupies exactly `span`.
    pub fn symbol_at(&self, span: Span) -> Option<SymbolId> {
        self.occurrence_index.get(&span).map(|&i| self.occurrences[i].symbol)
    }

    pub fn occurrence_at(&self, span: Span) -> Option<&Occurrence> {
        self.occurrence_index.get(&span).map(|&i| &self.occurrences[i])
    }

    /// Occurrences in one file.
    pub fn occurrences_in(&self, source: SourceId) -> impl Iterator<Item = &Occurrence> {
        self.occurrences.iter().filter(move |o| o.span.source == source)
    }
}

/// Result of a full check.
#[derive(Debug, Clone)]
pub struct CheckOutput {
    pub symbols: SymbolTable,
    pub info: TypeCheckInfo,
    pub errors: Vec<CompileError>,
    /// User symbols with no references, in declaration order.
    pub unused: Vec<SymbolId>,
}

/// Type checker state.
///
/// Create with [`TypeChecker::new`], then call [`check`](Self::check).
pub struct TypeChecker<'a> {
    pub(crate) sources: &'a SourceSet,
    /// Symbol table populated during the first pass.
    pub(crate) symbols: SymbolTable,
    /// Accumulated compile errors (non-fatal).
    pub(crate) errors: Vec<CompileError>,
    /// Reusable typechecker output for downstream stages.
    pub(crate) type_info: TypeCheckInfo,
    /// Function declaration name span -> its symbol (prototypes and definitions may share one).
    pub(crate) function_ids: HashMap<Span, SymbolId>,
    /// Function whose body is being checked.
    pub(crate) current_function: Option<SymbolId>,
    pub(crate) current_return: ResolvedType,
    /// Caller -> (callee, call span) for user functions.
    pub(crate) call_graph: BTreeMap<SymbolId, Vec<(SymbolId, Span)>>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(sources: &'a SourceSet) -> Self {
        Self {
            sources,
            symbols: SymbolTable::new(),
            errors: Vec::new(),
            type_info: TypeCheckInfo::default(),
            function_ids: HashMap::new(),
            current_function: None,
            current_return: ResolvedType::VOID,
            call_graph: BTreeMap::new(),
        }
    }

    /// Check the prelude and the user program as one module.
    ///
    /// ## Parameters
    ///
    /// - `prelude`: builtin declarations (collected only; they have no bodies).
    /// - `program`: user declarations with includes already spliced in.
    ///
    /// ## Returns
    ///
    /// The filled symbol table and type info plus every error found. Checking always runs to completion.
    #[tracing::instrument(skip_all, fields(declarations = program.declarations.len()))]
    pub fn check(mut self, prelude: &Program, program: &Program) -> CheckOutput {
        self.collect_program(prelude);
        self.collect_program(program);
        self.check_program(program);
        self.check_recursion();
        let unused = self.unused_symbols();
        CheckOutput {
            symbols: self.symbols,
            info: self.type_info,
            errors: self.errors,
            unused,
        }
    }

    // ========================================================================
    // Recording
    // ========================================================================

    pub(crate) fn record_expr_type(&mut self, span: Span, ty: ResolvedType) {
        self.type_info.expr_types.insert(span, ty);
    }

    /// Record a name occurrence once; references also count as uses of the symbol.
    pub(crate) fn record_occurrence(&mut self, span: Span, symbol: SymbolId, is_declaration: bool) {
        if self.type_info.occurrence_index.contains_key(&span) {
            return;
        }
        self.type_info
            .occurrence_index
            .insert(span, self.type_info.occurrences.len());
        self.type_info.occurrences.push(Occurrence {
            span,
            symbol,
            is_declaration,
        });
        if !is_declaration {
            self.symbols.add_reference(symbol, span);
        }
    }

    pub(crate) fn error(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    // ========================================================================
    // Declaring names
    // ========================================================================

    pub(crate) fn is_builtin_span(&self, span: Span) -> bool {
        self.sources.get(span.source).is_some_and(|f| f.is_builtin)
    }

    /// Human-readable `file:line:column` for notes.
    pub(crate) fn location(&self, span: Span) -> Option<String> {
        let file = self.sources.get(span.source)?;
        Some(format!("{}:{}", file.name, file.line_column(span.start)))
    }

    /// Define a non-function symbol in the current scope, reporting reserved names and redeclarations.
    pub(crate) fn declare(&mut self, symbol: Symbol) -> SymbolId {
        let span = symbol.span;
        let name = symbol.name.clone();
        let is_builtin = self.is_builtin_span(span);
        if !is_builtin && reserved::is_reserved_identifier(&name) {
            self.error(errors::reserved_identifier(&name, span));
        } else if let Some(&previous) = self.symbols.lookup_local(&name).first() {
            let at = self.symbols.get(previous).and_then(|p| self.location(p.span));
            self.error(errors::duplicate_definition(&name, span, at));
        }
        let id = self.symbols.define(symbol.builtin(is_builtin));
        self.record_occurrence(span, id, true);
        id
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Resolve a written type (plus an optional array suffix) to a [`ResolvedType`].
    pub(crate) fn resolve_type(&mut self, ty: &TypeRef, array_size: Option<&Spanned<Expr>>) -> ResolvedType {
        let base = self.resolve_type_name(&ty.name);
        match array_size {
            None => base,
            Some(size) => {
                let size = self.array_size(size);
                if base.is_unknown() {
                    ResolvedType::Unknown
                } else {
                    ResolvedType::Array(Box::new(base), size)
                }
            }
        }
    }

    pub(crate) fn resolve_type_name(&mut self, name: &Spanned<Ident>) -> ResolvedType {
        if let Some(id) = builtin_types::from_str(&name.node) {
            return ResolvedType::Builtin(id);
        }
        let found = self
            .symbols
            .lookup(&name.node)
            .and_then(|id| self.symbols.get(id).map(|s| (id, s.as_struct().is_some())));
        match found {
            Some((id, true)) => {
                self.record_occurrence(name.span, id, false);
                ResolvedType::Struct(id, name.node.clone())
            }
            Some((id, false)) => {
                self.record_occurrence(name.span, id, false);
                self.error(errors::unknown_type(&name.node, name.span));
                ResolvedType::Unknown
            }
            None => {
                self.error(errors::unknown_type(&name.node, name.span));
                ResolvedType::Unknown
            }
        }
    }

    fn array_size(&mut self, size: &Spanned<Expr>) -> Option<usize> {
        self.check_expr(size);
        match self.const_value(size) {
            Some(ConstValue::Int(n)) if n > 0 => usize::try_from(n).ok(),
            _ => {
                self.error(errors::invalid_array_size(size.span));
                None
            }
        }
    }

    /// Require `found` to equal `expected`, reporting a mismatch at `span`.
    pub(crate) fn expect_type(&mut self, expected: &ResolvedType, found: &ResolvedType, span: Span) -> bool {
        if expected.matches(found) {
            return true;
        }
        self.error(errors::type_mismatch(&expected.to_string(), &found.to_string(), span));
        false
    }

    // ========================================================================
    // Extensions
    // ========================================================================

    /// Report use of an extension builtin whose extension is not enabled.
    pub(crate) fn check_extension_use(&mut self, id: SymbolId, span: Span) {
        let Some(symbol) = self.symbols.get(id) else {
            return;
        };
        if !symbol.is_builtin {
            return;
        }
        if let Some(extension) = extensions::gating(&symbol.name) {
            if !self.type_info.enabled_extensions.contains(&extension) {
                let name = symbol.name.clone();
                self.error(errors::missing_extension(&name, extensions::as_str(extension), span));
            }
        }
    }
}
