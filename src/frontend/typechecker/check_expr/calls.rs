//! Check function calls and pick overloads.
//!
//! A call whose callee names a builtin type or a struct is a constructor and is handed to
//! [`constructors`](super::constructors). Everything else resolves against the function overloads visible in the
//! innermost scope that declares the name. Overloads must match argument types exactly.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::*;
use glslx_core::lang::types as builtin_types;

use super::TypeChecker;

impl TypeChecker<'_> {
    /// Type-check a call expression and return the called overload's return type.
    pub(in crate::frontend::typechecker::check_expr) fn check_call(
        &mut self,
        callee: &Spanned<Ident>,
        args: &[Spanned<Expr>],
        span: Span,
    ) -> ResolvedType {
        if let Some(id) = builtin_types::from_str(&callee.node) {
            return self.check_builtin_constructor(id, args, span);
        }

        let candidates: Vec<SymbolId> = self.symbols.lookup_all(&callee.node).to_vec();
        let Some(&first) = candidates.first() else {
            self.error(errors::unknown_symbol(&callee.node, callee.span));
            self.check_args(args);
            return ResolvedType::Unknown;
        };

        let kind = self.symbols.get(first).map(Symbol::kind_name);
        match kind {
            Some("struct") => {
                self.record_occurrence(callee.span, first, false);
                return self.check_struct_constructor(first, callee, args, span);
            }
            Some("variable") => {
                self.record_occurrence(callee.span, first, false);
                self.error(CompileError::type_error(
                    format!("\"{}\" is a variable, not a function", callee.node),
                    callee.span,
                ));
                self.check_args(args);
                return ResolvedType::Unknown;
            }
            _ => {}
        }

        let arg_types = self.check_args(args);
        let chosen = self.pick_overload(&candidates, &arg_types);
        let Some(id) = chosen else {
            self.record_occurrence(callee.span, first, false);
            let rendered = format!(
                "{}({})",
                callee.node,
                arg_types.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            );
            let mut error = errors::no_matching_overload(&rendered, callee.span);
            for &candidate in &candidates {
                if let Some(f) = self.symbols.get(candidate).and_then(Symbol::as_function) {
                    error = error.with_note(format!("Candidate: {}", f.signature(&callee.node)));
                }
            }
            self.error(error);
            return ResolvedType::Unknown;
        };

        self.record_occurrence(callee.span, id, false);
        self.check_extension_use(id, callee.span);

        let Some(symbol) = self.symbols.get(id) else {
            return ResolvedType::Unknown;
        };
        let is_builtin = symbol.is_builtin;
        let is_imported = symbol.is_imported();
        let Some(info) = symbol.as_function().cloned() else {
            return ResolvedType::Unknown;
        };

        if !is_builtin && !is_imported && !info.has_body {
            self.error(CompileError::type_error(
                format!("Missing a definition for function \"{}\"", callee.node),
                callee.span,
            ));
        }

        for (arg, param) in args.iter().zip(&info.params) {
            if param.direction != ParamDirection::In {
                self.check_lvalue(arg);
            }
        }

        if let Some(caller) = self.current_function {
            if !is_builtin {
                self.call_graph.entry(caller).or_default().push((id, callee.span));
            }
        }

        info.return_type
    }

    pub(in crate::frontend::typechecker::check_expr) fn check_args(
        &mut self,
        args: &[Spanned<Expr>],
    ) -> Vec<ResolvedType> {
        args.iter().map(|arg| self.check_expr(arg)).collect()
    }

    /// The overload whose parameter types equal the argument types.
    ///
    /// When an argument failed to check, the first overload with the right arity is taken so the error does not
    /// repeat as an overload failure.
    fn pick_overload(&self, candidates: &[SymbolId], arg_types: &[ResolvedType]) -> Option<SymbolId> {
        let functions = candidates
            .iter()
            .filter_map(|&id| self.symbols.get(id).and_then(Symbol::as_function).map(|f| (id, f)));
        let mut fallback = None;
        for (id, f) in functions {
            if f.params.len() != arg_types.len() {
                continue;
            }
            if f.param_types().zip(arg_types).all(|(p, a)| p == a) {
                return Some(id);
            }
            if fallback.is_none() && f.param_types().zip(arg_types).all(|(p, a)| p.matches(a)) {
                fallback = Some(id);
            }
        }
        if arg_types.iter().any(ResolvedType::is_unknown) { fallback } else { None }
    }
}
