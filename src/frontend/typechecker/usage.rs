//! Whole-program checks that run after every body has been checked.

use std::collections::BTreeSet;

use crate::frontend::ast::{Linkage, Span};
use crate::frontend::diagnostics::CompileError;
use crate::frontend::symbols::*;

use super::TypeChecker;

impl TypeChecker<'_> {
    /// Report static recursion; GLSL ES does not allow it.
    ///
    /// Each cycle is reported once, at the call that closes it.
    pub(crate) fn check_recursion(&mut self) {
        let mut finished = BTreeSet::new();
        let mut reported = BTreeSet::new();
        let roots: Vec<SymbolId> = self.call_graph.keys().copied().collect();
        for root in roots {
            let mut path = Vec::new();
            self.visit_calls(root, &mut path, &mut finished, &mut reported);
        }
    }

    fn visit_calls(
        &mut self,
        function: SymbolId,
        path: &mut Vec<SymbolId>,
        finished: &mut BTreeSet<SymbolId>,
        reported: &mut BTreeSet<SymbolId>,
    ) {
        if finished.contains(&function) {
            return;
        }
        path.push(function);
        let calls: Vec<(SymbolId, Span)> = self.call_graph.get(&function).cloned().unwrap_or_default();
        for (callee, span) in calls {
            if let Some(start) = path.iter().position(|&f| f == callee) {
                if reported.insert(callee) {
                    let mut chain: Vec<String> = path[start..].iter().map(|&f| self.symbol_name(f)).collect();
                    chain.push(self.symbol_name(callee));
                    self.error(CompileError::type_error(
                        format!("Recursive function calls are not allowed: {}", chain.join(" -> ")),
                        span,
                    ));
                }
                continue;
            }
            self.visit_calls(callee, path, finished, reported);
        }
        path.pop();
        finished.insert(function);
    }

    fn symbol_name(&self, id: SymbolId) -> String {
        self.symbols.get(id).map(|s| s.name.clone()).unwrap_or_default()
    }

    /// User symbols nobody references: internal globals, locals, functions and structs.
    ///
    /// ## Notes
    /// - Exported and imported symbols are part of the shader interface and never count as unused.
    /// - Parameters and fields are left out; an unused parameter is often required by a signature.
    pub(crate) fn unused_symbols(&self) -> Vec<SymbolId> {
        let mut unused: Vec<(Span, SymbolId)> = self
            .symbols
            .iter()
            .filter(|(_, s)| !s.is_builtin && s.linkage == Linkage::Internal && s.references.is_empty())
            .filter(|(_, s)| match &s.kind {
                SymbolKind::Variable(info) => matches!(info.role, VariableRole::Global | VariableRole::Local),
                SymbolKind::Function(_) | SymbolKind::Struct(_) => true,
            })
            .map(|(id, s)| (s.span, id))
            .collect();
        unused.sort();
        unused.into_iter().map(|(_, id)| id).collect()
    }
}
