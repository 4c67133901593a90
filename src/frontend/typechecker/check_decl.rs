//! Second-pass declaration checks: global initializers, storage rules, entry points and function bodies.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::*;
use glslx_core::lang::types::{self as builtin_types, ScalarKind, TypeShape};

use super::TypeChecker;

impl TypeChecker<'_> {
    pub(crate) fn check_program(&mut self, program: &Program) {
        for decl in &program.declarations {
            match &decl.node {
                Declaration::Variables(group) => self.check_global_variables(group, decl.span),
                Declaration::Function(f) => self.check_function(f, decl.span),
                Declaration::Precision(p) => self.check_precision(p),
                Declaration::Version(v) => {
                    if v.version != 100 {
                        self.error(CompileError::syntax(
                            format!("Unsupported version {} (only 100 is supported)", v.version),
                            decl.span,
                        ));
                    }
                }
                Declaration::Struct(_) | Declaration::Include(_) | Declaration::Extension(_) => {}
            }
        }
    }

    fn check_precision(&mut self, decl: &PrecisionDecl) {
        let ty = self.resolve_type_name(&decl.ty);
        let allowed = matches!(
            ty.shape(),
            Some(TypeShape::Scalar(ScalarKind::Int | ScalarKind::Float) | TypeShape::Sampler)
        );
        if !allowed && !ty.is_unknown() {
            self.error(CompileError::type_error(
                format!("Cannot set a default precision for type \"{ty}\""),
                decl.ty.span,
            ));
        }
    }

    // ========================================================================
    // Variables
    // ========================================================================

    fn check_global_variables(&mut self, group: &VariableGroup, span: Span) {
        self.check_group_qualifiers(group, span, true);
        for declarator in &group.declarators {
            let d = &declarator.node;
            let ty = self
                .type_info
                .symbol_at(d.name.span)
                .and_then(|id| self.symbols.get(id))
                .and_then(Symbol::as_variable)
                .map(|v| v.ty.clone())
                .unwrap_or(ResolvedType::Unknown);
            self.check_declarator(group, d, &ty, true);
        }
    }

    /// Rules on a whole declaration line that do not depend on the declarator.
    pub(crate) fn check_group_qualifiers(&mut self, group: &VariableGroup, span: Span, global: bool) {
        let storage = group.storage;
        if !global && matches!(storage, StorageQualifier::Uniform | StorageQualifier::Attribute | StorageQualifier::Varying)
        {
            let word = storage.as_str().unwrap_or_default();
            self.error(CompileError::type_error(
                format!("\"{word}\" variables can only be declared at global scope"),
                span,
            ));
        }
        if group.invariant && storage != StorageQualifier::Varying && group.linkage != Linkage::Import {
            self.error(CompileError::type_error("Only varyings can be invariant", span));
        }
        let ty_name = &group.ty.name;
        if builtin_types::is_void(&ty_name.node) {
            self.error(CompileError::type_error("Variables cannot have type \"void\"", ty_name.span));
        } else if builtin_types::from_str(&ty_name.node)
            .is_some_and(|id| builtin_types::info_for(id).shape == TypeShape::Sampler)
            && storage != StorageQualifier::Uniform
            && group.linkage != Linkage::Import
        {
            self.error(CompileError::type_error("Samplers must be declared \"uniform\"", ty_name.span));
        }
    }

    /// Check one declarator's initializer against the declared type and storage rules.
    pub(crate) fn check_declarator(
        &mut self,
        group: &VariableGroup,
        d: &VariableDeclarator,
        ty: &ResolvedType,
        global: bool,
    ) {
        let storage = group.storage;
        let Some(init) = &d.init else {
            if storage == StorageQualifier::Const && group.linkage != Linkage::Import {
                self.error(CompileError::type_error(
                    format!("Constant \"{}\" must be initialized", d.name.node),
                    d.name.span,
                ));
            }
            return;
        };

        let found = self.check_expr(init);
        if group.linkage == Linkage::Import {
            self.error(CompileError::type_error("Imported variables cannot be initialized", init.span));
            return;
        }
        if matches!(storage, StorageQualifier::Uniform | StorageQualifier::Attribute | StorageQualifier::Varying) {
            let word = storage.as_str().unwrap_or_default();
            self.error(CompileError::type_error(
                format!("\"{word}\" variables cannot be initialized"),
                init.span,
            ));
            return;
        }
        if ty.is_array() {
            self.error(CompileError::type_error("Arrays cannot be initialized", init.span));
            return;
        }
        if !self.expect_type(ty, &found, init.span) {
            return;
        }
        let needs_constant = global || storage == StorageQualifier::Const;
        if needs_constant && !self.is_constant_expression(init) {
            let error = errors::not_constant(init.span);
            self.error(if global {
                error.with_note("Global initializers must be constant expressions")
            } else {
                error
            });
        }
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn check_function(&mut self, decl: &FunctionDecl, span: Span) {
        let Some(&id) = self.function_ids.get(&decl.name.span) else {
            return;
        };
        let Some(info) = self.symbols.get(id).and_then(Symbol::as_function).cloned() else {
            return;
        };

        match decl.linkage {
            Linkage::Export => {
                if !info.return_type.matches(&ResolvedType::VOID) || !decl.params.is_empty() {
                    self.error(
                        CompileError::type_error(
                            format!("Entry point \"{}\" must take no arguments and return \"void\"", decl.name.node),
                            decl.name.span,
                        )
                        .with_note("Exported functions become the \"main\" function of a shader"),
                    );
                }
            }
            Linkage::Import if decl.body.is_some() => {
                self.error(CompileError::type_error("Imported functions cannot have a body", decl.name.span));
            }
            _ => {}
        }

        for param in &decl.params {
            if builtin_types::is_void(&param.node.ty.name.node) {
                self.error(CompileError::type_error(
                    "Parameters cannot have type \"void\"",
                    param.node.ty.name.span,
                ));
            }
        }

        let Some(body) = &decl.body else {
            return;
        };

        self.current_function = Some(id);
        self.current_return = info.return_type.clone();
        self.symbols.enter_scope(ScopeKind::Function, Some(span));

        for (param, param_info) in decl.params.iter().zip(&info.params) {
            let Some(name) = &param.node.name else {
                continue;
            };
            let mut var = VariableInfo::new(param_info.ty.clone(), VariableRole::Parameter(param.node.direction));
            if param.node.is_const {
                var.storage = StorageQualifier::Const;
            }
            var.precision = param.node.ty.precision;
            self.declare(Symbol::new(name.node.clone(), SymbolKind::Variable(var), name.span));
        }

        self.check_stmts(&body.node.stmts);
        self.symbols.exit_scope();
        self.current_function = None;

        if !info.return_type.is_void() && !info.return_type.is_unknown() && !block_always_returns(&body.node) {
            self.error(CompileError::type_error(
                format!("All control paths for \"{}\" must return a value", decl.name.node),
                decl.name.span,
            ));
        }
    }
}

/// Whether control can never fall off the end of `block`.
fn block_always_returns(block: &Block) -> bool {
    block.stmts.iter().any(|s| stmt_always_returns(&s.node))
}

fn stmt_always_returns(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(_) | Stmt::Discard => true,
        Stmt::Block(block) => block_always_returns(block),
        Stmt::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => stmt_always_returns(&then_branch.node) && stmt_always_returns(&else_branch.node),
        _ => false,
    }
}
