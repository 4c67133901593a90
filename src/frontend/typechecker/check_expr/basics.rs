//! Check identifiers, unary operators, assignments and the conditional operator.
//!
//! Also owns the l-value rules shared by assignments, `++`/`--` and `out` arguments.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::*;
use glslx_core::lang::types::{ScalarKind, TypeShape};

use super::TypeChecker;

impl TypeChecker<'_> {
    /// Resolve an identifier used as a value.
    pub(in crate::frontend::typechecker::check_expr) fn check_ident(&mut self, name: &str, span: Span) -> ResolvedType {
        let Some(id) = self.symbols.lookup(name) else {
            self.error(errors::unknown_symbol(name, span));
            return ResolvedType::Unknown;
        };
        self.record_occurrence(span, id, false);
        let Some(symbol) = self.symbols.get(id) else {
            return ResolvedType::Unknown;
        };
        match symbol.as_variable() {
            Some(info) => {
                let ty = info.ty.clone();
                self.check_extension_use(id, span);
                ty
            }
            None => {
                let kind = symbol.kind_name();
                self.error(errors::not_a_variable(name, kind, span));
                ResolvedType::Unknown
            }
        }
    }

    pub(in crate::frontend::typechecker::check_expr) fn check_unary(
        &mut self,
        op: UnaryOp,
        operand: &Spanned<Expr>,
        span: Span,
    ) -> ResolvedType {
        let ty = self.check_expr(operand);
        if ty.is_unknown() {
            return ty;
        }
        let valid = match op {
            UnaryOp::Not => ty == ResolvedType::BOOL,
            UnaryOp::Neg | UnaryOp::Plus | UnaryOp::PreInc | UnaryOp::PreDec => is_numeric(&ty),
        };
        if !valid {
            self.error(errors::invalid_unary(op.as_str(), &ty.to_string(), span));
            return ResolvedType::Unknown;
        }
        if op.is_mutating() {
            self.check_lvalue(operand);
        }
        ty
    }

    pub(in crate::frontend::typechecker::check_expr) fn check_postfix(
        &mut self,
        op: PostfixOp,
        operand: &Spanned<Expr>,
        span: Span,
    ) -> ResolvedType {
        let ty = self.check_expr(operand);
        if ty.is_unknown() {
            return ty;
        }
        if !is_numeric(&ty) {
            self.error(errors::invalid_unary(op.as_str(), &ty.to_string(), span));
            return ResolvedType::Unknown;
        }
        self.check_lvalue(operand);
        ty
    }

    pub(in crate::frontend::typechecker::check_expr) fn check_assign(
        &mut self,
        op: AssignOp,
        target: &Spanned<Expr>,
        value: &Spanned<Expr>,
        span: Span,
    ) -> ResolvedType {
        let target_ty = self.check_expr(target);
        let value_ty = self.check_expr(value);

        if target_ty.is_array() {
            self.error(CompileError::type_error("Arrays cannot be assigned to", target.span));
            return target_ty;
        }
        if target_ty.contains_sampler(&self.symbols) {
            self.error(CompileError::type_error(
                format!("Values of type \"{target_ty}\" cannot be assigned to"),
                target.span,
            ));
            return target_ty;
        }
        self.check_lvalue(target);

        match op.binary() {
            None => {
                self.expect_type(&target_ty, &value_ty, value.span);
            }
            Some(binary) => {
                let Some(result) = super::ops::binary_result(binary, &target_ty, &value_ty) else {
                    self.error(errors::invalid_binary(
                        op.as_str(),
                        &target_ty.to_string(),
                        &value_ty.to_string(),
                        span,
                    ));
                    return target_ty;
                };
                // `v *= m` is fine for vec * mat but `f *= v` would change the target's type.
                self.expect_type(&target_ty, &result, span);
            }
        }
        target_ty
    }

    pub(in crate::frontend::typechecker::check_expr) fn check_ternary(
        &mut self,
        cond: &Spanned<Expr>,
        then_expr: &Spanned<Expr>,
        else_expr: &Spanned<Expr>,
    ) -> ResolvedType {
        let cond_ty = self.check_expr(cond);
        self.expect_type(&ResolvedType::BOOL, &cond_ty, cond.span);
        let then_ty = self.check_expr(then_expr);
        let else_ty = self.check_expr(else_expr);
        if !self.expect_type(&then_ty, &else_ty, else_expr.span) {
            return ResolvedType::Unknown;
        }
        if then_ty.is_array() {
            self.error(CompileError::type_error(
                "The conditional operator cannot produce an array",
                then_expr.span.merge(else_expr.span),
            ));
            return ResolvedType::Unknown;
        }
        if then_ty.is_unknown() { else_ty } else { then_ty }
    }

    // ========================================================================
    // L-values
    // ========================================================================

    /// Report an error unless `expr` names writable storage. Returns whether it does.
    ///
    /// ## Notes
    /// - `const` variables, `const` parameters, uniforms, attributes and read-only builtins are not writable.
    /// - A swizzle with a repeated component (`v.xx`) is not writable.
    pub(in crate::frontend::typechecker) fn check_lvalue(&mut self, expr: &Spanned<Expr>) -> bool {
        match &expr.node {
            Expr::Ident(_) => {
                let Some(symbol) = self.type_info.symbol_at(expr.span).and_then(|id| self.symbols.get(id)) else {
                    return true;
                };
                let Some(info) = symbol.as_variable() else {
                    self.error(errors::not_assignable(expr.span));
                    return false;
                };
                let reason = match info.storage {
                    StorageQualifier::Const => Some("constant"),
                    StorageQualifier::Uniform => Some("uniform"),
                    StorageQualifier::Attribute => Some("attribute"),
                    StorageQualifier::None | StorageQualifier::Varying => None,
                };
                // Varyings are read-only in fragment shaders only; that is left to the driver.
                match reason {
                    Some(reason) => {
                        let name = symbol.name.clone();
                        self.error(
                            errors::not_assignable(expr.span).with_note(format!("\"{name}\" is a {reason} variable")),
                        );
                        false
                    }
                    None => true,
                }
            }
            Expr::Index { base, .. } => self.check_lvalue(base),
            Expr::Member { base, field } => {
                let base_is_vector = matches!(
                    self.type_info.expr_type(base.span).and_then(ResolvedType::shape),
                    Some(TypeShape::Vector(..))
                );
                if base_is_vector && has_repeated_component(&field.node) {
                    self.error(
                        errors::not_assignable(expr.span)
                            .with_note(format!("The swizzle \"{}\" repeats a component", field.node)),
                    );
                    return false;
                }
                self.check_lvalue(base)
            }
            _ => {
                self.error(errors::not_assignable(expr.span));
                false
            }
        }
    }
}

/// Int or float scalars, vectors and matrices.
pub(in crate::frontend::typechecker) fn is_numeric(ty: &ResolvedType) -> bool {
    matches!(
        ty.shape(),
        Some(TypeShape::Scalar(ScalarKind::Int | ScalarKind::Float))
            | Some(TypeShape::Vector(ScalarKind::Int | ScalarKind::Float, _))
            | Some(TypeShape::Matrix(_))
    )
}

fn has_repeated_component(swizzle: &str) -> bool {
    swizzle
        .chars()
        .enumerate()
        .any(|(i, c)| swizzle.chars().skip(i + 1).any(|d| d == c))
}
