//! Check expressions and resolve their types.
//!
//! This module owns the expression-checking entrypoint (`check_expr`) and delegates to themed
//! submodules. Expression checking is error-accumulating: on invalid input it returns
//! [`ResolvedType::Unknown`] so later checks can continue.
//!
//! ## See also
//! - [`super::TypeChecker`]: the main type checker entrypoint.

use crate::frontend::ast::*;
use crate::frontend::symbols::ResolvedType;

use super::TypeChecker;

mod access;
mod basics;
mod calls;
mod constructors;
mod ops;

impl TypeChecker<'_> {
    // ========================================================================
    // Expressions
    // ========================================================================

    /// Validate an expression and return its resolved type.
    ///
    /// The type of every visited expression is recorded in [`TypeCheckInfo`](super::TypeCheckInfo), keyed by span.
    pub(crate) fn check_expr(&mut self, expr: &Spanned<Expr>) -> ResolvedType {
        let ty = match &expr.node {
            Expr::Int(_) => ResolvedType::INT,
            Expr::Float(_) => ResolvedType::FLOAT,
            Expr::Bool(_) => ResolvedType::BOOL,
            Expr::Ident(name) => self.check_ident(name, expr.span),
            Expr::Unary { op, operand } => self.check_unary(*op, operand, expr.span),
            Expr::Postfix { op, operand } => self.check_postfix(*op, operand, expr.span),
            Expr::Binary { op, left, right } => self.check_binary(*op, left, right, expr.span),
            Expr::Assign { op, target, value } => self.check_assign(*op, target, value, expr.span),
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => self.check_ternary(cond, then_expr, else_expr),
            Expr::Call { callee, args, .. } => self.check_call(callee, args, expr.span),
            Expr::Index { base, index } => self.check_index(base, index, expr.span),
            Expr::Member { base, field } => self.check_member(base, field),
            Expr::Sequence(items) => {
                let mut last = ResolvedType::VOID;
                for item in items {
                    last = self.check_expr(item);
                }
                last
            }
        };
        self.record_expr_type(expr.span, ty.clone());
        ty
    }
}
