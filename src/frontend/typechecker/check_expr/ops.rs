//! Check binary operators.
//!
//! GLSL ES 1.00 has no implicit conversions, so the rules are structural:
//!
//! - Arithmetic needs both sides of the same component kind: equal types, or a scalar with a vector or matrix
//!   (component-wise), or `vecN * matN` / `matN * vecN` for linear algebra.
//! - `<`, `<=`, `>`, `>=` compare int or float scalars.
//! - `==` and `!=` compare any two values of the same type except arrays and samplers.
//! - `&&`, `||`, `^^` take `bool` scalars.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::errors;
use crate::frontend::symbols::ResolvedType;
use glslx_core::lang::types::{ScalarKind, TypeShape};

use super::TypeChecker;
use super::basics::is_numeric;

impl TypeChecker<'_> {
    /// Type-check a binary operation and return its result type.
    pub(in crate::frontend::typechecker::check_expr) fn check_binary(
        &mut self,
        op: BinaryOp,
        left: &Spanned<Expr>,
        right: &Spanned<Expr>,
        span: Span,
    ) -> ResolvedType {
        let left_ty = self.check_expr(left);
        let right_ty = self.check_expr(right);
        if left_ty.is_unknown() || right_ty.is_unknown() {
            return if op.is_comparison() || op.is_logical() {
                ResolvedType::BOOL
            } else {
                ResolvedType::Unknown
            };
        }

        if matches!(op, BinaryOp::Eq | BinaryOp::NotEq)
            && left_ty == right_ty
            && (left_ty.is_array() || left_ty.contains_sampler(&self.symbols))
        {
            self.error(errors::invalid_binary(
                op.as_str(),
                &left_ty.to_string(),
                &right_ty.to_string(),
                span,
            ));
            return ResolvedType::BOOL;
        }

        match binary_result(op, &left_ty, &right_ty) {
            Some(ty) => ty,
            None => {
                self.error(errors::invalid_binary(
                    op.as_str(),
                    &left_ty.to_string(),
                    &right_ty.to_string(),
                    span,
                ));
                if op.is_comparison() || op.is_logical() {
                    ResolvedType::BOOL
                } else {
                    ResolvedType::Unknown
                }
            }
        }
    }
}

/// Result type of `left op right`, or `None` when the operator does not apply.
///
/// Struct equality is accepted here; callers reject samplers and arrays separately.
pub(in crate::frontend::typechecker) fn binary_result(
    op: BinaryOp,
    left: &ResolvedType,
    right: &ResolvedType,
) -> Option<ResolvedType> {
    if left.is_unknown() || right.is_unknown() {
        return Some(ResolvedType::Unknown);
    }
    match op {
        BinaryOp::Eq | BinaryOp::NotEq => (left == right && !left.is_void()).then_some(ResolvedType::BOOL),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => {
            (*left == ResolvedType::BOOL && *right == ResolvedType::BOOL).then_some(ResolvedType::BOOL)
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            (left == right && left.is_scalar() && is_numeric(left)).then_some(ResolvedType::BOOL)
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => arithmetic_result(op, left, right),
    }
}

fn arithmetic_result(op: BinaryOp, left: &ResolvedType, right: &ResolvedType) -> Option<ResolvedType> {
    if !is_numeric(left) || !is_numeric(right) {
        return None;
    }
    let (l, r) = (left.shape()?, right.shape()?);
    if l.scalar_kind() != r.scalar_kind() {
        return None;
    }
    if left == right {
        return Some(left.clone());
    }
    match (l, r) {
        (TypeShape::Scalar(_), _) => Some(right.clone()),
        (_, TypeShape::Scalar(_)) => Some(left.clone()),
        (TypeShape::Vector(ScalarKind::Float, n), TypeShape::Matrix(m))
        | (TypeShape::Matrix(m), TypeShape::Vector(ScalarKind::Float, n))
            if op == BinaryOp::Mul && n == m =>
        {
            Some(ResolvedType::vector(ScalarKind::Float, usize::from(n)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glslx_core::lang::types::BuiltinTypeId;

    fn ty(id: BuiltinTypeId) -> ResolvedType {
        ResolvedType::Builtin(id)
    }

    #[test]
    fn scalar_broadcasts_over_vectors_and_matrices() {
        assert_eq!(
            binary_result(BinaryOp::Mul, &ResolvedType::FLOAT, &ty(BuiltinTypeId::Vec3)),
            Some(ty(BuiltinTypeId::Vec3))
        );
        assert_eq!(
            binary_result(BinaryOp::Sub, &ty(BuiltinTypeId::Mat2), &ResolvedType::FLOAT),
            Some(ty(BuiltinTypeId::Mat2))
        );
        assert_eq!(binary_result(BinaryOp::Add, &ResolvedType::INT, &ty(BuiltinTypeId::Vec2)), None);
    }

    #[test]
    fn matrix_vector_products_need_matching_dimensions() {
        assert_eq!(
            binary_result(BinaryOp::Mul, &ty(BuiltinTypeId::Mat4), &ty(BuiltinTypeId::Vec4)),
            Some(ty(BuiltinTypeId::Vec4))
        );
        assert_eq!(
            binary_result(BinaryOp::Mul, &ty(BuiltinTypeId::Vec3), &ty(BuiltinTypeId::Mat3)),
            Some(ty(BuiltinTypeId::Vec3))
        );
        assert_eq!(binary_result(BinaryOp::Mul, &ty(BuiltinTypeId::Vec3), &ty(BuiltinTypeId::Mat4)), None);
        assert_eq!(binary_result(BinaryOp::Add, &ty(BuiltinTypeId::Vec4), &ty(BuiltinTypeId::Mat4)), None);
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(
            binary_result(BinaryOp::Lt, &ResolvedType::INT, &ResolvedType::INT),
            Some(ResolvedType::BOOL)
        );
        assert_eq!(binary_result(BinaryOp::Lt, &ty(BuiltinTypeId::Vec2), &ty(BuiltinTypeId::Vec2)), None);
        assert_eq!(
            binary_result(BinaryOp::Eq, &ty(BuiltinTypeId::Vec2), &ty(BuiltinTypeId::Vec2)),
            Some(ResolvedType::BOOL)
        );
        assert_eq!(binary_result(BinaryOp::And, &ResolvedType::BOOL, &ResolvedType::INT), None);
        assert_eq!(
            binary_result(BinaryOp::Xor, &ResolvedType::BOOL, &ResolvedType::BOOL),
            Some(ResolvedType::BOOL)
        );
    }
}
