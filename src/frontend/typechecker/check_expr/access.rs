//! Check indexing, struct field access and vector swizzles.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::*;
use crate::frontend::typechecker::ConstValue;
use glslx_core::lang::types::{self as builtin_types, ScalarKind, TypeShape};

use super::TypeChecker;

impl TypeChecker<'_> {
    /// Type-check `base[index]` and return the element type.
    ///
    /// Arrays yield their element, vectors a scalar and matrices a column vector. A constant index is
    /// bounds-checked against the array size, vector length or matrix dimension.
    pub(in crate::frontend::typechecker::check_expr) fn check_index(
        &mut self,
        base: &Spanned<Expr>,
        index: &Spanned<Expr>,
        span: Span,
    ) -> ResolvedType {
        let base_ty = self.check_expr(base);
        let index_ty = self.check_expr(index);
        self.expect_type(&ResolvedType::INT, &index_ty, index.span);

        let (element, size) = match &base_ty {
            ResolvedType::Unknown => return ResolvedType::Unknown,
            ResolvedType::Array(element, size) => ((**element).clone(), *size),
            _ => match base_ty.shape() {
                Some(TypeShape::Vector(kind, n)) => (ResolvedType::vector(kind, 1), Some(usize::from(n))),
                Some(TypeShape::Matrix(n)) => (
                    ResolvedType::vector(ScalarKind::Float, usize::from(n)),
                    Some(usize::from(n)),
                ),
                _ => {
                    self.error(CompileError::type_error(
                        format!("Cannot index into type \"{base_ty}\""),
                        span,
                    ));
                    return ResolvedType::Unknown;
                }
            },
        };

        if let (Some(size), Some(ConstValue::Int(i))) = (size, self.const_value(index)) {
            if i < 0 || usize::try_from(i).is_ok_and(|i| i >= size) {
                self.error(errors::index_out_of_bounds(i, size, index.span));
            }
        }
        element
    }

    /// Type-check `base.field`: a struct field or a vector swizzle.
    pub(in crate::frontend::typechecker::check_expr) fn check_member(
        &mut self,
        base: &Spanned<Expr>,
        field: &Spanned<Ident>,
    ) -> ResolvedType {
        let base_ty = self.check_expr(base);
        match &base_ty {
            ResolvedType::Unknown => ResolvedType::Unknown,
            ResolvedType::Struct(id, name) => {
                let found = self
                    .symbols
                    .get(*id)
                    .and_then(Symbol::as_struct)
                    .and_then(|s| s.field(&field.node))
                    .map(|f| (f.symbol, f.ty.clone()));
                match found {
                    Some((symbol, ty)) => {
                        self.record_occurrence(field.span, symbol, false);
                        ty
                    }
                    None => {
                        self.error(CompileError::type_error(
                            format!("\"{}\" is not a field of \"{name}\"", field.node),
                            field.span,
                        ));
                        ResolvedType::Unknown
                    }
                }
            }
            _ => match base_ty.shape() {
                Some(TypeShape::Vector(kind, n)) => match swizzle_len(&field.node, n) {
                    Some(len) => ResolvedType::vector(kind, len),
                    None => {
                        self.error(CompileError::type_error(
                            format!("Invalid swizzle \"{}\" for type \"{base_ty}\"", field.node),
                            field.span,
                        ));
                        ResolvedType::Unknown
                    }
                },
                _ => {
                    self.error(CompileError::type_error(
                        format!("Type \"{base_ty}\" has no member \"{}\"", field.node),
                        field.span,
                    ));
                    ResolvedType::Unknown
                }
            },
        }
    }
}

/// Length of a swizzle of a vector with `n` components: 1 to 4 letters, all from one set, all in range.
fn swizzle_len(swizzle: &str, n: u8) -> Option<usize> {
    let len = swizzle.chars().count();
    if !(1..=4).contains(&len) {
        return None;
    }
    let mut set = None;
    for c in swizzle.chars() {
        let (s, i) = builtin_types::swizzle_index(c)?;
        if *set.get_or_insert(s) != s || i >= usize::from(n) {
            return None;
        }
    }
    Some(len)
}

#[cfg(test)]
mod tests {
    use super::swizzle_len;

    #[test]
    fn swizzles_stay_in_one_set_and_in_range() {
        assert_eq!(swizzle_len("xy", 2), Some(2));
        assert_eq!(swizzle_len("bgra", 4), Some(4));
        assert_eq!(swizzle_len("xxxx", 2), Some(4));
        assert_eq!(swizzle_len("z", 2), None);
        assert_eq!(swizzle_len("xg", 4), None);
        assert_eq!(swizzle_len("xyzwx", 4), None);
    }
}
