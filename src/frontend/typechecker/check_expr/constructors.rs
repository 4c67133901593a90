//! Check builtin type and struct constructors.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::*;
use glslx_core::lang::types::{self as builtin_types, BuiltinTypeId, TypeShape};

use super::TypeChecker;

impl TypeChecker<'_> {
    /// `vec3(1.0)`, `mat2(a, b)`, `int(x)`.
    ///
    /// ## Notes
    /// - Scalars take exactly one argument of any scalar, vector or matrix type.
    /// - Vectors take one scalar (broadcast) or enough components, with no argument left entirely unused.
    /// - Matrices take one scalar (diagonal) or exactly N*N components from scalars and vectors.
    pub(in crate::frontend::typechecker::check_expr) fn check_builtin_constructor(
        &mut self,
        id: BuiltinTypeId,
        args: &[Spanned<Expr>],
        span: Span,
    ) -> ResolvedType {
        let arg_types = self.check_args(args);
        let result = ResolvedType::Builtin(id);
        let shape = builtin_types::info_for(id).shape;

        if matches!(shape, TypeShape::Void | TypeShape::Sampler) {
            self.error(CompileError::type_error(format!("Cannot construct type \"{result}\""), span));
            return ResolvedType::Unknown;
        }
        if args.is_empty() {
            self.error(CompileError::type_error(
                format!("Constructing \"{result}\" needs at least one argument"),
                span,
            ));
            return result;
        }

        let mut shapes = Vec::with_capacity(arg_types.len());
        for (arg, ty) in args.iter().zip(&arg_types) {
            if ty.is_unknown() {
                return result;
            }
            match ty.shape() {
                Some(s @ (TypeShape::Scalar(_) | TypeShape::Vector(..) | TypeShape::Matrix(_))) => shapes.push(s),
                _ => {
                    self.error(CompileError::type_error(
                        format!("Cannot use a value of type \"{ty}\" to construct \"{result}\""),
                        arg.span,
                    ));
                    return result;
                }
            }
        }

        let needed = shape.component_count();
        let single_scalar = shapes.len() == 1 && matches!(shapes[0], TypeShape::Scalar(_));
        let ok = match shape {
            TypeShape::Scalar(_) => shapes.len() == 1,
            _ if single_scalar => true,
            TypeShape::Matrix(_) if shapes.iter().any(|s| matches!(s, TypeShape::Matrix(_))) => {
                self.error(CompileError::type_error(
                    "Matrices cannot be constructed from other matrices",
                    span,
                ));
                return result;
            }
            TypeShape::Matrix(_) => shapes.iter().map(|s| s.component_count()).sum::<usize>() == needed,
            _ => {
                let before_last: usize = shapes[..shapes.len() - 1].iter().map(|s| s.component_count()).sum();
                let total = before_last + shapes[shapes.len() - 1].component_count();
                before_last < needed && total >= needed
            }
        };
        if !ok {
            let rendered = arg_types.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            self.error(
                CompileError::type_error(format!("Cannot construct \"{result}\" from ({rendered})"), span)
                    .with_note(format!("\"{result}\" has {needed} component(s)")),
            );
        }
        result
    }

    /// `S(a, b)`: one argument per field, each of the field's exact type.
    pub(in crate::frontend::typechecker::check_expr) fn check_struct_constructor(
        &mut self,
        id: SymbolId,
        callee: &Spanned<Ident>,
        args: &[Spanned<Expr>],
        span: Span,
    ) -> ResolvedType {
        let arg_types = self.check_args(args);
        let result = ResolvedType::Struct(id, callee.node.clone());
        let fields: Vec<ResolvedType> = self
            .symbols
            .get(id)
            .and_then(Symbol::as_struct)
            .map(|s| s.fields.iter().map(|f| f.ty.clone()).collect())
            .unwrap_or_default();

        if result.contains_sampler(&self.symbols) {
            self.error(CompileError::type_error(
                format!("Cannot construct \"{}\" because it contains a sampler", callee.node),
                span,
            ));
            return result;
        }
        if fields.len() != args.len() {
            self.error(errors::wrong_argument_count(
                &format!("constructor \"{}\"", callee.node),
                fields.len(),
                args.len(),
                span,
            ));
            return result;
        }
        for ((arg, found), expected) in args.iter().zip(&arg_types).zip(&fields) {
            self.expect_type(expected, found, arg.span);
        }
        result
    }
}
