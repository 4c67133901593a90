//! Constant evaluation.
//!
//! Scalar constant folding shared by the checker (array sizes, index bounds, `const` values) and the emitter's
//! rewriting pass. Only scalar values are modelled; anything else is "not a constant value" even if GLSL would
//! accept it as a constant expression (see [`TypeChecker::is_constant_expression`]).

use std::fmt;

use crate::frontend::ast::*;
use crate::frontend::symbols::{ResolvedType, Symbol, SymbolKind};
use glslx_core::lang::types::{self as builtin_types, ScalarKind, TypeShape};

use super::TypeChecker;

/// A folded scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl ConstValue {
    pub fn kind(self) -> ScalarKind {
        match self {
            ConstValue::Bool(_) => ScalarKind::Bool,
            ConstValue::Int(_) => ScalarKind::Int,
            ConstValue::Float(_) => ScalarKind::Float,
        }
    }

    pub fn ty(self) -> ResolvedType {
        ResolvedType::vector(self.kind(), 1)
    }

    /// The literal expression for this value.
    pub fn to_expr(self) -> Expr {
        match self {
            ConstValue::Bool(b) => Expr::Bool(b),
            ConstValue::Int(i) => Expr::Int(i),
            ConstValue::Float(f) => Expr::Float(f),
        }
    }

    /// Scalar constructor conversion (`int(2.5)`, `bool(1)`, `float(true)`).
    pub fn convert(self, to: ScalarKind) -> ConstValue {
        match (self, to) {
            (ConstValue::Bool(b), ScalarKind::Int) => ConstValue::Int(i64::from(b)),
            (ConstValue::Bool(b), ScalarKind::Float) => ConstValue::Float(if b { 1.0 } else { 0.0 }),
            (ConstValue::Int(i), ScalarKind::Bool) => ConstValue::Bool(i != 0),
            (ConstValue::Int(i), ScalarKind::Float) => ConstValue::Float(i as f64),
            (ConstValue::Float(f), ScalarKind::Bool) => ConstValue::Bool(f != 0.0),
            (ConstValue::Float(f), ScalarKind::Int) => ConstValue::Int(f.trunc() as i64),
            (value, _) => value,
        }
    }

    pub fn unary(op: UnaryOp, value: ConstValue) -> Option<ConstValue> {
        match (op, value) {
            (UnaryOp::Plus, ConstValue::Int(_) | ConstValue::Float(_)) => Some(value),
            (UnaryOp::Neg, ConstValue::Int(i)) => int(i.checked_neg()?),
            (UnaryOp::Neg, ConstValue::Float(f)) => Some(ConstValue::Float(-f)),
            (UnaryOp::Not, ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
            _ => None,
        }
    }

    /// Fold a binary operation on two values of the same kind.
    ///
    /// Returns `None` for mixed kinds, division by zero, and results that overflow `int` or `float`.
    pub fn binary(op: BinaryOp, left: ConstValue, right: ConstValue) -> Option<ConstValue> {
        use ConstValue::{Bool, Float, Int};
        let value = match (left, right) {
            (Int(a), Int(b)) => match op {
                BinaryOp::Add => int(a.checked_add(b)?)?,
                BinaryOp::Sub => int(a.checked_sub(b)?)?,
                BinaryOp::Mul => int(a.checked_mul(b)?)?,
                BinaryOp::Div => int(a.checked_div(b)?)?,
                BinaryOp::Eq => Bool(a == b),
                BinaryOp::NotEq => Bool(a != b),
                BinaryOp::Lt => Bool(a < b),
                BinaryOp::LtEq => Bool(a <= b),
                BinaryOp::Gt => Bool(a > b),
                BinaryOp::GtEq => Bool(a >= b),
                BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => return None,
            },
            (Float(a), Float(b)) => match op {
                BinaryOp::Add => Float(a + b),
                BinaryOp::Sub => Float(a - b),
                BinaryOp::Mul => Float(a * b),
                BinaryOp::Div if b == 0.0 => return None,
                BinaryOp::Div => Float(a / b),
                BinaryOp::Eq => Bool(a == b),
                BinaryOp::NotEq => Bool(a != b),
                BinaryOp::Lt => Bool(a < b),
                BinaryOp::LtEq => Bool(a <= b),
                BinaryOp::Gt => Bool(a > b),
                BinaryOp::GtEq => Bool(a >= b),
                BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => return None,
            },
            (Bool(a), Bool(b)) => match op {
                BinaryOp::And => Bool(a && b),
                BinaryOp::Or => Bool(a || b),
                BinaryOp::Xor => Bool(a != b),
                BinaryOp::Eq => Bool(a == b),
                BinaryOp::NotEq => Bool(a != b),
                _ => return None,
            },
            _ => return None,
        };
        match value {
            Float(f) if !(f as f32).is_finite() => None,
            value => Some(value),
        }
    }
}

/// An `int` result, or `None` outside the 32-bit range.
fn int(value: i64) -> Option<ConstValue> {
    i32::try_from(value).ok().map(|v| ConstValue::Int(i64::from(v)))
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Int(i) => write!(f, "{i}"),
            ConstValue::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// Fold `expr` to a scalar, resolving identifiers through `lookup`.
pub fn eval(expr: &Spanned<Expr>, lookup: &dyn Fn(&Spanned<Expr>) -> Option<ConstValue>) -> Option<ConstValue> {
    match &expr.node {
        Expr::Int(i) => Some(ConstValue::Int(*i)),
        Expr::Float(f) => Some(ConstValue::Float(*f)),
        Expr::Bool(b) => Some(ConstValue::Bool(*b)),
        Expr::Ident(_) => lookup(expr),
        Expr::Unary { op, operand } => ConstValue::unary(*op, eval(operand, lookup)?),
        Expr::Binary { op, left, right } => {
            // Short-circuit forms still need both sides constant to be a constant expression.
            let left = eval(left, lookup)?;
            let right = eval(right, lookup)?;
            ConstValue::binary(*op, left, right)
        }
        Expr::Ternary {
            cond,
            then_expr,
            else_expr,
        } => {
            let ConstValue::Bool(cond) = eval(cond, lookup)? else {
                return None;
            };
            let then_value = eval(then_expr, lookup)?;
            let else_value = eval(else_expr, lookup)?;
            if then_value.kind() != else_value.kind() {
                return None;
            }
            Some(if cond { then_value } else { else_value })
        }
        Expr::Call { callee, args, .. } if args.len() == 1 => {
            let shape = builtin_types::from_str(&callee.node).map(|id| builtin_types::info_for(id).shape)?;
            let TypeShape::Scalar(kind) = shape else {
                return None;
            };
            match eval(&args[0], lookup)?.convert(kind) {
                ConstValue::Int(i) => int(i),
                value => Some(value),
            }
        }
        _ => None,
    }
}

impl TypeChecker<'_> {
    /// Scalar value of an already-checked expression, if it is a constant.
    pub(crate) fn const_value(&self, expr: &Spanned<Expr>) -> Option<ConstValue> {
        let lookup = |ident: &Spanned<Expr>| {
            let id = self.type_info.symbol_at(ident.span)?;
            self.symbols.get(id)?.as_variable()?.constant
        };
        eval(expr, &lookup)
    }

    /// Whether an already-checked expression is a GLSL constant expression.
    ///
    /// ## Notes
    /// - Literals, `const` variables, constructors and builtin function calls over constants qualify.
    /// - User function calls and assignments never do.
    pub(crate) fn is_constant_expression(&self, expr: &Spanned<Expr>) -> bool {
        match &expr.node {
            Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) => true,
            Expr::Ident(_) => self
                .type_info
                .symbol_at(expr.span)
                .and_then(|id| self.symbols.get(id))
                .and_then(Symbol::as_variable)
                .is_some_and(|v| v.storage == StorageQualifier::Const),
            Expr::Unary { op, operand } => !op.is_mutating() && self.is_constant_expression(operand),
            Expr::Binary { left, right, .. } => {
                self.is_constant_expression(left) && self.is_constant_expression(right)
            }
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.is_constant_expression(cond)
                    && self.is_constant_expression(then_expr)
                    && self.is_constant_expression(else_expr)
            }
            Expr::Call { callee, args, .. } => {
                let allowed = builtin_types::from_str(&callee.node).is_some()
                    || self
                        .type_info
                        .symbol_at(callee.span)
                        .and_then(|id| self.symbols.get(id))
                        .is_some_and(|s| s.is_builtin || matches!(s.kind, SymbolKind::Struct(_)));
                allowed && args.iter().all(|a| self.is_constant_expression(a))
            }
            Expr::Index { base, index } => self.is_constant_expression(base) && self.is_constant_expression(index),
            Expr::Member { base, .. } => self.is_constant_expression(base),
            Expr::Sequence(items) => items.iter().all(|e| self.is_constant_expression(e)),
            Expr::Postfix { .. } | Expr::Assign { .. } => false,
        }
    }
}
