//! AST for glslx shader sources.
//!
//! Every node that tooling may point at is wrapped in [`Spanned`]; spans carry the [`SourceId`] of the file they
//! came from so one AST can mix declarations from several files after `#include` splicing.

use crate::source::SourceId;
use glslx_core::lang::operators::{self, OperatorId, Precedence};

/// Byte range in one source file (end-exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    pub source: SourceId,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(source: SourceId, start: usize, end: usize) -> Self {
        Self { source, start, end }
    }

    /// Smallest span covering both (both must be in the same file).
    pub fn merge(self, other: Span) -> Span {
        Span {
            source: self.source,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether a cursor at `offset` touches this span (`start <= offset <= end`).
    pub fn touches(&self, source: SourceId, offset: usize) -> bool {
        self.source == source && self.start <= offset && offset <= self.end
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.source == other.source && self.start <= other.start && other.end <= self.end
    }
}

/// A node with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A parsed file: its top-level declarations in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub declarations: Vec<Spanned<Declaration>>,
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Include(IncludeDecl),
    Extension(ExtensionDecl),
    Version(VersionDecl),
    Precision(PrecisionDecl),
    Variables(VariableGroup),
    Function(FunctionDecl),
    Struct(StructDecl),
}

/// `#include "path"`
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeDecl {
    pub path: String,
    /// Span of the quoted path, used for include diagnostics.
    pub path_span: Span,
}

/// `#extension NAME : behavior`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionDecl {
    pub name: Spanned<Ident>,
    pub behavior: String,
}

/// `#version N`
#[derive(Debug, Clone, PartialEq)]
pub struct VersionDecl {
    pub version: u32,
}

/// `precision mediump float;`
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionDecl {
    pub precision: Precision,
    pub ty: Spanned<Ident>,
}

/// Visibility of a top-level declaration outside the compiled unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Linkage {
    #[default]
    Internal,
    /// Entry point (functions) or pinned name (globals).
    Export,
    /// Supplied by the host; never emitted.
    Import,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageQualifier {
    #[default]
    None,
    Const,
    Uniform,
    Attribute,
    Varying,
}

impl StorageQualifier {
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            StorageQualifier::None => None,
            StorageQualifier::Const => Some("const"),
            StorageQualifier::Uniform => Some("uniform"),
            StorageQualifier::Attribute => Some("attribute"),
            StorageQualifier::Varying => Some("varying"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Lowp,
    Mediump,
    Highp,
}

impl Precision {
    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Lowp => "lowp",
            Precision::Mediump => "mediump",
            Precision::Highp => "highp",
        }
    }
}

/// A type as written: optional precision plus a builtin or struct name.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub precision: Option<Precision>,
    pub name: Spanned<Ident>,
}

/// `uniform vec2 a, b[2] = ...;` at module or block scope, or a struct field line.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableGroup {
    pub linkage: Linkage,
    pub storage: StorageQualifier,
    pub invariant: bool,
    pub ty: TypeRef,
    pub declarators: Vec<Spanned<VariableDeclarator>>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: Spanned<Ident>,
    pub array_size: Option<Spanned<Expr>>,
    pub init: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamDirection {
    #[default]
    In,
    Out,
    InOut,
}

impl ParamDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamDirection::In => "in",
            ParamDirection::Out => "out",
            ParamDirection::InOut => "inout",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub is_const: bool,
    pub direction: ParamDirection,
    /// Whether the direction was spelled out (`in` is otherwise implied).
    pub explicit_direction: bool,
    pub ty: TypeRef,
    pub name: Option<Spanned<Ident>>,
    pub array_size: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub linkage: Linkage,
    pub return_type: TypeRef,
    pub name: Spanned<Ident>,
    pub params: Vec<Spanned<Param>>,
    /// `None` for prototypes and imports.
    pub body: Option<Spanned<Block>>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub linkage: Linkage,
    pub name: Spanned<Ident>,
    pub fields: Vec<Spanned<VariableGroup>>,
    pub doc: Option<String>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    Variables(VariableGroup),
    Expr(Spanned<Expr>),
    If {
        cond: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    For {
        init: Option<Box<Spanned<Stmt>>>,
        cond: Option<Spanned<Expr>>,
        update: Option<Spanned<Expr>>,
        body: Box<Spanned<Stmt>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    DoWhile {
        body: Box<Spanned<Stmt>>,
        cond: Spanned<Expr>,
    },
    Return(Option<Spanned<Expr>>),
    Break,
    Continue,
    Discard,
    Empty,
}

impl Stmt {
    /// Whether control never falls through this statement.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Stmt::Return(_) | Stmt::Break | Stmt::Continue | Stmt::Discard)
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    PreInc,
    PreDec,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::PreInc => "++",
            UnaryOp::PreDec => "--",
        }
    }

    pub fn is_mutating(self) -> bool {
        matches!(self, UnaryOp::PreInc | UnaryOp::PreDec)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Inc,
    Dec,
}

impl PostfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn operator_id(self) -> OperatorId {
        match self {
            BinaryOp::Add => OperatorId::Plus,
            BinaryOp::Sub => OperatorId::Minus,
            BinaryOp::Mul => OperatorId::Star,
            BinaryOp::Div => OperatorId::Slash,
            BinaryOp::Eq => OperatorId::EqEq,
            BinaryOp::NotEq => OperatorId::NotEq,
            BinaryOp::Lt => OperatorId::Lt,
            BinaryOp::LtEq => OperatorId::LtEq,
            BinaryOp::Gt => OperatorId::Gt,
            BinaryOp::GtEq => OperatorId::GtEq,
            BinaryOp::And => OperatorId::AndAnd,
            BinaryOp::Or => OperatorId::OrOr,
            BinaryOp::Xor => OperatorId::XorXor,
        }
    }

    pub fn from_operator(id: OperatorId) -> Option<Self> {
        Some(match id {
            OperatorId::Plus => BinaryOp::Add,
            OperatorId::Minus => BinaryOp::Sub,
            OperatorId::Star => BinaryOp::Mul,
            OperatorId::Slash => BinaryOp::Div,
            OperatorId::EqEq => BinaryOp::Eq,
            OperatorId::NotEq => BinaryOp::NotEq,
            OperatorId::Lt => BinaryOp::Lt,
            OperatorId::LtEq => BinaryOp::LtEq,
            OperatorId::Gt => BinaryOp::Gt,
            OperatorId::GtEq => BinaryOp::GtEq,
            OperatorId::AndAnd => BinaryOp::And,
            OperatorId::OrOr => BinaryOp::Or,
            OperatorId::XorXor => BinaryOp::Xor,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        operators::as_str(self.operator_id())
    }

    pub fn precedence(self) -> Precedence {
        operators::info_for(self.operator_id()).precedence
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Xor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    pub fn operator_id(self) -> OperatorId {
        match self {
            AssignOp::Assign => OperatorId::Eq,
            AssignOp::Add => OperatorId::PlusEq,
            AssignOp::Sub => OperatorId::MinusEq,
            AssignOp::Mul => OperatorId::StarEq,
            AssignOp::Div => OperatorId::SlashEq,
        }
    }

    pub fn from_operator(id: OperatorId) -> Option<Self> {
        Some(match id {
            OperatorId::Eq => AssignOp::Assign,
            OperatorId::PlusEq => AssignOp::Add,
            OperatorId::MinusEq => AssignOp::Sub,
            OperatorId::StarEq => AssignOp::Mul,
            OperatorId::SlashEq => AssignOp::Div,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        operators::as_str(self.operator_id())
    }

    /// The arithmetic operator a compound assignment applies.
    pub fn binary(self) -> Option<BinaryOp> {
        operators::compound_base(self.operator_id()).and_then(BinaryOp::from_operator)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Bool(bool),
    Ident(Ident),
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Ternary {
        cond: Box<Spanned<Expr>>,
        then_expr: Box<Spanned<Expr>>,
        else_expr: Box<Spanned<Expr>>,
    },
    /// Function call or constructor; `callee` names a function, builtin type or struct.
    Call {
        callee: Spanned<Ident>,
        args: Vec<Spanned<Expr>>,
        /// Span from `(` to `)` inclusive.
        args_span: Span,
    },
    Index {
        base: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    /// Struct field access or vector swizzle.
    Member {
        base: Box<Spanned<Expr>>,
        field: Spanned<Ident>,
    },
    /// Comma operator.
    Sequence(Vec<Spanned<Expr>>),
}

impl Expr {
    /// Binding strength used when printing this expression.
    pub fn precedence(&self) -> Precedence {
        match self {
            Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) | Expr::Ident(_) => Precedence::Member,
            Expr::Call { .. } | Expr::Index { .. } | Expr::Member { .. } => Precedence::Member,
            Expr::Postfix { .. } => Precedence::Postfix,
            Expr::Unary { .. } => Precedence::Unary,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Ternary { .. } => Precedence::Conditional,
            Expr::Assign { .. } => Precedence::Assign,
            Expr::Sequence(_) => Precedence::Comma,
        }
    }
}

// ============================================================================
// Traversal helpers
// ============================================================================

/// Call `f` on `expr` and every sub-expression, parents first.
pub fn walk_expr<'a>(expr: &'a Spanned<Expr>, f: &mut impl FnMut(&'a Spanned<Expr>)) {
    f(expr);
    match &expr.node {
        Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) | Expr::Ident(_) => {}
        Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => walk_expr(operand, f),
        Expr::Binary { left, right, .. } => {
            walk_expr(left, f);
            walk_expr(right, f);
        }
        Expr::Assign { target, value, .. } => {
            walk_expr(target, f);
            walk_expr(value, f);
        }
        Expr::Ternary {
            cond,
            then_expr,
            else_expr,
        } => {
            walk_expr(cond, f);
            walk_expr(then_expr, f);
            walk_expr(else_expr, f);
        }
        Expr::Call { args, .. } => args.iter().for_each(|a| walk_expr(a, f)),
        Expr::Index { base, index } => {
            walk_expr(base, f);
            walk_expr(index, f);
        }
        Expr::Member { base, .. } => walk_expr(base, f),
        Expr::Sequence(items) => items.iter().for_each(|e| walk_expr(e, f)),
    }
}
