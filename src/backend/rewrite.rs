//! Semantics-preserving rewrites applied before printing.
//!
//! - Scalar `const` variables are inlined at every use; local `const` lines that were fully inlined are dropped.
//! - Scalar literal arithmetic, comparisons, logic and scalar constructors are folded.
//! - `?:`, `if` and `while` with constant conditions keep only the branch that runs.
//! - Statements after `return`, `break`, `continue` or `discard` in the same block are removed.
//!
//! Folded expressions keep the span of the expression they replace, so span-keyed information from the checker
//! still lines up with whatever survives.

use crate::frontend::ast::*;
use crate::frontend::symbols::Symbol;
use crate::frontend::typechecker::ConstValue;
use crate::frontend::typechecker::const_eval;
use crate::frontend::unit::CompiledUnit;

/// Rewrite `program` (a copy of the unit's program) in place.
#[tracing::instrument(skip_all)]
pub fn rewrite(program: &mut Program, unit: &CompiledUnit) {
    let rewriter = Rewriter { unit };
    for decl in &mut program.declarations {
        match &mut decl.node {
            Declaration::Variables(group) => rewriter.variable_group(group),
            Declaration::Struct(s) => {
                for field in &mut s.fields {
                    rewriter.variable_group(&mut field.node);
                }
            }
            Declaration::Function(f) => {
                for param in &mut f.params {
                    if let Some(size) = &mut param.node.array_size {
                        rewriter.expr(size);
                    }
                }
                if let Some(body) = &mut f.body {
                    rewriter.block(&mut body.node.stmts);
                }
            }
            Declaration::Include(_)
            | Declaration::Extension(_)
            | Declaration::Version(_)
            | Declaration::Precision(_) => {}
        }
    }
}

struct Rewriter<'a> {
    unit: &'a CompiledUnit,
}

impl Rewriter<'_> {
    fn constant_of(&self, span: Span) -> Option<ConstValue> {
        let id = self.unit.info.symbol_at(span)?;
        self.unit.symbols.get(id).and_then(Symbol::as_variable)?.constant
    }

    fn variable_group(&self, group: &mut VariableGroup) {
        for declarator in &mut group.declarators {
            if let Some(size) = &mut declarator.node.array_size {
                self.expr(size);
            }
            if let Some(init) = &mut declarator.node.init {
                self.expr(init);
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn block(&self, stmts: &mut Vec<Spanned<Stmt>>) {
        for stmt in stmts.iter_mut() {
            self.stmt(stmt);
        }
        stmts.retain(|s| !matches!(s.node, Stmt::Empty) && !self.is_inlined_constant(&s.node));
        if let Some(end) = stmts.iter().position(|s| s.node.is_terminator()) {
            stmts.truncate(end + 1);
        }
    }

    /// A local `const` line whose every declarator carries a folded value (all its uses were inlined).
    fn is_inlined_constant(&self, stmt: &Stmt) -> bool {
        let Stmt::Variables(group) = stmt else {
            return false;
        };
        group.storage == StorageQualifier::Const
            && group
                .declarators
                .iter()
                .all(|d| self.constant_of(d.node.name.span).is_some())
    }

    fn stmt(&self, stmt: &mut Spanned<Stmt>) {
        match &mut stmt.node {
            Stmt::Block(block) => self.block(&mut block.stmts),
            Stmt::Variables(group) => self.variable_group(group),
            Stmt::Expr(expr) => self.expr(expr),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(cond);
                self.stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.stmt(else_branch);
                }
                if let Expr::Bool(value) = cond.node {
                    let taken = if value {
                        Some(std::mem::replace(&mut then_branch.node, Stmt::Empty))
                    } else {
                        else_branch.as_mut().map(|e| std::mem::replace(&mut e.node, Stmt::Empty))
                    };
                    stmt.node = taken.unwrap_or(Stmt::Empty);
                }
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.stmt(init);
                }
                if let Some(cond) = cond {
                    self.expr(cond);
                }
                if let Some(update) = update {
                    self.expr(update);
                }
                self.stmt(body);
            }
            Stmt::While { cond, body } => {
                self.expr(cond);
                self.stmt(body);
                if matches!(cond.node, Expr::Bool(false)) {
                    stmt.node = Stmt::Empty;
                }
            }
            Stmt::DoWhile { body, cond } => {
                self.stmt(body);
                self.expr(cond);
            }
            Stmt::Return(Some(value)) => self.expr(value),
            Stmt::Return(None) | Stmt::Break | Stmt::Continue | Stmt::Discard | Stmt::Empty => {}
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expr(&self, expr: &mut Spanned<Expr>) {
        match &mut expr.node {
            Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) => return,
            Expr::Ident(_) => {
                if let Some(value) = self.constant_of(expr.span) {
                    expr.node = value.to_expr();
                }
                return;
            }
            Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => self.expr(operand),
            Expr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::Assign { target, value, .. } => {
                self.expr(target);
                self.expr(value);
            }
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.expr(cond);
                self.expr(then_expr);
                self.expr(else_expr);
                if let Expr::Bool(value) = cond.node {
                    let taken = if value { then_expr } else { else_expr };
                    expr.node = std::mem::replace(&mut taken.node, Expr::Bool(false));
                    return;
                }
            }
            Expr::Call { args, .. } => args.iter_mut().for_each(|a| self.expr(a)),
            Expr::Index { base, index } => {
                self.expr(base);
                self.expr(index);
            }
            Expr::Member { base, .. } => self.expr(base),
            Expr::Sequence(items) => items.iter_mut().for_each(|e| self.expr(e)),
        }

        // Children are folded, so any constant sub-expression is a literal by now.
        if let Some(value) = const_eval::eval(expr, &|_| None) {
            expr.node = value.to_expr();
        }
    }
}
