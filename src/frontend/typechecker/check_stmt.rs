//! Statement checking: local declarations, control flow, returns.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::CompileError;
use crate::frontend::symbols::*;

use super::TypeChecker;

impl TypeChecker<'_> {
    // ========================================================================
    // Statements
    // ========================================================================

    pub(crate) fn check_stmts(&mut self, stmts: &[Spanned<Stmt>]) {
        for stmt in stmts {
            self.check_stmt(stmt);
        }
    }

    /// Validate a statement and its subexpressions.
    ///
    /// Blocks open a scope; loops open a loop scope so `break`/`continue` can be validated.
    pub(crate) fn check_stmt(&mut self, stmt: &Spanned<Stmt>) {
        match &stmt.node {
            Stmt::Block(block) => {
                self.symbols.enter_scope(ScopeKind::Block, Some(stmt.span));
                self.check_stmts(&block.stmts);
                self.symbols.exit_scope();
            }
            Stmt::Variables(group) => self.check_local_variables(group, stmt.span),
            Stmt::Expr(expr) => {
                self.check_expr(expr);
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.check_condition(cond);
                self.check_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch);
                }
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                self.symbols.enter_scope(ScopeKind::Loop, Some(stmt.span));
                if let Some(init) = init {
                    self.check_stmt(init);
                }
                if let Some(cond) = cond {
                    self.check_condition(cond);
                }
                if let Some(update) = update {
                    self.check_expr(update);
                }
                self.check_loop_body(body);
                self.symbols.exit_scope();
            }
            Stmt::While { cond, body } => {
                self.symbols.enter_scope(ScopeKind::Loop, Some(stmt.span));
                self.check_condition(cond);
                self.check_loop_body(body);
                self.symbols.exit_scope();
            }
            Stmt::DoWhile { body, cond } => {
                self.symbols.enter_scope(ScopeKind::Loop, Some(stmt.span));
                self.check_loop_body(body);
                self.check_condition(cond);
                self.symbols.exit_scope();
            }
            Stmt::Return(value) => self.check_return(value.as_ref(), stmt.span),
            Stmt::Break | Stmt::Continue => {
                if !self.symbols.in_loop() {
                    let word = if matches!(stmt.node, Stmt::Break) { "break" } else { "continue" };
                    self.error(CompileError::syntax(
                        format!("\"{word}\" can only be used inside a loop"),
                        stmt.span,
                    ));
                }
            }
            Stmt::Discard | Stmt::Empty => {}
        }
    }

    /// A loop body block shares the loop scope, so `for (int i;;) { int i; }` is a redeclaration.
    fn check_loop_body(&mut self, body: &Spanned<Stmt>) {
        match &body.node {
            Stmt::Block(block) => self.check_stmts(&block.stmts),
            _ => self.check_stmt(body),
        }
    }

    fn check_condition(&mut self, cond: &Spanned<Expr>) {
        let ty = self.check_expr(cond);
        self.expect_type(&ResolvedType::BOOL, &ty, cond.span);
    }

    fn check_return(&mut self, value: Option<&Spanned<Expr>>, span: Span) {
        let expected = self.current_return.clone();
        match value {
            Some(value) => {
                let found = self.check_expr(value);
                if expected.is_void() {
                    self.error(CompileError::type_error(
                        "Cannot return a value from a function returning \"void\"",
                        value.span,
                    ));
                } else {
                    self.expect_type(&expected, &found, value.span);
                }
            }
            None => {
                if !expected.is_void() && !expected.is_unknown() {
                    self.error(CompileError::type_error(
                        format!("Must return a value of type \"{expected}\""),
                        span,
                    ));
                }
            }
        }
    }

    // ========================================================================
    // Local variables
    // ========================================================================

    fn check_local_variables(&mut self, group: &VariableGroup, span: Span) {
        self.check_group_qualifiers(group, span, false);
        if group.linkage != Linkage::Internal {
            self.error(CompileError::type_error(
                "\"import\" and \"export\" only apply to global declarations",
                span,
            ));
        }
        for declarator in &group.declarators {
            let d = &declarator.node;
            // The initializer cannot see the variable it initializes.
            let symbol = self.variable_symbol(group, d, VariableRole::Local);
            let ty = symbol.as_variable().map(|v| v.ty.clone()).unwrap_or(ResolvedType::Unknown);
            self.check_declarator(group, d, &ty, false);
            self.declare(symbol);
        }
    }
}
