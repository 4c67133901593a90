//! Print one shader from the (rewritten) program.
//!
//! The printer keeps declarations whose symbol is in the shader's kept set. Structs and variables come first, then
//! functions, each group in source order; GLSL needs a name declared before use while glslx allows forward
//! references at module scope.
//! Names go through the renaming table; the shader's own entry point is printed as `main`. Parentheses come from
//! operator precedence, never from the source, so redundant ones disappear.
//!
//! ## Notes
//!
//! - `import` declarations are never printed and `export` is dropped from the ones that are.
//! - Prototypes print their parameter types only.
//! - Floats print at single precision, minified as the shorter of `1.5`/`15e-1` forms with leading zeros removed.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::glsl_emitter::GlslEmitter;
use super::reachability;
use super::rename::Renaming;
use crate::frontend::ast::*;
use crate::frontend::symbols::SymbolId;
use crate::frontend::unit::CompiledUnit;
use glslx_core::lang::operators::Precedence;
use glslx_core::lang::types as builtin_types;

pub struct ShaderPrinter<'a> {
    unit: &'a CompiledUnit,
    renaming: &'a Renaming,
    entry: SymbolId,
    kept: &'a BTreeSet<SymbolId>,
    out: GlslEmitter,
}

impl<'a> ShaderPrinter<'a> {
    pub fn new(
        unit: &'a CompiledUnit,
        renaming: &'a Renaming,
        entry: SymbolId,
        kept: &'a BTreeSet<SymbolId>,
        pretty: bool,
    ) -> Self {
        Self {
            unit,
            renaming,
            entry,
            kept,
            out: GlslEmitter::new(pretty),
        }
    }

    /// Print the shader.
    ///
    /// ## Parameters
    ///
    /// - `program`: declarations to print from.
    /// - `extensions`: `(name, behavior)` pairs for the `#extension` lines this shader needs.
    pub fn print(mut self, program: &Program, extensions: &[(String, String)]) -> String {
        for decl in &program.declarations {
            if let Declaration::Version(v) = &decl.node {
                self.out.directive(&format!("#version {}", v.version));
            }
        }
        for (name, behavior) in extensions {
            self.out.directive(&format!("#extension {name} : {behavior}"));
        }
        for decl in &program.declarations {
            if let Declaration::Precision(p) = &decl.node {
                self.out.token("precision");
                self.out.token(p.precision.as_str());
                self.out.token(&p.ty.node);
                self.out.token(";");
                self.out.newline();
            }
        }
        for decl in &program.declarations {
            match &decl.node {
                Declaration::Variables(group) if group.linkage != Linkage::Import => {
                    let declarators: Vec<&Spanned<VariableDeclarator>> = group
                        .declarators
                        .iter()
                        .filter(|d| self.is_kept(d.node.name.span))
                        .collect();
                    if !declarators.is_empty() {
                        self.group(group, &declarators);
                        self.out.newline();
                    }
                }
                Declaration::Struct(s) if s.linkage != Linkage::Import && self.is_kept(s.name.span) => {
                    self.structure(s);
                    self.out.newline();
                }
                _ => {}
            }
        }
        self.functions(program);
        self.out.finish()
    }

    fn is_kept(&self, name_span: Span) -> bool {
        self.unit
            .info
            .symbol_at(name_span)
            .is_some_and(|id| self.kept.contains(&id))
    }

    /// Print a name through the renaming table.
    fn ident(&mut self, span: Span, written: &str) {
        let renaming = self.renaming;
        let text = match self.unit.info.symbol_at(span) {
            Some(id) if id == self.entry => "main",
            Some(id) => renaming.name(id).unwrap_or(written),
            None => written,
        };
        self.out.token(text);
    }

    fn type_ref(&mut self, ty: &TypeRef) {
        if let Some(precision) = ty.precision {
            self.out.token(precision.as_str());
        }
        if builtin_types::from_str(&ty.name.node).is_some() {
            self.out.token(&ty.name.node);
        } else {
            self.ident(ty.name.span, &ty.name.node);
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn group(&mut self, group: &VariableGroup, declarators: &[&Spanned<VariableDeclarator>]) {
        if group.invariant {
            self.out.token("invariant");
        }
        if let Some(storage) = group.storage.as_str() {
            self.out.token(storage);
        }
        self.type_ref(&group.ty);
        for (i, declarator) in declarators.iter().enumerate() {
            if i > 0 {
                self.out.comma();
            }
            let d = &declarator.node;
            self.ident(d.name.span, &d.name.node);
            if let Some(size) = &d.array_size {
                self.out.token("[");
                self.expr(size, Precedence::Lowest);
                self.out.token("]");
            }
            if let Some(init) = &d.init {
                self.out.operator("=");
                self.expr(init, Precedence::Assign);
            }
        }
        self.out.token(";");
    }

    /// Functions in source order, with a prototype ahead of any call that precedes the callee's definition.
    fn functions(&mut self, program: &Program) {
        let functions: Vec<(SymbolId, &FunctionDecl)> = program
            .declarations
            .iter()
            .filter_map(|decl| match &decl.node {
                Declaration::Function(f) if f.linkage != Linkage::Import => {
                    let id = self.unit.info.symbol_at(f.name.span)?;
                    self.kept.contains(&id).then_some((id, f))
                }
                _ => None,
            })
            .collect();
        let definitions: HashMap<SymbolId, &FunctionDecl> = functions
            .iter()
            .filter(|(_, f)| f.body.is_some())
            .map(|&(id, f)| (id, f))
            .collect();

        let mut declared: HashSet<SymbolId> = HashSet::new();
        for &(id, f) in &functions {
            if f.body.is_some() {
                for callee in reachability::function_references(f, self.unit) {
                    if callee == id || declared.contains(&callee) {
                        continue;
                    }
                    if let Some(definition) = definitions.get(&callee) {
                        self.out.blank_line();
                        self.function(&FunctionDecl {
                            body: None,
                            ..(*definition).clone()
                        });
                        self.out.newline();
                        declared.insert(callee);
                    }
                }
            }
            self.out.blank_line();
            self.function(f);
            self.out.newline();
            declared.insert(id);
        }
    }

    fn function(&mut self, f: &FunctionDecl) {
        self.type_ref(&f.return_type);
        self.ident(f.name.span, &f.name.node);
        self.out.token("(");
        for (i, param) in f.params.iter().enumerate() {
            if i > 0 {
                self.out.comma();
            }
            let p = &param.node;
            if p.is_const {
                self.out.token("const");
            }
            if p.direction != ParamDirection::In {
                self.out.token(p.direction.as_str());
            }
            self.type_ref(&p.ty);
            if f.body.is_some() {
                if let Some(name) = &p.name {
                    self.ident(name.span, &name.node);
                }
            }
            if let Some(size) = &p.array_size {
                self.out.token("[");
                self.expr(size, Precedence::Lowest);
                self.out.token("]");
            }
        }
        self.out.token(")");
        match &f.body {
            Some(body) => {
                self.out.space();
                self.block(&body.node.stmts);
            }
            None => self.out.token(";"),
        }
    }

    fn structure(&mut self, s: &StructDecl) {
        self.out.token("struct");
        self.ident(s.name.span, &s.name.node);
        self.out.space();
        self.out.token("{");
        self.out.indent();
        for field in &s.fields {
            self.out.newline();
            let declarators: Vec<&Spanned<VariableDeclarator>> = field.node.declarators.iter().collect();
            self.group(&field.node, &declarators);
        }
        self.out.dedent();
        self.out.newline();
        self.out.token("}");
        self.out.token(";");
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn block(&mut self, stmts: &[Spanned<Stmt>]) {
        self.out.token("{");
        if stmts.is_empty() {
            self.out.token("}");
            return;
        }
        self.out.indent();
        for stmt in stmts {
            self.out.newline();
            self.stmt(&stmt.node);
        }
        self.out.dedent();
        self.out.newline();
        self.out.token("}");
    }

    /// A loop or branch body: blocks stay on the header line, single statements go on their own line.
    fn body(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => {
                self.out.space();
                self.block(&block.stmts);
            }
            _ => {
                self.out.indent();
                self.out.newline();
                self.stmt(stmt);
                self.out.dedent();
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block(&block.stmts),
            Stmt::Variables(group) => {
                let declarators: Vec<&Spanned<VariableDeclarator>> = group.declarators.iter().collect();
                self.group(group, &declarators);
            }
            Stmt::Expr(expr) => {
                self.expr(expr, Precedence::Lowest);
                self.out.token(";");
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.out.token("if");
                self.out.space();
                self.out.token("(");
                self.expr(cond, Precedence::Lowest);
                self.out.token(")");
                // An `else` must not attach to an `if` nested at the end of the then-branch.
                if else_branch.is_some() && ends_with_open_if(&then_branch.node) {
                    self.out.space();
                    self.block(std::slice::from_ref(&**then_branch));
                } else {
                    self.body(&then_branch.node);
                }
                if let Some(else_branch) = else_branch {
                    if matches!(then_branch.node, Stmt::Block(_)) || ends_with_open_if(&then_branch.node) {
                        self.out.space();
                    } else {
                        self.out.newline();
                    }
                    self.out.token("else");
                    if matches!(else_branch.node, Stmt::If { .. }) {
                        self.out.space();
                        self.stmt(&else_branch.node);
                    } else {
                        self.body(&else_branch.node);
                    }
                }
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                self.out.token("for");
                self.out.space();
                self.out.token("(");
                match init {
                    Some(init) => self.stmt(&init.node),
                    None => self.out.token(";"),
                }
                if let Some(cond) = cond {
                    self.out.space();
                    self.expr(cond, Precedence::Lowest);
                }
                self.out.token(";");
                if let Some(update) = update {
                    self.out.space();
                    self.expr(update, Precedence::Lowest);
                }
                self.out.token(")");
                self.body(&body.node);
            }
            Stmt::While { cond, body } => {
                self.out.token("while");
                self.out.space();
                self.out.token("(");
                self.expr(cond, Precedence::Lowest);
                self.out.token(")");
                self.body(&body.node);
            }
            Stmt::DoWhile { body, cond } => {
                self.out.token("do");
                self.body(&body.node);
                if matches!(body.node, Stmt::Block(_)) {
                    self.out.space();
                } else {
                    self.out.newline();
                }
                self.out.token("while");
                self.out.space();
                self.out.token("(");
                self.expr(cond, Precedence::Lowest);
                self.out.token(")");
                self.out.token(";");
            }
            Stmt::Return(value) => {
                self.out.token("return");
                if let Some(value) = value {
                    self.out.space();
                    self.expr(value, Precedence::Lowest);
                }
                self.out.token(";");
            }
            Stmt::Break => self.keyword_stmt("break"),
            Stmt::Continue => self.keyword_stmt("continue"),
            Stmt::Discard => self.keyword_stmt("discard"),
            Stmt::Empty => self.out.token(";"),
        }
    }

    fn keyword_stmt(&mut self, keyword: &str) {
        self.out.token(keyword);
        self.out.token(";");
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Print `expr`, parenthesized if it binds more loosely than `min`.
    fn expr(&mut self, expr: &Spanned<Expr>, min: Precedence) {
        let parens = precedence(&expr.node) < min;
        if parens {
            self.out.token("(");
        }
        match &expr.node {
            Expr::Int(i) => self.out.token(&i.to_string()),
            Expr::Float(f) => {
                let text = format_float(*f, self.out.is_pretty());
                self.out.token(&text);
            }
            Expr::Bool(b) => self.out.token(if *b { "true" } else { "false" }),
            Expr::Ident(name) => self.ident(expr.span, name),
            Expr::Unary { op, operand } => {
                self.out.token(op.as_str());
                self.expr(operand, Precedence::Unary);
            }
            Expr::Postfix { op, operand } => {
                self.expr(operand, Precedence::Postfix);
                self.out.token(op.as_str());
            }
            Expr::Binary { op, left, right } => {
                self.expr(left, op.precedence());
                self.out.operator(op.as_str());
                self.expr(right, op.precedence().next());
            }
            Expr::Assign { op, target, value } => {
                self.expr(target, Precedence::Unary);
                self.out.operator(op.as_str());
                self.expr(value, Precedence::Assign);
            }
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.expr(cond, Precedence::LogicalOr);
                self.out.operator("?");
                self.expr(then_expr, Precedence::Assign);
                self.out.operator(":");
                self.expr(else_expr, Precedence::Conditional);
            }
            Expr::Call { callee, args, .. } => {
                if builtin_types::from_str(&callee.node).is_some() {
                    self.out.token(&callee.node);
                } else {
                    self.ident(callee.span, &callee.node);
                }
                self.out.token("(");
                self.expr_list(args);
                self.out.token(")");
            }
            Expr::Index { base, index } => {
                self.expr(base, Precedence::Postfix);
                self.out.token("[");
                self.expr(index, Precedence::Lowest);
                self.out.token("]");
            }
            Expr::Member { base, field } => {
                self.expr(base, Precedence::Postfix);
                self.out.raw(".");
                self.ident(field.span, &field.node);
            }
            Expr::Sequence(items) => self.expr_list(items),
        }
        if parens {
            self.out.token(")");
        }
    }

    fn expr_list(&mut self, items: &[Spanned<Expr>]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.comma();
            }
            self.expr(item, Precedence::Assign);
        }
    }
}

/// Printing precedence; negative literals print with a leading `-` and bind like unary minus.
fn precedence(expr: &Expr) -> Precedence {
    match expr {
        Expr::Int(i) if *i < 0 => Precedence::Unary,
        Expr::Float(f) if f.is_sign_negative() => Precedence::Unary,
        _ => expr.precedence(),
    }
}

/// Whether `stmt` ends in an `if` with no `else` that a following `else` would bind to.
fn ends_with_open_if(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::If { else_branch: None, .. } => true,
        Stmt::If {
            else_branch: Some(e), ..
        } => ends_with_open_if(&e.node),
        Stmt::For { body, .. } | Stmt::While { body, .. } => ends_with_open_if(&body.node),
        _ => false,
    }
}

/// GLSL text for a float literal at single precision.
pub(crate) fn format_float(value: f64, pretty: bool) -> String {
    let value = value as f32;
    let magnitude = value.abs();
    let sign = if value.is_sign_negative() { "-" } else { "" };

    let mut decimal = magnitude.to_string();
    if !decimal.contains('.') {
        decimal.push_str(if pretty { ".0" } else { "." });
    }
    if !pretty && decimal.len() > 2 && decimal.starts_with("0.") {
        decimal.remove(0);
    }
    let exponent = format!("{magnitude:e}");
    let text = if exponent.len() < decimal.len() && (!pretty || decimal.len() > 12) {
        exponent
    } else {
        decimal
    };
    format!("{sign}{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(1.0, false), "1.");
        assert_eq!(format_float(1.0, true), "1.0");
        assert_eq!(format_float(0.5, false), ".5");
        assert_eq!(format_float(0.5, true), "0.5");
        assert_eq!(format_float(0.0, false), "0.");
        assert_eq!(format_float(-0.25, false), "-.25");
        assert_eq!(format_float(0.1, false), ".1");
        assert_eq!(format_float(1000.0, false), "1e3");
        assert_eq!(format_float(1000.0, true), "1000.0");
    }

    #[test]
    fn test_open_if_detection() {
        let span = Span::default();
        let open = Stmt::If {
            cond: Spanned::new(Expr::Bool(true), span),
            then_branch: Box::new(Spanned::new(Stmt::Discard, span)),
            else_branch: None,
        };
        assert!(ends_with_open_if(&open));
        let looped = Stmt::While {
            cond: Spanned::new(Expr::Bool(true), span),
            body: Box::new(Spanned::new(open, span)),
        };
        assert!(ends_with_open_if(&looped));
        assert!(!ends_with_open_if(&Stmt::Break));
    }
}
