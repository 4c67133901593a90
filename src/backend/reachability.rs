//! Which symbols an entry point needs.
//!
//! Starting from one exported function, follow every symbol referenced by a kept declaration: callees, variables,
//! struct types in signatures and fields, and names used in global initializers and array sizes. Builtins are
//! collected too so the emitter knows which `#extension` lines a shader needs.

use std::collections::{BTreeSet, HashMap};

use crate::frontend::ast::*;
use crate::frontend::symbols::SymbolId;
use crate::frontend::unit::CompiledUnit;

/// Top-level declarations that mention each symbol by a declaring name.
///
/// A variable group maps each declarator to its own index so an unused declarator on the same line is not pulled
/// in with its neighbours.
struct DeclarationIndex<'p> {
    by_symbol: HashMap<SymbolId, Vec<Owner<'p>>>,
}

#[derive(Clone, Copy)]
enum Owner<'p> {
    Global(&'p VariableGroup, &'p VariableDeclarator),
    Function(&'p FunctionDecl),
    Struct(&'p StructDecl),
}

impl<'p> DeclarationIndex<'p> {
    fn new(program: &'p Program, unit: &CompiledUnit) -> Self {
        let mut by_symbol: HashMap<SymbolId, Vec<Owner<'p>>> = HashMap::new();
        let mut add = |span: Span, owner: Owner<'p>| {
            if let Some(id) = unit.info.symbol_at(span) {
                by_symbol.entry(id).or_default().push(owner);
            }
        };
        for decl in &program.declarations {
            match &decl.node {
                Declaration::Variables(group) => {
                    for d in &group.declarators {
                        add(d.node.name.span, Owner::Global(group, &d.node));
                    }
                }
                Declaration::Function(f) => add(f.name.span, Owner::Function(f)),
                Declaration::Struct(s) => add(s.name.span, Owner::Struct(s)),
                Declaration::Include(_)
                | Declaration::Extension(_)
                | Declaration::Version(_)
                | Declaration::Precision(_) => {}
            }
        }
        Self { by_symbol }
    }
}

/// Every symbol reachable from `entry`, including `entry` itself and any builtins.
#[tracing::instrument(skip_all, fields(entry = entry))]
pub fn reachable_from(entry: SymbolId, program: &Program, unit: &CompiledUnit) -> BTreeSet<SymbolId> {
    let index = DeclarationIndex::new(program, unit);
    let mut seen = BTreeSet::from([entry]);
    let mut worklist = vec![entry];
    while let Some(id) = worklist.pop() {
        let Some(owners) = index.by_symbol.get(&id) else {
            continue;
        };
        let mut found = References::new(unit);
        for owner in owners {
            found.owner(*owner);
        }
        for next in found.ids {
            if seen.insert(next) {
                worklist.push(next);
            }
        }
    }
    tracing::debug!(reachable = seen.len(), "reachability done");
    seen
}

/// Symbols named anywhere in a function's signature and body, in source order.
pub(crate) fn function_references(f: &FunctionDecl, unit: &CompiledUnit) -> Vec<SymbolId> {
    let mut found = References::new(unit);
    found.function(f);
    found.ids
}

/// Collect symbols named anywhere inside declarations and statements.
struct References<'u> {
    unit: &'u CompiledUnit,
    ids: Vec<SymbolId>,
}

impl<'u> References<'u> {
    fn new(unit: &'u CompiledUnit) -> Self {
        Self { unit, ids: Vec::new() }
    }

    fn name(&mut self, span: Span) {
        if let Some(id) = self.unit.info.symbol_at(span) {
            self.ids.push(id);
        }
    }

    fn owner(&mut self, owner: Owner<'_>) {
        match owner {
            Owner::Global(group, declarator) => {
                self.type_ref(&group.ty);
                self.declarator(declarator);
            }
            Owner::Function(f) => self.function(f),
            Owner::Struct(s) => {
                for field in &s.fields {
                    self.group(&field.node);
                }
            }
        }
    }

    fn function(&mut self, f: &FunctionDecl) {
        self.type_ref(&f.return_type);
        for param in &f.params {
            self.type_ref(&param.node.ty);
            if let Some(size) = &param.node.array_size {
                self.expr(size);
            }
        }
        if let Some(body) = &f.body {
            self.stmts(&body.node.stmts);
        }
    }

    fn type_ref(&mut self, ty: &TypeRef) {
        self.name(ty.name.span);
    }

    fn group(&mut self, group: &VariableGroup) {
        self.type_ref(&group.ty);
        for d in &group.declarators {
            self.declarator(&d.node);
        }
    }

    fn declarator(&mut self, d: &VariableDeclarator) {
        if let Some(size) = &d.array_size {
            self.expr(size);
        }
        if let Some(init) = &d.init {
            self.expr(init);
        }
    }

    fn stmts(&mut self, stmts: &[Spanned<Stmt>]) {
        for stmt in stmts {
            self.stmt(&stmt.node);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.stmts(&block.stmts),
            Stmt::Variables(group) => self.group(group),
            Stmt::Expr(expr) => self.expr(expr),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(cond);
                self.stmt(&then_branch.node);
                if let Some(else_branch) = else_branch {
                    self.stmt(&else_branch.node);
                }
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.stmt(&init.node);
                }
                if let Some(cond) = cond {
                    self.expr(cond);
                }
                if let Some(update) = update {
                    self.expr(update);
                }
                self.stmt(&body.node);
            }
            Stmt::While { cond, body } | Stmt::DoWhile { body, cond } => {
                self.expr(cond);
                self.stmt(&body.node);
            }
            Stmt::Return(Some(value)) => self.expr(value),
            Stmt::Return(None) | Stmt::Break | Stmt::Continue | Stmt::Discard | Stmt::Empty => {}
        }
    }

    fn expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(expr, &mut |e| match &e.node {
            Expr::Ident(_) => self.name(e.span),
            Expr::Call { callee, .. } => self.name(callee.span),
            Expr::Member { field, .. } => self.name(field.span),
            _ => {}
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::loader::NoFileAccess;
    use crate::frontend::unit::analyze;

    fn reachable_names(source: &str, entry: &str) -> Vec<String> {
        let unit = analyze(source, &NoFileAccess);
        assert!(!unit.has_errors(), "{}", unit.log());
        let entry = unit
            .info
            .entry_points
            .iter()
            .copied()
            .find(|&id| unit.symbols.get(id).is_some_and(|s| s.name == entry))
            .expect("entry point");
        let mut names: Vec<String> = reachable_from(entry, &unit.program, &unit)
            .into_iter()
            .filter_map(|id| unit.symbols.get(id))
            .filter(|s| !s.is_builtin)
            .map(|s| s.name.clone())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_follows_calls_types_and_initializers() {
        let source = r#"
const float BASE = 0.5;
const float SCALE = BASE * 2.0;
struct Light { vec3 color; };
uniform Light light;
uniform float unusedUniform;
vec3 shade() { return light.color * SCALE; }
float helper() { return 1.0; }
export void main() { gl_FragColor = vec4(shade(), 1.0); }
"#;
        assert_eq!(
            reachable_names(source, "main"),
            vec!["BASE", "Light", "SCALE", "color", "light", "main", "shade"]
        );
    }

    #[test]
    fn test_each_entry_point_has_its_own_set() {
        let source = r#"
attribute vec2 position;
varying vec2 coord;
uniform sampler2D image;
export void vertex() { coord = position; gl_Position = vec4(position, 0.0, 1.0); }
export void fragment() { gl_FragColor = texture2D(image, coord); }
"#;
        assert_eq!(reachable_names(source, "vertex"), vec!["coord", "position", "vertex"]);
        assert_eq!(reachable_names(source, "fragment"), vec!["coord", "fragment", "image"]);
    }

    #[test]
    fn test_only_used_declarators_of_a_line() {
        let source = "uniform float a, b; export void main() { gl_FragColor = vec4(b); }";
        assert_eq!(reachable_names(source, "main"), vec!["b", "main"]);
    }
}
