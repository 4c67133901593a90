//! First-pass collection: register structs, global variables, function signatures and directives.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::*;
use glslx_core::lang::extensions;

use super::{ConstValue, TypeChecker};

impl TypeChecker<'_> {
    /// Register every top-level declaration of `program` in the module scope.
    ///
    /// Struct names go first so any signature or global may refer to a struct declared later in the file.
    pub(crate) fn collect_program(&mut self, program: &Program) {
        let mut structs = Vec::new();
        for decl in &program.declarations {
            if let Declaration::Struct(s) = &decl.node {
                structs.push(self.declare_struct(s));
            }
        }

        let mut structs = structs.into_iter();
        for decl in &program.declarations {
            match &decl.node {
                Declaration::Struct(s) => {
                    if let Some(id) = structs.next() {
                        self.collect_struct_fields(id, s, decl.span);
                    }
                }
                Declaration::Variables(group) => self.collect_global_variables(group),
                Declaration::Function(f) => self.collect_function(f),
                Declaration::Extension(ext) => self.collect_extension(ext),
                Declaration::Include(_) | Declaration::Version(_) | Declaration::Precision(_) => {}
            }
        }
    }

    // ========================================================================
    // Structs
    // ========================================================================

    fn declare_struct(&mut self, decl: &StructDecl) -> SymbolId {
        let symbol = Symbol::new(
            decl.name.node.clone(),
            SymbolKind::Struct(StructInfo::default()),
            decl.name.span,
        )
        .with_linkage(decl.linkage)
        .with_doc(decl.doc.clone());
        self.declare(symbol)
    }

    fn collect_struct_fields(&mut self, id: SymbolId, decl: &StructDecl, span: Span) {
        let scope = self.symbols.enter_scope(ScopeKind::Struct, Some(span));
        let mut fields = Vec::new();
        for group in &decl.fields {
            for declarator in &group.node.declarators {
                let d = &declarator.node;
                let ty = self.resolve_type(&group.node.ty, d.array_size.as_ref());
                if ty == ResolvedType::Struct(id, decl.name.node.clone()) || ty.is_void() {
                    self.error(CompileError::type_error(
                        format!("Field \"{}\" cannot have type \"{ty}\"", d.name.node),
                        group.node.ty.name.span,
                    ));
                }
                let mut info = VariableInfo::new(ty.clone(), VariableRole::Field);
                info.precision = group.node.ty.precision;
                let symbol = Symbol::new(d.name.node.clone(), SymbolKind::Variable(info), d.name.span)
                    .with_doc(group.node.doc.clone());
                let field = self.declare(symbol);
                fields.push(FieldInfo {
                    name: d.name.node.clone(),
                    ty,
                    symbol: field,
                });
            }
        }
        self.symbols.exit_scope();
        if fields.is_empty() {
            self.error(CompileError::type_error(
                format!("Struct \"{}\" must have at least one field", decl.name.node),
                decl.name.span,
            ));
        }
        if let Some(SymbolKind::Struct(info)) = self.symbols.get_mut(id).map(|s| &mut s.kind) {
            info.fields = fields;
            info.scope = scope;
        }
    }

    // ========================================================================
    // Global variables
    // ========================================================================

    fn collect_global_variables(&mut self, group: &VariableGroup) {
        for declarator in &group.declarators {
            let symbol = self.variable_symbol(group, &declarator.node, VariableRole::Global);
            self.declare(symbol);
        }
    }

    /// Build the symbol for one declarator; the caller declares it.
    ///
    /// ## Notes
    /// - The initializer is only folded here, not checked; a `const` keeps its value only when the folded value has
    ///   the declared type.
    pub(crate) fn variable_symbol(
        &mut self,
        group: &VariableGroup,
        declarator: &VariableDeclarator,
        role: VariableRole,
    ) -> Symbol {
        let ty = self.resolve_type(&group.ty, declarator.array_size.as_ref());
        let mut info = VariableInfo::new(ty.clone(), role);
        info.storage = group.storage;
        info.precision = group.ty.precision;
        info.invariant = group.invariant;
        if group.storage == StorageQualifier::Const {
            info.constant = declarator
                .init
                .as_ref()
                .and_then(|init| self.fold_initializer(init))
                .filter(|value| value.ty() == ty);
        }
        Symbol::new(declarator.name.node.clone(), SymbolKind::Variable(info), declarator.name.span)
            .with_linkage(group.linkage)
            .with_doc(group.doc.clone())
    }

    /// Fold an initializer without reporting anything (it is checked later).
    fn fold_initializer(&self, init: &Spanned<Expr>) -> Option<ConstValue> {
        let lookup = |ident: &Spanned<Expr>| {
            let Expr::Ident(name) = &ident.node else {
                return None;
            };
            let id = self.symbols.lookup(name)?;
            self.symbols.get(id)?.as_variable()?.constant
        };
        super::const_eval::eval(init, &lookup)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn collect_function(&mut self, decl: &FunctionDecl) {
        let return_type = self.resolve_type(&decl.return_type, None);
        let params: Vec<ParamInfo> = decl
            .params
            .iter()
            .map(|p| ParamInfo {
                name: p.node.name.as_ref().map(|n| n.node.clone()),
                ty: self.resolve_type(&p.node.ty, p.node.array_size.as_ref()),
                direction: p.node.direction,
                is_const: p.node.is_const,
            })
            .collect();
        let info = FunctionInfo {
            params,
            return_type,
            has_body: decl.body.is_some(),
        };
        let name = &decl.name;
        let is_builtin = self.is_builtin_span(name.span);

        if !is_builtin && glslx_core::lang::reserved::is_reserved_identifier(&name.node) {
            self.error(errors::reserved_identifier(&name.node, name.span));
        }

        let existing: Vec<SymbolId> = self.symbols.lookup_local(&name.node).to_vec();
        let mut merged = None;
        for id in existing {
            let Some((at, previous, previous_builtin)) = self.symbols.get(id).map(|symbol| {
                (
                    self.location(symbol.span),
                    symbol.as_function().cloned(),
                    symbol.is_builtin,
                )
            }) else {
                continue;
            };
            let Some(previous) = previous else {
                self.error(errors::duplicate_definition(&name.node, name.span, at));
                return;
            };
            if !previous.same_params(&info) {
                continue;
            }
            if previous_builtin && !is_builtin {
                self.error(CompileError::type_error(
                    format!("Cannot redefine the builtin function \"{}\"", name.node),
                    name.span,
                ));
                return;
            }
            if previous.return_type != info.return_type {
                self.error(
                    CompileError::type_error(
                        format!("\"{}\" differs from a previous declaration only by its return type", name.node),
                        name.span,
                    )
                    .with_note(format!("The previous declaration is at {}", at.unwrap_or_default())),
                );
                return;
            }
            if previous.has_body && info.has_body {
                self.error(errors::duplicate_definition(&name.node, name.span, at));
                return;
            }
            merged = Some(id);
            break;
        }

        let id = match merged {
            Some(id) => {
                if let Some(symbol) = self.symbols.get_mut(id) {
                    symbol.declarations.push(name.span);
                    if symbol.doc.is_none() {
                        symbol.doc = decl.doc.clone();
                    }
                    if decl.linkage != Linkage::Internal {
                        symbol.linkage = decl.linkage;
                    }
                    if let SymbolKind::Function(previous) = &mut symbol.kind {
                        if info.has_body {
                            *previous = info;
                        }
                    }
                }
                self.record_occurrence(name.span, id, true);
                id
            }
            None => {
                // Overloads without their own docs share the first documented overload's.
                let doc = decl.doc.clone().or_else(|| {
                    self.symbols
                        .lookup_local(&name.node)
                        .iter()
                        .find_map(|&id| self.symbols.get(id).and_then(|s| s.doc.clone()))
                });
                let symbol = Symbol::new(name.node.clone(), SymbolKind::Function(info), name.span)
                    .with_linkage(decl.linkage)
                    .with_doc(doc)
                    .builtin(is_builtin);
                let id = self.symbols.define(symbol);
                self.record_occurrence(name.span, id, true);
                id
            }
        };
        self.function_ids.insert(name.span, id);

        if decl.linkage == Linkage::Export && !self.type_info.entry_points.contains(&id) {
            self.type_info.entry_points.push(id);
        }
    }

    // ========================================================================
    // Directives
    // ========================================================================

    fn collect_extension(&mut self, decl: &ExtensionDecl) {
        match extensions::from_str(&decl.name.node) {
            Some(id) => {
                if decl.behavior == "disable" {
                    self.type_info.enabled_extensions.remove(&id);
                } else {
                    self.type_info.enabled_extensions.insert(id);
                }
            }
            None => self.error(CompileError::warning(
                format!("Unknown extension \"{}\"", decl.name.node),
                decl.name.span,
            )),
        }
    }
}
