//! Symbol table and scope management for glslx
//!
//! Tracks every named entity (variables, functions, structs and struct fields) together with the scopes they live
//! in. Symbols and scopes are arena-allocated; all cross references are plain indices, so the table never holds
//! reference cycles.

use std::collections::HashMap;
use std::fmt;

use crate::frontend::ast::{Linkage, ParamDirection, Precision, Span, StorageQualifier};
use crate::frontend::source::SourceId;
use crate::frontend::typechecker::ConstValue;
use glslx_core::lang::types::{self, BuiltinTypeId, ScalarKind, TypeShape};

/// Unique identifier for symbols
pub type SymbolId = usize;

/// Unique identifier for scopes
pub type ScopeId = usize;

/// Symbol table managing all named entities
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    current_scope: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: vec![Scope::new(None, ScopeKind::Module, None)],
            current_scope: 0,
        }
    }

    /// Enter a new scope covering `span` and return its id.
    pub fn enter_scope(&mut self, kind: ScopeKind, span: Option<Span>) -> ScopeId {
        let new_scope = Scope::new(Some(self.current_scope), kind, span);
        self.scopes.push(new_scope);
        self.current_scope = self.scopes.len() - 1;
        self.current_scope
    }

    /// Exit the current scope
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current_scope].parent {
            self.current_scope = parent;
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    /// Define a new symbol in the current scope.
    ///
    /// ## Notes
    /// - Names may map to several symbols (function overloads); callers check for conflicts first.
    pub fn define(&mut self, symbol: Symbol) -> SymbolId {
        let scope = self.current_scope;
        self.define_in(scope, symbol)
    }

    /// Define a symbol in an explicit scope (struct fields live in their struct's scope).
    pub fn define_in(&mut self, scope: ScopeId, mut symbol: Symbol) -> SymbolId {
        symbol.scope = scope;
        let id = self.symbols.len();
        let entry = &mut self.scopes[scope];
        entry.symbols.entry(symbol.name.clone()).or_default().push(id);
        entry.order.push(id);
        self.symbols.push(symbol);
        id
    }

    /// Look up a name in the current scope chain, returning the first symbol found.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.lookup_all(name).first().copied()
    }

    /// All symbols for `name` in the innermost scope that declares it (overload set for functions).
    pub fn lookup_all(&self, name: &str) -> &[SymbolId] {
        let mut scope_idx = Some(self.current_scope);
        while let Some(idx) = scope_idx {
            if let Some(ids) = self.scopes[idx].symbols.get(name) {
                return ids;
            }
            scope_idx = self.scopes[idx].parent;
        }
        &[]
    }

    /// Look up a name only in the current scope (no parent lookup)
    pub fn lookup_local(&self, name: &str) -> &[SymbolId] {
        self.scopes[self.current_scope]
            .symbols
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up a name in one specific scope.
    pub fn lookup_in(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope].symbols.get(name).and_then(|ids| ids.first().copied())
    }

    /// Get a symbol by ID
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Get a mutable symbol by ID
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Record a non-declaring use of `id`.
    pub fn add_reference(&mut self, id: SymbolId, span: Span) {
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.references.push(span);
        }
    }

    /// Check whether the current scope is (inside) a loop body.
    pub fn in_loop(&self) -> bool {
        let mut scope_idx = Some(self.current_scope);
        while let Some(idx) = scope_idx {
            match self.scopes[idx].kind {
                ScopeKind::Loop => return true,
                ScopeKind::Function | ScopeKind::Module => return false,
                ScopeKind::Block | ScopeKind::Struct => {}
            }
            scope_idx = self.scopes[idx].parent;
        }
        false
    }

    /// Innermost scope whose span touches `offset` in `source`; the module scope if none does.
    pub fn scope_at(&self, source: SourceId, offset: usize) -> ScopeId {
        let mut best = 0;
        let mut best_len = usize::MAX;
        for (idx, scope) in self.scopes.iter().enumerate() {
            if scope.kind == ScopeKind::Struct {
                continue;
            }
            let Some(span) = scope.span else {
                continue;
            };
            if span.source == source && span.start < offset && offset < span.end && span.len() <= best_len {
                best = idx;
                best_len = span.len();
            }
        }
        best
    }

    /// Symbols visible from `offset`: inner declarations shadow outer ones, locals only after they are declared.
    ///
    /// ## Notes
    /// - Overloads of one function name are all returned; callers collapse them if needed.
    pub fn visible_at(&self, source: SourceId, offset: usize) -> Vec<SymbolId> {
        let mut seen: HashMap<&str, ScopeId> = HashMap::new();
        let mut out = Vec::new();
        let mut scope_idx = Some(self.scope_at(source, offset));
        while let Some(idx) = scope_idx {
            let scope = &self.scopes[idx];
            for &id in &scope.order {
                let symbol = &self.symbols[id];
                if scope.kind != ScopeKind::Module && symbol.span.source == source && symbol.span.start > offset {
                    continue;
                }
                let owner = *seen.entry(symbol.name.as_str()).or_insert(idx);
                if owner == idx {
                    out.push(id);
                }
            }
            scope_idx = scope.parent;
        }
        out
    }
}

/// A scope containing symbol definitions
#[derive(Debug, Clone)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    /// Source range the scope covers; `None` for the module scope.
    pub span: Option<Span>,
    pub symbols: HashMap<String, Vec<SymbolId>>,
    /// Symbols in definition order.
    pub order: Vec<SymbolId>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>, kind: ScopeKind, span: Option<Span>) -> Self {
        Self {
            parent,
            kind,
            span,
            symbols: HashMap::new(),
            order: Vec::new(),
        }
    }
}

/// Kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
    Loop,
    Struct,
}

/// A symbol in the symbol table
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Range of the first declaring occurrence of the name.
    pub span: Span,
    pub scope: ScopeId,
    pub linkage: Linkage,
    /// Declared in the builtin prelude.
    pub is_builtin: bool,
    pub doc: Option<String>,
    /// Every declaring name range (a prototype and its definition share one symbol).
    pub declarations: Vec<Span>,
    /// Every non-declaring use.
    pub references: Vec<Span>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            span,
            scope: 0,
            linkage: Linkage::Internal,
            is_builtin: false,
            doc: None,
            declarations: vec![span],
            references: Vec::new(),
        }
    }

    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        self.doc = doc;
        self
    }

    pub fn builtin(mut self, is_builtin: bool) -> Self {
        self.is_builtin = is_builtin;
        self
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Exported symbols keep their name in emitted code.
    pub fn is_exported(&self) -> bool {
        self.linkage == Linkage::Export
    }

    pub fn is_imported(&self) -> bool {
        self.linkage == Linkage::Import
    }

    pub fn as_variable(&self) -> Option<&VariableInfo> {
        match &self.kind {
            SymbolKind::Variable(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionInfo> {
        match &self.kind {
            SymbolKind::Function(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructInfo> {
        match &self.kind {
            SymbolKind::Struct(info) => Some(info),
            _ => None,
        }
    }

    /// The declaration rendered for tooltips, e.g. `uniform highp vec2 size` or `float f(float x)`.
    pub fn signature(&self) -> String {
        match &self.kind {
            SymbolKind::Variable(info) => {
                let mut out = String::new();
                if let VariableRole::Parameter(direction) = info.role {
                    if info.storage == StorageQualifier::Const {
                        out.push_str("const ");
                    }
                    if direction != ParamDirection::In {
                        out.push_str(direction.as_str());
                        out.push(' ');
                    }
                } else if let Some(storage) = info.storage.as_str() {
                    out.push_str(storage);
                    out.push(' ');
                }
                if let Some(precision) = info.precision {
                    out.push_str(precision.as_str());
                    out.push(' ');
                }
                match &info.ty {
                    ResolvedType::Array(element, size) => {
                        out.push_str(&format!("{element} {}[{}]", self.name, ArraySize(*size)));
                    }
                    ty => out.push_str(&format!("{ty} {}", self.name)),
                }
                if let Some(value) = &info.constant {
                    out.push_str(&format!(" = {value}"));
                }
                out
            }
            SymbolKind::Function(info) => info.signature(&self.name),
            SymbolKind::Struct(info) => {
                let fields: String = info.fields.iter().map(|f| format!(" {} {};", f.ty, f.name)).collect();
                format!("struct {} {{{fields} }}", self.name)
            }
        }
    }
}

/// Kind of symbol
#[derive(Debug, Clone)]
pub enum SymbolKind {
    Variable(VariableInfo),
    Function(FunctionInfo),
    Struct(StructInfo),
}

impl SymbolKind {
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Variable(_) => "variable",
            SymbolKind::Function(_) => "function",
            SymbolKind::Struct(_) => "struct",
        }
    }
}

/// Where a variable was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRole {
    Global,
    Local,
    Parameter(ParamDirection),
    Field,
}

/// Variable information
#[derive(Debug, Clone)]
pub struct VariableInfo {
    pub ty: ResolvedType,
    pub role: VariableRole,
    pub storage: StorageQualifier,
    pub precision: Option<Precision>,
    pub invariant: bool,
    /// Value of a `const` variable with a constant scalar initializer.
    pub constant: Option<ConstValue>,
}

impl VariableInfo {
    pub fn new(ty: ResolvedType, role: VariableRole) -> Self {
        Self {
            ty,
            role,
            storage: StorageQualifier::None,
            precision: None,
            invariant: false,
            constant: None,
        }
    }
}

/// Function parameter as seen by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: Option<String>,
    pub ty: ResolvedType,
    pub direction: ParamDirection,
    pub is_const: bool,
}

impl ParamInfo {
    fn render(&self) -> String {
        let mut out = String::new();
        if self.is_const {
            out.push_str("const ");
        }
        if self.direction != ParamDirection::In {
            out.push_str(self.direction.as_str());
            out.push(' ');
        }
        match (&self.ty, &self.name) {
            (ResolvedType::Array(element, size), Some(name)) => {
                out.push_str(&format!("{element} {name}[{}]", ArraySize(*size)));
            }
            (ty, Some(name)) => out.push_str(&format!("{ty} {name}")),
            (ty, None) => out.push_str(&ty.to_string()),
        }
        out
    }
}

/// Function information
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub params: Vec<ParamInfo>,
    pub return_type: ResolvedType,
    pub has_body: bool,
}

impl FunctionInfo {
    /// `float mix(float x, float y, float a)`
    pub fn signature(&self, name: &str) -> String {
        format!("{} {name}({})", self.return_type, self.argument_texts().join(", "))
    }

    /// One rendered string per parameter.
    pub fn argument_texts(&self) -> Vec<String> {
        self.params.iter().map(ParamInfo::render).collect()
    }

    pub fn param_types(&self) -> impl Iterator<Item = &ResolvedType> {
        self.params.iter().map(|p| &p.ty)
    }

    pub fn same_params(&self, other: &FunctionInfo) -> bool {
        self.params.len() == other.params.len() && self.param_types().eq(other.param_types())
    }
}

/// Struct information
#[derive(Debug, Clone, Default)]
pub struct StructInfo {
    pub fields: Vec<FieldInfo>,
    /// Scope holding the field symbols.
    pub scope: ScopeId,
}

impl StructInfo {
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Field information
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub ty: ResolvedType,
    pub symbol: SymbolId,
}

// ============================================================================
// Resolved types
// ============================================================================

/// Resolved type (after type checking)
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    Builtin(BuiltinTypeId),
    /// User struct: its symbol and name.
    Struct(SymbolId, String),
    /// Element type and size (`None` when the size could not be evaluated).
    Array(Box<ResolvedType>, Option<usize>),
    /// Placeholder after an error; compatible with everything so errors do not cascade.
    Unknown,
}

impl ResolvedType {
    pub const VOID: ResolvedType = ResolvedType::Builtin(BuiltinTypeId::Void);
    pub const BOOL: ResolvedType = ResolvedType::Builtin(BuiltinTypeId::Bool);
    pub const INT: ResolvedType = ResolvedType::Builtin(BuiltinTypeId::Int);
    pub const FLOAT: ResolvedType = ResolvedType::Builtin(BuiltinTypeId::Float);

    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolvedType::Unknown)
    }

    pub fn is_void(&self) -> bool {
        *self == Self::VOID
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ResolvedType::Array(..))
    }

    pub fn builtin(&self) -> Option<BuiltinTypeId> {
        match self {
            ResolvedType::Builtin(id) => Some(*id),
            _ => None,
        }
    }

    /// Shape of a builtin type; `None` for structs, arrays and `Unknown`.
    pub fn shape(&self) -> Option<TypeShape> {
        self.builtin().map(|id| types::info_for(id).shape)
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        self.shape().and_then(TypeShape::scalar_kind)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.shape(), Some(TypeShape::Scalar(_)))
    }

    pub fn is_sampler(&self) -> bool {
        matches!(self.shape(), Some(TypeShape::Sampler))
    }

    /// Type of a scalar or vector with `n` components of `kind`.
    pub fn vector(kind: ScalarKind, n: usize) -> ResolvedType {
        u8::try_from(n)
            .ok()
            .and_then(|n| types::vector_of(kind, n))
            .map(ResolvedType::Builtin)
            .unwrap_or(ResolvedType::Unknown)
    }

    /// Whether values of this type may be compared, assigned and passed around.
    pub fn contains_sampler(&self, table: &SymbolTable) -> bool {
        match self {
            ResolvedType::Builtin(_) => self.is_sampler(),
            ResolvedType::Array(element, _) => element.contains_sampler(table),
            ResolvedType::Struct(id, _) => table
                .get(*id)
                .and_then(Symbol::as_struct)
                .is_some_and(|s| s.fields.iter().any(|f| f.ty.contains_sampler(table))),
            ResolvedType::Unknown => false,
        }
    }

    /// Exact type equality, treating `Unknown` as compatible with anything.
    pub fn matches(&self, other: &ResolvedType) -> bool {
        self.is_unknown() || other.is_unknown() || self == other
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Builtin(id) => write!(f, "{}", types::as_str(*id)),
            ResolvedType::Struct(_, name) => write!(f, "{name}"),
            ResolvedType::Array(element, size) => write!(f, "{element}[{}]", ArraySize(*size)),
            ResolvedType::Unknown => write!(f, "?"),
        }
    }
}

struct ArraySize(Option<usize>);

impl fmt::Display for ArraySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{n}"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(SourceId(1), start, end)
    }

    fn var(name: &str, at: Span) -> Symbol {
        Symbol::new(name, SymbolKind::Variable(VariableInfo::new(ResolvedType::FLOAT, VariableRole::Local)), at)
    }

    #[test]
    fn inner_scopes_shadow_outer() {
        let mut table = SymbolTable::new();
        let outer = table.define(var("x", span(0, 1)));
        table.enter_scope(ScopeKind::Block, Some(span(5, 50)));
        assert_eq!(table.lookup("x"), Some(outer));
        let inner = table.define(var("x", span(10, 11)));
        assert_eq!(table.lookup("x"), Some(inner));
        table.exit_scope();
        assert_eq!(table.lookup("x"), Some(outer));
    }

    #[test]
    fn overloads_share_a_name() {
        let mut table = SymbolTable::new();
        let info = |ty: ResolvedType| FunctionInfo {
            params: vec![ParamInfo {
                name: None,
                ty,
                direction: ParamDirection::In,
                is_const: false,
            }],
            return_type: ResolvedType::VOID,
            has_body: false,
        };
        let a = table.define(Symbol::new("f", SymbolKind::Function(info(ResolvedType::FLOAT)), span(0, 1)));
        let b = table.define(Symbol::new("f", SymbolKind::Function(info(ResolvedType::INT)), span(5, 6)));
        assert_eq!(table.lookup_all("f"), &[a, b]);
    }

    #[test]
    fn locals_are_visible_only_after_their_declaration() {
        let mut table = SymbolTable::new();
        table.define(var("g", span(0, 1)));
        table.enter_scope(ScopeKind::Function, Some(span(10, 100)));
        table.define(var("early", span(20, 25)));
        table.define(var("late", span(60, 64)));
        table.exit_scope();

        let names = |offset| -> Vec<String> {
            table
                .visible_at(SourceId(1), offset)
                .into_iter()
                .map(|id| table.get(id).map(|s| s.name.clone()).unwrap_or_default())
                .collect()
        };
        assert_eq!(names(40), vec!["early", "g"]);
        assert_eq!(names(80), vec!["early", "late", "g"]);
        assert_eq!(names(5), vec!["g"]);
    }

    #[test]
    fn loop_detection_stops_at_function_boundary() {
        let mut table = SymbolTable::new();
        table.enter_scope(ScopeKind::Function, None);
        table.enter_scope(ScopeKind::Loop, None);
        table.enter_scope(ScopeKind::Block, None);
        assert!(table.in_loop());
        table.exit_scope();
        table.exit_scope();
        assert!(!table.in_loop());
    }

    #[test]
    fn signatures_render_like_declarations() {
        let mut info = VariableInfo::new(
            ResolvedType::Array(Box::new(ResolvedType::Builtin(BuiltinTypeId::Vec2)), Some(3)),
            VariableRole::Global,
        );
        info.storage = StorageQualifier::Uniform;
        info.precision = Some(Precision::Highp);
        let symbol = Symbol::new("offsets", SymbolKind::Variable(info), span(0, 7));
        assert_eq!(symbol.signature(), "uniform highp vec2 offsets[3]");

        let function = FunctionInfo {
            params: vec![
                ParamInfo {
                    name: Some("x".into()),
                    ty: ResolvedType::FLOAT,
                    direction: ParamDirection::In,
                    is_const: false,
                },
                ParamInfo {
                    name: Some("y".into()),
                    ty: ResolvedType::FLOAT,
                    direction: ParamDirection::Out,
                    is_const: false,
                },
            ],
            return_type: ResolvedType::VOID,
            has_body: true,
        };
        assert_eq!(function.signature("f"), "void f(float x, out float y)");
    }
}
