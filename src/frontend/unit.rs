//! The compiled unit: everything one compile invocation knows about its sources.
//!
//! A [`CompiledUnit`] is produced once by [`analyze`] and never mutated afterwards. The emitter and the IDE layer
//! both read from it; a recompile builds a new unit instead of patching the old one.

use std::collections::BTreeMap;

use crate::frontend::ast::Program;
use crate::frontend::diagnostics::Diagnostics;
use crate::frontend::lexer::LexOutput;
use crate::frontend::loader::{CompileInput, FileAccess, Loader};
use crate::frontend::prelude;
use crate::frontend::source::{SourceId, SourceSet};
use crate::frontend::symbols::{SymbolId, SymbolTable};
use crate::frontend::typechecker::{TypeCheckInfo, TypeChecker};

/// Resolved program, symbol table and diagnostics of one compile.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    pub sources: SourceSet,
    /// User declarations with includes spliced in.
    pub program: Program,
    pub symbols: SymbolTable,
    pub info: TypeCheckInfo,
    /// Syntax, include and resolution diagnostics in first-seen order.
    pub diagnostics: Diagnostics,
    /// Declared but never referenced user symbols, in declaration order.
    pub unused: Vec<SymbolId>,
    /// Tokens and comments per user file.
    pub lexed: BTreeMap<SourceId, LexOutput>,
}

impl CompiledUnit {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// The plain-text compile log.
    pub fn log(&self) -> String {
        self.diagnostics.render_log(&self.sources)
    }

    /// A user file by name.
    pub fn source_id(&self, name: &str) -> Option<SourceId> {
        self.sources.find_by_name(name).filter(|f| !f.is_builtin).map(|f| f.id)
    }
}

/// Load, parse and check `input` into a [`CompiledUnit`].
///
/// ## Parameters
///
/// - `input`: the root text(s).
/// - `access`: resolves `#include` paths; see [`FileAccess`].
///
/// ## Returns
///
/// Always a unit. Diagnostics carry syntax, include and resolution problems; resolution still runs on whatever
/// parsed so the IDE layer has something to answer from.
#[tracing::instrument(skip_all)]
pub fn analyze(input: impl Into<CompileInput>, access: &dyn FileAccess) -> CompiledUnit {
    let loaded = Loader::new(access).load(input.into().into_inputs());
    let checked = TypeChecker::new(&loaded.sources).check(prelude::program(), &loaded.program);

    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(loaded.errors);
    diagnostics.extend(checked.errors);
    tracing::debug!(
        diagnostics = diagnostics.len(),
        symbols = checked.symbols.len(),
        unused = checked.unused.len(),
        "analyzed unit"
    );

    CompiledUnit {
        sources: loaded.sources,
        program: loaded.program,
        symbols: checked.symbols,
        info: checked.info,
        diagnostics,
        unused: checked.unused,
        lexed: loaded.lexed,
    }
}

