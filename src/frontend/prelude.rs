//! The builtin prelude.
//!
//! Builtin functions, variables and constants are declared in glslx itself (`builtins.glslx`) with `import`
//! linkage. Every compile loads the prelude as [`PRELUDE_ID`] so builtins resolve through the same symbol table as
//! user code and tooltips can show their declarations and documentation.

use std::sync::OnceLock;

use crate::frontend::ast::Program;
use crate::frontend::{lexer, parser};
use crate::frontend::source::SourceId;

/// Name of the prelude file in diagnostics and IDE ranges.
pub const PRELUDE_NAME: &str = "<builtins>";

/// The prelude is always the first file of a compilation.
pub const PRELUDE_ID: SourceId = SourceId(0);

const PRELUDE_SOURCE: &str = include_str!("builtins.glslx");

pub fn source() -> &'static str {
    PRELUDE_SOURCE
}

/// The parsed prelude, shared by every compilation.
pub fn program() -> &'static Program {
    static PROGRAM: OnceLock<Program> = OnceLock::new();
    PROGRAM.get_or_init(|| {
        let lexed = lexer::lex_all(PRELUDE_SOURCE, PRELUDE_ID);
        let (program, errors) = parser::parse_recovering(&lexed);
        debug_assert!(
            lexed.errors.is_empty() && errors.is_empty(),
            "builtin prelude failed to parse: {errors:?}"
        );
        program
    })
}
