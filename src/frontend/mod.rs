//! glslx compiler frontend
//!
//! This module contains all frontend components:
//! - `source`, `lexer`, `parser`, `ast`, `diagnostics`: syntax, shared with the formatter through `glslx_syntax`
//! - `loader`: input handling and `#include` splicing
//! - `prelude`: the builtin declarations every unit is checked against
//! - `symbols`: symbol table and scope management
//! - `typechecker`: name resolution, type checking and validation
//! - `unit`: the immutable result of one analysis

// Syntax components are provided by the shared glslx_syntax crate.
pub use glslx_syntax::{ast, diagnostics, lexer, parser, source};

// Compiler-specific pieces remain local.
pub mod loader;
pub mod prelude;
pub mod symbols;
pub mod typechecker;
pub mod unit;
