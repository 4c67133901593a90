//! Shared syntax frontend for glslx: source files, lexer, parser, AST and diagnostics.
//!
//! This crate is dependency-light and reused by the compiler, the formatter and the language server.
//!
//! ## Notes
//! - This crate is "syntax-only": it does not do include resolution, name resolution or type checking.
//! - Vocabulary identity (keywords/operators/punctuation/builtin types) comes from `glslx_core::lang` registries.
//! - Positions exposed to callers are 0-based lines and 0-based columns counted in Unicode scalar values.
//!
//! ## Examples
//! ```rust
//! use glslx_syntax::source::SourceId;
//! use glslx_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("uniform vec4 color;", SourceId(1)).unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.declarations.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod token_helpers;
