//! Parser for glslx shader sources.
//!
//! Converts a token stream into an AST. The parser never gives up on the first error: it records the error,
//! synchronizes at the next statement or declaration boundary and keeps going, so one pass reports every problem.
//!
//! ## Examples
//!
//! ```rust
//! use glslx_syntax::source::SourceId;
//! use glslx_syntax::{lexer, parser};
//!
//! let source = "export void main() { gl_FragColor = vec4(1.0); }";
//! let tokens = lexer::lex(source, SourceId(1)).unwrap();
//! let ast = parser::parse(&tokens).unwrap();
//! assert_eq!(ast.declarations.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::{CompileError, errors};
use crate::lexer::{Comment, LexOutput, Token, TokenKind};
use glslx_core::lang::keywords::KeywordId;
use glslx_core::lang::operators::{OperatorId, Precedence};
use glslx_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
