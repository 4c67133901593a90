//! Canonical language vocabulary for the glslx shader compiler and its tooling.
//!
//! This crate is intentionally small and dependency-free. It holds the registry tables that the lexer, parser,
//! resolver, emitter, formatter and language server all agree on: keywords, operators, punctuation, builtin types,
//! reserved words and extensions.
//!
//! ## Notes
//!
//! - **No IO**, no global state, and no compiler-specific types (no spans, no AST).
//! - Callers work with stable ids (`KeywordId`, `OperatorId`, ...) instead of scattered string comparisons.

pub mod lang;
