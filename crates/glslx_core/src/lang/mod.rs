//! glslx language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: keywords, operators, punctuation, builtin types,
//! reserved words and the extensions that gate some builtins.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics,
//!   renaming, formatting, completion).
//!
//! ## Examples
//! ```rust
//! use glslx_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("uniform"), Some(KeywordId::Uniform));
//! assert_eq!(keywords::as_str(KeywordId::Uniform), "uniform");
//! ```

pub mod extensions;
pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;
pub mod reserved;
pub mod types;
