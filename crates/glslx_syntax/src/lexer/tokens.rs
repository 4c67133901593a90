//! Token types for the glslx lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Builtin type names (`vec3`, `mat4`, ...) lex as `Ident`; the parser decides from context whether a name is a
//!   type.
//! - Comments are not tokens; they are collected separately as [`Comment`] trivia.

use crate::ast::Span;
use glslx_core::lang::keywords::{self, KeywordId};
use glslx_core::lang::operators::OperatorId;
use glslx_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(i64),
    Float(f64),

    // ========== Preprocessor ==========
    /// `#name text`; `text` is the rest of the line, trimmed, without trailing comments.
    Directive { name: String, text: String },

    // ========== Special ==========
    /// A character that starts no token; reported as an error and skipped by the parser.
    Unknown(String),
    Eof,
}

/// A token with its kind, source span and the 0-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: usize,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span, line: usize) -> Self {
        Self { kind, span, line }
    }
}

/// A `//` or `/* */` comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Full comment text including the delimiters.
    pub text: String,
    pub span: Span,
    pub start_line: usize,
    pub end_line: usize,
}

impl Comment {
    pub fn is_block(&self) -> bool {
        self.text.starts_with("/*")
    }

    /// Comment body with delimiters and leading `*` gutters removed.
    pub fn body(&self) -> String {
        if let Some(inner) = self.text.strip_prefix("//") {
            return inner.trim().to_string();
        }
        let inner = self
            .text
            .strip_prefix("/*")
            .map(|t| t.strip_suffix("*/").unwrap_or(t))
            .unwrap_or(&self.text);
        inner
            .lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix('*').map(str::trim_start).unwrap_or(line)
            })
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
