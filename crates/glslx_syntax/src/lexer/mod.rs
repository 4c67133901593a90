//! Lexer for glslx shader sources.
//!
//! Handles tokenization including:
//! - Keywords (`uniform`, `export`, `struct`, ...) and identifiers
//! - Int (decimal, octal, hex) and float literals
//! - Operators and punctuation with maximal munch (`++` before `+`)
//! - Preprocessor lines (`#include`, `#extension`, `#version`) as single directive tokens
//! - Comments, collected as trivia alongside the token stream
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, Comment)
//! - `numbers` - Numeric literal scanning

mod numbers;
pub mod tokens;

pub use tokens::{Comment, Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::{CompileError, errors};
use crate::source::SourceId;
use glslx_core::lang::operators;
use glslx_core::lang::punctuation;

/// Everything the lexer produces for one file.
///
/// ## Notes
/// - `tokens` always ends with an `Eof` token and may contain `Unknown` tokens for characters that start no token.
/// - `comments` are in source order and never overlap tokens.
#[derive(Debug, Clone, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub errors: Vec<CompileError>,
}

// ============================================================================
// LEXER STATE
// ============================================================================

/// Lexer for glslx source code.
pub struct Lexer<'a> {
    source: &'a str,
    source_id: SourceId,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: usize,
    /// Only whitespace seen since the last newline; `#` starts a directive here.
    at_line_start: bool,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str, source_id: SourceId) -> Self {
        Self {
            source,
            source_id,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 0,
            at_line_start: true,
            tokens: Vec::new(),
            comments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, keeping going after errors.
    pub fn tokenize(mut self) -> LexOutput {
        while !self.is_at_end() {
            self.scan_token();
        }

        let end = self.current_pos;
        self.tokens
            .push(Token::new(TokenKind::Eof, self.span(end, end), self.line));

        LexOutput {
            tokens: self.tokens,
            comments: self.comments,
            errors: self.errors,
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.source_id, start, end)
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize) {
        let span = self.span(start, self.current_pos);
        self.tokens.push(Token::new(kind, span, line));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;
        let line = self.line;
        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '\n' => {
                self.at_line_start = true;
                return;
            }
            ' ' | '\t' | '\r' | '\x0b' | '\x0c' => return,
            '/' if self.peek() == Some('/') => self.line_comment(start, line),
            '/' if self.peek() == Some('*') => self.block_comment(start, line),
            '#' if self.at_line_start => self.directive(start, line),
            c if c.is_ascii_digit() => self.number(start, line, c),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.number(start, line, c),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(start, line),
            c => self.operator_or_punctuation(start, line, c),
        }
        self.at_line_start = false;
    }

    fn line_comment(&mut self, start: usize, line: usize) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        self.push_comment(start, line);
    }

    fn block_comment(&mut self, start: usize, line: usize) {
        self.advance(); // '*'
        let mut terminated = false;
        while let Some(c) = self.advance() {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                terminated = true;
                break;
            }
        }
        if !terminated {
            self.errors.push(CompileError::syntax(
                "Unterminated block comment",
                self.span(start, start + 2),
            ));
        }
        self.push_comment(start, line);
    }

    fn push_comment(&mut self, start: usize, start_line: usize) {
        let text = self.source[start..self.current_pos].trim_end_matches('\r').to_string();
        let end = start + text.len();
        self.comments.push(Comment {
            text,
            span: self.span(start, end),
            start_line,
            end_line: self.line,
        });
    }

    fn directive(&mut self, start: usize, line: usize) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.advance();
        }
        let name_start = self.current_pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let name = self.source[name_start..self.current_pos].to_string();

        // The rest of the line, stopping before a trailing comment so it is lexed as trivia.
        let mut end = self.current_pos;
        while let Some(c) = self.peek() {
            if c == '\n' || (c == '/' && matches!(self.peek_next(), Some('/' | '*'))) {
                break;
            }
            self.advance();
            if !c.is_whitespace() {
                end = self.current_pos;
            }
        }
        let text_start = self.source[..end]
            .get(name_start + name.len()..)
            .map(|rest| name_start + name.len() + (rest.len() - rest.trim_start().len()))
            .unwrap_or(end);
        let text = self.source[text_start..end].to_string();

        if name.is_empty() {
            self.errors
                .push(CompileError::syntax("Expected a directive name after \"#\"", self.span(start, start + 1)));
        }
        self.tokens.push(Token::new(
            TokenKind::Directive { name, text },
            self.span(start, end),
            line,
        ));
    }

    fn identifier(&mut self, start: usize, line: usize) {
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let text = &self.source[start..self.current_pos];
        let kind = match keyword_id(text) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(text.to_string()),
        };
        self.push(kind, start, line);
    }

    fn operator_or_punctuation(&mut self, start: usize, line: usize, c: char) {
        // Maximal munch: operators are at most two characters long.
        if let Some(next) = self.peek() {
            let pair: String = [c, next].iter().collect();
            if let Some(id) = operators::from_str(&pair) {
                self.advance();
                self.push(TokenKind::Operator(id), start, line);
                return;
            }
        }
        let mut buf = [0u8; 4];
        if let Some(id) = operators::from_str(c.encode_utf8(&mut buf)) {
            self.push(TokenKind::Operator(id), start, line);
        } else if let Some(id) = punctuation::from_char(c) {
            self.push(TokenKind::Punctuation(id), start, line);
        } else {
            let span = self.span(start, self.current_pos);
            self.errors
                .push(errors::unexpected_token(&format!("character \"{c}\""), span));
            self.push(TokenKind::Unknown(c.to_string()), start, line);
        }
    }
}

/// Tokenize `source`, keeping trivia and every error.
#[tracing::instrument(skip_all, fields(source = source_id.0, len = source.len()))]
pub fn lex_all(source: &str, source_id: SourceId) -> LexOutput {
    Lexer::new(source, source_id).tokenize()
}

/// Tokenize `source`, failing if any character could not be lexed.
///
/// ## Errors
/// Returns every lexical error when at least one occurred.
pub fn lex(source: &str, source_id: SourceId) -> Result<Vec<Token>, Vec<CompileError>> {
    let out = lex_all(source, source_id);
    if out.errors.is_empty() { Ok(out.tokens) } else { Err(out.errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glslx_core::lang::keywords::KeywordId;
    use glslx_core::lang::operators::OperatorId;
    use glslx_core::lang::punctuation::PunctuationId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source, SourceId(0))
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("uniform vec4 c;"),
            vec![
                TokenKind::Keyword(KeywordId::Uniform),
                TokenKind::Ident("vec4".into()),
                TokenKind::Ident("c".into()),
                TokenKind::Punctuation(PunctuationId::Semicolon),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_maximal_munch() {
        assert_eq!(
            kinds("a+++b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Operator(OperatorId::PlusPlus),
                TokenKind::Operator(OperatorId::Plus),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("^^")[0], TokenKind::Operator(OperatorId::XorXor));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42")[0], TokenKind::Int(42));
        assert_eq!(kinds("0x1F")[0], TokenKind::Int(31));
        assert_eq!(kinds("017")[0], TokenKind::Int(15));
        assert_eq!(kinds("1.5")[0], TokenKind::Float(1.5));
        assert_eq!(kinds(".5")[0], TokenKind::Float(0.5));
        assert_eq!(kinds("2.")[0], TokenKind::Float(2.0));
        assert_eq!(kinds("1e3")[0], TokenKind::Float(1000.0));
        assert_eq!(kinds("2.5e-1")[0], TokenKind::Float(0.25));
    }

    #[test]
    fn test_out_of_range_numbers_are_invalid() {
        for source in ["2147483648", "4294967296", "0x100000000", "040000000000", "1e999", "3.5e38"] {
            let out = lex_all(source, SourceId(0));
            assert_eq!(out.errors.len(), 1, "{source}");
            assert!(out.errors[0].message.contains("Invalid numeric literal"), "{source}");
        }
        assert_eq!(kinds("2147483647")[0], TokenKind::Int(2147483647));
        assert_eq!(kinds("0x7FFFFFFF")[0], TokenKind::Int(2147483647));
        assert_eq!(kinds("1e-999")[0], TokenKind::Float(0.0));
    }

    #[test]
    fn test_swizzle_after_number_is_not_a_float() {
        assert_eq!(
            kinds("v.xy"),
            vec![
                TokenKind::Ident("v".into()),
                TokenKind::Punctuation(PunctuationId::Dot),
                TokenKind::Ident("xy".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_directives_and_trailing_comments() {
        let out = lex_all("#include \"a.glslx\" // common\nfloat x;", SourceId(0));
        assert!(out.errors.is_empty());
        assert_eq!(
            out.tokens[0].kind,
            TokenKind::Directive {
                name: "include".into(),
                text: "\"a.glslx\"".into()
            }
        );
        assert_eq!(out.tokens[0].span.end, 18);
        assert_eq!(out.comments.len(), 1);
        assert_eq!(out.comments[0].body(), "common");
        assert_eq!(out.tokens[1].line, 1);
    }

    #[test]
    fn test_hash_mid_line_is_an_error() {
        let out = lex_all("float x; #version 100", SourceId(0));
        assert_eq!(out.errors.len(), 1);
        assert!(out.tokens.iter().any(|t| t.kind == TokenKind::Unknown("#".into())));
    }

    #[test]
    fn test_block_comment_lines() {
        let out = lex_all("/**\n * Doc\n */\nvoid f();", SourceId(0));
        assert_eq!(out.comments[0].start_line, 0);
        assert_eq!(out.comments[0].end_line, 2);
        assert_eq!(out.comments[0].body(), "Doc");
        assert_eq!(out.tokens[0].line, 3);
    }

    #[test]
    fn test_unknown_character_is_reported() {
        let err = lex("float $x;", SourceId(0)).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].span.map(|s| (s.start, s.end)), Some((6, 7)));
    }
}
