//! Core formatting logic for glslx source code
//!
//! Works on the token stream rather than the AST, so half-typed or broken files format as well as valid ones.
//!
//! ## Notes
//!
//! - **Spacing**: one space around binary operators and after commas, keywords and semicolons; nothing inside
//!   brackets or before `(` of a call; prefix and postfix operators glued to their operand.
//! - **Lines**: user line breaks are kept, runs of blank lines collapse to one, and directives and `//` comments
//!   always end their line.
//! - **Indentation**: one level per open brace plus one per open parenthesis or bracket; a line starting with a
//!   closer is dedented first. A line break inside a statement outside any parenthesis adds one continuation level.
//! - An unterminated block comment runs to the end of the file, so its trailing whitespace is dropped.
//! - Every decision depends only on the token sequence and the (capped) line gaps, so formatting is idempotent.

use crate::frontend::lexer::{Comment, LexOutput, Token, TokenKind};
use glslx_core::lang::keywords::KeywordId;
use glslx_core::lang::operators::OperatorId;
use glslx_core::lang::punctuation::PunctuationId;

use super::writer::FormatWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Paren,
    Bracket,
    Brace,
}

/// Spacing class of one token or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Ident,
    Keyword,
    Literal,
    Open(Delim),
    Close(Delim),
    Comma,
    Semicolon,
    Dot,
    Binary,
    Prefix,
    Postfix,
    LineComment,
    BlockComment,
    Directive,
    Unknown,
}

/// One token or comment, in source order.
struct Item<'a> {
    text: String,
    start_line: usize,
    end_line: usize,
    piece: Piece<'a>,
}

enum Piece<'a> {
    Token(&'a Token),
    Comment(&'a Comment),
}

/// Token-stream formatter
pub struct Formatter<'a> {
    source: &'a str,
    writer: FormatWriter,
    braces: usize,
    parens: usize,
    prev: Option<(Class, char)>,
    prev_end_line: usize,
    /// Whether the previous token ends an operand (decides unary vs binary `+`/`-`).
    operand_end: bool,
    /// Whether the last token leaves a statement open.
    mid_statement: bool,
}

impl<'a> Formatter<'a> {
    pub fn new(source: &'a str, indent: &str) -> Self {
        Self {
            source,
            writer: FormatWriter::new(indent),
            braces: 0,
            parens: 0,
            prev: None,
            prev_end_line: 0,
            operand_end: false,
            mid_statement: false,
        }
    }

    /// Format the lexed file; the result has no trailing newline.
    pub fn format(mut self, lexed: &LexOutput) -> String {
        for item in self.items(lexed) {
            self.item(&item);
        }
        self.writer.finish()
    }

    /// Tokens and comments merged by position.
    fn items<'l>(&self, lexed: &'l LexOutput) -> Vec<Item<'l>> {
        let mut items: Vec<(usize, Item<'l>)> = Vec::with_capacity(lexed.tokens.len() + lexed.comments.len());
        for token in &lexed.tokens {
            if matches!(token.kind, TokenKind::Eof) {
                continue;
            }
            let text = self.slice(token.span.start, token.span.end).trim_end().to_string();
            items.push((
                token.span.start,
                Item {
                    text,
                    start_line: token.line,
                    end_line: token.line,
                    piece: Piece::Token(token),
                },
            ));
        }
        for comment in &lexed.comments {
            let text = if comment.is_block() && !is_terminated(&comment.text) {
                comment.text.replace("\r\n", "\n").trim_end().to_string()
            } else if comment.is_block() {
                comment.text.replace("\r\n", "\n")
            } else {
                comment.text.trim_end().to_string()
            };
            items.push((
                comment.span.start,
                Item {
                    text,
                    start_line: comment.start_line,
                    end_line: comment.end_line,
                    piece: Piece::Comment(comment),
                },
            ));
        }
        items.sort_by_key(|(start, _)| *start);
        items.into_iter().map(|(_, item)| item).collect()
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.source.get(start..end).unwrap_or("")
    }

    fn item(&mut self, item: &Item<'_>) {
        let class = self.classify(&item.piece);
        let first = item.text.chars().next().unwrap_or(' ');

        if let Some((prev, last)) = self.prev {
            let gap = item.start_line.saturating_sub(self.prev_end_line);
            let forced = matches!(prev, Class::LineComment | Class::Directive) || class == Class::Directive;
            if gap > 0 || forced {
                self.writer.line_breaks(gap.clamp(1, 2));
            } else if space_between(prev, class) || merges(last, first) {
                self.writer.space();
            }
        }

        match class {
            Class::Close(Delim::Brace) => self.braces = self.braces.saturating_sub(1),
            Class::Close(_) => self.parens = self.parens.saturating_sub(1),
            _ => {}
        }
        if self.writer.at_line_start() {
            let continuation = self.mid_statement
                && self.parens == 0
                && !matches!(class, Class::Open(Delim::Brace) | Class::Close(Delim::Brace));
            self.writer
                .set_indent_level(self.braces + self.parens + usize::from(continuation));
        }
        if class == Class::Directive {
            self.writer.write_unindented(&item.text);
        } else {
            self.writer.write(&item.text);
        }
        match class {
            Class::Open(Delim::Brace) => self.braces += 1,
            Class::Open(_) => self.parens += 1,
            _ => {}
        }

        if !matches!(class, Class::LineComment | Class::BlockComment) {
            self.operand_end = matches!(
                class,
                Class::Ident
                    | Class::Literal
                    | Class::Unknown
                    | Class::Postfix
                    | Class::Close(Delim::Paren | Delim::Bracket)
            );
            self.mid_statement = !matches!(
                class,
                Class::Semicolon | Class::Open(Delim::Brace) | Class::Close(Delim::Brace) | Class::Directive
            );
        }
        self.prev = Some((class, item.text.chars().next_back().unwrap_or(' ')));
        self.prev_end_line = item.end_line;
    }

    fn classify(&self, piece: &Piece<'_>) -> Class {
        let token = match piece {
            Piece::Comment(comment) if comment.is_block() => return Class::BlockComment,
            Piece::Comment(_) => return Class::LineComment,
            Piece::Token(token) => token,
        };
        match &token.kind {
            TokenKind::Ident(_) => Class::Ident,
            TokenKind::Int(_) | TokenKind::Float(_) => Class::Literal,
            TokenKind::Keyword(KeywordId::True | KeywordId::False) => Class::Literal,
            TokenKind::Keyword(_) => Class::Keyword,
            TokenKind::Directive { .. } => Class::Directive,
            TokenKind::Unknown(_) | TokenKind::Eof => Class::Unknown,
            TokenKind::Punctuation(id) => match id {
                PunctuationId::LParen => Class::Open(Delim::Paren),
                PunctuationId::RParen => Class::Close(Delim::Paren),
                PunctuationId::LBracket => Class::Open(Delim::Bracket),
                PunctuationId::RBracket => Class::Close(Delim::Bracket),
                PunctuationId::LBrace => Class::Open(Delim::Brace),
                PunctuationId::RBrace => Class::Close(Delim::Brace),
                PunctuationId::Comma => Class::Comma,
                PunctuationId::Semicolon => Class::Semicolon,
                PunctuationId::Dot => Class::Dot,
                PunctuationId::Colon => Class::Binary,
            },
            TokenKind::Operator(id) => match id {
                OperatorId::PlusPlus | OperatorId::MinusMinus if self.operand_end => Class::Postfix,
                OperatorId::PlusPlus | OperatorId::MinusMinus | OperatorId::Not => Class::Prefix,
                OperatorId::Plus | OperatorId::Minus if !self.operand_end => Class::Prefix,
                _ => Class::Binary,
            },
        }
    }
}

/// Whether two tokens on one line are separated by a space.
fn space_between(prev: Class, next: Class) -> bool {
    use Class::*;
    match (prev, next) {
        (_, Comma | Semicolon | Dot | Postfix) => false,
        (Dot | Prefix, _) => false,
        (Open(Delim::Paren | Delim::Bracket), _) => false,
        (_, Close(Delim::Paren | Delim::Bracket)) => false,
        (Open(Delim::Brace), Close(Delim::Brace)) => false,
        (Ident | Literal | Close(Delim::Paren | Delim::Bracket), Open(Delim::Paren | Delim::Bracket)) => false,
        _ => true,
    }
}

fn is_terminated(block_comment: &str) -> bool {
    block_comment.len() >= 4 && block_comment.ends_with("*/")
}

/// `-` followed by `-` (or `+` by `+`) would lex as one operator.
fn merges(last: char, first: char) -> bool {
    (last == '-' && first == '-') || (last == '+' && first == '+')
}
