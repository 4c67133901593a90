//! Numeric literal scanning.
//!
//! GLSL ES 1.00 literals: decimal, octal (leading `0`) and hexadecimal (`0x`) integers, and floats with an optional
//! fraction and exponent (`1.0`, `.5`, `2.`, `1e3`). There are no suffixes.
//!
//! `int` is 32-bit and `float` is at most single precision, so an integer above `i32::MAX` or a float that overflows
//! `f32` is an invalid literal.

use std::num::ParseIntError;

use super::{Lexer, TokenKind};
use crate::diagnostics::CompileError;

impl<'a> Lexer<'a> {
    /// Scan a number whose first character `first` has already been consumed.
    pub(super) fn number(&mut self, start: usize, line: usize, first: char) {
        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            self.hex_number(start, line);
            return;
        }

        let mut is_float = first == '.';
        self.digits();
        if !is_float && self.peek() == Some('.') {
            self.advance();
            self.digits();
            is_float = true;
        }
        if self.exponent_follows() {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.digits();
            is_float = true;
        }

        let source = self.source;
        let text = &source[start..self.current_pos];
        let kind = if is_float {
            match text.parse::<f64>() {
                Ok(value) if (value as f32).is_finite() => TokenKind::Float(value),
                _ => self.invalid_number(start, text),
            }
        } else if text.len() > 1 && text.starts_with('0') {
            self.int_literal(start, text, i32::from_str_radix(&text[1..], 8))
        } else {
            self.int_literal(start, text, text.parse::<i32>())
        };
        self.push(kind, start, line);
    }

    fn hex_number(&mut self, start: usize, line: usize) {
        while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.advance();
        }
        let source = self.source;
        let text = &source[start..self.current_pos];
        let kind = self.int_literal(start, text, i32::from_str_radix(&text[2..], 16));
        self.push(kind, start, line);
    }

    fn int_literal(&mut self, start: usize, text: &str, parsed: Result<i32, ParseIntError>) -> TokenKind {
        match parsed {
            Ok(value) => TokenKind::Int(i64::from(value)),
            Err(_) => self.invalid_number(start, text),
        }
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// `e`/`E` followed by a digit, or by a sign and a digit.
    fn exponent_follows(&self) -> bool {
        let mut rest = self.source[self.current_pos..].chars();
        if !matches!(rest.next(), Some('e' | 'E')) {
            return false;
        }
        match rest.next() {
            Some('+' | '-') => rest.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    fn invalid_number(&mut self, start: usize, text: &str) -> TokenKind {
        let message = format!("Invalid numeric literal \"{text}\"");
        self.errors
            .push(CompileError::syntax(message, self.span(start, self.current_pos)));
        TokenKind::Int(0)
    }
}
