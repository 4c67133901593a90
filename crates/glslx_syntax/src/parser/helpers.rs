/// Token-stream helpers, doc-comment lookup and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Documentation comment attachment
/// - Error recovery (`synchronize`, `synchronize_statement`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Return the token `n` positions ahead without consuming anything.
    fn peek_at(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    /// Return the most recently consumed token.
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the given punctuation or fail with "Expected `what` but found ...".
    fn expect_punct(&mut self, id: PunctuationId, what: &str) -> Result<Span, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.error_expected(what))
        }
    }

    /// Consume an identifier or fail with "Expected `what` but found ...".
    fn expect_ident(&mut self, what: &str) -> Result<Spanned<Ident>, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok(Spanned::new(name, span))
            }
            _ => Err(self.error_expected(what)),
        }
    }

    fn error_expected(&self, what: &str) -> CompileError {
        let token = self.peek();
        errors::expected_token(what, &token.kind.describe(), token.span)
    }

    /// Span from `start` through the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        let end = self.previous().span;
        if end.source == start.source && end.end >= start.start {
            start.merge(end)
        } else {
            start
        }
    }

    /// Whether the upcoming tokens start a local variable declaration (`vec3 v`, `S s`, `const ...`).
    fn at_local_declaration(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Keyword(
                KeywordId::Const
                | KeywordId::Uniform
                | KeywordId::Attribute
                | KeywordId::Varying
                | KeywordId::Lowp
                | KeywordId::Mediump
                | KeywordId::Highp,
            ) => true,
            TokenKind::Ident(_) => matches!(self.peek_at(1).kind, TokenKind::Ident(_)),
            _ => false,
        }
    }

    // ========================================================================
    // Documentation comments
    // ========================================================================

    /// Documentation for the declaration starting at token `index`: the block of adjacent comments ending on the
    /// line directly above it, with no token in between.
    fn doc_comment_before(&self, index: usize) -> Option<String> {
        let token = self.tokens.get(index)?;
        let prev = index.checked_sub(1).and_then(|i| self.tokens.get(i));
        let floor = prev.map(|t| t.span.end).unwrap_or(0);
        // A comment sharing a line with the previous token trails that token instead.
        let floor_line = prev.map(|t| t.line);
        let upto = self.comments.partition_point(|c| c.span.end <= token.span.start);
        let mut first = upto;
        let mut expected_end = token.line;
        while first > 0 {
            let c = &self.comments[first - 1];
            if c.span.start < floor || c.end_line + 1 != expected_end || Some(c.start_line) == floor_line {
                break;
            }
            expected_end = c.start_line;
            first -= 1;
        }
        if first == upto {
            return None;
        }
        let body = self.comments[first..upto]
            .iter()
            .map(Comment::body)
            .filter(|b| !b.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        (!body.is_empty()).then_some(body)
    }

    /// A comment that starts on `line` right after `after` and before the next token.
    fn trailing_comment(&self, after: Span, line: usize) -> Option<String> {
        let next_start = self.peek().span.start;
        self.comments
            .iter()
            .find(|c| c.span.start >= after.end && c.span.end <= next_start && c.start_line == line)
            .map(Comment::body)
            .filter(|b| !b.is_empty())
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    /// Skip to the next top-level declaration boundary.
    ///
    /// Stops after a `;` or a closing `}` at brace depth zero, or before a token that can only start a
    /// declaration.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            if depth == 0 && self.starts_declaration() {
                return;
            }
            let token = self.advance().kind.clone();
            match token {
                TokenKind::Punctuation(PunctuationId::LBrace) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.match_punct(PunctuationId::Semicolon);
                        return;
                    }
                }
                TokenKind::Punctuation(PunctuationId::Semicolon) if depth == 0 => return,
                _ => {}
            }
        }
    }

    /// Skip to the next statement boundary inside a block.
    ///
    /// Stops after a `;` at nesting depth zero, or before the `}` that closes the current block.
    fn synchronize_statement(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.peek().kind.clone() {
                TokenKind::Punctuation(PunctuationId::RBrace) if depth == 0 => return,
                TokenKind::Punctuation(PunctuationId::LBrace) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RBrace) => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Punctuation(PunctuationId::Semicolon) if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn starts_declaration(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Directive { .. } => true,
            TokenKind::Keyword(id) => matches!(
                id,
                KeywordId::Precision
                    | KeywordId::Struct
                    | KeywordId::Export
                    | KeywordId::Import
                    | KeywordId::Uniform
                    | KeywordId::Attribute
                    | KeywordId::Varying
            ),
            _ => false,
        }
    }
}
