/// Statement parsing.
///
/// This chunk parses function bodies. Errors inside a block are recorded and the block resumes at the next
/// statement boundary, so a single malformed statement does not hide the rest of the function.
impl<'a> Parser<'a> {
    // ========================================================================
    // Blocks
    // ========================================================================

    fn block(&mut self) -> Result<Spanned<Block>, CompileError> {
        let open = self.expect_punct(PunctuationId::LBrace, "\"{\"")?;
        let mut stmts = Vec::new();

        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let before = self.pos;
            match self.statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize_statement();
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }

        let close = self.expect_punct(PunctuationId::RBrace, "\"}\"")?;
        Ok(Spanned::new(Block { stmts }, open.merge(close)))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.peek().span;
        let stmt = match self.peek().kind.clone() {
            TokenKind::Punctuation(PunctuationId::LBrace) => Stmt::Block(self.block()?.node),
            TokenKind::Punctuation(PunctuationId::Semicolon) => {
                self.advance();
                Stmt::Empty
            }
            TokenKind::Keyword(KeywordId::If) => self.if_stmt()?,
            TokenKind::Keyword(KeywordId::For) => self.for_stmt()?,
            TokenKind::Keyword(KeywordId::While) => self.while_stmt()?,
            TokenKind::Keyword(KeywordId::Do) => self.do_while_stmt()?,
            TokenKind::Keyword(KeywordId::Return) => {
                self.advance();
                let value = if self.check_punct(PunctuationId::Semicolon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.expect_punct(PunctuationId::Semicolon, "\";\"")?;
                Stmt::Return(value)
            }
            TokenKind::Keyword(KeywordId::Break) => self.keyword_stmt(Stmt::Break)?,
            TokenKind::Keyword(KeywordId::Continue) => self.keyword_stmt(Stmt::Continue)?,
            TokenKind::Keyword(KeywordId::Discard) => self.keyword_stmt(Stmt::Discard)?,
            TokenKind::Directive { .. } => {
                return Err(CompileError::syntax(
                    "Preprocessor directives are only allowed at the top level",
                    start,
                ));
            }
            _ if self.at_local_declaration() => {
                let group = self.local_variables()?;
                self.expect_punct(PunctuationId::Semicolon, "\";\"")?;
                Stmt::Variables(group)
            }
            _ => {
                let expr = self.expression()?;
                self.expect_punct(PunctuationId::Semicolon, "\";\"")?;
                Stmt::Expr(expr)
            }
        };
        Ok(Spanned::new(stmt, self.span_from(start)))
    }

    fn keyword_stmt(&mut self, stmt: Stmt) -> Result<Stmt, CompileError> {
        self.advance();
        self.expect_punct(PunctuationId::Semicolon, "\";\"")?;
        Ok(stmt)
    }

    /// `[const] [precision] TYPE a [= e], b[N]` without the trailing `;`.
    fn local_variables(&mut self) -> Result<VariableGroup, CompileError> {
        let doc = self.doc_comment_before(self.pos);
        let storage = self.storage_qualifier();
        let ty = self.type_ref()?;
        let first = self.expect_ident("a name")?;
        let declarators = self.declarators(first)?;
        Ok(VariableGroup {
            linkage: Linkage::Internal,
            storage,
            invariant: false,
            ty,
            declarators,
            doc,
        })
    }

    fn paren_condition(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "\"(\"")?;
        let cond = self.expression()?;
        self.expect_punct(PunctuationId::RParen, "\")\"")?;
        Ok(cond)
    }

    fn if_stmt(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        let cond = self.paren_condition()?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_keyword(KeywordId::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn for_stmt(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        self.expect_punct(PunctuationId::LParen, "\"(\"")?;

        let init = if self.check_punct(PunctuationId::Semicolon) {
            self.advance();
            None
        } else {
            let start = self.peek().span;
            let stmt = if self.at_local_declaration() {
                Stmt::Variables(self.local_variables()?)
            } else {
                Stmt::Expr(self.expression()?)
            };
            self.expect_punct(PunctuationId::Semicolon, "\";\"")?;
            Some(Box::new(Spanned::new(stmt, self.span_from(start))))
        };

        let cond = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::Semicolon, "\";\"")?;

        let update = if self.check_punct(PunctuationId::RParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::RParen, "\")\"")?;

        let body = Box::new(self.statement()?);
        Ok(Stmt::For {
            init,
            cond,
            update,
            body,
        })
    }

    fn while_stmt(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        let cond = self.paren_condition()?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { cond, body })
    }

    fn do_while_stmt(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        let body = Box::new(self.statement()?);
        if !self.match_keyword(KeywordId::While) {
            return Err(self.error_expected("\"while\""));
        }
        let cond = self.paren_condition()?;
        self.expect_punct(PunctuationId::Semicolon, "\";\"")?;
        Ok(Stmt::DoWhile { body, cond })
    }
}
