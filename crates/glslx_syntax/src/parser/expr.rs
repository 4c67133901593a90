/// Expression parsing.
///
/// Binary operators are parsed by precedence climbing using the levels from
/// `glslx_core::lang::operators::Precedence`; prefix and postfix forms are handled by
/// `unary` and `postfix`.
impl<'a> Parser<'a> {
    // ========================================================================
    // Entry points
    // ========================================================================

    /// Full expression including the comma operator.
    fn expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.expression_with(Precedence::Lowest)
    }

    /// Expression without a top-level comma (initializers, arguments).
    fn assignment_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.expression_with(Precedence::Assign)
    }

    fn expression_with(&mut self, min: Precedence) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.unary()?;

        loop {
            let kind = self.peek().kind.clone();
            match kind {
                TokenKind::Punctuation(PunctuationId::Comma) if min <= Precedence::Comma => {
                    let mut items = vec![left];
                    while self.match_punct(PunctuationId::Comma) {
                        items.push(self.assignment_expression()?);
                    }
                    let span = items[0].span.merge(items[items.len() - 1].span);
                    left = Spanned::new(Expr::Sequence(items), span);
                }
                TokenKind::Operator(OperatorId::Question) if min <= Precedence::Conditional => {
                    self.advance();
                    let then_expr = self.expression()?;
                    self.expect_punct(PunctuationId::Colon, "\":\"")?;
                    let else_expr = self.assignment_expression()?;
                    let span = left.span.merge(else_expr.span);
                    left = Spanned::new(
                        Expr::Ternary {
                            cond: Box::new(left),
                            then_expr: Box::new(then_expr),
                            else_expr: Box::new(else_expr),
                        },
                        span,
                    );
                }
                TokenKind::Operator(id) => {
                    if let Some(op) = AssignOp::from_operator(id) {
                        if min > Precedence::Assign {
                            break;
                        }
                        self.advance();
                        let value = self.assignment_expression()?;
                        let span = left.span.merge(value.span);
                        left = Spanned::new(
                            Expr::Assign {
                                op,
                                target: Box::new(left),
                                value: Box::new(value),
                            },
                            span,
                        );
                    } else if let Some(op) = BinaryOp::from_operator(id) {
                        let precedence = op.precedence();
                        if precedence < min {
                            break;
                        }
                        self.advance();
                        let right = self.expression_with(precedence.next())?;
                        let span = left.span.merge(right.span);
                        left = Spanned::new(
                            Expr::Binary {
                                op,
                                left: Box::new(left),
                                right: Box::new(right),
                            },
                            span,
                        );
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }

        Ok(left)
    }

    // ========================================================================
    // Prefix / postfix
    // ========================================================================

    fn unary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let op = match self.peek().operator_id() {
            Some(OperatorId::Minus) => Some(UnaryOp::Neg),
            Some(OperatorId::Plus) => Some(UnaryOp::Plus),
            Some(OperatorId::Not) => Some(UnaryOp::Not),
            Some(OperatorId::PlusPlus) => Some(UnaryOp::PreInc),
            Some(OperatorId::MinusMinus) => Some(UnaryOp::PreDec),
            _ => None,
        };
        let Some(op) = op else {
            let primary = self.primary()?;
            return self.postfix(primary);
        };
        let start = self.advance().span;
        let operand = self.unary()?;
        let span = start.merge(operand.span);
        Ok(Spanned::new(
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn postfix(&mut self, mut expr: Spanned<Expr>) -> Result<Spanned<Expr>, CompileError> {
        loop {
            if self.match_punct(PunctuationId::LBracket) {
                let index = self.expression()?;
                let close = self.expect_punct(PunctuationId::RBracket, "\"]\"")?;
                let span = expr.span.merge(close);
                expr = Spanned::new(
                    Expr::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.match_punct(PunctuationId::Dot) {
                let field = self.expect_ident("a field name")?;
                let span = expr.span.merge(field.span);
                expr = Spanned::new(
                    Expr::Member {
                        base: Box::new(expr),
                        field,
                    },
                    span,
                );
            } else if self.check_op(OperatorId::PlusPlus) || self.check_op(OperatorId::MinusMinus) {
                let token = self.advance();
                let op = if token.kind.is_operator(OperatorId::PlusPlus) {
                    PostfixOp::Inc
                } else {
                    PostfixOp::Dec
                };
                let span = expr.span.merge(token.span);
                expr = Spanned::new(
                    Expr::Postfix {
                        op,
                        operand: Box::new(expr),
                    },
                    span,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let token = self.peek().clone();
        let node = match token.kind {
            TokenKind::Int(v) => Expr::Int(v),
            TokenKind::Float(v) => Expr::Float(v),
            TokenKind::Keyword(KeywordId::True) => Expr::Bool(true),
            TokenKind::Keyword(KeywordId::False) => Expr::Bool(false),
            TokenKind::Ident(name) => {
                self.advance();
                if self.check_punct(PunctuationId::LParen) {
                    return self.call(Spanned::new(name, token.span));
                }
                return Ok(Spanned::new(Expr::Ident(name), token.span));
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.expression()?;
                self.expect_punct(PunctuationId::RParen, "\")\"")?;
                return Ok(inner);
            }
            _ => return Err(self.error_expected("an expression")),
        };
        self.advance();
        Ok(Spanned::new(node, token.span))
    }

    /// `callee ( args )` with the callee already consumed.
    fn call(&mut self, callee: Spanned<Ident>) -> Result<Spanned<Expr>, CompileError> {
        let open = self.expect_punct(PunctuationId::LParen, "\"(\"")?;
        let mut args = Vec::new();
        let void_arg = matches!(&self.peek().kind, TokenKind::Ident(n) if glslx_core::lang::types::is_void(n))
            && self.peek_at(1).kind.is_punctuation(PunctuationId::RParen);
        if void_arg {
            self.advance();
        } else if !self.check_punct(PunctuationId::RParen) {
            loop {
                args.push(self.assignment_expression()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        let close = self.expect_punct(PunctuationId::RParen, "\")\"")?;
        let args_span = open.merge(close);
        let span = callee.span.merge(close);
        Ok(Spanned::new(
            Expr::Call {
                callee,
                args,
                args_span,
            },
            span,
        ))
    }
}
