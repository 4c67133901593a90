/// Declaration parsing.
///
/// This chunk parses top-level declarations: directives, `precision` statements, structs, functions
/// (definitions and prototypes) and global variable groups.
impl<'a> Parser<'a> {
    // ========================================================================
    // Declarations
    // ========================================================================

    fn declaration(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        if matches!(self.peek().kind, TokenKind::Directive { .. }) {
            return self.directive();
        }
        if self.check_keyword(KeywordId::Precision) {
            let start = self.advance().span;
            let decl = self.precision_rest()?;
            return Ok(Spanned::new(Declaration::Precision(decl), self.span_from(start)));
        }

        let doc = self.doc_comment_before(self.pos);
        let start = self.peek().span;
        let linkage = if self.match_keyword(KeywordId::Export) {
            Linkage::Export
        } else if self.match_keyword(KeywordId::Import) {
            Linkage::Import
        } else {
            Linkage::Internal
        };

        if self.match_keyword(KeywordId::Struct) {
            let decl = self.struct_rest(linkage, doc)?;
            return Ok(Spanned::new(Declaration::Struct(decl), self.span_from(start)));
        }

        let invariant = self.match_keyword(KeywordId::Invariant);
        let storage = self.storage_qualifier();
        let ty = self.type_ref()?;
        let name = self.expect_ident("a name")?;

        if self.check_punct(PunctuationId::LParen) && storage == StorageQualifier::None && !invariant {
            let decl = self.function_rest(linkage, ty, name, doc)?;
            return Ok(Spanned::new(Declaration::Function(decl), self.span_from(start)));
        }

        let declarators = self.declarators(name)?;
        self.expect_punct(PunctuationId::Semicolon, "\";\"")?;
        let group = VariableGroup {
            linkage,
            storage,
            invariant,
            ty,
            declarators,
            doc,
        };
        Ok(Spanned::new(Declaration::Variables(group), self.span_from(start)))
    }

    fn directive(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        let token = self.advance().clone();
        let TokenKind::Directive { name, text } = &token.kind else {
            return Err(errors::unexpected_token(&token.kind.describe(), token.span));
        };
        // The directive span ends where its (trimmed) text ends.
        let text_start = token.span.end - text.len();
        let text_span = Span::new(token.span.source, text_start, token.span.end);

        let decl = match name.as_str() {
            "include" => {
                let path = text
                    .strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .filter(|p| !p.is_empty() && !p.contains('"'))
                    .ok_or_else(|| CompileError::syntax("Expected a quoted path after \"#include\"", text_span))?;
                Declaration::Include(IncludeDecl {
                    path: path.to_string(),
                    path_span: text_span,
                })
            }
            "extension" => {
                let (ext, behavior) = text
                    .split_once(':')
                    .ok_or_else(|| CompileError::syntax("Expected \"#extension NAME : behavior\"", token.span))?;
                let trimmed = ext.trim();
                let name_start = text_start + (ext.len() - ext.trim_start().len());
                let name_span = Span::new(token.span.source, name_start, name_start + trimmed.len());
                if trimmed.is_empty() {
                    return Err(CompileError::syntax("Expected an extension name", token.span));
                }
                let behavior = behavior.trim();
                if !glslx_core::lang::extensions::BEHAVIORS.contains(&behavior) {
                    return Err(CompileError::syntax(
                        format!("Unknown extension behavior \"{behavior}\""),
                        text_span,
                    )
                    .with_note("Expected one of \"require\", \"enable\", \"warn\" or \"disable\""));
                }
                Declaration::Extension(ExtensionDecl {
                    name: Spanned::new(trimmed.to_string(), name_span),
                    behavior: behavior.to_string(),
                })
            }
            "version" => {
                let version = text
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| CompileError::syntax("Expected a version number after \"#version\"", text_span))?;
                Declaration::Version(VersionDecl { version })
            }
            other => {
                return Err(CompileError::syntax(
                    format!("Unsupported preprocessor directive \"#{other}\""),
                    token.span,
                ));
            }
        };
        Ok(Spanned::new(decl, token.span))
    }

    /// After `precision`: `lowp|mediump|highp TYPE ;`
    fn precision_rest(&mut self) -> Result<PrecisionDecl, CompileError> {
        let precision = self
            .precision_qualifier()
            .ok_or_else(|| self.error_expected("\"lowp\", \"mediump\" or \"highp\""))?;
        let ty = self.expect_ident("a type")?;
        self.expect_punct(PunctuationId::Semicolon, "\";\"")?;
        Ok(PrecisionDecl { precision, ty })
    }

    /// After `struct`: `Name { fields } [;]`
    fn struct_rest(&mut self, linkage: Linkage, doc: Option<String>) -> Result<StructDecl, CompileError> {
        let name = self.expect_ident("a struct name")?;
        self.expect_punct(PunctuationId::LBrace, "\"{\"")?;

        let mut fields = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let doc = self.doc_comment_before(self.pos);
            let start = self.peek().span;
            let ty = self.type_ref()?;
            let first = self.expect_ident("a field name")?;
            let declarators = self.declarators(first)?;
            if let Some(init) = declarators.iter().find_map(|d| d.node.init.as_ref()) {
                return Err(CompileError::syntax("Struct fields cannot have initializers", init.span));
            }
            let semi = self.expect_punct(PunctuationId::Semicolon, "\";\"")?;
            let line = self.previous().line;
            let doc = doc.or_else(|| self.trailing_comment(semi, line));
            let group = VariableGroup {
                linkage: Linkage::Internal,
                storage: StorageQualifier::None,
                invariant: false,
                ty,
                declarators,
                doc,
            };
            fields.push(Spanned::new(group, self.span_from(start)));
        }

        self.expect_punct(PunctuationId::RBrace, "\"}\"")?;
        self.match_punct(PunctuationId::Semicolon);
        Ok(StructDecl {
            linkage,
            name,
            fields,
            doc,
        })
    }

    /// After the function name: `( params ) { body }` or `( params ) ;`
    fn function_rest(
        &mut self,
        linkage: Linkage,
        return_type: TypeRef,
        name: Spanned<Ident>,
        doc: Option<String>,
    ) -> Result<FunctionDecl, CompileError> {
        self.expect_punct(PunctuationId::LParen, "\"(\"")?;
        let mut params = Vec::new();

        let void_params = matches!(&self.peek().kind, TokenKind::Ident(n) if glslx_core::lang::types::is_void(n))
            && self.peek_at(1).kind.is_punctuation(PunctuationId::RParen);
        if void_params {
            self.advance();
        } else if !self.check_punct(PunctuationId::RParen) {
            loop {
                params.push(self.param()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(PunctuationId::RParen, "\")\"")?;

        let body = if self.match_punct(PunctuationId::Semicolon) {
            None
        } else if self.check_punct(PunctuationId::LBrace) {
            Some(self.block()?)
        } else {
            return Err(self.error_expected("\"{\" or \";\""));
        };

        Ok(FunctionDecl {
            linkage,
            return_type,
            name,
            params,
            body,
            doc,
        })
    }

    fn param(&mut self) -> Result<Spanned<Param>, CompileError> {
        let start = self.peek().span;
        let is_const = self.match_keyword(KeywordId::Const);
        let (direction, explicit_direction) = if self.match_keyword(KeywordId::In) {
            (ParamDirection::In, true)
        } else if self.match_keyword(KeywordId::Out) {
            (ParamDirection::Out, true)
        } else if self.match_keyword(KeywordId::InOut) {
            (ParamDirection::InOut, true)
        } else {
            (ParamDirection::In, false)
        };
        let ty = self.type_ref()?;
        let name = if matches!(self.peek().kind, TokenKind::Ident(_)) {
            Some(self.expect_ident("a parameter name")?)
        } else {
            None
        };
        let array_size = self.array_suffix()?;
        Ok(Spanned::new(
            Param {
                is_const,
                direction,
                explicit_direction,
                ty,
                name,
                array_size,
            },
            self.span_from(start),
        ))
    }

    /// `name [N] = init, name2, ...` (the first name is already consumed).
    fn declarators(&mut self, first: Spanned<Ident>) -> Result<Vec<Spanned<VariableDeclarator>>, CompileError> {
        let mut out = Vec::new();
        let mut name = first;
        loop {
            let start = name.span;
            let array_size = self.array_suffix()?;
            let init = if self.match_op(OperatorId::Eq) {
                Some(self.assignment_expression()?)
            } else {
                None
            };
            out.push(Spanned::new(
                VariableDeclarator { name, array_size, init },
                self.span_from(start),
            ));
            if !self.match_punct(PunctuationId::Comma) {
                return Ok(out);
            }
            name = self.expect_ident("a name")?;
        }
    }

    /// Optional `[N]` after a declared name.
    fn array_suffix(&mut self) -> Result<Option<Spanned<Expr>>, CompileError> {
        if !self.check_punct(PunctuationId::LBracket) {
            return Ok(None);
        }
        let open = self.advance().span;
        if self.check_punct(PunctuationId::RBracket) {
            let close = self.advance().span;
            return Err(CompileError::syntax("Arrays must have an explicit size", open.merge(close)));
        }
        let size = self.expression()?;
        self.expect_punct(PunctuationId::RBracket, "\"]\"")?;
        Ok(Some(size))
    }
}
