/// Parse a token stream into an AST [`Program`].
///
/// This is the main public entrypoint for parsing a bare token stream.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `glslx_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` if parsing fails anywhere.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, Vec<CompileError>> {
    let tokens = parseable_tokens(tokens);
    Parser::new(&tokens).parse()
}

/// Parse a lexed file, attaching documentation comments and recovering from every error.
///
/// ## Returns
/// - The declarations that parsed, plus the syntax errors (lexical errors stay in `lexed.errors`).
#[tracing::instrument(skip_all, fields(token_count = lexed.tokens.len()))]
pub fn parse_recovering(lexed: &LexOutput) -> (Program, Vec<CompileError>) {
    let tokens = parseable_tokens(&lexed.tokens);
    Parser::new(&tokens)
        .with_comments(&lexed.comments)
        .parse_recovering()
}

/// Drop `Unknown` tokens (already reported by the lexer) and guarantee a trailing `Eof`.
fn parseable_tokens(tokens: &[Token]) -> Vec<Token> {
    let mut out: Vec<Token> = tokens
        .iter()
        .filter(|t| !matches!(t.kind, TokenKind::Unknown(_)))
        .cloned()
        .collect();
    if !matches!(out.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
        let (span, line) = out
            .last()
            .map(|t| (Span::new(t.span.source, t.span.end, t.span.end), t.line))
            .unwrap_or_default();
        out.push(Token::new(TokenKind::Eof, span, line));
    }
    out
}
