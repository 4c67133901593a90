/// Parser core type and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level loop.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
pub struct Parser<'a> {
    tokens: &'a [Token],
    comments: &'a [Comment],
    pos: usize,
    errors: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream ending in `Eof`, with `Unknown` tokens already removed.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            comments: &[],
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Attach comment trivia so declarations pick up their documentation comments.
    pub fn with_comments(mut self, comments: &'a [Comment]) -> Self {
        self.comments = comments;
        self
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// ## Errors
    /// Returns every [`CompileError`] found if parsing failed anywhere.
    pub fn parse(self) -> Result<Program, Vec<CompileError>> {
        let (program, errors) = self.parse_recovering();
        if errors.is_empty() { Ok(program) } else { Err(errors) }
    }

    /// Parse the entire token stream, returning whatever could be parsed plus every error.
    pub fn parse_recovering(mut self) -> (Program, Vec<CompileError>) {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            let before = self.pos;
            match self.declaration() {
                Ok(decl) => declarations.push(decl),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }

        (Program { declarations }, self.errors)
    }
}
