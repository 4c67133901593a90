/// Type and qualifier parsing.
///
/// Types are written as an optional precision qualifier followed by a name; whether the name is a builtin type or
/// a struct is decided by the resolver.
impl<'a> Parser<'a> {
    /// `[lowp|mediump|highp] NAME`
    fn type_ref(&mut self) -> Result<TypeRef, CompileError> {
        let precision = self.precision_qualifier();
        let name = self.expect_ident("a type")?;
        Ok(TypeRef { precision, name })
    }

    fn precision_qualifier(&mut self) -> Option<Precision> {
        let precision = match self.peek().keyword_id()? {
            KeywordId::Lowp => Precision::Lowp,
            KeywordId::Mediump => Precision::Mediump,
            KeywordId::Highp => Precision::Highp,
            _ => return None,
        };
        self.advance();
        Some(precision)
    }

    fn storage_qualifier(&mut self) -> StorageQualifier {
        let storage = match self.peek().keyword_id() {
            Some(KeywordId::Const) => StorageQualifier::Const,
            Some(KeywordId::Uniform) => StorageQualifier::Uniform,
            Some(KeywordId::Attribute) => StorageQualifier::Attribute,
            Some(KeywordId::Varying) => StorageQualifier::Varying,
            _ => return StorageQualifier::None,
        };
        self.advance();
        storage
    }
}
