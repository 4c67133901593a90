//! Keyword vocabulary.
//!
//! Keywords are the reserved spellings the lexer turns into `TokenKind::Keyword`. Builtin type names (`vec3`,
//! `sampler2D`, ...) are *not* keywords here; they live in [`crate::lang::types`] and lex as identifiers so user
//! code and the builtin prelude share one resolution path.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - [`KeywordUsage`] drives context-sensitive completion in the language server.
//!
//! ## Examples
//! ```rust
//! use glslx_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("export"), Some(KeywordId::Export));
//! assert!(keywords::from_str("Export").is_none());
//! ```

use super::registry::{Provenance, Stability};

/// Stable identifier for every keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Control flow
    If,
    Else,
    For,
    While,
    Do,
    Break,
    Continue,
    Return,
    Discard,

    // Storage and parameter qualifiers
    Attribute,
    Const,
    Uniform,
    Varying,
    In,
    Out,
    InOut,
    Invariant,

    // Precision
    Precision,
    Lowp,
    Mediump,
    Highp,

    // Declarations
    Struct,
    Export,
    Import,

    // Literals
    True,
    False,
}

/// Broad grouping used by docs and the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    ControlFlow,
    Qualifier,
    Precision,
    Declaration,
    Literal,
}

/// Where a keyword may legally begin a construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordUsage {
    /// Allowed at the start of a top-level declaration.
    TopLevel,
    /// Allowed at the start of a statement inside a function body.
    Statement,
    /// Allowed in a parameter list.
    Parameter,
    /// Allowed inside an expression.
    Expression,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub usage: &'static [KeywordUsage],
    pub provenance: Provenance,
    pub stability: Stability,
    pub description: &'static str,
}

use KeywordUsage::{Expression, Parameter, Statement, TopLevel};

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Control flow
    info(KeywordId::If, "if", KeywordCategory::ControlFlow, &[Statement], Provenance::Glsl100, "Conditional statement."),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow, &[Statement], Provenance::Glsl100, "Alternative branch of an `if`."),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow, &[Statement], Provenance::Glsl100, "Counted loop."),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow, &[Statement], Provenance::Glsl100, "Pre-tested loop."),
    info(KeywordId::Do, "do", KeywordCategory::ControlFlow, &[Statement], Provenance::Glsl100, "Post-tested loop."),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow, &[Statement], Provenance::Glsl100, "Leave the innermost loop."),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow, &[Statement], Provenance::Glsl100, "Skip to the next loop iteration."),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow, &[Statement], Provenance::Glsl100, "Return from the current function."),
    info(KeywordId::Discard, "discard", KeywordCategory::ControlFlow, &[Statement], Provenance::Glsl100, "Discard the current fragment."),
    // Qualifiers
    info(KeywordId::Attribute, "attribute", KeywordCategory::Qualifier, &[TopLevel], Provenance::Glsl100, "Per-vertex input to a vertex shader."),
    info(KeywordId::Const, "const", KeywordCategory::Qualifier, &[TopLevel, Statement, Parameter], Provenance::Glsl100, "Compile-time constant or read-only parameter."),
    info(KeywordId::Uniform, "uniform", KeywordCategory::Qualifier, &[TopLevel], Provenance::Glsl100, "Value constant across a draw call."),
    info(KeywordId::Varying, "varying", KeywordCategory::Qualifier, &[TopLevel], Provenance::Glsl100, "Interpolated value passed from vertex to fragment shader."),
    info(KeywordId::In, "in", KeywordCategory::Qualifier, &[Parameter], Provenance::Glsl100, "Input parameter (the default)."),
    info(KeywordId::Out, "out", KeywordCategory::Qualifier, &[Parameter], Provenance::Glsl100, "Output parameter."),
    info(KeywordId::InOut, "inout", KeywordCategory::Qualifier, &[Parameter], Provenance::Glsl100, "Input and output parameter."),
    info(KeywordId::Invariant, "invariant", KeywordCategory::Qualifier, &[TopLevel], Provenance::Glsl100, "Reserved invariance qualifier."),
    // Precision
    info(KeywordId::Precision, "precision", KeywordCategory::Precision, &[TopLevel], Provenance::Glsl100, "Default precision statement."),
    info(KeywordId::Lowp, "lowp", KeywordCategory::Precision, &[TopLevel, Statement, Parameter], Provenance::Glsl100, "Low precision qualifier."),
    info(KeywordId::Mediump, "mediump", KeywordCategory::Precision, &[TopLevel, Statement, Parameter], Provenance::Glsl100, "Medium precision qualifier."),
    info(KeywordId::Highp, "highp", KeywordCategory::Precision, &[TopLevel, Statement, Parameter], Provenance::Glsl100, "High precision qualifier."),
    // Declarations
    info(KeywordId::Struct, "struct", KeywordCategory::Declaration, &[TopLevel], Provenance::Glsl100, "User-defined aggregate type."),
    info(KeywordId::Export, "export", KeywordCategory::Declaration, &[TopLevel], Provenance::Glslx, "Mark a function as a shader entry point or pin a global's name."),
    info(KeywordId::Import, "import", KeywordCategory::Declaration, &[TopLevel], Provenance::Glslx, "Declare a symbol supplied by the host; never emitted or renamed."),
    // Literals
    info(KeywordId::True, "true", KeywordCategory::Literal, &[Statement, Expression], Provenance::Glsl100, "Boolean true."),
    info(KeywordId::False, "false", KeywordCategory::Literal, &[Statement, Expression], Provenance::Glsl100, "Boolean false."),
];

/// Return the canonical spelling for a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a keyword.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Resolve a keyword spelling to its identifier.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

/// Iterate the keywords that may start a construct in the given context.
pub fn keywords_for(usage: KeywordUsage) -> impl Iterator<Item = &'static KeywordInfo> {
    KEYWORDS.iter().filter(move |k| k.usage.contains(&usage))
}

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    usage: &'static [KeywordUsage],
    provenance: Provenance,
    description: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        usage,
        provenance,
        stability: Stability::Stable,
        description,
    }
}
