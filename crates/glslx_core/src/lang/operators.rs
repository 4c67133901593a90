//! Operator vocabulary.
//!
//! This module defines the canonical operator set along with precedence, associativity and fixity. The parser,
//! the GLSL printer and the formatter all read precedence from here so parenthesisation stays consistent.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and expects the full spelling (`"+="`, not `"+"`).
//! - `+`, `-`, `++` and `--` have both prefix and infix/postfix uses; the parser picks the fixity from context and
//!   [`OperatorInfo::fixity`] lists every form the spelling may take.
//!
//! ## Examples
//! ```rust
//! use glslx_core::lang::operators::{self, OperatorId, Precedence};
//!
//! assert_eq!(operators::from_str("^^"), Some(OperatorId::XorXor));
//! assert_eq!(operators::info_for(OperatorId::Star).precedence, Precedence::Multiplicative);
//! ```

use super::registry::Provenance;

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Define the syntactic position(s) an operator may appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    Postfix,
}

/// Binding strength, from loosest to tightest.
///
/// ## Notes
/// - Variants are ordered so `a < b` means `a` binds more loosely than `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Lowest,
    Comma,
    Assign,
    Conditional,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
    Member,
}

impl Precedence {
    /// The next-tighter level, used by the Pratt parser for left-associative operators.
    pub fn next(self) -> Self {
        match self {
            Precedence::Lowest => Precedence::Comma,
            Precedence::Comma => Precedence::Assign,
            Precedence::Assign => Precedence::Conditional,
            Precedence::Conditional => Precedence::LogicalOr,
            Precedence::LogicalOr => Precedence::LogicalXor,
            Precedence::LogicalXor => Precedence::LogicalAnd,
            Precedence::LogicalAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Relational,
            Precedence::Relational => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Unary,
            Precedence::Unary => Precedence::Postfix,
            Precedence::Postfix | Precedence::Member => Precedence::Member,
        }
    }
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    AndAnd,
    OrOr,
    XorXor,
    Not,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,

    // Increment / decrement
    PlusPlus,
    MinusMinus,

    // Conditional
    Question,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `precedence` is the binary/ternary binding strength; prefix uses bind at [`Precedence::Unary`] and postfix
///   uses at [`Precedence::Postfix`] regardless of this field.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub canonical: &'static str,
    pub precedence: Precedence,
    pub associativity: Associativity,
    pub fixity: &'static [Fixity],
    pub provenance: Provenance,
}

use Fixity::{Infix, Postfix, Prefix};

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    info(OperatorId::Plus, "+", Precedence::Additive, Associativity::Left, &[Infix, Prefix]),
    info(OperatorId::Minus, "-", Precedence::Additive, Associativity::Left, &[Infix, Prefix]),
    info(OperatorId::Star, "*", Precedence::Multiplicative, Associativity::Left, &[Infix]),
    info(OperatorId::Slash, "/", Precedence::Multiplicative, Associativity::Left, &[Infix]),
    info(OperatorId::EqEq, "==", Precedence::Equality, Associativity::Left, &[Infix]),
    info(OperatorId::NotEq, "!=", Precedence::Equality, Associativity::Left, &[Infix]),
    info(OperatorId::Lt, "<", Precedence::Relational, Associativity::Left, &[Infix]),
    info(OperatorId::LtEq, "<=", Precedence::Relational, Associativity::Left, &[Infix]),
    info(OperatorId::Gt, ">", Precedence::Relational, Associativity::Left, &[Infix]),
    info(OperatorId::GtEq, ">=", Precedence::Relational, Associativity::Left, &[Infix]),
    info(OperatorId::AndAnd, "&&", Precedence::LogicalAnd, Associativity::Left, &[Infix]),
    info(OperatorId::OrOr, "||", Precedence::LogicalOr, Associativity::Left, &[Infix]),
    info(OperatorId::XorXor, "^^", Precedence::LogicalXor, Associativity::Left, &[Infix]),
    info(OperatorId::Not, "!", Precedence::Unary, Associativity::Right, &[Prefix]),
    info(OperatorId::Eq, "=", Precedence::Assign, Associativity::Right, &[Infix]),
    info(OperatorId::PlusEq, "+=", Precedence::Assign, Associativity::Right, &[Infix]),
    info(OperatorId::MinusEq, "-=", Precedence::Assign, Associativity::Right, &[Infix]),
    info(OperatorId::StarEq, "*=", Precedence::Assign, Associativity::Right, &[Infix]),
    info(OperatorId::SlashEq, "/=", Precedence::Assign, Associativity::Right, &[Infix]),
    info(OperatorId::PlusPlus, "++", Precedence::Unary, Associativity::Right, &[Prefix, Postfix]),
    info(OperatorId::MinusMinus, "--", Precedence::Unary, Associativity::Right, &[Prefix, Postfix]),
    info(OperatorId::Question, "?", Precedence::Conditional, Associativity::Right, &[Infix]),
];

/// Return the canonical spelling for an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Resolve an operator spelling to its identifier.
pub fn from_str(s: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.canonical == s).map(|o| o.id)
}

/// Whether the operator is an assignment (`=` or a compound assignment).
pub fn is_assignment(id: OperatorId) -> bool {
    info_for(id).precedence == Precedence::Assign
}

/// For a compound assignment, the arithmetic operator it applies (`+=` -> `+`).
pub fn compound_base(id: OperatorId) -> Option<OperatorId> {
    match id {
        OperatorId::PlusEq => Some(OperatorId::Plus),
        OperatorId::MinusEq => Some(OperatorId::Minus),
        OperatorId::StarEq => Some(OperatorId::Star),
        OperatorId::SlashEq => Some(OperatorId::Slash),
        _ => None,
    }
}

/// Operator spellings sorted longest first, for maximal-munch lexing.
pub fn spellings_longest_first() -> Vec<(&'static str, OperatorId)> {
    let mut all: Vec<_> = OPERATORS.iter().map(|o| (o.canonical, o.id)).collect();
    all.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
    all
}

const fn info(
    id: OperatorId,
    canonical: &'static str,
    precedence: Precedence,
    associativity: Associativity,
    fixity: &'static [Fixity],
) -> OperatorInfo {
    OperatorInfo {
        id,
        canonical,
        precedence,
        associativity,
        fixity,
        provenance: Provenance::Glsl100,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_ordered_loosest_first() {
        assert!(Precedence::Assign < Precedence::Conditional);
        assert!(Precedence::LogicalOr < Precedence::LogicalXor);
        assert!(Precedence::LogicalXor < Precedence::LogicalAnd);
        assert!(Precedence::Additive < Precedence::Multiplicative);
        assert_eq!(Precedence::Additive.next(), Precedence::Multiplicative);
    }

    #[test]
    fn compound_assignments_map_to_their_base() {
        assert!(is_assignment(OperatorId::PlusEq));
        assert!(!is_assignment(OperatorId::Plus));
        assert_eq!(compound_base(OperatorId::SlashEq), Some(OperatorId::Slash));
        assert_eq!(compound_base(OperatorId::Eq), None);
    }

    #[test]
    fn longest_spellings_come_first() {
        let all = spellings_longest_first();
        let pos = |s: &str| all.iter().position(|(c, _)| *c == s).unwrap();
        assert!(pos("++") < pos("+"));
        assert!(pos("<=") < pos("<"));
    }
}
