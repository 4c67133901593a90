//! Words GLSL ES 1.00 reserves for future use.
//!
//! User code may not declare identifiers with these spellings, the `gl_` prefix, or a double underscore; the
//! renamer also skips them when it hands out short names.
//!
//! ## Examples
//! ```rust
//! use glslx_core::lang::reserved;
//!
//! assert!(reserved::is_reserved("union"));
//! assert!(reserved::is_reserved_identifier("gl_Foo"));
//! assert!(!reserved::is_reserved_identifier("color"));
//! ```

/// Reserved words with no current meaning.
pub const RESERVED_WORDS: &[&str] = &[
    "asm", "cast", "class", "default", "double", "dvec2", "dvec3", "dvec4", "enum", "extern", "external", "fixed",
    "flat", "fvec2", "fvec3", "fvec4", "goto", "half", "hvec2", "hvec3", "hvec4", "inline", "input", "interface",
    "long", "namespace", "noinline", "output", "packed", "public", "sampler1D", "sampler1DShadow", "sampler2DRect",
    "sampler2DRectShadow", "sampler2DShadow", "sampler3D", "sampler3DRect", "short", "sizeof", "static", "superp",
    "switch", "template", "this", "typedef", "union", "unsigned", "using", "volatile",
];

/// Prefix reserved for the implementation's builtins.
pub const BUILTIN_PREFIX: &str = "gl_";

/// Whether `s` is in [`RESERVED_WORDS`].
pub fn is_reserved(s: &str) -> bool {
    RESERVED_WORDS.contains(&s)
}

/// Whether `s` may not be used as a user-declared name.
///
/// ## Notes
/// - Keywords are rejected by the parser before this check applies.
pub fn is_reserved_identifier(s: &str) -> bool {
    is_reserved(s) || s.starts_with(BUILTIN_PREFIX) || s.contains("__")
}
