//! Shareable metadata for `glslx_core::lang` registries.
//!
//! Every vocabulary table (keywords, operators, builtin types, ...) records where an item comes from and how stable
//! it is. This submodule holds those small, `Copy`-friendly metadata types so registries can live in `const` tables.
//!
//! ## Notes
//! - Metadata is meant for tooling/docs/diagnostics; enforcement of syntax rules still lives in the lexer/parser.
//!
//! ## See also
//! - [`crate::lang::keywords`]
//! - [`crate::lang::operators`]
//! - [`crate::lang::types`]

/// Identify where a vocabulary item is defined.
///
/// ## Examples
/// ```rust
/// use glslx_core::lang::registry::Provenance;
///
/// assert_eq!(Provenance::Glslx.label(), "glslx");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Part of the OpenGL ES Shading Language 1.00 core.
    Glsl100,
    /// Added by glslx on top of GLSL (e.g. `export`/`import`, `#include`).
    Glslx,
    /// Provided by a GLSL ES extension that must be enabled with `#extension`.
    Extension,
}

impl Provenance {
    /// Short human-readable label used in generated reference tables.
    pub const fn label(self) -> &'static str {
        match self {
            Provenance::Glsl100 => "GLSL ES 1.00",
            Provenance::Glslx => "glslx",
            Provenance::Extension => "extension",
        }
    }
}

/// Describe the lifecycle status of a language vocabulary item.
///
/// ## Notes
/// - This is intended for docs/tooling, not for feature-gating by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Deprecated,
}
