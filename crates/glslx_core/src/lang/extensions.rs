//! GLSL ES extensions understood by glslx.
//!
//! Builtins that come from an extension are declared in the prelude like any other, but the resolver only allows
//! their use once the matching `#extension NAME : enable|require` directive appears. The emitter copies the
//! directive into every shader that reaches one of them.
//!
//! ## Examples
//! ```rust
//! use glslx_core::lang::extensions::{self, ExtensionId};
//!
//! assert_eq!(extensions::gating("dFdx"), Some(ExtensionId::StandardDerivatives));
//! assert_eq!(extensions::from_str("GL_EXT_frag_depth"), Some(ExtensionId::FragDepth));
//! assert!(extensions::gating("texture2D").is_none());
//! ```

/// Stable identifier for a supported extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtensionId {
    StandardDerivatives,
    FragDepth,
    ShaderTextureLod,
    DrawBuffers,
}

/// Metadata for an extension.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionInfo {
    pub id: ExtensionId,
    pub canonical: &'static str,
    /// Builtin names that require this extension.
    pub builtins: &'static [&'static str],
}

/// Registry of all supported extensions.
pub const EXTENSIONS: &[ExtensionInfo] = &[
    ExtensionInfo {
        id: ExtensionId::StandardDerivatives,
        canonical: "GL_OES_standard_derivatives",
        builtins: &["dFdx", "dFdy", "fwidth"],
    },
    ExtensionInfo {
        id: ExtensionId::FragDepth,
        canonical: "GL_EXT_frag_depth",
        builtins: &["gl_FragDepthEXT"],
    },
    ExtensionInfo {
        id: ExtensionId::ShaderTextureLod,
        canonical: "GL_EXT_shader_texture_lod",
        builtins: &[
            "texture2DLodEXT",
            "texture2DProjLodEXT",
            "textureCubeLodEXT",
            "texture2DGradEXT",
            "texture2DProjGradEXT",
            "textureCubeGradEXT",
        ],
    },
    ExtensionInfo {
        id: ExtensionId::DrawBuffers,
        canonical: "GL_EXT_draw_buffers",
        builtins: &["gl_FragData", "gl_MaxDrawBuffers"],
    },
];

/// Accepted behaviors after the `:` in an `#extension` directive.
pub const BEHAVIORS: &[&str] = &["require", "enable", "warn", "disable"];

/// Return the canonical spelling for an extension.
pub fn as_str(id: ExtensionId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for an extension.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: ExtensionId) -> &'static ExtensionInfo {
    EXTENSIONS.iter().find(|e| e.id == id).expect("extension info missing")
}

/// Resolve an extension name to its identifier.
pub fn from_str(s: &str) -> Option<ExtensionId> {
    EXTENSIONS.iter().find(|e| e.canonical == s).map(|e| e.id)
}

/// The extension that gates the builtin named `name`, if any.
pub fn gating(name: &str) -> Option<ExtensionId> {
    EXTENSIONS.iter().find(|e| e.builtins.contains(&name)).map(|e| e.id)
}
