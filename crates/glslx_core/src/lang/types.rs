//! Builtin type vocabulary.
//!
//! Builtin type names lex as identifiers and resolve through this registry. Each entry records its [`TypeShape`],
//! which the resolver uses for constructor, swizzle and operator rules.
//!
//! ## Examples
//! ```rust
//! use glslx_core::lang::types::{self, BuiltinTypeId, ScalarKind, TypeShape};
//!
//! assert_eq!(types::from_str("ivec3"), Some(BuiltinTypeId::IVec3));
//! assert_eq!(types::info_for(BuiltinTypeId::IVec3).shape, TypeShape::Vector(ScalarKind::Int, 3));
//! assert_eq!(types::vector_of(ScalarKind::Float, 2), Some(BuiltinTypeId::Vec2));
//! ```

/// Scalar component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
}

/// Structural shape of a builtin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Void,
    Scalar(ScalarKind),
    /// Component kind and count (2..=4).
    Vector(ScalarKind, u8),
    /// Square float matrix of the given dimension (2..=4).
    Matrix(u8),
    Sampler,
}

impl TypeShape {
    /// Number of scalar components, or 0 for `void`/samplers.
    pub fn component_count(self) -> usize {
        match self {
            TypeShape::Void | TypeShape::Sampler => 0,
            TypeShape::Scalar(_) => 1,
            TypeShape::Vector(_, n) => n as usize,
            TypeShape::Matrix(n) => (n as usize) * (n as usize),
        }
    }

    /// Scalar kind of the components, if any.
    pub fn scalar_kind(self) -> Option<ScalarKind> {
        match self {
            TypeShape::Scalar(k) | TypeShape::Vector(k, _) => Some(k),
            TypeShape::Matrix(_) => Some(ScalarKind::Float),
            TypeShape::Void | TypeShape::Sampler => None,
        }
    }
}

/// Stable identifier for every builtin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinTypeId {
    Void,
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    BVec2,
    BVec3,
    BVec4,
    IVec2,
    IVec3,
    IVec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    SamplerCube,
}

/// Metadata for a builtin type.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTypeInfo {
    pub id: BuiltinTypeId,
    pub canonical: &'static str,
    pub shape: TypeShape,
    pub description: &'static str,
}

use ScalarKind::{Bool, Float, Int};

/// Registry of all builtin types.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    info(BuiltinTypeId::Void, "void", TypeShape::Void, "No value."),
    info(BuiltinTypeId::Bool, "bool", TypeShape::Scalar(Bool), "Boolean scalar."),
    info(BuiltinTypeId::Int, "int", TypeShape::Scalar(Int), "Signed integer scalar."),
    info(BuiltinTypeId::Float, "float", TypeShape::Scalar(Float), "Floating-point scalar."),
    info(BuiltinTypeId::Vec2, "vec2", TypeShape::Vector(Float, 2), "Two-component float vector."),
    info(BuiltinTypeId::Vec3, "vec3", TypeShape::Vector(Float, 3), "Three-component float vector."),
    info(BuiltinTypeId::Vec4, "vec4", TypeShape::Vector(Float, 4), "Four-component float vector."),
    info(BuiltinTypeId::BVec2, "bvec2", TypeShape::Vector(Bool, 2), "Two-component boolean vector."),
    info(BuiltinTypeId::BVec3, "bvec3", TypeShape::Vector(Bool, 3), "Three-component boolean vector."),
    info(BuiltinTypeId::BVec4, "bvec4", TypeShape::Vector(Bool, 4), "Four-component boolean vector."),
    info(BuiltinTypeId::IVec2, "ivec2", TypeShape::Vector(Int, 2), "Two-component integer vector."),
    info(BuiltinTypeId::IVec3, "ivec3", TypeShape::Vector(Int, 3), "Three-component integer vector."),
    info(BuiltinTypeId::IVec4, "ivec4", TypeShape::Vector(Int, 4), "Four-component integer vector."),
    info(BuiltinTypeId::Mat2, "mat2", TypeShape::Matrix(2), "2x2 float matrix."),
    info(BuiltinTypeId::Mat3, "mat3", TypeShape::Matrix(3), "3x3 float matrix."),
    info(BuiltinTypeId::Mat4, "mat4", TypeShape::Matrix(4), "4x4 float matrix."),
    info(BuiltinTypeId::Sampler2D, "sampler2D", TypeShape::Sampler, "Handle to a 2D texture."),
    info(BuiltinTypeId::SamplerCube, "samplerCube", TypeShape::Sampler, "Handle to a cube-map texture."),
];

/// Swizzle component sets; a swizzle must draw all its letters from one set.
pub const SWIZZLE_SETS: [&str; 3] = ["xyzw", "rgba", "stpq"];

/// Return the canonical spelling for a builtin type.
pub fn as_str(id: BuiltinTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a builtin type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: BuiltinTypeId) -> &'static BuiltinTypeInfo {
    BUILTIN_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("builtin type info missing")
}

/// Resolve a builtin type spelling to its identifier.
pub fn from_str(s: &str) -> Option<BuiltinTypeId> {
    BUILTIN_TYPES.iter().find(|t| t.canonical == s).map(|t| t.id)
}

/// Whether `s` spells `void`.
pub fn is_void(s: &str) -> bool {
    from_str(s) == Some(BuiltinTypeId::Void)
}

/// Find the builtin type with exactly this shape.
pub fn from_shape(shape: TypeShape) -> Option<BuiltinTypeId> {
    BUILTIN_TYPES.iter().find(|t| t.shape == shape).map(|t| t.id)
}

/// The scalar (`n == 1`) or vector type with `n` components of `kind`.
pub fn vector_of(kind: ScalarKind, n: u8) -> Option<BuiltinTypeId> {
    match n {
        1 => from_shape(TypeShape::Scalar(kind)),
        2..=4 => from_shape(TypeShape::Vector(kind, n)),
        _ => None,
    }
}

/// The swizzle component index of `c` within its set, if `c` is a swizzle letter.
pub fn swizzle_index(c: char) -> Option<(usize, usize)> {
    SWIZZLE_SETS
        .iter()
        .enumerate()
        .find_map(|(set, letters)| letters.find(c).map(|i| (set, i)))
}

const fn info(id: BuiltinTypeId, canonical: &'static str, shape: TypeShape, description: &'static str) -> BuiltinTypeInfo {
    BuiltinTypeInfo {
        id,
        canonical,
        shape,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_are_unique() {
        for (i, a) in BUILTIN_TYPES.iter().enumerate() {
            for b in &BUILTIN_TYPES[i + 1..] {
                if a.shape != TypeShape::Sampler {
                    assert_ne!(a.shape, b.shape, "{} and {} share a shape", a.canonical, b.canonical);
                }
            }
        }
    }

    #[test]
    fn matrix_components() {
        assert_eq!(info_for(BuiltinTypeId::Mat3).shape.component_count(), 9);
        assert_eq!(info_for(BuiltinTypeId::Mat3).shape.scalar_kind(), Some(ScalarKind::Float));
    }

    #[test]
    fn swizzle_letters_know_their_set() {
        assert_eq!(swizzle_index('x'), Some((0, 0)));
        assert_eq!(swizzle_index('a'), Some((1, 3)));
        assert_eq!(swizzle_index('p'), Some((2, 2)));
        assert_eq!(swizzle_index('k'), None);
    }
}
