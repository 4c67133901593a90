//! Typechecker unit tests.

use crate::frontend::loader::NoFileAccess;
use crate::frontend::symbols::{ResolvedType, Symbol};
use crate::frontend::unit::{CompiledUnit, analyze};

fn check_str(source: &str) -> CompiledUnit {
    analyze(source, &NoFileAccess)
}

fn error_messages(source: &str) -> Vec<String> {
    check_str(source)
        .diagnostics
        .iter()
        .filter(|e| e.is_error())
        .map(|e| e.message.clone())
        .collect()
}

#[track_caller]
fn assert_ok(source: &str) {
    let errors = error_messages(source);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[track_caller]
fn assert_error(source: &str, needle: &str) {
    let errors = error_messages(source);
    assert!(
        errors.iter().any(|e| e.contains(needle)),
        "expected an error containing {needle:?}, got {errors:?}"
    );
}

fn unused_names(source: &str) -> Vec<String> {
    let unit = check_str(source);
    unit.unused
        .iter()
        .filter_map(|&id| unit.symbols.get(id).map(|s| s.name.clone()))
        .collect()
}

// ========================================
// Valid programs
// ========================================

#[test]
fn test_fragment_shader() {
    assert_ok(
        r#"
precision mediump float;
uniform sampler2D texture;
varying vec2 coord;

export void fragment() {
  gl_FragColor = texture2D(texture, coord);
}
"#,
    );
}

#[test]
fn test_forward_references_at_module_scope() {
    assert_ok(
        r#"
export void vertex() {
  gl_Position = vec4(scale(position), 1.0);
}

vec3 scale(vec3 p) { return p * factor; }
attribute vec3 position;
uniform float factor;
"#,
    );
}

#[test]
fn test_prototype_then_definition_is_one_symbol() {
    let unit = check_str(
        r#"
float twice(float x);
export void main() { gl_FragColor = vec4(twice(1.0)); }
float twice(float x) { return x * 2.0; }
"#,
    );
    assert!(!unit.has_errors(), "{}", unit.log());
    let twice: Vec<&Symbol> = unit.symbols.iter().map(|(_, s)| s).filter(|s| s.name == "twice").collect();
    assert_eq!(twice.len(), 1);
    assert_eq!(twice[0].declarations.len(), 2);
    assert_eq!(twice[0].references.len(), 1);
}

#[test]
fn test_overloads_resolve_by_exact_type() {
    assert_ok(
        r#"
float pick(float x) { return x; }
float pick(vec2 v) { return v.x; }
export void main() { gl_FragColor = vec4(pick(1.0) + pick(vec2(2.0))); }
"#,
    );
}

#[test]
fn test_constructors_and_swizzles() {
    assert_ok(
        r#"
struct Light { vec3 color; float power; };
export void main() {
  vec4 v = vec4(vec2(1.0), 0.0, 1.0);
  mat2 m = mat2(v.xy, v.zw);
  Light light = Light(v.rgb, 2.0);
  ivec3 i = ivec3(1);
  gl_FragColor = vec4(light.color * light.power, (m * v.xy).x + float(i.z));
}
"#,
    );
}

#[test]
fn test_const_array_size_and_index() {
    assert_ok(
        r#"
const int COUNT = 2 * 2;
uniform vec4 colors[COUNT];
export void main() { gl_FragColor = colors[COUNT - 1]; }
"#,
    );
}

#[test]
fn test_extension_enables_builtin() {
    assert_ok(
        r#"
#extension GL_OES_standard_derivatives : enable
varying float depth;
export void main() { gl_FragColor = vec4(fwidth(depth)); }
"#,
    );
}

// ========================================
// Resolution errors
// ========================================

#[test]
fn test_unknown_symbol() {
    assert_error("export void main() { gl_FragColor = missing; }", "\"missing\" is not declared");
}

#[test]
fn test_unknown_type() {
    assert_error("uniform Missing value;", "\"Missing\" is not a type");
}

#[test]
fn test_block_variables_must_be_declared_before_use() {
    assert_error(
        "export void main() { float a = b; float b = 1.0; }",
        "\"b\" is not declared",
    );
}

#[test]
fn test_duplicate_definition() {
    assert_error("uniform float a; uniform vec2 a;", "\"a\"");
}

#[test]
fn test_reserved_identifier() {
    assert_error("uniform float gl_Custom;", "gl_Custom");
}

#[test]
fn test_type_mismatch_has_no_implicit_conversion() {
    assert_error(
        "export void main() { float x = 1; }",
        "Cannot convert from type \"int\" to type \"float\"",
    );
}

#[test]
fn test_no_matching_overload_lists_candidates() {
    let unit = check_str("export void main() { gl_FragColor = vec4(dot(1.0, vec2(1.0))); }");
    let error = unit
        .diagnostics
        .iter()
        .find(|e| e.message.starts_with("No matching overload"))
        .expect("overload error");
    assert_eq!(error.message, "No matching overload for \"dot(float, vec2)\"");
    assert_eq!(error.notes.len(), 4);
    assert!(error.notes[0].contains("float dot(float x, float y)"));
}

#[test]
fn test_constructor_component_counts() {
    assert_error("export void main() { vec3 v = vec3(1.0, 2.0); }", "Cannot construct \"vec3\"");
    assert_error(
        "export void main() { vec2 v = vec2(1.0, 2.0, 3.0); }",
        "Cannot construct \"vec2\"",
    );
    assert_error(
        "export void main() { mat2 m = mat2(mat2(1.0)); }",
        "Matrices cannot be constructed from other matrices",
    );
}

#[test]
fn test_struct_constructor_arity() {
    assert_error(
        "struct S { float a; float b; }; export void main() { S s = S(1.0); }",
        "Expected 2 argument",
    );
}

#[test]
fn test_invalid_swizzle() {
    assert_error("export void main() { vec2 v = vec2(1.0); float z = v.z; }", "Invalid swizzle \"z\"");
    assert_error("export void main() { vec4 v = vec4(1.0); vec2 w = v.xg; }", "Invalid swizzle \"xg\"");
}

#[test]
fn test_assignment_rules() {
    assert_error(
        "const float k = 1.0; export void main() { k = 2.0; }",
        "This expression cannot be assigned to",
    );
    assert_error(
        "uniform float u; export void main() { u += 1.0; }",
        "This expression cannot be assigned to",
    );
    assert_error(
        "export void main() { vec2 v = vec2(1.0); v.xx = vec2(2.0); }",
        "This expression cannot be assigned to",
    );
    assert_error(
        "export void main() { gl_FragCoord = vec4(1.0); }",
        "This expression cannot be assigned to",
    );
}

#[test]
fn test_out_arguments_must_be_lvalues() {
    assert_error(
        "void set(out float x) { x = 1.0; } export void main() { set(2.0); }",
        "This expression cannot be assigned to",
    );
}

#[test]
fn test_conditions_must_be_bool() {
    assert_error(
        "export void main() { if (1) { discard; } }",
        "Cannot convert from type \"int\" to type \"bool\"",
    );
}

#[test]
fn test_break_outside_loop() {
    assert_error("export void main() { break; }", "\"break\" can only be used inside a loop");
    assert_ok("export void main() { for (int i = 0; i < 4; i++) { if (i == 2) break; } }");
}

#[test]
fn test_return_rules() {
    assert_error("float f() { return; } export void main() { f(); }", "Must return a value");
    assert_error(
        "float f(bool b) { if (b) return 1.0; } export void main() { f(true); }",
        "All control paths for \"f\" must return a value",
    );
    assert_error(
        "void f() { return 1.0; } export void main() { f(); }",
        "Cannot return a value",
    );
}

#[test]
fn test_storage_qualifier_placement() {
    assert_error(
        "export void main() { uniform float u; }",
        "\"uniform\" variables can only be declared at global scope",
    );
    assert_error("uniform float u = 1.0;", "\"uniform\" variables cannot be initialized");
    assert_error("const float k;", "Constant \"k\" must be initialized");
    assert_error("varying sampler2D s;", "Samplers must be declared \"uniform\"");
}

#[test]
fn test_global_initializers_must_be_constant() {
    assert_error("uniform float u; float g = u * 2.0;", "Expected a constant expression");
}

#[test]
fn test_array_rules() {
    assert_error("uniform float values[0];", "Array sizes must be positive constant integers");
    assert_error("uniform float u; uniform float values[int(u)];", "Array sizes must be positive");
    assert_error(
        "uniform float values[3]; export void main() { gl_FragColor = vec4(values[3]); }",
        "Index 3 is out of bounds for a size of 3",
    );
}

#[test]
fn test_entry_point_signature() {
    assert_error(
        "export float main() { return 1.0; }",
        "Entry point \"main\" must take no arguments and return \"void\"",
    );
}

#[test]
fn test_static_recursion() {
    assert_error(
        r#"
float a(float x);
float b(float x) { return a(x); }
float a(float x) { return b(x); }
export void main() { gl_FragColor = vec4(a(1.0)); }
"#,
        "Recursive function calls are not allowed: a -> b -> a",
    );
}

#[test]
fn test_missing_extension() {
    assert_error(
        "varying float d; export void main() { gl_FragColor = vec4(dFdx(d)); }",
        "GL_OES_standard_derivatives",
    );
}

#[test]
fn test_errors_do_not_cascade() {
    let errors = error_messages("export void main() { vec3 v = missing * 2.0 + vec3(1.0); gl_FragColor = vec4(v, 1.0); }");
    assert_eq!(errors.len(), 1, "{errors:?}");
}

// ========================================
// Types and unused symbols
// ========================================

#[test]
fn test_expression_types_are_recorded() {
    let unit = check_str("uniform mat3 m; uniform vec3 v; export void main() { gl_FragColor = vec4(m * v, 1.0); }");
    let types: Vec<String> = unit.info.expr_types.values().map(ResolvedType::to_string).collect();
    assert!(types.iter().any(|t| t == "mat3"));
    assert!(types.iter().any(|t| t == "vec3"));
    assert!(types.iter().any(|t| t == "vec4"));
}

#[test]
fn test_unused_struct_until_used() {
    assert_eq!(unused_names("struct S { float x; };"), vec!["S"]);
    assert!(unused_names("struct S { float x; }; S s; export void main() { s.x = 1.0; }").is_empty());
}

#[test]
fn test_unused_locals_and_functions_in_declaration_order() {
    let names = unused_names(
        r#"
float helper() { return 1.0; }
export void main() {
  float unusedLocal = 1.0;
  float used = 2.0;
  gl_FragColor = vec4(used);
}
"#,
    );
    assert_eq!(names, vec!["helper", "unusedLocal"]);
}

#[test]
fn test_exported_and_imported_symbols_are_never_unused() {
    assert!(unused_names("export uniform float pinned; import float host(float x);").is_empty());
}
