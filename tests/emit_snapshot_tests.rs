//! Golden snapshot tests for emitted output
//!
//! These tests compile `.glslx` input files end to end and compare the
//! serialized output against inline snapshots. This ensures emitter changes
//! are reviewed and intentional.
//!
//! Run with: `cargo test --test emit_snapshot_tests`
//! Review changes: `cargo insta review`

use std::fs;

use glslx::{CompileArgs, NoFileAccess, OutputFormat, RenamingMode, compile};

/// Compile a file and return its output, failing on any error
fn compile_output(source: &str, args: &CompileArgs) -> String {
    let result = compile(source, args, &NoFileAccess);
    result.output.unwrap_or_else(|| panic!("compile failed:\n{}", result.log))
}

/// Load a test file from the emit_snapshots directory
fn load_test_file(name: &str) -> String {
    let path = format!("tests/emit_snapshots/{}.glslx", name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read test file: {}", path))
}

#[test]
fn test_json_output() {
    let source = load_test_file("textured");
    insta::assert_snapshot!(compile_output(&source, &CompileArgs::default()), @r#"
    {
      "shaders": [
        {
          "name": "fragment",
          "contents": "precision mediump float;uniform sampler2D a;varying vec2 b;void main(){gl_FragColor=texture2D(a,b);}"
        }
      ],
      "renaming": {
        "texture": "a"
      }
    }
    "#);
}

#[test]
fn test_js_output() {
    let source = load_test_file("textured");
    let args = CompileArgs::new().with_format(OutputFormat::Js);
    insta::assert_snapshot!(compile_output(&source, &args), @r#"
    export const GLSLX_SOURCE_FRAGMENT = "precision mediump float;uniform sampler2D a;varying vec2 b;void main(){gl_FragColor=texture2D(a,b);}";
    export const GLSLX_NAME_TEXTURE = "a";
    "#);
}

#[test]
fn test_skew_output_without_renaming() {
    let source = load_test_file("textured");
    let args = CompileArgs::new()
        .with_format(OutputFormat::Skew)
        .with_renaming(RenamingMode::None);
    insta::assert_snapshot!(compile_output(&source, &args), @r#"
    const GLSLX_SOURCE_FRAGMENT = "precision mediump float;uniform sampler2D texture;varying vec2 coord;void main(){gl_FragColor=texture2D(texture,coord);}"
    const GLSLX_NAME_TEXTURE = "texture"
    "#);
}

#[test]
fn test_cpp_output() {
    let source = load_test_file("textured");
    let args = CompileArgs::new().with_format(OutputFormat::Cpp);
    insta::assert_snapshot!(compile_output(&source, &args), @r#"
    #ifndef GLSLX_STRINGS_H
    #define GLSLX_STRINGS_H

    static const char *GLSLX_SOURCE_FRAGMENT = "precision mediump float;uniform sampler2D a;varying vec2 b;void main(){gl_FragColor=texture2D(a,b);}";
    static const char *GLSLX_NAME_TEXTURE = "a";

    #endif
    "#);
}

#[test]
fn test_rust_output() {
    let source = load_test_file("textured");
    let args = CompileArgs::new().with_format(OutputFormat::Rust);
    let output = compile_output(&source, &args);
    assert!(output.contains("pub const GLSLX_SOURCE_FRAGMENT: &str = \"precision mediump float;"));
    assert!(output.contains("pub const GLSLX_NAME_TEXTURE: &str = \"a\";"));
}
