//! Integration tests for the glslx public API: batch compile, includes and the IDE session.

use std::collections::HashMap;

use glslx::ide::{PositionRequest, Symbol, SymbolKindName, SymbolsRequest, TooltipRequest};
use glslx::{
    CompileArgs, FileAccess, IncludedFile, Input, NoFileAccess, OutputFormat, RenamingMode, compile, compile_ide,
};

const SHADERS: &str = r#"
precision mediump float;
attribute vec2 position;
varying vec2 coord;
uniform sampler2D image;

export void vertex() {
  coord = position * 0.5 + 0.5;
  gl_Position = vec4(position, 0.0, 1.0);
}

export void fragment() {
  gl_FragColor = texture2D(image, coord);
}
"#;

/// In-memory file system keyed by file name.
fn files(entries: &[(&str, &str)]) -> impl FileAccess {
    let map: HashMap<String, String> = entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |path: &str, _relative_to: &str| map.get(path).map(|text| IncludedFile::new(path, text.as_str()))
}

// ============================================================================
// compile
// ============================================================================

#[test]
fn test_compile_json_lists_every_entry_point() {
    let result = compile(SHADERS, &CompileArgs::default(), &NoFileAccess);
    assert_eq!(result.log, "");
    let output = result.output.expect("output");
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["shaders"][0]["name"], "vertex");
    assert_eq!(value["shaders"][1]["name"], "fragment");
    assert_eq!(value["renaming"]["image"], "c");
    assert_eq!(value["renaming"]["position"], "a");
}

#[test]
fn test_compile_every_format_succeeds() {
    for format in OutputFormat::ALL {
        let result = compile(SHADERS, &CompileArgs::new().with_format(format), &NoFileAccess);
        assert!(result.output.is_some(), "{format}: {}", result.log);
    }
}

#[test]
fn test_compile_js_constants() {
    let args = CompileArgs::new().with_format(OutputFormat::Js);
    let output = compile(SHADERS, &args, &NoFileAccess).output.unwrap();
    assert!(output.contains("export const GLSLX_SOURCE_VERTEX = \""));
    assert!(output.contains("export const GLSLX_SOURCE_FRAGMENT = \""));
    assert!(output.contains("export const GLSLX_NAME_IMAGE = \"c\";"));
}

#[test]
fn test_renaming_none_keeps_interface_names() {
    let args = CompileArgs::new().with_renaming(RenamingMode::None);
    let output = compile(SHADERS, &args, &NoFileAccess).output.unwrap();
    assert!(output.contains("uniform sampler2D image;"));
}

#[test]
fn test_error_means_no_output() {
    let result = compile("float x = ;", &CompileArgs::default(), &NoFileAccess);
    assert!(result.output.is_none());
    assert!(result.log.starts_with("<stdin>:1:"), "{}", result.log);
    assert!(result.log.contains(": error: "));
}

#[test]
fn test_warnings_alone_keep_the_output() {
    let source = "export void main() { gl_FragColor = vec4(1.0); }";
    let result = compile(source, &CompileArgs::default(), &NoFileAccess);
    assert!(!result.log.contains("error"));
    assert!(result.output.is_some());
}

#[test]
fn test_missing_definition_is_reported_in_the_log() {
    let source = "float f(float x);\nexport void main() { gl_FragColor = vec4(f(1.0)); }";
    let result = compile(source, &CompileArgs::default(), &NoFileAccess);
    assert!(result.output.is_none());
    assert!(result.log.contains("Missing a definition for function \"f\""), "{}", result.log);
}

#[test]
fn test_out_of_range_literals_are_rejected() {
    for literal in ["float f = 1e999;", "int f = 4294967296;", "int f = 0xFFFFFFFF;"] {
        let source = format!("export void main() {{ {literal} gl_FragColor = vec4(f); }}");
        let result = compile(source.as_str(), &CompileArgs::default(), &NoFileAccess);
        assert!(result.output.is_none(), "{literal}");
        assert!(result.log.contains("Invalid numeric literal"), "{literal}: {}", result.log);
    }
}

#[test]
fn test_overflowing_int_arithmetic_is_not_folded() {
    let source = "export void main() { int i = 2147483647 * 2147483647; gl_FragColor = vec4(float(i)); }";
    let args = CompileArgs::new().with_format(OutputFormat::Json);
    let result = compile(source, &args, &NoFileAccess);
    assert_eq!(result.log, "");
    let output = result.output.expect("output");
    assert!(output.contains("2147483647*2147483647"), "{output}");
    assert!(!output.contains("4611686014132420609"));
}

#[test]
fn test_named_inputs_form_one_unit() {
    let inputs = vec![
        Input::new("common.glslx", "float scale(float x) { return x * 2.0; }\n"),
        Input::new("main.glslx", "export void main() { gl_FragColor = vec4(scale(0.5)); }\n"),
    ];
    let result = compile(inputs, &CompileArgs::default(), &NoFileAccess);
    assert_eq!(result.log, "");
    assert!(result.output.is_some());
}

#[test]
fn test_compile_is_deterministic() {
    let args = CompileArgs::new().with_format(OutputFormat::Cpp);
    let first = compile(SHADERS, &args, &NoFileAccess);
    let second = compile(SHADERS, &args, &NoFileAccess);
    assert_eq!(first, second);
}

// ============================================================================
// includes
// ============================================================================

#[test]
fn test_include_is_resolved_through_file_access() {
    let access = files(&[("lib.glslx", "vec4 tint() { return vec4(0.5); }\n")]);
    let source = Input::new("main.glslx", "#include \"lib.glslx\"\nexport void main() { gl_FragColor = tint(); }\n");
    let result = compile(source, &CompileArgs::default(), &access);
    assert_eq!(result.log, "");
    assert!(result.output.is_some());
}

#[test]
fn test_missing_include_is_an_error() {
    let source = Input::new("main.glslx", "#include \"gone.glslx\"\nexport void main() {}\n");
    let result = compile(source, &CompileArgs::default(), &NoFileAccess);
    assert!(result.output.is_none());
    assert!(result.log.contains("Could not read file \"gone.glslx\""), "{}", result.log);
}

#[test]
fn test_include_cycle_is_an_error() {
    let access = files(&[("a.glslx", "#include \"b.glslx\"\n"), ("b.glslx", "#include \"a.glslx\"\n")]);
    let source = Input::new("main.glslx", "#include \"a.glslx\"\nexport void main() {}\n");
    let result = compile(source, &CompileArgs::default(), &access);
    assert!(result.output.is_none());
    assert!(result.log.contains("Include cycle"), "{}", result.log);
}

#[test]
fn test_errors_in_included_files_name_that_file() {
    let access = files(&[("bad.glslx", "float broken = ;\n")]);
    let source = Input::new("main.glslx", "#include \"bad.glslx\"\nexport void main() {}\n");
    let result = compile(source, &CompileArgs::default(), &access);
    assert!(result.output.is_none());
    assert!(result.log.starts_with("bad.glslx:1:"), "{}", result.log);
}

// ============================================================================
// IDE session
// ============================================================================

#[test]
fn test_ide_session_answers_every_query() {
    let source = "uniform vec4 tint;\nexport void main() {\n  gl_FragColor = tint;\n}\n";
    let session = compile_ide(Input::new("main.glslx", source), &NoFileAccess);
    assert!(session.diagnostics().is_empty());

    let tooltip = session.tooltip_query(&TooltipRequest {
        source: "main.glslx".to_string(),
        line: 2,
        column: 18,
        ignore_diagnostics: false,
    });
    assert_eq!(tooltip.tooltip.as_deref(), Some("uniform vec4 tint"));

    let at_use = PositionRequest::new("main.glslx", 2, 18);
    let definition = session.definition_query(&at_use).definition.unwrap();
    assert_eq!((definition.start.line, definition.start.column), (0, 13));

    let rename = session.rename_query(&at_use);
    assert_eq!(rename.ranges.map(|r| r.len()), Some(2));

    let symbols = session
        .symbols_query(&SymbolsRequest {
            source: "main.glslx".to_string(),
        })
        .symbols
        .unwrap();
    let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["tint", "main"]);

    let completions = session.completion_query(&PositionRequest::new("main.glslx", 2, 2)).completions;
    assert!(completions.iter().any(|c| c.name == "tint"));

    let signature = session.signature_query(&PositionRequest::new("main.glslx", 2, 18));
    assert!(signature.signatures.is_empty());
}

#[test]
fn test_ide_session_degrades_outside_sources() {
    let session = compile_ide("float x = ;", &NoFileAccess);
    let nowhere = PositionRequest::new("missing.glslx", 0, 0);
    assert_eq!(session.definition_query(&nowhere).definition, None);
    assert_eq!(session.rename_query(&nowhere).ranges, None);
    assert!(session.completion_query(&nowhere).completions.is_empty());
    assert!(!session.diagnostics().is_empty());
}

#[test]
fn test_symbols_query_returns_exported_symbol_records() {
    let session = compile_ide(Input::new("main.glslx", SHADERS), &NoFileAccess);
    let symbols: Vec<Symbol> = session
        .symbols_query(&SymbolsRequest {
            source: "main.glslx".to_string(),
        })
        .symbols
        .unwrap();
    let image = symbols.iter().find(|s| s.name == "image").expect("image");
    assert_eq!(image.kind, SymbolKindName::Variable);
    let vertex = symbols.iter().find(|s| s.name == "vertex").expect("vertex");
    assert_eq!(vertex.kind, SymbolKindName::Function);
    assert_eq!(vertex.range.start.line, 6);
}
