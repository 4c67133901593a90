//! IDE query tests. `|` in a test source marks the probe and is removed before analysis.

use super::*;
use crate::frontend::loader::{Input, NoFileAccess};

const NAME: &str = "shader.glslx";

fn session_at(marked: &str) -> (IdeSession, PositionRequest) {
    let offset = marked.find('|').expect("probe marker");
    let before = &marked[..offset];
    let line = before.matches('\n').count();
    let column = before.rsplit('\n').next().unwrap_or("").chars().count();
    let session = compile_ide(Input::new(NAME, marked.replacen('|', "", 1)), &NoFileAccess);
    (session, PositionRequest::new(NAME, line, column))
}

fn tooltip(session: &IdeSession, at: &PositionRequest, ignore_diagnostics: bool) -> TooltipResponse {
    session.tooltip_query(&TooltipRequest {
        source: at.source.clone(),
        line: at.line,
        column: at.column,
        ignore_diagnostics,
    })
}

fn range(start: (usize, usize), end: (usize, usize)) -> Range {
    Range {
        source: NAME.to_string(),
        start: LineColumn {
            line: start.0,
            column: start.1,
        },
        end: LineColumn {
            line: end.0,
            column: end.1,
        },
    }
}

fn completion_names(response: &CompletionResponse) -> Vec<&str> {
    response.completions.iter().map(|c| c.name.as_str()).collect()
}

const TINTED: &str = "// Tint applied to every pixel
uniform vec4 tint;
export void main() {
  gl_FragColor = ti|nt;
}
";

#[test]
fn test_tooltip_shows_declaration_and_docs() {
    let (session, at) = session_at(TINTED);
    let response = tooltip(&session, &at, false);
    assert_eq!(response.tooltip.as_deref(), Some("uniform vec4 tint"));
    assert_eq!(response.symbol.as_deref(), Some("tint"));
    assert_eq!(response.documentation.as_deref(), Some("Tint applied to every pixel"));
    assert_eq!(response.range, Some(range((3, 17), (3, 21))));
}

#[test]
fn test_tooltip_falls_back_to_expression_type() {
    let (session, at) = session_at("export void main() {\n  float local = 1|.0;\n  gl_FragColor = vec4(local);\n}\n");
    let response = tooltip(&session, &at, false);
    assert_eq!(response.tooltip.as_deref(), Some("float"));
    assert_eq!(response.symbol, None);
}

#[test]
fn test_tooltip_defers_to_diagnostics() {
    let (session, at) = session_at("export void main() {\n  int i = 1|.0;\n}\n");
    assert_eq!(tooltip(&session, &at, false), TooltipResponse::default());
    assert_eq!(tooltip(&session, &at, true).tooltip.as_deref(), Some("float"));
}

#[test]
fn test_definition_of_user_symbol_and_builtin() {
    let (session, at) = session_at(TINTED);
    let response = session.definition_query(&at);
    assert_eq!(response.definition, Some(range((1, 13), (1, 17))));
    assert_eq!(response.range, Some(range((3, 17), (3, 21))));

    let builtin = session.definition_query(&PositionRequest::new(NAME, 3, 4));
    assert_eq!(builtin.symbol.as_deref(), Some("gl_FragColor"));
    assert_eq!(builtin.definition, None);
    assert!(builtin.range.is_some());
}

#[test]
fn test_definition_agrees_with_symbols_query() {
    let (session, at) = session_at(TINTED);
    let definition = session.definition_query(&at).definition;
    let symbols = session
        .symbols_query(&SymbolsRequest {
            source: NAME.to_string(),
        })
        .symbols
        .unwrap();
    let tint = symbols.iter().find(|s| s.name == "tint").unwrap();
    assert_eq!(definition, Some(tint.range.clone()));
}

#[test]
fn test_symbols_lists_top_level_declarations_in_order() {
    let (session, _) = session_at("struct Light { float radius; };\nuniform Light light;\nfloat reach(Light l) { float r = l.radius; return r; }\nexport void main() {}|\n");
    let symbols = session
        .symbols_query(&SymbolsRequest {
            source: NAME.to_string(),
        })
        .symbols
        .unwrap();
    let listed: Vec<(&str, SymbolKindName)> = symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect();
    assert_eq!(
        listed,
        vec![
            ("Light", SymbolKindName::Struct),
            ("light", SymbolKindName::Variable),
            ("reach", SymbolKindName::Function),
            ("main", SymbolKindName::Function),
        ]
    );
    let unknown = session.symbols_query(&SymbolsRequest {
        source: "other.glslx".to_string(),
    });
    assert_eq!(unknown.symbols, None);
}

#[test]
fn test_rename_is_the_same_from_every_site() {
    let source = "float f(float x) { return x * 2.0; }\nexport void main() { gl_FragColor = vec4(f(f(1.0))); }\n";
    let session = compile_ide(Input::new(NAME, source), &NoFileAccess);
    let from_declaration = session.rename_query(&PositionRequest::new(NAME, 0, 6));
    let from_outer_call = session.rename_query(&PositionRequest::new(NAME, 1, 41));
    let from_inner_call = session.rename_query(&PositionRequest::new(NAME, 1, 43));
    assert_eq!(from_declaration.symbol.as_deref(), Some("f"));
    assert_eq!(from_declaration.ranges.as_ref().map(Vec::len), Some(3));
    assert_eq!(from_declaration, from_outer_call);
    assert_eq!(from_declaration, from_inner_call);
}

#[test]
fn test_rename_of_builtin_is_null() {
    let (session, _) = session_at(TINTED);
    let response = session.rename_query(&PositionRequest::new(NAME, 3, 4));
    assert_eq!(response, RenameResponse::default());
}

#[test]
fn test_unused_symbols() {
    let (session, _) = session_at("struct S { float x; };|\n");
    let names: Vec<String> = session.unused_symbols().into_iter().map(|u| u.name).collect();
    assert_eq!(names, vec!["S"]);

    let (session, _) = session_at("struct S { float x; };\nS s;|\n");
    let names: Vec<String> = session.unused_symbols().into_iter().map(|u| u.name).collect();
    assert_eq!(names, vec!["s"]);
}

#[test]
fn test_diagnostics_carry_ranges() {
    let (session, _) = session_at("float x = ;|\n");
    let diagnostics = session.diagnostics();
    assert!(!diagnostics.is_empty());
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Error);
    assert_eq!(diagnostics[0].range.as_ref().map(|r| r.start.line), Some(0));
}

#[test]
fn test_completion_inside_function() {
    let (session, at) = session_at("float helper(float x) { return x; }\nexport void main() {\n  float local = 1.0;\n  |\n}\n");
    let response = session.completion_query(&at);
    let names = completion_names(&response);
    for expected in ["local", "helper", "return", "vec3", "texture2D"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    assert!(!names.contains(&"x"));
    assert!(!names.contains(&"uniform"));

    let texture = response.completions.iter().find(|c| c.name == "texture2D").unwrap();
    assert_eq!(texture.kind, CompletionKind::Function);
    assert!(texture.detail.contains("overloads"));
}

#[test]
fn test_completion_at_module_level() {
    let (session, at) = session_at("float helper(float x) { return x; }\n|\n");
    let response = session.completion_query(&at);
    let names = completion_names(&response);
    assert!(names.contains(&"uniform"));
    assert!(names.contains(&"helper"));
    assert!(!names.contains(&"return"));
}

#[test]
fn test_member_completion() {
    let source = "struct Light {\n  float radius; // reach\n  vec3 color;\n};\nuniform Light light;\nexport void main() {\n  float r = light.|radius;\n  gl_FragColor = vec4(r);\n}\n";
    let (session, at) = session_at(source);
    let response = session.completion_query(&at);
    assert_eq!(completion_names(&response), vec!["radius", "color"]);
    assert_eq!(response.completions[0].documentation, "reach");
}

#[test]
fn test_member_completion_in_unfinished_statement() {
    let source = "struct Light {\n  float radius;\n  vec3 color;\n};\nuniform Light light;\nexport void main() {\n  gl_FragColor = vec4(light.|";
    let (session, at) = session_at(source);
    assert_eq!(completion_names(&session.completion_query(&at)), vec!["radius", "color"]);
}

#[test]
fn test_no_completion_in_comments() {
    let (session, at) = session_at("// fl|\nfloat x;\n");
    assert!(session.completion_query(&at).completions.is_empty());
}

const OVERLOADED: &str = "float scale(float x) { return x; }\nvec2 scale(vec2 v, float s) { return v * s; }\n";

#[test]
fn test_signature_of_unfinished_call() {
    let (session, at) = session_at(&format!("{OVERLOADED}export void main() {{\n  vec2 a = scale(vec2(1.0), |"));
    let response = session.signature_query(&at);
    let texts: Vec<&str> = response.signatures.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["float scale(float x)", "vec2 scale(vec2 v, float s)"]);
    assert_eq!(response.active_argument, 1);
    assert_eq!(response.active_signature, 1);
    assert_eq!(response.signatures[1].arguments, vec!["vec2 v", "float s"]);
}

#[test]
fn test_signature_prefers_resolved_overload() {
    let (session, at) = session_at(&format!(
        "{OVERLOADED}export void main() {{\n  vec2 a = scale(|vec2(1.0), 2.0);\n  gl_FragColor = vec4(a, 0.0, 1.0);\n}}\n"
    ));
    let response = session.signature_query(&at);
    assert_eq!(response.active_argument, 0);
    assert_eq!(response.active_signature, 1);
}

#[test]
fn test_signature_of_struct_constructor() {
    let (session, at) = session_at("struct Light { float radius; vec3 color; };\nexport void main() {\n  Light l = Light(1.0, |");
    let response = session.signature_query(&at);
    assert_eq!(response.signatures.len(), 1);
    assert_eq!(response.signatures[0].text, "Light Light(float radius, vec3 color)");
    assert_eq!(response.active_argument, 1);
}

#[test]
fn test_queries_outside_sources_are_empty() {
    let (session, _) = session_at(TINTED);
    let nowhere = PositionRequest::new("missing.glslx", 0, 0);
    assert_eq!(session.definition_query(&nowhere), DefinitionResponse::default());
    assert_eq!(session.signature_query(&nowhere), SignatureResponse::default());
    let past_end = PositionRequest::new(NAME, 100, 0);
    assert!(session.completion_query(&past_end).completions.is_empty());
}

#[test]
fn test_session_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<IdeSession>();

    let (session, at) = session_at(TINTED);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let session = session.clone();
            let at = at.clone();
            std::thread::spawn(move || session.definition_query(&at))
        })
        .collect();
    let answers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(answers.windows(2).all(|w| w[0] == w[1]));
}
