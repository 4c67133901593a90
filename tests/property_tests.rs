//! Property-based tests for the glslx toolchain
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use glslx::{CompileArgs, FormatArgs, NoFileAccess, OutputFormat, RenamingMode, TrailingNewline, compile, format};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Source fragments that appear in real shaders, valid or not on their own.
const FRAGMENTS: &[&str] = &[
    "float a = 1.0;",
    "vec3 v=vec3(1.0,2.0,3.0);",
    "if(a>b){",
    "} else {",
    "}",
    "x++;",
    "return -x*2.0;",
    "// note",
    "/* block\n comment */",
    "#define N 4",
    "for(int i=0;i<N;i++){",
    "a.x = b.y;",
    "c = a ? b : c[ i ];",
    "uniform sampler2D tex;",
    "void f(inout float x) {",
    "gl_FragColor = texture2D(tex, uv);",
    "x = a - -b;",
    "float x = ;",
    "(",
    ")",
];

const SEPARATORS: &[&str] = &["", " ", "\n", "\n\n\n", "  \t", "\r\n"];

fn source_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((prop::sample::select(FRAGMENTS), prop::sample::select(SEPARATORS)), 0..24).prop_map(
        |parts| {
            parts
                .into_iter()
                .map(|(fragment, separator)| format!("{fragment}{separator}"))
                .collect()
        },
    )
}

fn format_args_strategy() -> impl Strategy<Value = FormatArgs> {
    (
        prop::sample::select(vec!["  ", "    ", "\t"]),
        prop::sample::select(vec!["\n", "\r\n"]),
        prop::sample::select(vec![TrailingNewline::Insert, TrailingNewline::Remove, TrailingNewline::Preserve]),
    )
        .prop_map(|(indent, newline, trailing)| {
            FormatArgs::new()
                .with_indent(indent)
                .with_newline(newline)
                .with_trailing_newline(trailing)
        })
}

/// A well-formed fragment shader with a few helpers and constants.
fn shader_strategy() -> impl Strategy<Value = String> {
    (1usize..5, 0u32..100, any::<bool>()).prop_map(|(helpers, scale, use_uniform)| {
        let mut source = String::from("precision mediump float;\nuniform vec4 tint;\n");
        for i in 0..helpers {
            source.push_str(&format!("float helper{i}(float x) {{ return x * {scale}.0 + {i}.0; }}\n"));
        }
        let color = if use_uniform { "tint" } else { "vec4(1.0)" };
        source.push_str(&format!("export void main() {{ gl_FragColor = {color} * helper0(0.5); }}\n"));
        source
    })
}

fn log_has_error(log: &str) -> bool {
    log.lines().any(|line| line.starts_with("error: ") || line.contains(": error: "))
}

// =============================================================================
// Format Properties
// =============================================================================

proptest! {
    /// Property: Formatting is idempotent (format(format(x)) == format(x))
    #[test]
    fn format_is_idempotent(source in source_strategy(), args in format_args_strategy()) {
        let once = format(&source, &args);
        let twice = format(&once, &args);
        prop_assert_eq!(once, twice);
    }

    /// Property: Arbitrary printable text formats without panicking
    #[test]
    fn format_accepts_any_text(source in "[ -~\n\t]{0,200}") {
        let _ = format(&source, &FormatArgs::default());
    }

    /// Property: The default trailing-newline policy ends non-empty output with exactly one newline
    #[test]
    fn format_inserts_one_trailing_newline(source in source_strategy()) {
        let out = format(&source, &FormatArgs::default());
        if !out.is_empty() {
            prop_assert!(out.ends_with('\n'));
            prop_assert!(!out.ends_with("\n\n"));
        }
    }
}

// =============================================================================
// Compile Properties
// =============================================================================

proptest! {
    /// Property: `output` is absent exactly when the log reports an error
    #[test]
    fn output_is_null_exactly_on_error(source in source_strategy()) {
        let result = compile(source.as_str(), &CompileArgs::default(), &NoFileAccess);
        prop_assert_eq!(result.output.is_none(), log_has_error(&result.log), "{}", result.log);
    }

    /// Property: Compiling the same input twice yields identical results
    #[test]
    fn compile_is_deterministic(
        source in shader_strategy(),
        format in prop::sample::select(OutputFormat::ALL.to_vec()),
        renaming in prop::sample::select(RenamingMode::ALL.to_vec()),
        pretty in any::<bool>(),
    ) {
        let args = CompileArgs::new().with_format(format).with_renaming(renaming).with_pretty_print(pretty);
        let first = compile(source.as_str(), &args, &NoFileAccess);
        let second = compile(source.as_str(), &args, &NoFileAccess);
        prop_assert!(first.output.is_some(), "{}", first.log);
        prop_assert_eq!(first, second);
    }
}
