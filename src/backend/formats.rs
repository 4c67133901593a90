//! Output containers for emitted shaders.
//!
//! Every format carries the same data: one source string per entry point plus the renaming table for uniforms
//! and attributes. The source formats (`js`, `c++`, `skew`, `rust`) expose them as constants named
//! `GLSLX_SOURCE_<ENTRY>` and `GLSLX_NAME_<ORIGINAL>` in upper snake case.

use std::collections::BTreeMap;
use std::fmt::Write;

use quote::quote;
use serde::Serialize;

use super::errors::EmitError;
use super::options::OutputFormat;

/// One emitted shader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shader {
    /// Entry point name as declared.
    pub name: String,
    pub contents: String,
}

/// Everything one compile produces, before serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitOutput {
    pub shaders: Vec<Shader>,
    /// Declared name -> emitted name for reachable uniforms and attributes.
    pub renaming: BTreeMap<String, String>,
}

/// Serialize `output` in the requested format.
#[tracing::instrument(skip_all, fields(format = %format, shaders = output.shaders.len()))]
pub fn serialize(output: &EmitOutput, format: OutputFormat) -> Result<String, EmitError> {
    Ok(match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(output).unwrap_or_default();
            text.push('\n');
            text
        }
        OutputFormat::Js => constants(output)?
            .iter()
            .map(|(name, value)| format!("export const {name} = {};\n", quoted(value)))
            .collect(),
        OutputFormat::Skew => constants(output)?
            .iter()
            .map(|(name, value)| format!("const {name} = {}\n", quoted(value)))
            .collect(),
        OutputFormat::Cpp => {
            let mut text = String::from("#ifndef GLSLX_STRINGS_H\n#define GLSLX_STRINGS_H\n\n");
            for (name, value) in &constants(output)? {
                let _ = writeln!(text, "static const char *{name} = {};", c_string(value));
            }
            text.push_str("\n#endif\n");
            text
        }
        OutputFormat::Rust => rust_module(&constants(output)?)?,
    })
}

/// `(constant, value)` pairs: shader sources first, then names.
fn constants(output: &EmitOutput) -> Result<Vec<(String, String)>, EmitError> {
    let mut owners: BTreeMap<String, &str> = BTreeMap::new();
    let mut constants = Vec::new();
    let sources = output.shaders.iter().map(|s| ("GLSLX_SOURCE_", s.name.as_str(), s.contents.as_str()));
    let names = output
        .renaming
        .iter()
        .map(|(from, to)| ("GLSLX_NAME_", from.as_str(), to.as_str()));
    for (prefix, name, value) in sources.chain(names) {
        let constant = format!("{prefix}{}", upper_snake_case(name));
        if let Some(first) = owners.insert(constant.clone(), name) {
            return Err(EmitError::ConstantCollision {
                first: first.to_string(),
                second: name.to_string(),
                constant,
            });
        }
        constants.push((constant, value.to_string()));
    }
    Ok(constants)
}

/// `fragmentShader` -> `FRAGMENT_SHADER`, `u_color` -> `U_COLOR`.
pub fn upper_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    for c in name.chars() {
        if c.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
        previous = Some(c);
    }
    out
}

/// A JavaScript/Skew string literal.
fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// A C string literal.
fn c_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn rust_module(constants: &[(String, String)]) -> Result<String, EmitError> {
    let mut items = Vec::with_capacity(constants.len());
    for (name, value) in constants {
        let ident: syn::Ident = syn::parse_str(name).map_err(|e| EmitError::RustOutput(e.to_string()))?;
        items.push(quote! { pub const #ident: &str = #value; });
    }
    let tokens = quote! { #(#items)* };
    let syntax_tree: syn::File = syn::parse2(tokens).map_err(|e| EmitError::RustOutput(e.to_string()))?;
    Ok(prettyplease::unparse(&syntax_tree))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> EmitOutput {
        EmitOutput {
            shaders: vec![Shader {
                name: "drawQuad".to_string(),
                contents: "void main(){gl_FragColor=vec4(\"\");}".to_string(),
            }],
            renaming: BTreeMap::from([("uColor".to_string(), "a".to_string())]),
        }
    }

    #[test]
    fn test_upper_snake_case() {
        assert_eq!(upper_snake_case("fragmentShader"), "FRAGMENT_SHADER");
        assert_eq!(upper_snake_case("u_color"), "U_COLOR");
        assert_eq!(upper_snake_case("light2Pos"), "LIGHT2_POS");
        assert_eq!(upper_snake_case("HDR"), "HDR");
    }

    #[test]
    fn test_json_layout() {
        let text = serialize(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["shaders"][0]["name"], "drawQuad");
        assert_eq!(value["renaming"]["uColor"], "a");
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_js_and_skew_constants() {
        let js = serialize(&sample(), OutputFormat::Js).unwrap();
        insta::assert_snapshot!(js, @r#"
        export const GLSLX_SOURCE_DRAW_QUAD = "void main(){gl_FragColor=vec4(\"\");}";
        export const GLSLX_NAME_U_COLOR = "a";
        "#);
        let skew = serialize(&sample(), OutputFormat::Skew).unwrap();
        assert!(skew.starts_with("const GLSLX_SOURCE_DRAW_QUAD = \""));
    }

    #[test]
    fn test_cpp_include_guard() {
        let cpp = serialize(&sample(), OutputFormat::Cpp).unwrap();
        insta::assert_snapshot!(cpp, @r#"
        #ifndef GLSLX_STRINGS_H
        #define GLSLX_STRINGS_H

        static const char *GLSLX_SOURCE_DRAW_QUAD = "void main(){gl_FragColor=vec4(\"\");}";
        static const char *GLSLX_NAME_U_COLOR = "a";

        #endif
        "#);
    }

    #[test]
    fn test_rust_module() {
        let rust = serialize(&sample(), OutputFormat::Rust).unwrap();
        assert!(rust.contains("pub const GLSLX_SOURCE_DRAW_QUAD: &str = "));
        assert!(rust.contains("pub const GLSLX_NAME_U_COLOR: &str = \"a\";"));
    }

    #[test]
    fn test_constant_collision() {
        let mut output = sample();
        output.renaming.insert("u_color".to_string(), "b".to_string());
        let err = serialize(&output, OutputFormat::Js).unwrap_err();
        assert_eq!(
            err,
            EmitError::ConstantCollision {
                first: "uColor".to_string(),
                second: "u_color".to_string(),
                constant: "GLSLX_NAME_U_COLOR".to_string(),
            }
        );
    }
}
