//! Layering guardrails to keep the shared crates free of the editor and CLI stack.
//!
//! `glslx_core` (vocabulary registries) and `glslx_syntax` (lexer, parser, AST) are consumed by the compiler, the
//! CLI and the language server alike. They must not pull in `tower-lsp`, `tokio` or `clap` through their
//! `[dependencies]` table; those belong to the root package only.

const FORBIDDEN: &[&str] = &["tower-lsp", "tokio", "clap"];

/// Dependency names listed in a manifest's `[dependencies]` table.
fn main_dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

fn assert_layer_is_clean(crate_name: &str, manifest: &str) {
    for dep in main_dependencies(manifest) {
        assert!(
            !FORBIDDEN.contains(&dep.as_str()),
            "`{dep}` must not appear in {crate_name}'s [dependencies]; keep it in the root package"
        );
    }
}

#[test]
fn test_core_crate_stays_free_of_editor_and_cli_deps() {
    assert_layer_is_clean("glslx_core", include_str!("../crates/glslx_core/Cargo.toml"));
}

#[test]
fn test_syntax_crate_stays_free_of_editor_and_cli_deps() {
    assert_layer_is_clean("glslx_syntax", include_str!("../crates/glslx_syntax/Cargo.toml"));
}

#[test]
fn test_manifest_scan_finds_dependency_names() {
    let manifest = "[package]\nname = \"x\"\n\n[dependencies]\nserde = \"1\" # inline\ntokio = { version = \"1\" }\n\n[dev-dependencies]\nclap = \"4\"\n";
    assert_eq!(main_dependencies(manifest), vec!["serde", "tokio"]);
}
