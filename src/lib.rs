#![forbid(unsafe_code)]
//! glslx: a GLSL ES shader compiler, minifier, formatter and language service
//!
//! This crate provides the toolchain: frontend (loader, type checker), backend (shader emission in five output
//! formats), the IDE query engine, the formatter, and the `glslx` CLI and `glslx-lsp` server built on them.
//!
//! ## Entry points
//!
//! - [`compile`]: batch compile to `{ log, output }`
//! - [`compile_ide`]: analyze once, then answer tooltip/definition/symbols/rename/completion/signature queries
//! - [`format`]: reformat source text
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`. Compile problems are diagnostics, never panics.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("...")` with a clear
//!   explanation, as the vocabulary registries do.
//!
//! ## Examples
//!
//! ```rust
//! use glslx::{CompileArgs, compile};
//! use glslx::frontend::loader::NoFileAccess;
//!
//! let result = compile("export void main() { gl_FragColor = vec4(1.0); }", &CompileArgs::default(), &NoFileAccess);
//! assert!(result.log.is_empty());
//! assert!(result.output.is_some());
//!
//! let broken = compile("float x = ;", &CompileArgs::default(), &NoFileAccess);
//! assert!(broken.output.is_none());
//! assert!(broken.log.contains("error"));
//! ```

pub mod backend;
pub mod cli;
pub mod format;
pub mod frontend;
pub mod ide;
pub mod lsp;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;
pub use frontend::symbols;
pub use frontend::typechecker;

pub use backend::{CompileArgs, EmitError, OutputFormat, RenamingMode};
pub use format::{FormatArgs, TrailingNewline, check_formatted, format_diff};
pub use frontend::loader::{CompileInput, FileAccess, IncludedFile, Input, NoFileAccess};
pub use frontend::unit::{CompiledUnit, analyze};
pub use ide::{IdeSession, compile_ide};

use frontend::diagnostics::CompileError;

/// Result of a batch compile.
///
/// `output` is `None` exactly when `log` reports at least one error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    pub log: String,
    pub output: Option<String>,
}

/// Compile `input` to the format selected in `args`.
///
/// ## Parameters
///
/// - `input`: one text, a named file, or several named files compiled as one unit.
/// - `args`: output format, renaming mode and switches.
/// - `access`: resolves `#include` paths.
///
/// ## Returns
///
/// The rendered diagnostic log plus the serialized output, or no output when anything failed. An emitter failure
/// is appended to the log as an error.
#[tracing::instrument(skip_all, fields(format = %args.format, renaming = %args.renaming))]
pub fn compile(input: impl Into<CompileInput>, args: &CompileArgs, access: &dyn FileAccess) -> CompileResult {
    let mut unit = analyze(input, access);
    let output = if unit.has_errors() {
        None
    } else {
        match backend::emit(&unit, args) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::warn!(error = %err, "emission failed");
                unit.diagnostics.push(CompileError::from(err));
                None
            }
        }
    };
    CompileResult { log: unit.log(), output }
}

/// Format glslx source; see [`format::format`].
pub fn format(source: &str, args: &FormatArgs) -> String {
    format::format(source, args)
}
