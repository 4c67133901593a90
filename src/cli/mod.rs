//! CLI module for the glslx compiler
//!
//! This module provides the command-line interface for the compiler.
//!
//! ## Commands
//!
//! - `compile <files..>` - Compile shaders to json/js/c++/skew/rust
//! - `check <files..>` - Report diagnostics without emitting
//! - `fmt <file|dir>` - Format glslx source files
//! - `query <kind> <file>` - Answer one IDE query and print the JSON response
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `disk` - `#include` resolution from the file system
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod disk;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::backend::{CompileArgs, OutputFormat, RenamingMode};
use crate::format::{FormatArgs, TrailingNewline};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<disk::ReadError> for CliError {
    fn from(err: disk::ReadError) -> Self {
        CliError::failure(err.to_string())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The glslx shader compiler
#[derive(Parser, Debug)]
#[command(name = "glslx")]
#[command(version = VERSION)]
#[command(about = "A GLSL ES shader compiler, minifier, formatter and language service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with = "file")]
    pub lex_file: Option<PathBuf>,

    /// Parse only (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with = "file")]
    pub parse_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile shaders; all files form one compilation unit
    Compile {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        options: CompileOptions,
        /// Write the output here instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Report diagnostics without emitting anything
    Check {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },

    /// Format glslx source files
    Fmt {
        /// File or directory to format
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
        /// Show diff of formatting changes
        #[arg(long)]
        diff: bool,
        #[command(flatten)]
        options: FormatOptions,
    },

    /// Answer one IDE query at a position and print the JSON response
    Query {
        #[arg(value_enum)]
        kind: QueryKind,
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// 0-based line
        #[arg(long, default_value_t = 0)]
        line: usize,
        /// 0-based column
        #[arg(long, default_value_t = 0)]
        column: usize,
        /// Answer tooltips even where a diagnostic is reported
        #[arg(long)]
        ignore_diagnostics: bool,
    },
}

/// Emitter switches shared by `compile`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CompileOptions {
    /// Output container: json, js, c++, skew or rust
    #[arg(long, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Which symbols get short names: all, internal-only or none
    #[arg(long, default_value_t = RenamingMode::All)]
    pub renaming: RenamingMode,
    /// Skip constant folding, inlining and dead code removal
    #[arg(long)]
    pub disable_rewriting: bool,
    /// Indented, one statement per line
    #[arg(long)]
    pub pretty_print: bool,
    /// Keep every declaration, reachable or not
    #[arg(long)]
    pub keep_symbols: bool,
}

impl From<&CompileOptions> for CompileArgs {
    fn from(options: &CompileOptions) -> Self {
        CompileArgs::new()
            .with_format(options.format)
            .with_renaming(options.renaming)
            .with_disable_rewriting(options.disable_rewriting)
            .with_pretty_print(options.pretty_print)
            .with_keep_symbols(options.keep_symbols)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineStyle {
    #[default]
    Lf,
    Crlf,
}

impl NewlineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineStyle::Lf => "\n",
            NewlineStyle::Crlf => "\r\n",
        }
    }
}

/// Formatter switches shared by `fmt`.
#[derive(clap::Args, Debug, Clone)]
pub struct FormatOptions {
    /// One level of indentation, e.g. "  " or "\t"
    #[arg(long, default_value = "  ")]
    pub indent: String,
    #[arg(long, value_enum, default_value_t = NewlineStyle::Lf)]
    pub newline: NewlineStyle,
    /// preserve, remove or insert
    #[arg(long, default_value_t = TrailingNewline::Insert)]
    pub trailing_newline: TrailingNewline,
}

impl From<&FormatOptions> for FormatArgs {
    fn from(options: &FormatOptions) -> Self {
        FormatArgs::new()
            .with_indent(unescape_indent(&options.indent))
            .with_newline(options.newline.as_str())
            .with_trailing_newline(options.trailing_newline)
    }
}

/// Shells make a literal tab awkward to pass, so `\t` is accepted as an escape.
fn unescape_indent(indent: &str) -> String {
    indent.replace("\\t", "\t")
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Tooltip,
    Definition,
    Symbols,
    Rename,
    Completion,
    Signature,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file);
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file);
    }

    match cli.command {
        Some(Command::Compile { files, options, output }) => {
            commands::compile_files(&files, &CompileArgs::from(&options), output.as_deref())
        }
        Some(Command::Check { files }) => commands::check_files(&files),
        Some(Command::Fmt {
            path,
            check,
            diff,
            options,
        }) => commands::format_files(&path, &FormatArgs::from(&options), check, diff),
        Some(Command::Query {
            kind,
            file,
            line,
            column,
            ignore_diagnostics,
        }) => commands::query_file(kind, &file, line, column, ignore_diagnostics),
        None => {
            // Default: check the file if provided
            if let Some(file) = cli.file {
                commands::check_files(&[file])
            } else {
                // No command and no file - show help
                Err(CliError::new("", ExitCode::FAILURE))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
