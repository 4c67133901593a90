//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::backend::CompileArgs;
use crate::format::{FormatArgs, format, format_diff};
use crate::frontend::diagnostics::{CompileError, DiagnosticReport, Diagnostics};
use crate::frontend::loader::Input;
use crate::frontend::source::SourceSet;
use crate::frontend::unit::analyze;
use crate::frontend::{lexer, parser};
use crate::ide::{self, PositionRequest, SymbolsRequest, TooltipRequest};

use super::disk::{self, DiskFileAccess};
use super::{CliError, CliResult, ExitCode, QueryKind};

/// File extension of glslx sources picked up by `fmt` on directories.
const SOURCE_EXTENSION: &str = "glslx";

/// Lex and display tokens.
pub fn lex_file(path: &Path) -> CliResult<ExitCode> {
    let source = disk::read_source(path)?;
    let mut sources = SourceSet::new();
    let id = sources.add(path.to_string_lossy(), source.as_str());
    let lexed = lexer::lex_all(&source, id);

    for tok in &lexed.tokens {
        println!("{:?}", tok);
    }
    report_syntax_errors(lexed.errors, &sources)
}

/// Parse and display AST.
pub fn parse_file(path: &Path) -> CliResult<ExitCode> {
    let source = disk::read_source(path)?;
    let mut sources = SourceSet::new();
    let id = sources.add(path.to_string_lossy(), source.as_str());
    let lexed = lexer::lex_all(&source, id);
    let (program, errors) = parser::parse_recovering(&lexed);

    println!("{:#?}", program);
    report_syntax_errors(lexed.errors.into_iter().chain(errors), &sources)
}

fn report_syntax_errors(errors: impl IntoIterator<Item = CompileError>, sources: &SourceSet) -> CliResult<ExitCode> {
    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(errors);
    if diagnostics.has_errors() {
        return Err(CliError::failure(diagnostics.render_log(sources).trim_end()));
    }
    Ok(ExitCode::SUCCESS)
}

/// Compile `files` as one unit and write or print the output.
///
/// The log goes to stderr; nothing is written when the compile fails.
#[tracing::instrument(skip_all, fields(files = files.len(), format = %args.format))]
pub fn compile_files(files: &[PathBuf], args: &CompileArgs, output: Option<&Path>) -> CliResult<ExitCode> {
    let inputs = disk::read_inputs(files)?;
    let result = crate::compile(inputs, args, &DiskFileAccess);

    if !result.log.is_empty() {
        eprint!("{}", result.log);
    }
    let Some(text) = result.output else {
        return Err(CliError::new("", ExitCode::FAILURE));
    };

    match output {
        Some(path) => {
            fs::write(path, &text)
                .map_err(|e| CliError::failure(format!("Error writing {}: {}", path.display(), e)))?;
            tracing::info!(path = %path.display(), bytes = text.len(), "wrote output");
        }
        None => print!("{}", text),
    }
    Ok(ExitCode::SUCCESS)
}

/// Report the diagnostics of `files` with source snippets.
pub fn check_files(files: &[PathBuf]) -> CliResult<ExitCode> {
    let inputs = disk::read_inputs(files)?;
    let unit = analyze(inputs, &DiskFileAccess);

    for report in DiagnosticReport::collect(&unit.diagnostics, &unit.sources) {
        eprintln!("{:?}", miette::Report::new(report));
    }

    if unit.has_errors() {
        return Err(CliError::failure(format!("{} error(s) found", unit.diagnostics.error_count())));
    }
    println!("✓ Check passed!");
    Ok(ExitCode::SUCCESS)
}

/// Answer one IDE query against `file` and print the JSON response.
pub fn query_file(
    kind: QueryKind,
    file: &Path,
    line: usize,
    column: usize,
    ignore_diagnostics: bool,
) -> CliResult<ExitCode> {
    let name = file.to_string_lossy().to_string();
    let contents = disk::read_source(file)?;
    let session = ide::compile_ide(Input::new(name.as_str(), contents), &DiskFileAccess);
    let position = PositionRequest::new(name.as_str(), line, column);

    let json = match kind {
        QueryKind::Tooltip => to_json(&session.tooltip_query(&TooltipRequest {
            source: name,
            line,
            column,
            ignore_diagnostics,
        })),
        QueryKind::Definition => to_json(&session.definition_query(&position)),
        QueryKind::Symbols => to_json(&session.symbols_query(&SymbolsRequest { source: name })),
        QueryKind::Rename => to_json(&session.rename_query(&position)),
        QueryKind::Completion => to_json(&session.completion_query(&position)),
        QueryKind::Signature => to_json(&session.signature_query(&position)),
    }?;

    println!("{}", json);
    Ok(ExitCode::SUCCESS)
}

fn to_json(value: &impl Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::failure(format!("Error serializing response: {}", e)))
}

/// Format glslx source files.
pub fn format_files(path: &Path, args: &FormatArgs, check_mode: bool, diff_mode: bool) -> CliResult<ExitCode> {
    let files = collect_source_files(path);

    if files.is_empty() {
        return Err(CliError::failure(format!("No .{} files found", SOURCE_EXTENSION)));
    }

    let mut needs_formatting = false;
    let mut formatted_count = 0;
    let mut error_count = 0;

    for file_path in &files {
        let source = match disk::read_source(file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}", e);
                error_count += 1;
                continue;
            }
        };

        let formatted = format(&source, args);
        let changed = source != formatted;

        if diff_mode && changed {
            println!("--- {}", file_path.display());
            if let Some(diff) = format_diff(&source, args) {
                print!("{}", diff);
            }
            println!();
        }

        if check_mode {
            if changed {
                println!("Would reformat: {}", file_path.display());
                needs_formatting = true;
            }
        } else if diff_mode {
            if changed {
                needs_formatting = true;
            }
        } else if changed {
            if let Err(e) = fs::write(file_path, &formatted) {
                eprintln!("Error writing {}: {}", file_path.display(), e);
                error_count += 1;
            } else {
                println!("Formatted: {}", file_path.display());
                formatted_count += 1;
            }
        }
    }

    if check_mode || diff_mode {
        if needs_formatting {
            let msg = if diff_mode { "need formatting" } else { "would be reformatted" };
            return Err(CliError::failure(format!("\n{} file(s) {}", files.len(), msg)));
        } else {
            println!("✓ {} file(s) already formatted", files.len());
        }
    } else {
        println!("\n✓ {} file(s) formatted, {} error(s)", formatted_count, error_count);
    }

    if error_count > 0 {
        return Err(CliError::new("", ExitCode::FAILURE));
    }

    Ok(ExitCode::SUCCESS)
}

/// A single file is taken whatever its extension; directories are searched for `.glslx` files.
fn collect_source_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            let mut entries: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
            entries.sort();
            for entry_path in entries {
                if entry_path.is_dir() {
                    let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    if !name.starts_with('.') && name != "target" && name != "node_modules" {
                        files.extend(collect_source_files(&entry_path));
                    }
                } else if entry_path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
                    files.push(entry_path);
                }
            }
        }
    }

    files
}
