//! glslx emitter
//!
//! This module turns a checked [`CompiledUnit`] into shader text, one shader per exported entry point.
//!
//! The pipeline is:
//! 1. Clone the user program and rewrite it (constant folding, inlining, dead code)
//! 2. Compute the symbols each entry point reaches
//! 3. Assign short names once for the whole compile
//! 4. Print each shader as minified or pretty GLSL
//! 5. Serialize all shaders in the requested output format
//!
//! ## Module Organization
//!
//! - `options.rs` - [`CompileArgs`] and the option enums
//! - `rewrite.rs` - semantics-preserving rewrites
//! - `reachability.rs` - per-entry-point symbol sets
//! - `rename.rs` - the renaming table
//! - `glsl_emitter.rs` - token buffer with minified/pretty spacing
//! - `printer.rs` - AST to GLSL text
//! - `formats.rs` - json/js/c++/skew/rust containers
//! - `errors.rs` - [`EmitError`]

#![deny(clippy::unwrap_used)]

mod errors;
pub mod formats;
pub mod glsl_emitter;
pub mod options;
pub mod printer;
pub mod reachability;
pub mod rename;
pub mod rewrite;

use std::collections::{BTreeMap, BTreeSet};

pub use errors::EmitError;
pub use formats::{EmitOutput, Shader};
pub use options::{CompileArgs, OptionParseError, OutputFormat, RenamingMode};

use crate::frontend::ast::{Declaration, Program, StorageQualifier};
use crate::frontend::symbols::{SymbolId, VariableRole};
use crate::frontend::unit::CompiledUnit;
use glslx_core::lang::extensions;
use printer::ShaderPrinter;
use rename::Renaming;

/// Emit every entry point of `unit` and serialize the result.
///
/// ## Notes
/// - The unit must be free of errors; callers check [`CompiledUnit::has_errors`] first.
#[tracing::instrument(skip_all, fields(format = %args.format, entries = unit.info.entry_points.len()))]
pub fn emit(unit: &CompiledUnit, args: &CompileArgs) -> Result<String, EmitError> {
    let output = emit_shaders(unit, args)?;
    formats::serialize(&output, args.format)
}

/// Emit every entry point of `unit` without serializing.
pub fn emit_shaders(unit: &CompiledUnit, args: &CompileArgs) -> Result<EmitOutput, EmitError> {
    let mut program = unit.program.clone();
    if !args.disable_rewriting {
        rewrite::rewrite(&mut program, unit);
    }
    let renaming = Renaming::compute(unit, args.renaming);
    let everything: BTreeSet<SymbolId> = unit.symbols.iter().map(|(id, _)| id).collect();

    let mut output = EmitOutput::default();
    for &entry in &unit.info.entry_points {
        let reachable = reachability::reachable_from(entry, &program, unit);
        check_definitions(unit, &reachable)?;
        record_renaming(unit, &renaming, &reachable, &mut output.renaming);

        let extensions = shader_extensions(unit, &program, &reachable, args.keep_symbols);
        let kept = if args.keep_symbols { &everything } else { &reachable };
        let contents = ShaderPrinter::new(unit, &renaming, entry, kept, args.pretty_print).print(&program, &extensions);
        let name = unit.symbols.get(entry).map(|s| s.name.clone()).unwrap_or_default();
        tracing::debug!(shader = %name, bytes = contents.len(), "emitted shader");
        output.shaders.push(Shader { name, contents });
    }
    Ok(output)
}

/// Every reachable user function needs a body unless it is imported.
fn check_definitions(unit: &CompiledUnit, reachable: &BTreeSet<SymbolId>) -> Result<(), EmitError> {
    for &id in reachable {
        let Some(symbol) = unit.symbols.get(id) else {
            continue;
        };
        let missing = symbol
            .as_function()
            .is_some_and(|f| !f.has_body && !symbol.is_builtin && !symbol.is_imported());
        if missing {
            return Err(EmitError::MissingDefinition {
                name: symbol.name.clone(),
                span: symbol.span,
            });
        }
    }
    Ok(())
}

/// Add reachable uniforms and attributes to the renaming table.
fn record_renaming(
    unit: &CompiledUnit,
    renaming: &Renaming,
    reachable: &BTreeSet<SymbolId>,
    table: &mut BTreeMap<String, String>,
) {
    for &id in reachable {
        let Some(symbol) = unit.symbols.get(id) else {
            continue;
        };
        let is_interface = !symbol.is_builtin
            && symbol.as_variable().is_some_and(|v| {
                v.role == VariableRole::Global
                    && matches!(v.storage, StorageQualifier::Uniform | StorageQualifier::Attribute)
            });
        if is_interface {
            let emitted = renaming.name(id).unwrap_or(symbol.name.as_str());
            table.insert(symbol.name.clone(), emitted.to_string());
        }
    }
}

/// `#extension` lines for one shader: those its reachable builtins need, with the behavior the source asked for.
///
/// With `keep_symbols` every directive in the source is kept.
fn shader_extensions(
    unit: &CompiledUnit,
    program: &Program,
    reachable: &BTreeSet<SymbolId>,
    keep_symbols: bool,
) -> Vec<(String, String)> {
    let needed: BTreeSet<_> = reachable
        .iter()
        .filter_map(|&id| unit.symbols.get(id))
        .filter(|s| s.is_builtin)
        .filter_map(|s| extensions::gating(&s.name))
        .collect();
    let mut lines: Vec<(String, String)> = Vec::new();
    for decl in &program.declarations {
        let Declaration::Extension(ext) = &decl.node else {
            continue;
        };
        let used = extensions::from_str(&ext.name.node).is_some_and(|id| needed.contains(&id));
        if (keep_symbols || used) && !lines.iter().any(|(name, _)| *name == ext.name.node) {
            lines.push((ext.name.node.clone(), ext.behavior.clone()));
        }
    }
    lines
}
