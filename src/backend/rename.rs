//! Short names for emitted symbols.
//!
//! One table covers the whole compile so every shader sees the same name for the same symbol (a varying written by
//! the vertex shader must keep matching the fragment shader's). Frequently used symbols get the shortest names.
//!
//! ## Notes
//!
//! - Builtins, imports and exports are never renamed. Entry points print as `main` in their own shader regardless.
//! - [`RenamingMode::InternalOnly`] also leaves uniforms, attributes and varyings alone so the host can bind them by
//!   their declared names.
//! - Generated names skip keywords, reserved words, builtin type names and every name that stays unchanged.

use std::collections::{HashMap, HashSet};

use crate::backend::options::RenamingMode;
use crate::frontend::ast::{Span, StorageQualifier};
use crate::frontend::symbols::{Symbol, SymbolId, VariableRole};
use crate::frontend::unit::CompiledUnit;
use glslx_core::lang::{keywords, reserved, types};

const FIRST_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LATER_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Symbol -> emitted name for every renamed symbol.
#[derive(Debug, Clone, Default)]
pub struct Renaming {
    names: HashMap<SymbolId, String>,
}

impl Renaming {
    /// Assign names for every renamable user symbol of `unit`.
    #[tracing::instrument(skip_all, fields(mode = %mode))]
    pub fn compute(unit: &CompiledUnit, mode: RenamingMode) -> Self {
        if mode == RenamingMode::None {
            return Self::default();
        }

        let mut candidates: Vec<(usize, Span, SymbolId)> = Vec::new();
        let mut taken: HashSet<&str> = HashSet::new();
        for (id, symbol) in unit.symbols.iter() {
            if is_renamable(symbol, mode) {
                let uses = symbol.declarations.len() + symbol.references.len();
                candidates.push((uses, symbol.span, id));
            } else {
                taken.insert(symbol.name.as_str());
            }
        }
        // Most used first; ties keep declaration order.
        candidates.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut names = HashMap::with_capacity(candidates.len());
        let mut next = 0;
        for (_, _, id) in candidates {
            let name = loop {
                let name = short_name(next);
                next += 1;
                if is_available(&name, &taken) {
                    break name;
                }
            };
            names.insert(id, name);
        }
        tracing::debug!(renamed = names.len(), "assigned short names");
        Self { names }
    }

    /// The new name of `id`, or `None` when it keeps its declared name.
    pub fn name(&self, id: SymbolId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn is_renamable(symbol: &Symbol, mode: RenamingMode) -> bool {
    if symbol.is_builtin || symbol.is_exported() || symbol.is_imported() {
        return false;
    }
    match mode {
        RenamingMode::None => false,
        RenamingMode::All => true,
        RenamingMode::InternalOnly => !symbol.as_variable().is_some_and(|v| {
            v.role == VariableRole::Global
                && matches!(
                    v.storage,
                    StorageQualifier::Uniform | StorageQualifier::Attribute | StorageQualifier::Varying
                )
        }),
    }
}

fn is_available(name: &str, taken: &HashSet<&str>) -> bool {
    !taken.contains(name)
        && name != "main"
        && keywords::from_str(name).is_none()
        && types::from_str(name).is_none()
        && !reserved::is_reserved(name)
}

/// The `index`-th name of the sequence `a..z, A..Z, aa, ba, ...`.
fn short_name(mut index: usize) -> String {
    let mut name = String::new();
    name.push(char::from(FIRST_CHARS[index % FIRST_CHARS.len()]));
    index /= FIRST_CHARS.len();
    while index > 0 {
        index -= 1;
        name.push(char::from(LATER_CHARS[index % LATER_CHARS.len()]));
        index /= LATER_CHARS.len();
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::loader::NoFileAccess;
    use crate::frontend::unit::analyze;

    fn renamed(source: &str, mode: RenamingMode) -> Vec<(String, Option<String>)> {
        let unit = analyze(source, &NoFileAccess);
        assert!(!unit.has_errors(), "{}", unit.log());
        let renaming = Renaming::compute(&unit, mode);
        let mut out: Vec<(String, Option<String>)> = unit
            .symbols
            .iter()
            .filter(|(_, s)| !s.is_builtin)
            .map(|(id, s)| (s.name.clone(), renaming.name(id).map(str::to_string)))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_short_name_sequence() {
        assert_eq!(short_name(0), "a");
        assert_eq!(short_name(25), "z");
        assert_eq!(short_name(26), "A");
        assert_eq!(short_name(51), "Z");
        assert_eq!(short_name(52), "aa");
        assert_eq!(short_name(53), "ba");
        assert_eq!(short_name(104), "ab");
    }

    #[test]
    fn test_most_used_symbol_gets_first_name() {
        let names = renamed(
            "uniform float rare; uniform float often; export void main() { gl_FragColor = vec4(often + often + rare); }",
            RenamingMode::All,
        );
        assert_eq!(
            names,
            vec![
                ("main".to_string(), None),
                ("often".to_string(), Some("a".to_string())),
                ("rare".to_string(), Some("b".to_string())),
            ]
        );
    }

    #[test]
    fn test_internal_only_keeps_interface_names() {
        let names = renamed(
            "uniform float size; float twice(float x) { return x * 2.0; } export void main() { gl_FragColor = vec4(twice(size)); }",
            RenamingMode::InternalOnly,
        );
        assert!(names.contains(&("size".to_string(), None)));
        assert!(names.iter().any(|(n, r)| n == "twice" && r.is_some()));
        assert!(names.iter().any(|(n, r)| n == "x" && r.is_some()));
    }

    #[test]
    fn test_none_renames_nothing() {
        let names = renamed("uniform float size; export void main() { gl_FragColor = vec4(size); }", RenamingMode::None);
        assert!(names.iter().all(|(_, r)| r.is_none()));
    }

    #[test]
    fn test_pinned_names_are_not_reused() {
        let names = renamed(
            "export uniform float a; uniform float other; export void main() { gl_FragColor = vec4(a + other); }",
            RenamingMode::All,
        );
        assert!(names.contains(&("a".to_string(), None)));
        assert!(names.contains(&("other".to_string(), Some("b".to_string()))));
    }
}
