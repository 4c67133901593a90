//! Source loading and `#include` splicing.
//!
//! The loader turns the compile inputs into one [`SourceSet`] and one merged [`Program`]. Every `#include` is
//! resolved through a caller-supplied [`FileAccess`] capability; the loader itself never touches the file system.
//!
//! ## Notes
//!
//! - **Splicing**: the declarations of an included file replace the `#include` line, so the merged program keeps
//!   source order across files.
//! - **Include once**: a file (identified by the name `FileAccess` reports) is spliced at most once per compile.
//!   The callback runs at most once per distinct `(path, relative_to)` pair.
//! - **Cycles**: including a file that is still being loaded reports the whole chain and skips the include.
//! - **Missing files**: a `None` from the callback reports an error at the quoted path and adds no file.
//!
//! ## Examples
//!
//! ```rust
//! use glslx::frontend::loader::{IncludedFile, Input, Loader};
//!
//! let access = |path: &str, _relative_to: &str| {
//!     (path == "common.glslx").then(|| IncludedFile::new(path, "float halve(float x) { return x * 0.5; }"))
//! };
//! let loaded = Loader::new(&access).load(vec![Input::new("main.glslx", "#include \"common.glslx\"\n")]);
//! assert!(loaded.errors.is_empty());
//! assert_eq!(loaded.program.declarations.len(), 1);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::frontend::ast::{Declaration, Program, Span, Spanned};
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::lexer::{self, LexOutput};
use crate::frontend::parser;
use crate::frontend::prelude;
use crate::frontend::source::{SourceId, SourceSet};

/// One named input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub name: String,
    pub contents: String,
}

impl Input {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Name used for an input given as bare text.
pub const DEFAULT_INPUT_NAME: &str = "<stdin>";

/// What to compile: bare text, one named file, or several named files (compiled as one unit, in order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileInput {
    Text(String),
    Named(Input),
    Many(Vec<Input>),
}

impl CompileInput {
    pub fn into_inputs(self) -> Vec<Input> {
        match self {
            CompileInput::Text(contents) => vec![Input::new(DEFAULT_INPUT_NAME, contents)],
            CompileInput::Named(input) => vec![input],
            CompileInput::Many(inputs) => inputs,
        }
    }
}

impl From<&str> for CompileInput {
    fn from(text: &str) -> Self {
        CompileInput::Text(text.to_string())
    }
}

impl From<String> for CompileInput {
    fn from(text: String) -> Self {
        CompileInput::Text(text)
    }
}

impl From<Input> for CompileInput {
    fn from(input: Input) -> Self {
        CompileInput::Named(input)
    }
}

impl From<Vec<Input>> for CompileInput {
    fn from(inputs: Vec<Input>) -> Self {
        CompileInput::Many(inputs)
    }
}

/// A file returned by [`FileAccess`]: the name it should be known by and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludedFile {
    pub name: String,
    pub contents: String,
}

impl IncludedFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Capability used to resolve `#include "path"` relative to the including file's name.
///
/// Any `Fn(&str, &str) -> Option<IncludedFile>` closure implements this trait.
pub trait FileAccess {
    fn read(&self, path: &str, relative_to: &str) -> Option<IncludedFile>;
}

impl<F> FileAccess for F
where
    F: Fn(&str, &str) -> Option<IncludedFile>,
{
    fn read(&self, path: &str, relative_to: &str) -> Option<IncludedFile> {
        self(path, relative_to)
    }
}

/// File access that resolves nothing; every `#include` reports a missing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFileAccess;

impl FileAccess for NoFileAccess {
    fn read(&self, _path: &str, _relative_to: &str) -> Option<IncludedFile> {
        None
    }
}

/// Everything the loader produced.
#[derive(Debug, Clone)]
pub struct LoadedSources {
    /// The prelude (always [`prelude::PRELUDE_ID`]) followed by inputs and included files in load order.
    pub sources: SourceSet,
    /// User declarations with includes spliced in place; `#include` lines themselves are dropped.
    pub program: Program,
    /// Tokens and comments of every user file, for the IDE layer.
    pub lexed: BTreeMap<SourceId, LexOutput>,
    /// Syntax and include errors in the order they were found.
    pub errors: Vec<CompileError>,
}

/// Loads inputs and their includes.
pub struct Loader<'a> {
    access: &'a dyn FileAccess,
    sources: SourceSet,
    lexed: BTreeMap<SourceId, LexOutput>,
    errors: Vec<CompileError>,
    /// `(path, relative_to)` -> resolved file name, or `None` when the callback found nothing.
    resolved: HashMap<(String, String), Option<String>>,
    /// Contents of resolved files by name, kept until they are spliced.
    pending: HashMap<String, String>,
    /// Names of files already spliced (or being spliced).
    loaded: HashSet<String>,
    /// Files currently being loaded, outermost first.
    chain: Vec<String>,
}

impl<'a> Loader<'a> {
    pub fn new(access: &'a dyn FileAccess) -> Self {
        let mut sources = SourceSet::new();
        sources.add_builtin(prelude::PRELUDE_NAME, prelude::source());
        Self {
            access,
            sources,
            lexed: BTreeMap::new(),
            errors: Vec::new(),
            resolved: HashMap::new(),
            pending: HashMap::new(),
            loaded: HashSet::new(),
            chain: Vec::new(),
        }
    }

    /// Load all inputs (in order) and everything they include.
    #[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
    pub fn load(mut self, inputs: Vec<Input>) -> LoadedSources {
        let mut declarations = Vec::new();
        for input in inputs {
            self.loaded.insert(input.name.clone());
            declarations.extend(self.load_file(input.name, input.contents));
        }
        LoadedSources {
            sources: self.sources,
            program: Program { declarations },
            lexed: self.lexed,
            errors: self.errors,
        }
    }

    fn load_file(&mut self, name: String, contents: String) -> Vec<Spanned<Declaration>> {
        let id = self.sources.add(name.clone(), contents);
        let lexed = match self.sources.get(id) {
            Some(file) => lexer::lex_all(&file.contents, id),
            None => return Vec::new(),
        };
        let (program, parse_errors) = parser::parse_recovering(&lexed);
        self.errors.extend(lexed.errors.iter().cloned());
        self.errors.extend(parse_errors);
        self.lexed.insert(id, lexed);

        self.chain.push(name.clone());
        let mut out = Vec::with_capacity(program.declarations.len());
        for decl in program.declarations {
            match &decl.node {
                Declaration::Include(include) => {
                    let spliced = self.include(&include.path, &name, decl.span, include.path_span);
                    out.extend(spliced);
                }
                _ => out.push(decl),
            }
        }
        self.chain.pop();
        out
    }

    fn include(
        &mut self,
        path: &str,
        relative_to: &str,
        span: Span,
        path_span: Span,
    ) -> Vec<Spanned<Declaration>> {
        let key = (path.to_string(), relative_to.to_string());
        let resolved = match self.resolved.get(&key) {
            Some(resolved) => resolved.clone(),
            None => {
                let file = self.access.read(path, relative_to);
                debug!(path, relative_to, found = file.is_some(), "resolved include");
                let resolved = file.map(|file| {
                    self.pending.entry(file.name.clone()).or_insert(file.contents);
                    file.name
                });
                self.resolved.insert(key, resolved.clone());
                resolved
            }
        };

        let Some(name) = resolved else {
            self.errors.push(errors::missing_include(path, Some(path_span)));
            return Vec::new();
        };

        if let Some(position) = self.chain.iter().position(|n| *n == name) {
            let mut cycle: Vec<String> = self.chain[position..].to_vec();
            cycle.push(name);
            self.errors.push(errors::include_cycle(&cycle, Some(span)));
            return Vec::new();
        }
        if !self.loaded.insert(name.clone()) {
            debug!(file = name.as_str(), "already included");
            return Vec::new();
        }
        let contents = self.pending.remove(&name).unwrap_or_default();
        self.load_file(name, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::diagnostics::ErrorKind;
    use std::cell::RefCell;

    fn files(entries: &'static [(&'static str, &'static str)]) -> impl Fn(&str, &str) -> Option<IncludedFile> {
        move |path, _| {
            entries
                .iter()
                .find(|(name, _)| *name == path)
                .map(|(name, contents)| IncludedFile::new(*name, *contents))
        }
    }

    #[test]
    fn includes_are_spliced_in_place() {
        let access = files(&[("b.glslx", "float b;")]);
        let loaded = Loader::new(&access).load(vec![Input::new("a.glslx", "float a;\n#include \"b.glslx\"\nfloat c;")]);
        assert!(loaded.errors.is_empty(), "{:?}", loaded.errors);
        let names: Vec<&str> = loaded
            .program
            .declarations
            .iter()
            .filter_map(|d| match &d.node {
                Declaration::Variables(group) => Some(group.declarators[0].node.name.node.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(loaded.sources.len(), 3);
        assert!(loaded.sources.get(prelude::PRELUDE_ID).is_some_and(|f| f.is_builtin));
    }

    #[test]
    fn each_file_is_included_once() {
        let access = files(&[("common.glslx", "float shared;")]);
        let loaded = Loader::new(&access).load(vec![Input::new(
            "main.glslx",
            "#include \"common.glslx\"\n#include \"common.glslx\"\n",
        )]);
        assert!(loaded.errors.is_empty());
        assert_eq!(loaded.program.declarations.len(), 1);
    }

    #[test]
    fn callback_runs_once_per_path_and_origin() {
        let calls = RefCell::new(0);
        let access = |path: &str, _: &str| {
            *calls.borrow_mut() += 1;
            (path == "x.glslx").then(|| IncludedFile::new("x.glslx", ""))
        };
        Loader::new(&access).load(vec![Input::new(
            "main.glslx",
            "#include \"x.glslx\"\n#include \"x.glslx\"\n#include \"y.glslx\"\n#include \"y.glslx\"\n",
        )]);
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn missing_include_reports_the_path() {
        let loaded = Loader::new(&NoFileAccess).load(vec![Input::new("main.glslx", "#include \"gone.glslx\"\n")]);
        assert_eq!(loaded.errors.len(), 1);
        assert_eq!(loaded.errors[0].kind, ErrorKind::Include);
        assert_eq!(loaded.errors[0].message, "Could not read file \"gone.glslx\"");
        assert_eq!(loaded.sources.len(), 2);
    }

    #[test]
    fn cycles_name_the_chain() {
        let access = files(&[("a.glslx", "#include \"b.glslx\"\n"), ("b.glslx", "#include \"a.glslx\"\n")]);
        let loaded = Loader::new(&access).load(vec![Input::new("main.glslx", "#include \"a.glslx\"\n")]);
        assert_eq!(loaded.errors.len(), 1);
        assert_eq!(loaded.errors[0].message, "Include cycle: a.glslx -> b.glslx -> a.glslx");
    }

    #[test]
    fn syntax_errors_from_included_files_are_collected() {
        let access = files(&[("bad.glslx", "float = ;")]);
        let loaded = Loader::new(&access).load(vec![Input::new("main.glslx", "#include \"bad.glslx\"\nfloat ok;")]);
        assert_eq!(loaded.errors.len(), 1);
        let span = loaded.errors[0].span.expect("located");
        assert_eq!(loaded.sources.get(span.source).map(|f| f.name.as_str()), Some("bad.glslx"));
        assert_eq!(loaded.program.declarations.len(), 1);
    }
}
