//! Define error types for shader emission.
//!
//! These errors represent *emission* failures (as opposed to parsing or type checking). They end the compile with
//! no output and are reported in the log like any other diagnostic.

use thiserror::Error;

use crate::frontend::ast::Span;
use crate::frontend::diagnostics::CompileError;

/// Error during emission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// A reachable function has a prototype but no body and is not imported.
    #[error("Missing a definition for function \"{name}\"")]
    MissingDefinition { name: String, span: Span },
    /// Two names map to the same output constant.
    #[error("The names \"{first}\" and \"{second}\" both become the output constant \"{constant}\"")]
    ConstantCollision {
        first: String,
        second: String,
        constant: String,
    },
    /// The generated Rust module did not parse.
    #[error("Generated Rust output is invalid: {0}")]
    RustOutput(String),
}

impl EmitError {
    pub fn span(&self) -> Option<Span> {
        match self {
            EmitError::MissingDefinition { span, .. } => Some(*span),
            EmitError::ConstantCollision { .. } | EmitError::RustOutput(_) => None,
        }
    }
}

impl From<EmitError> for CompileError {
    fn from(error: EmitError) -> Self {
        let span = error.span();
        CompileError::emit(error.to_string(), span)
    }
}
