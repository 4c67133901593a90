//! glslx Language Server Protocol (LSP) implementation
//!
//! A thin layer over [`crate::ide::IdeSession`]: every open document is analyzed on change and the session is kept
//! for queries. Provides:
//! - Real-time diagnostics, with unused symbols as faded hints
//! - Hover, go-to-definition and document symbols
//! - Rename, completion and signature help
//! - Whole-document formatting

pub mod backend;
pub mod convert;
pub mod diagnostics;

pub use backend::GlslxLanguageServer;
