//! LSP (Language Server Protocol) backend implementation for glslx

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::cli::disk::DiskFileAccess;
use crate::format::{self, FormatArgs};
use crate::frontend::loader::{FileAccess, IncludedFile, Input};
use crate::ide::{self, IdeSession, PositionRequest, SymbolsRequest, TooltipRequest};
use crate::lsp::convert::{completion_kind, document_end, source_name, source_uri, symbol_kind, to_range};
use crate::lsp::diagnostics;

/// Document state stored by the LSP
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub source: String,
    pub version: i32,
    /// Analysis of the latest text; queries read from it without locking.
    pub session: IdeSession,
}

/// Resolves includes from open editor buffers first, then from disk.
struct EditorFileAccess {
    open: HashMap<PathBuf, String>,
}

impl FileAccess for EditorFileAccess {
    fn read(&self, path: &str, relative_to: &str) -> Option<IncludedFile> {
        let resolved = DiskFileAccess::resolve(path, relative_to);
        match self.open.get(&resolved) {
            Some(text) => Some(IncludedFile::new(resolved.to_string_lossy(), text.clone())),
            None => DiskFileAccess.read(path, relative_to),
        }
    }
}

/// glslx Language Server
pub struct GlslxLanguageServer {
    client: Client,
    documents: Arc<RwLock<HashMap<Url, DocumentState>>>,
}

impl GlslxLanguageServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Analyze a document and publish diagnostics
    async fn analyze_document(&self, uri: &Url, source: &str, version: i32) {
        let access = {
            let docs = self.documents.read().await;
            EditorFileAccess {
                open: docs
                    .iter()
                    .filter_map(|(uri, doc)| Some((uri.to_file_path().ok()?, doc.source.clone())))
                    .collect(),
            }
        };
        let session = ide::compile_ide(Input::new(source_name(uri), source), &access);
        let published = diagnostics::collect(&session, uri);
        tracing::debug!(uri = %uri, diagnostics = published.len(), "analyzed document");

        // Store the session for queries, unless a newer version landed while analyzing
        let state = DocumentState {
            source: source.to_string(),
            version,
            session,
        };
        if !store_if_current(&mut *self.documents.write().await, uri, state) {
            tracing::debug!(uri = %uri, version, "dropped stale analysis");
            return;
        }

        // Publish diagnostics (even if empty, to clear old ones)
        self.client.publish_diagnostics(uri.clone(), published, Some(version)).await;
    }

    /// The session for `uri`; cloning it releases the lock before the query runs.
    async fn session(&self, uri: &Url) -> Option<IdeSession> {
        let docs = self.documents.read().await;
        docs.get(uri).map(|doc| doc.session.clone())
    }

    fn position_request(uri: &Url, position: Position) -> PositionRequest {
        PositionRequest::new(source_name(uri), position.line as usize, position.character as usize)
    }
}

/// Insert `state` unless the stored document is already at a later version.
fn store_if_current(docs: &mut HashMap<Url, DocumentState>, uri: &Url, state: DocumentState) -> bool {
    if docs.get(uri).is_some_and(|doc| doc.version > state.version) {
        return false;
    }
    docs.insert(uri.clone(), state);
    true
}

fn location(range: &ide::Range, document: &Url) -> Option<Location> {
    Some(Location {
        uri: source_uri(&range.source, document)?,
        range: to_range(range),
    })
}

#[tower_lsp::async_trait]
impl LanguageServer for GlslxLanguageServer {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Real-time diagnostics via text sync
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                rename_provider: Some(OneOf::Left(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_string()]),
                    ..Default::default()
                }),
                signature_help_provider: Some(SignatureHelpOptions {
                    trigger_characters: Some(vec!["(".to_string(), ",".to_string()]),
                    retrigger_characters: None,
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                document_formatting_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "glslx-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client.log_message(MessageType::INFO, "glslx LSP initialized").await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let source = params.text_document.text;
        let version = params.text_document.version;

        self.analyze_document(&uri, &source, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // We use FULL sync, so there's only one change with the full content
        if let Some(change) = params.content_changes.into_iter().next() {
            self.analyze_document(&uri, &change.text, version).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        // Remove document from cache
        let mut docs = self.documents.write().await;
        docs.remove(&uri);

        // Clear diagnostics
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(session) = self.session(uri).await else {
            return Ok(None);
        };

        let response = session.tooltip_query(&TooltipRequest {
            source: source_name(uri),
            line: position.line as usize,
            column: position.character as usize,
            ignore_diagnostics: false,
        });
        let Some(tooltip) = response.tooltip else {
            return Ok(None);
        };

        let mut markdown = format!("```glsl\n{}\n```", tooltip);
        if let Some(doc) = response.documentation.filter(|d| !d.is_empty()) {
            markdown.push_str("\n\n");
            markdown.push_str(&doc);
        }

        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: markdown,
            }),
            range: response.range.as_ref().map(to_range),
        }))
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(session) = self.session(uri).await else {
            return Ok(None);
        };

        let response = session.definition_query(&Self::position_request(uri, position));
        Ok(response
            .definition
            .as_ref()
            .and_then(|range| location(range, uri))
            .map(GotoDefinitionResponse::Scalar))
    }

    async fn document_symbol(&self, params: DocumentSymbolParams) -> Result<Option<DocumentSymbolResponse>> {
        let uri = &params.text_document.uri;
        let Some(session) = self.session(uri).await else {
            return Ok(None);
        };

        let response = session.symbols_query(&SymbolsRequest { source: source_name(uri) });
        let Some(symbols) = response.symbols else {
            return Ok(None);
        };

        #[allow(deprecated)]
        let symbols = symbols
            .into_iter()
            .map(|symbol| DocumentSymbol {
                name: symbol.name,
                detail: None,
                kind: symbol_kind(symbol.kind),
                tags: None,
                deprecated: None,
                range: to_range(&symbol.range),
                selection_range: to_range(&symbol.range),
                children: None,
            })
            .collect();
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn rename(&self, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(session) = self.session(uri).await else {
            return Ok(None);
        };

        let response = session.rename_query(&Self::position_request(uri, position));
        let Some(ranges) = response.ranges else {
            return Ok(None);
        };

        let mut changes: HashMap<Url, Vec<TextEdit>> = HashMap::new();
        for range in &ranges {
            if let Some(target) = source_uri(&range.source, uri) {
                changes
                    .entry(target)
                    .or_default()
                    .push(TextEdit::new(to_range(range), params.new_name.clone()));
            }
        }
        Ok(Some(WorkspaceEdit::new(changes)))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(session) = self.session(uri).await else {
            return Ok(None);
        };

        let response = session.completion_query(&Self::position_request(uri, position));
        let items = response
            .completions
            .into_iter()
            .map(|completion| CompletionItem {
                label: completion.name,
                kind: Some(completion_kind(completion.kind)),
                detail: Some(completion.detail),
                documentation: (!completion.documentation.is_empty())
                    .then_some(Documentation::String(completion.documentation)),
                ..Default::default()
            })
            .collect();

        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> Result<Option<SignatureHelp>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(session) = self.session(uri).await else {
            return Ok(None);
        };

        let response = session.signature_query(&Self::position_request(uri, position));
        if response.signatures.is_empty() {
            return Ok(None);
        }

        let signatures = response
            .signatures
            .into_iter()
            .map(|signature| SignatureInformation {
                label: signature.text,
                documentation: (!signature.documentation.is_empty())
                    .then_some(Documentation::String(signature.documentation)),
                parameters: Some(
                    signature
                        .arguments
                        .into_iter()
                        .map(|argument| ParameterInformation {
                            label: ParameterLabel::Simple(argument),
                            documentation: None,
                        })
                        .collect(),
                ),
                active_parameter: None,
            })
            .collect();

        Ok(Some(SignatureHelp {
            signatures,
            active_signature: Some(response.active_signature as u32),
            active_parameter: Some(response.active_argument as u32),
        }))
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let uri = &params.text_document.uri;
        let source = {
            let docs = self.documents.read().await;
            match docs.get(uri) {
                Some(doc) => doc.source.clone(),
                None => return Ok(None),
            }
        };

        let indent = if params.options.insert_spaces {
            " ".repeat(params.options.tab_size as usize)
        } else {
            "\t".to_string()
        };
        let formatted = format::format(&source, &FormatArgs::new().with_indent(indent));
        if formatted == source {
            return Ok(Some(vec![]));
        }

        let whole = Range::new(Position::new(0, 0), document_end(&source));
        Ok(Some(vec![TextEdit::new(whole, formatted)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::loader::NoFileAccess;

    fn state(source: &str, version: i32) -> DocumentState {
        DocumentState {
            source: source.to_string(),
            version,
            session: ide::compile_ide(source, &NoFileAccess),
        }
    }

    #[test]
    fn test_older_analysis_does_not_overwrite_newer() {
        let uri = Url::parse("file:///tmp/a.glslx").unwrap();
        let mut docs = HashMap::new();
        assert!(store_if_current(&mut docs, &uri, state("float a;", 1)));
        assert!(store_if_current(&mut docs, &uri, state("float b;", 3)));
        assert!(!store_if_current(&mut docs, &uri, state("float c;", 2)));
        assert_eq!(docs[&uri].version, 3);
        assert_eq!(docs[&uri].source, "float b;");
        assert!(store_if_current(&mut docs, &uri, state("float d;", 3)));
        assert_eq!(docs[&uri].source, "float d;");
    }
}
