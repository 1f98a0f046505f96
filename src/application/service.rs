//! Language service: settings, collaborators and the document cache behind
//! one entry point shared by the CLI and the API server.

use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{bail, Context, Result};

use crate::application::colors::document_colors;
use crate::application::completion::{completions, CompletionList};
use crate::application::hover::{hover, Hover};
use crate::domain::ast::Node;
use crate::domain::color::{color_presentations, ColorInformation, ColorPresentation, Rgba};
use crate::domain::document::{Document, Position, Range};
use crate::domain::scope::ScopeTracker;
use crate::domain::walk::CancellationToken;
use crate::infrastructure::{parse_ast_value, DocumentCache, ExternalParser, KeywordCompletionService, Settings, StylexValueNormalizer};
use crate::ports::{AstParser, CssCompletionService};

pub struct LanguageService {
    settings: RwLock<Settings>,
    cache: DocumentCache,
    parser: RwLock<Option<Arc<dyn AstParser>>>,
    completion_service: Arc<dyn CssCompletionService>,
}

impl LanguageService {
    /// Builds a service with the built-in completion service and, when
    /// configured, the external parser command.
    pub fn new(settings: Settings) -> Result<Self> {
        let parser = build_parser(&settings)?;
        Ok(Self::with_parts(settings, parser, Arc::new(KeywordCompletionService::new())))
    }

    pub fn with_parts(
        settings: Settings,
        parser: Option<Arc<dyn AstParser>>,
        completion_service: Arc<dyn CssCompletionService>,
    ) -> Self {
        Self {
            settings: RwLock::new(settings),
            cache: DocumentCache::new(),
            parser: RwLock::new(parser),
            completion_service,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replaces the settings. A new parser command takes effect immediately;
    /// settings that change analysis apply from the next request.
    pub fn configure(&self, settings: Settings) -> Result<()> {
        let parser = build_parser(&settings)?;
        if parser.is_some() {
            *self.parser.write().unwrap_or_else(PoisonError::into_inner) = parser;
        }
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
        log::info!("[Service] Settings updated");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Document lifecycle
    // ═══════════════════════════════════════════════════════════════════════

    /// Opens (or reopens) a document. A syntax tree sent along is stored as
    /// is; without one the configured parser runs on first use.
    pub fn open_document(
        &self,
        uri: &str,
        language_id: &str,
        version: i32,
        text: &str,
        ast: Option<serde_json::Value>,
    ) -> Result<()> {
        self.cache.open(Document::new(uri, language_id, version, text));
        self.store_ast(uri, ast);
        Ok(())
    }

    pub fn change_document(&self, uri: &str, version: i32, text: &str, ast: Option<serde_json::Value>) -> Result<()> {
        let Some(previous) = self.cache.document(uri) else {
            bail!("Document not open: {}", uri);
        };
        self.cache.change(Document::new(uri, previous.language_id.clone(), version, text));
        self.store_ast(uri, ast);
        Ok(())
    }

    pub fn close_document(&self, uri: &str) {
        self.cache.close(uri);
    }

    pub fn open_documents(&self) -> usize {
        self.cache.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Capabilities
    // ═══════════════════════════════════════════════════════════════════════

    pub fn hover(&self, uri: &str, position: Position, token: &CancellationToken) -> Result<Option<Hover>> {
        let settings = self.settings();
        let document = self.open(uri)?;
        if !settings.hover || !settings.supports_language(&document.language_id) {
            return Ok(None);
        }
        let Some(tree) = self.tree_for(&document, &settings) else {
            return Ok(None);
        };
        let normalizer = StylexValueNormalizer::new(settings.use_rem_for_font_size);
        hover(&document, &tree, tracker(&settings), position, &normalizer, token)
    }

    pub fn completions(&self, uri: &str, position: Position, token: &CancellationToken) -> Result<Option<CompletionList>> {
        let settings = self.settings();
        let document = self.open(uri)?;
        if !settings.suggestions || !settings.supports_language(&document.language_id) {
            return Ok(None);
        }
        let Some(tree) = self.tree_for(&document, &settings) else {
            return Ok(None);
        };
        completions(&document, &tree, tracker(&settings), position, self.completion_service.as_ref(), token)
    }

    /// Colors of a document. Completed answers are cached for later
    /// presentation requests.
    pub fn document_colors(&self, uri: &str, token: &CancellationToken) -> Result<Option<Vec<ColorInformation>>> {
        let settings = self.settings();
        let document = self.open(uri)?;
        if !settings.color_decorators || !settings.supports_language(&document.language_id) {
            return Ok(None);
        }
        let Some(tree) = self.tree_for(&document, &settings) else {
            return Ok(None);
        };
        let colors = document_colors(&document, &tree, tracker(&settings), token)?;
        if let Some(found) = &colors {
            self.cache.store_colors(uri, found.clone());
        }
        Ok(colors)
    }

    /// Edit choices for replacing the swatch at `range` with `color`.
    pub fn color_presentation(&self, uri: &str, range: Range, color: Rgba) -> Vec<ColorPresentation> {
        let previous = self.cache.colors(uri).unwrap_or_default();
        color_presentations(&previous, range, color)
    }

    // ─── Private helpers ───

    fn open(&self, uri: &str) -> Result<Arc<Document>> {
        self.cache.document(uri).with_context(|| format!("Document not open: {}", uri))
    }

    fn store_ast(&self, uri: &str, ast: Option<serde_json::Value>) {
        let Some(ast) = ast else {
            return;
        };
        match parse_ast_value(ast) {
            Ok(tree) => {
                self.cache.store_tree(uri, tree);
            }
            Err(e) => log::warn!("[Service] Ignoring syntax tree for {}: {:#}", uri, e),
        }
    }

    /// The cached tree, or one from the parser. Parse failures are logged and
    /// mean no answer.
    fn tree_for(&self, document: &Document, settings: &Settings) -> Option<Arc<Node>> {
        if let Some(tree) = self.cache.tree(&document.uri) {
            return Some(tree);
        }
        let parser = self.parser.read().unwrap_or_else(PoisonError::into_inner).clone();
        let Some(parser) = parser else {
            log::warn!("[Service] No syntax tree for {} and no parser configured", document.uri);
            return None;
        };

        let language_id = settings
            .included_languages
            .get(&document.language_id)
            .map_or(document.language_id.as_str(), String::as_str);
        match parser.parse(document.text(), language_id) {
            Ok(tree) => Some(self.cache.store_tree(&document.uri, tree)),
            Err(e) => {
                log::warn!("[Service] Failed to parse {}: {:#}", document.uri, e);
                None
            }
        }
    }
}

fn tracker(settings: &Settings) -> ScopeTracker {
    ScopeTracker::with_modules(settings.alias_module_names.iter().cloned())
}

fn build_parser(settings: &Settings) -> Result<Option<Arc<dyn AstParser>>> {
    match &settings.parser_command {
        Some(command) => {
            let parser = ExternalParser::new(command.clone()).context("Invalid parserCommand")?;
            Ok(Some(Arc::new(parser)))
        }
        None => Ok(None),
    }
}
