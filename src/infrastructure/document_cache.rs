//! Per-document state shared by every request: open documents, their parsed
//! trees and the last color results.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use lru::LruCache;

use crate::domain::ast::Node;
use crate::domain::color::ColorInformation;
use crate::domain::document::Document;

/// Parsed trees kept at once.
pub const TREE_CAPACITY: usize = 20;

pub struct DocumentCache {
    documents: DashMap<String, Arc<Document>>,
    trees: Mutex<LruCache<String, Arc<Node>>>,
    colors: DashMap<String, Vec<ColorInformation>>,
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCache {
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(TREE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            documents: DashMap::new(),
            trees: Mutex::new(LruCache::new(capacity)),
            colors: DashMap::new(),
        }
    }

    /// Registers a document. Anything cached for the same uri is dropped.
    pub fn open(&self, document: Document) -> Arc<Document> {
        let uri = document.uri.clone();
        log::debug!("[Cache] Open {} (v{})", uri, document.version);
        self.invalidate(&uri);
        let document = Arc::new(document);
        self.documents.insert(uri, Arc::clone(&document));
        document
    }

    /// Replaces a document's text.
    pub fn change(&self, document: Document) -> Arc<Document> {
        log::debug!("[Cache] Change {} (v{})", document.uri, document.version);
        self.open(document)
    }

    /// Evicts everything held for `uri`.
    pub fn close(&self, uri: &str) {
        log::debug!("[Cache] Close {}", uri);
        self.documents.remove(uri);
        self.invalidate(uri);
    }

    pub fn document(&self, uri: &str) -> Option<Arc<Document>> {
        self.documents.get(uri).map(|entry| Arc::clone(entry.value()))
    }

    pub fn tree(&self, uri: &str) -> Option<Arc<Node>> {
        self.lock_trees().get(uri).cloned()
    }

    pub fn store_tree(&self, uri: &str, tree: Node) -> Arc<Node> {
        let tree = Arc::new(tree);
        self.lock_trees().put(uri.to_string(), Arc::clone(&tree));
        tree
    }

    pub fn colors(&self, uri: &str) -> Option<Vec<ColorInformation>> {
        self.colors.get(uri).map(|entry| entry.value().clone())
    }

    /// Stores a color result, sorted by range start.
    pub fn store_colors(&self, uri: &str, mut colors: Vec<ColorInformation>) {
        colors.sort_by(|a, b| a.range.start.cmp(&b.range.start));
        self.colors.insert(uri.to_string(), colors);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn invalidate(&self, uri: &str) {
        self.lock_trees().pop(uri);
        self.colors.remove(uri);
    }

    fn lock_trees(&self) -> MutexGuard<'_, LruCache<String, Arc<Node>>> {
        // A panic while holding the lock leaves a usable cache behind.
        self.trees.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
