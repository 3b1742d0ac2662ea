//! In-memory document store.

use super::{DocumentHandle, DocumentStore};
use crate::error::{Result, RewriteError};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A document store held entirely in memory.
///
/// Documents are listed in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<Vec<(DocumentHandle, String)>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document, replacing any existing one at the same path.
    pub fn with_document(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Adds or replaces a document.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let doc = DocumentHandle::new(path);
        let text = text.into();
        let mut docs = self.lock();
        match docs.iter_mut().find(|(d, _)| *d == doc) {
            Some(entry) => entry.1 = text,
            None => docs.push((doc, text)),
        }
    }

    /// Returns the text stored at a path.
    pub fn get(&self, path: impl Into<PathBuf>) -> Option<String> {
        let doc = DocumentHandle::new(path);
        self.lock()
            .iter()
            .find(|(d, _)| *d == doc)
            .map(|(_, text)| text.clone())
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns how many reads have been served.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Returns how many writes have been applied.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(DocumentHandle, String)>> {
        // A poisoned lock only means a panic elsewhere; the data is still usable.
        self.docs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn list_all_documents(&self) -> Result<Vec<DocumentHandle>> {
        Ok(self.lock().iter().map(|(d, _)| d.clone()).collect())
    }

    fn read_text(&self, doc: &DocumentHandle) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.lock()
            .iter()
            .find(|(d, _)| d == doc)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| RewriteError::DocumentNotFound(doc.path().to_path_buf()))
    }

    fn write_text(&self, doc: &DocumentHandle, text: &str) -> Result<()> {
        let mut docs = self.lock();
        let entry = docs
            .iter_mut()
            .find(|(d, _)| d == doc)
            .ok_or_else(|| RewriteError::DocumentNotFound(doc.path().to_path_buf()))?;
        entry.1 = text.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
