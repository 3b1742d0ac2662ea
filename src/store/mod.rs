//! Document storage contract and the stores that implement it.
//!
//! The rewrite engine only ever talks to a [`DocumentStore`]: it lists the
//! documents once, then reads and writes them one at a time.

pub mod memory;
pub mod vault;

pub use memory::MemoryStore;
pub use vault::VaultStore;

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque reference to a document owned by a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentHandle {
    path: PathBuf,
    name: String,
}

impl DocumentHandle {
    /// Creates a handle for a store-relative path.
    ///
    /// The display name is the file stem: `notes/Inbox.md` is `Inbox`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }

    /// Returns the store-relative path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Storage for the documents a rewrite runs over.
pub trait DocumentStore: Send + Sync {
    /// Lists every document, in enumeration order.
    fn list_all_documents(&self) -> Result<Vec<DocumentHandle>>;

    /// Reads the current text of a document.
    fn read_text(&self, doc: &DocumentHandle) -> Result<String>;

    /// Replaces the text of a document.
    ///
    /// Readers must never observe a partially written document.
    fn write_text(&self, doc: &DocumentHandle, text: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_name_is_file_stem() {
        let doc = DocumentHandle::new("daily/2024-01-01.md");
        assert_eq!(doc.name(), "2024-01-01");
        assert_eq!(doc.path(), Path::new("daily/2024-01-01.md"));
    }

    #[test]
    fn test_handle_without_extension() {
        assert_eq!(DocumentHandle::new("README").name(), "README");
    }

    #[test]
    fn test_handles_order_by_path() {
        let mut docs = vec![DocumentHandle::new("b.md"), DocumentHandle::new("a/z.md")];
        docs.sort();
        assert_eq!(docs[0].name(), "z");
    }
}
