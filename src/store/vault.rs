//! File-backed vault of markdown notes.

use super::{DocumentHandle, DocumentStore};
use crate::error::{Result, RewriteError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// A directory of markdown notes on disk.
///
/// Only `.md` files are listed. Hidden files and directories (such as
/// `.obsidian`) are skipped, as is anything matching an exclude glob.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
    extensions: Vec<String>,
    exclude_globs: Vec<String>,
}

impl VaultStore {
    /// Opens the vault rooted at the given directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RewriteError::InvalidConfig(format!(
                "vault root is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self {
            root,
            extensions: vec!["md".to_string()],
            exclude_globs: Vec::new(),
        })
    }

    /// Excludes documents whose vault-relative path matches the glob.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_globs.push(pattern.into());
        self
    }

    fn absolute(&self, doc: &DocumentHandle) -> PathBuf {
        self.root.join(doc.path())
    }

    fn build_glob_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_globs {
            builder.add(Glob::new(pattern)?);
        }
        Ok(builder.build()?)
    }

    fn has_document_extension(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

impl DocumentStore for VaultStore {
    fn list_all_documents(&self) -> Result<Vec<DocumentHandle>> {
        let exclude_set = self.build_glob_set()?;
        let mut docs = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || !self.has_document_extension(path) {
                continue;
            }

            let rel_path = path.strip_prefix(&self.root).unwrap_or(path);
            if exclude_set.is_match(rel_path) {
                continue;
            }

            docs.push(DocumentHandle::new(rel_path));
        }

        docs.sort();
        debug!(root = %self.root.display(), count = docs.len(), "listed vault documents");
        Ok(docs)
    }

    fn read_text(&self, doc: &DocumentHandle) -> Result<String> {
        let path = self.absolute(doc);
        fs::read_to_string(&path).map_err(|source| RewriteError::Read { path, source })
    }

    fn write_text(&self, doc: &DocumentHandle, text: &str) -> Result<()> {
        let path = self.absolute(doc);
        atomic_write(&path, text.as_bytes()).map_err(|source| RewriteError::Write { path, source })
    }
}

/// Writes to a uniquely named temp file in the same directory, then renames
/// it over the target.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Cannot determine parent directory",
        )
    })?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_vault(dir: &Path) {
        fs::create_dir_all(dir.join("daily")).unwrap();
        fs::create_dir_all(dir.join(".obsidian")).unwrap();
        fs::create_dir_all(dir.join("templates")).unwrap();

        fs::write(dir.join("Inbox.md"), "# Inbox\n").unwrap();
        fs::write(dir.join("daily/2024-01-02.md"), "tuesday").unwrap();
        fs::write(dir.join("daily/2024-01-01.md"), "monday").unwrap();
        fs::write(dir.join("templates/Daily.md"), "{{date}}").unwrap();
        fs::write(dir.join("image.png"), [0u8, 1, 2]).unwrap();
        fs::write(dir.join(".obsidian/workspace.md"), "hidden").unwrap();
    }

    fn paths(docs: &[DocumentHandle]) -> Vec<String> {
        docs.iter()
            .map(|d| d.path().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_lists_markdown_sorted_by_path() {
        let dir = TempDir::new().unwrap();
        create_vault(dir.path());

        let store = VaultStore::open(dir.path()).unwrap();
        let docs = store.list_all_documents().unwrap();

        assert_eq!(
            paths(&docs),
            [
                "Inbox.md",
                "daily/2024-01-01.md",
                "daily/2024-01-02.md",
                "templates/Daily.md"
            ]
        );
    }

    #[test]
    fn test_exclude_glob() {
        let dir = TempDir::new().unwrap();
        create_vault(dir.path());

        let store = VaultStore::open(dir.path())
            .unwrap()
            .exclude("templates/**");
        let docs = store.list_all_documents().unwrap();

        assert_eq!(docs.len(), 3);
        assert!(docs.iter().all(|d| d.name() != "Daily"));
    }

    #[test]
    fn test_invalid_exclude_glob() {
        let dir = TempDir::new().unwrap();
        let store = VaultStore::open(dir.path()).unwrap().exclude("a[");
        assert!(matches!(
            store.list_all_documents(),
            Err(RewriteError::Glob(_))
        ));
    }

    #[test]
    fn test_read_and_write() {
        let dir = TempDir::new().unwrap();
        create_vault(dir.path());

        let store = VaultStore::open(dir.path()).unwrap();
        let doc = DocumentHandle::new("Inbox.md");
        assert_eq!(store.read_text(&doc).unwrap(), "# Inbox\n");

        store.write_text(&doc, "# Done\n").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("Inbox.md")).unwrap(),
            "# Done\n"
        );

        // No temp files left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_concurrent_writes_to_same_note() {
        let dir = TempDir::new().unwrap();
        create_vault(dir.path());
        let store = std::sync::Arc::new(VaultStore::open(dir.path()).unwrap());

        let writers: Vec<_> = ["first", "second", "third", "fourth"]
            .into_iter()
            .map(|text| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let doc = DocumentHandle::new("Inbox.md");
                    for _ in 0..25 {
                        store.write_text(&doc, text).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let content = fs::read_to_string(dir.path().join("Inbox.md")).unwrap();
        assert!(["first", "second", "third", "fourth"].contains(&content.as_str()));
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_read_missing_document() {
        let dir = TempDir::new().unwrap();
        let store = VaultStore::open(dir.path()).unwrap();
        let err = store.read_text(&DocumentHandle::new("nope.md")).unwrap_err();
        assert!(matches!(err, RewriteError::Read { .. }));
    }

    #[test]
    fn test_open_requires_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("note.md");
        fs::write(&file, "").unwrap();
        assert!(VaultStore::open(&file).is_err());
    }

    #[test]
    fn test_empty_vault() {
        let dir = TempDir::new().unwrap();
        let store = VaultStore::open(dir.path()).unwrap();
        assert!(store.list_all_documents().unwrap().is_empty());
    }
}
