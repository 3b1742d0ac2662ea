//! Error types for vault rewriting.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rewrite operations.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("Rewrite run aborted: {message}")]
    RunAborted { message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, RewriteError>;
