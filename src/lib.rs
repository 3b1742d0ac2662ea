//! # Vault Replace
//!
//! Batch regex find-and-replace across a vault of markdown notes.
//!
//! This crate provides:
//! - Pattern compilation with escape normalization and soft failure
//! - A cooperative batch engine that rewrites one document per scheduler turn
//! - Progress reporting through a pluggable sink
//! - Persisted find/replace settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vault_replace::prelude::*;
//!
//! # async fn run() -> vault_replace::Result<()> {
//! let vault = Arc::new(VaultStore::open("./notes")?);
//! let mut session = ReplaceSession::open(Arc::new(JsonSettingsStore::for_vault("./notes")))?;
//!
//! session.set_find_pattern(r"\[\[(.+?)\]\]")?;
//! session.set_replacement("[${1}](${1}.md)")?;
//!
//! if let Some(summary) = session.replace_all(vault, Arc::new(LogSink)).await? {
//!     println!("{} notes modified", summary.modified_count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod matcher;
pub mod progress;
pub mod session;
pub mod settings;
pub mod store;
pub mod transform;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::engine::{BatchRewriteEngine, RunHandle, RunSummary};
    pub use crate::error::{Result, RewriteError};
    pub use crate::matcher::{Matcher, Pattern, compile, normalize_escapes};
    pub use crate::progress::{LogSink, NoticeSink, ProgressSink};
    pub use crate::session::ReplaceSession;
    pub use crate::settings::{JsonSettingsStore, Settings, SettingsStore};
    pub use crate::store::{DocumentHandle, DocumentStore, MemoryStore, VaultStore};
    pub use crate::transform::Rewrite;
}

pub use prelude::*;
