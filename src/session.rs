//! The find/replace panel: settings, the current pattern, and the trigger.

use crate::engine::{BatchRewriteEngine, RunSummary};
use crate::error::Result;
use crate::matcher::Pattern;
use crate::progress::ProgressSink;
use crate::settings::{Settings, SettingsStore};
use crate::store::DocumentStore;
use std::sync::Arc;
use tracing::info;

/// Holds the persisted settings and the pattern compiled from them.
pub struct ReplaceSession {
    settings_store: Arc<dyn SettingsStore>,
    settings: Settings,
    pattern: Pattern,
}

impl ReplaceSession {
    /// Loads settings and compiles the stored pattern.
    pub fn open(settings_store: Arc<dyn SettingsStore>) -> Result<Self> {
        let settings = settings_store.load()?;
        let pattern = Pattern::new(settings.find_pattern.clone());
        Ok(Self {
            settings_store,
            settings,
            pattern,
        })
    }

    /// Returns the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the current pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Replaces the find pattern and persists it.
    ///
    /// Returns whether the new pattern compiled.
    pub fn set_find_pattern(&mut self, raw: impl Into<String>) -> Result<bool> {
        let raw = raw.into();
        self.pattern = Pattern::new(raw.clone());
        self.settings.find_pattern = raw;
        self.settings_store.save(&self.settings)?;
        Ok(self.pattern.is_valid())
    }

    /// Replaces the replacement template and persists it.
    pub fn set_replacement(&mut self, raw: impl Into<String>) -> Result<()> {
        self.settings.replacement = raw.into();
        self.settings_store.save(&self.settings)
    }

    /// Returns true if a replace run can be started.
    pub fn can_replace(&self) -> bool {
        self.pattern.is_valid()
    }

    /// Rewrites every document in the store and waits for the run to finish.
    ///
    /// Returns `Ok(None)` without touching the store when the pattern has no
    /// matcher. On completion the settings record that a run has happened.
    pub async fn replace_all(
        &mut self,
        store: Arc<dyn DocumentStore>,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<Option<RunSummary>> {
        let Some(matcher) = self.pattern.matcher().cloned() else {
            info!(pattern = self.pattern.source(), "pattern has no matcher, nothing to run");
            return Ok(None);
        };

        let documents = store.list_all_documents()?;
        let engine = BatchRewriteEngine::new(store);
        let summary = engine
            .start(documents, matcher, self.settings.replacement.clone(), sink)
            .wait()
            .await?;

        self.settings.conversion_completed = true;
        self.settings_store.save(&self.settings)?;
        Ok(Some(summary))
    }
}
