//! Persisted find/replace settings.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory inside a vault that holds this tool's data.
pub const DATA_DIR: &str = ".vault-replace";

/// File name of the settings file inside [`DATA_DIR`].
pub const SETTINGS_FILE: &str = "data.json";

/// User settings for the batch replace.
///
/// Missing keys load as their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Raw find pattern, as typed.
    pub find_pattern: String,
    /// Raw replacement template.
    pub replacement: String,
    /// Stored but not consulted when compiling; matching is always case sensitive.
    pub case_sensitive: bool,
    /// Set once a replace run has completed.
    pub conversion_completed: bool,
}

/// Key-value persistence for [`Settings`].
pub trait SettingsStore: Send + Sync {
    /// Loads settings, falling back to defaults when nothing is stored.
    fn load(&self) -> Result<Settings>;

    /// Persists settings.
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    /// Uses the settings file at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the default settings file inside a vault.
    pub fn for_vault(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref().join(DATA_DIR).join(SETTINGS_FILE))
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}
