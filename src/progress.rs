//! Progress reporting for rewrite runs.

use crate::error::RewriteError;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

/// Receives progress and completion events from a rewrite run.
///
/// `progress` may be called any number of times; `complete` is called exactly
/// once, last. The sink owns its own presentation and lifecycle.
pub trait ProgressSink: Send + Sync {
    /// A document was modified; `remaining` documents are still queued.
    fn progress(&self, remaining: usize, total: usize);

    /// The run finished.
    fn complete(&self, modified_count: usize, modified_names: &[String]);

    /// A document could not be read or written. The run continues.
    fn failed(&self, _name: &str, _error: &RewriteError) {}
}

/// Formats the final status line for a run.
pub fn completion_message(modified_count: usize) -> String {
    if modified_count == 0 {
        "No matches found to replace.".to_string()
    } else {
        format!("{modified_count} files modified!")
    }
}

/// Formats an interim status line.
pub fn progress_message(remaining: usize, total: usize) -> String {
    format!("{remaining} / {total} files left")
}

/// A transient terminal status line.
///
/// Shows a spinner while the run is going. On completion the spinner stops
/// and the summary line stays on screen instead of hiding after a delay, so
/// the result is still readable once the command has exited.
pub struct NoticeSink {
    bar: ProgressBar,
}

impl NoticeSink {
    /// Creates and shows the notice.
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.set_message("Replacing...");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Creates a notice that draws nothing, for non-interactive output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Returns the message currently shown.
    pub fn message(&self) -> String {
        self.bar.message()
    }
}

impl Default for NoticeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for NoticeSink {
    fn progress(&self, remaining: usize, total: usize) {
        self.bar.set_message(progress_message(remaining, total));
    }

    fn complete(&self, modified_count: usize, _modified_names: &[String]) {
        self.bar.finish_with_message(completion_message(modified_count));
    }

    fn failed(&self, name: &str, error: &RewriteError) {
        self.bar.println(format!("Skipped {name}: {error}"));
    }
}

/// Reports run events as tracing records.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn progress(&self, remaining: usize, total: usize) {
        info!(remaining, total, "{}", progress_message(remaining, total));
    }

    fn complete(&self, modified_count: usize, modified_names: &[String]) {
        info!(modified = ?modified_names, "{}", completion_message(modified_count));
    }

    fn failed(&self, name: &str, error: &RewriteError) {
        warn!(document = name, error = %error, "document skipped");
    }
}
